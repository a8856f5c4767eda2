//! Round-based plan execution.
//!
//! `PlanDriver` repeatedly extracts the executable frontier of a
//! precedence graph, assigns it to robots by maximum total weight, and
//! removes the assigned skills. `Planner` wires the oracles in front of
//! it for instruction-to-plan runs.
//!
//! # Termination
//!
//! Every productive round removes at least one skill, so a graph of N
//! skills with a capable team completes in at most N rounds. A frontier
//! no robot can perform stalls at once; a frontier the solver keeps
//! failing on stalls after `PlannerConfig::max_stalled_rounds` retries.
//!
//! # Summary
//!
//! `PlanSummary` condenses a report: productive and stalled rounds,
//! frontier width, per-robot load, and total weight.
//!
//! # Reference
//! Obata et al. (2024), "LiP-LLM", §III-C: Task allocation by linear programming

mod config;
mod driver;
mod pipeline;
mod report;
mod summary;

pub use config::PlannerConfig;
pub use driver::PlanDriver;
pub use pipeline::Planner;
pub use report::{
    PlanCheckpoint, PlanOutcome, PlanReport, RobotAssignment, RoundReport, StallReason,
};
pub use summary::PlanSummary;
