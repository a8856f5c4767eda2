//! Multi-robot skill planning over oracle-proposed precedence graphs.
//!
//! Turns an ordered list of robot skills into an executable plan:
//! precedence edges proposed by a dependency oracle become a DAG,
//! the DAG's frontier is extracted round by round, and each round's
//! frontier is assigned to heterogeneous robots by maximizing total
//! assignment weight.
//!
//! # Modules
//!
//! - **`models`**: `Skill`, `Robot`, `Capability`, `Assignment`
//! - **`graph`**: Precedence DAG with cached in-degrees, retrying builder
//! - **`oracle`**: Skill/dependency oracle contracts, prompts, LLM adapters
//! - **`allocation`**: Weight matrices, cost sources, assignment solver
//! - **`planner`**: Round driver, reports, checkpoints, end-to-end pipeline
//! - **`validation`**: Input integrity checks (empty skills, duplicate robots)
//!
//! # Example
//!
//! ```
//! use u_skillplan::allocation::ConstantCost;
//! use u_skillplan::graph::PrecedenceGraph;
//! use u_skillplan::models::{Robot, Skill};
//! use u_skillplan::planner::{PlanDriver, PlannerConfig};
//!
//! let skills: Vec<Skill> = vec![
//!     "pick_and_place(blue block, middle of the table)".into(),
//!     "pick_and_place(red block, blue block)".into(),
//! ];
//! let mut graph = PrecedenceGraph::from_skills(&skills);
//! graph.add_dependency(&skills[0], &skills[1]).unwrap();
//!
//! let robots = vec![Robot::arm("Arm_Robot_1")];
//! let driver = PlanDriver::new(graph, robots, ConstantCost::new(1.0), PlannerConfig::default());
//! let report = driver.run().unwrap();
//! assert!(report.outcome.is_complete());
//! assert_eq!(report.rounds.len(), 2);
//! ```
//!
//! # References
//!
//! - Kuhn (1955), "The Hungarian Method for the Assignment Problem"
//! - Kahn (1962), "Topological Sorting of Large Networks"
//! - Obata et al. (2024), "LiP-LLM: Integrating Linear Programming and
//!   Dependency Graph With Large Language Models for Multi-Robot Task Planning"

pub mod allocation;
pub mod error;
pub mod graph;
pub mod models;
pub mod oracle;
pub mod planner;
pub mod validation;

pub use error::PlanError;
