//! Round-by-round plan driver.
//!
//! # Algorithm
//!
//! 1. Extract the frontier (in-degree-zero skills) of the remaining graph.
//! 2. Score every (robot, frontier skill) pair.
//! 3. Solve the weighted assignment for the round.
//! 4. Remove assigned skills, unblocking their successors.
//!
//! Repeats until the graph is empty, the frontier cannot be assigned,
//! or cancellation is requested.
//!
//! # Complexity
//! O(N · (R·F + n³)) for N skills, R robots, frontier width F and
//! n = max(R, F), since every productive round removes at least one skill.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use log::{debug, info, warn};

use super::{
    PlanCheckpoint, PlanOutcome, PlanReport, PlannerConfig, RobotAssignment, RoundReport,
    StallReason,
};
use crate::allocation::{
    AssignmentBackend, AssignmentSolver, CostSource, HungarianBackend, WeightBuilder,
};
use crate::error::PlanError;
use crate::graph::{self, PrecedenceGraph};
use crate::models::{Robot, Skill};

/// Drives a precedence graph to completion by repeated assignment.
///
/// The driver owns the graph exclusively; every round mutates it.
///
/// # Example
///
/// ```
/// use std::sync::atomic::AtomicBool;
/// use std::sync::Arc;
/// use u_skillplan::allocation::RandomCost;
/// use u_skillplan::graph::PrecedenceGraph;
/// use u_skillplan::models::{Robot, Skill};
/// use u_skillplan::planner::{PlanDriver, PlannerConfig};
///
/// let skills = vec![
///     Skill::new("pick_and_place(red block, blue bowl)"),
///     Skill::new("transport(table)"),
/// ];
/// let graph = PrecedenceGraph::from_skills(&skills);
/// let robots = vec![Robot::arm("Arm_1"), Robot::mobile("Mobile_1")];
///
/// let cancel = Arc::new(AtomicBool::new(false));
/// let mut driver = PlanDriver::new(graph, robots, RandomCost::seeded(7), PlannerConfig::default())
///     .with_cancel_flag(Arc::clone(&cancel));
///
/// let round = driver.step().unwrap().unwrap();
/// assert_eq!(round.completed.len(), 2);
/// assert!(driver.graph().is_empty());
/// ```
#[derive(Debug)]
pub struct PlanDriver<C, B = HungarianBackend> {
    graph: PrecedenceGraph,
    robots: Vec<Robot>,
    weights: WeightBuilder<C>,
    solver: AssignmentSolver<B>,
    config: PlannerConfig,
    cancel: Option<Arc<AtomicBool>>,
    round: usize,
    completed: Vec<Skill>,
}

impl<C: CostSource> PlanDriver<C, HungarianBackend> {
    /// Creates a driver over a fresh graph.
    pub fn new(graph: PrecedenceGraph, robots: Vec<Robot>, cost: C, config: PlannerConfig) -> Self {
        Self {
            graph,
            robots,
            weights: WeightBuilder::new(cost).with_epsilon(config.cost_epsilon),
            solver: config.solver(),
            config,
            cancel: None,
            round: 0,
            completed: Vec::new(),
        }
    }

    /// Restores a driver from a checkpoint.
    ///
    /// # Errors
    /// `PlanError::Graph` if the checkpointed graph is malformed or cyclic.
    pub fn resume(
        checkpoint: &PlanCheckpoint,
        robots: Vec<Robot>,
        cost: C,
        config: PlannerConfig,
    ) -> Result<Self, PlanError> {
        let graph = PrecedenceGraph::from_snapshot(&checkpoint.graph)?;
        let mut driver = Self::new(graph, robots, cost, config);
        driver.round = checkpoint.round;
        driver.completed = checkpoint.completed.clone();
        info!(
            "resumed at round {} with {} skill(s) remaining",
            driver.round,
            driver.graph.node_count()
        );
        Ok(driver)
    }
}

impl<C: CostSource, B: AssignmentBackend> PlanDriver<C, B> {
    /// Replaces the assignment solver.
    pub fn with_solver<B2: AssignmentBackend>(
        self,
        solver: AssignmentSolver<B2>,
    ) -> PlanDriver<C, B2> {
        PlanDriver {
            graph: self.graph,
            robots: self.robots,
            weights: self.weights,
            solver,
            config: self.config,
            cancel: self.cancel,
            round: self.round,
            completed: self.completed,
        }
    }

    /// Installs a cancellation flag, checked before every round.
    pub fn with_cancel_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancel = Some(flag);
        self
    }

    /// Remaining graph.
    pub fn graph(&self) -> &PrecedenceGraph {
        &self.graph
    }

    /// Skills completed so far, in completion order.
    pub fn completed(&self) -> &[Skill] {
        &self.completed
    }

    /// Rounds run so far.
    pub fn round(&self) -> usize {
        self.round
    }

    /// Captures the state needed to resume later.
    pub fn checkpoint(&self) -> PlanCheckpoint {
        PlanCheckpoint {
            graph: self.graph.snapshot(),
            completed: self.completed.clone(),
            round: self.round,
        }
    }

    fn is_cancelled(&self) -> bool {
        self.cancel
            .as_ref()
            .is_some_and(|flag| flag.load(Ordering::SeqCst))
    }

    /// Runs one round.
    ///
    /// Returns `Ok(None)` when the graph is already empty.
    ///
    /// # Errors
    /// `PlanError::Integrity` if skills remain but none is executable.
    pub fn step(&mut self) -> Result<Option<RoundReport>, PlanError> {
        if self.graph.is_empty() {
            return Ok(None);
        }
        let frontier = graph::frontier(&self.graph)?;
        self.round += 1;

        let matrix = self.weights.build(&self.robots, &frontier);
        debug!(
            "round {} weights ({}x{}): {:?}",
            self.round,
            matrix.rows(),
            matrix.cols(),
            matrix.as_slice()
        );
        let compatible_pairs = matrix.positive_count();
        let assignment = self.solver.solve(&matrix);

        let assignments: Vec<RobotAssignment> = assignment
            .pairs()
            .iter()
            .filter_map(|pair| {
                let robot = self.robots.get(pair.robot)?;
                let skill = frontier.get(pair.skill)?;
                Some(RobotAssignment {
                    robot: robot.name.clone(),
                    skill: skill.clone(),
                    weight: pair.weight,
                })
            })
            .collect();

        let mut completed = Vec::with_capacity(assignments.len());
        for a in &assignments {
            if self.graph.remove(&a.skill) {
                completed.push(a.skill.clone());
            }
        }
        self.completed.extend(completed.iter().cloned());

        info!(
            "round {}: frontier {}, assigned {}, remaining {}",
            self.round,
            frontier.len(),
            completed.len(),
            self.graph.node_count()
        );

        Ok(Some(RoundReport {
            round: self.round,
            frontier,
            weights: self.config.record_weights.then_some(matrix),
            compatible_pairs,
            assignments,
            completed,
            remaining: self.graph.node_count(),
        }))
    }

    /// Runs rounds until the plan completes, stalls, or is cancelled.
    ///
    /// A round with no compatible (robot, skill) pair stalls immediately.
    /// A round that assigns nothing although compatible pairs exist is
    /// retried; more than `max_stalled_rounds` such rounds in a row stall.
    ///
    /// # Errors
    /// `PlanError::Integrity` if the graph loses acyclicity.
    pub fn run(mut self) -> Result<PlanReport, PlanError> {
        let mut rounds = Vec::new();
        let mut empty_rounds = 0;

        let outcome = loop {
            if self.graph.is_empty() {
                break PlanOutcome::Complete;
            }
            if self.is_cancelled() {
                info!("cancelled after round {}", self.round);
                break PlanOutcome::Cancelled {
                    after_round: self.round,
                };
            }
            let Some(report) = self.step()? else {
                break PlanOutcome::Complete;
            };

            if report.is_productive() {
                empty_rounds = 0;
                rounds.push(report);
                continue;
            }

            let round = report.round;
            let pending = report.frontier.clone();
            let structural = report.compatible_pairs == 0;
            rounds.push(report);

            if structural {
                warn!(
                    "round {round}: no robot can perform any of {} frontier skill(s)",
                    pending.len()
                );
                break PlanOutcome::Stalled {
                    round,
                    pending,
                    reason: StallReason::NoCapableRobot,
                };
            }

            empty_rounds += 1;
            if empty_rounds > self.config.max_stalled_rounds {
                warn!("round {round}: giving up after {empty_rounds} empty round(s)");
                break PlanOutcome::Stalled {
                    round,
                    pending,
                    reason: StallReason::SolverFailure,
                };
            }
            warn!(
                "round {round}: nothing assigned, retrying ({empty_rounds}/{})",
                self.config.max_stalled_rounds
            );
        };

        match &outcome {
            PlanOutcome::Complete => info!("plan complete after {} round(s)", self.round),
            PlanOutcome::Stalled { round, pending, .. } => {
                warn!(
                    "plan stalled in round {round} with {} pending skill(s)",
                    pending.len()
                )
            }
            PlanOutcome::Cancelled { .. } => {}
        }

        Ok(PlanReport {
            outcome,
            rounds,
            remaining: self.graph.node_count(),
            completed: self.completed,
        })
    }
}
