//! Round reports, plan outcomes, and checkpoints.

use serde::{Deserialize, Serialize};

use crate::allocation::WeightMatrix;
use crate::graph::GraphSnapshot;
use crate::models::Skill;

/// A robot executing a skill in one round.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RobotAssignment {
    /// Robot name.
    pub robot: String,
    /// Assigned skill.
    pub skill: Skill,
    /// Weight of the pairing.
    pub weight: f64,
}

/// What happened in one assignment round.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoundReport {
    /// 1-based round number.
    pub round: usize,
    /// Executable skills at the start of the round.
    pub frontier: Vec<Skill>,
    /// The round's weight matrix, when recording is enabled.
    pub weights: Option<WeightMatrix>,
    /// Number of (robot, skill) pairs with positive weight.
    pub compatible_pairs: usize,
    /// Selected pairings, in robot order.
    pub assignments: Vec<RobotAssignment>,
    /// Skills completed (removed from the graph) this round.
    pub completed: Vec<Skill>,
    /// Skills left in the graph after the round.
    pub remaining: usize,
}

impl RoundReport {
    /// Whether the round made progress.
    pub fn is_productive(&self) -> bool {
        !self.completed.is_empty()
    }
}

/// Why a plan stopped without completing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StallReason {
    /// No robot can perform any frontier skill; retrying cannot help.
    NoCapableRobot,
    /// Compatible pairs existed but the solver kept assigning nothing.
    SolverFailure,
}

/// Terminal state of a planning run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PlanOutcome {
    /// Every skill was assigned and removed.
    Complete,
    /// The frontier could not be assigned.
    Stalled {
        /// Round in which the driver gave up.
        round: usize,
        /// Frontier skills left unassigned.
        pending: Vec<Skill>,
        /// Cause of the stall.
        reason: StallReason,
    },
    /// Cancellation was requested between rounds.
    Cancelled {
        /// Last round that ran.
        after_round: usize,
    },
}

impl PlanOutcome {
    /// Whether the graph was emptied.
    pub fn is_complete(&self) -> bool {
        matches!(self, PlanOutcome::Complete)
    }
}

/// Result of driving a plan to a terminal state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanReport {
    /// How the run ended.
    pub outcome: PlanOutcome,
    /// Every round that ran, in order.
    pub rounds: Vec<RoundReport>,
    /// Skills completed, in completion order (including resumed progress).
    pub completed: Vec<Skill>,
    /// Skills left in the graph.
    pub remaining: usize,
}

/// Resumable planner state: the remaining graph and finished skills.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanCheckpoint {
    /// Remaining graph.
    pub graph: GraphSnapshot,
    /// Skills already completed.
    pub completed: Vec<Skill>,
    /// Rounds already run.
    pub round: usize,
}

impl PlanCheckpoint {
    /// Serializes to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Parses from JSON.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_is_complete() {
        assert!(PlanOutcome::Complete.is_complete());
        assert!(!PlanOutcome::Cancelled { after_round: 0 }.is_complete());
        assert!(!PlanOutcome::Stalled {
            round: 1,
            pending: vec![],
            reason: StallReason::NoCapableRobot
        }
        .is_complete());
    }

    #[test]
    fn test_checkpoint_json() {
        let cp = PlanCheckpoint {
            graph: GraphSnapshot {
                skills: vec![Skill::new("b")],
                edges: vec![],
            },
            completed: vec![Skill::new("a")],
            round: 1,
        };
        let json = cp.to_json().unwrap();
        assert!(json.contains("\"completed\":[\"a\"]"));
        assert_eq!(PlanCheckpoint::from_json(&json).unwrap(), cp);
    }
}
