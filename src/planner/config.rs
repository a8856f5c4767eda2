//! Planner configuration.

use serde::{Deserialize, Serialize};

use crate::allocation::{AssignmentSolver, TieBreak, DEFAULT_EPSILON, DEFAULT_TOLERANCE};
use crate::graph::GraphBuilder;

/// Tunables for a planning run.
///
/// Every field has a default, so partial JSON documents are accepted:
///
/// ```
/// use u_skillplan::planner::PlannerConfig;
///
/// let config = PlannerConfig::from_json(r#"{ "max_stalled_rounds": 5 }"#).unwrap();
/// assert_eq!(config.max_stalled_rounds, 5);
/// assert_eq!(config.max_graph_attempts, 3);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    /// Dependency-oracle attempts before giving up on an acyclic graph.
    pub max_graph_attempts: usize,
    /// Consecutive empty rounds tolerated while compatible pairs exist.
    pub max_stalled_rounds: usize,
    /// ε in `1 / (cost + ε)`.
    pub cost_epsilon: f64,
    /// Rule for choosing among equally good assignments.
    pub tie_break: TieBreak,
    /// Relative tolerance when comparing assignment totals.
    pub tolerance: f64,
    /// Whether round reports carry the full weight matrix.
    pub record_weights: bool,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            max_graph_attempts: GraphBuilder::DEFAULT_ATTEMPTS,
            max_stalled_rounds: 3,
            cost_epsilon: DEFAULT_EPSILON,
            tie_break: TieBreak::Lexicographic,
            tolerance: DEFAULT_TOLERANCE,
            record_weights: false,
        }
    }
}

impl PlannerConfig {
    /// Parses a JSON document; missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Sets the dependency-oracle attempt bound.
    pub fn with_max_graph_attempts(mut self, attempts: usize) -> Self {
        self.max_graph_attempts = attempts;
        self
    }

    /// Sets the stalled-round bound.
    pub fn with_max_stalled_rounds(mut self, rounds: usize) -> Self {
        self.max_stalled_rounds = rounds;
        self
    }

    /// Sets ε for the inverse-cost weight.
    pub fn with_cost_epsilon(mut self, epsilon: f64) -> Self {
        self.cost_epsilon = epsilon;
        self
    }

    /// Sets the tie-breaking rule.
    pub fn with_tie_break(mut self, tie_break: TieBreak) -> Self {
        self.tie_break = tie_break;
        self
    }

    /// Records weight matrices in round reports.
    pub fn with_recorded_weights(mut self, record: bool) -> Self {
        self.record_weights = record;
        self
    }

    /// Graph builder configured from these settings.
    pub fn graph_builder(&self) -> GraphBuilder {
        GraphBuilder::new().with_max_attempts(self.max_graph_attempts)
    }

    /// Hungarian-backed solver configured from these settings.
    pub fn solver(&self) -> AssignmentSolver {
        AssignmentSolver::new()
            .with_tie_break(self.tie_break)
            .with_tolerance(self.tolerance)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let c = PlannerConfig::default();
        assert_eq!(c.max_graph_attempts, 3);
        assert_eq!(c.max_stalled_rounds, 3);
        assert_eq!(c.cost_epsilon, 1e-6);
        assert_eq!(c.tie_break, TieBreak::Lexicographic);
        assert!(!c.record_weights);
    }

    #[test]
    fn test_json_round_trip() {
        let c = PlannerConfig::default()
            .with_max_graph_attempts(5)
            .with_tie_break(TieBreak::Backend)
            .with_recorded_weights(true);
        let json = serde_json::to_string(&c).unwrap();
        assert_eq!(PlannerConfig::from_json(&json).unwrap(), c);
    }

    #[test]
    fn test_partial_and_invalid_json() {
        let c = PlannerConfig::from_json(r#"{"tie_break": "Backend"}"#).unwrap();
        assert_eq!(c.tie_break, TieBreak::Backend);
        assert_eq!(c.max_stalled_rounds, 3);

        let bad = r#"{"max_graph_attempts": "many"}"#;
        assert!(PlannerConfig::from_json(bad).is_err());
    }

    #[test]
    fn test_graph_builder_from_config() {
        let c = PlannerConfig::default().with_max_graph_attempts(0);
        assert_eq!(c.graph_builder().max_attempts(), 1);
    }
}
