//! Oracle-driven precedence graph construction with cycle repair.
//!
//! # Algorithm
//!
//! 1. Ask the dependency oracle for candidate edges over the full skill list.
//! 2. Discard edges with out-of-range indices and self-loops.
//! 3. Build the graph and test acyclicity.
//! 4. On a cycle (or a retryable oracle failure), ask again, up to a
//!    fixed number of attempts. Attempts are independent; no edges carry
//!    over from a rejected proposal.

use log::{debug, error, info, warn};

use super::PrecedenceGraph;
use crate::error::PlanError;
use crate::models::Skill;
use crate::oracle::{DependencyOracle, OracleError};
use crate::validation::validate_skills;

/// Builds acyclic precedence graphs from oracle proposals.
#[derive(Debug, Clone)]
pub struct GraphBuilder {
    max_attempts: usize,
}

impl GraphBuilder {
    /// Attempts made before giving up on an acyclic graph.
    pub const DEFAULT_ATTEMPTS: usize = 3;

    /// Creates a builder with the default attempt bound.
    pub fn new() -> Self {
        Self {
            max_attempts: Self::DEFAULT_ATTEMPTS,
        }
    }

    /// Sets the attempt bound (at least one attempt is always made).
    pub fn with_max_attempts(mut self, attempts: usize) -> Self {
        self.max_attempts = attempts.max(1);
        self
    }

    /// The attempt bound.
    pub fn max_attempts(&self) -> usize {
        self.max_attempts
    }

    /// Builds a DAG over `skills` from the oracle's edge proposals.
    ///
    /// An empty skill list yields an empty graph without consulting the
    /// oracle.
    ///
    /// # Errors
    /// - `PlanError::InvalidInput` if a skill identifier is empty.
    /// - `PlanError::NoAcyclicGraph` if every attempt produced a cycle,
    ///   or the oracle failed with a non-retryable error.
    pub fn build<O>(&self, skills: &[Skill], oracle: &O) -> Result<PrecedenceGraph, PlanError>
    where
        O: DependencyOracle + ?Sized,
    {
        validate_skills(skills).map_err(PlanError::InvalidInput)?;
        if skills.is_empty() {
            return Ok(PrecedenceGraph::new());
        }

        let mut last_failure: Option<OracleError> = None;

        for attempt in 1..=self.max_attempts {
            let edges = match oracle.propose_edges(skills) {
                Ok(edges) => edges,
                Err(e) if e.is_retryable() => {
                    warn!("dependency oracle failed on attempt {attempt}: {e}");
                    last_failure = Some(e);
                    continue;
                }
                Err(e) => {
                    error!("dependency oracle failed permanently: {e}");
                    return Err(PlanError::NoAcyclicGraph {
                        attempts: attempt,
                        cause: Some(e),
                    });
                }
            };

            let graph = Self::assemble(skills, &edges);
            if graph.is_acyclic() {
                info!(
                    "accepted dependency graph on attempt {attempt}: {} skills, {} edges",
                    graph.node_count(),
                    graph.edge_count()
                );
                return Ok(graph);
            }
            warn!("cycle detected in dependency graph on attempt {attempt}, retrying");
            last_failure = None;
        }

        error!(
            "no acyclic dependency graph after {} attempts",
            self.max_attempts
        );
        Err(PlanError::NoAcyclicGraph {
            attempts: self.max_attempts,
            cause: last_failure,
        })
    }

    /// Builds a graph from 1-based edge indices, discarding malformed edges.
    ///
    /// Edges naming an index outside `1..=skills.len()` and edges whose
    /// endpoints resolve to the same node are dropped. The result may
    /// contain cycles.
    pub fn assemble(skills: &[Skill], edges: &[(usize, usize)]) -> PrecedenceGraph {
        let mut graph = PrecedenceGraph::from_skills(skills);
        let in_range = |i: usize| (1..=skills.len()).contains(&i);

        for &(pred, succ) in edges {
            if !in_range(pred) || !in_range(succ) {
                warn!("discarding edge {pred} -> {succ}: index out of range");
                continue;
            }
            let (Some(from), Some(to)) = (
                graph.node_id(&skills[pred - 1]),
                graph.node_id(&skills[succ - 1]),
            ) else {
                continue;
            };
            if from == to {
                warn!("discarding edge {pred} -> {succ}: self-loop");
                continue;
            }
            match graph.add_edge(from, to) {
                Ok(true) => debug!("edge '{}' -> '{}'", skills[pred - 1], skills[succ - 1]),
                Ok(false) => {}
                Err(e) => warn!("discarding edge {pred} -> {succ}: {e}"),
            }
        }
        graph
    }
}

impl Default for GraphBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::cell::Cell;

    fn skills(names: &[&str]) -> Vec<Skill> {
        names.iter().map(|&n| Skill::new(n)).collect()
    }

    /// Returns a fixed response per call, repeating the last one.
    struct Scripted {
        responses: Vec<Result<Vec<(usize, usize)>, OracleError>>,
        calls: Cell<usize>,
    }

    impl Scripted {
        fn new(responses: Vec<Result<Vec<(usize, usize)>, OracleError>>) -> Self {
            Self {
                responses,
                calls: Cell::new(0),
            }
        }
    }

    impl DependencyOracle for Scripted {
        fn propose_edges(&self, _skills: &[Skill]) -> Result<Vec<(usize, usize)>, OracleError> {
            let i = self.calls.get();
            self.calls.set(i + 1);
            self.responses[i.min(self.responses.len() - 1)].clone()
        }
    }

    #[test]
    fn test_accepts_first_acyclic_proposal() {
        let s = skills(&["A", "B", "C"]);
        let oracle = Scripted::new(vec![Ok(vec![(1, 2)])]);

        let g = GraphBuilder::new().build(&s, &oracle).unwrap();
        assert_eq!(g.node_count(), 3);
        assert_eq!(g.edges(), vec![(s[0].clone(), s[1].clone())]);
        assert_eq!(g.frontier(), skills(&["A", "C"]));
        assert_eq!(oracle.calls.get(), 1);
    }

    #[test]
    fn test_retries_after_cycle() {
        let s = skills(&["A", "B"]);
        let oracle = Scripted::new(vec![Ok(vec![(1, 2), (2, 1)]), Ok(vec![(2, 1)])]);

        let g = GraphBuilder::new().build(&s, &oracle).unwrap();
        assert_eq!(oracle.calls.get(), 2);
        assert_eq!(g.frontier(), skills(&["B"]));
    }

    #[test]
    fn test_gives_up_after_bound() {
        let s = skills(&["A", "B"]);
        let oracle = Scripted::new(vec![Ok(vec![(1, 2), (2, 1)])]);

        let err = GraphBuilder::new().build(&s, &oracle).unwrap_err();
        assert!(matches!(
            err,
            PlanError::NoAcyclicGraph {
                attempts: 3,
                cause: None
            }
        ));
        assert_eq!(oracle.calls.get(), 3);
    }

    #[test]
    fn test_custom_attempt_bound() {
        let s = skills(&["A", "B"]);
        let oracle = Scripted::new(vec![Ok(vec![(1, 2), (2, 1)])]);

        let builder = GraphBuilder::new().with_max_attempts(5);
        assert!(builder.build(&s, &oracle).is_err());
        assert_eq!(oracle.calls.get(), 5);
    }

    #[test]
    fn test_retryable_failure_then_success() {
        let s = skills(&["A", "B"]);
        let oracle = Scripted::new(vec![
            Err(OracleError::Unavailable("503".into())),
            Ok(vec![(1, 2)]),
        ]);

        let g = GraphBuilder::new().build(&s, &oracle).unwrap();
        assert_eq!(g.edge_count(), 1);
    }

    #[test]
    fn test_fatal_failure_aborts_immediately() {
        let s = skills(&["A", "B"]);
        let oracle = Scripted::new(vec![Err(OracleError::Fatal("bad key".into()))]);

        let err = GraphBuilder::new().build(&s, &oracle).unwrap_err();
        match err {
            PlanError::NoAcyclicGraph { attempts, cause } => {
                assert_eq!(attempts, 1);
                assert!(matches!(cause, Some(OracleError::Fatal(_))));
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(oracle.calls.get(), 1);
    }

    #[test]
    fn test_exhausted_retryable_failures_keep_cause() {
        let s = skills(&["A"]);
        let oracle = Scripted::new(vec![Err(OracleError::Unavailable("down".into()))]);

        let err = GraphBuilder::new().build(&s, &oracle).unwrap_err();
        assert!(matches!(
            err,
            PlanError::NoAcyclicGraph {
                cause: Some(OracleError::Unavailable(_)),
                ..
            }
        ));
    }

    #[test]
    fn test_empty_skill_list_skips_oracle() {
        let oracle = Scripted::new(vec![Err(OracleError::Fatal("unreachable".into()))]);
        let g = GraphBuilder::new().build(&[], &oracle).unwrap();
        assert!(g.is_empty());
        assert_eq!(oracle.calls.get(), 0);
    }

    #[test]
    fn test_empty_identifier_rejected() {
        let s = skills(&["A", ""]);
        let oracle = Scripted::new(vec![Ok(vec![])]);
        let err = GraphBuilder::new().build(&s, &oracle).unwrap_err();
        assert!(matches!(err, PlanError::InvalidInput(_)));
    }

    #[test]
    fn test_malformed_edges_discarded() {
        let s = skills(&["A", "B", "C"]);
        let g = GraphBuilder::assemble(&s, &[(0, 1), (1, 4), (2, 2), (1, 3), (1, 3)]);
        assert_eq!(g.edges(), vec![(s[0].clone(), s[2].clone())]);
    }

    #[test]
    fn test_duplicate_skill_edges_resolve_to_first() {
        // "A" appears at positions 1 and 3.
        let s = skills(&["A", "B", "A"]);
        let g = GraphBuilder::assemble(&s, &[(3, 2), (1, 3)]);
        assert_eq!(g.node_count(), 2);
        assert_eq!(g.edges(), vec![(s[0].clone(), s[1].clone())]);
    }

    proptest! {
        #[test]
        fn prop_accepted_graph_is_acyclic(
            n in 1usize..8,
            raw in proptest::collection::vec((0usize..10, 0usize..10), 0..25),
        ) {
            let s: Vec<Skill> = (0..n).map(|i| Skill::new(format!("s{i}"))).collect();
            let oracle = Scripted::new(vec![Ok(raw)]);
            if let Ok(g) = GraphBuilder::new().build(&s, &oracle) {
                prop_assert!(g.topological_order().is_some());
                prop_assert_eq!(g.node_count(), n);
            }
        }
    }
}
