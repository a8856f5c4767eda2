//! Precedence graph construction and frontier extraction.
//!
//! `GraphBuilder` turns oracle edge proposals into a `PrecedenceGraph`
//! that is guaranteed acyclic. The planner then repeatedly reads the
//! graph's frontier and removes completed skills.
//!
//! # Frontier
//!
//! The frontier is the set of skills with no unresolved predecessor.
//! [`frontier`] wraps [`PrecedenceGraph::frontier`] with the integrity
//! check the planner relies on: a non-empty graph with an empty frontier
//! can only mean the acyclicity invariant was broken.

mod builder;
mod dag;

pub use builder::GraphBuilder;
pub use dag::{GraphError, GraphSnapshot, NodeId, PrecedenceGraph};

use crate::error::PlanError;
use crate::models::Skill;

/// Returns the executable skills of `graph`.
///
/// # Errors
/// `PlanError::Integrity` if the graph is non-empty but no skill is
/// executable.
pub fn frontier(graph: &PrecedenceGraph) -> Result<Vec<Skill>, PlanError> {
    let ready = graph.frontier();
    if ready.is_empty() && !graph.is_empty() {
        log::error!(
            "integrity violation: {} skills remain but none is executable",
            graph.node_count()
        );
        return Err(PlanError::Integrity {
            remaining: graph.node_count(),
        });
    }
    Ok(ready)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frontier_empty_graph() {
        let ready = frontier(&PrecedenceGraph::new()).unwrap();
        assert!(ready.is_empty());
    }

    #[test]
    fn test_frontier_integrity_violation() {
        let s = vec![Skill::new("A"), Skill::new("B")];
        let mut g = PrecedenceGraph::from_skills(&s);
        g.add_dependency(&s[0], &s[1]).unwrap();
        g.add_dependency(&s[1], &s[0]).unwrap();

        let err = frontier(&g).unwrap_err();
        assert!(matches!(err, PlanError::Integrity { remaining: 2 }));
    }
}
