//! Fatal planning errors.
//!
//! Recoverable conditions (malformed oracle edges, solver failures,
//! stalled rounds) never surface here; they are logged and absorbed by
//! the component that owns them.

use thiserror::Error;

use crate::graph::GraphError;
use crate::oracle::OracleError;
use crate::validation::ValidationError;

/// A condition that aborts a planning run.
#[derive(Debug, Error)]
pub enum PlanError {
    /// Skills or robots failed structural validation.
    #[error("invalid input: {}", summarize(.0))]
    InvalidInput(Vec<ValidationError>),

    /// The dependency oracle never produced an acyclic graph.
    #[error("no acyclic dependency graph after {attempts} attempt(s)")]
    NoAcyclicGraph {
        /// Attempts made before giving up.
        attempts: usize,
        /// Last oracle failure, if the final attempt failed outright.
        #[source]
        cause: Option<OracleError>,
    },

    /// Skills remain but none is executable: the graph is not acyclic.
    #[error("integrity violation: {remaining} skill(s) remain but none is executable")]
    Integrity {
        /// Live node count at detection time.
        remaining: usize,
    },

    /// A graph mutation failed (e.g. restoring a corrupt checkpoint).
    #[error(transparent)]
    Graph(#[from] GraphError),
}

fn summarize(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| e.message.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}
