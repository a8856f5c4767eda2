//! Oracle contracts for skill decomposition and dependency inference.
//!
//! The planner never talks to a language model directly. It consumes two
//! narrow capabilities:
//!
//! - [`SkillOracle`]: given an instruction, the skills chosen so far, and
//!   the remaining candidates, pick the next skill or declare `Done`.
//! - [`DependencyOracle`]: given the ordered skill list, propose
//!   precedence edges as **1-based** index pairs `(pred, succ)`.
//!
//! Both may fail or return malformed output. Callers tolerate this:
//! the graph builder retries and discards bad edges; the skill-list
//! generator stops on an invalid choice.
//!
//! [`llm`] adapts any [`TextModel`] to both contracts using the prompts
//! in [`prompt`].

mod generator;
pub mod llm;
pub mod prompt;

pub use generator::{generate_skill_list, SkillCatalog};
pub use llm::{LlmDependencyOracle, LlmSkillOracle, OracleConfig, TextModel};

use std::time::Duration;
use thiserror::Error;

use crate::models::{Skill, SkillChoice};

/// Failure of an oracle call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OracleError {
    /// The backing service could not be reached or returned an error.
    #[error("oracle unavailable: {0}")]
    Unavailable(String),
    /// The call did not complete in time.
    #[error("oracle timed out after {0:?}")]
    Timeout(Duration),
    /// The response could not be interpreted.
    #[error("malformed oracle output: {0}")]
    Malformed(String),
    /// A failure retrying cannot fix (e.g. rejected credentials).
    #[error("oracle failed: {0}")]
    Fatal(String),
}

impl OracleError {
    /// Whether asking again may succeed.
    pub fn is_retryable(&self) -> bool {
        !matches!(self, OracleError::Fatal(_))
    }
}

/// Proposes precedence edges over an ordered skill list.
pub trait DependencyOracle {
    /// Returns `(pred, succ)` pairs, 1-based into `skills`: skill `pred`
    /// must complete before skill `succ` may start.
    fn propose_edges(&self, skills: &[Skill]) -> Result<Vec<(usize, usize)>, OracleError>;
}

/// Chooses the next skill of a decomposition.
pub trait SkillOracle {
    /// Picks one of `candidates` (or `Done`) given the skills chosen so far.
    fn choose_next(
        &self,
        instruction: &str,
        history: &[Skill],
        candidates: &[Skill],
    ) -> Result<SkillChoice, OracleError>;
}

/// A dependency oracle that always proposes the same edges.
///
/// Useful when dependencies are known up front.
#[derive(Debug, Clone, Default)]
pub struct FixedDependencies {
    edges: Vec<(usize, usize)>,
}

impl FixedDependencies {
    /// Creates an oracle answering with `edges` (1-based).
    pub fn new(edges: Vec<(usize, usize)>) -> Self {
        Self { edges }
    }
}

impl DependencyOracle for FixedDependencies {
    fn propose_edges(&self, _skills: &[Skill]) -> Result<Vec<(usize, usize)>, OracleError> {
        Ok(self.edges.clone())
    }
}

impl<F> DependencyOracle for F
where
    F: Fn(&[Skill]) -> Result<Vec<(usize, usize)>, OracleError>,
{
    fn propose_edges(&self, skills: &[Skill]) -> Result<Vec<(usize, usize)>, OracleError> {
        self(skills)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable() {
        assert!(OracleError::Unavailable("x".into()).is_retryable());
        assert!(OracleError::Timeout(Duration::from_secs(1)).is_retryable());
        assert!(OracleError::Malformed("x".into()).is_retryable());
        assert!(!OracleError::Fatal("x".into()).is_retryable());
    }

    #[test]
    fn test_closure_oracle() {
        let oracle = |skills: &[Skill]| -> Result<Vec<(usize, usize)>, OracleError> {
            Ok((1..skills.len()).map(|i| (i, i + 1)).collect())
        };
        let s = vec![Skill::new("a"), Skill::new("b"), Skill::new("c")];
        assert_eq!(oracle.propose_edges(&s).unwrap(), vec![(1, 2), (2, 3)]);
    }

    #[test]
    fn test_fixed_dependencies() {
        let oracle = FixedDependencies::new(vec![(1, 2)]);
        assert_eq!(oracle.propose_edges(&[]).unwrap(), vec![(1, 2)]);
    }
}
