//! Assignment solver: LP construction, result decoding, tie-breaking.
//!
//! The solver owns problem construction and interpretation; the
//! numeric optimization itself is delegated to an [`AssignmentBackend`].
//! Backend output is rounded to {0, 1}, checked against the assignment
//! constraints, and stripped of zero-weight pairs.
//!
//! # Tie-breaking
//!
//! Several assignments can share the optimal total. With
//! [`TieBreak::Lexicographic`] the solver fixes robots in index order,
//! giving each the lowest-index skill for which an optimal completion
//! still exists. The result is independent of the backend.
//!
//! Totals are compared with a relative tolerance ([`DEFAULT_TOLERANCE`]).
//! Two totals closer than that count as a tie, so the lowest-index skill
//! wins even if its total is marginally smaller.

use log::warn;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::{HungarianBackend, WeightMatrix};
use crate::models::{Assignment, AssignmentPair};

/// Failure of an assignment solve.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SolverError {
    /// A weight is negative or not finite.
    #[error("invalid weight {value} at ({robot}, {skill})")]
    InvalidWeight {
        /// Row index.
        robot: usize,
        /// Column index.
        skill: usize,
        /// Offending value.
        value: f64,
    },
    /// The backend returned a solution of the wrong size.
    #[error("backend returned {got} values for a {rows}x{cols} problem")]
    ShapeMismatch {
        /// Values returned.
        got: usize,
        /// Expected rows.
        rows: usize,
        /// Expected columns.
        cols: usize,
    },
    /// The rounded solution assigns a robot or skill twice.
    #[error("rounded solution violates assignment constraints: {0}")]
    Inconsistent(String),
    /// The backend reported infeasibility or an internal error.
    #[error("assignment backend failed: {0}")]
    Backend(String),
}

/// Linear-program capability for the assignment polytope.
///
/// Maximizes `Σ w[r][s]·x[r][s]` subject to every row and column summing
/// to at most one and `0 ≤ x ≤ 1`. Returns `x` row-major. Values need not
/// be exactly integral; the solver rounds them.
pub trait AssignmentBackend {
    /// Solves the relaxed assignment problem for `weights`.
    fn maximize(&self, weights: &WeightMatrix) -> Result<Vec<f64>, SolverError>;
}

/// Default relative tolerance for comparing objective values.
pub const DEFAULT_TOLERANCE: f64 = 1e-12;

/// How optimal ties are resolved.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TieBreak {
    /// Robots in index order take the lowest-index skill consistent with
    /// optimality. Totals within the solver tolerance are treated as equal.
    #[default]
    Lexicographic,
    /// Whatever the backend returns.
    Backend,
}

/// Solves one round's weighted assignment.
///
/// # Example
/// ```
/// use u_skillplan::allocation::{AssignmentSolver, WeightMatrix};
///
/// let w = WeightMatrix::from_rows(vec![vec![5.0, 1.0], vec![1.0, 5.0]]).unwrap();
/// let a = AssignmentSolver::new().solve(&w);
/// assert_eq!(a.skill_for_robot(0), Some(0));
/// assert_eq!(a.skill_for_robot(1), Some(1));
/// assert_eq!(a.total_weight(), 10.0);
/// ```
#[derive(Debug, Clone)]
pub struct AssignmentSolver<B = HungarianBackend> {
    backend: B,
    tie_break: TieBreak,
    tolerance: f64,
}

impl AssignmentSolver<HungarianBackend> {
    /// Creates a solver with the built-in Hungarian backend.
    pub fn new() -> Self {
        Self::with_backend(HungarianBackend)
    }
}

impl Default for AssignmentSolver<HungarianBackend> {
    fn default() -> Self {
        Self::new()
    }
}

impl<B: AssignmentBackend> AssignmentSolver<B> {
    /// Creates a solver over a custom backend.
    pub fn with_backend(backend: B) -> Self {
        Self {
            backend,
            tie_break: TieBreak::default(),
            tolerance: DEFAULT_TOLERANCE,
        }
    }

    /// Sets the tie-breaking rule.
    pub fn with_tie_break(mut self, tie_break: TieBreak) -> Self {
        self.tie_break = tie_break;
        self
    }

    /// Sets the relative tolerance used to compare objective values.
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance.abs();
        self
    }

    /// Solves, recovering any failure as an empty assignment.
    ///
    /// An empty frontier returns an empty assignment without invoking the
    /// backend. A matrix without positive entries returns the zero
    /// assignment. Solver failures are logged at `warn` level.
    pub fn solve(&self, weights: &WeightMatrix) -> Assignment {
        match self.try_solve(weights) {
            Ok(assignment) => assignment,
            Err(e) => {
                warn!("assignment solve failed, assigning nothing this round: {e}");
                Assignment::new()
            }
        }
    }

    /// Solves, reporting failures.
    pub fn try_solve(&self, weights: &WeightMatrix) -> Result<Assignment, SolverError> {
        if weights.is_empty() {
            return Ok(Assignment::new());
        }
        check_weights(weights)?;
        if !weights.has_positive() {
            return Ok(Assignment::new());
        }

        let best = self.decode(weights)?;
        match self.tie_break {
            TieBreak::Backend => Ok(best),
            TieBreak::Lexicographic => self.canonicalize(weights, best.total_weight()),
        }
    }

    /// Runs the backend and turns its output into a checked assignment.
    fn decode(&self, weights: &WeightMatrix) -> Result<Assignment, SolverError> {
        let (rows, cols) = (weights.rows(), weights.cols());
        if rows == 0 || cols == 0 {
            return Ok(Assignment::new());
        }

        let x = self.backend.maximize(weights)?;
        if x.len() != rows * cols {
            return Err(SolverError::ShapeMismatch {
                got: x.len(),
                rows,
                cols,
            });
        }

        let rounded: Vec<u8> = x.iter().map(|v| u8::from(v.round() >= 1.0)).collect();
        for r in 0..rows {
            let row = &rounded[r * cols..(r + 1) * cols];
            let sum: u32 = row.iter().map(|&b| u32::from(b)).sum();
            if sum > 1 {
                let msg = format!("robot {r} assigned {sum} skills");
                return Err(SolverError::Inconsistent(msg));
            }
        }
        for c in 0..cols {
            let sum: u32 = (0..rows).map(|r| u32::from(rounded[r * cols + c])).sum();
            if sum > 1 {
                let msg = format!("skill {c} assigned {sum} robots");
                return Err(SolverError::Inconsistent(msg));
            }
        }

        let pairs = (0..rows)
            .flat_map(|r| (0..cols).map(move |c| (r, c)))
            .filter(|&(r, c)| rounded[r * cols + c] == 1)
            .filter(|&(r, c)| weights.get(r, c) > 0.0)
            .map(|(robot, skill)| AssignmentPair {
                robot,
                skill,
                weight: weights.get(robot, skill),
            })
            .collect();

        Assignment::from_pairs(pairs)
            .ok_or_else(|| SolverError::Inconsistent("duplicate pair".into()))
    }

    /// Optimal objective over a sub-problem.
    fn optimum(
        &self,
        weights: &WeightMatrix,
        rows: &[usize],
        cols: &[usize],
    ) -> Result<f64, SolverError> {
        let sub = weights.select(rows, cols);
        if !sub.has_positive() {
            return Ok(0.0);
        }
        Ok(self.decode(&sub)?.total_weight())
    }

    /// Lexicographically smallest optimal assignment (robot, then skill).
    fn canonicalize(
        &self,
        weights: &WeightMatrix,
        target: f64,
    ) -> Result<Assignment, SolverError> {
        let mut free_rows: Vec<usize> = (0..weights.rows()).collect();
        let mut free_cols: Vec<usize> = (0..weights.cols()).collect();
        let mut fixed = 0.0;
        let mut pairs = Vec::new();

        for robot in 0..weights.rows() {
            free_rows.retain(|&r| r != robot);

            let mut chosen = None;
            for (pos, &skill) in free_cols.iter().enumerate() {
                let w = weights.get(robot, skill);
                if w <= 0.0 {
                    continue;
                }
                let rest: Vec<usize> = free_cols.iter().copied().filter(|&c| c != skill).collect();
                let value = fixed + w + self.optimum(weights, &free_rows, &rest)?;
                if self.close(value, target) {
                    chosen = Some((pos, skill, w));
                    break;
                }
            }

            if let Some((pos, skill, weight)) = chosen {
                free_cols.remove(pos);
                fixed += weight;
                pairs.push(AssignmentPair {
                    robot,
                    skill,
                    weight,
                });
            }
        }

        if !self.close(fixed, target) {
            return Err(SolverError::Backend(format!(
                "tie-break reached {fixed}, expected optimum {target}"
            )));
        }
        Assignment::from_pairs(pairs)
            .ok_or_else(|| SolverError::Inconsistent("duplicate pair".into()))
    }

    fn close(&self, a: f64, b: f64) -> bool {
        (a - b).abs() <= self.tolerance * a.abs().max(b.abs()).max(1.0)
    }
}

fn check_weights(weights: &WeightMatrix) -> Result<(), SolverError> {
    for robot in 0..weights.rows() {
        for (skill, &value) in weights.row(robot).iter().enumerate() {
            if !value.is_finite() || value < 0.0 {
                return Err(SolverError::InvalidWeight {
                    robot,
                    skill,
                    value,
                });
            }
        }
    }
    Ok(())
}
