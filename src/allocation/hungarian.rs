//! Hungarian (Kuhn–Munkres) backend for the assignment LP.
//!
//! The bipartite assignment polytope is integral, so the LP
//!
//! ```text
//! max Σ w[r][s]·x[r][s]
//! s.t. Σ_s x[r][s] ≤ 1  ∀r
//!      Σ_r x[r][s] ≤ 1  ∀s
//!      0 ≤ x[r][s] ≤ 1
//! ```
//!
//! has a 0/1 optimum, which the Hungarian method finds directly.
//! Rectangular matrices are padded to square with zero-weight dummies;
//! with non-negative weights a dummy pairing is equivalent to leaving
//! the row or column unassigned.
//!
//! # Complexity
//! O(n³) with n = max(robots, skills).
//!
//! # Reference
//! Kuhn (1955), "The Hungarian Method for the Assignment Problem",
//! Naval Research Logistics Quarterly 2(1–2)

use super::{AssignmentBackend, SolverError, WeightMatrix};

/// Exact assignment solver using shortest augmenting paths with potentials.
#[derive(Debug, Clone, Copy, Default)]
pub struct HungarianBackend;

impl AssignmentBackend for HungarianBackend {
    fn maximize(&self, weights: &WeightMatrix) -> Result<Vec<f64>, SolverError> {
        let (rows, cols) = (weights.rows(), weights.cols());
        let mut x = vec![0.0; rows * cols];
        if rows == 0 || cols == 0 {
            return Ok(x);
        }

        let n = rows.max(cols);
        // Minimize negated weight over the padded square matrix.
        let cost = |i: usize, j: usize| -> f64 {
            if i < rows && j < cols {
                -weights.get(i, j)
            } else {
                0.0
            }
        };

        // 1-indexed potentials; p[j] = row matched to column j (0 = none).
        let mut u = vec![0.0_f64; n + 1];
        let mut v = vec![0.0_f64; n + 1];
        let mut p = vec![0_usize; n + 1];
        let mut way = vec![0_usize; n + 1];

        for i in 1..=n {
            p[0] = i;
            let mut j0 = 0;
            let mut minv = vec![f64::INFINITY; n + 1];
            let mut used = vec![false; n + 1];

            loop {
                used[j0] = true;
                let i0 = p[j0];
                let mut delta = f64::INFINITY;
                let mut j1 = 0;

                for j in 1..=n {
                    if used[j] {
                        continue;
                    }
                    let cur = cost(i0 - 1, j - 1) - u[i0] - v[j];
                    if cur < minv[j] {
                        minv[j] = cur;
                        way[j] = j0;
                    }
                    if minv[j] < delta {
                        delta = minv[j];
                        j1 = j;
                    }
                }

                if j1 == 0 || !delta.is_finite() {
                    return Err(SolverError::Backend(
                        "no augmenting path (non-finite reduced cost)".into(),
                    ));
                }

                for j in 0..=n {
                    if used[j] {
                        u[p[j]] += delta;
                        v[j] -= delta;
                    } else {
                        minv[j] -= delta;
                    }
                }

                j0 = j1;
                if p[j0] == 0 {
                    break;
                }
            }

            loop {
                let j1 = way[j0];
                p[j0] = p[j1];
                j0 = j1;
                if j0 == 0 {
                    break;
                }
            }
        }

        for j in 1..=n {
            let i = p[j];
            if (1..=rows).contains(&i) && j <= cols {
                x[(i - 1) * cols + (j - 1)] = 1.0;
            }
        }
        Ok(x)
    }
}
