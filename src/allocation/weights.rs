//! Weight matrices and cost sources.
//!
//! Entry `(r, s)` scores robot `r` performing frontier skill `s`:
//!
//! ```text
//! w(r, s) = 0                     if r lacks the capability s requires
//!         = 1 / (cost(r, s) + ε)  otherwise
//! ```
//!
//! The matrix is rebuilt from scratch every round.

use log::warn;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::models::{Robot, Skill};

/// Dense `robots × frontier` weight matrix (row-major).
///
/// Deserialization rejects documents whose `data` length is not
/// `rows × cols`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawMatrix")]
pub struct WeightMatrix {
    rows: usize,
    cols: usize,
    data: Vec<f64>,
}

#[derive(Deserialize)]
struct RawMatrix {
    rows: usize,
    cols: usize,
    data: Vec<f64>,
}

impl TryFrom<RawMatrix> for WeightMatrix {
    type Error = String;

    fn try_from(raw: RawMatrix) -> Result<Self, Self::Error> {
        let expected = raw.rows.checked_mul(raw.cols);
        if expected != Some(raw.data.len()) {
            return Err(format!(
                "{}x{} weight matrix needs {} entries, got {}",
                raw.rows,
                raw.cols,
                raw.rows.saturating_mul(raw.cols),
                raw.data.len()
            ));
        }
        Ok(Self {
            rows: raw.rows,
            cols: raw.cols,
            data: raw.data,
        })
    }
}

impl WeightMatrix {
    /// Creates an all-zero matrix.
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            data: vec![0.0; rows * cols],
        }
    }

    /// Creates a matrix from rows. Returns `None` if rows are ragged.
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Option<Self> {
        let cols = rows.first().map_or(0, Vec::len);
        if rows.iter().any(|r| r.len() != cols) {
            return None;
        }
        Some(Self {
            rows: rows.len(),
            cols,
            data: rows.into_iter().flatten().collect(),
        })
    }

    /// Number of robots.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of frontier skills.
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Whether there is nothing to assign (no robot or no skill).
    pub fn is_empty(&self) -> bool {
        self.rows == 0 || self.cols == 0
    }

    /// Entry `(robot, skill)`.
    #[inline]
    pub fn get(&self, robot: usize, skill: usize) -> f64 {
        self.data[robot * self.cols + skill]
    }

    /// Sets entry `(robot, skill)`.
    #[inline]
    pub fn set(&mut self, robot: usize, skill: usize, weight: f64) {
        self.data[robot * self.cols + skill] = weight;
    }

    /// One robot's row.
    pub fn row(&self, robot: usize) -> &[f64] {
        &self.data[robot * self.cols..(robot + 1) * self.cols]
    }

    /// Row-major entries.
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    /// Number of strictly positive (assignable) entries.
    pub fn positive_count(&self) -> usize {
        self.data.iter().filter(|&&w| w > 0.0).count()
    }

    /// Whether any robot can perform any skill.
    pub fn has_positive(&self) -> bool {
        self.data.iter().any(|&w| w > 0.0)
    }

    /// Sub-matrix over the given row and column indices.
    pub fn select(&self, rows: &[usize], cols: &[usize]) -> Self {
        let mut out = Self::zeros(rows.len(), cols.len());
        for (i, &r) in rows.iter().enumerate() {
            for (j, &c) in cols.iter().enumerate() {
                out.set(i, j, self.get(r, c));
            }
        }
        out
    }
}

/// Source of per-pair execution costs (distance or similar).
///
/// Costs must be non-negative; lower is better.
pub trait CostSource {
    /// Cost of `robot` performing `skill`.
    fn sample_cost(&mut self, robot: &Robot, skill: &Skill) -> f64;
}

impl<F> CostSource for F
where
    F: FnMut(&Robot, &Skill) -> f64,
{
    fn sample_cost(&mut self, robot: &Robot, skill: &Skill) -> f64 {
        self(robot, skill)
    }
}

/// Uniform `[0, 1)` cost per call, as a stand-in for sensed distance.
///
/// Seed it for reproducible plans.
#[derive(Debug, Clone)]
pub struct RandomCost {
    rng: StdRng,
}

impl RandomCost {
    /// Deterministic stream from a seed.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

}

impl CostSource for RandomCost {
    fn sample_cost(&mut self, _robot: &Robot, _skill: &Skill) -> f64 {
        self.rng.random::<f64>()
    }
}

/// The same cost for every pair.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConstantCost(f64);

impl ConstantCost {
    /// Creates a constant cost source.
    pub fn new(cost: f64) -> Self {
        Self(cost)
    }
}

impl CostSource for ConstantCost {
    fn sample_cost(&mut self, _robot: &Robot, _skill: &Skill) -> f64 {
        self.0
    }
}

/// Explicit per-(robot, skill) costs with a fallback.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CostTable {
    costs: HashMap<String, HashMap<Skill, f64>>,
    default_cost: f64,
}

impl CostTable {
    /// Creates a table whose missing entries cost `default_cost`.
    pub fn new(default_cost: f64) -> Self {
        Self {
            costs: HashMap::new(),
            default_cost,
        }
    }

    /// Sets the cost of a robot performing a skill.
    pub fn with_cost(
        mut self,
        robot: impl Into<String>,
        skill: impl Into<Skill>,
        cost: f64,
    ) -> Self {
        self.costs
            .entry(robot.into())
            .or_default()
            .insert(skill.into(), cost);
        self
    }

    /// Looks up a cost.
    pub fn cost(&self, robot: &str, skill: &Skill) -> f64 {
        self.costs
            .get(robot)
            .and_then(|m| m.get(skill))
            .copied()
            .unwrap_or(self.default_cost)
    }
}

impl CostSource for CostTable {
    fn sample_cost(&mut self, robot: &Robot, skill: &Skill) -> f64 {
        self.cost(&robot.name, skill)
    }
}

/// Default ε guarding against zero cost.
pub const DEFAULT_EPSILON: f64 = 1e-6;

/// Builds weight matrices from capabilities and a cost source.
#[derive(Debug, Clone)]
pub struct WeightBuilder<C> {
    cost: C,
    epsilon: f64,
}

impl<C: CostSource> WeightBuilder<C> {
    /// Creates a builder with the default ε.
    pub fn new(cost: C) -> Self {
        Self {
            cost,
            epsilon: DEFAULT_EPSILON,
        }
    }

    /// Sets ε. Non-positive values fall back to the default.
    pub fn with_epsilon(mut self, epsilon: f64) -> Self {
        self.epsilon = if epsilon > 0.0 {
            epsilon
        } else {
            DEFAULT_EPSILON
        };
        self
    }

    /// Builds the `[robots][frontier]` matrix.
    ///
    /// Costs are sampled only for compatible pairs, so incompatible pairs
    /// are exactly zero regardless of the cost source. An empty frontier
    /// yields a matrix with `is_empty() == true`.
    pub fn build(&mut self, robots: &[Robot], frontier: &[Skill]) -> WeightMatrix {
        let mut weights = WeightMatrix::zeros(robots.len(), frontier.len());

        for (r, robot) in robots.iter().enumerate() {
            for (s, skill) in frontier.iter().enumerate() {
                if !robot.can_perform(skill) {
                    continue;
                }
                let mut cost = self.cost.sample_cost(robot, skill);
                if cost.is_nan() || cost < 0.0 {
                    warn!(
                        "invalid cost {cost} for '{}' on '{skill}', using 0",
                        robot.name
                    );
                    cost = 0.0;
                }
                weights.set(r, s, 1.0 / (cost + self.epsilon));
            }
        }
        weights
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn robots() -> Vec<Robot> {
        vec![Robot::arm("Arm_1"), Robot::mobile("Mobile_1")]
    }

    fn frontier() -> Vec<Skill> {
        vec![
            Skill::new("pick_and_place(red block, blue block)"),
            Skill::new("transport(table)"),
            Skill::new("wipe(table)"),
        ]
    }

    #[test]
    fn test_incompatible_pairs_are_zero() {
        let mut b = WeightBuilder::new(ConstantCost::new(1.0));
        let w = b.build(&robots(), &frontier());

        assert_eq!((w.rows(), w.cols()), (2, 3));
        assert!(w.get(0, 0) > 0.0);
        assert_eq!(w.get(0, 1), 0.0);
        assert_eq!(w.get(1, 0), 0.0);
        assert!(w.get(1, 1) > 0.0);
        assert_eq!(w.get(0, 2), 0.0);
        assert_eq!(w.get(1, 2), 0.0);
        assert_eq!(w.positive_count(), 2);
    }

    #[test]
    fn test_inverse_cost() {
        let half = ConstantCost::new(0.5);
        let mut b = WeightBuilder::new(half).with_epsilon(1e-6);
        let w = b.build(&robots(), &frontier());
        assert!((w.get(0, 0) - 1.0 / (0.5 + 1e-6)).abs() < 1e-9);

        let mut zero = WeightBuilder::new(ConstantCost::new(0.0));
        let w = zero.build(&robots(), &frontier());
        assert!((w.get(0, 0) - 1e6).abs() < 1e-3);
    }

    #[test]
    fn test_cost_sampled_only_for_compatible_pairs() {
        let mut calls = 0;
        let mut b = WeightBuilder::new(|_: &Robot, _: &Skill| {
            calls += 1;
            1.0
        });
        b.build(&robots(), &frontier());
        drop(b);
        assert_eq!(calls, 2);
    }

    #[test]
    fn test_invalid_costs_clamped() {
        let mut neg = WeightBuilder::new(ConstantCost::new(-3.0));
        let w = neg.build(&robots(), &frontier());
        assert!((w.get(0, 0) - 1e6).abs() < 1e-3);

        let mut inf = WeightBuilder::new(ConstantCost::new(f64::INFINITY));
        let w = inf.build(&robots(), &frontier());
        assert_eq!(w.get(0, 0), 0.0);
    }

    #[test]
    fn test_empty_frontier() {
        let mut b = WeightBuilder::new(ConstantCost::new(1.0));
        let w = b.build(&robots(), &[]);
        assert!(w.is_empty());
        assert_eq!(w.rows(), 2);
    }

    #[test]
    fn test_seeded_random_cost_is_reproducible() {
        let mut a = WeightBuilder::new(RandomCost::seeded(7));
        let mut b = WeightBuilder::new(RandomCost::seeded(7));
        let first = a.build(&robots(), &frontier());
        assert_eq!(first, b.build(&robots(), &frontier()));
    }

    #[test]
    fn test_cost_table() {
        let skill = Skill::new("pick_and_place(red block, blue block)");
        let table = CostTable::new(1.0).with_cost("Arm_1", skill.clone(), 3.0);
        assert_eq!(table.cost("Arm_1", &skill), 3.0);
        assert_eq!(table.cost("Arm_2", &skill), 1.0);
    }

    #[test]
    fn test_matrix_helpers() {
        let rows = vec![vec![1.0, 2.0], vec![3.0, 4.0]];
        let w = WeightMatrix::from_rows(rows).unwrap();
        assert_eq!(w.row(1), &[3.0, 4.0]);
        let sub = w.select(&[1], &[1, 0]);
        assert_eq!(sub.as_slice(), &[4.0, 3.0]);
        let ragged = vec![vec![1.0], vec![1.0, 2.0]];
        assert!(WeightMatrix::from_rows(ragged).is_none());
    }

    #[test]
    fn test_matrix_json_shape_checked() {
        let rows = vec![vec![1.0, 0.0], vec![0.0, 2.0]];
        let w = WeightMatrix::from_rows(rows).unwrap();
        let json = serde_json::to_string(&w).unwrap();
        assert_eq!(serde_json::from_str::<WeightMatrix>(&json).unwrap(), w);

        let short = r#"{"rows":2,"cols":2,"data":[1.0]}"#;
        let err = serde_json::from_str::<WeightMatrix>(short).unwrap_err();
        assert!(err.to_string().contains("needs 4 entries, got 1"));

        let overflow = format!(r#"{{"rows":{},"cols":2,"data":[]}}"#, usize::MAX);
        assert!(serde_json::from_str::<WeightMatrix>(&overflow).is_err());
    }
}
