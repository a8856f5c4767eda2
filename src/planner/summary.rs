//! Plan quality indicators.
//!
//! Condenses a [`PlanReport`] into a handful of numbers for comparing
//! runs across cost models or robot teams.
//!
//! # Metrics
//!
//! | Metric | Definition |
//! |--------|-----------|
//! | Rounds | Assignment rounds executed |
//! | Productive rounds | Rounds that completed at least one skill |
//! | Stalled rounds | Rounds that completed nothing |
//! | Mean frontier width | Average executable skills per round |
//! | Robot utilization | Fraction of robot slots used across all rounds |
//! | Total weight | Sum of assignment weights over the run |

use std::collections::HashMap;

use super::PlanReport;

/// Run-level planning indicators.
#[derive(Debug, Clone, PartialEq)]
pub struct PlanSummary {
    /// Rounds executed.
    pub rounds: usize,
    /// Rounds that removed at least one skill.
    pub productive_rounds: usize,
    /// Rounds that removed nothing.
    pub stalled_rounds: usize,
    /// Skills completed during the reported rounds.
    pub skills_completed: usize,
    /// Mean frontier size per round (0.0 with no rounds).
    pub mean_frontier_width: f64,
    /// Number of skills each robot executed.
    pub assignments_by_robot: HashMap<String, usize>,
    /// Sum of the weights of every executed pairing.
    pub total_weight: f64,
}

impl PlanSummary {
    /// Computes indicators from a finished report.
    pub fn from_report(report: &PlanReport) -> Self {
        let rounds = report.rounds.len();
        let productive_rounds = report.rounds.iter().filter(|r| r.is_productive()).count();
        let skills_completed = report.rounds.iter().map(|r| r.completed.len()).sum();

        let mut assignments_by_robot: HashMap<String, usize> = HashMap::new();
        let mut total_weight = 0.0;
        let mut frontier_total = 0usize;
        for round in &report.rounds {
            frontier_total += round.frontier.len();
            for a in &round.assignments {
                *assignments_by_robot.entry(a.robot.clone()).or_insert(0) += 1;
                total_weight += a.weight;
            }
        }

        let mean_frontier_width = if rounds == 0 {
            0.0
        } else {
            frontier_total as f64 / rounds as f64
        };

        Self {
            rounds,
            productive_rounds,
            stalled_rounds: rounds - productive_rounds,
            skills_completed,
            mean_frontier_width,
            assignments_by_robot,
            total_weight,
        }
    }

    /// Fraction of robot-round slots that executed a skill.
    ///
    /// Returns 0.0 when `team_size` is zero or no rounds ran.
    pub fn robot_utilization(&self, team_size: usize) -> f64 {
        let slots = team_size * self.rounds;
        if slots == 0 {
            return 0.0;
        }
        let used: usize = self.assignments_by_robot.values().sum();
        used as f64 / slots as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Skill;
    use crate::planner::{PlanOutcome, RobotAssignment, RoundReport, StallReason};

    fn round(n: usize, frontier: &[&str], done: &[(&str, &str, f64)]) -> RoundReport {
        RoundReport {
            round: n,
            frontier: frontier.iter().map(|s| Skill::new(*s)).collect(),
            weights: None,
            compatible_pairs: done.len(),
            assignments: done
                .iter()
                .map(|&(robot, skill, weight)| RobotAssignment {
                    robot: robot.into(),
                    skill: skill.into(),
                    weight,
                })
                .collect(),
            completed: done.iter().map(|&(_, s, _)| Skill::new(s)).collect(),
            remaining: 0,
        }
    }

    #[test]
    fn test_summary_counts() {
        let report = PlanReport {
            outcome: PlanOutcome::Stalled {
                round: 3,
                pending: vec![Skill::new("c")],
                reason: StallReason::SolverFailure,
            },
            rounds: vec![
                round(1, &["a", "b"], &[("arm", "a", 2.0), ("mobile", "b", 1.0)]),
                round(2, &["c", "d"], &[("arm", "d", 0.5)]),
                round(3, &["c"], &[]),
            ],
            completed: vec!["a".into(), "b".into(), "d".into()],
            remaining: 1,
        };

        let s = PlanSummary::from_report(&report);
        assert_eq!(s.rounds, 3);
        assert_eq!(s.productive_rounds, 2);
        assert_eq!(s.stalled_rounds, 1);
        assert_eq!(s.skills_completed, 3);
        assert!((s.mean_frontier_width - 5.0 / 3.0).abs() < 1e-12);
        assert_eq!(s.assignments_by_robot["arm"], 2);
        assert_eq!(s.assignments_by_robot["mobile"], 1);
        assert!((s.total_weight - 3.5).abs() < 1e-12);
        assert!((s.robot_utilization(2) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_empty_report() {
        let report = PlanReport {
            outcome: PlanOutcome::Complete,
            rounds: vec![],
            completed: vec![],
            remaining: 0,
        };
        let s = PlanSummary::from_report(&report);
        assert_eq!(s.rounds, 0);
        assert_eq!(s.mean_frontier_width, 0.0);
        assert_eq!(s.robot_utilization(3), 0.0);
        assert!(s.assignments_by_robot.is_empty());
    }
}
