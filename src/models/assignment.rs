//! Assignment (one round's solution) model.
//!
//! An assignment is a partial injective mapping from robots to the
//! skills of one round's frontier. Pairs are expressed as indices into
//! the robot list and the frontier list the weight matrix was built from.

use serde::{Deserialize, Serialize};

/// A robot–skill pairing selected for one round.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AssignmentPair {
    /// Row index (robot).
    pub robot: usize,
    /// Column index (frontier skill).
    pub skill: usize,
    /// Weight of the pair in the round's matrix.
    pub weight: f64,
}

/// A round's assignment.
///
/// Pairs are kept sorted by robot index. Each robot and each skill
/// appears at most once.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Assignment {
    pairs: Vec<AssignmentPair>,
}

impl Assignment {
    /// Creates an empty assignment.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds an assignment from pairs, sorted by robot index.
    ///
    /// Returns `None` if a robot or skill appears twice.
    pub fn from_pairs(mut pairs: Vec<AssignmentPair>) -> Option<Self> {
        pairs.sort_by_key(|p| (p.robot, p.skill));
        let assignment = Self { pairs };
        assignment.is_injective().then_some(assignment)
    }

    /// Selected pairs, ordered by robot index.
    pub fn pairs(&self) -> &[AssignmentPair] {
        &self.pairs
    }

    /// Number of selected pairs.
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    /// Whether nothing was assigned.
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Skill index assigned to a robot.
    pub fn skill_for_robot(&self, robot: usize) -> Option<usize> {
        self.pairs
            .iter()
            .find(|p| p.robot == robot)
            .map(|p| p.skill)
    }

    /// Robot index assigned to a skill.
    pub fn robot_for_skill(&self, skill: usize) -> Option<usize> {
        self.pairs
            .iter()
            .find(|p| p.skill == skill)
            .map(|p| p.robot)
    }

    /// Sum of selected pair weights.
    pub fn total_weight(&self) -> f64 {
        self.pairs.iter().map(|p| p.weight).sum()
    }

    /// Skill indices in robot order.
    pub fn skill_indices(&self) -> Vec<usize> {
        self.pairs.iter().map(|p| p.skill).collect()
    }

    /// Whether each robot and each skill appears at most once.
    pub fn is_injective(&self) -> bool {
        let mut robots: Vec<usize> = self.pairs.iter().map(|p| p.robot).collect();
        let mut skills: Vec<usize> = self.pairs.iter().map(|p| p.skill).collect();
        robots.sort_unstable();
        skills.sort_unstable();
        robots.windows(2).all(|w| w[0] != w[1]) && skills.windows(2).all(|w| w[0] != w[1])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pair(robot: usize, skill: usize, weight: f64) -> AssignmentPair {
        AssignmentPair {
            robot,
            skill,
            weight,
        }
    }

    #[test]
    fn test_from_pairs_sorts_by_robot() {
        let a = Assignment::from_pairs(vec![pair(2, 0, 1.0), pair(0, 1, 2.0)]).unwrap();
        assert_eq!(a.pairs()[0].robot, 0);
        assert_eq!(a.pairs()[1].robot, 2);
        assert_eq!(a.skill_for_robot(2), Some(0));
        assert_eq!(a.robot_for_skill(1), Some(0));
        assert_eq!(a.skill_for_robot(1), None);
        assert!((a.total_weight() - 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_rejects_double_booking() {
        let same_robot = vec![pair(0, 0, 1.0), pair(0, 1, 1.0)];
        assert!(Assignment::from_pairs(same_robot).is_none());
        let same_skill = vec![pair(0, 1, 1.0), pair(1, 1, 1.0)];
        assert!(Assignment::from_pairs(same_skill).is_none());
    }

    #[test]
    fn test_empty() {
        let a = Assignment::new();
        assert!(a.is_empty());
        assert_eq!(a.len(), 0);
        assert_eq!(a.total_weight(), 0.0);
        assert!(a.is_injective());
    }
}
