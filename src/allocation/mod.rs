//! Weighted robot–skill assignment.
//!
//! Each round, [`WeightBuilder`] scores every (robot, frontier skill)
//! pair and [`AssignmentSolver`] picks the injective pairing with the
//! largest total weight.
//!
//! # Usage
//!
//! ```
//! use u_skillplan::allocation::{AssignmentSolver, RandomCost, WeightBuilder};
//! use u_skillplan::models::{Robot, Skill};
//!
//! let robots = vec![Robot::arm("Arm_1"), Robot::mobile("Mobile_1")];
//! let frontier = vec![
//!     Skill::new("pick_and_place(red block, blue block)"),
//!     Skill::new("transport(table)"),
//! ];
//!
//! let mut weights = WeightBuilder::new(RandomCost::seeded(42));
//! let matrix = weights.build(&robots, &frontier);
//! let assignment = AssignmentSolver::new().solve(&matrix);
//! assert_eq!(assignment.skill_for_robot(0), Some(0));
//! assert_eq!(assignment.skill_for_robot(1), Some(1));
//! ```

mod hungarian;
mod solver;
mod weights;

pub use hungarian::HungarianBackend;
pub use solver::{AssignmentBackend, AssignmentSolver, SolverError, TieBreak, DEFAULT_TOLERANCE};
pub use weights::{
    ConstantCost, CostSource, CostTable, RandomCost, WeightBuilder, WeightMatrix, DEFAULT_EPSILON,
};
