//! Planning domain models.
//!
//! Provides the core data types for representing a multi-robot planning
//! problem and each round's solution.
//!
//! # Domain Mappings
//!
//! | u-skillplan | Tabletop | Warehouse | Kitchen |
//! |-------------|----------|-----------|---------|
//! | Skill | pick_and_place(A, B) | transport(shelf) | pour(cup) |
//! | Robot | Arm | AGV | Mobile manipulator |
//! | Capability | Manipulation | Transport | Manipulation |
//! | Assignment | Arm → stack block | AGV → move pallet | Arm → pour |

mod assignment;
mod robot;
mod skill;

pub use assignment::{Assignment, AssignmentPair};
pub use robot::{Capability, Robot, RobotKind};
pub use skill::{Skill, SkillChoice, DONE};
