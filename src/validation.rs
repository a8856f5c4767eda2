//! Input validation for planning problems.
//!
//! Checks structural integrity of skills and robots before planning.
//! Detects:
//! - Empty skill identifiers
//! - Duplicate or empty robot names
//!
//! Duplicate skills are not errors: the precedence graph collapses them
//! onto their first occurrence. They are reported at `warn` level.

use crate::models::{Robot, Skill};
use std::collections::HashSet;

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A validation error.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// A skill identifier is empty or whitespace.
    EmptySkill,
    /// Two robots share the same name.
    DuplicateRobot,
    /// A robot has an empty name.
    EmptyRobotName,
}

impl ValidationError {
    pub(crate) fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Validates a skill list.
///
/// Positions in messages are 1-based, matching the oracle wire format.
pub fn validate_skills(skills: &[Skill]) -> ValidationResult {
    let mut errors = Vec::new();
    let mut seen = HashSet::new();

    for (i, skill) in skills.iter().enumerate() {
        if skill.is_empty() {
            errors.push(ValidationError::new(
                ValidationErrorKind::EmptySkill,
                format!("Skill {} has an empty identifier", i + 1),
            ));
        } else if !seen.insert(skill.as_str()) {
            let pos = i + 1;
            log::warn!("duplicate skill '{skill}' at position {pos}; keeping first");
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Validates a robot fleet.
pub fn validate_robots(robots: &[Robot]) -> ValidationResult {
    let mut errors = Vec::new();
    let mut names = HashSet::new();

    for robot in robots {
        if robot.name.trim().is_empty() {
            errors.push(ValidationError::new(
                ValidationErrorKind::EmptyRobotName,
                "Robot has an empty name",
            ));
        } else if !names.insert(robot.name.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateRobot,
                format!("Duplicate robot name: {}", robot.name),
            ));
        }
        if robot.capabilities.is_empty() {
            log::warn!("robot '{}' has no capabilities", robot.name);
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Validates skills and robots together, collecting every issue.
pub fn validate_input(skills: &[Skill], robots: &[Robot]) -> ValidationResult {
    let mut errors = Vec::new();
    if let Err(e) = validate_skills(skills) {
        errors.extend(e);
    }
    if let Err(e) = validate_robots(robots) {
        errors.extend(e);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_input() {
        let skills = vec![
            Skill::new("pick_and_place(a, b)"),
            Skill::new("transport(table)"),
        ];
        let robots = vec![Robot::arm("A1"), Robot::mobile("M1")];
        assert!(validate_input(&skills, &robots).is_ok());
    }

    #[test]
    fn test_duplicate_skill_is_not_an_error() {
        let skills = vec![Skill::new("a"), Skill::new("a")];
        assert!(validate_skills(&skills).is_ok());
    }

    #[test]
    fn test_empty_skill() {
        let skills = vec![Skill::new("a"), Skill::new(" ")];
        let errors = validate_skills(&skills).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].kind, ValidationErrorKind::EmptySkill);
        assert!(errors[0].message.contains("Skill 2"));
    }

    #[test]
    fn test_duplicate_robot() {
        let robots = vec![Robot::arm("A1"), Robot::mobile("A1")];
        let errors = validate_robots(&robots).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| e.kind == ValidationErrorKind::DuplicateRobot));
    }

    #[test]
    fn test_multiple_errors() {
        let skills = vec![Skill::new("")];
        let robots = vec![Robot::arm(""), Robot::arm("A"), Robot::arm("A")];
        let errors = validate_input(&skills, &robots).unwrap_err();
        assert_eq!(errors.len(), 3);
    }
}
