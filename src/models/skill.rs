//! Skill model.
//!
//! A skill is an opaque, immutable identifier naming a parameterized
//! robot action, e.g. `pick_and_place(red block, blue block)`. The
//! planner never interprets the arguments; only the action prefix is
//! inspected to determine which capability a skill requires.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::Capability;

/// The identifier the skill oracle returns to end decomposition.
pub const DONE: &str = "done";

/// A parameterized robot action.
///
/// Skill identity is the full string: two skills are the same node in a
/// precedence graph exactly when their identifiers are equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Skill(String);

impl Skill {
    /// Creates a skill from its identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The full identifier.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the identifier is empty (invalid as a graph node).
    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }

    /// Action name: the identifier up to the first `(`, trimmed.
    ///
    /// `pick_and_place(red block, blue block)` → `pick_and_place`.
    pub fn action(&self) -> &str {
        match self.0.find('(') {
            Some(pos) => self.0[..pos].trim(),
            None => self.0.trim(),
        }
    }

    /// Whether this is the terminal `done` marker.
    pub fn is_done(&self) -> bool {
        self.0.trim() == DONE
    }

    /// Capability a robot needs to perform this skill, if any is known.
    pub fn required_capability(&self) -> Option<Capability> {
        Capability::required_for(self)
    }
}

impl fmt::Display for Skill {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Skill {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for Skill {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl AsRef<str> for Skill {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// A skill oracle's answer to "what comes next?".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SkillChoice {
    /// Append this skill to the plan.
    Skill(Skill),
    /// Decomposition is finished.
    Done,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_prefix() {
        let s = Skill::new("pick_and_place(red block, blue block)");
        assert_eq!(s.action(), "pick_and_place");

        let t = Skill::new("transport(table)");
        assert_eq!(t.action(), "transport");

        let bare = Skill::new("  wave ");
        assert_eq!(bare.action(), "wave");
    }

    #[test]
    fn test_done_marker() {
        assert!(Skill::new("done").is_done());
        assert!(Skill::new(" done\n").is_done());
        assert!(!Skill::new("done(it)").is_done());
    }

    #[test]
    fn test_empty_identifier() {
        assert!(Skill::new("").is_empty());
        assert!(Skill::new("   ").is_empty());
        assert!(!Skill::new("a").is_empty());
    }

    #[test]
    fn test_serde_transparent() {
        let s = Skill::new("transport(table)");
        let json = serde_json::to_string(&s).unwrap();
        assert_eq!(json, "\"transport(table)\"");
        let back: Skill = serde_json::from_str(&json).unwrap();
        assert_eq!(back, s);
    }
}
