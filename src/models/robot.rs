//! Robot model.
//!
//! Robots are the agents that execute skills. Each robot has a kind
//! and a set of capabilities; a robot may perform a skill only when it
//! holds the capability the skill's action requires. Robots are static
//! for the duration of a planning run.

use serde::{Deserialize, Serialize};

use super::Skill;

/// A robot that can be assigned skills.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Robot {
    /// Unique robot name.
    pub name: String,
    /// Robot classification.
    pub kind: RobotKind,
    /// Capabilities this robot holds.
    pub capabilities: Vec<Capability>,
}

/// Robot classification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RobotKind {
    /// Fixed manipulator arm.
    Arm,
    /// Mobile base.
    Mobile,
    /// Domain-specific kind.
    Custom(String),
}

/// A class of skill a robot can perform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Capability {
    /// Grasping and placing objects (`pick_and_place`).
    Manipulation,
    /// Moving between locations (`transport`).
    Transport,
}

impl Capability {
    /// Action name of the skills requiring this capability.
    pub fn pattern(self) -> &'static str {
        match self {
            Capability::Manipulation => "pick_and_place",
            Capability::Transport => "transport",
        }
    }

    /// Capability required by a skill, recognized from its action name.
    ///
    /// Returns `None` for skills no known capability covers; such skills
    /// can never be assigned.
    pub fn required_for(skill: &Skill) -> Option<Capability> {
        let action = skill.action();
        [Capability::Manipulation, Capability::Transport]
            .into_iter()
            .find(|c| c.pattern() == action)
    }
}

impl Robot {
    /// Creates a robot with no capabilities.
    pub fn new(name: impl Into<String>, kind: RobotKind) -> Self {
        Self {
            name: name.into(),
            kind,
            capabilities: Vec::new(),
        }
    }

    /// Creates an arm robot (manipulation capability).
    pub fn arm(name: impl Into<String>) -> Self {
        Self::new(name, RobotKind::Arm).with_capability(Capability::Manipulation)
    }

    /// Creates a mobile robot (transport capability).
    pub fn mobile(name: impl Into<String>) -> Self {
        Self::new(name, RobotKind::Mobile).with_capability(Capability::Transport)
    }

    /// Adds a capability (idempotent).
    pub fn with_capability(mut self, capability: Capability) -> Self {
        if !self.capabilities.contains(&capability) {
            self.capabilities.push(capability);
        }
        self
    }

    /// Whether this robot holds a capability.
    pub fn has_capability(&self, capability: Capability) -> bool {
        self.capabilities.contains(&capability)
    }

    /// Whether this robot can perform a skill.
    pub fn can_perform(&self, skill: &Skill) -> bool {
        match Capability::required_for(skill) {
            Some(required) => self.has_capability(required),
            None => false,
        }
    }
}
