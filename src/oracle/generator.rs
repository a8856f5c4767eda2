//! Skill catalogue and iterative skill-list generation.

use log::{info, warn};
use serde::{Deserialize, Serialize};

use super::{OracleError, SkillOracle};
use crate::models::{Skill, SkillChoice, DONE};

/// The set of skills a decomposition may draw from.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillCatalog {
    skills: Vec<Skill>,
}

impl SkillCatalog {
    /// Creates a catalogue from explicit skills (order preserved).
    pub fn new(skills: Vec<Skill>) -> Self {
        Self { skills }
    }

    /// Tabletop pick-and-place domain.
    ///
    /// `pick_and_place(obj, loc)` for every object and every location
    /// other than the object itself, then `transport(table)` and `done`.
    pub fn tabletop() -> Self {
        const OBJECTS: [&str; 5] = [
            "red block",
            "blue block",
            "green block",
            "yellow block",
            "blue bowl",
        ];
        const LOCATIONS: [&str; 7] = [
            "middle of the table",
            "corner of the table",
            "red block",
            "blue block",
            "green block",
            "yellow block",
            "blue bowl",
        ];

        let mut skills: Vec<Skill> = OBJECTS
            .iter()
            .flat_map(|obj| {
                LOCATIONS
                    .iter()
                    .filter(move |loc| *loc != obj)
                    .map(move |loc| format!("pick_and_place({obj}, {loc})"))
                    .map(Skill::new)
            })
            .collect();
        skills.push(Skill::new("transport(table)"));
        skills.push(Skill::new(DONE));
        Self { skills }
    }

    /// Candidate skills in catalogue order.
    pub fn skills(&self) -> &[Skill] {
        &self.skills
    }

    /// Number of candidates.
    pub fn len(&self) -> usize {
        self.skills.len()
    }

    /// Whether the catalogue has no candidates.
    pub fn is_empty(&self) -> bool {
        self.skills.is_empty()
    }

    /// Whether a skill is in the catalogue.
    pub fn contains(&self, skill: &Skill) -> bool {
        self.skills.contains(skill)
    }
}

/// Decomposes an instruction into an ordered skill list.
///
/// Asks the oracle for one skill at a time, passing the skills chosen so
/// far and the candidates not yet chosen. Stops when the oracle answers
/// `Done`, fails, or picks something outside the remaining candidates.
/// Each chosen skill leaves the candidate set, so the loop runs at most
/// `catalog.len()` times.
pub fn generate_skill_list<O>(oracle: &O, instruction: &str, catalog: &SkillCatalog) -> Vec<Skill>
where
    O: SkillOracle + ?Sized,
{
    let mut chosen: Vec<Skill> = Vec::new();
    let mut remaining: Vec<Skill> = catalog.skills().to_vec();

    while !remaining.is_empty() {
        let skill = match oracle.choose_next(instruction, &chosen, &remaining) {
            Ok(SkillChoice::Done) => break,
            Ok(SkillChoice::Skill(skill)) if skill.is_done() => break,
            Ok(SkillChoice::Skill(skill)) => skill,
            Err(OracleError::Malformed(msg)) => {
                warn!("skill oracle returned an invalid choice: {msg}");
                break;
            }
            Err(e) => {
                warn!("skill oracle failed: {e}");
                break;
            }
        };

        match remaining.iter().position(|s| *s == skill) {
            Some(pos) => {
                remaining.remove(pos);
                chosen.push(skill);
            }
            None => {
                warn!("skill oracle chose '{skill}', which is not a remaining candidate");
                break;
            }
        }
    }

    info!("generated {} skills for '{instruction}'", chosen.len());
    chosen
}
