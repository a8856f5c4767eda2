//! Prompt construction and response parsing for text-model oracles.
//!
//! Wire format for dependencies: one `N -> M` line per edge under a
//! `Dependencies:` heading, `N` and `M` 1-based skill positions.

use regex::Regex;
use std::sync::OnceLock;

use crate::models::Skill;

const DEPENDENCY_MARKER: &str = "Dependencies:";

fn edge_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(compile_edge_pattern)
}

fn compile_edge_pattern() -> Regex {
    Regex::new(r"(\d+)\s*->\s*(\d+)").expect("valid regex")
}

/// Numbers skills 1-based, one per line.
fn numbered(skills: &[Skill]) -> String {
    skills
        .iter()
        .enumerate()
        .map(|(i, s)| format!("{}. {}", i + 1, s))
        .collect::<Vec<_>>()
        .join("\n")
}

fn bullets(skills: &[Skill]) -> String {
    skills
        .iter()
        .map(|s| format!("- {s}"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Builds the prompt asking for precedence dependencies between skills.
pub fn dependency_prompt(skills: &[Skill]) -> String {
    format!(
        r#"You are a task planner for a multi-robot system. Your job is to identify precedence dependencies between a given list of skills. A dependency exists if one skill must be completed before another can begin.

**Skill List:**
{skills}

**Your Task:**
1.  **Reasoning:** First, explain your reasoning step-by-step. For each skill, consider if it depends on any other skill in the list. For example, a stacking task `pick_and_place(A, B)` depends on the placement of B.
2.  **Dependencies:** After your reasoning, provide the dependencies in a clear list format. Use the format "N -> M" to indicate that skill N must be completed before skill M. If there are no dependencies, state "None".

**Example Output:**

**Reasoning:**
- The skill 'pick_and_place(blue block, middle of the table)' has no dependencies.
- The skill 'pick_and_place(red block, blue block)' requires the 'blue block' to be in its final position. Therefore, skill 2 depends on skill 1.

**Dependencies:**
1 -> 2
"#,
        skills = numbered(skills)
    )
}

/// Builds the prompt asking for the single best next skill.
pub fn skill_choice_prompt(instruction: &str, history: &[Skill], candidates: &[Skill]) -> String {
    let history = if history.is_empty() {
        "No skills completed yet.".to_string()
    } else {
        bullets(history)
    };

    format!(
        r#"You are a task planner for a multi-robot system. Your job is to decompose a natural language instruction into the most efficient sequence of executable skills.

**Instruction:**
"{instruction}"

**Completed Skills:**
{history}

**Analysis:**
Based on the instruction, determine the final goal for each object. From the list of candidates below, choose the single most direct and logical next skill. Avoid any redundant or unnecessary intermediate steps. For example, to stack A on B, you only need to place B, then place A on B. Do not place A somewhere else first.

**Candidate Skills:**
{candidates}

**Your Choice:**
Return only the full text of the single best skill from the candidate list.
"#,
        candidates = bullets(candidates)
    )
}

/// Extracts `N -> M` pairs following the first `Dependencies:` marker.
///
/// Returns an empty list if the marker is absent. Numbers too large to
/// represent are skipped. Indices are returned as written (1-based, not
/// range-checked).
pub fn parse_dependency_response(text: &str) -> Vec<(usize, usize)> {
    let Some(pos) = text.find(DEPENDENCY_MARKER) else {
        return Vec::new();
    };
    let section = &text[pos + DEPENDENCY_MARKER.len()..];

    edge_pattern()
        .captures_iter(section)
        .filter_map(|c| {
            let pred = c.get(1)?.as_str().parse().ok()?;
            let succ = c.get(2)?.as_str().parse().ok()?;
            Some((pred, succ))
        })
        .collect()
}
