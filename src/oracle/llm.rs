//! Text-model adapters for the oracle contracts.
//!
//! A [`TextModel`] turns a prompt into a reply. The adapters here build
//! the prompts, enforce the configured timeout, and interpret replies.
//! Model selection and credentials live in an explicit [`OracleConfig`]
//! handed to the constructor; nothing is read from the environment.

use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

use super::prompt::{dependency_prompt, parse_dependency_response, skill_choice_prompt};
use super::{DependencyOracle, OracleError, SkillOracle};
use crate::models::{Skill, SkillChoice};

/// Oracle connection settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OracleConfig {
    /// Model identifier passed to the text model.
    pub model: String,
    /// API credential, if the model needs one.
    pub api_key: Option<String>,
    /// Maximum time a single completion may take (ms).
    pub timeout_ms: u64,
}

impl Default for OracleConfig {
    fn default() -> Self {
        Self {
            model: "gemini-1.5-flash-latest".to_string(),
            api_key: None,
            timeout_ms: 30_000,
        }
    }
}

impl OracleConfig {
    /// Sets the model identifier.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Sets the API credential.
    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Sets the completion timeout.
    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    /// The completion timeout.
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

/// A text-completion backend.
///
/// Implementations should abort a request once `config.timeout()` has
/// elapsed and report `OracleError::Timeout`. Replies arriving late are
/// rejected by the adapters regardless.
pub trait TextModel {
    /// Completes `prompt`.
    fn complete(&self, prompt: &str, config: &OracleConfig) -> Result<String, OracleError>;
}

impl<F> TextModel for F
where
    F: Fn(&str) -> Result<String, OracleError>,
{
    fn complete(&self, prompt: &str, _config: &OracleConfig) -> Result<String, OracleError> {
        self(prompt)
    }
}

fn timed_complete<M: TextModel + ?Sized>(
    model: &M,
    prompt: &str,
    config: &OracleConfig,
) -> Result<String, OracleError> {
    debug!("oracle prompt ({}):\n{prompt}", config.model);
    let started = Instant::now();
    let reply = model.complete(prompt, config)?;
    let elapsed = started.elapsed();
    if elapsed > config.timeout() {
        warn!("oracle reply arrived after {elapsed:?}, discarding");
        return Err(OracleError::Timeout(elapsed));
    }
    Ok(reply)
}

/// Dependency oracle backed by a text model.
#[derive(Debug, Clone)]
pub struct LlmDependencyOracle<M> {
    model: M,
    config: OracleConfig,
}

impl<M: TextModel> LlmDependencyOracle<M> {
    /// Creates the adapter.
    pub fn new(model: M, config: OracleConfig) -> Self {
        Self { model, config }
    }

    /// The connection settings.
    pub fn config(&self) -> &OracleConfig {
        &self.config
    }
}

impl<M: TextModel> DependencyOracle for LlmDependencyOracle<M> {
    fn propose_edges(&self, skills: &[Skill]) -> Result<Vec<(usize, usize)>, OracleError> {
        let reply = timed_complete(&self.model, &dependency_prompt(skills), &self.config)?;
        let edges = parse_dependency_response(&reply);
        debug!("parsed {} candidate edges", edges.len());
        Ok(edges)
    }
}

/// Skill oracle backed by a text model.
#[derive(Debug, Clone)]
pub struct LlmSkillOracle<M> {
    model: M,
    config: OracleConfig,
}

impl<M: TextModel> LlmSkillOracle<M> {
    /// Creates the adapter.
    pub fn new(model: M, config: OracleConfig) -> Self {
        Self { model, config }
    }

    /// The connection settings.
    pub fn config(&self) -> &OracleConfig {
        &self.config
    }
}

impl<M: TextModel> SkillOracle for LlmSkillOracle<M> {
    fn choose_next(
        &self,
        instruction: &str,
        history: &[Skill],
        candidates: &[Skill],
    ) -> Result<SkillChoice, OracleError> {
        let prompt = skill_choice_prompt(instruction, history, candidates);
        let reply = timed_complete(&self.model, &prompt, &self.config)?;
        let chosen = Skill::new(reply.trim());

        if chosen.is_done() {
            return Ok(SkillChoice::Done);
        }
        if candidates.contains(&chosen) {
            Ok(SkillChoice::Skill(chosen))
        } else {
            Err(OracleError::Malformed(format!(
                "'{chosen}' is not a candidate skill"
            )))
        }
    }
}
