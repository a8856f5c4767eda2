//! End-to-end planning: instruction → skills → graph → rounds.

use log::info;

use super::{PlanDriver, PlanReport, PlannerConfig};
use crate::allocation::CostSource;
use crate::error::PlanError;
use crate::graph::PrecedenceGraph;
use crate::models::{Robot, Skill};
use crate::oracle::{generate_skill_list, DependencyOracle, SkillCatalog, SkillOracle};
use crate::validation::validate_robots;

/// Multi-robot planner over a pair of oracles.
///
/// # Example
///
/// ```
/// use u_skillplan::allocation::ConstantCost;
/// use u_skillplan::models::{Robot, Skill, SkillChoice};
/// use u_skillplan::oracle::{FixedDependencies, OracleError, SkillOracle};
/// use u_skillplan::planner::Planner;
///
/// /// Stacks the blue block, then the red block on it.
/// struct Stacker;
///
/// impl SkillOracle for Stacker {
///     fn choose_next(
///         &self,
///         _instruction: &str,
///         history: &[Skill],
///         _candidates: &[Skill],
///     ) -> Result<SkillChoice, OracleError> {
///         Ok(match history.len() {
///             0 => SkillChoice::Skill("pick_and_place(blue block, middle of the table)".into()),
///             1 => SkillChoice::Skill("pick_and_place(red block, blue block)".into()),
///             _ => SkillChoice::Done,
///         })
///     }
/// }
///
/// let planner = Planner::new(Stacker, FixedDependencies::new(vec![(1, 2)]));
/// let robots = vec![Robot::arm("Arm_Robot_1"), Robot::mobile("Mobile_Robot_1")];
/// let report = planner
///     .plan("stack red on blue", &robots, ConstantCost::new(1.0))
///     .unwrap();
/// assert!(report.outcome.is_complete());
/// assert_eq!(report.rounds.len(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct Planner<S, D> {
    skill_oracle: S,
    dependency_oracle: D,
    catalog: SkillCatalog,
    config: PlannerConfig,
}

impl<S: SkillOracle, D: DependencyOracle> Planner<S, D> {
    /// Creates a planner over the tabletop catalogue with default settings.
    pub fn new(skill_oracle: S, dependency_oracle: D) -> Self {
        Self {
            skill_oracle,
            dependency_oracle,
            catalog: SkillCatalog::tabletop(),
            config: PlannerConfig::default(),
        }
    }

    /// Sets the candidate skill catalogue.
    pub fn with_catalog(mut self, catalog: SkillCatalog) -> Self {
        self.catalog = catalog;
        self
    }

    /// Sets the planner configuration.
    pub fn with_config(mut self, config: PlannerConfig) -> Self {
        self.config = config;
        self
    }

    /// Candidate skills offered to the skill oracle.
    pub fn catalog(&self) -> &SkillCatalog {
        &self.catalog
    }

    /// Active configuration.
    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    /// Decomposes an instruction into an ordered skill list.
    pub fn decompose(&self, instruction: &str) -> Vec<Skill> {
        generate_skill_list(&self.skill_oracle, instruction, &self.catalog)
    }

    /// Builds the precedence graph for a skill list.
    pub fn build_graph(&self, skills: &[Skill]) -> Result<PrecedenceGraph, PlanError> {
        let builder = self.config.graph_builder();
        builder.build(skills, &self.dependency_oracle)
    }

    /// Plans an instruction end to end.
    ///
    /// # Errors
    /// - `PlanError::InvalidInput` for duplicate or unnamed robots.
    /// - `PlanError::NoAcyclicGraph` if the dependency oracle never
    ///   yields an acyclic graph.
    /// - `PlanError::Integrity` if the graph breaks during execution.
    pub fn plan<C: CostSource>(
        &self,
        instruction: &str,
        robots: &[Robot],
        cost: C,
    ) -> Result<PlanReport, PlanError> {
        validate_robots(robots).map_err(PlanError::InvalidInput)?;
        let skills = self.decompose(instruction);
        self.drive(&skills, robots, cost)
    }

    /// Plans a given skill list, skipping decomposition.
    pub fn plan_skills<C: CostSource>(
        &self,
        skills: &[Skill],
        robots: &[Robot],
        cost: C,
    ) -> Result<PlanReport, PlanError> {
        validate_robots(robots).map_err(PlanError::InvalidInput)?;
        self.drive(skills, robots, cost)
    }

    fn drive<C: CostSource>(
        &self,
        skills: &[Skill],
        robots: &[Robot],
        cost: C,
    ) -> Result<PlanReport, PlanError> {
        let graph = self.build_graph(skills)?;
        info!(
            "planning {} skill(s) with {} edge(s) over {} robot(s)",
            graph.node_count(),
            graph.edge_count(),
            robots.len()
        );
        PlanDriver::new(graph, robots.to_vec(), cost, self.config.clone()).run()
    }
}
