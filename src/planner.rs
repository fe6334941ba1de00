//! # Planner Module for Goal-Oriented Action Planning (GOAP)
//!
//! The planner is the central component of the engine, responsible for:
//! - Finding a sequence of actions that turns a start state into one meeting a goal
//! - Exposing the configured search strategy behind the [`Planner`] trait
//! - Reporting the optional search tree for diagnostics
//!
//! ## Overview
//!
//! 1. Define the actions your agent can perform
//! 2. Build an [`ActionSet`] from them (or let [`Planner::plan_catalog`] do it)
//! 3. Create a planner from [`PlannerSettings`] with [`create_planner`]
//! 4. Ask for a plan from the current world state to the goal state
//!
//! A search that finds nothing is a normal outcome: check
//! [`PlanningResult::is_success`] before using the plan.
//!
//! ## Basic Usage
//!
//! ```
//! use regressive_goap::{create_planner, Action, Planner, PlannerSettings, State};
//!
//! let chop_tree = Action::new("chop_tree", 2.0)
//!     .unwrap()
//!     .with_precondition("has_axe", true)
//!     .with_effect("has_wood", true);
//!
//! let craft_axe = Action::new("craft_axe", 1.0)
//!     .unwrap()
//!     .with_precondition("has_metal", true)
//!     .with_effect("has_axe", true);
//!
//! let planner = create_planner(&PlannerSettings::default());
//!
//! let current = State::empty().set("has_metal", true);
//! let goal = State::empty().set("has_wood", true);
//!
//! let result = planner
//!     .plan_catalog(&current, &goal, vec![chop_tree.into_ref(), craft_axe.into_ref()]);
//!
//! assert!(result.is_success());
//! assert_eq!(result.names().unwrap(), ["craft_axe", "chop_tree"]);
//! ```

use crate::graph::SearchTree;
use crate::regressive::RegressivePlanner;
use crate::{ActionRef, ActionSet, GoapError, Result, State};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A search strategy turning a start and a goal into a plan.
///
/// A planner holds no state between calls, so one instance may serve several
/// threads at once.
pub trait Planner: Send + Sync {
    /// Plans with an already built action index.
    fn plan(&self, start: &State, goal: &State, actions: &ActionSet) -> PlanningResult;

    /// Builds an [`ActionSet`] from `catalog` and plans with it.
    fn plan_catalog<I>(&self, start: &State, goal: &State, catalog: I) -> PlanningResult
    where
        I: IntoIterator<Item = ActionRef>,
        Self: Sized,
    {
        let actions = ActionSet::new(catalog);
        self.plan(start, goal, &actions)
    }
}

impl Planner for Box<dyn Planner> {
    fn plan(&self, start: &State, goal: &State, actions: &ActionSet) -> PlanningResult {
        (**self).plan(start, goal, actions)
    }
}

/// Outcome of one planning call.
#[derive(Debug, Default)]
pub struct PlanningResult {
    plan: Option<Vec<ActionRef>>,
    search_tree: Option<SearchTree>,
}

impl PlanningResult {
    pub(crate) fn new(plan: Option<Vec<ActionRef>>, search_tree: Option<SearchTree>) -> Self {
        Self { plan, search_tree }
    }

    /// Whether a plan was found. An empty plan means the goal already holds.
    pub fn is_success(&self) -> bool {
        self.plan.is_some()
    }

    /// The actions in execution order, if a plan was found.
    pub fn plan(&self) -> Option<&[ActionRef]> {
        self.plan.as_deref()
    }

    pub fn into_plan(self) -> Option<Vec<ActionRef>> {
        self.plan
    }

    /// Names of the planned actions, in execution order.
    pub fn names(&self) -> Option<Vec<&str>> {
        self.plan
            .as_ref()
            .map(|plan| plan.iter().map(|action| action.name()).collect())
    }

    /// Only present when the planner was asked to create a debug graph.
    pub fn search_tree(&self) -> Option<&SearchTree> {
        self.search_tree.as_ref()
    }

    /// Cost of running the plan forward from `start`.
    pub fn total_cost(&self, start: &State) -> Option<f32> {
        let plan = self.plan.as_ref()?;
        let mut state = start.clone();
        let mut cost = 0.0;
        for action in plan {
            cost += action.cost(&state);
            state = state.apply(action.effects());
        }
        Some(cost)
    }
}

/// Available search strategies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum PlannerType {
    #[default]
    Regressive,
}

impl FromStr for PlannerType {
    type Err = GoapError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "regressive" => Ok(PlannerType::Regressive),
            _ => Err(GoapError::UnknownPlannerType(s.to_string())),
        }
    }
}

impl TryFrom<String> for PlannerType {
    type Error = GoapError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<PlannerType> for String {
    fn from(value: PlannerType) -> Self {
        value.to_string()
    }
}

impl fmt::Display for PlannerType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlannerType::Regressive => write!(f, "regressive"),
        }
    }
}

/// Configuration for [`create_planner`].
///
/// Deserializes from camelCase keys with defaults for anything missing:
///
/// ```
/// use regressive_goap::{PlannerSettings, PlannerType};
///
/// let settings: PlannerSettings =
///     serde_json::from_str(r#"{"plannerType": "regressive", "earlyExit": false}"#).unwrap();
/// assert_eq!(settings.planner_type, PlannerType::Regressive);
/// assert!(!settings.early_exit);
/// assert!(!settings.create_debug_graph);
///
/// let unknown = serde_json::from_str::<PlannerSettings>(r#"{"plannerType": "forward"}"#);
/// assert!(unknown.is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PlannerSettings {
    pub planner_type: PlannerType,
    /// Return the first generated node that meets the start state instead
    /// of waiting for it to be dequeued. Plans may not be the cheapest.
    pub early_exit: bool,
    /// Record every explored node and edge into a [`SearchTree`].
    pub create_debug_graph: bool,
}

impl Default for PlannerSettings {
    fn default() -> Self {
        Self {
            planner_type: PlannerType::Regressive,
            early_exit: true,
            create_debug_graph: false,
        }
    }
}

/// Creates the planner selected by `settings`.
pub fn create_planner(settings: &PlannerSettings) -> Box<dyn Planner> {
    log::debug!("Creating {} planner", settings.planner_type);
    match settings.planner_type {
        PlannerType::Regressive => Box::new(RegressivePlanner::new(
            settings.early_exit,
            settings.create_debug_graph,
        )),
    }
}
