//! # Action Module for Goal-Oriented Action Planning (GOAP)
//!
//! This module provides the action side of the planner:
//!
//! * [`DomainAction`]: the trait every catalog entry implements
//! * [`Action`]: a ready-made action with a static or state-dependent cost
//! * [`ActionSet`]: the index from world variable to the actions producing it
//!
//! ## Basic Usage
//!
//! ```
//! use regressive_goap::{Action, ActionSet, DomainAction, State};
//!
//! let chop_wood = Action::new("Chop Wood", 3.0)
//!     .unwrap()
//!     .with_precondition("hasAxe", true)
//!     .with_precondition("isNear", "Tree")
//!     .with_effect("hasWood", true);
//!
//! let state = State::empty().set("hasAxe", true).set("isNear", "Tree");
//! assert!(!chop_wood.has_unsatisfied_preconditions(&state));
//!
//! let set = ActionSet::new(vec![chop_wood.into_ref()]);
//! assert_eq!(set.lookup("hasWood").map(|c| c.len()), Some(1));
//! ```
//!
//! ## Custom Actions
//!
//! Domain types can implement [`DomainAction`] directly, for example when the
//! cost depends on the state the action starts from:
//!
//! ```
//! use regressive_goap::{DomainAction, State};
//!
//! #[derive(Debug)]
//! struct GoTo {
//!     name: String,
//!     preconditions: State,
//!     effects: State,
//! }
//!
//! impl DomainAction for GoTo {
//!     fn name(&self) -> &str {
//!         &self.name
//!     }
//!     fn preconditions(&self) -> &State {
//!         &self.preconditions
//!     }
//!     fn effects(&self) -> &State {
//!         &self.effects
//!     }
//!     fn cost(&self, state: &State) -> f32 {
//!         if state.get_or("isTired", false) { 6.0 } else { 3.0 }
//!     }
//! }
//! ```

use crate::value::Value;
use crate::{GoapError, Result, State};
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::Arc;

/// An action the planner may select.
///
/// Costs must be deterministic and non-negative. An action without effects
/// can never be selected by a regressive search.
pub trait DomainAction: fmt::Debug + Send + Sync {
    /// Name used for diagnostics. It need not be unique.
    fn name(&self) -> &str;

    /// Invalid actions are left out of an [`ActionSet`].
    fn is_valid(&self) -> bool {
        true
    }

    /// Pairs that must hold before the action runs.
    fn preconditions(&self) -> &State;

    /// Pairs the action sets when it succeeds.
    fn effects(&self) -> &State;

    /// Cost of running the action from `state`.
    fn cost(&self, state: &State) -> f32;

    /// Whether any precondition is not met by `state`.
    ///
    /// Absent keys count as holding their default, as in
    /// [`State::fulfills`].
    fn has_unsatisfied_preconditions(&self, state: &State) -> bool {
        !self
            .preconditions()
            .iter()
            .all(|(key, value)| state.fulfills(key, value))
    }
}

/// Shared handle to a catalog action.
pub type ActionRef = Arc<dyn DomainAction>;

/// State-dependent cost function for an [`Action`].
pub type CostFn = Arc<dyn Fn(&State) -> f32 + Send + Sync>;

/// Represents an action with named preconditions, effects and a cost.
///
/// # Examples
///
/// ```
/// use regressive_goap::{Action, DomainAction, State};
///
/// let buy_pie = Action::new("Buy Pie", 2.0)
///     .unwrap()
///     .with_precondition("isNear", "Shop")
///     .with_precondition("hasGold", true)
///     .with_effect("hasPie", true)
///     .with_effect("hasGold", false);
///
/// assert_eq!(buy_pie.name(), "Buy Pie");
/// assert_eq!(buy_pie.cost(&State::empty()), 2.0);
/// assert_eq!(buy_pie.effects.len(), 2);
///
/// // Negative costs are rejected
/// assert!(Action::new("invalid", -1.0).is_err());
/// ```
#[derive(Clone)]
pub struct Action {
    /// The name of the action
    pub name: String,
    /// The preconditions that must be met to perform this action
    pub preconditions: State,
    /// The effects this action has on the world state
    pub effects: State,
    /// Whether the action takes part in planning
    pub valid: bool,
    cost: f32,
    cost_fn: Option<CostFn>,
}

impl Action {
    /// Creates a new action with the specified name and static cost.
    ///
    /// # Errors
    ///
    /// Returns `GoapError::InvalidActionCost` if the cost is negative or not finite.
    pub fn new(name: impl Into<String>, cost: f32) -> Result<Self> {
        if !cost.is_finite() || cost < 0.0 {
            return Err(GoapError::InvalidActionCost(cost));
        }

        Ok(Self {
            name: name.into(),
            preconditions: State::empty(),
            effects: State::empty(),
            valid: true,
            cost,
            cost_fn: None,
        })
    }

    pub fn with_precondition(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.preconditions = self.preconditions.set(key, value);
        self
    }

    pub fn with_effect(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.effects = self.effects.set(key, value);
        self
    }

    /// Replaces the static cost with a function of the pre-action state.
    pub fn with_cost_fn<F>(mut self, cost_fn: F) -> Self
    where
        F: Fn(&State) -> f32 + Send + Sync + 'static,
    {
        self.cost_fn = Some(Arc::new(cost_fn));
        self
    }

    pub fn with_valid(mut self, valid: bool) -> Self {
        self.valid = valid;
        self
    }

    /// Wraps this action into a shared catalog handle.
    pub fn into_ref(self) -> ActionRef {
        Arc::new(self)
    }
}

impl DomainAction for Action {
    fn name(&self) -> &str {
        &self.name
    }

    fn is_valid(&self) -> bool {
        self.valid
    }

    fn preconditions(&self) -> &State {
        &self.preconditions
    }

    fn effects(&self) -> &State {
        &self.effects
    }

    fn cost(&self, state: &State) -> f32 {
        match &self.cost_fn {
            Some(cost_fn) => cost_fn(state),
            None => self.cost,
        }
    }
}

impl fmt::Debug for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Action")
            .field("name", &self.name)
            .field("cost", &self.cost)
            .field("dynamic_cost", &self.cost_fn.is_some())
            .field("valid", &self.valid)
            .field("preconditions", &self.preconditions)
            .field("effects", &self.effects)
            .finish()
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Action: {}", self.name)
    }
}

/// Position of an action inside one [`ActionSet`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ActionId(usize);

impl ActionId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// An action able to produce `value` for the looked-up variable.
#[derive(Debug, Clone)]
pub struct Candidate {
    pub id: ActionId,
    pub value: Value,
}

/// Index of valid actions by the world variables their effects touch.
///
/// Built once per catalog and read-only afterwards.
#[derive(Debug, Clone, Default)]
pub struct ActionSet {
    actions: Vec<ActionRef>,
    lookup: HashMap<String, Vec<Candidate>>,
}

impl ActionSet {
    /// Filters `catalog` to valid actions and indexes their effects.
    ///
    /// Actions are told apart by their [`ActionId`], so several actions may
    /// share a name.
    pub fn new<I>(catalog: I) -> Self
    where
        I: IntoIterator<Item = ActionRef>,
    {
        let mut actions: Vec<ActionRef> = Vec::new();
        let mut lookup: HashMap<String, Vec<Candidate>> = HashMap::new();
        let mut names = HashSet::new();

        for action in catalog {
            if !action.is_valid() {
                log::debug!("Skipping invalid action {}", action.name());
                continue;
            }
            if !names.insert(action.name().to_string()) {
                log::warn!("Several actions are named {:?}", action.name());
            }
            if action.effects().is_empty() {
                log::warn!("Action {} has no effects and cannot be selected", action.name());
            }

            let id = ActionId(actions.len());
            for (key, value) in action.effects().iter() {
                lookup.entry(key.to_string()).or_default().push(Candidate {
                    id,
                    value: value.clone(),
                });
            }
            actions.push(action);
        }

        Self { actions, lookup }
    }

    /// Actions whose effects touch `variable`, in catalog order.
    pub fn lookup(&self, variable: &str) -> Option<&[Candidate]> {
        self.lookup.get(variable).map(Vec::as_slice)
    }

    pub fn action(&self, id: ActionId) -> Option<&ActionRef> {
        self.actions.get(id.0)
    }

    /// The valid actions, in catalog order.
    pub fn actions(&self) -> &[ActionRef] {
        &self.actions
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }
}
