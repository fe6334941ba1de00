//! Regressive (goal to start) planning strategy.
//!
//! The search starts from the goal and works backwards. A search state holds
//! the sub-goals still owed; an action discharges some of them and adds its
//! preconditions as new sub-goals. The search ends once the start state
//! already provides everything still owed.

use crate::action::ActionId;
use crate::node::{NodeId, PlanNode};
use crate::planner::{Planner, PlanningResult};
use crate::search::SearchContext;
use crate::{ActionSet, State};
use std::collections::HashSet;

/// Backward-chaining best-first planner.
///
/// With `early_exit` the first generated node that the start state satisfies
/// wins, which is faster but may return a plan that is not the cheapest.
/// Without it, a node only wins once it is dequeued as the lowest-priority
/// entry of the frontier.
#[derive(Debug, Clone)]
pub struct RegressivePlanner {
    early_exit: bool,
    create_debug_graph: bool,
}

impl RegressivePlanner {
    pub fn new(early_exit: bool, create_debug_graph: bool) -> Self {
        Self {
            early_exit,
            create_debug_graph,
        }
    }

    pub fn early_exit(&self) -> bool {
        self.early_exit
    }

    pub fn creates_debug_graph(&self) -> bool {
        self.create_debug_graph
    }
}

impl Default for RegressivePlanner {
    fn default() -> Self {
        Self::new(true, false)
    }
}

impl Planner for RegressivePlanner {
    fn plan(&self, start: &State, goal: &State, actions: &ActionSet) -> PlanningResult {
        log::debug!(
            "Regressive planning from {} towards {} with {} actions",
            start,
            goal,
            actions.len()
        );

        let outcome = SearchContext::new(self.early_exit, self.create_debug_graph).run(
            PlanNode::root(goal.clone()),
            |state| start.is_superstate_of(state),
            |id, node| expand(id, node, actions, start),
        );

        // The winning node is the one nearest the start, so walking up to the
        // root already yields execution order.
        let plan = outcome.actions();
        match &plan {
            Some(plan) => log::debug!("Found plan with {} actions", plan.len()),
            None => log::debug!("No plan reaches {}", goal),
        }

        PlanningResult::new(plan, outcome.into_tree())
    }
}

/// Children of `node`: one per action that can discharge one of its sub-goals.
fn expand(id: NodeId, node: &PlanNode, actions: &ActionSet, start: &State) -> Vec<PlanNode> {
    let owed = node.state();
    let mut expanded: HashSet<ActionId> = HashSet::new();
    let mut children = Vec::new();

    for (variable, target) in owed.iter() {
        let Some(candidates) = actions.lookup(variable) else {
            continue;
        };

        // Numeric effects only match exact targets
        for candidate in candidates {
            if expanded.contains(&candidate.id) || candidate.value != *target {
                continue;
            }
            let Some(action) = actions.action(candidate.id) else {
                continue;
            };

            let Some(remaining) = unify_effects(action.effects(), owed) else {
                continue;
            };
            if preconditions_conflict(action.preconditions(), &remaining) {
                continue;
            }
            let next = remaining.apply(action.preconditions());

            expanded.insert(candidate.id);
            let estimate = next.distance_to(start, true);
            children.push(PlanNode::child(id, node, next, action.clone(), estimate));
        }
    }

    children
}

/// Removes the sub-goals `effects` discharge from `owed`.
///
/// Returns `None` when an effect sets a pinned sub-goal to another value.
fn unify_effects(effects: &State, owed: &State) -> Option<State> {
    let mut remaining = owed.clone();
    for (key, value) in effects.iter() {
        match owed.value(key) {
            Some(required) if required != value => return None,
            Some(_) => remaining = remaining.remove(key),
            None => {}
        }
    }
    Some(remaining)
}

/// Whether a precondition targets a different value than a pending sub-goal.
fn preconditions_conflict(preconditions: &State, owed: &State) -> bool {
    preconditions
        .iter()
        .any(|(key, value)| owed.value(key).is_some_and(|pending| pending != value))
}
