use crate::{ActionRef, State};
use std::fmt;

/// Index of a [`PlanNode`] in the arena of one search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// A node of the search tree.
///
/// In a regressive search the state holds the sub-goals still owed, and the
/// action is the one that discharges the parent's sub-goals.
#[derive(Clone)]
pub struct PlanNode {
    state: State,
    action: Option<ActionRef>,
    parent: Option<NodeId>,
    level: usize,
    running_cost: f32,
    estimate: f32,
}

impl PlanNode {
    /// Root node: no parent, no action, zero cost.
    pub fn root(state: State) -> Self {
        Self {
            state,
            action: None,
            parent: None,
            level: 0,
            running_cost: 0.0,
            estimate: 0.0,
        }
    }

    /// Child of `parent` reached through `action`.
    ///
    /// The step cost is evaluated against the parent's state.
    pub fn child(
        parent_id: NodeId,
        parent: &PlanNode,
        state: State,
        action: ActionRef,
        estimate: f32,
    ) -> Self {
        let running_cost = parent.running_cost + action.cost(&parent.state);
        Self {
            state,
            action: Some(action),
            parent: Some(parent_id),
            level: parent.level + 1,
            running_cost,
            estimate,
        }
    }

    pub fn state(&self) -> &State {
        &self.state
    }

    pub fn action(&self) -> Option<&ActionRef> {
        self.action.as_ref()
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn level(&self) -> usize {
        self.level
    }

    pub fn running_cost(&self) -> f32 {
        self.running_cost
    }

    pub fn estimate(&self) -> f32 {
        self.estimate
    }

    /// Priority of the node: running cost plus estimate.
    pub fn total_cost(&self) -> f32 {
        self.running_cost + self.estimate
    }
}

impl fmt::Debug for PlanNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PlanNode")
            .field("action", &self.action.as_ref().map(|a| a.name().to_string()))
            .field("state", &self.state)
            .field("parent", &self.parent)
            .field("level", &self.level)
            .field("running_cost", &self.running_cost)
            .field("estimate", &self.estimate)
            .finish()
    }
}

impl fmt::Display for PlanNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let action = self.action.as_ref().map(|a| a.name()).unwrap_or("<none>");
        write!(
            f,
            "SelectedAction: {}, RunningCost: {}, Level: {}",
            action, self.running_cost, self.level
        )
    }
}

/// Owner of every node created during one search.
#[derive(Debug, Default)]
pub(crate) struct NodeArena {
    nodes: Vec<PlanNode>,
}

impl NodeArena {
    pub(crate) fn push(&mut self, node: PlanNode) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(node);
        id
    }

    /// Ids only come from `push` on this arena.
    pub(crate) fn get(&self, id: NodeId) -> &PlanNode {
        &self.nodes[id.0]
    }

    /// Actions from `id` up to the root, nearest first.
    pub(crate) fn path_actions(&self, id: NodeId) -> Vec<ActionRef> {
        let mut actions = Vec::new();
        let mut current = Some(id);
        while let Some(node_id) = current {
            let node = self.get(node_id);
            if let Some(action) = node.action() {
                actions.push(action.clone());
            }
            current = node.parent();
        }
        actions
    }

    pub(crate) fn len(&self) -> usize {
        self.nodes.len()
    }

    pub(crate) fn into_nodes(self) -> Vec<PlanNode> {
        self.nodes
    }
}
