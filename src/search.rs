use crate::frontier::PriorityQueue;
use crate::graph::{SearchTree, TreeEdge};
use crate::node::{NodeArena, NodeId, PlanNode};
use crate::{ActionRef, State};
use std::collections::HashSet;

/// What a finished search leaves behind.
pub(crate) struct SearchOutcome {
    arena: NodeArena,
    winner: Option<NodeId>,
    edges: Option<Vec<TreeEdge>>,
}

impl SearchOutcome {
    /// Actions from the winning node up to the root, nearest first.
    pub(crate) fn actions(&self) -> Option<Vec<ActionRef>> {
        self.winner.map(|id| self.arena.path_actions(id))
    }

    pub(crate) fn into_tree(self) -> Option<SearchTree> {
        let SearchOutcome { arena, edges, .. } = self;
        edges.map(|edges| SearchTree::new(arena.into_nodes(), edges))
    }
}

/// Best-first search over plan nodes.
///
/// The planner strategy supplies the target test and the expansion; this type
/// owns the arena, the frontier, the visited set and the optional recorder.
pub(crate) struct SearchContext {
    arena: NodeArena,
    frontier: PriorityQueue<NodeId>,
    visited: HashSet<State>,
    edges: Option<Vec<TreeEdge>>,
    early_exit: bool,
}

impl SearchContext {
    pub(crate) fn new(early_exit: bool, record_tree: bool) -> Self {
        Self {
            arena: NodeArena::default(),
            frontier: PriorityQueue::new(),
            visited: HashSet::new(),
            edges: record_tree.then(Vec::new),
            early_exit,
        }
    }

    pub(crate) fn run<T, E>(mut self, root: PlanNode, is_target: T, mut expand: E) -> SearchOutcome
    where
        T: Fn(&State) -> bool,
        E: FnMut(NodeId, &PlanNode) -> Vec<PlanNode>,
    {
        let root_id = self.arena.push(root);
        self.frontier.enqueue(0.0, root_id);

        while let Some(current_id) = self.frontier.pop() {
            let current = self.arena.get(current_id);
            if self.visited.contains(current.state()) {
                continue;
            }

            if is_target(current.state()) {
                log::debug!(
                    "Plan found at level {} after {} nodes",
                    current.level(),
                    self.arena.len()
                );
                return self.finish(Some(current_id));
            }

            self.visited.insert(current.state().clone());
            let children = expand(current_id, current);
            log::trace!("Expanded {} into {} children", current, children.len());

            for child in children {
                let priority = child.total_cost();
                let reached = self.early_exit && is_target(child.state());
                let action = child.action().cloned();
                let child_id = self.arena.push(child);
                self.frontier.enqueue(priority, child_id);

                if let (Some(edges), Some(action)) = (self.edges.as_mut(), action) {
                    edges.push(TreeEdge {
                        source: current_id,
                        target: child_id,
                        action,
                    });
                }

                if reached {
                    log::debug!("Early exit after {} nodes", self.arena.len());
                    return self.finish(Some(child_id));
                }
            }
        }

        log::debug!(
            "Search exhausted after {} nodes without reaching the target",
            self.arena.len()
        );
        self.finish(None)
    }

    fn finish(self, winner: Option<NodeId>) -> SearchOutcome {
        SearchOutcome {
            arena: self.arena,
            winner,
            edges: self.edges,
        }
    }
}
