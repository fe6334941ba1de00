use crate::node::{NodeId, PlanNode};
use crate::{ActionRef, Result, State};
use std::io::Write;

/// A transition recorded during the search: `source` expanded into `target`
/// through `action`.
#[derive(Debug, Clone)]
pub struct TreeEdge {
    pub source: NodeId,
    pub target: NodeId,
    pub action: ActionRef,
}

/// Diagnostic record of every node and transition explored by a search.
///
/// Only built when the planner was configured with `create_debug_graph`.
/// It plays no part in finding the plan.
#[derive(Debug, Default)]
pub struct SearchTree {
    nodes: Vec<PlanNode>,
    edges: Vec<TreeEdge>,
}

impl SearchTree {
    pub(crate) fn new(nodes: Vec<PlanNode>, edges: Vec<TreeEdge>) -> Self {
        Self { nodes, edges }
    }

    pub fn nodes(&self) -> &[PlanNode] {
        &self.nodes
    }

    pub fn node(&self, id: NodeId) -> Option<&PlanNode> {
        self.nodes.get(id.index())
    }

    pub fn edges(&self) -> &[TreeEdge] {
        &self.edges
    }

    /// The node the search started from.
    pub fn root(&self) -> Option<&PlanNode> {
        self.nodes.first()
    }

    /// Edges leaving `id`, in the order they were recorded.
    pub fn outgoing(&self, id: NodeId) -> impl Iterator<Item = &TreeEdge> + '_ {
        self.edges.iter().filter(move |edge| edge.source == id)
    }

    /// Writes the tree as a Graphviz DOT digraph.
    pub fn write_dot<W: Write>(&self, out: &mut W) -> Result<()> {
        writeln!(out, "digraph SearchTree {{")?;
        writeln!(out, "    rankdir=LR;")?;
        writeln!(
            out,
            "    node [shape=box, style=filled, fillcolor=lightblue];"
        )?;
        writeln!(out, "    edge [fontsize=10];")?;

        for (i, node) in self.nodes.iter().enumerate() {
            let fill = if i == 0 { ", fillcolor=lightpink" } else { "" };
            writeln!(
                out,
                "    n{} [label=\"Level: {}\\nCost: {} + {}\\n{}\"{}];",
                i,
                node.level(),
                node.running_cost(),
                node.estimate(),
                Self::state_to_string(node.state()),
                fill
            )?;
        }

        for edge in &self.edges {
            writeln!(
                out,
                "    n{} -> n{} [label=\"{}\"];",
                edge.source.index(),
                edge.target.index(),
                Self::escape(edge.action.name())
            )?;
        }

        writeln!(out, "}}")?;
        Ok(())
    }

    /// DOT rendering as a string.
    pub fn to_dot(&self) -> Result<String> {
        let mut buffer = Vec::new();
        self.write_dot(&mut buffer)?;
        Ok(String::from_utf8_lossy(&buffer).into_owned())
    }

    fn state_to_string(state: &State) -> String {
        state
            .iter()
            .map(|(key, value)| Self::escape(&format!("{}: {}", key, value)))
            .collect::<Vec<_>>()
            .join("\\n")
    }

    fn escape(text: &str) -> String {
        text.replace('\\', "\\\\").replace('"', "\\\"")
    }
}
