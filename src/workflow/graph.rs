//! Directed graph view of a workflow.
//!
//! Wraps the snapshot's node and connection lists in a petgraph `DiGraph` so
//! the planner can order, group, and walk the dependency structure. The graph
//! is built once per workflow and never mutated afterwards; runtime state
//! lives in the execution status records, not here.

use std::collections::HashMap;

use petgraph::{
    Direction,
    algo::toposort,
    graph::{DiGraph, NodeIndex},
};

use crate::{
    MarketflowError, Result,
    model::{ConnectionModel, NodeModel},
};

/// Immutable dependency graph over one workflow's nodes.
#[derive(Debug)]
pub struct WorkflowGraph {
    graph: DiGraph<NodeModel, ConnectionModel>,
    index: HashMap<String, NodeIndex>,
}

impl WorkflowGraph {
    /// Build the graph, validating every connection.
    ///
    /// Fails with a `Connection` error when an edge references a node id that
    /// is not part of the workflow, or when an edge loops a node onto itself.
    pub fn new(
        nodes: &[NodeModel],
        connections: &[ConnectionModel],
    ) -> Result<Self> {
        let mut graph: DiGraph<NodeModel, ConnectionModel> = DiGraph::new();
        let mut index = HashMap::new();

        for node in nodes {
            let idx = graph.add_node(node.clone());
            index.insert(node.id.clone(), idx);
        }
        for conn in connections {
            let source = index.get(&conn.source).ok_or(MarketflowError::Connection(format!("source node {} not found", conn.source)))?;
            let target = index.get(&conn.target).ok_or(MarketflowError::Connection(format!("target node {} not found", conn.target)))?;
            if source == target {
                return Err(MarketflowError::Connection(format!("node {} depends on itself", conn.source)));
            }
            graph.add_edge(*source, *target, conn.clone());
        }

        Ok(Self {
            graph,
            index,
        })
    }

    /// get node by id
    pub fn node(
        &self,
        id: &str,
    ) -> Option<&NodeModel> {
        self.index.get(id).map(|idx| &self.graph[*idx])
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// ids of the direct dependencies of a node
    pub fn dependencies_of(
        &self,
        id: &str,
    ) -> Vec<String> {
        self.index
            .get(id)
            .map(|idx| self.graph.neighbors_directed(*idx, Direction::Incoming).map(|dep| self.graph[dep].id.clone()).collect())
            .unwrap_or_default()
    }

    /// Topological order of the node ids.
    ///
    /// A cycle fails fast with `CycleDetected` carrying a node id on the
    /// cycle; no partial order is ever returned.
    pub fn topo_order(&self) -> Result<Vec<String>> {
        toposort(&self.graph, None)
            .map(|order| order.into_iter().map(|idx| self.graph[idx].id.clone()).collect())
            .map_err(|cycle| MarketflowError::CycleDetected(self.graph[cycle.node_id()].id.clone()))
    }

    /// Longest root-to-leaf dependency chain, as node ids.
    ///
    /// Brute-force recursive walk from every root. The graphs here hold at
    /// most a dozen or so nodes, so the O(V*E) walk is fine as-is.
    pub fn critical_path(&self) -> Vec<String> {
        let mut best: Vec<NodeIndex> = Vec::new();
        let mut path: Vec<NodeIndex> = Vec::new();

        for root in self.graph.node_indices().filter(|idx| self.graph.neighbors_directed(*idx, Direction::Incoming).count() == 0) {
            self.chase(root, &mut path, &mut best);
        }

        best.into_iter().map(|idx| self.graph[idx].id.clone()).collect()
    }

    fn chase(
        &self,
        idx: NodeIndex,
        path: &mut Vec<NodeIndex>,
        best: &mut Vec<NodeIndex>,
    ) {
        path.push(idx);
        let mut leaf = true;
        for succ in self.graph.neighbors_directed(idx, Direction::Outgoing) {
            leaf = false;
            self.chase(succ, path, best);
        }
        if leaf && (path.len() > best.len() || (path.len() == best.len() && self.chain_secs(path) > self.chain_secs(best))) {
            *best = path.clone();
        }
        path.pop();
    }

    fn chain_secs(
        &self,
        chain: &[NodeIndex],
    ) -> u64 {
        chain.iter().map(|idx| self.graph[*idx].duration_secs).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        catalog::{ModuleKind, StageCategory},
        model::Position,
    };

    fn node(id: &str, secs: u64) -> NodeModel {
        NodeModel {
            id: id.to_string(),
            module: ModuleKind::SalesCopy,
            category: StageCategory::Creation,
            title: id.to_string(),
            prompt: String::new(),
            duration_secs: secs,
            provider: "copy-llm".to_string(),
            outputs: vec![],
            depends_on: vec![],
            position: Position::default(),
        }
    }

    fn conn(source: &str, target: &str) -> ConnectionModel {
        ConnectionModel {
            id: format!("conn-{}-{}", source, target),
            source: source.to_string(),
            target: target.to_string(),
        }
    }

    #[test]
    fn test_unknown_endpoint_is_rejected() {
        let err = WorkflowGraph::new(&[node("a", 10)], &[conn("a", "ghost")]).unwrap_err();
        assert_eq!(err.as_ref(), "connection");
    }

    #[test]
    fn test_self_loop_is_rejected() {
        let err = WorkflowGraph::new(&[node("a", 10)], &[conn("a", "a")]).unwrap_err();
        assert_eq!(err.as_ref(), "connection");
    }

    #[test]
    fn test_topo_order_respects_edges() {
        let graph = WorkflowGraph::new(
            &[node("a", 10), node("b", 10), node("c", 10)],
            &[conn("a", "b"), conn("b", "c")],
        )
        .unwrap();

        assert_eq!(graph.topo_order().unwrap(), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_cycle_fails_fast() {
        let graph = WorkflowGraph::new(
            &[node("a", 10), node("b", 10)],
            &[conn("a", "b"), conn("b", "a")],
        )
        .unwrap();

        match graph.topo_order() {
            Err(MarketflowError::CycleDetected(nid)) => assert!(nid == "a" || nid == "b"),
            other => panic!("expected CycleDetected, got {:?}", other),
        }
    }

    #[test]
    fn test_critical_path_picks_the_longest_chain() {
        // a -> b -> d is longer than a -> c
        let graph = WorkflowGraph::new(
            &[node("a", 10), node("b", 10), node("c", 10), node("d", 10)],
            &[conn("a", "b"), conn("a", "c"), conn("b", "d")],
        )
        .unwrap();

        assert_eq!(graph.critical_path(), vec!["a", "b", "d"]);
    }

    #[test]
    fn test_critical_path_ties_break_on_duration() {
        let graph = WorkflowGraph::new(
            &[node("a", 10), node("slow", 100), node("fast", 1)],
            &[conn("a", "slow"), conn("a", "fast")],
        )
        .unwrap();

        assert_eq!(graph.critical_path(), vec!["a", "slow"]);
    }
}
