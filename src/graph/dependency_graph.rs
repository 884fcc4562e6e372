//! Dependency graph implementation using petgraph.
//!
//! A [`DependencyGraph`] is the finished artifact of a build: nodes typed by
//! discovery depth, deduplicated parent-to-child edges and the statistics
//! gathered while traversing. It is only mutated by the builder in this
//! crate; callers get a read-only view.

use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::Direction;
use serde::Serialize;
use std::collections::HashMap;

/// Classification of a node by its distance from the root.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeType {
    /// The traversal origin, depth 0
    Root,
    /// Reachable in exactly one hop from the root
    Direct,
    /// Reachable in two or more hops from the root
    Transitive,
}

impl NodeType {
    /// Derives the node type from a discovery depth.
    ///
    /// ```rust
    /// use depgraph::graph::NodeType;
    ///
    /// assert_eq!(NodeType::from_depth(0), NodeType::Root);
    /// assert_eq!(NodeType::from_depth(1), NodeType::Direct);
    /// assert_eq!(NodeType::from_depth(7), NodeType::Transitive);
    /// ```
    pub fn from_depth(depth: usize) -> Self {
        match depth {
            0 => Self::Root,
            1 => Self::Direct,
            _ => Self::Transitive,
        }
    }
}

impl std::fmt::Display for NodeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Root => write!(f, "root"),
            Self::Direct => write!(f, "direct"),
            Self::Transitive => write!(f, "transitive"),
        }
    }
}

/// Represents a package in the dependency graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GraphNode {
    /// Package identifier, unique within a graph
    pub id: String,
    /// Display name
    pub name: String,
    /// Version, if known
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    /// Classification derived from `depth`
    #[serde(rename = "type")]
    pub node_type: NodeType,
    /// Hop count from the root at first discovery
    pub depth: usize,
}

impl GraphNode {
    /// Creates a node at `depth`, deriving its type from the depth.
    ///
    /// ```rust
    /// use depgraph::graph::{GraphNode, NodeType};
    ///
    /// let node = GraphNode::new("react", "react", Some("18.2.0".into()), 2);
    /// assert_eq!(node.node_type, NodeType::Transitive);
    /// ```
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        version: Option<String>,
        depth: usize,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            version,
            node_type: NodeType::from_depth(depth),
            depth,
        }
    }

    /// Returns `name@version`, or just `name` when unversioned.
    pub fn label(&self) -> String {
        match &self.version {
            Some(version) => format!("{}@{}", self.name, version),
            None => self.name.clone(),
        }
    }

    /// Returns true if this is the root node.
    pub fn is_root(&self) -> bool {
        self.node_type == NodeType::Root
    }
}

/// A directed parent-to-child relationship.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct GraphEdge {
    /// Identifier of the dependent package
    pub from: String,
    /// Identifier of the dependency
    pub to: String,
}

impl GraphEdge {
    /// Creates a new edge.
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
        }
    }
}

/// Information about a detected circular dependency.
///
/// Holds the ancestor path from the repeated package through the package
/// that closed the cycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CycleInfo {
    /// The package ids in the cycle (the last connects back to the first)
    pub nodes: Vec<String>,
}

impl CycleInfo {
    /// Creates a cycle description.
    pub fn new(nodes: Vec<String>) -> Self {
        Self { nodes }
    }

    /// Returns a formatted string representation of the cycle path.
    ///
    /// For example: "a -> b -> c -> a"
    pub fn cycle_path(&self) -> String {
        let Some(first) = self.nodes.first() else {
            return String::new();
        };
        let mut path = self.nodes.join(" -> ");
        path.push_str(" -> ");
        path.push_str(first);
        path
    }

    /// Returns the number of packages in the cycle.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns true if the cycle is empty (should not happen in practice).
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// Aggregate statistics gathered while building a graph.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GraphStats {
    /// Number of nodes, root included
    pub total_nodes: usize,
    /// Number of distinct edges
    pub total_edges: usize,
    /// Deepest discovery depth of any node
    pub max_depth: usize,
    /// Whether any cycle was detected
    pub has_cycles: bool,
    /// Every detected cycle, in detection order
    pub cycles: Vec<CycleInfo>,
}

/// The built, immutable dependency graph.
///
/// Nodes are kept in build order and edges in the order they were
/// recorded. Edges point from the dependent package to its dependency.
///
/// # Example
///
/// ```rust
/// use depgraph::graph::{build, NodeType};
/// use depgraph::parser::{DependencyRef, PackageDescriptor, Registry};
///
/// let app = PackageDescriptor::new("app", "app")
///     .with_dependency(DependencyRef::new("react", "react"));
/// let registry: Registry = vec![app.clone()].into_iter().collect();
///
/// let graph = build(&app, &registry, None).unwrap();
/// assert_eq!(graph.node_count(), 2);
/// assert_eq!(graph.get_node("react").unwrap().node_type, NodeType::Direct);
/// ```
#[derive(Debug, Clone)]
pub struct DependencyGraph {
    /// The underlying directed graph
    graph: DiGraph<GraphNode, ()>,
    /// Maps package ids to their node indices for O(1) lookup
    node_indices: HashMap<String, NodeIndex>,
    /// Index of the root node
    root: NodeIndex,
    /// Statistics accumulated during the build
    stats: GraphStats,
}

impl DependencyGraph {
    /// Starts a graph holding only the root node.
    pub(crate) fn with_root(id: &str, name: &str, version: Option<String>) -> Self {
        let mut graph = DiGraph::new();
        let root = graph.add_node(GraphNode::new(id, name, version, 0));
        let mut node_indices = HashMap::new();
        node_indices.insert(id.to_string(), root);

        Self {
            graph,
            node_indices,
            root,
            stats: GraphStats::default(),
        }
    }

    /// Adds a newly discovered node. Returns the existing index if the id
    /// is already present; depth is fixed at first discovery.
    pub(crate) fn add_node(&mut self, node: GraphNode) -> NodeIndex {
        if let Some(&idx) = self.node_indices.get(&node.id) {
            return idx;
        }

        self.stats.max_depth = self.stats.max_depth.max(node.depth);
        let id = node.id.clone();
        let idx = self.graph.add_node(node);
        self.node_indices.insert(id, idx);
        idx
    }

    /// Records an edge once per (parent, child) pair.
    ///
    /// Returns `true` if the edge was new.
    pub(crate) fn add_edge(&mut self, from: NodeIndex, to: NodeIndex) -> bool {
        if self.graph.find_edge(from, to).is_some() {
            return false;
        }
        self.graph.add_edge(from, to, ());
        true
    }

    /// Records a detected cycle.
    pub(crate) fn record_cycle(&mut self, cycle: CycleInfo) {
        self.stats.has_cycles = true;
        self.stats.cycles.push(cycle);
    }

    /// Seals the graph, filling in the node and edge totals.
    pub(crate) fn finish(mut self) -> Self {
        self.stats.total_nodes = self.graph.node_count();
        self.stats.total_edges = self.graph.edge_count();
        self
    }

    pub(crate) fn index_of(&self, id: &str) -> Option<NodeIndex> {
        self.node_indices.get(id).copied()
    }

    pub(crate) fn root_index(&self) -> NodeIndex {
        self.root
    }

    pub(crate) fn node_at(&self, idx: NodeIndex) -> Option<&GraphNode> {
        self.graph.node_weight(idx)
    }

    /// Outgoing neighbors of `idx` in the order their edges were recorded.
    pub(crate) fn successors_in_order(&self, idx: NodeIndex) -> Vec<NodeIndex> {
        // petgraph walks a node's adjacency list newest-first
        let mut edges: Vec<_> = self
            .graph
            .edges_directed(idx, Direction::Outgoing)
            .map(|edge| (edge.id(), edge.target()))
            .collect();
        edges.sort_by_key(|&(edge_id, _)| edge_id);
        edges.into_iter().map(|(_, target)| target).collect()
    }

    /// Returns the root node.
    pub fn root(&self) -> &GraphNode {
        &self.graph[self.root]
    }

    /// Returns the statistics gathered during the build.
    pub fn stats(&self) -> &GraphStats {
        &self.stats
    }

    /// Returns true if any cycle was detected during the build.
    pub fn has_cycles(&self) -> bool {
        self.stats.has_cycles
    }

    /// Returns the detected cycles in detection order.
    pub fn cycles(&self) -> &[CycleInfo] {
        &self.stats.cycles
    }

    /// Iterates over all nodes in build order.
    pub fn nodes(&self) -> impl Iterator<Item = &GraphNode> + '_ {
        self.graph.node_weights()
    }

    /// Returns all edges in the order they were recorded.
    pub fn edges(&self) -> Vec<GraphEdge> {
        self.graph
            .edge_references()
            .map(|edge| {
                GraphEdge::new(
                    self.graph[edge.source()].id.clone(),
                    self.graph[edge.target()].id.clone(),
                )
            })
            .collect()
    }

    /// Returns every non-root node, preserving build order.
    ///
    /// ```rust
    /// use depgraph::graph::build;
    /// use depgraph::parser::{DependencyRef, PackageDescriptor, Registry};
    ///
    /// let app = PackageDescriptor::new("app", "app")
    ///     .with_dependency(DependencyRef::new("a", "a"))
    ///     .with_dependency(DependencyRef::new("b", "b"));
    /// let registry: Registry = vec![app.clone()].into_iter().collect();
    ///
    /// let graph = build(&app, &registry, None).unwrap();
    /// let ids: Vec<_> = graph.flatten().iter().map(|n| n.id.as_str()).collect();
    /// assert_eq!(ids, vec!["a", "b"]);
    /// ```
    pub fn flatten(&self) -> Vec<&GraphNode> {
        self.nodes().filter(|node| !node.is_root()).collect()
    }

    /// Gets a node by package id.
    pub fn get_node(&self, id: &str) -> Option<&GraphNode> {
        self.index_of(id).and_then(|idx| self.graph.node_weight(idx))
    }

    /// Gets the dependencies of a package (outgoing edges), in record order.
    pub fn get_dependencies(&self, id: &str) -> Vec<&GraphNode> {
        let Some(idx) = self.index_of(id) else {
            return Vec::new();
        };

        self.successors_in_order(idx)
            .into_iter()
            .filter_map(|target| self.graph.node_weight(target))
            .collect()
    }

    /// Gets the dependents of a package (incoming edges).
    pub fn get_dependents(&self, id: &str) -> Vec<&GraphNode> {
        let Some(idx) = self.index_of(id) else {
            return Vec::new();
        };

        self.graph
            .edges_directed(idx, Direction::Incoming)
            .filter_map(|edge| self.graph.node_weight(edge.source()))
            .collect()
    }

    /// Gets nodes of one type, in build order.
    pub fn get_nodes_by_type(&self, node_type: NodeType) -> Vec<&GraphNode> {
        self.nodes()
            .filter(|node| node.node_type == node_type)
            .collect()
    }

    /// Gets nodes at a specific depth, in build order.
    pub fn get_nodes_at_depth(&self, depth: usize) -> Vec<&GraphNode> {
        self.nodes().filter(|node| node.depth == depth).collect()
    }

    /// Returns the number of nodes in the graph.
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Returns the number of edges in the graph.
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Checks if a node exists in the graph.
    pub fn contains(&self, id: &str) -> bool {
        self.node_indices.contains_key(id)
    }

    /// Checks if an edge `from -> to` was recorded.
    pub fn contains_edge(&self, from: &str, to: &str) -> bool {
        match (self.index_of(from), self.index_of(to)) {
            (Some(a), Some(b)) => self.graph.contains_edge(a, b),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_graph() -> DependencyGraph {
        // app -> a -> c, app -> b -> c
        let mut graph = DependencyGraph::with_root("app", "app", Some("1.0.0".into()));
        let app = graph.root_index();
        let a = graph.add_node(GraphNode::new("a", "a", None, 1));
        let b = graph.add_node(GraphNode::new("b", "b", None, 1));
        let c = graph.add_node(GraphNode::new("c", "c", Some("2.0.0".into()), 2));
        graph.add_edge(app, a);
        graph.add_edge(app, b);
        graph.add_edge(a, c);
        graph.add_edge(b, c);
        graph.finish()
    }

    #[test]
    fn test_node_type_from_depth() {
        assert_eq!(NodeType::from_depth(0), NodeType::Root);
        assert_eq!(NodeType::from_depth(1), NodeType::Direct);
        assert_eq!(NodeType::from_depth(2), NodeType::Transitive);
        assert_eq!(NodeType::from_depth(40), NodeType::Transitive);
    }

    #[test]
    fn test_node_type_display() {
        assert_eq!(format!("{}", NodeType::Root), "root");
        assert_eq!(format!("{}", NodeType::Direct), "direct");
        assert_eq!(format!("{}", NodeType::Transitive), "transitive");
    }

    #[test]
    fn test_node_type_serializes_lowercase() {
        let node = GraphNode::new("a", "a", None, 1);
        let json = serde_json::to_value(&node).unwrap();

        assert_eq!(json["type"], "direct");
        assert_eq!(json["depth"], 1);
        assert!(json.get("version").is_none());
    }

    #[test]
    fn test_node_label() {
        let versioned = GraphNode::new("app", "app", Some("1.0.0".into()), 0);
        let bare = GraphNode::new("app", "app", None, 0);

        assert_eq!(versioned.label(), "app@1.0.0");
        assert_eq!(bare.label(), "app");
    }

    #[test]
    fn test_root_only_graph() {
        let graph = DependencyGraph::with_root("solo", "solo", None).finish();

        assert_eq!(graph.node_count(), 1);
        assert_eq!(graph.edge_count(), 0);
        assert_eq!(graph.root().id, "solo");
        assert!(graph.root().is_root());
        assert!(graph.flatten().is_empty());
        assert_eq!(graph.stats().total_nodes, 1);
        assert_eq!(graph.stats().max_depth, 0);
    }

    #[test]
    fn test_add_node_first_discovery_wins() {
        let mut graph = DependencyGraph::with_root("app", "app", None);
        let first = graph.add_node(GraphNode::new("a", "a", None, 3));
        let second = graph.add_node(GraphNode::new("a", "a", None, 1));

        assert_eq!(first, second);
        assert_eq!(graph.get_node("a").unwrap().depth, 3);
        assert_eq!(graph.node_count(), 2);
    }

    #[test]
    fn test_add_edge_dedup() {
        let mut graph = DependencyGraph::with_root("app", "app", None);
        let app = graph.root_index();
        let a = graph.add_node(GraphNode::new("a", "a", None, 1));

        assert!(graph.add_edge(app, a));
        assert!(!graph.add_edge(app, a));
        assert_eq!(graph.edge_count(), 1);
    }

    #[test]
    fn test_stats_after_finish() {
        let graph = sample_graph();
        let stats = graph.stats();

        assert_eq!(stats.total_nodes, 4);
        assert_eq!(stats.total_edges, 4);
        assert_eq!(stats.max_depth, 2);
        assert!(!stats.has_cycles);
        assert!(stats.cycles.is_empty());
    }

    #[test]
    fn test_edges_in_record_order() {
        let graph = sample_graph();

        assert_eq!(
            graph.edges(),
            vec![
                GraphEdge::new("app", "a"),
                GraphEdge::new("app", "b"),
                GraphEdge::new("a", "c"),
                GraphEdge::new("b", "c"),
            ]
        );
    }

    #[test]
    fn test_get_dependencies_in_record_order() {
        let graph = sample_graph();
        let deps: Vec<_> = graph
            .get_dependencies("app")
            .iter()
            .map(|n| n.id.as_str())
            .collect();

        assert_eq!(deps, vec!["a", "b"]);
        assert!(graph.get_dependencies("missing").is_empty());
    }

    #[test]
    fn test_get_dependents() {
        let graph = sample_graph();
        let mut dependents: Vec<_> = graph
            .get_dependents("c")
            .iter()
            .map(|n| n.id.as_str())
            .collect();
        dependents.sort();

        assert_eq!(dependents, vec!["a", "b"]);
        assert!(graph.get_dependents("app").is_empty());
    }

    #[test]
    fn test_flatten_excludes_root() {
        let graph = sample_graph();
        let ids: Vec<_> = graph.flatten().iter().map(|n| n.id.as_str()).collect();

        assert_eq!(ids, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_get_nodes_by_type_and_depth() {
        let graph = sample_graph();

        assert_eq!(graph.get_nodes_by_type(NodeType::Root).len(), 1);
        assert_eq!(graph.get_nodes_by_type(NodeType::Direct).len(), 2);
        assert_eq!(graph.get_nodes_by_type(NodeType::Transitive).len(), 1);
        assert_eq!(graph.get_nodes_at_depth(2)[0].id, "c");
        assert!(graph.get_nodes_at_depth(5).is_empty());
    }

    #[test]
    fn test_contains_edge() {
        let graph = sample_graph();

        assert!(graph.contains_edge("a", "c"));
        assert!(!graph.contains_edge("c", "a"));
        assert!(!graph.contains_edge("x", "a"));
    }

    #[test]
    fn test_record_cycle() {
        let mut graph = DependencyGraph::with_root("a", "a", None);
        graph.record_cycle(CycleInfo::new(vec!["a".into(), "b".into()]));
        let graph = graph.finish();

        assert!(graph.has_cycles());
        assert_eq!(graph.cycles()[0].nodes, vec!["a", "b"]);
    }

    #[test]
    fn test_cycle_info_cycle_path() {
        let cycle = CycleInfo::new(vec!["a".into(), "b".into(), "c".into()]);
        assert_eq!(cycle.cycle_path(), "a -> b -> c -> a");
        assert_eq!(cycle.len(), 3);
    }

    #[test]
    fn test_cycle_info_self_loop_and_empty() {
        assert_eq!(CycleInfo::new(vec!["a".into()]).cycle_path(), "a -> a");

        let empty = CycleInfo::new(Vec::new());
        assert_eq!(empty.cycle_path(), "");
        assert!(empty.is_empty());
    }
}
