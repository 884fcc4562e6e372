//! Node/edge export for rendering layers.
//!
//! Produces the `{ nodes, edges }` shape graph-drawing front ends consume:
//! every node carries its id and a `data.label`, every edge a `source` and
//! `target`. No layout is computed here.

use super::Exporter;
use crate::graph::{DependencyGraph, NodeType};
use serde::Serialize;
use std::io::{self, Write};

/// Visualization exporter implementation.
pub struct VisualizationExporter;

/// Display payload of a rendered node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VisualizationNodeData {
    /// `name@version`, or `name` when unversioned
    pub label: String,
    #[serde(rename = "type")]
    pub node_type: NodeType,
    pub depth: usize,
}

/// A node as handed to a renderer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VisualizationNode {
    pub id: String,
    pub data: VisualizationNodeData,
}

/// An edge as handed to a renderer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VisualizationEdge {
    /// `source-target`, unique because graph edges are unique per pair
    pub id: String,
    pub source: String,
    pub target: String,
}

/// Renderable view of a dependency graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VisualizationGraph {
    pub nodes: Vec<VisualizationNode>,
    pub edges: Vec<VisualizationEdge>,
}

/// Converts a graph into its renderable node/edge lists.
///
/// # Example
///
/// ```rust
/// use depgraph::export::to_visualization;
/// use depgraph::graph::build;
/// use depgraph::parser::{PackageDescriptor, Registry};
///
/// let app = PackageDescriptor::new("app", "app").with_version("1.0.0");
/// let graph = build(&app, &Registry::new(), None).unwrap();
///
/// let vis = to_visualization(&graph);
/// assert_eq!(vis.nodes[0].data.label, "app@1.0.0");
/// assert!(vis.edges.is_empty());
/// ```
pub fn to_visualization(graph: &DependencyGraph) -> VisualizationGraph {
    let nodes = graph
        .nodes()
        .map(|node| VisualizationNode {
            id: node.id.clone(),
            data: VisualizationNodeData {
                label: node.label(),
                node_type: node.node_type,
                depth: node.depth,
            },
        })
        .collect();

    let edges = graph
        .edges()
        .into_iter()
        .map(|edge| VisualizationEdge {
            id: format!("{}-{}", edge.from, edge.to),
            source: edge.from,
            target: edge.to,
        })
        .collect();

    VisualizationGraph { nodes, edges }
}

/// Converts a graph straight to a JSON value in the renderable shape.
pub fn to_visualization_json(graph: &DependencyGraph) -> serde_json::Result<serde_json::Value> {
    serde_json::to_value(to_visualization(graph))
}

impl Exporter for VisualizationExporter {
    fn export<W: Write>(&self, graph: &DependencyGraph, writer: &mut W) -> io::Result<()> {
        let json = serde_json::to_string_pretty(&to_visualization(graph))
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;

        writeln!(writer, "{}", json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::build;
    use crate::parser::{DependencyRef, PackageDescriptor, Registry};

    fn diamond() -> DependencyGraph {
        let app = PackageDescriptor::new("app", "app")
            .with_version("1.0.0")
            .with_dependency(DependencyRef::new("a", "a"))
            .with_dependency(DependencyRef::new("b", "b"));
        let a = PackageDescriptor::new("a", "a").with_dependency(DependencyRef::new("c", "c"));
        let b = PackageDescriptor::new("b", "b").with_dependency(DependencyRef::new("c", "c"));
        let registry: Registry = vec![app.clone(), a, b].into_iter().collect();
        build(&app, &registry, None).unwrap()
    }

    #[test]
    fn test_counts_match_graph() {
        let graph = diamond();
        let vis = to_visualization(&graph);

        assert_eq!(vis.nodes.len(), graph.node_count());
        assert_eq!(vis.edges.len(), graph.edge_count());
    }

    #[test]
    fn test_labels() {
        let vis = to_visualization(&diamond());

        assert_eq!(vis.nodes[0].id, "app");
        assert_eq!(vis.nodes[0].data.label, "app@1.0.0");
        assert_eq!(vis.nodes[1].data.label, "a");
    }

    #[test]
    fn test_edges_mirror_graph_edges() {
        let graph = diamond();
        let vis = to_visualization(&graph);

        for (vis_edge, edge) in vis.edges.iter().zip(graph.edges()) {
            assert_eq!(vis_edge.source, edge.from);
            assert_eq!(vis_edge.target, edge.to);
        }
        assert_eq!(vis.edges[0].id, "app-a");
    }

    #[test]
    fn test_json_shape() {
        let value = to_visualization_json(&diamond()).unwrap();

        assert_eq!(value["nodes"][0]["id"], "app");
        assert_eq!(value["nodes"][0]["data"]["label"], "app@1.0.0");
        assert_eq!(value["nodes"][0]["data"]["type"], "root");
        assert_eq!(value["edges"][0]["source"], "app");
        assert_eq!(value["edges"][0]["target"], "a");
    }

    #[test]
    fn test_exporter_writes_valid_json() {
        let mut output = Vec::new();
        VisualizationExporter.export(&diamond(), &mut output).unwrap();

        let parsed: serde_json::Value =
            serde_json::from_str(&String::from_utf8(output).unwrap()).unwrap();
        assert_eq!(parsed["edges"].as_array().unwrap().len(), 4);
    }
}
