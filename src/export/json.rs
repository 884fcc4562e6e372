//! JSON export implementation.
//!
//! Exports the whole graph (nodes, edges and stats) for machine-readable output.

use super::Exporter;
use crate::graph::{DependencyGraph, GraphEdge, GraphNode, GraphStats};
use serde::Serialize;
use std::io::{self, Write};

/// JSON exporter implementation.
pub struct JsonExporter;

/// Cycle with its rendered path, for JSON output.
#[derive(Serialize)]
struct JsonCycle<'a> {
    packages: &'a [String],
    path: String,
}

/// Summary statistics for JSON output.
#[derive(Serialize)]
struct JsonSummary<'a> {
    total_nodes: usize,
    total_edges: usize,
    max_depth: usize,
    has_cycles: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    cycles: Vec<JsonCycle<'a>>,
}

impl<'a> From<&'a GraphStats> for JsonSummary<'a> {
    fn from(stats: &'a GraphStats) -> Self {
        Self {
            total_nodes: stats.total_nodes,
            total_edges: stats.total_edges,
            max_depth: stats.max_depth,
            has_cycles: stats.has_cycles,
            cycles: stats
                .cycles
                .iter()
                .map(|c| JsonCycle {
                    packages: &c.nodes,
                    path: c.cycle_path(),
                })
                .collect(),
        }
    }
}

/// Root JSON export structure.
#[derive(Serialize)]
struct JsonExport<'a> {
    root: &'a str,
    stats: JsonSummary<'a>,
    nodes: Vec<&'a GraphNode>,
    edges: Vec<GraphEdge>,
}

impl Exporter for JsonExporter {
    fn export<W: Write>(&self, graph: &DependencyGraph, writer: &mut W) -> io::Result<()> {
        let export = JsonExport {
            root: &graph.root().id,
            stats: JsonSummary::from(graph.stats()),
            nodes: graph.nodes().collect(),
            edges: graph.edges(),
        };

        let json = serde_json::to_string_pretty(&export)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;

        writeln!(writer, "{}", json)
    }
}
