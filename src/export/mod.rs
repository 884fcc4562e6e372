//! Export functionality for built dependency graphs.
//!
//! This module provides exporters for writing a [`DependencyGraph`] out
//! in the shapes its consumers expect: a full JSON dump, the node/edge
//! list a rendering layer draws from, and a Markdown summary report.

pub mod json;
pub mod markdown;
pub mod visualization;

use crate::graph::DependencyGraph;
use std::io::{self, Write};

pub use visualization::{
    to_visualization, to_visualization_json, VisualizationEdge, VisualizationGraph,
    VisualizationNode, VisualizationNodeData,
};

/// Export format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportFormat {
    /// Full graph as JSON: nodes, edges and stats
    #[default]
    Json,
    /// Node/edge list for a rendering layer
    Visualization,
    /// Markdown format - documentation/reporting
    Markdown,
}

impl std::str::FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(ExportFormat::Json),
            "visualization" | "vis" => Ok(ExportFormat::Visualization),
            "markdown" | "md" => Ok(ExportFormat::Markdown),
            _ => Err(format!(
                "Unknown export format: '{}'. Valid formats: json, visualization, markdown",
                s
            )),
        }
    }
}

impl std::fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExportFormat::Json => write!(f, "json"),
            ExportFormat::Visualization => write!(f, "visualization"),
            ExportFormat::Markdown => write!(f, "markdown"),
        }
    }
}

/// Trait for exporters.
pub trait Exporter {
    /// Export the graph to the given writer.
    fn export<W: Write>(&self, graph: &DependencyGraph, writer: &mut W) -> io::Result<()>;
}

/// Export a graph in the specified format.
pub fn export<W: Write>(
    format: ExportFormat,
    graph: &DependencyGraph,
    writer: &mut W,
) -> io::Result<()> {
    match format {
        ExportFormat::Json => json::JsonExporter.export(graph, writer),
        ExportFormat::Visualization => visualization::VisualizationExporter.export(graph, writer),
        ExportFormat::Markdown => markdown::MarkdownExporter.export(graph, writer),
    }
}

/// Export a graph to a string.
pub fn export_to_string(format: ExportFormat, graph: &DependencyGraph) -> io::Result<String> {
    let mut buffer = Vec::new();
    export(format, graph, &mut buffer)?;
    String::from_utf8(buffer).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
}
