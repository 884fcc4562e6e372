//! Markdown export implementation.
//!
//! Exports a built graph as a Markdown report for documentation and reviews.

use super::Exporter;
use crate::graph::{DependencyGraph, NodeType};
use std::io::{self, Write};

/// Markdown exporter implementation.
pub struct MarkdownExporter;

impl MarkdownExporter {
    /// Escape pipes so package names cannot break table cells.
    fn cell(value: &str) -> String {
        value.replace('|', "\\|")
    }
}

impl Exporter for MarkdownExporter {
    fn export<W: Write>(&self, graph: &DependencyGraph, writer: &mut W) -> io::Result<()> {
        let stats = graph.stats();

        // Title
        writeln!(writer, "# Dependency Graph Report")?;
        writeln!(writer)?;
        writeln!(writer, "**Root:** {}", graph.root().label())?;
        writeln!(writer)?;

        // Summary section
        writeln!(writer, "## Summary")?;
        writeln!(writer)?;
        writeln!(writer, "| Metric | Count |")?;
        writeln!(writer, "|--------|-------|")?;
        writeln!(writer, "| Total Nodes | {} |", stats.total_nodes)?;
        writeln!(writer, "| Total Edges | {} |", stats.total_edges)?;
        writeln!(
            writer,
            "| Direct | {} |",
            graph.get_nodes_by_type(NodeType::Direct).len()
        )?;
        writeln!(
            writer,
            "| Transitive | {} |",
            graph.get_nodes_by_type(NodeType::Transitive).len()
        )?;
        writeln!(writer, "| Max Depth | {} |", stats.max_depth)?;
        writeln!(writer, "| Circular Dependencies | {} |", stats.cycles.len())?;
        writeln!(writer)?;

        let packages = graph.flatten();
        if !packages.is_empty() {
            writeln!(writer, "## Packages ({})", packages.len())?;
            writeln!(writer)?;
            writeln!(writer, "| Package | Version | Type | Depth |")?;
            writeln!(writer, "|---------|---------|------|-------|")?;
            for node in &packages {
                writeln!(
                    writer,
                    "| {} | {} | {} | {} |",
                    Self::cell(&node.name),
                    Self::cell(node.version.as_deref().unwrap_or("-")),
                    node.node_type,
                    node.depth
                )?;
            }
            writeln!(writer)?;
        }

        // Circular dependencies
        if stats.has_cycles {
            writeln!(writer, "## Circular Dependencies")?;
            writeln!(writer)?;
            writeln!(
                writer,
                "The following circular dependencies were detected:"
            )?;
            writeln!(writer)?;
            for (i, cycle) in stats.cycles.iter().enumerate() {
                writeln!(writer, "{}. `{}`", i + 1, cycle.cycle_path())?;
            }
            writeln!(writer)?;
        }

        // Footer
        writeln!(writer, "---")?;
        writeln!(writer, "*Generated by depgraph*")?;

        Ok(())
    }
}
