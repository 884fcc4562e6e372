use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use depgraph::export::{self, ExportFormat};
use depgraph::graph::{find_paths_limited, BuildOptions, DependencyGraph, GraphBuilder};
use depgraph::parser::{Registry, RegistryView};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "depgraph")]
#[command(author = "Zachary Woods <143150513+zach-fau@users.noreply.github.com>")]
#[command(version)]
#[command(about = "Dependency graph builder with cycle detection and path queries", long_about = None)]
struct Cli {
    /// Enable debug logging (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Inputs shared by every command that builds a graph.
#[derive(Args)]
struct GraphArgs {
    /// Registry file: a JSON array of package descriptors
    #[arg(short, long)]
    registry: PathBuf,

    /// Id of the root package in the registry
    #[arg(long)]
    root: String,

    /// Stop expanding below this depth
    #[arg(short = 'd', long)]
    max_depth: Option<usize>,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the dependency graph and export it
    Analyze {
        #[command(flatten)]
        graph: GraphArgs,

        /// Output format: json, visualization or markdown
        #[arg(short, long, default_value = "json")]
        format: ExportFormat,

        /// Write to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// List every path from the root to a package
    Paths {
        #[command(flatten)]
        graph: GraphArgs,

        /// Id of the package to find paths to
        #[arg(short, long)]
        target: String,

        /// Stop after this many paths
        #[arg(short, long)]
        limit: Option<usize>,
    },
    /// Show version information
    Version,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Some(Commands::Analyze {
            graph,
            format,
            output,
        }) => {
            let graph = load_graph(&graph)?;
            match output {
                Some(path) => {
                    let file = File::create(&path)
                        .with_context(|| format!("Failed to create {}", path.display()))?;
                    let mut writer = BufWriter::new(file);
                    export::export(format, &graph, &mut writer)?;
                    writer.flush()?;
                    tracing::info!(path = %path.display(), %format, "graph exported");
                }
                None => export::export(format, &graph, &mut io::stdout().lock())?,
            }
        }
        Some(Commands::Paths {
            graph,
            target,
            limit,
        }) => {
            let graph = load_graph(&graph)?;
            let paths = find_paths_limited(&graph, &target, limit);
            if paths.is_empty() {
                eprintln!("No path from {} to {}", graph.root().id, target);
            }
            let mut stdout = io::stdout().lock();
            for path in paths {
                writeln!(stdout, "{}", path.join(" -> "))?;
            }
        }
        Some(Commands::Version) => {
            println!("depgraph v{}", env!("CARGO_PKG_VERSION"));
        }
        None => {
            println!("depgraph - Dependency Graph Analyzer");
            println!("Run 'depgraph analyze --registry <file> --root <id>' to build a graph");
            println!("Run 'depgraph --help' for more information");
        }
    }

    Ok(())
}

/// Logs go to stderr so exports on stdout stay machine-readable.
fn init_tracing(verbose: bool) {
    let default_filter = if verbose { "depgraph=debug" } else { "depgraph=warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

fn load_graph(args: &GraphArgs) -> Result<DependencyGraph> {
    let registry = Registry::from_file(&args.registry)
        .with_context(|| format!("Failed to load registry {}", args.registry.display()))?;
    tracing::debug!(packages = registry.len(), "registry loaded");

    let root = registry
        .get(&args.root)
        .with_context(|| format!("Root package '{}' not found in registry", args.root))?;

    let options = BuildOptions {
        max_depth: args.max_depth,
    };
    let graph = GraphBuilder::new(&registry)
        .with_options(options)
        .build(root)?;

    let stats = graph.stats();
    tracing::info!(
        nodes = stats.total_nodes,
        edges = stats.total_edges,
        max_depth = stats.max_depth,
        cycles = stats.cycles.len(),
        "graph built"
    );
    Ok(graph)
}
