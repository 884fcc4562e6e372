//! Depth-first graph construction from a root package and a registry.
//!
//! The traversal is iterative: each open package is a frame on an
//! explicit stack, and the stack doubles as the ancestor path used for
//! cycle detection. Depth is fixed the first time a package is seen.

use std::collections::HashSet;

use petgraph::graph::NodeIndex;
use tracing::{debug, trace};

use super::dependency_graph::{CycleInfo, DependencyGraph, GraphNode};
use crate::parser::{self, DependencyRef, PackageDescriptor, RegistryView, Resolution};

/// Errors that reject a build before or during traversal.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    /// The root or a registry entry is missing its id or name.
    #[error("Invalid package descriptor '{id}': {reason}")]
    InvalidDescriptor { id: String, reason: String },
}

/// Result type alias for build operations.
pub type BuildResult<T> = Result<T, BuildError>;

/// Options controlling how far the builder expands.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BuildOptions {
    /// Deepest parent whose children are themselves expanded.
    /// `None` expands until cycle protection stops it.
    pub max_depth: Option<usize>,
}

impl BuildOptions {
    /// Creates unbounded options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Bounds expansion depth.
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = Some(max_depth);
        self
    }

    /// Whether a child discovered under a parent at `parent_depth` gets expanded.
    fn expands_children_of(&self, parent_depth: usize) -> bool {
        self.max_depth.map_or(true, |max| parent_depth < max)
    }
}

/// Builds dependency graphs against one registry.
///
/// # Example
///
/// ```rust
/// use depgraph::graph::{BuildOptions, GraphBuilder};
/// use depgraph::parser::{DependencyRef, PackageDescriptor, Registry};
///
/// let app = PackageDescriptor::new("app", "app")
///     .with_dependency(DependencyRef::new("a", "a"));
/// let a = PackageDescriptor::new("a", "a")
///     .with_dependency(DependencyRef::new("b", "b"));
/// let registry: Registry = vec![app.clone(), a].into_iter().collect();
///
/// let graph = GraphBuilder::new(&registry)
///     .with_options(BuildOptions::new().with_max_depth(0))
///     .build(&app)
///     .unwrap();
///
/// // `a` is created but not expanded, so `b` never appears.
/// assert!(graph.contains("a"));
/// assert!(!graph.contains("b"));
/// ```
#[derive(Debug)]
pub struct GraphBuilder<'r, R: RegistryView + ?Sized> {
    registry: &'r R,
    options: BuildOptions,
}

impl<'r, R: RegistryView + ?Sized> GraphBuilder<'r, R> {
    /// Creates a builder with unbounded expansion.
    pub fn new(registry: &'r R) -> Self {
        Self {
            registry,
            options: BuildOptions::default(),
        }
    }

    /// Replaces the build options.
    pub fn with_options(mut self, options: BuildOptions) -> Self {
        self.options = options;
        self
    }

    /// Builds the graph rooted at `root`.
    pub fn build(&self, root: &PackageDescriptor) -> BuildResult<DependencyGraph> {
        traverse(root, self.registry, self.options)
    }
}

/// Builds the dependency graph for `root`.
///
/// Missing registry entries become leaf nodes. Cycles are reported in the
/// graph's stats rather than failing the build. The only error is a
/// descriptor without an id or name.
///
/// # Example
///
/// ```rust
/// use depgraph::graph::{build, NodeType};
/// use depgraph::parser::{DependencyRef, PackageDescriptor, Registry};
///
/// let app = PackageDescriptor::new("app", "app")
///     .with_dependency(DependencyRef::new("a", "a"));
/// let a = PackageDescriptor::new("a", "a")
///     .with_dependency(DependencyRef::new("b", "b"));
/// let b = PackageDescriptor::new("b", "b");
/// let registry: Registry = vec![app.clone(), a, b].into_iter().collect();
///
/// let graph = build(&app, &registry, None).unwrap();
/// let b = graph.get_node("b").unwrap();
/// assert_eq!(graph.node_count(), 3);
/// assert_eq!(b.depth, 2);
/// assert_eq!(b.node_type, NodeType::Transitive);
/// ```
pub fn build<R: RegistryView + ?Sized>(
    root: &PackageDescriptor,
    registry: &R,
    max_depth: Option<usize>,
) -> BuildResult<DependencyGraph> {
    traverse(root, registry, BuildOptions { max_depth })
}

/// One open package on the traversal stack.
struct Frame<'a> {
    index: NodeIndex,
    id: &'a str,
    depth: usize,
    dependencies: &'a [DependencyRef],
    next: usize,
}

fn traverse<'a, R: RegistryView + ?Sized>(
    root: &'a PackageDescriptor,
    registry: &'a R,
    options: BuildOptions,
) -> BuildResult<DependencyGraph> {
    check(root)?;

    // The registry entry wins so a stub root can be expanded in full.
    let root_dependencies = match registry.get(&root.id) {
        Some(entry) => {
            check(entry)?;
            entry.dependencies.as_slice()
        }
        None => root.dependencies.as_slice(),
    };

    debug!(
        root = %root.id,
        max_depth = ?options.max_depth,
        "building dependency graph"
    );

    let mut graph = DependencyGraph::with_root(&root.id, &root.name, root.version.clone());
    let mut stack = vec![Frame {
        index: graph.root_index(),
        id: root.id.as_str(),
        depth: 0,
        dependencies: root_dependencies,
        next: 0,
    }];
    let mut on_stack: HashSet<&'a str> = HashSet::from([root.id.as_str()]);

    while let Some(frame) = stack.last_mut() {
        let dependencies = frame.dependencies;
        let Some(dep) = dependencies.get(frame.next) else {
            on_stack.remove(frame.id);
            stack.pop();
            continue;
        };
        frame.next += 1;
        let (parent, parent_depth) = (frame.index, frame.depth);

        if on_stack.contains(dep.id.as_str()) {
            if let Some(child) = graph.index_of(&dep.id) {
                graph.add_edge(parent, child);
            }
            let start = stack
                .iter()
                .position(|open| open.id == dep.id)
                .unwrap_or(0);
            let cycle = CycleInfo::new(
                stack[start..]
                    .iter()
                    .map(|open| open.id.to_string())
                    .collect(),
            );
            debug!(cycle = %cycle.cycle_path(), "circular dependency detected");
            graph.record_cycle(cycle);
            continue;
        }

        if let Some(child) = graph.index_of(&dep.id) {
            if graph.add_edge(parent, child) {
                trace!(to = %dep.id, "edge to already discovered package");
            }
            continue;
        }

        let resolution = registry.resolve(dep);
        if let Resolution::Resolved(pkg) = resolution {
            check(pkg)?;
        }

        let depth = parent_depth + 1;
        let child = graph.add_node(node_for(dep, resolution, depth));
        graph.add_edge(parent, child);
        trace!(
            id = %dep.id,
            depth,
            resolved = resolution.is_resolved(),
            "discovered package"
        );

        if options.expands_children_of(parent_depth) {
            on_stack.insert(dep.id.as_str());
            stack.push(Frame {
                index: child,
                id: dep.id.as_str(),
                depth,
                dependencies: resolution.dependencies(),
                next: 0,
            });
        }
    }

    let graph = graph.finish();
    debug!(
        nodes = graph.stats().total_nodes,
        edges = graph.stats().total_edges,
        max_depth = graph.stats().max_depth,
        cycles = graph.stats().cycles.len(),
        "dependency graph built"
    );
    Ok(graph)
}

/// Node contents for a first discovery. The node is keyed by the
/// reference's id; a full descriptor supplies the name and concrete version.
fn node_for(dep: &DependencyRef, resolution: Resolution<'_>, depth: usize) -> GraphNode {
    match resolution {
        Resolution::Resolved(pkg) => GraphNode::new(
            dep.id.clone(),
            pkg.name.clone(),
            pkg.version.clone().or_else(|| dep.version.clone()),
            depth,
        ),
        Resolution::Unresolved(_) => {
            GraphNode::new(dep.id.clone(), dep.name.clone(), dep.version.clone(), depth)
        }
    }
}

fn check(pkg: &PackageDescriptor) -> BuildResult<()> {
    parser::validate(pkg).map_err(|err| BuildError::InvalidDescriptor {
        id: pkg.id.clone(),
        reason: err.to_string(),
    })
}
