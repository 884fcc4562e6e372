//! Graph module for dependency relationship modeling.
//!
//! [`build`] walks a root package through a registry and produces an
//! immutable [`DependencyGraph`]; [`find_paths`] answers root-to-package
//! path queries against it.
//!
//! # Example
//!
//! ```rust
//! use depgraph::graph::{build, find_paths};
//! use depgraph::parser::{DependencyRef, PackageDescriptor, Registry};
//!
//! let app = PackageDescriptor::new("app", "app")
//!     .with_dependency(DependencyRef::new("react-dom", "react-dom"));
//! let react_dom = PackageDescriptor::new("react-dom", "react-dom")
//!     .with_dependency(DependencyRef::new("react", "react"));
//! let registry: Registry = vec![app.clone(), react_dom].into_iter().collect();
//!
//! let graph = build(&app, &registry, None).unwrap();
//! assert_eq!(graph.node_count(), 3);
//! assert_eq!(graph.edge_count(), 2);
//! assert_eq!(find_paths(&graph, "react"), vec![vec!["app", "react-dom", "react"]]);
//! ```

mod builder;
mod dependency_graph;
mod paths;

pub use builder::{build, BuildError, BuildOptions, BuildResult, GraphBuilder};
pub use dependency_graph::{
    CycleInfo, DependencyGraph, GraphEdge, GraphNode, GraphStats, NodeType,
};
pub use paths::{find_paths, find_paths_limited};
