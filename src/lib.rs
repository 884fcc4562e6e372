//! depgraph - dependency graph construction and analysis
//!
//! This crate builds a typed dependency graph from a root package and a
//! registry of package descriptors, detects cycles while doing so, answers
//! root-to-package path queries and exports the graph for reporting and
//! rendering.

pub mod export;
pub mod graph;
pub mod parser;
