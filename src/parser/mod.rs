//! Parser module for package registries.
//!
//! This module provides the descriptor types a registry is made of and
//! the registry lookup the graph builder reads from.
//!
//! # Example
//!
//! ```
//! use depgraph::parser::{Registry, RegistryView};
//!
//! let json = r#"[
//!     {"id": "app", "name": "app", "dependencies": [{"id": "lodash", "name": "lodash"}]}
//! ]"#;
//! let registry = Registry::from_json_str(json).unwrap();
//!
//! let app = registry.get("app").unwrap();
//! assert_eq!(app.dependencies[0].name, "lodash");
//! ```

pub mod registry;
pub mod types;

// Re-export commonly used types for convenience
pub use registry::{
    validate, Registry, RegistryError, RegistryResult, RegistryView, Resolution,
};

pub use types::{DependencyRef, PackageDescriptor};
