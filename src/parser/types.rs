//! Shared types for package descriptors.
//!
//! This module defines the registry-facing data structures: a full
//! [`PackageDescriptor`] and the lighter [`DependencyRef`] that a
//! descriptor uses to point at its dependencies.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A reference from one package to a dependency.
///
/// A reference only names its target. Whether the target can be expanded
/// further depends on the registry holding a full descriptor for `id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependencyRef {
    /// Registry key of the referenced package.
    pub id: String,

    /// Display name of the referenced package.
    pub name: String,

    /// Version the reference asks for, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

impl DependencyRef {
    /// Creates an unversioned reference.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            version: None,
        }
    }

    /// Sets the version on this reference.
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }
}

/// A registry entry describing a package and its declared dependencies.
///
/// # Example
///
/// ```
/// use depgraph::parser::{DependencyRef, PackageDescriptor};
///
/// let app = PackageDescriptor::new("app", "app")
///     .with_version("1.0.0")
///     .with_dependency(DependencyRef::new("react", "react"));
///
/// assert_eq!(app.dependencies.len(), 1);
/// assert_eq!(app.to_string(), "app@1.0.0");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageDescriptor {
    /// Unique key of the package within a registry.
    pub id: String,

    /// Display name.
    pub name: String,

    /// Resolved version of the package, if known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    /// Declared dependencies, in declaration order.
    #[serde(default)]
    pub dependencies: Vec<DependencyRef>,
}

impl PackageDescriptor {
    /// Creates a descriptor with no version and no dependencies.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            version: None,
            dependencies: Vec::new(),
        }
    }

    /// Sets the version on this descriptor.
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    /// Appends a dependency reference.
    pub fn with_dependency(mut self, dependency: DependencyRef) -> Self {
        self.dependencies.push(dependency);
        self
    }

    /// Returns true if the package declares any dependencies.
    pub fn has_dependencies(&self) -> bool {
        !self.dependencies.is_empty()
    }

    /// Builds a reference pointing at this descriptor.
    pub fn as_ref_entry(&self) -> DependencyRef {
        DependencyRef {
            id: self.id.clone(),
            name: self.name.clone(),
            version: self.version.clone(),
        }
    }
}

impl fmt::Display for PackageDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.version {
            Some(version) => write!(f, "{}@{}", self.name, version),
            None => write!(f, "{}", self.name),
        }
    }
}
