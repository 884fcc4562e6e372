//! Registry of known package descriptors.
//!
//! The graph builder only ever reads from a registry through the
//! [`RegistryView`] trait, so callers can hand it whatever lookup they
//! already have. [`Registry`] is the owned implementation used by the CLI,
//! loadable from a JSON array of descriptors.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use super::types::{DependencyRef, PackageDescriptor};

/// Errors that can occur while loading a registry.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    /// Failed to read the registry file from disk.
    #[error("Failed to read registry: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to parse JSON content.
    #[error("Failed to parse registry JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Two entries share the same identifier.
    #[error("Duplicate package id in registry: {0}")]
    DuplicateId(String),

    /// An entry is missing a required field.
    #[error("Invalid registry entry: {0}")]
    InvalidDescriptor(String),
}

/// Result type alias for registry operations.
pub type RegistryResult<T> = Result<T, RegistryError>;

/// Outcome of looking up a dependency reference in a registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution<'a> {
    /// The registry holds a full descriptor for the reference.
    Resolved(&'a PackageDescriptor),
    /// Only the reference itself is known; it cannot be expanded.
    Unresolved(&'a DependencyRef),
}

impl<'a> Resolution<'a> {
    /// Dependencies to expand for this package. Unresolved references are leaves.
    pub fn dependencies(&self) -> &'a [DependencyRef] {
        match *self {
            Resolution::Resolved(pkg) => &pkg.dependencies,
            Resolution::Unresolved(_) => &[],
        }
    }

    /// Returns true if a full descriptor was found.
    pub fn is_resolved(&self) -> bool {
        matches!(self, Resolution::Resolved(_))
    }
}

/// Read-only lookup from package identifier to descriptor.
pub trait RegistryView {
    /// Looks up a descriptor by identifier.
    fn get(&self, id: &str) -> Option<&PackageDescriptor>;

    /// Resolves a dependency reference against this registry.
    fn resolve<'a>(&'a self, dependency: &'a DependencyRef) -> Resolution<'a> {
        match self.get(&dependency.id) {
            Some(pkg) => Resolution::Resolved(pkg),
            None => Resolution::Unresolved(dependency),
        }
    }
}

impl RegistryView for HashMap<String, PackageDescriptor> {
    fn get(&self, id: &str) -> Option<&PackageDescriptor> {
        HashMap::get(self, id)
    }
}

/// An owned registry keyed by package identifier.
///
/// # Example
///
/// ```
/// use depgraph::parser::{PackageDescriptor, Registry, RegistryView};
///
/// let mut registry = Registry::new();
/// registry.insert(PackageDescriptor::new("react", "react").with_version("18.2.0"));
///
/// assert!(registry.get("react").is_some());
/// assert!(registry.get("vue").is_none());
/// ```
#[derive(Debug, Clone, Default)]
pub struct Registry {
    packages: HashMap<String, PackageDescriptor>,
}

impl Registry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a descriptor, returning the entry it replaced, if any.
    pub fn insert(&mut self, pkg: PackageDescriptor) -> Option<PackageDescriptor> {
        self.packages.insert(pkg.id.clone(), pkg)
    }

    /// Returns the number of descriptors.
    pub fn len(&self) -> usize {
        self.packages.len()
    }

    /// Returns true if the registry holds no descriptors.
    pub fn is_empty(&self) -> bool {
        self.packages.is_empty()
    }

    /// Checks if a descriptor exists for `id`.
    pub fn contains(&self, id: &str) -> bool {
        self.packages.contains_key(id)
    }

    /// Iterates over all descriptors in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = &PackageDescriptor> {
        self.packages.values()
    }

    /// Builds a registry from descriptors, rejecting duplicates and blank fields.
    pub fn from_descriptors(
        descriptors: impl IntoIterator<Item = PackageDescriptor>,
    ) -> RegistryResult<Self> {
        let mut registry = Self::new();
        for pkg in descriptors {
            validate(&pkg)?;
            if registry.contains(&pkg.id) {
                return Err(RegistryError::DuplicateId(pkg.id));
            }
            registry.insert(pkg);
        }
        Ok(registry)
    }

    /// Parses a registry from a JSON array of descriptors.
    ///
    /// # Example
    ///
    /// ```
    /// use depgraph::parser::Registry;
    ///
    /// let json = r#"[
    ///     {"id": "app", "name": "app", "dependencies": [{"id": "a", "name": "a"}]},
    ///     {"id": "a", "name": "a"}
    /// ]"#;
    /// let registry = Registry::from_json_str(json).unwrap();
    /// assert_eq!(registry.len(), 2);
    /// ```
    pub fn from_json_str(content: &str) -> RegistryResult<Self> {
        let descriptors: Vec<PackageDescriptor> = serde_json::from_str(content)?;
        Self::from_descriptors(descriptors)
    }

    /// Reads and parses a registry file.
    pub fn from_file(path: &Path) -> RegistryResult<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }
}

impl RegistryView for Registry {
    fn get(&self, id: &str) -> Option<&PackageDescriptor> {
        self.packages.get(id)
    }
}

impl FromIterator<PackageDescriptor> for Registry {
    fn from_iter<I: IntoIterator<Item = PackageDescriptor>>(iter: I) -> Self {
        let mut registry = Self::new();
        for pkg in iter {
            registry.insert(pkg);
        }
        registry
    }
}

/// Checks that a descriptor and its references carry an id and a name.
pub fn validate(pkg: &PackageDescriptor) -> RegistryResult<()> {
    if pkg.id.trim().is_empty() {
        return Err(RegistryError::InvalidDescriptor(format!(
            "package '{}' has an empty id",
            pkg.name
        )));
    }
    if pkg.name.trim().is_empty() {
        return Err(RegistryError::InvalidDescriptor(format!(
            "package '{}' has an empty name",
            pkg.id
        )));
    }
    for dep in &pkg.dependencies {
        if dep.id.trim().is_empty() || dep.name.trim().is_empty() {
            return Err(RegistryError::InvalidDescriptor(format!(
                "package '{}' has a dependency without id or name",
                pkg.id
            )));
        }
    }
    Ok(())
}
