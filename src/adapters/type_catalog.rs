// SPDX-License-Identifier: MIT OR Apache-2.0

//! Type enumerator backed by an explicit catalog of known types.
//!
//! Applications register their model types, handler types and mapper interfaces
//! up front, either in code or from a YAML catalog:
//!
//! ```yaml
//! types:
//!   - { name: com.example.model.Emp, alias: employee }
//!   - { name: com.example.dao.EmpMapper, kind: interface }
//!   - name: com.example.MoneyHandler
//!     mappedTypes: [com.example.Money]
//!     mappedColumnTypes: [DECIMAL]
//! ```

use crate::domain::{ColumnType, ConfigError, Result, TypeRef};
use crate::ports::{TypeDescriptor, TypeEnumerator, TypeKind};
use serde::Deserialize;
use std::collections::BTreeMap;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CatalogFile {
    #[serde(default)]
    types: Vec<CatalogEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CatalogEntry {
    name: String,
    #[serde(default)]
    kind: CatalogKind,
    #[serde(default)]
    nested: bool,
    alias: Option<String>,
    #[serde(default)]
    mapped_types: Vec<String>,
    #[serde(default)]
    mapped_column_types: Vec<ColumnType>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
enum CatalogKind {
    #[default]
    Concrete,
    Interface,
}

impl From<CatalogEntry> for TypeDescriptor {
    fn from(entry: CatalogEntry) -> Self {
        TypeDescriptor {
            name: TypeRef::from(entry.name),
            kind: match entry.kind {
                CatalogKind::Concrete => TypeKind::Concrete,
                CatalogKind::Interface => TypeKind::Interface,
            },
            nested: entry.nested,
            alias: entry.alias,
            mapped_types: entry.mapped_types.into_iter().map(TypeRef::from).collect(),
            mapped_column_types: entry.mapped_column_types,
        }
    }
}

/// A [`TypeEnumerator`] over a fixed set of registered types.
///
/// # Examples
///
/// ```rust
/// use mapcfg::adapters::StaticTypeCatalog;
/// use mapcfg::ports::{TypeDescriptor, TypeEnumerator};
///
/// let catalog = StaticTypeCatalog::new()
///     .with_type(TypeDescriptor::concrete("com.example.model.Emp"))
///     .with_type(TypeDescriptor::interface("com.example.dao.EmpMapper"));
///
/// assert_eq!(catalog.types_in("com.example.model").len(), 1);
/// assert!(catalog.types_in("com.example").is_empty());
/// ```
#[derive(Debug, Clone, Default)]
pub struct StaticTypeCatalog {
    types: BTreeMap<TypeRef, TypeDescriptor>,
}

impl StaticTypeCatalog {
    /// Creates an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a YAML catalog.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ParseError` when the YAML is malformed.
    pub fn from_yaml(content: &str) -> Result<Self> {
        let file: CatalogFile = serde_yaml::from_str(content).map_err(|e| ConfigError::ParseError {
            message: format!("Failed to parse type catalog: {}", e),
            source: Some(Box::new(e)),
        })?;
        Ok(file
            .types
            .into_iter()
            .map(TypeDescriptor::from)
            .fold(Self::new(), Self::with_type))
    }

    /// Adds a type, replacing an earlier entry with the same name.
    pub fn with_type(mut self, descriptor: TypeDescriptor) -> Self {
        self.register(descriptor);
        self
    }

    /// Adds a type, replacing an earlier entry with the same name.
    pub fn register(&mut self, descriptor: TypeDescriptor) {
        self.types.insert(descriptor.name.clone(), descriptor);
    }

    /// Returns the number of known types.
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Returns `true` when no type is known.
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

impl TypeEnumerator for StaticTypeCatalog {
    fn types_in(&self, package: &str) -> Vec<TypeDescriptor> {
        self.types
            .values()
            .filter(|descriptor| descriptor.name.package() == Some(package))
            .cloned()
            .collect()
    }

    fn describe(&self, name: &TypeRef) -> Option<TypeDescriptor> {
        self.types.get(name).cloned()
    }
}
