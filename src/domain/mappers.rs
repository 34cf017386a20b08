// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mapper interfaces and the statements compiled from mapping documents.

use crate::domain::errors::{ConfigError, Result};
use crate::domain::type_ref::TypeRef;
use std::collections::BTreeSet;

keyword_enum! {
    /// The kind of a mapped statement.
    pub enum StatementKind {
        Select => "select",
        Insert => "insert",
        Update => "update",
        Delete => "delete",
    }
}

/// A statement compiled from a mapping document.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MappedStatement {
    /// Fully qualified id, `namespace.id`.
    pub id: String,
    /// Statement kind.
    pub kind: StatementKind,
    /// Resolved parameter type, if declared.
    pub parameter_type: Option<TypeRef>,
    /// Resolved result type, if declared.
    pub result_type: Option<TypeRef>,
    /// Database id the statement is restricted to, if any.
    pub database_id: Option<String>,
    /// Statement text with fragments expanded.
    pub sql: String,
    /// The mapping resource the statement came from.
    pub resource: String,
}

/// The set of registered mapper interfaces.
///
/// # Examples
///
/// ```
/// use mapcfg::domain::{ConfigError, MapperRegistry, TypeRef};
///
/// let mut mappers = MapperRegistry::new();
/// mappers.add(TypeRef::from("com.example.EmpMapper")).unwrap();
///
/// let error = mappers.add(TypeRef::from("com.example.EmpMapper")).unwrap_err();
/// assert!(matches!(error, ConfigError::DuplicateMapper { .. }));
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MapperRegistry {
    mappers: BTreeSet<TypeRef>,
}

impl MapperRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a mapper interface, rejecting duplicates.
    pub fn add(&mut self, mapper: TypeRef) -> Result<()> {
        if self.mappers.contains(&mapper) {
            return Err(ConfigError::DuplicateMapper {
                mapper: mapper.into_string(),
            });
        }
        tracing::debug!(mapper = %mapper, "Registered mapper");
        self.mappers.insert(mapper);
        Ok(())
    }

    /// Returns `true` if `mapper` is registered.
    pub fn has(&self, mapper: &TypeRef) -> bool {
        self.mappers.contains(mapper)
    }

    /// Iterates over the registered mappers in name order.
    pub fn iter(&self) -> impl Iterator<Item = &TypeRef> {
        self.mappers.iter()
    }

    /// Returns the number of registered mappers.
    pub fn len(&self) -> usize {
        self.mappers.len()
    }

    /// Returns `true` when no mapper is registered.
    pub fn is_empty(&self) -> bool {
        self.mappers.is_empty()
    }
}
