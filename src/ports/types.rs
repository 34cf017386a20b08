// SPDX-License-Identifier: MIT OR Apache-2.0

//! Type enumerator trait definition.
//!
//! Package scans for type aliases, type handlers and mappers ask a
//! [`TypeEnumerator`] which types live under a package, and single declarations
//! ask it to describe a named type.

use crate::domain::{ColumnType, TypeRef};

/// Whether a type is a concrete type or an interface.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TypeKind {
    /// A concrete, instantiable type.
    Concrete,
    /// An interface (mapper candidate).
    Interface,
}

/// What the enumerator knows about one type.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TypeDescriptor {
    /// The canonical type name.
    pub name: TypeRef,
    /// Concrete type or interface.
    pub kind: TypeKind,
    /// `true` for types nested inside another type.
    pub nested: bool,
    /// Alias declared on the type itself, preferred over the simple name.
    pub alias: Option<String>,
    /// Value types a handler type declares it converts.
    pub mapped_types: Vec<TypeRef>,
    /// Column types a handler type declares it converts.
    pub mapped_column_types: Vec<ColumnType>,
}

impl TypeDescriptor {
    /// Describes a top-level concrete type with no markers.
    pub fn concrete(name: impl Into<TypeRef>) -> Self {
        TypeDescriptor {
            name: name.into(),
            kind: TypeKind::Concrete,
            nested: false,
            alias: None,
            mapped_types: Vec::new(),
            mapped_column_types: Vec::new(),
        }
    }

    /// Describes a top-level interface.
    pub fn interface(name: impl Into<TypeRef>) -> Self {
        TypeDescriptor {
            kind: TypeKind::Interface,
            ..Self::concrete(name)
        }
    }

    /// Marks the type as nested.
    pub fn nested(mut self) -> Self {
        self.nested = true;
        self
    }

    /// Sets the alias marker.
    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    /// Adds a value type the handler converts.
    pub fn with_mapped_type(mut self, value_type: impl Into<TypeRef>) -> Self {
        self.mapped_types.push(value_type.into());
        self
    }

    /// Adds a column type the handler converts.
    pub fn with_mapped_column_type(mut self, column_type: ColumnType) -> Self {
        self.mapped_column_types.push(column_type);
        self
    }

    /// Returns `true` for interfaces.
    pub fn is_interface(&self) -> bool {
        self.kind == TypeKind::Interface
    }

    /// Returns `true` for top-level concrete types, the ones package scans register.
    pub fn is_registrable(&self) -> bool {
        self.kind == TypeKind::Concrete && !self.nested
    }

    /// Returns the alias marker, or the simple name when there is none.
    pub fn alias_or_simple_name(&self) -> &str {
        self.alias
            .as_deref()
            .unwrap_or_else(|| self.name.simple_name())
    }
}

/// Lists and describes the types known to the application.
pub trait TypeEnumerator: Send + Sync {
    /// Returns every type directly under `package`, in a stable order.
    fn types_in(&self, package: &str) -> Vec<TypeDescriptor>;

    /// Describes a single type, or `None` if it is unknown.
    fn describe(&self, name: &TypeRef) -> Option<TypeDescriptor>;
}
