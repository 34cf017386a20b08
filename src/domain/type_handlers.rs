// SPDX-License-Identifier: MIT OR Apache-2.0

//! Type handler registry keyed by value type and optional column type.
//!
//! A handler registered with a column type applies to that pair only. A handler
//! registered without one applies to every column type of its value type and is
//! the fallback for lookups that find no exact pair.

use crate::domain::column_type::ColumnType;
use crate::domain::type_ref::TypeRef;
use crate::ports::extensions::TypeHandler;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Built-in handlers as `(value type, handler type)` pairs.
pub const BUILTIN_HANDLERS: &[(&str, &str)] = &[
    ("String", "mapcfg.type.StringTypeHandler"),
    ("i8", "mapcfg.type.ByteTypeHandler"),
    ("i16", "mapcfg.type.ShortTypeHandler"),
    ("i32", "mapcfg.type.IntegerTypeHandler"),
    ("i64", "mapcfg.type.LongTypeHandler"),
    ("f32", "mapcfg.type.FloatTypeHandler"),
    ("f64", "mapcfg.type.DoubleTypeHandler"),
    ("bool", "mapcfg.type.BooleanTypeHandler"),
    ("char", "mapcfg.type.CharTypeHandler"),
    ("Decimal", "mapcfg.type.DecimalTypeHandler"),
    ("Vec<u8>", "mapcfg.type.ByteArrayTypeHandler"),
    ("Date", "mapcfg.type.DateTypeHandler"),
    ("Timestamp", "mapcfg.type.TimestampTypeHandler"),
];

/// Handler for one of the built-in scalar value types.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScalarTypeHandler {
    value_type: TypeRef,
}

impl ScalarTypeHandler {
    /// Creates a handler for `value_type`.
    pub fn new(value_type: impl Into<TypeRef>) -> Self {
        ScalarTypeHandler {
            value_type: value_type.into(),
        }
    }

    /// Returns the value type this handler converts.
    pub fn value_type(&self) -> &TypeRef {
        &self.value_type
    }
}

impl TypeHandler for ScalarTypeHandler {}

/// A handler instance together with the type it was created from.
#[derive(Clone, Debug)]
pub struct RegisteredHandler {
    handler_type: TypeRef,
    instance: Arc<dyn TypeHandler>,
}

impl RegisteredHandler {
    /// Pairs a handler instance with its type.
    pub fn new(handler_type: TypeRef, instance: Arc<dyn TypeHandler>) -> Self {
        RegisteredHandler {
            handler_type,
            instance,
        }
    }

    /// Returns the handler type.
    pub fn handler_type(&self) -> &TypeRef {
        &self.handler_type
    }

    /// Returns the handler instance.
    pub fn instance(&self) -> &Arc<dyn TypeHandler> {
        &self.instance
    }
}

/// Maps `(value type, column type)` pairs to handlers.
#[derive(Clone, Debug, Default)]
pub struct TypeHandlerRegistry {
    handlers: BTreeMap<(TypeRef, Option<ColumnType>), RegisteredHandler>,
    unmapped: Vec<RegisteredHandler>,
}

impl TypeHandlerRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry holding the built-in scalar handlers.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        for (value_type, handler_type) in BUILTIN_HANDLERS {
            registry.register(
                TypeRef::from(*value_type),
                None,
                RegisteredHandler::new(
                    TypeRef::from(*handler_type),
                    Arc::new(ScalarTypeHandler::new(*value_type)),
                ),
            );
        }
        registry
    }

    /// Registers `handler` for `value_type`, scoped to `column_type` when given.
    ///
    /// A later registration for the same key replaces the earlier one.
    pub fn register(
        &mut self,
        value_type: TypeRef,
        column_type: Option<ColumnType>,
        handler: RegisteredHandler,
    ) {
        tracing::debug!(
            value_type = %value_type,
            column_type = column_type.map(|c| c.as_str()).unwrap_or("*"),
            handler = %handler.handler_type(),
            "Registered type handler"
        );
        self.handlers.insert((value_type, column_type), handler);
    }

    /// Keeps a handler whose value type is not known.
    pub fn register_unmapped(&mut self, handler: RegisteredHandler) {
        tracing::debug!(handler = %handler.handler_type(), "Registered unmapped type handler");
        self.unmapped.push(handler);
    }

    /// Finds the handler for a value type and column type.
    ///
    /// An exact `(value type, column type)` entry wins; otherwise the entry
    /// registered for the value type alone is returned.
    pub fn lookup(&self, value_type: &TypeRef, column_type: Option<ColumnType>) -> Option<&RegisteredHandler> {
        column_type
            .and_then(|column| self.handlers.get(&(value_type.clone(), Some(column))))
            .or_else(|| self.handlers.get(&(value_type.clone(), None)))
    }

    /// Returns `true` if any handler applies to `value_type`.
    pub fn has_handler(&self, value_type: &TypeRef) -> bool {
        self.handlers.keys().any(|(v, _)| v == value_type)
    }

    /// Returns the handlers registered without a value type.
    pub fn unmapped(&self) -> &[RegisteredHandler] {
        &self.unmapped
    }

    /// Returns the number of mapped entries.
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    /// Returns `true` when nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty() && self.unmapped.is_empty()
    }
}
