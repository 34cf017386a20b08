// SPDX-License-Identifier: MIT OR Apache-2.0

//! The configuration aggregate populated by a build.
//!
//! A [`Configuration`] is created with the built-in aliases and type handlers,
//! mutated by exactly one build and read-only afterwards. It is `Send + Sync`
//! so a session factory can share it behind an `Arc`.

use crate::domain::aliases::TypeAliasRegistry;
use crate::domain::environment::Environment;
use crate::domain::errors::{ConfigError, Result};
use crate::domain::mappers::{MappedStatement, MapperRegistry};
use crate::domain::settings::Settings;
use crate::domain::type_handlers::TypeHandlerRegistry;
use crate::domain::type_ref::TypeRef;
use crate::domain::variables::Properties;
use crate::ports::extensions::{Interceptor, ObjectFactory, ObjectWrapperFactory, ReflectorFactory};
use std::collections::{BTreeMap, BTreeSet};

/// An extension instance with the type and properties it was created from.
#[derive(Debug)]
pub struct Installed<T: ?Sized> {
    type_ref: TypeRef,
    properties: Properties,
    instance: Box<T>,
}

impl<T: ?Sized> Installed<T> {
    /// Wraps an instance created from `type_ref` and configured with `properties`.
    pub fn new(type_ref: TypeRef, properties: Properties, instance: Box<T>) -> Self {
        Installed {
            type_ref,
            properties,
            instance,
        }
    }

    /// Returns the type the instance was created from.
    pub fn type_ref(&self) -> &TypeRef {
        &self.type_ref
    }

    /// Returns the properties handed to the instance.
    pub fn properties(&self) -> &Properties {
        &self.properties
    }

    /// Returns the instance.
    pub fn instance(&self) -> &T {
        &self.instance
    }
}

/// The fully built configuration.
#[derive(Debug)]
pub struct Configuration {
    pub(crate) variables: Properties,
    pub(crate) settings: Settings,
    pub(crate) vfs_impls: Vec<TypeRef>,
    pub(crate) log_impl: Option<TypeRef>,
    pub(crate) type_aliases: TypeAliasRegistry,
    pub(crate) type_handlers: TypeHandlerRegistry,
    pub(crate) interceptors: Vec<Installed<dyn Interceptor>>,
    pub(crate) object_factory: Option<Installed<dyn ObjectFactory>>,
    pub(crate) object_wrapper_factory: Option<Installed<dyn ObjectWrapperFactory>>,
    pub(crate) reflector_factory: Option<Installed<dyn ReflectorFactory>>,
    pub(crate) environment: Option<Environment>,
    pub(crate) database_id: Option<String>,
    pub(crate) mappers: MapperRegistry,
    mapped_statements: BTreeMap<String, MappedStatement>,
    sql_fragments: BTreeMap<String, String>,
    loaded_resources: BTreeSet<String>,
}

impl Default for Configuration {
    fn default() -> Self {
        Self::new()
    }
}

impl Configuration {
    /// Creates a configuration holding only defaults and built-in registrations.
    pub fn new() -> Self {
        Configuration {
            variables: Properties::new(),
            settings: Settings::default(),
            vfs_impls: Vec::new(),
            log_impl: None,
            type_aliases: TypeAliasRegistry::with_builtins(),
            type_handlers: TypeHandlerRegistry::with_builtins(),
            interceptors: Vec::new(),
            object_factory: None,
            object_wrapper_factory: None,
            reflector_factory: None,
            environment: None,
            database_id: None,
            mappers: MapperRegistry::new(),
            mapped_statements: BTreeMap::new(),
            sql_fragments: BTreeMap::new(),
            loaded_resources: BTreeSet::new(),
        }
    }

    /// Returns the resolved variables.
    pub fn variables(&self) -> &Properties {
        &self.variables
    }

    /// Returns the runtime settings.
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Returns the custom virtual file system implementations, in declaration order.
    pub fn vfs_impls(&self) -> &[TypeRef] {
        &self.vfs_impls
    }

    /// Returns the selected log implementation.
    pub fn log_impl(&self) -> Option<&TypeRef> {
        self.log_impl.as_ref()
    }

    /// Returns the type alias registry.
    pub fn type_aliases(&self) -> &TypeAliasRegistry {
        &self.type_aliases
    }

    /// Returns the type handler registry.
    pub fn type_handlers(&self) -> &TypeHandlerRegistry {
        &self.type_handlers
    }

    /// Returns the interceptors in installation order.
    pub fn interceptors(&self) -> &[Installed<dyn Interceptor>] {
        &self.interceptors
    }

    /// Returns the object factory override.
    pub fn object_factory(&self) -> Option<&Installed<dyn ObjectFactory>> {
        self.object_factory.as_ref()
    }

    /// Returns the object wrapper factory override.
    pub fn object_wrapper_factory(&self) -> Option<&Installed<dyn ObjectWrapperFactory>> {
        self.object_wrapper_factory.as_ref()
    }

    /// Returns the reflector factory override.
    pub fn reflector_factory(&self) -> Option<&Installed<dyn ReflectorFactory>> {
        self.reflector_factory.as_ref()
    }

    /// Returns the selected environment, absent when no environments were declared.
    pub fn environment(&self) -> Option<&Environment> {
        self.environment.as_ref()
    }

    /// Returns the detected database id.
    pub fn database_id(&self) -> Option<&str> {
        self.database_id.as_deref()
    }

    /// Returns the mapper registry.
    pub fn mappers(&self) -> &MapperRegistry {
        &self.mappers
    }

    /// Returns a compiled statement by its fully qualified id.
    pub fn mapped_statement(&self, id: &str) -> Option<&MappedStatement> {
        self.mapped_statements.get(id)
    }

    /// Iterates over the compiled statements in id order.
    pub fn mapped_statements(&self) -> impl Iterator<Item = &MappedStatement> {
        self.mapped_statements.values()
    }

    /// Adds a compiled statement, rejecting a second statement with the same id.
    pub fn add_mapped_statement(&mut self, statement: MappedStatement) -> Result<()> {
        if self.mapped_statements.contains_key(&statement.id) {
            return Err(ConfigError::DuplicateStatement { id: statement.id });
        }
        tracing::debug!(id = %statement.id, kind = %statement.kind, "Added mapped statement");
        self.mapped_statements.insert(statement.id.clone(), statement);
        Ok(())
    }

    /// Returns a shared SQL fragment by its fully qualified id.
    pub fn sql_fragment(&self, id: &str) -> Option<&str> {
        self.sql_fragments.get(id).map(String::as_str)
    }

    /// Stores a shared SQL fragment; a later fragment with the same id replaces it.
    pub fn add_sql_fragment(&mut self, id: impl Into<String>, text: impl Into<String>) {
        self.sql_fragments.insert(id.into(), text.into());
    }

    /// Returns `true` if the mapping resource has already been compiled.
    pub fn is_resource_loaded(&self, resource: &str) -> bool {
        self.loaded_resources.contains(resource)
    }

    /// Records a mapping resource as compiled.
    pub fn add_loaded_resource(&mut self, resource: impl Into<String>) {
        self.loaded_resources.insert(resource.into());
    }

    /// Iterates over the compiled mapping resources.
    pub fn loaded_resources(&self) -> impl Iterator<Item = &str> {
        self.loaded_resources.iter().map(String::as_str)
    }
}
