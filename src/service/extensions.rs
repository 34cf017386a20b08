// SPDX-License-Identifier: MIT OR Apache-2.0

//! Typed constructor tables for the extensions a document may name.
//!
//! Documents refer to extensions by canonical type name. Each capability has its
//! own [`FactoryTable`] mapping names to constructors, so a name registered as an
//! interceptor can never be instantiated as a data source factory.

use crate::adapters::builtins::{
    DefaultObjectFactory, DefaultObjectWrapperFactory, DefaultReflectorFactory,
    JdbcTransactionFactory, ManagedTransactionFactory, PooledDataSourceFactory,
    UnpooledDataSourceFactory, VendorDatabaseIdProvider,
};
use crate::domain::aliases::builtin;
use crate::domain::type_handlers::{ScalarTypeHandler, BUILTIN_HANDLERS};
use crate::domain::{ConfigError, Result, TypeRef};
use crate::ports::{
    DataSourceFactory, DatabaseIdProvider, Interceptor, ObjectFactory, ObjectWrapperFactory,
    ReflectorFactory, TransactionFactory, TypeHandler,
};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

type Constructor<T> = Arc<dyn Fn() -> Box<T> + Send + Sync>;

/// Constructors for one extension capability, keyed by canonical type name.
pub struct FactoryTable<T: ?Sized> {
    kind: &'static str,
    constructors: BTreeMap<TypeRef, Constructor<T>>,
}

impl<T: ?Sized> FactoryTable<T> {
    /// Creates an empty table; `kind` names the capability in error messages.
    pub fn new(kind: &'static str) -> Self {
        FactoryTable {
            kind,
            constructors: BTreeMap::new(),
        }
    }

    /// Registers a constructor, replacing any earlier one for the same name.
    pub fn register<F>(&mut self, name: impl Into<TypeRef>, constructor: F) -> &mut Self
    where
        F: Fn() -> Box<T> + Send + Sync + 'static,
    {
        self.constructors.insert(name.into(), Arc::new(constructor));
        self
    }

    /// Creates a fresh instance of `name`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ResourceNotFound` when no constructor is registered.
    pub fn create(&self, name: &TypeRef) -> Result<Box<T>> {
        let constructor = self
            .constructors
            .get(name)
            .ok_or_else(|| ConfigError::not_found(self.kind, name.as_str()))?;
        tracing::debug!(kind = self.kind, name = %name, "Creating extension");
        Ok(constructor())
    }

    /// Returns `true` if a constructor is registered for `name`.
    pub fn contains(&self, name: &TypeRef) -> bool {
        self.constructors.contains_key(name)
    }

    /// Iterates over the registered names.
    pub fn names(&self) -> impl Iterator<Item = &TypeRef> {
        self.constructors.keys()
    }
}

impl<T: ?Sized> Clone for FactoryTable<T> {
    fn clone(&self) -> Self {
        FactoryTable {
            kind: self.kind,
            constructors: self.constructors.clone(),
        }
    }
}

impl<T: ?Sized> fmt::Debug for FactoryTable<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FactoryTable")
            .field("kind", &self.kind)
            .field("names", &self.constructors.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// Constructor tables for every extension capability.
///
/// # Examples
///
/// ```rust
/// use mapcfg::domain::{Properties, Result, TypeRef};
/// use mapcfg::ports::Interceptor;
/// use mapcfg::service::ExtensionRegistry;
///
/// #[derive(Debug, Default)]
/// struct AuditInterceptor;
///
/// impl Interceptor for AuditInterceptor {
///     fn set_properties(&mut self, _properties: &Properties) -> Result<()> {
///         Ok(())
///     }
/// }
///
/// let mut extensions = ExtensionRegistry::new();
/// extensions
///     .interceptors
///     .register("com.example.AuditInterceptor", || Box::new(AuditInterceptor));
///
/// assert!(extensions.interceptors.create(&TypeRef::from("com.example.AuditInterceptor")).is_ok());
/// assert!(extensions.interceptors.create(&TypeRef::from("com.example.Nope")).is_err());
/// ```
#[derive(Clone, Debug)]
pub struct ExtensionRegistry {
    /// Plugin interceptors.
    pub interceptors: FactoryTable<dyn Interceptor>,
    /// Object factories.
    pub object_factories: FactoryTable<dyn ObjectFactory>,
    /// Object wrapper factories.
    pub object_wrapper_factories: FactoryTable<dyn ObjectWrapperFactory>,
    /// Reflector factories.
    pub reflector_factories: FactoryTable<dyn ReflectorFactory>,
    /// Transaction factories.
    pub transaction_factories: FactoryTable<dyn TransactionFactory>,
    /// Data source factories.
    pub data_source_factories: FactoryTable<dyn DataSourceFactory>,
    /// Database id providers.
    pub database_id_providers: FactoryTable<dyn DatabaseIdProvider>,
    /// Type handlers.
    pub type_handlers: FactoryTable<dyn TypeHandler>,
}

impl Default for ExtensionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ExtensionRegistry {
    /// Creates a registry holding the built-in extensions.
    pub fn new() -> Self {
        let mut registry = Self::empty();

        registry
            .transaction_factories
            .register(builtin::JDBC_TRANSACTION, || Box::<JdbcTransactionFactory>::default())
            .register(builtin::MANAGED_TRANSACTION, || {
                Box::<ManagedTransactionFactory>::default()
            });
        registry
            .data_source_factories
            .register(builtin::POOLED_DATA_SOURCE, || Box::<PooledDataSourceFactory>::default())
            .register(builtin::UNPOOLED_DATA_SOURCE, || {
                Box::<UnpooledDataSourceFactory>::default()
            });
        registry
            .database_id_providers
            .register(builtin::VENDOR_DATABASE_ID, || Box::<VendorDatabaseIdProvider>::default());
        registry
            .object_factories
            .register(builtin::DEFAULT_OBJECT_FACTORY, || Box::<DefaultObjectFactory>::default());
        registry
            .object_wrapper_factories
            .register(builtin::DEFAULT_OBJECT_WRAPPER_FACTORY, || {
                Box::new(DefaultObjectWrapperFactory)
            });
        registry
            .reflector_factories
            .register(builtin::DEFAULT_REFLECTOR_FACTORY, || {
                Box::<DefaultReflectorFactory>::default()
            });
        for (value_type, handler_type) in BUILTIN_HANDLERS {
            registry
                .type_handlers
                .register(*handler_type, move || Box::new(ScalarTypeHandler::new(*value_type)));
        }

        registry
    }

    /// Creates a registry with no constructors at all.
    pub fn empty() -> Self {
        ExtensionRegistry {
            interceptors: FactoryTable::new("interceptor"),
            object_factories: FactoryTable::new("object factory"),
            object_wrapper_factories: FactoryTable::new("object wrapper factory"),
            reflector_factories: FactoryTable::new("reflector factory"),
            transaction_factories: FactoryTable::new("transaction factory"),
            data_source_factories: FactoryTable::new("data source factory"),
            database_id_providers: FactoryTable::new("database id provider"),
            type_handlers: FactoryTable::new("type handler"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Properties;

    #[derive(Debug, Default)]
    struct CountingInterceptor {
        properties: Properties,
    }

    impl Interceptor for CountingInterceptor {
        fn set_properties(&mut self, properties: &Properties) -> Result<()> {
            self.properties = properties.clone();
            Ok(())
        }
    }

    #[test]
    fn test_builtins_are_registered() {
        let registry = ExtensionRegistry::new();
        assert!(registry
            .transaction_factories
            .contains(&TypeRef::from(builtin::JDBC_TRANSACTION)));
        assert!(registry
            .data_source_factories
            .contains(&TypeRef::from(builtin::POOLED_DATA_SOURCE)));
        assert!(registry
            .database_id_providers
            .contains(&TypeRef::from(builtin::VENDOR_DATABASE_ID)));
        assert_eq!(registry.type_handlers.names().count(), BUILTIN_HANDLERS.len());
        assert_eq!(registry.interceptors.names().count(), 0);
    }

    #[test]
    fn test_unknown_name_is_not_found() {
        let registry = ExtensionRegistry::new();
        let error = registry
            .interceptors
            .create(&TypeRef::from("com.example.Missing"))
            .unwrap_err();
        match error {
            ConfigError::ResourceNotFound { kind, name } => {
                assert_eq!(kind, "interceptor");
                assert_eq!(name, "com.example.Missing");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_capabilities_are_separate() {
        let mut registry = ExtensionRegistry::empty();
        registry
            .interceptors
            .register("com.example.Audit", || Box::<CountingInterceptor>::default());
        assert!(registry.interceptors.create(&TypeRef::from("com.example.Audit")).is_ok());
        assert!(registry
            .object_factories
            .create(&TypeRef::from("com.example.Audit"))
            .is_err());
    }

    #[test]
    fn test_each_create_is_a_fresh_instance() {
        let mut registry = ExtensionRegistry::empty();
        registry
            .interceptors
            .register("com.example.Audit", || Box::<CountingInterceptor>::default());
        let name = TypeRef::from("com.example.Audit");

        let mut first = registry.interceptors.create(&name).unwrap();
        let mut props = Properties::new();
        props.insert("level".to_string(), "high".to_string());
        first.set_properties(&props).unwrap();

        let second = registry.interceptors.create(&name).unwrap();
        assert!(format!("{:?}", second).contains("properties: {}"));
        assert!(format!("{:?}", first).contains("high"));
    }

    #[test]
    fn test_clone_shares_constructors() {
        let registry = ExtensionRegistry::new();
        let cloned = registry.clone();
        assert_eq!(
            cloned.transaction_factories.names().count(),
            registry.transaction_factories.names().count()
        );
    }
}
