// SPDX-License-Identifier: MIT OR Apache-2.0

//! Case-insensitive type alias registry.

use crate::domain::errors::{ConfigError, Result};
use crate::domain::type_ref::TypeRef;
use once_cell::sync::Lazy;
use std::collections::BTreeMap;

/// Canonical names of the extensions that ship with the crate.
pub mod builtin {
    /// `JDBC` transaction factory.
    pub const JDBC_TRANSACTION: &str = "mapcfg.transaction.JdbcTransactionFactory";
    /// `MANAGED` transaction factory.
    pub const MANAGED_TRANSACTION: &str = "mapcfg.transaction.ManagedTransactionFactory";
    /// `POOLED` data source factory.
    pub const POOLED_DATA_SOURCE: &str = "mapcfg.datasource.PooledDataSourceFactory";
    /// `UNPOOLED` data source factory.
    pub const UNPOOLED_DATA_SOURCE: &str = "mapcfg.datasource.UnpooledDataSourceFactory";
    /// `DB_VENDOR` database id provider.
    pub const VENDOR_DATABASE_ID: &str = "mapcfg.mapping.VendorDatabaseIdProvider";
    /// `TRACING` log implementation.
    pub const TRACING_LOG: &str = "mapcfg.logging.TracingLog";
    /// `STDOUT_LOGGING` log implementation.
    pub const STDOUT_LOG: &str = "mapcfg.logging.StdOutLog";
    /// `NO_LOGGING` log implementation.
    pub const NO_LOG: &str = "mapcfg.logging.NoLog";
    /// `YAML` scripting language driver.
    pub const YAML_LANGUAGE: &str = "mapcfg.scripting.YamlLanguageDriver";
    /// `RAW` scripting language driver.
    pub const RAW_LANGUAGE: &str = "mapcfg.scripting.RawLanguageDriver";
    /// Object factory used when none is declared.
    pub const DEFAULT_OBJECT_FACTORY: &str = "mapcfg.reflection.DefaultObjectFactory";
    /// Object wrapper factory used when none is declared.
    pub const DEFAULT_OBJECT_WRAPPER_FACTORY: &str = "mapcfg.reflection.DefaultObjectWrapperFactory";
    /// Reflector factory used when none is declared.
    pub const DEFAULT_REFLECTOR_FACTORY: &str = "mapcfg.reflection.DefaultReflectorFactory";
}

static BUILTIN_ALIASES: Lazy<Vec<(&'static str, &'static str)>> = Lazy::new(|| {
    vec![
        ("string", "String"),
        ("byte", "i8"),
        ("short", "i16"),
        ("int", "i32"),
        ("integer", "i32"),
        ("long", "i64"),
        ("float", "f32"),
        ("double", "f64"),
        ("boolean", "bool"),
        ("bool", "bool"),
        ("char", "char"),
        ("decimal", "Decimal"),
        ("bytes", "Vec<u8>"),
        ("date", "Date"),
        ("timestamp", "Timestamp"),
        ("map", "Map"),
        ("list", "List"),
        ("object", "Object"),
        ("jdbc", builtin::JDBC_TRANSACTION),
        ("managed", builtin::MANAGED_TRANSACTION),
        ("pooled", builtin::POOLED_DATA_SOURCE),
        ("unpooled", builtin::UNPOOLED_DATA_SOURCE),
        ("db_vendor", builtin::VENDOR_DATABASE_ID),
        ("tracing", builtin::TRACING_LOG),
        ("stdout_logging", builtin::STDOUT_LOG),
        ("no_logging", builtin::NO_LOG),
        ("yaml", builtin::YAML_LANGUAGE),
        ("raw", builtin::RAW_LANGUAGE),
    ]
});

/// Maps lower-cased alias names to canonical type names.
///
/// # Examples
///
/// ```
/// use mapcfg::domain::{TypeAliasRegistry, TypeRef};
///
/// let mut aliases = TypeAliasRegistry::new();
/// aliases.register("Emp", TypeRef::from("com.example.Emp")).unwrap();
///
/// assert_eq!(aliases.resolve("EMP"), TypeRef::from("com.example.Emp"));
/// assert_eq!(aliases.resolve("com.example.Dept"), TypeRef::from("com.example.Dept"));
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TypeAliasRegistry {
    aliases: BTreeMap<String, TypeRef>,
}

impl TypeAliasRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry holding the primitive and built-in extension aliases.
    pub fn with_builtins() -> Self {
        let aliases = BUILTIN_ALIASES
            .iter()
            .map(|(alias, type_name)| (alias.to_string(), TypeRef::from(*type_name)))
            .collect();
        TypeAliasRegistry { aliases }
    }

    /// Registers `alias` for `type_ref`.
    ///
    /// Registering the same alias for the same type again is a no-op; for a
    /// different type it fails with [`ConfigError::DuplicateAlias`].
    pub fn register(&mut self, alias: &str, type_ref: TypeRef) -> Result<()> {
        let key = alias.to_lowercase();
        match self.aliases.get(&key) {
            Some(existing) if *existing != type_ref => Err(ConfigError::DuplicateAlias {
                alias: key,
                existing: existing.to_string(),
                requested: type_ref.into_string(),
            }),
            Some(_) => Ok(()),
            None => {
                tracing::debug!(alias = %key, type_ref = %type_ref, "Registered type alias");
                self.aliases.insert(key, type_ref);
                Ok(())
            }
        }
    }

    /// Returns the type registered for `alias`, ignoring case.
    pub fn get(&self, alias: &str) -> Option<&TypeRef> {
        self.aliases.get(&alias.to_lowercase())
    }

    /// Resolves an alias, or treats `name` as a canonical type name when it is not one.
    pub fn resolve(&self, name: &str) -> TypeRef {
        self.get(name)
            .cloned()
            .unwrap_or_else(|| TypeRef::from(name))
    }

    /// Returns `true` if `alias` is registered.
    pub fn contains(&self, alias: &str) -> bool {
        self.get(alias).is_some()
    }

    /// Iterates over `(alias, type)` pairs in alias order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &TypeRef)> {
        self.aliases.iter().map(|(alias, type_ref)| (alias.as_str(), type_ref))
    }

    /// Returns the number of registered aliases.
    pub fn len(&self) -> usize {
        self.aliases.len()
    }

    /// Returns `true` when no alias is registered.
    pub fn is_empty(&self) -> bool {
        self.aliases.is_empty()
    }
}
