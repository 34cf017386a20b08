// SPDX-License-Identifier: MIT OR Apache-2.0

//! Capability traits for the pluggable extensions a configuration installs.
//!
//! A document names extensions by type (`interceptor`, `type`, `handler`
//! attributes). The build looks the name up in the extension registry, constructs
//! a fresh instance and, where the capability is configurable, hands it the
//! property children declared next to it. Every capability is `Send + Sync` so
//! the finished configuration can be shared between threads.

use crate::domain::{Properties, Result};
use std::fmt;

/// A plugin that wraps runtime operations.
pub trait Interceptor: fmt::Debug + Send + Sync {
    /// Receives the properties declared on the plugin element.
    fn set_properties(&mut self, properties: &Properties) -> Result<()>;
}

/// Creates result objects.
pub trait ObjectFactory: fmt::Debug + Send + Sync {
    /// Receives the properties declared on the object factory element.
    fn set_properties(&mut self, properties: &Properties) -> Result<()>;
}

/// Wraps result objects for property access.
pub trait ObjectWrapperFactory: fmt::Debug + Send + Sync {}

/// Caches reflective metadata about result types.
pub trait ReflectorFactory: fmt::Debug + Send + Sync {}

/// Creates transactions for an environment.
pub trait TransactionFactory: fmt::Debug + Send + Sync {
    /// Receives the properties declared on the transaction manager element.
    fn set_properties(&mut self, properties: &Properties) -> Result<()>;
}

/// A configured connection source.
pub trait DataSource: fmt::Debug + Send + Sync {
    /// Returns the connection URL, if one was configured.
    fn url(&self) -> Option<&str>;

    /// Returns the database product name the data source connects to.
    fn product_name(&self) -> Result<String>;
}

/// Builds the data source of an environment.
pub trait DataSourceFactory: fmt::Debug + Send + Sync {
    /// Receives the properties declared on the data source element.
    ///
    /// Unknown properties fail with [`ConfigError::UnknownProperty`](crate::domain::ConfigError::UnknownProperty).
    fn set_properties(&mut self, properties: &Properties) -> Result<()>;

    /// Produces the configured data source.
    fn data_source(&self) -> Result<Box<dyn DataSource>>;
}

/// Derives a database id from a data source.
pub trait DatabaseIdProvider: fmt::Debug + Send + Sync {
    /// Receives the properties declared on the provider element.
    fn set_properties(&mut self, properties: &Properties) -> Result<()>;

    /// Returns the database id for `data_source`, or `None` when no id applies.
    fn database_id(&self, data_source: &dyn DataSource) -> Result<Option<String>>;
}

/// Converts between a value type and a column type.
pub trait TypeHandler: fmt::Debug + Send + Sync {}
