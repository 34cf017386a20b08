// SPDX-License-Identifier: MIT OR Apache-2.0

//! Extensions that ship with the crate.
//!
//! These are registered under the canonical names in
//! [`domain::aliases::builtin`](crate::domain::aliases::builtin) and reachable from
//! documents through the `JDBC`, `MANAGED`, `POOLED`, `UNPOOLED` and `DB_VENDOR`
//! aliases.

use crate::domain::setting_value::SettingValue;
use crate::domain::{ConfigError, Properties, Result};
use crate::ports::{
    DataSource, DataSourceFactory, DatabaseIdProvider, ObjectFactory, ObjectWrapperFactory,
    ReflectorFactory, TransactionFactory,
};

/// Prefix of data source properties passed through to the driver.
pub const DRIVER_PROPERTY_PREFIX: &str = "driver.";

const UNPOOLED_PROPERTIES: &[&str] = &[
    "driver",
    "url",
    "username",
    "password",
    "autoCommit",
    "defaultTransactionIsolationLevel",
    "defaultNetworkTimeout",
];

const POOL_PROPERTIES: &[&str] = &[
    "poolMaximumActiveConnections",
    "poolMaximumIdleConnections",
    "poolMaximumCheckoutTime",
    "poolTimeToWait",
    "poolMaximumLocalBadConnectionTolerance",
    "poolPingQuery",
    "poolPingEnabled",
    "poolPingConnectionsNotUsedFor",
];

/// Product names by URL scheme.
const PRODUCT_NAMES: &[(&str, &str)] = &[
    ("db2", "DB2"),
    ("derby", "Apache Derby"),
    ("h2", "H2"),
    ("hsqldb", "HSQL Database Engine"),
    ("mariadb", "MariaDB"),
    ("mysql", "MySQL"),
    ("oracle", "Oracle"),
    ("postgresql", "PostgreSQL"),
    ("sqlite", "SQLite"),
    ("sqlserver", "Microsoft SQL Server"),
];

fn flag(key: &str, raw: &str) -> Result<bool> {
    SettingValue::new(key, raw).as_bool()
}

fn integer(key: &str, raw: &str) -> Result<i32> {
    SettingValue::new(key, raw).as_i32()
}

/// Transaction factory that manages commit and rollback on the connection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JdbcTransactionFactory {
    skip_set_auto_commit_on_close: bool,
}

impl JdbcTransactionFactory {
    /// Returns `true` if auto-commit is left untouched when a connection closes.
    pub fn skip_set_auto_commit_on_close(&self) -> bool {
        self.skip_set_auto_commit_on_close
    }
}

impl TransactionFactory for JdbcTransactionFactory {
    fn set_properties(&mut self, properties: &Properties) -> Result<()> {
        if let Some(raw) = properties.get("skipSetAutoCommitOnClose") {
            self.skip_set_auto_commit_on_close = flag("skipSetAutoCommitOnClose", raw)?;
        }
        Ok(())
    }
}

/// Transaction factory that leaves the transaction lifecycle to a container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManagedTransactionFactory {
    close_connection: bool,
}

impl Default for ManagedTransactionFactory {
    fn default() -> Self {
        ManagedTransactionFactory {
            close_connection: true,
        }
    }
}

impl ManagedTransactionFactory {
    /// Returns `true` if connections are closed when the transaction ends.
    pub fn close_connection(&self) -> bool {
        self.close_connection
    }
}

impl TransactionFactory for ManagedTransactionFactory {
    fn set_properties(&mut self, properties: &Properties) -> Result<()> {
        if let Some(raw) = properties.get("closeConnection") {
            self.close_connection = flag("closeConnection", raw)?;
        }
        Ok(())
    }
}

/// Pool tuning of a pooled data source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolSettings {
    /// Maximum number of active connections.
    pub maximum_active_connections: i32,
    /// Maximum number of idle connections.
    pub maximum_idle_connections: i32,
    /// Milliseconds a connection may be checked out before it is reclaimed.
    pub maximum_checkout_time: i32,
    /// Milliseconds to wait before logging and retrying a checkout.
    pub time_to_wait: i32,
    /// Bad connections tolerated per thread before giving up.
    pub maximum_local_bad_connection_tolerance: i32,
    /// Query sent to test a connection.
    pub ping_query: String,
    /// Whether connections are pinged.
    pub ping_enabled: bool,
    /// Milliseconds of idleness after which a connection is pinged.
    pub ping_connections_not_used_for: i32,
}

impl Default for PoolSettings {
    fn default() -> Self {
        PoolSettings {
            maximum_active_connections: 10,
            maximum_idle_connections: 5,
            maximum_checkout_time: 20_000,
            time_to_wait: 20_000,
            maximum_local_bad_connection_tolerance: 3,
            ping_query: "NO PING QUERY SET".to_string(),
            ping_enabled: false,
            ping_connections_not_used_for: 0,
        }
    }
}

impl PoolSettings {
    fn apply(&mut self, key: &str, raw: &str) -> Result<()> {
        match key {
            "poolMaximumActiveConnections" => self.maximum_active_connections = integer(key, raw)?,
            "poolMaximumIdleConnections" => self.maximum_idle_connections = integer(key, raw)?,
            "poolMaximumCheckoutTime" => self.maximum_checkout_time = integer(key, raw)?,
            "poolTimeToWait" => self.time_to_wait = integer(key, raw)?,
            "poolMaximumLocalBadConnectionTolerance" => {
                self.maximum_local_bad_connection_tolerance = integer(key, raw)?
            }
            "poolPingQuery" => self.ping_query = raw.to_string(),
            "poolPingEnabled" => self.ping_enabled = flag(key, raw)?,
            "poolPingConnectionsNotUsedFor" => self.ping_connections_not_used_for = integer(key, raw)?,
            _ => {}
        }
        Ok(())
    }
}

/// Data source produced by the built-in factories.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfiguredDataSource {
    /// Driver name.
    pub driver: Option<String>,
    /// Connection URL.
    pub url: Option<String>,
    /// User name.
    pub username: Option<String>,
    /// Password.
    pub password: Option<String>,
    /// Auto-commit mode of new connections.
    pub auto_commit: Option<bool>,
    /// Default transaction isolation level.
    pub default_transaction_isolation_level: Option<i32>,
    /// Default network timeout in milliseconds.
    pub default_network_timeout: Option<i32>,
    /// `driver.*` properties with the prefix removed.
    pub driver_properties: Properties,
    /// Pool tuning, present for pooled data sources.
    pub pool: Option<PoolSettings>,
}

impl ConfiguredDataSource {
    fn apply(&mut self, key: &str, raw: &str) -> Result<()> {
        match key {
            "driver" => self.driver = Some(raw.to_string()),
            "url" => self.url = Some(raw.to_string()),
            "username" => self.username = Some(raw.to_string()),
            "password" => self.password = Some(raw.to_string()),
            "autoCommit" => self.auto_commit = Some(flag(key, raw)?),
            "defaultTransactionIsolationLevel" => {
                self.default_transaction_isolation_level = Some(integer(key, raw)?)
            }
            "defaultNetworkTimeout" => self.default_network_timeout = Some(integer(key, raw)?),
            _ => {}
        }
        Ok(())
    }

    /// Returns the URL scheme naming the database, e.g. `mysql` for `jdbc:mysql://host/db`.
    pub fn scheme(&self) -> Option<&str> {
        let url = self.url.as_deref()?;
        let url = url.strip_prefix("jdbc:").unwrap_or(url);
        url.split(':').next().filter(|scheme| !scheme.is_empty())
    }
}

impl DataSource for ConfiguredDataSource {
    fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }

    fn product_name(&self) -> Result<String> {
        let scheme = self.scheme().ok_or_else(|| ConfigError::MissingAttribute {
            element: "dataSource".to_string(),
            attribute: "url".to_string(),
        })?;
        Ok(PRODUCT_NAMES
            .iter()
            .find(|(known, _)| known.eq_ignore_ascii_case(scheme))
            .map(|(_, name)| name.to_string())
            .unwrap_or_else(|| scheme.to_string()))
    }
}

fn configure(pooled: bool, properties: &Properties) -> Result<ConfiguredDataSource> {
    let mut data_source = ConfiguredDataSource {
        pool: pooled.then(PoolSettings::default),
        ..Default::default()
    };
    for (key, raw) in properties {
        if let Some(driver_key) = key.strip_prefix(DRIVER_PROPERTY_PREFIX) {
            data_source
                .driver_properties
                .insert(driver_key.to_string(), raw.clone());
        } else if UNPOOLED_PROPERTIES.contains(&key.as_str()) {
            data_source.apply(key, raw)?;
        } else {
            match data_source.pool.as_mut() {
                Some(pool) if POOL_PROPERTIES.contains(&key.as_str()) => pool.apply(key, raw)?,
                _ => {
                    return Err(ConfigError::UnknownProperty {
                        owner: if pooled { "POOLED data source" } else { "UNPOOLED data source" }
                            .to_string(),
                        key: key.clone(),
                    })
                }
            }
        }
    }
    Ok(data_source)
}

/// Factory for data sources that open a new connection per request.
#[derive(Debug, Clone, Default)]
pub struct UnpooledDataSourceFactory {
    data_source: ConfiguredDataSource,
}

impl DataSourceFactory for UnpooledDataSourceFactory {
    fn set_properties(&mut self, properties: &Properties) -> Result<()> {
        self.data_source = configure(false, properties)?;
        Ok(())
    }

    fn data_source(&self) -> Result<Box<dyn DataSource>> {
        Ok(Box::new(self.data_source.clone()))
    }
}

/// Factory for data sources that pool connections.
#[derive(Debug, Clone)]
pub struct PooledDataSourceFactory {
    data_source: ConfiguredDataSource,
}

impl Default for PooledDataSourceFactory {
    fn default() -> Self {
        PooledDataSourceFactory {
            data_source: ConfiguredDataSource {
                pool: Some(PoolSettings::default()),
                ..Default::default()
            },
        }
    }
}

impl DataSourceFactory for PooledDataSourceFactory {
    fn set_properties(&mut self, properties: &Properties) -> Result<()> {
        self.data_source = configure(true, properties)?;
        Ok(())
    }

    fn data_source(&self) -> Result<Box<dyn DataSource>> {
        Ok(Box::new(self.data_source.clone()))
    }
}

/// Derives the database id from the product name of the data source.
///
/// Without properties the id is the product name itself. With properties, the id
/// is the value of the first property whose key occurs in the product name, or
/// none when no key matches.
#[derive(Debug, Clone, Default)]
pub struct VendorDatabaseIdProvider {
    properties: Properties,
}

impl DatabaseIdProvider for VendorDatabaseIdProvider {
    fn set_properties(&mut self, properties: &Properties) -> Result<()> {
        self.properties = properties.clone();
        Ok(())
    }

    fn database_id(&self, data_source: &dyn DataSource) -> Result<Option<String>> {
        let product = data_source.product_name()?;
        if self.properties.is_empty() {
            return Ok(Some(product));
        }
        Ok(self
            .properties
            .iter()
            .find(|(key, _)| product.contains(key.as_str()))
            .map(|(_, id)| id.clone()))
    }
}

/// Object factory used when the document declares none.
#[derive(Debug, Clone, Default)]
pub struct DefaultObjectFactory {
    properties: Properties,
}

impl DefaultObjectFactory {
    /// Returns the properties the factory was configured with.
    pub fn properties(&self) -> &Properties {
        &self.properties
    }
}

impl ObjectFactory for DefaultObjectFactory {
    fn set_properties(&mut self, properties: &Properties) -> Result<()> {
        self.properties = properties.clone();
        Ok(())
    }
}

/// Object wrapper factory used when the document declares none.
#[derive(Debug, Clone, Default)]
pub struct DefaultObjectWrapperFactory;

impl ObjectWrapperFactory for DefaultObjectWrapperFactory {}

/// Reflector factory used when the document declares none.
#[derive(Debug, Clone)]
pub struct DefaultReflectorFactory {
    class_cache_enabled: bool,
}

impl Default for DefaultReflectorFactory {
    fn default() -> Self {
        DefaultReflectorFactory {
            class_cache_enabled: true,
        }
    }
}

impl DefaultReflectorFactory {
    /// Returns `true` if reflective metadata is cached.
    pub fn class_cache_enabled(&self) -> bool {
        self.class_cache_enabled
    }
}

impl ReflectorFactory for DefaultReflectorFactory {}
