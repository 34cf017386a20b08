// SPDX-License-Identifier: MIT OR Apache-2.0

//! Environment variable property source adapter.
//!
//! This module provides an adapter that turns environment variables into build
//! variable overrides.

use crate::domain::{Properties, Result};
use crate::ports::PropertySource;
use once_cell::sync::OnceCell;
use std::env;

/// Maximum allowed length for environment variable keys (512 bytes)
const MAX_ENV_KEY_LEN: usize = 512;

/// Maximum allowed length for environment variable values (1MB)
const MAX_ENV_VALUE_LEN: usize = 1048576; // 1MB

/// Property source adapter for environment variables.
///
/// Variables are read once, on first use. With a prefix, only variables starting
/// with it are considered and the prefix is stripped. By default underscores are
/// replaced with dots, so `MAPCFG_DB_URL` with prefix `MAPCFG_` becomes `DB.URL`,
/// or `db.url` with [`lowercase_keys`](Self::lowercase_keys) enabled.
///
/// # Priority
///
/// Environment variables have a priority of 2, which means they override files
/// (priority 1) but are overridden by command-line arguments (priority 3).
///
/// # Examples
///
/// ```rust
/// use mapcfg::adapters::EnvVarAdapter;
/// use mapcfg::ports::PropertySource;
///
/// let adapter = EnvVarAdapter::with_prefix("MYAPP_").lowercase_keys(true);
/// assert_eq!(adapter.name(), "env");
/// assert_eq!(adapter.priority(), 2);
/// ```
#[derive(Debug, Default)]
pub struct EnvVarAdapter {
    prefix: Option<String>,
    lowercase_keys: bool,
    keep_underscores: bool,
    cache: OnceCell<Properties>,
}

impl EnvVarAdapter {
    /// Creates an adapter over every environment variable.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an adapter over the variables starting with `prefix`.
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: Some(prefix.into()),
            ..Self::default()
        }
    }

    /// Lower-cases keys after the prefix is stripped.
    pub fn lowercase_keys(mut self, enabled: bool) -> Self {
        self.lowercase_keys = enabled;
        self
    }

    /// Replaces underscores in keys with dots (enabled by default).
    pub fn replace_underscores(mut self, enabled: bool) -> Self {
        self.keep_underscores = !enabled;
        self
    }

    /// Creates an adapter over fixed values, bypassing the process environment.
    ///
    /// Keys are used as given.
    pub fn with_values(values: Properties) -> Self {
        Self {
            keep_underscores: true,
            cache: OnceCell::with_value(values),
            ..Self::default()
        }
    }

    fn transform(&self, key: &str) -> Option<String> {
        let key = match &self.prefix {
            Some(prefix) => key.strip_prefix(prefix.as_str())?,
            None => key,
        };
        if key.is_empty() {
            return None;
        }
        let mut transformed = key.to_string();
        if self.lowercase_keys {
            transformed = transformed.to_lowercase();
        }
        if !self.keep_underscores {
            transformed = transformed.replace('_', ".");
        }
        Some(transformed)
    }

    fn load(&self) -> Properties {
        let mut loaded = Properties::new();
        for (key, value) in env::vars() {
            if key.len() > MAX_ENV_KEY_LEN || value.len() > MAX_ENV_VALUE_LEN {
                tracing::debug!(
                    key_len = key.len(),
                    value_len = value.len(),
                    "Skipping oversized environment variable"
                );
                continue;
            }
            if let Some(transformed) = self.transform(&key) {
                loaded.insert(transformed, value);
            }
        }

        tracing::debug!(
            count = loaded.len(),
            prefix = ?self.prefix,
            lowercase = self.lowercase_keys,
            "Loaded environment variables"
        );
        loaded
    }
}

impl PropertySource for EnvVarAdapter {
    fn name(&self) -> &str {
        "env"
    }

    fn priority(&self) -> u8 {
        2
    }

    fn properties(&self) -> Result<Properties> {
        Ok(self.cache.get_or_init(|| self.load()).clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Helper to set and clean up environment variables
    struct EnvGuard {
        keys: Vec<String>,
    }

    impl EnvGuard {
        fn new() -> Self {
            EnvGuard { keys: Vec::new() }
        }

        fn set(&mut self, key: &str, value: &str) {
            env::set_var(key, value);
            self.keys.push(key.to_string());
        }
    }

    impl Drop for EnvGuard {
        fn drop(&mut self) {
            for key in &self.keys {
                env::remove_var(key);
            }
        }
    }

    #[test]
    fn test_prefix_is_stripped_and_underscores_replaced() {
        let mut guard = EnvGuard::new();
        guard.set("MAPCFG_ENVTEST_DB_URL", "jdbc:h2:mem");
        guard.set("OTHER_ENVTEST_DB_URL", "ignored");

        let adapter = EnvVarAdapter::with_prefix("MAPCFG_ENVTEST_");
        let properties = adapter.properties().unwrap();

        assert_eq!(properties.get("DB.URL").map(String::as_str), Some("jdbc:h2:mem"));
        assert_eq!(properties.len(), 1);
    }

    #[test]
    fn test_lowercase_keys() {
        let mut guard = EnvGuard::new();
        guard.set("MAPCFG_LOWER_USER_NAME", "scott");

        let adapter = EnvVarAdapter::with_prefix("MAPCFG_LOWER_").lowercase_keys(true);
        let properties = adapter.properties().unwrap();
        assert_eq!(properties.get("user.name").map(String::as_str), Some("scott"));
    }

    #[test]
    fn test_keep_underscores() {
        let mut guard = EnvGuard::new();
        guard.set("MAPCFG_KEEP_SCHEMA_NAME", "hr");

        let adapter = EnvVarAdapter::with_prefix("MAPCFG_KEEP_").replace_underscores(false);
        let properties = adapter.properties().unwrap();
        assert_eq!(properties.get("SCHEMA_NAME").map(String::as_str), Some("hr"));
    }

    #[test]
    fn test_values_are_cached() {
        let mut guard = EnvGuard::new();
        guard.set("MAPCFG_CACHE_A", "1");

        let adapter = EnvVarAdapter::with_prefix("MAPCFG_CACHE_");
        assert_eq!(adapter.properties().unwrap().len(), 1);

        guard.set("MAPCFG_CACHE_B", "2");
        assert_eq!(adapter.properties().unwrap().len(), 1);
    }

    #[test]
    fn test_with_values() {
        let mut values = Properties::new();
        values.insert("db_url".to_string(), "x".to_string());
        let adapter = EnvVarAdapter::with_values(values);
        assert_eq!(adapter.properties().unwrap().get("db_url").map(String::as_str), Some("x"));
    }
}
