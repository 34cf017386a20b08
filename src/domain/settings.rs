// SPDX-License-Identifier: MIT OR Apache-2.0

//! Runtime settings: the known names, their defaults, validation and parsing.
//!
//! Settings arrive from the document as a flat name/value map. [`validate`] rejects
//! names that are not known before anything is applied; [`Settings::parse`] then
//! turns every known name into its typed value, falling back to the documented
//! default when absent.

use crate::domain::aliases::TypeAliasRegistry;
use crate::domain::column_type::ColumnType;
use crate::domain::errors::{ConfigError, Result};
use crate::domain::setting_value::SettingValue;
use crate::domain::type_ref::TypeRef;
use crate::domain::variables::Properties;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Setting that lists custom virtual file system implementations.
pub const VFS_IMPL: &str = "vfsImpl";

/// Setting that selects the log implementation.
pub const LOG_IMPL: &str = "logImpl";

/// Default value of `lazyLoadTriggerMethods`.
pub const DEFAULT_LAZY_LOAD_TRIGGER_METHODS: &str = "equals,clone,hashCode,toString";

/// Every setting name a document may declare.
pub static KNOWN_SETTINGS: Lazy<BTreeSet<&'static str>> = Lazy::new(|| {
    [
        "autoMappingBehavior",
        "autoMappingUnknownColumnBehavior",
        "cacheEnabled",
        "proxyFactory",
        "lazyLoadingEnabled",
        "aggressiveLazyLoading",
        "multipleResultSetsEnabled",
        "useColumnLabel",
        "useGeneratedKeys",
        "defaultExecutorType",
        "defaultStatementTimeout",
        "defaultFetchSize",
        "defaultResultSetType",
        "mapUnderscoreToCamelCase",
        "safeRowBoundsEnabled",
        "localCacheScope",
        "columnTypeForNull",
        "lazyLoadTriggerMethods",
        "safeResultHandlerEnabled",
        "defaultScriptingLanguage",
        "defaultEnumTypeHandler",
        "callSettersOnNulls",
        "useActualParamName",
        "returnInstanceForEmptyRow",
        "logPrefix",
        "configurationFactory",
        VFS_IMPL,
        LOG_IMPL,
    ]
    .into_iter()
    .collect()
});

keyword_enum! {
    /// How columns are automatically mapped onto result properties.
    pub enum AutoMappingBehavior {
        None => "NONE",
        Partial => "PARTIAL",
        Full => "FULL",
    }
}

keyword_enum! {
    /// What happens when automatic mapping meets an unknown column.
    pub enum AutoMappingUnknownColumnBehavior {
        None => "NONE",
        Warning => "WARNING",
        Failing => "FAILING",
    }
}

keyword_enum! {
    /// The default statement executor.
    pub enum ExecutorType {
        Simple => "SIMPLE",
        Reuse => "REUSE",
        Batch => "BATCH",
    }
}

keyword_enum! {
    /// Scope of the first-level cache.
    pub enum LocalCacheScope {
        Session => "SESSION",
        Statement => "STATEMENT",
    }
}

keyword_enum! {
    /// Cursor behavior requested for result sets.
    pub enum ResultSetType {
        Default => "DEFAULT",
        ForwardOnly => "FORWARD_ONLY",
        ScrollInsensitive => "SCROLL_INSENSITIVE",
        ScrollSensitive => "SCROLL_SENSITIVE",
    }
}

/// A settings map whose keys have all been checked against [`KNOWN_SETTINGS`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ValidatedSettings(Properties);

impl ValidatedSettings {
    /// Returns the raw value of a setting, if declared.
    pub fn get(&self, key: &str) -> Option<SettingValue<'_>> {
        self.0
            .get_key_value(key)
            .map(|(k, v)| SettingValue::new(k.as_str(), v.as_str()))
    }

    /// Returns the number of declared settings.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` when no setting was declared.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Rejects any key that is not a known setting.
///
/// The check is a case-sensitive exact match and happens before any value is
/// applied, so a single unknown key leaves the configuration untouched.
///
/// # Examples
///
/// ```
/// use mapcfg::domain::settings::validate;
/// use mapcfg::domain::{ConfigError, Properties};
///
/// let mut raw = Properties::new();
/// raw.insert("cacheenabled".to_string(), "true".to_string());
///
/// let error = validate(raw).unwrap_err();
/// assert!(matches!(error, ConfigError::UnknownSetting { key } if key == "cacheenabled"));
/// ```
pub fn validate(raw: Properties) -> Result<ValidatedSettings> {
    if let Some(unknown) = raw.keys().find(|key| !KNOWN_SETTINGS.contains(key.as_str())) {
        return Err(ConfigError::UnknownSetting {
            key: unknown.clone(),
        });
    }
    Ok(ValidatedSettings(raw))
}

/// Typed runtime settings with their documented defaults.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    /// `autoMappingBehavior`, default `PARTIAL`.
    pub auto_mapping_behavior: AutoMappingBehavior,
    /// `autoMappingUnknownColumnBehavior`, default `NONE`.
    pub auto_mapping_unknown_column_behavior: AutoMappingUnknownColumnBehavior,
    /// `cacheEnabled`, default `true`.
    pub cache_enabled: bool,
    /// `proxyFactory`, default none.
    pub proxy_factory: Option<TypeRef>,
    /// `lazyLoadingEnabled`, default `false`.
    pub lazy_loading_enabled: bool,
    /// `aggressiveLazyLoading`, default `false`.
    pub aggressive_lazy_loading: bool,
    /// `multipleResultSetsEnabled`, default `true`.
    pub multiple_result_sets_enabled: bool,
    /// `useColumnLabel`, default `true`.
    pub use_column_label: bool,
    /// `useGeneratedKeys`, default `false`.
    pub use_generated_keys: bool,
    /// `defaultExecutorType`, default `SIMPLE`.
    pub default_executor_type: ExecutorType,
    /// `defaultStatementTimeout`, default none.
    pub default_statement_timeout: Option<i32>,
    /// `defaultFetchSize`, default none.
    pub default_fetch_size: Option<i32>,
    /// `defaultResultSetType`, default none.
    pub default_result_set_type: Option<ResultSetType>,
    /// `mapUnderscoreToCamelCase`, default `false`.
    pub map_underscore_to_camel_case: bool,
    /// `safeRowBoundsEnabled`, default `false`.
    pub safe_row_bounds_enabled: bool,
    /// `localCacheScope`, default `SESSION`.
    pub local_cache_scope: LocalCacheScope,
    /// `columnTypeForNull`, default `OTHER`.
    pub column_type_for_null: ColumnType,
    /// `lazyLoadTriggerMethods`, default `equals,clone,hashCode,toString`.
    pub lazy_load_trigger_methods: BTreeSet<String>,
    /// `safeResultHandlerEnabled`, default `true`.
    pub safe_result_handler_enabled: bool,
    /// `defaultScriptingLanguage`, default none.
    pub default_scripting_language: Option<TypeRef>,
    /// `defaultEnumTypeHandler`, default none.
    pub default_enum_type_handler: Option<TypeRef>,
    /// `callSettersOnNulls`, default `false`.
    pub call_setters_on_nulls: bool,
    /// `useActualParamName`, default `true`.
    pub use_actual_param_name: bool,
    /// `returnInstanceForEmptyRow`, default `false`.
    pub return_instance_for_empty_row: bool,
    /// `logPrefix`, default none.
    pub log_prefix: Option<String>,
    /// `configurationFactory`, default none.
    pub configuration_factory: Option<TypeRef>,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            auto_mapping_behavior: AutoMappingBehavior::Partial,
            auto_mapping_unknown_column_behavior: AutoMappingUnknownColumnBehavior::None,
            cache_enabled: true,
            proxy_factory: None,
            lazy_loading_enabled: false,
            aggressive_lazy_loading: false,
            multiple_result_sets_enabled: true,
            use_column_label: true,
            use_generated_keys: false,
            default_executor_type: ExecutorType::Simple,
            default_statement_timeout: None,
            default_fetch_size: None,
            default_result_set_type: None,
            map_underscore_to_camel_case: false,
            safe_row_bounds_enabled: false,
            local_cache_scope: LocalCacheScope::Session,
            column_type_for_null: ColumnType::Other,
            lazy_load_trigger_methods: SettingValue::new(
                "lazyLoadTriggerMethods",
                DEFAULT_LAZY_LOAD_TRIGGER_METHODS,
            )
            .as_string_set(),
            safe_result_handler_enabled: true,
            default_scripting_language: None,
            default_enum_type_handler: None,
            call_setters_on_nulls: false,
            use_actual_param_name: true,
            return_instance_for_empty_row: false,
            log_prefix: None,
            configuration_factory: None,
        }
    }
}

impl Settings {
    /// Parses every known setting, using defaults for the absent ones.
    ///
    /// Type references are resolved through `aliases`. Nothing is returned unless
    /// every declared value parses.
    pub fn parse(raw: &ValidatedSettings, aliases: &TypeAliasRegistry) -> Result<Settings> {
        let defaults = Settings::default();
        let flag = |key: &str, default: bool| -> Result<bool> {
            raw.get(key).map_or(Ok(default), |v| v.as_bool())
        };
        let integer = |key: &str| -> Result<Option<i32>> {
            raw.get(key).map(|v| v.as_i32()).transpose()
        };
        let type_ref = |key: &str| -> Option<TypeRef> {
            raw.get(key).map(|v| aliases.resolve(v.as_str()))
        };

        Ok(Settings {
            auto_mapping_behavior: keyword(raw, "autoMappingBehavior", defaults.auto_mapping_behavior)?,
            auto_mapping_unknown_column_behavior: keyword(
                raw,
                "autoMappingUnknownColumnBehavior",
                defaults.auto_mapping_unknown_column_behavior,
            )?,
            cache_enabled: flag("cacheEnabled", defaults.cache_enabled)?,
            proxy_factory: type_ref("proxyFactory"),
            lazy_loading_enabled: flag("lazyLoadingEnabled", defaults.lazy_loading_enabled)?,
            aggressive_lazy_loading: flag("aggressiveLazyLoading", defaults.aggressive_lazy_loading)?,
            multiple_result_sets_enabled: flag(
                "multipleResultSetsEnabled",
                defaults.multiple_result_sets_enabled,
            )?,
            use_column_label: flag("useColumnLabel", defaults.use_column_label)?,
            use_generated_keys: flag("useGeneratedKeys", defaults.use_generated_keys)?,
            default_executor_type: keyword(raw, "defaultExecutorType", defaults.default_executor_type)?,
            default_statement_timeout: integer("defaultStatementTimeout")?,
            default_fetch_size: integer("defaultFetchSize")?,
            default_result_set_type: raw
                .get("defaultResultSetType")
                .map(|v| v.as_keyword())
                .transpose()?,
            map_underscore_to_camel_case: flag(
                "mapUnderscoreToCamelCase",
                defaults.map_underscore_to_camel_case,
            )?,
            safe_row_bounds_enabled: flag("safeRowBoundsEnabled", defaults.safe_row_bounds_enabled)?,
            local_cache_scope: keyword(raw, "localCacheScope", defaults.local_cache_scope)?,
            column_type_for_null: keyword(raw, "columnTypeForNull", defaults.column_type_for_null)?,
            lazy_load_trigger_methods: raw
                .get("lazyLoadTriggerMethods")
                .map(|v| v.as_string_set())
                .unwrap_or(defaults.lazy_load_trigger_methods),
            safe_result_handler_enabled: flag(
                "safeResultHandlerEnabled",
                defaults.safe_result_handler_enabled,
            )?,
            default_scripting_language: type_ref("defaultScriptingLanguage"),
            default_enum_type_handler: type_ref("defaultEnumTypeHandler"),
            call_setters_on_nulls: flag("callSettersOnNulls", defaults.call_setters_on_nulls)?,
            use_actual_param_name: flag("useActualParamName", defaults.use_actual_param_name)?,
            return_instance_for_empty_row: flag(
                "returnInstanceForEmptyRow",
                defaults.return_instance_for_empty_row,
            )?,
            log_prefix: raw.get("logPrefix").map(|v| v.as_str().to_string()),
            configuration_factory: type_ref("configurationFactory"),
        })
    }
}

fn keyword<T>(raw: &ValidatedSettings, key: &str, default: T) -> Result<T>
where
    T: crate::domain::setting_value::Keyword,
{
    raw.get(key).map_or(Ok(default), |v| v.as_keyword())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(pairs: &[(&str, &str)]) -> Properties {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_validate_accepts_known_keys() {
        let validated = validate(raw(&[("cacheEnabled", "false"), ("logImpl", "TRACING")])).unwrap();
        assert_eq!(validated.len(), 2);
    }

    #[test]
    fn test_validate_rejects_unknown_key() {
        let error = validate(raw(&[("cacheEnabled", "false"), ("cacheSize", "10")])).unwrap_err();
        assert!(matches!(error, ConfigError::UnknownSetting { key } if key == "cacheSize"));
    }

    #[test]
    fn test_validate_is_case_sensitive() {
        assert!(validate(raw(&[("CacheEnabled", "false")])).is_err());
    }

    #[test]
    fn test_parse_defaults() {
        let settings = Settings::parse(&ValidatedSettings::default(), &TypeAliasRegistry::new()).unwrap();
        assert_eq!(settings, Settings::default());
        assert!(settings.cache_enabled);
        assert_eq!(settings.auto_mapping_behavior, AutoMappingBehavior::Partial);
        assert_eq!(settings.column_type_for_null, ColumnType::Other);
        assert_eq!(settings.lazy_load_trigger_methods.len(), 4);
    }

    #[test]
    fn test_parse_declared_values() {
        let validated = validate(raw(&[
            ("cacheEnabled", "FALSE"),
            ("defaultExecutorType", "BATCH"),
            ("defaultStatementTimeout", "25"),
            ("defaultResultSetType", "SCROLL_INSENSITIVE"),
            ("lazyLoadTriggerMethods", "equals"),
            ("logPrefix", "app."),
        ]))
        .unwrap();
        let settings = Settings::parse(&validated, &TypeAliasRegistry::new()).unwrap();

        assert!(!settings.cache_enabled);
        assert_eq!(settings.default_executor_type, ExecutorType::Batch);
        assert_eq!(settings.default_statement_timeout, Some(25));
        assert_eq!(settings.default_result_set_type, Some(ResultSetType::ScrollInsensitive));
        assert_eq!(settings.lazy_load_trigger_methods.len(), 1);
        assert_eq!(settings.log_prefix.as_deref(), Some("app."));
    }

    #[test]
    fn test_parse_rejects_bad_boolean() {
        let validated = validate(raw(&[("useGeneratedKeys", "maybe")])).unwrap();
        let error = Settings::parse(&validated, &TypeAliasRegistry::new()).unwrap_err();
        assert!(matches!(error, ConfigError::SettingType { key, .. } if key == "useGeneratedKeys"));
    }

    #[test]
    fn test_parse_rejects_bad_keyword() {
        let validated = validate(raw(&[("localCacheScope", "session")])).unwrap();
        let error = Settings::parse(&validated, &TypeAliasRegistry::new()).unwrap_err();
        match error {
            ConfigError::SettingType { expected, .. } => assert!(expected.contains("STATEMENT")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_parse_resolves_type_aliases() {
        let mut aliases = TypeAliasRegistry::new();
        aliases
            .register("money", TypeRef::from("com.example.MoneyEnumHandler"))
            .unwrap();
        let validated = validate(raw(&[("defaultEnumTypeHandler", "Money")])).unwrap();
        let settings = Settings::parse(&validated, &aliases).unwrap();
        assert_eq!(
            settings.default_enum_type_handler,
            Some(TypeRef::from("com.example.MoneyEnumHandler"))
        );
    }
}
