// SPDX-License-Identifier: MIT OR Apache-2.0

//! Raw setting value with typed conversions.
//!
//! `SettingValue` pairs the raw text of a setting with its name so that every
//! conversion failure is reported as a [`ConfigError::SettingType`] naming the
//! offending setting.

use crate::domain::errors::{ConfigError, Result};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// The raw text of one named setting.
///
/// # Examples
///
/// ```
/// use mapcfg::domain::setting_value::SettingValue;
///
/// let value = SettingValue::new("defaultFetchSize", "100");
/// assert_eq!(value.as_i32().unwrap(), 100);
///
/// let value = SettingValue::new("cacheEnabled", "yes");
/// assert!(value.as_bool().is_err());
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SettingValue<'a> {
    key: &'a str,
    raw: &'a str,
}

impl<'a> SettingValue<'a> {
    /// Creates a value for the setting `key`.
    pub fn new(key: &'a str, raw: &'a str) -> Self {
        SettingValue { key, raw }
    }

    /// Returns the setting name.
    pub fn key(&self) -> &'a str {
        self.key
    }

    /// Returns the raw text.
    pub fn as_str(&self) -> &'a str {
        self.raw
    }

    /// Parses `true` or `false`, ignoring ASCII case.
    pub fn as_bool(&self) -> Result<bool> {
        if self.raw.eq_ignore_ascii_case("true") {
            Ok(true)
        } else if self.raw.eq_ignore_ascii_case("false") {
            Ok(false)
        } else {
            Err(self.type_error("a boolean (true or false)"))
        }
    }

    /// Parses a signed 32-bit integer.
    pub fn as_i32(&self) -> Result<i32> {
        self.raw
            .trim()
            .parse::<i32>()
            .map_err(|_| self.type_error("an integer"))
    }

    /// Parses a keyword enum, listing the accepted spellings on failure.
    pub fn as_keyword<T: Keyword>(&self) -> Result<T> {
        self.raw
            .parse::<T>()
            .map_err(|_| self.type_error(format!("one of [{}]", T::NAMES.join(", "))))
    }

    /// Splits a comma separated list into a set, dropping empty entries.
    pub fn as_string_set(&self) -> BTreeSet<String> {
        self.raw
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect()
    }

    fn type_error(&self, expected: impl Into<String>) -> ConfigError {
        ConfigError::SettingType {
            key: self.key.to_string(),
            expected: expected.into(),
            value: self.raw.to_string(),
        }
    }
}

impl fmt::Display for SettingValue<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.key, self.raw)
    }
}

/// Keyword enums that can describe their accepted spellings.
pub trait Keyword: FromStr + Sized + 'static {
    /// Every accepted spelling, in declaration order.
    const NAMES: &'static [&'static str];
}

/// A keyword that matched none of the accepted spellings.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown keyword '{0}'")]
pub struct UnknownKeyword(pub String);
