// SPDX-License-Identifier: MIT OR Apache-2.0

//! Property file parser trait definition.
//!
//! This module defines the `ConfigParser` trait, which provides an interface for
//! parsing external property files in different formats (`.properties`, YAML, ...).

use crate::domain::{Properties, Result};

/// A trait for parsing property files.
///
/// Implementations turn file content into a flat name/value map. Nested formats
/// flatten their structure with dot notation.
///
/// # Examples
///
/// ```rust
/// use mapcfg::ports::ConfigParser;
/// use mapcfg::domain::{Properties, Result};
///
/// struct KeyOnlyParser;
///
/// impl ConfigParser for KeyOnlyParser {
///     fn parse(&self, content: &str) -> Result<Properties> {
///         Ok(content
///             .lines()
///             .map(|line| (line.trim().to_string(), String::new()))
///             .collect())
///     }
///
///     fn supported_extensions(&self) -> &[&str] {
///         &["keys"]
///     }
/// }
///
/// let parsed = KeyOnlyParser.parse("a\nb").unwrap();
/// assert_eq!(parsed.len(), 2);
/// assert!(KeyOnlyParser.supports("app.KEYS"));
/// ```
pub trait ConfigParser: Send + Sync {
    /// Parses property file content into a flat map.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ParseError` when the content is malformed.
    fn parse(&self, content: &str) -> Result<Properties>;

    /// Returns the file extensions (without dot) this parser handles.
    fn supported_extensions(&self) -> &[&str];

    /// Returns `true` if `name` ends with one of the supported extensions.
    fn supports(&self, name: &str) -> bool {
        let Some((_, extension)) = name.rsplit_once('.') else {
            return false;
        };
        self.supported_extensions()
            .iter()
            .any(|supported| supported.eq_ignore_ascii_case(extension))
    }
}
