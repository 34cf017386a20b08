// SPDX-License-Identifier: MIT OR Apache-2.0

//! Property source trait definition.
//!
//! This module defines the `PropertySource` trait. Property sources supply the
//! caller-side variable overrides of a build (environment variables, command-line
//! arguments, ...). Overrides take precedence over every property declared by the
//! document itself.

use crate::domain::{Properties, Result};

/// A trait for property override sources.
///
/// # Priority
///
/// Each source has a priority value (0-255). When several sources define the same
/// property, the value from the source with the highest priority is used. The
/// typical priority values are:
///
/// - **3 (highest)**: Command-line arguments
/// - **2**: Environment variables
/// - **1 (lowest)**: Files
///
/// # Examples
///
/// ```rust
/// use mapcfg::ports::PropertySource;
/// use mapcfg::domain::{Properties, Result};
///
/// struct FixedSource(Properties);
///
/// impl PropertySource for FixedSource {
///     fn name(&self) -> &str {
///         "fixed"
///     }
///
///     fn priority(&self) -> u8 {
///         1
///     }
///
///     fn properties(&self) -> Result<Properties> {
///         Ok(self.0.clone())
///     }
/// }
///
/// let mut props = Properties::new();
/// props.insert("url".to_string(), "jdbc:h2:mem".to_string());
/// let source = FixedSource(props);
/// assert_eq!(source.properties().unwrap().len(), 1);
/// ```
pub trait PropertySource: Send + Sync {
    /// Returns a short identifier like "env" or "cli", used for logging.
    fn name(&self) -> &str;

    /// Returns the priority of this source; higher values win.
    fn priority(&self) -> u8;

    /// Returns every property this source defines.
    fn properties(&self) -> Result<Properties>;
}

/// Merges sources by priority; on ties the later source in `sources` wins.
///
/// # Examples
///
/// ```rust
/// use mapcfg::ports::source::merge_sources;
///
/// let merged = merge_sources(&[]).unwrap();
/// assert!(merged.is_empty());
/// ```
pub fn merge_sources(sources: &[Box<dyn PropertySource>]) -> Result<Properties> {
    let mut ordered: Vec<&dyn PropertySource> = sources.iter().map(|s| s.as_ref()).collect();
    ordered.sort_by_key(|source| source.priority());

    let mut merged = Properties::new();
    for source in ordered {
        let properties = source.properties()?;
        tracing::debug!(source = source.name(), count = properties.len(), "Merged property source");
        merged.extend(properties);
    }
    Ok(merged)
}
