// SPDX-License-Identifier: MIT OR Apache-2.0

//! Command-line argument property source adapter.
//!
//! This module provides an adapter that reads build variable overrides from
//! command-line arguments.

use crate::domain::{Properties, Result};
use crate::ports::PropertySource;

const LONG_FLAG: &str = "--property";
const SHORT_FLAG: &str = "-P";

/// Property source adapter for command-line arguments.
///
/// Recognized forms are `--property key=value`, `--property=key=value`,
/// `-P key=value` and `-Pkey=value`. Every other argument is ignored, so the
/// adapter can be handed the full argument list of a program.
///
/// # Priority
///
/// Command-line arguments have the highest priority (3), overriding both
/// environment variables (priority 2) and files (priority 1).
///
/// # Examples
///
/// ```rust
/// use mapcfg::adapters::CommandLineAdapter;
/// use mapcfg::ports::PropertySource;
///
/// let adapter = CommandLineAdapter::from_args(vec![
///     "--property", "db.url=jdbc:h2:mem",
///     "-P", "db.user=scott",
///     "--verbose",
/// ]);
///
/// let properties = adapter.properties().unwrap();
/// assert_eq!(properties.get("db.url").map(String::as_str), Some("jdbc:h2:mem"));
/// assert_eq!(properties.len(), 2);
/// ```
#[derive(Debug, Clone, Default)]
pub struct CommandLineAdapter {
    values: Properties,
}

impl CommandLineAdapter {
    /// Creates an adapter with no values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an adapter from program arguments (without the program name).
    pub fn from_args<S: AsRef<str>>(args: Vec<S>) -> Self {
        let mut adapter = Self::new();
        adapter.parse_args(&args);
        adapter
    }

    /// Creates an adapter from the current process arguments.
    pub fn from_env_args() -> Self {
        let args: Vec<String> = std::env::args().skip(1).collect();
        Self::from_args(args)
    }

    /// Creates an adapter from `key=value` pairs, e.g. the values of a parsed flag.
    ///
    /// Pairs without `=` are ignored.
    pub fn from_pairs<I, S>(pairs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut adapter = Self::new();
        for pair in pairs {
            adapter.insert_pair(pair.as_ref());
        }
        adapter
    }

    fn insert_pair(&mut self, pair: &str) {
        match pair.split_once('=') {
            Some((key, value)) if !key.trim().is_empty() => {
                self.values.insert(key.trim().to_string(), value.to_string());
            }
            _ => tracing::debug!(argument = pair, "Ignoring malformed property argument"),
        }
    }

    fn parse_args<S: AsRef<str>>(&mut self, args: &[S]) {
        let mut i = 0;
        while i < args.len() {
            let arg = args[i].as_ref();

            if arg == LONG_FLAG || arg == SHORT_FLAG {
                // Handle "--property key=value" / "-P key=value"
                if let Some(next) = args.get(i + 1).map(AsRef::as_ref) {
                    if !next.starts_with('-') {
                        self.insert_pair(next);
                        i += 2;
                        continue;
                    }
                }
            } else if let Some(pair) = arg.strip_prefix(LONG_FLAG).and_then(|s| s.strip_prefix('=')) {
                self.insert_pair(pair);
            } else if let Some(pair) = arg.strip_prefix(SHORT_FLAG).filter(|s| !s.is_empty()) {
                self.insert_pair(pair);
            }
            i += 1;
        }
    }
}

impl PropertySource for CommandLineAdapter {
    fn name(&self) -> &str {
        "cli"
    }

    fn priority(&self) -> u8 {
        3
    }

    fn properties(&self) -> Result<Properties> {
        Ok(self.values.clone())
    }
}
