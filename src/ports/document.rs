// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration document parser trait definition.

use crate::domain::{Node, Result};
use std::io::Read;

/// Parses a configuration document into its root element.
///
/// The returned root holds the top-level sections (`properties`, `settings`,
/// `environments`, ...) as children. Text is returned raw; substitution is the
/// builder's job.
pub trait DocumentParser: Send + Sync {
    /// Reads the whole stream and returns the root element.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ParseError` for malformed documents and
    /// `ConfigError::IoError` when the stream cannot be read.
    fn parse_document(&self, reader: &mut dyn Read) -> Result<Node>;
}
