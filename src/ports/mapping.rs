// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mapping document compiler trait definition.

use crate::domain::{Configuration, Result};
use std::io::Read;

/// What a compile produced.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CompiledMapping {
    /// The namespace the document declared.
    pub namespace: Option<String>,
    /// Number of statements added to the configuration.
    pub statements: usize,
    /// Number of fragments added to the shared fragment cache.
    pub fragments: usize,
}

/// Compiles mapping documents into statements on a configuration.
///
/// The compiler reads the document to its end, resolves types through the
/// configuration's alias registry and adds statements and shared fragments to
/// the configuration. It must not mark the resource as loaded; the caller does.
pub trait MappingCompiler: Send + Sync {
    /// Compiles the document read from `reader`, which was loaded from `resource`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ParseError` for malformed documents and
    /// `ConfigError::DuplicateStatement` for repeated statement ids.
    fn compile(
        &self,
        reader: &mut dyn Read,
        resource: &str,
        configuration: &mut Configuration,
    ) -> Result<CompiledMapping>;
}
