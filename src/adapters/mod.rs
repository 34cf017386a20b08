// SPDX-License-Identifier: MIT OR Apache-2.0

//! Adapters layer containing implementations of the ports.
//!
//! This module contains the concrete implementations of the traits defined in the
//! ports layer: the YAML document and property file parsers, resource loaders,
//! the type catalog, the YAML mapping compiler, the built-in extensions and the
//! property override sources.

pub mod builtins;
#[cfg(feature = "cli")]
pub mod cli;
#[cfg(feature = "env")]
pub mod env_var;
pub mod mapping;
pub mod properties_file;
pub mod resources;
pub mod type_catalog;
pub mod yaml;

// Re-export adapters based on feature flags
#[cfg(feature = "cli")]
pub use cli::CommandLineAdapter;
#[cfg(feature = "env")]
pub use env_var::EnvVarAdapter;
pub use mapping::YamlMappingCompiler;
pub use properties_file::PropertiesParser;
pub use resources::{FileSystemResourceLoader, MemoryResourceLoader};
pub use type_catalog::StaticTypeCatalog;
pub use yaml::{YamlDocumentParser, YamlParser};
