// SPDX-License-Identifier: MIT OR Apache-2.0

//! A declarative configuration compiler for data-mapping runtimes.
//!
//! This crate reads a configuration document describing a data-mapping runtime
//! (variables, settings, type aliases, plugins, environments, type handlers and
//! mappers) and compiles it into a single validated [`Configuration`] value, shared
//! read-only through a session factory.
//!
//! [`Configuration`]: domain::Configuration
//!
//! # Architecture
//!
//! The crate follows hexagonal architecture principles:
//!
//! - **Domain Layer**: The configuration aggregate, its registries, settings and errors
//! - **Ports**: Trait definitions for document parsing, resource loading, type
//!   enumeration, mapping compilation and the extension capabilities
//! - **Adapters**: YAML and `.properties` parsers, resource loaders, the static type
//!   catalog, the YAML mapping compiler, the built-in extensions and property sources
//! - **Service**: The build pipeline and the session factory builder
//!
//! # Features
//!
//! - **Fixed build order**: Sections are processed in a fixed order, whatever their
//!   position in the document
//! - **Variable layering**: Inline properties < external property file < caller overrides
//! - **Fail fast**: Unknown settings, ambiguous mappers and conflicting sources abort
//!   the build with one error naming the failing section
//! - **Extensible**: Interceptors, factories and type handlers are constructed from
//!   typed registries keyed by type name
//!
//! # Feature Flags
//!
//! - `env`: Enable environment variable overrides (default)
//! - `cli`: Enable command-line overrides and the `mapcfg` binary (default)
//!
//! # Quick Start
//!
//! ```rust
//! use mapcfg::prelude::*;
//!
//! # fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
//! let document = r#"
//! settings:
//!   setting:
//!     - { name: mapUnderscoreToCamelCase, value: "true" }
//! typeAliases:
//!   typeAlias:
//!     - { alias: emp, type: com.example.Emp }
//! "#;
//!
//! let factory = SessionFactoryBuilder::new().build_from_str(document, None, None)?;
//! let configuration = factory.configuration();
//!
//! assert!(configuration.settings().map_underscore_to_camel_case);
//! assert_eq!(configuration.type_aliases().resolve("EMP").as_str(), "com.example.Emp");
//! # Ok(())
//! # }
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![warn(clippy::all)]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod service;

/// Commonly used types and traits.
///
/// This module re-exports the most commonly used types and traits for convenient access.
pub mod prelude {
    pub use crate::domain::{ConfigError, Configuration, Properties, Result, SessionFactory};
    pub use crate::ports::{PropertySource, ResourceLoader, TypeEnumerator};
    pub use crate::service::{DefaultSessionFactory, ExtensionRegistry, SessionFactoryBuilder};

    // Re-export adapters based on feature flags
    #[cfg(feature = "cli")]
    pub use crate::adapters::CommandLineAdapter;
    #[cfg(feature = "env")]
    pub use crate::adapters::EnvVarAdapter;
    pub use crate::adapters::{FileSystemResourceLoader, MemoryResourceLoader, StaticTypeCatalog};
}
