// SPDX-License-Identifier: MIT OR Apache-2.0

//! Service layer containing the build pipeline.
//!
//! [`SessionFactoryBuilder`] is the entry point. It drives a [`ConfigBuilder`],
//! which resolves variables, installs extensions from the [`ExtensionRegistry`],
//! selects the environment and loads mappers.

pub mod config_builder;
pub mod environments;
pub mod extensions;
pub mod mapper_loader;
pub mod session_factory;
pub mod variables;

// Re-export commonly used types
pub use config_builder::{Collaborators, ConfigBuilder};
pub use environments::EnvironmentSelector;
pub use extensions::{ExtensionRegistry, FactoryTable};
pub use mapper_loader::{MapperLoader, MapperSource};
pub use session_factory::{DefaultSessionFactory, SessionFactoryBuilder};
pub use variables::VariableResolver;
