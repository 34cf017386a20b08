// SPDX-License-Identifier: MIT OR Apache-2.0

//! Ports layer containing trait definitions.
//!
//! This module contains the trait definitions (ports) that define the interfaces
//! between the build pipeline and its collaborators: document and property file
//! parsing, resource loading, type enumeration, mapping compilation and the
//! extension capabilities a configuration installs. These traits are implemented
//! by adapters in the adapters layer.

pub mod document;
pub mod extensions;
pub mod mapping;
pub mod parser;
pub mod resources;
pub mod source;
pub mod types;

// Re-export commonly used types
pub use document::DocumentParser;
pub use extensions::{
    DataSource, DataSourceFactory, DatabaseIdProvider, Interceptor, ObjectFactory,
    ObjectWrapperFactory, ReflectorFactory, TransactionFactory, TypeHandler,
};
pub use mapping::{CompiledMapping, MappingCompiler};
pub use parser::ConfigParser;
pub use resources::ResourceLoader;
pub use source::PropertySource;
pub use types::{TypeDescriptor, TypeEnumerator, TypeKind};
