// SPDX-License-Identifier: MIT OR Apache-2.0

//! Entry points producing a session factory from a configuration document.
//!
//! [`SessionFactoryBuilder`] gathers the collaborators and property sources of
//! a build, then compiles documents into [`DefaultSessionFactory`] values that
//! share their [`Configuration`] read-only.

use crate::adapters::FileSystemResourceLoader;
use crate::domain::{ConfigError, Configuration, Properties, Result, SessionFactory};
use crate::ports::source::merge_sources;
use crate::ports::{
    ConfigParser, DocumentParser, MappingCompiler, PropertySource, ResourceLoader, TypeEnumerator,
};
use crate::service::config_builder::{Collaborators, ConfigBuilder};
use crate::service::extensions::ExtensionRegistry;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// A session factory over a built configuration.
#[derive(Clone, Debug)]
pub struct DefaultSessionFactory {
    configuration: Arc<Configuration>,
}

impl DefaultSessionFactory {
    /// Wraps a configuration.
    pub fn new(configuration: Configuration) -> Self {
        DefaultSessionFactory {
            configuration: Arc::new(configuration),
        }
    }
}

impl SessionFactory for DefaultSessionFactory {
    fn configuration(&self) -> &Arc<Configuration> {
        &self.configuration
    }
}

/// Builder for [`DefaultSessionFactory`] values.
///
/// Property sources added with [`with_source`](Self::with_source) are merged by
/// priority into the build overrides; the properties passed to
/// [`build`](Self::build) win over all of them.
///
/// # Examples
///
/// ```rust
/// use mapcfg::domain::{Properties, SessionFactory};
/// use mapcfg::service::SessionFactoryBuilder;
///
/// let yaml = r#"
/// environments:
///   default: dev
///   environment:
///     - id: dev
///       transactionManager: { type: JDBC }
///       dataSource:
///         type: UNPOOLED
///         property:
///           - { name: url, value: "${url}" }
/// "#;
///
/// let mut properties = Properties::new();
/// properties.insert("url".to_string(), "jdbc:h2:mem:test".to_string());
///
/// let factory = SessionFactoryBuilder::new()
///     .build_from_str(yaml, None, Some(properties))
///     .unwrap();
///
/// assert_eq!(factory.environment_id(), Some("dev"));
/// ```
#[derive(Default)]
pub struct SessionFactoryBuilder {
    collaborators: Collaborators,
    sources: Vec<Box<dyn PropertySource>>,
}

impl SessionFactoryBuilder {
    /// Creates a builder with the default collaborators and no property sources.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a property source.
    pub fn with_source(mut self, source: Box<dyn PropertySource>) -> Self {
        self.sources.push(source);
        self
    }

    /// Adds the environment variables starting with `prefix` as a property source.
    ///
    /// Keys are lower-cased and underscores become dots, so `APP_DB_URL` with
    /// prefix `APP_` overrides `db.url`.
    #[cfg(feature = "env")]
    pub fn with_env_prefix(self, prefix: impl Into<String>) -> Self {
        use crate::adapters::EnvVarAdapter;
        self.with_source(Box::new(
            EnvVarAdapter::with_prefix(prefix).lowercase_keys(true),
        ))
    }

    /// Adds `--property key=value` style arguments as a property source.
    #[cfg(feature = "cli")]
    pub fn with_cli_args<S: AsRef<str>>(self, args: Vec<S>) -> Self {
        use crate::adapters::CommandLineAdapter;
        self.with_source(Box::new(CommandLineAdapter::from_args(args)))
    }

    /// Replaces the document parser.
    pub fn with_document_parser(mut self, parser: impl DocumentParser + 'static) -> Self {
        self.collaborators.document_parser = Box::new(parser);
        self
    }

    /// Replaces the resource loader.
    pub fn with_resource_loader(mut self, resources: impl ResourceLoader + 'static) -> Self {
        self.collaborators.resources = Box::new(resources);
        self
    }

    /// Loads resources from the given directories, searched in order.
    pub fn with_resource_roots<I, P>(self, roots: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        self.with_resource_loader(FileSystemResourceLoader::new(roots))
    }

    /// Replaces the type enumerator.
    pub fn with_types(mut self, types: impl TypeEnumerator + 'static) -> Self {
        self.collaborators.types = Box::new(types);
        self
    }

    /// Replaces the mapping compiler.
    pub fn with_mapping_compiler(mut self, compiler: impl MappingCompiler + 'static) -> Self {
        self.collaborators.compiler = Box::new(compiler);
        self
    }

    /// Replaces the extension registry.
    pub fn with_extensions(mut self, extensions: ExtensionRegistry) -> Self {
        self.collaborators.extensions = extensions;
        self
    }

    /// Adds a property file parser, tried before the ones already present.
    pub fn with_property_parser(mut self, parser: impl ConfigParser + 'static) -> Self {
        self.collaborators.property_parsers.insert(0, Box::new(parser));
        self
    }

    /// Returns the extension registry for in-place registration.
    pub fn extensions_mut(&mut self) -> &mut ExtensionRegistry {
        &mut self.collaborators.extensions
    }

    /// Returns the collaborators used by every build.
    pub fn collaborators(&self) -> &Collaborators {
        &self.collaborators
    }

    /// Compiles the document read from `reader`.
    ///
    /// `environment` overrides the document's default environment and
    /// `properties` override every other variable. The reader is consumed
    /// and dropped whatever the outcome.
    pub fn build<R: Read>(
        &self,
        mut reader: R,
        environment: Option<&str>,
        properties: Option<Properties>,
    ) -> Result<DefaultSessionFactory> {
        let overrides = self.overrides(properties)?;
        let mut builder =
            ConfigBuilder::new(&mut reader, environment, overrides, &self.collaborators)?;
        Ok(DefaultSessionFactory::new(builder.parse()?))
    }

    /// Compiles a document held in memory.
    pub fn build_from_str(
        &self,
        document: &str,
        environment: Option<&str>,
        properties: Option<Properties>,
    ) -> Result<DefaultSessionFactory> {
        self.build(document.as_bytes(), environment, properties)
    }

    /// Compiles the document stored at `path`.
    pub fn build_from_path(
        &self,
        path: impl AsRef<Path>,
        environment: Option<&str>,
        properties: Option<Properties>,
    ) -> Result<DefaultSessionFactory> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|error| {
            if error.kind() == std::io::ErrorKind::NotFound {
                ConfigError::not_found("configuration document", path.display().to_string())
            } else {
                ConfigError::IoError(error)
            }
        })?;
        tracing::debug!(path = %path.display(), "Reading configuration document");
        self.build(BufReader::new(file), environment, properties)
    }

    /// Wraps an already built configuration.
    pub fn build_from_configuration(&self, configuration: Configuration) -> DefaultSessionFactory {
        DefaultSessionFactory::new(configuration)
    }

    fn overrides(&self, properties: Option<Properties>) -> Result<Option<Properties>> {
        if self.sources.is_empty() {
            return Ok(properties);
        }
        let mut merged = merge_sources(&self.sources)
            .map_err(|error| ConfigError::build("reading property sources", error))?;
        merged.extend(properties.unwrap_or_default());
        Ok(Some(merged))
    }
}
