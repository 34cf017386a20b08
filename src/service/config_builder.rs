// SPDX-License-Identifier: MIT OR Apache-2.0

//! The build pipeline turning a configuration document into a [`Configuration`].
//!
//! Sections are processed in a fixed order, regardless of where they appear in
//! the document:
//!
//! 1. `properties`
//! 2. `settings` (validated only)
//! 3. the `vfsImpl` and `logImpl` settings
//! 4. `typeAliases`
//! 5. `plugins`
//! 6. `objectFactory`
//! 7. `objectWrapperFactory`
//! 8. `reflectorFactory`
//! 9. `settings` (applied)
//! 10. `environments`
//! 11. `databaseIdProvider`
//! 12. `typeHandlers`
//! 13. `mappers`
//!
//! The first failing stage aborts the build with a single
//! [`ConfigError::Build`] naming the section being processed.

use crate::adapters::{
    FileSystemResourceLoader, PropertiesParser, StaticTypeCatalog, YamlDocumentParser,
    YamlMappingCompiler, YamlParser,
};
use crate::domain::settings::{self, ValidatedSettings, LOG_IMPL, VFS_IMPL};
use crate::domain::type_handlers::RegisteredHandler;
use crate::domain::{
    ColumnType, ConfigError, Configuration, Element, Environment, Installed, Node, Properties,
    Result, Settings, TypeRef,
};
use crate::ports::{
    ConfigParser, DocumentParser, MappingCompiler, ResourceLoader, TypeDescriptor,
    TypeEnumerator, TypeHandler,
};
use crate::service::environments::EnvironmentSelector;
use crate::service::extensions::{ExtensionRegistry, FactoryTable};
use crate::service::mapper_loader::{MapperLoader, MapperSource};
use crate::service::variables::VariableResolver;
use std::collections::BTreeSet;
use std::io::Read;
use std::sync::Arc;

/// Name of the document root element.
pub const ROOT: &str = "configuration";

/// The top-level sections a document may contain, each at most once.
pub const SECTIONS: &[&str] = &[
    "properties",
    "settings",
    "typeAliases",
    "plugins",
    "objectFactory",
    "objectWrapperFactory",
    "reflectorFactory",
    "environments",
    "databaseIdProvider",
    "typeHandlers",
    "mappers",
];

/// The ports a build reads through.
///
/// The default set reads YAML documents, loads resources relative to the
/// current directory, knows no application types and compiles YAML mappings.
pub struct Collaborators {
    /// Parses the configuration document.
    pub document_parser: Box<dyn DocumentParser>,
    /// Opens property files and mapping documents.
    pub resources: Box<dyn ResourceLoader>,
    /// Lists and describes application types.
    pub types: Box<dyn TypeEnumerator>,
    /// Compiles mapping documents.
    pub compiler: Box<dyn MappingCompiler>,
    /// Constructors for named extensions.
    pub extensions: ExtensionRegistry,
    /// Parsers for external property files, tried in order.
    pub property_parsers: Vec<Box<dyn ConfigParser>>,
}

impl Default for Collaborators {
    fn default() -> Self {
        Collaborators {
            document_parser: Box::new(YamlDocumentParser::new()),
            resources: Box::new(FileSystemResourceLoader::current_dir()),
            types: Box::new(StaticTypeCatalog::new()),
            compiler: Box::new(YamlMappingCompiler::new()),
            extensions: ExtensionRegistry::new(),
            property_parsers: vec![Box::new(PropertiesParser::new()), Box::new(YamlParser::new())],
        }
    }
}

fn wrap(section: &str) -> impl FnOnce(ConfigError) -> ConfigError + '_ {
    move |error| ConfigError::build(format!("processing <{section}>"), error)
}

fn required(element: Element<'_>, attribute: &str) -> Result<String> {
    element
        .attribute(attribute)
        .ok_or_else(|| ConfigError::MissingAttribute {
            element: element.name().to_string(),
            attribute: attribute.to_string(),
        })
}

fn unexpected(section: &str, entry: Element<'_>) -> ConfigError {
    ConfigError::parse(format!("unexpected <{}> entry in <{}>", entry.name(), section))
}

fn check_sections(root: &Node) -> Result<()> {
    if root.name() != ROOT {
        return Err(ConfigError::parse(format!(
            "document root must be <{ROOT}>, found <{}>",
            root.name()
        )));
    }
    if let Some(name) = root.attribute_names().next() {
        let kind = if SECTIONS.contains(&name) { "section" } else { "unknown section" };
        return Err(ConfigError::parse(format!("{kind} <{name}> must be a mapping")));
    }
    let mut seen = BTreeSet::new();
    for section in root.children() {
        if !SECTIONS.contains(&section.name()) {
            return Err(ConfigError::parse(format!("unknown section <{}>", section.name())));
        }
        if !seen.insert(section.name()) {
            return Err(ConfigError::DuplicateSection {
                section: section.name().to_string(),
            });
        }
    }
    Ok(())
}

/// Builds a [`Configuration`] from one document.
///
/// A builder runs at most once; later calls to [`parse`](Self::parse) fail
/// with [`ConfigError::AlreadyBuilt`].
///
/// # Examples
///
/// ```rust
/// use mapcfg::service::{Collaborators, ConfigBuilder};
///
/// let yaml = r#"
/// settings:
///   setting:
///     - { name: cacheEnabled, value: "false" }
/// "#;
///
/// let collaborators = Collaborators::default();
/// let mut builder = ConfigBuilder::new(&mut yaml.as_bytes(), None, None, &collaborators).unwrap();
/// let configuration = builder.parse().unwrap();
///
/// assert!(!configuration.settings().cache_enabled);
/// assert!(builder.parse().is_err());
/// ```
pub struct ConfigBuilder<'a> {
    collaborators: &'a Collaborators,
    document: Node,
    environment: Option<String>,
    overrides: Properties,
    parsed: bool,
}

impl<'a> ConfigBuilder<'a> {
    /// Reads the document from `reader`; the reader is not kept.
    ///
    /// # Errors
    ///
    /// Fails when the document cannot be read or parsed.
    pub fn new(
        reader: &mut dyn Read,
        environment: Option<&str>,
        overrides: Option<Properties>,
        collaborators: &'a Collaborators,
    ) -> Result<Self> {
        let document = collaborators
            .document_parser
            .parse_document(reader)
            .map_err(|error| ConfigError::build("parsing the configuration document", error))?;
        Ok(Self::from_document(document, environment, overrides, collaborators))
    }

    /// Creates a builder over an already parsed document.
    pub fn from_document(
        document: Node,
        environment: Option<&str>,
        overrides: Option<Properties>,
        collaborators: &'a Collaborators,
    ) -> Self {
        ConfigBuilder {
            collaborators,
            document,
            environment: environment.map(str::to_string),
            overrides: overrides.unwrap_or_default(),
            parsed: false,
        }
    }

    /// Runs every stage and returns the configuration.
    ///
    /// # Errors
    ///
    /// Returns `AlreadyBuilt` on a second call, without running any stage.
    /// Otherwise the first stage failure is returned as `ConfigError::Build`.
    pub fn parse(&mut self) -> Result<Configuration> {
        if self.parsed {
            return Err(ConfigError::AlreadyBuilt);
        }
        self.parsed = true;

        tracing::info!(environment = ?self.environment, "Building configuration");
        let configuration = self.run()?;
        tracing::info!(
            environment = ?configuration.environment().map(|e| e.id()),
            database_id = ?configuration.database_id(),
            aliases = configuration.type_aliases().len(),
            mappers = configuration.mappers().len(),
            statements = configuration.mapped_statements().count(),
            "Configuration built"
        );
        Ok(configuration)
    }

    fn section(&self, name: &str) -> Option<&Node> {
        self.document.children().iter().find(|node| node.name() == name)
    }

    fn run(&self) -> Result<Configuration> {
        check_sections(&self.document).map_err(wrap(ROOT))?;
        let mut configuration = Configuration::new();

        let variables = self
            .resolve_variables(self.section("properties"))
            .map_err(wrap("properties"))?;
        configuration.variables = variables.clone();
        let section = |name: &str| self.section(name).map(|node| Element::new(node, &variables));

        let raw_settings = section("settings")
            .map(|s| s.children_as_properties("setting"))
            .transpose()
            .map_err(wrap("settings"))?
            .unwrap_or_default();
        let validated = settings::validate(raw_settings).map_err(wrap("settings"))?;
        tracing::debug!(count = validated.len(), "Validated settings");
        apply_vfs_and_log(&validated, &mut configuration);

        if let Some(aliases) = section("typeAliases") {
            self.register_aliases(aliases, &mut configuration)
                .map_err(wrap("typeAliases"))?;
        }
        if let Some(plugins) = section("plugins") {
            self.install_plugins(plugins, &mut configuration)
                .map_err(wrap("plugins"))?;
        }
        let extensions = &self.collaborators.extensions;
        if let Some(element) = section("objectFactory") {
            configuration.object_factory = Some(
                install(&extensions.object_factories, element, &configuration, |factory, properties| {
                    factory.set_properties(properties)
                })
                .map_err(wrap("objectFactory"))?,
            );
        }
        if let Some(element) = section("objectWrapperFactory") {
            configuration.object_wrapper_factory = Some(
                install(&extensions.object_wrapper_factories, element, &configuration, |_, _| Ok(()))
                    .map_err(wrap("objectWrapperFactory"))?,
            );
        }
        if let Some(element) = section("reflectorFactory") {
            configuration.reflector_factory = Some(
                install(&extensions.reflector_factories, element, &configuration, |_, _| Ok(()))
                    .map_err(wrap("reflectorFactory"))?,
            );
        }

        configuration.settings =
            Settings::parse(&validated, &configuration.type_aliases).map_err(wrap("settings"))?;

        if let Some(environments) = section("environments") {
            let environment = self
                .select_environment(environments, &configuration)
                .map_err(wrap("environments"))?;
            configuration.environment = Some(environment);
        }
        if let Some(provider) = section("databaseIdProvider") {
            self.detect_database_id(provider, &mut configuration)
                .map_err(wrap("databaseIdProvider"))?;
        }
        if let Some(handlers) = section("typeHandlers") {
            self.register_type_handlers(handlers, &mut configuration)
                .map_err(wrap("typeHandlers"))?;
        }
        if let Some(mappers) = section("mappers") {
            self.load_mappers(mappers, &mut configuration)?;
        }

        Ok(configuration)
    }

    fn resolve_variables(&self, section: Option<&Node>) -> Result<Properties> {
        let Some(node) = section else {
            return Ok(self.overrides.clone());
        };
        let section = Element::new(node, &self.overrides);
        let resource = section.attribute("resource");
        let url = section.attribute("url");
        VariableResolver::new(
            self.collaborators.resources.as_ref(),
            &self.collaborators.property_parsers,
        )
        .resolve(
            &section.children_as_properties("property")?,
            resource.as_deref(),
            url.as_deref(),
            &self.overrides,
        )
    }

    fn register_aliases(&self, section: Element<'_>, configuration: &mut Configuration) -> Result<()> {
        let types = self.collaborators.types.as_ref();
        for entry in section.children() {
            match entry.name() {
                "package" => {
                    let package = required(entry, "name")?;
                    for descriptor in types
                        .types_in(&package)
                        .into_iter()
                        .filter(TypeDescriptor::is_registrable)
                    {
                        configuration
                            .type_aliases
                            .register(descriptor.alias_or_simple_name(), descriptor.name.clone())?;
                    }
                }
                "typeAlias" => {
                    let type_ref = TypeRef::from(required(entry, "type")?);
                    let alias = match entry.attribute("alias") {
                        Some(alias) => alias,
                        None => types
                            .describe(&type_ref)
                            .map(|descriptor| descriptor.alias_or_simple_name().to_string())
                            .unwrap_or_else(|| type_ref.simple_name().to_string()),
                    };
                    configuration.type_aliases.register(&alias, type_ref)?;
                }
                _ => return Err(unexpected("typeAliases", entry)),
            }
        }
        Ok(())
    }

    fn install_plugins(&self, section: Element<'_>, configuration: &mut Configuration) -> Result<()> {
        for entry in section.children() {
            if entry.name() != "plugin" {
                return Err(unexpected("plugins", entry));
            }
            let type_ref = configuration
                .type_aliases
                .resolve(&required(entry, "interceptor")?);
            let properties = entry.children_as_properties("property")?;
            let mut interceptor = self.collaborators.extensions.interceptors.create(&type_ref)?;
            interceptor.set_properties(&properties)?;
            tracing::debug!(interceptor = %type_ref, "Installed plugin");
            configuration
                .interceptors
                .push(Installed::new(type_ref, properties, interceptor));
        }
        Ok(())
    }

    fn select_environment(&self, section: Element<'_>, configuration: &Configuration) -> Result<Environment> {
        let mut blocks = Vec::new();
        for entry in section.children() {
            if entry.name() != "environment" {
                return Err(unexpected("environments", entry));
            }
            blocks.push(entry);
        }
        let default = section.attribute("default");
        EnvironmentSelector::new(&self.collaborators.extensions, &configuration.type_aliases)
            .select(&blocks, self.environment.as_deref(), default.as_deref())
    }

    fn detect_database_id(&self, section: Element<'_>, configuration: &mut Configuration) -> Result<()> {
        let Some(environment) = configuration.environment.as_ref() else {
            tracing::debug!("No environment selected, skipping database id detection");
            return Ok(());
        };
        let mut name = required(section, "type")?;
        if name == "VENDOR" {
            name = "DB_VENDOR".to_string();
        }
        let type_ref = configuration.type_aliases.resolve(&name);
        let mut provider = self
            .collaborators
            .extensions
            .database_id_providers
            .create(&type_ref)?;
        provider.set_properties(&section.children_as_properties("property")?)?;
        let database_id = provider.database_id(environment.data_source())?;
        tracing::debug!(database_id = ?database_id, "Detected database id");
        configuration.database_id = database_id;
        Ok(())
    }

    fn register_type_handlers(&self, section: Element<'_>, configuration: &mut Configuration) -> Result<()> {
        let types = self.collaborators.types.as_ref();
        for entry in section.children() {
            match entry.name() {
                "package" => {
                    let package = required(entry, "name")?;
                    for descriptor in types
                        .types_in(&package)
                        .into_iter()
                        .filter(TypeDescriptor::is_registrable)
                    {
                        let handler = descriptor.name.clone();
                        self.register_handler(None, None, handler, Some(&descriptor), configuration)?;
                    }
                }
                "typeHandler" => {
                    let handler = configuration.type_aliases.resolve(&required(entry, "handler")?);
                    let value_type = entry
                        .attribute("valueType")
                        .map(|name| configuration.type_aliases.resolve(&name));
                    let column_type = entry
                        .attribute("columnType")
                        .map(|raw| {
                            raw.parse::<ColumnType>()
                                .map_err(|_| ConfigError::InvalidAttribute {
                                    element: "typeHandler".to_string(),
                                    attribute: "columnType".to_string(),
                                    value: raw.clone(),
                                })
                        })
                        .transpose()?;
                    let descriptor = types.describe(&handler);
                    self.register_handler(value_type, column_type, handler, descriptor.as_ref(), configuration)?;
                }
                _ => return Err(unexpected("typeHandlers", entry)),
            }
        }
        Ok(())
    }

    /// Registers one handler under every value type and column type it applies to.
    ///
    /// Explicit attributes win over what the type enumerator declares for the
    /// handler. A handler with no known value type is kept as unmapped.
    fn register_handler(
        &self,
        value_type: Option<TypeRef>,
        column_type: Option<ColumnType>,
        handler_type: TypeRef,
        descriptor: Option<&TypeDescriptor>,
        configuration: &mut Configuration,
    ) -> Result<()> {
        let instance: Arc<dyn TypeHandler> =
            Arc::from(self.collaborators.extensions.type_handlers.create(&handler_type)?);
        let registered = RegisteredHandler::new(handler_type, instance);

        let value_types = match value_type {
            Some(value_type) => vec![value_type],
            None => descriptor.map(|d| d.mapped_types.clone()).unwrap_or_default(),
        };
        if value_types.is_empty() {
            configuration.type_handlers.register_unmapped(registered);
            return Ok(());
        }

        let column_types: Vec<Option<ColumnType>> = match (column_type, descriptor) {
            (Some(column_type), _) => vec![Some(column_type)],
            (None, Some(d)) if !d.mapped_column_types.is_empty() => {
                d.mapped_column_types.iter().copied().map(Some).collect()
            }
            (None, _) => vec![None],
        };
        for value_type in value_types {
            for column_type in &column_types {
                configuration
                    .type_handlers
                    .register(value_type.clone(), *column_type, registered.clone());
            }
        }
        Ok(())
    }

    fn load_mappers(&self, section: Element<'_>, configuration: &mut Configuration) -> Result<()> {
        let loader = MapperLoader::new(
            self.collaborators.resources.as_ref(),
            self.collaborators.types.as_ref(),
            self.collaborators.compiler.as_ref(),
        );
        for entry in section.children() {
            let source = MapperSource::from_element(entry).map_err(wrap("mappers"))?;
            loader
                .load(&source, configuration)
                .map_err(|error| ConfigError::build(format!("processing <mappers> {source}"), error))?;
        }
        Ok(())
    }
}

/// Creates, configures and wraps a singleton extension named by a `type` attribute.
fn install<T: ?Sized>(
    table: &FactoryTable<T>,
    element: Element<'_>,
    configuration: &Configuration,
    configure: impl FnOnce(&mut T, &Properties) -> Result<()>,
) -> Result<Installed<T>> {
    let type_ref = configuration.type_aliases.resolve(&required(element, "type")?);
    let properties = element.children_as_properties("property")?;
    let mut instance = table.create(&type_ref)?;
    configure(instance.as_mut(), &properties)?;
    tracing::debug!(section = element.name(), type_ref = %type_ref, "Installed factory");
    Ok(Installed::new(type_ref, properties, instance))
}

fn apply_vfs_and_log(settings: &ValidatedSettings, configuration: &mut Configuration) {
    if let Some(value) = settings.get(VFS_IMPL) {
        for name in value.as_str().split(',').map(str::trim).filter(|name| !name.is_empty()) {
            let vfs = configuration.type_aliases.resolve(name);
            tracing::debug!(vfs = %vfs, "Added VFS implementation");
            configuration.vfs_impls.push(vfs);
        }
    }
    if let Some(value) = settings.get(LOG_IMPL) {
        let log = configuration.type_aliases.resolve(value.as_str());
        tracing::debug!(log = %log, "Selected log implementation");
        configuration.log_impl = Some(log);
    }
}
