// SPDX-License-Identifier: MIT OR Apache-2.0

//! Loading of mapper declarations.
//!
//! Each entry of the `mappers` section names exactly one source: a mapping
//! resource, a mapping URL, a mapper interface, or a package of interfaces.

use crate::domain::{ConfigError, Configuration, Element, Result, TypeRef};
use crate::ports::{MappingCompiler, ResourceLoader, TypeEnumerator};
use std::fmt;
use std::io::Read;

const NAMESPACE_MARKER: &str = "namespace:";
const MAPPING_EXTENSION: &str = "yaml";

/// The single source declared by a mapper entry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MapperSource {
    /// A mapping document found through the resource loader.
    Resource(String),
    /// A mapping document found by URL.
    Url(String),
    /// A mapper interface.
    Interface(TypeRef),
    /// Every interface in a package.
    Package(String),
}

impl MapperSource {
    /// Reads the source from a `mapper` or `package` entry.
    ///
    /// # Errors
    ///
    /// Returns `AmbiguousMapperSource` when a `mapper` entry declares zero or
    /// several of `resource`, `url`, `class` and `package`.
    pub fn from_element(entry: Element<'_>) -> Result<Self> {
        match entry.name() {
            "package" => entry
                .attribute("name")
                .map(MapperSource::Package)
                .ok_or_else(|| ConfigError::MissingAttribute {
                    element: "package".to_string(),
                    attribute: "name".to_string(),
                }),
            "mapper" => {
                let declared: Vec<(&str, String)> = ["resource", "url", "class", "package"]
                    .into_iter()
                    .filter_map(|name| entry.attribute(name).map(|value| (name, value)))
                    .collect();
                match declared.as_slice() {
                    [("resource", value)] => Ok(MapperSource::Resource(value.clone())),
                    [("url", value)] => Ok(MapperSource::Url(value.clone())),
                    [("class", value)] => Ok(MapperSource::Interface(TypeRef::from(value.as_str()))),
                    [("package", value)] => Ok(MapperSource::Package(value.clone())),
                    _ => Err(ConfigError::AmbiguousMapperSource {
                        declared: declared
                            .iter()
                            .map(|(name, _)| *name)
                            .collect::<Vec<_>>()
                            .join(", "),
                    }),
                }
            }
            other => Err(ConfigError::parse(format!(
                "unexpected <{other}> entry in <mappers>"
            ))),
        }
    }
}

impl fmt::Display for MapperSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MapperSource::Resource(name) => write!(f, "resource '{name}'"),
            MapperSource::Url(url) => write!(f, "url '{url}'"),
            MapperSource::Interface(type_ref) => write!(f, "class '{type_ref}'"),
            MapperSource::Package(package) => write!(f, "package '{package}'"),
        }
    }
}

/// Registers mappers and compiles their mapping documents.
pub struct MapperLoader<'a> {
    resources: &'a dyn ResourceLoader,
    types: &'a dyn TypeEnumerator,
    compiler: &'a dyn MappingCompiler,
}

impl<'a> MapperLoader<'a> {
    /// Creates a loader over the given collaborators.
    pub fn new(
        resources: &'a dyn ResourceLoader,
        types: &'a dyn TypeEnumerator,
        compiler: &'a dyn MappingCompiler,
    ) -> Self {
        MapperLoader {
            resources,
            types,
            compiler,
        }
    }

    /// Loads one mapper source into `configuration`.
    pub fn load(&self, source: &MapperSource, configuration: &mut Configuration) -> Result<()> {
        match source {
            MapperSource::Resource(name) => self.load_resource(name, configuration),
            MapperSource::Url(url) => {
                if configuration.is_resource_loaded(url) {
                    tracing::debug!(url = %url, "Mapping already loaded");
                    return Ok(());
                }
                let reader = self.resources.open_url(url)?;
                self.compile(url, reader, configuration)
            }
            MapperSource::Interface(type_ref) => {
                let descriptor = self
                    .types
                    .describe(type_ref)
                    .ok_or_else(|| ConfigError::not_found("type", type_ref.as_str()))?;
                if !descriptor.is_interface() {
                    tracing::warn!(mapper = %type_ref, "Skipping mapper class that is not an interface");
                    return Ok(());
                }
                self.add_interface(type_ref.clone(), configuration)
            }
            MapperSource::Package(package) => {
                for descriptor in self.types.types_in(package) {
                    if descriptor.is_interface() {
                        self.add_interface(descriptor.name, configuration)?;
                    }
                }
                Ok(())
            }
        }
    }

    fn load_resource(&self, name: &str, configuration: &mut Configuration) -> Result<()> {
        if configuration.is_resource_loaded(name) {
            tracing::debug!(resource = name, "Mapping already loaded");
            return Ok(());
        }
        let reader = self.resources.open_resource(name)?;
        self.compile(name, reader, configuration)
    }

    fn compile(
        &self,
        name: &str,
        mut reader: Box<dyn Read + Send>,
        configuration: &mut Configuration,
    ) -> Result<()> {
        let compiled = self.compiler.compile(&mut reader, name, configuration)?;

        let mut rest = [0u8; 1];
        if reader.read(&mut rest)? != 0 {
            return Err(ConfigError::parse(format!(
                "mapping compiler left unread input in {name}"
            )));
        }
        configuration.add_loaded_resource(name);
        tracing::debug!(
            resource = name,
            namespace = ?compiled.namespace,
            statements = compiled.statements,
            fragments = compiled.fragments,
            "Compiled mapping"
        );

        if let Some(namespace) = compiled.namespace {
            self.bind_namespace(TypeRef::from(namespace), configuration)?;
        }
        Ok(())
    }

    fn bind_namespace(&self, namespace: TypeRef, configuration: &mut Configuration) -> Result<()> {
        let is_interface = self
            .types
            .describe(&namespace)
            .map(|descriptor| descriptor.is_interface())
            .unwrap_or(false);
        if !is_interface || configuration.mappers.has(&namespace) {
            return Ok(());
        }
        configuration.add_loaded_resource(format!("{NAMESPACE_MARKER}{namespace}"));
        self.add_interface(namespace, configuration)
    }

    fn add_interface(&self, type_ref: TypeRef, configuration: &mut Configuration) -> Result<()> {
        configuration.mappers.add(type_ref.clone())?;
        tracing::debug!(mapper = %type_ref, "Registered mapper");

        if configuration.is_resource_loaded(&format!("{NAMESPACE_MARKER}{type_ref}")) {
            return Ok(());
        }
        let sibling = type_ref.resource_path(MAPPING_EXTENSION);
        if self.resources.exists(&sibling) {
            self.load_resource(&sibling, configuration)?;
        }
        Ok(())
    }
}
