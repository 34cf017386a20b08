// SPDX-License-Identifier: MIT OR Apache-2.0

//! Resolution of the build variables.
//!
//! Variables come from three layers: inline `property` children of the
//! `properties` section, an external property file named by `resource` or
//! `url`, and the caller's overrides. Later layers win.

use crate::adapters::PropertiesParser;
use crate::domain::variables::layer;
use crate::domain::{ConfigError, Properties, Result};
use crate::ports::{ConfigParser, ResourceLoader};
use std::io::Read;

/// Loads and layers the build variables.
pub struct VariableResolver<'a> {
    resources: &'a dyn ResourceLoader,
    parsers: &'a [Box<dyn ConfigParser>],
}

impl<'a> VariableResolver<'a> {
    /// Creates a resolver reading external files through `resources`.
    ///
    /// The parser for an external file is the first of `parsers` that supports
    /// its extension; files no parser claims are read as `.properties`.
    pub fn new(resources: &'a dyn ResourceLoader, parsers: &'a [Box<dyn ConfigParser>]) -> Self {
        VariableResolver { resources, parsers }
    }

    /// Layers `inline` < external file < `overrides`.
    ///
    /// # Errors
    ///
    /// Returns `ConflictingSource` when both `resource` and `url` are given,
    /// before anything is read. Missing files and parse failures propagate.
    pub fn resolve(
        &self,
        inline: &Properties,
        resource: Option<&str>,
        url: Option<&str>,
        overrides: &Properties,
    ) -> Result<Properties> {
        let external = match (resource, url) {
            (Some(_), Some(_)) => {
                return Err(ConfigError::ConflictingSource {
                    element: "properties".to_string(),
                })
            }
            (Some(resource), None) => {
                let reader = self.resources.open_resource(resource)?;
                self.parse_file(resource, reader)?
            }
            (None, Some(url)) => {
                let reader = self.resources.open_url(url)?;
                self.parse_file(url, reader)?
            }
            (None, None) => Properties::new(),
        };

        let resolved = layer([inline, &external, overrides]);
        tracing::debug!(
            inline = inline.len(),
            external = external.len(),
            overrides = overrides.len(),
            resolved = resolved.len(),
            "Resolved variables"
        );
        Ok(resolved)
    }

    fn parse_file(&self, name: &str, mut reader: Box<dyn Read + Send>) -> Result<Properties> {
        let mut content = String::new();
        reader.read_to_string(&mut content)?;

        match self.parsers.iter().find(|parser| parser.supports(name)) {
            Some(parser) => parser.parse(&content),
            None => {
                tracing::debug!(file = name, "No parser claims extension, reading as .properties");
                PropertiesParser.parse(&content)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::{MemoryResourceLoader, YamlParser};

    fn props(pairs: &[(&str, &str)]) -> Properties {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn parsers() -> Vec<Box<dyn ConfigParser>> {
        vec![Box::new(PropertiesParser), Box::new(YamlParser)]
    }

    #[test]
    fn test_layering_order() {
        let loader = MemoryResourceLoader::new().with_resource("db.properties", "a=2\nb=3\n");
        let parsers = parsers();
        let resolver = VariableResolver::new(&loader, &parsers);

        let resolved = resolver
            .resolve(
                &props(&[("a", "1")]),
                Some("db.properties"),
                None,
                &props(&[("b", "4")]),
            )
            .unwrap();

        assert_eq!(resolved, props(&[("a", "2"), ("b", "4")]));
    }

    #[test]
    fn test_resource_and_url_conflict() {
        let loader = MemoryResourceLoader::new();
        let parsers = parsers();
        let resolver = VariableResolver::new(&loader, &parsers);

        let error = resolver
            .resolve(
                &Properties::new(),
                Some("missing.properties"),
                Some("file:///missing.properties"),
                &Properties::new(),
            )
            .unwrap_err();
        assert!(matches!(error, ConfigError::ConflictingSource { element } if element == "properties"));
    }

    #[test]
    fn test_yaml_file_is_flattened() {
        let loader = MemoryResourceLoader::new().with_resource("db.yaml", "db:\n  url: jdbc:h2:mem\n");
        let parsers = parsers();
        let resolver = VariableResolver::new(&loader, &parsers);

        let resolved = resolver
            .resolve(&Properties::new(), Some("db.yaml"), None, &Properties::new())
            .unwrap();
        assert_eq!(resolved.get("db.url").map(String::as_str), Some("jdbc:h2:mem"));
    }

    #[test]
    fn test_unknown_extension_reads_as_properties() {
        let loader = MemoryResourceLoader::new().with_url("file:///etc/app/db.conf", "user: scott\n");
        let parsers = parsers();
        let resolver = VariableResolver::new(&loader, &parsers);

        let resolved = resolver
            .resolve(
                &Properties::new(),
                None,
                Some("file:///etc/app/db.conf"),
                &Properties::new(),
            )
            .unwrap();
        assert_eq!(resolved.get("user").map(String::as_str), Some("scott"));
    }

    #[test]
    fn test_missing_resource() {
        let loader = MemoryResourceLoader::new();
        let parsers = parsers();
        let resolver = VariableResolver::new(&loader, &parsers);

        let error = resolver
            .resolve(&Properties::new(), Some("nope.properties"), None, &Properties::new())
            .unwrap_err();
        assert!(matches!(error, ConfigError::ResourceNotFound { .. }));
    }

    #[test]
    fn test_overrides_alone() {
        let loader = MemoryResourceLoader::new();
        let parsers = parsers();
        let resolver = VariableResolver::new(&loader, &parsers);

        let overrides = props(&[("x", "1")]);
        let resolved = resolver
            .resolve(&Properties::new(), None, None, &overrides)
            .unwrap();
        assert_eq!(resolved, overrides);
    }
}
