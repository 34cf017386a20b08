// SPDX-License-Identifier: MIT OR Apache-2.0

//! YAML adapters: the configuration document parser and the YAML property file parser.
//!
//! A configuration document is a YAML mapping. Scalar entries become attributes,
//! nested mappings become child elements and sequences become repeated child
//! elements. An optional top-level `configuration` key wraps the sections.
//!
//! Repeated keys group entries by kind, so a section mixing `mapper` and
//! `package` entries loses their relative order. A section may instead be
//! written as a sequence of single-key mappings, which keeps document order:
//!
//! ```yaml
//! mappers:
//!   - mapper: { resource: a.yaml }
//!   - package: { name: com.example.dao }
//!   - mapper: { resource: b.yaml }
//! ```

use crate::domain::{ConfigError, Node, Properties, Result};
use crate::ports::{ConfigParser, DocumentParser};
use serde_yaml::Value;
use std::io::Read;

/// Maximum accepted document size (10MB).
const MAX_DOCUMENT_SIZE: u64 = 10 * 1024 * 1024;

/// Name of the root element and of the optional wrapper key.
pub const ROOT_ELEMENT: &str = "configuration";

/// Reads a stream to its end, refusing documents above the size limit.
pub(crate) fn read_limited(reader: &mut dyn Read) -> Result<String> {
    let mut content = String::new();
    reader.take(MAX_DOCUMENT_SIZE + 1).read_to_string(&mut content)?;
    if content.len() as u64 > MAX_DOCUMENT_SIZE {
        return Err(ConfigError::parse(format!(
            "Document too large (max {} bytes)",
            MAX_DOCUMENT_SIZE
        )));
    }
    Ok(content)
}

fn yaml_error(e: serde_yaml::Error) -> ConfigError {
    ConfigError::ParseError {
        message: format!("Failed to parse YAML: {}", e),
        source: Some(Box::new(e)),
    }
}

/// YAML property file parser.
///
/// This parser converts YAML files into flat key-value maps using dot notation
/// for nested structures.
///
/// # Examples
///
/// ```rust
/// use mapcfg::adapters::YamlParser;
/// use mapcfg::ports::ConfigParser;
///
/// let parser = YamlParser::new();
/// let yaml_content = "database:\n  host: localhost\n  port: 5432";
/// let result = parser.parse(yaml_content).unwrap();
/// assert_eq!(result.get("database.host"), Some(&"localhost".to_string()));
/// ```
#[derive(Debug, Clone, Default)]
pub struct YamlParser;

impl YamlParser {
    /// Creates a new YAML parser.
    pub fn new() -> Self {
        YamlParser
    }

    /// Flattens a YAML value into a flat map with dot notation keys.
    fn flatten_yaml(value: &Value, prefix: &str, result: &mut Properties) {
        match value {
            Value::Mapping(map) => {
                for (key, val) in map {
                    if let Some(key_str) = scalar_text(key) {
                        let new_prefix = if prefix.is_empty() {
                            key_str
                        } else {
                            format!("{}.{}", prefix, key_str)
                        };
                        Self::flatten_yaml(val, &new_prefix, result);
                    }
                }
            }
            Value::Sequence(seq) => {
                for (i, val) in seq.iter().enumerate() {
                    let new_prefix = format!("{}.{}", prefix, i);
                    Self::flatten_yaml(val, &new_prefix, result);
                }
            }
            Value::Null => {
                result.insert(prefix.to_string(), String::new());
            }
            Value::Tagged(tagged) => Self::flatten_yaml(&tagged.value, prefix, result),
            scalar => {
                if let Some(text) = scalar_text(scalar) {
                    result.insert(prefix.to_string(), text);
                }
            }
        }
    }
}

impl ConfigParser for YamlParser {
    fn parse(&self, content: &str) -> Result<Properties> {
        let value: Value = serde_yaml::from_str(content).map_err(yaml_error)?;

        let mut result = Properties::new();
        Self::flatten_yaml(&value, "", &mut result);
        Ok(result)
    }

    fn supported_extensions(&self) -> &[&str] {
        &["yaml", "yml"]
    }
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Parses YAML configuration documents into a [`Node`] tree.
///
/// # Examples
///
/// ```rust
/// use mapcfg::adapters::YamlDocumentParser;
/// use mapcfg::ports::DocumentParser;
///
/// let yaml = "settings:\n  setting:\n    - { name: cacheEnabled, value: false }\n";
/// let root = YamlDocumentParser::new()
///     .parse_document(&mut yaml.as_bytes())
///     .unwrap();
///
/// let setting = &root.children()[0].children()[0];
/// assert_eq!(setting.raw_attribute("value"), Some("false"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct YamlDocumentParser;

impl YamlDocumentParser {
    /// Creates a new document parser.
    pub fn new() -> Self {
        YamlDocumentParser
    }

    /// Parses document text.
    pub fn parse_str(&self, content: &str) -> Result<Node> {
        let value: Value = serde_yaml::from_str(content).map_err(yaml_error)?;
        let value = match value {
            Value::Null => Value::Mapping(Default::default()),
            other => other,
        };

        let body = match &value {
            Value::Mapping(map) if map.len() == 1 => match map.get(ROOT_ELEMENT) {
                Some(Value::Null) => return Ok(Node::new(ROOT_ELEMENT)),
                Some(inner) => inner,
                None => &value,
            },
            _ => &value,
        };
        root_node(body)
    }
}

impl DocumentParser for YamlDocumentParser {
    fn parse_document(&self, reader: &mut dyn Read) -> Result<Node> {
        let content = read_limited(reader)?;
        self.parse_str(&content)
    }
}

fn to_node(name: &str, value: &Value) -> Result<Node> {
    let Value::Mapping(map) = value else {
        return Err(ConfigError::parse(format!(
            "Element <{}> must be a mapping",
            name
        )));
    };

    let mut node = Node::new(name);
    for (key, entry) in map {
        let key = scalar_text(key)
            .ok_or_else(|| ConfigError::parse(format!("Element <{}> has a non-scalar key", name)))?;
        push_entry(&mut node, &key, entry)?;
    }
    Ok(node)
}

fn root_node(value: &Value) -> Result<Node> {
    let Value::Mapping(map) = value else {
        return Err(ConfigError::parse(format!(
            "Element <{}> must be a mapping",
            ROOT_ELEMENT
        )));
    };

    let mut root = Node::new(ROOT_ELEMENT);
    for (key, entry) in map {
        let key = scalar_text(key).ok_or_else(|| {
            ConfigError::parse(format!("Element <{}> has a non-scalar key", ROOT_ELEMENT))
        })?;
        match entry {
            Value::Sequence(items) => root.push_child(ordered_section(&key, items)?),
            _ => push_entry(&mut root, &key, entry)?,
        }
    }
    Ok(root)
}

/// Builds a section from a list of single-key mappings, one entry each.
fn ordered_section(name: &str, items: &[Value]) -> Result<Node> {
    let mut section = Node::new(name);
    for item in items {
        let entry = match item {
            Value::Mapping(map) if map.len() == 1 => map.iter().next(),
            _ => None,
        };
        let (key, value) = entry
            .and_then(|(key, value)| Some((scalar_text(key)?, value)))
            .ok_or_else(|| {
                ConfigError::parse(format!(
                    "Entries of <{}> must be single-key mappings",
                    name
                ))
            })?;
        section.push_child(to_node(&key, value)?);
    }
    Ok(section)
}

fn push_entry(node: &mut Node, key: &str, entry: &Value) -> Result<()> {
    match entry {
        Value::Mapping(_) => node.push_child(to_node(key, entry)?),
        Value::Sequence(items) => {
            for item in items {
                match item {
                    Value::Mapping(_) => node.push_child(to_node(key, item)?),
                    scalar => {
                        let text = scalar_text(scalar).ok_or_else(|| {
                            ConfigError::parse(format!("Unsupported item in <{}> list", key))
                        })?;
                        node.push_child(Node::new(key).with_body(text));
                    }
                }
            }
        }
        Value::Null => node.set_attribute(key, ""),
        Value::Tagged(tagged) => push_entry(node, key, &tagged.value)?,
        scalar => {
            let text = scalar_text(scalar)
                .ok_or_else(|| ConfigError::parse(format!("Unsupported value for '{}'", key)))?;
            node.set_attribute(key, text);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_yaml_parser_nested() {
        let parser = YamlParser::new();
        let yaml = r#"
database:
  host: localhost
  port: 5432
"#;
        let result = parser.parse(yaml).unwrap();

        assert_eq!(result.get("database.host"), Some(&"localhost".to_string()));
        assert_eq!(result.get("database.port"), Some(&"5432".to_string()));
    }

    #[test]
    fn test_yaml_parser_array_and_mixed_types() {
        let parser = YamlParser::new();
        let yaml = r#"
servers:
  - server1
  - server2
enabled: true
empty: null
"#;
        let result = parser.parse(yaml).unwrap();

        assert_eq!(result.get("servers.0"), Some(&"server1".to_string()));
        assert_eq!(result.get("servers.1"), Some(&"server2".to_string()));
        assert_eq!(result.get("enabled"), Some(&"true".to_string()));
        assert_eq!(result.get("empty"), Some(&"".to_string()));
    }

    #[test]
    fn test_yaml_parser_invalid() {
        let parser = YamlParser::new();
        assert!(parser.parse("invalid: yaml: content:").is_err());
    }

    #[test]
    fn test_yaml_parser_supports() {
        let parser = YamlParser::new();
        assert!(parser.supports("db.yaml"));
        assert!(parser.supports("db.YML"));
        assert!(!parser.supports("db.properties"));
    }

    #[test]
    fn test_document_wrapper_is_optional() {
        let parser = YamlDocumentParser::new();
        let wrapped = parser
            .parse_str("configuration:\n  mappers:\n    mapper:\n      - resource: a.yaml\n")
            .unwrap();
        let bare = parser
            .parse_str("mappers:\n  mapper:\n    - resource: a.yaml\n")
            .unwrap();

        assert_eq!(wrapped, bare);
        assert_eq!(wrapped.name(), ROOT_ELEMENT);
        assert_eq!(wrapped.children()[0].name(), "mappers");
    }

    #[test]
    fn test_document_scalars_become_attributes() {
        let parser = YamlDocumentParser::new();
        let root = parser
            .parse_str("environments:\n  default: dev\n  environment:\n    - id: dev\n      transactionManager: { type: JDBC }\n")
            .unwrap();

        let environments = &root.children()[0];
        assert_eq!(environments.raw_attribute("default"), Some("dev"));
        let environment = &environments.children()[0];
        assert_eq!(environment.name(), "environment");
        assert_eq!(environment.raw_attribute("id"), Some("dev"));
        assert_eq!(
            environment.children()[0].raw_attribute("type"),
            Some("JDBC")
        );
    }

    #[test]
    fn test_document_sequences_repeat_children() {
        let parser = YamlDocumentParser::new();
        let root = parser
            .parse_str("typeAliases:\n  typeAlias:\n    - { alias: a, type: x.A }\n    - { alias: b, type: x.B }\n  package:\n    - { name: x.model }\n")
            .unwrap();

        let aliases = &root.children()[0];
        let names: Vec<&str> = aliases.children().iter().map(|c| c.name()).collect();
        assert_eq!(names, vec!["typeAlias", "typeAlias", "package"]);
    }

    #[test]
    fn test_document_ordered_section_keeps_order() {
        let parser = YamlDocumentParser::new();
        let root = parser
            .parse_str("mappers:\n  - mapper: { resource: a.yaml }\n  - package: { name: x.dao }\n  - mapper: { resource: b.yaml }\n")
            .unwrap();

        let mappers = &root.children()[0];
        assert_eq!(mappers.name(), "mappers");
        let names: Vec<&str> = mappers.children().iter().map(|c| c.name()).collect();
        assert_eq!(names, vec!["mapper", "package", "mapper"]);
        assert_eq!(mappers.children()[2].raw_attribute("resource"), Some("b.yaml"));
    }

    #[test]
    fn test_document_ordered_section_rejects_bare_items() {
        let parser = YamlDocumentParser::new();
        assert!(parser.parse_str("mappers:\n  - a.yaml\n").is_err());
        assert!(parser
            .parse_str("mappers:\n  - { mapper: { resource: a.yaml }, package: { name: x } }\n")
            .is_err());
    }

    #[test]
    fn test_document_numbers_and_booleans_are_text() {
        let parser = YamlDocumentParser::new();
        let root = parser
            .parse_str("settings:\n  setting:\n    - { name: defaultFetchSize, value: 100 }\n    - { name: cacheEnabled, value: false }\n")
            .unwrap();

        let settings = &root.children()[0];
        assert_eq!(settings.children()[0].raw_attribute("value"), Some("100"));
        assert_eq!(settings.children()[1].raw_attribute("value"), Some("false"));
    }

    #[test]
    fn test_document_placeholders_stay_raw() {
        let parser = YamlDocumentParser::new();
        let root = parser.parse_str("mappers:\n  mapper:\n    - resource: \"${dir}/a.yaml\"\n").unwrap();
        assert_eq!(
            root.children()[0].children()[0].raw_attribute("resource"),
            Some("${dir}/a.yaml")
        );
    }

    #[test]
    fn test_empty_document() {
        let parser = YamlDocumentParser::new();
        assert!(parser.parse_str("").unwrap().children().is_empty());
        assert!(parser.parse_str("configuration:\n").unwrap().children().is_empty());
    }

    #[test]
    fn test_document_must_be_a_mapping() {
        let parser = YamlDocumentParser::new();
        let error = parser.parse_str("- a\n- b\n").unwrap_err();
        assert!(matches!(error, ConfigError::ParseError { .. }));
    }

    #[test]
    fn test_parse_document_reads_stream() {
        let parser = YamlDocumentParser::new();
        let mut reader = std::io::Cursor::new(b"settings: {}\n".to_vec());
        let root = parser.parse_document(&mut reader).unwrap();
        assert_eq!(root.children()[0].name(), "settings");
        assert_eq!(reader.position(), 13);
    }
}
