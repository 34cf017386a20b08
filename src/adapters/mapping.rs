// SPDX-License-Identifier: MIT OR Apache-2.0

//! YAML mapping document compiler.
//!
//! A mapping document declares a namespace, shared SQL fragments and statements:
//!
//! ```yaml
//! namespace: com.example.dao.EmpMapper
//! sql:
//!   - { id: columns, sql: "id, name, dept_id" }
//! select:
//!   - id: selectAll
//!     resultType: emp
//!     sql: select <include refid="columns"/> from emp
//!   - id: selectAll
//!     databaseId: oracle
//!     resultType: emp
//!     sql: select <include refid="columns"/> from emp where rownum < 1000
//! ```
//!
//! When the configuration has a database id, fragments and statements declared
//! for that id win over the ones declared without one; entries declared for any
//! other id are skipped.

use crate::adapters::yaml::read_limited;
use crate::domain::mappers::{MappedStatement, StatementKind};
use crate::domain::variables::substitute;
use crate::domain::{ConfigError, Configuration, Result};
use crate::ports::{CompiledMapping, MappingCompiler};
use serde::Deserialize;
use std::collections::BTreeSet;
use std::io::Read;

const INCLUDE_OPEN: &str = "<include";
const INCLUDE_CLOSE: &str = "/>";
const MAX_INCLUDE_DEPTH: usize = 16;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct MappingDocument {
    namespace: Option<String>,
    #[serde(default)]
    sql: Vec<FragmentEntry>,
    #[serde(default)]
    select: Vec<StatementEntry>,
    #[serde(default)]
    insert: Vec<StatementEntry>,
    #[serde(default)]
    update: Vec<StatementEntry>,
    #[serde(default)]
    delete: Vec<StatementEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct FragmentEntry {
    id: String,
    database_id: Option<String>,
    sql: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct StatementEntry {
    id: String,
    parameter_type: Option<String>,
    result_type: Option<String>,
    database_id: Option<String>,
    sql: String,
}

/// Compiles YAML mapping documents.
#[derive(Debug, Clone, Default)]
pub struct YamlMappingCompiler;

impl YamlMappingCompiler {
    /// Creates a new compiler.
    pub fn new() -> Self {
        YamlMappingCompiler
    }
}

impl MappingCompiler for YamlMappingCompiler {
    fn compile(
        &self,
        reader: &mut dyn Read,
        resource: &str,
        configuration: &mut Configuration,
    ) -> Result<CompiledMapping> {
        let content = substitute(&read_limited(reader)?, configuration.variables());
        let document: MappingDocument =
            serde_yaml::from_str(&content).map_err(|e| ConfigError::ParseError {
                message: format!("Failed to parse mapping document '{}': {}", resource, e),
                source: Some(Box::new(e)),
            })?;

        let namespace = document
            .namespace
            .as_deref()
            .map(str::trim)
            .filter(|ns| !ns.is_empty())
            .ok_or_else(|| ConfigError::MissingAttribute {
                element: "mapper".to_string(),
                attribute: "namespace".to_string(),
            })?
            .to_string();

        let database_id = configuration.database_id().map(str::to_string);
        let fragments = add_fragments(&document.sql, &namespace, database_id.as_deref(), configuration);

        let mut statements = 0;
        for (kind, entries) in [
            (StatementKind::Select, &document.select),
            (StatementKind::Insert, &document.insert),
            (StatementKind::Update, &document.update),
            (StatementKind::Delete, &document.delete),
        ] {
            statements += add_statements(kind, entries, &namespace, resource, database_id.as_deref(), configuration)?;
        }

        tracing::debug!(resource, namespace = %namespace, statements, fragments, "Compiled mapping document");
        Ok(CompiledMapping {
            namespace: Some(namespace),
            statements,
            fragments,
        })
    }
}

fn qualify(namespace: &str, id: &str) -> String {
    if id.contains('.') {
        id.to_string()
    } else {
        format!("{}.{}", namespace, id)
    }
}

/// Adds the fragments that apply to `database_id`, specific ones first.
fn add_fragments(
    entries: &[FragmentEntry],
    namespace: &str,
    database_id: Option<&str>,
    configuration: &mut Configuration,
) -> usize {
    let mut specific = BTreeSet::new();
    if let Some(required) = database_id {
        for entry in entries.iter().filter(|e| e.database_id.as_deref() == Some(required)) {
            let id = qualify(namespace, &entry.id);
            configuration.add_sql_fragment(id.clone(), entry.sql.clone());
            specific.insert(id);
        }
    }
    let mut added = specific.len();
    for entry in entries.iter().filter(|e| e.database_id.is_none()) {
        let id = qualify(namespace, &entry.id);
        if !specific.contains(&id) {
            configuration.add_sql_fragment(id, entry.sql.clone());
            added += 1;
        }
    }
    added
}

/// Adds the statements that apply to `database_id`, specific ones first.
fn add_statements(
    kind: StatementKind,
    entries: &[StatementEntry],
    namespace: &str,
    resource: &str,
    database_id: Option<&str>,
    configuration: &mut Configuration,
) -> Result<usize> {
    let mut added = 0;
    if let Some(required) = database_id {
        for entry in entries.iter().filter(|e| e.database_id.as_deref() == Some(required)) {
            add_statement(kind, entry, namespace, resource, configuration)?;
            added += 1;
        }
    }
    for entry in entries.iter().filter(|e| e.database_id.is_none()) {
        let id = qualify(namespace, &entry.id);
        let shadowed = configuration
            .mapped_statement(&id)
            .map_or(false, |previous| previous.database_id.is_some());
        if shadowed {
            continue;
        }
        add_statement(kind, entry, namespace, resource, configuration)?;
        added += 1;
    }
    Ok(added)
}

fn add_statement(
    kind: StatementKind,
    entry: &StatementEntry,
    namespace: &str,
    resource: &str,
    configuration: &mut Configuration,
) -> Result<()> {
    let aliases = configuration.type_aliases();
    let statement = MappedStatement {
        id: qualify(namespace, &entry.id),
        kind,
        parameter_type: entry.parameter_type.as_deref().map(|t| aliases.resolve(t)),
        result_type: entry.result_type.as_deref().map(|t| aliases.resolve(t)),
        database_id: entry.database_id.clone(),
        sql: expand_includes(&entry.sql, namespace, configuration, 0)?.trim().to_string(),
        resource: resource.to_string(),
    };
    configuration.add_mapped_statement(statement)
}

/// Replaces every `<include refid="..."/>` with the referenced fragment.
fn expand_includes(
    text: &str,
    namespace: &str,
    configuration: &Configuration,
    depth: usize,
) -> Result<String> {
    if depth > MAX_INCLUDE_DEPTH {
        return Err(ConfigError::parse(format!(
            "SQL fragment includes nest deeper than {} levels",
            MAX_INCLUDE_DEPTH
        )));
    }

    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(start) = rest.find(INCLUDE_OPEN) {
        out.push_str(&rest[..start]);
        let tag = &rest[start..];
        let end = tag
            .find(INCLUDE_CLOSE)
            .ok_or_else(|| ConfigError::parse("Unterminated <include> element"))?;
        let refid = include_refid(&tag[..end])?;
        let id = qualify(namespace, &refid);
        let fragment = configuration
            .sql_fragment(&id)
            .ok_or_else(|| ConfigError::not_found("sql fragment", id.as_str()))?;
        out.push_str(&expand_includes(fragment, namespace, configuration, depth + 1)?);
        rest = &tag[end + INCLUDE_CLOSE.len()..];
    }
    out.push_str(rest);
    Ok(out)
}

fn include_refid(tag: &str) -> Result<String> {
    let missing = || ConfigError::MissingAttribute {
        element: "include".to_string(),
        attribute: "refid".to_string(),
    };
    let after = tag.split_once("refid").ok_or_else(missing)?.1.trim_start();
    let after = after.strip_prefix('=').ok_or_else(missing)?.trim_start();
    let quote = after.chars().next().filter(|c| *c == '"' || *c == '\'').ok_or_else(missing)?;
    let value = &after[1..];
    let close = value.find(quote).ok_or_else(missing)?;
    Ok(value[..close].to_string())
}
