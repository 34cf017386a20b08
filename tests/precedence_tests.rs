// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests for variable precedence across property sources.

mod common;

use common::{props, write_tree, StaticSource};
use mapcfg::prelude::*;
use std::env;

/// Helper to set and clean up environment variables
struct EnvGuard {
    keys: Vec<String>,
}

impl EnvGuard {
    fn new() -> Self {
        EnvGuard { keys: Vec::new() }
    }

    fn set(&mut self, key: &str, value: &str) {
        env::set_var(key, value);
        self.keys.push(key.to_string());
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        for key in &self.keys {
            env::remove_var(key);
        }
    }
}

const DOCUMENT: &str = r#"
properties:
  resource: db.properties
  property:
    - { name: db.url, value: "jdbc:h2:mem:inline" }
    - { name: db.user, value: inline }
environments:
  default: dev
  environment:
    - id: dev
      transactionManager: { type: JDBC }
      dataSource:
        type: UNPOOLED
        property:
          - { name: url, value: "${db.url}" }
          - { name: username, value: "${db.user}" }
"#;

fn data_source_url(factory: &DefaultSessionFactory) -> Option<String> {
    factory
        .configuration()
        .environment()
        .and_then(|e| e.data_source().url().map(str::to_string))
}

#[test]
fn test_file_over_inline() {
    let dir = write_tree(&[("db.properties", "db.url=jdbc:h2:mem:file\n")]);
    let factory = SessionFactoryBuilder::new()
        .with_resource_roots([dir.path()])
        .build_from_str(DOCUMENT, None, None)
        .unwrap();

    assert_eq!(data_source_url(&factory).as_deref(), Some("jdbc:h2:mem:file"));
    assert_eq!(
        factory.configuration().variables().get("db.user").map(String::as_str),
        Some("inline")
    );
}

#[test]
#[cfg(feature = "env")]
fn test_env_over_file() {
    let mut guard = EnvGuard::new();
    guard.set("PRECEDENCE_ENV_DB_URL", "jdbc:h2:mem:env");

    let dir = write_tree(&[("db.properties", "db.url=jdbc:h2:mem:file\n")]);
    let factory = SessionFactoryBuilder::new()
        .with_resource_roots([dir.path()])
        .with_env_prefix("PRECEDENCE_ENV_")
        .build_from_str(DOCUMENT, None, None)
        .unwrap();

    assert_eq!(data_source_url(&factory).as_deref(), Some("jdbc:h2:mem:env"));
}

#[test]
#[cfg(all(feature = "env", feature = "cli"))]
fn test_cli_over_env() {
    let mut guard = EnvGuard::new();
    guard.set("PRECEDENCE_CLI_DB_URL", "jdbc:h2:mem:env");
    guard.set("PRECEDENCE_CLI_DB_USER", "env_user");

    let dir = write_tree(&[("db.properties", "")]);
    let factory = SessionFactoryBuilder::new()
        .with_resource_roots([dir.path()])
        .with_env_prefix("PRECEDENCE_CLI_")
        .with_cli_args(vec!["--property", "db.url=jdbc:h2:mem:cli"])
        .build_from_str(DOCUMENT, None, None)
        .unwrap();

    let variables = factory.configuration().variables();
    assert_eq!(data_source_url(&factory).as_deref(), Some("jdbc:h2:mem:cli"));
    assert_eq!(variables.get("db.user").map(String::as_str), Some("env_user"));
}

#[test]
#[cfg(feature = "cli")]
fn test_explicit_properties_over_cli() {
    let dir = write_tree(&[("db.properties", "")]);
    let factory = SessionFactoryBuilder::new()
        .with_resource_roots([dir.path()])
        .with_cli_args(vec!["-Pdb.url=jdbc:h2:mem:cli", "-Pdb.user=cli_user"])
        .build_from_str(DOCUMENT, None, Some(props(&[("db.url", "jdbc:h2:mem:explicit")])))
        .unwrap();

    assert_eq!(data_source_url(&factory).as_deref(), Some("jdbc:h2:mem:explicit"));
    assert_eq!(
        factory.configuration().variables().get("db.user").map(String::as_str),
        Some("cli_user")
    );
}

#[test]
fn test_source_priority_not_insertion_order() {
    let dir = write_tree(&[("db.properties", "")]);
    let factory = SessionFactoryBuilder::new()
        .with_resource_roots([dir.path()])
        .with_source(Box::new(StaticSource::new("high", 9, &[("db.url", "jdbc:h2:mem:high")])))
        .with_source(Box::new(StaticSource::new("low", 1, &[("db.url", "jdbc:h2:mem:low")])))
        .build_from_str(DOCUMENT, None, None)
        .unwrap();

    assert_eq!(data_source_url(&factory).as_deref(), Some("jdbc:h2:mem:high"));
}

#[test]
fn test_overrides_visible_to_property_file_location() {
    let dir = write_tree(&[
        ("conf/staging.properties", "db.url=jdbc:h2:mem:staging\n"),
        ("db.properties", ""),
    ]);
    let document = r#"
properties:
  resource: "conf/${profile}.properties"
"#;
    let factory = SessionFactoryBuilder::new()
        .with_resource_roots([dir.path()])
        .build_from_str(document, None, Some(props(&[("profile", "staging")])))
        .unwrap();

    assert_eq!(
        factory.configuration().variables().get("db.url").map(String::as_str),
        Some("jdbc:h2:mem:staging")
    );
}
