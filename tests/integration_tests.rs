// SPDX-License-Identifier: MIT OR Apache-2.0

//! End-to-end tests compiling configuration documents from disk and memory.

mod common;

use common::{
    catalog, document_path, full_tree, init_tracing, props, write_tree, RecordingInterceptor,
};
use mapcfg::domain::aliases::builtin;
use mapcfg::domain::type_handlers::ScalarTypeHandler;
use mapcfg::domain::{ColumnType, ConfigError, SessionFactory, TypeRef};
use mapcfg::service::{Collaborators, ConfigBuilder, SessionFactoryBuilder};
use std::path::Path;

fn builder(root: &Path) -> SessionFactoryBuilder {
    let mut builder = SessionFactoryBuilder::new()
        .with_resource_roots([root])
        .with_types(catalog());
    let extensions = builder.extensions_mut();
    extensions
        .interceptors
        .register("com.example.AuditInterceptor", || Box::<RecordingInterceptor>::default());
    extensions.type_handlers.register("com.example.MoneyHandler", || {
        Box::new(ScalarTypeHandler::new("com.example.Money"))
    });
    builder
}

#[test]
fn test_full_document_builds() {
    init_tracing();
    let dir = full_tree();
    let factory = builder(dir.path())
        .build_from_path(document_path(&dir), None, None)
        .unwrap();
    let configuration = factory.configuration();

    // variables: inline < file
    let variables = configuration.variables();
    assert_eq!(variables.get("username").map(String::as_str), Some("file_user"));
    assert_eq!(variables.get("schema").map(String::as_str), Some("hr"));

    let settings = configuration.settings();
    assert!(!settings.cache_enabled);
    assert_eq!(settings.default_statement_timeout, Some(25));
    assert!(settings.map_underscore_to_camel_case);
    assert_eq!(configuration.log_impl(), Some(&TypeRef::from(builtin::TRACING_LOG)));

    let aliases = configuration.type_aliases();
    assert_eq!(aliases.resolve("emp"), TypeRef::from("com.example.Emp"));
    assert_eq!(aliases.resolve("dept"), TypeRef::from("com.example.model.Dept"));
    assert_eq!(aliases.resolve("proj"), TypeRef::from("com.example.model.Project"));
    assert!(!aliases.contains("phase"));

    let interceptors = configuration.interceptors();
    assert_eq!(interceptors.len(), 1);
    assert_eq!(interceptors[0].properties().get("schema").map(String::as_str), Some("hr"));

    assert_eq!(factory.environment_id(), Some("development"));
    let environment = configuration.environment().unwrap();
    assert_eq!(
        environment.data_source().url(),
        Some("jdbc:mysql://localhost:3306/hr")
    );
    assert_eq!(
        environment.data_source_factory().properties().get("username").map(String::as_str),
        Some("file_user")
    );
    assert_eq!(factory.database_id(), Some("mysql"));

    let money = configuration
        .type_handlers()
        .lookup(&TypeRef::from("com.example.Money"), Some(ColumnType::Decimal))
        .unwrap();
    assert_eq!(money.handler_type().as_str(), "com.example.MoneyHandler");

    let mappers: Vec<&str> = configuration.mappers().iter().map(TypeRef::as_str).collect();
    assert_eq!(
        mappers,
        vec![
            "com.example.dao.DeptMapper",
            "com.example.dao.EmpMapper",
            "com.example.reporting.AuditReportMapper",
            "com.example.reporting.SalesReportMapper",
        ]
    );
    assert!(configuration.is_resource_loaded("com/example/dao/EmpMapper.yaml"));

    assert_eq!(configuration.mapped_statements().count(), 3);
    let select_all = configuration
        .mapped_statement("com.example.dao.EmpMapper.selectAll")
        .unwrap();
    assert_eq!(select_all.sql, "select id, name, dept_id from hr.emp");
    assert!(select_all.database_id.is_none());
}

#[test]
fn test_alias_in_mapping_resolves_to_same_type() {
    let dir = full_tree();
    let factory = builder(dir.path())
        .build_from_path(document_path(&dir), None, None)
        .unwrap();
    let configuration = factory.configuration();

    let by_alias = configuration
        .mapped_statement("com.example.dao.EmpMapper.selectAll")
        .and_then(|s| s.result_type.clone());
    let by_name = configuration
        .mapped_statement("com.example.dao.EmpMapper.selectById")
        .and_then(|s| s.result_type.clone());
    assert_eq!(by_alias, Some(TypeRef::from("com.example.Emp")));
    assert_eq!(by_alias, by_name);
}

#[test]
fn test_requested_environment_drives_database_id() {
    let dir = full_tree();
    let factory = builder(dir.path())
        .build_from_path(document_path(&dir), Some("production"), None)
        .unwrap();
    let configuration = factory.configuration();

    assert_eq!(factory.environment_id(), Some("production"));
    assert_eq!(
        configuration.environment().unwrap().transaction_factory().type_ref().as_str(),
        builtin::MANAGED_TRANSACTION
    );
    assert_eq!(factory.database_id(), Some("postgres"));

    let select_all = configuration
        .mapped_statement("com.example.dao.EmpMapper.selectAll")
        .unwrap();
    assert_eq!(select_all.database_id.as_deref(), Some("postgres"));
    assert!(select_all.sql.ends_with("limit 1000"));
}

#[test]
fn test_variable_layering() {
    let dir = write_tree(&[("vars.properties", "a=2\nb=3\n")]);
    let document = r#"
properties:
  resource: vars.properties
  property:
    - { name: a, value: "1" }
"#;
    let factory = SessionFactoryBuilder::new()
        .with_resource_roots([dir.path()])
        .build_from_str(document, None, Some(props(&[("b", "4")])))
        .unwrap();
    assert_eq!(factory.configuration().variables(), &props(&[("a", "2"), ("b", "4")]));
}

#[test]
fn test_conflicting_source_fails_before_later_stages() {
    let document = r#"
properties:
  resource: db.properties
  url: file:///etc/app/db.properties
plugins:
  plugin:
    - { interceptor: com.example.Missing }
"#;
    let error = SessionFactoryBuilder::new()
        .build_from_str(document, None, None)
        .unwrap_err();
    match &error {
        ConfigError::Build { context, .. } => assert_eq!(context, "processing <properties>"),
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(matches!(error.root_cause(), ConfigError::ConflictingSource { .. }));
}

#[test]
fn test_unknown_setting_names_key() {
    let document = r#"
settings:
  setting:
    - { name: cacheEnabled, value: "false" }
    - { name: cacheEnabeld, value: "false" }
"#;
    let error = SessionFactoryBuilder::new()
        .build_from_str(document, None, None)
        .unwrap_err();
    assert!(matches!(
        error.root_cause(),
        ConfigError::UnknownSetting { key } if key == "cacheEnabeld"
    ));
    assert!(error.to_string().contains("cacheEnabeld"));
}

#[test]
fn test_mapper_without_source_is_ambiguous() {
    let error = SessionFactoryBuilder::new()
        .build_from_str("mappers:\n  mapper:\n    - {}\n", None, None)
        .unwrap_err();
    assert!(matches!(
        error.root_cause(),
        ConfigError::AmbiguousMapperSource { declared } if declared.is_empty()
    ));
}

#[test]
fn test_mapper_with_two_sources_is_ambiguous() {
    let error = builder(Path::new("."))
        .build_from_str(
            "mappers:\n  mapper:\n    - { url: \"file:///x.yaml\", class: com.example.dao.EmpMapper }\n",
            None,
            None,
        )
        .unwrap_err();
    assert!(matches!(
        error.root_cause(),
        ConfigError::AmbiguousMapperSource { declared } if declared == "url, class"
    ));
}

#[test]
fn test_single_class_registers_one_mapper() {
    let factory = builder(Path::new("/nonexistent"))
        .build_from_str(
            "mappers:\n  mapper:\n    - { class: com.example.dao.DeptMapper }\n",
            None,
            None,
        )
        .unwrap();
    assert_eq!(factory.configuration().mappers().len(), 1);
}

#[test]
fn test_duplicate_mapper() {
    let error = builder(Path::new("/nonexistent"))
        .build_from_str(
            r#"
mappers:
  mapper:
    - { class: com.example.dao.DeptMapper }
    - { class: com.example.dao.DeptMapper }
"#,
            None,
            None,
        )
        .unwrap_err();
    assert!(matches!(error.root_cause(), ConfigError::DuplicateMapper { .. }));
}

#[test]
fn test_duplicate_environment_last_wins() {
    let document = r#"
environments:
  default: dev
  environment:
    - id: dev
      transactionManager: { type: JDBC }
      dataSource:
        type: UNPOOLED
        property:
          - { name: url, value: "jdbc:h2:mem:first" }
    - id: dev
      transactionManager: { type: JDBC }
      dataSource:
        type: UNPOOLED
        property:
          - { name: url, value: "jdbc:h2:mem:second" }
"#;
    let factory = SessionFactoryBuilder::new()
        .build_from_str(document, None, None)
        .unwrap();
    let environment = factory.configuration().environment().unwrap();
    assert_eq!(environment.data_source().url(), Some("jdbc:h2:mem:second"));
}

#[test]
fn test_environment_without_target() {
    let document = r#"
environments:
  environment:
    - id: dev
      transactionManager: { type: JDBC }
      dataSource: { type: UNPOOLED }
"#;
    let error = SessionFactoryBuilder::new()
        .build_from_str(document, None, None)
        .unwrap_err();
    assert!(matches!(error.root_cause(), ConfigError::NoEnvironmentSpecified));
}

#[test]
fn test_minimal_document() {
    let document = r#"
settings:
  setting:
    - { name: useGeneratedKeys, value: "true" }
    - { name: defaultExecutorType, value: REUSE }
"#;
    let factory = SessionFactoryBuilder::new()
        .build_from_str(document, None, None)
        .unwrap();
    let configuration = factory.configuration();
    assert!(configuration.environment().is_none());
    assert!(configuration.mappers().is_empty());
    assert!(configuration.database_id().is_none());
    assert!(configuration.settings().use_generated_keys);
}

#[test]
fn test_builder_runs_once() {
    let collaborators = Collaborators::default();
    let mut builder =
        ConfigBuilder::new(&mut "settings: {}\n".as_bytes(), None, None, &collaborators).unwrap();
    assert!(builder.parse().is_ok());
    assert!(matches!(builder.parse(), Err(ConfigError::AlreadyBuilt)));
}

#[test]
fn test_missing_mapping_resource_names_it() {
    let dir = write_tree(&[]);
    let error = builder(dir.path())
        .build_from_str(
            "mappers:\n  mapper:\n    - { resource: com/example/Missing.yaml }\n",
            None,
            None,
        )
        .unwrap_err();
    match &error {
        ConfigError::Build { context, .. } => assert!(context.contains("com/example/Missing.yaml")),
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(matches!(error.root_cause(), ConfigError::ResourceNotFound { .. }));
}

#[test]
fn test_malformed_document() {
    let error = SessionFactoryBuilder::new()
        .build_from_str("settings: [unclosed\n", None, None)
        .unwrap_err();
    assert!(matches!(
        &error,
        ConfigError::Build { context, .. } if context == "parsing the configuration document"
    ));
}

#[test]
fn test_empty_environments_section_fails() {
    let error = SessionFactoryBuilder::new()
        .build_from_str("environments:\n  default: dev\n", None, None)
        .unwrap_err();
    assert!(matches!(
        error.root_cause(),
        ConfigError::EnvironmentNotFound { id } if id == "dev"
    ));

    let error = SessionFactoryBuilder::new()
        .build_from_str("environments: {}\n", None, None)
        .unwrap_err();
    assert!(matches!(error.root_cause(), ConfigError::NoEnvironmentSpecified));
}

#[test]
fn test_misspelled_environment_block_fails() {
    let document = r#"
environments:
  default: dev
  enviroment:
    - id: dev
      transactionManager: { type: JDBC }
      dataSource: { type: UNPOOLED }
"#;
    let error = SessionFactoryBuilder::new()
        .build_from_str(document, None, None)
        .unwrap_err();
    match &error {
        ConfigError::Build { context, .. } => assert_eq!(context, "processing <environments>"),
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(matches!(error.root_cause(), ConfigError::ParseError { .. }));
}

#[test]
fn test_root_level_scalars_fail() {
    let error = SessionFactoryBuilder::new()
        .build_from_str("cacheEnabled: false\nsetings: oops\n", None, None)
        .unwrap_err();
    assert!(matches!(error.root_cause(), ConfigError::ParseError { .. }));
}

#[test]
fn test_malformed_setting_entries_fail() {
    let error = SessionFactoryBuilder::new()
        .build_from_str("settings:\n  setting:\n    - { value: \"false\" }\n", None, None)
        .unwrap_err();
    assert!(matches!(
        error.root_cause(),
        ConfigError::MissingAttribute { attribute, .. } if attribute == "name"
    ));

    let error = SessionFactoryBuilder::new()
        .build_from_str("settings:\n  setings:\n    - { name: cacheEnabled, value: \"false\" }\n", None, None)
        .unwrap_err();
    assert!(matches!(error.root_cause(), ConfigError::ParseError { .. }));
}

#[test]
fn test_failed_parse_still_consumes_builder() {
    let collaborators = Collaborators::default();
    let mut builder = ConfigBuilder::new(
        &mut "environments:\n  default: dev\n".as_bytes(),
        None,
        None,
        &collaborators,
    )
    .unwrap();
    assert!(builder.parse().is_err());
    assert!(matches!(builder.parse(), Err(ConfigError::AlreadyBuilt)));
}

#[test]
fn test_ordered_mappers_section() {
    let dir = full_tree();
    let document = r#"
mappers:
  - package: { name: com.example.reporting }
  - mapper: { class: com.example.dao.DeptMapper }
"#;
    let factory = builder(dir.path()).build_from_str(document, None, None).unwrap();
    let mappers: Vec<&str> = factory.configuration().mappers().iter().map(TypeRef::as_str).collect();
    assert_eq!(
        mappers,
        vec![
            "com.example.dao.DeptMapper",
            "com.example.reporting.AuditReportMapper",
            "com.example.reporting.SalesReportMapper",
        ]
    );
}
