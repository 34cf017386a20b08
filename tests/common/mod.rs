// SPDX-License-Identifier: MIT OR Apache-2.0

//! Shared fixtures for the integration tests.

use mapcfg::adapters::StaticTypeCatalog;
use mapcfg::domain::{Properties, Result};
use mapcfg::ports::{Interceptor, PropertySource, TypeDescriptor};
use std::fs;
use tempfile::TempDir;

/// A complete configuration document exercising every section.
#[allow(dead_code)]
pub const FULL_DOCUMENT: &str = r#"
configuration:
  properties:
    resource: db.properties
    property:
      - { name: username, value: dev_user }
      - { name: schema, value: hr }
  settings:
    setting:
      - { name: cacheEnabled, value: "false" }
      - { name: defaultStatementTimeout, value: "25" }
      - { name: mapUnderscoreToCamelCase, value: "true" }
      - { name: logImpl, value: TRACING }
  typeAliases:
    typeAlias:
      - { alias: emp, type: com.example.Emp }
    package:
      - { name: com.example.model }
  plugins:
    plugin:
      - interceptor: com.example.AuditInterceptor
        property:
          - { name: schema, value: "${schema}" }
  environments:
    default: development
    environment:
      - id: development
        transactionManager: { type: JDBC }
        dataSource:
          type: POOLED
          property:
            - { name: driver, value: "${driver}" }
            - { name: url, value: "${url}" }
            - { name: username, value: "${username}" }
            - { name: poolMaximumActiveConnections, value: "5" }
      - id: production
        transactionManager: { type: MANAGED }
        dataSource:
          type: UNPOOLED
          property:
            - { name: url, value: "jdbc:postgresql://db/prod" }
  databaseIdProvider:
    type: DB_VENDOR
    property:
      - { name: MySQL, value: mysql }
      - { name: PostgreSQL, value: postgres }
  typeHandlers:
    typeHandler:
      - { valueType: com.example.Money, columnType: DECIMAL, handler: com.example.MoneyHandler }
  mappers:
    mapper:
      - { resource: com/example/dao/EmpMapper.yaml }
      - { class: com.example.dao.DeptMapper }
    package:
      - { name: com.example.reporting }
"#;

/// Property file referenced by [`FULL_DOCUMENT`].
#[allow(dead_code)]
pub const DB_PROPERTIES: &str = "\
driver=com.mysql.Driver
url=jdbc:mysql://localhost:3306/hr
# overrides the inline value
username=file_user
";

/// Mapping document bound to `com.example.dao.EmpMapper`.
#[allow(dead_code)]
pub const EMP_MAPPER: &str = r#"
namespace: com.example.dao.EmpMapper
sql:
  - { id: columns, sql: "id, name, dept_id" }
select:
  - id: selectAll
    resultType: emp
    sql: 'select <include refid="columns"/> from ${schema}.emp'
  - id: selectAll
    databaseId: postgres
    resultType: emp
    sql: 'select <include refid="columns"/> from ${schema}.emp limit 1000'
  - id: selectById
    parameterType: long
    resultType: com.example.Emp
    sql: 'select <include refid="columns"/> from ${schema}.emp where id = #{id}'
insert:
  - id: insert
    parameterType: emp
    sql: 'insert into ${schema}.emp (id, name) values (#{id}, #{name})'
"#;

/// Type catalog describing the application types of [`FULL_DOCUMENT`].
#[allow(dead_code)]
pub fn catalog() -> StaticTypeCatalog {
    StaticTypeCatalog::new()
        .with_type(TypeDescriptor::concrete("com.example.Emp"))
        .with_type(TypeDescriptor::concrete("com.example.model.Dept"))
        .with_type(TypeDescriptor::concrete("com.example.model.Project").with_alias("proj"))
        .with_type(TypeDescriptor::concrete("com.example.model.Project.Phase").nested())
        .with_type(TypeDescriptor::concrete("com.example.MoneyHandler"))
        .with_type(TypeDescriptor::interface("com.example.dao.EmpMapper"))
        .with_type(TypeDescriptor::interface("com.example.dao.DeptMapper"))
        .with_type(TypeDescriptor::concrete("com.example.dao.DaoSupport"))
        .with_type(TypeDescriptor::interface("com.example.reporting.SalesReportMapper"))
        .with_type(TypeDescriptor::interface("com.example.reporting.AuditReportMapper"))
        .with_type(TypeDescriptor::concrete("com.example.reporting.ReportSupport"))
}

/// Writes `files` (relative path, content) below a fresh temporary directory.
#[allow(dead_code)]
pub fn write_tree(files: &[(&str, &str)]) -> TempDir {
    let dir = TempDir::new().unwrap();
    for (path, content) in files {
        let target = dir.path().join(path);
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&target, content).unwrap();
    }
    dir
}

/// Writes the document, property file and mapping of the full fixture.
#[allow(dead_code)]
pub fn full_tree() -> TempDir {
    write_tree(&[
        ("mapcfg.yaml", FULL_DOCUMENT),
        ("db.properties", DB_PROPERTIES),
        ("com/example/dao/EmpMapper.yaml", EMP_MAPPER),
    ])
}

/// Returns the path of the document inside a fixture tree.
#[allow(dead_code)]
pub fn document_path(dir: &TempDir) -> std::path::PathBuf {
    dir.path().join("mapcfg.yaml")
}

/// Routes build logs to the test harness output.
#[allow(dead_code)]
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

/// Builds a property map from pairs.
#[allow(dead_code)]
pub fn props(pairs: &[(&str, &str)]) -> Properties {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

/// An interceptor keeping the properties it was configured with.
#[allow(dead_code)]
#[derive(Debug, Default)]
pub struct RecordingInterceptor {
    /// Properties received through `set_properties`.
    pub properties: Properties,
}

impl Interceptor for RecordingInterceptor {
    fn set_properties(&mut self, properties: &Properties) -> Result<()> {
        self.properties = properties.clone();
        Ok(())
    }
}

/// A property source with fixed values.
#[allow(dead_code)]
#[derive(Debug, Clone)]
pub struct StaticSource {
    name: String,
    priority: u8,
    values: Properties,
}

impl StaticSource {
    /// Creates a source with the given name, priority and values.
    #[allow(dead_code)]
    pub fn new(name: &str, priority: u8, pairs: &[(&str, &str)]) -> Self {
        StaticSource {
            name: name.to_string(),
            priority,
            values: props(pairs),
        }
    }
}

impl PropertySource for StaticSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn priority(&self) -> u8 {
        self.priority
    }

    fn properties(&self) -> Result<Properties> {
        Ok(self.values.clone())
    }
}
