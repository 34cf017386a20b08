// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the configuration compiler.
//!
//! Every stage of the build reports failures through [`ConfigError`]. Stage-level
//! errors propagate unmodified up to the builder, which wraps them exactly once in
//! [`ConfigError::Build`] together with a description of what was being processed.

use thiserror::Error;

/// The main error type for configuration build operations.
///
/// This enum is marked as `#[non_exhaustive]` to allow for future additions
/// without breaking backwards compatibility.
///
/// # Examples
///
/// ```
/// use mapcfg::domain::errors::ConfigError;
///
/// let cause = ConfigError::UnknownSetting {
///     key: "cacheEnabeld".to_string(),
/// };
/// let error = ConfigError::build("processing <settings>", cause);
///
/// assert!(matches!(error.root_cause(), ConfigError::UnknownSetting { .. }));
/// ```
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// The builder has already produced its configuration.
    #[error("Each configuration builder can only be used once")]
    AlreadyBuilt,

    /// A setting name is not one of the known settings.
    #[error("The setting '{key}' is not known. Make sure you spelled it correctly (case sensitive)")]
    UnknownSetting {
        /// The offending setting name
        key: String,
    },

    /// A setting value could not be parsed as the setting's declared type.
    #[error("Setting '{key}' expects {expected}, got '{value}'")]
    SettingType {
        /// The setting name
        key: String,
        /// Human readable description of the expected type
        expected: String,
        /// The raw value that failed to parse
        value: String,
    },

    /// An element declared two mutually exclusive external sources.
    #[error("The <{element}> element cannot specify both a URL and a resource based reference. Please specify one or the other")]
    ConflictingSource {
        /// The element carrying both attributes
        element: String,
    },

    /// A mapper entry declared zero or several sources.
    #[error("A mapper element may only specify one of resource, url, class or package, found [{declared}]")]
    AmbiguousMapperSource {
        /// Comma separated names of the declared attributes (empty when none)
        declared: String,
    },

    /// An environment block has no `id` attribute.
    #[error("Environment requires an id attribute")]
    MissingEnvironmentId,

    /// Neither the caller nor the document named the environment to use.
    #[error("No environment specified")]
    NoEnvironmentSpecified,

    /// No environment block matched the requested id.
    #[error("No environment declared with id '{id}'")]
    EnvironmentNotFound {
        /// The requested environment id
        id: String,
    },

    /// A selected environment block is missing one of its factories.
    #[error("Environment '{environment}' requires a {factory}")]
    MissingFactory {
        /// The environment id
        environment: String,
        /// Which factory is missing ("transaction manager" or "data source")
        factory: &'static str,
    },

    /// A mapper interface was registered twice.
    #[error("Type {mapper} is already known to the mapper registry")]
    DuplicateMapper {
        /// The mapper interface
        mapper: String,
    },

    /// A type alias was re-registered to a different type.
    #[error("The alias '{alias}' is already mapped to the value '{existing}', cannot map it to '{requested}'")]
    DuplicateAlias {
        /// The alias name (lower-cased)
        alias: String,
        /// The type the alias already maps to
        existing: String,
        /// The type the alias was requested to map to
        requested: String,
    },

    /// A mapped statement id was declared twice.
    #[error("Mapped statements collection already contains value for {id}")]
    DuplicateStatement {
        /// The fully qualified statement id
        id: String,
    },

    /// A top-level section appeared more than once.
    #[error("The <{section}> section may only be declared once")]
    DuplicateSection {
        /// The section name
        section: String,
    },

    /// A referenced resource, URL, type or extension could not be found.
    #[error("Could not find {kind} '{name}'")]
    ResourceNotFound {
        /// What kind of thing was looked up (resource, url, type, interceptor, ...)
        kind: String,
        /// The name that was looked up
        name: String,
    },

    /// A required attribute is absent from an element.
    #[error("The <{element}> element requires the '{attribute}' attribute")]
    MissingAttribute {
        /// The element name
        element: String,
        /// The missing attribute
        attribute: String,
    },

    /// An attribute value is not acceptable.
    #[error("Invalid value '{value}' for attribute '{attribute}' of <{element}>")]
    InvalidAttribute {
        /// The element name
        element: String,
        /// The attribute name
        attribute: String,
        /// The rejected value
        value: String,
    },

    /// An extension was configured with a property it does not understand.
    #[error("Unknown {owner} property: {key}")]
    UnknownProperty {
        /// The kind of extension being configured
        owner: String,
        /// The rejected property name
        key: String,
    },

    /// Failed to parse a document or property file.
    #[error("Failed to parse configuration: {message}")]
    ParseError {
        /// The error message
        message: String,
        /// The underlying parsing error
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// An I/O error occurred while reading a document or resource.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// A build stage failed; wraps the stage-level cause.
    #[error("Error building configuration while {context}. Cause: {source}")]
    Build {
        /// What the builder was processing when the failure occurred
        context: String,
        /// The stage-level cause
        #[source]
        source: Box<ConfigError>,
    },
}

impl ConfigError {
    /// Wraps a stage-level error with a description of the failing stage.
    pub fn build(context: impl Into<String>, source: ConfigError) -> Self {
        ConfigError::Build {
            context: context.into(),
            source: Box::new(source),
        }
    }

    /// Creates a parse error without an underlying source.
    pub fn parse(message: impl Into<String>) -> Self {
        ConfigError::ParseError {
            message: message.into(),
            source: None,
        }
    }

    /// Creates a `ResourceNotFound` error.
    pub fn not_found(kind: impl Into<String>, name: impl Into<String>) -> Self {
        ConfigError::ResourceNotFound {
            kind: kind.into(),
            name: name.into(),
        }
    }

    /// Returns the innermost stage-level error, skipping any `Build` wrappers.
    pub fn root_cause(&self) -> &ConfigError {
        let mut current = self;
        while let ConfigError::Build { source, .. } = current {
            current = source;
        }
        current
    }
}

/// A specialized Result type for configuration operations.
pub type Result<T> = std::result::Result<T, ConfigError>;
