// SPDX-License-Identifier: MIT OR Apache-2.0

//! Resource loader adapters.
//!
//! [`FileSystemResourceLoader`] resolves resource names against an ordered list of
//! search roots and opens `file://` URLs. [`MemoryResourceLoader`] serves
//! resources from memory and is mostly useful for embedding and tests.

use crate::domain::{ConfigError, Result};
use crate::ports::ResourceLoader;
use directories::ProjectDirs;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{Cursor, Read};
use std::path::{Component, Path, PathBuf};

const FILE_SCHEME: &str = "file://";

/// Loads resources from the file system.
///
/// # Examples
///
/// ```rust,no_run
/// use mapcfg::adapters::FileSystemResourceLoader;
/// use mapcfg::ports::ResourceLoader;
///
/// let loader = FileSystemResourceLoader::new(["/etc/myapp", "/usr/share/myapp"]);
/// let stream = loader.open_resource("com/example/EmpMapper.yaml").unwrap();
/// ```
#[derive(Debug, Clone, Default)]
pub struct FileSystemResourceLoader {
    roots: Vec<PathBuf>,
}

impl FileSystemResourceLoader {
    /// Creates a loader searching `roots` in order.
    pub fn new<I, P>(roots: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        FileSystemResourceLoader {
            roots: roots.into_iter().map(Into::into).collect(),
        }
    }

    /// Creates a loader searching the current working directory.
    pub fn current_dir() -> Self {
        Self::new([PathBuf::from(".")])
    }

    /// Appends a search root.
    pub fn with_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.roots.push(root.into());
        self
    }

    /// Appends the OS-appropriate configuration directory of an application.
    ///
    /// This method uses the `directories` crate to determine the configuration
    /// directory for the current operating system.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ResourceNotFound` when no home directory is known.
    pub fn with_default_location(self, app_name: &str, qualifier: &str) -> Result<Self> {
        let dirs = ProjectDirs::from(qualifier, "", app_name)
            .ok_or_else(|| ConfigError::not_found("configuration directory", app_name))?;
        Ok(self.with_root(dirs.config_dir()))
    }

    /// Returns the search roots in order.
    pub fn roots(&self) -> &[PathBuf] {
        &self.roots
    }

    fn locate(&self, name: &str) -> Option<PathBuf> {
        let relative = Path::new(name);
        let confined = relative
            .components()
            .all(|component| matches!(component, Component::Normal(_) | Component::CurDir));
        if !confined {
            return None;
        }
        self.roots
            .iter()
            .map(|root| root.join(relative))
            .find(|candidate| candidate.is_file())
    }
}

impl ResourceLoader for FileSystemResourceLoader {
    fn open_resource(&self, name: &str) -> Result<Box<dyn Read + Send>> {
        let path = self
            .locate(name)
            .ok_or_else(|| ConfigError::not_found("resource", name))?;
        tracing::debug!(resource = name, path = %path.display(), "Opening resource");
        Ok(Box::new(File::open(path)?))
    }

    fn open_url(&self, url: &str) -> Result<Box<dyn Read + Send>> {
        let path = url.strip_prefix(FILE_SCHEME).ok_or_else(|| ConfigError::InvalidAttribute {
            element: "resource".to_string(),
            attribute: "url".to_string(),
            value: url.to_string(),
        })?;
        let file = File::open(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => ConfigError::not_found("url", url),
            _ => ConfigError::IoError(e),
        })?;
        tracing::debug!(url, "Opening URL");
        Ok(Box::new(file))
    }

    fn exists(&self, name: &str) -> bool {
        self.locate(name).is_some()
    }
}

/// Serves resources and URLs from memory.
///
/// # Examples
///
/// ```rust
/// use mapcfg::adapters::MemoryResourceLoader;
/// use mapcfg::ports::ResourceLoader;
/// use std::io::Read;
///
/// let loader = MemoryResourceLoader::new().with_resource("db.properties", "url=jdbc:h2:mem");
/// let mut text = String::new();
/// loader.open_resource("db.properties").unwrap().read_to_string(&mut text).unwrap();
/// assert_eq!(text, "url=jdbc:h2:mem");
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemoryResourceLoader {
    resources: BTreeMap<String, Vec<u8>>,
    urls: BTreeMap<String, Vec<u8>>,
}

impl MemoryResourceLoader {
    /// Creates an empty loader.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a named resource.
    pub fn with_resource(mut self, name: impl Into<String>, content: impl Into<Vec<u8>>) -> Self {
        self.resources.insert(name.into(), content.into());
        self
    }

    /// Adds a URL.
    pub fn with_url(mut self, url: impl Into<String>, content: impl Into<Vec<u8>>) -> Self {
        self.urls.insert(url.into(), content.into());
        self
    }
}

impl ResourceLoader for MemoryResourceLoader {
    fn open_resource(&self, name: &str) -> Result<Box<dyn Read + Send>> {
        let content = self
            .resources
            .get(name)
            .ok_or_else(|| ConfigError::not_found("resource", name))?;
        Ok(Box::new(Cursor::new(content.clone())))
    }

    fn open_url(&self, url: &str) -> Result<Box<dyn Read + Send>> {
        let content = self
            .urls
            .get(url)
            .ok_or_else(|| ConfigError::not_found("url", url))?;
        Ok(Box::new(Cursor::new(content.clone())))
    }

    fn exists(&self, name: &str) -> bool {
        self.resources.contains_key(name)
    }
}
