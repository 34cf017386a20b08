// SPDX-License-Identifier: MIT OR Apache-2.0

//! Resource loader trait definition.
//!
//! Property files and mapping documents are referenced either by a resource name
//! relative to the loader's search roots (`com/example/EmpMapper.yaml`) or by a
//! URL (`file:///etc/app/db.properties`).

use crate::domain::Result;
use std::io::Read;

/// Opens named resources and URLs as byte streams.
pub trait ResourceLoader: Send + Sync {
    /// Opens a resource by name.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ResourceNotFound` when no root contains the resource.
    fn open_resource(&self, name: &str) -> Result<Box<dyn Read + Send>>;

    /// Opens a resource by URL.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ResourceNotFound` for unreachable URLs and
    /// `ConfigError::InvalidAttribute` for unsupported schemes.
    fn open_url(&self, url: &str) -> Result<Box<dyn Read + Send>>;

    /// Returns `true` if a resource with this name can be opened.
    fn exists(&self, name: &str) -> bool;
}
