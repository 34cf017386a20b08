// SPDX-License-Identifier: MIT OR Apache-2.0

//! Session factory trait definition.
//!
//! A session factory is the runtime's entry point. It wraps a finished
//! [`Configuration`] and hands it out read-only to everything that opens sessions.

use crate::domain::configuration::Configuration;
use std::sync::Arc;

/// The runtime entry point that owns a finished configuration.
///
/// # Examples
///
/// ```rust
/// use mapcfg::domain::{Configuration, SessionFactory};
/// use std::sync::Arc;
///
/// struct MyFactory(Arc<Configuration>);
///
/// impl SessionFactory for MyFactory {
///     fn configuration(&self) -> &Arc<Configuration> {
///         &self.0
///     }
/// }
///
/// let factory = MyFactory(Arc::new(Configuration::new()));
/// assert!(factory.configuration().environment().is_none());
/// ```
pub trait SessionFactory: Send + Sync {
    /// Returns the shared, read-only configuration.
    fn configuration(&self) -> &Arc<Configuration>;

    /// Returns the id of the selected environment, if any.
    fn environment_id(&self) -> Option<&str> {
        self.configuration().environment().map(|environment| environment.id())
    }

    /// Returns the detected database id, if any.
    fn database_id(&self) -> Option<&str> {
        self.configuration().database_id()
    }
}
