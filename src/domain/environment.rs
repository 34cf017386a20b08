// SPDX-License-Identifier: MIT OR Apache-2.0

//! The selected environment: a transaction factory and a data source.

use crate::domain::configuration::Installed;
use crate::ports::extensions::{DataSource, DataSourceFactory, TransactionFactory};

/// The environment chosen for this configuration.
#[derive(Debug)]
pub struct Environment {
    id: String,
    transaction_factory: Installed<dyn TransactionFactory>,
    data_source_factory: Installed<dyn DataSourceFactory>,
    data_source: Box<dyn DataSource>,
}

impl Environment {
    /// Assembles an environment from its configured parts.
    pub fn new(
        id: impl Into<String>,
        transaction_factory: Installed<dyn TransactionFactory>,
        data_source_factory: Installed<dyn DataSourceFactory>,
        data_source: Box<dyn DataSource>,
    ) -> Self {
        Environment {
            id: id.into(),
            transaction_factory,
            data_source_factory,
            data_source,
        }
    }

    /// Returns the environment id.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns the installed transaction factory.
    pub fn transaction_factory(&self) -> &Installed<dyn TransactionFactory> {
        &self.transaction_factory
    }

    /// Returns the installed data source factory.
    pub fn data_source_factory(&self) -> &Installed<dyn DataSourceFactory> {
        &self.data_source_factory
    }

    /// Returns the data source produced by the factory.
    pub fn data_source(&self) -> &dyn DataSource {
        self.data_source.as_ref()
    }
}
