// SPDX-License-Identifier: MIT OR Apache-2.0

//! Selection of the active environment.

use crate::domain::{
    ConfigError, Element, Environment, Installed, Result, TypeAliasRegistry, TypeRef,
};
use crate::ports::{DataSourceFactory, TransactionFactory};
use crate::service::extensions::ExtensionRegistry;

const TRANSACTION_MANAGER: &str = "transactionManager";
const DATA_SOURCE: &str = "dataSource";

/// Picks the environment block to use and builds its factories.
pub struct EnvironmentSelector<'a> {
    extensions: &'a ExtensionRegistry,
    aliases: &'a TypeAliasRegistry,
}

impl<'a> EnvironmentSelector<'a> {
    /// Creates a selector constructing factories from `extensions`.
    pub fn new(extensions: &'a ExtensionRegistry, aliases: &'a TypeAliasRegistry) -> Self {
        EnvironmentSelector {
            extensions,
            aliases,
        }
    }

    /// Selects the block whose id equals `requested`, or `document_default`
    /// when no id was requested.
    ///
    /// Blocks are checked in document order. When several blocks carry the
    /// target id, every one of them is built and the last one is returned.
    ///
    /// # Errors
    ///
    /// - `NoEnvironmentSpecified` when there is no target
    /// - `MissingEnvironmentId` for a block without an `id`
    /// - `MissingFactory` when the selected block lacks a factory
    /// - `EnvironmentNotFound` when no block matches, including when there are none
    pub fn select(
        &self,
        blocks: &[Element<'_>],
        requested: Option<&str>,
        document_default: Option<&str>,
    ) -> Result<Environment> {
        let target = requested
            .or(document_default)
            .ok_or(ConfigError::NoEnvironmentSpecified)?;

        let mut selected = None;
        for block in blocks {
            let id = block
                .attribute("id")
                .ok_or(ConfigError::MissingEnvironmentId)?;
            if id != target {
                continue;
            }
            if selected.is_some() {
                tracing::warn!(environment = %id, "Environment declared more than once, the last declaration wins");
            }
            selected = Some(self.build(&id, *block)?);
        }

        match selected {
            Some(environment) => {
                tracing::debug!(environment = target, "Selected environment");
                Ok(environment)
            }
            None => Err(ConfigError::EnvironmentNotFound {
                id: target.to_string(),
            }),
        }
    }

    fn build(&self, id: &str, block: Element<'_>) -> Result<Environment> {
        let transaction_manager = block
            .child(TRANSACTION_MANAGER)
            .ok_or_else(|| ConfigError::MissingFactory {
                environment: id.to_string(),
                factory: "transaction manager",
            })?;
        let data_source = block
            .child(DATA_SOURCE)
            .ok_or_else(|| ConfigError::MissingFactory {
                environment: id.to_string(),
                factory: "data source",
            })?;

        let transaction_factory = self.transaction_factory(transaction_manager)?;
        let data_source_factory = self.data_source_factory(data_source)?;
        let data_source = data_source_factory.instance().data_source()?;

        Ok(Environment::new(
            id,
            transaction_factory,
            data_source_factory,
            data_source,
        ))
    }

    fn transaction_factory(&self, element: Element<'_>) -> Result<Installed<dyn TransactionFactory>> {
        let type_ref = self.type_attribute(element)?;
        let properties = element.children_as_properties("property")?;
        let mut factory = self.extensions.transaction_factories.create(&type_ref)?;
        factory.set_properties(&properties)?;
        Ok(Installed::new(type_ref, properties, factory))
    }

    fn data_source_factory(&self, element: Element<'_>) -> Result<Installed<dyn DataSourceFactory>> {
        let type_ref = self.type_attribute(element)?;
        let properties = element.children_as_properties("property")?;
        let mut factory = self.extensions.data_source_factories.create(&type_ref)?;
        factory.set_properties(&properties)?;
        Ok(Installed::new(type_ref, properties, factory))
    }

    fn type_attribute(&self, element: Element<'_>) -> Result<TypeRef> {
        let name = element
            .attribute("type")
            .ok_or_else(|| ConfigError::MissingAttribute {
                element: element.name().to_string(),
                attribute: "type".to_string(),
            })?;
        Ok(self.aliases.resolve(&name))
    }
}
