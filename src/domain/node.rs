// SPDX-License-Identifier: MIT OR Apache-2.0

//! Document tree handed to the builder by a document parser.
//!
//! A [`Node`] stores raw, unsubstituted text. The builder reads it through an
//! [`Element`], a borrowed view that applies the current variable set to every
//! attribute and body it returns.

use crate::domain::errors::{ConfigError, Result};
use crate::domain::variables::{substitute, Properties};

/// A named element with ordered attributes, ordered children and optional body text.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Node {
    name: String,
    attributes: Vec<(String, String)>,
    children: Vec<Node>,
    body: Option<String>,
}

impl Node {
    /// Creates an empty element.
    pub fn new(name: impl Into<String>) -> Self {
        Node {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Adds an attribute, replacing an earlier one with the same name.
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_attribute(name, value);
        self
    }

    /// Appends a child element.
    pub fn with_child(mut self, child: Node) -> Self {
        self.children.push(child);
        self
    }

    /// Sets the body text.
    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Adds an attribute, replacing an earlier one with the same name.
    pub fn set_attribute(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.attributes.iter_mut().find(|(n, _)| *n == name) {
            Some(slot) => slot.1 = value,
            None => self.attributes.push((name, value)),
        }
    }

    /// Appends a child element.
    pub fn push_child(&mut self, child: Node) {
        self.children.push(child);
    }

    /// Returns the element name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the raw (unsubstituted) attribute value.
    pub fn raw_attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Returns the raw attribute names in declaration order.
    pub fn attribute_names(&self) -> impl Iterator<Item = &str> {
        self.attributes.iter().map(|(n, _)| n.as_str())
    }

    /// Returns all child elements in document order.
    pub fn children(&self) -> &[Node] {
        &self.children
    }

    /// Returns the raw body text.
    pub fn raw_body(&self) -> Option<&str> {
        self.body.as_deref()
    }
}

/// A borrowed view of a [`Node`] that substitutes variables on every read.
#[derive(Clone, Copy, Debug)]
pub struct Element<'a> {
    node: &'a Node,
    variables: &'a Properties,
}

impl<'a> Element<'a> {
    /// Creates a view of `node` that substitutes from `variables`.
    pub fn new(node: &'a Node, variables: &'a Properties) -> Self {
        Element { node, variables }
    }

    /// Returns the element name.
    pub fn name(&self) -> &'a str {
        self.node.name()
    }

    /// Returns the substituted value of an attribute.
    pub fn attribute(&self, name: &str) -> Option<String> {
        self.node
            .raw_attribute(name)
            .map(|raw| substitute(raw, self.variables))
    }

    /// Returns the substituted body text.
    pub fn body(&self) -> Option<String> {
        self.node.raw_body().map(|raw| substitute(raw, self.variables))
    }

    /// Returns the first child with the given name.
    pub fn child(&self, name: &str) -> Option<Element<'a>> {
        self.children_named(name).next()
    }

    /// Returns every child in document order.
    pub fn children(&self) -> impl Iterator<Item = Element<'a>> + 'a {
        let variables = self.variables;
        self.node
            .children()
            .iter()
            .map(move |node| Element::new(node, variables))
    }

    /// Returns every child with the given name, in document order.
    pub fn children_named<'n>(&self, name: &'n str) -> impl Iterator<Item = Element<'a>> + 'n
    where
        'a: 'n,
    {
        self.children().filter(move |child| child.name() == name)
    }

    /// Collects the `name`/`value` attributes of all children into properties.
    ///
    /// Every child must be an `entry` element carrying both attributes; later
    /// duplicates win.
    ///
    /// # Errors
    ///
    /// `ParseError` for a child with another name, `MissingAttribute` for an
    /// entry without `name` or `value`.
    pub fn children_as_properties(&self, entry: &str) -> Result<Properties> {
        let mut properties = Properties::new();
        for child in self.children() {
            if child.name() != entry {
                return Err(ConfigError::parse(format!(
                    "unexpected <{}> entry in <{}>",
                    child.name(),
                    self.name()
                )));
            }
            let attribute = |name: &str| {
                child.attribute(name).ok_or_else(|| ConfigError::MissingAttribute {
                    element: entry.to_string(),
                    attribute: name.to_string(),
                })
            };
            properties.insert(attribute("name")?, attribute("value")?);
        }
        Ok(properties)
    }
}
