// SPDX-License-Identifier: MIT OR Apache-2.0

//! Type reference newtype for canonical type names.
//!
//! Configuration documents name types (result types, handlers, interceptors, mapper
//! interfaces) by dotted canonical names such as `com.example.Emp`. `TypeRef` wraps
//! such a name so it cannot be confused with aliases or other strings.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A canonical, fully qualified type name.
///
/// # Examples
///
/// ```
/// use mapcfg::domain::type_ref::TypeRef;
///
/// let emp = TypeRef::from("com.example.Emp");
/// assert_eq!(emp.simple_name(), "Emp");
/// assert_eq!(emp.package(), Some("com.example"));
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TypeRef(String);

impl TypeRef {
    /// Creates a new `TypeRef` from a `String`.
    pub fn new(name: String) -> Self {
        TypeRef(name)
    }

    /// Returns the full name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the last dotted segment of the name.
    ///
    /// # Examples
    ///
    /// ```
    /// use mapcfg::domain::type_ref::TypeRef;
    ///
    /// assert_eq!(TypeRef::from("i32").simple_name(), "i32");
    /// assert_eq!(TypeRef::from("com.example.dao.EmpMapper").simple_name(), "EmpMapper");
    /// ```
    pub fn simple_name(&self) -> &str {
        match self.0.rfind('.') {
            Some(index) => &self.0[index + 1..],
            None => &self.0,
        }
    }

    /// Returns everything before the last dotted segment, if any.
    pub fn package(&self) -> Option<&str> {
        self.0.rfind('.').map(|index| &self.0[..index])
    }

    /// Returns the resource path a sibling mapping document would live at,
    /// e.g. `com/example/EmpMapper.yaml` for `com.example.EmpMapper`.
    pub fn resource_path(&self, extension: &str) -> String {
        format!("{}.{}", self.0.replace('.', "/"), extension)
    }

    /// Converts the `TypeRef` into its inner `String`.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl From<String> for TypeRef {
    fn from(s: String) -> Self {
        TypeRef(s)
    }
}

impl From<&str> for TypeRef {
    fn from(s: &str) -> Self {
        TypeRef(s.to_string())
    }
}

impl From<TypeRef> for String {
    fn from(type_ref: TypeRef) -> Self {
        type_ref.0
    }
}

impl AsRef<str> for TypeRef {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
