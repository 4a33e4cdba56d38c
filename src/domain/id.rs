//! Component identifiers and dependency relations
//!
//! A [`ComponentId`] is an opaque string. The empty string is the nil ID,
//! used to mean "no component" (for example, a component without a base).

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a component, compared by value
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct ComponentId(String);

impl ComponentId {
    /// Creates an ID from any string-like value
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the nil ID
    pub fn nil() -> Self {
        Self(String::new())
    }

    /// Returns true if this is the nil ID
    pub fn is_nil(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the ID as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Converts the ID into `None` when it is nil
    pub fn non_nil(self) -> Option<Self> {
        if self.is_nil() {
            None
        } else {
            Some(self)
        }
    }
}

impl fmt::Display for ComponentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for ComponentId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for ComponentId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<ComponentId> for String {
    fn from(id: ComponentId) -> Self {
        id.0
    }
}

/// Free-text description attached to a dependency edge
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Relation {
    pub description: String,
}

impl Relation {
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
        }
    }

    /// Returns true if the relation carries no text
    pub fn is_empty(&self) -> bool {
        self.description.is_empty()
    }
}

impl fmt::Display for Relation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.description)
    }
}
