//! # Rendering
//!
//! Turns a query result into DOT text for Graphviz.
//!
//! Faces decide node styling: every face whose label match passes a
//! component contributes its attributes, later faces overriding earlier
//! ones. Dependency targets missing from the collection are drawn as
//! placeholder nodes so that every edge has two endpoints.

mod dot;
mod label;

pub use dot::render_dot;
pub use label::expand_label;

use std::collections::BTreeMap;
use thiserror::Error;

use crate::domain::{Component, ComponentId, Filter, LabelsFilter};

#[derive(Debug, Error, PartialEq)]
pub enum RenderError {
    #[error("an embedded label cannot be nested: {0}")]
    NestedPlaceholder(String),

    #[error("an embedded label is malformed: {0}")]
    MalformedPlaceholder(String),

    #[error("undefined label `{key}` cannot be embedded (component `{component}`)")]
    UndefinedLabel { key: String, component: ComponentId },

    #[error("failed to write DOT output")]
    Format(#[from] std::fmt::Error),
}

/// Styling rule: attributes applied to components passing a label filter
#[derive(Debug, Clone, Default)]
pub struct Face {
    pub filter: LabelsFilter,
    pub attributes: BTreeMap<String, String>,
}

impl Face {
    pub fn new(filter: LabelsFilter, attributes: BTreeMap<String, String>) -> Self {
        Self { filter, attributes }
    }

    pub fn matches(&self, component: &Component) -> bool {
        self.filter.pass(component)
    }
}
