//! felipe - a dependency graph of software components
//!
//! Components are declared in YAML documents. A component may inherit the
//! labels and dependencies of a base component and may be hidden from
//! queries. felipe resolves the inheritance, selects components by label and
//! expands the selection along dependencies (or reverse dependencies) up to a
//! given depth. Results are printed as YAML/JSON or drawn as a DOT graph.

pub mod cli;
pub mod config;
pub mod definitions;
pub mod domain;
pub mod render;

pub use domain::{Component, ComponentId, Components, InheritanceError, Query, Selection};
