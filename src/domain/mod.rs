//! Domain model for felipe
//!
//! The component graph, inheritance resolution and the query engine.
//! Contains no I/O.

mod id;
mod component;
mod query;

pub use id::{ComponentId, Relation};
pub use component::{
    ComplementStatus, Component, Components, Dependencies, InheritanceError, UNDEFINED_LABEL,
};
pub use query::{
    AllPassFilter, Complementer, DependenciesComplementer, Depth, Filter, LabelsFilter, Query,
    ReverseDependenciesComplementer, Selection,
};
