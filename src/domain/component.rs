//! Components and the inheritance resolver
//!
//! A [`Components`] collection is built once from definitions, resolved once
//! with [`Components::complement`], and then only read by the query engine.
//!
//! Resolution copies every label and dependency a component does not declare
//! itself from its base, depth-first, so the nearest ancestor wins. Each
//! component carries a tri-state [`ComplementStatus`]; meeting a component
//! that is still `InProgress` means it is its own ancestor.

use std::borrow::Cow;
use std::collections::{BTreeMap, HashMap};
use thiserror::Error;

use super::id::{ComponentId, Relation};

/// Label set on placeholder components returned for unknown IDs
pub const UNDEFINED_LABEL: &str = "__undefined__";

#[derive(Debug, Error, PartialEq)]
pub enum InheritanceError {
    #[error("cyclic inheritance is not allowed: `{0}` inherits from itself")]
    CyclicInheritance(ComponentId),

    #[error("the base component `{base}` of `{component}` is undefined")]
    UndefinedBase {
        component: ComponentId,
        base: ComponentId,
    },
}

/// Inheritance resolution state of a single component
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ComplementStatus {
    #[default]
    New,
    InProgress,
    Done,
}

/// Dependencies of a component, in declaration order
///
/// Declaring the same target twice keeps the original position and replaces
/// the relation (last write wins).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dependencies(Vec<(ComponentId, Relation)>);

impl Dependencies {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Adds or replaces the dependency on `id`
    pub fn insert(&mut self, id: ComponentId, relation: Relation) {
        match self.0.iter_mut().find(|(existing, _)| *existing == id) {
            Some(entry) => entry.1 = relation,
            None => self.0.push((id, relation)),
        }
    }

    pub fn contains(&self, id: &ComponentId) -> bool {
        self.0.iter().any(|(existing, _)| existing == id)
    }

    /// Returns the relation of the dependency on `id`
    pub fn get(&self, id: &ComponentId) -> Option<&Relation> {
        self.0
            .iter()
            .find(|(existing, _)| existing == id)
            .map(|(_, relation)| relation)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ComponentId, &Relation)> {
        self.0.iter().map(|(id, relation)| (id, relation))
    }

    /// Iterates over the dependency targets only
    pub fn ids(&self) -> impl Iterator<Item = &ComponentId> {
        self.0.iter().map(|(id, _)| id)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// A named node in the dependency graph
#[derive(Debug, Clone, PartialEq)]
pub struct Component {
    id: ComponentId,
    base_id: Option<ComponentId>,
    labels: BTreeMap<String, String>,
    dependencies: Dependencies,
    hidden: bool,
    complement_status: ComplementStatus,
}

impl Component {
    /// Creates a component; a nil `base_id` means the component has no base
    pub fn new(base_id: Option<ComponentId>, id: ComponentId) -> Self {
        Self {
            id,
            base_id: base_id.and_then(ComponentId::non_nil),
            labels: BTreeMap::new(),
            dependencies: Dependencies::new(),
            hidden: false,
            complement_status: ComplementStatus::New,
        }
    }

    /// Creates the placeholder used for IDs missing from a collection
    pub fn undefined(id: ComponentId) -> Self {
        let mut component = Self::new(None, id);
        component.add_label(UNDEFINED_LABEL, "true");
        component
    }

    pub fn id(&self) -> &ComponentId {
        &self.id
    }

    pub fn base_id(&self) -> Option<&ComponentId> {
        self.base_id.as_ref()
    }

    pub fn labels(&self) -> &BTreeMap<String, String> {
        &self.labels
    }

    /// Returns the value of a single label
    pub fn label(&self, key: &str) -> Option<&str> {
        self.labels.get(key).map(String::as_str)
    }

    pub fn dependencies(&self) -> &Dependencies {
        &self.dependencies
    }

    pub fn add_label(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.labels.insert(key.into(), value.into());
    }

    pub fn depend_on(&mut self, dependency: ComponentId, relation: Relation) {
        self.dependencies.insert(dependency, relation);
    }

    pub fn hide(&mut self) {
        self.hidden = true;
    }

    pub fn is_hidden(&self) -> bool {
        self.hidden
    }

    /// Returns true if this is a placeholder for an unknown ID
    pub fn is_undefined(&self) -> bool {
        self.labels.contains_key(UNDEFINED_LABEL)
    }

    pub fn complement_status(&self) -> ComplementStatus {
        self.complement_status
    }

    /// Copies labels and dependencies the component does not declare itself
    fn inherit(&mut self, base: &Component) {
        for (key, value) in &base.labels {
            self.labels
                .entry(key.clone())
                .or_insert_with(|| value.clone());
        }

        for (id, relation) in base.dependencies.iter() {
            if !self.dependencies.contains(id) {
                self.dependencies.insert(id.clone(), relation.clone());
            }
        }
    }
}

/// Insertion-ordered set of components keyed by ID
#[derive(Debug, Default)]
pub struct Components {
    set: HashMap<ComponentId, Component>,
    ids: Vec<ComponentId>,
}

impl Components {
    pub fn new() -> Self {
        Self {
            set: HashMap::new(),
            ids: Vec::new(),
        }
    }

    /// Inserts or overwrites a component
    ///
    /// Returns false, without adding anything, if the component's ID is nil.
    /// An overwritten component keeps its first-seen position.
    pub fn add(&mut self, component: Component) -> bool {
        if component.id.is_nil() {
            return false;
        }
        if !self.set.contains_key(&component.id) {
            self.ids.push(component.id.clone());
        }
        self.set.insert(component.id.clone(), component);
        true
    }

    /// Strict lookup
    pub fn get(&self, id: &ComponentId) -> Option<&Component> {
        self.set.get(id)
    }

    /// Total lookup: unknown IDs yield an [`UNDEFINED_LABEL`] placeholder
    ///
    /// The flag is true only when the component is really in the collection.
    pub fn get_or_undefined(&self, id: &ComponentId) -> (Cow<'_, Component>, bool) {
        match self.set.get(id) {
            Some(component) => (Cow::Borrowed(component), true),
            None => (Cow::Owned(Component::undefined(id.clone())), false),
        }
    }

    pub fn contains(&self, id: &ComponentId) -> bool {
        self.set.contains_key(id)
    }

    /// Returns the IDs in insertion order
    pub fn ids(&self) -> &[ComponentId] {
        &self.ids
    }

    /// Iterates over the components in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &Component> {
        self.ids.iter().filter_map(|id| self.set.get(id))
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Resolves inheritance for every component in place
    ///
    /// Components without a base are settled first, then every remaining
    /// component is resolved after its base chain. On error the collection is
    /// left partially resolved and should be discarded.
    pub fn complement(&mut self) -> Result<(), InheritanceError> {
        let ids = self.ids.clone();

        for id in &ids {
            let has_base = self.set.get(id).is_some_and(|c| c.base_id.is_some());
            if !has_base {
                self.complement_one(id)?;
            }
        }

        for id in &ids {
            self.complement_one(id)?;
        }

        Ok(())
    }

    fn complement_one(&mut self, id: &ComponentId) -> Result<(), InheritanceError> {
        let Some(component) = self.set.get_mut(id) else {
            return Ok(());
        };

        match component.complement_status {
            ComplementStatus::Done => return Ok(()),
            ComplementStatus::InProgress => {
                return Err(InheritanceError::CyclicInheritance(id.clone()));
            }
            ComplementStatus::New => {}
        }
        component.complement_status = ComplementStatus::InProgress;

        if let Some(base_id) = component.base_id.clone() {
            if !self.contains(&base_id) {
                return Err(InheritanceError::UndefinedBase {
                    component: id.clone(),
                    base: base_id,
                });
            }
            self.complement_one(&base_id)?;

            // The base is cloned so the child can be borrowed mutably.
            if let Some(base) = self.set.get(&base_id).cloned() {
                if let Some(component) = self.set.get_mut(id) {
                    component.inherit(&base);
                }
            }
        }

        if let Some(component) = self.set.get_mut(id) {
            component.complement_status = ComplementStatus::Done;
        }

        Ok(())
    }
}
