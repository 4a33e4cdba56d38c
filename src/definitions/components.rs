//! `kind: components` documents
//!
//! ```yaml
//! version: 1
//! kind: components
//! components:
//! - id: api
//!   base: service
//!   labels:
//!     env: prod
//!   dependencies:
//!   - id: db
//!     relation: reads orders
//! ```

use std::collections::BTreeMap;
use std::io::Read;

use serde::{Deserialize, Serialize};

use super::{nullable, scalar_string, validate_header, DefinitionError};
use crate::domain::{Component, ComponentId, Components, Relation, Selection};

pub const KIND_COMPONENTS: &str = "components";

/// Decodes and validates a components document
pub fn read_components_definition<R: Read>(reader: R) -> Result<ComponentsDefinition, DefinitionError> {
    let def: ComponentsDefinition = serde_yaml::from_reader(reader)?;
    def.validate()?;
    Ok(def)
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ComponentsDefinition {
    #[serde(default, deserialize_with = "scalar_string")]
    pub version: Option<String>,

    #[serde(default, deserialize_with = "scalar_string")]
    pub kind: Option<String>,

    #[serde(default)]
    pub components: Option<Vec<Option<ComponentDefinition>>>,
}

impl ComponentsDefinition {
    /// Builds a version 1 document describing a query result
    pub fn from_selection(selection: &Selection<'_>) -> Self {
        let components = selection
            .iter()
            .map(|c| Some(ComponentDefinition::from_component(c)))
            .collect();

        Self {
            version: Some("1".to_string()),
            kind: Some(KIND_COMPONENTS.to_string()),
            components: Some(components),
        }
    }

    /// Iterates over the component entries, skipping null ones
    pub fn components(&self) -> impl Iterator<Item = &ComponentDefinition> {
        self.components.iter().flatten().flatten()
    }

    /// Adds every entry to `components`, later entries overwriting earlier ones
    ///
    /// Returns the number of entries added.
    pub fn add_to(&self, components: &mut Components) -> usize {
        let mut added = 0;
        for def in self.components() {
            if components.add(def.to_component()) {
                added += 1;
            }
        }
        added
    }

    fn validate(&self) -> Result<(), DefinitionError> {
        validate_header(self.version.as_deref(), self.kind.as_deref(), KIND_COMPONENTS)?;

        let components = match &self.components {
            Some(components) if !components.is_empty() => components,
            _ => return Err(DefinitionError::NoComponents),
        };
        for component in components {
            component
                .as_ref()
                .ok_or(DefinitionError::EmptyComponent)?
                .validate()?;
        }

        Ok(())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ComponentDefinition {
    #[serde(default, deserialize_with = "nullable")]
    pub id: String,

    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "String::is_empty")]
    pub base: String,

    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "std::ops::Not::not")]
    pub hide: bool,

    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "BTreeMap::is_empty")]
    pub labels: BTreeMap<String, String>,

    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "Vec::is_empty")]
    pub dependencies: Vec<Option<DependencyDefinition>>,
}

impl ComponentDefinition {
    /// Converts the entry into an unresolved domain component
    pub fn to_component(&self) -> Component {
        let mut component = Component::new(
            Some(ComponentId::new(self.base.as_str())),
            ComponentId::new(self.id.as_str()),
        );
        for (key, value) in &self.labels {
            component.add_label(key.as_str(), value.as_str());
        }
        for dependency in self.dependencies.iter().flatten() {
            component.depend_on(
                ComponentId::new(dependency.id.as_str()),
                Relation::new(dependency.relation.as_str()),
            );
        }
        if self.hide {
            component.hide();
        }
        component
    }

    /// Describes a resolved component; `hide` is never written
    pub fn from_component(component: &Component) -> Self {
        Self {
            id: component.id().to_string(),
            base: String::new(),
            hide: false,
            labels: component.labels().clone(),
            dependencies: component
                .dependencies()
                .iter()
                .map(|(id, relation)| {
                    Some(DependencyDefinition {
                        id: id.to_string(),
                        relation: relation.description.clone(),
                    })
                })
                .collect(),
        }
    }

    fn validate(&self) -> Result<(), DefinitionError> {
        if self.id.is_empty() {
            return Err(DefinitionError::ComponentIdMissing);
        }
        for dependency in &self.dependencies {
            dependency
                .as_ref()
                .ok_or(DefinitionError::EmptyDependency)?
                .validate()?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DependencyDefinition {
    #[serde(default, deserialize_with = "nullable")]
    pub id: String,

    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "String::is_empty")]
    pub relation: String,
}

impl DependencyDefinition {
    fn validate(&self) -> Result<(), DefinitionError> {
        if self.id.is_empty() {
            return Err(DefinitionError::DependencyIdMissing);
        }
        Ok(())
    }
}
