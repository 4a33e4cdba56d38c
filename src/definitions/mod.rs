//! # Definition Documents
//!
//! YAML documents describing components and faces.
//!
//! | Kind | Purpose | Read with |
//! |------|---------|-----------|
//! | `components` | Nodes, bases, labels, dependencies | [`read_components_definition`] |
//! | `faces` | Node styling by label match | [`read_faces_definition`] |
//!
//! Every document carries a `version` and a `kind`. Decoding is followed by
//! structural validation; the domain layer only ever sees validated data.

mod error;
mod components;
mod faces;

pub use error::DefinitionError;
pub use components::{
    read_components_definition, ComponentDefinition, ComponentsDefinition, DependencyDefinition,
    KIND_COMPONENTS,
};
pub use faces::{read_faces_definition, FaceDefinition, FacesDefinition, Targets, KIND_FACES};

use serde::{Deserialize, Deserializer};
use std::collections::BTreeMap;

/// Deserializes a possibly-null value, mapping null to the default
fn nullable<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Deserializes any YAML scalar as a string (`version: 1` is allowed)
fn scalar_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<serde_yaml::Value>::deserialize(deserializer)? {
        None => Ok(None),
        Some(value) => scalar_to_string(value).map_err(serde::de::Error::custom),
    }
}

/// Deserializes a mapping whose values may be any YAML scalar
fn scalar_map<'de, D>(deserializer: D) -> Result<BTreeMap<String, String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: BTreeMap<String, serde_yaml::Value> = nullable(deserializer)?;
    let mut map = BTreeMap::new();
    for (key, value) in raw {
        let value = scalar_to_string(value)
            .map_err(serde::de::Error::custom)?
            .unwrap_or_default();
        map.insert(key, value);
    }
    Ok(map)
}

fn scalar_to_string(value: serde_yaml::Value) -> Result<Option<String>, String> {
    match value {
        serde_yaml::Value::Null => Ok(None),
        serde_yaml::Value::String(s) => Ok(Some(s)),
        serde_yaml::Value::Number(n) => Ok(Some(n.to_string())),
        serde_yaml::Value::Bool(b) => Ok(Some(b.to_string())),
        other => Err(format!("expected a scalar value, got: {:?}", other)),
    }
}

/// Checks the `version` and `kind` header shared by every document
fn validate_header(
    version: Option<&str>,
    kind: Option<&str>,
    expected: &'static str,
) -> Result<(), DefinitionError> {
    if version.map_or(true, str::is_empty) {
        return Err(DefinitionError::VersionMissing);
    }
    match kind {
        None | Some("") => Err(DefinitionError::KindMissing),
        Some(kind) if kind != expected => Err(DefinitionError::UnexpectedKind { expected }),
        Some(_) => Ok(()),
    }
}
