//! `kind: faces` documents
//!
//! A face styles every visible component whose labels match its targets.

use std::collections::BTreeMap;
use std::io::Read;

use serde::{Deserialize, Serialize};

use super::{nullable, scalar_map, scalar_string, validate_header, DefinitionError};
use crate::domain::LabelsFilter;
use crate::render::Face;

pub const KIND_FACES: &str = "faces";

/// Decodes and validates a faces document
pub fn read_faces_definition<R: Read>(reader: R) -> Result<FacesDefinition, DefinitionError> {
    let def: FacesDefinition = serde_yaml::from_reader(reader)?;
    def.validate()?;
    Ok(def)
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FacesDefinition {
    #[serde(default, deserialize_with = "scalar_string")]
    pub version: Option<String>,

    #[serde(default, deserialize_with = "scalar_string")]
    pub kind: Option<String>,

    #[serde(default)]
    pub faces: Option<Vec<Option<FaceDefinition>>>,
}

impl FacesDefinition {
    /// Converts every face entry, in document order
    pub fn to_faces(&self) -> Vec<Face> {
        self.faces
            .iter()
            .flatten()
            .flatten()
            .map(FaceDefinition::to_face)
            .collect()
    }

    fn validate(&self) -> Result<(), DefinitionError> {
        validate_header(self.version.as_deref(), self.kind.as_deref(), KIND_FACES)?;

        let faces = match &self.faces {
            Some(faces) if !faces.is_empty() => faces,
            _ => return Err(DefinitionError::NoFaces),
        };
        for face in faces {
            face.as_ref().ok_or(DefinitionError::EmptyFace)?.validate()?;
        }

        Ok(())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FaceDefinition {
    #[serde(default)]
    pub targets: Option<Targets>,

    #[serde(default, deserialize_with = "scalar_map")]
    pub attributes: BTreeMap<String, String>,
}

impl FaceDefinition {
    pub fn to_face(&self) -> Face {
        let match_labels = self
            .targets
            .as_ref()
            .map(|t| t.match_labels.clone())
            .unwrap_or_default();

        Face::new(LabelsFilter::new(match_labels), self.attributes.clone())
    }

    fn validate(&self) -> Result<(), DefinitionError> {
        let targets = self
            .targets
            .as_ref()
            .ok_or(DefinitionError::FaceTargetsMissing)?;
        targets.validate()?;

        if self.attributes.is_empty() {
            return Err(DefinitionError::FaceAttributesMissing);
        }
        if self.attributes.keys().any(String::is_empty) {
            return Err(DefinitionError::FaceAttributesEmptyEntry);
        }

        Ok(())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Targets {
    #[serde(default, deserialize_with = "nullable")]
    pub match_labels: BTreeMap<String, String>,
}

impl Targets {
    fn validate(&self) -> Result<(), DefinitionError> {
        if self.match_labels.is_empty() {
            return Err(DefinitionError::FaceTargetsEmpty);
        }
        if self.match_labels.keys().any(String::is_empty) {
            return Err(DefinitionError::FaceMatchLabelsEmptyEntry);
        }
        Ok(())
    }
}
