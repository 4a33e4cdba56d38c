//! Definition document errors

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DefinitionError {
    #[error("failed to decode definition: {0}")]
    Decode(#[from] serde_yaml::Error),

    #[error("`version` must be specified")]
    VersionMissing,

    #[error("`kind` must be specified")]
    KindMissing,

    #[error("`kind` must be `{expected}`")]
    UnexpectedKind { expected: &'static str },

    #[error("`components` must contain at least one content")]
    NoComponents,

    #[error("`components[]` includes empty components")]
    EmptyComponent,

    #[error("`components[].id` must be specified")]
    ComponentIdMissing,

    #[error("`dependencies[]` includes empty components")]
    EmptyDependency,

    #[error("`dependencies[].id` must be specified")]
    DependencyIdMissing,

    #[error("`faces` must contain at least one face")]
    NoFaces,

    #[error("`faces[]` includes empty faces")]
    EmptyFace,

    #[error("`faces[].targets` is not specified")]
    FaceTargetsMissing,

    #[error("`faces[].targets` is empty")]
    FaceTargetsEmpty,

    #[error("`faces[].targets.match_labels[]` includes empty entries")]
    FaceMatchLabelsEmptyEntry,

    #[error("`faces[].attributes[]` must contain at least one attribute")]
    FaceAttributesMissing,

    #[error("`faces[].attributes[]` includes empty attributes")]
    FaceAttributesEmptyEntry,
}
