//! Error types for the editor

use pagecraft_document::{ComponentId, ComponentType, DocumentError, PathError};
use thiserror::Error;

use crate::mutations::MutationError;

#[derive(Error, Debug)]
pub enum EditorError {
    #[error("No page is loaded in the editor")]
    NoPageLoaded,

    #[error("Component not found: {0}")]
    UnknownComponent(ComponentId),

    #[error("Invalid prop path: {0}")]
    InvalidPath(#[from] PathError),

    #[error("Invalid variant {variant} for {kind}: variants start at 1")]
    InvalidVariant { kind: ComponentType, variant: u32 },

    #[error("Schema not found for this component ({kind} variant {variant})")]
    SchemaNotFound { kind: ComponentType, variant: u32 },

    #[error("Duplicate component id: {0}")]
    DuplicateComponent(ComponentId),

    #[error("Props must be an object")]
    InvalidProps,

    #[error("Unknown component type: {0}")]
    UnknownComponentType(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<MutationError> for EditorError {
    fn from(e: MutationError) -> Self {
        match e {
            MutationError::ComponentNotFound(id) => EditorError::UnknownComponent(id),
            MutationError::DuplicateComponent(id) => EditorError::DuplicateComponent(id),
            MutationError::InvalidVariant { kind, variant } => {
                EditorError::InvalidVariant { kind, variant }
            }
            MutationError::PropsNotAnObject => EditorError::InvalidProps,
            MutationError::Path(e) => EditorError::InvalidPath(e),
        }
    }
}

impl From<DocumentError> for EditorError {
    fn from(e: DocumentError) -> Self {
        match e {
            DocumentError::DuplicateComponent(id) => EditorError::DuplicateComponent(id),
            DocumentError::Path(e) => EditorError::InvalidPath(e),
            DocumentError::UnknownComponentType(name) => EditorError::UnknownComponentType(name),
        }
    }
}
