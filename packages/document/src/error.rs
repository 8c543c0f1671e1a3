use thiserror::Error;

use crate::ComponentId;

/// Errors raised while resolving or applying a prop path
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PathError {
    #[error("Prop path is empty")]
    Empty,

    #[error("Invalid prop path '{path}': {reason}")]
    Invalid { path: String, reason: String },
}

impl PathError {
    pub(crate) fn invalid(path: &str, reason: impl Into<String>) -> Self {
        PathError::Invalid {
            path: path.to_string(),
            reason: reason.into(),
        }
    }
}

/// Errors raised by document-level validation
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DocumentError {
    #[error("Duplicate component id: {0}")]
    DuplicateComponent(ComponentId),

    #[error("Unknown component type: {0}")]
    UnknownComponentType(String),

    #[error(transparent)]
    Path(#[from] PathError),
}
