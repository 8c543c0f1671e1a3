//! # Page Mutations
//!
//! Every document edit the store performs is one of these operations.
//!
//! ## Semantics
//!
//! ### InsertComponent
//! - Inserts at `index` (clamped), or appends when `index` is `None`
//! - Fails if the id already exists or the variant is 0
//!
//! ### RemoveComponent
//! - Removing an id that is not present is a no-op, not an error
//!
//! ### MoveComponent
//! - Target index is clamped to the last position
//! - Moving to the current position is a no-op
//!
//! ### UpdateProp
//! - Dot-path write into the component's props (see [`PropPath`])
//! - Applied to a copy and committed only on success
//!
//! ### ReplaceProps
//! - Whole-tree replacement, used by add/remove item flows

use std::sync::Arc;

use pagecraft_document::{ComponentId, ComponentInstance, ComponentType, PageDocument, PathError, PropPath, Value};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Semantic edits on a page document
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum Mutation {
    /// Place a new component on the page
    InsertComponent {
        index: Option<usize>,
        component: ComponentInstance,
    },

    /// Delete a component
    RemoveComponent {
        component_id: ComponentId,
    },

    /// Reorder a component
    MoveComponent {
        component_id: ComponentId,
        index: usize,
    },

    /// Write one value inside a component's props
    UpdateProp {
        component_id: ComponentId,
        path: PropPath,
        value: Value,
    },

    /// Replace a component's props wholesale
    ReplaceProps {
        component_id: ComponentId,
        props: Value,
    },
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum MutationError {
    #[error("Component not found: {0}")]
    ComponentNotFound(ComponentId),

    #[error("Duplicate component id: {0}")]
    DuplicateComponent(ComponentId),

    #[error("Invalid variant {variant} for {kind}")]
    InvalidVariant { kind: ComponentType, variant: u32 },

    #[error("Props must be an object")]
    PropsNotAnObject,

    #[error(transparent)]
    Path(#[from] PathError),
}

impl Mutation {
    /// Apply to `doc`, returning whether the document changed
    ///
    /// On error `doc` is left exactly as it was.
    pub fn apply(&self, doc: &mut PageDocument) -> Result<bool, MutationError> {
        self.validate(doc)?;

        match self {
            Mutation::InsertComponent { index, component } => {
                let at = index.map_or(doc.components.len(), |i| i.min(doc.components.len()));
                doc.components.insert(at, Arc::new(component.clone()));
                Ok(true)
            }

            Mutation::RemoveComponent { component_id } => match doc.position(component_id) {
                Some(at) => {
                    doc.components.remove(at);
                    Ok(true)
                }
                None => Ok(false),
            },

            Mutation::MoveComponent { component_id, index } => {
                let from = doc
                    .position(component_id)
                    .ok_or_else(|| MutationError::ComponentNotFound(component_id.clone()))?;
                let to = (*index).min(doc.components.len() - 1);
                if from == to {
                    return Ok(false);
                }
                let component = doc.components.remove(from);
                doc.components.insert(to, component);
                Ok(true)
            }

            Mutation::UpdateProp { component_id, path, value } => {
                let current = doc
                    .find(component_id)
                    .ok_or_else(|| MutationError::ComponentNotFound(component_id.clone()))?;

                let mut props = current.props.clone();
                path.set(&mut props, value.clone())?;

                if let Some(component) = doc.find_mut(component_id) {
                    component.props = props;
                }
                Ok(true)
            }

            Mutation::ReplaceProps { component_id, props } => {
                let component = doc
                    .find_mut(component_id)
                    .ok_or_else(|| MutationError::ComponentNotFound(component_id.clone()))?;
                component.props = props.clone();
                Ok(true)
            }
        }
    }

    /// Check structural constraints without touching the document
    pub fn validate(&self, doc: &PageDocument) -> Result<(), MutationError> {
        match self {
            Mutation::InsertComponent { component, .. } => {
                if component.variant == 0 {
                    return Err(MutationError::InvalidVariant {
                        kind: component.kind,
                        variant: component.variant,
                    });
                }
                if !component.props.is_object() {
                    return Err(MutationError::PropsNotAnObject);
                }
                if doc.contains(&component.id) {
                    return Err(MutationError::DuplicateComponent(component.id.clone()));
                }
                Ok(())
            }

            Mutation::RemoveComponent { .. } => Ok(()),

            Mutation::MoveComponent { component_id, .. }
            | Mutation::UpdateProp { component_id, .. } => {
                if doc.contains(component_id) {
                    Ok(())
                } else {
                    Err(MutationError::ComponentNotFound(component_id.clone()))
                }
            }

            Mutation::ReplaceProps { component_id, props } => {
                if !props.is_object() {
                    return Err(MutationError::PropsNotAnObject);
                }
                if doc.contains(component_id) {
                    Ok(())
                } else {
                    Err(MutationError::ComponentNotFound(component_id.clone()))
                }
            }
        }
    }

    /// The component this mutation targets
    pub fn component_id(&self) -> &ComponentId {
        match self {
            Mutation::InsertComponent { component, .. } => &component.id,
            Mutation::RemoveComponent { component_id }
            | Mutation::MoveComponent { component_id, .. }
            | Mutation::UpdateProp { component_id, .. }
            | Mutation::ReplaceProps { component_id, .. } => component_id,
        }
    }

    /// Short human-readable name, used as the default undo label
    pub fn label(&self) -> &'static str {
        match self {
            Mutation::InsertComponent { .. } => "Add component",
            Mutation::RemoveComponent { .. } => "Remove component",
            Mutation::MoveComponent { .. } => "Move component",
            Mutation::UpdateProp { .. } => "Edit property",
            Mutation::ReplaceProps { .. } => "Replace properties",
        }
    }
}
