//! # Page Documents
//!
//! A page is an ordered list of block instances. Order is render order.
//!
//! Instances are held behind `Arc` so that cloning a document (for an undo
//! snapshot) shares every component; a component that is later edited is
//! copied on write with `Arc::make_mut`.

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::DocumentError;

/// Stable identifier of a component instance
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ComponentId(String);

impl ComponentId {
    /// Generate a fresh random id
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ComponentId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for ComponentId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl fmt::Display for ComponentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl PartialEq<str> for ComponentId {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for ComponentId {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// Block category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComponentType {
    Navbar,
    Hero,
    About,
    Faq,
    Services,
    Testimonials,
    Footer,
}

impl ComponentType {
    pub const ALL: [ComponentType; 7] = [
        ComponentType::Navbar,
        ComponentType::Hero,
        ComponentType::About,
        ComponentType::Faq,
        ComponentType::Services,
        ComponentType::Testimonials,
        ComponentType::Footer,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ComponentType::Navbar => "navbar",
            ComponentType::Hero => "hero",
            ComponentType::About => "about",
            ComponentType::Faq => "faq",
            ComponentType::Services => "services",
            ComponentType::Testimonials => "testimonials",
            ComponentType::Footer => "footer",
        }
    }
}

impl fmt::Display for ComponentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ComponentType {
    type Err = DocumentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ComponentType::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| DocumentError::UnknownComponentType(s.to_string()))
    }
}

/// One block placed on a page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentInstance {
    pub id: ComponentId,

    #[serde(rename = "type")]
    pub kind: ComponentType,

    /// Visual template within `kind`, starting at 1
    pub variant: u32,

    /// Nested prop tree, shaped by the schema for `(kind, variant)`
    #[serde(default = "empty_props")]
    pub props: Value,
}

fn empty_props() -> Value {
    Value::Object(Map::new())
}

impl ComponentInstance {
    /// Create an instance with a freshly generated id
    pub fn new(kind: ComponentType, variant: u32, props: Value) -> Self {
        Self {
            id: ComponentId::generate(),
            kind,
            variant,
            props,
        }
    }

    /// Copy of this instance under a new id
    pub fn duplicate(&self) -> Self {
        Self {
            id: ComponentId::generate(),
            ..self.clone()
        }
    }
}

/// A landing page being edited
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageDocument {
    pub id: String,
    pub organization_id: String,
    pub name: String,
    pub slug: String,

    #[serde(default)]
    pub components: Vec<Arc<ComponentInstance>>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl PageDocument {
    /// Create an empty page
    pub fn new(
        organization_id: impl Into<String>,
        name: impl Into<String>,
        slug: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            organization_id: organization_id.into(),
            name: name.into(),
            slug: slug.into(),
            components: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn position(&self, id: &ComponentId) -> Option<usize> {
        self.components.iter().position(|c| &c.id == id)
    }

    pub fn find(&self, id: &ComponentId) -> Option<&ComponentInstance> {
        self.components.iter().find(|c| &c.id == id).map(Arc::as_ref)
    }

    /// Mutable access; copies the instance if a snapshot still shares it
    pub fn find_mut(&mut self, id: &ComponentId) -> Option<&mut ComponentInstance> {
        self.components
            .iter_mut()
            .find(|c| &c.id == id)
            .map(Arc::make_mut)
    }

    pub fn contains(&self, id: &ComponentId) -> bool {
        self.position(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    /// Check that no two components share an id
    pub fn validate(&self) -> Result<(), DocumentError> {
        let mut seen = HashSet::with_capacity(self.components.len());
        for component in &self.components {
            if !seen.insert(&component.id) {
                return Err(DocumentError::DuplicateComponent(component.id.clone()));
            }
        }
        Ok(())
    }
}
