use std::collections::HashMap;

use serde_json::Value;

use crate::ComponentType;

/// Source of default props for each block variant
///
/// The field metadata that drives the properties panel lives outside this
/// crate; the editor only needs defaults when a block is created.
pub trait SchemaRegistry {
    /// Default props for `(kind, variant)`, or `None` if no schema exists
    fn default_props(&self, kind: ComponentType, variant: u32) -> Option<Value>;

    fn has_schema(&self, kind: ComponentType, variant: u32) -> bool {
        self.default_props(kind, variant).is_some()
    }
}

/// In-memory registry
#[derive(Debug, Clone, Default)]
pub struct StaticSchemaRegistry {
    defaults: HashMap<(ComponentType, u32), Value>,
}

impl StaticSchemaRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, kind: ComponentType, variant: u32, defaults: Value) {
        self.defaults.insert((kind, variant), defaults);
    }

    pub fn with(mut self, kind: ComponentType, variant: u32, defaults: Value) -> Self {
        self.register(kind, variant, defaults);
        self
    }

    /// Variants registered for `kind`, ascending
    pub fn variants(&self, kind: ComponentType) -> Vec<u32> {
        let mut variants: Vec<u32> = self
            .defaults
            .keys()
            .filter(|(k, _)| *k == kind)
            .map(|(_, v)| *v)
            .collect();
        variants.sort_unstable();
        variants
    }
}

impl SchemaRegistry for StaticSchemaRegistry {
    fn default_props(&self, kind: ComponentType, variant: u32) -> Option<Value> {
        self.defaults.get(&(kind, variant)).cloned()
    }
}
