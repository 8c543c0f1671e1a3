//! Derived reads over the store state. Nothing here is stored.

use std::sync::Arc;

use pagecraft_document::{ComponentInstance, PropPath, Value};

use crate::EditorStore;

/// Components in document order
pub fn select_components(store: &EditorStore) -> &[Arc<ComponentInstance>] {
    store.components()
}

/// The selected component, or `None` if nothing (or something stale) is
/// selected
pub fn select_selected_component(store: &EditorStore) -> Option<&ComponentInstance> {
    store
        .selected_component_id()
        .and_then(|id| store.component(id))
}

/// Value at `path` inside the selected component's props
pub fn select_selected_prop<'a>(store: &'a EditorStore, path: &PropPath) -> Option<&'a Value> {
    select_selected_component(store).and_then(|component| path.get(&component.props))
}
