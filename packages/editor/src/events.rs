//! # Store Events
//!
//! Panels subscribe to the store instead of polling it. After each
//! transition the store emits one event per aspect that changed, in the order
//! document, selection, view, history.

use pagecraft_document::ComponentId;
use serde::Serialize;

use crate::EditorViewState;

/// What changed in a store transition
///
/// Serializes tagged by `type`, e.g. `{"type":"documentChanged","version":3}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum StoreEvent {
    /// The page content changed; `version` is the new document version
    DocumentChanged { version: u64 },

    SelectionChanged { selected: Option<ComponentId> },

    /// A viewport or panel flag changed
    ViewChanged { view: EditorViewState },

    /// Undo/redo availability may have changed
    HistoryChanged {
        #[serde(rename = "canUndo")]
        can_undo: bool,
        #[serde(rename = "canRedo")]
        can_redo: bool,
    },

    /// The store was reset or loaded with a new page
    Reset,
}

/// Handle returned by `subscribe`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener = Box<dyn FnMut(&StoreEvent)>;

/// Registered listeners
#[derive(Default)]
pub(crate) struct Listeners {
    next_id: u64,
    entries: Vec<(SubscriptionId, Listener)>,
}

impl Listeners {
    pub(crate) fn add(&mut self, listener: Listener) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.entries.push((id, listener));
        id
    }

    pub(crate) fn remove(&mut self, id: SubscriptionId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(entry_id, _)| *entry_id != id);
        self.entries.len() != before
    }

    pub(crate) fn emit(&mut self, events: &[StoreEvent]) {
        for event in events {
            for (_, listener) in self.entries.iter_mut() {
                listener(event);
            }
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }
}

impl std::fmt::Debug for Listeners {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Listeners")
            .field("count", &self.entries.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_events_serialize_tagged() {
        let history = StoreEvent::HistoryChanged { can_undo: true, can_redo: false };
        assert_eq!(
            serde_json::to_value(&history).unwrap(),
            json!({"type": "historyChanged", "canUndo": true, "canRedo": false})
        );

        let selection = StoreEvent::SelectionChanged { selected: Some(ComponentId::from("c1")) };
        assert_eq!(
            serde_json::to_value(&selection).unwrap(),
            json!({"type": "selectionChanged", "selected": "c1"})
        );

        assert_eq!(serde_json::to_value(&StoreEvent::Reset).unwrap(), json!({"type": "reset"}));
    }
}
