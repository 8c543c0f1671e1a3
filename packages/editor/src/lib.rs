//! # Pagecraft Editor
//!
//! State engine behind the pagecraft landing-page builder.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ document: PageDocument, blocks, prop paths  │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ editor: EditorStore                         │
//! │  - Apply mutations with validation          │
//! │  - Bounded snapshot undo/redo               │
//! │  - Selection + view flags                   │
//! │  - Events for subscribed panels             │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ UI: canvas, properties panel, top bar       │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Core Principles
//!
//! 1. **Explicit store**: constructed per editor session, never global
//! 2. **Snapshots are values**: history cannot be altered by later edits
//! 3. **Atomic operations**: a rejected edit leaves the store untouched
//! 4. **Selection never dangles**: removing or undoing away a selected
//!    component clears the selection
//!
//! ## Usage
//!
//! ```rust
//! use pagecraft_document::{ComponentType, PageDocument};
//! use pagecraft_editor::{EditorConfig, EditorStore};
//! use serde_json::json;
//!
//! let mut store = EditorStore::new(EditorConfig::default());
//! store.initialize_page(PageDocument::new("org-1", "Home", "home"))?;
//!
//! let hero = store.add_component(ComponentType::Hero, 1, json!({"title": {"label": "Hi"}}))?;
//! store.update_component_prop(&hero.id, "title.label", json!("Hello"))?;
//!
//! store.undo();
//! assert_eq!(store.component(&hero.id).unwrap().props["title"]["label"], "Hi");
//! # Ok::<(), pagecraft_editor::EditorError>(())
//! ```

mod clock;
mod config;
mod errors;
mod events;
mod mutations;
pub mod selectors;
mod store;
mod undo_stack;
mod view;

pub use clock::{Clock, ManualClock, MonotonicClock};
pub use config::{EditorConfig, DEFAULT_CONFIG_NAME};
pub use errors::EditorError;
pub use events::{StoreEvent, SubscriptionId};
pub use mutations::{Mutation, MutationError};
pub use store::EditorStore;
pub use undo_stack::{HistoryEntry, UndoStack, DEFAULT_MAX_LEVELS};
pub use view::{EditorViewState, Viewport};

// Re-export document types for convenience
pub use pagecraft_document::{
    ComponentId, ComponentInstance, ComponentType, PageDocument, PropPath, SchemaRegistry,
    StaticSchemaRegistry,
};
