//! # Editor Store
//!
//! Single source of truth for the page being edited: the document, the
//! selection, view flags and undo history. Every document edit goes through
//! [`EditorStore::apply`] so that history, dirtiness and selection stay
//! consistent.
//!
//! ## Lifecycle
//!
//! ```text
//! new → initialize_page → edit / undo / redo → mark_saved → reset_store
//! ```
//!
//! Each operation is one synchronous transition. A rejected operation leaves
//! the store exactly as it was.

use std::sync::Arc;

use pagecraft_document::{
    ComponentId, ComponentInstance, ComponentType, PageDocument, PropPath, SchemaRegistry, Value,
};
use tracing::{debug, info, instrument, warn};

use crate::clock::{Clock, MonotonicClock};
use crate::events::{Listeners, StoreEvent, SubscriptionId};
use crate::{EditorConfig, EditorError, EditorViewState, Mutation, UndoStack, Viewport};

/// Editor state for one page builder session
#[derive(Debug)]
pub struct EditorStore {
    config: EditorConfig,

    /// Page being edited, `None` until a page is initialized
    page: Option<PageDocument>,

    /// Last loaded or saved page, for dirtiness
    clean: Option<PageDocument>,

    selected: Option<ComponentId>,

    view: EditorViewState,

    history: UndoStack<PageDocument>,

    /// Increments on every document change
    version: u64,

    listeners: Listeners,

    /// Time source for coalescing prop edits
    clock: Box<dyn Clock>,
}

impl EditorStore {
    /// Create a store timed by [`MonotonicClock`]
    ///
    /// `Instant` panics on `wasm32-unknown-unknown`; browser builds must use
    /// [`EditorStore::with_clock`] with a JS-backed clock instead. The same
    /// applies to `Default` and [`EditorStore::with_page`].
    pub fn new(config: EditorConfig) -> Self {
        Self::with_clock(config, MonotonicClock::new())
    }

    /// Create a store reading coalescing time from `clock`
    pub fn with_clock(config: EditorConfig, clock: impl Clock + 'static) -> Self {
        let history = UndoStack::with_max_levels(config.history_limit);
        Self {
            config,
            page: None,
            clean: None,
            selected: None,
            view: EditorViewState::default(),
            history,
            version: 0,
            listeners: Listeners::default(),
            clock: Box::new(clock),
        }
    }

    /// Create a store with `page` already loaded, timed by [`MonotonicClock`]
    pub fn with_page(config: EditorConfig, page: PageDocument) -> Result<Self, EditorError> {
        let mut store = Self::new(config);
        store.initialize_page(page)?;
        Ok(store)
    }

    // ---------------------------------------------------------------------
    // Lifecycle
    // ---------------------------------------------------------------------

    /// Load `page`, dropping selection and history
    ///
    /// The loaded page becomes the clean snapshot.
    #[instrument(skip_all, fields(page_id = %page.id))]
    pub fn initialize_page(&mut self, page: PageDocument) -> Result<(), EditorError> {
        if let Err(e) = page.validate() {
            warn!(error = %e, "Rejected page with invalid components");
            return Err(e.into());
        }

        info!(components = page.len(), "Initializing page");

        self.clean = Some(page.clone());
        self.page = Some(page);
        self.selected = None;
        self.history.clear();
        self.view.is_dirty = false;
        self.version = 0;

        self.listeners.emit(&[StoreEvent::Reset]);
        Ok(())
    }

    /// Return to the empty baseline, keeping config and subscriptions
    pub fn reset_store(&mut self) {
        info!("Resetting editor store");

        self.page = None;
        self.clean = None;
        self.selected = None;
        self.view = EditorViewState::default();
        self.history.clear();
        self.version = 0;

        self.listeners.emit(&[StoreEvent::Reset]);
    }

    // ---------------------------------------------------------------------
    // Document edits
    // ---------------------------------------------------------------------

    /// Apply a mutation, recording the previous document for undo
    ///
    /// Returns `false` when the mutation was valid but changed nothing (e.g.
    /// removing an absent component); no history is recorded then.
    pub fn apply(&mut self, mutation: Mutation) -> Result<bool, EditorError> {
        self.commit(&mutation)
    }

    fn commit(&mut self, mutation: &Mutation) -> Result<bool, EditorError> {
        let Some(page) = self.page.as_mut() else {
            warn!(mutation = mutation.label(), "No page loaded");
            return Err(EditorError::NoPageLoaded);
        };

        // Cheap: components are shared until one is written
        let before = page.clone();

        match mutation.apply(page) {
            Ok(true) => {}
            Ok(false) => {
                debug!(
                    mutation = mutation.label(),
                    component_id = %mutation.component_id(),
                    "Mutation changed nothing"
                );
                return Ok(false);
            }
            Err(e) => {
                warn!(
                    mutation = mutation.label(),
                    component_id = %mutation.component_id(),
                    error = %e,
                    "Mutation rejected"
                );
                return Err(e.into());
            }
        }

        match (mutation, self.config.coalesce_window()) {
            (Mutation::UpdateProp { component_id, path, .. }, Some(window)) => {
                let key = format!("{}:{}", component_id, path);
                let now = self.clock.now();
                self.history
                    .record_coalescing(before, Some(mutation.label()), &key, window, now);
            }
            _ => self.history.record(before, Some(mutation.label())),
        }

        self.version += 1;
        self.view.is_dirty = true;

        debug!(
            mutation = mutation.label(),
            component_id = %mutation.component_id(),
            version = self.version,
            "Applied mutation"
        );

        let mut events = vec![StoreEvent::DocumentChanged { version: self.version }];
        if self.drop_dangling_selection() {
            events.push(StoreEvent::SelectionChanged { selected: None });
        }
        events.push(self.history_event());
        self.listeners.emit(&events);

        Ok(true)
    }

    /// Append a new component built from `props`
    ///
    /// The new component is not selected unless `auto_select_on_add` is set.
    pub fn add_component(
        &mut self,
        kind: ComponentType,
        variant: u32,
        props: Value,
    ) -> Result<ComponentInstance, EditorError> {
        self.insert_component(None, kind, variant, props)
    }

    /// Insert a new component at `index` (drag-and-drop onto the canvas)
    pub fn add_component_at(
        &mut self,
        index: usize,
        kind: ComponentType,
        variant: u32,
        props: Value,
    ) -> Result<ComponentInstance, EditorError> {
        self.insert_component(Some(index), kind, variant, props)
    }

    /// Append a new component with the schema's default props
    pub fn add_component_from_schema<R>(
        &mut self,
        registry: &R,
        kind: ComponentType,
        variant: u32,
    ) -> Result<ComponentInstance, EditorError>
    where
        R: SchemaRegistry + ?Sized,
    {
        let Some(defaults) = registry.default_props(kind, variant) else {
            warn!(%kind, variant, "Schema not found");
            return Err(EditorError::SchemaNotFound { kind, variant });
        };
        self.add_component(kind, variant, defaults)
    }

    fn insert_component(
        &mut self,
        index: Option<usize>,
        kind: ComponentType,
        variant: u32,
        props: Value,
    ) -> Result<ComponentInstance, EditorError> {
        let component = ComponentInstance::new(kind, variant, props);
        self.commit(&Mutation::InsertComponent {
            index,
            component: component.clone(),
        })?;

        if self.config.auto_select_on_add {
            self.set_selection(Some(component.id.clone()));
        }
        Ok(component)
    }

    /// Insert a copy of `id` (under a fresh id) right after it
    pub fn duplicate_component(&mut self, id: &ComponentId) -> Result<ComponentInstance, EditorError> {
        let page = self.page.as_ref().ok_or(EditorError::NoPageLoaded)?;
        let (index, source) = page
            .position(id)
            .map(|i| (i, &page.components[i]))
            .ok_or_else(|| EditorError::UnknownComponent(id.clone()))?;

        let copy = source.duplicate();
        self.commit(&Mutation::InsertComponent {
            index: Some(index + 1),
            component: copy.clone(),
        })?;
        Ok(copy)
    }

    /// Remove `id`; absent ids are ignored
    ///
    /// Returns whether a component was removed.
    pub fn remove_component(&mut self, id: &ComponentId) -> bool {
        self.commit(&Mutation::RemoveComponent { component_id: id.clone() })
            .unwrap_or(false)
    }

    /// Move `id` to `index` (clamped to the last position)
    pub fn move_component(&mut self, id: &ComponentId, index: usize) -> Result<(), EditorError> {
        self.commit(&Mutation::MoveComponent {
            component_id: id.clone(),
            index,
        })
        .map(|_| ())
    }

    /// Write `value` at the dot `path` inside the props of `id`
    pub fn update_component_prop(
        &mut self,
        id: &ComponentId,
        path: &str,
        value: Value,
    ) -> Result<(), EditorError> {
        let path = PropPath::parse(path).map_err(|e| {
            warn!(component_id = %id, error = %e, "Rejected prop path");
            EditorError::InvalidPath(e)
        })?;

        self.commit(&Mutation::UpdateProp {
            component_id: id.clone(),
            path,
            value,
        })
        .map(|_| ())
    }

    /// Replace all props of `id`
    pub fn replace_component_props(&mut self, id: &ComponentId, props: Value) -> Result<(), EditorError> {
        self.commit(&Mutation::ReplaceProps {
            component_id: id.clone(),
            props,
        })
        .map(|_| ())
    }

    /// Group the following edits into one undo step until `end_batch`
    pub fn begin_batch(&mut self, label: &str) {
        self.history.begin_batch(Some(label));
    }

    pub fn end_batch(&mut self) {
        self.history.end_batch();
    }

    // ---------------------------------------------------------------------
    // History
    // ---------------------------------------------------------------------

    /// Step back one edit; returns `false` if there was nothing to undo
    pub fn undo(&mut self) -> bool {
        let Some(page) = self.page.as_mut() else {
            return false;
        };
        if !self.history.undo(page) {
            return false;
        }
        debug!(undo_levels = self.history.undo_levels(), "Undo");
        self.after_history_step();
        true
    }

    /// Reapply the last undone edit; returns `false` if there was none
    pub fn redo(&mut self) -> bool {
        let Some(page) = self.page.as_mut() else {
            return false;
        };
        if !self.history.redo(page) {
            return false;
        }
        debug!(redo_levels = self.history.redo_levels(), "Redo");
        self.after_history_step();
        true
    }

    fn after_history_step(&mut self) {
        self.version += 1;
        self.view.is_dirty = self.page != self.clean;

        let mut events = vec![StoreEvent::DocumentChanged { version: self.version }];
        if self.drop_dangling_selection() {
            events.push(StoreEvent::SelectionChanged { selected: None });
        }
        events.push(self.history_event());
        self.listeners.emit(&events);
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    pub fn undo_label(&self) -> Option<&str> {
        self.history.undo_label()
    }

    pub fn redo_label(&self) -> Option<&str> {
        self.history.redo_label()
    }

    pub fn history(&self) -> &UndoStack<PageDocument> {
        &self.history
    }

    fn history_event(&self) -> StoreEvent {
        StoreEvent::HistoryChanged {
            can_undo: self.history.can_undo(),
            can_redo: self.history.can_redo(),
        }
    }

    // ---------------------------------------------------------------------
    // Selection
    // ---------------------------------------------------------------------

    /// Select `id`, or clear the selection with `None`
    ///
    /// Unknown ids are rejected and the current selection is kept. Selection
    /// is not part of undo history.
    pub fn select_component(&mut self, id: Option<&ComponentId>) -> Result<(), EditorError> {
        if let Some(id) = id {
            let known = self.page.as_ref().is_some_and(|page| page.contains(id));
            if !known {
                warn!(component_id = %id, "Cannot select unknown component");
                return Err(EditorError::UnknownComponent(id.clone()));
            }
        }
        self.set_selection(id.cloned());
        Ok(())
    }

    fn set_selection(&mut self, selected: Option<ComponentId>) {
        if self.selected == selected {
            return;
        }
        self.selected = selected.clone();
        self.listeners.emit(&[StoreEvent::SelectionChanged { selected }]);
    }

    /// Clear the selection if it no longer points into the page
    fn drop_dangling_selection(&mut self) -> bool {
        let dangling = match (&self.selected, &self.page) {
            (Some(id), Some(page)) => !page.contains(id),
            (Some(_), None) => true,
            (None, _) => false,
        };
        if dangling {
            debug!("Clearing selection of removed component");
            self.selected = None;
        }
        dangling
    }

    pub fn selected_component_id(&self) -> Option<&ComponentId> {
        self.selected.as_ref()
    }

    // ---------------------------------------------------------------------
    // View flags
    // ---------------------------------------------------------------------

    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.update_view(|view| view.viewport = viewport);
    }

    pub fn set_marketplace_open(&mut self, open: bool) {
        self.update_view(|view| view.is_marketplace_open = open);
    }

    pub fn toggle_marketplace(&mut self) {
        self.update_view(|view| view.is_marketplace_open = !view.is_marketplace_open);
    }

    pub fn set_properties_panel_open(&mut self, open: bool) {
        self.update_view(|view| view.is_properties_panel_open = open);
    }

    pub fn toggle_properties_panel(&mut self) {
        self.update_view(|view| view.is_properties_panel_open = !view.is_properties_panel_open);
    }

    /// Flag an external save as in flight (or finished)
    pub fn set_saving(&mut self, saving: bool) {
        self.update_view(|view| view.is_saving = saving);
    }

    /// Treat the current page as persisted
    ///
    /// The next edit starts a new undo step, so undo can return to the saved
    /// page.
    pub fn mark_saved(&mut self) {
        self.clean = self.page.clone();
        self.history.break_coalescing();
        self.update_view(|view| view.is_dirty = false);
    }

    fn update_view(&mut self, f: impl FnOnce(&mut EditorViewState)) {
        let before = self.view;
        f(&mut self.view);
        if self.view != before {
            self.listeners.emit(&[StoreEvent::ViewChanged { view: self.view }]);
        }
    }

    pub fn view(&self) -> &EditorViewState {
        &self.view
    }

    pub fn viewport(&self) -> Viewport {
        self.view.viewport
    }

    pub fn is_dirty(&self) -> bool {
        self.view.is_dirty
    }

    pub fn is_saving(&self) -> bool {
        self.view.is_saving
    }

    // ---------------------------------------------------------------------
    // Reads
    // ---------------------------------------------------------------------

    pub fn page(&self) -> Option<&PageDocument> {
        self.page.as_ref()
    }

    /// Components in render order (empty if no page is loaded)
    pub fn components(&self) -> &[Arc<ComponentInstance>] {
        self.page
            .as_ref()
            .map(|page| page.components.as_slice())
            .unwrap_or(&[])
    }

    pub fn component(&self, id: &ComponentId) -> Option<&ComponentInstance> {
        self.page.as_ref().and_then(|page| page.find(id))
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    // ---------------------------------------------------------------------
    // Subscriptions
    // ---------------------------------------------------------------------

    /// Register a listener called after every transition
    pub fn subscribe(&mut self, listener: impl FnMut(&StoreEvent) + 'static) -> SubscriptionId {
        self.listeners.add(Box::new(listener))
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.listeners.remove(id)
    }

    pub fn subscriber_count(&self) -> usize {
        self.listeners.len()
    }
}

impl Default for EditorStore {
    fn default() -> Self {
        Self::new(EditorConfig::default())
    }
}
