//! Browser bindings for the editor store.
//!
//! Structured values cross the boundary as JSON strings; errors become
//! string `JsValue`s carrying the editor error message.

use std::fmt::Display;

use pagecraft_document::{ComponentId, ComponentType, PageDocument, Value};
use pagecraft_editor::selectors::select_selected_component;
use pagecraft_editor::{EditorConfig, EditorError, EditorStore, SubscriptionId, Viewport};
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod clock {
    use std::time::Duration;

    use pagecraft_editor::Clock;
    use wasm_bindgen::prelude::*;

    #[wasm_bindgen]
    extern "C" {
        #[wasm_bindgen(js_namespace = Date)]
        fn now() -> f64;
    }

    /// `Date.now()` clock; `Instant` is unavailable on wasm32-unknown-unknown
    #[derive(Debug, Default)]
    pub struct JsClock;

    impl Clock for JsClock {
        fn now(&self) -> Duration {
            Duration::from_millis(now().max(0.0) as u64)
        }
    }
}

#[cfg(target_arch = "wasm32")]
fn new_store(config: EditorConfig) -> EditorStore {
    EditorStore::with_clock(config, clock::JsClock)
}

#[cfg(not(target_arch = "wasm32"))]
fn new_store(config: EditorConfig) -> EditorStore {
    EditorStore::new(config)
}

#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
}

fn to_js(e: impl Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

fn parse_json(json: &str) -> Result<Value, EditorError> {
    Ok(serde_json::from_str(json)?)
}

/// Editor store handle owned by the page builder UI
#[wasm_bindgen]
pub struct PageEditor {
    store: EditorStore,

    /// JS-facing handles for store subscriptions
    subscriptions: Vec<(u32, SubscriptionId)>,
    next_handle: u32,
}

impl PageEditor {
    fn from_config_json(config_json: Option<&str>) -> Result<Self, EditorError> {
        let config = match config_json {
            Some(json) => EditorConfig::from_json(json)?,
            None => EditorConfig::default(),
        };
        Ok(Self {
            store: new_store(config),
            subscriptions: Vec::new(),
            next_handle: 0,
        })
    }

    /// Forward every store event to `listener` as a JSON string
    fn listen(&mut self, mut listener: impl FnMut(String) + 'static) -> u32 {
        let id = self.store.subscribe(move |event| match serde_json::to_string(event) {
            Ok(json) => listener(json),
            Err(e) => tracing::warn!(error = %e, "Dropped unserializable store event"),
        });
        let handle = self.next_handle;
        self.next_handle += 1;
        self.subscriptions.push((handle, id));
        handle
    }

    fn unlisten(&mut self, handle: u32) -> bool {
        match self.subscriptions.iter().position(|(h, _)| *h == handle) {
            Some(index) => {
                let (_, id) = self.subscriptions.remove(index);
                self.store.unsubscribe(id)
            }
            None => false,
        }
    }

    fn load(&mut self, page_json: &str) -> Result<(), EditorError> {
        let page: PageDocument = serde_json::from_str(page_json)?;
        self.store.initialize_page(page)
    }

    fn add(&mut self, kind: &str, variant: u32, props_json: &str) -> Result<String, EditorError> {
        let kind: ComponentType = kind.parse()?;
        let component = self.store.add_component(kind, variant, parse_json(props_json)?)?;
        Ok(serde_json::to_string(&component)?)
    }

    fn duplicate(&mut self, id: &str) -> Result<String, EditorError> {
        let component = self.store.duplicate_component(&ComponentId::from(id))?;
        Ok(serde_json::to_string(&component)?)
    }

    fn update_prop(&mut self, id: &str, path: &str, value_json: &str) -> Result<(), EditorError> {
        self.store
            .update_component_prop(&ComponentId::from(id), path, parse_json(value_json)?)
    }

    fn replace_props(&mut self, id: &str, props_json: &str) -> Result<(), EditorError> {
        self.store
            .replace_component_props(&ComponentId::from(id), parse_json(props_json)?)
    }

    fn viewport_from(name: &str) -> Result<Viewport, EditorError> {
        Ok(serde_json::from_value(Value::String(name.to_string()))?)
    }
}

#[wasm_bindgen]
impl PageEditor {
    /// Create an editor, optionally from a `pagecraft.config.json` body
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: Option<String>) -> Result<PageEditor, JsValue> {
        Self::from_config_json(config_json.as_deref()).map_err(to_js)
    }

    #[wasm_bindgen(js_name = initializePage)]
    pub fn initialize_page(&mut self, page_json: &str) -> Result<(), JsValue> {
        self.load(page_json).map_err(to_js)
    }

    /// Call `callback(eventJson)` after every store transition; returns a
    /// handle for `unsubscribe`
    pub fn subscribe(&mut self, callback: js_sys::Function) -> u32 {
        self.listen(move |json| {
            if let Err(e) = callback.call1(&JsValue::NULL, &JsValue::from_str(&json)) {
                tracing::warn!(error = ?e, "Store event callback threw");
            }
        })
    }

    pub fn unsubscribe(&mut self, handle: u32) -> bool {
        self.unlisten(handle)
    }

    #[wasm_bindgen(js_name = resetStore)]
    pub fn reset_store(&mut self) {
        self.store.reset_store();
    }

    /// Append a block; returns the created component as JSON
    #[wasm_bindgen(js_name = addComponent)]
    pub fn add_component(&mut self, kind: &str, variant: u32, props_json: &str) -> Result<String, JsValue> {
        self.add(kind, variant, props_json).map_err(to_js)
    }

    #[wasm_bindgen(js_name = duplicateComponent)]
    pub fn duplicate_component(&mut self, id: &str) -> Result<String, JsValue> {
        self.duplicate(id).map_err(to_js)
    }

    #[wasm_bindgen(js_name = removeComponent)]
    pub fn remove_component(&mut self, id: &str) -> bool {
        self.store.remove_component(&ComponentId::from(id))
    }

    #[wasm_bindgen(js_name = moveComponent)]
    pub fn move_component(&mut self, id: &str, index: usize) -> Result<(), JsValue> {
        self.store
            .move_component(&ComponentId::from(id), index)
            .map_err(to_js)
    }

    #[wasm_bindgen(js_name = selectComponent)]
    pub fn select_component(&mut self, id: Option<String>) -> Result<(), JsValue> {
        let id = id.map(ComponentId::from);
        self.store.select_component(id.as_ref()).map_err(to_js)
    }

    #[wasm_bindgen(js_name = updateComponentProp)]
    pub fn update_component_prop(&mut self, id: &str, path: &str, value_json: &str) -> Result<(), JsValue> {
        self.update_prop(id, path, value_json).map_err(to_js)
    }

    #[wasm_bindgen(js_name = replaceComponentProps)]
    pub fn replace_component_props(&mut self, id: &str, props_json: &str) -> Result<(), JsValue> {
        self.replace_props(id, props_json).map_err(to_js)
    }

    #[wasm_bindgen(js_name = beginBatch)]
    pub fn begin_batch(&mut self, label: &str) {
        self.store.begin_batch(label);
    }

    #[wasm_bindgen(js_name = endBatch)]
    pub fn end_batch(&mut self) {
        self.store.end_batch();
    }

    pub fn undo(&mut self) -> bool {
        self.store.undo()
    }

    pub fn redo(&mut self) -> bool {
        self.store.redo()
    }

    #[wasm_bindgen(js_name = canUndo)]
    pub fn can_undo(&self) -> bool {
        self.store.can_undo()
    }

    #[wasm_bindgen(js_name = canRedo)]
    pub fn can_redo(&self) -> bool {
        self.store.can_redo()
    }

    #[wasm_bindgen(js_name = setViewport)]
    pub fn set_viewport(&mut self, viewport: &str) -> Result<(), JsValue> {
        let viewport = Self::viewport_from(viewport).map_err(to_js)?;
        self.store.set_viewport(viewport);
        Ok(())
    }

    #[wasm_bindgen(js_name = setMarketplaceOpen)]
    pub fn set_marketplace_open(&mut self, open: bool) {
        self.store.set_marketplace_open(open);
    }

    #[wasm_bindgen(js_name = setPropertiesPanelOpen)]
    pub fn set_properties_panel_open(&mut self, open: bool) {
        self.store.set_properties_panel_open(open);
    }

    #[wasm_bindgen(js_name = setSaving)]
    pub fn set_saving(&mut self, saving: bool) {
        self.store.set_saving(saving);
    }

    #[wasm_bindgen(js_name = markSaved)]
    pub fn mark_saved(&mut self) {
        self.store.mark_saved();
    }

    /// Current page as JSON, for the save/publish collaborator
    #[wasm_bindgen(js_name = pageJson)]
    pub fn page_json(&self) -> Result<Option<String>, JsValue> {
        self.store
            .page()
            .map(serde_json::to_string)
            .transpose()
            .map_err(to_js)
    }

    #[wasm_bindgen(js_name = componentsJson)]
    pub fn components_json(&self) -> Result<String, JsValue> {
        serde_json::to_string(self.store.components()).map_err(to_js)
    }

    #[wasm_bindgen(js_name = selectedComponentJson)]
    pub fn selected_component_json(&self) -> Result<Option<String>, JsValue> {
        select_selected_component(&self.store)
            .map(serde_json::to_string)
            .transpose()
            .map_err(to_js)
    }

    #[wasm_bindgen(js_name = selectedComponentId)]
    pub fn selected_component_id(&self) -> Option<String> {
        self.store.selected_component_id().map(ToString::to_string)
    }

    #[wasm_bindgen(js_name = viewJson)]
    pub fn view_json(&self) -> Result<String, JsValue> {
        serde_json::to_string(self.store.view()).map_err(to_js)
    }

    pub fn version(&self) -> u64 {
        self.store.version()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"{
        "id": "page-1",
        "organizationId": "org-1",
        "name": "Home",
        "slug": "home",
        "components": [],
        "createdAt": "2024-01-01T00:00:00Z",
        "updatedAt": "2024-01-01T00:00:00Z"
    }"#;

    #[test]
    fn test_add_edit_undo_through_bindings() {
        let mut editor = PageEditor::new(None).unwrap();
        editor.initialize_page(PAGE).unwrap();

        let created = editor
            .add_component("hero", 1, r#"{"title": {"label": "Hi"}}"#)
            .unwrap();
        let created: Value = serde_json::from_str(&created).unwrap();
        let id = created["id"].as_str().unwrap().to_string();
        assert_eq!(created["type"], "hero");

        editor.update_component_prop(&id, "title.label", "\"Hello\"").unwrap();
        editor.select_component(Some(id.clone())).unwrap();

        let selected: Value =
            serde_json::from_str(&editor.selected_component_json().unwrap().unwrap()).unwrap();
        assert_eq!(selected["props"]["title"]["label"], "Hello");

        assert!(editor.undo());
        let components: Value = serde_json::from_str(&editor.components_json().unwrap()).unwrap();
        assert_eq!(components[0]["props"]["title"]["label"], "Hi");
        assert!(editor.can_redo());
    }

    #[test]
    fn test_view_flags_through_bindings() {
        let mut editor = PageEditor::new(Some(r#"{"historyLimit": 5}"#.to_string())).unwrap();
        editor.set_viewport("mobile").unwrap();
        editor.set_marketplace_open(true);

        let view: Value = serde_json::from_str(&editor.view_json().unwrap()).unwrap();
        assert_eq!(view["viewport"], "mobile");
        assert_eq!(view["isMarketplaceOpen"], true);
        assert_eq!(editor.page_json().unwrap(), None);
    }

    #[test]
    fn test_events_forwarded_as_json() {
        use std::cell::RefCell;
        use std::rc::Rc;

        let mut editor = PageEditor::from_config_json(None).unwrap();
        editor.load(PAGE).unwrap();

        let received = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&received);
        let handle = editor.listen(move |json| sink.borrow_mut().push(json));

        editor.add("faq", 1, "{}").unwrap();
        let first: Value = serde_json::from_str(&received.borrow()[0]).unwrap();
        assert_eq!(first["type"], "documentChanged");
        assert_eq!(first["version"], 1);

        assert!(editor.unlisten(handle));
        assert!(!editor.unlisten(handle));
        let count = received.borrow().len();
        editor.set_marketplace_open(true);
        assert_eq!(received.borrow().len(), count);
    }

    #[test]
    fn test_inner_errors_are_editor_errors() {
        let mut editor = PageEditor::from_config_json(None).unwrap();
        editor.load(PAGE).unwrap();

        assert!(matches!(
            editor.add("carousel", 1, "{}"),
            Err(EditorError::UnknownComponentType(_))
        ));
        assert!(matches!(editor.add("hero", 1, "{not json"), Err(EditorError::Json(_))));
        assert!(matches!(
            editor.update_prop("ghost", "title", "\"x\""),
            Err(EditorError::UnknownComponent(_))
        ));
        assert!(PageEditor::viewport_from("watch").is_err());
    }
}
