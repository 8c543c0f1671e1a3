//! Browser tests for the bindings
//!
//! Run with `wasm-pack test --headless --firefox packages/wasm`.

#![cfg(target_arch = "wasm32")]

use pagecraft_wasm::PageEditor;
use serde_json::Value;
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

const PAGE: &str = r#"{
    "id": "page-1",
    "organizationId": "org-1",
    "name": "Home",
    "slug": "home",
    "components": [],
    "createdAt": "2024-01-01T00:00:00Z",
    "updatedAt": "2024-01-01T00:00:00Z"
}"#;

fn editor(config: Option<&str>) -> PageEditor {
    let mut editor = PageEditor::new(config.map(str::to_string)).unwrap();
    editor.initialize_page(PAGE).unwrap();
    editor
}

fn created_id(json: &str) -> String {
    let value: Value = serde_json::from_str(json).unwrap();
    value["id"].as_str().unwrap().to_string()
}

#[wasm_bindgen_test]
fn add_and_undo_in_browser() {
    let mut editor = editor(None);
    let id = created_id(&editor.add_component("faq", 1, "{}").unwrap());
    assert!(!id.is_empty());
    assert_eq!(editor.version(), 1);

    assert!(editor.undo());
    assert_eq!(editor.components_json().unwrap(), "[]");
    assert!(editor.redo());
    assert!(editor.components_json().unwrap().contains(&id));
}

#[wasm_bindgen_test]
fn coalescing_uses_browser_clock() {
    let mut editor = editor(Some(r#"{"coalesceWindowMs": 60000}"#));
    let id = created_id(&editor.add_component("hero", 1, "{}").unwrap());

    editor.update_component_prop(&id, "title", "\"H\"").unwrap();
    editor.update_component_prop(&id, "title", "\"Hi\"").unwrap();

    assert!(editor.undo());
    assert!(editor.undo());
    assert_eq!(editor.components_json().unwrap(), "[]");
}

#[wasm_bindgen_test]
fn errors_surface_as_messages() {
    let mut editor = editor(None);
    let err = editor.move_component("ghost", 0).unwrap_err();
    assert!(err.as_string().unwrap().contains("ghost"));
}

#[wasm_bindgen_test]
fn subscribe_calls_js_callback() {
    let mut editor = editor(None);
    let log = js_sys::Array::new();
    let push = js_sys::Function::new_with_args("json", "this.push(JSON.parse(json))");
    let callback = push.bind(&log);

    let handle = editor.subscribe(callback);
    editor.add_component("footer", 1, "{}").unwrap();
    assert!(log.length() > 0);

    let before = log.length();
    assert!(editor.unsubscribe(handle));
    editor.set_viewport("tablet").unwrap();
    assert_eq!(log.length(), before);
}

