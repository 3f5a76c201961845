#![cfg(target_arch = "wasm32")]

use jstk_wasm::EndpointPanel;
use wasm_bindgen::JsValue;
use wasm_bindgen_test::*;

const CAPTURE: &str = r#"[
    {"endpoint": "/a", "sourceFile": "x.js", "webpage": "p1"},
    {"endpoint": "/b", "sourceFile": "y.js", "webpage": "p2"}
]"#;

fn loaded_panel() -> EndpointPanel {
    let mut panel = EndpointPanel::new("/DevTool/DevTool.html", "chrome-extension://id", None).unwrap();
    let generation = panel.begin_query();
    assert!(panel.resolve_query(generation, JsValue::from_str(CAPTURE)));
    panel
}

#[wasm_bindgen_test]
fn resolves_and_filters() {
    let mut panel = loaded_panel();
    assert_eq!(panel.filtered_count(), 2);

    panel.select_location("x.js");
    let generation = panel.begin_query();
    assert!(panel.resolve_query(generation, JsValue::from_str(CAPTURE)));
    assert_eq!(panel.filtered_count(), 1);
}

#[wasm_bindgen_test]
fn superseded_answers_are_ignored() {
    let mut panel = loaded_panel();
    let old = panel.begin_query();
    panel.search("b");
    let new = panel.begin_query();
    assert!(panel.resolve_query(new, JsValue::from_str(CAPTURE)));
    assert!(!panel.resolve_query(old, JsValue::from_str("[]")));
    assert_eq!(panel.filtered_count(), 1);
}

#[wasm_bindgen_test]
fn clear_all_empties_panel() {
    let mut panel = loaded_panel();
    assert!(panel.clear_all());
    assert_eq!(panel.filtered_count(), 0);
    assert_eq!(panel.start_index(), 0);
}

#[wasm_bindgen_test]
fn rejects_bad_config() {
    assert!(EndpointPanel::new("/", "ext://id", Some(r#"{"windowSize": 0}"#.to_string())).is_err());
}

fn error_of(panel: &EndpointPanel) -> Option<String> {
    let model = panel.render().unwrap();
    js_sys::Reflect::get(&model, &"error".into()).unwrap().as_string()
}

#[wasm_bindgen_test]
fn unreadable_answer_keeps_last_rows() {
    let mut panel = loaded_panel();
    assert_eq!(panel.filtered_count(), 2);

    let generation = panel.begin_query();
    assert!(panel.resolve_query(generation, JsValue::from_str("{bad")));
    assert_eq!(panel.filtered_count(), 2);
    assert!(error_of(&panel).is_some());

    let generation = panel.begin_query();
    assert!(panel.resolve_query(generation, JsValue::from(42)));
    assert_eq!(panel.filtered_count(), 2);
    assert!(error_of(&panel).is_some());

    let generation = panel.begin_query();
    assert!(panel.resolve_query(generation, JsValue::from_str(CAPTURE)));
    assert!(error_of(&panel).is_none());
}

#[wasm_bindgen_test]
fn accepts_object_arrays_and_wrapped_objects() {
    let mut panel = EndpointPanel::new("/", "ext://id", None).unwrap();

    let array = js_sys::JSON::parse(CAPTURE).unwrap();
    let generation = panel.begin_query();
    assert!(panel.resolve_query(generation, array));
    assert_eq!(panel.filtered_count(), 2);

    let wrapped = js_sys::JSON::parse(r#"{"urls": [{"url": "/c", "file": "z.js", "page": "p3"}]}"#).unwrap();
    let generation = panel.begin_query();
    assert!(panel.resolve_query(generation, wrapped));
    assert_eq!(panel.filtered_count(), 1);

    let no_urls = js_sys::JSON::parse(r#"{"other": []}"#).unwrap();
    let generation = panel.begin_query();
    assert!(panel.resolve_query(generation, no_urls));
    assert_eq!(panel.filtered_count(), 1);
    assert!(error_of(&panel).is_some());
}

#[wasm_bindgen_test]
fn current_page_follows_window_location() {
    let panel = EndpointPanel::for_current_page(None);
    assert_eq!(panel.is_ok(), web_sys::window().is_some());
}
