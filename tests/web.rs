//! Browser checks for reading chart data from page globals.
#![cfg(target_arch = "wasm32")]

use situation_chart::load_chart_data;
use wasm_bindgen::JsValue;
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

fn set_global(name: &str, json: &str) {
	let window = web_sys::window().unwrap();
	let value = js_sys::JSON::parse(json).unwrap();
	js_sys::Reflect::set(&window, &JsValue::from_str(name), &value).unwrap();
}

#[wasm_bindgen_test]
fn reads_groups_and_members_globals() {
	set_global("groups", r#"{"2": {"name": "G2", "memberCount": 1}, "1": {"name": "G1", "memberCount": 4}}"#);
	set_global("members", r#"{"1": {"name": "M1", "level": 5, "groups": [1, 2]}}"#);

	let data = load_chart_data().unwrap();
	let ids: Vec<&str> = data.groups.iter().map(|(id, _)| id.as_str()).collect();
	assert_eq!(ids, vec!["1", "2"]);
	assert_eq!(data.members[0].1.groups.len(), 2);
}
