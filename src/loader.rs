//! Reads the chart's input collections and optional config from the page.
//!
//! Data comes from the `groups` and `members` globals when the page defines
//! them, otherwise from a `<script type="application/json" id="chart-data">`
//! element holding `{"groups": {...}, "members": {...}}`.

use log::{info, warn};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{HtmlScriptElement, Window};

use crate::components::force_graph::{ChartConfig, ChartData};

pub const DATA_ELEMENT_ID: &str = "chart-data";
pub const CONFIG_ELEMENT_ID: &str = "chart-config";

/// Why the chart's input collections could not be read.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
	/// Not running in a browser page.
	#[error("no window or document available")]
	NoDocument,

	/// The page provides neither source.
	#[error("no `groups`/`members` globals and no #chart-data element")]
	Missing,

	/// A global exists but `JSON.stringify` rejected it.
	#[error("global `{0}` could not be serialized to JSON")]
	NotSerializable(&'static str),

	/// The JSON does not describe groups and members.
	#[error("invalid chart data: {0}")]
	Parse(#[from] serde_json::Error),
}

fn global_json(window: &Window, name: &'static str) -> Result<Option<String>, LoadError> {
	let value = js_sys::Reflect::get(window, &JsValue::from_str(name)).unwrap_or(JsValue::UNDEFINED);
	if value.is_undefined() || value.is_null() {
		return Ok(None);
	}
	js_sys::JSON::stringify(&value)
		.ok()
		.and_then(|s| s.as_string())
		.map(Some)
		.ok_or(LoadError::NotSerializable(name))
}

fn script_text(window: &Window, id: &str) -> Option<String> {
	let element = window.document()?.get_element_by_id(id)?;
	let script: HtmlScriptElement = element.dyn_into().ok()?;
	script.text().ok()
}

/// Parses whichever sources were found. Globals win over the script element.
pub fn parse_sources(
	groups: Option<&str>,
	members: Option<&str>,
	script: Option<&str>,
) -> Result<ChartData, LoadError> {
	match (groups, members, script) {
		(Some(groups), Some(members), _) => Ok(ChartData::from_json_parts(groups, members)?),
		(_, _, Some(script)) => Ok(serde_json::from_str(script)?),
		_ => Err(LoadError::Missing),
	}
}

/// Reads groups and members from the page globals, or from the
/// `#chart-data` element when the globals are absent.
pub fn load_chart_data() -> Result<ChartData, LoadError> {
	let window = web_sys::window().ok_or(LoadError::NoDocument)?;
	let groups = global_json(&window, "groups")?;
	let members = global_json(&window, "members")?;
	let script = script_text(&window, DATA_ELEMENT_ID);

	let data = parse_sources(groups.as_deref(), members.as_deref(), script.as_deref())?;
	info!(
		"loaded {} groups, {} members",
		data.groups.len(),
		data.members.len()
	);
	Ok(data)
}

/// Reads the optional config element, falling back to defaults.
pub fn load_chart_config() -> ChartConfig {
	let Some(text) = web_sys::window().and_then(|w| script_text(&w, CONFIG_ELEMENT_ID)) else {
		return ChartConfig::default();
	};
	ChartConfig::from_json(&text).unwrap_or_else(|e| {
		warn!("ignoring invalid #{CONFIG_ELEMENT_ID}: {e}");
		ChartConfig::default()
	})
}
