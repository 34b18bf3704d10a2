//! Input collections injected by the host page.

use std::fmt;

use serde::Deserialize;
use serde::de::{Deserializer, MapAccess, Visitor};

/// A group record, keyed by its id in [`ChartData::groups`].
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Group {
	pub name: String,
	/// Explicit size; zero or absent falls back to `member_count`.
	#[serde(default)]
	pub size_override: Option<f64>,
	#[serde(default)]
	pub member_count: f64,
}

/// A member record, keyed by its id in [`ChartData::members`].
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct Member {
	pub name: String,
	#[serde(default)]
	pub level: Option<f64>,
	#[serde(default)]
	pub groups: Vec<GroupRef>,
}

/// A group id as written by the page: either a JSON number or a string.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum GroupRef {
	Number(serde_json::Number),
	Text(String),
}

impl fmt::Display for GroupRef {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			GroupRef::Text(s) => f.write_str(s),
			GroupRef::Number(n) => {
				if let Some(i) = n.as_i64() {
					write!(f, "{i}")
				} else if let Some(u) = n.as_u64() {
					write!(f, "{u}")
				} else {
					// Integral floats print without a fraction, like a JS template string.
					let v = n.as_f64().unwrap_or_default();
					if v.fract() == 0.0 && v.abs() < 1e15 {
						write!(f, "{}", v as i64)
					} else {
						write!(f, "{v}")
					}
				}
			}
		}
	}
}

/// Both collections, each as `(id, record)` pairs in iteration order.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct ChartData {
	#[serde(default, deserialize_with = "ordered_map")]
	pub groups: Vec<(String, Group)>,
	#[serde(default, deserialize_with = "ordered_map")]
	pub members: Vec<(String, Member)>,
}

impl ChartData {
	/// Parse the two collections from their separate JSON documents.
	pub fn from_json_parts(groups: &str, members: &str) -> Result<Self, serde_json::Error> {
		let mut de = serde_json::Deserializer::from_str(groups);
		let groups = ordered_map(&mut de)?;
		de.end()?;
		let mut de = serde_json::Deserializer::from_str(members);
		let members = ordered_map(&mut de)?;
		de.end()?;
		Ok(Self { groups, members })
	}
}

/// The numeric value of keys a JS engine treats as array indices.
fn array_index(key: &str) -> Option<u32> {
	if key.is_empty() || (key.len() > 1 && key.starts_with('0')) {
		return None;
	}
	key.parse::<u32>().ok().filter(|&i| i != u32::MAX)
}

/// Reorders entries the way `for...in` visits an object's own keys.
pub fn js_key_order<T>(entries: &mut [(String, T)]) {
	entries.sort_by_key(|(key, _)| match array_index(key) {
		Some(i) => (0, i),
		None => (1, 0),
	});
}

/// Deserializes a JSON object into `(key, value)` pairs in JS key order.
fn ordered_map<'de, D, T>(deserializer: D) -> Result<Vec<(String, T)>, D::Error>
where
	D: Deserializer<'de>,
	T: Deserialize<'de>,
{
	struct EntriesVisitor<T>(std::marker::PhantomData<T>);

	impl<'de, T: Deserialize<'de>> Visitor<'de> for EntriesVisitor<T> {
		type Value = Vec<(String, T)>;

		fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
			f.write_str("an object keyed by id")
		}

		fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
			let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(0));
			while let Some((key, value)) = map.next_entry::<String, T>()? {
				entries.push((key, value));
			}
			js_key_order(&mut entries);
			Ok(entries)
		}

		fn visit_unit<E>(self) -> Result<Self::Value, E> {
			Ok(Vec::new())
		}
	}

	deserializer.deserialize_any(EntriesVisitor(std::marker::PhantomData))
}
