use serde::Deserialize;

/// Tunables for the chart. Every field may be omitted from the page's
/// `chart-config` document.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ChartConfig {
	/// Pairwise repulsion handed to the engine.
	pub charge_strength: f64,
	/// The engine's own spring pull along edges.
	pub spring_strength: f64,
	/// Cap on any single force.
	pub force_max: f64,
	pub node_speed: f64,
	/// Velocity kept per engine update.
	pub damping: f64,
	pub node_mass: f64,
	/// Engine time step at full energy, in seconds.
	pub time_step: f64,
	/// Rest length kept between linked nodes.
	pub link_distance: f64,
	pub link_strength: f64,
	pub link_iterations: usize,
	/// Strength of the x/y centering forces.
	pub center_strength: f64,
	/// Added to each node's radius for collision.
	pub collide_margin: f64,
	pub collide_strength: f64,
	pub alpha_decay: f64,
	pub alpha_min: f64,
	/// Target energy while a node is being dragged.
	pub drag_alpha_target: f64,
	/// Energy injected on resize and on sizing-mode changes.
	pub reheat_alpha: f64,
	/// Distance kept between nodes and the viewport edges.
	pub padding: f64,
	/// Vertical space reserved for the navbar.
	pub chrome_offset: f64,
	pub transition_ms: f64,
	pub fade_opacity: f64,
	/// Member radius when level sizing is off.
	pub member_fixed_radius: f64,
	pub label_offset: f64,
	pub label_font_size: f64,
	pub group_color: String,
	pub member_color: String,
}

impl Default for ChartConfig {
	fn default() -> Self {
		Self {
			charge_strength: 150.0,
			spring_strength: 0.05,
			force_max: 100.0,
			node_speed: 3000.0,
			damping: 0.9,
			node_mass: 10.0,
			time_step: 0.016,
			link_distance: 200.0,
			link_strength: 1.0,
			link_iterations: 1,
			center_strength: 0.1,
			collide_margin: 5.0,
			collide_strength: 1.0,
			alpha_decay: 0.05,
			alpha_min: 0.001,
			drag_alpha_target: 0.2,
			reheat_alpha: 0.3,
			padding: 20.0,
			chrome_offset: 60.0,
			transition_ms: 200.0,
			fade_opacity: 0.2,
			member_fixed_radius: 5.0,
			label_offset: 15.0,
			label_font_size: 12.0,
			group_color: "#FF3030".into(),
			member_color: "#0080FF".into(),
		}
	}
}

impl ChartConfig {
	/// Parses a partial config document, keeping defaults for absent fields.
	pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
		serde_json::from_str(json)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn partial_document_keeps_defaults() {
		let config = ChartConfig::from_json(r##"{"linkDistance": 120, "memberColor": "#00ff00"}"##)
			.unwrap();
		assert_eq!(config.link_distance, 120.0);
		assert_eq!(config.member_color, "#00ff00");
		assert_eq!(config.charge_strength, 150.0);
		assert_eq!(config.chrome_offset, 60.0);
	}

	#[test]
	fn unknown_fields_are_ignored() {
		let config = ChartConfig::from_json(r#"{"zoom": true}"#).unwrap();
		assert_eq!(config, ChartConfig::default());
	}
}
