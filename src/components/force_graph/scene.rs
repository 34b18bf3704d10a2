//! Retained drawing model. Elements are created once from the graph; only
//! their attributes change afterwards.

use super::config::ChartConfig;
use super::model::GraphModel;
use super::transition::{Color, Tween};

pub const EDGE_STROKE: &str = "#c2c2c280";
pub const EDGE_WIDTH: f64 = 1.5;
pub const FADED_EDGE_STROKE: &str = "#ccc";
pub const NODE_STROKE: &str = "#fff";
pub const NODE_STROKE_WIDTH: f64 = 1.5;
pub const HOVER_STROKE: &str = "#888";
pub const HOVER_STROKE_WIDTH: f64 = 3.0;
pub const LABEL_FILL: &str = "#fff";

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Surface {
	pub width: f64,
	pub height: f64,
}

impl Surface {
	pub fn view_box(&self) -> String {
		format!("0 0 {} {}", self.width, self.height)
	}
}

#[derive(Clone, Debug)]
pub struct EdgeElement {
	pub source: usize,
	pub target: usize,
	pub x1: f64,
	pub y1: f64,
	pub x2: f64,
	pub y2: f64,
	pub opacity: Tween<f64>,
	pub stroke: Tween<Color>,
	/// Stroke the edge is drawn with when nothing is highlighted.
	pub base_stroke: Color,
}

#[derive(Clone, Debug)]
pub struct NodeElement {
	pub title: String,
	pub fill: String,
	/// Drawn circle radius.
	pub radius: f64,
	/// The node's size; labels sit below it whatever the circle shows.
	pub size: f64,
	pub x: f64,
	pub y: f64,
	pub opacity: Tween<f64>,
	pub stroke: Tween<Color>,
	pub stroke_width: Tween<f64>,
}

pub struct Scene {
	pub surface: Surface,
	pub edges: Vec<EdgeElement>,
	pub nodes: Vec<NodeElement>,
	pub label_offset: f64,
	pub font_size: f64,
}

/// Resolved attribute values for one drawn frame.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SceneFrame {
	pub width: f64,
	pub height: f64,
	pub view_box: String,
	pub edges: Vec<EdgeFrame>,
	pub nodes: Vec<NodeFrame>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct EdgeFrame {
	pub x1: f64,
	pub y1: f64,
	pub x2: f64,
	pub y2: f64,
	pub opacity: f64,
	pub stroke: String,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct NodeFrame {
	pub transform: String,
	pub opacity: f64,
	pub radius: f64,
	pub stroke: String,
	pub stroke_width: f64,
	pub label_dy: f64,
}

impl Scene {
	pub fn new(
		model: &GraphModel,
		links: &[(usize, usize)],
		config: &ChartConfig,
		width: f64,
		height: f64,
	) -> Self {
		let base_stroke = Color::parse_or_white(EDGE_STROKE);
		let edges = links
			.iter()
			.map(|&(source, target)| EdgeElement {
				source,
				target,
				x1: 0.0,
				y1: 0.0,
				x2: 0.0,
				y2: 0.0,
				opacity: Tween::fixed(1.0),
				stroke: Tween::fixed(base_stroke),
				base_stroke,
			})
			.collect();

		let node_stroke = Color::parse_or_white(NODE_STROKE);
		let nodes = model
			.nodes
			.iter()
			.map(|node| NodeElement {
				title: node.title.clone(),
				fill: node.color.clone(),
				radius: node.radius,
				size: node.radius,
				x: 0.0,
				y: 0.0,
				opacity: Tween::fixed(1.0),
				stroke: Tween::fixed(node_stroke),
				stroke_width: Tween::fixed(NODE_STROKE_WIDTH),
			})
			.collect();

		Self {
			surface: Surface { width, height },
			edges,
			nodes,
			label_offset: config.label_offset,
			font_size: config.label_font_size,
		}
	}

	pub fn is_animating(&self, now: f64) -> bool {
		self.edges
			.iter()
			.any(|e| !e.opacity.is_settled(now) || !e.stroke.is_settled(now))
			|| self.nodes.iter().any(|n| {
				!n.opacity.is_settled(now)
					|| !n.stroke.is_settled(now)
					|| !n.stroke_width.is_settled(now)
			})
	}

	pub fn frame(&self, now: f64) -> SceneFrame {
		SceneFrame {
			width: self.surface.width,
			height: self.surface.height,
			view_box: self.surface.view_box(),
			edges: self
				.edges
				.iter()
				.map(|e| EdgeFrame {
					x1: e.x1,
					y1: e.y1,
					x2: e.x2,
					y2: e.y2,
					opacity: e.opacity.value_at(now),
					stroke: e.stroke.value_at(now).to_string(),
				})
				.collect(),
			nodes: self
				.nodes
				.iter()
				.map(|n| NodeFrame {
					transform: format!("translate({},{})", n.x, n.y),
					opacity: n.opacity.value_at(now),
					radius: n.radius,
					stroke: n.stroke.value_at(now).to_string(),
					stroke_width: n.stroke_width.value_at(now),
					label_dy: n.size + self.label_offset,
				})
				.collect(),
		}
	}
}
