use std::collections::HashMap;

use log::debug;

use super::config::ChartConfig;
use super::layout::{Layout, Point};
use super::model::{GraphModel, NodeKind, member_radius};
use super::scene::{
	FADED_EDGE_STROKE, HOVER_STROKE, HOVER_STROKE_WIDTH, NODE_STROKE, NODE_STROKE_WIDTH, Scene,
};
use super::transition::Color;

/// An in-progress drag, keyed by pointer id.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DragGesture {
	pub node: usize,
	/// Node position minus pointer position at drag start.
	pub offset_x: f64,
	pub offset_y: f64,
}

/// Everything one chart session mutates: viewport, engine, drawn elements
/// and interaction state.
pub struct ChartState {
	pub config: ChartConfig,
	pub model: GraphModel,
	pub links: Vec<(usize, usize)>,
	pub layout: Layout,
	pub scene: Scene,
	pub width: f64,
	pub height: f64,
	pub level_sized: bool,
	drags: HashMap<i32, DragGesture>,
	hovered: Option<usize>,
	dirty: bool,
	was_animating: bool,
}

/// Drawing size for a window of the given inner size.
pub fn drawing_size(inner_width: f64, inner_height: f64, config: &ChartConfig) -> (f64, f64) {
	(inner_width, (inner_height - config.chrome_offset).max(0.0))
}

/// Clamps into `[min, max]`; when the range is empty the lower bound wins.
fn clamp_lower_wins(v: f64, min: f64, max: f64) -> f64 {
	min.max(max.min(v))
}

impl ChartState {
	pub fn new(model: GraphModel, config: ChartConfig, width: f64, height: f64) -> Self {
		let links = model.resolve_links();
		let layout = Layout::new(&model, &links, &config, width, height);
		let scene = Scene::new(&model, &links, &config, width, height);
		let mut state = Self {
			config,
			model,
			links,
			layout,
			scene,
			width,
			height,
			level_sized: true,
			drags: HashMap::new(),
			hovered: None,
			dirty: true,
			was_animating: false,
		};
		state.ticked();
		state
	}

	pub fn drag_start(&mut self, pointer: i32, node: usize, x: f64, y: f64) {
		let Some(at) = self.layout.position(node) else {
			return;
		};
		if self.drags.keys().all(|&p| p == pointer) {
			self.layout.drag_heat();
			debug!("drag start, alpha target {}", self.layout.alpha_target());
		}
		self.layout.pin(node, at);
		self.drags.insert(
			pointer,
			DragGesture {
				node,
				offset_x: at.x - x,
				offset_y: at.y - y,
			},
		);
	}

	/// Returns false when `pointer` is not dragging anything.
	pub fn drag_move(&mut self, pointer: i32, x: f64, y: f64) -> bool {
		let Some(gesture) = self.drags.get(&pointer).copied() else {
			return false;
		};
		self.layout.pin(
			gesture.node,
			Point {
				x: x + gesture.offset_x,
				y: y + gesture.offset_y,
			},
		);
		true
	}

	pub fn drag_end(&mut self, pointer: i32) {
		let Some(gesture) = self.drags.remove(&pointer) else {
			return;
		};
		if self.drags.is_empty() {
			self.layout.drag_cool();
		}
		if !self.drags.values().any(|g| g.node == gesture.node) {
			self.layout.unpin(gesture.node);
		}
	}

	/// Fades everything not directly connected to `node`.
	pub fn hover_enter(&mut self, node: usize, now: f64) {
		if node >= self.scene.nodes.len() {
			return;
		}
		let connected = GraphModel::neighbors(&self.links, node);
		let (duration, fade) = (self.config.transition_ms, self.config.fade_opacity);

		for (idx, element) in self.scene.nodes.iter_mut().enumerate() {
			if !connected.contains(&idx) {
				element.opacity.animate_to(fade, now, duration);
			}
		}

		let faded = Color::parse_or_white(FADED_EDGE_STROKE);
		for edge in &mut self.scene.edges {
			if edge.source != node && edge.target != node {
				edge.opacity.animate_to(fade, now, duration);
				edge.stroke.animate_to(faded, now, duration);
			}
		}

		let element = &mut self.scene.nodes[node];
		element
			.stroke
			.animate_to(Color::parse_or_white(HOVER_STROKE), now, duration);
		element
			.stroke_width
			.animate_to(HOVER_STROKE_WIDTH, now, duration);

		self.hovered = Some(node);
	}

	/// Restores every element to its resting style.
	pub fn hover_leave(&mut self, now: f64) {
		let duration = self.config.transition_ms;

		for element in &mut self.scene.nodes {
			element.opacity.animate_to(1.0, now, duration);
		}
		for edge in &mut self.scene.edges {
			edge.opacity.animate_to(1.0, now, duration);
			edge.stroke.animate_to(edge.base_stroke, now, duration);
		}

		if let Some(element) = self.hovered.take().and_then(|i| self.scene.nodes.get_mut(i)) {
			element
				.stroke
				.animate_to(Color::parse_or_white(NODE_STROKE), now, duration);
			element
				.stroke_width
				.animate_to(NODE_STROKE_WIDTH, now, duration);
		}
	}

	/// Takes the window's inner size; the navbar's share is subtracted here.
	pub fn resize(&mut self, inner_width: f64, inner_height: f64) {
		let (width, height) = drawing_size(inner_width, inner_height, &self.config);
		debug!("resize to {width}x{height}");
		self.width = width;
		self.height = height;
		self.scene.surface.width = width;
		self.scene.surface.height = height;
		self.layout.resize(width, height);
		self.dirty = true;
	}

	/// Draws members sized by level, or all at the fixed radius. Only the
	/// circles change; collision and labels keep the node's size.
	pub fn set_level_sized(&mut self, level_sized: bool) {
		debug!("level sizing {}", if level_sized { "on" } else { "off" });
		self.level_sized = level_sized;
		for (node, element) in self.model.nodes.iter().zip(&mut self.scene.nodes) {
			if node.kind != NodeKind::Member {
				continue;
			}
			element.radius = if level_sized {
				member_radius(node.level)
			} else {
				self.config.member_fixed_radius
			};
		}
		self.layout.renotify();
		self.layout.reheat();
		debug!("reflowing from alpha {}", self.layout.alpha());
		self.dirty = true;
	}

	/// Per-step update: clamps positions into the padded viewport (writing
	/// them back to the engine) and moves the drawn elements.
	pub fn ticked(&mut self) {
		let padding = self.config.padding;
		let (max_x, max_y) = (self.width - padding, self.height - padding);

		self.layout.constrain(|p| Point {
			x: clamp_lower_wins(p.x, padding, max_x),
			y: clamp_lower_wins(p.y, padding, max_y),
		});

		let nodes = self.layout.positions();
		for (node, element) in nodes.iter().zip(&mut self.scene.nodes) {
			element.x = node.x;
			element.y = node.y;
		}
		for edge in &mut self.scene.edges {
			let (source, target) = (&nodes[edge.source], &nodes[edge.target]);
			edge.x1 = source.x;
			edge.y1 = source.y;
			edge.x2 = target.x;
			edge.y2 = target.y;
		}
	}

	/// Advances one animation frame. Returns whether anything visible changed.
	pub fn frame(&mut self, now: f64) -> bool {
		let stepped = self.layout.step();
		if stepped {
			self.ticked();
		}
		let animating = self.scene.is_animating(now);
		let redraw = stepped || animating || self.was_animating || self.dirty;
		self.was_animating = animating;
		self.dirty = false;
		redraw
	}
}

#[cfg(test)]
mod tests {
	use pretty_assertions::assert_eq;

	use super::*;
	use crate::components::force_graph::scene::EDGE_STROKE;
	use crate::components::force_graph::types::ChartData;

	const W: f64 = 800.0;
	const H: f64 = 600.0;

	/// Groups 0..2, members 2..5. Member 2 -> G0, member 3 -> G0 + G1,
	/// member 4 -> G1.
	fn state() -> ChartState {
		let data = ChartData::from_json_parts(
			r#"{"1": {"name": "G1", "memberCount": 2}, "2": {"name": "G2", "memberCount": 2}}"#,
			r#"{
				"1": {"name": "M1", "level": 5, "groups": [1]},
				"2": {"name": "M2", "groups": [1, 2]},
				"3": {"name": "M3", "level": 40, "groups": [2]}
			}"#,
		)
		.unwrap();
		let config = ChartConfig::default();
		ChartState::new(GraphModel::build(&data, &config), config, W, H)
	}

	fn settle(state: &mut ChartState) {
		let mut frames = 0;
		while state.layout.is_running() {
			state.frame(frames as f64 * 16.0);
			frames += 1;
			assert!(frames < 10_000);
		}
	}

	fn assert_in_bounds(state: &ChartState) {
		let p = state.config.padding;
		for node in state.layout.positions() {
			assert!(node.x >= p && node.x <= state.width - p, "x = {}", node.x);
			assert!(node.y >= p && node.y <= state.height - p, "y = {}", node.y);
		}
	}

	#[test]
	fn positions_stay_in_padded_viewport_every_step() {
		let mut state = state();
		for i in 0..200 {
			state.frame(i as f64 * 16.0);
			assert_in_bounds(&state);
		}
	}

	#[test]
	fn clamp_persists_in_engine_positions() {
		let mut state = state();
		state.layout.pin(
			0,
			Point {
				x: -1_000.0,
				y: 5_000.0,
			},
		);
		state.layout.unpin(0);
		state.ticked();
		assert_eq!(
			state.layout.position(0),
			Some(Point {
				x: 20.0,
				y: H - 20.0
			})
		);
		assert_eq!((state.scene.nodes[0].x, state.scene.nodes[0].y), (20.0, H - 20.0));
		assert_eq!(
			state.scene.frame(0.0).nodes[0].transform,
			format!("translate(20,{})", H - 20.0)
		);
	}

	#[test]
	fn tiny_viewport_clamps_to_lower_bound() {
		assert_eq!(clamp_lower_wins(50.0, 20.0, -10.0), 20.0);
		assert_eq!(clamp_lower_wins(-5.0, 20.0, 780.0), 20.0);
		assert_eq!(clamp_lower_wins(900.0, 20.0, 780.0), 780.0);
	}

	#[test]
	fn edges_follow_their_endpoints() {
		let mut state = state();
		state.frame(0.0);
		let nodes = state.layout.positions();
		for edge in &state.scene.edges {
			assert_eq!((edge.x1, edge.y1), (nodes[edge.source].x, nodes[edge.source].y));
			assert_eq!((edge.x2, edge.y2), (nodes[edge.target].x, nodes[edge.target].y));
		}
	}

	#[test]
	fn drag_pins_then_releases() {
		let mut state = state();
		settle(&mut state);
		let at = state.layout.position(2).unwrap();

		state.drag_start(1, 2, at.x + 3.0, at.y - 4.0);
		assert!(state.layout.is_running());
		assert_eq!(state.layout.alpha_target(), 0.2);
		assert_eq!(state.layout.fixed(2), Some(at));

		assert!(state.drag_move(1, 300.0, 200.0));
		let pinned = Point {
			x: 297.0,
			y: 204.0,
		};
		assert_eq!(state.layout.fixed(2), Some(pinned));
		state.frame(0.0);
		assert_eq!(state.layout.position(2), Some(pinned));

		state.drag_end(1);
		assert_eq!(state.layout.fixed(2), None);
		assert_eq!(state.layout.alpha_target(), 0.0);
		assert_eq!(state.drags.len(), 0);
	}

	#[test]
	fn energy_only_changes_for_the_first_and_last_gesture() {
		let mut state = state();
		settle(&mut state);
		state.drag_start(1, 2, 0.0, 0.0);
		state.drag_start(2, 4, 0.0, 0.0);
		assert_eq!(state.drags.len(), 2);

		state.drag_end(1);
		assert_eq!(state.layout.alpha_target(), 0.2);
		assert_eq!(state.layout.fixed(2), None);
		assert!(state.layout.fixed(4).is_some());

		state.drag_end(2);
		assert_eq!(state.layout.alpha_target(), 0.0);
	}

	#[test]
	fn unknown_pointer_moves_are_ignored() {
		let mut state = state();
		assert!(!state.drag_move(9, 1.0, 1.0));
		state.drag_end(9);
		assert!((0..5).all(|i| state.layout.fixed(i).is_none()));
	}

	#[test]
	fn hover_fades_unconnected_elements() {
		let mut state = state();
		// G1 (index 0) connects to members 2 and 3.
		state.hover_enter(0, 1_000.0);
		assert_eq!(state.hovered, Some(0));
		let frame = state.scene.frame(1_200.0);

		let opacities: Vec<f64> = frame.nodes.iter().map(|n| n.opacity).collect();
		assert_eq!(opacities, vec![1.0, 0.2, 1.0, 1.0, 0.2]);

		// Edges: 2->0, 3->0, 3->1, 4->1
		let edge_opacities: Vec<f64> = frame.edges.iter().map(|e| e.opacity).collect();
		assert_eq!(edge_opacities, vec![1.0, 1.0, 0.2, 0.2]);
		assert_eq!(frame.edges[2].stroke, "rgb(204, 204, 204)");
		assert_eq!(frame.edges[0].stroke, "rgba(194, 194, 194, 0.502)");

		assert_eq!(frame.nodes[0].stroke, "rgb(136, 136, 136)");
		assert_eq!(frame.nodes[0].stroke_width, 3.0);
		assert_eq!(frame.nodes[2].stroke_width, 1.5);
	}

	#[test]
	fn hover_is_animated() {
		let mut state = state();
		state.hover_enter(0, 1_000.0);
		let midway = state.scene.frame(1_100.0).nodes[1].opacity;
		assert!(midway > 0.2 && midway < 1.0);
		assert!(state.frame(1_100.0));
	}

	#[test]
	fn leave_restores_everything() {
		let mut state = state();
		let resting = state.scene.frame(0.0);
		state.hover_enter(3, 1_000.0);
		state.hover_leave(1_100.0);
		assert_eq!(state.hovered, None);

		let frame = state.scene.frame(1_300.0);
		assert!(frame.nodes.iter().all(|n| n.opacity == 1.0));
		assert!(frame.edges.iter().all(|e| e.opacity == 1.0));
		let original = Color::parse_or_white(EDGE_STROKE).to_string();
		assert!(frame.edges.iter().all(|e| e.stroke == original));
		for (now, before) in frame.nodes.iter().zip(&resting.nodes) {
			assert_eq!((&now.stroke, now.stroke_width), (&before.stroke, before.stroke_width));
		}
	}

	#[test]
	fn resize_reserves_chrome_offset() {
		let mut state = state();
		settle(&mut state);
		state.resize(1024.0, 768.0);
		assert_eq!((state.width, state.height), (1024.0, 708.0));
		let frame = state.scene.frame(0.0);
		assert_eq!((frame.width, frame.height), (1024.0, 708.0));
		assert_eq!(frame.view_box, "0 0 1024 708");
		assert!(state.layout.is_running());
		assert_eq!(state.layout.alpha(), 0.3);

		settle(&mut state);
		assert_in_bounds(&state);
	}

	#[test]
	fn resize_never_yields_negative_height() {
		let mut state = state();
		state.resize(300.0, 40.0);
		assert_eq!(state.height, 0.0);
		state.frame(0.0);
		for node in state.layout.positions() {
			assert_eq!(node.y, 20.0);
		}
	}

	#[test]
	fn level_sizing_toggle_round_trips() {
		let mut state = state();
		let level_radii: Vec<f64> = state.scene.nodes.iter().map(|n| n.radius).collect();
		assert_eq!(level_radii, vec![11.0, 11.0, 1.5, 1.1, 5.0]);

		let collide = state.layout.collide_radii().to_vec();
		let label_dy = |state: &ChartState| -> Vec<f64> {
			state.scene.frame(0.0).nodes.iter().map(|n| n.label_dy).collect()
		};
		let labels = label_dy(&state);
		assert_eq!(labels, vec![26.0, 26.0, 16.5, 16.1, 20.0]);

		state.set_level_sized(false);
		let fixed: Vec<f64> = state.scene.nodes.iter().map(|n| n.radius).collect();
		assert_eq!(fixed, vec![11.0, 11.0, 5.0, 5.0, 5.0]);
		assert_eq!(state.layout.alpha(), 0.3);
		// Member sizes stay put: collision still sees 1.5 + 5, not 5 + 5.
		assert_eq!(state.layout.collide_radii(), collide.as_slice());
		assert_eq!(state.layout.collide_radii()[2], 6.5);
		assert_eq!(label_dy(&state), labels);

		state.set_level_sized(true);
		let restored: Vec<f64> = state.scene.nodes.iter().map(|n| n.radius).collect();
		assert_eq!(restored, level_radii);
		let model_radii: Vec<f64> = state.model.nodes.iter().map(|n| n.radius).collect();
		assert_eq!(model_radii, level_radii);
	}

	#[test]
	fn idle_frames_do_not_redraw() {
		let mut state = state();
		settle(&mut state);
		state.frame(100_000.0);
		assert!(!state.frame(100_016.0));
		state.set_level_sized(false);
		assert!(state.frame(100_032.0));
	}
}
