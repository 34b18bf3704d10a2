use std::f64::consts::PI;

use force_graph::{EdgeData, ForceGraph, NodeData, SimulationParameters};

use super::config::ChartConfig;
use super::model::GraphModel;

/// Radius of the ring nodes start on, around the viewport center.
const START_RING: f64 = 100.0;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Point {
	pub x: f64,
	pub y: f64,
}

/// Drives `force_graph` (charge, springs, integration, anchors) and adds the
/// terms it lacks: link rest length, x/y centering, collision and an
/// alpha-style energy that cools to a stop.
pub struct Layout {
	graph: ForceGraph<usize, ()>,
	positions: Vec<Point>,
	fixed: Vec<Option<Point>>,
	links: Vec<(usize, usize)>,
	link_bias: Vec<f64>,
	collide_radii: Vec<f64>,
	center: Point,
	alpha: f64,
	alpha_target: f64,
	running: bool,
	config: ChartConfig,
}

impl Layout {
	pub fn new(
		model: &GraphModel,
		links: &[(usize, usize)],
		config: &ChartConfig,
		width: f64,
		height: f64,
	) -> Self {
		let mut graph = ForceGraph::new(SimulationParameters {
			force_charge: config.charge_strength as f32,
			force_spring: config.spring_strength as f32,
			force_max: config.force_max as f32,
			node_speed: config.node_speed as f32,
			damping_factor: config.damping as f32,
		});
		let center = Point {
			x: width / 2.0,
			y: height / 2.0,
		};

		let count = model.nodes.len();
		let mut positions = Vec::with_capacity(count);
		let mut indices = Vec::with_capacity(count);
		for i in 0..count {
			let angle = i as f64 * 2.0 * PI / count as f64;
			let at = Point {
				x: center.x + START_RING * angle.cos(),
				y: center.y + START_RING * angle.sin(),
			};
			indices.push(graph.add_node(NodeData {
				x: at.x as f32,
				y: at.y as f32,
				mass: config.node_mass as f32,
				is_anchor: false,
				user_data: i,
			}));
			positions.push(at);
		}
		for &(src, tgt) in links {
			graph.add_edge(indices[src], indices[tgt], EdgeData::default());
		}

		let collide_radii = model
			.nodes
			.iter()
			.map(|n| n.radius + config.collide_margin)
			.collect();

		Self {
			graph,
			positions,
			fixed: vec![None; count],
			links: links.to_vec(),
			link_bias: link_bias(links, count),
			collide_radii,
			center,
			alpha: 1.0,
			alpha_target: 0.0,
			running: true,
			config: config.clone(),
		}
	}

	pub fn positions(&self) -> &[Point] {
		&self.positions
	}

	pub fn position(&self, idx: usize) -> Option<Point> {
		self.positions.get(idx).copied()
	}

	#[cfg(test)]
	pub fn fixed(&self, idx: usize) -> Option<Point> {
		self.fixed.get(idx).copied().flatten()
	}

	#[cfg(test)]
	pub fn collide_radii(&self) -> &[f64] {
		&self.collide_radii
	}

	#[cfg(test)]
	pub fn is_running(&self) -> bool {
		self.running
	}

	pub fn alpha(&self) -> f64 {
		self.alpha
	}

	pub fn alpha_target(&self) -> f64 {
		self.alpha_target
	}

	/// One engine step; false when the engine is idle.
	pub fn step(&mut self) -> bool {
		if !self.running {
			return false;
		}
		self.tick();
		if self.alpha < self.config.alpha_min {
			self.running = false;
		}
		true
	}

	fn tick(&mut self) {
		self.alpha += (self.alpha_target - self.alpha) * self.config.alpha_decay;

		self.graph.update((self.config.time_step * self.alpha) as f32);
		let positions = &mut self.positions;
		self.graph.visit_nodes(|node| {
			positions[node.data.user_data] = Point {
				x: node.x() as f64,
				y: node.y() as f64,
			};
		});

		let alpha = self.alpha;
		for _ in 0..self.config.link_iterations {
			link_pass(
				&mut self.positions,
				&self.fixed,
				&self.links,
				&self.link_bias,
				self.config.link_distance,
				self.config.link_strength * alpha,
			);
		}
		center_pass(
			&mut self.positions,
			&self.fixed,
			self.center,
			self.config.center_strength * alpha,
		);
		collide_pass(
			&mut self.positions,
			&self.fixed,
			&self.collide_radii,
			self.config.collide_strength,
		);

		for (at, fixed) in self.positions.iter_mut().zip(&self.fixed) {
			if let Some(p) = fixed {
				*at = *p;
			}
		}
		self.write_back();
	}

	/// Rewrites every position through `f` and hands the result to the engine.
	pub fn constrain(&mut self, f: impl Fn(Point) -> Point) {
		for at in &mut self.positions {
			*at = f(*at);
		}
		self.write_back();
	}

	fn write_back(&mut self) {
		let (positions, fixed) = (&self.positions, &self.fixed);
		self.graph.visit_nodes_mut(|node| {
			let i = node.data.user_data;
			node.data.x = positions[i].x as f32;
			node.data.y = positions[i].y as f32;
			node.data.is_anchor = fixed[i].is_some();
		});
	}

	/// Re-centers on the new viewport and lets the layout re-settle.
	pub fn resize(&mut self, width: f64, height: f64) {
		self.center = Point {
			x: width / 2.0,
			y: height / 2.0,
		};
		self.reheat();
	}

	pub fn reheat(&mut self) {
		self.alpha = self.config.reheat_alpha;
		self.running = true;
	}

	pub fn drag_heat(&mut self) {
		self.alpha_target = self.config.drag_alpha_target;
		self.running = true;
	}

	pub fn drag_cool(&mut self) {
		self.alpha_target = 0.0;
	}

	/// Hands the unchanged node set back to the engine: link weights are
	/// recomputed, collision keeps the construction-time sizes.
	pub fn renotify(&mut self) {
		self.link_bias = link_bias(&self.links, self.positions.len());
		self.write_back();
	}

	pub fn pin(&mut self, idx: usize, at: Point) {
		if let Some(fixed) = self.fixed.get_mut(idx) {
			*fixed = Some(at);
			self.positions[idx] = at;
			self.write_back();
		}
	}

	pub fn unpin(&mut self, idx: usize) {
		if let Some(fixed) = self.fixed.get_mut(idx) {
			*fixed = None;
			self.write_back();
		}
	}
}

/// Share of each link's correction its target absorbs; high-degree nodes
/// move less.
fn link_bias(links: &[(usize, usize)], count: usize) -> Vec<f64> {
	let mut degree = vec![0usize; count];
	for &(src, tgt) in links {
		degree[src] += 1;
		degree[tgt] += 1;
	}
	links
		.iter()
		.map(|&(src, tgt)| degree[src] as f64 / (degree[src] + degree[tgt]) as f64)
		.collect()
}

/// Tiny offset separating coincident points, stable per pair.
fn nudge(i: usize, j: usize) -> (f64, f64) {
	let angle = (i * 31 + j) as f64;
	(angle.cos() * 1e-6, angle.sin() * 1e-6)
}

/// Moves linked nodes toward `distance` apart.
fn link_pass(
	positions: &mut [Point],
	fixed: &[Option<Point>],
	links: &[(usize, usize)],
	bias: &[f64],
	distance: f64,
	strength: f64,
) {
	for (&(src, tgt), &bias) in links.iter().zip(bias) {
		let (s, t) = (positions[src], positions[tgt]);
		let (mut dx, mut dy) = (t.x - s.x, t.y - s.y);
		if dx == 0.0 && dy == 0.0 {
			(dx, dy) = nudge(src, tgt);
		}
		let l = (dx * dx + dy * dy).sqrt();
		let k = (l - distance) / l * strength;
		let (dx, dy) = (dx * k, dy * k);

		if fixed[tgt].is_none() {
			positions[tgt].x -= dx * bias;
			positions[tgt].y -= dy * bias;
		}
		if fixed[src].is_none() {
			positions[src].x += dx * (1.0 - bias);
			positions[src].y += dy * (1.0 - bias);
		}
	}
}

/// Pulls every free node toward `center` on both axes.
fn center_pass(positions: &mut [Point], fixed: &[Option<Point>], center: Point, strength: f64) {
	for (at, fixed) in positions.iter_mut().zip(fixed) {
		if fixed.is_none() {
			at.x += (center.x - at.x) * strength;
			at.y += (center.y - at.y) * strength;
		}
	}
}

/// Pushes overlapping circles apart, smaller circles giving way. Not scaled
/// by alpha.
fn collide_pass(positions: &mut [Point], fixed: &[Option<Point>], radii: &[f64], strength: f64) {
	let n = positions.len().min(radii.len());
	for i in 0..n {
		for j in i + 1..n {
			let (ri, rj) = (radii[i], radii[j]);
			let r = ri + rj;
			let (mut dx, mut dy) = (positions[i].x - positions[j].x, positions[i].y - positions[j].y);
			if dx * dx + dy * dy >= r * r {
				continue;
			}
			if dx == 0.0 && dy == 0.0 {
				(dx, dy) = nudge(i, j);
			}
			let dist = (dx * dx + dy * dy).sqrt();
			let k = (r - dist) / dist * strength;
			let (dx, dy) = (dx * k, dy * k);
			let (ri2, rj2) = (ri * ri, rj * rj);
			let mut share = rj2 / (ri2 + rj2);
			match (fixed[i].is_some(), fixed[j].is_some()) {
				(true, true) => continue,
				(true, false) => share = 0.0,
				(false, true) => share = 1.0,
				(false, false) => {}
			}

			positions[i].x += dx * share;
			positions[i].y += dy * share;
			positions[j].x -= dx * (1.0 - share);
			positions[j].y -= dy * (1.0 - share);
		}
	}
}
