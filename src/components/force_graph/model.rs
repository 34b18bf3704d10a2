use std::collections::{HashMap, HashSet};

use log::warn;

use super::config::ChartConfig;
use super::types::ChartData;

/// Radii never drop below this, whatever the input says.
const MIN_RADIUS: f64 = 0.5;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NodeKind {
	Group,
	Member,
}

#[derive(Clone, Debug, PartialEq)]
pub struct GraphNode {
	pub id: String,
	pub title: String,
	pub color: String,
	pub kind: NodeKind,
	/// Member level as supplied; `None` for groups.
	pub level: Option<f64>,
	pub radius: f64,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GraphEdge {
	pub source: String,
	pub target: String,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct GraphModel {
	pub nodes: Vec<GraphNode>,
	pub edges: Vec<GraphEdge>,
}

pub fn group_radius(size_override: Option<f64>, member_count: f64) -> f64 {
	let size = size_override.filter(|&s| s != 0.0 && !s.is_nan()).unwrap_or(member_count);
	(size / 2.0 + 10.0).max(MIN_RADIUS)
}

pub fn member_radius(level: Option<f64>) -> f64 {
	let level = level.filter(|&l| l != 0.0 && !l.is_nan()).unwrap_or(1.0);
	(level / 10.0 + 1.0).max(MIN_RADIUS)
}

impl GraphModel {
	/// Builds one node per group, then one node per member plus one edge
	/// per membership. Input is not validated.
	pub fn build(data: &ChartData, config: &ChartConfig) -> Self {
		let mut nodes = Vec::with_capacity(data.groups.len() + data.members.len());
		let mut edges = Vec::new();

		for (id, group) in &data.groups {
			nodes.push(GraphNode {
				id: format!("group_{id}"),
				title: group.name.clone(),
				color: config.group_color.clone(),
				kind: NodeKind::Group,
				level: None,
				radius: group_radius(group.size_override, group.member_count),
			});
		}

		for (id, member) in &data.members {
			let member_id = format!("member_{id}");
			for group_id in &member.groups {
				edges.push(GraphEdge {
					source: member_id.clone(),
					target: format!("group_{group_id}"),
				});
			}
			nodes.push(GraphNode {
				id: member_id,
				title: member.name.clone(),
				color: config.member_color.clone(),
				kind: NodeKind::Member,
				level: member.level,
				radius: member_radius(member.level),
			});
		}

		Self { nodes, edges }
	}

	/// Maps edge ids to node indices. Edges naming an unknown node are dropped.
	pub fn resolve_links(&self) -> Vec<(usize, usize)> {
		let id_to_idx: HashMap<&str, usize> = self
			.nodes
			.iter()
			.enumerate()
			.map(|(i, node)| (node.id.as_str(), i))
			.collect();

		self.edges
			.iter()
			.filter_map(|edge| {
				match (
					id_to_idx.get(edge.source.as_str()),
					id_to_idx.get(edge.target.as_str()),
				) {
					(Some(&src), Some(&tgt)) => Some((src, tgt)),
					_ => {
						warn!("dropping edge {} -> {}: node not found", edge.source, edge.target);
						None
					}
				}
			})
			.collect()
	}

	/// The node itself and every node sharing an edge with it.
	pub fn neighbors(links: &[(usize, usize)], idx: usize) -> HashSet<usize> {
		let mut connected = HashSet::from([idx]);
		for &(src, tgt) in links {
			if src == idx {
				connected.insert(tgt);
			} else if tgt == idx {
				connected.insert(src);
			}
		}
		connected
	}
}
