use std::collections::{HashMap, HashSet};
use std::f64::consts::PI;

use force_graph::{DefaultNodeIdx, EdgeData, ForceGraph, NodeData, SimulationParameters};
use log::warn;

use super::scale::{Bounds, fit_transform};
use super::types::RenderGraph;

pub const NODE_RADIUS: f64 = 6.0;
pub const TOPIC_RADIUS: f64 = 10.0;
pub const SELECTED_SCALE: f64 = 1.4;
/// Extra world-space slack around a node's radius that still counts as a hit.
pub const HIT_SLACK: f64 = 6.0;
/// Screen pixels a press may travel before it becomes a drag instead of a click.
pub const CLICK_TOLERANCE: f64 = 4.0;
pub const FIT_PADDING: f64 = 48.0;

const RING_RADIUS: f64 = 120.0;

#[derive(Clone, Debug, Default)]
pub struct NodeInfo {
	pub id: String,
	pub name: String,
	pub is_topic: bool,
}

#[derive(Clone, Debug, Default)]
pub struct LinkInfo {
	pub relation: Option<String>,
}

#[derive(Clone, Debug, Default)]
pub struct ViewTransform {
	pub x: f64,
	pub y: f64,
	pub k: f64,
}

#[derive(Clone, Debug, Default)]
pub struct DragState {
	pub active: bool,
	pub moved: bool,
	pub node_idx: Option<DefaultNodeIdx>,
	pub start_x: f64,
	pub start_y: f64,
	pub node_start_x: f32,
	pub node_start_y: f32,
}

#[derive(Clone, Debug, Default)]
pub struct PanState {
	pub active: bool,
	pub moved: bool,
	pub start_x: f64,
	pub start_y: f64,
	pub transform_start_x: f64,
	pub transform_start_y: f64,
}

#[derive(Clone, Debug, Default)]
pub struct HoverState {
	pub node: Option<DefaultNodeIdx>,
	pub neighbors: HashSet<DefaultNodeIdx>,
	pub highlight_t: f64,
	pub prev_node: Option<DefaultNodeIdx>,
	pub prev_neighbors: HashSet<DefaultNodeIdx>,
	delay_t: f64,
}

/// What a finished press on the canvas amounted to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PointerRelease {
	/// Press and release on a node without moving.
	NodeClick(String),
	/// Press and release on empty canvas without moving.
	BackgroundClick,
	/// The press dragged a node or panned the view.
	Drag,
}

pub struct ForceGraphState {
	pub graph: ForceGraph<NodeInfo, LinkInfo>,
	pub transform: ViewTransform,
	pub drag: DragState,
	pub pan: PanState,
	pub hover: HoverState,
	pub selected: Option<DefaultNodeIdx>,
	pub width: f64,
	pub height: f64,
	pub animation_running: bool,
	pub flow_time: f64,
	id_to_idx: HashMap<String, DefaultNodeIdx>,
	edges: Vec<(DefaultNodeIdx, DefaultNodeIdx)>,
}

impl ForceGraphState {
	pub fn new(data: &RenderGraph, width: f64, height: f64) -> Self {
		let mut graph = ForceGraph::new(SimulationParameters {
			force_charge: 400.0,
			force_spring: 0.05,
			force_max: 100.0,
			node_speed: 3000.0,
			damping_factor: 0.9,
		});
		let mut id_to_idx = HashMap::new();
		let mut edges = Vec::new();
		let topic = data.topic_index();
		let ring = data.nodes.len().saturating_sub(1).max(1);

		let mut slot = 0;
		for (i, node) in data.nodes.iter().enumerate() {
			let is_topic = Some(i) == topic;
			let (x, y) = if is_topic {
				(0.0, 0.0)
			} else {
				let angle = slot as f64 * 2.0 * PI / ring as f64;
				slot += 1;
				(
					(RING_RADIUS * angle.cos()) as f32,
					(RING_RADIUS * angle.sin()) as f32,
				)
			};

			let idx = graph.add_node(NodeData {
				x,
				y,
				mass: if is_topic { 20.0 } else { 10.0 },
				is_anchor: false,
				user_data: NodeInfo {
					id: node.id.clone(),
					name: node.name.clone(),
					is_topic,
				},
			});
			// later duplicates shadow earlier ones, same as GraphData::node
			id_to_idx.insert(node.id.clone(), idx);
		}

		for link in &data.links {
			if let (Some(&src), Some(&tgt)) =
				(id_to_idx.get(&link.source), id_to_idx.get(&link.target))
			{
				graph.add_edge(
					src,
					tgt,
					EdgeData {
						user_data: LinkInfo {
							relation: link.relation.clone(),
						},
					},
				);
				edges.push((src, tgt));
			} else {
				warn!(
					"dropping link {} -> {}: unknown node id",
					link.source, link.target
				);
			}
		}

		Self {
			graph,
			id_to_idx,
			edges,
			transform: ViewTransform {
				x: width / 2.0,
				y: height / 2.0,
				k: 1.0,
			},
			drag: DragState::default(),
			pan: PanState::default(),
			hover: HoverState::default(),
			selected: None,
			width,
			height,
			animation_running: true,
			flow_time: 0.0,
		}
	}

	pub fn node_count(&self) -> usize {
		let mut count = 0;
		self.graph.visit_nodes(|_| count += 1);
		count
	}

	pub fn edge_count(&self) -> usize {
		self.edges.len()
	}

	pub fn screen_to_graph(&self, sx: f64, sy: f64) -> (f64, f64) {
		(
			(sx - self.transform.x) / self.transform.k,
			(sy - self.transform.y) / self.transform.k,
		)
	}

	/// Drawn radius of a node given its role and the current selection.
	pub fn node_radius(&self, info: &NodeInfo, idx: DefaultNodeIdx) -> f64 {
		let base = if info.is_topic {
			TOPIC_RADIUS
		} else {
			NODE_RADIUS
		};
		if self.selected == Some(idx) {
			base * SELECTED_SCALE
		} else {
			base
		}
	}

	pub fn node_at_position(&self, sx: f64, sy: f64) -> Option<DefaultNodeIdx> {
		let (gx, gy) = self.screen_to_graph(sx, sy);
		let mut found = None;
		self.graph.visit_nodes(|node| {
			let (dx, dy) = (node.x() as f64 - gx, node.y() as f64 - gy);
			let r = self.node_radius(&node.data.user_data, node.index()) + HIT_SLACK;
			if (dx * dx + dy * dy).sqrt() < r {
				found = Some(node.index());
			}
		});
		found
	}

	pub fn node_id(&self, idx: DefaultNodeIdx) -> Option<String> {
		let mut id = None;
		self.graph.visit_nodes(|node| {
			if node.index() == idx {
				id = Some(node.data.user_data.id.clone());
			}
		});
		id
	}

	#[cfg(test)]
	pub fn node_name(&self, idx: DefaultNodeIdx) -> Option<String> {
		let mut name = None;
		self.graph.visit_nodes(|node| {
			if node.index() == idx {
				name = Some(node.data.user_data.name.clone());
			}
		});
		name
	}

	#[cfg(test)]
	pub fn node_position(&self, id: &str) -> Option<(f64, f64)> {
		let idx = *self.id_to_idx.get(id)?;
		let mut pos = None;
		self.graph.visit_nodes(|node| {
			if node.index() == idx {
				pos = Some((node.x() as f64, node.y() as f64));
			}
		});
		pos
	}

	/// Mirror the externally owned selection. Unknown ids select nothing.
	pub fn set_selected_id(&mut self, id: Option<&str>) {
		self.selected = id.and_then(|id| self.id_to_idx.get(id).copied());
	}

	pub fn is_selected(&self, idx: DefaultNodeIdx) -> bool {
		self.selected == Some(idx)
	}

	pub fn press(&mut self, x: f64, y: f64) {
		if let Some(idx) = self.node_at_position(x, y) {
			self.drag = DragState {
				active: true,
				moved: false,
				node_idx: Some(idx),
				start_x: x,
				start_y: y,
				..DragState::default()
			};
			self.graph.visit_nodes(|node| {
				if node.index() == idx {
					self.drag.node_start_x = node.x();
					self.drag.node_start_y = node.y();
				}
			});
		} else {
			self.pan = PanState {
				active: true,
				moved: false,
				start_x: x,
				start_y: y,
				transform_start_x: self.transform.x,
				transform_start_y: self.transform.y,
			};
		}
	}

	pub fn pointer_move(&mut self, x: f64, y: f64) {
		if !self.drag.active {
			let hovered = self.node_at_position(x, y);
			self.set_hover(hovered);
		}

		if self.drag.active {
			let (sdx, sdy) = (x - self.drag.start_x, y - self.drag.start_y);
			if !self.drag.moved && (sdx * sdx + sdy * sdy).sqrt() < CLICK_TOLERANCE {
				return;
			}
			self.drag.moved = true;
			if let Some(idx) = self.drag.node_idx {
				let (nx, ny) = (
					self.drag.node_start_x + (sdx / self.transform.k) as f32,
					self.drag.node_start_y + (sdy / self.transform.k) as f32,
				);
				self.graph.visit_nodes_mut(|node| {
					if node.index() == idx {
						node.data.x = nx;
						node.data.y = ny;
						node.data.is_anchor = true;
					}
				});
			}
		} else if self.pan.active {
			let (sdx, sdy) = (x - self.pan.start_x, y - self.pan.start_y);
			if !self.pan.moved && (sdx * sdx + sdy * sdy).sqrt() < CLICK_TOLERANCE {
				return;
			}
			self.pan.moved = true;
			self.transform.x = self.pan.transform_start_x + sdx;
			self.transform.y = self.pan.transform_start_y + sdy;
		}
	}

	/// End the current press and classify it.
	pub fn release(&mut self) -> PointerRelease {
		let outcome = if self.drag.active {
			match (self.drag.moved, self.drag.node_idx) {
				(false, Some(idx)) => self
					.node_id(idx)
					.map(PointerRelease::NodeClick)
					.unwrap_or(PointerRelease::Drag),
				_ => PointerRelease::Drag,
			}
		} else if self.pan.active && !self.pan.moved {
			PointerRelease::BackgroundClick
		} else {
			PointerRelease::Drag
		};
		self.cancel_pointer();
		outcome
	}

	pub fn cancel_pointer(&mut self) {
		self.drag = DragState::default();
		self.pan = PanState::default();
	}

	pub fn zoom_at(&mut self, x: f64, y: f64, zoom_in: bool) {
		let factor = if zoom_in { 1.1 } else { 0.9 };
		let new_k = super::scale::clamp_zoom(self.transform.k * factor);
		let ratio = new_k / self.transform.k;
		self.transform.x = x - (x - self.transform.x) * ratio;
		self.transform.y = y - (y - self.transform.y) * ratio;
		self.transform.k = new_k;
	}

	/// Scale and centre the view so every node is visible.
	pub fn fit_to_view(&mut self) {
		let mut circles = Vec::with_capacity(self.node_count());
		self.graph.visit_nodes(|node| {
			circles.push((
				node.x() as f64,
				node.y() as f64,
				self.node_radius(&node.data.user_data, node.index()),
			));
		});
		if let Some(bounds) = Bounds::around(circles) {
			self.transform = fit_transform(bounds, self.width, self.height, FIT_PADDING);
		}
	}

	pub fn set_hover(&mut self, node: Option<DefaultNodeIdx>) {
		if self.hover.node == node {
			return;
		}
		let was_hovering = self.hover.node.is_some();

		// keep the old highlight around so it can fade out
		if was_hovering && node.is_none() {
			self.hover.prev_node = self.hover.node.take();
			self.hover.prev_neighbors = std::mem::take(&mut self.hover.neighbors);
		} else {
			self.hover.prev_node = None;
			self.hover.prev_neighbors.clear();
		}

		self.hover.node = node;
		self.hover.neighbors.clear();

		if let Some(idx) = node {
			if !was_hovering {
				self.hover.delay_t = 0.0;
			}
			for &(src, tgt) in &self.edges {
				if src == idx {
					self.hover.neighbors.insert(tgt);
				} else if tgt == idx {
					self.hover.neighbors.insert(src);
				}
			}
		}
	}

	pub fn is_highlighted(&self, idx: DefaultNodeIdx) -> bool {
		self.hover.node == Some(idx)
			|| self.hover.neighbors.contains(&idx)
			|| self.hover.prev_node == Some(idx)
			|| self.hover.prev_neighbors.contains(&idx)
	}

	pub fn is_hovered(&self, idx: DefaultNodeIdx) -> bool {
		self.hover.node == Some(idx) || self.hover.prev_node == Some(idx)
	}

	pub fn has_active_highlight(&self) -> bool {
		self.hover.node.is_some() || self.hover.prev_node.is_some()
	}

	pub fn tick(&mut self, dt: f32) {
		self.graph.update(dt);
		self.flow_time += dt as f64;

		let (target, delay, speed) = if self.hover.node.is_some() {
			(1.0, 0.08, 1.8)
		} else {
			(0.0, 0.0, 1.26)
		};

		if self.hover.node.is_some() {
			self.hover.delay_t = (self.hover.delay_t + dt as f64).min(delay);
			if self.hover.delay_t >= delay {
				self.hover.highlight_t += (target - self.hover.highlight_t) * speed * dt as f64;
			}
		} else {
			self.hover.highlight_t += (target - self.hover.highlight_t) * speed * dt as f64;
			if self.hover.highlight_t < 0.01 {
				self.hover.highlight_t = 0.0;
				self.hover.prev_node = None;
				self.hover.prev_neighbors.clear();
			}
		}
	}

	pub fn resize(&mut self, width: f64, height: f64) {
		// keep the graph centred where it was
		self.transform.x += (width - self.width) / 2.0;
		self.transform.y += (height - self.height) / 2.0;
		self.width = width;
		self.height = height;
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::force_graph::types::{FgLink, FgNode};
	use crate::research::parse_graph;

	fn graph() -> RenderGraph {
		let node = |id: &str| FgNode {
			id: id.into(),
			name: id.to_uppercase(),
			description: None,
		};
		RenderGraph {
			nodes: vec![node("a"), node("topic"), node("b"), node("c")],
			links: vec![
				FgLink {
					source: "topic".into(),
					target: "a".into(),
					relation: Some("includes".into()),
				},
				FgLink {
					source: "topic".into(),
					target: "ghost".into(),
					relation: None,
				},
			],
		}
	}

	fn screen_pos(state: &ForceGraphState, id: &str) -> (f64, f64) {
		let (x, y) = state.node_position(id).unwrap();
		(
			x * state.transform.k + state.transform.x,
			y * state.transform.k + state.transform.y,
		)
	}

	#[test]
	fn topic_sits_at_origin_and_dangling_links_are_dropped() {
		let state = ForceGraphState::new(&graph(), 800.0, 600.0);
		assert_eq!(state.node_count(), 4);
		assert_eq!(state.edge_count(), 1);
		assert_eq!(state.node_position("topic"), Some((0.0, 0.0)));
	}

	#[test]
	fn topic_and_selected_nodes_are_larger() {
		let mut state = ForceGraphState::new(&graph(), 800.0, 600.0);
		let topic = state.id_to_idx["topic"];
		let a = state.id_to_idx["a"];
		let info = |id: &str, is_topic| NodeInfo {
			id: id.into(),
			name: String::new(),
			is_topic,
		};
		assert_eq!(state.node_radius(&info("topic", true), topic), TOPIC_RADIUS);
		assert_eq!(state.node_radius(&info("a", false), a), NODE_RADIUS);
		state.set_selected_id(Some("a"));
		assert_eq!(
			state.node_radius(&info("a", false), a),
			NODE_RADIUS * SELECTED_SCALE
		);
		state.set_selected_id(Some("ghost"));
		assert_eq!(state.selected, None);
	}

	#[test]
	fn click_on_node_selects_it() {
		let mut state = ForceGraphState::new(&graph(), 800.0, 600.0);
		let (x, y) = screen_pos(&state, "a");
		state.press(x, y);
		state.pointer_move(x + 1.0, y);
		assert_eq!(state.release(), PointerRelease::NodeClick("a".into()));
	}

	#[test]
	fn click_on_background_deselects() {
		let mut state = ForceGraphState::new(&graph(), 800.0, 600.0);
		state.press(2.0, 2.0);
		assert_eq!(state.release(), PointerRelease::BackgroundClick);
	}

	#[test]
	fn dragging_is_not_a_click() {
		let mut state = ForceGraphState::new(&graph(), 800.0, 600.0);
		let (x, y) = screen_pos(&state, "b");
		state.press(x, y);
		state.pointer_move(x + 30.0, y + 30.0);
		assert_eq!(state.release(), PointerRelease::Drag);
		let (nx, ny) = screen_pos(&state, "b");
		assert!((nx - (x + 30.0)).abs() < 1e-3);
		assert!((ny - (y + 30.0)).abs() < 1e-3);

		state.press(2.0, 2.0);
		state.pointer_move(60.0, 2.0);
		assert_eq!(state.release(), PointerRelease::Drag);
		assert_eq!(state.transform.x, 400.0 + 58.0);
	}

	#[test]
	fn fit_to_view_keeps_every_node_on_screen() {
		let mut state = ForceGraphState::new(&graph(), 400.0, 300.0);
		let (x, y) = screen_pos(&state, "c");
		state.press(x, y);
		state.pointer_move(x + 900.0, y - 400.0);
		state.release();

		state.fit_to_view();
		assert!(state.transform.k < 1.0);
		for id in ["a", "topic", "b", "c"] {
			let (x, y) = screen_pos(&state, id);
			assert!((0.0..=400.0).contains(&x), "{id} x={x}");
			assert!((0.0..=300.0).contains(&y), "{id} y={y}");
		}
	}

	#[test]
	fn hover_collects_neighbours() {
		let mut state = ForceGraphState::new(&graph(), 800.0, 600.0);
		let topic = state.id_to_idx["topic"];
		let a = state.id_to_idx["a"];
		let c = state.id_to_idx["c"];
		state.set_hover(Some(topic));
		assert!(state.is_highlighted(a));
		assert!(!state.is_highlighted(c));
		state.set_hover(None);
		assert!(state.has_active_highlight());
		assert!(state.is_hovered(topic));
	}

	const REPEATED_IDS: &str = r#"{
		"nodes": [
			{"id": "topic", "label": "Rust"},
			{"id": "topic", "label": "Rust again"},
			{"id": "x", "label": "First"},
			{"id": "x", "label": "Second"}
		],
		"edges": [{"from": "topic", "to": "x"}]
	}"#;

	#[test]
	fn repeated_ids_select_the_same_node_as_the_model() {
		let data = parse_graph(REPEATED_IDS).unwrap();
		let mut state = ForceGraphState::new(&RenderGraph::from(&data), 800.0, 600.0);
		assert_eq!(state.node_count(), 4);

		state.set_selected_id(Some("x"));
		let selected = state.selected.and_then(|idx| state.node_name(idx));
		let expected = data.node("x").map(|n| n.label.clone());
		assert_eq!(selected, expected);
		assert_eq!(selected.as_deref(), Some("Second"));
	}

	#[test]
	fn repeated_topic_id_pins_only_one_node() {
		let data = parse_graph(REPEATED_IDS).unwrap();
		let state = ForceGraphState::new(&RenderGraph::from(&data), 800.0, 600.0);
		let mut topics = Vec::new();
		state.graph.visit_nodes(|node| {
			if node.data.user_data.is_topic {
				topics.push((node.data.user_data.name.clone(), node.x(), node.y()));
			}
		});
		assert_eq!(topics, [("Rust".to_string(), 0.0, 0.0)]);
	}
}
