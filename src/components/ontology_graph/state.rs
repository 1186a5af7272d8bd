//! Simulation-side state for the ontology graph view.
//!
//! The layout engine supplies the spring and charge forces plus anchoring;
//! centering and collision are applied here as per-tick passes, and an
//! alpha/alpha-target energy envelope decides when stepping stops.

use std::collections::{HashMap, HashSet};
use std::f64::consts::PI;

use force_graph::{DefaultNodeIdx, EdgeData, ForceGraph, NodeData, SimulationParameters};
use log::warn;

use crate::model::{GraphNode, GraphSnapshot};

const COLORS: &[&str] = &[
	"#1f77b4", "#ff7f0e", "#2ca02c", "#d62728", "#9467bd", "#8c564b", "#e377c2", "#7f7f7f",
	"#bcbd22", "#17becf",
];

/// Drawn radius of a node circle, in world units.
pub const NODE_RADIUS: f64 = 6.0;
/// Pointer hit-test radius, in world units.
pub const HIT_RADIUS: f64 = 14.0;

/// Minimum separation the collision pass keeps between node centers.
const COLLIDE_SEPARATION: f32 = 52.0;
/// Fraction of the center offset removed per tick.
const CENTER_STRENGTH: f32 = 0.02;
/// Radius of the ring nodes are seeded on around the viewport center.
const SEED_RADIUS: f64 = 140.0;

/// Stepping stops once alpha falls below this with the target at rest.
const ALPHA_MIN: f64 = 0.005;
/// Per-tick interpolation rate of alpha toward its target.
const ALPHA_DECAY: f64 = 0.04;
/// Elevated energy target held while a drag is active.
const DRAG_ALPHA_TARGET: f64 = 0.3;

/// Per-node payload carried inside the engine.
pub struct NodeVisual {
	/// The ontology class this body represents.
	pub node: GraphNode,
	/// Fill color derived from the node kind.
	pub color: &'static str,
}

/// World-space pan/zoom applied when painting and when hit-testing.
#[derive(Clone, Debug)]
pub struct ViewTransform {
	/// Horizontal pan, screen units.
	pub x: f64,
	/// Vertical pan, screen units.
	pub y: f64,
	/// Zoom factor.
	pub k: f64,
}

impl Default for ViewTransform {
	fn default() -> Self {
		Self { x: 0.0, y: 0.0, k: 1.0 }
	}
}

struct PanAnchor {
	start_x: f64,
	start_y: f64,
	origin_x: f64,
	origin_y: f64,
}

#[derive(Default)]
struct HoverState {
	node: Option<DefaultNodeIdx>,
	neighbors: HashSet<DefaultNodeIdx>,
	highlight_t: f64,
}

impl HoverState {
	fn advance(&mut self, dt: f64) {
		let (target, speed) = if self.node.is_some() { (1.0, 1.8) } else { (0.0, 1.3) };
		self.highlight_t += (target - self.highlight_t) * speed * dt;
		if self.node.is_none() && self.highlight_t < 0.01 {
			self.highlight_t = 0.0;
			self.neighbors.clear();
		}
	}
}

/// One live simulation bound to one canvas. Rebuilt wholesale whenever a new
/// snapshot arrives; node identity is not preserved across rebuilds.
pub struct GraphScene {
	/// Engine-owned node bodies and springs.
	pub graph: ForceGraph<NodeVisual, ()>,
	/// Pan/zoom state shared with the renderer.
	pub transform: ViewTransform,
	/// Viewport width in screen units.
	pub width: f64,
	/// Viewport height in screen units.
	pub height: f64,
	edges: Vec<(DefaultNodeIdx, DefaultNodeIdx)>,
	drag: Option<DefaultNodeIdx>,
	pan: Option<PanAnchor>,
	hover: HoverState,
	selected: Option<DefaultNodeIdx>,
	alpha: f64,
	alpha_target: f64,
	running: bool,
}

impl GraphScene {
	/// Bind a snapshot to a fresh simulation. Declines when there is nothing
	/// to show; an empty snapshot is a valid state, not an error.
	pub fn from_snapshot(snapshot: &GraphSnapshot, width: f64, height: f64) -> Option<Self> {
		if snapshot.nodes.is_empty() {
			return None;
		}

		let mut graph = ForceGraph::new(SimulationParameters {
			force_charge: 180.0,
			force_spring: 0.04,
			force_max: 120.0,
			node_speed: 2500.0,
			damping_factor: 0.92,
		});

		let mut id_to_idx = HashMap::new();
		let mut edges = Vec::new();
		let (cx, cy) = (width / 2.0, height / 2.0);

		for (i, node) in snapshot.nodes.iter().enumerate() {
			let angle = (i as f64) * 2.0 * PI / snapshot.nodes.len() as f64;
			let idx = graph.add_node(NodeData {
				x: (cx + SEED_RADIUS * angle.cos()) as f32,
				y: (cy + SEED_RADIUS * angle.sin()) as f32,
				mass: 10.0,
				is_anchor: false,
				user_data: NodeVisual {
					color: kind_color(&node.kind),
					node: node.clone(),
				},
			});
			id_to_idx.insert(node.id.clone(), idx);
		}

		for edge in &snapshot.relationships {
			if let (Some(&src), Some(&tgt)) =
				(id_to_idx.get(&edge.source), id_to_idx.get(&edge.target))
			{
				graph.add_edge(src, tgt, EdgeData::default());
				edges.push((src, tgt));
			} else {
				// The store sanitizes snapshots; this only fires when a scene
				// is built from raw data.
				warn!(
					"relationship {} -> {} references a missing node, skipping",
					edge.source, edge.target
				);
			}
		}

		Some(Self {
			graph,
			edges,
			transform: ViewTransform::default(),
			width,
			height,
			drag: None,
			pan: None,
			hover: HoverState::default(),
			selected: None,
			alpha: 1.0,
			alpha_target: 0.0,
			running: true,
		})
	}

	/// Number of node bodies bound to the engine.
	pub fn node_count(&self) -> usize {
		let mut count = 0;
		self.graph.visit_nodes(|_| count += 1);
		count
	}

	/// Number of resolved edges.
	pub fn edge_count(&self) -> usize {
		self.edges.len()
	}

	/// Current viewport size.
	pub fn dimensions(&self) -> (f64, f64) {
		(self.width, self.height)
	}

	/// Point the centering pass pulls toward.
	pub fn center(&self) -> (f64, f64) {
		(self.width / 2.0, self.height / 2.0)
	}

	/// Current simulation energy.
	pub fn alpha(&self) -> f64 {
		self.alpha
	}

	/// Whether the engine is still stepping.
	pub fn is_running(&self) -> bool {
		self.running
	}

	/// Data of the currently selected node, if any.
	pub fn selected_node(&self) -> Option<GraphNode> {
		self.selected.and_then(|idx| self.node_data(idx))
	}

	/// Whether the given body is the current selection.
	pub fn is_selected(&self, idx: DefaultNodeIdx) -> bool {
		self.selected == Some(idx)
	}

	/// Whether the given body is hovered or adjacent to the hovered node.
	pub fn is_highlighted(&self, idx: DefaultNodeIdx) -> bool {
		self.hover.node == Some(idx) || self.hover.neighbors.contains(&idx)
	}

	/// Whether the given body is the hovered node itself.
	pub fn is_hovered(&self, idx: DefaultNodeIdx) -> bool {
		self.hover.node == Some(idx)
	}

	/// Whether hover emphasis should influence painting at all.
	pub fn has_active_highlight(&self) -> bool {
		self.hover.node.is_some() || self.hover.highlight_t > 0.0
	}

	/// Eased hover emphasis in `0..=1`.
	pub fn highlight_t(&self) -> f64 {
		self.hover.highlight_t
	}

	/// Advance the simulation by one frame. Engine forces, then the
	/// centering and collision passes, then the energy envelope; hover
	/// easing keeps animating even after the layout has settled.
	pub fn tick(&mut self, dt: f32) {
		if self.running {
			self.graph.update(dt);
			self.apply_centering();
			self.apply_collisions();
			self.alpha += (self.alpha_target - self.alpha) * ALPHA_DECAY;
			if self.alpha < ALPHA_MIN && self.alpha_target < ALPHA_MIN {
				self.alpha = 0.0;
				self.running = false;
			}
		}
		self.hover.advance(dt as f64);
	}

	/// Resume stepping without changing the current energy.
	pub fn restart(&mut self) {
		self.running = true;
	}

	/// New viewport: recenter the centering pass and inject a full burst of
	/// energy so the layout redistributes instead of staying off-center.
	pub fn resize(&mut self, width: f64, height: f64) {
		self.width = width;
		self.height = height;
		self.alpha = 1.0;
		self.restart();
	}

	/// Route a pointer press. A node hit selects that node and begins a
	/// drag; a background hit clears the selection and begins a pan. The
	/// returned value is the new selection.
	pub fn pointer_down(&mut self, sx: f64, sy: f64) -> Option<GraphNode> {
		if let Some(idx) = self.node_at_position(sx, sy) {
			self.selected = Some(idx);
			self.begin_drag(idx);
			self.node_data(idx)
		} else {
			self.selected = None;
			self.pan = Some(PanAnchor {
				start_x: sx,
				start_y: sy,
				origin_x: self.transform.x,
				origin_y: self.transform.y,
			});
			None
		}
	}

	/// Pointer movement: re-pin the dragged node to the pointer, or pan, or
	/// update hover emphasis when no button is held.
	pub fn pointer_move(&mut self, sx: f64, sy: f64) {
		if let Some(idx) = self.drag {
			let (gx, gy) = self.screen_to_graph(sx, sy);
			self.pin(idx, gx as f32, gy as f32);
		} else if let Some(pan) = &self.pan {
			self.transform.x = pan.origin_x + (sx - pan.start_x);
			self.transform.y = pan.origin_y + (sy - pan.start_y);
		} else {
			let hovered = self.node_at_position(sx, sy);
			self.set_hover(hovered);
		}
	}

	/// Pointer release: unpin the dragged node so it resumes free
	/// simulation, and let the energy target fall back to rest.
	pub fn pointer_up(&mut self) {
		if let Some(idx) = self.drag.take() {
			self.unpin(idx);
			self.alpha_target = 0.0;
		}
		self.pan = None;
	}

	/// Pointer left the canvas: treat as a release and drop hover emphasis.
	pub fn pointer_leave(&mut self) {
		self.pointer_up();
		self.set_hover(None);
	}

	/// Wheel zoom anchored at the pointer.
	pub fn zoom(&mut self, sx: f64, sy: f64, delta_y: f64) {
		let factor = if delta_y > 0.0 { 0.9 } else { 1.1 };
		let new_k = (self.transform.k * factor).clamp(0.1, 10.0);
		let ratio = new_k / self.transform.k;
		self.transform.x = sx - (sx - self.transform.x) * ratio;
		self.transform.y = sy - (sy - self.transform.y) * ratio;
		self.transform.k = new_k;
	}

	/// Screen coordinates to world coordinates under the current transform.
	pub fn screen_to_graph(&self, sx: f64, sy: f64) -> (f64, f64) {
		(
			(sx - self.transform.x) / self.transform.k,
			(sy - self.transform.y) / self.transform.k,
		)
	}

	/// Topmost body within `HIT_RADIUS` of the given screen point.
	pub fn node_at_position(&self, sx: f64, sy: f64) -> Option<DefaultNodeIdx> {
		let (gx, gy) = self.screen_to_graph(sx, sy);
		let mut found = None;
		self.graph.visit_nodes(|node| {
			let (dx, dy) = (node.x() as f64 - gx, node.y() as f64 - gy);
			// HIT_RADIUS is in world-space, scales with zoom like nodes
			if (dx * dx + dy * dy).sqrt() < HIT_RADIUS {
				found = Some(node.index());
			}
		});
		found
	}

	fn begin_drag(&mut self, idx: DefaultNodeIdx) {
		self.drag = Some(idx);
		// Pin at the node's current position; moves re-pin to the pointer.
		if let Some((x, y)) = self.node_position(idx) {
			self.pin(idx, x, y);
		}
		if self.alpha_target < DRAG_ALPHA_TARGET {
			self.alpha_target = DRAG_ALPHA_TARGET;
			self.alpha = self.alpha.max(DRAG_ALPHA_TARGET);
			self.restart();
		}
	}

	fn pin(&mut self, idx: DefaultNodeIdx, x: f32, y: f32) {
		self.graph.visit_nodes_mut(|node| {
			if node.index() == idx {
				node.data.x = x;
				node.data.y = y;
				node.data.is_anchor = true;
			}
		});
	}

	fn unpin(&mut self, idx: DefaultNodeIdx) {
		self.graph.visit_nodes_mut(|node| {
			if node.index() == idx {
				node.data.is_anchor = false;
			}
		});
	}

	fn set_hover(&mut self, node: Option<DefaultNodeIdx>) {
		if self.hover.node == node {
			return;
		}
		self.hover.node = node;
		if let Some(idx) = node {
			self.hover.neighbors.clear();
			for &(src, tgt) in &self.edges {
				if src == idx {
					self.hover.neighbors.insert(tgt);
				} else if tgt == idx {
					self.hover.neighbors.insert(src);
				}
			}
		}
		// On unhover the neighbor set is kept until the emphasis fades out.
	}

	fn node_data(&self, idx: DefaultNodeIdx) -> Option<GraphNode> {
		let mut found = None;
		self.graph.visit_nodes(|node| {
			if node.index() == idx {
				found = Some(node.data.user_data.node.clone());
			}
		});
		found
	}

	fn node_position(&self, idx: DefaultNodeIdx) -> Option<(f32, f32)> {
		let mut found = None;
		self.graph.visit_nodes(|node| {
			if node.index() == idx {
				found = Some((node.x(), node.y()));
			}
		});
		found
	}

	fn node_anchored(&self, idx: DefaultNodeIdx) -> bool {
		let mut anchored = false;
		self.graph.visit_nodes(|node| {
			if node.index() == idx {
				anchored = node.data.is_anchor;
			}
		});
		anchored
	}

	fn apply_centering(&mut self) {
		let (cx, cy) = (self.width as f32 / 2.0, self.height as f32 / 2.0);
		self.graph.visit_nodes_mut(|node| {
			if node.data.is_anchor {
				return;
			}
			node.data.x += (cx - node.data.x) * CENTER_STRENGTH;
			node.data.y += (cy - node.data.y) * CENTER_STRENGTH;
		});
	}

	fn apply_collisions(&mut self) {
		let mut bodies: Vec<(DefaultNodeIdx, f32, f32, bool)> = Vec::new();
		self.graph
			.visit_nodes(|node| bodies.push((node.index(), node.x(), node.y(), node.data.is_anchor)));

		let mut shifts: HashMap<DefaultNodeIdx, (f32, f32)> = HashMap::new();
		for i in 0..bodies.len() {
			for j in (i + 1)..bodies.len() {
				let (dx, dy) = (bodies[j].1 - bodies[i].1, bodies[j].2 - bodies[i].2);
				let dist = (dx * dx + dy * dy).sqrt().max(0.01);
				let overlap = COLLIDE_SEPARATION - dist;
				if overlap <= 0.0 {
					continue;
				}
				let (ux, uy) = (dx / dist, dy / dist);
				let push = overlap / 2.0;
				if !bodies[i].3 {
					let shift = shifts.entry(bodies[i].0).or_insert((0.0, 0.0));
					shift.0 -= ux * push;
					shift.1 -= uy * push;
				}
				if !bodies[j].3 {
					let shift = shifts.entry(bodies[j].0).or_insert((0.0, 0.0));
					shift.0 += ux * push;
					shift.1 += uy * push;
				}
			}
		}

		if shifts.is_empty() {
			return;
		}
		self.graph.visit_nodes_mut(|node| {
			if let Some(&(sx, sy)) = shifts.get(&node.index()) {
				node.data.x += sx;
				node.data.y += sy;
			}
		});
	}
}

/// Stable palette assignment per node kind.
fn kind_color(kind: &str) -> &'static str {
	let hash = kind
		.bytes()
		.fold(0usize, |acc, b| acc.wrapping_mul(31).wrapping_add(b as usize));
	COLORS[hash % COLORS.len()]
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::model::GraphEdge;

	const W: f64 = 800.0;
	const H: f64 = 600.0;

	fn node(id: &str) -> GraphNode {
		GraphNode {
			id: id.into(),
			name: id.to_uppercase(),
			kind: "Class".into(),
		}
	}

	fn edge(source: &str, target: &str) -> GraphEdge {
		GraphEdge {
			source: source.into(),
			target: target.into(),
		}
	}

	fn two_node_scene() -> GraphScene {
		let snapshot = GraphSnapshot {
			nodes: vec![node("a"), node("b")],
			relationships: vec![edge("a", "b")],
		};
		GraphScene::from_snapshot(&snapshot, W, H).unwrap()
	}

	// Seed position of node 0 in a two-node scene: angle 0 on the seed ring.
	fn first_seed() -> (f64, f64) {
		(W / 2.0 + SEED_RADIUS, H / 2.0)
	}

	#[test]
	fn empty_snapshot_declines_construction() {
		assert!(GraphScene::from_snapshot(&GraphSnapshot::default(), W, H).is_none());
	}

	#[test]
	fn binds_one_body_per_node_and_one_edge_per_relationship() {
		let snapshot = GraphSnapshot {
			nodes: vec![node("a"), node("b"), node("c")],
			relationships: vec![edge("a", "b"), edge("b", "c")],
		};
		let scene = GraphScene::from_snapshot(&snapshot, W, H).unwrap();
		assert_eq!(scene.node_count(), 3);
		assert_eq!(scene.edge_count(), 2);
	}

	#[test]
	fn dangling_edges_are_skipped_at_binding() {
		let snapshot = GraphSnapshot {
			nodes: vec![node("a")],
			relationships: vec![edge("a", "ghost")],
		};
		let scene = GraphScene::from_snapshot(&snapshot, W, H).unwrap();
		assert_eq!(scene.node_count(), 1);
		assert_eq!(scene.edge_count(), 0);
	}

	#[test]
	fn rebuild_from_new_snapshot_holds_only_new_elements() {
		let scene = two_node_scene();
		assert_eq!(scene.node_count(), 2);

		let replacement = GraphSnapshot {
			nodes: vec![node("x")],
			relationships: vec![],
		};
		let scene = GraphScene::from_snapshot(&replacement, W, H).unwrap();
		assert_eq!(scene.node_count(), 1);
		assert_eq!(scene.edge_count(), 0);
		assert_eq!(scene.selected_node(), None);
	}

	#[test]
	fn pressing_a_node_selects_it() {
		let mut scene = two_node_scene();
		let (x, y) = first_seed();
		let picked = scene.pointer_down(x, y);
		assert_eq!(picked.as_ref().map(|n| n.id.as_str()), Some("a"));
		assert_eq!(scene.selected_node().map(|n| n.id), Some("a".to_string()));
	}

	#[test]
	fn pressing_the_background_clears_the_selection() {
		let mut scene = two_node_scene();
		let (x, y) = first_seed();
		scene.pointer_down(x, y);
		scene.pointer_up();

		assert_eq!(scene.pointer_down(10.0, 10.0), None);
		assert!(scene.selected_node().is_none());
	}

	#[test]
	fn drag_pins_and_raises_the_energy_target() {
		let mut scene = two_node_scene();
		let (x, y) = first_seed();
		let idx = scene.node_at_position(x, y).unwrap();

		scene.pointer_down(x, y);
		assert!(scene.node_anchored(idx));
		assert!((scene.alpha_target - DRAG_ALPHA_TARGET).abs() < f64::EPSILON);
		assert!(scene.is_running());
	}

	#[test]
	fn dragged_node_tracks_the_pointer_exactly() {
		let mut scene = two_node_scene();
		let (x, y) = first_seed();
		let idx = scene.node_at_position(x, y).unwrap();
		scene.pointer_down(x, y);

		scene.pointer_move(300.5, 220.25);
		let (nx, ny) = scene.node_position(idx).unwrap();
		assert!((nx - 300.5).abs() < 1e-3);
		assert!((ny - 220.25).abs() < 1e-3);

		// Pinned nodes are left alone by the centering and collision passes.
		scene.tick(0.016);
		let (nx, ny) = scene.node_position(idx).unwrap();
		assert!((nx - 300.5).abs() < 1e-3);
		assert!((ny - 220.25).abs() < 1e-3);
	}

	#[test]
	fn release_clears_the_pin_and_the_energy_target() {
		let mut scene = two_node_scene();
		let (x, y) = first_seed();
		let idx = scene.node_at_position(x, y).unwrap();

		scene.pointer_down(x, y);
		scene.pointer_move(300.0, 200.0);
		scene.pointer_up();

		assert!(!scene.node_anchored(idx));
		assert_eq!(scene.alpha_target, 0.0);
		// Selection survives the release.
		assert_eq!(scene.selected_node().map(|n| n.id), Some("a".to_string()));
	}

	#[test]
	fn resize_recenters_and_reheats() {
		let mut scene = two_node_scene();
		for _ in 0..500 {
			scene.tick(0.016);
		}
		assert!(!scene.is_running());

		scene.resize(500.0, 400.0);
		assert_eq!(scene.dimensions(), (500.0, 400.0));
		assert_eq!(scene.center(), (250.0, 200.0));
		assert!((scene.alpha() - 1.0).abs() < f64::EPSILON);
		assert!(scene.is_running());
	}

	#[test]
	fn simulation_settles_once_energy_decays() {
		let mut scene = two_node_scene();
		for _ in 0..500 {
			scene.tick(0.016);
		}
		assert!(!scene.is_running());
		assert_eq!(scene.alpha(), 0.0);
	}

	#[test]
	fn hovering_highlights_the_node_and_its_neighbors() {
		let mut scene = two_node_scene();
		let (x, y) = first_seed();
		scene.pointer_move(x, y);

		let hovered = scene.node_at_position(x, y).unwrap();
		assert!(scene.is_hovered(hovered));
		// "a" and "b" are linked, so the neighbor is highlighted too.
		let mut highlighted = 0;
		scene.graph.visit_nodes(|node| {
			if scene.is_highlighted(node.index()) {
				highlighted += 1;
			}
		});
		assert_eq!(highlighted, 2);
	}

	#[test]
	fn zoom_is_clamped() {
		let mut scene = two_node_scene();
		for _ in 0..100 {
			scene.zoom(400.0, 300.0, 1.0);
		}
		assert!((scene.transform.k - 0.1).abs() < 1e-9);
	}
}
