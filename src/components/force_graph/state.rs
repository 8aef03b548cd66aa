use std::collections::{HashMap, HashSet};
use std::f64::consts::PI;

use force_graph::{DefaultNodeIdx, EdgeData, ForceGraph, NodeData, SimulationParameters};

use super::types::{RenderConfig, RenderModel};
use super::viewport::Viewport;

/// Minimum pick radius in world units; small nodes stay clickable.
pub const HIT_RADIUS: f64 = 8.0;
pub const MIN_ZOOM: f64 = 0.1;
pub const MAX_ZOOM: f64 = 10.0;

/// Largest per-tick node displacement still considered at rest.
const SETTLE_EPSILON: f64 = 0.05;
const SETTLE_TICKS: u32 = 30;
const MAX_TICKS: u32 = 600;
const FIT_PADDING: f64 = 20.0;

#[derive(Clone, Debug, Default)]
pub struct NodeInfo {
	pub label: String,
	pub color: String,
	pub radius: f64,
}

#[derive(Clone, Debug)]
pub struct LinkInfo {
	pub source: DefaultNodeIdx,
	pub target: DefaultNodeIdx,
	pub color: String,
	pub width: f64,
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
	pub node_idx: Option<DefaultNodeIdx>,
	pub start_x: f64,
	pub start_y: f64,
	pub node_start_x: f32,
	pub node_start_y: f32,
}

#[derive(Clone, Debug, Default)]
pub struct PanState {
	pub active: bool,
	pub start_x: f64,
	pub start_y: f64,
	pub transform_start_x: f64,
	pub transform_start_y: f64,
}

#[derive(Clone, Debug, Default)]
pub struct HoverState {
	pub node: Option<DefaultNodeIdx>,
	pub neighbors: HashSet<DefaultNodeIdx>,
}

#[derive(Clone, Debug, Default)]
struct SettleState {
	ticks: u32,
	calm_ticks: u32,
	fitted: bool,
}

pub struct ForceGraphState {
	pub graph: ForceGraph<NodeInfo, ()>,
	pub links: Vec<LinkInfo>,
	pub config: RenderConfig,
	pub transform: ViewTransform,
	pub drag: DragState,
	pub pan: PanState,
	pub hover: HoverState,
	pub viewport: Viewport,
	pub animation_running: bool,
	settle: SettleState,
	last_positions: HashMap<DefaultNodeIdx, (f32, f32)>,
}

/// Start positions: cluster centers spread on a ring around the origin, members
/// on a small circle around their cluster center.
fn seed_positions(model: &RenderModel) -> Vec<(f32, f32)> {
	let clusters = model.cluster_count.max(1);
	let mut members = vec![0usize; clusters];
	for node in &model.nodes {
		members[node.cluster.unwrap_or(0).min(clusters - 1)] += 1;
	}
	let ring = if clusters == 1 {
		0.0
	} else {
		60.0 + 15.0 * clusters as f64
	};

	let mut slots = vec![0usize; clusters];
	model
		.nodes
		.iter()
		.map(|node| {
			let c = node.cluster.unwrap_or(0).min(clusters - 1);
			let (count, slot) = (members[c], slots[c]);
			slots[c] += 1;

			let cluster_angle = (c as f64) * 2.0 * PI / clusters as f64;
			let (cx, cy) = (ring * cluster_angle.cos(), ring * cluster_angle.sin());
			if count == 1 {
				return (cx as f32, cy as f32);
			}
			let spread = 10.0 + 4.0 * (count as f64).sqrt();
			let angle = (slot as f64) * 2.0 * PI / count as f64;
			(
				(cx + spread * angle.cos()) as f32,
				(cy + spread * angle.sin()) as f32,
			)
		})
		.collect()
}

impl ForceGraphState {
	pub fn new(model: &RenderModel, config: &RenderConfig, viewport: Viewport) -> Self {
		let mut graph = ForceGraph::new(SimulationParameters {
			force_charge: 150.0,
			force_spring: 0.05,
			force_max: 100.0,
			node_speed: 3000.0,
			damping_factor: 0.9,
		});
		let mut id_to_idx = HashMap::new();
		let mut last_positions = HashMap::new();

		for (node, (x, y)) in model.nodes.iter().zip(seed_positions(model)) {
			let idx = graph.add_node(NodeData {
				x,
				y,
				mass: 10.0,
				is_anchor: false,
				user_data: NodeInfo {
					label: node.label.clone(),
					color: node.color.clone(),
					radius: node.size,
				},
			});
			id_to_idx.insert(node.id, idx);
			last_positions.insert(idx, (x, y));
		}

		let mut links = Vec::with_capacity(model.links.len());
		for link in &model.links {
			// Zero-length springs have no direction; self-loops stay out of the simulation.
			if link.is_self_loop() {
				continue;
			}
			if let (Some(&source), Some(&target)) =
				(id_to_idx.get(&link.source), id_to_idx.get(&link.target))
			{
				graph.add_edge(source, target, EdgeData::default());
				links.push(LinkInfo {
					source,
					target,
					color: link.color.clone(),
					width: link.width,
				});
			}
		}

		Self {
			graph,
			links,
			config: config.clone(),
			transform: ViewTransform {
				x: viewport.width / 2.0,
				y: viewport.height / 2.0,
				k: 1.0,
			},
			drag: DragState::default(),
			pan: PanState::default(),
			hover: HoverState::default(),
			viewport,
			animation_running: true,
			settle: SettleState::default(),
			last_positions,
		}
	}

	pub fn screen_to_graph(&self, sx: f64, sy: f64) -> (f64, f64) {
		(
			(sx - self.transform.x) / self.transform.k,
			(sy - self.transform.y) / self.transform.k,
		)
	}

	/// Closest node within its pick radius of the screen point.
	pub fn node_at_position(&self, sx: f64, sy: f64) -> Option<DefaultNodeIdx> {
		let (gx, gy) = self.screen_to_graph(sx, sy);
		let mut found: Option<(DefaultNodeIdx, f64)> = None;
		self.graph.visit_nodes(|node| {
			let (dx, dy) = (node.x() as f64 - gx, node.y() as f64 - gy);
			let dist = (dx * dx + dy * dy).sqrt();
			if dist < node.data.user_data.radius.max(HIT_RADIUS)
				&& found.is_none_or(|(_, best)| dist < best)
			{
				found = Some((node.index(), dist));
			}
		});
		found.map(|(idx, _)| idx)
	}

	pub fn set_hover(&mut self, node: Option<DefaultNodeIdx>) {
		if self.hover.node == node {
			return;
		}
		self.hover.node = node;
		self.hover.neighbors.clear();
		if let Some(idx) = node {
			for link in &self.links {
				if link.source == idx {
					self.hover.neighbors.insert(link.target);
				} else if link.target == idx {
					self.hover.neighbors.insert(link.source);
				}
			}
		}
	}

	pub fn is_hovered(&self, idx: DefaultNodeIdx) -> bool {
		self.hover.node == Some(idx)
	}

	/// Node shares a link with the hovered node.
	pub fn is_neighbor(&self, idx: DefaultNodeIdx) -> bool {
		self.hover.neighbors.contains(&idx)
	}

	/// Link touches the hovered node.
	pub fn is_link_hovered(&self, link: &LinkInfo) -> bool {
		self.hover.node.is_some_and(|idx| link.source == idx || link.target == idx)
	}

	/// Advances the simulation. Returns `true` on the tick the layout settles.
	pub fn tick(&mut self, dt: f32) -> bool {
		if !self.animation_running {
			return false;
		}
		self.graph.update(dt);

		let mut max_shift = 0.0f64;
		let last = &mut self.last_positions;
		self.graph.visit_nodes(|node| {
			let pos = (node.x(), node.y());
			if let Some(&(px, py)) = last.get(&node.index()) {
				let (dx, dy) = ((pos.0 - px) as f64, (pos.1 - py) as f64);
				max_shift = max_shift.max((dx * dx + dy * dy).sqrt());
			}
			last.insert(node.index(), pos);
		});

		self.settle.ticks += 1;
		if max_shift < SETTLE_EPSILON {
			self.settle.calm_ticks += 1;
		} else {
			self.settle.calm_ticks = 0;
		}
		if self.settle.calm_ticks < SETTLE_TICKS && self.settle.ticks < MAX_TICKS {
			return false;
		}

		self.animation_running = false;
		if !self.settle.fitted {
			self.settle.fitted = true;
			self.fit_to_view();
		}
		true
	}

	/// Restarts the simulation after user interaction; the view is not refit.
	pub fn reheat(&mut self) {
		self.animation_running = true;
		self.settle.ticks = 0;
		self.settle.calm_ticks = 0;
	}

	/// Scales and centers the view on the bounding box of all nodes.
	pub fn fit_to_view(&mut self) {
		let mut bounds: Option<(f64, f64, f64, f64)> = None;
		self.graph.visit_nodes(|node| {
			let (x, y, r) = (
				node.x() as f64,
				node.y() as f64,
				node.data.user_data.radius,
			);
			bounds = Some(match bounds {
				None => (x - r, y - r, x + r, y + r),
				Some((x0, y0, x1, y1)) => (x0.min(x - r), y0.min(y - r), x1.max(x + r), y1.max(y + r)),
			});
		});

		let (w, h) = (self.viewport.width, self.viewport.height);
		let Some((x0, y0, x1, y1)) = bounds else {
			self.transform = ViewTransform {
				x: w / 2.0,
				y: h / 2.0,
				k: 1.0,
			};
			return;
		};
		let (bw, bh) = ((x1 - x0).max(1.0), (y1 - y0).max(1.0));
		let k = ((w - 2.0 * FIT_PADDING).max(1.0) / bw)
			.min((h - 2.0 * FIT_PADDING).max(1.0) / bh)
			.clamp(MIN_ZOOM, MAX_ZOOM);
		let (cx, cy) = ((x0 + x1) / 2.0, (y0 + y1) / 2.0);
		self.transform = ViewTransform {
			x: w / 2.0 - cx * k,
			y: h / 2.0 - cy * k,
			k,
		};
	}

	/// Pointer down: grabs the node under the cursor, or starts panning.
	pub fn begin_interaction(&mut self, x: f64, y: f64) {
		if let Some(idx) = self.node_at_position(x, y) {
			self.drag.active = true;
			self.drag.node_idx = Some(idx);
			self.drag.start_x = x;
			self.drag.start_y = y;
			let drag = &mut self.drag;
			self.graph.visit_nodes(|node| {
				if node.index() == idx {
					drag.node_start_x = node.x();
					drag.node_start_y = node.y();
				}
			});
		} else {
			self.pan.active = true;
			self.pan.start_x = x;
			self.pan.start_y = y;
			self.pan.transform_start_x = self.transform.x;
			self.pan.transform_start_y = self.transform.y;
		}
	}

	pub fn pointer_moved(&mut self, x: f64, y: f64) {
		if !self.drag.active {
			let hovered = self.node_at_position(x, y);
			self.set_hover(hovered);
		}

		if self.drag.active {
			let Some(idx) = self.drag.node_idx else {
				return;
			};
			let (dx, dy) = (
				(x - self.drag.start_x) / self.transform.k,
				(y - self.drag.start_y) / self.transform.k,
			);
			let (nx, ny) = (
				self.drag.node_start_x + dx as f32,
				self.drag.node_start_y + dy as f32,
			);
			self.graph.visit_nodes_mut(|node| {
				if node.index() == idx {
					node.data.x = nx;
					node.data.y = ny;
					node.data.is_anchor = true;
				}
			});
			self.reheat();
		} else if self.pan.active {
			self.transform.x = self.pan.transform_start_x + (x - self.pan.start_x);
			self.transform.y = self.pan.transform_start_y + (y - self.pan.start_y);
		}
	}

	/// Pointer up or leave. Dragged nodes stay pinned.
	pub fn end_interaction(&mut self) {
		self.drag.active = false;
		self.drag.node_idx = None;
		self.pan.active = false;
	}

	/// Zooms by `factor` keeping the screen point `(x, y)` fixed.
	pub fn zoom_at(&mut self, x: f64, y: f64, factor: f64) {
		let new_k = (self.transform.k * factor).clamp(MIN_ZOOM, MAX_ZOOM);
		let ratio = new_k / self.transform.k;
		self.transform.x = x - (x - self.transform.x) * ratio;
		self.transform.y = y - (y - self.transform.y) * ratio;
		self.transform.k = new_k;
	}

	pub fn resize(&mut self, viewport: Viewport) {
		self.viewport = viewport;
	}
}
