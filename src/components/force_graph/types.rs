use serde::{Deserialize, Serialize};

/// Integer vertex identifier, unique within one graph but not necessarily dense.
pub type VertexId = i64;

/// An input edge `(u, v)`; treated as undirected downstream.
///
/// Serializes as a two-element JSON array, matching the compute service's wire format.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Edge(pub VertexId, pub VertexId);

impl From<(VertexId, VertexId)> for Edge {
	fn from((u, v): (VertexId, VertexId)) -> Self {
		Self(u, v)
	}
}

#[derive(Clone, Debug, PartialEq)]
pub struct GraphNode {
	pub id: VertexId,
	pub size: f64,
	pub color: String,
	pub label: String,
	pub cluster: Option<usize>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct GraphLink {
	pub id: usize,
	pub source: VertexId,
	pub target: VertexId,
	pub color: String,
	pub width: f64,
}

impl GraphLink {
	pub fn is_self_loop(&self) -> bool {
		self.source == self.target
	}
}

/// Bounded node/link arrays handed to the layout renderer.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RenderModel {
	pub nodes: Vec<GraphNode>,
	pub links: Vec<GraphLink>,
	/// Set when the input had more distinct vertices than the node cap.
	pub truncated: bool,
	pub cluster_count: usize,
}

impl RenderModel {
	pub fn is_empty(&self) -> bool {
		self.nodes.is_empty()
	}
}

/// Visual theme and size cap for one render model.
///
/// Passed explicitly to the builder so separate graphs can use different themes.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
	pub node_cap: usize,
	pub base_node_size: f64,
	pub highlight_size_multiplier: f64,
	pub node_color: String,
	pub highlight_node_color: String,
	pub link_color: String,
	pub highlight_link_color: String,
	pub base_link_width: f64,
	pub highlight_width_multiplier: f64,
	/// Node labels are painted only when the zoom scale exceeds this.
	pub label_zoom_threshold: f64,
	pub background_color: String,
	pub label_color: String,
}

impl Default for RenderConfig {
	fn default() -> Self {
		Self {
			node_cap: 1000,
			base_node_size: 3.0,
			highlight_size_multiplier: 1.5,
			node_color: "#1890ff".into(),
			highlight_node_color: "#ff4d4f".into(),
			link_color: "#d9d9d9".into(),
			highlight_link_color: "#ff4d4f".into(),
			base_link_width: 0.5,
			highlight_width_multiplier: 2.0,
			label_zoom_threshold: 0.5,
			background_color: "#ffffff".into(),
			label_color: "#ffffff".into(),
		}
	}
}

impl RenderConfig {
	pub fn highlight_node_size(&self) -> f64 {
		self.base_node_size * self.highlight_size_multiplier
	}

	pub fn highlight_link_width(&self) -> f64 {
		self.base_link_width * self.highlight_width_multiplier
	}
}
