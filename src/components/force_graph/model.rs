use std::collections::HashSet;

use log::{debug, warn};

use super::cluster::{ModelError, assign_clusters};
use super::types::{Edge, GraphLink, GraphNode, RenderConfig, RenderModel, VertexId};

/// Distinct endpoints in first-encountered order.
fn vertices_in_encounter_order(edges: &[Edge]) -> Vec<VertexId> {
	let mut seen = HashSet::new();
	edges
		.iter()
		.flat_map(|&Edge(u, v)| [u, v])
		.filter(|&id| seen.insert(id))
		.collect()
}

/// Builds the bounded, colored, clustered render model.
///
/// Vertices beyond `config.node_cap` (in encounter order) are dropped, and so is
/// every edge with a dropped endpoint. Self-loops and repeated edges are kept.
pub fn build(
	edges: &[Edge],
	highlight: &HashSet<VertexId>,
	config: &RenderConfig,
) -> Result<RenderModel, ModelError> {
	let mut vertices = vertices_in_encounter_order(edges);
	let truncated = vertices.len() > config.node_cap;
	if truncated {
		warn!(
			"graph has {} vertices, keeping the first {}",
			vertices.len(),
			config.node_cap
		);
		vertices.truncate(config.node_cap);
	}
	let retained: HashSet<VertexId> = vertices.iter().copied().collect();

	let mut nodes: Vec<GraphNode> = vertices
		.into_iter()
		.map(|id| {
			let hit = highlight.contains(&id);
			GraphNode {
				id,
				size: if hit {
					config.highlight_node_size()
				} else {
					config.base_node_size
				},
				color: if hit {
					config.highlight_node_color.clone()
				} else {
					config.node_color.clone()
				},
				label: id.to_string(),
				cluster: None,
			}
		})
		.collect();

	let links: Vec<GraphLink> = edges
		.iter()
		.filter(|Edge(u, v)| retained.contains(u) && retained.contains(v))
		.enumerate()
		.map(|(id, &Edge(source, target))| {
			let hit = highlight.contains(&source) && highlight.contains(&target);
			GraphLink {
				id,
				source,
				target,
				color: if hit {
					config.highlight_link_color.clone()
				} else {
					config.link_color.clone()
				},
				width: if hit {
					config.highlight_link_width()
				} else {
					config.base_link_width
				},
			}
		})
		.collect();

	let cluster_count = assign_clusters(&mut nodes, &links)?;
	debug!(
		"render model: {} nodes, {} links, {} clusters",
		nodes.len(),
		links.len(),
		cluster_count
	);

	Ok(RenderModel {
		nodes,
		links,
		truncated,
		cluster_count,
	})
}

/// Rebuilds the render model only when the edge list or highlight set changed.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RenderModelCache {
	config: RenderConfig,
	inputs: Option<(Vec<Edge>, HashSet<VertexId>)>,
	model: RenderModel,
}

impl RenderModelCache {
	pub fn new(config: RenderConfig) -> Self {
		Self {
			config,
			inputs: None,
			model: RenderModel::default(),
		}
	}

	pub fn config(&self) -> &RenderConfig {
		&self.config
	}

	pub fn model(&self) -> &RenderModel {
		&self.model
	}

	/// Returns `Ok(true)` if a rebuild happened. On error the previous model is kept.
	pub fn refresh(
		&mut self,
		edges: &[Edge],
		highlight: &HashSet<VertexId>,
	) -> Result<bool, ModelError> {
		if let Some((prev_edges, prev_highlight)) = &self.inputs {
			if prev_edges.as_slice() == edges && prev_highlight == highlight {
				return Ok(false);
			}
		}
		self.model = build(edges, highlight, &self.config)?;
		self.inputs = Some((edges.to_vec(), highlight.clone()));
		Ok(true)
	}
}
