//! State of one loaded graph: edges, solver result, busy flag and notices.

use std::collections::HashSet;

use log::{error, info, warn};

use crate::components::force_graph::{Edge, RenderConfig, RenderModel, RenderModelCache, VertexId};
use crate::compute::ComputeError;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AdvisoryLevel {
	Info,
	Success,
	Warning,
	Error,
}

/// A user-visible, non-blocking message.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Advisory {
	pub level: AdvisoryLevel,
	pub message: String,
}

impl Advisory {
	fn new(level: AdvisoryLevel, message: impl Into<String>) -> Self {
		Self {
			level,
			message: message.into(),
		}
	}
}

/// Identifies one compute request; only the latest ticket may update the session.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RequestTicket(u64);

#[derive(Clone, Debug, PartialEq)]
pub struct GraphSession {
	edges: Vec<Edge>,
	highlight: HashSet<VertexId>,
	cache: RenderModelCache,
	busy: bool,
	generation: u64,
	notices: Vec<Advisory>,
	/// Cleared whenever the model is rebuilt; set by the layout once it comes to rest.
	layout_settled: bool,
}

impl GraphSession {
	pub fn new(config: RenderConfig) -> Self {
		Self {
			edges: Vec::new(),
			highlight: HashSet::new(),
			cache: RenderModelCache::new(config),
			busy: false,
			generation: 0,
			notices: Vec::new(),
			layout_settled: false,
		}
	}

	pub fn model(&self) -> &RenderModel {
		self.cache.model()
	}

	pub fn is_busy(&self) -> bool {
		self.busy
	}

	pub fn is_layout_settled(&self) -> bool {
		self.layout_settled
	}

	pub fn mark_layout_settled(&mut self) {
		self.layout_settled = true;
	}

	pub fn notices(&self) -> &[Advisory] {
		&self.notices
	}

	pub fn dismiss(&mut self, index: usize) {
		if index < self.notices.len() {
			self.notices.remove(index);
		}
	}

	/// Replaces the graph. Returns a ticket for the compute request, or `None`
	/// when there is nothing to solve.
	pub fn load_edges(&mut self, edges: Vec<Edge>) -> Option<RequestTicket> {
		self.generation += 1;
		self.edges = edges;
		self.highlight.clear();
		self.notices.clear();
		self.busy = false;
		self.refresh();

		if self.edges.is_empty() {
			self.notify(AdvisoryLevel::Info, "No edges found in file");
			return None;
		}
		info!("loaded {} edges", self.edges.len());
		self.busy = true;
		Some(RequestTicket(self.generation))
	}

	/// Applies a compute result. Results for superseded tickets are dropped and
	/// `false` is returned. On failure the current model is left untouched.
	pub fn complete(
		&mut self,
		ticket: RequestTicket,
		result: Result<Vec<VertexId>, ComputeError>,
	) -> bool {
		if ticket.0 != self.generation {
			info!("dropping stale compute result for request {}", ticket.0);
			return false;
		}
		self.busy = false;
		match result {
			Ok(clique) => {
				self.highlight = clique.iter().copied().collect();
				self.refresh();
				self.notify(
					AdvisoryLevel::Success,
					format!("Maximum clique found: {} vertices", self.highlight.len()),
				);
			}
			Err(err) => {
				warn!("max clique computation failed: {err}");
				self.notify(
					AdvisoryLevel::Error,
					format!("Computation failed, please retry ({err})"),
				);
			}
		}
		true
	}

	pub fn notify(&mut self, level: AdvisoryLevel, message: impl Into<String>) {
		self.notices.push(Advisory::new(level, message));
	}

	fn refresh(&mut self) {
		let rebuilt = self.cache.refresh(&self.edges, &self.highlight);
		if matches!(rebuilt, Ok(true)) {
			self.layout_settled = false;
		}
		match rebuilt {
			Ok(_) if self.cache.model().truncated => {
				let cap = self.cache.config().node_cap;
				let message = format!("Graph too large, showing only the first {cap} vertices");
				if !self.notices.iter().any(|n| n.message == message) {
					self.notify(AdvisoryLevel::Warning, message);
				}
			}
			Ok(_) => {}
			Err(err) => {
				error!("render model is inconsistent: {err}");
				self.notify(AdvisoryLevel::Error, format!("Internal error: {err}"));
			}
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn edges(pairs: &[(VertexId, VertexId)]) -> Vec<Edge> {
		pairs.iter().copied().map(Edge::from).collect()
	}

	fn levels(session: &GraphSession) -> Vec<AdvisoryLevel> {
		session.notices().iter().map(|n| n.level).collect()
	}

	#[test]
	fn load_then_success_highlights_clique() {
		let mut session = GraphSession::new(RenderConfig::default());
		let ticket = session.load_edges(edges(&[(1, 2), (2, 3), (1, 3), (4, 5)])).unwrap();
		assert!(session.is_busy());
		assert_eq!(session.model().nodes.len(), 5);
		assert!(session.model().nodes.iter().all(|n| n.size == 3.0));

		assert!(session.complete(ticket, Ok(vec![1, 2, 3])));
		assert!(!session.is_busy());
		let model = session.model();
		assert_eq!(model.nodes.iter().filter(|n| n.size == 4.5).count(), 3);
		assert_eq!(model.cluster_count, 2);
		assert_eq!(levels(&session), vec![AdvisoryLevel::Success]);
	}

	#[test]
	fn failure_keeps_model_loaded_for_request() {
		let mut session = GraphSession::new(RenderConfig::default());
		let first = session.load_edges(edges(&[(1, 2), (2, 3)])).unwrap();
		session.complete(first, Ok(vec![1, 2]));
		let before = session.model().clone();

		let second = session.load_edges(edges(&[(1, 2), (2, 3)])).unwrap();
		let loaded = session.model().clone();
		let failure = ComputeError::Status {
			status: 500,
			status_text: "Internal Server Error".into(),
		};
		assert!(session.complete(second, Err(failure)));
		assert!(!session.is_busy());
		assert_eq!(session.model(), &loaded);
		assert_ne!(session.model(), &before);
		assert_eq!(levels(&session), vec![AdvisoryLevel::Error]);
	}

	#[test]
	fn failure_after_success_leaves_model_unchanged() {
		let mut session = GraphSession::new(RenderConfig::default());
		let ticket = session.load_edges(edges(&[(1, 2)])).unwrap();
		let before = session.model().clone();
		session.complete(ticket, Err(ComputeError::Request("offline".into())));
		assert_eq!(session.model(), &before);
		assert!(!session.is_busy());
	}

	#[test]
	fn stale_results_are_dropped() {
		let mut session = GraphSession::new(RenderConfig::default());
		let old = session.load_edges(edges(&[(1, 2)])).unwrap();
		let new = session.load_edges(edges(&[(7, 8), (8, 9)])).unwrap();

		assert!(!session.complete(old, Ok(vec![1, 2])));
		assert!(session.is_busy());
		assert!(session.model().nodes.iter().all(|n| n.size == 3.0));

		assert!(session.complete(new, Ok(vec![7, 8])));
		assert!(!session.is_busy());
		assert_eq!(session.model().links[0].width, 1.0);
		assert_eq!(session.model().links[1].width, 0.5);
	}

	#[test]
	fn rebuilt_model_clears_layout_settled() {
		let mut session = GraphSession::new(RenderConfig::default());
		let ticket = session.load_edges(edges(&[(1, 2), (2, 3)])).unwrap();
		session.mark_layout_settled();
		assert!(session.is_layout_settled());

		assert!(session.complete(ticket, Ok(vec![1, 2])));
		assert!(!session.is_layout_settled());
		session.mark_layout_settled();

		// Dismissing a notice leaves the model, and so the layout, alone.
		session.dismiss(0);
		assert!(session.is_layout_settled());
	}

	#[test]
	fn failed_request_keeps_layout_settled() {
		let mut session = GraphSession::new(RenderConfig::default());
		let ticket = session.load_edges(edges(&[(1, 2)])).unwrap();
		session.mark_layout_settled();
		session.complete(ticket, Err(ComputeError::Request("offline".into())));
		assert!(session.is_layout_settled());
	}

	#[test]
	fn empty_file_needs_no_request() {
		let mut session = GraphSession::new(RenderConfig::default());
		assert!(session.load_edges(Vec::new()).is_none());
		assert!(!session.is_busy());
		assert!(session.model().is_empty());
		assert_eq!(levels(&session), vec![AdvisoryLevel::Info]);
	}

	#[test]
	fn truncation_is_advised_once() {
		let config = RenderConfig {
			node_cap: 2,
			..RenderConfig::default()
		};
		let mut session = GraphSession::new(config);
		let ticket = session.load_edges(edges(&[(1, 2), (3, 4)])).unwrap();
		assert!(session.model().truncated);
		assert_eq!(levels(&session), vec![AdvisoryLevel::Warning]);

		session.complete(ticket, Ok(vec![1, 2]));
		assert_eq!(
			levels(&session),
			vec![AdvisoryLevel::Warning, AdvisoryLevel::Success]
		);
		session.dismiss(0);
		assert_eq!(levels(&session), vec![AdvisoryLevel::Success]);
	}
}
