//! HTTP client for the max-clique service.

use log::{debug, trace};
use serde::{Deserialize, Serialize};

use crate::components::force_graph::{Edge, VertexId};

pub const FIND_MAX_CLIQUE_PATH: &str = "/api/find-max-clique";

#[derive(Debug, thiserror::Error)]
pub enum ComputeError {
	#[error("failed to serialize request: {0}")]
	Serialize(serde_json::Error),

	#[error("failed to deserialize response: {0}")]
	Deserialize(serde_json::Error),

	#[error("service responded {status} {status_text}")]
	Status { status: u16, status_text: String },

	#[error("{0}")]
	Request(String),
}

#[derive(Serialize)]
struct CliqueRequest<'a> {
	edges: &'a [Edge],
}

#[derive(Deserialize)]
struct CliqueResponse {
	max_clique: Vec<VertexId>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ComputeClient {
	base_url: String,
}

impl ComputeClient {
	pub fn new(base_url: impl Into<String>) -> Self {
		Self {
			base_url: base_url.into(),
		}
	}

	pub fn endpoint(&self) -> String {
		format!(
			"{base_url}{FIND_MAX_CLIQUE_PATH}",
			base_url = self.base_url.trim_end_matches('/')
		)
	}

	pub fn request(&self, edges: &[Edge]) -> Result<ehttp::Request, ComputeError> {
		ehttp::Request::json(self.endpoint(), &CliqueRequest { edges }).map_err(ComputeError::Serialize)
	}

	/// Posts the edge list and returns the vertices of the maximum clique. Never retries.
	pub async fn find_max_clique(&self, edges: &[Edge]) -> Result<Vec<VertexId>, ComputeError> {
		let request = self.request(edges)?;
		debug!("POST {} with {} edges", request.url, edges.len());
		let res = ehttp::fetch_async(request)
			.await
			.map_err(ComputeError::Request)?;
		decode_response(res.ok, res.status, &res.status_text, &res.bytes)
	}
}

fn decode_response(
	ok: bool,
	status: u16,
	status_text: &str,
	bytes: &[u8],
) -> Result<Vec<VertexId>, ComputeError> {
	if !ok {
		trace!("error response body: {:?}", String::from_utf8_lossy(bytes));
		return Err(ComputeError::Status {
			status,
			status_text: status_text.to_owned(),
		});
	}
	let body: CliqueResponse = serde_json::from_slice(bytes).map_err(ComputeError::Deserialize)?;
	Ok(body.max_clique)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn endpoint_joins_base_url() {
		assert_eq!(
			ComputeClient::new("http://localhost:8080/").endpoint(),
			"http://localhost:8080/api/find-max-clique"
		);
	}

	#[test]
	fn request_body_is_edge_pairs() {
		let client = ComputeClient::new("http://localhost:8080");
		let request = client.request(&[Edge(1, 2), Edge(2, 3)]).unwrap();
		assert_eq!(request.method, "POST");
		let body: serde_json::Value = serde_json::from_slice(&request.body).unwrap();
		assert_eq!(body, serde_json::json!({ "edges": [[1, 2], [2, 3]] }));
	}

	#[test]
	fn decodes_clique() {
		let clique = decode_response(true, 200, "OK", br#"{"max_clique":[3,1,2]}"#).unwrap();
		assert_eq!(clique, vec![3, 1, 2]);
	}

	#[test]
	fn server_error_is_a_status_failure() {
		let err = decode_response(false, 500, "Internal Server Error", b"boom").unwrap_err();
		assert!(matches!(err, ComputeError::Status { status: 500, .. }));
		assert_eq!(err.to_string(), "service responded 500 Internal Server Error");
	}

	#[test]
	fn malformed_body_is_a_decode_failure() {
		let bodies: [&[u8]; 3] = [b"not json", br#"{"clique":[1]}"#, br#"{"max_clique":"x"}"#];
		for body in bodies {
			let err = decode_response(true, 200, "OK", body).unwrap_err();
			assert!(matches!(err, ComputeError::Deserialize(_)));
		}
	}
}
