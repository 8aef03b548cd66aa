//! Reader for the edge lines of DIMACS `.col` / `.clq` graph files.

use log::debug;

use crate::components::force_graph::{Edge, VertexId};

/// File extensions offered by the upload control.
pub const ACCEPTED_EXTENSIONS: &str = ".col,.clq";

fn parse_edge_line(line: &str) -> Option<Edge> {
	let mut fields = line.split_ascii_whitespace();
	if fields.next()? != "e" {
		return None;
	}
	let u: VertexId = fields.next()?.parse().ok()?;
	let v: VertexId = fields.next()?.parse().ok()?;
	fields.next().is_none().then_some(Edge(u, v))
}

/// Collects `e <u> <v>` lines in file order; every other line is skipped.
pub fn parse_edges(text: &str) -> Vec<Edge> {
	let mut skipped = 0usize;
	let edges: Vec<Edge> = text
		.lines()
		.filter(|line| line.starts_with('e'))
		.filter_map(|line| {
			let edge = parse_edge_line(line);
			if edge.is_none() {
				skipped += 1;
				debug!("skipping malformed edge line: {line:?}");
			}
			edge
		})
		.collect();
	debug!("parsed {} edges ({skipped} malformed lines skipped)", edges.len());
	edges
}
