//! Connected-component labelling over the render model's link graph.

use std::collections::HashMap;

use super::types::{GraphLink, GraphNode, VertexId};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ModelError {
	/// A link references a vertex that is not in the node set.
	#[error("link {link} references vertex {vertex}, which is not in the node set")]
	DanglingLink { link: usize, vertex: VertexId },
}

/// Maps every node id to a cluster id.
///
/// Cluster ids are handed out sequentially from 0 in `nodes` order, so the
/// result depends on node order only, never on link order. Traversal uses an
/// explicit stack over node indices; a single long chain of 1000 nodes costs
/// heap, not call-stack depth.
pub fn detect(
	nodes: &[GraphNode],
	links: &[GraphLink],
) -> Result<HashMap<VertexId, usize>, ModelError> {
	let index: HashMap<VertexId, usize> = nodes
		.iter()
		.enumerate()
		.map(|(i, node)| (node.id, i))
		.collect();
	let lookup = |link: &GraphLink, vertex: VertexId| {
		index
			.get(&vertex)
			.copied()
			.ok_or(ModelError::DanglingLink {
				link: link.id,
				vertex,
			})
	};

	let mut adjacency: Vec<Vec<usize>> = vec![Vec::new(); nodes.len()];
	for link in links {
		let (src, tgt) = (lookup(link, link.source)?, lookup(link, link.target)?);
		adjacency[src].push(tgt);
		adjacency[tgt].push(src);
	}

	let mut cluster_of: Vec<Option<usize>> = vec![None; nodes.len()];
	let mut stack = Vec::new();
	let mut next_cluster = 0;

	for start in 0..nodes.len() {
		if cluster_of[start].is_some() {
			continue;
		}
		cluster_of[start] = Some(next_cluster);
		stack.push(start);
		while let Some(current) = stack.pop() {
			for &neighbor in &adjacency[current] {
				if cluster_of[neighbor].is_none() {
					cluster_of[neighbor] = Some(next_cluster);
					stack.push(neighbor);
				}
			}
		}
		next_cluster += 1;
	}

	Ok(nodes
		.iter()
		.zip(cluster_of)
		.filter_map(|(node, cluster)| cluster.map(|c| (node.id, c)))
		.collect())
}

/// Writes a cluster id into every node and returns the number of clusters.
pub fn assign_clusters(nodes: &mut [GraphNode], links: &[GraphLink]) -> Result<usize, ModelError> {
	let clusters = detect(nodes, links)?;
	let mut count = 0;
	for node in nodes.iter_mut() {
		node.cluster = clusters.get(&node.id).copied();
		if let Some(c) = node.cluster {
			count = count.max(c + 1);
		}
	}
	Ok(count)
}

#[cfg(test)]
mod tests {
	use std::collections::HashSet;

	use super::*;

	fn node(id: VertexId) -> GraphNode {
		GraphNode {
			id,
			size: 3.0,
			color: "#1890ff".into(),
			label: id.to_string(),
			cluster: None,
		}
	}

	fn link(id: usize, source: VertexId, target: VertexId) -> GraphLink {
		GraphLink {
			id,
			source,
			target,
			color: "#d9d9d9".into(),
			width: 0.5,
		}
	}

	fn links(pairs: &[(VertexId, VertexId)]) -> Vec<GraphLink> {
		pairs
			.iter()
			.enumerate()
			.map(|(i, &(s, t))| link(i, s, t))
			.collect()
	}

	/// Reference reachability by repeated relaxation, independent of `detect`.
	fn reachable(a: VertexId, b: VertexId, links: &[GraphLink]) -> bool {
		let mut seen = HashSet::from([a]);
		loop {
			let before = seen.len();
			for l in links {
				if seen.contains(&l.source) {
					seen.insert(l.target);
				}
				if seen.contains(&l.target) {
					seen.insert(l.source);
				}
			}
			if seen.len() == before {
				return seen.contains(&b);
			}
		}
	}

	#[test]
	fn two_components() {
		let mut nodes: Vec<_> = [1, 2, 3, 4, 5].into_iter().map(node).collect();
		let links = links(&[(1, 2), (2, 3), (4, 5)]);
		let count = assign_clusters(&mut nodes, &links).unwrap();
		assert_eq!(count, 2);
		let ids: Vec<_> = nodes.iter().map(|n| n.cluster.unwrap()).collect();
		assert_eq!(ids, vec![0, 0, 0, 1, 1]);
	}

	#[test]
	fn ids_follow_node_order_not_link_order() {
		let nodes: Vec<_> = [9, 7, 8].into_iter().map(node).collect();
		let clusters = detect(&nodes, &links(&[(8, 7)])).unwrap();
		assert_eq!(clusters[&9], 0);
		assert_eq!(clusters[&7], 1);
		assert_eq!(clusters[&8], 1);
	}

	#[test]
	fn isolated_nodes_get_their_own_cluster() {
		let mut nodes: Vec<_> = [1, 2, 3].into_iter().map(node).collect();
		assert_eq!(assign_clusters(&mut nodes, &[]).unwrap(), 3);
	}

	#[test]
	fn self_loop_does_not_merge() {
		let nodes: Vec<_> = [1, 2].into_iter().map(node).collect();
		let clusters = detect(&nodes, &links(&[(1, 1)])).unwrap();
		assert_ne!(clusters[&1], clusters[&2]);
	}

	#[test]
	fn long_chain_is_one_cluster() {
		let nodes: Vec<_> = (0..1000).map(node).collect();
		let pairs: Vec<_> = (0..999).map(|i| (i, i + 1)).collect();
		let clusters = detect(&nodes, &links(&pairs)).unwrap();
		assert!(clusters.values().all(|&c| c == 0));
		assert_eq!(clusters.len(), 1000);
	}

	#[test]
	fn dangling_link_is_reported() {
		let nodes: Vec<_> = [1, 2].into_iter().map(node).collect();
		let err = detect(&nodes, &links(&[(1, 2), (2, 42)])).unwrap_err();
		assert_eq!(err, ModelError::DanglingLink { link: 1, vertex: 42 });
	}

	#[test]
	fn partition_and_reachability() {
		let ids: Vec<VertexId> = (0..40).map(|i| i * 3 + 1).collect();
		let nodes: Vec<_> = ids.iter().copied().map(node).collect();
		let pairs: Vec<_> = (0..40)
			.filter(|i| i % 5 != 4)
			.map(|i| (ids[i], ids[(i * 7 + 3) % 40]))
			.collect();
		let links = links(&pairs);
		let clusters = detect(&nodes, &links).unwrap();

		assert_eq!(
			clusters.keys().copied().collect::<HashSet<_>>(),
			ids.iter().copied().collect::<HashSet<_>>()
		);
		for &a in &ids {
			for &b in &ids {
				assert_eq!(clusters[&a] == clusters[&b], reachable(a, b, &links), "{a} {b}");
			}
		}
	}
}
