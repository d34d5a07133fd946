//! Indexed graph built once from a [`GraphData`] document.
//!
//! Nodes and edges live in flat arenas; every cross reference (edge
//! endpoints, connections) is a [`NodeIdx`] into the node arena.

use std::collections::HashMap;

use super::error::{Endpoint, GraphError};
use super::types::GraphData;

/// Position of a node in the arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeIdx(pub usize);

/// Directed adjacency record, created for both endpoints of every edge.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Connection {
	/// The node at the other end.
	pub target: NodeIdx,
	/// The edge's value.
	pub distance: f64,
}

/// A document node plus its resolved adjacency.
#[derive(Clone, Debug)]
pub struct Node {
	/// Unique within the graph.
	pub id: String,
	/// Cluster key; nodes sharing it share a color.
	pub group: String,
	pub name: String,
	pub keywords: Vec<String>,
	pub img: String,
	pub source: String,
	pub url: String,
	/// One entry per incident edge, loops counted once.
	pub connections: Vec<Connection>,
}

/// An edge with both endpoints resolved.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Edge {
	pub source: NodeIdx,
	pub target: NodeIdx,
	/// Strictly positive weight.
	pub value: f64,
}

impl Edge {
	/// Whether both endpoints are the same node.
	pub fn is_loop(&self) -> bool {
		self.source == self.target
	}
}

/// Immutable topology of one session.
#[derive(Clone, Debug, Default)]
pub struct Graph {
	nodes: Vec<Node>,
	edges: Vec<Edge>,
	index: HashMap<String, NodeIdx>,
}

impl Graph {
	/// Resolves every edge against the node set.
	///
	/// Fails on the first edge whose endpoint is missing, on duplicate node
	/// ids, and on weights that are not finite and positive.
	pub fn from_data(data: &GraphData) -> Result<Self, GraphError> {
		let mut index = HashMap::with_capacity(data.nodes.len());
		let mut nodes = Vec::with_capacity(data.nodes.len());

		for (i, node) in data.nodes.iter().enumerate() {
			if index.insert(node.id.clone(), NodeIdx(i)).is_some() {
				return Err(GraphError::DuplicateNode {
					id: node.id.clone(),
				});
			}
			nodes.push(Node {
				id: node.id.clone(),
				group: node.group.clone(),
				name: node.name.clone(),
				keywords: node.keywords.clone(),
				img: node.img.clone(),
				source: node.source.clone(),
				url: node.url.clone(),
				connections: Vec::new(),
			});
		}

		let resolve = |edge: usize, end: Endpoint, id: &str| {
			index
				.get(id)
				.copied()
				.ok_or_else(|| GraphError::UnknownEndpoint {
					edge,
					end,
					id: id.to_owned(),
				})
		};

		let mut edges = Vec::with_capacity(data.edges.len());
		for (i, link) in data.edges.iter().enumerate() {
			let source = resolve(i, Endpoint::Source, &link.source)?;
			let target = resolve(i, Endpoint::Target, &link.target)?;
			if !(link.value.is_finite() && link.value > 0.0) {
				return Err(GraphError::InvalidWeight {
					edge: i,
					value: link.value,
				});
			}
			edges.push(Edge {
				source,
				target,
				value: link.value,
			});
		}

		for edge in &edges {
			nodes[edge.source.0].connections.push(Connection {
				target: edge.target,
				distance: edge.value,
			});
			// A loop touches its node once.
			if !edge.is_loop() {
				nodes[edge.target.0].connections.push(Connection {
					target: edge.source,
					distance: edge.value,
				});
			}
		}

		Ok(Self {
			nodes,
			edges,
			index,
		})
	}

	/// Panics when `idx` did not come from this graph.
	pub fn node(&self, idx: NodeIdx) -> &Node {
		&self.nodes[idx.0]
	}

	/// All nodes in document order.
	pub fn nodes(&self) -> &[Node] {
		&self.nodes
	}

	/// All edges in document order, endpoints resolved.
	pub fn edges(&self) -> &[Edge] {
		&self.edges
	}

	/// Arena index of the node with `id`.
	pub fn lookup(&self, id: &str) -> Option<NodeIdx> {
		self.index.get(id).copied()
	}

	/// Every valid index, in order.
	pub fn node_indices(&self) -> impl Iterator<Item = NodeIdx> + '_ {
		(0..self.nodes.len()).map(NodeIdx)
	}

	/// Number of nodes.
	pub fn len(&self) -> usize {
		self.nodes.len()
	}

	pub fn is_empty(&self) -> bool {
		self.nodes.is_empty()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::keyword_graph::types::{GraphLink, GraphNode};

	fn data(nodes: &[&str], edges: &[(&str, &str, f64)]) -> GraphData {
		GraphData {
			nodes: nodes.iter().map(|id| GraphNode::new(*id, "g1")).collect(),
			edges: edges
				.iter()
				.map(|(s, t, v)| GraphLink::new(*s, *t, *v))
				.collect(),
		}
	}

	#[test]
	fn connections_are_symmetric() {
		let graph = Graph::from_data(&data(
			&["a", "b", "c"],
			&[("a", "b", 1.0), ("b", "c", 2.0)],
		))
		.unwrap();
		let b = graph.lookup("b").unwrap();
		let c = graph.lookup("c").unwrap();

		assert_eq!(graph.node(graph.lookup("a").unwrap()).connections.len(), 1);
		assert_eq!(graph.node(b).connections.len(), 2);
		assert_eq!(
			graph.node(c).connections,
			vec![Connection {
				target: b,
				distance: 2.0
			}]
		);
	}

	#[test]
	fn every_edge_endpoint_resolves() {
		let graph = Graph::from_data(&data(
			&["a", "b", "c", "d"],
			&[("a", "b", 1.0), ("c", "a", 1.0), ("d", "b", 4.0)],
		))
		.unwrap();
		for edge in graph.edges() {
			assert!(edge.source.0 < graph.len());
			assert!(edge.target.0 < graph.len());
		}
		let touching = |idx: NodeIdx| {
			graph
				.edges()
				.iter()
				.filter(|e| e.source == idx || e.target == idx)
				.count()
		};
		for idx in graph.node_indices() {
			assert_eq!(graph.node(idx).connections.len(), touching(idx));
		}
	}

	#[test]
	fn unknown_target_is_rejected() {
		let err = Graph::from_data(&data(&["a"], &[("a", "ghost", 1.0)])).unwrap_err();
		match err {
			GraphError::UnknownEndpoint { edge, end, id } => {
				assert_eq!(edge, 0);
				assert_eq!(end, Endpoint::Target);
				assert_eq!(id, "ghost");
			}
			other => panic!("unexpected error: {other}"),
		}
	}

	#[test]
	fn duplicate_ids_are_rejected() {
		let err = Graph::from_data(&data(&["a", "a"], &[])).unwrap_err();
		assert!(matches!(err, GraphError::DuplicateNode { .. }));
	}

	#[test]
	fn non_positive_weight_is_rejected() {
		let err = Graph::from_data(&data(&["a", "b"], &[("a", "b", 0.0)])).unwrap_err();
		assert!(matches!(err, GraphError::InvalidWeight { edge: 0, .. }));
		let err = Graph::from_data(&data(&["a", "b"], &[("a", "b", f64::NAN)])).unwrap_err();
		assert!(matches!(err, GraphError::InvalidWeight { .. }));
	}

	#[test]
	fn self_loop_adds_a_single_connection() {
		let graph = Graph::from_data(&data(&["a"], &[("a", "a", 1.0)])).unwrap();
		assert_eq!(graph.nodes()[0].connections.len(), 1);
		assert!(graph.edges()[0].is_loop());
	}

	#[test]
	fn empty_document_is_valid() {
		let graph = Graph::from_data(&GraphData::default()).unwrap();
		assert!(graph.is_empty());
		assert!(graph.edges().is_empty());
	}
}
