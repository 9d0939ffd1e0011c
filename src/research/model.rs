//! Graph snapshot returned by one generation request.

use std::collections::HashSet;

use serde::Deserialize;

/// Id the prompt asks the model to give the topic node.
pub const TOPIC_NODE_ID: &str = "topic";

/// A concept in the generated graph.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct GraphNode {
	/// Unique within one graph.
	pub id: String,
	/// Short display name.
	pub label: String,
	/// One or two sentences, when the model supplied them.
	#[serde(default)]
	pub description: Option<String>,
}

/// Directed connection between two nodes.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct GraphEdge {
	/// Source node id.
	pub from: String,
	/// Target node id.
	pub to: String,
	/// Why the two nodes are connected.
	#[serde(default)]
	pub relation: Option<String>,
}

/// Immutable snapshot of one generated graph.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct GraphData {
	/// All nodes, topic node included.
	pub nodes: Vec<GraphNode>,
	/// All edges, in the order the model returned them.
	pub edges: Vec<GraphEdge>,
}

impl GraphData {
	/// Position of the topic node: the first node with id `"topic"`, else the first node.
	///
	/// The topic is decided by position so that a duplicated `"topic"` id still
	/// yields exactly one topic node.
	pub fn topic_index(&self) -> Option<usize> {
		self.nodes
			.iter()
			.position(|n| n.id == TOPIC_NODE_ID)
			.or_else(|| (!self.nodes.is_empty()).then_some(0))
	}

	/// The node standing for the submitted topic.
	pub fn topic_node(&self) -> Option<&GraphNode> {
		self.topic_index().map(|i| &self.nodes[i])
	}

	/// Every node except the topic node.
	pub fn related_nodes(&self) -> impl Iterator<Item = &GraphNode> {
		let topic = self.topic_index();
		self.nodes
			.iter()
			.enumerate()
			.filter(move |(i, _)| Some(*i) != topic)
			.map(|(_, n)| n)
	}

	/// Look a node up by id. When ids repeat, the last node with that id wins,
	/// matching the canvas id index.
	pub fn node(&self, id: &str) -> Option<&GraphNode> {
		self.nodes.iter().rev().find(|n| n.id == id)
	}

	/// Ids that name more than one node, in first-repeat order.
	pub fn duplicate_ids(&self) -> Vec<&str> {
		let mut seen = HashSet::new();
		let mut repeated = Vec::new();
		for node in &self.nodes {
			let id = node.id.as_str();
			if !seen.insert(id) && !repeated.contains(&id) {
				repeated.push(id);
			}
		}
		repeated
	}

	/// Relation label of the first edge joining `a` and `b` in either direction.
	pub fn relation_between(&self, a: &str, b: &str) -> Option<&str> {
		self.edges
			.iter()
			.find(|e| (e.from == a && e.to == b) || (e.from == b && e.to == a))
			.and_then(|e| e.relation.as_deref())
	}

	/// Edges whose `from` or `to` names no node in this graph.
	pub fn dangling_edges(&self) -> Vec<&GraphEdge> {
		let ids: HashSet<&str> = self.nodes.iter().map(|n| n.id.as_str()).collect();
		self.edges
			.iter()
			.filter(|e| !ids.contains(e.from.as_str()) || !ids.contains(e.to.as_str()))
			.collect()
	}

	/// True before anything was generated or when the model returned no nodes.
	pub fn is_empty(&self) -> bool {
		self.nodes.is_empty()
	}
}
