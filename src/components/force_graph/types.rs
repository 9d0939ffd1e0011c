use crate::research::{GraphData, TOPIC_NODE_ID};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FgNode {
	pub id: String,
	pub name: String,
	pub description: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FgLink {
	pub source: String,
	pub target: String,
	pub relation: Option<String>,
}

/// Node/link lists in the shape the canvas consumes.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RenderGraph {
	pub nodes: Vec<FgNode>,
	pub links: Vec<FgLink>,
}

impl RenderGraph {
	/// Position of the topic node, picked the same way as [`GraphData::topic_index`].
	pub fn topic_index(&self) -> Option<usize> {
		self.nodes
			.iter()
			.position(|n| n.id == TOPIC_NODE_ID)
			.or_else(|| (!self.nodes.is_empty()).then_some(0))
	}
}

impl From<&GraphData> for RenderGraph {
	fn from(data: &GraphData) -> Self {
		Self {
			nodes: data
				.nodes
				.iter()
				.map(|n| FgNode {
					id: n.id.clone(),
					name: n.label.clone(),
					description: n.description.clone(),
				})
				.collect(),
			links: data
				.edges
				.iter()
				.map(|e| FgLink {
					source: e.from.clone(),
					target: e.to.clone(),
					relation: e.relation.clone(),
				})
				.collect(),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::research::{GraphEdge, GraphNode, parse_graph};

	#[test]
	fn single_node_graph_maps_to_one_named_node() {
		let data = parse_graph(r#"{"nodes":[{"id":"topic","label":"T"}],"edges":[]}"#).unwrap();
		let render = RenderGraph::from(&data);
		assert_eq!(render.nodes.len(), 1);
		assert_eq!(render.nodes[0].name, "T");
		assert!(render.links.is_empty());
		assert_eq!(render.topic_index(), Some(0));
	}

	#[test]
	fn adapter_round_trips_by_id() {
		let data = GraphData {
			nodes: vec![
				GraphNode {
					id: "topic".into(),
					label: "Photosynthesis".into(),
					description: Some("Light to sugar.".into()),
				},
				GraphNode {
					id: "chlorophyll".into(),
					label: "Chlorophyll".into(),
					description: None,
				},
			],
			edges: vec![
				GraphEdge {
					from: "topic".into(),
					to: "chlorophyll".into(),
					relation: Some("depends on".into()),
				},
				GraphEdge {
					from: "chlorophyll".into(),
					to: "missing".into(),
					relation: None,
				},
			],
		};

		let render = RenderGraph::from(&data);
		let back = GraphData {
			nodes: render
				.nodes
				.iter()
				.map(|n| GraphNode {
					id: n.id.clone(),
					label: n.name.clone(),
					description: n.description.clone(),
				})
				.collect(),
			edges: render
				.links
				.iter()
				.map(|l| GraphEdge {
					from: l.source.clone(),
					to: l.target.clone(),
					relation: l.relation.clone(),
				})
				.collect(),
		};

		for node in &data.nodes {
			assert_eq!(back.node(&node.id), Some(node));
		}
		assert_eq!(back.edges, data.edges);
		assert_eq!(render.topic_index(), data.topic_index());
	}

	#[test]
	fn topic_position_agrees_with_model_when_ids_repeat() {
		let data = parse_graph(
			r#"{
				"nodes": [
					{"id": "a", "label": "A"},
					{"id": "topic", "label": "T1"},
					{"id": "topic", "label": "T2"}
				],
				"edges": []
			}"#,
		)
		.unwrap();
		let render = RenderGraph::from(&data);
		assert_eq!(render.topic_index(), Some(1));
		assert_eq!(render.topic_index(), data.topic_index());
	}
}
