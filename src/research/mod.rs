//! Topic to graph pipeline: prompt, fetch, parse.

mod client;
mod error;
mod model;
mod parse;
mod prompt;
mod session;

use log::info;

pub use client::GeminiClient;
pub use error::GenerateError;
pub use model::{GraphData, GraphEdge, GraphNode, TOPIC_NODE_ID};
pub use parse::parse_graph;
pub use prompt::{Topic, build_prompt};
pub use session::{ResearchSession, Status};

/// Run one generation for `topic`: build the prompt, call the model once, parse the reply.
pub async fn generate_graph(
	client: &GeminiClient,
	topic: &Topic,
) -> Result<GraphData, GenerateError> {
	let prompt = build_prompt(topic);
	let text = client.generate(&prompt).await?;
	let graph = parse_graph(&text)?;
	info!(
		"generated graph for {:?}: {} nodes, {} edges",
		topic.as_str(),
		graph.nodes.len(),
		graph.edges.len()
	);
	Ok(graph)
}
