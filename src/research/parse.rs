use log::warn;

use super::error::GenerateError;
use super::model::GraphData;

/// Parse the model's text as a graph document.
///
/// The text must be bare JSON. Optional fields default to absent, required
/// ones fail the parse. Edges naming unknown nodes are kept here and dropped
/// by the layout. Repeated ids are kept too; lookups resolve to the last one.
pub fn parse_graph(text: &str) -> Result<GraphData, GenerateError> {
	let data: GraphData = serde_json::from_str(text)?;
	for id in data.duplicate_ids() {
		warn!("node id {id:?} appears more than once; the last node wins lookups");
	}
	for edge in data.dangling_edges() {
		warn!(
			"edge {} -> {} references a missing node and will not be drawn",
			edge.from, edge.to
		);
	}
	Ok(data)
}
