use std::sync::Arc;

use super::error::GenerateError;
use super::model::GraphData;
use super::prompt::Topic;

/// Where the current generation request stands.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum Status {
	/// Nothing submitted yet, or the last request succeeded.
	#[default]
	Idle,
	/// A request for this topic is in flight.
	Loading(Topic),
	/// The last request failed with this message.
	Failed(String),
}

/// Current graph plus selection, owned by the page and mutated only on the UI thread.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ResearchSession {
	graph: Option<Arc<GraphData>>,
	selected: Option<String>,
	status: Status,
}

impl ResearchSession {
	/// Fresh session with no graph.
	pub fn new() -> Self {
		Self::default()
	}

	/// Current graph, if the last request succeeded.
	pub fn graph(&self) -> Option<&Arc<GraphData>> {
		self.graph.as_ref()
	}

	/// Id of the selected node.
	pub fn selected(&self) -> Option<&str> {
		self.selected.as_deref()
	}

	/// Request status.
	pub fn status(&self) -> &Status {
		&self.status
	}

	/// Whether a request is in flight.
	pub fn is_loading(&self) -> bool {
		matches!(self.status, Status::Loading(_))
	}

	/// Error message of the last failed request.
	pub fn error(&self) -> Option<&str> {
		match &self.status {
			Status::Failed(msg) => Some(msg.as_str()),
			_ => None,
		}
	}

	/// Start a request for `input`.
	///
	/// Returns the topic to fetch, or `None` (and leaves the session untouched)
	/// when the input is blank or a request is already in flight. On success the
	/// current graph and selection are cleared.
	pub fn begin(&mut self, input: &str) -> Option<Topic> {
		if self.is_loading() {
			return None;
		}
		let topic = Topic::new(input)?;
		self.graph = None;
		self.selected = None;
		self.status = Status::Loading(topic.clone());
		Some(topic)
	}

	/// Record the outcome of the request started by [`Self::begin`].
	pub fn finish(&mut self, result: Result<GraphData, GenerateError>) {
		self.selected = None;
		match result {
			Ok(graph) => {
				self.graph = Some(Arc::new(graph));
				self.status = Status::Idle;
			}
			Err(err) => {
				self.graph = None;
				self.status = Status::Failed(err.to_string());
			}
		}
	}

	/// Select the node with `id`. Unknown ids clear the selection.
	pub fn select(&mut self, id: &str) {
		self.selected = self
			.graph
			.as_ref()
			.and_then(|g| g.node(id))
			.map(|n| n.id.clone());
	}

	/// Drop the selection.
	pub fn clear_selection(&mut self) {
		self.selected = None;
	}

	/// Apply a selection event from the canvas: `Some(id)` for a node click,
	/// `None` for a background click.
	pub fn apply_selection(&mut self, id: Option<&str>) {
		match id {
			Some(id) => self.select(id),
			None => self.clear_selection(),
		}
	}
}

#[cfg(test)]
mod tests {
	use rstest::{fixture, rstest};

	use super::*;
	use crate::research::parse::parse_graph;

	const TWO_NODES: &str = r#"{
		"nodes": [
			{"id": "topic", "label": "T"},
			{"id": "a", "label": "A", "description": "first"}
		],
		"edges": [{"from": "topic", "to": "a", "relation": "has"}]
	}"#;

	#[fixture]
	fn loaded() -> ResearchSession {
		let mut session = ResearchSession::new();
		session.begin("topic").unwrap();
		session.finish(parse_graph(TWO_NODES));
		session
	}

	#[rstest]
	#[case("")]
	#[case("    ")]
	fn blank_input_leaves_state_unchanged(loaded: ResearchSession, #[case] input: &str) {
		let mut session = loaded.clone();
		assert_eq!(session.begin(input), None);
		assert_eq!(session, loaded);
	}

	#[rstest]
	fn begin_clears_graph_and_blocks_a_second_request(mut loaded: ResearchSession) {
		let session = &mut loaded;
		session.select("a");
		let topic = session.begin("  neural nets ").unwrap();
		assert_eq!(topic.as_str(), "neural nets");
		assert!(session.is_loading());
		assert!(session.graph().is_none());
		assert_eq!(session.selected(), None);
		assert_eq!(session.begin("something else"), None);
	}

	#[test]
	fn single_node_response_has_no_related_nodes() {
		let mut session = ResearchSession::new();
		session.begin("T").unwrap();
		session.finish(parse_graph(
			r#"{"nodes":[{"id":"topic","label":"T"}],"edges":[]}"#,
		));
		let graph = session.graph().unwrap();
		assert_eq!(graph.nodes.len(), 1);
		assert_eq!(graph.related_nodes().count(), 0);
		assert_eq!(session.status(), &Status::Idle);
	}

	#[rstest]
	fn http_failure_reports_status_and_clears_graph(mut loaded: ResearchSession) {
		let session = &mut loaded;
		session.begin("again").unwrap();
		session.finish(Err(GenerateError::Status {
			code: 503,
			text: "Service Unavailable".into(),
		}));
		assert!(session.graph().is_none());
		assert!(session.error().unwrap().contains("503"));
		assert!(!session.is_loading());
	}

	#[test]
	fn unparseable_text_reports_parse_error() {
		let mut session = ResearchSession::new();
		session.begin("x").unwrap();
		session.finish(parse_graph("not json"));
		assert!(session.graph().is_none());
		let message = session.error().unwrap();
		assert!(message.starts_with("Could not parse graph JSON"));
	}

	#[rstest]
	fn node_click_then_background_click(mut loaded: ResearchSession) {
		loaded.apply_selection(Some("a"));
		assert_eq!(loaded.selected(), Some("a"));
		loaded.apply_selection(None);
		assert_eq!(loaded.selected(), None);
	}

	#[rstest]
	fn unknown_node_does_not_select(mut loaded: ResearchSession) {
		loaded.select("a");
		loaded.select("ghost");
		assert_eq!(loaded.selected(), None);
	}

	#[rstest]
	fn new_generation_resets_selection(mut loaded: ResearchSession) {
		loaded.select("topic");
		loaded.begin("next").unwrap();
		loaded.finish(parse_graph(TWO_NODES));
		assert_eq!(loaded.selected(), None);
		assert!(loaded.graph().is_some());
	}
}
