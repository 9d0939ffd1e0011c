use std::fmt;

/// A research topic: trimmed, never empty.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Topic(String);

impl Topic {
	/// Returns `None` for empty or whitespace-only input.
	pub fn new(input: &str) -> Option<Self> {
		let trimmed = input.trim();
		(!trimmed.is_empty()).then(|| Self(trimmed.to_owned()))
	}

	/// The topic text as typed, minus surrounding whitespace.
	pub fn as_str(&self) -> &str {
		&self.0
	}
}

impl fmt::Display for Topic {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0)
	}
}

/// Instruction sent to the model for `topic`.
pub fn build_prompt(topic: &Topic) -> String {
	format!(
		r#"You are a research assistant building a concept map.

Research topic: "{topic}"

Return a knowledge graph about this topic as a single JSON object with exactly this shape:
{{
  "nodes": [
    {{ "id": "topic", "label": "<short name of the topic>", "description": "<one or two sentences>" }},
    {{ "id": "<unique id>", "label": "<short name>", "description": "<one or two sentences>" }}
  ],
  "edges": [
    {{ "from": "<node id>", "to": "<node id>", "relation": "<short phrase describing the connection>" }}
  ]
}}

Rules:
- The first node must have the id "topic" and represent the research topic itself.
- Add between 4 and 8 additional nodes for closely related concepts, subfields, methods or applications.
- Every node id must be unique, and every edge must reference existing node ids.
- Every edge must have a relation.
- Respond with the JSON object only. Do not use markdown, code fences or comments."#
	)
}
