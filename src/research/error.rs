use std::fmt;

/// Why a generation request produced no graph.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GenerateError {
	/// No API key was configured; nothing was sent.
	MissingApiKey,
	/// The request never produced an HTTP response.
	Transport(String),
	/// The provider answered with a non-success status.
	Status {
		/// HTTP status code.
		code: u16,
		/// HTTP status text.
		text: String,
	},
	/// The response envelope carried no candidate text.
	EmptyPayload,
	/// The candidate text was not a valid graph document.
	Parse(String),
}

impl fmt::Display for GenerateError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::MissingApiKey => {
				f.write_str("Missing API key: set GEMINI_API_KEY when building the app")
			}
			Self::Transport(msg) => write!(f, "Request failed: {msg}"),
			Self::Status { code, text } if text.is_empty() => {
				write!(f, "API request failed with status {code}")
			}
			Self::Status { code, text } => {
				write!(f, "API request failed with status {code} {text}")
			}
			Self::EmptyPayload => f.write_str("The model returned an empty response"),
			Self::Parse(msg) => write!(f, "Could not parse graph JSON: {msg}"),
		}
	}
}

impl std::error::Error for GenerateError {}

impl From<serde_json::Error> for GenerateError {
	fn from(err: serde_json::Error) -> Self {
		Self::Parse(err.to_string())
	}
}

impl From<gloo_net::Error> for GenerateError {
	fn from(err: gloo_net::Error) -> Self {
		Self::Transport(err.to_string())
	}
}
