//! API configuration baked in at build time.

/// Default generative model used when `GEMINI_MODEL` is not set.
pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";

/// Base URL of the generative-language model endpoints.
pub const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// Settings for the graph fetch client.
///
/// The key is optional here so a missing key surfaces as a generation error
/// in the UI instead of failing the build or panicking at startup.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ApiConfig {
	/// Provider API key, `None` when absent or blank.
	pub api_key: Option<String>,
	/// Model identifier embedded in the request URL.
	pub model: String,
	/// Base URL the model path is appended to.
	pub endpoint: String,
}

impl ApiConfig {
	/// Build a config from explicit values. Blank keys are treated as missing.
	pub fn new(api_key: Option<String>, model: impl Into<String>) -> Self {
		Self {
			api_key: api_key.filter(|k| !k.trim().is_empty()),
			model: model.into(),
			endpoint: DEFAULT_ENDPOINT.into(),
		}
	}

	/// Read `GEMINI_API_KEY` and `GEMINI_MODEL` from the build environment.
	pub fn from_build_env() -> Self {
		Self::new(
			option_env!("GEMINI_API_KEY").map(str::to_owned),
			option_env!("GEMINI_MODEL").unwrap_or(DEFAULT_MODEL),
		)
	}

	/// Point the client at a different endpoint base.
	pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
		self.endpoint = endpoint.into();
		self
	}

	/// Whether a usable key is present.
	pub fn has_key(&self) -> bool {
		self.api_key.is_some()
	}
}

impl Default for ApiConfig {
	fn default() -> Self {
		Self::from_build_env()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn blank_key_counts_as_missing() {
		let config = ApiConfig::new(Some("   ".into()), DEFAULT_MODEL);
		assert!(!config.has_key());
		assert_eq!(config.api_key, None);
	}

	#[test]
	fn explicit_key_and_model_are_kept() {
		let config = ApiConfig::new(Some("abc123".into()), "gemini-test")
			.with_endpoint("http://localhost:9000/models");
		assert!(config.has_key());
		assert_eq!(config.model, "gemini-test");
		assert_eq!(config.endpoint, "http://localhost:9000/models");
	}
}
