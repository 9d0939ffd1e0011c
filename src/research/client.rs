use gloo_net::http::Request;
use log::debug;
use serde::{Deserialize, Serialize};

use super::error::GenerateError;
use crate::config::ApiConfig;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest<'a> {
	contents: [Content<'a>; 1],
	generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
	role: &'static str,
	parts: [RequestPart<'a>; 1],
}

#[derive(Debug, Serialize)]
struct RequestPart<'a> {
	text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
	response_mime_type: &'static str,
}

impl<'a> GenerateRequest<'a> {
	fn new(prompt: &'a str) -> Self {
		Self {
			contents: [Content {
				role: "user",
				parts: [RequestPart { text: prompt }],
			}],
			generation_config: GenerationConfig {
				response_mime_type: "application/json",
			},
		}
	}
}

#[derive(Debug, Default, Deserialize)]
struct GenerateResponse {
	#[serde(default)]
	candidates: Vec<Candidate>,
}

#[derive(Debug, Default, Deserialize)]
struct Candidate {
	#[serde(default)]
	content: Option<CandidateContent>,
}

#[derive(Debug, Default, Deserialize)]
struct CandidateContent {
	#[serde(default)]
	parts: Vec<ResponsePart>,
}

#[derive(Debug, Default, Deserialize)]
struct ResponsePart {
	#[serde(default)]
	text: Option<String>,
}

impl GenerateResponse {
	/// `candidates[0].content.parts[0].text`, nothing else.
	fn into_text(self) -> Result<String, GenerateError> {
		self.candidates
			.into_iter()
			.next()
			.and_then(|c| c.content)
			.and_then(|c| c.parts.into_iter().next())
			.and_then(|p| p.text)
			.ok_or(GenerateError::EmptyPayload)
	}
}

/// Map a non-2xx HTTP status to [`GenerateError::Status`].
fn check_status(code: u16, text: String) -> Result<(), GenerateError> {
	if (200..300).contains(&code) {
		Ok(())
	} else {
		Err(GenerateError::Status { code, text })
	}
}

/// Pull the candidate text out of a 2xx response body.
///
/// A body that is not the expected envelope counts as an empty payload.
fn decode_envelope(body: &str) -> Result<String, GenerateError> {
	match serde_json::from_str::<GenerateResponse>(body) {
		Ok(envelope) => envelope.into_text(),
		Err(_) => Err(GenerateError::EmptyPayload),
	}
}

/// Single-shot client for the content-generation endpoint.
#[derive(Clone, Debug)]
pub struct GeminiClient {
	config: ApiConfig,
}

impl GeminiClient {
	/// Create a client bound to `config`.
	pub fn new(config: ApiConfig) -> Self {
		Self { config }
	}

	/// The config this client was built with.
	pub fn config(&self) -> &ApiConfig {
		&self.config
	}

	/// Full request URL, or `MissingApiKey` when there is no key to put in it.
	pub fn request_url(&self) -> Result<String, GenerateError> {
		let key = self
			.config
			.api_key
			.as_deref()
			.ok_or(GenerateError::MissingApiKey)?;
		Ok(format!(
			"{}/{}:generateContent?key={}",
			self.config.endpoint.trim_end_matches('/'),
			self.config.model,
			key
		))
	}

	/// Send `prompt` once and return the model's raw text.
	///
	/// No retries and no timeout.
	pub async fn generate(&self, prompt: &str) -> Result<String, GenerateError> {
		let url = self.request_url()?;
		let response = Request::post(&url)
			.json(&GenerateRequest::new(prompt))?
			.send()
			.await?;

		check_status(response.status(), response.status_text())?;
		let body = response.text().await?;
		let text = decode_envelope(&body)?;
		debug!("model returned {} bytes", text.len());
		Ok(text)
	}
}

#[cfg(test)]
mod tests {
	use rstest::rstest;
	use serde_json::json;

	use super::*;
	use crate::config::DEFAULT_MODEL;

	fn decode(value: serde_json::Value) -> Result<String, GenerateError> {
		decode_envelope(&value.to_string())
	}

	#[test]
	fn request_body_matches_the_provider_shape() {
		let body = serde_json::to_value(GenerateRequest::new("hello")).unwrap();
		assert_eq!(
			body,
			json!({
				"contents": [{ "role": "user", "parts": [{ "text": "hello" }] }],
				"generationConfig": { "responseMimeType": "application/json" }
			})
		);
	}

	#[test]
	fn url_embeds_model_and_key() {
		let config = ApiConfig::new(Some("k3y".into()), "gemini-x");
		let client = GeminiClient::new(config.with_endpoint("https://host/v1/models/"));
		assert_eq!(
			client.request_url().unwrap(),
			"https://host/v1/models/gemini-x:generateContent?key=k3y"
		);
	}

	#[test]
	fn missing_key_fails_before_any_request() {
		let client = GeminiClient::new(ApiConfig::new(None, DEFAULT_MODEL));
		assert_eq!(client.request_url(), Err(GenerateError::MissingApiKey));
	}

	#[rstest]
	#[case::ok(200)]
	#[case::no_content(204)]
	#[case::last_success(299)]
	fn success_statuses_pass(#[case] code: u16) {
		assert_eq!(check_status(code, String::new()), Ok(()));
	}

	#[rstest]
	#[case::unavailable(503, "Service Unavailable")]
	#[case::rate_limited(429, "Too Many Requests")]
	#[case::bad_key(400, "Bad Request")]
	#[case::redirect(302, "Found")]
	fn failing_statuses_become_status_errors(#[case] code: u16, #[case] text: &str) {
		let err = check_status(code, text.into()).unwrap_err();
		let expected = GenerateError::Status {
			code,
			text: text.into(),
		};
		assert_eq!(err, expected);
		assert!(err.to_string().contains(&code.to_string()));
	}

	#[test]
	fn first_part_text_is_extracted() {
		let text = decode(json!({
			"candidates": [
				{ "content": { "parts": [{ "text": "first" }, { "text": "second" }] } },
				{ "content": { "parts": [{ "text": "other candidate" }] } }
			]
		}));
		assert_eq!(text.unwrap(), "first");
	}

	#[test]
	fn missing_text_is_an_empty_payload() {
		for value in [
			json!({}),
			json!({ "candidates": [] }),
			json!({ "candidates": [{ "finishReason": "SAFETY" }] }),
			json!({ "candidates": [{ "content": { "parts": [] } }] }),
			json!({ "candidates": [{ "content": { "parts": [{ "inlineData": {} }] } }] }),
		] {
			assert_eq!(decode(value), Err(GenerateError::EmptyPayload));
		}
	}

	#[rstest]
	#[case::html_error_page("<html><body>Bad Gateway</body></html>")]
	#[case::empty_body("")]
	#[case::wrong_shape(r#"{"candidates": "none"}"#)]
	fn undecodable_body_is_an_empty_payload(#[case] body: &str) {
		assert_eq!(decode_envelope(body), Err(GenerateError::EmptyPayload));
	}
}
