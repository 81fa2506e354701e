//! Gemini API client for transcript analysis.
//!
//! Sends a single `generateContent` request per call and returns the text of
//! the first candidate. Credentials are supplied per call as a `key` query
//! parameter; the client itself holds none.

use analysis_ai::error::{http_status_error, parse_error, schema_error, transport_error, Error};
use analysis_ai::traits::analysis::Provider;
use async_trait::async_trait;
use log::*;
use provider_auth::api_key::{ApiKeyAuth, ProviderAuth};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};

pub const DEFAULT_API_VERSION: &str = "v1";
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

/// Request body for `models/{model}:generateContent`
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    pub contents: Vec<Content>,
    /// Present only when JSON output is requested
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generation_config: Option<GenerationConfig>,
}

/// Content block holding one or more parts
#[derive(Debug, Serialize, Deserialize)]
pub struct Content {
    #[serde(default)]
    pub parts: Vec<Part>,
}

/// Text part of a content block
#[derive(Debug, Serialize, Deserialize)]
pub struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

/// Generation settings sent alongside the prompt
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    pub response_mime_type: String,
}

/// Response envelope from `generateContent`
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    #[serde(default)]
    pub prompt_feedback: Option<PromptFeedback>,
}

/// One generated candidate
#[derive(Debug, Deserialize)]
pub struct Candidate {
    #[serde(default)]
    pub content: Option<Content>,
}

/// Why a prompt was blocked, when it was
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptFeedback {
    #[serde(default)]
    pub block_reason: Option<String>,
}

impl GenerateContentRequest {
    /// Build a request carrying `prompt` as its only content.
    pub fn new(prompt: &str, structured: bool) -> Self {
        Self {
            contents: vec![Content {
                parts: vec![Part {
                    text: Some(prompt.to_string()),
                }],
            }],
            generation_config: structured.then(|| GenerationConfig {
                response_mime_type: "application/json".to_string(),
            }),
        }
    }
}

impl GenerateContentResponse {
    /// Text at `candidates[0].content.parts[0].text`, if present.
    pub fn first_text(&self) -> Option<&str> {
        self.candidates
            .first()
            .and_then(|candidate| candidate.content.as_ref())
            .and_then(|content| content.parts.first())
            .and_then(|part| part.text.as_deref())
    }

    fn block_reason(&self) -> Option<&str> {
        self.prompt_feedback
            .as_ref()
            .and_then(|feedback| feedback.block_reason.as_deref())
    }
}

/// Gemini API client
pub struct GeminiClient {
    client: reqwest::Client,
    base_url: String,
    api_version: String,
}

impl GeminiClient {
    /// Create a new Gemini client over `client`.
    pub fn new(client: reqwest::Client, base_url: &str, api_version: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_version: api_version.to_string(),
        }
    }

    fn endpoint(&self, model: &str) -> String {
        format!(
            "{}/{}/models/{}:generateContent",
            self.base_url, self.api_version, model
        )
    }
}

#[async_trait]
impl Provider for GeminiClient {
    async fn send(
        &self,
        prompt: &str,
        credentials: &SecretString,
        model: &str,
        structured: bool,
    ) -> Result<String, Error> {
        // Validated before any request is built: a bad key is never sent.
        let auth = ApiKeyAuth::new(credentials.clone()).map_err(|e| {
            warn!("Refusing to call Gemini: {}", e.detail());
            Error::from(e)
        })?;

        debug!(
            "Sending {} char prompt to Gemini model {} (json_response={}, auth={}/{:?})",
            prompt.len(),
            model,
            structured,
            auth.provider().as_str(),
            auth.auth_method()
        );

        let request = GenerateContentRequest::new(prompt, structured);
        let response = auth
            .authenticate(self.client.post(self.endpoint(model)))
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                let e = e.without_url();
                warn!("Failed to reach Gemini: {:?}", e);
                transport_error(e)
            })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            let e = e.without_url();
            warn!("Failed to read Gemini response body: {:?}", e);
            transport_error(e)
        })?;

        if !status.is_success() {
            error!("Gemini API returned {}: {}", status, body);
            return Err(http_status_error(status.as_u16(), body));
        }

        let envelope: GenerateContentResponse = match serde_json::from_str(&body) {
            Ok(envelope) => envelope,
            Err(e) => {
                warn!("Failed to parse Gemini response envelope: {:?}", e);
                return Err(parse_error(e, body));
            }
        };

        match envelope.first_text() {
            Some(text) => {
                info!("Gemini model {} returned {} chars", model, text.len());
                Ok(text.to_string())
            }
            None => {
                let message = match envelope.block_reason() {
                    Some(reason) => format!(
                        "missing required field `candidates[0].content.parts[0].text` (prompt blocked: {})",
                        reason
                    ),
                    None => "missing required field `candidates[0].content.parts[0].text`".to_string(),
                };
                warn!("Gemini response has no candidate text: {}", body);
                Err(schema_error(message, body))
            }
        }
    }

    fn provider_id(&self) -> &str {
        "gemini"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use analysis_ai::Stage;
    use mockito::{Matcher, Server, ServerGuard};
    use serde_json::json;

    const MODEL_PATH: &str = "/v1/models/gemini-2.5-flash:generateContent";
    const TEST_KEY: &str = "AIza-test-key";

    async fn setup_test_server() -> ServerGuard {
        Server::new_async().await
    }

    fn client_for(server: &ServerGuard) -> GeminiClient {
        GeminiClient::new(reqwest::Client::new(), &server.url(), DEFAULT_API_VERSION)
    }

    fn key(value: &str) -> SecretString {
        SecretString::new(value.to_string())
    }

    fn envelope(text: &str) -> String {
        json!({
            "candidates": [{
                "content": { "parts": [{ "text": text }], "role": "model" },
                "finishReason": "STOP"
            }]
        })
        .to_string()
    }

    #[test]
    fn test_request_body_adds_json_directive_only_when_structured() {
        let structured = serde_json::to_value(GenerateContentRequest::new("hi", true)).unwrap();
        assert_eq!(
            structured,
            json!({
                "contents": [{ "parts": [{ "text": "hi" }] }],
                "generationConfig": { "responseMimeType": "application/json" }
            })
        );

        let free_text = serde_json::to_value(GenerateContentRequest::new("hi", false)).unwrap();
        assert_eq!(free_text, json!({ "contents": [{ "parts": [{ "text": "hi" }] }] }));
    }

    #[tokio::test]
    async fn test_send_returns_nested_candidate_text() {
        let mut server = setup_test_server().await;
        let reply = r#"{"summary": "ok"}"#;

        let mock = server
            .mock("POST", MODEL_PATH)
            .match_query(Matcher::UrlEncoded("key".into(), TEST_KEY.into()))
            .match_body(Matcher::PartialJson(json!({
                "contents": [{ "parts": [{ "text": "analyze this" }] }],
                "generationConfig": { "responseMimeType": "application/json" }
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(envelope(reply))
            .create_async()
            .await;

        let text = client_for(&server)
            .send("analyze this", &key(TEST_KEY), DEFAULT_MODEL, true)
            .await
            .unwrap();

        assert_eq!(text, reply);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_empty_credential_never_reaches_the_network() {
        let mut server = setup_test_server().await;
        let mock = server
            .mock("POST", Matcher::Any)
            .expect(0)
            .create_async()
            .await;

        for bad_key in ["", "   ", "not-a-gemini-key"] {
            let err = client_for(&server)
                .send("analyze this", &key(bad_key), DEFAULT_MODEL, true)
                .await
                .unwrap_err();
            assert_eq!(err.stage, Stage::Auth, "key {:?}", bad_key);
        }

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_rate_limited_response_is_http_status_error() {
        let mut server = setup_test_server().await;
        let _mock = server
            .mock("POST", MODEL_PATH)
            .match_query(Matcher::Any)
            .with_status(429)
            .with_body(r#"{"error":"rate limited"}"#)
            .create_async()
            .await;

        let err = client_for(&server)
            .send("analyze this", &key(TEST_KEY), DEFAULT_MODEL, true)
            .await
            .unwrap_err();

        assert_eq!(err.stage, Stage::HttpStatus);
        assert!(err.message.contains("429"));
        assert!(err.message.contains("rate limited"));
        assert_eq!(err.raw_payload.as_deref(), Some(r#"{"error":"rate limited"}"#));
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_transport_error() {
        let client = GeminiClient::new(
            reqwest::Client::new(),
            &crate::gateway::closed_endpoint(),
            DEFAULT_API_VERSION,
        );

        let err = client
            .send("analyze this", &key(TEST_KEY), DEFAULT_MODEL, false)
            .await
            .unwrap_err();

        assert_eq!(err.stage, Stage::Transport);
        assert!(!err.message.contains(TEST_KEY));
    }

    #[tokio::test]
    async fn test_non_json_envelope_is_parse_error() {
        let mut server = setup_test_server().await;
        let _mock = server
            .mock("POST", MODEL_PATH)
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body("<html>gateway</html>")
            .create_async()
            .await;

        let err = client_for(&server)
            .send("analyze this", &key(TEST_KEY), DEFAULT_MODEL, false)
            .await
            .unwrap_err();

        assert_eq!(err.stage, Stage::Parse);
        assert_eq!(err.raw_payload.as_deref(), Some("<html>gateway</html>"));
    }

    #[tokio::test]
    async fn test_blocked_prompt_is_schema_error_with_reason() {
        let mut server = setup_test_server().await;
        let _mock = server
            .mock("POST", MODEL_PATH)
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(json!({ "promptFeedback": { "blockReason": "SAFETY" } }).to_string())
            .create_async()
            .await;

        let err = client_for(&server)
            .send("analyze this", &key(TEST_KEY), DEFAULT_MODEL, true)
            .await
            .unwrap_err();

        assert_eq!(err.stage, Stage::Schema);
        assert!(err.message.contains("candidates[0].content.parts[0].text"));
        assert!(err.message.contains("SAFETY"));
    }

    #[test]
    fn test_endpoint_trims_trailing_slash() {
        let client = GeminiClient::new(reqwest::Client::new(), "https://example.test/", "v1beta");
        assert_eq!(
            client.endpoint("gemini-2.5-pro"),
            "https://example.test/v1beta/models/gemini-2.5-pro:generateContent"
        );
    }
}
