//! Whisper-compatible speech-to-text client (`POST /audio/transcriptions`).

use analysis_ai::error::{
    http_status_error, input_error, parse_error, schema_error, transport_error, Error,
};
use analysis_ai::traits::transcription::Provider;
use analysis_ai::AudioClip;
use async_trait::async_trait;
use log::*;
use provider_auth::api_key::{ApiKeyProvider, BearerTokenAuth, ProviderAuth};
use reqwest::multipart;
use secrecy::SecretString;
use serde_json::Value;

pub const DEFAULT_MODEL: &str = "whisper-1";

/// Whisper transcription client
pub struct WhisperClient {
    client: reqwest::Client,
    base_url: String,
}

impl WhisperClient {
    /// Create a new transcription client over `client`.
    pub fn new(client: reqwest::Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl Provider for WhisperClient {
    async fn transcribe(
        &self,
        clip: &AudioClip,
        credentials: &SecretString,
        model: &str,
    ) -> Result<String, Error> {
        let auth = BearerTokenAuth::new(ApiKeyProvider::Transcription, credentials.clone())
            .map_err(|e| {
                warn!("Refusing to call transcription endpoint: {}", e.detail());
                Error::from(e)
            })?;

        if clip.bytes.is_empty() {
            return Err(input_error(format!("audio clip {} is empty", clip.file_name)));
        }

        let url = format!("{}/audio/transcriptions", self.base_url);
        let form = multipart::Form::new().text("model", model.to_string()).part(
            "file",
            multipart::Part::bytes(clip.bytes.clone()).file_name(clip.file_name.clone()),
        );

        debug!(
            "Sending {} ({} bytes) to transcription model {} (auth={}/{:?})",
            clip.file_name,
            clip.bytes.len(),
            model,
            auth.provider().as_str(),
            auth.auth_method()
        );

        let response = auth
            .authenticate(self.client.post(&url))
            .multipart(form)
            .send()
            .await
            .map_err(|e| {
                warn!("Failed to reach transcription endpoint: {:?}", e);
                transport_error(e)
            })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            warn!("Failed to read transcription response body: {:?}", e);
            transport_error(e)
        })?;

        if !status.is_success() {
            error!("Transcription API returned {}: {}", status, body);
            return Err(http_status_error(status.as_u16(), body));
        }

        let value: Value = match serde_json::from_str(&body) {
            Ok(value) => value,
            Err(e) => {
                warn!("Failed to parse transcription response: {:?}", e);
                return Err(parse_error(e, body));
            }
        };

        match value.get("text").and_then(Value::as_str) {
            Some(text) => Ok(text.trim().to_string()),
            None => Err(schema_error("missing required field `text`", body)),
        }
    }

    fn provider_id(&self) -> &str {
        "whisper"
    }
}
