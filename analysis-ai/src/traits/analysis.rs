//! AI analysis provider trait.

use crate::Error;
use async_trait::async_trait;
use secrecy::SecretString;

/// Abstraction for the hosted generation endpoint that analyzes transcripts.
///
/// Implementations send one prompt per call and return the model's text.
/// Credentials and model are passed per call; providers hold no credential
/// state, so one provider value can serve concurrent callers.
#[cfg_attr(feature = "mock", mockall::automock)]
#[async_trait]
pub trait Provider: Send + Sync {
    /// Send `prompt` to `model` and return the generated text.
    ///
    /// When `structured` is true the request also asks the endpoint for a JSON
    /// response, rather than relying on the prompt wording alone.
    /// A missing or malformed credential fails with `Stage::Auth` before any
    /// network call. Exactly one attempt is made; there are no retries.
    async fn send(
        &self,
        prompt: &str,
        credentials: &SecretString,
        model: &str,
        structured: bool,
    ) -> std::result::Result<String, Error>;

    /// Return unique identifier for this provider (e.g., "gemini").
    ///
    /// Used for logging and selecting providers at runtime.
    fn provider_id(&self) -> &str;
}
