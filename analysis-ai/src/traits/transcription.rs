//! Transcription provider trait.

use crate::types::transcription::AudioClip;
use crate::Error;
use async_trait::async_trait;
use secrecy::SecretString;

/// Abstraction for speech-to-text services (Whisper-compatible endpoints).
///
/// The returned text feeds the analysis pipeline the same way typed input does.
#[cfg_attr(feature = "mock", mockall::automock)]
#[async_trait]
pub trait Provider: Send + Sync {
    /// Transcribe `clip` with `model` and return the recognised text.
    ///
    /// Fails with `Stage::Auth` before any network call when the credential is
    /// missing, and with `Stage::Input` when the clip holds no audio.
    async fn transcribe(
        &self,
        clip: &AudioClip,
        credentials: &SecretString,
        model: &str,
    ) -> std::result::Result<String, Error>;

    /// Return unique identifier for this provider (e.g., "whisper").
    fn provider_id(&self) -> &str;
}
