//! API key authentication trait and implementation.

use reqwest::RequestBuilder;
use secrecy::{ExposeSecret, SecretString};

use crate::error::{api_key_error, ApiKeyErrorKind, Error};

/// Known API key providers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiKeyProvider {
    Gemini,
    Transcription,
}

impl ApiKeyProvider {
    /// Get the provider identifier string.
    pub fn as_str(&self) -> &'static str {
        match self {
            ApiKeyProvider::Gemini => "gemini",
            ApiKeyProvider::Transcription => "transcription",
        }
    }

    /// Prefix every well-formed key issued by this provider starts with.
    pub fn key_prefix(&self) -> Option<&'static str> {
        match self {
            ApiKeyProvider::Gemini => Some("AIza"),
            ApiKeyProvider::Transcription => None,
        }
    }
}

/// Authentication method for HTTP requests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthMethod {
    /// Key passed as a URL query parameter (e.g., `?key=xxx`)
    QueryParam { name: String },
    /// Standard Bearer token
    BearerToken,
}

/// Trait for authenticating HTTP requests with API keys or bearer tokens.
///
/// Implementations handle provider-specific authentication patterns like:
/// - Gemini: `?key=xxx` ([`ApiKeyAuth`])
/// - Whisper-compatible transcription: `Authorization: Bearer xxx`
///   ([`super::BearerTokenAuth`])
pub trait ProviderAuth: Send + Sync {
    /// Get the provider identifier.
    fn provider(&self) -> ApiKeyProvider;

    /// Get the authentication method used by this provider.
    fn auth_method(&self) -> AuthMethod;

    /// Apply authentication to a request builder.
    fn authenticate(&self, request: RequestBuilder) -> RequestBuilder;
}

/// Query-parameter key authentication for the Gemini API.
///
/// Construction validates the key, so holding an `ApiKeyAuth` means the
/// precondition for dispatching a request has already been checked.
///
/// # Examples
///
/// ```rust,ignore
/// let auth = ApiKeyAuth::new(SecretString::new("AIza...".to_string()))?;
/// let request = auth.authenticate(client.post(url));
/// ```
pub struct ApiKeyAuth {
    api_key: SecretString,
}

/// Query parameter that carries the Gemini key.
const KEY_PARAM: &str = "key";

impl ApiKeyAuth {
    /// Create a new Gemini key authenticator.
    ///
    /// Returns an error when the key is empty or does not look like a key
    /// issued by Gemini.
    pub fn new(api_key: SecretString) -> Result<Self, Error> {
        validate_key(ApiKeyProvider::Gemini, &api_key)?;
        Ok(Self { api_key })
    }
}

impl ProviderAuth for ApiKeyAuth {
    fn provider(&self) -> ApiKeyProvider {
        ApiKeyProvider::Gemini
    }

    fn auth_method(&self) -> AuthMethod {
        AuthMethod::QueryParam {
            name: KEY_PARAM.to_string(),
        }
    }

    fn authenticate(&self, request: RequestBuilder) -> RequestBuilder {
        request.query(&[(KEY_PARAM, self.api_key.expose_secret().as_str())])
    }
}

/// Reject keys that can never authenticate, before any request is built.
pub(crate) fn validate_key(provider: ApiKeyProvider, api_key: &SecretString) -> Result<(), Error> {
    let key = api_key.expose_secret();

    if key.trim().is_empty() {
        return Err(api_key_error(
            ApiKeyErrorKind::Missing,
            &format!("no API key provided for {}", provider.as_str()),
        ));
    }

    if key.chars().any(|c| c.is_whitespace() || c.is_control()) {
        return Err(api_key_error(
            ApiKeyErrorKind::InvalidFormat,
            &format!(
                "{} API key contains whitespace or control characters",
                provider.as_str()
            ),
        ));
    }

    if let Some(prefix) = provider.key_prefix() {
        if !key.starts_with(prefix) {
            return Err(api_key_error(
                ApiKeyErrorKind::InvalidFormat,
                &format!("{} API keys start with '{}'", provider.as_str(), prefix),
            ));
        }
    }

    Ok(())
}
