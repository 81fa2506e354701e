//! Error types for transcript analysis.

use std::error::Error as StdError;
use std::fmt;

/// Pipeline stage at which an analysis request failed.
///
/// Every stage fails closed: callers receive one of these instead of a
/// defaulted or partially populated result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Missing or malformed credential. Detected before anything is sent,
    /// so callers can tell "never sent" apart from "sent and rejected".
    Auth,

    /// Connection, DNS or I/O failure while talking to the endpoint.
    Transport,

    /// The endpoint answered with a non-2xx status. The message includes the
    /// status code and the response body.
    HttpStatus,

    /// The response text was not valid JSON where JSON was required.
    Parse,

    /// Valid JSON that lacks a required field or holds a value that cannot be
    /// coerced to the expected type.
    Schema,

    /// The request was rejected before a prompt was built (empty transcript,
    /// unreadable or empty audio clip).
    Input,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Auth => "auth",
            Stage::Transport => "transport",
            Stage::HttpStatus => "http_status",
            Stage::Parse => "parse",
            Stage::Schema => "schema",
            Stage::Input => "input",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned by every step of the analysis pipeline.
///
/// `raw_payload` holds the offending text for `HttpStatus`, `Parse` and
/// `Schema` failures so it can be shown for manual inspection.
#[derive(Debug)]
pub struct Error {
    pub source: Option<Box<dyn StdError + Send + Sync>>,
    pub stage: Stage,
    pub message: String,
    pub raw_payload: Option<String>,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.stage {
            Stage::Auth => write!(f, "Authentication failed: {}", self.message),
            Stage::Transport => write!(f, "Network error: {}", self.message),
            Stage::HttpStatus => write!(f, "HTTP error: {}", self.message),
            Stage::Parse => write!(f, "Parse error: {}", self.message),
            Stage::Schema => write!(f, "Schema error: {}", self.message),
            Stage::Input => write!(f, "Invalid input: {}", self.message),
        }
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn StdError + 'static))
    }
}

// Credential failures surface as Auth; client construction failures happen
// before any request exists and are reported as Transport.
impl From<provider_auth::Error> for Error {
    fn from(err: provider_auth::Error) -> Self {
        let stage = match err.error_kind {
            provider_auth::ErrorKind::ApiKey(_) => Stage::Auth,
            provider_auth::ErrorKind::Http(_) => Stage::Transport,
        };

        Error {
            message: err.detail(),
            source: Some(Box::new(err)),
            stage,
            raw_payload: None,
        }
    }
}

/// Helper function to create credential errors.
pub fn auth_error(message: impl Into<String>) -> Error {
    Error {
        source: None,
        stage: Stage::Auth,
        message: message.into(),
        raw_payload: None,
    }
}

/// Helper function to wrap a network failure.
pub fn transport_error<E>(err: E) -> Error
where
    E: StdError + Send + Sync + 'static,
{
    Error {
        message: err.to_string(),
        source: Some(Box::new(err)),
        stage: Stage::Transport,
        raw_payload: None,
    }
}

/// Helper function for non-2xx responses; keeps the body for diagnostics.
pub fn http_status_error(status: u16, body: String) -> Error {
    Error {
        source: None,
        stage: Stage::HttpStatus,
        message: format!("endpoint returned HTTP {}: {}", status, body),
        raw_payload: Some(body),
    }
}

/// Helper function for text that failed to decode as JSON.
pub fn parse_error<E>(err: E, raw: impl Into<String>) -> Error
where
    E: StdError + Send + Sync + 'static,
{
    Error {
        message: format!("response is not valid JSON: {}", err),
        source: Some(Box::new(err)),
        stage: Stage::Parse,
        raw_payload: Some(raw.into()),
    }
}

/// Helper function for JSON that does not match the expected schema.
pub fn schema_error(message: impl Into<String>, raw: impl Into<String>) -> Error {
    Error {
        source: None,
        stage: Stage::Schema,
        message: message.into(),
        raw_payload: Some(raw.into()),
    }
}

/// Helper function for requests rejected before a prompt is built.
pub fn input_error(message: impl Into<String>) -> Error {
    Error {
        source: None,
        stage: Stage::Input,
        message: message.into(),
        raw_payload: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use provider_auth::error::{api_key_error, ApiKeyErrorKind};

    #[test]
    fn test_http_status_error_carries_status_and_body() {
        let err = http_status_error(429, r#"{"error":"rate limited"}"#.to_string());

        assert_eq!(err.stage, Stage::HttpStatus);
        assert!(err.message.contains("429"));
        assert!(err.message.contains("rate limited"));
        assert_eq!(err.raw_payload.as_deref(), Some(r#"{"error":"rate limited"}"#));
    }

    #[test]
    fn test_parse_error_keeps_raw_payload_and_source() {
        let raw = "not json";
        let json_err = serde_json::from_str::<serde_json::Value>(raw).unwrap_err();
        let err = parse_error(json_err, raw);

        assert_eq!(err.stage, Stage::Parse);
        assert_eq!(err.raw_payload.as_deref(), Some("not json"));
        assert!(StdError::source(&err).is_some());
    }

    #[test]
    fn test_missing_key_maps_to_auth_stage() {
        let auth_err = api_key_error(ApiKeyErrorKind::Missing, "no API key provided for gemini");
        let err: Error = auth_err.into();

        assert_eq!(err.stage, Stage::Auth);
        assert_eq!(err.message, "no API key provided for gemini");
    }

    #[test]
    fn test_display_names_the_stage() {
        assert_eq!(
            schema_error("missing required field `summary`", "{}").to_string(),
            "Schema error: missing required field `summary`"
        );
        assert_eq!(
            input_error("transcript is empty").to_string(),
            "Invalid input: transcript is empty"
        );
        assert_eq!(auth_error("no key").to_string(), "Authentication failed: no key");
    }
}
