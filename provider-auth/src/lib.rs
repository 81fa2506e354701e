//! # provider-auth
//!
//! Credential handling for the hosted AI providers used by the analyzer:
//! - API key validation and per-request authentication (Gemini query-parameter
//!   keys, Bearer tokens for the transcription endpoint)
//! - HTTP client building
//!
//! Clients built here never hold credentials. Every request is authenticated
//! with the key the caller passed for that one call, so a shared client can
//! serve concurrent callers without leaking keys between them.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use provider_auth::{
//!     api_key::{ApiKeyAuth, ApiKeyProvider, ProviderAuth},
//!     http::HttpClientBuilder,
//! };
//! ```

pub mod api_key;
pub mod error;
pub mod http;

// Re-export commonly used types
pub use error::{Error, ErrorKind};
