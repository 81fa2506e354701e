//! Transcript analysis abstraction layer for generation and transcription providers.
//!
//! This crate provides the provider-agnostic pieces of the analysis pipeline:
//! - Request and result types for transcript analysis
//! - Transcript sources (typed text or an audio clip to transcribe)
//! - Traits for LLM generation and speech-to-text providers
//! - The staged error type every pipeline step reports through
//!
//! Concrete providers (Gemini, Whisper-compatible endpoints) live in `domain`,
//! so applications can swap them without changing pipeline code.

pub mod error;
pub mod traits;
pub mod types;

// Re-export commonly used types
pub use error::{Error, Stage};
pub use types::analysis::{
    AnalysisRequest, AnalysisResult, OutputMode, SpeakerFeedback, StructuredReport,
};
pub use types::transcription::{AudioClip, TranscriptSource};
