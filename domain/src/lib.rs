//! Transcript analysis pipeline.
//!
//! Turns a transcript into feedback in three steps:
//! - [`prompt::build_prompt`] renders the request into one instruction string
//! - an [`analysis_ai::traits::analysis::Provider`] (see [`gateway::gemini`])
//!   sends it to the generation endpoint
//! - [`interpreter::interpret`] validates the reply into an [`AnalysisResult`]
//!
//! [`analysis::analyze`] runs the three in order. Audio input is first turned
//! into text by [`transcript::resolve_transcript`].

pub use analysis_ai::{
    AnalysisRequest, AnalysisResult, AudioClip, Error, OutputMode, SpeakerFeedback, Stage,
    StructuredReport, TranscriptSource,
};

pub mod analysis;
pub mod interpreter;
pub mod prompt;
pub mod transcript;

pub mod gateway;
