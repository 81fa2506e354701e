//! Types shared by providers and the analysis pipeline.

pub mod analysis;
pub mod transcription;
