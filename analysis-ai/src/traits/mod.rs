//! Provider traits.

pub mod analysis;
pub mod transcription;
