//! Types for transcript sources.

/// Audio clip to be transcribed before analysis.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioClip {
    pub bytes: Vec<u8>,
    /// Original file name; transcription endpoints use its extension to detect the format.
    pub file_name: String,
}

/// Where the transcript text comes from.
///
/// Transcribed text is handled exactly like typed text once resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TranscriptSource {
    Text(String),
    Audio(AudioClip),
}
