//! Types for transcript analysis.

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::error::{input_error, Error};

/// Speaker labels the analysis is requested for, in report order.
pub const SPEAKERS: [&str; 2] = ["A", "B"];

/// Inclusive range every score must fall in.
pub const SCORE_MIN: i64 = 1;
pub const SCORE_MAX: i64 = 10;

/// Field names of the structured report as the model must emit them.
pub mod fields {
    pub const SUMMARY: &str = "summary";
    pub const CONFIDENCE_SCORE: &str = "confidence_score";
    pub const CLARITY_SCORE: &str = "clarity_score";
    pub const EMPATHY_SCORE: &str = "empathy_score";
    pub const SENTIMENT_LABEL: &str = "sentiment_label";
    pub const IMPROVEMENT_SUGGESTIONS: &str = "improvement_suggestions";

    /// Fields of every per-speaker feedback object, in schema order.
    pub const FEEDBACK: [&str; 5] = [
        CONFIDENCE_SCORE,
        CLARITY_SCORE,
        EMPATHY_SCORE,
        SENTIMENT_LABEL,
        IMPROVEMENT_SUGGESTIONS,
    ];

    /// Top-level key holding a speaker's key points.
    pub fn key_points(speaker: &str) -> String {
        format!("key_points_speaker_{}", speaker)
    }

    /// Top-level key holding a speaker's feedback object.
    pub fn feedback(speaker: &str) -> String {
        format!("feedback_speaker_{}", speaker)
    }

    /// Every field name of the structured schema, top-level keys first.
    pub fn all() -> Vec<String> {
        let mut names = vec![SUMMARY.to_string()];
        names.extend(super::SPEAKERS.iter().map(|s| key_points(s)));
        names.extend(super::SPEAKERS.iter().map(|s| feedback(s)));
        names.extend(FEEDBACK.iter().map(|f| f.to_string()));
        names
    }
}

/// Whether the model is asked for schema-conformant JSON or for prose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum OutputMode {
    Structured,
    FreeText,
}

impl OutputMode {
    pub fn is_structured(&self) -> bool {
        *self == OutputMode::Structured
    }
}

#[derive(Debug, PartialEq, Eq)]
pub struct OutputModeParseError;

impl FromStr for OutputMode {
    type Err = OutputModeParseError;
    fn from_str(mode: &str) -> Result<OutputMode, Self::Err> {
        match mode.to_lowercase().as_str() {
            "structured" => Ok(OutputMode::Structured),
            "free-text" | "free_text" => Ok(OutputMode::FreeText),
            _ => Err(OutputModeParseError),
        }
    }
}

impl fmt::Display for OutputMode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            OutputMode::Structured => write!(f, "structured"),
            OutputMode::FreeText => write!(f, "free-text"),
        }
    }
}

/// A single analysis request. Immutable once built.
///
/// Domain, round type and feedback tone are opaque labels here; checking
/// them against a closed set is the caller's job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisRequest {
    transcript: String,
    domain: String,
    round_type: String,
    feedback_tone: String,
    output_mode: OutputMode,
}

impl AnalysisRequest {
    /// Build a request, rejecting a transcript that is empty or only whitespace.
    ///
    /// The transcript is stored as given; it is never trimmed or truncated.
    pub fn new(
        transcript: impl Into<String>,
        domain: impl Into<String>,
        round_type: impl Into<String>,
        feedback_tone: impl Into<String>,
        output_mode: OutputMode,
    ) -> Result<Self, Error> {
        let transcript = transcript.into();
        if transcript.trim().is_empty() {
            return Err(input_error("transcript is empty"));
        }

        Ok(Self {
            transcript,
            domain: domain.into(),
            round_type: round_type.into(),
            feedback_tone: feedback_tone.into(),
            output_mode,
        })
    }

    pub fn transcript(&self) -> &str {
        &self.transcript
    }

    pub fn domain(&self) -> &str {
        &self.domain
    }

    pub fn round_type(&self) -> &str {
        &self.round_type
    }

    pub fn feedback_tone(&self) -> &str {
        &self.feedback_tone
    }

    pub fn output_mode(&self) -> OutputMode {
        self.output_mode
    }
}

/// Feedback for one speaker. Every field is required; scores are 1-10.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SpeakerFeedback {
    /// Serialized at the top level of the report, not inside the feedback object.
    #[serde(skip_serializing)]
    pub key_points: String,
    pub confidence_score: u8,
    pub clarity_score: u8,
    pub empathy_score: u8,
    pub sentiment_label: String,
    pub improvement_suggestions: Vec<String>,
}

/// Fully populated structured analysis.
///
/// Serializes to the same JSON layout the model is asked to produce, so a
/// serialized report interprets back to an equal report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructuredReport {
    pub summary: String,
    /// Keyed by speaker label ("A", "B").
    pub speakers: BTreeMap<String, SpeakerFeedback>,
}

impl StructuredReport {
    pub fn speaker(&self, id: &str) -> Option<&SpeakerFeedback> {
        self.speakers.get(id)
    }
}

impl Serialize for StructuredReport {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1 + self.speakers.len() * 2))?;
        map.serialize_entry(fields::SUMMARY, &self.summary)?;
        for (id, feedback) in &self.speakers {
            map.serialize_entry(&fields::key_points(id), &feedback.key_points)?;
        }
        for (id, feedback) in &self.speakers {
            map.serialize_entry(&fields::feedback(id), feedback)?;
        }
        map.end()
    }
}

/// Outcome of a successful analysis.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnalysisResult {
    Structured(StructuredReport),
    /// Markdown-like prose, passed through verbatim.
    FreeText { report_text: String },
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Stage;

    fn feedback(key_points: &str, score: u8) -> SpeakerFeedback {
        SpeakerFeedback {
            key_points: key_points.to_string(),
            confidence_score: score,
            clarity_score: score,
            empathy_score: score,
            sentiment_label: "Neutral".to_string(),
            improvement_suggestions: vec!["Slow down".to_string()],
        }
    }

    #[test]
    fn test_request_rejects_blank_transcript() {
        let err = AnalysisRequest::new(
            "  \n\t",
            "Tech/IT",
            "One-on-One Interview",
            "Constructive",
            OutputMode::Structured,
        )
        .unwrap_err();

        assert_eq!(err.stage, Stage::Input);
    }

    #[test]
    fn test_request_keeps_transcript_verbatim() {
        let request = AnalysisRequest::new(
            "  Speaker A: Hi.  ",
            "Tech/IT",
            "Group Discussion",
            "Direct",
            OutputMode::FreeText,
        )
        .unwrap();

        assert_eq!(request.transcript(), "  Speaker A: Hi.  ");
        assert_eq!(request.round_type(), "Group Discussion");
        assert_eq!(request.feedback_tone(), "Direct");
        assert_eq!(request.output_mode(), OutputMode::FreeText);
    }

    #[test]
    fn test_output_mode_from_str() {
        assert_eq!("structured".parse::<OutputMode>(), Ok(OutputMode::Structured));
        assert_eq!("FREE-TEXT".parse::<OutputMode>(), Ok(OutputMode::FreeText));
        assert_eq!("free_text".parse::<OutputMode>(), Ok(OutputMode::FreeText));
        assert_eq!("prose".parse::<OutputMode>(), Err(OutputModeParseError));
        assert_eq!(OutputMode::FreeText.to_string(), "free-text");
    }

    #[test]
    fn test_structured_report_serializes_to_wire_layout() {
        let mut speakers = BTreeMap::new();
        speakers.insert("A".to_string(), feedback("Refactored a slow system", 7));
        speakers.insert("B".to_string(), feedback("Asked about stakeholders", 8));
        let report = StructuredReport {
            summary: "A technical interview".to_string(),
            speakers,
        };

        let value = serde_json::to_value(&report).unwrap();

        assert_eq!(value["summary"], "A technical interview");
        assert_eq!(value["key_points_speaker_A"], "Refactored a slow system");
        assert_eq!(value["feedback_speaker_B"]["confidence_score"], 8);
        assert_eq!(
            value["feedback_speaker_A"]["improvement_suggestions"][0],
            "Slow down"
        );
        assert!(value["feedback_speaker_A"].get("key_points").is_none());
    }

    #[test]
    fn test_all_field_names_cover_both_speakers() {
        let names = fields::all();

        assert!(names.contains(&"key_points_speaker_A".to_string()));
        assert!(names.contains(&"feedback_speaker_B".to_string()));
        assert!(names.contains(&"sentiment_label".to_string()));
        assert_eq!(names.len(), 1 + SPEAKERS.len() * 2 + fields::FEEDBACK.len());
    }
}
