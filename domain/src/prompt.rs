//! Prompt construction for transcript analysis.
//!
//! Rendering is pure and deterministic: the same request always yields the
//! same bytes. The transcript is embedded as given, never truncated.

use analysis_ai::types::analysis::{fields, SCORE_MAX, SCORE_MIN, SPEAKERS};
use analysis_ai::{AnalysisRequest, OutputMode};

/// Render the instruction string for `request`.
pub fn build_prompt(request: &AnalysisRequest) -> String {
    match request.output_mode() {
        OutputMode::Structured => structured_prompt(request),
        OutputMode::FreeText => free_text_prompt(request),
    }
}

/// Literal JSON schema embedded in structured prompts, naming every required
/// field with its type and range.
pub fn json_schema() -> String {
    let score = format!("integer from {} to {}", SCORE_MIN, SCORE_MAX);
    let mut lines = vec![
        "{".to_string(),
        format!(
            "  \"{}\": \"string: overall summary of the discussion\",",
            fields::SUMMARY
        ),
    ];

    for speaker in SPEAKERS {
        lines.push(format!(
            "  \"{}\": \"string: key points made by Speaker {}\",",
            fields::key_points(speaker),
            speaker
        ));
    }

    for (index, speaker) in SPEAKERS.iter().enumerate() {
        lines.push(format!("  \"{}\": {{", fields::feedback(speaker)));
        lines.push(format!("    \"{}\": \"{}\",", fields::CONFIDENCE_SCORE, score));
        lines.push(format!("    \"{}\": \"{}\",", fields::CLARITY_SCORE, score));
        lines.push(format!("    \"{}\": \"{}\",", fields::EMPATHY_SCORE, score));
        lines.push(format!(
            "    \"{}\": \"string: Positive, Neutral or Negative\",",
            fields::SENTIMENT_LABEL
        ));
        lines.push(format!(
            "    \"{}\": [\"string: suggestion 1\", \"string: suggestion 2\"]",
            fields::IMPROVEMENT_SUGGESTIONS
        ));
        let closing = if index + 1 < SPEAKERS.len() { "  }," } else { "  }" };
        lines.push(closing.to_string());
    }

    lines.push("}".to_string());
    lines.join("\n")
}

fn speaker_list() -> String {
    SPEAKERS
        .iter()
        .map(|s| format!("'Speaker {}'", s))
        .collect::<Vec<_>>()
        .join(" and ")
}

fn structured_prompt(request: &AnalysisRequest) -> String {
    format!(
        r#"You are an expert interview analyst and mentor. Analyze the conversation transcript below.
The domain is '{domain}' and the round type is '{round_type}'.

Analyze the conversation for the speakers {speakers}. For each speaker assess:
1. Overall sentiment and tone.
2. Clarity and coherence score ({min}-{max}).
3. Empathy and emotional intelligence score ({min}-{max}).
4. Confidence score ({min}-{max}).
5. Specific, actionable improvement suggestions.

Conversation Transcript:
---
{transcript}
---

Respond with ONLY a single JSON object that conforms to the schema below.
Every field is required. Scores must be integers from {min} to {max}.
Do not include any text, markdown fences or commentary outside the JSON object.
{schema}"#,
        domain = request.domain(),
        round_type = request.round_type(),
        speakers = speaker_list(),
        min = SCORE_MIN,
        max = SCORE_MAX,
        transcript = request.transcript(),
        schema = json_schema(),
    )
}

fn free_text_prompt(request: &AnalysisRequest) -> String {
    format!(
        r#"You are an expert interview analyst and mentor. Analyze the conversation transcript below.
The domain is '{domain}' and the round type is '{round_type}'.
Write your feedback in a {tone} tone.

Conversation Transcript:
---
{transcript}
---

Write the report as markdown with these bulleted sections:
## Summary
## Key Points ({speakers})
## Scores (confidence, clarity and empathy from {min} to {max} for each speaker)
## Sentiment and Tone
## Improvement Suggestions"#,
        domain = request.domain(),
        round_type = request.round_type(),
        tone = request.feedback_tone(),
        transcript = request.transcript(),
        speakers = speaker_list(),
        min = SCORE_MIN,
        max = SCORE_MAX,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(mode: OutputMode) -> AnalysisRequest {
        AnalysisRequest::new(
            "Speaker A: Hi. Speaker B: Hi.",
            "Tech/IT",
            "One-on-One Interview",
            "Encouraging",
            mode,
        )
        .unwrap()
    }

    #[test]
    fn test_structured_prompt_names_every_schema_field() {
        let prompt = build_prompt(&request(OutputMode::Structured));

        for field in fields::all() {
            assert!(prompt.contains(&field), "prompt is missing `{}`", field);
        }
    }

    #[test]
    fn test_structured_prompt_demands_json_only() {
        let prompt = build_prompt(&request(OutputMode::Structured));

        assert!(prompt.contains("ONLY a single JSON object"));
        assert!(prompt.contains("The domain is 'Tech/IT'"));
        assert!(prompt.contains("round type is 'One-on-One Interview'"));
        assert!(prompt.contains("---\nSpeaker A: Hi. Speaker B: Hi.\n---"));
    }

    #[test]
    fn test_build_prompt_is_deterministic() {
        for mode in [OutputMode::Structured, OutputMode::FreeText] {
            assert_eq!(build_prompt(&request(mode)), build_prompt(&request(mode)));
        }
    }

    #[test]
    fn test_free_text_prompt_uses_tone_and_asks_for_prose() {
        let prompt = build_prompt(&request(OutputMode::FreeText));

        assert!(prompt.contains("Encouraging tone"));
        assert!(prompt.contains("## Improvement Suggestions"));
        assert!(prompt.contains("Speaker A: Hi. Speaker B: Hi."));
        assert!(!prompt.contains(fields::CONFIDENCE_SCORE));
    }

    #[test]
    fn test_long_transcript_is_not_truncated() {
        let transcript = "Speaker A: word. ".repeat(20_000);
        let request = AnalysisRequest::new(
            transcript.clone(),
            "HR/Behavioral",
            "Group Discussion",
            "Direct",
            OutputMode::Structured,
        )
        .unwrap();

        assert!(build_prompt(&request).contains(&transcript));
    }

    #[test]
    fn test_json_schema_is_valid_json() {
        let schema: serde_json::Value = serde_json::from_str(&json_schema()).unwrap();

        assert!(schema["feedback_speaker_A"]["clarity_score"].is_string());
        assert!(schema["feedback_speaker_B"]["improvement_suggestions"].is_array());
    }
}
