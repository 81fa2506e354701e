//! Validation of model replies into typed analysis results.
//!
//! Structured replies fail closed: a missing field or a value that cannot be
//! coerced is reported as a `Schema` error naming the field, never backfilled.
//! JSON wrapped in prose is a `Parse` error; no embedded JSON is extracted.

use analysis_ai::error::{parse_error, schema_error, Error};
use analysis_ai::types::analysis::{fields, SCORE_MAX, SCORE_MIN, SPEAKERS};
use analysis_ai::{AnalysisResult, OutputMode, SpeakerFeedback, StructuredReport};
use log::*;
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Interpret the raw model text according to `mode`.
pub fn interpret(raw: &str, mode: OutputMode) -> Result<AnalysisResult, Error> {
    match mode {
        OutputMode::FreeText => Ok(AnalysisResult::FreeText {
            report_text: raw.to_string(),
        }),
        OutputMode::Structured => interpret_structured(raw).map(AnalysisResult::Structured),
    }
}

fn interpret_structured(raw: &str) -> Result<StructuredReport, Error> {
    let value: Value = serde_json::from_str(raw).map_err(|e| {
        warn!("Model reply is not valid JSON: {:?}", e);
        parse_error(e, raw)
    })?;

    let root = Fields::root(&value, raw);
    let summary = root.string(fields::SUMMARY)?;

    let mut speakers = BTreeMap::new();
    for speaker in SPEAKERS {
        let key_points = root.string(&fields::key_points(speaker))?;
        let feedback = root.object(&fields::feedback(speaker))?;

        speakers.insert(
            speaker.to_string(),
            SpeakerFeedback {
                key_points,
                confidence_score: feedback.score(fields::CONFIDENCE_SCORE)?,
                clarity_score: feedback.score(fields::CLARITY_SCORE)?,
                empathy_score: feedback.score(fields::EMPATHY_SCORE)?,
                sentiment_label: feedback.string(fields::SENTIMENT_LABEL)?,
                improvement_suggestions: feedback.string_list(fields::IMPROVEMENT_SUGGESTIONS)?,
            },
        );
    }

    debug!("Structured reply validated for {} speakers", speakers.len());
    Ok(StructuredReport { summary, speakers })
}

/// Required-field lookups over one JSON object, reporting failures with the
/// dotted path of the field.
struct Fields<'a> {
    map: Option<&'a Map<String, Value>>,
    path: String,
    raw: &'a str,
}

impl<'a> Fields<'a> {
    fn root(value: &'a Value, raw: &'a str) -> Self {
        Self {
            map: value.as_object(),
            path: String::new(),
            raw,
        }
    }

    fn qualified(&self, name: &str) -> String {
        if self.path.is_empty() {
            name.to_string()
        } else {
            format!("{}.{}", self.path, name)
        }
    }

    fn missing(&self, name: &str) -> Error {
        let field = self.qualified(name);
        warn!("Model reply is missing required field `{}`", field);
        schema_error(format!("missing required field `{}`", field), self.raw)
    }

    fn invalid(&self, name: &str, expected: &str, found: &Value) -> Error {
        let field = self.qualified(name);
        warn!("Model reply field `{}` is not {}", field, expected);
        schema_error(
            format!("field `{}` must be {}, found {}", field, expected, found),
            self.raw,
        )
    }

    // JSON null counts as absent.
    fn get(&self, name: &str) -> Result<&'a Value, Error> {
        self.map
            .and_then(|map| map.get(name))
            .filter(|value| !value.is_null())
            .ok_or_else(|| self.missing(name))
    }

    fn string(&self, name: &str) -> Result<String, Error> {
        match self.get(name)? {
            Value::String(s) => Ok(s.clone()),
            other => Err(self.invalid(name, "a string", other)),
        }
    }

    fn object(&self, name: &str) -> Result<Fields<'a>, Error> {
        match self.get(name)? {
            Value::Object(map) => Ok(Fields {
                map: Some(map),
                path: self.qualified(name),
                raw: self.raw,
            }),
            other => Err(self.invalid(name, "an object", other)),
        }
    }

    fn score(&self, name: &str) -> Result<u8, Error> {
        let value = self.get(name)?;
        coerce_score(value).ok_or_else(|| {
            self.invalid(
                name,
                &format!("an integer from {} to {}", SCORE_MIN, SCORE_MAX),
                value,
            )
        })
    }

    fn string_list(&self, name: &str) -> Result<Vec<String>, Error> {
        let items = match self.get(name)? {
            Value::Array(items) => items,
            other => return Err(self.invalid(name, "a list of strings", other)),
        };

        items
            .iter()
            .enumerate()
            .map(|(index, item)| match item {
                Value::String(s) => Ok(s.clone()),
                other => Err(self.invalid(&format!("{}[{}]", name, index), "a string", other)),
            })
            .collect()
    }
}

/// Coerce a score to an integer in range. Accepts integers, integral floats
/// and strings holding an integer ("7", " 8 ").
fn coerce_score(value: &Value) -> Option<u8> {
    let score = match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as i64)),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    }?;

    if (SCORE_MIN..=SCORE_MAX).contains(&score) {
        u8::try_from(score).ok()
    } else {
        None
    }
}
