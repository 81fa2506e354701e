use clap::builder::TypedValueParser as _;
use clap::Parser;
use dotenvy::dotenv;
use log::LevelFilter;
use std::path::{Path, PathBuf};

/// Default Gemini API base URL used when `GEMINI_BASE_URL` is not set.
pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_GEMINI_API_VERSION: &str = "v1";
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-flash";

/// Default transcription API base URL used when `TRANSCRIPTION_BASE_URL` is not set.
pub const DEFAULT_TRANSCRIPTION_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_TRANSCRIPTION_MODEL: &str = "whisper-1";

// Closed sets offered to users. The analysis pipeline treats these labels as
// opaque strings; only this layer restricts them.
pub const DOMAINS: [&str; 5] = [
    "Tech/IT",
    "Managerial/Leadership",
    "HR/Behavioral",
    "Sales/Marketing",
    "General Discussion",
];
pub const ROUND_TYPES: [&str; 3] = [
    "One-on-One Interview",
    "Group Discussion",
    "Presentation/Pitch",
];
pub const FEEDBACK_TONES: [&str; 4] = ["Constructive", "Encouraging", "Direct", "Detailed"];
pub const OUTPUT_MODES: [&str; 2] = ["structured", "free-text"];

#[derive(Clone, Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Config {
    /// The API key to use when calling the Gemini generation endpoint.
    #[arg(long, env, hide_env_values = true)]
    gemini_api_key: Option<String>,

    /// The base URL of the Gemini API.
    /// Override in tests to point at a mock server.
    #[arg(long, env, default_value = DEFAULT_GEMINI_BASE_URL)]
    gemini_base_url: String,

    /// The versioned path segment of the Gemini REST API (e.g. v1, v1beta).
    #[arg(long, env, default_value = DEFAULT_GEMINI_API_VERSION)]
    gemini_api_version: String,

    /// The Gemini model used for analysis.
    #[arg(short, long, env = "GEMINI_MODEL", default_value = DEFAULT_GEMINI_MODEL)]
    model: String,

    /// The API key to use when calling the transcription endpoint (audio input only).
    #[arg(long, env, hide_env_values = true)]
    transcription_api_key: Option<String>,

    /// The base URL of the Whisper-compatible transcription API.
    #[arg(long, env, default_value = DEFAULT_TRANSCRIPTION_BASE_URL)]
    transcription_base_url: String,

    /// The transcription model used for audio input.
    #[arg(long, env, default_value = DEFAULT_TRANSCRIPTION_MODEL)]
    transcription_model: String,

    /// Domain or industry of the conversation.
    #[arg(short, long, default_value = "Tech/IT",
        value_parser = clap::builder::PossibleValuesParser::new(DOMAINS))]
    domain: String,

    /// Kind of conversation being analyzed.
    #[arg(short, long, default_value = "One-on-One Interview",
        value_parser = clap::builder::PossibleValuesParser::new(ROUND_TYPES))]
    round_type: String,

    /// Tone of the feedback (free-text output only).
    #[arg(short, long, default_value = "Constructive",
        value_parser = clap::builder::PossibleValuesParser::new(FEEDBACK_TONES))]
    feedback_tone: String,

    /// Ask for a schema-conformant JSON report or for markdown prose.
    #[arg(short, long, default_value = "structured",
        value_parser = clap::builder::PossibleValuesParser::new(OUTPUT_MODES))]
    output_mode: String,

    /// Read the transcript from this file. Reads stdin when no input is given.
    #[arg(short, long, conflicts_with_all = ["audio_file", "sample"])]
    transcript_file: Option<PathBuf>,

    /// Transcribe this audio file and analyze the resulting transcript.
    #[arg(short, long, conflicts_with = "sample")]
    audio_file: Option<PathBuf>,

    /// Analyze the built-in sample interview.
    #[arg(long)]
    sample: bool,

    /// Set the log level verbosity threshold (level) to control what gets displayed on console output
    #[arg(
        short,
        long,
        env,
        default_value_t = LevelFilter::Info,
        value_parser = clap::builder::PossibleValuesParser::new(["OFF", "ERROR", "WARN", "INFO", "DEBUG", "TRACE"])
            .map(|s| s.parse::<LevelFilter>().unwrap()),
        )]
    pub log_level_filter: LevelFilter,
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

impl Config {
    pub fn new() -> Self {
        // Load .env file first
        dotenv().ok();
        // Then parse the command line parameters and flags
        Config::parse()
    }

    /// Returns the Gemini API key, if configured.
    pub fn gemini_api_key(&self) -> Option<&str> {
        self.gemini_api_key.as_deref()
    }

    /// Returns the Gemini API base URL.
    pub fn gemini_base_url(&self) -> &str {
        &self.gemini_base_url
    }

    pub fn gemini_api_version(&self) -> &str {
        &self.gemini_api_version
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Returns the transcription API key, if configured.
    pub fn transcription_api_key(&self) -> Option<&str> {
        self.transcription_api_key.as_deref()
    }

    pub fn transcription_base_url(&self) -> &str {
        &self.transcription_base_url
    }

    pub fn transcription_model(&self) -> &str {
        &self.transcription_model
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

    pub fn output_mode(&self) -> &str {
        &self.output_mode
    }

    pub fn transcript_file(&self) -> Option<&Path> {
        self.transcript_file.as_deref()
    }

    pub fn audio_file(&self) -> Option<&Path> {
        self.audio_file.as_deref()
    }

    pub fn use_sample(&self) -> bool {
        self.sample
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_context_flags_parse() {
        let config = Config::try_parse_from([
            "transcript_analyzer",
            "--domain",
            "HR/Behavioral",
            "--round-type",
            "Group Discussion",
            "--feedback-tone",
            "Direct",
            "--output-mode",
            "free-text",
            "--model",
            "gemini-2.5-pro",
            "--transcript-file",
            "interview.txt",
        ])
        .unwrap();

        assert_eq!(config.domain(), "HR/Behavioral");
        assert_eq!(config.round_type(), "Group Discussion");
        assert_eq!(config.feedback_tone(), "Direct");
        assert_eq!(config.output_mode(), "free-text");
        assert_eq!(config.model(), "gemini-2.5-pro");
        assert_eq!(config.transcript_file(), Some(Path::new("interview.txt")));
        assert!(!config.use_sample());
    }

    #[test]
    fn test_context_defaults() {
        let config = Config::try_parse_from(["transcript_analyzer", "--sample"]).unwrap();

        assert_eq!(config.domain(), "Tech/IT");
        assert_eq!(config.round_type(), "One-on-One Interview");
        assert_eq!(config.feedback_tone(), "Constructive");
        assert_eq!(config.output_mode(), "structured");
        assert!(config.use_sample());
        assert_eq!(config.audio_file(), None);
    }

    #[test]
    fn test_values_outside_closed_sets_are_rejected() {
        assert!(Config::try_parse_from(["transcript_analyzer", "--domain", "Cooking"]).is_err());
        assert!(
            Config::try_parse_from(["transcript_analyzer", "--output-mode", "yaml"]).is_err()
        );
    }

    #[test]
    fn test_input_sources_are_exclusive() {
        assert!(Config::try_parse_from([
            "transcript_analyzer",
            "--audio-file",
            "a.wav",
            "--sample"
        ])
        .is_err());
        assert!(Config::try_parse_from([
            "transcript_analyzer",
            "--transcript-file",
            "t.txt",
            "--audio-file",
            "a.wav"
        ])
        .is_err());
    }

    #[test]
    fn test_log_level_filter_parses_uppercase_names() {
        let config =
            Config::try_parse_from(["transcript_analyzer", "--log-level-filter", "DEBUG"]).unwrap();
        assert_eq!(config.log_level_filter, LevelFilter::Debug);
    }
}
