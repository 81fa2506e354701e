use analysis_ai::error::input_error;
use analysis_ai::traits::{analysis::Provider as _, transcription::Provider as _};
use analysis_ai::{
    AnalysisRequest, AnalysisResult, AudioClip, Error, OutputMode, Stage, TranscriptSource,
};
use domain::analysis::analyze;
use domain::gateway::{gemini::GeminiClient, whisper::WhisperClient};
use domain::transcript::{resolve_transcript, SAMPLE_TRANSCRIPT};
use log::*;
use provider_auth::api_key::ApiKeyAuth;
use provider_auth::http::HttpClientBuilder;
use secrecy::SecretString;
use service::{config::Config, logging::Logger};
use std::path::Path;
use tokio::io::AsyncReadExt;

#[tokio::main]
async fn main() {
    let config = Config::new();
    if let Err(e) = Logger::init_logger(&config) {
        eprintln!("Failed to start logger: {e}");
    }

    match run(&config).await {
        Ok(report) => println!("{report}"),
        Err(e) => {
            error!("Analysis failed at stage {}", e.stage);
            eprintln!("{}", diagnostic(&e));
            std::process::exit(1);
        }
    }
}

/// Runs one analysis end to end and renders the result for stdout.
async fn run(config: &Config) -> Result<String, Error> {
    let output_mode: OutputMode = config
        .output_mode()
        .parse()
        .map_err(|_| input_error(format!("unknown output mode {}", config.output_mode())))?;

    // Gemini key is checked before any transcription request.
    let gemini_key = SecretString::new(config.gemini_api_key().unwrap_or_default().to_string());
    ApiKeyAuth::new(gemini_key.clone())?;

    let http = HttpClientBuilder::new()
        .with_user_agent(format!("transcript_analyzer/{}", env!("CARGO_PKG_VERSION")))
        .build()?;

    let source = read_source(config).await?;
    let transcriber = WhisperClient::new(http.clone(), config.transcription_base_url());
    let transcription_key =
        SecretString::new(config.transcription_api_key().unwrap_or_default().to_string());
    let transcript = resolve_transcript(
        source,
        &transcriber,
        &transcription_key,
        config.transcription_model(),
    )
    .await?;

    let request = AnalysisRequest::new(
        transcript,
        config.domain(),
        config.round_type(),
        config.feedback_tone(),
        output_mode,
    )?;

    let provider = GeminiClient::new(http, config.gemini_base_url(), config.gemini_api_version());
    debug!(
        "Providers: analysis={}, transcription={}",
        provider.provider_id(),
        transcriber.provider_id()
    );

    let result = analyze(&provider, &request, &gemini_key, config.model()).await?;
    Ok(render(&result))
}

/// Picks the transcript source: the sample, an audio file, a transcript file, or stdin.
async fn read_source(config: &Config) -> Result<TranscriptSource, Error> {
    if config.use_sample() {
        info!("Using the built-in sample transcript");
        return Ok(TranscriptSource::Text(SAMPLE_TRANSCRIPT.to_string()));
    }

    if let Some(path) = config.audio_file() {
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| read_error(path, e))?;
        let file_name = path
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or("audio")
            .to_string();
        return Ok(TranscriptSource::Audio(AudioClip { bytes, file_name }));
    }

    if let Some(path) = config.transcript_file() {
        let text = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| read_error(path, e))?;
        return Ok(TranscriptSource::Text(text));
    }

    debug!("Reading transcript from stdin");
    let mut text = String::new();
    tokio::io::stdin()
        .read_to_string(&mut text)
        .await
        .map_err(|e| read_error(Path::new("<stdin>"), e))?;
    Ok(TranscriptSource::Text(text))
}

fn read_error(path: &Path, err: std::io::Error) -> Error {
    Error {
        message: format!("failed to read {}: {}", path.display(), err),
        source: Some(Box::new(err)),
        stage: Stage::Input,
        raw_payload: None,
    }
}

/// Staged error message, followed by the offending payload when there is one.
fn diagnostic(err: &Error) -> String {
    match err.raw_payload.as_deref() {
        Some(raw) => format!("{err}\n--- raw response ---\n{raw}"),
        None => err.to_string(),
    }
}

fn render(result: &AnalysisResult) -> String {
    match result {
        AnalysisResult::Structured(report) => serde_json::to_string_pretty(report)
            .unwrap_or_else(|e| {
                warn!("Failed to pretty-print report: {:?}", e);
                format!("{:#?}", report)
            }),
        AnalysisResult::FreeText { report_text } => report_text.clone(),
    }
}
