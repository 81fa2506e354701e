//! Transcript sources: typed text, or audio run through a transcription provider.

use analysis_ai::traits::transcription::Provider;
use analysis_ai::{Error, TranscriptSource};
use log::*;
use secrecy::SecretString;

/// Demo conversation for trying the analyzer without preparing input.
pub const SAMPLE_TRANSCRIPT: &str = "\
Speaker A: Good morning. Thank you for taking the time to meet with me. I'm really excited about this Senior Developer role.
Speaker B: Good morning. Let's dive right in. Can you describe a complex technical challenge you've solved recently?
Speaker A: (Hesitantly) Uh, yes. So, we had this legacy system... it was, uh, really slow. I felt very nervous about touching it, honestly. But, I decided to refactor the database connection layer entirely. It took longer than expected, but eventually, we reduced the latency by almost 40%. It showed me the value of, like, persistence.
Speaker B: That sounds impressive. How did you communicate the risks and the timeline to your non-technical stakeholders?
Speaker A: I made sure to meet them daily. I used simple analogies, saying things like, \"We're replacing the old engine with a new one,\" so they wouldn't feel confused. It's important to be empathetic to their lack of technical knowledge.
Speaker B: I agree. That demonstrates strong emotional intelligence.
";

/// Resolve `source` into transcript text.
///
/// Text is returned as given. Audio is sent to `transcriber`; its output is
/// treated exactly like typed text from here on.
pub async fn resolve_transcript<T>(
    source: TranscriptSource,
    transcriber: &T,
    credentials: &SecretString,
    model: &str,
) -> Result<String, Error>
where
    T: Provider + ?Sized,
{
    match source {
        TranscriptSource::Text(text) => Ok(text),
        TranscriptSource::Audio(clip) => {
            debug!(
                "Transcribing {} ({} bytes) with model {}",
                clip.file_name,
                clip.bytes.len(),
                model
            );
            let text = transcriber.transcribe(&clip, credentials, model).await?;
            info!("Transcribed {} into {} chars", clip.file_name, text.len());
            Ok(text)
        }
    }
}
