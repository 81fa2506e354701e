//! End-to-end analysis of one request: prompt, dispatch, interpretation.

use crate::interpreter::interpret;
use crate::prompt::build_prompt;
use analysis_ai::traits::analysis::Provider;
use analysis_ai::{AnalysisRequest, AnalysisResult, Error};
use log::*;
use secrecy::SecretString;

/// Analyze `request` with `provider`, authenticating with `credentials`.
///
/// Each call is independent: nothing is cached between calls and every
/// failure is returned to the caller, scoped to this one request.
pub async fn analyze<P>(
    provider: &P,
    request: &AnalysisRequest,
    credentials: &SecretString,
    model: &str,
) -> Result<AnalysisResult, Error>
where
    P: Provider + ?Sized,
{
    let mode = request.output_mode();
    let prompt = build_prompt(request);

    info!(
        "Analyzing {} char transcript (domain={}, round_type={}, mode={}, model={})",
        request.transcript().len(),
        request.domain(),
        request.round_type(),
        mode,
        model
    );

    let raw = provider
        .send(&prompt, credentials, model, mode.is_structured())
        .await?;

    interpret(&raw, mode)
}
