//! Non-streaming improvement pipeline, shared by every channel adapter.
//!
//! `improve_text` runs one stateless turn:
//! build prompt → call provider (cancellable, time-bounded) → parse reply.
//! The caller only handles channel-specific rendering and delivery.

use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use improver_core::types::{CompletionRequest, ParsedIssueReport};

use crate::parse;
use crate::prompt::{self, PROMPT_VERSION};
use crate::provider::{ChatRequest, LlmProvider, ProviderError};

/// Call `provider` once, racing the call against `cancel` and `timeout`.
///
/// Returns the raw completion text. Cancellation and timeout surface as
/// `ProviderError::Cancelled` / `ProviderError::Timeout` so callers treat
/// them like any other provider failure.
pub async fn complete(
    provider: &dyn LlmProvider,
    request: &CompletionRequest,
    cancel: &CancellationToken,
    timeout: Duration,
) -> Result<String, ProviderError> {
    let chat = ChatRequest::from(request);

    let response = tokio::select! {
        _ = cancel.cancelled() => return Err(ProviderError::Cancelled),
        result = tokio::time::timeout(timeout, provider.send(&chat)) => match result {
            Ok(inner) => inner?,
            Err(_) => return Err(ProviderError::Timeout { secs: timeout.as_secs() }),
        },
    };

    info!(
        provider = %provider.name(),
        model = %response.model,
        tokens_in = response.tokens_in,
        tokens_out = response.tokens_out,
        stop_reason = %response.stop_reason,
        "pipeline: completion received"
    );

    Ok(response.content)
}

/// Run the full improvement turn for `text` against `model`.
///
/// `text` must already be filtered (non-empty, not a command).
pub async fn improve_text(
    provider: &dyn LlmProvider,
    model: &str,
    text: &str,
    cancel: &CancellationToken,
    timeout: Duration,
) -> Result<ParsedIssueReport, ProviderError> {
    let request = CompletionRequest {
        prompt: prompt::build(text),
        model: model.to_string(),
    };

    debug!(
        model = %request.model,
        prompt_version = PROMPT_VERSION,
        text_len = text.len(),
        "pipeline: requesting improvement"
    );

    let raw = complete(provider, &request, cancel, timeout).await?;
    let report = parse::parse(&raw);

    debug!(
        issues = report.issue_count(),
        categories = report.categories.len(),
        "pipeline: reply parsed"
    );

    Ok(report)
}
