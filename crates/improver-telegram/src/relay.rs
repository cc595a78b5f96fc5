//! Per-message orchestration: filter → typing → improve → render → reply.
//!
//! Every failure is logged here and converted into a user-visible notice
//! where possible. The error is still returned so the caller can log it
//! with its code; nothing propagates further.

use tracing::{info, warn};

use improver_agent::pipeline::improve_text;
use improver_core::error::ImproverError;
use improver_core::types::UserMessage;

use crate::commands;
use crate::context::RelayContext;
use crate::render;
use crate::transport::ChatTransport;

/// Sent when the completion provider fails for any reason.
pub const APOLOGY: &str = "❌ Sorry, I encountered an error processing your message.";

/// How an inbound text is routed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Inbound<'a> {
    /// Empty or whitespace-only; ignored.
    Empty,
    /// Starts with `/`; handled by [`commands`], never sent to the model.
    Command(&'a str),
    Text(&'a str),
}

impl<'a> Inbound<'a> {
    pub fn classify(text: &'a str) -> Self {
        if text.trim().is_empty() {
            Inbound::Empty
        } else if text.starts_with('/') {
            Inbound::Command(text)
        } else {
            Inbound::Text(text)
        }
    }
}

/// Terminal state of a message that did not fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageOutcome {
    /// Nothing to do: empty text.
    Filtered,
    /// Routed to the command handler (replied or silently ignored).
    Command,
    /// Improvement rendered and delivered.
    Delivered,
}

/// Process one inbound message end to end.
///
/// Errors:
/// - `CollaboratorUnavailable` when the completion call fails, times out or is
///   cancelled. The apology has already been sent (best-effort).
/// - `DeliveryFailed` when the reply could not be sent. Not retried.
pub async fn process_message<C, T>(
    ctx: &C,
    transport: &T,
    msg: &UserMessage,
) -> Result<MessageOutcome, ImproverError>
where
    C: RelayContext + ?Sized,
    T: ChatTransport + ?Sized,
{
    let text = match Inbound::classify(&msg.text) {
        Inbound::Empty => return Ok(MessageOutcome::Filtered),
        Inbound::Command(command) => {
            if let Some(reply) = commands::respond(command, ctx.bot_name()) {
                transport
                    .send_reply(msg, &reply)
                    .await
                    .map_err(|e| ImproverError::DeliveryFailed(e.to_string()))?;
                info!(chat_id = msg.chat_id, "relay: welcome sent");
            }
            return Ok(MessageOutcome::Command);
        }
        Inbound::Text(text) => text,
    };

    info!(chat_id = msg.chat_id, text_len = text.len(), "relay: received message");

    if let Err(e) = transport.send_typing(msg.chat_id).await {
        warn!(chat_id = msg.chat_id, error = %e, "relay: failed to send typing action");
    }

    let cancel = ctx.shutdown().child_token();
    let report = match improve_text(
        ctx.provider(),
        ctx.model(),
        text,
        &cancel,
        ctx.request_timeout(),
    )
    .await
    {
        Ok(report) => report,
        Err(e) => {
            warn!(
                chat_id = msg.chat_id,
                provider = %ctx.provider().name(),
                error = %e,
                "relay: improving text failed"
            );
            if let Err(send_err) = transport.send_text(msg, APOLOGY).await {
                warn!(chat_id = msg.chat_id, error = %send_err, "relay: failed to send error notice");
            }
            return Err(ImproverError::CollaboratorUnavailable {
                collaborator: ctx.provider().name().to_string(),
                reason: e.to_string(),
            });
        }
    };

    let rendered = render::render(&report);
    transport
        .send_reply(msg, &rendered)
        .await
        .map_err(|e| ImproverError::DeliveryFailed(e.to_string()))?;

    info!(
        chat_id = msg.chat_id,
        issues = report.issue_count(),
        "relay: reply delivered"
    );
    Ok(MessageOutcome::Delivered)
}
