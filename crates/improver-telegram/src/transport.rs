//! Outbound chat operations used by the relay.
//!
//! [`ChatTransport`] is the narrow seam between the orchestrator and the
//! messaging platform; [`TelegramTransport`] is the teloxide implementation.

use async_trait::async_trait;
use teloxide::prelude::*;
use teloxide::types::{ChatAction, ParseMode};

use improver_core::types::{MarkupMode, RenderedMessage, UserMessage};

use crate::error::TelegramError;
use crate::send;

#[async_trait]
pub trait ChatTransport: Send + Sync {
    /// Show the "typing…" status in `chat_id`.
    async fn send_typing(&self, chat_id: i64) -> Result<(), TelegramError>;

    /// Reply to `to` with rendered markup.
    async fn send_reply(
        &self,
        to: &UserMessage,
        reply: &RenderedMessage,
    ) -> Result<(), TelegramError>;

    /// Reply to `to` with unformatted text.
    async fn send_text(&self, to: &UserMessage, text: &str) -> Result<(), TelegramError>;
}

/// [`ChatTransport`] over a teloxide `Bot`. Cloning shares the HTTP client.
#[derive(Clone)]
pub struct TelegramTransport {
    bot: Bot,
}

impl TelegramTransport {
    pub fn new(bot: Bot) -> Self {
        Self { bot }
    }
}

#[async_trait]
impl ChatTransport for TelegramTransport {
    async fn send_typing(&self, chat_id: i64) -> Result<(), TelegramError> {
        self.bot
            .send_chat_action(ChatId(chat_id), ChatAction::Typing)
            .await?;
        Ok(())
    }

    async fn send_reply(
        &self,
        to: &UserMessage,
        reply: &RenderedMessage,
    ) -> Result<(), TelegramError> {
        send::send_chunked(
            &self.bot,
            ChatId(to.chat_id),
            to.message_id,
            &reply.markup_text,
            Some(parse_mode(reply.parse_mode)),
        )
        .await
    }

    async fn send_text(&self, to: &UserMessage, text: &str) -> Result<(), TelegramError> {
        send::send_chunked(&self.bot, ChatId(to.chat_id), to.message_id, text, None).await
    }
}

fn parse_mode(mode: MarkupMode) -> ParseMode {
    match mode {
        MarkupMode::Html => ParseMode::Html,
    }
}
