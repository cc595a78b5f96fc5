//! Telegram message handler registered in the teloxide Dispatcher.

use std::sync::Arc;

use teloxide::prelude::*;
use tokio::sync::Semaphore;
use tracing::{debug, warn};

use improver_core::types::UserMessage;

use crate::context::RelayContext;
use crate::relay::process_message;
use crate::transport::TelegramTransport;

/// Main message handler registered in the teloxide Dispatcher.
///
/// Runs for every incoming `Message`. Performs:
/// 1. Bot-message filter
/// 2. Text extraction (non-text messages are ignored)
/// 3. Worker permit acquisition (bounds concurrent processing)
/// 4. Non-blocking relay invocation on a spawned task
pub async fn handle_message<C: RelayContext + 'static>(
    bot: Bot,
    msg: Message,
    ctx: Arc<C>,
    workers: Arc<Semaphore>,
) -> ResponseResult<()> {
    // 1. Ignore messages from other bots.
    if msg.from.as_ref().map(|u| u.is_bot).unwrap_or(false) {
        return Ok(());
    }

    // 2. Only plain text messages are relayed.
    let Some(text) = msg.text() else {
        return Ok(());
    };
    let inbound = UserMessage::new(msg.chat.id.0, Some(msg.id.0), text);

    // 3. Wait for a free worker slot; a closed semaphore means shutdown.
    let permit = match Arc::clone(&workers).acquire_owned().await {
        Ok(permit) => permit,
        Err(_) => return Ok(()),
    };

    // 4. Process off the dispatcher task so other chats keep flowing.
    let transport = TelegramTransport::new(bot);
    tokio::spawn(async move {
        let _permit = permit;
        match process_message(ctx.as_ref(), &transport, &inbound).await {
            Ok(outcome) => {
                debug!(chat_id = inbound.chat_id, ?outcome, "Telegram: message handled");
            }
            Err(e) => {
                warn!(
                    chat_id = inbound.chat_id,
                    code = e.code(),
                    error = %e,
                    "Telegram: message processing failed"
                );
            }
        }
    });

    Ok(())
}
