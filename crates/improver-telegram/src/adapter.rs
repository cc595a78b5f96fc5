//! Telegram channel adapter.
//!
//! Wraps a teloxide `Bot` + `Dispatcher` and drives the long-polling event loop
//! until Ctrl-C.

use std::sync::Arc;
use std::time::Duration;

use teloxide::error_handlers::LoggingErrorHandler;
use teloxide::prelude::*;
use teloxide::update_listeners::Polling;
use tokio::sync::Semaphore;
use tracing::{info, warn};

use improver_core::config::TelegramConfig;

use crate::context::RelayContext;
use crate::error::TelegramError;
use crate::handler::handle_message;

/// How long in-flight messages get to finish once the dispatcher has stopped.
const DRAIN_TIMEOUT: Duration = Duration::from_secs(5);

/// Telegram channel adapter.
///
/// Long polling, no public URL required.
pub struct TelegramAdapter<C: RelayContext + 'static> {
    ctx: Arc<C>,
    config: TelegramConfig,
}

impl<C: RelayContext + 'static> TelegramAdapter<C> {
    pub fn new(config: &TelegramConfig, ctx: Arc<C>) -> Result<Self, TelegramError> {
        if config.bot_token.trim().is_empty() {
            return Err(TelegramError::NoToken);
        }
        Ok(Self {
            ctx,
            config: config.clone(),
        })
    }

    /// Connect to Telegram and drive the long-polling loop.
    ///
    /// Returns once the dispatcher stops (Ctrl-C). The shared shutdown token is
    /// then cancelled and in-flight messages get [`DRAIN_TIMEOUT`] to send
    /// their apology before the caller tears the runtime down.
    pub async fn run(self) {
        let bot = Bot::new(&self.config.bot_token);
        let workers = Arc::new(Semaphore::new(self.config.max_workers));

        info!(
            max_workers = self.config.max_workers,
            drop_pending_updates = self.config.drop_pending_updates,
            "Telegram: starting long-polling dispatcher"
        );

        let mut polling = Polling::builder(bot.clone());
        if self.config.drop_pending_updates {
            polling = polling.drop_pending_updates();
        }
        let listener = polling.build();

        let handler = Update::filter_message().endpoint(handle_message::<C>);

        Dispatcher::builder(bot, handler)
            .dependencies(dptree::deps![Arc::clone(&self.ctx), Arc::clone(&workers)])
            .default_handler(|_upd| async {})
            .enable_ctrlc_handler()
            .build()
            .dispatch_with_listener(
                listener,
                LoggingErrorHandler::with_custom_text("Telegram: update listener error"),
            )
            .await;

        info!("Telegram: dispatcher stopped");
        self.ctx.shutdown().cancel();

        let slots = u32::try_from(self.config.max_workers).unwrap_or(u32::MAX);
        let drained = tokio::time::timeout(DRAIN_TIMEOUT, workers.acquire_many(slots))
            .await
            .is_ok();
        if drained {
            info!("Telegram: in-flight messages drained");
        } else {
            warn!("Telegram: gave up waiting for in-flight messages");
        }
    }
}
