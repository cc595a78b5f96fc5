//! Host context interface for the relay.
//!
//! `RelayContext` is implemented by the binary's `AppState` and by test
//! doubles. Everything behind it is read-only after startup.

use std::time::Duration;

use tokio_util::sync::CancellationToken;

use improver_agent::provider::LlmProvider;

/// Minimal context required to process one message.
pub trait RelayContext: Send + Sync {
    fn provider(&self) -> &dyn LlmProvider;

    /// Model identifier passed to the provider.
    fn model(&self) -> &str;

    /// Upper bound for a single completion call.
    fn request_timeout(&self) -> Duration;

    /// Display name used in the welcome message.
    fn bot_name(&self) -> &str;

    /// Process-wide shutdown signal. Each message derives a child token from it.
    fn shutdown(&self) -> &CancellationToken;
}
