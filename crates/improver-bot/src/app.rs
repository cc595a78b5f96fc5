use std::time::Duration;

use improver_agent::provider::LlmProvider;
use improver_core::config::ImproverConfig;
use improver_telegram::RelayContext;
use tokio_util::sync::CancellationToken;

/// Central shared state, passed as `Arc<AppState>` into the Telegram dispatcher.
///
/// Read-only after startup apart from the shutdown token.
pub struct AppState {
    pub config: ImproverConfig,
    pub provider: Box<dyn LlmProvider>,
    pub shutdown: CancellationToken,
}

impl AppState {
    pub fn new(config: ImproverConfig, provider: Box<dyn LlmProvider>) -> Self {
        Self {
            config,
            provider,
            shutdown: CancellationToken::new(),
        }
    }
}

impl RelayContext for AppState {
    fn provider(&self) -> &dyn LlmProvider {
        self.provider.as_ref()
    }

    fn model(&self) -> &str {
        &self.config.openai.model
    }

    fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.config.openai.timeout_secs)
    }

    fn bot_name(&self) -> &str {
        &self.config.bot.name
    }

    fn shutdown(&self) -> &CancellationToken {
        &self.shutdown
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use improver_agent::OpenAiProvider;

    #[test]
    fn context_reflects_config() {
        let mut config = ImproverConfig::default();
        config.bot.name = "Grammar Pal".to_string();
        config.openai.model = "gpt-4o-mini".to_string();
        config.openai.timeout_secs = 15;

        let state = AppState::new(
            config,
            Box::new(OpenAiProvider::new("sk-test".to_string(), None)),
        );

        assert_eq!(state.bot_name(), "Grammar Pal");
        assert_eq!(state.model(), "gpt-4o-mini");
        assert_eq!(state.request_timeout(), Duration::from_secs(15));
        assert_eq!(state.provider().name(), "openai");
        assert!(!state.shutdown().is_cancelled());
    }
}
