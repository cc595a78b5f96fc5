use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::error::{ImproverError, Result};

pub const DEFAULT_BOT_NAME: &str = "English Improver Bot";
pub const DEFAULT_MODEL: &str = "gpt-4o";
pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com";
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;
pub const DEFAULT_MAX_WORKERS: usize = 16;

/// Environment names understood by earlier deployments of the bot.
/// They win over both the TOML file and `IMPROVER_*` variables.
const LEGACY_ENV: &[(&str, &str)] = &[
    ("WARP_DEMO_OPENAI_API_KEY", "openai.api_key"),
    ("WARP_DEMO_BOT_KEY", "telegram.bot_token"),
    ("WARP_DEMO_BOT_NAME", "bot.name"),
];

/// Top-level config (improver.toml + IMPROVER_* env overrides).
///
/// Read once at startup and shared read-only afterwards.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ImproverConfig {
    #[serde(default)]
    pub bot: BotConfig,
    #[serde(default)]
    pub openai: OpenAiConfig,
    #[serde(default)]
    pub telegram: TelegramConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BotConfig {
    /// Display name shown in the welcome message.
    #[serde(default = "default_bot_name")]
    pub name: String,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            name: default_bot_name(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenAiConfig {
    /// Required. Blank counts as missing.
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_openai_base_url")]
    pub base_url: String,
    /// Upper bound for a single completion call, in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            model: default_model(),
            base_url: default_openai_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelegramConfig {
    /// Required. Blank counts as missing.
    #[serde(default)]
    pub bot_token: String,
    /// Maximum number of messages processed concurrently.
    #[serde(default = "default_max_workers")]
    pub max_workers: usize,
    /// Skip updates that queued up while the bot was offline.
    #[serde(default = "bool_true")]
    pub drop_pending_updates: bool,
}

impl Default for TelegramConfig {
    fn default() -> Self {
        Self {
            bot_token: String::new(),
            max_workers: default_max_workers(),
            drop_pending_updates: true,
        }
    }
}

fn bool_true() -> bool {
    true
}
fn default_bot_name() -> String {
    DEFAULT_BOT_NAME.to_string()
}
fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}
fn default_openai_base_url() -> String {
    DEFAULT_OPENAI_BASE_URL.to_string()
}
fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}
fn default_max_workers() -> usize {
    DEFAULT_MAX_WORKERS
}

impl ImproverConfig {
    /// Load config from a TOML file with env var overrides, then validate it.
    ///
    /// Precedence, lowest first:
    ///   1. TOML file (explicit path, else ~/.improver/improver.toml; a missing file is skipped)
    ///   2. IMPROVER_* env vars, `__` separating sections (IMPROVER_OPENAI__MODEL)
    ///   3. legacy WARP_DEMO_* env vars
    pub fn load(config_path: Option<&str>) -> Result<Self> {
        let path = config_path
            .map(String::from)
            .unwrap_or_else(default_config_path);

        let config: ImproverConfig = Self::figment(&path)
            .extract()
            .map_err(|e| ImproverError::Config(e.to_string()))?;

        config.validate()?;
        Ok(config)
    }

    /// The layered provider stack used by [`ImproverConfig::load`].
    pub fn figment(path: &str) -> Figment {
        let legacy = Env::raw()
            .only(&LEGACY_ENV.iter().map(|(var, _)| *var).collect::<Vec<_>>())
            .map(|key| {
                for (var, target) in LEGACY_ENV {
                    if key.as_str().eq_ignore_ascii_case(var) {
                        return (*target).into();
                    }
                }
                key.as_str().into()
            });

        Figment::new()
            .merge(Toml::file(path))
            .merge(Env::prefixed("IMPROVER_").split("__"))
            .merge(legacy)
    }

    /// Reject configs that are missing a required credential.
    pub fn validate(&self) -> Result<()> {
        if self.openai.api_key.trim().is_empty() {
            return Err(ImproverError::ConfigMissing("openai.api_key".to_string()));
        }
        if self.telegram.bot_token.trim().is_empty() {
            return Err(ImproverError::ConfigMissing("telegram.bot_token".to_string()));
        }
        if self.telegram.max_workers == 0 {
            return Err(ImproverError::Config(
                "telegram.max_workers must be at least 1".to_string(),
            ));
        }
        if self.openai.timeout_secs == 0 {
            return Err(ImproverError::Config(
                "openai.timeout_secs must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

fn default_config_path() -> String {
    let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
    format!("{}/.improver/improver.toml", home)
}
