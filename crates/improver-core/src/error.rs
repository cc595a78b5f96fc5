use thiserror::Error;

/// Error taxonomy shared by every crate in the workspace.
///
/// Configuration errors are fatal at startup. Everything else is per-message:
/// it is logged at the orchestrator boundary and never takes the process down.
/// Malformed model output is deliberately absent, the parser absorbs it.
#[derive(Debug, Error)]
pub enum ImproverError {
    #[error("Missing required configuration: {0}")]
    ConfigMissing(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("{collaborator} unavailable: {reason}")]
    CollaboratorUnavailable {
        collaborator: String,
        reason: String,
    },

    #[error("Delivery failed: {0}")]
    DeliveryFailed(String),
}

impl ImproverError {
    /// Short, stable error code used as a structured log field.
    pub fn code(&self) -> &'static str {
        match self {
            ImproverError::ConfigMissing(_) => "CONFIG_MISSING",
            ImproverError::Config(_) => "CONFIG_ERROR",
            ImproverError::CollaboratorUnavailable { .. } => "COLLABORATOR_UNAVAILABLE",
            ImproverError::DeliveryFailed(_) => "DELIVERY_FAILED",
        }
    }

    /// Whether the error should stop the process rather than a single message.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            ImproverError::ConfigMissing(_) | ImproverError::Config(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, ImproverError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_config_errors_are_fatal() {
        assert!(ImproverError::ConfigMissing("openai.api_key".into()).is_fatal());
        assert!(ImproverError::Config("bad toml".into()).is_fatal());
        assert!(!ImproverError::DeliveryFailed("chat not found".into()).is_fatal());
        assert!(!ImproverError::CollaboratorUnavailable {
            collaborator: "openai".into(),
            reason: "timeout".into(),
        }
        .is_fatal());
    }

    #[test]
    fn collaborator_message_names_the_collaborator() {
        let err = ImproverError::CollaboratorUnavailable {
            collaborator: "openai".into(),
            reason: "HTTP 500".into(),
        };
        assert_eq!(err.to_string(), "openai unavailable: HTTP 500");
        assert_eq!(err.code(), "COLLABORATOR_UNAVAILABLE");
    }
}
