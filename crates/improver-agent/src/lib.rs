pub mod openai;
pub mod parse;
pub mod pipeline;
pub mod prompt;
pub mod provider;

pub use openai::OpenAiProvider;
pub use provider::{LlmProvider, ProviderError};
