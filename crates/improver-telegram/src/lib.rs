pub mod adapter;
pub mod commands;
pub mod context;
pub mod error;
pub mod handler;
pub mod html;
pub mod relay;
pub mod render;
pub mod send;
pub mod transport;

pub use adapter::TelegramAdapter;
pub use context::RelayContext;
pub use error::TelegramError;
pub use relay::{process_message, MessageOutcome};
pub use transport::{ChatTransport, TelegramTransport};
