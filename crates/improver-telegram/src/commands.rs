//! Slash commands handled by the bot itself.
//!
//! Only `/start` produces a reply. Any other command is ignored.

use improver_core::types::RenderedMessage;

use crate::html::bold;

/// Reply for a `/`-prefixed message, or `None` when the command is unknown.
///
/// Accepts `/start`, `/START`, `/start@SomeBot` and `/start <payload>`.
pub fn respond(text: &str, bot_name: &str) -> Option<RenderedMessage> {
    match command_name(text)? {
        name if name.eq_ignore_ascii_case("start") => Some(welcome(bot_name)),
        _ => None,
    }
}

/// Static welcome message shown on `/start`.
pub fn welcome(bot_name: &str) -> RenderedMessage {
    RenderedMessage::html(format!(
        "👋 Welcome to {}!

Send me any English text, and I'll:
✅ Improve it to B2 level semiformal American English
📋 List all grammar, spelling, punctuation, style, and semantic issues

Just send your text and I'll help you improve it!",
        bold(bot_name)
    ))
}

/// `"/start@Bot payload"` → `"start"`.
fn command_name(text: &str) -> Option<&str> {
    let first = text.split_whitespace().next()?;
    let command = first.strip_prefix('/')?;
    let name = command.split('@').next().unwrap_or(command);
    if name.is_empty() {
        None
    } else {
        Some(name)
    }
}
