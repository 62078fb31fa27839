//! Source code for the moderator bell bot for Discord.
//!
//! React with 🛎 on any message to send it to the moderators' alert channel,
//! pinging their role. A moderator resolves the alert by reacting ✅ on it.

/// Per-guild alert settings, persisted to a JSON file.
pub mod settings;

/// In-memory bookkeeping of flagged messages and their alerts.
pub mod flags;

/// Everything the bot asks of the chat platform, as a trait.
pub mod platform;

/// Implementation of [`platform::ChatPlatform`] over serenity.
mod discord;

/// Composing the alert notification.
pub mod alert;

/// Flag and resolve handling for reactions.
pub mod reactions;

/// Slash commands for configuring the bot.
pub mod commands;

/// Configuration from the environment.
pub mod config;

/// Entry function that starts the bot.
mod entry;
pub use entry::*;

#[cfg(test)]
mod test_platform;

/// Reacting with this on a message flags it for moderators. This is U+1F6CE without a
/// variation selector, matching what people have been reacting with already.
pub const FLAG_EMOJI: &str = "\u{1F6CE}";

/// Reacting with this on an alert resolves it.
pub const RESOLVE_EMOJI: &str = "\u{2705}";
