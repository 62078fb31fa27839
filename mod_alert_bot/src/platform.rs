use std::{fmt::Display, future::Future};

use serenity::all::{ChannelId, GuildId, MessageId, RoleId};

use crate::alert::AlertNotification;

/// The parts of a fetched message the bot cares about.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FetchedMessage {
    pub content: String,
    pub attachment_filenames: Vec<String>,
}

/// Everything the bot needs from the chat platform. This is implemented over serenity for the
/// real thing, and over an in-memory fake for tests.
///
/// None of these retry anything; a failure is reported once and that's it.
pub trait ChatPlatform: Sync {
    type Error: Display + Send;

    fn fetch_message(
        &self,
        channel_id: ChannelId,
        message_id: MessageId,
    ) -> impl Future<Output = Result<FetchedMessage, Self::Error>> + Send;

    /// Post an alert and return the ID of the posted message.
    fn send_alert(
        &self,
        channel_id: ChannelId,
        alert: &AlertNotification,
    ) -> impl Future<Output = Result<MessageId, Self::Error>> + Send;

    fn add_reaction(
        &self,
        channel_id: ChannelId,
        message_id: MessageId,
        emoji: &str,
    ) -> impl Future<Output = Result<(), Self::Error>> + Send;

    /// Remove every reaction of this emoji from a message, no matter who reacted.
    /// Errors if the message isn't in this channel.
    fn clear_reaction(
        &self,
        channel_id: ChannelId,
        message_id: MessageId,
        emoji: &str,
    ) -> impl Future<Output = Result<(), Self::Error>> + Send;

    fn delete_message(
        &self,
        channel_id: ChannelId,
        message_id: MessageId,
    ) -> impl Future<Output = Result<(), Self::Error>> + Send;

    /// All text channels of the guild, always in the same order.
    fn text_channels(
        &self,
        guild_id: GuildId,
    ) -> impl Future<Output = Result<Vec<ChannelId>, Self::Error>> + Send;

    /// Whether the channel still exists in this guild. Failing to find out counts as `false`.
    fn channel_exists(
        &self,
        guild_id: GuildId,
        channel_id: ChannelId,
    ) -> impl Future<Output = bool> + Send;

    /// Whether the role still exists in this guild. Failing to find out counts as `false`.
    fn role_exists(&self, guild_id: GuildId, role_id: RoleId) -> impl Future<Output = bool> + Send;
}
