use serenity::all::{
    ChannelId, Colour, CreateAllowedMentions, CreateEmbed, CreateEmbedFooter, CreateMessage,
    GuildId, Mentionable, MessageId, RoleId, UserId,
};

use crate::{platform::FetchedMessage, FLAG_EMOJI};

/// Discord does not allow embed field values longer than this.
pub const PREVIEW_MAX_CHARS: usize = 1024;

/// Shown in the alert for messages with neither text nor attachments, like stickers.
pub const NO_CONTENT_PREVIEW: &str = "*[No text content]*";

/// The same orange as discord.py's `Color.orange()`, which people already know these alerts by.
const ALERT_COLOUR: Colour = Colour(0xE67E22);

/// Make a short preview of a flagged message: its text cut to [`PREVIEW_MAX_CHARS`], or the name
/// of its first attachment, or [`NO_CONTENT_PREVIEW`].
#[must_use]
pub fn message_preview(message: &FetchedMessage) -> String {
    if !message.content.is_empty() {
        return message.content.chars().take(PREVIEW_MAX_CHARS).collect();
    }

    if let Some(filename) = message.attachment_filenames.first() {
        return format!("[Attachment: {filename}]");
    }

    NO_CONTENT_PREVIEW.to_string()
}

/// Link that opens the message in the client.
#[must_use]
pub fn jump_link(guild_id: GuildId, channel_id: ChannelId, message_id: MessageId) -> String {
    format!("https://discord.com/channels/{guild_id}/{channel_id}/{message_id}")
}

/// An alert about a flagged message, as posted to the alert channel.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AlertNotification {
    pub role_to_ping: RoleId,
    pub flagged_by: UserId,
    pub source_channel: ChannelId,
    pub message_id: MessageId,
    pub preview: String,
    pub link: String,
}

impl AlertNotification {
    #[must_use]
    pub fn new(
        guild_id: GuildId,
        role_to_ping: RoleId,
        flagged_by: UserId,
        source_channel: ChannelId,
        message_id: MessageId,
        message: &FetchedMessage,
    ) -> AlertNotification {
        AlertNotification {
            role_to_ping,
            flagged_by,
            source_channel,
            message_id,
            preview: message_preview(message),
            link: jump_link(guild_id, source_channel, message_id),
        }
    }

    #[must_use]
    pub fn content(&self) -> String {
        self.role_to_ping.mention().to_string()
    }

    #[must_use]
    pub fn description(&self) -> String {
        format!(
            "{} reacted with {} in {}",
            self.flagged_by.mention(),
            FLAG_EMOJI,
            self.source_channel.mention()
        )
    }

    #[must_use]
    pub fn footer(&self) -> String {
        format!("Message ID: {}", self.message_id)
    }

    #[must_use]
    pub fn embed(&self) -> CreateEmbed {
        CreateEmbed::new()
            .title("🔔 Message flagged!")
            .description(self.description())
            .colour(ALERT_COLOUR)
            .field("Quoted Message", &self.preview, false)
            .field("Channel", self.source_channel.mention().to_string(), true)
            .field(
                "Jump to Message",
                format!("[Click here to view]({})", self.link),
                false,
            )
            .footer(CreateEmbedFooter::new(self.footer()))
    }

    /// The whole message to send, pinging only the alert role.
    #[must_use]
    pub fn to_create_message(&self) -> CreateMessage {
        CreateMessage::new()
            .content(self.content())
            .embed(self.embed())
            .allowed_mentions(CreateAllowedMentions::new().roles(vec![self.role_to_ping]))
    }
}
