use std::sync::Arc;

use arch_bot_commons::useful_methods::ReactionStuff;
use serenity::all::{ChannelId, GuildId, MessageId, ReactionType, RoleId, UserId};

use crate::{
    alert::AlertNotification,
    flags::FlagRegistry,
    platform::ChatPlatform,
    settings::{AlertTarget, SettingsStore},
    FLAG_EMOJI, RESOLVE_EMOJI,
};

/// A reaction being added to a message in a guild.
#[derive(Clone, Debug)]
pub struct ReactionEvent {
    pub guild_id: GuildId,
    pub channel_id: ChannelId,
    pub message_id: MessageId,
    pub user_id: UserId,
    /// Whether the user who reacted is a bot.
    pub user_is_bot: bool,
    /// Roles the user who reacted currently has.
    pub user_roles: Vec<RoleId>,
    pub emoji: ReactionType,
}

/// Why a reaction was left alone.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Ignored {
    BotUser,
    NotConfigured,
    OtherEmoji,
    AlreadyFlagged,
    MessageUnavailable,
    NotModerator,
    UnknownAlert,
}

/// What came out of handling a reaction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    Ignored(Ignored),
    /// An alert was posted and recorded.
    Flagged { alert: MessageId },
    /// Posting the alert failed. Nothing was recorded, so flagging again retries.
    AlertFailed,
    /// The alert's entry was removed. Clearing the bell and deleting the alert are best effort.
    Resolved {
        original: MessageId,
        bell_cleared: bool,
        alert_deleted: bool,
    },
}

/// Reacts to 🛎 by alerting moderators and to ✅ on an alert by resolving it.
#[derive(Debug)]
pub struct ReactionStateMachine {
    settings: Arc<SettingsStore>,
    flags: FlagRegistry,
}

impl ReactionStateMachine {
    #[must_use]
    pub fn new(settings: Arc<SettingsStore>) -> ReactionStateMachine {
        ReactionStateMachine {
            settings,
            flags: FlagRegistry::new(),
        }
    }

    #[must_use]
    pub fn flags(&self) -> &FlagRegistry {
        &self.flags
    }

    /// Handle a reaction being added. Never fails; platform errors are logged and the
    /// operation is dropped.
    pub async fn handle_reaction<P: ChatPlatform>(
        &self,
        platform: &P,
        event: &ReactionEvent,
    ) -> Outcome {
        if event.user_is_bot {
            return Outcome::Ignored(Ignored::BotUser);
        }

        let Some(target) = self
            .settings
            .get(event.guild_id)
            .and_then(|x| x.alert_target())
        else {
            return Outcome::Ignored(Ignored::NotConfigured);
        };

        if event.emoji.is_unicode(FLAG_EMOJI) {
            self.flag(platform, event, target).await
        } else if event.emoji.is_unicode(RESOLVE_EMOJI) {
            self.resolve(platform, event, target).await
        } else {
            Outcome::Ignored(Ignored::OtherEmoji)
        }
    }

    async fn flag<P: ChatPlatform>(
        &self,
        platform: &P,
        event: &ReactionEvent,
        target: AlertTarget,
    ) -> Outcome {
        if self.flags.is_flagged(event.message_id) {
            return Outcome::Ignored(Ignored::AlreadyFlagged);
        }

        let message = match platform
            .fetch_message(event.channel_id, event.message_id)
            .await
        {
            Ok(message) => message,
            Err(e) => {
                log::warn!(
                    "Could not fetch flagged message {} in channel {}: {e}",
                    event.message_id,
                    event.channel_id
                );
                return Outcome::Ignored(Ignored::MessageUnavailable);
            }
        };

        let alert = AlertNotification::new(
            event.guild_id,
            target.role,
            event.user_id,
            event.channel_id,
            event.message_id,
            &message,
        );

        let alert_id = match platform.send_alert(target.channel, &alert).await {
            Ok(alert_id) => alert_id,
            Err(e) => {
                log::warn!("Error sending alert to channel {}: {e}", target.channel);
                return Outcome::AlertFailed;
            }
        };

        if let Err(e) = platform
            .add_reaction(target.channel, alert_id, RESOLVE_EMOJI)
            .await
        {
            // The alert is out there, but without the entry nobody can resolve it.
            log::warn!("Error adding the resolve reaction to alert {alert_id}: {e}");
            return Outcome::AlertFailed;
        }

        self.flags.insert(event.message_id, alert_id);
        log::info!(
            "Message {} in guild {} flagged by {}, alert {alert_id} posted.",
            event.message_id,
            event.guild_id,
            event.user_id
        );

        Outcome::Flagged { alert: alert_id }
    }

    async fn resolve<P: ChatPlatform>(
        &self,
        platform: &P,
        event: &ReactionEvent,
        target: AlertTarget,
    ) -> Outcome {
        if !event.user_roles.contains(&target.role) {
            return Outcome::Ignored(Ignored::NotModerator);
        }

        let Some(original) = self.flags.find_by_alert(event.message_id) else {
            return Outcome::Ignored(Ignored::UnknownAlert);
        };

        let bell_cleared = clear_bell(platform, event.guild_id, original).await;

        let alert_deleted = match platform
            .delete_message(event.channel_id, event.message_id)
            .await
        {
            Ok(()) => true,
            Err(e) => {
                log::warn!("Error deleting alert {}: {e}", event.message_id);
                false
            }
        };

        self.flags.remove(original);
        log::info!(
            "Alert {} for message {original} resolved by {}.",
            event.message_id,
            event.user_id
        );

        Outcome::Resolved {
            original,
            bell_cleared,
            alert_deleted,
        }
    }
}

/// Look for the original message through the guild's text channels and clear the bell from it.
/// Returns `true` if it was found and cleared.
async fn clear_bell<P: ChatPlatform>(platform: &P, guild_id: GuildId, original: MessageId) -> bool {
    let channels = match platform.text_channels(guild_id).await {
        Ok(channels) => channels,
        Err(e) => {
            log::warn!("Could not list channels of guild {guild_id}: {e}");
            return false;
        }
    };

    for channel_id in channels {
        match platform
            .clear_reaction(channel_id, original, FLAG_EMOJI)
            .await
        {
            Ok(()) => return true,
            Err(e) => {
                log::debug!("Could not clear reaction in channel {channel_id}: {e}");
            }
        }
    }

    log::warn!("Could not find message {original} to clear its reaction; was it deleted?");
    false
}
