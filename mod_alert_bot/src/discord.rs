use std::sync::Arc;

use arch_bot_commons::useful_methods::GuildStuff;
use serenity::{
    all::{
        ChannelId, Context, EventHandler, GatewayIntents, GuildId, Interaction, MessageId,
        Reaction, ReactionType, Ready, RoleId,
    },
    async_trait,
};

use crate::{
    alert::AlertNotification,
    commands,
    platform::{ChatPlatform, FetchedMessage},
    reactions::{ReactionEvent, ReactionStateMachine},
    settings::SettingsStore,
};

/// Required gateway intents for the bot.
#[must_use]
pub fn required_intents() -> GatewayIntents {
    GatewayIntents::GUILDS
        | GatewayIntents::GUILD_MEMBERS
        | GatewayIntents::GUILD_MESSAGES
        | GatewayIntents::GUILD_MESSAGE_REACTIONS
        | GatewayIntents::MESSAGE_CONTENT
}

/// [`ChatPlatform`] over a serenity [`Context`].
#[derive(Clone)]
pub struct SerenityPlatform {
    ctx: Context,
}

impl SerenityPlatform {
    #[must_use]
    pub fn new(ctx: Context) -> SerenityPlatform {
        SerenityPlatform { ctx }
    }
}

impl ChatPlatform for SerenityPlatform {
    type Error = serenity::Error;

    async fn fetch_message(
        &self,
        channel_id: ChannelId,
        message_id: MessageId,
    ) -> Result<FetchedMessage, serenity::Error> {
        let message = channel_id.message(&self.ctx, message_id).await?;
        Ok(FetchedMessage {
            content: message.content,
            attachment_filenames: message.attachments.into_iter().map(|x| x.filename).collect(),
        })
    }

    async fn send_alert(
        &self,
        channel_id: ChannelId,
        alert: &AlertNotification,
    ) -> Result<MessageId, serenity::Error> {
        let message = channel_id
            .send_message(&self.ctx, alert.to_create_message())
            .await?;
        Ok(message.id)
    }

    async fn add_reaction(
        &self,
        channel_id: ChannelId,
        message_id: MessageId,
        emoji: &str,
    ) -> Result<(), serenity::Error> {
        let reaction = ReactionType::Unicode(emoji.to_string());
        self.ctx
            .http
            .create_reaction(channel_id, message_id, &reaction)
            .await
    }

    async fn clear_reaction(
        &self,
        channel_id: ChannelId,
        message_id: MessageId,
        emoji: &str,
    ) -> Result<(), serenity::Error> {
        let reaction = ReactionType::Unicode(emoji.to_string());
        self.ctx
            .http
            .delete_message_reaction_emoji(channel_id, message_id, &reaction)
            .await
    }

    async fn delete_message(
        &self,
        channel_id: ChannelId,
        message_id: MessageId,
    ) -> Result<(), serenity::Error> {
        self.ctx
            .http
            .delete_message(channel_id, message_id, None)
            .await
    }

    async fn text_channels(&self, guild_id: GuildId) -> Result<Vec<ChannelId>, serenity::Error> {
        guild_id.text_channels_in_order(&self.ctx.http).await
    }

    async fn channel_exists(&self, guild_id: GuildId, channel_id: ChannelId) -> bool {
        let cached = self
            .ctx
            .cache
            .guild(guild_id)
            .map(|guild| guild.channels.contains_key(&channel_id));
        if let Some(exists) = cached {
            return exists;
        }

        match guild_id.channels(&self.ctx.http).await {
            Ok(channels) => channels.contains_key(&channel_id),
            Err(e) => {
                log::warn!("Could not fetch channels of guild {guild_id}: {e}");
                false
            }
        }
    }

    async fn role_exists(&self, guild_id: GuildId, role_id: RoleId) -> bool {
        let cached = self
            .ctx
            .cache
            .guild(guild_id)
            .map(|guild| guild.roles.contains_key(&role_id));
        if let Some(exists) = cached {
            return exists;
        }

        match guild_id.roles(&self.ctx.http).await {
            Ok(roles) => roles.contains_key(&role_id),
            Err(e) => {
                log::warn!("Could not fetch roles of guild {guild_id}: {e}");
                false
            }
        }
    }
}

/// Gather what the state machine needs to know about a reaction. Returns [`None`] for reactions
/// outside of guilds, or if the member who reacted can't be found.
async fn reaction_event(ctx: &Context, reaction: &Reaction) -> Option<ReactionEvent> {
    let guild_id = reaction.guild_id?;
    let user_id = reaction.user_id?;

    let member = match &reaction.member {
        Some(member) => member.clone(),
        None => match guild_id.member(ctx, user_id).await {
            Ok(member) => member,
            Err(e) => {
                log::debug!("Could not fetch member {user_id} of guild {guild_id}: {e}");
                return None;
            }
        },
    };

    Some(ReactionEvent {
        guild_id,
        channel_id: reaction.channel_id,
        message_id: reaction.message_id,
        user_id,
        user_is_bot: member.user.bot,
        user_roles: member.roles,
        emoji: reaction.emoji.clone(),
    })
}

/// Serenity event handler, passing everything along to the commands and the state machine.
pub struct Handler {
    settings: Arc<SettingsStore>,
    reactions: Arc<ReactionStateMachine>,
}

impl Handler {
    #[must_use]
    pub fn new(settings: Arc<SettingsStore>, reactions: Arc<ReactionStateMachine>) -> Handler {
        Handler {
            settings,
            reactions,
        }
    }
}

#[async_trait]
impl EventHandler for Handler {
    async fn ready(&self, ctx: Context, ready: Ready) {
        log::info!("✅ Bot is online as {}", ready.user.name);
        commands::register_commands(&ctx).await;
    }

    async fn interaction_create(&self, ctx: Context, interaction: Interaction) {
        commands::handle_interaction(&ctx, &interaction, &self.settings).await;
    }

    async fn reaction_add(&self, ctx: Context, add_reaction: Reaction) {
        let Some(event) = reaction_event(&ctx, &add_reaction).await else {
            return;
        };

        let platform = SerenityPlatform::new(ctx);
        let outcome = self.reactions.handle_reaction(&platform, &event).await;
        log::debug!(
            "Reaction {} on message {}: {outcome:?}",
            event.emoji,
            event.message_id
        );
    }
}
