//! Slash commands for configuring where alerts go and whom they ping.
//!
//! All of them need the "Manage Server" permission and only work in a server. Discord is told
//! about both when registering, and both are checked here again.

use serenity::all::{
    ChannelId, ChannelType, Colour, Command, CommandDataOptionValue, CommandInteraction,
    CommandOptionType, Context, CreateCommand, CreateCommandOption, CreateEmbed,
    CreateInteractionResponse, CreateInteractionResponseMessage, GuildId, Interaction,
    Mentionable, Permissions, RoleId,
};

use crate::{discord::SerenityPlatform, platform::ChatPlatform, settings::SettingsStore};

pub const SET_ALERT_CHANNEL: &str = "setalertchannel";
pub const SET_ALERT_ROLE: &str = "setalertrole";
pub const VIEW_ALERT_SETTINGS: &str = "viewalertsettings";

const DELETED_CHANNEL: &str = "`[Deleted channel]`";
const DELETED_ROLE: &str = "`[Deleted role]`";
const NOT_SET: &str = "`[Not set]`";

/// Same green as discord.py's `Color.green()`.
const SETTINGS_COLOUR: Colour = Colour(0x2ECC71);

/// A parsed command invocation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AlertCommand {
    SetAlertChannel(ChannelId),
    SetAlertRole(RoleId),
    ViewSettings,
}

/// Who invoked a command and where.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Invoker {
    pub guild_id: Option<GuildId>,
    pub permissions: Option<Permissions>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Authorization {
    Authorized(GuildId),
    Unauthorized,
    /// Not used in a server at all.
    WrongContext,
}

/// What to reply with. Always sent as ephemeral.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CommandReply {
    Text(String),
    Settings { channel: String, role: String },
}

impl CommandReply {
    fn text(text: impl Into<String>) -> CommandReply {
        CommandReply::Text(text.into())
    }

    #[must_use]
    pub fn to_response(&self) -> CreateInteractionResponse {
        let message = CreateInteractionResponseMessage::new().ephemeral(true);
        let message = match self {
            CommandReply::Text(text) => message.content(text),
            CommandReply::Settings { channel, role } => message.embed(
                CreateEmbed::new()
                    .title("🔧 Alert Settings")
                    .colour(SETTINGS_COLOUR)
                    .field("Admin Channel", channel, false)
                    .field("Ping Role", role, false),
            ),
        };
        CreateInteractionResponse::Message(message)
    }
}

/// Build the set of global slash commands to register.
#[must_use]
pub fn build_commands() -> Vec<CreateCommand> {
    let manage_guild_only = |command: CreateCommand| {
        command
            .default_member_permissions(Permissions::MANAGE_GUILD)
            .dm_permission(false)
    };

    vec![
        manage_guild_only(
            CreateCommand::new(SET_ALERT_CHANNEL)
                .description("Set the admin alert channel")
                .add_option(
                    CreateCommandOption::new(
                        CommandOptionType::Channel,
                        "channel",
                        "Channel to post alerts in",
                    )
                    .channel_types(vec![ChannelType::Text, ChannelType::News])
                    .required(true),
                ),
        ),
        manage_guild_only(
            CreateCommand::new(SET_ALERT_ROLE)
                .description("Set the role to ping for alerts")
                .add_option(
                    CreateCommandOption::new(CommandOptionType::Role, "role", "Role to ping")
                        .required(true),
                ),
        ),
        manage_guild_only(
            CreateCommand::new(VIEW_ALERT_SETTINGS)
                .description("View the current alert settings"),
        ),
    ]
}

/// Register global slash commands for the bot.
pub async fn register_commands(ctx: &Context) {
    match Command::set_global_commands(ctx, build_commands()).await {
        Ok(commands) => {
            let names: Vec<&str> = commands.iter().map(|c| c.name.as_str()).collect();
            log::info!("Registered {} slash commands: {names:?}", commands.len());
        }
        Err(e) => {
            log::warn!("Failed to register slash commands: {e}");
        }
    }
}

/// Check if this invoker may use the commands here.
#[must_use]
pub fn authorize(invoker: &Invoker) -> Authorization {
    let Some(guild_id) = invoker.guild_id else {
        return Authorization::WrongContext;
    };

    let can_manage = invoker
        .permissions
        .is_some_and(|x| x.manage_guild() || x.administrator());

    if can_manage {
        Authorization::Authorized(guild_id)
    } else {
        Authorization::Unauthorized
    }
}

#[must_use]
pub fn unauthorized_reply() -> CommandReply {
    CommandReply::text("🚫 You don't have permission for this command.")
}

#[must_use]
pub fn wrong_context_reply() -> CommandReply {
    CommandReply::text("❌ Command must be used in a server.")
}

/// Authorize and run a command.
///
/// # Errors
/// Errors if the settings could not be saved. Nothing is changed in that case.
pub async fn run_command<P: ChatPlatform>(
    platform: &P,
    settings: &SettingsStore,
    invoker: &Invoker,
    command: AlertCommand,
) -> Result<CommandReply, crate::settings::Error> {
    let guild_id = match authorize(invoker) {
        Authorization::Authorized(guild_id) => guild_id,
        Authorization::Unauthorized => return Ok(unauthorized_reply()),
        Authorization::WrongContext => return Ok(wrong_context_reply()),
    };

    let reply = match command {
        AlertCommand::SetAlertChannel(channel_id) => {
            settings.set_admin_channel(guild_id, channel_id)?;
            log::info!("Guild {guild_id} set its alert channel to {channel_id}");
            CommandReply::Text(format!("✅ Alert channel set to {}", channel_id.mention()))
        }
        AlertCommand::SetAlertRole(role_id) => {
            settings.set_alert_role(guild_id, role_id)?;
            log::info!("Guild {guild_id} set its alert role to {role_id}");
            CommandReply::Text(format!("✅ Alert role set to {}", role_id.mention()))
        }
        AlertCommand::ViewSettings => view_settings(platform, settings, guild_id).await,
    };

    Ok(reply)
}

async fn view_settings<P: ChatPlatform>(
    platform: &P,
    settings: &SettingsStore,
    guild_id: GuildId,
) -> CommandReply {
    let Some(guild_settings) = settings.get(guild_id) else {
        return CommandReply::text("⚠️ No alert settings set yet.");
    };

    let channel = match guild_settings.admin_channel_id {
        Some(channel_id) => match platform.channel_exists(guild_id, channel_id).await {
            true => channel_id.mention().to_string(),
            false => DELETED_CHANNEL.to_string(),
        },
        None => NOT_SET.to_string(),
    };

    let role = match guild_settings.role_id_to_ping {
        Some(role_id) => match platform.role_exists(guild_id, role_id).await {
            true => role_id.mention().to_string(),
            false => DELETED_ROLE.to_string(),
        },
        None => NOT_SET.to_string(),
    };

    CommandReply::Settings { channel, role }
}

/// Turn the interaction's command data into an [`AlertCommand`], if it's one of ours.
#[must_use]
pub fn parse_command(command: &CommandInteraction) -> Option<AlertCommand> {
    let data = &command.data;
    let option = |name: &str| {
        data.options
            .iter()
            .find(|x| x.name == name)
            .map(|x| &x.value)
    };

    match data.name.as_str() {
        SET_ALERT_CHANNEL => match option("channel")? {
            CommandDataOptionValue::Channel(channel_id) => {
                Some(AlertCommand::SetAlertChannel(*channel_id))
            }
            _ => None,
        },
        SET_ALERT_ROLE => match option("role")? {
            CommandDataOptionValue::Role(role_id) => Some(AlertCommand::SetAlertRole(*role_id)),
            _ => None,
        },
        VIEW_ALERT_SETTINGS => Some(AlertCommand::ViewSettings),
        _ => None,
    }
}

/// Handle an incoming interaction. Failures are logged, and the user just sees Discord's
/// "The application did not respond".
pub async fn handle_interaction(ctx: &Context, interaction: &Interaction, settings: &SettingsStore) {
    let Interaction::Command(command) = interaction else {
        return;
    };

    log::debug!(
        "Slash command /{} from {} in guild {:?}",
        command.data.name,
        command.user.name,
        command.guild_id
    );

    let Some(alert_command) = parse_command(command) else {
        log::warn!("Command error: could not parse /{}", command.data.name);
        return;
    };

    let invoker = Invoker {
        guild_id: command.guild_id,
        permissions: command.member.as_ref().and_then(|x| x.permissions),
    };

    let platform = SerenityPlatform::new(ctx.clone());
    let reply = match run_command(&platform, settings, &invoker, alert_command).await {
        Ok(reply) => reply,
        Err(e) => {
            log::error!("Command error: /{} failed: {e}", command.data.name);
            return;
        }
    };

    if let Err(e) = command.create_response(ctx, reply.to_response()).await {
        log::warn!("Command error: failed to respond to /{}: {e}", command.data.name);
    }
}
