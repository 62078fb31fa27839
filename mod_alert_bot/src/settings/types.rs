use serde::{Deserialize, Serialize};
use serenity::all::{ChannelId, RoleId};

/// Alert settings of one guild.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct GuildSettings {
    /// Channel the alerts get posted into.
    pub admin_channel_id: Option<ChannelId>,
    /// Role that gets pinged in alerts and is allowed to resolve them.
    pub role_id_to_ping: Option<RoleId>,
}

impl GuildSettings {
    /// Returns where and whom to alert, or [`None`] if alerting is not fully set up in this
    /// guild, in which case the bot should do nothing.
    #[must_use]
    pub fn alert_target(&self) -> Option<AlertTarget> {
        Some(AlertTarget {
            channel: self.admin_channel_id?,
            role: self.role_id_to_ping?,
        })
    }
}

/// Fully configured alert destination of a guild.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct AlertTarget {
    pub channel: ChannelId,
    pub role: RoleId,
}

/// How [`GuildSettings`] look in the settings file. IDs are plain integers there.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize)]
pub(super) struct StoredGuildSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(super) admin_channel_id: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(super) role_id_to_ping: Option<u64>,
}

impl From<StoredGuildSettings> for GuildSettings {
    fn from(value: StoredGuildSettings) -> Self {
        // IDs are never zero, so a zero means "not set".
        GuildSettings {
            admin_channel_id: value.admin_channel_id.filter(|&x| x != 0).map(ChannelId::new),
            role_id_to_ping: value.role_id_to_ping.filter(|&x| x != 0).map(RoleId::new),
        }
    }
}

impl From<GuildSettings> for StoredGuildSettings {
    fn from(value: GuildSettings) -> Self {
        StoredGuildSettings {
            admin_channel_id: value.admin_channel_id.map(|x| x.get()),
            role_id_to_ping: value.role_id_to_ping.map(|x| x.get()),
        }
    }
}
