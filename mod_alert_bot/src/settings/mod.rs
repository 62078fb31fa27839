mod types;

use std::{
    collections::{BTreeMap, HashMap},
    io::ErrorKind,
    path::{Path, PathBuf},
    sync::RwLock,
};

use serde::Serialize;
use serenity::all::{ChannelId, GuildId, RoleId};

use self::types::StoredGuildSettings;
pub use self::types::{AlertTarget, GuildSettings};

/// Settings of all guilds, keyed by guild ID.
pub type SettingsMap = HashMap<GuildId, GuildSettings>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to read settings file {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("settings file {} is malformed: {source}", .path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("settings file {} has an invalid guild ID of 0", .path.display())]
    ZeroGuildId { path: PathBuf },
    #[error("failed to serialize settings: {0}")]
    Serialize(serde_json::Error),
    #[error("failed to write settings file {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Read all settings from the file at `path`.
/// Returns an empty map if the file doesn't exist yet.
///
/// # Errors
/// Errors if the file can't be read or isn't a valid settings file.
pub fn load(path: &Path) -> Result<SettingsMap, Error> {
    let data = match std::fs::read(path) {
        Ok(data) => data,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            log::info!("No settings file at {}, starting fresh.", path.display());
            return Ok(SettingsMap::new());
        }
        Err(source) => {
            return Err(Error::Read {
                path: path.to_owned(),
                source,
            })
        }
    };

    // serde_json reads the stringified guild IDs as integers for us.
    let stored: BTreeMap<u64, StoredGuildSettings> =
        serde_json::from_slice(&data).map_err(|source| Error::Parse {
            path: path.to_owned(),
            source,
        })?;

    stored
        .into_iter()
        .map(|(guild_id, settings)| {
            if guild_id == 0 {
                return Err(Error::ZeroGuildId {
                    path: path.to_owned(),
                });
            }
            Ok((GuildId::new(guild_id), GuildSettings::from(settings)))
        })
        .collect()
}

/// Overwrite the file at `path` with all of `settings`, pretty-printed.
/// The write is atomic; a crash midway leaves the previous file intact.
///
/// # Errors
/// Errors if the file can't be written.
pub fn save(path: &Path, settings: &SettingsMap) -> Result<(), Error> {
    let stored: BTreeMap<u64, StoredGuildSettings> = settings
        .iter()
        .map(|(guild_id, settings)| (guild_id.get(), StoredGuildSettings::from(*settings)))
        .collect();

    let mut data = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut data, formatter);
    stored.serialize(&mut serializer).map_err(Error::Serialize)?;

    arch_bot_commons::write_file_atomically(path, &data).map_err(|source| Error::Write {
        path: path.to_owned(),
        source,
    })
}

/// Owner of all guild settings. Every change is written to disk before it's visible in memory,
/// so the two never disagree.
#[derive(Debug)]
pub struct SettingsStore {
    path: PathBuf,
    settings: RwLock<SettingsMap>,
}

impl SettingsStore {
    /// Load the store from the settings file at `path`. See [`load`].
    ///
    /// # Errors
    /// Errors if the settings file exists but can't be read or parsed.
    pub fn load(path: impl Into<PathBuf>) -> Result<SettingsStore, Error> {
        let path = path.into();
        let settings = load(&path)?;
        log::info!(
            "Loaded settings for {} guild(s) from {}",
            settings.len(),
            path.display()
        );
        Ok(SettingsStore {
            path,
            settings: RwLock::new(settings),
        })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Settings of this guild, if it has any.
    #[must_use]
    pub fn get(&self, guild_id: GuildId) -> Option<GuildSettings> {
        let settings = self.settings.read().unwrap_or_else(|e| e.into_inner());
        settings.get(&guild_id).copied()
    }

    /// Settings of this guild, or empty ones. Does not save anything.
    #[must_use]
    pub fn get_or_create(&self, guild_id: GuildId) -> GuildSettings {
        self.get(guild_id).unwrap_or_default()
    }

    /// Set the alert channel of this guild and save. Returns the new settings.
    ///
    /// # Errors
    /// Errors if saving fails, in which case nothing is changed.
    pub fn set_admin_channel(
        &self,
        guild_id: GuildId,
        channel_id: ChannelId,
    ) -> Result<GuildSettings, Error> {
        self.update(guild_id, |x| x.admin_channel_id = Some(channel_id))
    }

    /// Set the role to ping for alerts in this guild and save. Returns the new settings.
    ///
    /// # Errors
    /// Errors if saving fails, in which case nothing is changed.
    pub fn set_alert_role(&self, guild_id: GuildId, role_id: RoleId) -> Result<GuildSettings, Error> {
        self.update(guild_id, |x| x.role_id_to_ping = Some(role_id))
    }

    fn update(
        &self,
        guild_id: GuildId,
        change: impl FnOnce(&mut GuildSettings),
    ) -> Result<GuildSettings, Error> {
        // Holding the write lock through the save keeps saves in order. Readers wait for the
        // save too, which is fine for a file this small.
        let mut settings = self.settings.write().unwrap_or_else(|e| e.into_inner());

        let mut new_settings = settings.clone();
        let guild_settings = new_settings.entry(guild_id).or_default();
        change(guild_settings);
        let guild_settings = *guild_settings;

        save(&self.path, &new_settings)?;
        *settings = new_settings;

        Ok(guild_settings)
    }
}
