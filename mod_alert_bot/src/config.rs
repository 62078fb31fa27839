use std::{env::VarError, fmt, path::PathBuf};

/// Environment variable holding the bot token.
pub const TOKEN_ENV_VAR: &str = "Discord_Bot_Token";

/// Environment variable that can point the settings file elsewhere.
pub const SETTINGS_PATH_ENV_VAR: &str = "ALERT_SETTINGS_FILE";

pub const DEFAULT_SETTINGS_PATH: &str = "settings.json";

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("🔐 Please add your bot token under Secrets as {var} ({source})")]
    MissingToken {
        var: &'static str,
        source: VarError,
    },
}

#[derive(Clone)]
pub struct Config {
    pub token: String,
    pub settings_path: PathBuf,
}

impl Config {
    /// Read the config from the environment.
    ///
    /// # Errors
    /// Errors if the token is not set.
    pub fn from_env() -> Result<Config, Error> {
        let token = arch_bot_commons::require_env_var(TOKEN_ENV_VAR).map_err(|source| {
            Error::MissingToken {
                var: TOKEN_ENV_VAR,
                source,
            }
        })?;

        let settings_path = std::env::var_os(SETTINGS_PATH_ENV_VAR)
            .filter(|x| !x.is_empty())
            .map_or_else(|| PathBuf::from(DEFAULT_SETTINGS_PATH), PathBuf::from);

        Ok(Config {
            token,
            settings_path,
        })
    }
}

// Keep the token out of logs.
impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("token", &"[redacted]")
            .field("settings_path", &self.settings_path)
            .finish()
    }
}
