use std::sync::Arc;

use arch_bot_commons::is_rate_limited;
use serenity::Client;

use crate::{
    config::{self, Config},
    discord::{required_intents, Handler},
    reactions::ReactionStateMachine,
    settings::{self, SettingsStore},
};

/// Things that stop the bot from starting or running at all.
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error(transparent)]
    Config(#[from] config::Error),
    #[error("failed to load settings: {0}")]
    Settings(#[from] settings::Error),
    #[error("⚠️ Discord rate-limited this connection.")]
    RateLimited,
    #[error("Discord HTTP error: {0}")]
    Discord(serenity::Error),
}

impl From<serenity::Error> for StartupError {
    fn from(value: serenity::Error) -> Self {
        if is_rate_limited(&value) {
            StartupError::RateLimited
        } else {
            StartupError::Discord(value)
        }
    }
}

/// Start the bot and run it until it's stopped with Ctrl+C.
///
/// # Errors
/// Errors if the config or the settings file is bad, or if connecting to Discord fails.
pub async fn entry() -> Result<(), StartupError> {
    log::info!("ASYNC WOOOO");
    let config = Config::from_env()?;
    log::debug!("{config:?}");

    let settings = Arc::new(SettingsStore::load(&config.settings_path)?);
    let reactions = Arc::new(ReactionStateMachine::new(settings.clone()));

    log::info!("Creating the handler...");

    let mut client = Client::builder(&config.token, required_intents())
        .event_handler(Handler::new(settings, reactions))
        .await?;

    let shard_manager = client.shard_manager.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            log::info!("Ctrl+C received, shutting down.");
            shard_manager.shutdown_all().await;
        }
    });

    log::info!("Dispatching the dispatcher!");

    client.start().await?;

    log::info!("it appears we have been bonked.");
    Ok(())
}
