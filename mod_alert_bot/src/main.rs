use arch_bot_commons::*;
use mod_alert_bot::StartupError;

fn main() {
    if std::env::var_os("RUST_LOG").is_none() {
        std::env::set_var("RUST_LOG", "warn,mod_alert_bot=info");
    }
    start_everything(async {
        match mod_alert_bot::entry().await {
            Ok(()) => {}
            Err(e @ StartupError::RateLimited) => {
                log::error!("{e}");
                std::process::exit(1);
            }
            Err(e) => {
                log::error!("Bot startup error: {e}");
                std::process::exit(1);
            }
        }
    });
}
