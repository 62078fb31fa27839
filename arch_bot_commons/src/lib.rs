//! This create houses common for me functions, because some things
//! are just boilerplate and aaAAAAAAAAA

use std::{env::VarError, future::Future, io::Write, path::Path};

use serenity::http::HttpError;

pub mod useful_methods;

/// Initialize logging and start the `closure` in an async runtime.
/// Logging is enabled by default on level `info` unless overridden
/// by environment variable `RUST_LOG`. This uses the crate
/// [pretty_env_logger][] internally, see its documentation for more details.
///
/// [pretty_env_logger]: https://docs.rs/pretty_env_logger
///
/// # Panics
///
/// Panics if the tokio runtime fails to build.
pub fn start_everything(closure: impl Future<Output = ()>) {
    let log_level = std::env::var_os("RUST_LOG")
        .unwrap_or_else(|| std::ffi::OsString::from("info"))
        .into_string()
        .unwrap_or_else(|_| String::from("info"));

    let running_as_systemd_service = std::env::var_os("JOURNAL_STREAM").is_some();

    let mut builder = match running_as_systemd_service {
        true => pretty_env_logger::formatted_builder(),
        false => pretty_env_logger::formatted_timed_builder(),
    };

    builder.parse_filters(&log_level);

    if builder.try_init().is_err() {
        log::error!("Tried to init logger twice!");
    }

    log::info!("hi");

    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .expect("Failed to build the tokio runtime!")
        .block_on(closure);
}

/// Read a required environment variable, like a bot token.
///
/// An empty value counts as not present.
///
/// # Errors
/// Returns [`VarError::NotPresent`] if it's unset or empty, and
/// [`VarError::NotUnicode`] if it's not valid unicode.
pub fn require_env_var(name: &str) -> Result<String, VarError> {
    match std::env::var(name) {
        Ok(value) if value.trim().is_empty() => Err(VarError::NotPresent),
        other => other,
    }
}

/// Returns `true` if this error is Discord telling us to slow down,
/// i.e. an HTTP 429 response.
#[must_use]
pub fn is_rate_limited(error: &serenity::Error) -> bool {
    match error {
        serenity::Error::Http(HttpError::UnsuccessfulRequest(response)) => {
            response.status_code.as_u16() == 429
        }
        _ => false,
    }
}

/// Write `data` to `path` by writing a temporary file next to it first and
/// then renaming it over the destination, so that a crash halfway through
/// never leaves a half-written file behind. An existing file keeps its permissions.
///
/// # Errors
/// Errors if creating, writing, syncing or renaming the temporary file fails.
pub fn write_file_atomically(path: &Path, data: &[u8]) -> std::io::Result<()> {
    // A bare file name like "settings.json" has an empty parent.
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut file = tempfile::NamedTempFile::new_in(dir)?;
    if let Ok(metadata) = std::fs::metadata(path) {
        file.as_file().set_permissions(metadata.permissions())?;
    }
    file.write_all(data)?;
    file.as_file().sync_all()?;
    file.persist(path).map_err(|e| e.error)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn atomic_write_replaces_contents() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("thing.json");

        write_file_atomically(&path, b"first").unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), b"first");

        write_file_atomically(&path, b"second, longer").unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), b"second, longer");

        // No leftover temporary files.
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[cfg(unix)]
    #[test]
    fn atomic_write_keeps_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("thing.json");
        std::fs::write(&path, b"first").unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o644)).unwrap();

        write_file_atomically(&path, b"second").unwrap();

        let mode = std::fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o644);
        assert_eq!(std::fs::read(&path).unwrap(), b"second");
    }

    #[test]
    fn atomic_write_fails_in_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nope").join("thing.json");

        assert!(write_file_atomically(&path, b"data").is_err());
    }

    async fn http_error(status: u16) -> serenity::Error {
        let response = http::Response::builder()
            .status(status)
            .body("{}")
            .unwrap();
        let response = serenity::http::ErrorResponse::from_response(
            reqwest::Response::from(response),
            reqwest::Method::GET,
        )
        .await;
        serenity::Error::Http(HttpError::UnsuccessfulRequest(response))
    }

    #[tokio::test]
    async fn only_429_counts_as_rate_limited() {
        assert!(is_rate_limited(&http_error(429).await));
        assert!(!is_rate_limited(&http_error(401).await));
        assert!(!is_rate_limited(&http_error(500).await));
        assert!(!is_rate_limited(&serenity::Error::Other("gateway went away")));
    }
}
