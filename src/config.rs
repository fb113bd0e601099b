//! Configuration management for the Spotify listening data collector.
//!
//! This module handles loading and accessing configuration values from environment
//! variables and `.env` files. Credentials and database location are supplied
//! out-of-band; nothing here is required to be set, every getter either has a
//! sensible default or returns an `Option`.
//!
//! The configuration system follows a hierarchical approach:
//! 1. Environment variables (highest priority)
//! 2. `.env` file in the local data directory
//! 3. `.env` file in the current working directory
//! 4. Application defaults

use std::{env, path::PathBuf, time::Duration};

pub const DEFAULT_SPOTIFY_API_URL: &str = "https://api.spotify.com/v1";
pub const DEFAULT_PREVIEW_API_URL: &str = "https://www.googleapis.com/youtube/v3/search";
pub const DEFAULT_SERVER_ADDRESS: &str = "0.0.0.0:5002";
pub const DEFAULT_MAX_RETRIES: u32 = 3;
pub const DEFAULT_MAX_WAIT_SECS: u64 = 60;

/// Loads environment variables from a `.env` file in the local data directory.
///
/// Creates the directory structure if it doesn't exist and loads variables from
/// `spotcollect/.env` under the platform-specific local data directory:
/// - Linux: `~/.local/share/spotcollect/.env`
/// - macOS: `~/Library/Application Support/spotcollect/.env`
/// - Windows: `%LOCALAPPDATA%/spotcollect/.env`
///
/// When that file does not exist a `.env` in the working directory is tried.
/// Missing files are not an error since every setting can come from the
/// process environment.
///
/// # Errors
///
/// Returns an error string if the data directory cannot be created or an
/// existing `.env` file cannot be parsed.
pub async fn load_env() -> Result<(), String> {
    let path = data_dir().join(".env");
    if let Some(parent) = path.parent() {
        async_fs::create_dir_all(parent)
            .await
            .map_err(|e| e.to_string())?;
    }

    if path.is_file() {
        dotenv::from_path(&path).map_err(|e| e.to_string())?;
    } else {
        dotenv::dotenv().ok();
    }
    Ok(())
}

/// Returns the application directory inside the local data directory.
pub fn data_dir() -> PathBuf {
    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("spotcollect");
    path
}

/// Returns the Spotify Web API base URL.
///
/// Reads `SPOTIFY_API_URL`, defaulting to `https://api.spotify.com/v1`.
pub fn spotify_apiurl() -> String {
    env::var("SPOTIFY_API_URL").unwrap_or_else(|_| DEFAULT_SPOTIFY_API_URL.to_string())
}

/// Returns the access token used by the `collect` command when none is passed.
///
/// Reads `SPOTIFY_ACCESS_TOKEN`. Tokens are obtained out-of-band.
pub fn spotify_access_token() -> Option<String> {
    env::var("SPOTIFY_ACCESS_TOKEN")
        .ok()
        .filter(|t| !t.trim().is_empty())
}

/// Returns the path of the SQLite database.
///
/// Reads `DATABASE_PATH`, defaulting to `spotcollect.db` in the data directory.
pub fn database_path() -> PathBuf {
    match env::var("DATABASE_PATH") {
        Ok(path) if !path.trim().is_empty() => PathBuf::from(path),
        _ => data_dir().join("spotcollect.db"),
    }
}

/// Returns the preview lookup (video search) API URL.
pub fn preview_apiurl() -> String {
    env::var("YOUTUBE_API_URL").unwrap_or_else(|_| DEFAULT_PREVIEW_API_URL.to_string())
}

/// Returns the preview lookup API key, if configured.
pub fn preview_api_key() -> Option<String> {
    env::var("YOUTUBE_KEY").ok().filter(|k| !k.trim().is_empty())
}

/// Returns the address the trigger server binds to.
///
/// Reads `SERVER_ADDRESS`, defaulting to `0.0.0.0:5002`.
pub fn server_addr() -> String {
    env::var("SERVER_ADDRESS").unwrap_or_else(|_| DEFAULT_SERVER_ADDRESS.to_string())
}

/// Returns how many rate-limited attempts a single fetch may make.
pub fn fetch_max_retries() -> u32 {
    env::var("FETCH_MAX_RETRIES")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(DEFAULT_MAX_RETRIES)
}

/// Returns the cap applied to server-supplied `Retry-After` waits.
pub fn fetch_max_wait() -> Duration {
    let secs = env::var("FETCH_MAX_WAIT_SECS")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(DEFAULT_MAX_WAIT_SECS);
    Duration::from_secs(secs)
}
