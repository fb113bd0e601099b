//! Spotify Listening Data Collector Library
//!
//! This library collects a user's listening data from the Spotify Web API (top
//! items, saved tracks, playlists, followed artists and artist genres),
//! normalizes it into a small relational schema and upserts it into SQLite for
//! downstream recommendation use. Songs can additionally be enriched with a
//! preview link looked up from a video search API.
//!
//! # Modules
//!
//! - `api` - HTTP endpoints for triggering collection runs
//! - `cli` - Command-line interface implementations
//! - `config` - Configuration management and environment variables
//! - `management` - Collection run state, normalization and persistence
//! - `preview` - Preview link lookup and enrichment
//! - `server` - HTTP server hosting the trigger endpoints
//! - `spotify` - Rate-limited Spotify Web API client and pagination drivers
//! - `types` - Wire types and table row definitions
//! - `utils` - Utility functions and helpers
//!
//! # Example
//!
//! ```
//! use spotcollect::{config, cli};
//!
//! #[tokio::main]
//! async fn main() -> spotcollect::Res<()> {
//!     config::load_env().await?;
//!     cli::summary().await;
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod cli;
pub mod config;
pub mod management;
pub mod preview;
pub mod server;
pub mod spotify;
pub mod types;
pub mod utils;

/// A convenient Result type alias for operations that may fail.
///
/// Used at the application boundary (CLI and server setup) where the concrete
/// error type does not matter to the caller. Library operations return their
/// own typed errors instead.
pub type Res<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// Prints an informational message with a blue bullet point.
///
/// # Example
///
/// ```
/// info!("Collecting saved tracks...");
/// info!("Fetched {} playlists", count);
/// ```
#[macro_export]
macro_rules! info {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "o".blue().bold(), std::format_args!($($arg)*));
  })
}

/// Prints a success message with a green checkmark.
#[macro_export]
macro_rules! success {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "✓".green().bold(), std::format_args!($($arg)*));
  })
}

/// Prints an error message with a red exclamation mark and exits the program.
///
/// Only meant for the CLI boundary. Library code returns errors instead of
/// calling this macro.
///
/// # Example
///
/// ```
/// error!("Missing access token. Pass --token or set SPOTIFY_ACCESS_TOKEN");
/// // Program exits here - code after this will not execute
/// ```
#[macro_export]
macro_rules! error {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".red().bold(), std::format_args!($($arg)*));
    std::process::exit(1);
  })
}

/// Prints a warning message with a yellow exclamation mark.
///
/// Used for recoverable problems: rate-limit backoffs, a collection pass
/// ending early, a preview that could not be found.
#[macro_export]
macro_rules! warning {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".yellow().bold(), std::format_args!($($arg)*));
  })
}
