//! # CLI Module
//!
//! Command implementations behind the `spotcollect` binary. Each command
//! resolves its configuration, runs the blocking pipeline on tokio's blocking
//! pool and reports the result with the crate's logging macros and `tabled`
//! output. Fatal problems end the process through [`crate::error!`].
//!
//! ## Commands
//!
//! - [`collect`] - Runs one collection for an access token and persists it,
//!   or prints table sizes only with `--dry-run`.
//! - [`serve`] - Starts the trigger server (`POST /collect-data`).
//! - [`previews`] - Looks up preview links for stored songs lacking one.
//! - [`summary`] - Prints row and distinct-key counts per stored table.
//!
//! ## Usage
//!
//! ```bash
//! spotcollect collect --token <TOKEN>
//! spotcollect collect --skip playlists --skip genres --dry-run
//! spotcollect previews
//! spotcollect summary
//! spotcollect serve
//! ```

mod collect;
mod previews;
mod serve;
mod summary;

pub use collect::collect;
pub use previews::previews;
pub use serve::serve;
pub use summary::summary;
