//! # Spotify Integration Module
//!
//! This module is the HTTP layer between the collection pipeline and the
//! Spotify Web API. It owns rate-limit handling and the pagination protocol of
//! each endpoint the collector reads from; it does not decide what is kept or
//! how rows are merged, which is the job of [`crate::management`].
//!
//! ## Architecture
//!
//! ```text
//! Collection Run (management::collector)
//!          ↓
//! Pagination Drivers
//!     ├── Profile          (GET /me)
//!     ├── Top Items        (GET /me/top/{tracks,artists})
//!     ├── Saved Tracks     (GET /me/tracks, offset paging)
//!     ├── Playlists        (GET /users/{id}/playlists + tracks links)
//!     └── Artists          (GET /me/following cursor paging, GET /artists batches)
//!          ↓
//! SpotifyClient (bearer auth, URL building, deserialization)
//!          ↓
//! RateLimitedFetcher (429 backoff, bounded retries)
//!          ↓
//! HttpTransport (reqwest blocking client)
//! ```
//!
//! ## Blocking I/O
//!
//! Every call is synchronous: each request completes before the next one is
//! issued and rate-limit backoff blocks the calling thread. Async callers
//! (the CLI and the trigger server) run collection inside
//! `tokio::task::spawn_blocking`.
//!
//! ## Error Handling
//!
//! - [`fetcher::FetchError`] classifies failures as rate limit exhaustion,
//!   upstream (non-200, non-429) errors, malformed bodies or transport errors.
//! - Pagination drivers never return errors. A failed page ends that driver's
//!   loop and the rows collected so far are kept.
//! - [`profile::get_user_info`] is the exception: it returns its error since
//!   a run cannot proceed without a user id.
//!
//! ## Dependencies
//!
//! - **reqwest** - blocking HTTP client
//! - **serde / serde_json** - payload deserialization
//! - **thiserror** - typed fetch errors

pub mod artists;
pub mod client;
pub mod fetcher;
pub mod playlists;
pub mod profile;
pub mod saved;
pub mod top;

pub use client::SpotifyClient;
pub use fetcher::{FetchError, RateLimitedFetcher};
