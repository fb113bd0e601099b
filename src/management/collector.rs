use std::{path::Path, time::Instant};

use clap::ValueEnum;
use thiserror::Error;

use super::{
    accumulator::CollectionAccumulator,
    normalize::{CollectionTables, normalize},
    store::{PersistError, SqliteStore, TableOutcome},
};
use crate::{
    config, info,
    spotify::{
        FetchError, RateLimitedFetcher, SpotifyClient,
        artists::{collect_artist_genres, collect_followed_artists},
        playlists::collect_playlist_tracks,
        profile::get_user_info,
        saved::collect_saved_tracks,
        top::collect_top_items,
    },
    success, utils, warning,
};

/// Run-level failures. Failures inside a single pass never surface here.
#[derive(Debug, Error)]
pub enum CollectError {
    #[error("failed to fetch user profile: {0}")]
    Profile(#[source] FetchError),

    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error(transparent)]
    Store(#[from] PersistError),
}

/// Which collection passes a run executes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sources {
    pub top_items: bool,
    pub saved_tracks: bool,
    pub playlists: bool,
    pub followed_artists: bool,
    pub genres: bool,
}

impl Default for Sources {
    fn default() -> Self {
        Self {
            top_items: true,
            saved_tracks: true,
            playlists: true,
            followed_artists: true,
            genres: true,
        }
    }
}

/// A collection pass that can be skipped from the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SourceKind {
    Top,
    Saved,
    Playlists,
    Followed,
    Genres,
}

impl Sources {
    /// Every pass except the ones listed.
    pub fn without(skip: &[SourceKind]) -> Self {
        let mut sources = Self::default();
        for kind in skip {
            match kind {
                SourceKind::Top => sources.top_items = false,
                SourceKind::Saved => sources.saved_tracks = false,
                SourceKind::Playlists => sources.playlists = false,
                SourceKind::Followed => sources.followed_artists = false,
                SourceKind::Genres => sources.genres = false,
            }
        }
        sources
    }
}

/// Runs every enabled pass for the token's user and returns normalized tables.
///
/// Pass order is top items, saved tracks, followed artists, playlists, then
/// genres, so genre lookups cover every artist the earlier passes found.
/// Only a failed profile fetch aborts the run.
pub fn collect_user_data(
    client: &SpotifyClient,
    sources: &Sources,
) -> Result<CollectionTables, CollectError> {
    let started = Instant::now();

    let user = get_user_info(client).map_err(CollectError::Profile)?;
    info!("Collecting listening data for user {}", user.user_id);

    let mut acc = CollectionAccumulator::new(user);

    if sources.top_items {
        timed("Top items", || collect_top_items(client, &mut acc));
    }
    if sources.saved_tracks {
        timed("Saved tracks", || collect_saved_tracks(client, &mut acc));
    }
    if sources.followed_artists {
        timed("Followed artists", || collect_followed_artists(client, &mut acc));
    }
    if sources.playlists {
        timed("Playlist tracks", || collect_playlist_tracks(client, &mut acc));
    }
    if sources.genres {
        timed("Artist genres", || collect_artist_genres(client, &mut acc));
    }

    info!(
        "Gathered {} song and {} artist observations",
        acc.count_songs(),
        acc.count_artists()
    );

    let tables = normalize(acc.into_tables());
    info!(
        "Collection completed in {}",
        utils::format_elapsed(started.elapsed())
    );

    Ok(tables)
}

fn timed<F: FnOnce() -> usize>(label: &str, pass: F) {
    let started = Instant::now();
    let processed = pass();
    info!(
        "{} completed in {} ({} items)",
        label,
        utils::format_elapsed(started.elapsed()),
        processed
    );
}

/// Outcome of a persisted run.
#[derive(Debug)]
pub struct RunReport {
    /// User the access token resolved to.
    pub user_id: String,
    pub outcomes: Vec<TableOutcome>,
}

impl RunReport {
    pub fn failed_tables(&self) -> usize {
        self.outcomes.iter().filter(|o| o.result.is_err()).count()
    }
}

/// Collects and persists one run. Per-table write failures are reported in
/// the returned outcomes, never as an error.
pub fn run(
    client: &SpotifyClient,
    store: &SqliteStore,
    sources: &Sources,
) -> Result<RunReport, CollectError> {
    let tables = collect_user_data(client, sources)?;
    let user_id = tables
        .users
        .first()
        .map(|user| user.user_id.clone())
        .unwrap_or_default();
    let outcomes = store.persist_all(&tables);

    for outcome in &outcomes {
        match &outcome.result {
            Ok(rows) => success!("Persisted {} rows into {}", rows, outcome.table),
            Err(e) => warning!("{}", e),
        }
    }

    Ok(RunReport { user_id, outcomes })
}

/// Builds a client from configuration for `token` and runs a collection
/// against the database at `database_path`.
pub fn run_for_token(
    token: &str,
    database_path: &Path,
    sources: &Sources,
) -> Result<RunReport, CollectError> {
    let store = SqliteStore::open(database_path)?;
    let fetcher = RateLimitedFetcher::from_config()?;
    let client = SpotifyClient::new(fetcher, &config::spotify_apiurl(), token);
    run(&client, &store, sources)
}
