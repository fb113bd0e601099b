//! Preview link enrichment.
//!
//! Songs stored without a preview are looked up on a video search API by
//! title and primary artist. The first hit becomes the song's preview link.
//! A failed or empty lookup leaves the song untouched.

use thiserror::Error;

use crate::{
    Res, config,
    management::{PersistError, SqliteStore},
    spotify::{FetchError, RateLimitedFetcher},
    types::{PreviewCandidate, Song, VideoSearchResponse},
    warning,
};

const SEARCH_QUALIFIER: &str = "official audio";
const WATCH_URL: &str = "https://www.youtube.com/watch?v=";

#[derive(Debug, Error)]
pub enum LookupFailure {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("search result without a video id")]
    MissingVideoId,
}

/// Counts reported by [`enrich_previews`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PreviewReport {
    pub looked_up: usize,
    pub updated: usize,
    pub still_missing: usize,
}

/// Video search client used to find preview links.
pub struct PreviewLookup {
    fetcher: RateLimitedFetcher,
    api_url: String,
    api_key: String,
}

impl PreviewLookup {
    pub fn new(fetcher: RateLimitedFetcher, api_url: &str, api_key: &str) -> Self {
        Self {
            fetcher,
            api_url: api_url.to_string(),
            api_key: api_key.to_string(),
        }
    }

    /// Lookup client over the configured search API and the configured
    /// rate-limit policy.
    ///
    /// Builds a blocking HTTP client, so it must be called off the async
    /// runtime (see [`run_preview_batch`]).
    pub fn from_config(api_key: &str) -> Result<Self, reqwest::Error> {
        Ok(Self::new(
            RateLimitedFetcher::from_config()?,
            &config::preview_apiurl(),
            api_key,
        ))
    }

    /// Searches for `"{title} {artist} official audio"` and returns the
    /// watch URL of the first result. `Ok(None)` means nothing was found.
    pub fn find_preview(
        &self,
        title: &str,
        artist: Option<&str>,
    ) -> Result<Option<String>, LookupFailure> {
        let query = match artist {
            Some(artist) => format!("{} {} {}", title, artist, SEARCH_QUALIFIER),
            None => format!("{} {}", title, SEARCH_QUALIFIER),
        };
        let params = [
            ("part".to_string(), "snippet".to_string()),
            ("q".to_string(), query),
            ("key".to_string(), self.api_key.clone()),
            ("maxResults".to_string(), "1".to_string()),
            ("type".to_string(), "video".to_string()),
        ];

        let response: VideoSearchResponse = self.fetcher.fetch_as(&self.api_url, &[], &params)?;

        let Some(first) = response.items.unwrap_or_default().into_iter().next() else {
            return Ok(None);
        };

        let video_id = first
            .id
            .and_then(|id| id.video_id)
            .filter(|id| !id.is_empty())
            .ok_or(LookupFailure::MissingVideoId)?;

        Ok(Some(format!("{}{}", WATCH_URL, video_id)))
    }
}

/// Looks up every candidate and returns only the songs that gained a preview.
pub fn enrich_songs(lookup: &PreviewLookup, candidates: Vec<PreviewCandidate>) -> Vec<Song> {
    let mut updated = Vec::new();

    for PreviewCandidate { mut song, artist_name } in candidates {
        match lookup.find_preview(&song.title, artist_name.as_deref()) {
            Ok(Some(url)) => {
                song.preview_url = Some(url);
                updated.push(song);
            }
            Ok(None) => warning!("No preview found for {}", song.title),
            Err(e) => warning!("Preview lookup failed for {}: {}", song.title, e),
        }
    }

    updated
}

/// Enriches every stored song lacking a preview and persists the ones found.
pub fn enrich_previews(
    lookup: &PreviewLookup,
    store: &SqliteStore,
) -> Result<PreviewReport, PersistError> {
    let candidates = store.songs_missing_preview()?;
    let looked_up = candidates.len();

    let updated = enrich_songs(lookup, candidates);
    store.persist(&updated)?;

    Ok(PreviewReport {
        looked_up,
        updated: updated.len(),
        still_missing: looked_up - updated.len(),
    })
}

/// Runs [`enrich_previews`] on tokio's blocking pool, building the lookup
/// client there as well.
pub async fn run_preview_batch(api_key: String, store: SqliteStore) -> Res<PreviewReport> {
    let report = tokio::task::spawn_blocking(move || -> Res<PreviewReport> {
        let lookup = PreviewLookup::from_config(&api_key)?;
        Ok(enrich_previews(&lookup, &store)?)
    })
    .await??;

    Ok(report)
}
