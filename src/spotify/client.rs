use serde::de::DeserializeOwned;

use crate::spotify::fetcher::{FetchError, RateLimitedFetcher};

/// Bearer-authenticated access to the Spotify Web API for one collection run.
pub struct SpotifyClient {
    fetcher: RateLimitedFetcher,
    api_url: String,
    token: String,
}

impl SpotifyClient {
    pub fn new(fetcher: RateLimitedFetcher, api_url: &str, token: &str) -> Self {
        Self {
            fetcher,
            api_url: api_url.trim_end_matches('/').to_string(),
            token: token.to_string(),
        }
    }

    /// Absolute URL for an API path such as `/me/tracks`.
    pub fn endpoint(&self, path: &str) -> String {
        format!("{uri}{path}", uri = self.api_url, path = path)
    }

    /// GETs an absolute URL (endpoint or a `next`/`href` link from a previous
    /// response) and deserializes the body.
    pub fn get<T: DeserializeOwned>(
        &self,
        url: &str,
        params: &[(&str, String)],
    ) -> Result<T, FetchError> {
        let params: Vec<(String, String)> = params
            .iter()
            .map(|(name, value)| (name.to_string(), value.clone()))
            .collect();
        self.fetcher.fetch_as(url, &self.auth_header(), &params)
    }

    fn auth_header(&self) -> Vec<(String, String)> {
        vec![(
            "Authorization".to_string(),
            format!("Bearer {}", self.token),
        )]
    }
}
