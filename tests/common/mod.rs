#![allow(dead_code)]

use std::{
    collections::VecDeque,
    sync::{Arc, Mutex},
    time::Duration,
};

use serde_json::{Value, json};
use spotcollect::{
    spotify::{
        FetchError, RateLimitedFetcher, SpotifyClient,
        fetcher::{HttpTransport, RawResponse, Sleeper},
    },
    types::User,
};

pub const API_URL: &str = "https://api.test/v1";

/// One request seen by [`FakeTransport`].
#[derive(Debug, Clone)]
pub struct Call {
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub params: Vec<(String, String)>,
}

impl Call {
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Request path relative to [`API_URL`], without query string.
    pub fn path(&self) -> &str {
        let path = self.url.strip_prefix(API_URL).unwrap_or(&self.url);
        path.split('?').next().unwrap_or(path)
    }
}

type Handler = dyn Fn(&Call) -> RawResponse + Send + Sync;

/// Transport answering requests with a handler and recording every call.
#[derive(Clone)]
pub struct FakeTransport {
    handler: Arc<Handler>,
    calls: Arc<Mutex<Vec<Call>>>,
}

impl FakeTransport {
    pub fn new(handler: impl Fn(&Call) -> RawResponse + Send + Sync + 'static) -> Self {
        Self {
            handler: Arc::new(handler),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Answers with `responses` in order, repeating the last one.
    pub fn scripted(responses: Vec<RawResponse>) -> Self {
        let queue = Mutex::new(VecDeque::from(responses));
        Self::new(move |_| {
            let mut queue = queue.lock().unwrap();
            if queue.len() > 1 {
                queue.pop_front().unwrap()
            } else {
                queue.front().cloned().unwrap()
            }
        })
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn calls_to(&self, path: &str) -> Vec<Call> {
        self.calls()
            .into_iter()
            .filter(|call| call.path() == path)
            .collect()
    }
}

impl HttpTransport for FakeTransport {
    fn get(
        &self,
        url: &str,
        headers: &[(String, String)],
        params: &[(String, String)],
    ) -> Result<RawResponse, FetchError> {
        let call = Call {
            url: url.to_string(),
            headers: headers.to_vec(),
            params: params.to_vec(),
        };
        self.calls.lock().unwrap().push(call.clone());
        Ok((self.handler)(&call))
    }
}

/// Sleeper that records requested waits instead of sleeping.
#[derive(Clone, Default)]
pub struct RecordingSleeper {
    slept: Arc<Mutex<Vec<Duration>>>,
}

impl RecordingSleeper {
    pub fn waits(&self) -> Vec<Duration> {
        self.slept.lock().unwrap().clone()
    }

    pub fn total(&self) -> Duration {
        self.waits().into_iter().sum()
    }
}

impl Sleeper for RecordingSleeper {
    fn sleep(&self, duration: Duration) {
        self.slept.lock().unwrap().push(duration);
    }
}

pub fn ok(body: Value) -> RawResponse {
    RawResponse {
        status: 200,
        retry_after: None,
        body: body.to_string(),
    }
}

pub fn status(code: u16, body: &str) -> RawResponse {
    RawResponse {
        status: code,
        retry_after: None,
        body: body.to_string(),
    }
}

pub fn rate_limited(retry_after: Option<&str>) -> RawResponse {
    RawResponse {
        status: 429,
        retry_after: retry_after.map(str::to_string),
        body: String::new(),
    }
}

pub fn fetcher(transport: &FakeTransport) -> (RateLimitedFetcher, RecordingSleeper) {
    let sleeper = RecordingSleeper::default();
    let fetcher = RateLimitedFetcher::new(Box::new(transport.clone()), Box::new(sleeper.clone()));
    (fetcher, sleeper)
}

pub fn spotify_client(transport: &FakeTransport) -> SpotifyClient {
    let (fetcher, _) = fetcher(transport);
    SpotifyClient::new(fetcher, API_URL, "test-token")
}

pub fn test_user() -> User {
    User {
        user_id: "u1".to_string(),
        email: Some("u1@example.com".to_string()),
        profile_img_url: None,
    }
}

pub fn profile_json() -> Value {
    json!({
        "id": "u1",
        "email": "u1@example.com",
        "images": [{ "url": "https://img.test/u1.jpg" }]
    })
}

pub fn artist_json(id: &str, name: &str) -> Value {
    json!({ "id": id, "name": name })
}

pub fn track_json(id: &str, name: &str, artists: &[(&str, &str)]) -> Value {
    json!({
        "id": id,
        "name": name,
        "album": { "images": [{ "url": format!("https://img.test/{}.jpg", id) }] },
        "artists": artists
            .iter()
            .map(|(id, name)| artist_json(id, name))
            .collect::<Vec<_>>(),
    })
}

pub fn page(items: Vec<Value>, total: usize) -> Value {
    json!({ "items": items, "total": total, "next": null })
}

pub fn empty_page() -> Value {
    page(Vec::new(), 0)
}
