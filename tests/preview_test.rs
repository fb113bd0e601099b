mod common;

use common::{FakeTransport, fetcher, ok, status};
use serde_json::json;
use spotcollect::{
    management::SqliteStore,
    preview::{
        LookupFailure, PreviewLookup, PreviewReport, enrich_previews, enrich_songs,
        run_preview_batch,
    },
    types::{Artist, PreviewCandidate, Song, SongArtistInteraction},
};
use tempfile::TempDir;

const SEARCH_URL: &str = "https://search.test/youtube/v3/search";

fn lookup(transport: &FakeTransport) -> PreviewLookup {
    let (fetcher, _) = fetcher(transport);
    PreviewLookup::new(fetcher, SEARCH_URL, "secret")
}

fn video(id: &str) -> serde_json::Value {
    json!({ "items": [{ "id": { "kind": "youtube#video", "videoId": id } }] })
}

fn song(id: &str, title: &str) -> Song {
    Song {
        song_id: id.to_string(),
        title: title.to_string(),
        img_url: None,
        preview_url: None,
    }
}

#[test]
fn test_find_preview_builds_query_and_watch_url() {
    let transport = FakeTransport::new(|_| ok(video("abc123")));
    let lookup = lookup(&transport);

    let url = lookup.find_preview("Song", Some("Artist")).unwrap();

    assert_eq!(url.as_deref(), Some("https://www.youtube.com/watch?v=abc123"));
    let call = &transport.calls()[0];
    assert_eq!(call.url, SEARCH_URL);
    assert_eq!(call.param("q"), Some("Song Artist official audio"));
    assert_eq!(call.param("part"), Some("snippet"));
    assert_eq!(call.param("key"), Some("secret"));
    assert_eq!(call.param("maxResults"), Some("1"));
    assert_eq!(call.param("type"), Some("video"));
}

#[test]
fn test_find_preview_without_results() {
    let transport = FakeTransport::new(|_| ok(json!({ "items": [] })));

    assert_eq!(lookup(&transport).find_preview("Song", None).unwrap(), None);
    assert_eq!(
        transport.calls()[0].param("q"),
        Some("Song official audio")
    );
}

#[test]
fn test_find_preview_result_without_video_id() {
    let transport = FakeTransport::new(|_| ok(json!({ "items": [{ "id": {} }] })));

    let err = lookup(&transport).find_preview("Song", None).unwrap_err();

    assert!(matches!(err, LookupFailure::MissingVideoId));
}

#[test]
fn test_enrich_songs_swallows_failures() {
    let transport = FakeTransport::new(|call| match call.param("q") {
        Some(q) if q.starts_with("Found") => ok(video("v1")),
        Some(q) if q.starts_with("Broken") => status(403, "quota exceeded"),
        _ => ok(json!({ "items": [] })),
    });
    let candidates = vec![
        PreviewCandidate {
            song: song("s1", "Found"),
            artist_name: Some("A".to_string()),
        },
        PreviewCandidate {
            song: song("s2", "Broken"),
            artist_name: Some("A".to_string()),
        },
        PreviewCandidate {
            song: song("s3", "Missing"),
            artist_name: None,
        },
    ];

    let updated = enrich_songs(&lookup(&transport), candidates);

    assert_eq!(updated.len(), 1);
    assert_eq!(updated[0].song_id, "s1");
    assert_eq!(
        updated[0].preview_url.as_deref(),
        Some("https://www.youtube.com/watch?v=v1")
    );
    assert_eq!(transport.calls().len(), 3);
}

#[test]
fn test_enrich_previews_persists_only_found_previews() {
    let dir = TempDir::new().unwrap();
    let store = SqliteStore::open(dir.path().join("test.db")).unwrap();
    store.persist(&[song("s1", "Hit"), song("s2", "Obscure")]).unwrap();
    store
        .persist(&[Artist {
            artist_id: "a1".to_string(),
            name: "Band".to_string(),
        }])
        .unwrap();
    store
        .persist(&[SongArtistInteraction {
            song_id: "s1".to_string(),
            artist_id: "a1".to_string(),
        }])
        .unwrap();

    let transport = FakeTransport::new(|call| match call.param("q") {
        Some("Hit Band official audio") => ok(video("hit")),
        _ => ok(json!({ "items": [] })),
    });

    let report = enrich_previews(&lookup(&transport), &store).unwrap();

    assert_eq!(report.looked_up, 2);
    assert_eq!(report.updated, 1);
    assert_eq!(report.still_missing, 1);

    let songs = store.load_songs().unwrap();
    assert_eq!(
        songs[0].preview_url.as_deref(),
        Some("https://www.youtube.com/watch?v=hit")
    );
    assert_eq!(songs[1].preview_url, None);
    assert_eq!(store.songs_missing_preview().unwrap().len(), 1);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_preview_batch_runs_from_async_context() {
    let dir = TempDir::new().unwrap();
    let store = SqliteStore::open(dir.path().join("test.db")).unwrap();

    let report = run_preview_batch("secret".to_string(), store).await.unwrap();

    assert_eq!(report, PreviewReport::default());
}
