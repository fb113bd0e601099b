mod common;

use common::{
    API_URL, FakeTransport, artist_json, empty_page, ok, page, profile_json, spotify_client,
    status, test_user, track_json,
};
use serde_json::json;
use spotcollect::{
    management::{CollectError, CollectionAccumulator, SourceKind, Sources, collect_user_data},
    spotify::{
        artists::{collect_artist_genres, collect_followed_artists},
        playlists::collect_playlist_tracks,
        saved::collect_saved_tracks,
        top::collect_top_items,
    },
    types::Artist,
};

#[test]
fn test_playlist_skips_null_track_and_keeps_rest_of_page() {
    let tracks_url = format!("{}/playlists/p1/tracks", API_URL);
    let href = tracks_url.clone();
    let transport = FakeTransport::new(move |call| match call.path() {
        "/users/u1/playlists" => ok(json!({
            "items": [{
                "id": "p1",
                "name": "Mix",
                "tracks": { "href": href, "total": 3 }
            }],
            "total": 1,
            "next": null
        })),
        "/playlists/p1/tracks" => ok(json!({
            "items": [
                { "track": track_json("s1", "One", &[("a1", "Artist")]) },
                { "track": null },
                { "track": track_json("s2", "Two", &[("a1", "Artist")]) }
            ],
            "total": 3
        })),
        _ => status(404, "unexpected"),
    });
    let client = spotify_client(&transport);
    let mut acc = CollectionAccumulator::new(test_user());

    let processed = collect_playlist_tracks(&client, &mut acc);

    assert_eq!(processed, 2);
    // the skipped entry still counts toward the playlist total
    assert_eq!(transport.calls_to("/playlists/p1/tracks").len(), 1);
    assert!(acc.song_interaction("s1").unwrap().playlist);
    assert!(acc.song_interaction("s2").unwrap().playlist);
}

#[test]
fn test_playlist_null_entry_does_not_drop_page() {
    let transport = FakeTransport::new(move |call| match call.path() {
        "/users/u1/playlists" => ok(json!({
            "items": [
                null,
                {
                    "id": "p1",
                    "name": "Mix",
                    "tracks": { "href": format!("{}/playlists/p1/tracks", API_URL), "total": 3 }
                }
            ],
            "total": 2
        })),
        "/playlists/p1/tracks" => ok(json!({
            "items": [
                { "track": track_json("s1", "One", &[("a1", "Artist")]) },
                null,
                { "track": track_json("s2", "Two", &[("a1", "Artist")]) }
            ],
            "total": 3
        })),
        _ => status(404, "unexpected"),
    });
    let client = spotify_client(&transport);
    let mut acc = CollectionAccumulator::new(test_user());

    let processed = collect_playlist_tracks(&client, &mut acc);

    assert_eq!(processed, 2);
    assert_eq!(transport.calls_to("/users/u1/playlists").len(), 1);
    assert_eq!(transport.calls_to("/playlists/p1/tracks").len(), 1);
    assert!(acc.song_interaction("s2").unwrap().playlist);
}

#[test]
fn test_saved_tracks_null_entry_keeps_paging() {
    let transport = FakeTransport::new(|call| match call.param("offset") {
        Some("0") => ok(json!({
            "items": [
                null,
                { "track": track_json("s1", "One", &[("a1", "A")]) }
            ],
            "total": 51
        })),
        Some("50") => ok(page(
            vec![json!({ "track": track_json("s2", "Two", &[("a1", "A")]) })],
            51,
        )),
        _ => ok(empty_page()),
    });
    let client = spotify_client(&transport);
    let mut acc = CollectionAccumulator::new(test_user());

    assert_eq!(collect_saved_tracks(&client, &mut acc), 2);
    assert!(acc.song_interaction("s1").unwrap().saved);
    assert!(acc.song_interaction("s2").unwrap().saved);
}

#[test]
fn test_playlist_tracks_page_by_offset() {
    let transport = FakeTransport::new(move |call| match call.path() {
        "/users/u1/playlists" => ok(json!({
            "items": [{
                "id": "p1",
                "name": "Long",
                "tracks": { "href": format!("{}/playlists/p1/tracks", API_URL), "total": 101 }
            }],
            "total": 1
        })),
        "/playlists/p1/tracks" => {
            let offset: usize = call.param("offset").unwrap().parse().unwrap();
            let count = if offset == 0 { 100 } else { 1 };
            let items = (offset..offset + count)
                .map(|i| json!({ "track": track_json(&format!("s{}", i), "T", &[("a1", "A")]) }))
                .collect();
            ok(page(items, 101))
        }
        _ => status(404, "unexpected"),
    });
    let client = spotify_client(&transport);
    let mut acc = CollectionAccumulator::new(test_user());

    let processed = collect_playlist_tracks(&client, &mut acc);

    let offsets: Vec<String> = transport
        .calls_to("/playlists/p1/tracks")
        .iter()
        .map(|c| c.param("offset").unwrap().to_string())
        .collect();
    assert_eq!(offsets, vec!["0", "100"]);
    assert_eq!(processed, 101);
}

#[test]
fn test_followed_artists_follow_next_link() {
    let next = format!("{}/me/following?type=artist&after=a2&limit=50", API_URL);
    let second = next.clone();
    let transport = FakeTransport::new(move |call| {
        if call.url == second {
            ok(json!({ "artists": {
                "items": [artist_json("a3", "Three")],
                "next": null
            }}))
        } else {
            ok(json!({ "artists": {
                "items": [artist_json("a1", "One"), artist_json("a2", "Two")],
                "next": second
            }}))
        }
    });
    let client = spotify_client(&transport);
    let mut acc = CollectionAccumulator::new(test_user());

    let processed = collect_followed_artists(&client, &mut acc);

    assert_eq!(processed, 3);
    let calls = transport.calls();
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[0].param("type"), Some("artist"));
    assert_eq!(calls[1].url, next);
    assert!(calls[1].params.is_empty());
    for id in ["a1", "a2", "a3"] {
        assert!(acc.artist_interaction(id).unwrap().follows);
    }
    assert_eq!(acc.artist_ids().len(), 3);
}

#[test]
fn test_followed_artists_stop_on_empty_page() {
    let transport = FakeTransport::new(|_| {
        ok(json!({ "artists": {
            "items": [],
            "next": format!("{}/me/following?after=x", API_URL)
        }}))
    });
    let client = spotify_client(&transport);
    let mut acc = CollectionAccumulator::new(test_user());

    assert_eq!(collect_followed_artists(&client, &mut acc), 0);
    assert_eq!(transport.calls().len(), 1);
}

#[test]
fn test_followed_artists_stop_without_artists_field() {
    let transport = FakeTransport::new(|_| ok(json!({})));
    let client = spotify_client(&transport);
    let mut acc = CollectionAccumulator::new(test_user());

    assert_eq!(collect_followed_artists(&client, &mut acc), 0);
    assert_eq!(transport.calls().len(), 1);
}

#[test]
fn test_genres_are_fetched_in_batches_of_fifty() {
    let transport = FakeTransport::new(|call| {
        let artists: Vec<_> = call
            .param("ids")
            .unwrap()
            .split(',')
            .map(|id| json!({ "id": id, "name": id, "genres": ["rock"] }))
            .collect();
        ok(json!({ "artists": artists }))
    });
    let client = spotify_client(&transport);
    let mut acc = CollectionAccumulator::new(test_user());
    for i in 0..120 {
        acc.add_artist(Artist {
            artist_id: format!("a{}", i),
            name: format!("Artist {}", i),
        });
    }

    let processed = collect_artist_genres(&client, &mut acc);

    let batch_sizes: Vec<usize> = transport
        .calls()
        .iter()
        .map(|c| c.param("ids").unwrap().split(',').count())
        .collect();
    assert_eq!(batch_sizes, vec![50, 50, 20]);
    assert_eq!(processed, 120);
}

#[test]
fn test_genre_batches_stop_on_failure() {
    let transport = FakeTransport::new(|_| status(500, "boom"));
    let client = spotify_client(&transport);
    let mut acc = CollectionAccumulator::new(test_user());
    for i in 0..60 {
        acc.add_artist(Artist {
            artist_id: format!("a{}", i),
            name: "A".to_string(),
        });
    }

    assert_eq!(collect_artist_genres(&client, &mut acc), 0);
    assert_eq!(transport.calls().len(), 1);
}

#[test]
fn test_saved_tracks_stop_on_empty_page() {
    let transport = FakeTransport::new(|call| match call.param("offset") {
        Some("0") => ok(page(
            vec![
                json!({ "track": track_json("s1", "One", &[("a1", "A")]) }),
                json!({ "track": track_json("s2", "Two", &[("a1", "A")]) }),
            ],
            2,
        )),
        _ => ok(empty_page()),
    });
    let client = spotify_client(&transport);
    let mut acc = CollectionAccumulator::new(test_user());

    assert_eq!(collect_saved_tracks(&client, &mut acc), 2);
    let offsets: Vec<_> = transport
        .calls()
        .iter()
        .map(|c| c.param("offset").unwrap().to_string())
        .collect();
    assert_eq!(offsets, vec!["0", "50"]);
}

#[test]
fn test_saved_tracks_keep_rows_before_failure() {
    let transport = FakeTransport::new(|call| match call.param("offset") {
        Some("0") => ok(page(
            vec![json!({ "track": track_json("s1", "One", &[("a1", "A")]) })],
            100,
        )),
        _ => status(502, "bad gateway"),
    });
    let client = spotify_client(&transport);
    let mut acc = CollectionAccumulator::new(test_user());

    assert_eq!(collect_saved_tracks(&client, &mut acc), 1);
    assert!(acc.song_interaction("s1").unwrap().saved);
}

#[test]
fn test_top_tracks_failure_ends_pass() {
    let transport = FakeTransport::new(|_| status(500, "boom"));
    let client = spotify_client(&transport);
    let mut acc = CollectionAccumulator::new(test_user());

    assert_eq!(collect_top_items(&client, &mut acc), 0);
    assert!(transport.calls_to("/me/top/artists").is_empty());
}

#[test]
fn test_top_artists_failure_keeps_tracks() {
    let transport = FakeTransport::new(|call| match call.path() {
        "/me/top/tracks" => ok(page(vec![track_json("s1", "One", &[("a1", "A")])], 1)),
        _ => status(500, "boom"),
    });
    let client = spotify_client(&transport);
    let mut acc = CollectionAccumulator::new(test_user());

    assert_eq!(collect_top_items(&client, &mut acc), 1);
    assert!(acc.song_interaction("s1").unwrap().top_song);
    let call = &transport.calls_to("/me/top/tracks")[0];
    assert_eq!(call.param("limit"), Some("50"));
    assert_eq!(call.param("offset"), Some("0"));
}

#[test]
fn test_profile_failure_aborts_run() {
    let transport = FakeTransport::new(|_| status(401, "invalid token"));
    let client = spotify_client(&transport);

    let err = collect_user_data(&client, &Sources::default()).unwrap_err();

    assert!(matches!(err, CollectError::Profile(_)));
    assert_eq!(transport.calls().len(), 1);
}

#[test]
fn test_skipped_sources_are_not_requested() {
    let transport = FakeTransport::new(|call| match call.path() {
        "/me" => ok(profile_json()),
        _ => ok(empty_page()),
    });
    let client = spotify_client(&transport);
    let sources = Sources::without(&[SourceKind::Playlists, SourceKind::Followed]);

    collect_user_data(&client, &sources).unwrap();

    assert!(transport.calls_to("/users/u1/playlists").is_empty());
    assert!(transport.calls_to("/me/following").is_empty());
    assert_eq!(transport.calls_to("/me/top/tracks").len(), 1);
}

#[test]
fn test_requests_carry_bearer_token() {
    let transport = FakeTransport::new(|_| ok(profile_json()));
    let client = spotify_client(&transport);

    spotcollect::spotify::profile::get_user_info(&client).unwrap();

    let call = &transport.calls()[0];
    assert!(
        call.headers
            .contains(&("Authorization".to_string(), "Bearer test-token".to_string()))
    );
}
