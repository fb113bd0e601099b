use crate::{
    management::CollectionAccumulator,
    spotify::SpotifyClient,
    types::{Page, PlaylistObject, SongFlag, TrackItem},
    warning,
};

const PLAYLIST_PAGE_SIZE: usize = 50;
const PLAYLIST_TRACKS_PAGE_SIZE: usize = 100;

/// Collects every track of every playlist of the user.
///
/// The outer loop pages through `GET /users/{id}/playlists` (50 per page)
/// until the running playlist count reaches the reported `total`. For each
/// playlist an inner loop pages through its tracks link (100 per page) until
/// the running track count reaches that playlist's track total.
///
/// Every entry of a page counts toward the running count, null entries
/// included, but entries without a resolvable track, name or artist list are
/// skipped.
///
/// Returns the number of tracks added.
pub fn collect_playlist_tracks(client: &SpotifyClient, acc: &mut CollectionAccumulator) -> usize {
    let url = client.endpoint(&format!("/users/{}/playlists", acc.user_id()));
    let mut page_index = 0;
    let mut playlist_count: u64 = 0;
    let mut processed = 0;

    loop {
        let params = [
            ("limit", PLAYLIST_PAGE_SIZE.to_string()),
            ("offset", (page_index * PLAYLIST_PAGE_SIZE).to_string()),
        ];

        let page: Page<PlaylistObject> = match client.get(&url, &params) {
            Ok(page) => page,
            Err(e) => {
                warning!("Stopping playlists at page {}: {}", page_index, e);
                break;
            }
        };

        if page.is_empty() {
            break;
        }

        playlist_count += page.entry_count() as u64;
        for playlist in page.items() {
            processed += collect_tracks_of(client, playlist, acc);
        }

        if playlist_count >= page.total.unwrap_or(0) {
            break;
        }
        page_index += 1;
    }

    processed
}

fn collect_tracks_of(
    client: &SpotifyClient,
    playlist: &PlaylistObject,
    acc: &mut CollectionAccumulator,
) -> usize {
    let Some(tracks) = playlist.tracks.as_ref() else {
        return 0;
    };
    let Some(href) = tracks.href.as_deref() else {
        return 0;
    };
    let total_tracks = tracks.total.unwrap_or(0);
    let mut track_count: u64 = 0;
    let mut processed = 0;

    while track_count < total_tracks {
        let params = [
            ("limit", PLAYLIST_TRACKS_PAGE_SIZE.to_string()),
            ("offset", track_count.to_string()),
        ];

        let page: Page<TrackItem> = match client.get(href, &params) {
            Ok(page) => page,
            Err(e) => {
                warning!(
                    "Stopping playlist {} at offset {}: {}",
                    playlist.name.as_deref().unwrap_or("<unnamed>"),
                    track_count,
                    e
                );
                break;
            }
        };

        if page.is_empty() {
            break;
        }
        track_count += page.entry_count() as u64;

        for track in page.items().filter_map(|item| item.track.as_ref()) {
            if let Some(resolved) = track.resolve() {
                acc.add_track(&resolved, SongFlag::Playlist);
                processed += 1;
            }
        }
    }

    processed
}
