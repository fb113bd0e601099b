use crate::{
    management::CollectionAccumulator,
    spotify::SpotifyClient,
    types::{ArtistFlag, ArtistObject, Page, SongFlag, TrackObject},
    warning,
};

const TOP_LIMIT: u32 = 50;

/// Collects the user's top tracks and top artists.
///
/// A single page of each (`limit=50`, `offset=0`), tracks first. Top tracks
/// contribute songs, their artists and `top_song` flags; top artists
/// contribute artists and `top_artist` flags. A failed tracks request ends
/// the pass; a failed artists request keeps what the tracks produced.
///
/// Returns the number of items processed.
pub fn collect_top_items(client: &SpotifyClient, acc: &mut CollectionAccumulator) -> usize {
    let params = [("limit", TOP_LIMIT.to_string()), ("offset", "0".to_string())];

    let tracks: Page<TrackObject> = match client.get(&client.endpoint("/me/top/tracks"), &params)
    {
        Ok(page) => page,
        Err(e) => {
            warning!("Failed to fetch top tracks: {}", e);
            return 0;
        }
    };

    let mut processed = 0;
    for track in tracks.items() {
        if let Some(resolved) = track.resolve() {
            acc.add_track(&resolved, SongFlag::TopSong);
            processed += 1;
        }
    }

    let artists: Page<ArtistObject> =
        match client.get(&client.endpoint("/me/top/artists"), &params) {
            Ok(page) => page,
            Err(e) => {
                warning!("Failed to fetch top artists: {}", e);
                return processed;
            }
        };

    for artist in artists.items().filter_map(ArtistObject::resolve) {
        acc.mark_artist(&artist.artist_id, ArtistFlag::TopArtist);
        acc.add_artist(artist);
        processed += 1;
    }

    processed
}
