use crate::{
    management::CollectionAccumulator,
    spotify::SpotifyClient,
    types::{ArtistFlag, ArtistGenre, FollowedArtistsResponse, SeveralArtistsResponse},
    warning,
};

const FOLLOWED_PAGE_SIZE: u32 = 50;
const GENRE_BATCH_SIZE: usize = 50;

/// Collects the artists the user follows.
///
/// Follows the cursor-based pagination of `GET /me/following?type=artist`:
/// each response carries a `next` link which is requested verbatim. Stops
/// when there is no `next` link, when the `artists` wrapper is missing, when
/// a page has no items, or when a fetch fails.
///
/// Followed artists contribute artist rows and `follows` flags.
///
/// Returns the number of artists processed.
pub fn collect_followed_artists(client: &SpotifyClient, acc: &mut CollectionAccumulator) -> usize {
    let mut url = client.endpoint("/me/following");
    let mut params = vec![
        ("type", "artist".to_string()),
        ("limit", FOLLOWED_PAGE_SIZE.to_string()),
    ];
    let mut processed = 0;

    loop {
        let response: FollowedArtistsResponse = match client.get(&url, &params) {
            Ok(response) => response,
            Err(e) => {
                warning!("Stopping followed artists after {} artists: {}", processed, e);
                break;
            }
        };

        let Some(page) = response.artists else {
            break;
        };
        if page.is_empty() {
            break;
        }

        for artist in page.items().filter_map(|a| a.resolve()) {
            acc.mark_artist(&artist.artist_id, ArtistFlag::Follows);
            acc.add_artist(artist);
            processed += 1;
        }

        match page.next {
            Some(next) if !next.is_empty() => {
                // the next link already carries type, limit and cursor
                url = next;
                params.clear();
            }
            _ => break,
        }
    }

    processed
}

/// Collects genres for every distinct artist gathered so far.
///
/// Artist ids are sent to `GET /artists?ids=...` in batches of 50, including a
/// final partial batch. A failed batch ends the pass.
///
/// Returns the number of genre tags added.
pub fn collect_artist_genres(client: &SpotifyClient, acc: &mut CollectionAccumulator) -> usize {
    let url = client.endpoint("/artists");
    let artist_ids = acc.artist_ids();
    let mut processed = 0;

    for batch in artist_ids.chunks(GENRE_BATCH_SIZE) {
        let params = [("ids", batch.join(","))];

        let response: SeveralArtistsResponse = match client.get(&url, &params) {
            Ok(response) => response,
            Err(e) => {
                warning!("Stopping genre lookup after {} tags: {}", processed, e);
                break;
            }
        };

        for artist in response.artists.unwrap_or_default().into_iter().flatten() {
            let Some(artist_id) = artist.id else {
                continue;
            };
            for genre in artist.genres.unwrap_or_default() {
                acc.add_artist_genre(ArtistGenre {
                    artist_id: artist_id.clone(),
                    genre,
                });
                processed += 1;
            }
        }
    }

    processed
}
