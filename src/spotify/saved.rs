use crate::{
    management::CollectionAccumulator,
    spotify::SpotifyClient,
    types::{Page, SongFlag, TrackItem},
    warning,
};

const SAVED_PAGE_SIZE: usize = 50;

/// Collects the user's saved ("liked") tracks.
///
/// Offset-paginated over `GET /me/tracks` in pages of 50. Stops at the first
/// page without items or the first failed fetch, keeping everything gathered
/// before it. Entries whose track cannot be resolved are skipped.
///
/// Returns the number of tracks added.
pub fn collect_saved_tracks(client: &SpotifyClient, acc: &mut CollectionAccumulator) -> usize {
    let url = client.endpoint("/me/tracks");
    let mut page_index = 0;
    let mut processed = 0;

    loop {
        let params = [
            ("limit", SAVED_PAGE_SIZE.to_string()),
            ("offset", (page_index * SAVED_PAGE_SIZE).to_string()),
        ];

        let page: Page<TrackItem> = match client.get(&url, &params) {
            Ok(page) => page,
            Err(e) => {
                warning!("Stopping saved tracks at page {}: {}", page_index, e);
                break;
            }
        };

        if page.is_empty() {
            break;
        }

        for track in page.items().filter_map(|item| item.track.as_ref()) {
            if let Some(resolved) = track.resolve() {
                acc.add_track(&resolved, SongFlag::Saved);
                processed += 1;
            }
        }

        page_index += 1;
    }

    processed
}
