use std::hash::Hash;

use indexmap::IndexMap;
use indexmap::map::Entry;

use crate::types::{
    Artist, ArtistGenre, Song, SongArtistInteraction, Table, User, UserArtistInteraction,
    UserSongInteraction,
};

/// The seven tables produced by a collection run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CollectionTables {
    pub users: Vec<User>,
    pub songs: Vec<Song>,
    pub artists: Vec<Artist>,
    pub artist_genres: Vec<ArtistGenre>,
    pub song_artist_interactions: Vec<SongArtistInteraction>,
    pub user_song_interactions: Vec<UserSongInteraction>,
    pub user_artist_interactions: Vec<UserArtistInteraction>,
}

impl CollectionTables {
    pub fn row_count(&self, table: Table) -> usize {
        match table {
            Table::Users => self.users.len(),
            Table::Songs => self.songs.len(),
            Table::Artists => self.artists.len(),
            Table::ArtistGenres => self.artist_genres.len(),
            Table::SongArtistInteractions => self.song_artist_interactions.len(),
            Table::UserSongInteractions => self.user_song_interactions.len(),
            Table::UserArtistInteractions => self.user_artist_interactions.len(),
        }
    }
}

/// Collapses every table to one row per natural key.
///
/// Rows keep the position of their key's first observation. Descriptive
/// tables (users, songs, artists) keep the last observed values for a key.
/// Interaction tables OR their flags together. Link tables are their own key,
/// so only exact repeats are dropped. Applying this twice yields the same
/// tables as applying it once.
pub fn normalize(tables: CollectionTables) -> CollectionTables {
    CollectionTables {
        users: last_write_wins(tables.users, |u| u.user_id.clone()),
        songs: last_write_wins(tables.songs, |s| s.song_id.clone()),
        artists: last_write_wins(tables.artists, |a| a.artist_id.clone()),
        artist_genres: last_write_wins(tables.artist_genres, |g| {
            (g.artist_id.clone(), g.genre.clone())
        }),
        song_artist_interactions: last_write_wins(tables.song_artist_interactions, |l| {
            (l.song_id.clone(), l.artist_id.clone())
        }),
        user_song_interactions: merge_flags(
            tables.user_song_interactions,
            |i| (i.user_id.clone(), i.song_id.clone()),
            UserSongInteraction::absorb,
        ),
        user_artist_interactions: merge_flags(
            tables.user_artist_interactions,
            |i| (i.user_id.clone(), i.artist_id.clone()),
            UserArtistInteraction::absorb,
        ),
    }
}

fn last_write_wins<R, K, F>(rows: Vec<R>, key: F) -> Vec<R>
where
    K: Hash + Eq,
    F: Fn(&R) -> K,
{
    let mut by_key: IndexMap<K, R> = IndexMap::with_capacity(rows.len());
    for row in rows {
        // IndexMap keeps the original slot when a key is re-inserted
        by_key.insert(key(&row), row);
    }
    by_key.into_values().collect()
}

fn merge_flags<R, K, F, M>(rows: Vec<R>, key: F, merge: M) -> Vec<R>
where
    K: Hash + Eq,
    F: Fn(&R) -> K,
    M: Fn(&mut R, &R),
{
    let mut by_key: IndexMap<K, R> = IndexMap::with_capacity(rows.len());
    for row in rows {
        match by_key.entry(key(&row)) {
            Entry::Occupied(mut existing) => merge(existing.get_mut(), &row),
            Entry::Vacant(slot) => {
                slot.insert(row);
            }
        }
    }
    by_key.into_values().collect()
}
