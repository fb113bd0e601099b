use std::collections::HashSet;

use indexmap::IndexMap;

use crate::{
    management::CollectionTables,
    types::{
        Artist, ArtistFlag, ArtistGenre, ResolvedTrack, Song, SongArtistInteraction, SongFlag,
        User, UserArtistInteraction, UserSongInteraction,
    },
};

/// Rows gathered by one collection run.
///
/// Entity and link tables are plain append-only lists; duplicates are
/// collapsed later by [`crate::management::normalize`]. Interaction tables are
/// keyed by their natural key so a second observation of the same
/// `(user_id, song_id)` or `(user_id, artist_id)` only ORs in the new flag.
pub struct CollectionAccumulator {
    user: User,
    songs: Vec<Song>,
    artists: Vec<Artist>,
    artist_genres: Vec<ArtistGenre>,
    song_artists: Vec<SongArtistInteraction>,
    user_songs: IndexMap<(String, String), UserSongInteraction>,
    user_artists: IndexMap<(String, String), UserArtistInteraction>,
}

impl CollectionAccumulator {
    pub fn new(user: User) -> Self {
        Self {
            user,
            songs: Vec::new(),
            artists: Vec::new(),
            artist_genres: Vec::new(),
            song_artists: Vec::new(),
            user_songs: IndexMap::new(),
            user_artists: IndexMap::new(),
        }
    }

    pub fn user_id(&self) -> &str {
        &self.user.user_id
    }

    /// Adds a resolved track: its song, every credited artist with a
    /// song-artist link, and `flag` on the user's interaction with the song.
    pub fn add_track(&mut self, track: &ResolvedTrack, flag: SongFlag) -> &mut Self {
        self.songs.push(track.song.clone());
        self.mark_song(&track.song.song_id, flag);

        for artist in &track.artists {
            self.song_artists.push(SongArtistInteraction {
                song_id: track.song.song_id.clone(),
                artist_id: artist.artist_id.clone(),
            });
            self.artists.push(artist.clone());
        }
        self
    }

    pub fn add_artist(&mut self, artist: Artist) -> &mut Self {
        self.artists.push(artist);
        self
    }

    pub fn add_artist_genre(&mut self, artist_genre: ArtistGenre) -> &mut Self {
        self.artist_genres.push(artist_genre);
        self
    }

    /// Sets `flag` on the user's interaction with `song_id`, creating the row
    /// with every other flag false if it does not exist yet. Flags already set
    /// are never cleared.
    pub fn mark_song(&mut self, song_id: &str, flag: SongFlag) -> &mut Self {
        let user_id = self.user.user_id.clone();
        self.user_songs
            .entry((user_id.clone(), song_id.to_string()))
            .or_insert_with(|| UserSongInteraction::new(&user_id, song_id))
            .set(flag);
        self
    }

    /// Artist counterpart of [`Self::mark_song`].
    pub fn mark_artist(&mut self, artist_id: &str, flag: ArtistFlag) -> &mut Self {
        let user_id = self.user.user_id.clone();
        self.user_artists
            .entry((user_id.clone(), artist_id.to_string()))
            .or_insert_with(|| UserArtistInteraction::new(&user_id, artist_id))
            .set(flag);
        self
    }

    pub fn song_interaction(&self, song_id: &str) -> Option<&UserSongInteraction> {
        self.user_songs
            .get(&(self.user.user_id.clone(), song_id.to_string()))
    }

    pub fn artist_interaction(&self, artist_id: &str) -> Option<&UserArtistInteraction> {
        self.user_artists
            .get(&(self.user.user_id.clone(), artist_id.to_string()))
    }

    /// Distinct artist ids in first-seen order.
    pub fn artist_ids(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        self.artists
            .iter()
            .filter(|artist| seen.insert(artist.artist_id.as_str()))
            .map(|artist| artist.artist_id.clone())
            .collect()
    }

    pub fn count_songs(&self) -> usize {
        self.songs.len()
    }

    pub fn count_artists(&self) -> usize {
        self.artists.len()
    }

    /// Hands the accumulated rows over as tables, still un-normalized.
    pub fn into_tables(self) -> CollectionTables {
        CollectionTables {
            users: vec![self.user],
            songs: self.songs,
            artists: self.artists,
            artist_genres: self.artist_genres,
            song_artist_interactions: self.song_artists,
            user_song_interactions: self.user_songs.into_values().collect(),
            user_artist_interactions: self.user_artists.into_values().collect(),
        }
    }
}
