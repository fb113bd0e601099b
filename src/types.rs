use std::fmt;

use serde::{Deserialize, Serialize};
use tabled::Tabled;

// Spotify Web API payloads. Fields the API documents as nullable, or that
// are missing for local files and unavailable tracks, are optional so a
// single odd item never fails a whole page.

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Image {
    pub url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: String,
    pub email: Option<String>,
    pub images: Option<Vec<Image>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Option<Vec<Option<T>>>,
    pub total: Option<u64>,
    pub next: Option<String>,
}

impl<T> Page<T> {
    /// Non-null items of the page.
    pub fn items(&self) -> impl Iterator<Item = &T> {
        self.items.iter().flatten().flatten()
    }

    /// Number of entries on the page, null ones included.
    pub fn entry_count(&self) -> usize {
        self.items.as_ref().map_or(0, Vec::len)
    }

    pub fn is_empty(&self) -> bool {
        self.entry_count() == 0
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlbumObject {
    pub images: Option<Vec<Image>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArtistObject {
    pub id: Option<String>,
    pub name: Option<String>,
    pub genres: Option<Vec<String>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackObject {
    pub id: Option<String>,
    pub name: Option<String>,
    pub album: Option<AlbumObject>,
    pub artists: Option<Vec<ArtistObject>>,
}

/// Wrapper used by both saved tracks and playlist tracks.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackItem {
    pub track: Option<TrackObject>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaylistTracksRef {
    pub href: Option<String>,
    pub total: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaylistObject {
    pub id: Option<String>,
    pub name: Option<String>,
    pub tracks: Option<PlaylistTracksRef>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FollowedArtistsResponse {
    pub artists: Option<Page<ArtistObject>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeveralArtistsResponse {
    pub artists: Option<Vec<Option<ArtistObject>>>,
}

/// A track whose id, name and credited artists could all be resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedTrack {
    pub song: Song,
    pub artists: Vec<Artist>,
}

impl TrackObject {
    /// Resolves the track into rows, or `None` when the id, the name or
    /// every credited artist is missing.
    pub fn resolve(&self) -> Option<ResolvedTrack> {
        let song_id = self.id.as_deref().filter(|id| !id.is_empty())?;
        let title = self.name.as_deref().filter(|name| !name.is_empty())?;

        let artists: Vec<Artist> = self
            .artists
            .as_deref()
            .unwrap_or_default()
            .iter()
            .filter_map(ArtistObject::resolve)
            .collect();
        if artists.is_empty() {
            return None;
        }

        let img_url = self
            .album
            .as_ref()
            .and_then(|album| first_image_url(album.images.as_deref()));

        Some(ResolvedTrack {
            song: Song {
                song_id: song_id.to_string(),
                title: title.to_string(),
                img_url,
                preview_url: None,
            },
            artists,
        })
    }
}

impl ArtistObject {
    pub fn resolve(&self) -> Option<Artist> {
        let artist_id = self.id.as_deref().filter(|id| !id.is_empty())?;
        let name = self.name.as_deref()?;
        Some(Artist {
            artist_id: artist_id.to_string(),
            name: name.to_string(),
        })
    }
}

/// URL of the first image in a list, if any.
pub fn first_image_url(images: Option<&[Image]>) -> Option<String> {
    images
        .and_then(|images| images.first())
        .and_then(|image| image.url.clone())
}

// Video search payloads used for preview lookup.

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoSearchResponse {
    pub items: Option<Vec<VideoSearchResult>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoSearchResult {
    pub id: Option<VideoResourceId>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoResourceId {
    #[serde(rename = "videoId")]
    pub video_id: Option<String>,
}

// Table rows. Natural keys are noted on each struct.

/// Keyed by `user_id`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct User {
    pub user_id: String,
    pub email: Option<String>,
    pub profile_img_url: Option<String>,
}

/// Keyed by `song_id`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Song {
    pub song_id: String,
    pub title: String,
    pub img_url: Option<String>,
    pub preview_url: Option<String>,
}

/// A stored song without a preview link and the name of its first credited
/// artist, if any is linked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewCandidate {
    pub song: Song,
    pub artist_name: Option<String>,
}

/// Keyed by `artist_id`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Artist {
    pub artist_id: String,
    pub name: String,
}

/// Keyed by `(artist_id, genre)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ArtistGenre {
    pub artist_id: String,
    pub genre: String,
}

/// Keyed by `(song_id, artist_id)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SongArtistInteraction {
    pub song_id: String,
    pub artist_id: String,
}

/// Keyed by `(user_id, song_id)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserSongInteraction {
    pub user_id: String,
    pub song_id: String,
    pub saved: bool,
    pub top_song: bool,
    pub playlist: bool,
}

/// Keyed by `(user_id, artist_id)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserArtistInteraction {
    pub user_id: String,
    pub artist_id: String,
    pub follows: bool,
    pub top_artist: bool,
}

/// Flag contributed to a [`UserSongInteraction`] by a collection pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SongFlag {
    Saved,
    TopSong,
    Playlist,
}

/// Flag contributed to a [`UserArtistInteraction`] by a collection pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtistFlag {
    Follows,
    TopArtist,
}

impl UserSongInteraction {
    pub fn new(user_id: &str, song_id: &str) -> Self {
        Self {
            user_id: user_id.to_string(),
            song_id: song_id.to_string(),
            saved: false,
            top_song: false,
            playlist: false,
        }
    }

    pub fn set(&mut self, flag: SongFlag) {
        match flag {
            SongFlag::Saved => self.saved = true,
            SongFlag::TopSong => self.top_song = true,
            SongFlag::Playlist => self.playlist = true,
        }
    }

    /// ORs every flag of `other` into `self`.
    pub fn absorb(&mut self, other: &Self) {
        self.saved |= other.saved;
        self.top_song |= other.top_song;
        self.playlist |= other.playlist;
    }
}

impl UserArtistInteraction {
    pub fn new(user_id: &str, artist_id: &str) -> Self {
        Self {
            user_id: user_id.to_string(),
            artist_id: artist_id.to_string(),
            follows: false,
            top_artist: false,
        }
    }

    pub fn set(&mut self, flag: ArtistFlag) {
        match flag {
            ArtistFlag::Follows => self.follows = true,
            ArtistFlag::TopArtist => self.top_artist = true,
        }
    }

    pub fn absorb(&mut self, other: &Self) {
        self.follows |= other.follows;
        self.top_artist |= other.top_artist;
    }
}

/// The seven persisted tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Table {
    Users,
    Songs,
    Artists,
    ArtistGenres,
    SongArtistInteractions,
    UserSongInteractions,
    UserArtistInteractions,
}

impl Table {
    pub const ALL: [Table; 7] = [
        Table::Users,
        Table::Songs,
        Table::Artists,
        Table::ArtistGenres,
        Table::SongArtistInteractions,
        Table::UserSongInteractions,
        Table::UserArtistInteractions,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Table::Users => "users",
            Table::Songs => "songs",
            Table::Artists => "artists",
            Table::ArtistGenres => "artist_genres",
            Table::SongArtistInteractions => "song_artist_interactions",
            Table::UserSongInteractions => "user_song_interactions",
            Table::UserArtistInteractions => "user_artist_interactions",
        }
    }

    /// First column of the table's natural key.
    pub fn key_column(&self) -> &'static str {
        match self {
            Table::Users | Table::UserSongInteractions | Table::UserArtistInteractions => {
                "user_id"
            }
            Table::Songs | Table::SongArtistInteractions => "song_id",
            Table::Artists | Table::ArtistGenres => "artist_id",
        }
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Tabled)]
pub struct TableCountRow {
    pub table: String,
    pub rows: usize,
    pub unique_keys: usize,
}

#[derive(Tabled)]
pub struct PersistTableRow {
    pub table: String,
    pub rows: usize,
    pub status: String,
}
