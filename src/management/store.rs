//! SQLite persistence for collected tables.

use std::path::{Path, PathBuf};

use chrono::Utc;
use rusqlite::{Connection, Statement, params};
use thiserror::Error;

use super::normalize::CollectionTables;
use super::schema::COLLECTION_VERSIONED_SCHEMAS;
use crate::types::{
    Artist, ArtistGenre, PreviewCandidate, Song, SongArtistInteraction, Table, User,
    UserArtistInteraction, UserSongInteraction,
};

/// Errors raised by the collection store.
#[derive(Debug, Error)]
pub enum PersistError {
    #[error("failed to open store at {}: {source}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    #[error("failed to create directory {}: {source}", .path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write {table}: {source}")]
    Write {
        table: Table,
        #[source]
        source: rusqlite::Error,
    },

    #[error("failed to read {table}: {source}")]
    Read {
        table: Table,
        #[source]
        source: rusqlite::Error,
    },
}

/// Result of persisting one table.
#[derive(Debug)]
pub struct TableOutcome {
    pub table: Table,
    pub result: Result<usize, PersistError>,
}

/// A row type that can be upserted on its natural key.
pub trait UpsertRow {
    const TABLE: Table;
    const UPSERT_SQL: &'static str;

    fn execute(&self, stmt: &mut Statement<'_>) -> rusqlite::Result<usize>;
}

impl UpsertRow for User {
    const TABLE: Table = Table::Users;
    const UPSERT_SQL: &'static str = "INSERT INTO users (user_id, email, profile_img_url, last_updated)
         VALUES (?1, ?2, ?3, ?4)
         ON CONFLICT(user_id) DO UPDATE SET
             email = excluded.email,
             profile_img_url = excluded.profile_img_url,
             last_updated = excluded.last_updated";

    fn execute(&self, stmt: &mut Statement<'_>) -> rusqlite::Result<usize> {
        stmt.execute(params![
            self.user_id,
            self.email,
            self.profile_img_url,
            Utc::now().to_rfc3339()
        ])
    }
}

impl UpsertRow for Song {
    const TABLE: Table = Table::Songs;
    // a run never knows previews, so keep the stored one when none is given
    const UPSERT_SQL: &'static str = "INSERT INTO songs (song_id, title, img_url, preview_url)
         VALUES (?1, ?2, ?3, ?4)
         ON CONFLICT(song_id) DO UPDATE SET
             title = excluded.title,
             img_url = excluded.img_url,
             preview_url = COALESCE(excluded.preview_url, songs.preview_url)";

    fn execute(&self, stmt: &mut Statement<'_>) -> rusqlite::Result<usize> {
        stmt.execute(params![
            self.song_id,
            self.title,
            self.img_url,
            self.preview_url
        ])
    }
}

impl UpsertRow for Artist {
    const TABLE: Table = Table::Artists;
    const UPSERT_SQL: &'static str = "INSERT INTO artists (artist_id, name)
         VALUES (?1, ?2)
         ON CONFLICT(artist_id) DO UPDATE SET name = excluded.name";

    fn execute(&self, stmt: &mut Statement<'_>) -> rusqlite::Result<usize> {
        stmt.execute(params![self.artist_id, self.name])
    }
}

impl UpsertRow for ArtistGenre {
    const TABLE: Table = Table::ArtistGenres;
    const UPSERT_SQL: &'static str = "INSERT INTO artist_genres (artist_id, genre)
         VALUES (?1, ?2)
         ON CONFLICT(artist_id, genre) DO NOTHING";

    fn execute(&self, stmt: &mut Statement<'_>) -> rusqlite::Result<usize> {
        stmt.execute(params![self.artist_id, self.genre])
    }
}

impl UpsertRow for SongArtistInteraction {
    const TABLE: Table = Table::SongArtistInteractions;
    const UPSERT_SQL: &'static str = "INSERT INTO song_artist_interactions (song_id, artist_id)
         VALUES (?1, ?2)
         ON CONFLICT(song_id, artist_id) DO NOTHING";

    fn execute(&self, stmt: &mut Statement<'_>) -> rusqlite::Result<usize> {
        stmt.execute(params![self.song_id, self.artist_id])
    }
}

impl UpsertRow for UserSongInteraction {
    const TABLE: Table = Table::UserSongInteractions;
    // flags only ever turn on
    const UPSERT_SQL: &'static str = "INSERT INTO user_song_interactions (user_id, song_id, saved, top_song, playlist)
         VALUES (?1, ?2, ?3, ?4, ?5)
         ON CONFLICT(user_id, song_id) DO UPDATE SET
             saved = MAX(saved, excluded.saved),
             top_song = MAX(top_song, excluded.top_song),
             playlist = MAX(playlist, excluded.playlist)";

    fn execute(&self, stmt: &mut Statement<'_>) -> rusqlite::Result<usize> {
        stmt.execute(params![
            self.user_id,
            self.song_id,
            self.saved,
            self.top_song,
            self.playlist
        ])
    }
}

impl UpsertRow for UserArtistInteraction {
    const TABLE: Table = Table::UserArtistInteractions;
    const UPSERT_SQL: &'static str = "INSERT INTO user_artist_interactions (user_id, artist_id, follows, top_artist)
         VALUES (?1, ?2, ?3, ?4)
         ON CONFLICT(user_id, artist_id) DO UPDATE SET
             follows = MAX(follows, excluded.follows),
             top_artist = MAX(top_artist, excluded.top_artist)";

    fn execute(&self, stmt: &mut Statement<'_>) -> rusqlite::Result<usize> {
        stmt.execute(params![
            self.user_id,
            self.artist_id,
            self.follows,
            self.top_artist
        ])
    }
}

/// Store for collected tables.
///
/// Every table write opens its own connection and transaction, so one failing
/// table never rolls back another.
#[derive(Debug, Clone)]
pub struct SqliteStore {
    path: PathBuf,
}

impl SqliteStore {
    /// Opens (creating if needed) the database at `path` and initializes the
    /// schema.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, PersistError> {
        let path = path.as_ref().to_path_buf();
        let open_err = |source| PersistError::Open {
            path: path.clone(),
            source,
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|source| PersistError::CreateDir {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let conn = Connection::open(&path).map_err(open_err)?;
        for schema in COLLECTION_VERSIONED_SCHEMAS {
            conn.execute_batch(schema.up).map_err(open_err)?;
            conn.pragma_update(None, "user_version", schema.version as i64)
                .map_err(open_err)?;
        }

        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn connect(&self) -> rusqlite::Result<Connection> {
        Connection::open(&self.path)
    }

    /// Upserts `rows` into their table inside a single transaction.
    ///
    /// Returns the number of rows written. An empty slice is a no-op.
    pub fn persist<R: UpsertRow>(&self, rows: &[R]) -> Result<usize, PersistError> {
        if rows.is_empty() {
            return Ok(0);
        }
        let write_err = |source| PersistError::Write {
            table: R::TABLE,
            source,
        };

        let mut conn = self.connect().map_err(write_err)?;
        let tx = conn.transaction().map_err(write_err)?;
        {
            let mut stmt = tx.prepare(R::UPSERT_SQL).map_err(write_err)?;
            for row in rows {
                row.execute(&mut stmt).map_err(write_err)?;
            }
        }
        tx.commit().map_err(write_err)?;

        Ok(rows.len())
    }

    /// Persists every table independently and reports each outcome.
    pub fn persist_all(&self, tables: &CollectionTables) -> Vec<TableOutcome> {
        vec![
            self.outcome(&tables.users),
            self.outcome(&tables.songs),
            self.outcome(&tables.artists),
            self.outcome(&tables.artist_genres),
            self.outcome(&tables.song_artist_interactions),
            self.outcome(&tables.user_song_interactions),
            self.outcome(&tables.user_artist_interactions),
        ]
    }

    fn outcome<R: UpsertRow>(&self, rows: &[R]) -> TableOutcome {
        TableOutcome {
            table: R::TABLE,
            result: self.persist(rows),
        }
    }

    /// Songs without a preview link, each with the name of its first credited
    /// artist.
    pub fn songs_missing_preview(&self) -> Result<Vec<PreviewCandidate>, PersistError> {
        let read_err = |source| PersistError::Read {
            table: Table::Songs,
            source,
        };

        let conn = self.connect().map_err(read_err)?;
        let mut stmt = conn
            .prepare(
                "SELECT s.song_id, s.title, s.img_url, s.preview_url,
                    (SELECT a.name FROM song_artist_interactions sa
                     JOIN artists a ON a.artist_id = sa.artist_id
                     WHERE sa.song_id = s.song_id
                     ORDER BY sa.rowid LIMIT 1)
                 FROM songs s
                 WHERE s.preview_url IS NULL OR s.preview_url = ''
                 ORDER BY s.rowid",
            )
            .map_err(read_err)?;

        let candidates = stmt
            .query_map([], |row| {
                Ok(PreviewCandidate {
                    song: Song {
                        song_id: row.get(0)?,
                        title: row.get(1)?,
                        img_url: row.get(2)?,
                        preview_url: row.get(3)?,
                    },
                    artist_name: row.get(4)?,
                })
            })
            .map_err(read_err)?
            .collect::<rusqlite::Result<Vec<_>>>()
            .map_err(read_err)?;

        Ok(candidates)
    }

    pub fn load_songs(&self) -> Result<Vec<Song>, PersistError> {
        self.load(
            Table::Songs,
            "SELECT song_id, title, img_url, preview_url FROM songs ORDER BY rowid",
            |row| {
                Ok(Song {
                    song_id: row.get(0)?,
                    title: row.get(1)?,
                    img_url: row.get(2)?,
                    preview_url: row.get(3)?,
                })
            },
        )
    }

    pub fn load_user_song_interactions(&self) -> Result<Vec<UserSongInteraction>, PersistError> {
        self.load(
            Table::UserSongInteractions,
            "SELECT user_id, song_id, saved, top_song, playlist
             FROM user_song_interactions ORDER BY rowid",
            |row| {
                Ok(UserSongInteraction {
                    user_id: row.get(0)?,
                    song_id: row.get(1)?,
                    saved: row.get(2)?,
                    top_song: row.get(3)?,
                    playlist: row.get(4)?,
                })
            },
        )
    }

    pub fn load_user_artist_interactions(
        &self,
    ) -> Result<Vec<UserArtistInteraction>, PersistError> {
        self.load(
            Table::UserArtistInteractions,
            "SELECT user_id, artist_id, follows, top_artist
             FROM user_artist_interactions ORDER BY rowid",
            |row| {
                Ok(UserArtistInteraction {
                    user_id: row.get(0)?,
                    artist_id: row.get(1)?,
                    follows: row.get(2)?,
                    top_artist: row.get(3)?,
                })
            },
        )
    }

    /// Row count and distinct first-key count of a table.
    pub fn table_count(&self, table: Table) -> Result<(usize, usize), PersistError> {
        let read_err = |source| PersistError::Read { table, source };
        let conn = self.connect().map_err(read_err)?;
        let sql = format!(
            "SELECT COUNT(*), COUNT(DISTINCT {key}) FROM {table}",
            key = table.key_column(),
            table = table.as_str()
        );

        let (rows, unique): (i64, i64) = conn
            .query_row(&sql, [], |row| Ok((row.get(0)?, row.get(1)?)))
            .map_err(read_err)?;

        Ok((rows as usize, unique as usize))
    }

    fn load<T, F>(&self, table: Table, sql: &str, map: F) -> Result<Vec<T>, PersistError>
    where
        F: FnMut(&rusqlite::Row<'_>) -> rusqlite::Result<T>,
    {
        let read_err = |source| PersistError::Read { table, source };
        let conn = self.connect().map_err(read_err)?;
        let mut stmt = conn.prepare(sql).map_err(read_err)?;
        let rows = stmt
            .query_map([], map)
            .map_err(read_err)?
            .collect::<rusqlite::Result<Vec<_>>>()
            .map_err(read_err)?;
        Ok(rows)
    }
}
