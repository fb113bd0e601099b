//! Schema definition for the collected tables.

/// Schema definition for the collection store.
pub struct CollectionSchema {
    pub version: usize,
    pub up: &'static str,
}

// No foreign keys: tables are persisted independently and a run may leave
// some of them written and others not.
pub const COLLECTION_VERSIONED_SCHEMAS: &[CollectionSchema] = &[CollectionSchema {
    version: 1,
    up: r#"
            CREATE TABLE IF NOT EXISTS users (
                user_id TEXT PRIMARY KEY,
                email TEXT,
                profile_img_url TEXT,
                last_updated TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS songs (
                song_id TEXT PRIMARY KEY,
                title TEXT NOT NULL,
                img_url TEXT,
                preview_url TEXT
            );

            CREATE TABLE IF NOT EXISTS artists (
                artist_id TEXT PRIMARY KEY,
                name TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS artist_genres (
                artist_id TEXT NOT NULL,
                genre TEXT NOT NULL,
                PRIMARY KEY (artist_id, genre)
            );

            CREATE TABLE IF NOT EXISTS song_artist_interactions (
                song_id TEXT NOT NULL,
                artist_id TEXT NOT NULL,
                PRIMARY KEY (song_id, artist_id)
            );

            CREATE TABLE IF NOT EXISTS user_song_interactions (
                user_id TEXT NOT NULL,
                song_id TEXT NOT NULL,
                saved INTEGER NOT NULL DEFAULT 0,
                top_song INTEGER NOT NULL DEFAULT 0,
                playlist INTEGER NOT NULL DEFAULT 0,
                PRIMARY KEY (user_id, song_id)
            );

            CREATE TABLE IF NOT EXISTS user_artist_interactions (
                user_id TEXT NOT NULL,
                artist_id TEXT NOT NULL,
                follows INTEGER NOT NULL DEFAULT 0,
                top_artist INTEGER NOT NULL DEFAULT 0,
                PRIMARY KEY (user_id, artist_id)
            );

            CREATE INDEX IF NOT EXISTS idx_song_artist_song ON song_artist_interactions(song_id);
        "#,
}];
