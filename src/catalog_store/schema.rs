//! SQLite schema definitions for the playlist catalog database.
//!
//! `duration` columns are declared INTEGER but may hold legacy `MM:SS`
//! text written by older importers; SQLite keeps such values as TEXT and the
//! store normalizes them on read.

use crate::sqlite_column;
use crate::sqlite_persistence::{
    Column, ForeignKey, ForeignKeyOnChange, SqlType, Table, VersionedSchema,
};

const ARTIST_FK: ForeignKey = ForeignKey {
    foreign_table: "artists",
    foreign_column: "id",
    on_delete: ForeignKeyOnChange::Cascade,
};

const ALBUM_FK: ForeignKey = ForeignKey {
    foreign_table: "albums",
    foreign_column: "id",
    on_delete: ForeignKeyOnChange::SetNull,
};

const GENRE_FK: ForeignKey = ForeignKey {
    foreign_table: "genres",
    foreign_column: "id",
    on_delete: ForeignKeyOnChange::SetNull,
};

const PLAYLIST_FK: ForeignKey = ForeignKey {
    foreign_table: "playlists",
    foreign_column: "id",
    on_delete: ForeignKeyOnChange::Cascade,
};

const ARTISTS_TABLE: Table = Table {
    name: "artists",
    columns: &[
        sqlite_column!("id", &SqlType::Integer, is_primary_key = true),
        sqlite_column!("name", &SqlType::Text, non_null = true, is_unique = true),
    ],
    indices: &[],
};

const GENRES_TABLE: Table = Table {
    name: "genres",
    columns: &[
        sqlite_column!("id", &SqlType::Integer, is_primary_key = true),
        sqlite_column!("name", &SqlType::Text, non_null = true, is_unique = true),
    ],
    indices: &[],
};

const ALBUMS_TABLE: Table = Table {
    name: "albums",
    columns: &[
        sqlite_column!("id", &SqlType::Integer, is_primary_key = true),
        sqlite_column!("name", &SqlType::Text, non_null = true),
        sqlite_column!("year", &SqlType::Integer),
        sqlite_column!(
            "artist_id",
            &SqlType::Integer,
            non_null = true,
            foreign_key = Some(&ARTIST_FK)
        ),
    ],
    indices: &[("idx_albums_artist", "artist_id")],
};

const PLAYLISTS_TABLE: Table = Table {
    name: "playlists",
    columns: &[
        sqlite_column!("id", &SqlType::Integer, is_primary_key = true),
        sqlite_column!("name", &SqlType::Text, non_null = true, is_unique = true),
        sqlite_column!("date", &SqlType::Text), // ISO-8601 day or timestamp
        sqlite_column!("duration", &SqlType::Integer),
    ],
    indices: &[("idx_playlists_date", "date")],
};

const SONGS_TABLE: Table = Table {
    name: "songs",
    columns: &[
        sqlite_column!("id", &SqlType::Integer, is_primary_key = true),
        sqlite_column!("name", &SqlType::Text, non_null = true),
        sqlite_column!("duration", &SqlType::Integer),
        sqlite_column!("track_number", &SqlType::Integer, non_null = true),
        sqlite_column!(
            "artist_id",
            &SqlType::Integer,
            non_null = true,
            foreign_key = Some(&ARTIST_FK)
        ),
        sqlite_column!("album_id", &SqlType::Integer, foreign_key = Some(&ALBUM_FK)),
        sqlite_column!("genre_id", &SqlType::Integer, foreign_key = Some(&GENRE_FK)),
        sqlite_column!(
            "playlist_id",
            &SqlType::Integer,
            non_null = true,
            foreign_key = Some(&PLAYLIST_FK)
        ),
    ],
    indices: &[
        ("idx_songs_artist", "artist_id"),
        ("idx_songs_album", "album_id"),
        ("idx_songs_genre", "genre_id"),
        ("idx_songs_playlist", "playlist_id"),
    ],
};

pub const CATALOG_VERSIONED_SCHEMAS: &[VersionedSchema] = &[VersionedSchema {
    version: 0,
    tables: &[
        ARTISTS_TABLE,
        GENRES_TABLE,
        ALBUMS_TABLE,
        PLAYLISTS_TABLE,
        SONGS_TABLE,
    ],
    migration: None,
}];

#[cfg(test)]
mod tests {
    use super::*;
    use rusqlite::Connection;

    #[test]
    fn test_schema_creates_successfully() {
        let conn = Connection::open_in_memory().unwrap();
        let schema = &CATALOG_VERSIONED_SCHEMAS[0];
        schema.create(&conn).unwrap();
        schema.validate(&conn).unwrap();
    }

    #[test]
    fn test_duration_column_keeps_legacy_text() {
        let conn = Connection::open_in_memory().unwrap();
        CATALOG_VERSIONED_SCHEMAS[0].create(&conn).unwrap();

        conn.execute_batch(
            "INSERT INTO artists (id, name) VALUES (1, 'Artist');
             INSERT INTO playlists (id, name) VALUES (1, 'Mix');
             INSERT INTO songs (name, duration, track_number, artist_id, playlist_id)
             VALUES ('a', '3:30', 1, 1, 1), ('b', 210, 2, 1, 1);",
        )
        .unwrap();

        let mut stmt = conn
            .prepare("SELECT typeof(duration) FROM songs ORDER BY id")
            .unwrap();
        let types: Vec<String> = stmt
            .query_map([], |r| r.get(0))
            .unwrap()
            .map(|r| r.unwrap())
            .collect();
        assert_eq!(types, vec!["text", "integer"]);
    }

    #[test]
    fn test_deleting_playlist_cascades_to_songs() {
        let conn = Connection::open_in_memory().unwrap();
        CATALOG_VERSIONED_SCHEMAS[0].create(&conn).unwrap();

        conn.execute_batch(
            "INSERT INTO artists (id, name) VALUES (1, 'Artist');
             INSERT INTO playlists (id, name) VALUES (1, 'Mix');
             INSERT INTO songs (name, track_number, artist_id, playlist_id) VALUES ('a', 1, 1, 1);
             DELETE FROM playlists WHERE id = 1;",
        )
        .unwrap();

        let songs: i64 = conn
            .query_row("SELECT COUNT(*) FROM songs", [], |r| r.get(0))
            .unwrap();
        assert_eq!(songs, 0);
    }
}
