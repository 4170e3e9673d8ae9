//! Test fixture creation for the catalog database

use super::constants::*;
use anyhow::Result;
use playlist_catalog_server::catalog_store::SqliteCatalogStore;
use rusqlite::{params, Connection};
use std::path::PathBuf;
use tempfile::TempDir;

/// Creates a temporary catalog with 2 playlists, 2 artists, 2 albums and
/// 5 songs. Returns (temp_dir, catalog_db_path).
///
/// Song 3 stores its duration as a legacy `M:SS` string and song 5 has no
/// genre.
pub fn create_test_catalog() -> Result<(TempDir, PathBuf)> {
    let dir = TempDir::new()?;
    let catalog_db_path = dir.path().join("catalog.db");

    // Opening the store creates the schema.
    drop(SqliteCatalogStore::new(&catalog_db_path, 1)?);

    let conn = Connection::open(&catalog_db_path)?;
    conn.pragma_update(None, "foreign_keys", "ON")?;

    conn.execute(
        "INSERT INTO artists (id, name) VALUES (1, ?1), (2, ?2)",
        params![ARTIST_1_NAME, ARTIST_2_NAME],
    )?;
    conn.execute(
        "INSERT INTO genres (id, name) VALUES (1, ?1), (2, ?2)",
        params![GENRE_ROCK, GENRE_JAZZ],
    )?;
    conn.execute(
        "INSERT INTO albums (id, name, year, artist_id) VALUES (1, ?1, ?2, 1), (2, ?3, ?4, 2)",
        params![ALBUM_1_NAME, ALBUM_1_YEAR, ALBUM_2_NAME, ALBUM_2_YEAR],
    )?;
    conn.execute(
        "INSERT INTO playlists (id, name, date, duration) VALUES (?1, ?2, ?3, 600), (?4, ?5, ?6, NULL)",
        params![
            PLAYLIST_1_ID,
            PLAYLIST_1_NAME,
            PLAYLIST_1_DATE,
            PLAYLIST_2_ID,
            PLAYLIST_2_NAME,
            PLAYLIST_2_DATE
        ],
    )?;

    let songs: [(i64, &str, rusqlite::types::Value, i64, i64, i64, Option<i64>, i64); 5] = [
        (1, SONG_1_NAME, 180.into(), 1, 1, 1, Some(1), PLAYLIST_1_ID),
        (2, SONG_2_NAME, 210.into(), 2, 1, 1, Some(1), PLAYLIST_1_ID),
        (3, SONG_3_NAME, "3:30".to_string().into(), 3, 1, 1, Some(1), PLAYLIST_1_ID),
        (4, SONG_4_NAME, 240.into(), 1, 2, 2, Some(2), PLAYLIST_2_ID),
        (5, SONG_5_NAME, 300.into(), 2, 2, 2, None, PLAYLIST_2_ID),
    ];
    let mut insert = conn.prepare(
        "INSERT INTO songs (id, name, duration, track_number, artist_id, album_id, genre_id, playlist_id)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
    )?;
    for (id, name, duration, track, artist, album, genre, playlist) in songs {
        insert.execute(params![id, name, duration, track, artist, album, genre, playlist])?;
    }

    Ok((dir, catalog_db_path))
}
