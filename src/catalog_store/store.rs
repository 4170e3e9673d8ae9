//! SQLite-backed catalog store.
//!
//! One read-write connection owns schema creation; reads are spread
//! round-robin over a small pool of read-only connections so concurrent
//! requests don't serialize on a single mutex.

use super::duration::StoredDuration;
use super::models::*;
use super::schema::CATALOG_VERSIONED_SCHEMAS;
use super::trait_def::CatalogStore;
use crate::sqlite_persistence::{VersionedSchema, BASE_DB_VERSION};
use anyhow::{bail, Context, Result};
use chrono::{DateTime, NaiveDate};
use rusqlite::functions::FunctionFlags;
use rusqlite::{params, params_from_iter, Connection, OpenFlags, Row};
use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{debug, info};

pub const DEFAULT_READ_POOL_SIZE: usize = 4;

const SONG_SELECT: &str = "SELECT s.id, s.name, s.track_number, s.duration,
            ar.name, al.name, g.name, p.id, p.name
     FROM songs s
     JOIN artists ar ON ar.id = s.artist_id
     JOIN playlists p ON p.id = s.playlist_id
     LEFT JOIN albums al ON al.id = s.album_id
     LEFT JOIN genres g ON g.id = s.genre_id";

/// SQLite-backed catalog store.
#[derive(Clone)]
pub struct SqliteCatalogStore {
    read_pool: Vec<Arc<Mutex<Connection>>>,
    // Held so the database stays in WAL mode with a writer attached.
    _write_conn: Arc<Mutex<Connection>>,
    read_index: Arc<AtomicUsize>,
}

/// Bring the database at `conn` to the last of `schemas`: create it when
/// empty, run every pending migration in one transaction, then validate.
fn migrate_if_needed(conn: &mut Connection, schemas: &[VersionedSchema]) -> Result<()> {
    let Some(latest_schema) = schemas.last() else {
        bail!("No catalog schema declared");
    };
    let latest_version = latest_schema.version;

    let table_count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name NOT LIKE 'sqlite_%'",
        [],
        |r| r.get(0),
    )?;

    if table_count == 0 {
        info!("Creating catalog db schema at version {}", latest_version);
        latest_schema.create(conn)?;
        return Ok(());
    }

    let db_version: i64 = conn.query_row("PRAGMA user_version", [], |r| r.get(0))?;
    if db_version < BASE_DB_VERSION as i64 {
        bail!(
            "Database has user_version {} and was not created by this server",
            db_version
        );
    }
    let mut current_version = (db_version - BASE_DB_VERSION as i64) as usize;
    if current_version > latest_version {
        bail!(
            "Database schema version {} is newer than the latest known version {}",
            current_version,
            latest_version
        );
    }

    if current_version < latest_version {
        let tx = conn.transaction()?;
        for schema in schemas.iter().skip(current_version + 1) {
            if let Some(migration_fn) = schema.migration {
                info!(
                    "Migrating catalog db from version {} to {}",
                    current_version, schema.version
                );
                migration_fn(&tx)?;
            }
            current_version = schema.version;
        }
        tx.pragma_update(None, "user_version", (BASE_DB_VERSION + current_version) as i64)?;
        tx.commit()?;
    }

    latest_schema
        .validate(conn)
        .context("Catalog schema validation failed")
}

/// SQL function lowercasing with Unicode rules; `LIKE` alone only folds ASCII.
const LOWER_FN: &str = "ulower";

fn register_functions(conn: &Connection) -> Result<()> {
    conn.create_scalar_function(
        LOWER_FN,
        1,
        FunctionFlags::SQLITE_UTF8 | FunctionFlags::SQLITE_DETERMINISTIC,
        |ctx| {
            let value: Option<String> = ctx.get(0)?;
            Ok(value.map(|v| v.to_lowercase()))
        },
    )
    .with_context(|| format!("Failed to register SQL function {}", LOWER_FN))
}

/// Lowercase `term` and escape `%`, `_` and `\` so it is matched literally by
/// `ulower(column) LIKE ... ESCAPE '\'`.
fn like_pattern(term: &str) -> String {
    let escaped = term
        .to_lowercase()
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{}%", escaped)
}

/// Accepts `YYYY-MM-DD` or a full RFC 3339 timestamp.
fn parse_date(raw: Option<String>) -> Option<NaiveDate> {
    let raw = raw?;
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(raw).ok().map(|d| d.date_naive()))
        .or_else(|| {
            raw.get(..10)
                .and_then(|prefix| NaiveDate::parse_from_str(prefix, "%Y-%m-%d").ok())
        })
}

fn count_from_sql(value: i64) -> usize {
    usize::try_from(value).unwrap_or(0)
}

impl SqliteCatalogStore {
    /// Open (creating if needed) the catalog database at `db_path`.
    ///
    /// # Arguments
    /// * `db_path` - Path to the SQLite database file
    /// * `read_pool_size` - Number of read-only connections (at least 1)
    pub fn new<P: AsRef<Path>>(db_path: P, read_pool_size: usize) -> Result<Self> {
        let db_path = db_path.as_ref();

        let mut write_conn = Connection::open_with_flags(
            db_path,
            OpenFlags::SQLITE_OPEN_READ_WRITE
                | OpenFlags::SQLITE_OPEN_CREATE
                | OpenFlags::SQLITE_OPEN_URI
                | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )
        .with_context(|| format!("Failed to open catalog database at {:?}", db_path))?;

        migrate_if_needed(&mut write_conn, CATALOG_VERSIONED_SCHEMAS)?;
        write_conn.pragma_update(None, "journal_mode", "WAL")?;
        write_conn.pragma_update(None, "foreign_keys", "ON")?;

        let mut read_pool = Vec::with_capacity(read_pool_size.max(1));
        for _ in 0..read_pool_size.max(1) {
            let read_conn = Connection::open_with_flags(
                db_path,
                OpenFlags::SQLITE_OPEN_READ_ONLY
                    | OpenFlags::SQLITE_OPEN_URI
                    | OpenFlags::SQLITE_OPEN_NO_MUTEX,
            )?;
            register_functions(&read_conn)?;
            read_pool.push(Arc::new(Mutex::new(read_conn)));
        }

        let store = SqliteCatalogStore {
            read_pool,
            _write_conn: Arc::new(Mutex::new(write_conn)),
            read_index: Arc::new(AtomicUsize::new(0)),
        };

        info!(
            "Opened playlist catalog: {} playlists, {} songs, {} artists, {} albums",
            store.count(CatalogEntity::Playlist)?,
            store.count(CatalogEntity::Song)?,
            store.count(CatalogEntity::Artist)?,
            store.count(CatalogEntity::Album)?,
        );

        Ok(store)
    }

    fn read_conn(&self) -> Arc<Mutex<Connection>> {
        let index = self.read_index.fetch_add(1, Ordering::Relaxed) % self.read_pool.len();
        self.read_pool[index].clone()
    }

    fn lock(conn: &Mutex<Connection>) -> MutexGuard<'_, Connection> {
        // A panicked reader cannot leave a read-only connection half-written.
        conn.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn parse_playlist_row(row: &Row) -> rusqlite::Result<PlaylistRow> {
        Ok(PlaylistRow {
            id: row.get(0)?,
            name: row.get(1)?,
            date: parse_date(row.get(2)?),
            duration: row.get::<_, StoredDuration>(3)?.0,
        })
    }

    /// Parse a row selected with [`SONG_SELECT`].
    fn parse_song_row(row: &Row) -> rusqlite::Result<SongRow> {
        Ok(SongRow {
            id: row.get(0)?,
            name: row.get(1)?,
            track_number: row.get(2)?,
            duration: row.get::<_, StoredDuration>(3)?.0,
            artist: NameRef { name: row.get(4)? },
            album: row.get::<_, Option<String>>(5)?.map(|name| NameRef { name }),
            genre: row.get::<_, Option<String>>(6)?.map(|name| NameRef { name }),
            playlist: PlaylistRef {
                id: row.get(7)?,
                name: row.get(8)?,
            },
        })
    }

    fn parse_named_count(row: &Row) -> rusqlite::Result<NamedCount> {
        Ok(NamedCount {
            name: row.get(0)?,
            song_count: count_from_sql(row.get(1)?),
        })
    }
}

impl CatalogStore for SqliteCatalogStore {
    fn list_playlists(&self) -> Result<Vec<PlaylistSummary>> {
        let read_conn = self.read_conn();
        let conn = Self::lock(&read_conn);

        let mut stmt = conn.prepare_cached(
            "SELECT p.id, p.name, p.date, p.duration,
                    (SELECT COUNT(*) FROM songs s WHERE s.playlist_id = p.id)
             FROM playlists p
             ORDER BY p.date IS NULL, p.date DESC, p.id",
        )?;
        let playlists = stmt
            .query_map([], |row| {
                Ok(PlaylistSummary {
                    playlist: Self::parse_playlist_row(row)?,
                    song_count: count_from_sql(row.get(4)?),
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(playlists)
    }

    fn get_playlist(&self, id: i64) -> Result<Option<PlaylistDetail>> {
        let read_conn = self.read_conn();
        let conn = Self::lock(&read_conn);

        let mut stmt = conn
            .prepare_cached("SELECT id, name, date, duration FROM playlists WHERE id = ?1")?;
        let playlist = match stmt.query_row(params![id], Self::parse_playlist_row) {
            Ok(playlist) => playlist,
            Err(rusqlite::Error::QueryReturnedNoRows) => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let mut songs_stmt = conn.prepare_cached(&format!(
            "{} WHERE s.playlist_id = ?1 ORDER BY s.track_number, s.id",
            SONG_SELECT
        ))?;
        let songs = songs_stmt
            .query_map(params![id], Self::parse_song_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Some(PlaylistDetail { playlist, songs }))
    }

    fn find_playlists(&self, term: &str, take: usize) -> Result<Vec<PlaylistRow>> {
        let read_conn = self.read_conn();
        let conn = Self::lock(&read_conn);

        let mut stmt = conn.prepare_cached(
            "SELECT id, name, date, duration FROM playlists
             WHERE ulower(name) LIKE ?1 ESCAPE '\\'
             ORDER BY id LIMIT ?2",
        )?;
        let rows = stmt
            .query_map(params![like_pattern(term), take as i64], Self::parse_playlist_row)?
            .collect::<Result<Vec<_>, _>>()?;
        debug!("find_playlists({:?}) -> {} candidates", term, rows.len());
        Ok(rows)
    }

    fn find_songs(&self, term: &str, take: usize) -> Result<Vec<SongRow>> {
        let read_conn = self.read_conn();
        let conn = Self::lock(&read_conn);

        let mut stmt = conn.prepare_cached(&format!(
            "{} WHERE ulower(s.name) LIKE ?1 ESCAPE '\\'
                OR ulower(ar.name) LIKE ?1 ESCAPE '\\'
                OR ulower(al.name) LIKE ?1 ESCAPE '\\'
             ORDER BY s.id LIMIT ?2",
            SONG_SELECT
        ))?;
        let rows = stmt
            .query_map(params![like_pattern(term), take as i64], Self::parse_song_row)?
            .collect::<Result<Vec<_>, _>>()?;
        debug!("find_songs({:?}) -> {} candidates", term, rows.len());
        Ok(rows)
    }

    fn find_artists(&self, term: &str, take: usize) -> Result<Vec<ArtistRow>> {
        let read_conn = self.read_conn();
        let conn = Self::lock(&read_conn);

        let mut stmt = conn.prepare_cached(
            "SELECT a.id, a.name,
                    (SELECT COUNT(*) FROM songs s WHERE s.artist_id = a.id)
             FROM artists a
             WHERE ulower(a.name) LIKE ?1 ESCAPE '\\'
             ORDER BY a.id LIMIT ?2",
        )?;
        let rows = stmt
            .query_map(params![like_pattern(term), take as i64], |row| {
                Ok(ArtistRow {
                    id: row.get(0)?,
                    name: row.get(1)?,
                    song_count: count_from_sql(row.get(2)?),
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        debug!("find_artists({:?}) -> {} candidates", term, rows.len());
        Ok(rows)
    }

    fn find_named(&self, kind: NamedEntity, term: &str, take: usize) -> Result<Vec<NamedCount>> {
        let read_conn = self.read_conn();
        let conn = Self::lock(&read_conn);

        let mut stmt = conn.prepare_cached(&format!(
            "SELECT e.name, (SELECT COUNT(*) FROM songs s WHERE s.{fk} = e.id)
             FROM {table} e
             WHERE ulower(e.name) LIKE ?1 ESCAPE '\\'
             ORDER BY e.id LIMIT ?2",
            fk = kind.song_column(),
            table = kind.table()
        ))?;
        let rows = stmt
            .query_map(
                params![like_pattern(term), take as i64],
                Self::parse_named_count,
            )?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    fn top_named(&self, kind: NamedEntity, take: usize) -> Result<Vec<NamedCount>> {
        let read_conn = self.read_conn();
        let conn = Self::lock(&read_conn);

        let mut stmt = conn.prepare_cached(&format!(
            "SELECT e.name, COUNT(s.id) AS songs
             FROM {table} e
             LEFT JOIN songs s ON s.{fk} = e.id
             GROUP BY e.id
             ORDER BY songs DESC, e.id
             LIMIT ?1",
            fk = kind.song_column(),
            table = kind.table()
        ))?;
        let rows = stmt
            .query_map(params![take as i64], Self::parse_named_count)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    fn count(&self, entity: CatalogEntity) -> Result<usize> {
        let read_conn = self.read_conn();
        let conn = Self::lock(&read_conn);

        let count: i64 = conn.query_row(
            &format!("SELECT COUNT(*) FROM {}", entity.table()),
            [],
            |r| r.get(0),
        )?;
        Ok(count_from_sql(count))
    }

    fn group_songs(&self, by: NamedEntity, take: Option<usize>) -> Result<Vec<GroupedCount>> {
        let read_conn = self.read_conn();
        let conn = Self::lock(&read_conn);

        // LIMIT -1 means no limit in SQLite.
        let limit = take.map(|t| t as i64).unwrap_or(-1);
        let mut stmt = conn.prepare_cached(&format!(
            "SELECT {fk}, COUNT(id) AS n FROM songs
             GROUP BY {fk}
             ORDER BY n DESC, {fk}
             LIMIT ?1",
            fk = by.song_column()
        ))?;
        let rows = stmt
            .query_map(params![limit], |row| {
                Ok(GroupedCount {
                    key: row.get(0)?,
                    count: count_from_sql(row.get(1)?),
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    fn names(&self, kind: NamedEntity, ids: &[i64]) -> Result<HashMap<i64, String>> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }
        let read_conn = self.read_conn();
        let conn = Self::lock(&read_conn);

        let placeholders = vec!["?"; ids.len()].join(", ");
        let mut stmt = conn.prepare(&format!(
            "SELECT id, name FROM {} WHERE id IN ({})",
            kind.table(),
            placeholders
        ))?;
        let names = stmt
            .query_map(params_from_iter(ids.iter()), |row| {
                Ok((row.get::<_, i64>(0)?, row.get::<_, String>(1)?))
            })?
            .collect::<Result<HashMap<_, _>, _>>()?;
        Ok(names)
    }

    fn dated_playlists(&self) -> Result<Vec<DatedPlaylist>> {
        let read_conn = self.read_conn();
        let conn = Self::lock(&read_conn);

        let mut stmt = conn.prepare_cached(
            "SELECT p.date, (SELECT COUNT(*) FROM songs s WHERE s.playlist_id = p.id)
             FROM playlists p
             WHERE p.date IS NOT NULL
             ORDER BY p.id",
        )?;
        let rows = stmt
            .query_map([], |row| {
                Ok((
                    parse_date(row.get(0)?),
                    count_from_sql(row.get(1)?),
                ))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(rows
            .into_iter()
            .filter_map(|(date, song_count)| date.map(|date| DatedPlaylist { date, song_count }))
            .collect())
    }

    fn song_durations(&self) -> Result<Vec<u32>> {
        let read_conn = self.read_conn();
        let conn = Self::lock(&read_conn);

        let mut stmt = conn.prepare_cached(
            "SELECT duration FROM songs WHERE duration IS NOT NULL ORDER BY id",
        )?;
        let durations = stmt
            .query_map([], |row| row.get::<_, StoredDuration>(0))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(durations.into_iter().filter_map(|d| d.0).collect())
    }

    fn album_years(&self) -> Result<Vec<Option<i32>>> {
        let read_conn = self.read_conn();
        let conn = Self::lock(&read_conn);

        let mut stmt = conn.prepare_cached("SELECT year FROM albums ORDER BY id")?;
        let years = stmt
            .query_map([], |row| row.get::<_, Option<i32>>(0))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(years)
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;

    #[test]
    fn test_reopens_existing_database() {
        let catalog = seeded_catalog();
        let path = catalog.conn.path().unwrap().to_string();

        let reopened = SqliteCatalogStore::new(&path, 1).unwrap();
        assert_eq!(reopened.count(CatalogEntity::Song).unwrap(), 9);
    }

    #[test]
    fn test_rejects_foreign_database() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("other.db");
        let conn = Connection::open(&path).unwrap();
        conn.execute("CREATE TABLE whatever (x INTEGER)", []).unwrap();
        drop(conn);

        assert!(SqliteCatalogStore::new(&path, 1).is_err());
    }

    mod migrations {
        use super::*;
        use crate::sqlite_column;
        use crate::sqlite_persistence::{Column, SqlType, Table};

        const TAGS_V0: Table = Table {
            name: "tags",
            columns: &[
                sqlite_column!("id", &SqlType::Integer, is_primary_key = true),
                sqlite_column!("label", &SqlType::Text, non_null = true),
            ],
            indices: &[],
        };

        const TAGS_V1: Table = Table {
            name: "tags",
            columns: &[
                sqlite_column!("id", &SqlType::Integer, is_primary_key = true),
                sqlite_column!("label", &SqlType::Text, non_null = true),
                sqlite_column!("color", &SqlType::Text),
            ],
            indices: &[("idx_tags_color", "color")],
        };

        fn add_color(conn: &Connection) -> Result<()> {
            conn.execute_batch(
                "ALTER TABLE tags ADD COLUMN color TEXT;
                 CREATE INDEX idx_tags_color ON tags(color);
                 UPDATE tags SET color = 'red';",
            )?;
            Ok(())
        }

        const SCHEMAS: &[VersionedSchema] = &[
            VersionedSchema {
                version: 0,
                tables: &[TAGS_V0],
                migration: None,
            },
            VersionedSchema {
                version: 1,
                tables: &[TAGS_V1],
                migration: Some(add_color),
            },
        ];

        fn user_version(conn: &Connection) -> i64 {
            conn.query_row("PRAGMA user_version", [], |r| r.get(0))
                .unwrap()
        }

        #[test]
        fn test_empty_database_is_created_at_latest_version() {
            let mut conn = Connection::open_in_memory().unwrap();
            migrate_if_needed(&mut conn, SCHEMAS).unwrap();

            assert_eq!(user_version(&conn), (BASE_DB_VERSION + 1) as i64);
            SCHEMAS[1].validate(&conn).unwrap();
        }

        #[test]
        fn test_older_database_is_migrated() {
            let mut conn = Connection::open_in_memory().unwrap();
            SCHEMAS[0].create(&conn).unwrap();
            conn.execute("INSERT INTO tags (label) VALUES ('chill')", [])
                .unwrap();

            migrate_if_needed(&mut conn, SCHEMAS).unwrap();

            assert_eq!(user_version(&conn), (BASE_DB_VERSION + 1) as i64);
            let color: String = conn
                .query_row("SELECT color FROM tags WHERE label = 'chill'", [], |r| {
                    r.get(0)
                })
                .unwrap();
            assert_eq!(color, "red");
        }

        #[test]
        fn test_newer_database_is_rejected() {
            let mut conn = Connection::open_in_memory().unwrap();
            SCHEMAS[1].create(&conn).unwrap();

            let err = migrate_if_needed(&mut conn, &SCHEMAS[..1]).unwrap_err();
            assert!(err.to_string().contains("newer than"));
        }

        #[test]
        fn test_failed_migration_leaves_version_untouched() {
            fn broken(conn: &Connection) -> Result<()> {
                conn.execute_batch("ALTER TABLE missing ADD COLUMN x TEXT;")?;
                Ok(())
            }
            let schemas = [
                VersionedSchema {
                    version: 0,
                    tables: &[TAGS_V0],
                    migration: None,
                },
                VersionedSchema {
                    version: 1,
                    tables: &[TAGS_V1],
                    migration: Some(broken),
                },
            ];

            let mut conn = Connection::open_in_memory().unwrap();
            schemas[0].create(&conn).unwrap();

            assert!(migrate_if_needed(&mut conn, &schemas).is_err());
            assert_eq!(user_version(&conn), BASE_DB_VERSION as i64);
        }
    }

    #[test]
    fn test_counts() {
        let catalog = seeded_catalog();
        let store = &catalog.store;
        assert_eq!(store.count(CatalogEntity::Playlist).unwrap(), 4);
        assert_eq!(store.count(CatalogEntity::Song).unwrap(), 9);
        assert_eq!(store.count(CatalogEntity::Artist).unwrap(), 4);
        assert_eq!(store.count(CatalogEntity::Album).unwrap(), 5);
        assert_eq!(store.count(CatalogEntity::Genre).unwrap(), 3);
    }

    #[test]
    fn test_list_playlists_newest_first() {
        let catalog = seeded_catalog();
        let playlists = catalog.store.list_playlists().unwrap();

        let names: Vec<&str> = playlists.iter().map(|p| p.playlist.name.as_str()).collect();
        assert_eq!(
            names,
            vec!["Rock and Roll Hall", "Late Night Jazz", "Rock", "Scratchpad"]
        );
        assert_eq!(playlists[0].song_count, 4);
        assert_eq!(playlists[1].playlist.duration, Some(2700));
        assert_eq!(
            playlists[1].playlist.date,
            NaiveDate::from_ymd_opt(2020, 11, 20)
        );
    }

    #[test]
    fn test_get_playlist_orders_songs_by_track_number() {
        let catalog = seeded_catalog();
        let detail = catalog.store.get_playlist(3).unwrap().unwrap();

        let names: Vec<&str> = detail.songs.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(
            names,
            vec!["Rock Around", "Stone Cold", "Hall of Fame", "Rock Steady"]
        );
        assert_eq!(detail.songs[1].album, None);
        assert_eq!(detail.songs[2].duration, Some(3600));
        assert_eq!(detail.songs[3].duration, None);
        assert!(catalog.store.get_playlist(42).unwrap().is_none());
    }

    #[test]
    fn test_find_playlists_is_case_insensitive() {
        let catalog = seeded_catalog();
        let rows = catalog.store.find_playlists("rock", 10).unwrap();
        let ids: Vec<i64> = rows.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![1, 3]);
    }

    #[test]
    fn test_find_respects_take() {
        let catalog = seeded_catalog();
        assert_eq!(catalog.store.find_songs("rock", 2).unwrap().len(), 2);
    }

    #[test]
    fn test_find_songs_matches_artist_and_album() {
        let catalog = seeded_catalog();
        let rows = catalog.store.find_songs("miles", 10).unwrap();
        let ids: Vec<i64> = rows.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![3, 4, 5]);

        let rows = catalog.store.find_songs("kind of", 10).unwrap();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].album.as_ref().unwrap().name, "Kind of Blue");
        assert_eq!(rows[0].playlist.name, "Late Night Jazz");
    }

    #[test]
    fn test_like_wildcards_are_literal() {
        let catalog = seeded_catalog();
        assert!(catalog.store.find_playlists("%", 10).unwrap().is_empty());
        assert!(catalog.store.find_artists("_", 10).unwrap().is_empty());
    }

    #[test]
    fn test_find_folds_non_ascii_case() {
        let catalog = seeded_catalog();
        catalog
            .conn
            .execute_batch(
                "INSERT INTO artists (id, name) VALUES (5, 'BJÖRK');
                 INSERT INTO songs (id, name, track_number, artist_id, playlist_id)
                    VALUES (10, 'ÉMIGRÉ', 5, 5, 4);",
            )
            .unwrap();

        let artists = catalog.store.find_artists("björk", 10).unwrap();
        assert_eq!(artists.len(), 1);
        assert_eq!(artists[0].name, "BJÖRK");

        let songs = catalog.store.find_songs("émigré", 10).unwrap();
        let ids: Vec<i64> = songs.iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![10]);
    }

    #[test]
    fn test_find_artists_includes_song_counts() {
        let catalog = seeded_catalog();
        let rows = catalog.store.find_artists("rock", 10).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].name, "Rock Steady Crew");
        assert_eq!(rows[0].song_count, 4);
        assert_eq!(rows[1].song_count, 2);
    }

    #[test]
    fn test_find_named_genres() {
        let catalog = seeded_catalog();
        let rows = catalog.store.find_named(NamedEntity::Genre, "rock", 3).unwrap();
        assert_eq!(
            rows,
            vec![
                NamedCount {
                    name: "Rock".to_string(),
                    song_count: 4
                },
                NamedCount {
                    name: "Classic Rock".to_string(),
                    song_count: 1
                },
            ]
        );
    }

    #[test]
    fn test_top_named_artists() {
        let catalog = seeded_catalog();
        let rows = catalog.store.top_named(NamedEntity::Artist, 2).unwrap();
        assert_eq!(rows[0].name, "Rock Steady Crew");
        assert_eq!(rows[0].song_count, 4);
        assert_eq!(rows[1].name, "Miles Davis");
    }

    #[test]
    fn test_group_songs_by_genre_includes_null_bucket() {
        let catalog = seeded_catalog();
        let groups = catalog.store.group_songs(NamedEntity::Genre, None).unwrap();
        assert_eq!(
            groups,
            vec![
                GroupedCount {
                    key: Some(1),
                    count: 4
                },
                GroupedCount {
                    key: Some(2),
                    count: 3
                },
                GroupedCount { key: None, count: 1 },
                GroupedCount {
                    key: Some(3),
                    count: 1
                },
            ]
        );
    }

    #[test]
    fn test_names_skips_unknown_ids() {
        let catalog = seeded_catalog();
        let names = catalog.store.names(NamedEntity::Artist, &[1, 3, 99]).unwrap();
        assert_eq!(names.len(), 2);
        assert_eq!(names[&3], "Miles Davis");
    }

    #[test]
    fn test_dated_playlists() {
        let catalog = seeded_catalog();
        let dated = catalog.store.dated_playlists().unwrap();
        assert_eq!(dated.len(), 3);
        assert_eq!(dated[2].song_count, 4);
    }

    #[test]
    fn test_song_durations_are_normalized() {
        let catalog = seeded_catalog();
        let durations = catalog.store.song_durations().unwrap();
        assert_eq!(durations, vec![200, 240, 562, 337, 0, 150, 3600]);
    }

    #[test]
    fn test_album_years() {
        let catalog = seeded_catalog();
        let years = catalog.store.album_years().unwrap();
        assert_eq!(years, vec![Some(1959), Some(1984), Some(1987), None, Some(0)]);
    }

    #[test]
    fn test_parse_date_formats() {
        assert_eq!(
            parse_date(Some("2021-06-15".into())),
            NaiveDate::from_ymd_opt(2021, 6, 15)
        );
        assert_eq!(
            parse_date(Some("2021-06-15T10:00:00+02:00".into())),
            NaiveDate::from_ymd_opt(2021, 6, 15)
        );
        assert_eq!(
            parse_date(Some("2021-06-15 10:00:00".into())),
            NaiveDate::from_ymd_opt(2021, 6, 15)
        );
        assert_eq!(parse_date(Some("someday".into())), None);
        assert_eq!(parse_date(None), None);
    }
}
