//! Catalog row projections returned by the store.
//!
//! Durations are whole seconds (see [`super::duration`]), dates are calendar
//! days.

use chrono::NaiveDate;
use serde::Serialize;

// =============================================================================
// Enumerations
// =============================================================================

/// Entity tables that can be counted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogEntity {
    Playlist,
    Song,
    Artist,
    Album,
    Genre,
}

impl CatalogEntity {
    pub fn table(&self) -> &'static str {
        match self {
            CatalogEntity::Playlist => "playlists",
            CatalogEntity::Song => "songs",
            CatalogEntity::Artist => "artists",
            CatalogEntity::Album => "albums",
            CatalogEntity::Genre => "genres",
        }
    }
}

/// Entities that own songs and carry a display name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NamedEntity {
    Playlist,
    Artist,
    Genre,
}

impl NamedEntity {
    pub fn table(&self) -> &'static str {
        match self {
            NamedEntity::Playlist => "playlists",
            NamedEntity::Artist => "artists",
            NamedEntity::Genre => "genres",
        }
    }

    /// Foreign key column on `songs` pointing at this entity.
    pub fn song_column(&self) -> &'static str {
        match self {
            NamedEntity::Playlist => "playlist_id",
            NamedEntity::Artist => "artist_id",
            NamedEntity::Genre => "genre_id",
        }
    }
}

// =============================================================================
// Row projections
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlaylistRow {
    pub id: i64,
    pub name: String,
    pub date: Option<NaiveDate>,
    pub duration: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistSummary {
    #[serde(flatten)]
    pub playlist: PlaylistRow,
    pub song_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NameRef {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlaylistRef {
    pub id: i64,
    pub name: String,
}

/// A song with the related names needed for scoring and display.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SongRow {
    pub id: i64,
    pub name: String,
    pub track_number: i64,
    pub duration: Option<u32>,
    pub artist: NameRef,
    pub album: Option<NameRef>,
    pub genre: Option<NameRef>,
    pub playlist: PlaylistRef,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlaylistDetail {
    #[serde(flatten)]
    pub playlist: PlaylistRow,
    pub songs: Vec<SongRow>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArtistRow {
    pub id: i64,
    pub name: String,
    pub song_count: usize,
}

/// A display name with the number of songs attached to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamedCount {
    pub name: String,
    pub song_count: usize,
}

/// One bucket of a `GROUP BY` over songs. `key` is `None` for songs whose
/// foreign key is null.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupedCount {
    pub key: Option<i64>,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatedPlaylist {
    pub date: NaiveDate,
    pub song_count: usize,
}
