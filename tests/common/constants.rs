//! Shared constants for end-to-end tests
//!
//! This module contains all constants used across the test suite.
//! When the fixture catalog changes, update only this file.

// ============================================================================
// Test Catalog Names
// ============================================================================

pub const ARTIST_1_NAME: &str = "The Test Band";
pub const ARTIST_2_NAME: &str = "Jazz Ensemble";

pub const GENRE_ROCK: &str = "Rock";
pub const GENRE_JAZZ: &str = "Jazz";

pub const ALBUM_1_NAME: &str = "First Album";
pub const ALBUM_1_YEAR: i32 = 1994;
pub const ALBUM_2_NAME: &str = "Jazz Collection";
pub const ALBUM_2_YEAR: i32 = 1961;

/// Playlist ID for "Rock Classics" (songs 1-3)
pub const PLAYLIST_1_ID: i64 = 1;
pub const PLAYLIST_1_NAME: &str = "Rock Classics";
pub const PLAYLIST_1_DATE: &str = "2022-01-10";

/// Playlist ID for "Jazz Nights" (songs 4-5)
pub const PLAYLIST_2_ID: i64 = 2;
pub const PLAYLIST_2_NAME: &str = "Jazz Nights";
pub const PLAYLIST_2_DATE: &str = "2023-05-02";

pub const SONG_1_NAME: &str = "Opening Track";
pub const SONG_2_NAME: &str = "Second Song";
pub const SONG_3_NAME: &str = "Rock Anthem";
pub const SONG_4_NAME: &str = "Smooth Jazz";
pub const SONG_5_NAME: &str = "Late Night Blues";

// ============================================================================
// Expected Aggregates
// ============================================================================

pub const TOTAL_PLAYLISTS: usize = 2;
pub const TOTAL_SONGS: usize = 5;
pub const TOTAL_ARTISTS: usize = 2;
pub const TOTAL_ALBUMS: usize = 2;

/// 180 + 210 + 210 + 240 + 300
pub const TOTAL_DURATION_SECS: u64 = 1140;

// ============================================================================
// Timing
// ============================================================================

/// Maximum time to wait for the test server to answer
pub const SERVER_READY_TIMEOUT_MS: u64 = 5000;

/// Per-request timeout for the test client
pub const REQUEST_TIMEOUT_SECS: u64 = 10;

/// Delay between readiness checks
pub const SERVER_READY_POLL_INTERVAL_MS: u64 = 50;
