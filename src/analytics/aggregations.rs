//! Single-pass reductions behind the analytics views.
//!
//! Nothing here touches storage; callers hand in rows already fetched from
//! the catalog.

use crate::catalog_store::{DatedPlaylist, GroupedCount};
use chrono::Datelike;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

/// Display name for rows whose related entity is missing.
pub const UNKNOWN_NAME: &str = "Unknown";

/// Chart colours, assigned to genres by rank.
pub const GENRE_PALETTE: [&str; 10] = [
    "hsl(220, 91%, 50%)",
    "hsl(142, 71%, 45%)",
    "hsl(38, 92%, 58%)",
    "hsl(0, 84%, 70%)",
    "hsl(199, 69%, 65%)",
    "hsl(280, 65%, 60%)",
    "hsl(25, 95%, 63%)",
    "hsl(204, 96%, 78%)",
    "hsl(300, 56%, 75%)",
    "hsl(120, 93%, 79%)",
];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrequencyEntry {
    pub name: String,
    pub count: usize,
    pub percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenreShare {
    pub name: String,
    pub count: usize,
    pub percentage: f64,
    pub fill: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimelineBucket {
    pub period: String,
    pub playlists: usize,
    pub songs: usize,
}

/// Song duration statistics in seconds. All zero when no song has a
/// positive duration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DurationStats {
    pub average_duration: u64,
    pub total_duration: u64,
    pub shortest_song: u32,
    pub longest_song: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DecadeShare {
    pub decade: String,
    pub count: usize,
    pub percentage: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionStats {
    pub total_playlists: usize,
    pub total_songs: usize,
    pub total_artists: usize,
    pub total_albums: usize,
}

/// `count / total` as a percentage rounded to two decimals; 0 when `total`
/// is 0.
pub fn percentage(count: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    (count as f64 / total as f64 * 100.0 * 100.0).round() / 100.0
}

fn resolve_name(key: Option<i64>, names: &HashMap<i64, String>) -> String {
    key.and_then(|id| names.get(&id))
        .cloned()
        .unwrap_or_else(|| UNKNOWN_NAME.to_string())
}

/// Turn grouped song counts into named entries, keeping the group order.
pub fn frequency_table(
    groups: &[GroupedCount],
    names: &HashMap<i64, String>,
    total_songs: usize,
) -> Vec<FrequencyEntry> {
    groups
        .iter()
        .map(|group| FrequencyEntry {
            name: resolve_name(group.key, names),
            count: group.count,
            percentage: percentage(group.count, total_songs),
        })
        .collect()
}

/// Like [`frequency_table`], with a palette colour per rank.
pub fn genre_distribution(
    groups: &[GroupedCount],
    names: &HashMap<i64, String>,
    total_songs: usize,
) -> Vec<GenreShare> {
    groups
        .iter()
        .enumerate()
        .map(|(rank, group)| GenreShare {
            name: resolve_name(group.key, names),
            count: group.count,
            percentage: percentage(group.count, total_songs),
            fill: GENRE_PALETTE[rank % GENRE_PALETTE.len()],
        })
        .collect()
}

/// Playlists and songs per calendar year, oldest year first.
pub fn timeline(playlists: &[DatedPlaylist]) -> Vec<TimelineBucket> {
    let mut years: BTreeMap<i32, (usize, usize)> = BTreeMap::new();
    for playlist in playlists {
        let bucket = years.entry(playlist.date.year()).or_default();
        bucket.0 += 1;
        bucket.1 += playlist.song_count;
    }

    years
        .into_iter()
        .map(|(year, (playlists, songs))| TimelineBucket {
            period: year.to_string(),
            playlists,
            songs,
        })
        .collect()
}

/// Statistics over the positive durations; zero durations are ignored.
pub fn duration_stats(durations: &[u32]) -> DurationStats {
    let positive: Vec<u32> = durations.iter().copied().filter(|d| *d > 0).collect();
    let (Some(&shortest_song), Some(&longest_song)) =
        (positive.iter().min(), positive.iter().max())
    else {
        return DurationStats::default();
    };

    let total_duration: u64 = positive.iter().map(|d| u64::from(*d)).sum();
    let average_duration = (total_duration as f64 / positive.len() as f64).round() as u64;

    DurationStats {
        average_duration,
        total_duration,
        shortest_song,
        longest_song,
    }
}

/// `1987` -> `"1980s"`.
pub fn decade_label(year: i32) -> String {
    format!("{}s", year.div_euclid(10) * 10)
}

/// Albums per release decade, ordered by label. Albums without a year (or
/// with year 0) are left out of both the buckets and the total.
pub fn decade_distribution(years: &[Option<i32>]) -> Vec<DecadeShare> {
    let mut decades: BTreeMap<String, usize> = BTreeMap::new();
    for year in years.iter().flatten().filter(|y| **y != 0) {
        *decades.entry(decade_label(*year)).or_default() += 1;
    }

    let total: usize = decades.values().sum();
    decades
        .into_iter()
        .map(|(decade, count)| DecadeShare {
            decade,
            count,
            percentage: percentage(count, total),
        })
        .collect()
}
