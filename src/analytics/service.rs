use super::aggregations::*;
use crate::catalog_store::{query_blocking, CatalogEntity, CatalogStore, NamedEntity};
use anyhow::Result;
use serde::Serialize;
use std::future::Future;
use std::sync::Arc;
use tracing::debug;

pub const DEFAULT_ARTIST_LIMIT: usize = 20;

/// Which analytics view a caller asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalyticsKind {
    All,
    Artists,
    Genres,
    Timeline,
    Duration,
    Decades,
    Stats,
}

impl AnalyticsKind {
    /// Unrecognized names select every view.
    pub fn from_param(value: &str) -> Self {
        match value {
            "artists" => AnalyticsKind::Artists,
            "genres" => AnalyticsKind::Genres,
            "timeline" => AnalyticsKind::Timeline,
            "duration" => AnalyticsKind::Duration,
            "decades" => AnalyticsKind::Decades,
            "stats" => AnalyticsKind::Stats,
            _ => AnalyticsKind::All,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AnalyticsKind::All => "all",
            AnalyticsKind::Artists => "artists",
            AnalyticsKind::Genres => "genres",
            AnalyticsKind::Timeline => "timeline",
            AnalyticsKind::Duration => "duration",
            AnalyticsKind::Decades => "decades",
            AnalyticsKind::Stats => "stats",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalyticsReport {
    pub artists: Vec<FrequencyEntry>,
    pub genres: Vec<GenreShare>,
    pub timeline: Vec<TimelineBucket>,
    pub duration: DurationStats,
    pub decades: Vec<DecadeShare>,
    pub stats: CollectionStats,
}

/// The body of one analytics view.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum AnalyticsData {
    Artists(Vec<FrequencyEntry>),
    Genres(Vec<GenreShare>),
    Timeline(Vec<TimelineBucket>),
    Duration(DurationStats),
    Decades(Vec<DecadeShare>),
    Stats(CollectionStats),
    All(Box<AnalyticsReport>),
}

/// Collection-wide aggregates computed from a [`CatalogStore`].
///
/// Each aggregate reads its own totals, so a report assembled while the
/// catalog is being written to may be slightly inconsistent across views.
#[derive(Clone)]
pub struct CollectionAnalytics {
    store: Arc<dyn CatalogStore>,
}

impl CollectionAnalytics {
    pub fn new(store: Arc<dyn CatalogStore>) -> Self {
        Self { store }
    }

    fn count(&self, entity: CatalogEntity) -> impl Future<Output = Result<usize>> + Send {
        query_blocking(&self.store, move |store| store.count(entity))
    }

    /// The `limit` artists with the most songs.
    pub async fn artist_frequency(&self, limit: usize) -> Result<Vec<FrequencyEntry>> {
        let (groups, total_songs) = tokio::try_join!(
            query_blocking(&self.store, move |store| {
                store.group_songs(NamedEntity::Artist, Some(limit))
            }),
            self.count(CatalogEntity::Song),
        )?;

        let ids: Vec<i64> = groups.iter().filter_map(|g| g.key).collect();
        let names =
            query_blocking(&self.store, move |store| store.names(NamedEntity::Artist, &ids))
                .await?;
        Ok(frequency_table(&groups, &names, total_songs))
    }

    /// Every genre with its share of songs. Songs without a genre form an
    /// "Unknown" bucket.
    pub async fn genre_distribution(&self) -> Result<Vec<GenreShare>> {
        let (groups, total_songs) = tokio::try_join!(
            query_blocking(&self.store, |store| store.group_songs(NamedEntity::Genre, None)),
            self.count(CatalogEntity::Song),
        )?;

        let ids: Vec<i64> = groups.iter().filter_map(|g| g.key).collect();
        let names =
            query_blocking(&self.store, move |store| store.names(NamedEntity::Genre, &ids))
                .await?;
        Ok(genre_distribution(&groups, &names, total_songs))
    }

    pub async fn timeline(&self) -> Result<Vec<TimelineBucket>> {
        let playlists = query_blocking(&self.store, |store| store.dated_playlists()).await?;
        Ok(timeline(&playlists))
    }

    pub async fn duration_stats(&self) -> Result<DurationStats> {
        let durations = query_blocking(&self.store, |store| store.song_durations()).await?;
        Ok(duration_stats(&durations))
    }

    pub async fn decade_distribution(&self) -> Result<Vec<DecadeShare>> {
        let years = query_blocking(&self.store, |store| store.album_years()).await?;
        Ok(decade_distribution(&years))
    }

    pub async fn collection_stats(&self) -> Result<CollectionStats> {
        let (total_playlists, total_songs, total_artists, total_albums) = tokio::try_join!(
            self.count(CatalogEntity::Playlist),
            self.count(CatalogEntity::Song),
            self.count(CatalogEntity::Artist),
            self.count(CatalogEntity::Album),
        )?;
        Ok(CollectionStats {
            total_playlists,
            total_songs,
            total_artists,
            total_albums,
        })
    }

    /// Every view at once.
    pub async fn report(&self, artist_limit: usize) -> Result<AnalyticsReport> {
        let (artists, genres, timeline, duration, decades, stats) = tokio::try_join!(
            self.artist_frequency(artist_limit),
            self.genre_distribution(),
            self.timeline(),
            self.duration_stats(),
            self.decade_distribution(),
            self.collection_stats(),
        )?;
        Ok(AnalyticsReport {
            artists,
            genres,
            timeline,
            duration,
            decades,
            stats,
        })
    }

    pub async fn query(&self, kind: AnalyticsKind, artist_limit: usize) -> Result<AnalyticsData> {
        debug!("Computing {} analytics", kind.as_str());
        let data = match kind {
            AnalyticsKind::Artists => {
                AnalyticsData::Artists(self.artist_frequency(artist_limit).await?)
            }
            AnalyticsKind::Genres => AnalyticsData::Genres(self.genre_distribution().await?),
            AnalyticsKind::Timeline => AnalyticsData::Timeline(self.timeline().await?),
            AnalyticsKind::Duration => AnalyticsData::Duration(self.duration_stats().await?),
            AnalyticsKind::Decades => AnalyticsData::Decades(self.decade_distribution().await?),
            AnalyticsKind::Stats => AnalyticsData::Stats(self.collection_stats().await?),
            AnalyticsKind::All => {
                AnalyticsData::All(Box::new(self.report(artist_limit).await?))
            }
        };
        Ok(data)
    }
}
