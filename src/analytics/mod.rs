mod aggregations;
mod service;

pub use aggregations::{
    decade_distribution, decade_label, duration_stats, frequency_table, genre_distribution,
    percentage, timeline, CollectionStats, DecadeShare, DurationStats, FrequencyEntry,
    GenreShare, TimelineBucket, GENRE_PALETTE, UNKNOWN_NAME,
};
pub use service::{
    AnalyticsData, AnalyticsKind, AnalyticsReport, CollectionAnalytics, DEFAULT_ARTIST_LIMIT,
};
