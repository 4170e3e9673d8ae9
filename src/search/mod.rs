mod entity_search;
mod highlight;
mod query;
mod relevance;

pub use entity_search::{
    CatalogSearch, MatchedField, Scored, SearchLimits, SearchResults, SearchSuggestion,
    SuggestionKind, SONG_ALBUM_WEIGHT, SONG_ARTIST_WEIGHT, SONG_NAME_WEIGHT,
};
pub use highlight::highlight_matches;
pub use query::{sanitize, validate, QueryError, SanitizedQuery, MAX_QUERY_CHARS, MIN_QUERY_CHARS};
pub use relevance::{score, RelevanceScorer, TieredScorer};
