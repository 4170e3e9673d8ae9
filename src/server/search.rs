//! Search API routes

use axum::{
    extract::{Query, State},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::catalog_store::{ArtistRow, PlaylistRow, SongRow};
use crate::search::{validate, Scored, SearchLimits, SearchResults, SearchSuggestion};

use super::api_error::ApiError;
use super::metrics::record_search;
use super::state::{GuardedSearch, ServerState};
use super::ServerConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchType {
    All,
    Playlists,
    Songs,
    Artists,
}

impl SearchType {
    fn parse(value: Option<&str>) -> Result<Self, ApiError> {
        match value.unwrap_or("all") {
            "all" => Ok(SearchType::All),
            "playlists" => Ok(SearchType::Playlists),
            "songs" => Ok(SearchType::Songs),
            "artists" => Ok(SearchType::Artists),
            other => Err(ApiError::BadRequest(format!(
                "Unknown search type '{}'",
                other
            ))),
        }
    }

    fn as_str(&self) -> &'static str {
        match self {
            SearchType::All => "all",
            SearchType::Playlists => "playlists",
            SearchType::Songs => "songs",
            SearchType::Artists => "artists",
        }
    }
}

#[derive(Deserialize)]
struct SearchParams {
    q: Option<String>,
    #[serde(rename = "type")]
    kind: Option<String>,
    limit: Option<String>,
    suggestions: Option<String>,
}

#[derive(Deserialize)]
struct PopularParams {
    limit: Option<String>,
}

/// Unparseable limits fall back to the default; everything is capped.
pub(super) fn resolve_limit(raw: Option<&str>, default: usize, max: usize) -> usize {
    raw.and_then(|value| value.trim().parse::<usize>().ok())
        .unwrap_or(default)
        .min(max)
}

fn is_truthy(raw: Option<&str>) -> bool {
    matches!(raw, Some("true") | Some("1"))
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SearchMetadata {
    query: String,
    #[serde(rename = "type")]
    kind: &'static str,
    limit: usize,
    total_results: usize,
}

#[derive(Serialize)]
struct SearchBody {
    #[serde(skip_serializing_if = "Option::is_none")]
    playlists: Option<Vec<Scored<PlaylistRow>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    songs: Option<Vec<Scored<SongRow>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    artists: Option<Vec<Scored<ArtistRow>>>,
    metadata: SearchMetadata,
}

#[derive(Serialize)]
struct SuggestionsBody {
    suggestions: Vec<SearchSuggestion>,
}

enum SearchResponse {
    Results(Json<SearchBody>),
    Suggestions(Json<SuggestionsBody>),
}

impl IntoResponse for SearchResponse {
    fn into_response(self) -> axum::response::Response {
        match self {
            SearchResponse::Results(t) => t.into_response(),
            SearchResponse::Suggestions(t) => t.into_response(),
        }
    }
}

/// GET /search?q=&type=&limit=&suggestions=
async fn search(
    State(search): State<GuardedSearch>,
    State(config): State<ServerConfig>,
    Query(params): Query<SearchParams>,
) -> Result<SearchResponse, ApiError> {
    let kind = SearchType::parse(params.kind.as_deref())?;
    let query = match validate(params.q.as_deref().unwrap_or_default()) {
        Ok(query) => query,
        Err(err) => {
            record_search(kind.as_str(), "invalid", 0);
            return Err(err.into());
        }
    };
    let settings = &config.search;

    if is_truthy(params.suggestions.as_deref()) {
        let limit = resolve_limit(
            params.limit.as_deref(),
            settings.suggestions_limit,
            settings.max_limit,
        );
        let suggestions = search
            .suggestions(query.as_str(), limit)
            .await
            .map_err(|e| {
                record_search("suggestions", "error", 0);
                ApiError::internal("search", e)
            })?;
        record_search("suggestions", "ok", suggestions.len());
        return Ok(SearchResponse::Suggestions(Json(SuggestionsBody {
            suggestions,
        })));
    }

    let limit = resolve_limit(
        params.limit.as_deref(),
        settings.default_limit,
        settings.max_limit,
    );
    let outcome = match kind {
        SearchType::All => {
            search
                .search_all(query.as_str(), SearchLimits::uniform(limit))
                .await
        }
        SearchType::Playlists => search
            .search_playlists(query.as_str(), limit)
            .await
            .map(|playlists| SearchResults {
                playlists,
                ..Default::default()
            }),
        SearchType::Songs => search
            .search_songs(query.as_str(), limit)
            .await
            .map(|songs| SearchResults {
                songs,
                ..Default::default()
            }),
        SearchType::Artists => search
            .search_artists(query.as_str(), limit)
            .await
            .map(|artists| SearchResults {
                artists,
                ..Default::default()
            }),
    };
    let results = outcome.map_err(|e| {
        record_search(kind.as_str(), "error", 0);
        ApiError::internal("search", e)
    })?;

    let total_results = results.total();
    record_search(kind.as_str(), "ok", total_results);

    let includes = |section: SearchType| kind == SearchType::All || kind == section;
    Ok(SearchResponse::Results(Json(SearchBody {
        playlists: includes(SearchType::Playlists).then_some(results.playlists),
        songs: includes(SearchType::Songs).then_some(results.songs),
        artists: includes(SearchType::Artists).then_some(results.artists),
        metadata: SearchMetadata {
            query: query.into_string(),
            kind: kind.as_str(),
            limit,
            total_results,
        },
    })))
}

/// GET /search/popular?limit=
async fn popular(
    State(search): State<GuardedSearch>,
    State(config): State<ServerConfig>,
    Query(params): Query<PopularParams>,
) -> Result<Json<Vec<SearchSuggestion>>, ApiError> {
    let settings = &config.search;
    let limit = resolve_limit(
        params.limit.as_deref(),
        settings.suggestions_limit,
        settings.max_limit,
    );
    let terms = search
        .popular_terms(limit)
        .await
        .map_err(|e| ApiError::internal("search_popular", e))?;
    Ok(Json(terms))
}

pub fn make_search_routes(state: ServerState) -> Router {
    Router::new()
        .route("/search", get(search))
        .route("/search/popular", get(popular))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn search_type_defaults_to_all() {
        assert_eq!(SearchType::parse(None).unwrap(), SearchType::All);
        assert_eq!(
            SearchType::parse(Some("songs")).unwrap(),
            SearchType::Songs
        );
        assert!(matches!(
            SearchType::parse(Some("albums")),
            Err(ApiError::BadRequest(_))
        ));
    }

    #[test]
    fn limits_default_and_cap() {
        assert_eq!(resolve_limit(None, 10, 100), 10);
        assert_eq!(resolve_limit(Some("25"), 10, 100), 25);
        assert_eq!(resolve_limit(Some("5000"), 10, 100), 100);
        assert_eq!(resolve_limit(Some("ten"), 10, 100), 10);
        assert_eq!(resolve_limit(Some("-3"), 10, 100), 10);
        assert_eq!(resolve_limit(Some("0"), 10, 100), 0);
    }

    #[test]
    fn suggestions_flag() {
        assert!(is_truthy(Some("true")));
        assert!(is_truthy(Some("1")));
        assert!(!is_truthy(Some("false")));
        assert!(!is_truthy(None));
    }
}
