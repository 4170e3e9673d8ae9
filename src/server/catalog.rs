//! Playlist listing and detail routes

use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use serde::Serialize;

use crate::catalog_store::{format_duration, query_blocking, PlaylistDetail, PlaylistSummary};

use super::api_error::ApiError;
use super::state::{GuardedCatalogStore, ServerState};

/// A playlist with its songs and their combined running time.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PlaylistPage {
    #[serde(flatten)]
    detail: PlaylistDetail,
    total_duration: u64,
    formatted_duration: String,
}

impl From<PlaylistDetail> for PlaylistPage {
    fn from(detail: PlaylistDetail) -> Self {
        let total_duration: u64 = detail
            .songs
            .iter()
            .filter_map(|song| song.duration)
            .map(u64::from)
            .sum();
        PlaylistPage {
            formatted_duration: format_duration(total_duration),
            total_duration,
            detail,
        }
    }
}

/// GET /playlists
async fn list_playlists(
    State(store): State<GuardedCatalogStore>,
) -> Result<Json<Vec<PlaylistSummary>>, ApiError> {
    let playlists = query_blocking(&store, |store| store.list_playlists())
        .await
        .map_err(|e| ApiError::internal("playlists", e))?;
    Ok(Json(playlists))
}

/// GET /playlist/{id}
async fn get_playlist(
    State(store): State<GuardedCatalogStore>,
    Path(id): Path<i64>,
) -> Result<Json<PlaylistPage>, ApiError> {
    let detail = query_blocking(&store, move |store| store.get_playlist(id))
        .await
        .map_err(|e| ApiError::internal("playlist", e))?
        .ok_or_else(|| ApiError::NotFound(format!("Playlist {} not found", id)))?;
    Ok(Json(detail.into()))
}

pub fn make_catalog_routes(state: ServerState) -> Router {
    Router::new()
        .route("/playlists", get(list_playlists))
        .route("/playlist/{id}", get(get_playlist))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog_store::test_support::seeded_catalog;
    use crate::catalog_store::CatalogStore;

    #[test]
    fn playlist_page_sums_known_durations() {
        let catalog = seeded_catalog();
        let detail = catalog.store.get_playlist(3).unwrap().unwrap();

        let page = PlaylistPage::from(detail);
        assert_eq!(page.total_duration, 150 + 3600);
        assert_eq!(page.formatted_duration, "1:02:30");
        assert_eq!(page.detail.songs.len(), 4);
    }
}
