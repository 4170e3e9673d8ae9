//! CatalogStore trait definition.
//!
//! The search and analytics services only ever read through this trait, so
//! a different backend (or a fake in tests) can stand in for SQLite.

use super::models::*;
use anyhow::{Context, Result};
use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

/// Read-only access to the playlist catalog.
///
/// Every `term` argument is matched as a case-insensitive substring. Every
/// list is returned in a stable storage order, which callers rely on to
/// break ties.
pub trait CatalogStore: Send + Sync {
    // =========================================================================
    // Browsing
    // =========================================================================

    /// All playlists with their song counts, newest first, undated last.
    fn list_playlists(&self) -> Result<Vec<PlaylistSummary>>;

    /// A playlist and its songs ordered by track number.
    fn get_playlist(&self, id: i64) -> Result<Option<PlaylistDetail>>;

    // =========================================================================
    // Search candidates
    // =========================================================================

    /// Playlists whose name contains `term`.
    fn find_playlists(&self, term: &str, take: usize) -> Result<Vec<PlaylistRow>>;

    /// Songs whose own name, artist name or album name contains `term`.
    fn find_songs(&self, term: &str, take: usize) -> Result<Vec<SongRow>>;

    /// Artists whose name contains `term`, with their song counts.
    fn find_artists(&self, term: &str, take: usize) -> Result<Vec<ArtistRow>>;

    /// Names of `kind` containing `term`, with song counts.
    fn find_named(&self, kind: NamedEntity, term: &str, take: usize) -> Result<Vec<NamedCount>>;

    /// The `take` entries of `kind` owning the most songs.
    fn top_named(&self, kind: NamedEntity, take: usize) -> Result<Vec<NamedCount>>;

    // =========================================================================
    // Aggregation inputs
    // =========================================================================

    fn count(&self, entity: CatalogEntity) -> Result<usize>;

    /// Songs grouped by the foreign key to `by`, largest groups first.
    fn group_songs(&self, by: NamedEntity, take: Option<usize>) -> Result<Vec<GroupedCount>>;

    /// Display names for the given ids. Unknown ids are simply absent.
    fn names(&self, kind: NamedEntity, ids: &[i64]) -> Result<HashMap<i64, String>>;

    /// Every playlist that has a date, with its song count.
    fn dated_playlists(&self) -> Result<Vec<DatedPlaylist>>;

    /// Durations of all songs that have one, in seconds.
    fn song_durations(&self) -> Result<Vec<u32>>;

    /// Release year of every album, `None` when unknown.
    fn album_years(&self) -> Result<Vec<Option<i32>>>;
}

/// Run a store query on tokio's blocking pool.
///
/// The returned future owns its handle on the store, so several of them can
/// be awaited together with `tokio::try_join!`.
pub fn query_blocking<T, F>(
    store: &Arc<dyn CatalogStore>,
    query: F,
) -> impl Future<Output = Result<T>> + Send + 'static
where
    T: Send + 'static,
    F: FnOnce(&dyn CatalogStore) -> Result<T> + Send + 'static,
{
    let store = store.clone();
    async move {
        tokio::task::spawn_blocking(move || query(store.as_ref()))
            .await
            .context("Catalog query task failed")?
    }
}
