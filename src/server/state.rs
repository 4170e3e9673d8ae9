use axum::extract::FromRef;

use crate::analytics::CollectionAnalytics;
use crate::catalog_store::CatalogStore;
use crate::search::CatalogSearch;
use std::sync::Arc;
use std::time::Instant;

use super::ServerConfig;

pub type GuardedCatalogStore = Arc<dyn CatalogStore>;
pub type GuardedSearch = Arc<CatalogSearch>;
pub type GuardedAnalytics = Arc<CollectionAnalytics>;

#[derive(Clone)]
pub struct ServerState {
    pub config: ServerConfig,
    pub start_time: Instant,
    pub catalog_store: GuardedCatalogStore,
    pub search: GuardedSearch,
    pub analytics: GuardedAnalytics,
    pub hash: String,
}

impl ServerState {
    pub fn new(config: ServerConfig, catalog_store: GuardedCatalogStore) -> ServerState {
        ServerState {
            config,
            start_time: Instant::now(),
            search: Arc::new(CatalogSearch::with_tiered_scorer(catalog_store.clone())),
            analytics: Arc::new(CollectionAnalytics::new(catalog_store.clone())),
            catalog_store,
            hash: env!("GIT_HASH").to_owned(),
        }
    }
}

impl FromRef<ServerState> for GuardedCatalogStore {
    fn from_ref(input: &ServerState) -> Self {
        input.catalog_store.clone()
    }
}

impl FromRef<ServerState> for GuardedSearch {
    fn from_ref(input: &ServerState) -> Self {
        input.search.clone()
    }
}

impl FromRef<ServerState> for GuardedAnalytics {
    fn from_ref(input: &ServerState) -> Self {
        input.analytics.clone()
    }
}

impl FromRef<ServerState> for ServerConfig {
    fn from_ref(input: &ServerState) -> Self {
        input.config.clone()
    }
}
