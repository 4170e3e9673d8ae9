//! Playlist Catalog Server Library
//!
//! This library exposes the internal modules for testing and potential reuse.

pub mod analytics;
pub mod catalog_store;
pub mod config;
pub mod search;
pub mod server;
pub mod sqlite_persistence;

// Re-export commonly used types for convenience
pub use analytics::CollectionAnalytics;
pub use catalog_store::{CatalogStore, SqliteCatalogStore};
pub use search::CatalogSearch;
pub use server::{run_server, RequestsLoggingLevel};
