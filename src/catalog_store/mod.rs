mod duration;
mod models;
mod schema;
mod store;
mod trait_def;

pub use duration::{format_duration, parse_duration, StoredDuration};
pub use models::*;
pub use schema::CATALOG_VERSIONED_SCHEMAS;
pub use store::{SqliteCatalogStore, DEFAULT_READ_POOL_SIZE};
pub use trait_def::{query_blocking, CatalogStore};

#[cfg(test)]
pub(crate) use store::test_support;
