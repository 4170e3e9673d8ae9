mod analytics;
mod api_error;
mod catalog;
pub mod config;
mod http_layers;
pub mod metrics;
mod search;
pub mod server;
pub mod state;

pub use api_error::ApiError;
pub use config::ServerConfig;
pub use http_layers::*;
pub use server::{make_app, run_server};
