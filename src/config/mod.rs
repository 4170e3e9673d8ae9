mod file_config;

pub use file_config::{AnalyticsConfig, FileConfig, SearchConfig};

use crate::analytics::DEFAULT_ARTIST_LIMIT;
use crate::catalog_store::DEFAULT_READ_POOL_SIZE;
use crate::server::RequestsLoggingLevel;
use anyhow::{bail, Result};
use clap::ValueEnum;
use std::path::PathBuf;

/// CLI arguments that can be used for config resolution.
/// This struct mirrors the CLI arguments that can be overridden by TOML config.
#[derive(Debug, Clone)]
pub struct CliConfig {
    pub db_path: Option<PathBuf>,
    pub port: u16,
    pub metrics_port: u16,
    pub logging_level: RequestsLoggingLevel,
    pub content_cache_age_sec: usize,
    pub frontend_dir_path: Option<String>,
    pub read_pool_size: usize,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    // Core settings
    pub db_path: PathBuf,
    pub port: u16,
    pub metrics_port: u16,
    pub logging_level: RequestsLoggingLevel,
    pub content_cache_age_sec: usize,
    pub frontend_dir_path: Option<String>,
    pub read_pool_size: usize,

    // Feature configs (with defaults)
    pub search: SearchSettings,
    pub analytics: AnalyticsSettings,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchSettings {
    /// Results per entity kind when the request has no `limit`.
    pub default_limit: usize,
    /// Upper bound applied to any requested `limit`.
    pub max_limit: usize,
    pub suggestions_limit: usize,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            default_limit: 10,
            max_limit: 100,
            suggestions_limit: 10,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalyticsSettings {
    pub default_artist_limit: usize,
}

impl Default for AnalyticsSettings {
    fn default() -> Self {
        Self {
            default_artist_limit: DEFAULT_ARTIST_LIMIT,
        }
    }
}

impl AppConfig {
    /// Resolve configuration from CLI arguments and optional TOML file config.
    /// TOML values override CLI values where present.
    pub fn resolve(cli: &CliConfig, file_config: Option<FileConfig>) -> Result<Self> {
        let file = file_config.unwrap_or_default();

        let db_path = file
            .db_path
            .map(PathBuf::from)
            .or_else(|| cli.db_path.clone())
            .ok_or_else(|| {
                anyhow::anyhow!("db_path must be specified on the command line or in config file")
            })?;

        // The database file itself is created on first open, its directory is not.
        if let Some(parent) = db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            if !parent.is_dir() {
                bail!("Database directory does not exist: {:?}", parent);
            }
        }
        if db_path.is_dir() {
            bail!("db_path is a directory: {:?}", db_path);
        }

        let port = file.port.unwrap_or(cli.port);
        let metrics_port = file.metrics_port.unwrap_or(cli.metrics_port);
        if port == metrics_port {
            bail!("port and metrics_port must differ (both are {})", port);
        }

        let logging_level = file
            .logging_level
            .and_then(|s| parse_logging_level(&s))
            .unwrap_or_else(|| cli.logging_level.clone());

        let content_cache_age_sec = file
            .content_cache_age_sec
            .unwrap_or(cli.content_cache_age_sec);
        let frontend_dir_path = file
            .frontend_dir_path
            .or_else(|| cli.frontend_dir_path.clone());

        let read_pool_size = file.read_pool_size.unwrap_or(cli.read_pool_size);
        if read_pool_size == 0 {
            bail!("read_pool_size must be at least 1");
        }

        let search_defaults = SearchSettings::default();
        let search_file = file.search.unwrap_or_default();
        let search = SearchSettings {
            default_limit: search_file
                .default_limit
                .unwrap_or(search_defaults.default_limit),
            max_limit: search_file.max_limit.unwrap_or(search_defaults.max_limit),
            suggestions_limit: search_file
                .suggestions_limit
                .unwrap_or(search_defaults.suggestions_limit),
        };
        if search.default_limit > search.max_limit {
            bail!(
                "search.default_limit ({}) exceeds search.max_limit ({})",
                search.default_limit,
                search.max_limit
            );
        }

        let analytics_file = file.analytics.unwrap_or_default();
        let analytics = AnalyticsSettings {
            default_artist_limit: analytics_file
                .default_artist_limit
                .unwrap_or(DEFAULT_ARTIST_LIMIT),
        };

        Ok(Self {
            db_path,
            port,
            metrics_port,
            logging_level,
            content_cache_age_sec,
            frontend_dir_path,
            read_pool_size,
            search,
            analytics,
        })
    }
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            db_path: None,
            port: 3001,
            metrics_port: 9091,
            logging_level: RequestsLoggingLevel::Path,
            content_cache_age_sec: 3600,
            frontend_dir_path: None,
            read_pool_size: DEFAULT_READ_POOL_SIZE,
        }
    }
}

/// Parses a logging level string into RequestsLoggingLevel.
/// Uses clap's ValueEnum trait for parsing.
fn parse_logging_level(s: &str) -> Option<RequestsLoggingLevel> {
    RequestsLoggingLevel::from_str(s, true).ok()
}
