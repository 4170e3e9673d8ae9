use super::RequestsLoggingLevel;
use crate::config::{AnalyticsSettings, SearchSettings};

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub requests_logging_level: RequestsLoggingLevel,
    pub port: u16,
    pub metrics_port: u16,
    pub content_cache_age_sec: usize,
    pub frontend_dir_path: Option<String>,
    pub search: SearchSettings,
    pub analytics: AnalyticsSettings,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            requests_logging_level: RequestsLoggingLevel::Path,
            port: 3001,
            metrics_port: 9091,
            content_cache_age_sec: 3600,
            frontend_dir_path: None,
            search: SearchSettings::default(),
            analytics: AnalyticsSettings::default(),
        }
    }
}
