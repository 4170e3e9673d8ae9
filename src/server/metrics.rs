use crate::analytics::CollectionStats;
use axum::{http::StatusCode, response::IntoResponse};
use lazy_static::lazy_static;
use prometheus::{
    CounterVec, Encoder, Gauge, GaugeVec, HistogramOpts, HistogramVec, Opts, Registry,
    TextEncoder,
};
use std::time::Duration;

/// Metric name prefix for all catalog server metrics
const PREFIX: &str = "playlist_catalog";

lazy_static! {
    pub static ref REGISTRY: Registry = Registry::new();

    // HTTP Request Metrics
    pub static ref HTTP_REQUESTS_TOTAL: CounterVec = CounterVec::new(
        Opts::new(format!("{PREFIX}_http_requests_total"), "Total number of HTTP requests"),
        &["method", "endpoint", "status"]
    ).expect("Failed to create http_requests_total metric");

    pub static ref HTTP_REQUEST_DURATION_SECONDS: HistogramVec = HistogramVec::new(
        HistogramOpts::new(
            format!("{PREFIX}_http_request_duration_seconds"),
            "HTTP request duration in seconds"
        )
        .buckets(vec![0.001, 0.01, 0.05, 0.1, 0.5, 1.0, 2.0, 5.0, 10.0]),
        &["method", "endpoint"]
    ).expect("Failed to create http_request_duration_seconds metric");

    // Search Metrics
    pub static ref SEARCH_REQUESTS_TOTAL: CounterVec = CounterVec::new(
        Opts::new(format!("{PREFIX}_search_requests_total"), "Search requests by type and outcome"),
        &["type", "outcome"]
    ).expect("Failed to create search_requests_total metric");

    pub static ref SEARCH_RESULTS: HistogramVec = HistogramVec::new(
        HistogramOpts::new(
            format!("{PREFIX}_search_results"),
            "Number of results returned per search"
        )
        .buckets(vec![0.0, 1.0, 5.0, 10.0, 25.0, 50.0, 100.0, 300.0]),
        &["type"]
    ).expect("Failed to create search_results metric");

    // Analytics Metrics
    pub static ref ANALYTICS_REQUESTS_TOTAL: CounterVec = CounterVec::new(
        Opts::new(format!("{PREFIX}_analytics_requests_total"), "Analytics requests by type"),
        &["type"]
    ).expect("Failed to create analytics_requests_total metric");

    // Catalog Metrics
    pub static ref CATALOG_ITEMS_TOTAL: GaugeVec = GaugeVec::new(
        Opts::new(format!("{PREFIX}_catalog_items_total"), "Total items in catalog"),
        &["type"]
    ).expect("Failed to create catalog_items_total metric");

    // Error Metrics
    pub static ref ERRORS_TOTAL: CounterVec = CounterVec::new(
        Opts::new(format!("{PREFIX}_errors_total"), "Total errors by type and endpoint"),
        &["error_type", "endpoint"]
    ).expect("Failed to create errors_total metric");

    pub static ref PROCESS_MEMORY_BYTES: Gauge = Gauge::new(
        format!("{PREFIX}_process_memory_bytes"),
        "Process memory usage in bytes"
    ).expect("Failed to create process_memory_bytes metric");
}

/// Register every metric with [`REGISTRY`]. Safe to call more than once.
pub fn init_metrics() {
    // Already-registered errors are expected when tests call this repeatedly.
    let _ = REGISTRY.register(Box::new(HTTP_REQUESTS_TOTAL.clone()));
    let _ = REGISTRY.register(Box::new(HTTP_REQUEST_DURATION_SECONDS.clone()));
    let _ = REGISTRY.register(Box::new(SEARCH_REQUESTS_TOTAL.clone()));
    let _ = REGISTRY.register(Box::new(SEARCH_RESULTS.clone()));
    let _ = REGISTRY.register(Box::new(ANALYTICS_REQUESTS_TOTAL.clone()));
    let _ = REGISTRY.register(Box::new(CATALOG_ITEMS_TOTAL.clone()));
    let _ = REGISTRY.register(Box::new(ERRORS_TOTAL.clone()));
    let _ = REGISTRY.register(Box::new(PROCESS_MEMORY_BYTES.clone()));

    tracing::info!("Metrics system initialized successfully");
}

pub fn init_catalog_metrics(stats: &CollectionStats) {
    CATALOG_ITEMS_TOTAL
        .with_label_values(&["playlist"])
        .set(stats.total_playlists as f64);
    CATALOG_ITEMS_TOTAL
        .with_label_values(&["song"])
        .set(stats.total_songs as f64);
    CATALOG_ITEMS_TOTAL
        .with_label_values(&["artist"])
        .set(stats.total_artists as f64);
    CATALOG_ITEMS_TOTAL
        .with_label_values(&["album"])
        .set(stats.total_albums as f64);

    tracing::info!(
        "Catalog metrics initialized: {} playlists, {} songs, {} artists, {} albums",
        stats.total_playlists,
        stats.total_songs,
        stats.total_artists,
        stats.total_albums
    );
}

/// Collapse a request path into a bounded label value.
pub fn categorize_endpoint(path: &str) -> &'static str {
    match path {
        "/" => "home",
        "/v1/search" => "search",
        "/v1/search/popular" => "search_popular",
        "/v1/analytics" => "analytics",
        "/v1/playlists" => "playlists",
        p if p.starts_with("/v1/playlist/") => "playlist",
        p if p.starts_with("/v1/") => "other_api",
        _ => "static",
    }
}

pub fn record_http_request(method: &str, endpoint: &str, status: u16, duration: Duration) {
    HTTP_REQUESTS_TOTAL
        .with_label_values(&[method, endpoint, &status.to_string()])
        .inc();

    HTTP_REQUEST_DURATION_SECONDS
        .with_label_values(&[method, endpoint])
        .observe(duration.as_secs_f64());
}

/// `outcome` is one of "ok", "invalid" or "error".
pub fn record_search(kind: &str, outcome: &str, results: usize) {
    SEARCH_REQUESTS_TOTAL
        .with_label_values(&[kind, outcome])
        .inc();
    if outcome == "ok" {
        SEARCH_RESULTS
            .with_label_values(&[kind])
            .observe(results as f64);
    }
}

pub fn record_analytics(kind: &str) {
    ANALYTICS_REQUESTS_TOTAL.with_label_values(&[kind]).inc();
}

pub fn record_error(error_type: &str, endpoint: &str) {
    ERRORS_TOTAL
        .with_label_values(&[error_type, endpoint])
        .inc();
}

pub fn update_memory_usage() {
    #[cfg(target_os = "linux")]
    {
        if let Ok(status) = std::fs::read_to_string("/proc/self/status") {
            let rss_kb = status
                .lines()
                .find(|line| line.starts_with("VmRSS:"))
                .and_then(|line| line.split_whitespace().nth(1))
                .and_then(|kb| kb.parse::<f64>().ok());
            if let Some(kb) = rss_kb {
                PROCESS_MEMORY_BYTES.set(kb * 1024.0);
            }
        }
    }
}

/// Handler for the /metrics endpoint
pub async fn metrics_handler() -> impl IntoResponse {
    update_memory_usage();

    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();

    let mut buffer = vec![];
    match encoder.encode(&metric_families, &mut buffer) {
        Ok(()) => {
            let response = String::from_utf8(buffer).unwrap_or_default();
            (StatusCode::OK, response)
        }
        Err(e) => {
            tracing::error!("Failed to encode metrics: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Failed to encode metrics: {}", e),
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn family_exists(name: &str) -> bool {
        let full_name = format!("{PREFIX}_{name}");
        REGISTRY
            .gather()
            .iter()
            .any(|family| family.get_name() == full_name)
    }

    #[test]
    fn test_metrics_initialization() {
        init_metrics();
        init_metrics();

        let metric_families = REGISTRY.gather();
        assert!(!metric_families.is_empty(), "Metrics should be registered");
    }

    #[test]
    fn test_record_http_request() {
        init_metrics();

        record_http_request("GET", "playlist", 200, Duration::from_millis(50));

        assert!(family_exists("http_requests_total"));
        assert!(family_exists("http_request_duration_seconds"));
    }

    #[test]
    fn test_record_search() {
        init_metrics();

        record_search("all", "ok", 12);
        record_search("songs", "invalid", 0);

        assert!(family_exists("search_requests_total"));
        assert!(family_exists("search_results"));
    }

    #[test]
    fn test_catalog_metrics() {
        init_metrics();

        init_catalog_metrics(&CollectionStats {
            total_playlists: 4,
            total_songs: 9,
            total_artists: 4,
            total_albums: 5,
        });

        assert!(family_exists("catalog_items_total"));
        assert_eq!(
            CATALOG_ITEMS_TOTAL.with_label_values(&["song"]).get(),
            9.0
        );
    }

    #[test]
    fn endpoints_are_categorized() {
        assert_eq!(categorize_endpoint("/"), "home");
        assert_eq!(categorize_endpoint("/v1/search"), "search");
        assert_eq!(categorize_endpoint("/v1/search/popular"), "search_popular");
        assert_eq!(categorize_endpoint("/v1/playlist/42"), "playlist");
        assert_eq!(categorize_endpoint("/v1/nope"), "other_api");
        assert_eq!(categorize_endpoint("/assets/app.js"), "static");
    }
}
