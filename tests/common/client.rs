//! HTTP client for end-to-end tests
//!
//! This module wraps reqwest with one method per catalog-server endpoint.
//! When API routes or query parameters change, update only this file.

use super::constants::*;
use reqwest::Response;
use std::time::Duration;

pub struct TestClient {
    /// The underlying reqwest client (public for custom requests in tests)
    pub client: reqwest::Client,
    /// The base URL of the test server
    pub base_url: String,
}

impl TestClient {
    pub fn new(base_url: String) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .expect("Failed to build reqwest client");

        Self { client, base_url }
    }

    async fn get(&self, path: &str, query: &[(&str, &str)]) -> Response {
        self.client
            .get(format!("{}{}", self.base_url, path))
            .query(query)
            .send()
            .await
            .expect("Request failed")
    }

    // ========================================================================
    // Home
    // ========================================================================

    pub async fn get_home(&self) -> Response {
        self.get("/", &[]).await
    }

    // ========================================================================
    // Catalog Endpoints
    // ========================================================================

    pub async fn get_playlists(&self) -> Response {
        self.get("/v1/playlists", &[]).await
    }

    pub async fn get_playlist(&self, id: i64) -> Response {
        self.get(&format!("/v1/playlist/{}", id), &[]).await
    }

    // ========================================================================
    // Search Endpoints
    // ========================================================================

    pub async fn search(&self, query: &str) -> Response {
        self.get("/v1/search", &[("q", query)]).await
    }

    pub async fn search_with(&self, query: &str, kind: &str, limit: Option<usize>) -> Response {
        let limit = limit.map(|l| l.to_string());
        let mut params = vec![("q", query), ("type", kind)];
        if let Some(limit) = limit.as_deref() {
            params.push(("limit", limit));
        }
        self.get("/v1/search", &params).await
    }

    pub async fn suggestions(&self, query: &str) -> Response {
        self.get("/v1/search", &[("q", query), ("suggestions", "true")])
            .await
    }

    pub async fn popular_terms(&self, limit: Option<usize>) -> Response {
        match limit {
            Some(limit) => {
                let limit = limit.to_string();
                self.get("/v1/search/popular", &[("limit", limit.as_str())])
                    .await
            }
            None => self.get("/v1/search/popular", &[]).await,
        }
    }

    // ========================================================================
    // Analytics Endpoints
    // ========================================================================

    pub async fn analytics(&self, kind: &str) -> Response {
        self.get("/v1/analytics", &[("type", kind)]).await
    }

    pub async fn analytics_with_limit(&self, kind: &str, limit: usize) -> Response {
        let limit = limit.to_string();
        self.get("/v1/analytics", &[("type", kind), ("limit", limit.as_str())])
            .await
    }
}
