// Test helpers are intentionally partially used
#![allow(dead_code)]

use axum_metrics_store::create_router;
use reqwest::Client;
use tokio::net::TcpListener;

// ============================================================================
// Test Setup
// ============================================================================

/// A router with its own stores and metrics registry, served on an ephemeral port.
pub struct TestServer {
    pub addr: std::net::SocketAddr,
    pub client: Client,
}

impl TestServer {
    // ---
    pub async fn new() -> Self {
        // --

        // Enable debug logging only when requested
        if std::env::var("TEST_DEBUG").is_ok() {
            std::env::set_var("RUST_LOG", "debug");
            std::env::set_var("NO_COLOR", "1");
            axum_metrics_store::init_tracing();
        }

        let app = create_router().expect("Should be able to create router");
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        // The listener is already bound, so requests queue until serve starts.
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        let client = Client::new();

        Self { addr, client }
    }

    pub fn url(&self, path: &str) -> String {
        // ---
        format!("http://{}{}", self.addr, path)
    }

    /// POST a JSON body and return the response.
    pub async fn post_json(&self, path: &str, body: &serde_json::Value) -> reqwest::Response {
        // ---
        self.client
            .post(self.url(path))
            .json(body)
            .send()
            .await
            .expect("Failed to send request")
    }

    /// GET `path` and return the response.
    pub async fn get(&self, path: &str) -> reqwest::Response {
        // ---
        self.client
            .get(self.url(path))
            .send()
            .await
            .expect("Failed to send request")
    }

    /// Scrape `/metrics` and return the exposition text.
    pub async fn scrape(&self) -> String {
        // ---
        let res = self.get("/metrics").await;
        assert!(res.status().is_success(), "Metrics endpoint should return success");
        res.text().await.expect("Failed to read metrics body")
    }
}

// ============================================================================
// Exposition helpers
// ============================================================================

/// Value of the sample whose name-and-labels part is exactly `series`.
///
/// Returns `None` when the series has not been created yet.
pub fn metric_value(exposition: &str, series: &str) -> Option<f64> {
    // ---
    exposition.lines().find_map(|line| {
        let rest = line.strip_prefix(series)?;
        let value = rest.strip_prefix(' ')?;
        value.trim().parse().ok()
    })
}

/// Like [`metric_value`] but treats a missing series as zero.
pub fn metric_or_zero(exposition: &str, series: &str) -> f64 {
    // ---
    metric_value(exposition, series).unwrap_or(0.0)
}
