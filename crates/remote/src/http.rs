//! HTTP transport for the table service.
//!
//! Uses `ureq` (sync) wrapped in `tokio::task::spawn_blocking` to avoid
//! blocking the async runtime. Reads go to `{endpoint}/tables/{table}`,
//! lookups to `{endpoint}/tables/{table}/{id}`.

use std::time::Duration;

use async_trait::async_trait;
use verity_model::Record;

use crate::error::RemoteError;
use crate::query::TableQuery;
use crate::transport::{decode_page, decode_record, Page, QueryTransport};

pub const DEFAULT_APP_KEY_HEADER: &str = "X-ZUMO-APPLICATION";

/// Transport that talks to a live service over HTTP.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    endpoint: String,
    table: String,
    app_key: Option<(String, String)>,
    timeout: Duration,
}

impl HttpTransport {
    pub fn new(endpoint: &str, table: &str) -> Self {
        HttpTransport {
            endpoint: endpoint.trim_end_matches('/').to_string(),
            table: table.to_string(),
            app_key: None,
            timeout: Duration::from_secs(30),
        }
    }

    /// Send `key` in `header` on every request.
    pub fn with_app_key(mut self, header: &str, key: &str) -> Self {
        self.app_key = Some((header.to_string(), key.to_string()));
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn table_url(&self) -> String {
        format!("{}/tables/{}", self.endpoint, self.table)
    }

    async fn get(
        &self,
        url: String,
        pairs: Vec<(&'static str, String)>,
    ) -> Result<serde_json::Value, RemoteError> {
        let app_key = self.app_key.clone();
        let timeout = self.timeout;

        tokio::task::spawn_blocking(move || {
            let config = ureq::Agent::config_builder()
                .timeout_global(Some(timeout))
                .http_status_as_error(false)
                .build();
            let agent = ureq::Agent::new_with_config(config);

            let mut request = agent.get(&url);
            for (key, value) in &pairs {
                request = request.query(key, value);
            }
            if let Some((header, key)) = &app_key {
                request = request.header(header.as_str(), key.as_str());
            }

            let response = request.call().map_err(|e| RemoteError::Transport {
                message: e.to_string(),
            })?;

            let status = response.status().as_u16();
            if status >= 400 {
                let message = response
                    .into_body()
                    .read_to_string()
                    .unwrap_or_else(|e| format!("<unreadable body: {}>", e));
                return Err(RemoteError::Rejected { status, message });
            }

            response
                .into_body()
                .read_json::<serde_json::Value>()
                .map_err(|e| RemoteError::MalformedResponse {
                    message: format!("failed to parse response as JSON: {}", e),
                })
        })
        .await
        .map_err(|e| RemoteError::Transport {
            message: format!("task join error: {}", e),
        })?
    }
}

#[async_trait]
impl QueryTransport for HttpTransport {
    async fn query(&self, query: &TableQuery) -> Result<Page, RemoteError> {
        let body = self.get(self.table_url(), query.pairs()).await?;
        decode_page(body)
    }

    async fn lookup(&self, id: i64) -> Result<Record, RemoteError> {
        let url = format!("{}/{}", self.table_url(), id);
        let body = self.get(url, Vec::new()).await?;
        decode_record(body)
    }

    fn transport_id(&self) -> &str {
        "http"
    }
}

// ──────────────────────────────────────────────
// Tests
// ──────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_url_trims_trailing_slash() {
        let t = HttpTransport::new("https://example.test/", "movies");
        assert_eq!(t.table_url(), "https://example.test/tables/movies");
    }

    #[test]
    fn app_key_is_optional() {
        let t = HttpTransport::new("https://example.test", "movies");
        assert!(t.app_key.is_none());
        let t = t.with_app_key(DEFAULT_APP_KEY_HEADER, "secret");
        assert_eq!(
            t.app_key,
            Some(("X-ZUMO-APPLICATION".to_string(), "secret".to_string()))
        );
    }

    #[tokio::test]
    async fn unreachable_endpoint_is_a_transport_error() {
        // Port 9 (discard) on localhost is not expected to accept HTTP.
        let t = HttpTransport::new("http://127.0.0.1:9", "movies")
            .with_timeout(Duration::from_secs(2));
        let err = t.query(&TableQuery::default()).await.unwrap_err();
        assert!(matches!(err, RemoteError::Transport { .. }), "{err}");
    }
}
