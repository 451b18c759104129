//! HTTP Fetcher - shared JSON GET client for chain-data providers
//!
//! One bounded timeout per client, gzip enabled, User-Agent set.
//! No retries: a failed call surfaces as an [`AppError`] and the caller decides.
//! Query strings are never logged with their `apikey`.

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT_ENCODING, USER_AGENT};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;

use crate::models::errors::{AppError, AppResult, ErrorCode};
use crate::utils::constants::USER_AGENT as USER_AGENT_CONST;

/// JSON-over-HTTP client with a fixed timeout
#[derive(Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
    timeout: Duration,
}

impl HttpFetcher {
    pub fn new(timeout: Duration) -> AppResult<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static(USER_AGENT_CONST));
        headers.insert(ACCEPT_ENCODING, HeaderValue::from_static("gzip"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .gzip(true)
            .build()
            .map_err(|e| {
                AppError::with_source(ErrorCode::ConfigInvalidValue, "Failed to build HTTP client", e)
            })?;

        Ok(Self { client, timeout })
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// GET `url` with `query` and decode the JSON body
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, String)],
    ) -> AppResult<T> {
        debug!("🌐 GET {}?{}", url, masked_query(query));

        let response = self.client.get(url).query(query).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::upstream_status(status.as_u16()));
        }

        let body = response.bytes().await?;
        let parsed = serde_json::from_slice::<T>(&body)?;
        Ok(parsed)
    }
}

/// Render query parameters for logging with secrets hidden
pub fn masked_query(query: &[(&str, String)]) -> String {
    query
        .iter()
        .map(|(key, value)| {
            if *key == "apikey" {
                format!("{}=***HIDDEN***", key)
            } else {
                format!("{}={}", key, value)
            }
        })
        .collect::<Vec<_>>()
        .join("&")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_masked_query_hides_api_key() {
        let query = vec![
            ("module", "account".to_string()),
            ("apikey", "SECRET123".to_string()),
        ];
        let rendered = masked_query(&query);
        assert_eq!(rendered, "module=account&apikey=***HIDDEN***");
        assert!(!rendered.contains("SECRET123"));
    }

    #[tokio::test]
    async fn test_unreachable_upstream_is_typed_error() {
        let fetcher = HttpFetcher::new(Duration::from_millis(500)).unwrap();
        let err = fetcher
            .get_json::<serde_json::Value>("http://127.0.0.1:9/api", &[])
            .await
            .unwrap_err();
        assert!(matches!(
            err.code,
            ErrorCode::UpstreamUnavailable | ErrorCode::UpstreamTimeout
        ));
    }
}
