//! Spreadsheet-backed provider: one JSON array per sheet over HTTPS.

use async_trait::async_trait;
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue, USER_AGENT};
use serde_json::Value;
use tracing::{debug, instrument};

use crate::config::ProviderConfig;
use crate::error::AppError;
use crate::provider::data_provider::{Collection, DataProvider};

const USER_AGENT_VALUE: &str = concat!("edunav/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Clone)]
pub struct SheetsProvider {
    client: reqwest::Client,
    config: ProviderConfig,
}

impl SheetsProvider {
    pub fn new(config: ProviderConfig) -> Result<Self, AppError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(USER_AGENT, HeaderValue::from_static(USER_AGENT_VALUE));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| {
                AppError::provider_unavailable(format!("failed to create HTTP client: {e}"))
            })?;

        Ok(Self { client, config })
    }

    /// The service answers a missing sheet with `{"error": "..."}` and a
    /// success status; anything but an array is a failure.
    fn rows_from(collection: Collection, body: Value) -> Result<Vec<Value>, AppError> {
        match body {
            Value::Array(rows) => Ok(rows),
            Value::Object(map) => {
                let reason = map
                    .get("error")
                    .and_then(Value::as_str)
                    .unwrap_or("unexpected object response");
                Err(AppError::provider_unavailable(format!("{collection}: {reason}")))
            }
            other => Err(AppError::provider_unavailable(format!(
                "{collection}: expected a JSON array, got {other}"
            ))),
        }
    }
}

#[async_trait]
impl DataProvider for SheetsProvider {
    #[instrument(level = "debug", skip(self))]
    async fn fetch_collection(&self, collection: Collection) -> Result<Vec<Value>, AppError> {
        let url = self.config.collection_url(collection);
        debug!("Fetching {} from {}", collection, url);

        let response = self.client.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::provider_unavailable(format!(
                "{collection}: HTTP {status}: {body}"
            )));
        }

        let body: Value = response.json().await?;
        let rows = Self::rows_from(collection, body)?;
        debug!("Fetched {} {} rows", rows.len(), collection);
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn array_body_is_passed_through() {
        let rows = SheetsProvider::rows_from(Collection::Courses, json!([{"ID": 1}])).unwrap();
        assert_eq!(rows.len(), 1);
    }

    #[test]
    fn error_object_is_unavailable() {
        let err = SheetsProvider::rows_from(
            Collection::Subjects,
            json!({"error": "Unable to parse range: Subjects"}),
        )
        .unwrap_err();
        match err {
            AppError::ProviderUnavailable(msg) => {
                assert!(msg.starts_with("subjects:"));
                assert!(msg.contains("Unable to parse range"));
            }
            other => panic!("unexpected {other:?}"),
        }
    }
}
