// SPDX-FileCopyrightText: 2026 sqlpilot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! JSON-over-HTTP client shared by the completion adapters.
//!
//! Owns authentication headers, the request timeout, and the transient
//! error retry (429, 500, 503, 529).

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue};
use serde::Serialize;
use serde::de::DeserializeOwned;
use sqlpilot_core::SqlPilotError;
use tracing::{debug, warn};

use crate::types::ApiErrorResponse;

const DEFAULT_RETRY_DELAY: Duration = Duration::from_secs(1);

/// A `reqwest::Client` bound to one endpoint.
#[derive(Debug, Clone)]
pub struct JsonClient {
    client: reqwest::Client,
    endpoint: String,
    max_retries: u32,
    retry_delay: Duration,
    vendor: &'static str,
}

impl JsonClient {
    /// Build a client that sends `headers` (plus `content-type: application/json`)
    /// on every request.
    pub fn new(
        vendor: &'static str,
        endpoint: String,
        mut headers: HeaderMap,
        timeout: Duration,
        max_retries: u32,
    ) -> Result<Self, SqlPilotError> {
        headers.insert("content-type", HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()
            .map_err(|e| SqlPilotError::Provider {
                message: format!("failed to build HTTP client: {e}"),
                source: Some(Box::new(e)),
            })?;

        Ok(Self {
            client,
            endpoint,
            max_retries,
            retry_delay: DEFAULT_RETRY_DELAY,
            vendor,
        })
    }

    pub fn with_retry_delay(mut self, delay: Duration) -> Self {
        self.retry_delay = delay;
        self
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// POST `body` and decode the JSON response, retrying transient failures.
    pub async fn post<Req, Resp>(&self, body: &Req) -> Result<Resp, SqlPilotError>
    where
        Req: Serialize + Sync,
        Resp: DeserializeOwned,
    {
        let mut last_error = None;

        for attempt in 0..=self.max_retries {
            if attempt > 0 {
                warn!(attempt, vendor = self.vendor, "retrying request after transient error");
                tokio::time::sleep(self.retry_delay).await;
            }

            let response = self
                .client
                .post(&self.endpoint)
                .json(body)
                .send()
                .await
                .map_err(|e| SqlPilotError::Provider {
                    message: format!("HTTP request failed: {e}"),
                    source: Some(Box::new(e)),
                })?;

            let status = response.status();
            debug!(status = %status, attempt, vendor = self.vendor, "response received");

            if status.is_success() {
                let text = response.text().await.map_err(|e| SqlPilotError::Provider {
                    message: format!("failed to read response body: {e}"),
                    source: Some(Box::new(e)),
                })?;
                return serde_json::from_str(&text).map_err(|e| SqlPilotError::Provider {
                    message: format!("failed to parse {} response: {e}", self.vendor),
                    source: Some(Box::new(e)),
                });
            }

            let text = response.text().await.unwrap_or_default();
            let error = SqlPilotError::provider(self.describe_error(status, &text));

            if is_transient_error(status) && attempt < self.max_retries {
                warn!(status = %status, vendor = self.vendor, "transient error, will retry");
                last_error = Some(error);
                continue;
            }
            return Err(error);
        }

        Err(last_error.unwrap_or_else(|| {
            SqlPilotError::provider(format!("{} request failed after retries", self.vendor))
        }))
    }

    fn describe_error(&self, status: reqwest::StatusCode, body: &str) -> String {
        match serde_json::from_str::<ApiErrorResponse>(body) {
            Ok(api) => format!(
                "{} API error ({}): {}",
                self.vendor,
                api.error.kind.as_deref().unwrap_or("unknown"),
                api.error.message
            ),
            Err(_) => format!("{} API returned {status}: {body}", self.vendor),
        }
    }
}

/// Status codes worth a second attempt.
fn is_transient_error(status: reqwest::StatusCode) -> bool {
    matches!(status.as_u16(), 429 | 500 | 503 | 529)
}

/// Join `path` onto `base`, tolerating a trailing slash on the base.
pub(crate) fn endpoint(base: &str, path: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), path.trim_start_matches('/'))
}
