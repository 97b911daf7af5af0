//! API client for the SpaceX v3 REST API.
//!
//! This module provides the `ApiClient` struct for the two read-only
//! resources the app consumes: the launch list and the company profile.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{header, Client};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::models::{CompanyDto, LaunchDto};

use super::ApiError;

// ============================================================================
// Constants
// ============================================================================

/// Base URL of the public SpaceX v3 API
pub const DEFAULT_BASE_URL: &str = "https://api.spacexdata.com/v3";

/// HTTP request timeout in seconds.
/// The full launch list is a few megabytes, so leave room for slow links.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Maximum number of retries for rate-limited (429) requests.
const MAX_RATE_LIMIT_RETRIES: u32 = 3;

/// Initial backoff delay in milliseconds for rate limiting.
const INITIAL_BACKOFF_MS: u64 = 1000;

/// The remote side of the offline-first repository: one call per resource.
///
/// Transport, HTTP status and decode failures all surface as `ApiError`;
/// callers only need to know whether usable data came back.
#[async_trait]
pub trait RemoteFetcher: Send + Sync {
    async fn fetch_launches(&self) -> Result<Vec<LaunchDto>, ApiError>;

    async fn fetch_company(&self) -> Result<CompanyDto, ApiError>;
}

/// API client for api.spacexdata.com.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    /// Create a client against the public API with the default timeout
    pub fn new() -> Result<Self, ApiError> {
        Self::with_base_url(DEFAULT_BASE_URL, Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    pub fn with_base_url(base_url: &str, timeout: Duration) -> Result<Self, ApiError> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Check if response is successful, returning an error with body if not.
    /// Returns Ok(Some(response)) for success, Ok(None) for rate limit (should retry),
    /// or Err for other errors.
    async fn check_response_for_retry(
        response: reqwest::Response,
    ) -> Result<Option<reqwest::Response>, ApiError> {
        if response.status().is_success() {
            Ok(Some(response))
        } else if response.status().as_u16() == 429 {
            Ok(None)
        } else {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            Err(ApiError::from_status(status, &body))
        }
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let url = self.endpoint(path);
        let mut retries = 0;
        let mut backoff_ms = INITIAL_BACKOFF_MS;

        loop {
            let response = self
                .client
                .get(&url)
                .header(header::ACCEPT, "application/json")
                .send()
                .await?;

            match Self::check_response_for_retry(response).await? {
                Some(response) => {
                    let text = response.text().await?;
                    debug!(url = %url, bytes = text.len(), "Response received");
                    return serde_json::from_str(&text).map_err(|source| ApiError::Decode {
                        resource: path.to_string(),
                        source,
                    });
                }
                None => {
                    retries += 1;
                    if retries > MAX_RATE_LIMIT_RETRIES {
                        return Err(ApiError::RateLimited);
                    }
                    warn!(
                        url = %url,
                        retry = retries,
                        backoff_ms = backoff_ms,
                        "Rate limited, backing off"
                    );
                    tokio::time::sleep(Duration::from_millis(backoff_ms)).await;
                    backoff_ms *= 2; // Exponential backoff
                }
            }
        }
    }
}

#[async_trait]
impl RemoteFetcher for ApiClient {
    /// Fetch every launch, past and upcoming
    async fn fetch_launches(&self) -> Result<Vec<LaunchDto>, ApiError> {
        let launches: Vec<LaunchDto> = self.get("launches").await?;
        debug!(count = launches.len(), "Launches fetched");
        Ok(launches)
    }

    /// Fetch the company profile
    async fn fetch_company(&self) -> Result<CompanyDto, ApiError> {
        self.get("info").await
    }
}
