//! HTTP client for the places nearby-search API.
//!
//! Holds the API key, so it belongs on the server side; browsers and the CLI
//! go through [`crate::PlacesProxyClient`] instead.

use std::time::Duration;

use reqwest::{Client, Url};

use crate::error::PlacesError;
use crate::retry::retry_with_backoff;
use crate::types::{NearbySearchParams, NearbySearchResponse};

pub const DEFAULT_BASE_URL: &str = "https://maps.googleapis.com/maps/api/place";

pub struct PlacesClient {
    client: Client,
    api_key: String,
    nearby_url: Url,
    max_retries: u32,
    retry_backoff_ms: u64,
}

impl PlacesClient {
    /// Creates a client pointed at the production places API.
    ///
    /// # Errors
    ///
    /// Returns [`PlacesError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(api_key: &str, timeout_secs: u64) -> Result<Self, PlacesError> {
        Self::with_base_url(api_key, timeout_secs, DEFAULT_BASE_URL)
    }

    /// Creates a client with a custom base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`PlacesError::Http`] if the `reqwest::Client` cannot be
    /// built, or [`PlacesError::InvalidBaseUrl`] if `base_url` does not parse.
    pub fn with_base_url(
        api_key: &str,
        timeout_secs: u64,
        base_url: &str,
    ) -> Result<Self, PlacesError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent("chargefinder/0.1")
            .build()?;

        // Exactly one trailing slash, so `join` appends instead of replacing
        // the last path segment.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let invalid = |reason: String| PlacesError::InvalidBaseUrl {
            url: base_url.to_owned(),
            reason,
        };
        let nearby_url = Url::parse(&normalised)
            .and_then(|base| base.join("nearbysearch/json"))
            .map_err(|e| invalid(e.to_string()))?;

        Ok(Self {
            client,
            api_key: api_key.to_owned(),
            nearby_url,
            max_retries: 0,
            retry_backoff_ms: 0,
        })
    }

    /// Retry transient failures up to `max_retries` times.
    #[must_use]
    pub fn with_retry(mut self, max_retries: u32, backoff_base_ms: u64) -> Self {
        self.max_retries = max_retries;
        self.retry_backoff_ms = backoff_base_ms;
        self
    }

    /// Searches for places around `params.location`.
    ///
    /// A `ZERO_RESULTS` answer is a success with an empty result list.
    ///
    /// # Errors
    ///
    /// - [`PlacesError::Upstream`] if the API reports any other status.
    /// - [`PlacesError::Http`] on network failure or non-2xx HTTP status.
    /// - [`PlacesError::Deserialize`] if the body does not match
    ///   [`NearbySearchResponse`].
    pub async fn nearby_search(
        &self,
        params: &NearbySearchParams,
    ) -> Result<NearbySearchResponse, PlacesError> {
        let url = self.build_url(params);
        let response = retry_with_backoff(self.max_retries, self.retry_backoff_ms, || {
            self.request(&url)
        })
        .await?;

        tracing::debug!(
            status = %response.status,
            results = response.results.len(),
            radius_m = params.radius_m,
            "nearby search complete"
        );
        Ok(response)
    }

    async fn request(&self, url: &Url) -> Result<NearbySearchResponse, PlacesError> {
        let response = self.client.get(url.clone()).send().await?;
        let response = response.error_for_status()?;
        let body = response.text().await?;
        let parsed: NearbySearchResponse =
            serde_json::from_str(&body).map_err(|e| PlacesError::Deserialize {
                context: "nearbysearch".to_owned(),
                source: e,
            })?;

        if !parsed.is_success() {
            tracing::error!(status = %parsed.status, "places API returned an error status");
            return Err(PlacesError::Upstream {
                status: parsed.status,
                message: parsed.error_message,
            });
        }
        Ok(parsed)
    }

    /// Builds the request URL. The key is appended here and never logged.
    fn build_url(&self, params: &NearbySearchParams) -> Url {
        let mut url = self.nearby_url.clone();
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair(
                "location",
                &format!("{},{}", params.location.lat, params.location.lng),
            );
            pairs.append_pair("radius", &params.radius_m.to_string());
            pairs.append_pair("key", &self.api_key);
            if let Some(place_type) = params.place_type.as_deref().filter(|t| !t.is_empty()) {
                pairs.append_pair("type", place_type);
            }
            if let Some(keyword) = params.keyword.as_deref().filter(|k| !k.is_empty()) {
                pairs.append_pair("keyword", keyword);
            }
        }
        url
    }
}

impl std::fmt::Debug for PlacesClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlacesClient")
            .field("nearby_url", &self.nearby_url.as_str())
            .field("api_key", &"[redacted]")
            .field("max_retries", &self.max_retries)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
