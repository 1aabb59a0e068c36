//! Client for the server's `/api/places/nearby` route.
//!
//! Nearby places are decoration around a charger, so every failure here
//! degrades to an empty list.

use std::time::Duration;

use reqwest::{Client, Url};

use crate::error::PlacesError;
use crate::types::{NearbySearchParams, NearbySearchResponse, Place};

const NEARBY_PATH: &str = "api/places/nearby";

#[derive(Debug, Clone)]
pub struct PlacesProxyClient {
    client: Client,
    nearby_url: Url,
}

impl PlacesProxyClient {
    /// `server_url` is the origin the chargefinder server is reachable at.
    ///
    /// # Errors
    ///
    /// Returns [`PlacesError::Http`] if the `reqwest::Client` cannot be
    /// built, or [`PlacesError::InvalidBaseUrl`] if `server_url` does not parse.
    pub fn new(server_url: &str, timeout_secs: u64) -> Result<Self, PlacesError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .user_agent("chargefinder/0.1")
            .build()?;
        let normalised = format!("{}/", server_url.trim_end_matches('/'));
        let nearby_url = Url::parse(&normalised)
            .and_then(|base| base.join(NEARBY_PATH))
            .map_err(|e| PlacesError::InvalidBaseUrl {
                url: server_url.to_owned(),
                reason: e.to_string(),
            })?;
        Ok(Self { client, nearby_url })
    }

    /// Nearby places, or an empty list if the proxy cannot be reached or
    /// answers with an error.
    pub async fn nearby(&self, params: &NearbySearchParams) -> Vec<Place> {
        match self.try_nearby(params).await {
            Ok(places) => places,
            Err(e) => {
                tracing::warn!(error = %e, "nearby places unavailable");
                Vec::new()
            }
        }
    }

    /// # Errors
    ///
    /// Returns [`PlacesError::Http`] on network failure or a non-2xx status,
    /// or [`PlacesError::Deserialize`] for an unexpected body.
    pub async fn try_nearby(&self, params: &NearbySearchParams) -> Result<Vec<Place>, PlacesError> {
        let url = self.build_url(params);
        let response = self.client.get(url).send().await?.error_for_status()?;
        let body = response.text().await?;
        let parsed: NearbySearchResponse =
            serde_json::from_str(&body).map_err(|e| PlacesError::Deserialize {
                context: NEARBY_PATH.to_owned(),
                source: e,
            })?;
        Ok(parsed.results)
    }

    fn build_url(&self, params: &NearbySearchParams) -> Url {
        let mut url = self.nearby_url.clone();
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("lat", &params.location.lat.to_string());
            pairs.append_pair("lng", &params.location.lng.to_string());
            pairs.append_pair("radius", &params.radius_m.to_string());
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
