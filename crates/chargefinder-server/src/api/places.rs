use axum::{
    extract::{rejection::QueryRejection, Query, State},
    Extension, Json,
};
use chargefinder_core::Coordinates;
use chargefinder_places::{NearbySearchParams, NearbySearchResponse, PlacesError, PROXY_DEFAULT_RADIUS_M};
use serde::Deserialize;

use crate::middleware::RequestId;

use super::{parse_query, ApiError, AppState};

#[derive(Debug, Deserialize)]
pub(super) struct NearbyQuery {
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    pub radius: Option<u32>,
    #[serde(rename = "type")]
    pub place_type: Option<String>,
    pub keyword: Option<String>,
}

/// Proxies a nearby search so the maps key never leaves the server. The
/// upstream `{ results, status }` body is passed through.
pub(super) async fn nearby_places(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    query: Result<Query<NearbyQuery>, QueryRejection>,
) -> Result<Json<NearbySearchResponse>, ApiError> {
    let query = parse_query(&req_id.0, query)?;
    let (Some(lat), Some(lng)) = (query.lat, query.lng) else {
        return Err(ApiError::new(
            req_id.0,
            "bad_request",
            "missing required parameters: lat, lng",
        ));
    };

    let Some(client) = state.places.as_ref() else {
        return Err(ApiError::new(
            req_id.0,
            "not_configured",
            "maps API key not configured",
        ));
    };

    let params = NearbySearchParams {
        location: Coordinates::new(lat, lng),
        radius_m: query.radius.unwrap_or(PROXY_DEFAULT_RADIUS_M),
        place_type: query.place_type,
        keyword: query.keyword,
    };

    match client.nearby_search(&params).await {
        Ok(response) => Ok(Json(response)),
        Err(e) => Err(map_places_error(req_id.0, &e)),
    }
}

fn map_places_error(request_id: String, error: &PlacesError) -> ApiError {
    tracing::error!(error = %error, "nearby places request failed");
    let message = match error {
        PlacesError::Upstream { status, .. } => format!("places API error: {status}"),
        _ => "failed to fetch nearby places".to_string(),
    };
    ApiError::new(request_id, "upstream_error", message)
}
