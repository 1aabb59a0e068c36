use std::sync::Arc;

use axum::{
    extract::{rejection::QueryRejection, Path, Query, State},
    Extension, Json,
};
use chargefinder_core::{
    ranking, ChargeableLocation, Coordinates, RankedLocation, DEFAULT_NEAREST_LIMIT,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::middleware::RequestId;

use super::{parse_query, ApiError, ApiResponse, AppState, ResponseMeta};

/// Entity-source document: `{ chargers, lastUpdated }`. Served bare so any
/// client that reads the catalog document can read this route.
/// `lastUpdated` is the loaded document's own stamp, or now when it has none.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct ChargersDocument {
    pub chargers: Vec<Arc<ChargeableLocation>>,
    pub last_updated: chrono::DateTime<Utc>,
}

pub(super) async fn list_chargers(State(state): State<AppState>) -> Json<ChargersDocument> {
    Json(ChargersDocument {
        chargers: state.catalog.all().to_vec(),
        last_updated: state.catalog.last_updated().unwrap_or_else(Utc::now),
    })
}

#[derive(Debug, Deserialize)]
pub(super) struct NearestQuery {
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    pub limit: Option<i64>,
}

/// Default 5, non-positive means none, and never more than `available`.
pub(super) fn normalize_limit(limit: Option<i64>, available: usize) -> usize {
    match limit {
        None => DEFAULT_NEAREST_LIMIT.min(available),
        Some(n) if n <= 0 => 0,
        Some(n) => usize::try_from(n).map_or(available, |n| n.min(available)),
    }
}

pub(super) async fn nearest_chargers(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    query: Result<Query<NearestQuery>, QueryRejection>,
) -> Result<Json<ApiResponse<Vec<RankedLocation>>>, ApiError> {
    let query = parse_query(&req_id.0, query)?;
    let (Some(lat), Some(lng)) = (query.lat, query.lng) else {
        return Err(ApiError::new(
            req_id.0,
            "bad_request",
            "missing required parameters: lat, lng",
        ));
    };

    let limit = normalize_limit(query.limit, state.catalog.len());
    let data = ranking::nearest_in(&state.catalog, Coordinates::new(lat, lng), limit);
    tracing::debug!(lat, lng, limit, results = data.len(), "nearest chargers");

    Ok(Json(ApiResponse {
        data,
        meta: ResponseMeta::new(req_id.0),
    }))
}

pub(super) async fn get_charger(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Arc<ChargeableLocation>>>, ApiError> {
    let Some(charger) = state.catalog.by_id(&id) else {
        return Err(ApiError::new(
            req_id.0,
            "not_found",
            format!("charger '{id}' not found"),
        ));
    };
    Ok(Json(ApiResponse {
        data: Arc::clone(charger),
        meta: ResponseMeta::new(req_id.0),
    }))
}
