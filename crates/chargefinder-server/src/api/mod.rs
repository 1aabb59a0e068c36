mod chargers;
mod places;

use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    http::{header, HeaderName, Method, StatusCode},
    response::IntoResponse,
    routing::get,
    Extension, Json, Router,
};
use chargefinder_core::{AppConfig, EntityCatalog};
use chargefinder_places::PlacesClient;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::middleware::{enforce_rate_limit, request_id, RateLimitState, RequestId, REQUEST_ID_HEADER};

#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<EntityCatalog>,
    /// `None` when no maps API key is configured.
    pub places: Option<Arc<PlacesClient>>,
    pub started_at: Instant,
}

impl AppState {
    #[must_use]
    pub fn new(catalog: Arc<EntityCatalog>, places: Option<Arc<PlacesClient>>) -> Self {
        Self {
            catalog,
            places,
            started_at: Instant::now(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub data: T,
    pub meta: ResponseMeta,
}

#[derive(Debug, Serialize)]
pub struct ResponseMeta {
    pub request_id: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct ApiError {
    pub error: ErrorBody,
    pub meta: ResponseMeta,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

#[derive(Debug, Serialize)]
struct HealthData {
    status: &'static str,
    timestamp: DateTime<Utc>,
    uptime_secs: f64,
    chargers: usize,
}

impl ResponseMeta {
    pub(super) fn new(request_id: String) -> Self {
        Self {
            request_id,
            timestamp: Utc::now(),
        }
    }
}

impl ApiError {
    pub fn new(
        request_id: impl Into<String>,
        code: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            error: ErrorBody {
                code: code.into(),
                message: message.into(),
            },
            meta: ResponseMeta::new(request_id.into()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = match self.error.code.as_str() {
            "not_found" => StatusCode::NOT_FOUND,
            "bad_request" => StatusCode::BAD_REQUEST,
            "rate_limited" => StatusCode::TOO_MANY_REQUESTS,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(self)).into_response()
    }
}

/// Unwrap a query extractor, turning a malformed query string into a
/// `bad_request` [`ApiError`].
pub(super) fn parse_query<T>(
    request_id: &str,
    query: Result<Query<T>, QueryRejection>,
) -> Result<T, ApiError> {
    query
        .map(|Query(q)| q)
        .map_err(|e| ApiError::new(request_id, "bad_request", e.body_text()))
}

fn build_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, HeaderName::from_static(REQUEST_ID_HEADER)])
}

pub fn build_app(state: AppState, rate_limit: RateLimitState) -> Router {
    let api_routes = Router::new()
        .route("/api/chargers", get(chargers::list_chargers))
        .route("/api/chargers/nearest", get(chargers::nearest_chargers))
        .route("/api/chargers/{id}", get(chargers::get_charger))
        .route("/api/places/nearby", get(places::nearby_places))
        .layer(axum::middleware::from_fn_with_state(
            rate_limit,
            enforce_rate_limit,
        ));

    Router::new()
        .route("/api/health", get(health))
        .merge(api_routes)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(build_cors())
                .layer(axum::middleware::from_fn(request_id)),
        )
        .with_state(state)
}

async fn health(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> impl IntoResponse {
    Json(ApiResponse {
        data: HealthData {
            status: "healthy",
            timestamp: Utc::now(),
            uptime_secs: state.started_at.elapsed().as_secs_f64(),
            chargers: state.catalog.len(),
        },
        meta: ResponseMeta::new(req_id.0),
    })
}

#[must_use]
pub fn rate_limit_state(config: &AppConfig) -> RateLimitState {
    RateLimitState::new(
        usize::try_from(config.rate_limit_max_requests).unwrap_or(usize::MAX),
        Duration::from_secs(config.rate_limit_window_secs),
    )
}

#[cfg(test)]
#[path = "api_test.rs"]
mod tests;
