mod areas;
mod genres;
mod shops;

use axum::{
    extract::State,
    http::{header, HeaderName, Method, StatusCode},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use gourmet_core::{ApiError, ApiResult, ErrorCode};
use gourmet_hotpepper::HotpepperClient;
use serde::Serialize;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::middleware::{access_log, request_id, AccessLog, RequestId};

#[derive(Clone)]
pub struct AppState {
    pub client: HotpepperClient,
}

/// Handler error: a `Failure` envelope plus the HTTP status to send it with.
#[derive(Debug)]
pub struct Failure {
    status: StatusCode,
    error: ApiError,
}

impl Failure {
    /// Rejected input. Logged at debug; bad queries are not incidents.
    pub(super) fn validation(req_id: &RequestId, error: ApiError) -> Self {
        tracing::debug!(
            request_id = %req_id.0,
            message = %error.message,
            "request failed validation"
        );
        Self {
            status: StatusCode::BAD_REQUEST,
            error,
        }
    }

    /// Extractor rejection (malformed path segment or query string), sent in
    /// the same envelope as any other validation failure.
    pub(super) fn rejected(req_id: &RequestId, reason: impl Into<String>) -> Self {
        Self::validation(req_id, ApiError::validation(reason))
    }

    /// Failed directory call. Uses the upstream status when it carried one,
    /// 502 otherwise.
    pub(super) fn upstream(req_id: &RequestId, operation: &'static str, error: ApiError) -> Self {
        let status = upstream_status(&error);
        tracing::warn!(
            request_id = %req_id.0,
            operation,
            code = %error.code,
            status = status.as_u16(),
            "directory call failed"
        );
        Self { status, error }
    }
}

impl IntoResponse for Failure {
    fn into_response(self) -> axum::response::Response {
        (self.status, Json(ApiResult::<()>::failure(self.error))).into_response()
    }
}

pub(super) fn upstream_status(error: &ApiError) -> StatusCode {
    error
        .status_code
        .and_then(|code| StatusCode::from_u16(code).ok())
        .unwrap_or(StatusCode::BAD_GATEWAY)
}

/// True when the upstream said the resource does not exist.
pub(super) fn is_not_found(error: &ApiError) -> bool {
    error.code == ErrorCode::NotFound
}

#[derive(Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
struct HealthData {
    status: &'static str,
    hotpepper_configured: bool,
}

fn build_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET])
        .allow_headers([header::CONTENT_TYPE, HeaderName::from_static("x-request-id")])
        .expose_headers([HeaderName::from_static("x-request-id")])
}

fn directory_router() -> Router<AppState> {
    Router::new()
        .route("/api/hp/shops/search", get(shops::search_shops))
        .route("/api/hp/shops/{id}", get(shops::get_shop))
        .route("/api/hp/genres", get(genres::list_genres))
        .route("/api/hp/areas/large", get(areas::list_large_areas))
        .route("/api/hp/areas/middle", get(areas::list_middle_areas))
        .route("/api/hp/areas/small", get(areas::list_small_areas))
}

pub fn build_app(state: AppState, access: AccessLog) -> Router {
    Router::new()
        .route("/api/health", get(health))
        .merge(directory_router())
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(build_cors())
                .layer(axum::middleware::from_fn(request_id))
                .layer(axum::middleware::from_fn_with_state(access, access_log)),
        )
        .with_state(state)
}

async fn health(State(state): State<AppState>) -> Json<ApiResult<HealthData>> {
    Json(ApiResult::success(HealthData {
        status: "ok",
        hotpepper_configured: state.client.is_configured(),
    }))
}

#[cfg(test)]
#[path = "router_test.rs"]
mod tests;
