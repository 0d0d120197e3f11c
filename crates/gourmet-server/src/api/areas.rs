use axum::{
    extract::{rejection::QueryRejection, Query, State},
    Extension, Json,
};
use gourmet_core::{parse_middle_area_query, parse_small_area_query, raw_query_from_pairs, ApiResult};
use gourmet_hotpepper::{
    model::{LargeAreasResponse, MiddleAreasResponse, SmallAreasResponse},
    transform::{to_large_areas_response, to_middle_areas_response, to_small_areas_response},
};

use crate::middleware::RequestId;

use super::{AppState, Failure};

pub(super) async fn list_large_areas(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Result<Json<ApiResult<LargeAreasResponse>>, Failure> {
    let results = state
        .client
        .get_large_areas()
        .await
        .into_result()
        .map_err(|e| Failure::upstream(&req_id, "areas.large", e))?;

    Ok(Json(ApiResult::success(to_large_areas_response(&results))))
}

/// Middle areas under `largeAreaCode`. Without a parent the list is empty
/// and HotPepper is not called.
pub(super) async fn list_middle_areas(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    query: Result<Query<Vec<(String, String)>>, QueryRejection>,
) -> Result<Json<ApiResult<MiddleAreasResponse>>, Failure> {
    let Query(pairs) = query.map_err(|r| Failure::rejected(&req_id, r.body_text()))?;
    let query = parse_middle_area_query(&raw_query_from_pairs(pairs))
        .map_err(|e| Failure::validation(&req_id, e))?;

    let Some(large_area) = query.large_area_code else {
        return Ok(Json(ApiResult::success(MiddleAreasResponse::empty())));
    };

    let results = state
        .client
        .get_middle_areas(Some(&large_area))
        .await
        .into_result()
        .map_err(|e| Failure::upstream(&req_id, "areas.middle", e))?;

    Ok(Json(ApiResult::success(to_middle_areas_response(&results))))
}

pub(super) async fn list_small_areas(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    query: Result<Query<Vec<(String, String)>>, QueryRejection>,
) -> Result<Json<ApiResult<SmallAreasResponse>>, Failure> {
    let Query(pairs) = query.map_err(|r| Failure::rejected(&req_id, r.body_text()))?;
    let query = parse_small_area_query(&raw_query_from_pairs(pairs))
        .map_err(|e| Failure::validation(&req_id, e))?;

    let results = state
        .client
        .get_small_areas(Some(&query.middle_area_code))
        .await
        .into_result()
        .map_err(|e| Failure::upstream(&req_id, "areas.small", e))?;

    Ok(Json(ApiResult::success(to_small_areas_response(&results))))
}
