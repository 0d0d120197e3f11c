use axum::{
    extract::{
        rejection::{PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    Extension, Json,
};
use gourmet_core::{normalize_search_query, normalize_shop_id, raw_query_from_pairs, ApiResult};
use gourmet_hotpepper::{
    model::{ShopDetailResponse, ShopSearchResponse},
    transform::{to_search_response, to_shop_detail},
    ShopSearchParams,
};

use crate::middleware::RequestId;

use super::{is_not_found, AppState, Failure};

pub(super) async fn search_shops(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    query: Result<Query<Vec<(String, String)>>, QueryRejection>,
) -> Result<Json<ApiResult<ShopSearchResponse>>, Failure> {
    let Query(pairs) = query.map_err(|r| Failure::rejected(&req_id, r.body_text()))?;
    let raw = raw_query_from_pairs(pairs);
    let query = normalize_search_query(&raw).map_err(|e| Failure::validation(&req_id, e))?;

    let results = state
        .client
        .search_shops(&ShopSearchParams::from(&query))
        .await
        .into_result()
        .map_err(|e| Failure::upstream(&req_id, "shops.search", e))?;

    Ok(Json(ApiResult::success(to_search_response(&results))))
}

/// Shop detail. A miss is still a success envelope, sent with status 404 and
/// `{"notFound": true}` so clients can tell it apart from a failed call.
pub(super) async fn get_shop(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    path: Result<Path<String>, PathRejection>,
) -> Result<(StatusCode, Json<ApiResult<ShopDetailResponse>>), Failure> {
    let Path(id) = path.map_err(|r| Failure::rejected(&req_id, r.body_text()))?;
    let id = normalize_shop_id(&id).map_err(|e| Failure::validation(&req_id, e))?;

    let not_found = || {
        (
            StatusCode::NOT_FOUND,
            Json(ApiResult::success(ShopDetailResponse::not_found())),
        )
    };

    let results = match state.client.get_shop_detail(&id).await.into_result() {
        Ok(results) => results,
        Err(error) if is_not_found(&error) => return Ok(not_found()),
        Err(error) => return Err(Failure::upstream(&req_id, "shops.detail", error)),
    };

    let Some(shop) = results.shop.first() else {
        tracing::debug!(request_id = %req_id.0, shop_id = %id, "shop not found");
        return Ok(not_found());
    };

    Ok((
        StatusCode::OK,
        Json(ApiResult::success(ShopDetailResponse::Found {
            shop: Box::new(to_shop_detail(shop)),
        })),
    ))
}
