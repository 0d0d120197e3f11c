use axum::{extract::State, Extension, Json};
use gourmet_core::ApiResult;
use gourmet_hotpepper::{model::GenresResponse, transform::to_genres_response};

use crate::middleware::RequestId;

use super::{AppState, Failure};

pub(super) async fn list_genres(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Result<Json<ApiResult<GenresResponse>>, Failure> {
    let results = state
        .client
        .get_genres()
        .await
        .into_result()
        .map_err(|e| Failure::upstream(&req_id, "genres.list", e))?;

    Ok(Json(ApiResult::success(to_genres_response(&results))))
}
