use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Extension, Json,
};
use serde_json::Value;

use crate::database::models::{Interview, InterviewInput, PopulatedInterview};
use crate::middleware::response::{empty_data, ApiResponse, ApiResult};
use crate::middleware::RequestContext;
use crate::services::InterviewService;
use crate::state::AppState;

use super::parse_id;

/// GET /api/v1/interviews - Own interviews, or all of them for admins
pub async fn list(
    State(state): State<AppState>,
    Extension(context): Extension<RequestContext>,
) -> ApiResult<Vec<PopulatedInterview>> {
    let interviews = InterviewService::new(state.pool).list(&context, None).await?;
    let count = interviews.len();
    Ok(ApiResponse::success(interviews).with_count(count))
}

/// GET /api/v1/companies/:id/interviews - Same scoping, limited to one company
pub async fn list_for_company(
    State(state): State<AppState>,
    Extension(context): Extension<RequestContext>,
    Path(company_id): Path<String>,
) -> ApiResult<Vec<PopulatedInterview>> {
    let company_id = parse_id(&company_id)?;
    let interviews = InterviewService::new(state.pool)
        .list(&context, Some(company_id))
        .await?;
    let count = interviews.len();
    Ok(ApiResponse::success(interviews).with_count(count))
}

/// GET /api/v1/interviews/:id - Owner or admin
pub async fn get(
    State(state): State<AppState>,
    Extension(context): Extension<RequestContext>,
    Path(id): Path<String>,
) -> ApiResult<PopulatedInterview> {
    let id = parse_id(&id)?;
    let interview = InterviewService::new(state.pool).get(&context, id).await?;
    Ok(ApiResponse::success(interview))
}

/// POST /api/v1/companies/:id/interviews
///
/// The caller becomes the owner; quota and date window are enforced.
pub async fn create(
    State(state): State<AppState>,
    Extension(context): Extension<RequestContext>,
    Path(company_id): Path<String>,
    body: Result<Json<InterviewInput>, JsonRejection>,
) -> ApiResult<Interview> {
    let company_id = parse_id(&company_id)?;
    let Json(input) = body?;
    let new = input.into_new()?;

    let interview = InterviewService::new(state.pool)
        .create(&context, company_id, new)
        .await?;
    Ok(ApiResponse::created(interview))
}

/// PUT /api/v1/interviews/:id - Owner or admin
pub async fn update(
    State(state): State<AppState>,
    Extension(context): Extension<RequestContext>,
    Path(id): Path<String>,
    body: Result<Json<InterviewInput>, JsonRejection>,
) -> ApiResult<Interview> {
    let id = parse_id(&id)?;
    let Json(input) = body?;
    let patch = input.into_patch()?;

    let interview = InterviewService::new(state.pool)
        .update(&context, id, patch)
        .await?;
    Ok(ApiResponse::success(interview))
}

/// DELETE /api/v1/interviews/:id - Owner or admin
pub async fn delete(
    State(state): State<AppState>,
    Extension(context): Extension<RequestContext>,
    Path(id): Path<String>,
) -> ApiResult<Value> {
    let id = parse_id(&id)?;
    InterviewService::new(state.pool).delete(&context, id).await?;
    Ok(ApiResponse::success(empty_data()))
}
