use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    Json,
};
use serde_json::{Map, Value};

use crate::database::models::{Company, CompanyDetail, CompanyInput};
use crate::middleware::response::{empty_data, ApiResponse, ApiResult};
use crate::services::{CompanyQuery, CompanyService};
use crate::state::AppState;

use super::parse_id;

/// GET /api/v1/companies - Filtered, sorted, paged listing
///
/// Query string: `field=value`, `field[gt|gte|lt|lte|in]=value`,
/// `select=a,b`, `sort=a,-b`, `page`, `limit`.
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<Vec<(String, String)>>,
) -> ApiResult<Vec<Map<String, Value>>> {
    let query = CompanyQuery::from_params(&params)?;
    let page = CompanyService::new(state.pool).list(&query).await?;

    let count = page.companies.len();
    Ok(ApiResponse::success(page.companies)
        .with_count(count)
        .with_pagination(page.pagination))
}

/// GET /api/v1/companies/:id
pub async fn get(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<CompanyDetail> {
    let id = parse_id(&id)?;
    let company = CompanyService::new(state.pool).get(id).await?;
    Ok(ApiResponse::success(company))
}

/// POST /api/v1/companies - Admin only
pub async fn create(
    State(state): State<AppState>,
    body: Result<Json<CompanyInput>, JsonRejection>,
) -> ApiResult<Company> {
    let Json(input) = body?;
    let new = input.into_new()?;

    let company = CompanyService::new(state.pool)
        .create(new, state.quotes.as_ref())
        .await?;
    Ok(ApiResponse::created(company))
}

/// PUT /api/v1/companies/:id - Admin only
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Json<CompanyInput>, JsonRejection>,
) -> ApiResult<Company> {
    let id = parse_id(&id)?;
    let Json(input) = body?;
    let patch = input.into_patch()?;

    let company = CompanyService::new(state.pool).update(id, patch).await?;
    Ok(ApiResponse::success(company))
}

/// DELETE /api/v1/companies/:id - Admin only, removes the company's interviews too
pub async fn delete(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Value> {
    let id = parse_id(&id)?;
    CompanyService::new(state.pool).delete(id).await?;
    Ok(ApiResponse::success(empty_data()))
}
