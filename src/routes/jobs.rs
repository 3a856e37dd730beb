use axum::{
    extract::{Query, State},
    response::{IntoResponse, Json},
};
use validator::Validate;

use crate::{
    dto::search_dto::{FacetSetResponse, JobSearchQuery, PostingPageResponse},
    error::Result,
    AppState,
};

#[utoipa::path(
    get,
    path = "/api/jobs",
    params(
        ("q" = Option<String>, Query, description = "Free text matched against title, description, company and technologies"),
        ("category" = Option<String>, Query, description = "Category slug"),
        ("tech" = Option<String>, Query, description = "Technology id, slug or name"),
        ("locations" = Option<String>, Query, description = "Comma separated locations"),
        ("seniority" = Option<String>, Query, description = "Comma separated seniority labels"),
        ("job_types" = Option<String>, Query, description = "Comma separated job types"),
        ("salary" = Option<String>, Query, description = "Comma separated salary bands"),
        ("remote" = Option<bool>, Query, description = "Remote flag"),
        ("sort" = Option<String>, Query, description = "newest | deadline"),
        ("page" = Option<i64>, Query, description = "Page number"),
        ("page_size" = Option<i64>, Query, description = "Items per page (5-50)")
    ),
    responses(
        (status = 200, description = "Matching job postings", body = Json<PostingPageResponse>),
        (status = 400, description = "Invalid query")
    )
)]
#[axum::debug_handler]
pub async fn search_jobs(
    State(state): State<AppState>,
    Query(query): Query<JobSearchQuery>,
) -> Result<impl IntoResponse> {
    query.validate()?;
    let token = state.shutdown.child_token();
    let page = state
        .search_service
        .search(&query.criteria(), query.sort(), query.page_request(), &token)
        .await?;
    Ok(Json(PostingPageResponse::from(page)))
}

#[utoipa::path(
    get,
    path = "/api/jobs/facets",
    params(
        ("q" = Option<String>, Query, description = "Free text"),
        ("category" = Option<String>, Query, description = "Category slug"),
        ("tech" = Option<String>, Query, description = "Technology id, slug or name"),
        ("locations" = Option<String>, Query, description = "Comma separated locations"),
        ("seniority" = Option<String>, Query, description = "Comma separated seniority labels"),
        ("job_types" = Option<String>, Query, description = "Comma separated job types"),
        ("salary" = Option<String>, Query, description = "Comma separated salary bands"),
        ("remote" = Option<bool>, Query, description = "Remote flag")
    ),
    responses(
        (status = 200, description = "Facet counts", body = Json<FacetSetResponse>),
        (status = 400, description = "Invalid query")
    )
)]
#[axum::debug_handler]
pub async fn job_facets(
    State(state): State<AppState>,
    Query(query): Query<JobSearchQuery>,
) -> Result<impl IntoResponse> {
    query.validate()?;
    let token = state.shutdown.child_token();
    let facets = state
        .facet_service
        .facets(&query.criteria(), &token)
        .await?;
    Ok(Json(FacetSetResponse::from(facets)))
}
