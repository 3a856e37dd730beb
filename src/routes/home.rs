use axum::{
    extract::{Query, State},
    response::{IntoResponse, Json},
};
use validator::Validate;

use crate::{
    dto::section_dto::{
        CompanyAggregatesQuery, CompanyAggregatesResponse, SectionQuery, SectionResponse,
    },
    error::Result,
    services::section_service::SectionRequest,
    AppState,
};

#[utoipa::path(
    get,
    path = "/api/home/sections",
    params(
        ("take_techs" = Option<i64>, Query, description = "Technologies per category (1-12, default 6)"),
        ("location" = Option<String>, Query, description = "Single location"),
        ("remote" = Option<bool>, Query, description = "Remote flag")
    ),
    responses(
        (status = 200, description = "Category sections", body = [SectionResponse])
    )
)]
#[axum::debug_handler]
pub async fn home_sections(
    State(state): State<AppState>,
    Query(query): Query<SectionQuery>,
) -> Result<impl IntoResponse> {
    query.validate()?;
    let token = state.shutdown.child_token();
    let request = SectionRequest::from(query);
    let sections = state.section_service.sections(&request, &token).await?;
    let body: Vec<SectionResponse> = sections.into_iter().map(Into::into).collect();
    Ok(Json(body))
}

#[utoipa::path(
    get,
    path = "/api/companies/aggregates",
    params(
        ("only_active" = Option<bool>, Query, description = "Only active companies (default true)")
    ),
    responses(
        (status = 200, description = "Company size and location histograms", body = Json<CompanyAggregatesResponse>)
    )
)]
#[axum::debug_handler]
pub async fn company_aggregates(
    State(state): State<AppState>,
    Query(query): Query<CompanyAggregatesQuery>,
) -> Result<impl IntoResponse> {
    let token = state.shutdown.child_token();
    let aggregates = state
        .company_stats_service
        .aggregates(query.only_active.unwrap_or(true), &token)
        .await?;
    Ok(Json(CompanyAggregatesResponse::from(aggregates)))
}
