pub mod config;
pub mod database;
pub mod dto;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod utils;

use std::sync::Arc;

use axum::{routing::get, Router};
use sqlx::PgPool;
use tokio_util::sync::CancellationToken;
use tower_http::{compression::CompressionLayer, trace::TraceLayer};

use crate::config::EngineSettings;
use crate::database::{pg_store::PgStore, store::JobBoardStore};
use crate::services::{
    company_stats_service::CompanyStatsService, facet_service::FacetService,
    search_service::SearchService, section_service::SectionService,
};

#[derive(Clone)]
pub struct AppState {
    pub search_service: SearchService,
    pub facet_service: FacetService,
    pub section_service: SectionService,
    pub company_stats_service: CompanyStatsService,
    /// Parent of every per-request token; cancelled on shutdown.
    pub shutdown: CancellationToken,
}

impl AppState {
    pub fn new(pool: PgPool) -> error::Result<Self> {
        let config = crate::config::get_config();
        let settings = EngineSettings::from_config(config)?;
        Ok(Self::with_store(Arc::new(PgStore::new(pool)), settings))
    }

    pub fn with_store(store: Arc<dyn JobBoardStore>, settings: EngineSettings) -> Self {
        let settings = Arc::new(settings);

        Self {
            search_service: SearchService::new(store.clone(), settings.clone()),
            facet_service: FacetService::new(store.clone(), settings.clone()),
            section_service: SectionService::new(store.clone(), settings.clone()),
            company_stats_service: CompanyStatsService::new(store, settings),
            shutdown: CancellationToken::new(),
        }
    }
}

pub fn app(state: AppState, public_rps: u32) -> Router {
    let public_api = Router::new()
        .route("/api/jobs", get(routes::jobs::search_jobs))
        .route("/api/jobs/facets", get(routes::jobs::job_facets))
        .route("/api/home/sections", get(routes::home::home_sections))
        .route(
            "/api/companies/aggregates",
            get(routes::home::company_aggregates),
        )
        .layer(axum::middleware::from_fn_with_state(
            middleware::rate_limit::RateLimiter::per_second(public_rps),
            middleware::rate_limit::rate_limit,
        ));

    Router::new()
        .route("/health", get(routes::health::health))
        .merge(public_api)
        .with_state(state)
        .layer(middleware::cors::public_read_cors())
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
}
