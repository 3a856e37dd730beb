mod common;

use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use jobboard_backend::app;
use serde_json::Value as JsonValue;
use tower::ServiceExt;

use common::{app_state, company_with, scenario};

async fn get(router: &Router, uri: &str) -> (StatusCode, JsonValue) {
    let response = router
        .clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() {
        JsonValue::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

fn router() -> Router {
    app(app_state(scenario().store), 100)
}

#[tokio::test]
async fn health_is_ok() {
    let (status, body) = get(&router(), "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn search_filters_by_location() {
    let (status, body) = get(&router(), "/api/jobs?locations=Sofia").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total_items"], 1);
    assert_eq!(body["total_pages"], 1);
    assert_eq!(body["items"][0]["title"], "Frontend Engineer");
    assert_eq!(body["items"][0]["company_name"], "Acme");
    assert_eq!(body["items"][0]["salary_min"], 3000);
    assert_eq!(body["items"][0]["technologies"][0]["slug"], "react");
}

#[tokio::test]
async fn search_combines_location_and_remote() {
    let (status, body) = get(&router(), "/api/jobs?locations=Varna&remote=true&sort=deadline").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total_items"], 2);
}

#[tokio::test]
async fn search_clamps_page_size() {
    let (status, body) = get(&router(), "/api/jobs?page_size=500&page=0").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["page_size"], 50);
    assert_eq!(body["page"], 1);
    assert_eq!(body["total_items"], 3);
}

#[tokio::test]
async fn overlong_query_is_rejected() {
    let q = "x".repeat(201);
    let (status, body) = get(&router(), &format!("/api/jobs?q={}", q)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn facets_exclude_own_dimension() {
    let (status, body) = get(&router(), "/api/jobs/facets?locations=Sofia").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["locations"].as_array().map(Vec::len), Some(3));
    assert_eq!(body["job_types"][0]["value"], "Full-time");
    assert_eq!(body["job_types"][0]["count"], 1);
    assert_eq!(body["salary_range"]["min"], 3000);
}

#[tokio::test]
async fn home_sections_respond() {
    let (status, body) = get(&router(), "/api/home/sections?take_techs=3").await;
    assert_eq!(status, StatusCode::OK);
    // The scenario has no categories.
    assert_eq!(body.as_array().map(Vec::len), Some(0));
}

#[tokio::test]
async fn company_aggregates_default_to_active_only() {
    let store = scenario()
        .store
        .with_company(company_with(Some("Varna"), Some("15"), true))
        .with_company(company_with(Some("Ruse"), Some("200"), false));
    let router = app(app_state(store), 100);

    let (status, body) = get(&router, "/api/companies/aggregates").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["size_histogram"].as_array().map(Vec::len), Some(4));
    assert_eq!(body["size_histogram"][1]["bucket"], "small");
    assert_eq!(body["size_histogram"][1]["count"], 1);
    assert_eq!(body["size_histogram"][3]["count"], 0);
    assert_eq!(body["location_histogram"][0]["value"], "Varna");

    let (_, body) = get(&router, "/api/companies/aggregates?only_active=false").await;
    assert_eq!(body["size_histogram"][3]["count"], 1);
    assert_eq!(body["location_histogram"].as_array().map(Vec::len), Some(2));
}

#[tokio::test]
async fn public_routes_are_rate_limited() {
    let router = app(app_state(scenario().store), 1);

    let (first, _) = get(&router, "/api/jobs").await;
    assert_eq!(first, StatusCode::OK);
    let (second, body) = get(&router, "/api/jobs").await;
    assert_eq!(second, StatusCode::TOO_MANY_REQUESTS);
    assert!(body["error"].is_string());

    let (health, _) = get(&router, "/health").await;
    assert_eq!(health, StatusCode::OK);
}
