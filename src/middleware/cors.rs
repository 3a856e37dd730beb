use axum::http::Method;
use tower_http::cors::{Any, CorsLayer};

/// The search API is read-only and public.
pub fn public_read_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers(Any)
        .allow_origin(Any)
}
