//! # Routes
//!
//! Axum router configuration for the storefront.

use crate::handlers;
use crate::state::AppState;
use axum::{
    routing::{any, get},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

/// Create the main application router
///
/// Routes:
/// - Pages:
///   - GET /               - Catalog
///   - GET /products/{id}  - Product detail (307 to / when unavailable)
///   - GET /success        - Purchase confirmation
///
/// - API:
///   - ANY /api/checkout   - Create checkout session (POST only, 405 otherwise)
///   - GET /health         - Health check
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let page_routes = Router::new()
        .route("/", get(handlers::catalog_page))
        .route("/products/{product_id}", get(handlers::product_page))
        .route("/success", get(handlers::success_page));

    let api_routes = Router::new().route("/checkout", any(handlers::create_checkout));

    Router::new()
        .merge(page_routes)
        .nest("/api", api_routes)
        .route("/health", get(handlers::health))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(state)
}
