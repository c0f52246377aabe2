//! HTTP routing for catalogue reads.
//!
//! # Responsibility
//! - Map `GET` routes onto [`CatalogueService`] operations.
//! - Attach permissive CORS and `Timing-Allow-Origin` headers to every response.
//! - Log every non-health request as one `http_request` event.
//!
//! # Invariants
//! - `/health` answers 200 whatever the store state.
//! - Every other route short-circuits with 500 while the store is disconnected.

mod error;
mod handlers;
mod request_log;

use axum::http::{HeaderName, HeaderValue};
use axum::routing::get;
use axum::{middleware, Router};
use catalogue_core::CatalogueService;
use tower_http::cors::CorsLayer;
use tower_http::set_header::SetResponseHeaderLayer;

pub use error::ApiError;

pub(crate) const HEALTH_PATH: &str = "/health";

/// Shared handler state.
#[derive(Debug, Clone)]
pub struct AppState {
    pub catalogue: CatalogueService,
}

impl AppState {
    pub fn new(catalogue: CatalogueService) -> Self {
        Self { catalogue }
    }
}

/// Builds the catalogue router with logging and header middleware.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(HEALTH_PATH, get(handlers::health))
        .route("/products", get(handlers::list_products))
        .route("/product/:sku", get(handlers::get_product))
        .route("/products/:cat", get(handlers::list_products_by_category))
        .route("/categories", get(handlers::list_categories))
        .route("/search", get(handlers::search_all))
        .route("/search/:text", get(handlers::search_text))
        .fallback(handlers::route_not_found)
        .layer(middleware::from_fn(request_log::log_request))
        .layer(SetResponseHeaderLayer::overriding(
            HeaderName::from_static("timing-allow-origin"),
            HeaderValue::from_static("*"),
        ))
        .layer(CorsLayer::permissive())
        .with_state(state)
}
