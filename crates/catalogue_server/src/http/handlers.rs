//! Route handlers.
//!
//! # HTTP contract
//! - `GET` only; success bodies are JSON.
//! - Failures are converted by [`ApiError`] into plain-text bodies.

use super::error::ApiError;
use super::request_log::RequestFailure;
use super::AppState;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use catalogue_core::Product;
use log::Level;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub(crate) struct HealthBody {
    app: &'static str,
    /// Store connectivity. Named for compatibility with existing probes.
    mongo: bool,
}

pub(crate) async fn health(State(state): State<AppState>) -> Json<HealthBody> {
    Json(HealthBody {
        app: "OK",
        mongo: state.catalogue.connection_state().is_connected(),
    })
}

pub(crate) async fn list_products(
    State(state): State<AppState>,
) -> Result<Json<Vec<Product>>, ApiError> {
    let products = state.catalogue.list_all().await?;
    Ok(Json(products))
}

pub(crate) async fn get_product(
    State(state): State<AppState>,
    Path(sku): Path<String>,
) -> Result<Json<Product>, ApiError> {
    let product = state
        .catalogue
        .get_by_sku(&sku)
        .await
        .map_err(|err| ApiError::from(err).with_context("sku", &sku))?;
    Ok(Json(product))
}

pub(crate) async fn list_products_by_category(
    State(state): State<AppState>,
    Path(category): Path<String>,
) -> Result<Json<Vec<Product>>, ApiError> {
    let products = state
        .catalogue
        .list_by_category(&category)
        .await
        .map_err(|err| ApiError::from(err).with_context("category", &category))?;
    Ok(Json(products))
}

pub(crate) async fn list_categories(
    State(state): State<AppState>,
) -> Result<Json<Vec<String>>, ApiError> {
    let categories = state.catalogue.list_categories().await?;
    Ok(Json(categories))
}

pub(crate) async fn search_all(
    State(state): State<AppState>,
) -> Result<Json<Vec<Product>>, ApiError> {
    let products = state.catalogue.search_text(None).await?;
    Ok(Json(products))
}

pub(crate) async fn search_text(
    State(state): State<AppState>,
    Path(text): Path<String>,
) -> Result<Json<Vec<Product>>, ApiError> {
    let products = state
        .catalogue
        .search_text(Some(&text))
        .await
        .map_err(|err| ApiError::from(err).with_context("query", &text))?;
    Ok(Json(products))
}

pub(crate) async fn route_not_found() -> Response {
    let mut response = (StatusCode::NOT_FOUND, "Not found").into_response();
    response.extensions_mut().insert(RequestFailure {
        level: Level::Warn,
        error_type: "route_not_found",
        fields: Vec::new(),
    });
    response
}
