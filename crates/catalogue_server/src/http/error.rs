//! Catalogue error to HTTP response mapping.
//!
//! # Invariants
//! - Store causes go to the log only, never into a response body.
//! - `DependencyUnavailable` and `QueryFailed` are 500; `NotFound` is 404.

use super::request_log::RequestFailure;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use catalogue_core::logging::sanitize_message;
use catalogue_core::{CatalogueError, NotFound};
use log::Level;

const MAX_LOGGED_VALUE_CHARS: usize = 200;

/// Handler failure plus the request context to log with it.
#[derive(Debug)]
pub struct ApiError {
    error: CatalogueError,
    context: Vec<(&'static str, String)>,
}

impl ApiError {
    /// Adds a contextual log field such as `sku` or `category`.
    pub fn with_context(mut self, key: &'static str, value: &str) -> Self {
        self.context
            .push((key, sanitize_message(value, MAX_LOGGED_VALUE_CHARS)));
        self
    }
}

impl From<CatalogueError> for ApiError {
    fn from(error: CatalogueError) -> Self {
        Self {
            error,
            context: Vec::new(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let error_type = self.error.error_type();
        let mut fields = self.context;

        let (status, body, level) = match &self.error {
            CatalogueError::DependencyUnavailable => {
                fields.push(("dependency", "store".to_string()));
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "database not available".to_string(),
                    Level::Error,
                )
            }
            CatalogueError::NotFound(NotFound::Sku(_)) => {
                (StatusCode::NOT_FOUND, "SKU not found".to_string(), Level::Warn)
            }
            CatalogueError::NotFound(NotFound::Category(category)) => (
                StatusCode::NOT_FOUND,
                format!("No products for {category}"),
                Level::Warn,
            ),
            CatalogueError::QueryFailed(cause) => {
                fields.push((
                    "cause",
                    sanitize_message(&cause.to_string(), MAX_LOGGED_VALUE_CHARS),
                ));
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal error".to_string(),
                    Level::Error,
                )
            }
        };

        let mut response = (status, body).into_response();
        response.extensions_mut().insert(RequestFailure {
            level,
            error_type,
            fields,
        });
        response
    }
}
