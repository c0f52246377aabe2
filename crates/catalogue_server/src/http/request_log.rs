//! Per-request structured logging.
//!
//! Handlers describe failures by attaching a [`RequestFailure`] extension to
//! the response; the middleware folds it into a single `http_request` event.

use super::HEALTH_PATH;
use axum::extract::Request;
use axum::middleware::Next;
use axum::response::Response;
use log::{info, log, Level};
use std::time::Instant;

/// Failure details logged alongside the request line.
#[derive(Debug, Clone)]
pub(crate) struct RequestFailure {
    pub(crate) level: Level,
    pub(crate) error_type: &'static str,
    pub(crate) fields: Vec<(&'static str, String)>,
}

impl RequestFailure {
    fn render_fields(&self) -> String {
        self.fields
            .iter()
            .map(|(key, value)| format!(" {key}={value}"))
            .collect()
    }
}

pub(crate) async fn log_request(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let started_at = Instant::now();

    let response = next.run(request).await;
    if path == HEALTH_PATH {
        return response;
    }

    let http_status = response.status().as_u16();
    let duration_ms = started_at.elapsed().as_millis();
    match response.extensions().get::<RequestFailure>() {
        Some(failure) => log!(
            failure.level,
            "event=http_request module=http status=error method={method} path={path} http_status={http_status} duration_ms={duration_ms} error_type={}{}",
            failure.error_type,
            failure.render_fields()
        ),
        None => info!(
            "event=http_request module=http status=ok method={method} path={path} http_status={http_status} duration_ms={duration_ms}"
        ),
    }
    response
}
