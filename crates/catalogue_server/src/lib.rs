//! HTTP surface for the product catalogue.

pub mod http;

pub use http::{build_router, AppState};
