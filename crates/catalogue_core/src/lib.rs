//! Core domain logic for the product catalogue.
//! This crate owns the store contract, connection lifecycle and read use-cases.

pub mod config;
pub mod db;
pub mod loader;
pub mod logging;
pub mod model;
pub mod search;
pub mod service;
pub mod store;
pub mod supervisor;

pub use config::{ConfigError, ServiceConfig};
pub use loader::{load_products, LoadError};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::product::{Product, ProductValidationError, Sku};
pub use service::catalogue_service::{
    CatalogueError, CatalogueResult, CatalogueService, NotFound,
};
pub use store::{
    ConnectError, MemoryConnector, MemoryProductStore, ProductStore, SqliteConnector,
    SqliteProductStore, StoreConnector, StoreError, StoreResult,
};
pub use supervisor::{
    ConnectionState, ConnectionSupervisor, StoreHandle, DEFAULT_RETRY_BACKOFF,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
