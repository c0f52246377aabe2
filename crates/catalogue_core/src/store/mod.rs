//! Store client contracts and implementations.
//!
//! # Responsibility
//! - Define the collection-level read operations the catalogue needs.
//! - Define how a store is reached from a connection string.
//! - Keep SQL and document decoding behind the [`ProductStore`] boundary.
//!
//! # Invariants
//! - Store operations are read-only.
//! - Query failures are reported as [`StoreError`], never as empty results.

use crate::db::DbError;
use crate::model::product::Product;
use async_trait::async_trait;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::Arc;

mod memory_store;
mod sqlite_store;

pub use memory_store::{MemoryConnector, MemoryProductStore};
pub use sqlite_store::{SqliteConnector, SqliteProductStore};

pub type StoreResult<T> = Result<T, StoreError>;

/// Failure of a single store query.
#[derive(Debug)]
pub enum StoreError {
    Db(DbError),
    /// A persisted document could not be decoded.
    InvalidData(String),
    /// The text index rejected the query expression.
    InvalidQuery { query: String, message: String },
    /// The blocking worker running the query panicked or was cancelled.
    Worker(String),
    /// Backend-reported failure without a more specific shape.
    Backend(String),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::InvalidData(message) => write!(f, "invalid persisted product data: {message}"),
            Self::InvalidQuery { query, message } => {
                write!(f, "invalid full-text query `{query}`: {message}")
            }
            Self::Worker(message) => write!(f, "store worker failed: {message}"),
            Self::Backend(message) => write!(f, "store backend failed: {message}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DbError> for StoreError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Failure of a single connection attempt.
#[derive(Debug)]
pub enum ConnectError {
    Db(DbError),
    Worker(String),
    /// The store refused the connection (unreachable, not provisioned, ...).
    Refused(String),
}

impl Display for ConnectError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::Worker(message) => write!(f, "connect worker failed: {message}"),
            Self::Refused(message) => write!(f, "connection refused: {message}"),
        }
    }
}

impl Error for ConnectError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DbError> for ConnectError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

/// Read operations over the product collection.
#[async_trait]
pub trait ProductStore: Send + Sync {
    /// Full scan in storage order.
    async fn find_all(&self) -> StoreResult<Vec<Product>>;
    /// Exact match on `sku`.
    async fn find_by_sku(&self, sku: &str) -> StoreResult<Option<Product>>;
    /// Products whose `categories` contain `category`, ascending by `name`.
    async fn find_by_category_sorted_by_name(&self, category: &str) -> StoreResult<Vec<Product>>;
    /// Distinct values of `categories` across all products.
    async fn distinct_categories(&self) -> StoreResult<Vec<String>>;
    /// Text-index search over product content.
    async fn text_search(&self, text: &str) -> StoreResult<Vec<Product>>;
}

/// Opens a [`ProductStore`] from a connection string.
#[async_trait]
pub trait StoreConnector: Send + Sync {
    async fn connect(&self, target: &str) -> Result<Arc<dyn ProductStore>, ConnectError>;
}
