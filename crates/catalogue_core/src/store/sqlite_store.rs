//! SQLite document store.
//!
//! # Responsibility
//! - Serve product documents from a read-only SQLite store.
//! - Run blocking SQLite calls off the async scheduler.
//!
//! # Invariants
//! - One connection per store, serialized behind a mutex.
//! - Returned documents are decoded from `products.document` verbatim.

use super::{ConnectError, ProductStore, StoreConnector, StoreError, StoreResult};
use crate::db::open_db_read_only;
use crate::model::product::Product;
use crate::search::fts::{parse_document_row, search_products};
use async_trait::async_trait;
use rusqlite::{params, Connection, ToSql};
use std::sync::{Arc, Mutex};

const FIND_ALL_SQL: &str = "SELECT document FROM products ORDER BY seq ASC";

const FIND_BY_SKU_SQL: &str = "SELECT document FROM products WHERE sku = ?1";

const FIND_BY_CATEGORY_SQL: &str = "SELECT products.document AS document
     FROM products
     WHERE EXISTS (
        SELECT 1
        FROM product_categories
        WHERE product_categories.sku = products.sku
          AND product_categories.category = ?1
     )
     ORDER BY products.name ASC, products.seq ASC";

const DISTINCT_CATEGORIES_SQL: &str =
    "SELECT DISTINCT category FROM product_categories ORDER BY category ASC";

/// Product store backed by one SQLite connection.
pub struct SqliteProductStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteProductStore {
    /// Wraps an already opened connection.
    pub fn new(conn: Connection) -> Self {
        Self {
            conn: Arc::new(Mutex::new(conn)),
        }
    }

    async fn run<T, F>(&self, query: F) -> StoreResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&Connection) -> StoreResult<T> + Send + 'static,
    {
        let conn = Arc::clone(&self.conn);
        tokio::task::spawn_blocking(move || {
            let guard = conn
                .lock()
                .map_err(|_| StoreError::Worker("store connection mutex poisoned".to_string()))?;
            query(&guard)
        })
        .await
        .map_err(|err| StoreError::Worker(err.to_string()))?
    }
}

#[async_trait]
impl ProductStore for SqliteProductStore {
    async fn find_all(&self) -> StoreResult<Vec<Product>> {
        self.run(|conn| query_documents(conn, FIND_ALL_SQL, &[])).await
    }

    async fn find_by_sku(&self, sku: &str) -> StoreResult<Option<Product>> {
        let sku = sku.to_string();
        self.run(move |conn| {
            let mut stmt = conn.prepare(FIND_BY_SKU_SQL)?;
            let mut rows = stmt.query(params![sku])?;
            match rows.next()? {
                Some(row) => Ok(Some(parse_document_row(row)?)),
                None => Ok(None),
            }
        })
        .await
    }

    async fn find_by_category_sorted_by_name(&self, category: &str) -> StoreResult<Vec<Product>> {
        let category = category.to_string();
        self.run(move |conn| {
            query_documents(conn, FIND_BY_CATEGORY_SQL, &[&category as &dyn ToSql])
        })
        .await
    }

    async fn distinct_categories(&self) -> StoreResult<Vec<String>> {
        self.run(|conn| {
            let mut stmt = conn.prepare(DISTINCT_CATEGORIES_SQL)?;
            let categories = stmt
                .query_map([], |row| row.get::<_, String>(0))?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(categories)
        })
        .await
    }

    async fn text_search(&self, text: &str) -> StoreResult<Vec<Product>> {
        let text = text.to_string();
        self.run(move |conn| search_products(conn, &text)).await
    }
}

fn query_documents(
    conn: &Connection,
    sql: &str,
    bind: &[&dyn ToSql],
) -> StoreResult<Vec<Product>> {
    let mut stmt = conn.prepare(sql)?;
    let mut rows = stmt.query(bind)?;
    let mut products = Vec::new();
    while let Some(row) = rows.next()? {
        products.push(parse_document_row(row)?);
    }
    Ok(products)
}

/// Connects by opening the target store file read-only.
#[derive(Debug, Clone, Copy, Default)]
pub struct SqliteConnector;

#[async_trait]
impl StoreConnector for SqliteConnector {
    async fn connect(&self, target: &str) -> Result<Arc<dyn ProductStore>, ConnectError> {
        let target = target.to_string();
        let conn = tokio::task::spawn_blocking(move || open_db_read_only(&target))
            .await
            .map_err(|err| ConnectError::Worker(err.to_string()))??;
        Ok(Arc::new(SqliteProductStore::new(conn)))
    }
}
