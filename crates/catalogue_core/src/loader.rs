//! Writer-side product loading.
//!
//! # Responsibility
//! - Upsert product documents and their derived category rows.
//! - Keep the text index in sync through the schema triggers.
//!
//! # Invariants
//! - Every document is validated before any row is written.
//! - A batch is applied in one transaction; a failure leaves the store unchanged.
//! - Reloading a known `sku` keeps its storage position.

use crate::db::DbError;
use crate::model::product::{Product, ProductValidationError};
use log::info;
use rusqlite::{params, Connection};
use std::error::Error;
use std::fmt::{Display, Formatter};

const UPSERT_PRODUCT_SQL: &str = "INSERT INTO products (sku, name, description, document)
     VALUES (?1, ?2, ?3, ?4)
     ON CONFLICT (sku) DO UPDATE SET
        name = excluded.name,
        description = excluded.description,
        document = excluded.document";

#[derive(Debug)]
pub enum LoadError {
    Validation(ProductValidationError),
    Encode(serde_json::Error),
    Db(DbError),
}

impl Display for LoadError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Encode(err) => write!(f, "failed to encode product document: {err}"),
            Self::Db(err) => write!(f, "{err}"),
        }
    }
}

impl Error for LoadError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Encode(err) => Some(err),
            Self::Db(err) => Some(err),
        }
    }
}

impl From<ProductValidationError> for LoadError {
    fn from(value: ProductValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<rusqlite::Error> for LoadError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Upserts `products` into a migrated writer connection.
///
/// Returns the number of documents written.
pub fn load_products(conn: &mut Connection, products: &[Product]) -> Result<usize, LoadError> {
    for product in products {
        product.validate()?;
    }

    let tx = conn.transaction()?;
    {
        let mut upsert = tx.prepare(UPSERT_PRODUCT_SQL)?;
        let mut clear_categories =
            tx.prepare("DELETE FROM product_categories WHERE sku = ?1")?;
        let mut insert_category = tx.prepare(
            "INSERT INTO product_categories (sku, position, category) VALUES (?1, ?2, ?3)",
        )?;

        for product in products {
            let document = serde_json::to_string(product).map_err(LoadError::Encode)?;
            upsert.execute(params![
                product.sku,
                product.name,
                product.description(),
                document
            ])?;
            clear_categories.execute(params![product.sku])?;
            for (position, category) in product.categories.iter().enumerate() {
                insert_category.execute(params![product.sku, position as i64, category])?;
            }
        }
    }
    tx.commit()?;

    info!(
        "event=products_load module=loader status=ok count={}",
        products.len()
    );
    Ok(products.len())
}
