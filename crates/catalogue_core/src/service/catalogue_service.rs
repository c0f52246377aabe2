//! Catalogue query use-cases.
//!
//! # Responsibility
//! - Provide the read operations served by the HTTP surface.
//! - Gate every operation on store connectivity.
//!
//! # Invariants
//! - No query is issued while the store handle is disconnected.
//! - `list_by_category` reports zero matches as `NotFound`; `search_text`
//!   reports zero matches as an empty success.
//! - Blank search text is equivalent to `list_all`.

use crate::model::product::Product;
use crate::store::{ProductStore, StoreError};
use crate::supervisor::{ConnectionState, StoreHandle};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::Arc;

pub type CatalogueResult<T> = Result<T, CatalogueError>;

/// What a `NotFound` outcome was looking for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotFound {
    Sku(String),
    /// The category matched no products.
    Category(String),
}

/// Failure taxonomy of catalogue operations.
#[derive(Debug)]
pub enum CatalogueError {
    /// The store is not connected yet.
    DependencyUnavailable,
    NotFound(NotFound),
    /// The store call itself failed.
    QueryFailed(StoreError),
}

impl CatalogueError {
    /// Stable tag used in structured log events.
    pub fn error_type(&self) -> &'static str {
        match self {
            Self::DependencyUnavailable => "dependency_down",
            Self::NotFound(_) => "not_found",
            Self::QueryFailed(_) => "query_failed",
        }
    }
}

impl Display for CatalogueError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DependencyUnavailable => write!(f, "product store is not connected"),
            Self::NotFound(NotFound::Sku(sku)) => write!(f, "sku not found: {sku}"),
            Self::NotFound(NotFound::Category(category)) => {
                write!(f, "no products for category: {category}")
            }
            Self::QueryFailed(err) => write!(f, "product query failed: {err}"),
        }
    }
}

impl Error for CatalogueError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::QueryFailed(err) => Some(err),
            _ => None,
        }
    }
}

impl From<StoreError> for CatalogueError {
    fn from(value: StoreError) -> Self {
        Self::QueryFailed(value)
    }
}

/// Read-only catalogue service over a shared store handle.
#[derive(Debug, Clone)]
pub struct CatalogueService {
    handle: StoreHandle,
}

impl CatalogueService {
    pub fn new(handle: StoreHandle) -> Self {
        Self { handle }
    }

    pub fn connection_state(&self) -> ConnectionState {
        self.handle.state()
    }

    /// Lists every product in storage order.
    pub async fn list_all(&self) -> CatalogueResult<Vec<Product>> {
        let store = self.ready_store()?;
        Ok(store.find_all().await?)
    }

    /// Gets one product by exact `sku`.
    pub async fn get_by_sku(&self, sku: &str) -> CatalogueResult<Product> {
        let store = self.ready_store()?;
        store
            .find_by_sku(sku)
            .await?
            .ok_or_else(|| CatalogueError::NotFound(NotFound::Sku(sku.to_string())))
    }

    /// Lists products in `category`, ascending by name.
    ///
    /// # Contract
    /// - Zero matches is `NotFound(NotFound::Category)`, not an empty list.
    pub async fn list_by_category(&self, category: &str) -> CatalogueResult<Vec<Product>> {
        let store = self.ready_store()?;
        let products = store.find_by_category_sorted_by_name(category).await?;
        if products.is_empty() {
            return Err(CatalogueError::NotFound(NotFound::Category(
                category.to_string(),
            )));
        }
        Ok(products)
    }

    /// Lists distinct category names. Order is unspecified.
    pub async fn list_categories(&self) -> CatalogueResult<Vec<String>> {
        let store = self.ready_store()?;
        Ok(store.distinct_categories().await?)
    }

    /// Searches product content.
    ///
    /// # Contract
    /// - `None` or blank text lists all products.
    /// - Zero matches is an empty success.
    pub async fn search_text(&self, text: Option<&str>) -> CatalogueResult<Vec<Product>> {
        let store = self.ready_store()?;
        match text.map(str::trim).filter(|text| !text.is_empty()) {
            Some(text) => Ok(store.text_search(text).await?),
            None => Ok(store.find_all().await?),
        }
    }

    fn ready_store(&self) -> CatalogueResult<Arc<dyn ProductStore>> {
        self.handle
            .store()
            .ok_or(CatalogueError::DependencyUnavailable)
    }
}

#[cfg(test)]
mod tests {
    use super::{CatalogueError, CatalogueService, NotFound};
    use crate::model::product::Product;
    use crate::store::{MemoryProductStore, ProductStore};
    use crate::supervisor::StoreHandle;
    use std::collections::HashSet;
    use std::sync::Arc;

    fn two_products() -> Arc<MemoryProductStore> {
        Arc::new(MemoryProductStore::new(vec![
            Product::new("sku1", "Robot", ["cat1"]).with_attribute("description", "tin robot"),
            Product::new("sku2", "Kite", ["cat2"]).with_attribute("description", "paper kite"),
        ]))
    }

    fn connected(store: &Arc<MemoryProductStore>) -> CatalogueService {
        CatalogueService::new(StoreHandle::connected(
            Arc::clone(store) as Arc<dyn ProductStore>
        ))
    }

    #[tokio::test]
    async fn disconnected_service_issues_no_queries() {
        let service = CatalogueService::new(StoreHandle::new());

        assert!(matches!(
            service.list_all().await,
            Err(CatalogueError::DependencyUnavailable)
        ));
        assert!(matches!(
            service.get_by_sku("sku1").await,
            Err(CatalogueError::DependencyUnavailable)
        ));
        assert!(matches!(
            service.list_by_category("cat1").await,
            Err(CatalogueError::DependencyUnavailable)
        ));
        assert!(matches!(
            service.list_categories().await,
            Err(CatalogueError::DependencyUnavailable)
        ));
        assert!(matches!(
            service.search_text(Some("robot")).await,
            Err(CatalogueError::DependencyUnavailable)
        ));
    }

    #[tokio::test]
    async fn get_by_sku_returns_record_or_not_found() {
        let store = two_products();
        let service = connected(&store);

        let product = service.get_by_sku("sku1").await.unwrap();
        assert_eq!(product.sku, "sku1");

        let err = service.get_by_sku("missing").await.unwrap_err();
        assert!(matches!(err, CatalogueError::NotFound(NotFound::Sku(sku)) if sku == "missing"));
    }

    #[tokio::test]
    async fn empty_category_is_not_found_but_empty_search_is_success() {
        let store = two_products();
        let service = connected(&store);

        let one = service.list_by_category("cat1").await.unwrap();
        assert_eq!(one.len(), 1);
        assert_eq!(one[0].sku, "sku1");

        let err = service.list_by_category("nope").await.unwrap_err();
        assert_eq!(err.error_type(), "not_found");

        assert!(service.search_text(Some("zeppelin")).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn blank_search_is_list_all() {
        let store = two_products();
        let service = connected(&store);

        let all = service.list_all().await.unwrap();
        assert_eq!(service.search_text(None).await.unwrap(), all);
        assert_eq!(service.search_text(Some("  ")).await.unwrap(), all);
        assert_eq!(all.len(), 2);
    }

    #[tokio::test]
    async fn categories_are_distinct() {
        let store = two_products();
        let service = connected(&store);

        let categories = service
            .list_categories()
            .await
            .unwrap()
            .into_iter()
            .collect::<HashSet<_>>();
        assert_eq!(
            categories,
            HashSet::from(["cat1".to_string(), "cat2".to_string()])
        );
    }

    #[tokio::test]
    async fn store_failures_surface_as_query_failed() {
        let store = two_products();
        let service = connected(&store);
        store.set_failing(true);

        let err = service.list_categories().await.unwrap_err();
        assert!(matches!(err, CatalogueError::QueryFailed(_)));
        assert_eq!(err.error_type(), "query_failed");
    }
}
