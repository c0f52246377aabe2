//! In-memory product store.
//!
//! Used by tests and local demos in place of a real store. Queries follow
//! the same contract as the SQLite store: storage order for scans, name
//! order for category filters, any-term matching for text search.

use super::{ConnectError, ProductStore, StoreConnector, StoreError, StoreResult};
use crate::model::product::Product;
use async_trait::async_trait;
use std::collections::BTreeSet;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

/// Product store holding documents in insertion order.
#[derive(Debug, Default)]
pub struct MemoryProductStore {
    products: Vec<Product>,
    fail_queries: AtomicBool,
    queries: AtomicUsize,
}

impl MemoryProductStore {
    pub fn new(products: Vec<Product>) -> Self {
        Self {
            products,
            fail_queries: AtomicBool::new(false),
            queries: AtomicUsize::new(0),
        }
    }

    /// Makes every following query fail with [`StoreError::Backend`].
    pub fn set_failing(&self, failing: bool) {
        self.fail_queries.store(failing, Ordering::SeqCst);
    }

    /// Number of queries issued against this store so far.
    pub fn query_count(&self) -> usize {
        self.queries.load(Ordering::SeqCst)
    }

    fn begin_query(&self) -> StoreResult<()> {
        self.queries.fetch_add(1, Ordering::SeqCst);
        if self.fail_queries.load(Ordering::SeqCst) {
            return Err(StoreError::Backend("memory store is failing".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl ProductStore for MemoryProductStore {
    async fn find_all(&self) -> StoreResult<Vec<Product>> {
        self.begin_query()?;
        Ok(self.products.clone())
    }

    async fn find_by_sku(&self, sku: &str) -> StoreResult<Option<Product>> {
        self.begin_query()?;
        Ok(self.products.iter().find(|product| product.sku == sku).cloned())
    }

    async fn find_by_category_sorted_by_name(&self, category: &str) -> StoreResult<Vec<Product>> {
        self.begin_query()?;
        let mut matches = self
            .products
            .iter()
            .filter(|product| product.has_category(category))
            .cloned()
            .collect::<Vec<_>>();
        // Stable sort keeps storage order among equal names.
        matches.sort_by(|left, right| left.name.cmp(&right.name));
        Ok(matches)
    }

    async fn distinct_categories(&self) -> StoreResult<Vec<String>> {
        self.begin_query()?;
        let categories = self
            .products
            .iter()
            .flat_map(|product| product.categories.iter().cloned())
            .collect::<BTreeSet<_>>();
        Ok(categories.into_iter().collect())
    }

    async fn text_search(&self, text: &str) -> StoreResult<Vec<Product>> {
        self.begin_query()?;
        let phrases = text
            .split_whitespace()
            .map(tokenize)
            .filter(|phrase| !phrase.is_empty())
            .collect::<Vec<_>>();
        if phrases.is_empty() {
            return Ok(Vec::new());
        }

        Ok(self
            .products
            .iter()
            .filter(|product| {
                let fields = indexed_fields(product);
                phrases.iter().any(|phrase| {
                    fields.iter().any(|tokens| {
                        tokens
                            .windows(phrase.len())
                            .any(|run| run == phrase.as_slice())
                    })
                })
            })
            .cloned()
            .collect())
    }
}

/// Splits on non-alphanumerics and lowercases, so `tin-robot` becomes the
/// phrase `tin robot` as it does in the full-text index.
fn tokenize(text: &str) -> Vec<String> {
    text.split(|ch: char| !ch.is_alphanumeric())
        .filter(|word| !word.is_empty())
        .map(str::to_lowercase)
        .collect()
}

/// Token runs per indexed field; phrases never span fields.
fn indexed_fields(product: &Product) -> Vec<Vec<String>> {
    let mut fields = vec![tokenize(&product.name)];
    if let Some(description) = product.description() {
        fields.push(tokenize(description));
    }
    fields
}

/// Connector handing out one shared [`MemoryProductStore`].
///
/// Can be told to refuse a number of attempts first, to exercise retry paths.
#[derive(Debug)]
pub struct MemoryConnector {
    store: Arc<MemoryProductStore>,
    refusals_left: AtomicUsize,
    attempts: AtomicUsize,
}

impl MemoryConnector {
    pub fn new(store: Arc<MemoryProductStore>) -> Self {
        Self {
            store,
            refusals_left: AtomicUsize::new(0),
            attempts: AtomicUsize::new(0),
        }
    }

    /// Refuses the first `count` connection attempts.
    pub fn refusing_first(self, count: usize) -> Self {
        self.refusals_left.store(count, Ordering::SeqCst);
        self
    }

    /// Number of connection attempts seen so far.
    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl StoreConnector for MemoryConnector {
    async fn connect(&self, target: &str) -> Result<Arc<dyn ProductStore>, ConnectError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        let refused = self
            .refusals_left
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |left| left.checked_sub(1))
            .is_ok();
        if refused {
            return Err(ConnectError::Refused(format!("{target} is not reachable")));
        }
        Ok(Arc::clone(&self.store) as Arc<dyn ProductStore>)
    }
}
