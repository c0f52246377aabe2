//! Product document model.
//!
//! # Responsibility
//! - Define the canonical product record served by the catalogue.
//! - Validate documents handed to the store by writers.
//!
//! # Invariants
//! - `sku` is non-blank and unique across the store.
//! - Fields other than `sku`, `name` and `categories` are carried opaquely.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Stock keeping unit, the unique product identifier.
pub type Sku = String;

/// Product document as stored and served.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub sku: Sku,
    pub name: String,
    /// Ordered category names. Not required to be non-empty.
    #[serde(default)]
    pub categories: Vec<String>,
    /// Descriptive fields owned by the writer (price, description, ...).
    #[serde(flatten)]
    pub attributes: Map<String, Value>,
}

/// Validation failure for a product document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProductValidationError {
    BlankSku,
    BlankName { sku: Sku },
    BlankCategory { sku: Sku },
}

impl Display for ProductValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankSku => write!(f, "product sku cannot be blank"),
            Self::BlankName { sku } => write!(f, "product `{sku}` has a blank name"),
            Self::BlankCategory { sku } => write!(f, "product `{sku}` has a blank category"),
        }
    }
}

impl Error for ProductValidationError {}

impl Product {
    /// Creates a product without descriptive attributes.
    pub fn new(
        sku: impl Into<String>,
        name: impl Into<String>,
        categories: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self {
            sku: sku.into(),
            name: name.into(),
            categories: categories.into_iter().map(Into::into).collect(),
            attributes: Map::new(),
        }
    }

    /// Adds one opaque attribute, replacing any previous value.
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    /// Free text indexed for search: the description attribute when it is a string.
    pub fn description(&self) -> Option<&str> {
        self.attributes.get("description").and_then(Value::as_str)
    }

    /// Returns whether `category` appears in this product's categories.
    pub fn has_category(&self, category: &str) -> bool {
        self.categories.iter().any(|value| value == category)
    }

    /// Checks writer-side invariants before a document is persisted.
    pub fn validate(&self) -> Result<(), ProductValidationError> {
        if self.sku.trim().is_empty() {
            return Err(ProductValidationError::BlankSku);
        }
        if self.name.trim().is_empty() {
            return Err(ProductValidationError::BlankName {
                sku: self.sku.clone(),
            });
        }
        if self.categories.iter().any(|category| category.trim().is_empty()) {
            return Err(ProductValidationError::BlankCategory {
                sku: self.sku.clone(),
            });
        }
        Ok(())
    }
}
