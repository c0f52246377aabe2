//! Catalogue domain model.
//!
//! # Responsibility
//! - Define the product document shape read from the store.
//! - Keep descriptive fields opaque so documents round-trip verbatim.
//!
//! # Invariants
//! - Every product is identified by a unique `sku`.
//! - Categories have no record of their own; they are derived from products.

pub mod product;
