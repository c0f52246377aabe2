//! Full-text search entry points.
//!
//! # Responsibility
//! - Expose product text queries backed by the SQLite FTS5 index.
//! - Keep query escaping and index error mapping inside core.

pub mod fts;
