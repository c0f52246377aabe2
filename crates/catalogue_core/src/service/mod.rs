//! Core use-case services.
//!
//! # Responsibility
//! - Translate catalogue read intents into store queries.
//! - Keep HTTP callers decoupled from storage details.

pub mod catalogue_service;
