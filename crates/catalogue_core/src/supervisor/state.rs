//! Connectivity state shared between the supervisor and its readers.
//!
//! # Invariants
//! - The store handle is assigned at most once per [`StoreHandle`].
//! - `Connected` is observed if and only if a handle has been assigned, so
//!   readers never see a flag without a usable store.

use crate::store::ProductStore;
use once_cell::sync::OnceCell;
use std::fmt::{Debug, Formatter};
use std::sync::Arc;

/// Two-valued connectivity flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Disconnected,
    Connected,
}

impl ConnectionState {
    pub fn is_connected(self) -> bool {
        matches!(self, Self::Connected)
    }
}

/// Single-assignment cell holding the connected store.
///
/// Cloning shares the same cell.
#[derive(Clone, Default)]
pub struct StoreHandle {
    cell: Arc<OnceCell<Arc<dyn ProductStore>>>,
}

impl StoreHandle {
    /// Creates an unbound (disconnected) handle.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a handle already bound to `store`.
    pub fn connected(store: Arc<dyn ProductStore>) -> Self {
        let handle = Self::new();
        handle.bind(store);
        handle
    }

    pub fn state(&self) -> ConnectionState {
        if self.cell.get().is_some() {
            ConnectionState::Connected
        } else {
            ConnectionState::Disconnected
        }
    }

    /// Returns the bound store, or `None` while disconnected.
    pub fn store(&self) -> Option<Arc<dyn ProductStore>> {
        self.cell.get().cloned()
    }

    /// Binds `store` unless a store is already bound.
    ///
    /// Returns `false` when the handle was already connected.
    pub(crate) fn bind(&self, store: Arc<dyn ProductStore>) -> bool {
        self.cell.set(store).is_ok()
    }
}

impl Debug for StoreHandle {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoreHandle")
            .field("state", &self.state())
            .finish()
    }
}
