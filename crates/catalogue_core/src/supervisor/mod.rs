//! Store connection lifecycle.
//!
//! # Responsibility
//! - Establish the store connection and publish connectivity state.
//! - Retry failed attempts indefinitely with a fixed backoff.
//!
//! # Invariants
//! - State moves from `Disconnected` to `Connected` at most once.
//! - There is no disconnect detection; once connected the supervisor is done.
//! - One `info` event per successful connect, one `error` event per failed attempt.

mod state;

pub use state::{ConnectionState, StoreHandle};

use crate::store::{ConnectError, StoreConnector};
use log::{debug, error, info, warn};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Delay between failed connection attempts.
pub const DEFAULT_RETRY_BACKOFF: Duration = Duration::from_millis(2000);

/// Owns connect/retry for one store target.
pub struct ConnectionSupervisor {
    connector: Arc<dyn StoreConnector>,
    target: String,
    backoff: Duration,
    handle: StoreHandle,
    attempts: AtomicU32,
}

impl ConnectionSupervisor {
    pub fn new(
        connector: Arc<dyn StoreConnector>,
        target: impl Into<String>,
        backoff: Duration,
    ) -> Self {
        Self {
            connector,
            target: target.into(),
            backoff,
            handle: StoreHandle::new(),
            attempts: AtomicU32::new(0),
        }
    }

    /// Shared handle readers use to reach the store once connected.
    pub fn handle(&self) -> StoreHandle {
        self.handle.clone()
    }

    pub fn current_state(&self) -> ConnectionState {
        self.handle.state()
    }

    /// Number of connection attempts made so far.
    pub fn attempts(&self) -> u32 {
        self.attempts.load(Ordering::SeqCst)
    }

    /// Makes a single connection attempt and binds the store on success.
    ///
    /// Returns immediately without connecting again when already connected.
    pub async fn connect(&self) -> Result<(), ConnectError> {
        if self.current_state().is_connected() {
            return Ok(());
        }

        let attempt = self.attempts.fetch_add(1, Ordering::SeqCst) + 1;
        let started_at = Instant::now();
        match self.connector.connect(&self.target).await {
            Ok(store) => {
                if self.handle.bind(store) {
                    info!(
                        "event=store_connect module=supervisor status=ok target={} attempt={} duration_ms={}",
                        self.target,
                        attempt,
                        started_at.elapsed().as_millis()
                    );
                } else {
                    warn!(
                        "event=store_connect module=supervisor status=ignored target={} attempt={} reason=already_connected",
                        self.target, attempt
                    );
                }
                Ok(())
            }
            Err(err) => {
                error!(
                    "event=store_connect module=supervisor status=error target={} attempt={} duration_ms={} error={}",
                    self.target,
                    attempt,
                    started_at.elapsed().as_millis(),
                    err
                );
                Err(err)
            }
        }
    }

    /// Retries [`Self::connect`] until it succeeds, sleeping `backoff` between attempts.
    ///
    /// Spawn it as a background task via `tokio::spawn`; it returns after
    /// the first success and never runs again.
    pub async fn supervise_forever(&self) {
        loop {
            if self.connect().await.is_ok() {
                return;
            }
            debug!(
                "event=store_retry module=supervisor status=waiting target={} backoff_ms={}",
                self.target,
                self.backoff.as_millis()
            );
            tokio::time::sleep(self.backoff).await;
        }
    }
}
