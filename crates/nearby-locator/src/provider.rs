//! Location providers.

use std::sync::Arc;

use futures::future::BoxFuture;
use nearby_core::Coordinate;
use tokio::sync::watch;

use crate::error::LocationError;

/// Accuracy requested from a provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Priority {
    HighAccuracy,
    Balanced,
    LowPower,
}

/// Cloneable cancel flag handed to a provider with each request.
///
/// Cancelling any clone cancels all of them. Cancellation is sticky.
#[derive(Debug, Clone)]
pub struct CancellationHandle {
    tx: Arc<watch::Sender<bool>>,
    rx: watch::Receiver<bool>,
}

impl Default for CancellationHandle {
    fn default() -> Self {
        Self::new()
    }
}

impl CancellationHandle {
    #[must_use]
    pub fn new() -> Self {
        let (tx, rx) = watch::channel(false);
        Self {
            tx: Arc::new(tx),
            rx,
        }
    }

    pub fn cancel(&self) {
        self.tx.send_replace(true);
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        *self.rx.borrow()
    }

    /// Resolves once [`CancellationHandle::cancel`] has been called.
    pub async fn cancelled(&self) {
        let mut rx = self.rx.clone();
        // The sender lives as long as any handle, so `changed` only errors
        // after every clone is gone; nothing is left to cancel at that point.
        while !*rx.borrow_and_update() {
            if rx.changed().await.is_err() {
                std::future::pending::<()>().await;
            }
        }
    }
}

/// Source of the device's current coordinate.
///
/// `Ok(None)` means the provider answered but has no fix; errors mean the
/// request itself failed. Callers treat both as "no location".
pub trait LocationProvider: Send + Sync {
    fn current_location<'a>(
        &'a self,
        priority: Priority,
        cancel: &'a CancellationHandle,
    ) -> BoxFuture<'a, Result<Option<Coordinate>, LocationError>>;
}

/// Provider that always reports the same coordinate, or none.
///
/// Used when the host already knows where the device is (flags, env vars).
#[derive(Debug, Clone, Copy, Default)]
pub struct FixedLocationProvider {
    coordinate: Option<Coordinate>,
}

impl FixedLocationProvider {
    #[must_use]
    pub fn new(coordinate: Option<Coordinate>) -> Self {
        Self { coordinate }
    }
}

impl LocationProvider for FixedLocationProvider {
    fn current_location<'a>(
        &'a self,
        _priority: Priority,
        cancel: &'a CancellationHandle,
    ) -> BoxFuture<'a, Result<Option<Coordinate>, LocationError>> {
        Box::pin(async move {
            if cancel.is_cancelled() {
                return Err(LocationError::Cancelled);
            }
            Ok(self.coordinate)
        })
    }
}
