//! Fetch-cycle orchestration.
//!
//! A cycle is: settle permission → locate → name → search places → deliver.
//! [`RecommendationSession`] runs cycles on background tasks and owns the
//! [`FetchStatus`] that gates the spinner. Triggers that arrive while a cycle
//! is loading are ignored, so cycles never overlap.

use std::sync::Arc;

use nearby_core::RecommendationResult;
use nearby_locator::{ensure_permission, Locator, LocatorError, PermissionGate};
use nearby_places::{NearbyQuery, PlacesClient};
use tokio::sync::{oneshot, watch};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchStatus {
    Idle,
    Loading,
    Done,
}

/// How a cycle ended.
#[derive(Debug, Clone, PartialEq)]
pub enum CycleOutcome {
    Delivered(RecommendationResult),
    PermissionDenied,
}

/// Result of [`RecommendationSession::trigger`].
#[derive(Debug)]
pub enum Trigger {
    /// The cycle's outcome arrives exactly once on this receiver.
    Started(oneshot::Receiver<CycleOutcome>),
    /// A cycle was already loading; nothing was started.
    Ignored,
}

/// The collaborators one cycle needs.
pub struct Pipeline {
    pub permission: Arc<dyn PermissionGate>,
    pub locator: Locator,
    pub places: PlacesClient,
    pub query: NearbyQuery,
}

impl Pipeline {
    /// Runs one complete cycle. Never fails; every failure below this point
    /// shrinks the result instead.
    pub async fn run_cycle(&self) -> CycleOutcome {
        let permission = ensure_permission(self.permission.as_ref()).await;

        let resolved = match self.locator.resolve(permission).await {
            Ok(resolved) => resolved,
            Err(LocatorError::PermissionDenied) => {
                tracing::info!("location permission denied; cycle abandoned");
                return CycleOutcome::PermissionDenied;
            }
        };

        let Some(coordinate) = resolved.coordinate else {
            return CycleOutcome::Delivered(RecommendationResult::unavailable());
        };

        let places = self.places.fetch_nearby(coordinate, &self.query).await;
        tracing::info!(
            %coordinate,
            location = resolved.place_name.as_deref().unwrap_or("-"),
            categories = places.len(),
            "fetch cycle complete"
        );
        CycleOutcome::Delivered(RecommendationResult::new(resolved.place_name, places))
    }
}

pub struct RecommendationSession {
    pipeline: Arc<Pipeline>,
    status: Arc<watch::Sender<FetchStatus>>,
}

impl RecommendationSession {
    pub fn new(pipeline: Pipeline) -> Self {
        let (status, _) = watch::channel(FetchStatus::Idle);
        Self {
            pipeline: Arc::new(pipeline),
            status: Arc::new(status),
        }
    }

    pub fn status(&self) -> FetchStatus {
        *self.status.borrow()
    }

    /// Starts a cycle on a background task unless one is already loading.
    ///
    /// Status flips to `Loading` before this returns and to `Done` just
    /// before the outcome is sent.
    pub fn trigger(&self) -> Trigger {
        let started = self.status.send_if_modified(|status| {
            if *status == FetchStatus::Loading {
                false
            } else {
                *status = FetchStatus::Loading;
                true
            }
        });
        if !started {
            tracing::debug!("trigger ignored; a cycle is already loading");
            return Trigger::Ignored;
        }

        let (tx, rx) = oneshot::channel();
        let pipeline = Arc::clone(&self.pipeline);
        let status = Arc::clone(&self.status);
        tokio::spawn(async move {
            let outcome = pipeline.run_cycle().await;
            status.send_replace(FetchStatus::Done);
            if tx.send(outcome).is_err() {
                tracing::debug!("cycle outcome dropped; receiver went away");
            }
        });
        Trigger::Started(rx)
    }
}

#[cfg(test)]
#[path = "session_test.rs"]
mod tests;
