//! Sequential delivery: batch assembly, paced sending and the daily pass.
//!
//! Every entry point that can move a cursor (the scheduled pass and on-demand
//! delivery) goes through [`DeliveryEngine`], which holds a single run lock so
//! that no two of them ever overlap.

mod batch;
mod driver;
mod pacer;

#[cfg(test)]
pub mod testing;

use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;
use tracing::Instrument;
use uuid::Uuid;

pub use batch::BatchRetriever;
pub use driver::ScheduleDriver;
pub use pacer::{DeliveryPacer, DeliveryReport};

use crate::domain::models::{Passage, Position};
use crate::storage::RosterSource;

/// Why a verse could not be resolved. Every variant is skipped the same way;
/// the retriever only asks whether the service answered at all.
#[derive(Debug, Error)]
pub enum ContentError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("lookup service returned status {0}")]
    Status(u16),
    #[error("verse not found: {0}")]
    NotFound(String),
    #[error("malformed response: {0}")]
    Malformed(String),
}

impl ContentError {
    /// The service answered, but has nothing usable for this verse.
    pub fn is_missing_verse(&self) -> bool {
        matches!(self, Self::NotFound(_) | Self::Malformed(_))
    }
}

#[async_trait::async_trait]
pub trait ContentProvider: Send + Sync {
    async fn resolve(&self, position: &Position) -> Result<Passage, ContentError>;
}

#[derive(Debug, Error)]
pub enum DeliveryError {
    #[error("a delivery run is already in progress")]
    Busy,
    #[error(transparent)]
    Failed(#[from] anyhow::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pacing {
    /// After the greeting, before the first passage
    pub settle: Duration,
    /// After each passage
    pub between_messages: Duration,
    pub between_subscribers: Duration,
}

impl Default for Pacing {
    fn default() -> Self {
        Self {
            settle: Duration::from_millis(1000),
            between_messages: Duration::from_millis(1000),
            between_subscribers: Duration::from_millis(2000),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PassReport {
    pub pass_id: Uuid,
    pub subscribers: usize,
    pub delivered: usize,
    pub failed: usize,
    pub cancelled: bool,
}

pub struct DeliveryEngine {
    pacer: DeliveryPacer,
    roster: Arc<dyn RosterSource>,
    run_lock: Mutex<()>,
}

impl DeliveryEngine {
    pub fn new(pacer: DeliveryPacer, roster: Arc<dyn RosterSource>) -> Self {
        Self {
            pacer,
            roster,
            run_lock: Mutex::new(()),
        }
    }

    pub fn is_running(&self) -> bool {
        self.run_lock.try_lock().is_err()
    }

    #[cfg(test)]
    pub async fn hold_run_lock(&self) -> tokio::sync::MutexGuard<'_, ()> {
        self.run_lock.lock().await
    }

    /// One full walk over the roster. Fails with [`DeliveryError::Busy`] when
    /// another pass or an on-demand delivery holds the run lock.
    pub async fn run_pass(&self, cancel: &CancellationToken) -> Result<PassReport, DeliveryError> {
        let _guard = self.run_lock.try_lock().map_err(|_| DeliveryError::Busy)?;
        let pass_id = Uuid::new_v4();
        async {
            tracing::info!("starting delivery pass");
            let roster = self.roster.load().await;
            if roster.is_empty() {
                tracing::warn!("no subscribers found, nothing to deliver");
                return Ok::<_, DeliveryError>(PassReport {
                    pass_id,
                    ..Default::default()
                });
            }
            tracing::info!(subscribers = roster.len(), "delivering to roster");
            let mut report = self.pacer.deliver_roster(&roster, cancel).await;
            report.pass_id = pass_id;
            tracing::info!(
                delivered = report.delivered,
                failed = report.failed,
                cancelled = report.cancelled,
                "delivery pass finished"
            );
            Ok(report)
        }
        .instrument(tracing::info_span!("pass", %pass_id))
        .await
    }

    /// Deliver one batch to a single subscriber outside the schedule.
    pub async fn deliver_now(&self, subscriber: &str) -> Result<DeliveryReport, DeliveryError> {
        let _guard = self.run_lock.try_lock().map_err(|_| DeliveryError::Busy)?;
        tracing::info!(%subscriber, "on-demand delivery");
        Ok(self.pacer.deliver(subscriber).await?)
    }
}
