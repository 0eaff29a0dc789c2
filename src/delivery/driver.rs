//! Daily trigger for delivery passes.
//!
//! The driver sleeps until the configured local time, runs one pass, and goes
//! back to sleep. A pass that fails or panics is logged and the driver keeps
//! going, so tomorrow's trigger still fires.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Local, NaiveTime, TimeDelta, TimeZone};
use tokio::time::sleep;
use tokio_util::sync::CancellationToken;

use super::{DeliveryEngine, DeliveryError};

/// First instant strictly after `now` whose wall-clock time is `at`. A time
/// that does not exist on a given day (DST gap) moves forward hour by hour.
pub fn next_fire<Tz: TimeZone>(now: &DateTime<Tz>, at: NaiveTime) -> DateTime<Tz> {
    let tz = now.timezone();
    let mut candidate = now.date_naive().and_time(at);
    if candidate <= now.naive_local() {
        candidate += TimeDelta::days(1);
    }
    loop {
        if let Some(fire) = tz.from_local_datetime(&candidate).earliest() {
            if fire > *now {
                return fire;
            }
            candidate += TimeDelta::days(1);
        } else {
            candidate += TimeDelta::hours(1);
        }
    }
}

pub struct ScheduleDriver {
    engine: Arc<DeliveryEngine>,
    at: NaiveTime,
}

impl ScheduleDriver {
    pub fn new(engine: Arc<DeliveryEngine>, at: NaiveTime) -> Self {
        Self { engine, at }
    }

    /// Idle until the next trigger, run, repeat. Returns once `cancel` fires.
    pub async fn run(self, cancel: CancellationToken) {
        tracing::info!(at = %self.at.format("%H:%M"), "schedule driver started");
        let mut not_before = Local::now();
        loop {
            let fire = next_fire(&not_before, self.at);
            let wait = (fire - Local::now()).to_std().unwrap_or(Duration::ZERO);
            tracing::info!(next = %fire.to_rfc3339(), "next delivery pass scheduled");

            tokio::select! {
                _ = cancel.cancelled() => break,
                _ = sleep(wait) => {}
            }

            self.fire(&cancel).await;
            // wall clock and timer may disagree slightly; never fire twice for one slot
            not_before = Local::now().max(fire);
        }
        tracing::info!("schedule driver stopped");
    }

    /// Run one pass on its own task so a panic inside it cannot take the
    /// driver down with it.
    pub async fn fire(&self, cancel: &CancellationToken) {
        let engine = self.engine.clone();
        let token = cancel.clone();
        let handle = tokio::spawn(async move { engine.run_pass(&token).await });
        match handle.await {
            Ok(Ok(report)) => {
                tracing::info!(
                    pass_id = %report.pass_id,
                    delivered = report.delivered,
                    "scheduled pass complete"
                );
            }
            Ok(Err(DeliveryError::Busy)) => {
                tracing::warn!("previous run still in progress, skipping this trigger");
            }
            Ok(Err(e)) => {
                tracing::error!(error = ?e, "scheduled pass failed");
            }
            Err(e) => {
                tracing::error!(error = %e, "scheduled pass aborted");
            }
        }
    }
}
