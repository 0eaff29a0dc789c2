use std::sync::Arc;

use crate::catalog::Catalog;
use crate::domain::{
    advance::advance,
    models::{Passage, Position},
};
use crate::storage::{CursorStore, PreferenceStore};

use super::ContentProvider;

pub const DEFAULT_ATTEMPT_FACTOR: usize = 10;

/// Assembles one subscriber's batch and commits their cursor.
pub struct BatchRetriever {
    catalog: Arc<Catalog>,
    provider: Arc<dyn ContentProvider>,
    cursors: Arc<dyn CursorStore>,
    preferences: Arc<dyn PreferenceStore>,
    attempt_factor: usize,
}

impl BatchRetriever {
    pub fn new(
        catalog: Arc<Catalog>,
        provider: Arc<dyn ContentProvider>,
        cursors: Arc<dyn CursorStore>,
        preferences: Arc<dyn PreferenceStore>,
    ) -> Self {
        Self {
            catalog,
            provider,
            cursors,
            preferences,
            attempt_factor: DEFAULT_ATTEMPT_FACTOR,
        }
    }

    /// Cap lookups at `batch size * factor` per batch.
    pub fn with_attempt_factor(mut self, factor: usize) -> Self {
        self.attempt_factor = factor.max(1);
        self
    }

    /// Collect up to the subscriber's preferred number of passages, starting at
    /// their cursor. A verse that cannot be resolved is skipped and replaced by
    /// the next one. The cursor is written once, after the loop, and points
    /// just past the last passage returned.
    ///
    /// When nothing resolved, the cursor moves past every verse tried only if
    /// the service reported each of them as missing (a gap in its data, e.g. a
    /// catalog count larger than the real chapter). Any transport or status
    /// failure leaves the cursor alone so an outage never skips verses.
    #[tracing::instrument(level = "debug", skip(self))]
    pub async fn build_batch(&self, subscriber: &str) -> anyhow::Result<Vec<Passage>> {
        let wanted = self.preferences.batch_size(subscriber).await.get();
        let max_attempts = wanted.saturating_mul(self.attempt_factor);
        let mut pos = self.cursors.get_or_start(subscriber, &self.catalog).await?;
        tracing::debug!(%subscriber, wanted, cursor = %pos, "building batch");

        let mut passages = Vec::with_capacity(wanted);
        let mut resume_at: Option<Position> = None;
        let mut service_failed = false;
        let mut attempts = 0;
        while passages.len() < wanted && attempts < max_attempts {
            attempts += 1;
            let next = advance(&self.catalog, &pos);
            match self.provider.resolve(&pos).await {
                Ok(passage) => {
                    passages.push(passage);
                    resume_at = Some(next.clone());
                }
                Err(e) => {
                    service_failed |= !e.is_missing_verse();
                    tracing::warn!(
                        %subscriber,
                        position = %pos,
                        error = %e,
                        "skipping unresolved verse"
                    );
                }
            }
            pos = next;
        }

        if resume_at.is_none() && !service_failed {
            tracing::warn!(
                %subscriber,
                attempts,
                cursor = %pos,
                "no verse found in the whole window, moving past it"
            );
            resume_at = Some(pos);
        }

        if passages.len() < wanted {
            tracing::warn!(
                %subscriber,
                wanted,
                got = passages.len(),
                attempts,
                "gave up after too many failed lookups"
            );
        }

        if let Some(next) = resume_at {
            self.cursors.set(subscriber, &next).await?;
            tracing::debug!(%subscriber, cursor = %next, "cursor committed");
        }
        Ok(passages)
    }
}
