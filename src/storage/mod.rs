// Persistence seams for cursors, preferences and the subscriber roster

mod roster;
mod sqlite;

#[cfg(test)]
pub mod memory;

pub use roster::JsonRoster;
pub use sqlite::SqliteStore;

use crate::catalog::Catalog;
use crate::domain::{
    advance::normalize,
    models::{BatchSize, Position},
};

#[async_trait::async_trait]
pub trait CursorStore: Send + Sync {
    async fn get(&self, subscriber: &str) -> anyhow::Result<Option<Position>>;
    async fn set(&self, subscriber: &str, position: &Position) -> anyhow::Result<()>;

    /// Current cursor, starting at the beginning of the catalog for a subscriber
    /// seen for the first time. It is only written back when a batch commits.
    /// A stored position the catalog cannot resolve moves to the next valid one.
    async fn get_or_start(&self, subscriber: &str, catalog: &Catalog) -> anyhow::Result<Position> {
        match self.get(subscriber).await? {
            Some(stored) if catalog.contains(&stored) => Ok(stored),
            Some(stored) => {
                let repaired = normalize(catalog, stored.clone());
                tracing::warn!(
                    %subscriber,
                    %stored,
                    %repaired,
                    "stored cursor is outside the catalog"
                );
                Ok(repaired)
            }
            None => {
                let start = catalog.start();
                tracing::info!(
                    %subscriber,
                    position = %start,
                    "new subscriber, starting at the beginning"
                );
                Ok(start)
            }
        }
    }
}

#[async_trait::async_trait]
pub trait PreferenceStore: Send + Sync {
    async fn get(&self, subscriber: &str) -> anyhow::Result<Option<BatchSize>>;
    async fn set(&self, subscriber: &str, size: BatchSize) -> anyhow::Result<()>;

    async fn batch_size(&self, subscriber: &str) -> BatchSize {
        match self.get(subscriber).await {
            Ok(size) => size.unwrap_or_default(),
            Err(e) => {
                tracing::error!(
                    %subscriber,
                    error = %e,
                    "failed to read preference, using default"
                );
                BatchSize::default()
            }
        }
    }
}

#[async_trait::async_trait]
pub trait RosterSource: Send + Sync {
    /// Subscribers in delivery order. An unavailable source yields an empty roster.
    async fn load(&self) -> Vec<String>;
}
