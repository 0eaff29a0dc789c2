// In-process stores for tests

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use super::{CursorStore, PreferenceStore, RosterSource};
use crate::domain::models::{BatchSize, Position};

#[derive(Default)]
pub struct MemoryStore {
    cursors: Mutex<HashMap<String, Position>>,
    preferences: Mutex<HashMap<String, BatchSize>>,
    pub cursor_writes: Mutex<Vec<(String, Position)>>,
}

impl MemoryStore {
    pub async fn with_cursor(self, subscriber: &str, position: Position) -> Self {
        self.cursors.lock().await.insert(subscriber.into(), position);
        self
    }

    pub async fn with_preference(self, subscriber: &str, size: i64) -> Self {
        self.preferences
            .lock()
            .await
            .insert(subscriber.into(), BatchSize::clamped(size));
        self
    }

    pub async fn cursor(&self, subscriber: &str) -> Option<Position> {
        self.cursors.lock().await.get(subscriber).cloned()
    }
}

#[async_trait]
impl CursorStore for MemoryStore {
    async fn get(&self, subscriber: &str) -> anyhow::Result<Option<Position>> {
        Ok(self.cursor(subscriber).await)
    }

    async fn set(&self, subscriber: &str, position: &Position) -> anyhow::Result<()> {
        self.cursors
            .lock()
            .await
            .insert(subscriber.into(), position.clone());
        self.cursor_writes
            .lock()
            .await
            .push((subscriber.into(), position.clone()));
        Ok(())
    }
}

#[async_trait]
impl PreferenceStore for MemoryStore {
    async fn get(&self, subscriber: &str) -> anyhow::Result<Option<BatchSize>> {
        Ok(self.preferences.lock().await.get(subscriber).copied())
    }

    async fn set(&self, subscriber: &str, size: BatchSize) -> anyhow::Result<()> {
        self.preferences.lock().await.insert(subscriber.into(), size);
        Ok(())
    }
}

pub struct StaticRoster(pub Vec<String>);

#[async_trait]
impl RosterSource for StaticRoster {
    async fn load(&self) -> Vec<String> {
        self.0.clone()
    }
}
