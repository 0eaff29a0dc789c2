// Fakes for the delivery tests

use std::collections::HashSet;

use async_trait::async_trait;
use tokio::sync::Mutex;

use super::{ContentError, ContentProvider};
use crate::catalog::{Book, Catalog};
use crate::domain::models::{Passage, Position};
use crate::transport::Transport;

/// Genesis with a single three-verse chapter.
pub fn tiny_catalog() -> Catalog {
    Catalog::new(vec![Book::new("Genesis", vec![3])]).unwrap()
}

/// Resolves every position except the ones listed in `failing`.
#[derive(Default)]
pub struct ScriptedProvider {
    pub failing: HashSet<Position>,
    pub always_fail: bool,
    /// Every lookup fails as if the service were down
    pub unreachable: bool,
    pub calls: Mutex<Vec<Position>>,
}

impl ScriptedProvider {
    pub fn failing_on(positions: impl IntoIterator<Item = Position>) -> Self {
        Self {
            failing: positions.into_iter().collect(),
            ..Default::default()
        }
    }

    pub fn broken() -> Self {
        Self {
            always_fail: true,
            ..Default::default()
        }
    }

    pub fn unreachable() -> Self {
        Self {
            unreachable: true,
            ..Default::default()
        }
    }
}

#[async_trait]
impl ContentProvider for ScriptedProvider {
    async fn resolve(&self, position: &Position) -> Result<Passage, ContentError> {
        self.calls.lock().await.push(position.clone());
        if self.unreachable {
            return Err(ContentError::Status(503));
        }
        if self.always_fail || self.failing.contains(position) {
            return Err(ContentError::NotFound(position.to_string()));
        }
        Ok(Passage::new(position.clone(), format!("text of {position}")))
    }
}

#[derive(Default)]
pub struct RecordingTransport {
    sent: Mutex<Vec<(String, String)>>,
    /// Sends whose text contains this marker fail
    pub fail_marker: Option<String>,
}

impl RecordingTransport {
    pub fn failing_on(marker: &str) -> Self {
        Self {
            fail_marker: Some(marker.to_string()),
            ..Default::default()
        }
    }

    pub async fn sent(&self) -> Vec<(String, String)> {
        self.sent.lock().await.clone()
    }

    pub async fn texts(&self) -> Vec<String> {
        self.sent().await.into_iter().map(|(_, t)| t).collect()
    }
}

#[async_trait]
impl Transport for RecordingTransport {
    async fn send_text(&self, destination: &str, text: &str) -> anyhow::Result<()> {
        if let Some(marker) = &self.fail_marker
            && text.contains(marker.as_str())
        {
            anyhow::bail!("gateway refused {destination}");
        }
        self.sent
            .lock()
            .await
            .push((destination.to_string(), text.to_string()));
        Ok(())
    }
}
