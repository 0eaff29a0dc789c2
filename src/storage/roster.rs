use std::path::PathBuf;

use anyhow::Context;
use async_trait::async_trait;
use serde::Deserialize;

use super::RosterSource;

/// Roster kept in a JSON file: an array of `{"number": "..."}` entries or bare strings.
#[derive(Debug, Clone)]
pub struct JsonRoster {
    path: PathBuf,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RosterEntry {
    Number(String),
    Subscriber { number: String },
}

impl RosterEntry {
    fn into_number(self) -> String {
        match self {
            RosterEntry::Number(n) | RosterEntry::Subscriber { number: n } => n,
        }
    }
}

impl JsonRoster {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    async fn read(&self) -> anyhow::Result<Vec<String>> {
        let raw = tokio::fs::read_to_string(&self.path)
            .await
            .with_context(|| format!("Failed to read roster {}", self.path.display()))?;
        let entries: Vec<RosterEntry> = serde_json::from_str(&raw)
            .with_context(|| format!("Invalid roster JSON in {}", self.path.display()))?;
        Ok(entries
            .into_iter()
            .map(|e| e.into_number().trim().to_string())
            .filter(|n| !n.is_empty())
            .collect())
    }
}

#[async_trait]
impl RosterSource for JsonRoster {
    async fn load(&self) -> Vec<String> {
        if !tokio::fs::try_exists(&self.path).await.unwrap_or(false) {
            tracing::warn!(path = %self.path.display(), "roster file not found, no subscribers");
            return Vec::new();
        }
        match self.read().await {
            Ok(numbers) => numbers,
            Err(e) => {
                tracing::error!(error = ?e, "failed to load roster");
                Vec::new()
            }
        }
    }
}
