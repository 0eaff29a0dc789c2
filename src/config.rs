use std::path::PathBuf;
use std::time::Duration;

use chrono::NaiveTime;

use crate::delivery::Pacing;

#[derive(Debug)]
pub struct Config {
    pub db_connection_string: String,
    pub bible_api_base_url: String,
    pub bible_api_token: String,
    pub transport_url: String,
    pub transport_token: String,
    pub destination_suffix: String,
    pub delivery_time: String,
    pub roster_path: PathBuf,
    pub catalog_path: Option<PathBuf>,
    pub bind_addr: String,
    pub settle_delay_ms: u64,
    pub message_delay_ms: u64,
    pub subscriber_delay_ms: u64,
    pub fetch_attempt_factor: usize,
}

const DEFAULT_DB_CONNECTION_STRING: &str = "sqlite://bible_bot.sqlite?mode=rwc";
const DEFAULT_BIBLE_API_BASE_URL: &str = "https://bibleapi.co/api/v1/bible/verse";
const DEFAULT_DESTINATION_SUFFIX: &str = "@c.us";
const DEFAULT_DELIVERY_TIME: &str = "11:20";
const DEFAULT_ROSTER_PATH: &str = "users.json";
const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| default.into())
}

/// Numeric variable; an unparsable value is logged and replaced by the default.
fn env_num<T: std::str::FromStr + Copy + std::fmt::Display>(key: &str, default: T) -> T {
    match std::env::var(key) {
        Ok(raw) if !raw.trim().is_empty() => raw.trim().parse().unwrap_or_else(|_| {
            tracing::warn!(%key, %raw, %default, "invalid number, using default");
            default
        }),
        _ => default,
    }
}

impl Config {
    pub fn load() -> Self {
        Config {
            db_connection_string: env_or("DB_CONNECTION_STRING", DEFAULT_DB_CONNECTION_STRING),
            bible_api_base_url: env_or("BIBLE_API_BASE_URL", DEFAULT_BIBLE_API_BASE_URL),
            bible_api_token: std::env::var("BIBLE_API_TOKEN").unwrap_or_default(),
            transport_url: std::env::var("TRANSPORT_URL").unwrap_or_default(),
            transport_token: std::env::var("TRANSPORT_TOKEN").unwrap_or_default(),
            destination_suffix: std::env::var("DESTINATION_SUFFIX")
                .unwrap_or_else(|_| DEFAULT_DESTINATION_SUFFIX.into()),
            delivery_time: env_or("DELIVERY_TIME", DEFAULT_DELIVERY_TIME),
            roster_path: env_or("ROSTER_PATH", DEFAULT_ROSTER_PATH).into(),
            catalog_path: std::env::var("CATALOG_PATH")
                .ok()
                .filter(|p| !p.trim().is_empty())
                .map(PathBuf::from),
            bind_addr: env_or("BIND_ADDR", DEFAULT_BIND_ADDR),
            settle_delay_ms: env_num("SETTLE_DELAY_MS", 1000),
            message_delay_ms: env_num("MESSAGE_DELAY_MS", 1000),
            subscriber_delay_ms: env_num("SUBSCRIBER_DELAY_MS", 2000),
            fetch_attempt_factor: env_num("FETCH_ATTEMPT_FACTOR", 10),
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.bible_api_base_url.is_empty() {
            return Err("BIBLE_API_BASE_URL is missing".into());
        }
        self.delivery_at()?;
        if self.fetch_attempt_factor == 0 {
            return Err("FETCH_ATTEMPT_FACTOR must be at least 1".into());
        }
        Ok(())
    }

    /// Daily trigger time, `HH:MM` in local time.
    pub fn delivery_at(&self) -> Result<NaiveTime, String> {
        NaiveTime::parse_from_str(self.delivery_time.trim(), "%H:%M")
            .map_err(|e| format!("DELIVERY_TIME {:?} is not HH:MM: {}", self.delivery_time, e))
    }

    pub fn pacing(&self) -> Pacing {
        Pacing {
            settle: Duration::from_millis(self.settle_delay_ms),
            between_messages: Duration::from_millis(self.message_delay_ms),
            between_subscribers: Duration::from_millis(self.subscriber_delay_ms),
        }
    }
}
