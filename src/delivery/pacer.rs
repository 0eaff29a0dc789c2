use std::sync::Arc;

use chrono::{Local, Timelike};
use tokio::time::sleep;
use tokio_util::sync::CancellationToken;

use super::{BatchRetriever, Pacing, PassReport};
use crate::transport::Transport;

const CLOSING: &str = "May the Word light up your day! 🙏";

/// Greeting for the given local hour: morning before 12, afternoon until 18, evening after.
pub fn greeting(hour: u32, count: usize) -> String {
    let salutation = match hour {
        0..=11 => "Good morning",
        12..=17 => "Good afternoon",
        _ => "Good evening",
    };
    let noun = if count == 1 { "verse" } else { "verses" };
    format!("{salutation}! Here are your {count} {noun} for today:")
}

pub fn closing() -> &'static str {
    CLOSING
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeliveryReport {
    pub subscriber: String,
    pub passages: usize,
    pub sent: usize,
    pub failed_sends: usize,
}

/// Sends batches one message at a time, with fixed pauses in between.
pub struct DeliveryPacer {
    retriever: BatchRetriever,
    transport: Arc<dyn Transport>,
    pacing: Pacing,
    destination_suffix: String,
    local_hour: fn() -> u32,
}

impl DeliveryPacer {
    pub fn new(
        retriever: BatchRetriever,
        transport: Arc<dyn Transport>,
        pacing: Pacing,
        destination_suffix: impl Into<String>,
    ) -> Self {
        Self {
            retriever,
            transport,
            pacing,
            destination_suffix: destination_suffix.into(),
            local_hour: || Local::now().hour(),
        }
    }

    pub fn with_clock(mut self, local_hour: fn() -> u32) -> Self {
        self.local_hour = local_hour;
        self
    }

    fn destination(&self, subscriber: &str) -> String {
        if subscriber.ends_with(&self.destination_suffix) {
            subscriber.to_string()
        } else {
            format!("{}{}", subscriber, self.destination_suffix)
        }
    }

    async fn send(&self, destination: &str, text: &str, report: &mut DeliveryReport) {
        match self.transport.send_text(destination, text).await {
            Ok(()) => {
                report.sent += 1;
                tracing::debug!(%destination, "message sent");
            }
            Err(e) => {
                report.failed_sends += 1;
                tracing::error!(%destination, error = ?e, "failed to send message");
            }
        }
    }

    /// Greeting, then every passage, then the closing line. The cursor has
    /// already been committed by the time sending starts, so a failed send is
    /// logged and the rest of the batch still goes out.
    #[tracing::instrument(level = "debug", skip(self))]
    pub async fn deliver(&self, subscriber: &str) -> anyhow::Result<DeliveryReport> {
        let passages = self.retriever.build_batch(subscriber).await?;
        let mut report = DeliveryReport {
            subscriber: subscriber.to_string(),
            passages: passages.len(),
            ..Default::default()
        };
        if passages.is_empty() {
            tracing::error!(%subscriber, "could not retrieve any verses");
            return Ok(report);
        }

        let destination = self.destination(subscriber);
        let hello = greeting((self.local_hour)(), passages.len());
        self.send(&destination, &hello, &mut report).await;
        sleep(self.pacing.settle).await;

        for passage in &passages {
            tracing::debug!(%subscriber, reference = %passage.reference, "sending passage");
            self.send(&destination, &passage.display, &mut report).await;
            sleep(self.pacing.between_messages).await;
        }

        self.send(&destination, closing(), &mut report).await;
        tracing::info!(
            %subscriber,
            passages = report.passages,
            failed_sends = report.failed_sends,
            "delivered verses"
        );
        Ok(report)
    }

    /// Walk the roster in order, one subscriber at a time. Cancellation is
    /// checked between subscribers; a delivery that has started always finishes.
    pub async fn deliver_roster(
        &self,
        roster: &[String],
        cancel: &CancellationToken,
    ) -> PassReport {
        let mut report = PassReport {
            subscribers: roster.len(),
            ..Default::default()
        };
        for (i, subscriber) in roster.iter().enumerate() {
            if cancel.is_cancelled() {
                report.cancelled = true;
                break;
            }
            match self.deliver(subscriber).await {
                Ok(r) if r.passages > 0 => report.delivered += 1,
                Ok(_) => report.failed += 1,
                Err(e) => {
                    report.failed += 1;
                    tracing::error!(%subscriber, error = ?e, "delivery failed");
                }
            }
            if i + 1 < roster.len() {
                tokio::select! {
                    _ = cancel.cancelled() => {
                        tracing::info!("pass cancelled");
                        report.cancelled = true;
                        break;
                    }
                    _ = sleep(self.pacing.between_subscribers) => {}
                }
            }
        }
        report
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use tokio::time::Instant;

    use super::*;
    use crate::catalog::Catalog;
    use crate::delivery::testing::{RecordingTransport, ScriptedProvider, tiny_catalog};
    use crate::domain::models::Position;
    use crate::storage::memory::MemoryStore;

    fn pacer(
        catalog: Catalog,
        provider: ScriptedProvider,
        store: Arc<MemoryStore>,
        transport: Arc<RecordingTransport>,
    ) -> DeliveryPacer {
        let retriever =
            BatchRetriever::new(Arc::new(catalog), Arc::new(provider), store.clone(), store);
        DeliveryPacer::new(retriever, transport, Pacing::default(), "@c.us").with_clock(|| 8)
    }

    #[test]
    fn greeting_boundaries() {
        assert!(greeting(11, 2).starts_with("Good morning!"));
        assert!(greeting(12, 2).starts_with("Good afternoon!"));
        assert!(greeting(13, 2).starts_with("Good afternoon!"));
        assert!(greeting(18, 2).starts_with("Good evening!"));
        assert!(greeting(19, 2).starts_with("Good evening!"));
        assert_eq!(greeting(7, 1), "Good morning! Here are your 1 verse for today:");
    }

    #[tokio::test(start_paused = true)]
    async fn sends_greeting_passages_closing_with_pauses() {
        let store = Arc::new(MemoryStore::default().with_preference("5521", 2).await);
        let transport = Arc::new(RecordingTransport::default());
        let p = pacer(tiny_catalog(), ScriptedProvider::default(), store, transport.clone());

        let started = Instant::now();
        let report = p.deliver("5521").await.unwrap();
        assert_eq!(report.sent, 4);
        assert_eq!(
            transport.texts().await,
            vec![
                "Good morning! Here are your 2 verses for today:".to_string(),
                "Genesis 1:1 - text of Genesis 1:1".to_string(),
                "Genesis 1:2 - text of Genesis 1:2".to_string(),
                closing().to_string(),
            ]
        );
        assert!(transport.sent().await.iter().all(|(d, _)| d == "5521@c.us"));
        // settle + one pause per passage
        let elapsed = started.elapsed();
        assert!(elapsed >= Duration::from_millis(3000) && elapsed < Duration::from_millis(3100));
    }

    #[tokio::test(start_paused = true)]
    async fn failed_send_does_not_abort_batch() {
        let store = Arc::new(MemoryStore::default().with_preference("s", 3).await);
        let transport = Arc::new(RecordingTransport::failing_on("Genesis 1:2"));
        let p = pacer(
            tiny_catalog(),
            ScriptedProvider::default(),
            store.clone(),
            transport.clone(),
        );

        let report = p.deliver("s").await.unwrap();
        assert_eq!(report.failed_sends, 1);
        assert_eq!(report.sent, 4);
        assert_eq!(transport.texts().await.last().map(String::as_str), Some(closing()));
        // wrapped past the end of the one-chapter catalog
        assert_eq!(store.cursor("s").await, Some(Position::new("Genesis", 1, 1)));
    }

    #[tokio::test(start_paused = true)]
    async fn empty_batch_sends_nothing() {
        let store = Arc::new(MemoryStore::default());
        let transport = Arc::new(RecordingTransport::default());
        let p = pacer(tiny_catalog(), ScriptedProvider::broken(), store, transport.clone());

        let report = p.deliver("s").await.unwrap();
        assert_eq!(report.passages, 0);
        assert!(transport.sent().await.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn subscriber_suffix_is_not_doubled() {
        let store = Arc::new(MemoryStore::default());
        let transport = Arc::new(RecordingTransport::default());
        let p = pacer(tiny_catalog(), ScriptedProvider::default(), store, transport.clone());
        p.deliver("5521@c.us").await.unwrap();
        assert_eq!(transport.sent().await[0].0, "5521@c.us");
    }

    #[tokio::test(start_paused = true)]
    async fn roster_stops_between_subscribers_when_cancelled() {
        let store = Arc::new(MemoryStore::default());
        let transport = Arc::new(RecordingTransport::default());
        let p = pacer(
            tiny_catalog(),
            ScriptedProvider::default(),
            store.clone(),
            transport.clone(),
        );
        let roster = vec!["a".to_string(), "b".to_string()];

        let cancel = CancellationToken::new();
        let trigger = cancel.clone();
        tokio::spawn(async move {
            // lands during the pause after the first subscriber
            sleep(Duration::from_millis(3500)).await;
            trigger.cancel();
        });

        let report = p.deliver_roster(&roster, &cancel).await;
        assert!(report.cancelled);
        assert_eq!(report.delivered, 1);
        assert!(store.cursor("b").await.is_none());
        assert!(transport.sent().await.iter().all(|(d, _)| d == "a@c.us"));
    }

    #[tokio::test(start_paused = true)]
    async fn roster_pauses_between_subscribers() {
        let store = Arc::new(MemoryStore::default());
        let transport = Arc::new(RecordingTransport::default());
        let p = pacer(tiny_catalog(), ScriptedProvider::default(), store, transport);
        let roster = vec!["a".to_string(), "b".to_string(), "c".to_string()];

        let started = Instant::now();
        let report = p.deliver_roster(&roster, &CancellationToken::new()).await;
        assert_eq!(report.delivered, 3);
        // 3 x (settle + one passage) + 2 x between subscribers
        let elapsed = started.elapsed();
        assert!(
            elapsed >= Duration::from_millis(10_000) && elapsed < Duration::from_millis(10_100)
        );
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_mid_delivery_lets_current_subscriber_finish() {
        let store = Arc::new(MemoryStore::default());
        let transport = Arc::new(RecordingTransport::default());
        let p = pacer(
            tiny_catalog(),
            ScriptedProvider::default(),
            store.clone(),
            transport.clone(),
        );
        let roster = vec!["a".to_string(), "b".to_string()];

        let cancel = CancellationToken::new();
        let trigger = cancel.clone();
        tokio::spawn(async move {
            // during the settle pause after the first greeting
            sleep(Duration::from_millis(500)).await;
            trigger.cancel();
        });

        let report = p.deliver_roster(&roster, &cancel).await;
        assert!(report.cancelled);
        assert_eq!(report.delivered, 1);
        assert_eq!(
            transport.texts().await,
            vec![
                "Good morning! Here are your 1 verse for today:".to_string(),
                "Genesis 1:1 - text of Genesis 1:1".to_string(),
                closing().to_string(),
            ]
        );
        assert_eq!(store.cursor("a").await, Some(Position::new("Genesis", 1, 2)));
        assert!(store.cursor("b").await.is_none());
    }
}
