// Outbound messaging seam

mod webhook;

pub use webhook::WebhookTransport;

#[async_trait::async_trait]
pub trait Transport: Send + Sync {
    async fn send_text(&self, destination: &str, text: &str) -> anyhow::Result<()>;
}

/// Dry-run transport that only logs what would be sent.
#[derive(Debug, Default, Clone)]
pub struct LogTransport;

#[async_trait::async_trait]
impl Transport for LogTransport {
    async fn send_text(&self, destination: &str, text: &str) -> anyhow::Result<()> {
        tracing::info!(%destination, %text, "dry-run send");
        Ok(())
    }
}
