use anyhow::Context;
use serde::Serialize;

use super::Transport;

/// Posts each message as JSON to a messaging gateway.
#[derive(Clone, Debug)]
pub struct WebhookTransport {
    url: String,
    token: Option<String>,
    client: reqwest::Client,
}

#[derive(Debug, Serialize, PartialEq)]
struct OutboundMessage<'a> {
    to: &'a str,
    text: &'a str,
}

impl WebhookTransport {
    pub fn new(url: impl Into<String>) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()?;
        let url = url.into();
        tracing::debug!(%url, "creating WebhookTransport");
        Ok(Self {
            url,
            token: None,
            client,
        })
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        let token = token.into();
        self.token = (!token.is_empty()).then_some(token);
        self
    }
}

#[async_trait::async_trait]
impl Transport for WebhookTransport {
    #[tracing::instrument(level = "debug", skip(self, text))]
    async fn send_text(&self, destination: &str, text: &str) -> anyhow::Result<()> {
        let mut req = self.client.post(&self.url).json(&OutboundMessage {
            to: destination,
            text,
        });
        if let Some(token) = &self.token {
            req = req.bearer_auth(token);
        }
        req.send()
            .await
            .with_context(|| format!("Failed to reach gateway for {destination}"))?
            .error_for_status()
            .with_context(|| format!("Gateway rejected message for {destination}"))?;
        Ok(())
    }
}
