// HTTP client for the verse lookup service

use serde::Deserialize;

use crate::delivery::{ContentError, ContentProvider};
use crate::domain::{mapping::map_verse_to_passage, models::Passage, models::Position};

#[derive(Clone, Debug)]
pub struct BibleClient {
    base_url: reqwest::Url,
    api_key: Option<String>,
    client: reqwest::Client,
}

impl BibleClient {
    /// Create a new client for the given verse endpoint
    /// (e.g. "https://bibleapi.co/api/v1/bible/verse").
    pub fn new(base_url: impl Into<String>) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(15))
            .build()?;
        let base_url_str = base_url.into();
        tracing::debug!(base_url = %base_url_str, "creating BibleClient");
        let base_url = reqwest::Url::parse(base_url_str.trim_end_matches('/'))?;
        if base_url.cannot_be_a_base() {
            anyhow::bail!("BIBLE_API_BASE_URL cannot be used as a base: {base_url_str}");
        }
        Ok(BibleClient {
            base_url,
            api_key: None,
            client,
        })
    }

    /// Return a client with the provided API key set (Bearer)
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        let key = api_key.into();
        self.api_key = (!key.is_empty()).then_some(key);
        self
    }

    /// URL of a single verse: `{base}/{book}/{chapter}/{verse}`, with the book
    /// name percent-encoded as one path segment.
    pub fn verse_url(&self, position: &Position) -> reqwest::Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments
                .pop_if_empty()
                .push(&position.book)
                .push(&position.chapter.to_string())
                .push(&position.verse.to_string());
        }
        url
    }

    fn auth_header(&self) -> Option<(String, String)> {
        self.api_key
            .as_ref()
            .map(|k| ("Authorization".to_string(), format!("Bearer {}", k)))
    }

    /// GET {base}/{book}/{chapter}/{verse}
    #[tracing::instrument(level = "debug", skip(self, position), fields(position = %position))]
    pub async fn get_verse(&self, position: &Position) -> Result<VerseResponse, ContentError> {
        let url = self.verse_url(position);
        tracing::debug!(%url, "GET verse");
        let mut req = self.client.get(url);
        if let Some((k, v)) = self.auth_header() {
            req = req.header(&k, &v);
        }
        let resp = req.send().await?;
        let status = resp.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(ContentError::NotFound(position.to_string()));
        }
        if !status.is_success() {
            return Err(ContentError::Status(status.as_u16()));
        }
        let body = resp.text().await?;
        match serde_json::from_str::<VerseResponse>(&body) {
            Ok(parsed) => Ok(parsed),
            Err(e) => {
                let snippet_len = body.len().min(500);
                let snippet = body.get(..snippet_len).unwrap_or_default();
                tracing::error!(
                    error = %e,
                    body_snippet = %snippet,
                    "failed to parse VerseResponse"
                );
                Err(ContentError::Malformed(e.to_string()))
            }
        }
    }
}

#[async_trait::async_trait]
impl ContentProvider for BibleClient {
    async fn resolve(&self, position: &Position) -> Result<Passage, ContentError> {
        let verse = self.get_verse(position).await?;
        map_verse_to_passage(position, &verse)
    }
}

/// Only the fields the engine checks; the book comes back in several shapes
/// and is ignored in favour of the catalog name.
#[derive(Debug, Deserialize, PartialEq)]
pub struct VerseResponse {
    pub chapter: Option<u32>,
    pub number: Option<u32>,
    #[serde(alias = "verse")]
    pub verse_number: Option<u32>,
    pub text: Option<String>,
}
