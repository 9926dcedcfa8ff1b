//! Google web endpoint translator implementation.
//! This talks to the free `translate_a/single` gtx endpoint and stitches the
//! returned segments back into one sentence.

use super::Translator;
use anyhow::{anyhow, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;

/// Public endpoint serving the gtx translation client.
const DEFAULT_BASE_URL: &str = "https://translate.googleapis.com";

/// Translator that delegates to the public Google translate web endpoint.
#[derive(Debug, Clone)]
pub struct GoogleTranslator {
    client: Client,
    base_url: String,
}

impl GoogleTranslator {
    /// Create a translator against the public endpoint.
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    /// Create a translator against a custom endpoint, mainly for tests.
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into(),
        }
    }
}

impl Default for GoogleTranslator {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Translator for GoogleTranslator {
    /// Translate text by querying the gtx client and joining the segments.
    /// The endpoint answers with nested arrays where each segment's first
    /// element holds the translated piece.
    async fn translate(&self, text: &str, source: &str, target: &str) -> Result<String> {
        let url = format!("{}/translate_a/single", self.base_url);
        let resp = self
            .client
            .get(&url)
            .query(&[
                ("client", "gtx"),
                ("sl", source),
                ("tl", target),
                ("dt", "t"),
                ("q", text),
            ])
            .send()
            .await?
            .error_for_status()?;
        let value: Value = resp.json().await?;
        let segments = value
            .get(0)
            .and_then(Value::as_array)
            .ok_or_else(|| anyhow!("unexpected translation response shape"))?;
        let mut out = String::new();
        for segment in segments {
            if let Some(piece) = segment.get(0).and_then(Value::as_str) {
                out.push_str(piece);
            }
        }
        if out.is_empty() {
            return Err(anyhow!("empty translation response"));
        }
        Ok(out)
    }
}
