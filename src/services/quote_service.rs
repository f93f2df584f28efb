use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;

use crate::config::QuoteConfig;

#[derive(Debug, thiserror::Error)]
pub enum QuoteError {
    #[error("quote service disabled")]
    Disabled,
    #[error("quote request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("quote service returned no quote")]
    Empty,
}

/// Supplies a short quote to decorate new companies
#[async_trait]
pub trait QuoteSource: Send + Sync {
    async fn fetch_quote(&self) -> Result<String, QuoteError>;
}

/// Client for quotable.io style endpoints returning `[{"content": ...}]`
pub struct QuotableClient {
    client: reqwest::Client,
    url: String,
    enabled: bool,
}

#[derive(Debug, Deserialize)]
struct QuotePayload {
    content: String,
}

impl QuotableClient {
    pub fn new(config: &QuoteConfig) -> Result<Self, QuoteError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()?;

        Ok(Self {
            client,
            url: config.url.clone(),
            enabled: config.enabled,
        })
    }
}

#[async_trait]
impl QuoteSource for QuotableClient {
    async fn fetch_quote(&self) -> Result<String, QuoteError> {
        if !self.enabled {
            return Err(QuoteError::Disabled);
        }

        let quotes: Vec<QuotePayload> = self
            .client
            .get(&self.url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        first_content(quotes)
    }
}

fn first_content(quotes: Vec<QuotePayload>) -> Result<String, QuoteError> {
    quotes
        .into_iter()
        .map(|q| q.content.trim().to_string())
        .find(|content| !content.is_empty())
        .ok_or(QuoteError::Empty)
}

/// Used when no quote service should be contacted
pub struct NoQuotes;

#[async_trait]
impl QuoteSource for NoQuotes {
    async fn fetch_quote(&self) -> Result<String, QuoteError> {
        Err(QuoteError::Disabled)
    }
}

/// Never fails: any error is logged and yields no quote
pub async fn enrich_quote(source: &dyn QuoteSource) -> Option<String> {
    match source.fetch_quote().await {
        Ok(quote) => Some(quote),
        Err(QuoteError::Disabled) => None,
        Err(e) => {
            tracing::warn!("Creating company without quote: {}", e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedQuote(&'static str);

    #[async_trait]
    impl QuoteSource for FixedQuote {
        async fn fetch_quote(&self) -> Result<String, QuoteError> {
            Ok(self.0.to_string())
        }
    }

    struct EmptyQuotes;

    #[async_trait]
    impl QuoteSource for EmptyQuotes {
        async fn fetch_quote(&self) -> Result<String, QuoteError> {
            first_content(vec![])
        }
    }

    #[tokio::test]
    async fn returned_quote_is_used() {
        assert_eq!(
            enrich_quote(&FixedQuote("Stay hungry")).await.as_deref(),
            Some("Stay hungry")
        );
    }

    #[tokio::test]
    async fn failures_yield_no_quote() {
        assert_eq!(enrich_quote(&EmptyQuotes).await, None);
        assert_eq!(enrich_quote(&NoQuotes).await, None);
    }

    #[tokio::test]
    async fn disabled_client_does_not_call_out() {
        let client = QuotableClient::new(&QuoteConfig {
            enabled: false,
            url: "http://127.0.0.1:9/never".to_string(),
            timeout_ms: 10,
        })
        .unwrap();
        assert!(matches!(client.fetch_quote().await, Err(QuoteError::Disabled)));
    }

    #[tokio::test]
    async fn unreachable_service_is_tolerated() {
        let client = QuotableClient::new(&QuoteConfig {
            enabled: true,
            url: "http://127.0.0.1:9/quotes".to_string(),
            timeout_ms: 200,
        })
        .unwrap();
        assert_eq!(enrich_quote(&client).await, None);
    }

    #[test]
    fn payload_takes_first_non_blank_content() {
        let quotes: Vec<QuotePayload> = serde_json::from_str(
            r#"[{"_id":"a","content":"  ","author":"x"},{"content":"Build things","tags":["business"]}]"#,
        )
        .unwrap();
        assert_eq!(first_content(quotes).unwrap(), "Build things");
    }
}
