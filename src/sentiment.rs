//! Client for the external text-classification service.
//!
//! Request: `POST {"raw_document": {"text": ...}}` with the model selected through
//! the [`MODEL_HEADER`] header. Response: `{"documentSentiment": {"label", "score"}}`.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::SentimentConfig;
use crate::error::SentimentError;
use crate::models::review::Sentiment;

pub const MODEL_HEADER: &str = "grpc-metadata-mm-model-id";

/// Anything that can put a coarse sentiment label on a piece of text.
///
/// `None` means no label could be obtained; implementations never fail the caller.
#[async_trait]
pub trait SentimentClassifier: Send + Sync {
    async fn classify(&self, text: &str) -> Option<Sentiment>;
}

#[derive(Serialize)]
struct ClassifyRequest<'a> {
    raw_document: RawDocument<'a>,
}

#[derive(Serialize)]
struct RawDocument<'a> {
    text: &'a str,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ClassifyResponse {
    document_sentiment: DocumentSentiment,
}

#[derive(Deserialize)]
struct DocumentSentiment {
    label: String,
    #[serde(default)]
    score: Option<f64>,
}

/// A classifier verdict with the confidence reported by the service.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Classification {
    pub sentiment: Sentiment,
    pub score: Option<f64>,
}

#[derive(Debug, Clone)]
pub struct SentimentClient {
    http: reqwest::Client,
    config: SentimentConfig,
}

impl SentimentClient {
    pub fn new(config: SentimentConfig, timeout: Duration) -> Result<Self, SentimentError> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { http, config })
    }

    pub async fn try_classify(&self, text: &str) -> Result<Classification, SentimentError> {
        let mut req = self
            .http
            .post(&self.config.url)
            .header(MODEL_HEADER, &self.config.model)
            .json(&ClassifyRequest {
                raw_document: RawDocument { text },
            });
        if let Some(key) = &self.config.api_key {
            req = req.basic_auth("apikey", Some(key));
        }

        let resp = req.send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(SentimentError::Unavailable {
                status: status.as_u16(),
            });
        }

        let body: ClassifyResponse = resp
            .json()
            .await
            .map_err(|e| SentimentError::Malformed(e.to_string()))?;
        let DocumentSentiment { label, score } = body.document_sentiment;
        let sentiment =
            Sentiment::from_label(&label).ok_or(SentimentError::UnknownLabel(label))?;

        debug!("[SENTIMENT] {} (score {:?})", sentiment, score);
        Ok(Classification { sentiment, score })
    }
}

#[async_trait]
impl SentimentClassifier for SentimentClient {
    async fn classify(&self, text: &str) -> Option<Sentiment> {
        match self.try_classify(text).await {
            Ok(classification) => Some(classification.sentiment),
            Err(err) => {
                warn!("[SENTIMENT] No label: {}", err);
                None
            }
        }
    }
}
