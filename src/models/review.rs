// src/models/review.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::car::CarModel;
use super::{bool_or_string, int_or_string, opt_int_or_string};

/// Coarse classifier output attached to a review.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Positive,
    Neutral,
    Negative,
}

impl Sentiment {
    /// Maps a classifier label (`SENT_POSITIVE`, `positive`, ...) onto the three coarse labels.
    pub fn from_label(label: &str) -> Option<Self> {
        let label = label.trim().to_ascii_lowercase();
        match label.strip_prefix("sent_").unwrap_or(label.as_str()) {
            "positive" => Some(Sentiment::Positive),
            "neutral" => Some(Sentiment::Neutral),
            "negative" => Some(Sentiment::Negative),
            _ => None,
        }
    }
}

impl std::fmt::Display for Sentiment {
    fn fmt(&self, fmt: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Sentiment::Positive => write!(fmt, "positive"),
            Sentiment::Neutral => write!(fmt, "neutral"),
            Sentiment::Negative => write!(fmt, "negative"),
        }
    }
}

/// A dealer review as served by the review cloud function, plus its sentiment once enriched.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Review {
    #[serde(deserialize_with = "int_or_string")]
    pub id: i64,
    #[serde(deserialize_with = "int_or_string")]
    pub dealership: i64, // Dealer the review belongs to
    pub name: String,    // Reviewer name
    pub review: String,  // Free-text review
    #[serde(deserialize_with = "bool_or_string")]
    pub purchase: bool,
    #[serde(default)]
    pub purchase_date: Option<String>,
    #[serde(default)]
    pub car_make: Option<String>,
    #[serde(default)]
    pub car_model: Option<String>,
    #[serde(default, deserialize_with = "opt_int_or_string")]
    pub car_year: Option<i64>,
    #[serde(default)]
    pub sentiment: Option<Sentiment>,
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub doc_id: Option<String>,
    #[serde(rename = "_rev", default, skip_serializing_if = "Option::is_none")]
    pub doc_rev: Option<String>,
}

impl Review {
    /// Builds a review from a raw remote record.
    pub fn from_value(value: &Value) -> Result<Self, serde_json::Error> {
        Review::deserialize(value)
    }

    pub fn with_sentiment(self, sentiment: Option<Sentiment>) -> Self {
        Review { sentiment, ..self }
    }
}

/// Body of a review post; the remote store expects it wrapped as `{"review": {...}}`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ReviewSubmission {
    pub time: String,
    pub name: String,
    pub dealership: i64,
    pub id: i64,
    pub review: String,
    pub purchase: bool,
    pub purchase_date: String,
    pub car_make: String,
    pub car_model: String,
    pub car_year: i32,
}

impl ReviewSubmission {
    /// Snapshots the reviewer and the referenced car as they are at `now`.
    pub fn new(
        username: &str,
        dealer_id: i64,
        content: String,
        purchase: bool,
        purchase_date: String,
        car: &CarModel,
        now: DateTime<Utc>,
    ) -> Self {
        ReviewSubmission {
            time: now.naive_utc().format("%Y-%m-%dT%H:%M:%S%.6f").to_string(),
            name: username.to_string(),
            dealership: dealer_id,
            id: dealer_id,
            review: content,
            purchase,
            purchase_date,
            car_make: car.make.name.clone(),
            car_model: car.name.clone(),
            car_year: car.model_year(),
        }
    }

    pub fn envelope(&self) -> ReviewEnvelope<'_> {
        ReviewEnvelope { review: self }
    }
}

#[derive(Serialize, Debug)]
pub struct ReviewEnvelope<'a> {
    pub review: &'a ReviewSubmission,
}
