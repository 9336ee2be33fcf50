use std::{env, fmt::Display, str::FromStr, time::Duration};

use tracing::info;

use crate::error::ConfigError;

const DEFAULT_DEALERS_URL: &str = "http://127.0.0.1:3000/dealerships/get";
const DEFAULT_REVIEWS_URL: &str = "http://127.0.0.1:5000/api/get_reviews";
const DEFAULT_POST_REVIEW_URL: &str = "http://127.0.0.1:5000/api/post_review";
const DEFAULT_SENTIMENT_URL: &str =
    "http://127.0.0.1:8080/v1/watson.runtime.nlp.v1/NlpService/SentimentPredict";
const DEFAULT_SENTIMENT_MODEL: &str = "sentiment_aggregated-bert-workflow_lang_multi_stock";

/// Remote cloud-function endpoints for dealers and reviews.
#[derive(Debug, Clone)]
pub struct Endpoints {
    pub dealers_url: String,
    pub reviews_url: String,
    pub post_review_url: String,
}

/// Settings for the sentiment classifier client.
#[derive(Debug, Clone)]
pub struct SentimentConfig {
    pub url: String,
    pub model: String,
    pub api_key: Option<String>,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub bind_addr: String,
    pub database_path: String,
    pub endpoints: Endpoints,
    pub sentiment: SentimentConfig,
    pub request_timeout: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            bind_addr: try_load("BIND_ADDR", "127.0.0.1:8000")?,
            database_path: try_load("DATABASE_PATH", "dealerships.db")?,
            endpoints: Endpoints {
                dealers_url: try_load("DEALERS_URL", DEFAULT_DEALERS_URL)?,
                reviews_url: try_load("REVIEWS_URL", DEFAULT_REVIEWS_URL)?,
                post_review_url: try_load("POST_REVIEW_URL", DEFAULT_POST_REVIEW_URL)?,
            },
            sentiment: SentimentConfig {
                url: try_load("SENTIMENT_URL", DEFAULT_SENTIMENT_URL)?,
                model: try_load("SENTIMENT_MODEL", DEFAULT_SENTIMENT_MODEL)?,
                api_key: env::var("SENTIMENT_API_KEY")
                    .ok()
                    .filter(|key| !key.trim().is_empty()),
            },
            request_timeout: Duration::from_secs(try_load("REQUEST_TIMEOUT_SECS", "10")?),
        })
    }
}

fn try_load<T: FromStr>(key: &'static str, default: &str) -> Result<T, ConfigError>
where
    T::Err: Display,
{
    let raw = env::var(key).unwrap_or_else(|_| {
        info!("{key} not set, using default: {default}");
        default.to_string()
    });

    raw.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
        key,
        reason: e.to_string(),
    })
}
