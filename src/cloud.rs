use async_trait::async_trait;
use serde_json::Value;
use tracing::{info, warn};

use crate::config::Endpoints;
use crate::error::RemoteError;
use crate::models::dealer::Dealer;
use crate::models::review::ReviewSubmission;
use crate::remote::{RemoteClient, NO_PARAMS};

/// Where raw review records come from.
#[async_trait]
pub trait ReviewSource: Send + Sync {
    async fn raw_reviews(&self, dealer_id: i64) -> Result<Vec<Value>, RemoteError>;
}

/// The dealer and review cloud functions.
#[derive(Debug, Clone)]
pub struct CloudFunctions {
    client: RemoteClient,
    endpoints: Endpoints,
}

impl CloudFunctions {
    pub fn new(client: RemoteClient, endpoints: Endpoints) -> Self {
        Self { client, endpoints }
    }

    /// All dealers; empty when the remote store is unreachable. Malformed records are skipped.
    pub async fn get_dealers(&self) -> Vec<Dealer> {
        let records = self
            .client
            .fetch_list(&self.endpoints.dealers_url, NO_PARAMS)
            .await;
        let dealers: Vec<Dealer> = records
            .iter()
            .filter_map(|record| match Dealer::from_value(record) {
                Ok(dealer) => Some(dealer),
                Err(err) => {
                    warn!("[REMOTE] Skipping dealer record: {}", err);
                    None
                }
            })
            .collect();
        info!("[REMOTE] Loaded {} dealers", dealers.len());
        dealers
    }

    /// The dealer whose id is `id`, if the remote store has it.
    pub async fn get_dealer(&self, id: i64) -> Option<Dealer> {
        let record = self.client.fetch_one(&self.endpoints.dealers_url, id).await?;
        match Dealer::from_value(&record) {
            Ok(dealer) if dealer.id == id => Some(dealer),
            Ok(dealer) => {
                warn!("[REMOTE] Asked for dealer {} but got {}", id, dealer.id);
                None
            }
            Err(err) => {
                warn!("[REMOTE] Dealer {} is malformed: {}", id, err);
                None
            }
        }
    }

    /// Forwards a review to the remote store and returns the HTTP status it answered with.
    pub async fn post_review(
        &self,
        submission: &ReviewSubmission,
    ) -> Result<reqwest::StatusCode, RemoteError> {
        let resp = self
            .client
            .submit(
                &self.endpoints.post_review_url,
                &submission.envelope(),
                &[("id", submission.dealership)],
            )
            .await?;
        Ok(resp.status())
    }
}

#[async_trait]
impl ReviewSource for CloudFunctions {
    async fn raw_reviews(&self, dealer_id: i64) -> Result<Vec<Value>, RemoteError> {
        self.client
            .try_fetch_list(&self.endpoints.reviews_url, &[("id", dealer_id)])
            .await
    }
}
