//! Review enrichment: fetch a dealer's reviews and label each one with a sentiment.
//!
//! Classification runs sequentially, one classifier call per review, so the cost of
//! a dealer page grows linearly with its review count.

use tracing::{info, warn};

use crate::cloud::ReviewSource;
use crate::models::review::Review;
use crate::sentiment::SentimentClassifier;

pub struct ReviewPipeline<S, C> {
    source: S,
    classifier: C,
}

impl<S, C> ReviewPipeline<S, C>
where
    S: ReviewSource,
    C: SentimentClassifier,
{
    pub fn new(source: S, classifier: C) -> Self {
        Self { source, classifier }
    }

    /// Enriched reviews for `dealer_id`, in the order the remote source returned them.
    ///
    /// A failed fetch yields an empty list. A record missing required fields is
    /// skipped. A review whose classification fails is kept with no sentiment.
    pub async fn enrich(&self, dealer_id: i64) -> Vec<Review> {
        let records = match self.source.raw_reviews(dealer_id).await {
            Ok(records) => records,
            Err(err) => {
                warn!("[PIPELINE] Reviews for dealer {} unavailable: {}", dealer_id, err);
                return Vec::new();
            }
        };

        let mut reviews = Vec::with_capacity(records.len());
        for (index, record) in records.iter().enumerate() {
            let review = match Review::from_value(record) {
                Ok(review) => review,
                Err(err) => {
                    warn!(
                        "[PIPELINE] Skipping review #{} for dealer {}: {}",
                        index, dealer_id, err
                    );
                    continue;
                }
            };
            let sentiment = self.classifier.classify(&review.review).await;
            reviews.push(review.with_sentiment(sentiment));
        }

        info!(
            "[PIPELINE] Dealer {}: {} of {} reviews enriched",
            dealer_id,
            reviews.len(),
            records.len()
        );
        reviews
    }
}
