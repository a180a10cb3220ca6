//! Request pipeline: fetch reviews for every product concurrently, then run the engine.

use futures::future::join_all;
use std::sync::Arc;
use std::time::Duration;
use tracing::Instrument;
use uuid::Uuid;

use crate::engine::{self, BuildOptions};
use crate::error::{CompareError, SourceError};
use crate::models::{CompareResponse, ProductName, ProductReviews, ReviewRecord};
use crate::source::ReviewSource;

enum FetchOutcome {
    Reviews(Vec<ReviewRecord>),
    TimedOut,
    Failed(SourceError),
}

/// Runs comparisons against one review source. Cheap to share behind an `Arc`.
pub struct ComparisonService {
    source: Arc<dyn ReviewSource>,
    fetch_timeout: Duration,
    options: BuildOptions,
}

impl ComparisonService {
    pub fn new(source: Arc<dyn ReviewSource>, fetch_timeout: Duration, options: BuildOptions) -> Self {
        Self {
            source,
            fetch_timeout,
            options,
        }
    }

    pub fn source_name(&self) -> &'static str {
        self.source.name()
    }

    async fn fetch_one(&self, product: &ProductName) -> FetchOutcome {
        match tokio::time::timeout(self.fetch_timeout, self.source.fetch_reviews(product)).await {
            Ok(Ok(records)) => FetchOutcome::Reviews(records),
            Ok(Err(SourceError::TimedOut)) | Err(_) => {
                tracing::warn!(
                    "⏱️ Fetching reviews for {} exceeded {:?}, treating as no data",
                    product,
                    self.fetch_timeout
                );
                FetchOutcome::TimedOut
            }
            Ok(Err(e)) => FetchOutcome::Failed(e),
        }
    }

    /// Compares already-validated products.
    ///
    /// Waits for every fetch to finish or time out before aggregating. A timed
    /// out product counts as "no reviews"; a source error fails the request.
    pub async fn compare(&self, products: Vec<ProductName>) -> Result<CompareResponse, CompareError> {
        let request_id = Uuid::new_v4();
        let span = tracing::info_span!("compare", %request_id, source = self.source.name());

        async move {
            tracing::info!("📊 Comparing products: {:?}", products.iter().map(|p| p.as_str()).collect::<Vec<_>>());

            let outcomes = join_all(products.iter().map(|p| self.fetch_one(p))).await;

            let mut batch = Vec::with_capacity(products.len());
            let mut timed_out = 0usize;
            for (product, outcome) in products.iter().zip(outcomes) {
                match outcome {
                    FetchOutcome::Reviews(records) => {
                        batch.push(ProductReviews::new(product.clone(), records));
                    }
                    FetchOutcome::TimedOut => {
                        timed_out += 1;
                        batch.push(ProductReviews::empty(product.clone()));
                    }
                    FetchOutcome::Failed(source) => {
                        return Err(CompareError::Upstream {
                            product: product.to_string(),
                            source,
                        });
                    }
                }
            }

            if timed_out > 0 && batch.iter().all(|p| p.records.is_empty()) {
                return Err(CompareError::AllTimedOut);
            }

            let comparison = engine::compare(&batch, self.options)?;
            tracing::info!("✅ Analysis complete. Winner: {}", comparison.winner.as_str());

            Ok(CompareResponse { products, comparison })
        }
        .instrument(span)
        .await
    }
}
