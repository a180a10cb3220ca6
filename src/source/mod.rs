//! Review sources: where classified reviews for a product query come from.
//!
//! The comparison service only sees the [`ReviewSource`] trait. An empty
//! vector means "no reviews for this product"; an `Err` means the source
//! itself failed and the comparison must not go ahead.

pub mod dataset;
pub mod remote;

use async_trait::async_trait;
use std::collections::HashMap;

use crate::error::SourceError;
use crate::models::{ProductName, ReviewRecord};

pub use dataset::ReviewDataset;
pub use remote::RemoteReviewSource;

#[async_trait]
pub trait ReviewSource: Send + Sync {
    /// Short label for logs and the health endpoint.
    fn name(&self) -> &'static str;

    /// Classified reviews for `product`, each keyed to `product.as_str()`.
    async fn fetch_reviews(&self, product: &ProductName) -> Result<Vec<ReviewRecord>, SourceError>;
}

/// Fixed reviews keyed by exact product query. Handy for fixtures and demos.
#[derive(Debug, Clone, Default)]
pub struct InMemoryReviewSource {
    reviews: HashMap<String, Vec<ReviewRecord>>,
}

impl InMemoryReviewSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `records` under `product`, rekeying them to that query.
    pub fn with_reviews(mut self, product: &str, records: Vec<ReviewRecord>) -> Self {
        let records = records
            .into_iter()
            .map(|mut r| {
                r.product = product.to_string();
                r
            })
            .collect::<Vec<_>>();
        self.reviews.entry(product.to_string()).or_default().extend(records);
        self
    }
}

#[async_trait]
impl ReviewSource for InMemoryReviewSource {
    fn name(&self) -> &'static str {
        "memory"
    }

    async fn fetch_reviews(&self, product: &ProductName) -> Result<Vec<ReviewRecord>, SourceError> {
        Ok(self.reviews.get(product.as_str()).cloned().unwrap_or_default())
    }
}
