//! HTTP client for an external scraping/classification service.
//!
//! Contract: `GET {base}/reviews?product=<query>` answers
//! `{"reviews": [{"text", "language"?, "aspect"?, "sentimentScore"?, "rating"?}]}`.
//! An empty list is a valid "no reviews" answer; anything else that is not a
//! 2xx JSON body is treated as a source failure, except a client timeout,
//! which is reported as [`SourceError::TimedOut`].

use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;

use crate::error::SourceError;
use crate::ml;
use crate::models::{Language, ProductName, ReviewRecord};
use crate::source::ReviewSource;

#[derive(Debug, Deserialize)]
struct ReviewsResponse {
    reviews: Vec<RemoteReview>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RemoteReview {
    text: String,
    #[serde(default)]
    language: Option<String>,
    #[serde(default)]
    aspect: Option<String>,
    #[serde(default)]
    sentiment_score: Option<f64>,
    #[serde(default)]
    rating: Option<u8>,
}

/// Turns one wire review into records keyed to `product`.
///
/// Reviews without an aspect label are tagged by keyword, one record per aspect
/// mentioned. Reviews without a classifier score are scored by the lexicon.
fn into_records(product: &ProductName, review: RemoteReview) -> Vec<ReviewRecord> {
    let sentiment_score = review
        .sentiment_score
        .unwrap_or_else(|| ml::analyze_sentiment(&review.text).score);
    let language = review
        .language
        .as_deref()
        .map(Language::from_label)
        .unwrap_or(Language::Other);

    let aspects: Vec<String> = match review.aspect.as_deref().map(str::trim) {
        Some(aspect) if !aspect.is_empty() => vec![aspect.to_string()],
        _ => ml::extract_aspects(&review.text)
            .into_iter()
            .map(str::to_string)
            .collect(),
    };

    aspects
        .into_iter()
        .map(|aspect| ReviewRecord {
            product: product.to_string(),
            language,
            aspect,
            sentiment_score,
            rating: review.rating,
            text: review.text.clone(),
        })
        .collect()
}

/// Review source backed by the scraping sidecar.
#[derive(Debug, Clone)]
pub struct RemoteReviewSource {
    client: reqwest::Client,
    base_url: String,
}

impl RemoteReviewSource {
    /// `request_timeout` bounds a single HTTP call; the comparison service applies its own deadline on top.
    pub fn new(base_url: &str, request_timeout: Duration) -> Result<Self, SourceError> {
        let client = reqwest::Client::builder()
            .timeout(request_timeout)
            .build()
            .map_err(|e| SourceError::Unavailable(e.to_string()))?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn reviews_url(&self, product: &ProductName) -> String {
        format!(
            "{}/reviews?product={}",
            self.base_url,
            urlencoding::encode(product.as_str())
        )
    }
}

#[async_trait]
impl ReviewSource for RemoteReviewSource {
    fn name(&self) -> &'static str {
        "remote"
    }

    async fn fetch_reviews(&self, product: &ProductName) -> Result<Vec<ReviewRecord>, SourceError> {
        let url = self.reviews_url(product);
        tracing::debug!("🌐 Fetching reviews: {}", url);

        let response = self.client.get(&url).send().await.map_err(|e| {
            if e.is_timeout() {
                return SourceError::TimedOut;
            }
            tracing::warn!("⚠️ Review service connection failed: {}", e);
            SourceError::Unavailable(e.to_string())
        })?;

        if !response.status().is_success() {
            tracing::warn!("⚠️ Review service answered {} for {}", response.status(), product);
            return Err(SourceError::Status(response.status().as_u16()));
        }

        let body = response
            .json::<ReviewsResponse>()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    SourceError::TimedOut
                } else {
                    SourceError::Malformed(e.to_string())
                }
            })?;

        let records: Vec<ReviewRecord> = body
            .reviews
            .into_iter()
            .flat_map(|review| into_records(product, review))
            .collect();

        tracing::info!("📝 Review service returned {} records for {}", records.len(), product);
        Ok(records)
    }
}
