//! CSV-backed review dataset.
//!
//! Columns: `product_name, category, text, rating, aspect, language`. Rows
//! without a rating get their sentiment from the keyword analyzer.

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::io::Read;
use std::path::Path;
use utoipa::ToSchema;

use crate::engine::{scoring, summary, AspectAggregate};
use crate::error::SourceError;
use crate::ml;
use crate::models::{
    AspectScore, DisplayReview, Language, LanguageStats, ProductName, ReviewRecord,
};
use crate::source::ReviewSource;

#[derive(Debug, Deserialize)]
struct DatasetRow {
    product_name: String,
    #[serde(default)]
    category: String,
    text: String,
    #[serde(default)]
    rating: Option<u8>,
    #[serde(default)]
    aspect: String,
    #[serde(default)]
    language: String,
}

/// One dataset row after parsing.
#[derive(Debug, Clone)]
pub struct DatasetReview {
    pub product_name: String,
    pub category: String,
    pub text: String,
    pub rating: Option<u8>,
    pub aspect: String,
    pub language: Language,
    pub sentiment_score: f64,
}

/// Everything known about one product query, for the details endpoint.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ProductDetails {
    pub product_name: String,
    pub category: String,
    pub total_reviews: usize,
    pub overall_score: f64,
    pub aspect_scores: BTreeMap<String, f64>,
    pub language_stats: LanguageStats,
    pub reviews: Vec<DisplayReview>,
}

/// Reviews loaded once at startup, read-only afterwards.
#[derive(Debug, Clone, Default)]
pub struct ReviewDataset {
    rows: Vec<DatasetReview>,
}

impl ReviewDataset {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = std::fs::File::open(path)
            .with_context(|| format!("failed to open review dataset {}", path.display()))?;
        let dataset = Self::from_reader(file)
            .with_context(|| format!("failed to parse review dataset {}", path.display()))?;

        tracing::info!(
            "✅ Loaded {} reviews ({} products) from {}",
            dataset.len(),
            dataset.products(None).len(),
            path.display()
        );
        Ok(dataset)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut csv_reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
        let mut rows = Vec::new();

        for (index, row) in csv_reader.deserialize::<DatasetRow>().enumerate() {
            let row = row.with_context(|| format!("invalid dataset row {}", index + 1))?;
            if row.product_name.is_empty() {
                continue;
            }
            let rating = row.rating;
            if let Some(r) = rating.filter(|r| *r > 5) {
                bail!("dataset row {}: rating {} outside [0, 5]", index + 1, r);
            }
            let sentiment_score = match rating {
                Some(r) => f64::from(r) / 5.0,
                None => ml::analyze_sentiment(&row.text).score,
            };
            let aspect = if row.aspect.is_empty() {
                ml::extract_aspects(&row.text)[0].to_string()
            } else {
                row.aspect
            };

            rows.push(DatasetReview {
                product_name: row.product_name,
                category: row.category,
                text: row.text,
                rating,
                aspect,
                language: Language::from_label(&row.language),
                sentiment_score,
            });
        }

        Ok(Self { rows })
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    // Case-insensitive substring match of the query against product names
    fn matching<'a>(&'a self, query: &str) -> impl Iterator<Item = &'a DatasetReview> + 'a {
        let needle = query.trim().to_lowercase();
        self.rows
            .iter()
            .filter(move |r| !needle.is_empty() && r.product_name.to_lowercase().contains(&needle))
    }

    /// Reviews matching `product`, keyed to the query string.
    pub fn reviews_for(&self, product: &ProductName) -> Vec<ReviewRecord> {
        self.matching(product.as_str())
            .map(|r| ReviewRecord {
                product: product.to_string(),
                language: r.language,
                aspect: r.aspect.clone(),
                sentiment_score: r.sentiment_score,
                rating: r.rating,
                text: r.text.clone(),
            })
            .collect()
    }

    /// Distinct product names, sorted, optionally restricted to one category.
    pub fn products(&self, category: Option<&str>) -> Vec<String> {
        self.rows
            .iter()
            .filter(|r| category.map_or(true, |c| r.category == c))
            .map(|r| r.product_name.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    pub fn categories(&self) -> Vec<String> {
        self.rows
            .iter()
            .filter(|r| !r.category.is_empty())
            .map(|r| r.category.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Product names containing `query`, in dataset order.
    pub fn search(&self, query: &str, category: Option<&str>) -> Vec<String> {
        let mut found: Vec<String> = Vec::new();
        for row in self
            .matching(query)
            .filter(|r| category.map_or(true, |c| r.category == c))
        {
            if !found.contains(&row.product_name) {
                found.push(row.product_name.clone());
            }
        }
        found
    }

    pub fn product_details(&self, product: &ProductName, sample_reviews: usize) -> Option<ProductDetails> {
        let records = self.reviews_for(product);
        if records.is_empty() {
            return None;
        }

        let category = self
            .matching(product.as_str())
            .next()
            .map(|r| r.category.clone())
            .filter(|c| !c.is_empty())
            .unwrap_or_else(|| "unknown".to_string());

        let aggregate = AspectAggregate::from_records(&records);
        let scores: Vec<&AspectScore> = aggregate.scores_for(product.as_str()).collect();

        Some(ProductDetails {
            product_name: product.to_string(),
            category,
            total_reviews: records.len(),
            overall_score: scoring::overall_score(scores.iter().copied()),
            aspect_scores: scores.iter().map(|s| (s.aspect.clone(), s.score)).collect(),
            language_stats: LanguageStats::from_records(&records),
            reviews: summary::sample_reviews(&records, sample_reviews),
        })
    }
}

#[async_trait]
impl ReviewSource for ReviewDataset {
    fn name(&self) -> &'static str {
        "dataset"
    }

    async fn fetch_reviews(&self, product: &ProductName) -> Result<Vec<ReviewRecord>, SourceError> {
        let records = self.reviews_for(product);
        if records.is_empty() {
            tracing::warn!("⚠️ No reviews found for: {}", product);
        } else {
            tracing::info!("📝 Found {} reviews for {}", records.len(), product);
        }
        Ok(records)
    }
}
