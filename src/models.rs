//! Request, record and response types shared by the engine and the HTTP layer.

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use utoipa::ToSchema;

use crate::error::CompareError;

/// Minimum number of products in one comparison.
pub const MIN_PRODUCTS: usize = 2;
/// Maximum number of products in one comparison.
pub const MAX_PRODUCTS: usize = 5;

/// Winner value reported when no submitted product has any review.
pub const NO_DATA_WINNER: &str = "No data found";

/// Key used for the aspect label inside chart rows. A product may not use it as its name.
pub const ASPECT_ROW_KEY: &str = "aspect";

// ============================================================================
// Product identifiers
// ============================================================================

/// A validated product query: trimmed, non-empty, used verbatim as a response key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct ProductName(String);

impl ProductName {
    /// Trims the raw input. Returns `None` for blank strings.
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProductName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ProductName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Validates the submitted product list.
///
/// Blank entries are dropped (the form leaves empty slots), the rest are
/// trimmed. What remains must hold between [`MIN_PRODUCTS`] and
/// [`MAX_PRODUCTS`] distinct names, none of them equal to [`ASPECT_ROW_KEY`]
/// or [`NO_DATA_WINNER`].
pub fn parse_product_list(raw: &[String]) -> Result<Vec<ProductName>, CompareError> {
    let mut products: Vec<ProductName> = Vec::with_capacity(raw.len());

    for name in raw.iter().filter_map(|r| ProductName::parse(r)) {
        if name.as_str() == ASPECT_ROW_KEY || name.as_str() == NO_DATA_WINNER {
            return Err(CompareError::ReservedName(name.0));
        }
        if products.contains(&name) {
            return Err(CompareError::DuplicateProduct(name.0));
        }
        products.push(name);
    }

    if products.len() < MIN_PRODUCTS {
        return Err(CompareError::TooFewProducts);
    }
    if products.len() > MAX_PRODUCTS {
        return Err(CompareError::TooManyProducts);
    }
    Ok(products)
}

// ============================================================================
// Review records
// ============================================================================

/// Review language as reported by the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Hindi,
    Marathi,
    #[serde(other)]
    Other,
}

impl Language {
    /// Accepts full names and ISO 639-1 codes, case-insensitively.
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_lowercase().as_str() {
            "hindi" | "hi" => Language::Hindi,
            "marathi" | "mr" => Language::Marathi,
            _ => Language::Other,
        }
    }
}

/// One classified review. Produced by a review source, never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReviewRecord {
    /// The submitted query this review was fetched for.
    pub product: String,
    pub language: Language,
    pub aspect: String,
    /// Classifier output on the `[0, 1]` scale, 1 being fully positive.
    pub sentiment_score: f64,
    #[serde(default)]
    pub rating: Option<u8>,
    pub text: String,
}

impl ReviewRecord {
    /// Checks the record against the value ranges the aggregator relies on.
    pub fn validate(&self) -> Result<(), String> {
        if !self.sentiment_score.is_finite() || !(0.0..=1.0).contains(&self.sentiment_score) {
            return Err(format!(
                "sentiment score {} outside [0, 1]",
                self.sentiment_score
            ));
        }
        if let Some(rating) = self.rating {
            if rating > 5 {
                return Err(format!("rating {} outside [0, 5]", rating));
            }
        }
        if self.aspect.trim().is_empty() {
            return Err("blank aspect label".to_string());
        }
        Ok(())
    }
}

/// All reviews fetched for one submitted product. An empty `records` means no data.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductReviews {
    pub product: ProductName,
    pub records: Vec<ReviewRecord>,
}

impl ProductReviews {
    pub fn new(product: ProductName, records: Vec<ReviewRecord>) -> Self {
        Self { product, records }
    }

    pub fn empty(product: ProductName) -> Self {
        Self::new(product, Vec::new())
    }
}

// ============================================================================
// Aggregates
// ============================================================================

/// Aggregate sentiment for one (product, aspect) pair, on a 0-100 scale.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AspectScore {
    pub product: String,
    pub aspect: String,
    pub score: f64,
    pub sample_count: usize,
}

/// Coarse verdict attached to an overall score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum OverallSentiment {
    Positive,
    Neutral,
    Negative,
    Unknown,
}

/// Summary entry for one submitted product.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductOverall {
    #[schema(value_type = String)]
    pub name: ProductName,
    /// 0-10. Exactly 0 when the product has no reviews; check `reviewsFound`.
    pub score: f64,
    pub sentiment: OverallSentiment,
    pub review_count: usize,
    #[serde(skip)]
    pub reviews_found: bool,
}

/// Outcome of winner selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Winner {
    Product(ProductName),
    NoData,
}

impl Winner {
    pub fn as_str(&self) -> &str {
        match self {
            Winner::Product(name) => name.as_str(),
            Winner::NoData => NO_DATA_WINNER,
        }
    }
}

impl Serialize for Winner {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Review excerpt shown under each product.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct DisplayReview {
    pub text: String,
    pub rating: Option<u8>,
    pub language: Language,
    pub aspect: String,
}

/// Review counts per language.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, ToSchema)]
pub struct LanguageStats {
    pub hindi: usize,
    pub marathi: usize,
    pub other: usize,
}

impl LanguageStats {
    pub fn from_records<'a>(records: impl IntoIterator<Item = &'a ReviewRecord>) -> Self {
        let mut stats = Self::default();
        for record in records {
            match record.language {
                Language::Hindi => stats.hindi += 1,
                Language::Marathi => stats.marathi += 1,
                Language::Other => stats.other += 1,
            }
        }
        stats
    }
}

// ============================================================================
// Ordered per-product mapping
// ============================================================================

/// Insertion-ordered map keyed by [`ProductName`], serialised as a JSON object.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductMap<T> {
    entries: Vec<(ProductName, T)>,
}

impl<T> Default for ProductMap<T> {
    fn default() -> Self {
        Self { entries: Vec::new() }
    }
}

impl<T> ProductMap<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces the value for `product`, keeping first-insertion order.
    pub fn insert(&mut self, product: ProductName, value: T) {
        match self.entries.iter_mut().find(|(k, _)| *k == product) {
            Some(slot) => slot.1 = value,
            None => self.entries.push((product, value)),
        }
    }

    pub fn get(&self, product: &str) -> Option<&T> {
        self.entries
            .iter()
            .find(|(k, _)| k.as_str() == product)
            .map(|(_, v)| v)
    }

    pub fn keys(&self) -> impl Iterator<Item = &ProductName> {
        self.entries.iter().map(|(k, _)| k)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ProductName, &T)> {
        self.entries.iter().map(|(k, v)| (k, v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<T: Serialize> Serialize for ProductMap<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, value) in &self.entries {
            map.serialize_entry(key.as_str(), value)?;
        }
        map.end()
    }
}

/// One chart row: `{"aspect": <label>, "<product>": <score>, ...}`.
#[derive(Debug, Clone, PartialEq)]
pub struct AspectRow {
    pub aspect: String,
    pub values: Vec<(ProductName, f64)>,
}

impl AspectRow {
    pub fn value(&self, product: &str) -> Option<f64> {
        self.values
            .iter()
            .find(|(name, _)| name.as_str() == product)
            .map(|(_, score)| *score)
    }
}

impl Serialize for AspectRow {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.values.len() + 1))?;
        map.serialize_entry(ASPECT_ROW_KEY, &self.aspect)?;
        for (product, score) in &self.values {
            map.serialize_entry(product.as_str(), score)?;
        }
        map.end()
    }
}

// ============================================================================
// Comparison request / response
// ============================================================================

#[derive(Debug, Deserialize, ToSchema)]
pub struct CompareRequest {
    #[serde(default)]
    pub products: Vec<String>,
}

/// The assembled comparison. Built fresh per request.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonResult {
    /// Submission order, not rank order.
    pub overall: Vec<ProductOverall>,
    #[schema(value_type = String)]
    pub winner: Winner,
    #[schema(value_type = Vec<Object>)]
    pub radar_data: Vec<AspectRow>,
    #[schema(value_type = Vec<Object>)]
    pub aspects: Vec<AspectRow>,
    #[schema(value_type = Object)]
    pub reviews_found: ProductMap<bool>,
    #[schema(value_type = Object)]
    pub strengths: ProductMap<Vec<String>>,
    #[schema(value_type = Object)]
    pub weaknesses: ProductMap<Vec<String>>,
    #[schema(value_type = Object)]
    pub reviews: ProductMap<Vec<DisplayReview>>,
    #[schema(value_type = Object)]
    pub language_stats: ProductMap<LanguageStats>,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct CompareResponse {
    #[schema(value_type = Vec<String>)]
    pub products: Vec<ProductName>,
    pub comparison: ComparisonResult,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
        }
    }
}
