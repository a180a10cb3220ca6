//! Assembles aggregator, scorer, ranker and summarizer output into a [`ComparisonResult`].

use crate::engine::aggregate::AspectAggregate;
use crate::engine::{ranking, scoring, summary};
use crate::models::{
    AspectRow, ComparisonResult, LanguageStats, ProductMap, ProductOverall, ProductReviews,
};

/// Knobs for response assembly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuildOptions {
    pub sample_reviews: usize,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            sample_reviews: summary::DEFAULT_SAMPLE_REVIEWS,
        }
    }
}

/// One row per aspect seen for any product, every product present in every row.
fn chart_rows(batch: &[ProductReviews], aggregate: &AspectAggregate) -> Vec<AspectRow> {
    aggregate
        .aspect_vocabulary()
        .into_iter()
        .map(|aspect| AspectRow {
            aspect: aspect.to_string(),
            values: batch
                .iter()
                .map(|p| {
                    let score = aggregate
                        .get(p.product.as_str(), aspect)
                        .map(|s| s.score)
                        .unwrap_or(0.0);
                    (p.product.clone(), score)
                })
                .collect(),
        })
        .collect()
}

/// Builds the response for `batch`, which must be in submission order.
///
/// Every product in the batch gets an entry in every per-product mapping,
/// with empty or zero values when it has no reviews.
pub fn build_comparison(batch: &[ProductReviews], options: BuildOptions) -> ComparisonResult {
    let aggregate = AspectAggregate::from_records(batch.iter().flat_map(|p| p.records.iter()));

    let overall: Vec<ProductOverall> = batch
        .iter()
        .map(|p| scoring::score_product(&p.product, &aggregate, p.records.len()))
        .collect();
    let winner = ranking::select_winner(&overall);

    let mut reviews_found = ProductMap::new();
    let mut strengths = ProductMap::new();
    let mut weaknesses = ProductMap::new();
    let mut reviews = ProductMap::new();
    let mut language_stats = ProductMap::new();

    for p in batch {
        let highlights = summary::highlights(aggregate.scores_for(p.product.as_str()));
        reviews_found.insert(p.product.clone(), !p.records.is_empty());
        strengths.insert(p.product.clone(), highlights.strengths);
        weaknesses.insert(p.product.clone(), highlights.weaknesses);
        reviews.insert(
            p.product.clone(),
            summary::sample_reviews(&p.records, options.sample_reviews),
        );
        language_stats.insert(p.product.clone(), LanguageStats::from_records(&p.records));
    }

    let aspects = chart_rows(batch, &aggregate);

    ComparisonResult {
        overall,
        winner,
        radar_data: aspects.clone(),
        aspects,
        reviews_found,
        strengths,
        weaknesses,
        reviews,
        language_stats,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Language, ProductName, ReviewRecord, Winner};

    fn record(product: &str, aspect: &str, sentiment: f64) -> ReviewRecord {
        ReviewRecord {
            product: product.to_string(),
            language: Language::Hindi,
            aspect: aspect.to_string(),
            sentiment_score: sentiment,
            rating: None,
            text: format!("{} review", aspect),
        }
    }

    fn batch(entries: Vec<(&str, Vec<ReviewRecord>)>) -> Vec<ProductReviews> {
        entries
            .into_iter()
            .map(|(name, records)| ProductReviews::new(ProductName::parse(name).unwrap(), records))
            .collect()
    }

    #[test]
    fn test_preserves_submission_order_and_keys() {
        let input = batch(vec![
            ("Zeta", vec![record("Zeta", "Camera", 0.9)]),
            ("Alpha", vec![]),
            ("Mid", vec![record("Mid", "Battery", 0.5)]),
        ]);
        let result = build_comparison(&input, BuildOptions::default());

        let names: Vec<&str> = result.overall.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Zeta", "Alpha", "Mid"]);
        for map_keys in [
            result.reviews_found.keys().map(|k| k.as_str()).collect::<Vec<_>>(),
            result.strengths.keys().map(|k| k.as_str()).collect(),
            result.weaknesses.keys().map(|k| k.as_str()).collect(),
            result.reviews.keys().map(|k| k.as_str()).collect(),
            result.language_stats.keys().map(|k| k.as_str()).collect(),
        ] {
            assert_eq!(map_keys, names);
        }
    }

    #[test]
    fn test_no_data_product_gets_defaults() {
        let input = batch(vec![
            ("iPhone 15", vec![record("iPhone 15", "Camera", 0.95), record("iPhone 15", "Value", 0.3)]),
            ("Ghost", vec![]),
        ]);
        let result = build_comparison(&input, BuildOptions::default());

        assert_eq!(result.overall[1].score, 0.0);
        assert_eq!(result.reviews_found.get("Ghost"), Some(&false));
        assert!(result.strengths.get("Ghost").unwrap().is_empty());
        assert!(result.weaknesses.get("Ghost").unwrap().is_empty());
        assert!(result.reviews.get("Ghost").unwrap().is_empty());

        assert_eq!(result.strengths.get("iPhone 15").unwrap(), &vec!["Camera".to_string()]);
        assert_eq!(result.weaknesses.get("iPhone 15").unwrap(), &vec!["Value".to_string()]);
    }

    #[test]
    fn test_chart_rows_fill_missing_with_zero() {
        let input = batch(vec![
            ("A", vec![record("A", "Camera", 0.8)]),
            ("B", vec![record("B", "Battery", 0.6)]),
            ("C", vec![]),
        ]);
        let result = build_comparison(&input, BuildOptions::default());

        let aspects: Vec<&str> = result.aspects.iter().map(|r| r.aspect.as_str()).collect();
        assert_eq!(aspects, vec!["Battery", "Camera"]);
        assert_eq!(result.radar_data, result.aspects);

        let camera = &result.aspects[1];
        assert_eq!(camera.value("A"), Some(80.0));
        assert_eq!(camera.value("B"), Some(0.0));
        assert_eq!(camera.value("C"), Some(0.0));
    }

    #[test]
    fn test_all_missing_yields_no_data_winner() {
        let input = batch(vec![("Obscure Gadget X", vec![]), ("Obscure Gadget Y", vec![])]);
        let result = build_comparison(&input, BuildOptions::default());

        assert_eq!(result.winner, Winner::NoData);
        assert!(result.aspects.is_empty());
        assert!(result.overall.iter().all(|p| p.score == 0.0));
    }

    #[test]
    fn test_sample_limit_option() {
        let records: Vec<ReviewRecord> = (0..4).map(|_| record("A", "Camera", 0.7)).collect();
        let input = batch(vec![("A", records), ("B", vec![])]);
        let result = build_comparison(&input, BuildOptions { sample_reviews: 2 });
        assert_eq!(result.reviews.get("A").unwrap().len(), 2);
        assert_eq!(result.overall[0].review_count, 4);
    }
}
