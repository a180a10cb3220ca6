//! Collapses a product's aspect scores into one 0-10 score.

use crate::engine::aggregate::{round1, AspectAggregate};
use crate::models::{AspectScore, OverallSentiment, ProductName, ProductOverall};

/// Unweighted mean of the aspect scores, rescaled from 0-100 to 0-10. Empty input gives 0.
pub fn overall_score<'a>(scores: impl IntoIterator<Item = &'a AspectScore>) -> f64 {
    let (sum, count) = scores
        .into_iter()
        .fold((0.0, 0usize), |(sum, count), s| (sum + s.score, count + 1));
    if count == 0 {
        return 0.0;
    }
    round1(sum / count as f64 / 10.0)
}

pub fn sentiment_label(score: f64, reviews_found: bool) -> OverallSentiment {
    if !reviews_found {
        OverallSentiment::Unknown
    } else if score >= 7.0 {
        OverallSentiment::Positive
    } else if score >= 5.0 {
        OverallSentiment::Neutral
    } else {
        OverallSentiment::Negative
    }
}

/// Builds the overall entry for one product.
///
/// `review_count == 0` always yields the sentinel score 0 with
/// `reviews_found == false`.
pub fn score_product(
    product: &ProductName,
    aggregate: &AspectAggregate,
    review_count: usize,
) -> ProductOverall {
    let reviews_found = review_count > 0;
    let score = if reviews_found {
        overall_score(aggregate.scores_for(product.as_str()))
    } else {
        0.0
    };

    ProductOverall {
        name: product.clone(),
        score,
        sentiment: sentiment_label(score, reviews_found),
        review_count,
        reviews_found,
    }
}
