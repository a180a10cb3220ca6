//! Collapses review records into per-(product, aspect) sentiment scores.

use std::collections::{BTreeMap, BTreeSet};

use crate::models::{AspectScore, ReviewRecord};

/// Rounds to one decimal place, half away from zero.
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[derive(Debug, Default, Clone, Copy)]
struct Accumulator {
    sum: f64,
    count: usize,
}

/// Aspect scores for every (product, aspect) pair that has at least one review.
///
/// Pairs without reviews are simply absent. Chart code fills them with 0 at
/// assembly time; they are never stored.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AspectAggregate {
    groups: BTreeMap<String, BTreeMap<String, AspectScore>>,
}

impl AspectAggregate {
    /// Groups the pooled records of one request by (product, aspect).
    pub fn from_records<'a>(records: impl IntoIterator<Item = &'a ReviewRecord>) -> Self {
        let mut sums: BTreeMap<(String, String), Accumulator> = BTreeMap::new();

        for record in records {
            let key = (record.product.clone(), record.aspect.trim().to_string());
            let acc = sums.entry(key).or_default();
            acc.sum += record.sentiment_score;
            acc.count += 1;
        }

        let mut groups: BTreeMap<String, BTreeMap<String, AspectScore>> = BTreeMap::new();
        for ((product, aspect), acc) in sums {
            let mean = acc.sum / acc.count as f64;
            let score = AspectScore {
                product: product.clone(),
                aspect: aspect.clone(),
                score: round1(mean * 100.0),
                sample_count: acc.count,
            };
            groups.entry(product).or_default().insert(aspect, score);
        }

        Self { groups }
    }

    pub fn get(&self, product: &str, aspect: &str) -> Option<&AspectScore> {
        self.groups.get(product)?.get(aspect)
    }

    /// Scores for one product, ordered by aspect name.
    pub fn scores_for<'a>(&'a self, product: &str) -> impl Iterator<Item = &'a AspectScore> + 'a {
        self.groups
            .get(product)
            .into_iter()
            .flat_map(|aspects| aspects.values())
    }

    /// Union of the aspects observed for any product, sorted.
    pub fn aspect_vocabulary(&self) -> BTreeSet<&str> {
        self.groups
            .values()
            .flat_map(|aspects| aspects.keys().map(String::as_str))
            .collect()
    }

    pub fn has_product(&self, product: &str) -> bool {
        self.groups.contains_key(product)
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}
