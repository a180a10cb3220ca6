//! Winner selection and rank ordering.

use std::cmp::Ordering;

use crate::models::{ProductOverall, Winner};

/// Picks the product with the strictly highest score among those with reviews.
///
/// Ties go to the product submitted first. Products without reviews never win,
/// even when every scored product sits at 0.
pub fn select_winner(overall: &[ProductOverall]) -> Winner {
    let mut best: Option<&ProductOverall> = None;
    for candidate in overall.iter().filter(|p| p.reviews_found) {
        match best {
            Some(current) if candidate.score <= current.score => {}
            _ => best = Some(candidate),
        }
    }

    match best {
        Some(product) => Winner::Product(product.name.clone()),
        None => Winner::NoData,
    }
}

/// Orders products by descending score. Products without reviews go last;
/// equal scores keep submission order.
pub fn rank_products(overall: &[ProductOverall]) -> Vec<&ProductOverall> {
    let mut ranked: Vec<&ProductOverall> = overall.iter().collect();
    ranked.sort_by(|a, b| {
        b.reviews_found
            .cmp(&a.reviews_found)
            .then_with(|| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal))
    });
    ranked
}
