//! Comparison engine: pure, synchronous, no I/O.
//!
//! Records flow upward: aggregation -> overall scoring -> winner selection ->
//! highlights -> response assembly.

pub mod aggregate;
pub mod builder;
pub mod ranking;
pub mod scoring;
pub mod summary;

pub use aggregate::AspectAggregate;
pub use builder::{build_comparison, BuildOptions};
pub use ranking::{rank_products, select_winner};

use crate::error::CompareError;
use crate::models::{ComparisonResult, ProductReviews};

/// Validates every record, then builds the comparison.
///
/// A single out-of-range record fails the whole batch; no partial result is produced.
pub fn compare(batch: &[ProductReviews], options: BuildOptions) -> Result<ComparisonResult, CompareError> {
    for product in batch {
        for record in &product.records {
            record.validate().map_err(|reason| CompareError::CorruptRecord {
                product: product.product.to_string(),
                reason,
            })?;
            if record.product != product.product.as_str() {
                return Err(CompareError::CorruptRecord {
                    product: product.product.to_string(),
                    reason: format!("record keyed to '{}'", record.product),
                });
            }
        }
    }
    Ok(build_comparison(batch, options))
}
