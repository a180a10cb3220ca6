//! Error types for comparisons and review sources.
//!
//! Soft conditions (a product without reviews, every product without reviews)
//! never show up here: they are carried by `reviewsFound` and the no-data
//! winner. Everything in this module aborts the whole request.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::models::{ErrorResponse, MAX_PRODUCTS, MIN_PRODUCTS};

/// Failure reported by a review source.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("review service unreachable: {0}")]
    Unavailable(String),

    /// The source gave up waiting on its own. Treated like the service deadline.
    #[error("review service timed out")]
    TimedOut,

    #[error("review service returned HTTP {0}")]
    Status(u16),

    #[error("malformed review payload: {0}")]
    Malformed(String),
}

/// Request-level comparison failure.
#[derive(Debug, thiserror::Error)]
pub enum CompareError {
    #[error("At least {} products required for comparison", MIN_PRODUCTS)]
    TooFewProducts,

    #[error("At most {} products can be compared at once", MAX_PRODUCTS)]
    TooManyProducts,

    #[error("Product '{0}' was submitted more than once")]
    DuplicateProduct(String),

    #[error("'{0}' is reserved and cannot be used as a product name")]
    ReservedName(String),

    #[error("Review source failed for '{product}': {source}")]
    Upstream {
        product: String,
        #[source]
        source: SourceError,
    },

    #[error("Corrupt review record for '{product}': {reason}")]
    CorruptRecord { product: String, reason: String },

    #[error("Review source timed out and no product returned any reviews")]
    AllTimedOut,
}

impl CompareError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            CompareError::TooFewProducts
            | CompareError::TooManyProducts
            | CompareError::DuplicateProduct(_)
            | CompareError::ReservedName(_) => StatusCode::BAD_REQUEST,
            CompareError::Upstream { .. } | CompareError::CorruptRecord { .. } => {
                StatusCode::BAD_GATEWAY
            }
            CompareError::AllTimedOut => StatusCode::GATEWAY_TIMEOUT,
        }
    }
}

impl IntoResponse for CompareError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!("❌ Comparison failed: {}", self);
        }
        (status, Json(ErrorResponse::new(self.to_string()))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(CompareError::TooFewProducts.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(
            CompareError::Upstream {
                product: "Pixel 8".to_string(),
                source: SourceError::Status(503),
            }
            .status_code(),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(CompareError::AllTimedOut.status_code(), StatusCode::GATEWAY_TIMEOUT);
    }

    #[test]
    fn test_messages() {
        assert_eq!(
            CompareError::TooFewProducts.to_string(),
            "At least 2 products required for comparison"
        );
        let err = CompareError::Upstream {
            product: "Pixel 8".to_string(),
            source: SourceError::Status(503),
        };
        assert_eq!(
            err.to_string(),
            "Review source failed for 'Pixel 8': review service returned HTTP 503"
        );
    }
}
