//! Runtime settings read from the environment (and `.env`, loaded by `main`).

use anyhow::{bail, Context, Result};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use crate::engine::summary::DEFAULT_SAMPLE_REVIEWS;

/// Where reviews come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    /// Local CSV dataset, also powers the catalog endpoints.
    Dataset,
    /// External scraping/classification service.
    Remote,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub bind_addr: SocketAddr,
    pub source: SourceKind,
    pub dataset_path: PathBuf,
    pub review_service_url: String,
    pub fetch_timeout: Duration,
    pub sample_reviews: usize,
    /// Empty means any origin.
    pub cors_origins: Vec<String>,
}

impl Settings {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds settings from an arbitrary key lookup. Unset or blank keys take defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let bind_addr = get("BIND_ADDR")
            .unwrap_or_else(|| "0.0.0.0:5000".to_string())
            .parse::<SocketAddr>()
            .context("BIND_ADDR must be a socket address like 0.0.0.0:5000")?;

        let source = match get("REVIEW_SOURCE").as_deref().map(str::to_lowercase).as_deref() {
            None | Some("dataset") | Some("csv") => SourceKind::Dataset,
            Some("remote") => SourceKind::Remote,
            Some(other) => bail!("REVIEW_SOURCE must be 'dataset' or 'remote', got '{}'", other),
        };

        let fetch_timeout_secs: u64 = match get("FETCH_TIMEOUT_SECS") {
            Some(v) => v.parse().context("FETCH_TIMEOUT_SECS must be a whole number of seconds")?,
            None => 10,
        };
        if fetch_timeout_secs == 0 {
            bail!("FETCH_TIMEOUT_SECS must be greater than zero");
        }

        let sample_reviews = match get("SAMPLE_REVIEWS") {
            Some(v) => v.parse().context("SAMPLE_REVIEWS must be a non-negative integer")?,
            None => DEFAULT_SAMPLE_REVIEWS,
        };

        let cors_origins = get("CORS_ORIGINS")
            .map(|v| {
                v.split(',')
                    .map(|s| s.trim())
                    .filter(|s| !s.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();

        Ok(Self {
            bind_addr,
            source,
            dataset_path: get("REVIEWS_CSV")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("data/reviews_dataset.csv")),
            review_service_url: get("REVIEW_SERVICE_URL")
                .unwrap_or_else(|| "http://localhost:8000".to_string()),
            fetch_timeout: Duration::from_secs(fetch_timeout_secs),
            sample_reviews,
            cors_origins,
        })
    }
}
