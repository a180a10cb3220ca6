//! Multilingual product review comparison: aspect aggregation, scoring,
//! winner selection and the HTTP service around them.

pub mod api;
pub mod config;
pub mod engine;
pub mod error;
pub mod ml;
pub mod models;
pub mod preprocess;
pub mod service;
pub mod source;
