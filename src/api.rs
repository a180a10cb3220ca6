//! HTTP handlers, shared state and the OpenAPI document.

use anyhow::Context;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use utoipa::{IntoParams, OpenApi, ToSchema};
use utoipa_swagger_ui::SwaggerUi;

use crate::config::{Settings, SourceKind};
use crate::engine::BuildOptions;
use crate::error::CompareError;
use crate::models::{self, CompareRequest, CompareResponse, ErrorResponse, ProductName};
use crate::service::ComparisonService;
use crate::source::dataset::{ProductDetails, ReviewDataset};
use crate::source::{RemoteReviewSource, ReviewSource};

pub struct AppState {
    pub service: ComparisonService,
    /// Present only when reviews come from the local dataset.
    pub dataset: Option<Arc<ReviewDataset>>,
    pub sample_reviews: usize,
    pub started_at: DateTime<Utc>,
}

impl AppState {
    /// Wires the configured review source into a comparison service.
    pub fn from_settings(settings: &Settings) -> anyhow::Result<Self> {
        let options = BuildOptions {
            sample_reviews: settings.sample_reviews,
        };

        let (source, dataset): (Arc<dyn ReviewSource>, Option<Arc<ReviewDataset>>) = match settings.source {
            SourceKind::Dataset => {
                let dataset = Arc::new(ReviewDataset::load(&settings.dataset_path)?);
                let source: Arc<dyn ReviewSource> = dataset.clone();
                (source, Some(dataset))
            }
            SourceKind::Remote => {
                let remote = RemoteReviewSource::new(&settings.review_service_url, settings.fetch_timeout)
                    .context("failed to build review service client")?;
                tracing::info!("🌐 Using remote review service at {}", settings.review_service_url);
                let source: Arc<dyn ReviewSource> = Arc::new(remote);
                (source, None)
            }
        };

        Ok(Self {
            service: ComparisonService::new(source, settings.fetch_timeout, options),
            dataset,
            sample_reviews: settings.sample_reviews,
            started_at: Utc::now(),
        })
    }
}

type ApiError = (StatusCode, Json<ErrorResponse>);

fn api_error(status: StatusCode, message: impl Into<String>) -> ApiError {
    (status, Json(ErrorResponse::new(message)))
}

fn catalog(state: &AppState) -> Result<&ReviewDataset, ApiError> {
    state.dataset.as_deref().ok_or_else(|| {
        api_error(
            StatusCode::NOT_FOUND,
            "Product catalog is only available with the dataset review source",
        )
    })
}

// ============================================================================
// Comparison
// ============================================================================

/// Compare 2-5 products
#[utoipa::path(
    post,
    path = "/api/compare",
    request_body = CompareRequest,
    responses(
        (status = 200, description = "Comparison result", body = CompareResponse),
        (status = 400, description = "Invalid product list", body = ErrorResponse),
        (status = 502, description = "Review source failed", body = ErrorResponse),
        (status = 504, description = "Review source timed out", body = ErrorResponse)
    ),
    tag = "compare"
)]
pub async fn compare_products(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CompareRequest>,
) -> Result<Json<CompareResponse>, CompareError> {
    let products = models::parse_product_list(&req.products)?;
    let response = state.service.compare(products).await?;
    Ok(Json(response))
}

// ============================================================================
// Catalog
// ============================================================================

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct CategoryFilter {
    pub category: Option<String>,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SearchParams {
    pub q: Option<String>,
    pub category: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ProductsResponse {
    pub products: Vec<String>,
    pub categories: Vec<String>,
    pub total: usize,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SearchResponse {
    pub query: String,
    pub products: Vec<String>,
    pub total: usize,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct StatsResponse {
    pub total_products: usize,
    pub categories: Vec<String>,
    pub products_by_category: BTreeMap<String, usize>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub data_source: String,
    pub total_products: usize,
    pub categories: Vec<String>,
    pub started_at: DateTime<Utc>,
    pub uptime_secs: i64,
}

/// List products known to the dataset
#[utoipa::path(
    get,
    path = "/api/products",
    params(CategoryFilter),
    responses(
        (status = 200, description = "Known products", body = ProductsResponse),
        (status = 404, description = "No catalog for this review source", body = ErrorResponse)
    ),
    tag = "catalog"
)]
pub async fn list_products(
    State(state): State<Arc<AppState>>,
    Query(filter): Query<CategoryFilter>,
) -> Result<Json<ProductsResponse>, ApiError> {
    let dataset = catalog(&state)?;
    let products = dataset.products(filter.category.as_deref());
    Ok(Json(ProductsResponse {
        total: products.len(),
        products,
        categories: dataset.categories(),
    }))
}

/// Reviews, aspect scores and language split for one product
#[utoipa::path(
    get,
    path = "/api/product/{name}",
    params(("name" = String, Path, description = "Product name or fragment")),
    responses(
        (status = 200, description = "Product details", body = ProductDetails),
        (status = 404, description = "Product not found", body = ErrorResponse)
    ),
    tag = "catalog"
)]
pub async fn product_details(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
) -> Result<Json<ProductDetails>, ApiError> {
    let dataset = catalog(&state)?;
    ProductName::parse(&name)
        .and_then(|product| dataset.product_details(&product, state.sample_reviews))
        .map(Json)
        .ok_or_else(|| api_error(StatusCode::NOT_FOUND, "Product not found"))
}

/// Search products by name fragment
#[utoipa::path(
    get,
    path = "/api/search",
    params(SearchParams),
    responses(
        (status = 200, description = "Matching products", body = SearchResponse),
        (status = 400, description = "Missing query", body = ErrorResponse)
    ),
    tag = "catalog"
)]
pub async fn search_products(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SearchParams>,
) -> Result<Json<SearchResponse>, ApiError> {
    let dataset = catalog(&state)?;
    let query = params
        .q
        .map(|q| q.trim().to_string())
        .filter(|q| !q.is_empty())
        .ok_or_else(|| api_error(StatusCode::BAD_REQUEST, "Query parameter required"))?;

    let products = dataset.search(&query, params.category.as_deref());
    Ok(Json(SearchResponse {
        query,
        total: products.len(),
        products,
    }))
}

/// Product counts per category
#[utoipa::path(
    get,
    path = "/api/stats",
    responses(
        (status = 200, description = "Dataset statistics", body = StatsResponse),
        (status = 404, description = "No catalog for this review source", body = ErrorResponse)
    ),
    tag = "catalog"
)]
pub async fn stats(State(state): State<Arc<AppState>>) -> Result<Json<StatsResponse>, ApiError> {
    let dataset = catalog(&state)?;
    let categories = dataset.categories();
    let products_by_category = categories
        .iter()
        .map(|c| (c.clone(), dataset.products(Some(c.as_str())).len()))
        .collect();

    Ok(Json(StatsResponse {
        total_products: dataset.products(None).len(),
        categories,
        products_by_category,
    }))
}

/// Liveness and data source summary
#[utoipa::path(
    get,
    path = "/api/health",
    responses((status = 200, description = "Service is up", body = HealthResponse)),
    tag = "compare"
)]
pub async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let (total_products, categories) = state
        .dataset
        .as_deref()
        .map(|d| (d.products(None).len(), d.categories()))
        .unwrap_or_default();

    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        data_source: state.service.source_name().to_string(),
        total_products,
        categories,
        started_at: state.started_at,
        uptime_secs: (Utc::now() - state.started_at).num_seconds(),
    })
}

#[derive(OpenApi)]
#[openapi(
    paths(
        compare_products,
        list_products,
        product_details,
        search_products,
        stats,
        health
    ),
    components(
        schemas(
            CompareRequest,
            CompareResponse,
            ErrorResponse,
            ProductsResponse,
            SearchResponse,
            StatsResponse,
            HealthResponse,
            ProductDetails,
            crate::models::ComparisonResult,
            crate::models::ProductOverall,
            crate::models::OverallSentiment,
            crate::models::DisplayReview,
            crate::models::LanguageStats,
            crate::models::Language
        )
    ),
    tags(
        (name = "compare", description = "Product comparison API"),
        (name = "catalog", description = "Review dataset catalog")
    )
)]
pub struct ApiDoc;

/// All routes, including Swagger UI. Layers (CORS, tracing) are added by the caller.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .route("/api/compare", post(compare_products))
        .route("/api/products", get(list_products))
        .route("/api/product/:name", get(product_details))
        .route("/api/search", get(search_products))
        .route("/api/stats", get(stats))
        .route("/api/health", get(health))
        .with_state(state)
}
