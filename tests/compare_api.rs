//! Integration tests for the HTTP API, driven through the router without a socket.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use chrono::Utc;
use sentiment_compare::api::{router, AppState};
use sentiment_compare::engine::BuildOptions;
use sentiment_compare::models::{Language, ReviewRecord};
use sentiment_compare::service::ComparisonService;
use sentiment_compare::source::{InMemoryReviewSource, ReviewDataset, ReviewSource};
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceExt;

const DATASET: &str = "\
product_name,category,text,rating,aspect,language
iPhone 15,smartphone,कैमरा बहुत बढ़िया है,5,Camera,hindi
iPhone 15,smartphone,बैटरी बैकअप औसत है,3,Battery,hindi
iPhone 15,smartphone,किंमत खूप महाग आहे,1,Value,marathi
Samsung S24,smartphone,कैमरा अच्छा है,4,Camera,hindi
Samsung S24,smartphone,बैटरी लाइफ बहुत अच्छी है,5,Battery,hindi
Sony WH-1000XM5,headphones,साउंड शानदार है,5,Sound,hindi
";

fn review(aspect: &str, sentiment: f64) -> ReviewRecord {
    ReviewRecord {
        product: String::new(),
        language: Language::Hindi,
        aspect: aspect.to_string(),
        sentiment_score: sentiment,
        rating: None,
        text: format!("{} बढ़िया है", aspect),
    }
}

fn state_with(source: Arc<dyn ReviewSource>, dataset: Option<Arc<ReviewDataset>>) -> Arc<AppState> {
    Arc::new(AppState {
        service: ComparisonService::new(source, Duration::from_secs(2), BuildOptions::default()),
        dataset,
        sample_reviews: 5,
        started_at: Utc::now(),
    })
}

fn dataset_state() -> Arc<AppState> {
    let dataset = Arc::new(ReviewDataset::from_reader(DATASET.as_bytes()).unwrap());
    let source: Arc<dyn ReviewSource> = dataset.clone();
    state_with(source, Some(dataset))
}

fn in_memory_state() -> Arc<AppState> {
    let source = InMemoryReviewSource::new()
        .with_reviews("iPhone 15", vec![review("Camera", 0.9), review("Battery", 0.3)])
        .with_reviews("Samsung S24", vec![review("Camera", 0.7), review("Display", 0.8)]);
    state_with(Arc::new(source), None)
}

fn make_request(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn make_post_request(uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_string(&body).unwrap()))
        .unwrap()
}

async fn send(state: Arc<AppState>, request: Request<Body>) -> (StatusCode, String) {
    let resp = router(state).oneshot(request).await.unwrap();
    let status = resp.status();
    let body = axum::body::to_bytes(resp.into_body(), 1_000_000).await.unwrap();
    (status, String::from_utf8(body.to_vec()).unwrap())
}

async fn post_compare(state: Arc<AppState>, products: &[&str]) -> (StatusCode, serde_json::Value) {
    let (status, body) = send(
        state,
        make_post_request("/api/compare", serde_json::json!({ "products": products })),
    )
    .await;
    (status, serde_json::from_str(&body).unwrap())
}

// --- /api/compare ---

#[tokio::test]
async fn test_compare_returns_full_shape() {
    let (status, json) = post_compare(in_memory_state(), &["iPhone 15", "Samsung S24"]).await;
    assert_eq!(status, StatusCode::OK);

    assert_eq!(json["products"], serde_json::json!(["iPhone 15", "Samsung S24"]));
    let comparison = &json["comparison"];

    // iPhone: (90 + 30) / 2 = 60 -> 6.0; Samsung: (70 + 80) / 2 = 75 -> 7.5
    assert_eq!(comparison["overall"][0]["name"], "iPhone 15");
    assert_eq!(comparison["overall"][0]["score"], 6.0);
    assert_eq!(comparison["overall"][1]["score"], 7.5);
    assert_eq!(comparison["winner"], "Samsung S24");

    assert_eq!(comparison["reviewsFound"]["iPhone 15"], true);
    assert_eq!(comparison["strengths"]["iPhone 15"], serde_json::json!(["Camera"]));
    assert_eq!(comparison["weaknesses"]["iPhone 15"], serde_json::json!(["Battery"]));
    assert_eq!(comparison["strengths"]["Samsung S24"], serde_json::json!(["Display", "Camera"]));

    // Union of aspects, missing pairs filled with 0
    let rows = comparison["aspects"].as_array().unwrap();
    assert_eq!(rows.len(), 3);
    let display = rows.iter().find(|r| r["aspect"] == "Display").unwrap();
    assert_eq!(display["iPhone 15"], 0.0);
    assert_eq!(display["Samsung S24"], 80.0);
    assert_eq!(comparison["radarData"], comparison["aspects"]);
}

#[tokio::test]
async fn test_compare_preserves_submission_order_in_keys() {
    let (status, body) = send(
        in_memory_state(),
        make_post_request(
            "/api/compare",
            serde_json::json!({ "products": ["Samsung S24", "iPhone 15"] }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let samsung = body.find("\"Samsung S24\":true").unwrap();
    let iphone = body.find("\"iPhone 15\":true").unwrap();
    assert!(samsung < iphone);
    assert!(body.contains("{\"aspect\":\"Battery\",\"Samsung S24\":0.0,\"iPhone 15\":30.0}"));
}

#[tokio::test]
async fn test_compare_without_any_reviews_reports_no_data() {
    let (status, json) = post_compare(in_memory_state(), &["Obscure Gadget X", "Obscure Gadget Y"]).await;
    assert_eq!(status, StatusCode::OK);

    let comparison = &json["comparison"];
    assert_eq!(comparison["winner"], "No data found");
    assert_eq!(comparison["overall"][0]["score"], 0.0);
    assert_eq!(comparison["overall"][0]["sentiment"], "unknown");
    assert_eq!(comparison["reviewsFound"]["Obscure Gadget X"], false);
    assert_eq!(comparison["aspects"], serde_json::json!([]));
}

#[tokio::test]
async fn test_compare_rejects_invalid_product_lists() {
    for products in [
        vec!["iPhone 15"],
        vec!["iPhone 15", "   "],
        vec!["a", "b", "c", "d", "e", "f"],
        vec!["iPhone 15", "iPhone 15"],
        vec!["aspect", "iPhone 15"],
        vec!["iPhone 15", "No data found"],
    ] {
        let (status, json) = post_compare(in_memory_state(), &products).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{:?}", products);
        assert!(json["error"].is_string());
    }
}

#[tokio::test]
async fn test_compare_against_dataset() {
    let (status, json) = post_compare(dataset_state(), &["iPhone 15", "Samsung S24"]).await;
    assert_eq!(status, StatusCode::OK);

    let comparison = &json["comparison"];
    // iPhone: (100 + 60 + 20) / 3 = 60 -> 6.0; Samsung: (80 + 100) / 2 = 90 -> 9.0
    assert_eq!(comparison["overall"][0]["score"], 6.0);
    assert_eq!(comparison["overall"][1]["score"], 9.0);
    assert_eq!(comparison["winner"], "Samsung S24");
    assert_eq!(comparison["languageStats"]["iPhone 15"]["marathi"], 1);
    assert_eq!(comparison["reviews"]["iPhone 15"].as_array().unwrap().len(), 3);
}

// --- catalog ---

#[tokio::test]
async fn test_catalog_endpoints() {
    let (status, body) = send(dataset_state(), make_request("/api/products?category=smartphone")).await;
    assert_eq!(status, StatusCode::OK);
    let json: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(json["products"], serde_json::json!(["Samsung S24", "iPhone 15"]));
    assert_eq!(json["total"], 2);

    let (status, body) = send(dataset_state(), make_request("/api/product/Sony")).await;
    assert_eq!(status, StatusCode::OK);
    let json: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(json["category"], "headphones");
    assert_eq!(json["aspect_scores"]["Sound"], 100.0);

    let (status, body) = send(dataset_state(), make_request("/api/stats")).await;
    assert_eq!(status, StatusCode::OK);
    let json: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(json["total_products"], 3);
    assert_eq!(json["products_by_category"]["headphones"], 1);
}

#[tokio::test]
async fn test_search_requires_query() {
    let (status, _) = send(dataset_state(), make_request("/api/search?q=%20")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = send(dataset_state(), make_request("/api/search?q=sam")).await;
    assert_eq!(status, StatusCode::OK);
    let json: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(json["products"], serde_json::json!(["Samsung S24"]));
}

#[tokio::test]
async fn test_catalog_unavailable_without_dataset() {
    let (status, _) = send(in_memory_state(), make_request("/api/products")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(dataset_state(), make_request("/api/product/Pixel")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

// --- /api/health ---

#[tokio::test]
async fn test_health_reports_source() {
    let (status, body) = send(dataset_state(), make_request("/api/health")).await;
    assert_eq!(status, StatusCode::OK);
    let json: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(json["status"], "healthy");
    assert_eq!(json["data_source"], "dataset");
    assert_eq!(json["total_products"], 3);

    let (_, body) = send(in_memory_state(), make_request("/api/health")).await;
    let json: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(json["data_source"], "memory");
    assert_eq!(json["total_products"], 0);
}
