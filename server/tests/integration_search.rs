use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::routing::get;
use axum::Router;
use http_body_util::BodyExt;
use search_core::persist::{load_corpus, DataPaths};
use search_core::SearchService;
use serde_json::Value;
use std::fs;
use std::path::Path;
use tempfile::tempdir;
use tower::ServiceExt;

fn build_tiny_corpus(dir: &Path) {
    fs::write(
        dir.join("inverted_index.json"),
        r#"{"rust": {"0": 3, "1": 1}, "tokio": {"1": 2}}"#,
    )
    .unwrap();
    fs::write(
        dir.join("doc_meta.csv"),
        "doc_id,url,title,image_url,doc_len\n\
         0,https://example.com/0,Rust Ownership,,20\n\
         1,https://example.com/1,Async Rust dengan Tokio,https://example.com/1.png,40\n",
    )
    .unwrap();
    fs::write(
        dir.join("corpus_clean_v2.csv"),
        "url,title,image_url,content_final\n\
         https://example.com/0,Rust Ownership,,Ownership rules in Rust.\n\
         https://example.com/1,Async Rust,,Menulis kode async dengan tokio.\n",
    )
    .unwrap();
}

fn app_for(dir: &Path) -> Router {
    search_server::build_app(load_corpus(&DataPaths::new(dir)))
}

async fn call(app: Router, uri: &str) -> (StatusCode, Value) {
    let req = Request::get(uri).body(Body::empty()).unwrap();
    let resp = app.oneshot(req).await.unwrap();
    let status = resp.status();
    let body = resp.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&body).unwrap())
}

#[tokio::test]
async fn search_returns_ranked_results() {
    let dir = tempdir().unwrap();
    build_tiny_corpus(dir.path());

    let (status, json) = call(app_for(dir.path()), "/api/search?q=Rust&top_k=2").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["query"], "Rust");
    assert_eq!(json["count"], 2);
    let arr = json["results"].as_array().unwrap();
    assert_eq!(arr.len(), 2);
    assert_eq!(arr[0]["doc_id"], "0");
    assert_eq!(arr[0]["title"], "Rust Ownership");
    assert_eq!(arr[0]["doc_len"], 20);
    assert_eq!(arr[1]["doc_id"], "1");
    assert_eq!(arr[1]["image_url"], "https://example.com/1.png");
    assert!(arr[0]["score"].as_f64().unwrap() >= arr[1]["score"].as_f64().unwrap());
}

#[tokio::test]
async fn top_k_truncates_and_defaults() {
    let dir = tempdir().unwrap();
    build_tiny_corpus(dir.path());

    let (_, json) = call(app_for(dir.path()), "/api/search?q=rust&top_k=1").await;
    assert_eq!(json["count"], 1);

    let (status, json) = call(app_for(dir.path()), "/search?q=rust&top_k=banyak").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["count"], 2);
}

#[tokio::test]
async fn missing_query_is_bad_request() {
    let dir = tempdir().unwrap();
    build_tiny_corpus(dir.path());

    for uri in ["/api/search", "/api/search?q=", "/api/search?q=%20%20"] {
        let (status, json) = call(app_for(dir.path()), uri).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
        assert_eq!(json["error"], "MISSING_QUERY");
        assert_eq!(json["results"].as_array().unwrap().len(), 0);
    }
}

#[tokio::test]
async fn detail_takes_precedence() {
    let dir = tempdir().unwrap();
    build_tiny_corpus(dir.path());

    let (status, json) = call(app_for(dir.path()), "/api/search?doc_id=001&q=rust").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["doc_id"], "1");
    assert_eq!(json["title"], "Async Rust dengan Tokio");
    assert_eq!(json["content"], "Menulis kode async dengan tokio.");
    assert!(json.get("results").is_none());
}

#[tokio::test]
async fn unknown_document_is_not_found() {
    let dir = tempdir().unwrap();
    build_tiny_corpus(dir.path());

    let (status, json) = call(app_for(dir.path()), "/api/search?doc_id=404").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["error"], "DOCUMENT_NOT_FOUND");
    assert_eq!(json["requested_id"], "404");
}

#[tokio::test]
async fn init_error_is_reported_for_every_request() {
    let app = search_server::build_app(SearchService::failed("Failed to load inverted_index.json: gone"));

    for uri in ["/api/search?q=rust", "/api/search?doc_id=0", "/api/search"] {
        let (status, json) = call(app.clone(), uri).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(json["error"], "INIT_ERROR");
        assert_eq!(json["message"], "Failed to load inverted_index.json: gone");
    }
}

#[tokio::test]
async fn repeated_keys_use_first_value() {
    let dir = tempdir().unwrap();
    build_tiny_corpus(dir.path());

    let (status, json) = call(app_for(dir.path()), "/api/search?q=rust&q=tokio").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["query"], "rust");
    assert_eq!(json["count"], 2);

    let (status, json) = call(app_for(dir.path()), "/api/search?q=rust&top_k=1&top_k=5").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["count"], 1);

    let (status, json) = call(app_for(dir.path()), "/api/search?doc_id=0&doc_id=1").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["doc_id"], "0");
}

#[tokio::test]
async fn handler_panic_becomes_runtime_error() {
    async fn exploding() -> &'static str {
        panic!("scoring blew up")
    }
    let app = search_server::with_service_layers(Router::new().route("/boom", get(exploding)));

    let (status, json) = call(app, "/boom").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["error"], "RUNTIME_ERROR");
    assert_eq!(json["message"], "scoring blew up");
}
