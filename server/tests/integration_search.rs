use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use medsearch_core::builder::{build_model, BuildOptions};
use medsearch_core::persist::{save_document_vectors, save_idf, save_inverted_index, ModelPaths};
use medsearch_core::ScoringMode;
use serde_json::{json, Value};
use std::fs;
use tempfile::tempdir;
use tower::ServiceExt;

fn build_tiny_model(dir: &std::path::Path) {
    let docs = vec![
        ("1.md".to_string(), "Amoxicilline suspension buvable enfant, amoxicilline poudre.".to_string()),
        ("2.md".to_string(), "Amoxicilline acide clavulanique adulte.".to_string()),
        ("3.md".to_string(), "Paracétamol comprimé adulte, fièvre.".to_string()),
    ];
    let model = build_model(docs, BuildOptions::default());
    let paths = ModelPaths::new(dir.join("ri_model"));
    save_document_vectors(&paths, &model.vectors).unwrap();
    save_idf(&paths, &model.idf).unwrap();
    save_inverted_index(&paths, &model.inverted_index).unwrap();

    // no record for 3.md
    let meta = json!([
        {"id": "1", "nom": "Clamoxyl", "snippet": "Amoxicilline enfant", "url": "https://example.org/1", "image_url": "1.png"},
        {"id": 2, "nom": "Augmentin", "snippet": "Amoxicilline adulte", "url": "https://example.org/2", "image_url": "2.png"}
    ]);
    fs::write(dir.join("meta_data.json"), serde_json::to_vec(&meta).unwrap()).unwrap();
}

fn app(dir: &std::path::Path) -> Router {
    server::build_app(dir.join("ri_model"), dir.join("meta_data.json"), ScoringMode::FullScan).unwrap()
}

async fn call(app: Router, req: Request<Body>) -> (StatusCode, Value) {
    let resp = app.oneshot(req).await.unwrap();
    let status = resp.status();
    let body = resp.into_body().collect().await.unwrap().to_bytes();
    let json = if body.is_empty() { Value::Null } else { serde_json::from_slice(&body).unwrap_or(Value::Null) };
    (status, json)
}

fn post_search(body: Value) -> Request<Body> {
    Request::post("/api/search")
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_vec(&body).unwrap()))
        .unwrap()
}

#[tokio::test]
async fn search_returns_ranked_results() {
    let dir = tempdir().unwrap();
    build_tiny_model(dir.path());

    let (status, json) = call(app(dir.path()), post_search(json!({"query": "amoxicilline enfant", "top_k": 2}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["query"], "amoxicilline enfant");
    assert_eq!(json["total_results"], 2);
    let arr = json["results"].as_array().unwrap();
    assert_eq!(arr.len(), 2);
    assert_eq!(arr[0]["doc_id"], "1.md");
    assert_eq!(arr[0]["id"], "1");
    assert_eq!(arr[0]["nom"], "Clamoxyl");
    assert_eq!(arr[1]["doc_id"], "2.md");
    assert!(arr[0]["score"].as_f64().unwrap() >= arr[1]["score"].as_f64().unwrap());
    assert!(json["search_time"].as_f64().is_some());
}

#[tokio::test]
async fn missing_metadata_and_default_top_k() {
    let dir = tempdir().unwrap();
    build_tiny_model(dir.path());

    let (status, json) = call(app(dir.path()), post_search(json!({"query": "fièvre", "top_k": -3}))).await;
    assert_eq!(status, StatusCode::OK);
    let arr = json["results"].as_array().unwrap();
    assert_eq!(arr.len(), 3);
    assert_eq!(arr[0]["doc_id"], "3.md");
    assert_eq!(arr[0]["nom"], "Médicament inconnu");
    assert_eq!(arr[0]["url"], "#");
    assert_eq!(arr[0]["image_url"], "");
}

#[tokio::test]
async fn stopword_query_is_an_empty_success() {
    let dir = tempdir().unwrap();
    build_tiny_model(dir.path());

    let (status, json) = call(app(dir.path()), post_search(json!({"query": "le la des"}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["total_results"], 0);
    assert_eq!(json["results"], json!([]));
}

#[tokio::test]
async fn missing_query_is_a_bad_request() {
    let dir = tempdir().unwrap();
    build_tiny_model(dir.path());

    let (status, json) = call(app(dir.path()), post_search(json!({"top_k": 5}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "Query parameter is required");

    let malformed = Request::post("/api/search")
        .header("content-type", "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let (status, json) = call(app(dir.path()), malformed).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["error"].is_string());
}

#[tokio::test]
async fn stats_and_medicaments() {
    let dir = tempdir().unwrap();
    build_tiny_model(dir.path());

    let (status, json) = call(app(dir.path()), Request::get("/api/stats").body(Body::empty()).unwrap()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["total_documents"], 3);
    assert_eq!(json["total_medicaments"], 2);
    assert_eq!(json["indexed_medicaments"], 2);
    assert_eq!(json["model_loaded"], true);
    assert_eq!(json["status"], "operational");

    let (status, json) = call(app(dir.path()), Request::get("/api/medicaments").body(Body::empty()).unwrap()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["total"], 2);
    assert_eq!(json["medicaments"][1]["nom"], "Augmentin");
}

#[test]
fn incomplete_model_refuses_to_start() {
    let dir = tempdir().unwrap();
    build_tiny_model(dir.path());
    fs::remove_file(ModelPaths::new(dir.path().join("ri_model")).inverted_index()).unwrap();
    let err = server::build_app(dir.path().join("ri_model"), dir.path().join("meta_data.json"), ScoringMode::FullScan);
    assert!(err.is_err());
}

#[test]
fn unreadable_meta_json_does_not_block_startup() {
    let dir = tempdir().unwrap();
    build_tiny_model(dir.path());
    fs::write(ModelPaths::new(dir.path().join("ri_model")).meta(), "{garbage").unwrap();
    let app = server::build_app(dir.path().join("ri_model"), dir.path().join("meta_data.json"), ScoringMode::FullScan);
    assert!(app.is_ok());
}

#[tokio::test]
async fn home_and_health() {
    let dir = tempdir().unwrap();
    build_tiny_model(dir.path());

    let (status, json) = call(app(dir.path()), Request::get("/").body(Body::empty()).unwrap()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "running");
    assert!(json["endpoints"]["/api/search"].is_string());

    let resp = app(dir.path()).oneshot(Request::get("/health").body(Body::empty()).unwrap()).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body = resp.into_body().collect().await.unwrap().to_bytes();
    assert_eq!(&body[..], b"ok");
}
