use anyhow::Result;
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use medsearch_core::persist::{load_meta, ModelPaths};
use medsearch_core::{EngineStats, MetadataRecord, ResultRecord, ScoringMode, SearchEngine, DEFAULT_TOP_K};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::path::Path;
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

#[derive(Deserialize)]
pub struct SearchRequest {
    #[serde(default)]
    pub query: Option<String>,
    #[serde(default)]
    pub top_k: Option<i64>,
}

impl SearchRequest {
    /// Non-positive or missing `top_k` falls back to the default.
    fn top_k(&self) -> usize {
        match self.top_k {
            Some(k) if k > 0 => usize::try_from(k).unwrap_or(usize::MAX),
            _ => DEFAULT_TOP_K,
        }
    }
}

#[derive(Serialize)]
pub struct SearchResponse {
    pub query: String,
    pub results: Vec<ResultRecord>,
    pub total_results: usize,
    pub search_time: f64,
}

#[derive(Serialize)]
pub struct StatsResponse {
    #[serde(flatten)]
    pub stats: EngineStats,
    pub status: &'static str,
}

#[derive(Serialize)]
pub struct MedicamentsResponse {
    pub medicaments: Vec<MetadataRecord>,
    pub total: usize,
}

#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<SearchEngine>,
}

type ApiError = (StatusCode, Json<Value>);

fn bad_request(message: impl Into<String>) -> ApiError {
    (StatusCode::BAD_REQUEST, Json(json!({ "error": message.into() })))
}

/// Load the model and metadata, then build the router. Fails before serving if the model is incomplete.
pub fn build_app<P: AsRef<Path>, M: AsRef<Path>>(model_dir: P, metadata_path: M, mode: ScoringMode) -> Result<Router> {
    match load_meta(&ModelPaths::new(&model_dir)) {
        Ok(Some(meta)) => {
            tracing::info!(num_docs = meta.num_docs, num_terms = meta.num_terms, created_at = %meta.created_at, "model metadata")
        }
        Ok(None) => {}
        Err(err) => tracing::warn!(error = %err, "ignoring unreadable meta.json"),
    }
    let engine = SearchEngine::load(model_dir, metadata_path)?.with_mode(mode);
    let stats = engine.stats();
    tracing::info!(
        documents = stats.total_documents,
        terms = stats.total_terms,
        medicaments = stats.total_medicaments,
        ?mode,
        "search engine ready"
    );
    Ok(router(Arc::new(engine)))
}

pub fn router(engine: Arc<SearchEngine>) -> Router {
    // CORS: read CORS_ALLOW_ORIGIN (comma-separated) or allow Any by default
    let cors = match std::env::var("CORS_ALLOW_ORIGIN") {
        Ok(val) => {
            let origins: Vec<_> = val
                .split(',')
                .filter_map(|s| s.trim().parse().ok())
                .collect();
            if origins.is_empty() {
                CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any)
            } else {
                CorsLayer::new().allow_origin(AllowOrigin::list(origins)).allow_methods(Any).allow_headers(Any)
            }
        }
        Err(_) => CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any),
    };

    Router::new()
        .route("/", get(home))
        .route("/health", get(|| async { "ok" }))
        .route("/api/search", post(search_handler))
        .route("/api/stats", get(stats_handler))
        .route("/api/medicaments", get(medicaments_handler))
        .with_state(AppState { engine })
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

async fn home() -> Json<Value> {
    Json(json!({
        "message": "MediSearch API - information retrieval over medicine leaflets",
        "status": "running",
        "version": env!("CARGO_PKG_VERSION"),
        "model": "TF-IDF vector space, cosine similarity",
        "endpoints": {
            "/api/search": "POST - search medicines",
            "/api/stats": "GET - system statistics",
            "/api/medicaments": "GET - list every medicine"
        }
    }))
}

pub async fn search_handler(
    State(state): State<AppState>,
    body: Result<Json<SearchRequest>, JsonRejection>,
) -> Result<Json<SearchResponse>, ApiError> {
    let Json(req) = body.map_err(|rejection| bad_request(rejection.body_text()))?;
    let query = match req.query.as_deref() {
        Some(q) if !q.is_empty() => q.to_string(),
        _ => return Err(bad_request("Query parameter is required")),
    };
    let outcome = state.engine.search(&query, req.top_k());
    Ok(Json(SearchResponse {
        query,
        total_results: outcome.results.len(),
        results: outcome.results,
        search_time: (outcome.elapsed_secs * 1000.0).round() / 1000.0,
    }))
}

pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    Json(StatsResponse { stats: state.engine.stats(), status: "operational" })
}

pub async fn medicaments_handler(State(state): State<AppState>) -> Json<MedicamentsResponse> {
    let medicaments = state.engine.metadata().to_vec();
    Json(MedicamentsResponse { total: medicaments.len(), medicaments })
}
