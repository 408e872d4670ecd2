use std::sync::Arc;
use std::time::Instant;

use axum::{
    body::Bytes,
    extract::{multipart::MultipartRejection, DefaultBodyLimit, Multipart, State},
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use uuid::Uuid;

use crate::analysis::Analyzer;
use crate::error::ApiError;
use crate::ingest;
use crate::models::AnalysisResults;


/// Multipart field carrying the CSV
pub const FILE_FIELD: &str = "file";

/// Stateless analysis API.
/// Each request owns its upload; nothing is kept between requests.
#[derive(Clone)]
pub struct AppState {
    analyzer: Arc<Analyzer>,
}

impl AppState {
    pub fn new(analyzer: Analyzer) -> Self {
        Self {
            analyzer: Arc::new(analyzer),
        }
    }
}

pub fn router(state: AppState, max_upload_bytes: usize) -> Router {
    Router::new()
        .route("/", get(check_status))
        .route("/health", get(health_check))
        .route("/analyze", post(analyze_reviews))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn check_status() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "Success": "Successfully deployed" }))
}

async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "healthy",
        "timestamp": Utc::now().to_rfc3339(),
    }))
}

/// Analyze sentiment in product reviews from a CSV upload.
/// The CSV must have a `review` column.
async fn analyze_reviews(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<AnalysisResults>, ApiError> {
    let upload = read_upload(multipart?).await?;

    if !upload.file_name.to_ascii_lowercase().ends_with(".csv") {
        return Err(ApiError::bad_request("Only CSV files are accepted"));
    }

    let request_id = Uuid::new_v4();
    let started = Instant::now();
    let texts = ingest::read_reviews(&upload.bytes)?;
    let rows = texts.len();

    tracing::info!(%request_id, file = %upload.file_name, rows, "analyzing upload");
    let results = state.analyzer.analyze(texts).await?;

    tracing::info!(
        %request_id,
        positive = results.summary.positive_count,
        negative = results.summary.negative_count,
        elapsed_ms = started.elapsed().as_millis() as u64,
        "analysis complete"
    );

    Ok(Json(results))
}

struct Upload {
    file_name: String,
    bytes: Bytes,
}

/// Pull the single `file` field out of the form. Other fields are ignored.
async fn read_upload(mut multipart: Multipart) -> Result<Upload, ApiError> {
    let mut upload = None;

    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }
        if upload.is_some() {
            return Err(ApiError::bad_request("Only one file may be uploaded"));
        }

        let file_name = field.file_name().unwrap_or_default().to_string();
        let bytes = field.bytes().await?;
        upload = Some(Upload { file_name, bytes });
    }

    upload.ok_or_else(|| ApiError::unprocessable("Missing 'file' field"))
}
