use std::io;
use std::path::Path;

use reqwest::multipart::{Form, Part};

use crate::models::AnalysisResults;
use crate::server::FILE_FIELD;

pub const NOT_CSV_MESSAGE: &str = "Please upload a CSV file";
pub const GENERIC_ERROR_MESSAGE: &str = "An error occurred while analyzing the file";

const CSV_MIME_TYPES: [&str; 2] = ["text/csv", "application/vnd.ms-excel"];

/// Why an upload attempt failed. `Display` is the message shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ClientError {
    /// Wrong file type; no request was made
    #[error("Please upload a CSV file")]
    NotCsv,
    #[error("Please upload exactly one file (got {0})")]
    FileCount(usize),
    #[error("An analysis is already in progress")]
    Busy,
    /// The endpoint answered with a `detail`
    #[error("Error: {0}")]
    Endpoint(String),
    /// Network failure or an error response without a usable `detail`.
    /// The cause is kept for logs only.
    #[error("Error: An error occurred while analyzing the file")]
    Transport(String),
}

/// A file picked by the user
#[derive(Debug, Clone)]
pub struct UploadFile {
    pub name: String,
    pub mime: Option<String>,
    pub bytes: Vec<u8>,
}

impl UploadFile {
    pub fn new(name: impl Into<String>, mime: Option<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            mime,
            bytes,
        }
    }

    pub fn from_path(path: &Path) -> io::Result<Self> {
        let bytes = std::fs::read(path)?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let mime = has_csv_extension(&name).then(|| "text/csv".to_string());
        Ok(Self { name, mime, bytes })
    }

    /// Accepts a `.csv` extension or a CSV mime type
    pub fn is_csv(&self) -> bool {
        has_csv_extension(&self.name)
            || self
                .mime
                .as_deref()
                .map(|m| CSV_MIME_TYPES.contains(&m.trim().to_ascii_lowercase().as_str()))
                .unwrap_or(false)
    }

    /// Name sent with the multipart part. The endpoint only looks at the
    /// extension, so a file accepted by mime type gets `.csv` appended.
    pub fn upload_name(&self) -> String {
        if has_csv_extension(&self.name) {
            self.name.clone()
        } else {
            format!("{}.csv", self.name)
        }
    }
}

fn has_csv_extension(name: &str) -> bool {
    Path::new(name)
        .extension()
        .map(|ext| ext.eq_ignore_ascii_case("csv"))
        .unwrap_or(false)
}

/// Check a drop before anything is sent: exactly one file, and it must be CSV.
pub fn validate_files(mut files: Vec<UploadFile>) -> Result<UploadFile, ClientError> {
    if files.len() != 1 {
        return Err(ClientError::FileCount(files.len()));
    }
    let file = files.remove(0);
    if !file.is_csv() {
        return Err(ClientError::NotCsv);
    }
    Ok(file)
}

/// HTTP client for the analysis endpoint
#[derive(Clone)]
pub struct AnalyzerClient {
    http: reqwest::Client,
    base_url: String,
}

impl AnalyzerClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn analyze_url(&self) -> String {
        format!("{}/analyze", self.base_url)
    }

    /// Upload one CSV and wait for the analysis. No timeout, no retry.
    pub async fn analyze(&self, file: &UploadFile) -> Result<AnalysisResults, ClientError> {
        if !file.is_csv() {
            return Err(ClientError::NotCsv);
        }

        let part = Part::bytes(file.bytes.clone())
            .file_name(file.upload_name())
            .mime_str("text/csv")
            .map_err(transport)?;
        let form = Form::new().part(FILE_FIELD, part);

        tracing::info!(file = %file.name, bytes = file.bytes.len(), "uploading for analysis");
        let response = self
            .http
            .post(self.analyze_url())
            .multipart(form)
            .send()
            .await
            .map_err(transport)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.bytes().await.unwrap_or_default();
            return Err(match error_detail(&body) {
                Some(detail) => {
                    tracing::warn!(%status, %detail, "analysis rejected");
                    ClientError::Endpoint(detail)
                }
                None => {
                    tracing::warn!(%status, "analysis failed without detail");
                    ClientError::Transport(format!("endpoint returned {}", status))
                }
            });
        }

        response.json().await.map_err(transport)
    }
}

/// The `detail` string of an error body, if it has one
fn error_detail(body: &[u8]) -> Option<String> {
    let value: serde_json::Value = serde_json::from_slice(body).ok()?;
    value
        .get("detail")
        .and_then(|d| d.as_str())
        .filter(|d| !d.is_empty())
        .map(str::to_string)
}

fn transport(err: reqwest::Error) -> ClientError {
    tracing::warn!("analysis request failed: {}", err);
    ClientError::Transport(err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{http::StatusCode, routing::post, Json, Router};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn csv_file(name: &str, contents: &str) -> UploadFile {
        UploadFile::new(name, None, contents.as_bytes().to_vec())
    }

    async fn spawn(app: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}", addr)
    }

    #[test]
    fn test_csv_detection() {
        assert!(csv_file("reviews.csv", "").is_csv());
        assert!(csv_file("REVIEWS.CSV", "").is_csv());
        assert!(!csv_file("reviews.xlsx", "").is_csv());
        assert!(!csv_file("csv", "").is_csv());

        let by_mime = UploadFile::new("export", Some("text/csv".to_string()), Vec::new());
        assert!(by_mime.is_csv());
        let wrong_mime = UploadFile::new("photo", Some("image/png".to_string()), Vec::new());
        assert!(!wrong_mime.is_csv());
    }

    #[test]
    fn test_upload_name_keeps_csv_extension() {
        assert_eq!(csv_file("Reviews.CSV", "").upload_name(), "Reviews.CSV");
        let by_mime = UploadFile::new("export", Some("text/csv".to_string()), Vec::new());
        assert_eq!(by_mime.upload_name(), "export.csv");
    }

    #[test]
    fn test_validate_files() {
        assert_eq!(
            validate_files(vec![csv_file("notes.txt", "")]).unwrap_err(),
            ClientError::NotCsv
        );
        assert_eq!(validate_files(vec![]).unwrap_err(), ClientError::FileCount(0));
        assert_eq!(
            validate_files(vec![csv_file("a.csv", ""), csv_file("b.csv", "")]).unwrap_err(),
            ClientError::FileCount(2)
        );
        assert_eq!(validate_files(vec![csv_file("a.csv", "review\n")]).unwrap().name, "a.csv");
    }

    #[test]
    fn test_user_facing_messages() {
        assert_eq!(ClientError::NotCsv.to_string(), NOT_CSV_MESSAGE);
        assert_eq!(
            ClientError::Endpoint("Missing 'review' column".to_string()).to_string(),
            "Error: Missing 'review' column"
        );
        assert_eq!(
            ClientError::Transport("connection refused".to_string()).to_string(),
            format!("Error: {}", GENERIC_ERROR_MESSAGE)
        );
    }

    #[test]
    fn test_error_detail_extraction() {
        assert_eq!(error_detail(br#"{"detail":"CSV file is empty"}"#).as_deref(), Some("CSV file is empty"));
        assert_eq!(error_detail(br#"{"detail":[{"msg":"field required"}]}"#), None);
        assert_eq!(error_detail(b"<html>Bad Gateway</html>"), None);
    }

    #[tokio::test]
    async fn test_non_csv_makes_no_request() {
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = hits.clone();
        let app = Router::new().route(
            "/analyze",
            post(move || {
                let counter = counter.clone();
                async move {
                    counter.fetch_add(1, Ordering::SeqCst);
                    StatusCode::OK
                }
            }),
        );
        let client = AnalyzerClient::new(spawn(app).await);

        let err = client.analyze(&csv_file("reviews.pdf", "x")).await.unwrap_err();
        assert_eq!(err.to_string(), "Please upload a CSV file");
        assert_eq!(hits.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_endpoint_detail_is_surfaced() {
        let app = Router::new().route(
            "/analyze",
            post(|| async {
                (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    Json(serde_json::json!({ "detail": "Missing 'review' column" })),
                )
            }),
        );
        let client = AnalyzerClient::new(spawn(app).await);

        let err = client.analyze(&csv_file("reviews.csv", "text\nhi\n")).await.unwrap_err();
        assert_eq!(err.to_string(), "Error: Missing 'review' column");
    }

    #[tokio::test]
    async fn test_error_without_detail_is_generic() {
        let app = Router::new().route(
            "/analyze",
            post(|| async { (StatusCode::BAD_GATEWAY, "upstream down") }),
        );
        let client = AnalyzerClient::new(spawn(app).await);

        let err = client.analyze(&csv_file("reviews.csv", "review\nhi\n")).await.unwrap_err();
        assert!(matches!(err, ClientError::Transport(_)));
        assert_eq!(err.to_string(), "Error: An error occurred while analyzing the file");
    }

    #[tokio::test]
    async fn test_connection_failure_is_generic() {
        // Bind then drop to get a port nothing listens on
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = AnalyzerClient::new(format!("http://{}", addr));
        let err = client.analyze(&csv_file("reviews.csv", "review\nhi\n")).await.unwrap_err();
        assert!(matches!(err, ClientError::Transport(_)));
    }

    #[tokio::test]
    async fn test_round_trip_against_real_endpoint() {
        use crate::analysis::Analyzer;
        use crate::classifier::LexiconClassifier;
        use crate::server::{router, AppState};

        let analyzer = Analyzer::new(Arc::new(LexiconClassifier::new()), 16);
        let base = spawn(router(AppState::new(analyzer), 1024 * 1024)).await;
        let client = AnalyzerClient::new(format!("{}/", base));

        let results = client
            .analyze(&csv_file("reviews.csv", "review\nGreat product!\nAwful, it broke\n"))
            .await
            .unwrap();
        assert_eq!(results.summary.total_reviews, 2);
        assert_eq!(results.reviews[0].review, "Great product!");

        let err = client
            .analyze(&csv_file("reviews.csv", "id,text\n1,hi\n"))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Error: CSV file must contain a 'review' column");
    }

    #[tokio::test]
    async fn test_mime_only_csv_is_accepted_by_endpoint() {
        use crate::analysis::Analyzer;
        use crate::classifier::LexiconClassifier;
        use crate::server::{router, AppState};

        let analyzer = Analyzer::new(Arc::new(LexiconClassifier::new()), 16);
        let client = AnalyzerClient::new(spawn(router(AppState::new(analyzer), 1024 * 1024)).await);

        let file = UploadFile::new(
            "export",
            Some("text/csv".to_string()),
            b"review\nI love it\n".to_vec(),
        );
        let results = client.analyze(&file).await.unwrap();
        assert_eq!(results.summary.total_reviews, 1);
    }
}
