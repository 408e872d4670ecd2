//! Dashboard state: the held results, the filter, and upload progress.

use std::io;
use std::path::{Path, PathBuf};

use super::charts::{confidence_bars, distribution, render_confidence, render_distribution};
use super::export::{to_csv, write_export};
use super::filter::filter_reviews;
use super::upload::{validate_files, AnalyzerClient, ClientError, UploadFile};
use crate::models::{AnalysisResults, FilterState, Review, SentimentFilter};

pub const NO_REVIEWS_MESSAGE: &str = "No reviews found";

const TABLE_TEXT_WIDTH: usize = 60;

#[derive(Debug, Default)]
pub struct Dashboard {
    results: Option<AnalysisResults>,
    filter: FilterState,
    loading: bool,
    error: Option<ClientError>,
}

impl Dashboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn results(&self) -> Option<&AnalysisResults> {
        self.results.as_ref()
    }

    pub fn error(&self) -> Option<&ClientError> {
        self.error.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn filter(&self) -> &FilterState {
        &self.filter
    }

    /// Start an upload from a drop. Clears the previous error.
    ///
    /// Rejected while another upload is in flight; that rejection leaves the
    /// dashboard untouched.
    pub fn begin_upload(&mut self, files: Vec<UploadFile>) -> Result<UploadFile, ClientError> {
        if self.loading {
            return Err(ClientError::Busy);
        }

        self.error = None;
        match validate_files(files) {
            Ok(file) => {
                self.loading = true;
                Ok(file)
            }
            Err(err) => {
                self.error = Some(err.clone());
                Err(err)
            }
        }
    }

    /// Settle the in-flight upload. Success replaces the held results; failure
    /// keeps them and records the error.
    pub fn finish_upload(&mut self, outcome: Result<AnalysisResults, ClientError>) {
        self.loading = false;
        match outcome {
            Ok(results) => self.results = Some(results),
            Err(err) => self.error = Some(err),
        }
    }

    /// Validate, send and settle one upload.
    pub async fn upload(
        &mut self,
        client: &AnalyzerClient,
        files: Vec<UploadFile>,
    ) -> Result<(), ClientError> {
        let file = self.begin_upload(files)?;
        let outcome = client.analyze(&file).await;
        let result = outcome.as_ref().map(|_| ()).map_err(|err| err.clone());
        self.finish_upload(outcome);
        result
    }

    pub fn set_search_term(&mut self, term: impl Into<String>) {
        self.filter.search_term = term.into();
    }

    pub fn set_sentiment_filter(&mut self, filter: SentimentFilter) {
        self.filter.sentiment_filter = filter;
    }

    /// Rows passing the current filter
    pub fn visible_reviews(&self) -> Vec<&Review> {
        match &self.results {
            Some(results) => filter_reviews(&results.reviews, &self.filter),
            None => Vec::new(),
        }
    }

    /// CSV of the visible rows, or `None` before any results arrive
    pub fn export_csv(&self) -> csv::Result<Option<String>> {
        if self.results.is_none() {
            return Ok(None);
        }
        to_csv(self.visible_reviews()).map(Some)
    }

    pub fn export_to(&self, dir: &Path) -> io::Result<Option<PathBuf>> {
        if self.results.is_none() {
            return Ok(None);
        }
        write_export(dir, self.visible_reviews()).map(Some)
    }

    /// Full text rendering: status line, summary cards, both charts and the table
    pub fn render(&self) -> String {
        let mut out = String::new();

        if self.loading {
            out.push_str("Analyzing reviews...\n");
        }
        if let Some(err) = &self.error {
            out.push_str(&format!("{}\n", err));
        }

        let Some(results) = &self.results else {
            if !self.loading && self.error.is_none() {
                out.push_str("Drop a CSV file with a 'review' column to analyze it.\n");
            }
            return out;
        };

        let summary = &results.summary;
        out.push_str(&format!(
            "Total Reviews: {}   Positive: {}   Negative: {}\n\n",
            summary.total_reviews, summary.positive_count, summary.negative_count
        ));
        out.push_str(&render_distribution(&distribution(summary)));
        out.push('\n');
        out.push_str(&render_confidence(&confidence_bars(summary)));
        out.push('\n');
        out.push_str(&render_table(&self.visible_reviews()));
        out
    }
}

fn render_table(rows: &[&Review]) -> String {
    if rows.is_empty() {
        return format!("{}\n", NO_REVIEWS_MESSAGE);
    }

    let mut out = format!(
        "{:<width$}  {:<9}  {:>10}\n",
        "Review",
        "Sentiment",
        "Confidence",
        width = TABLE_TEXT_WIDTH
    );
    for row in rows {
        out.push_str(&format!(
            "{:<width$}  {:<9}  {:>9.1}%\n",
            truncate(&row.review),
            row.sentiment.as_str(),
            row.confidence * 100.0,
            width = TABLE_TEXT_WIDTH
        ));
    }
    out
}

/// Single line, at most `TABLE_TEXT_WIDTH` characters
fn truncate(text: &str) -> String {
    let flat: String = text
        .chars()
        .map(|c| if c == '\n' || c == '\r' { ' ' } else { c })
        .collect();
    if flat.chars().count() <= TABLE_TEXT_WIDTH {
        return flat;
    }
    let mut cut: String = flat.chars().take(TABLE_TEXT_WIDTH - 3).collect();
    cut.push_str("...");
    cut
}
