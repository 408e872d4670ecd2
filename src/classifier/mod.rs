//! The sentiment model seam.
//!
//! The endpoint treats the model as a black box: text in, label and confidence
//! out. Two backends implement it: a hosted DistilBERT endpoint and an offline
//! word list scorer.

use std::sync::Arc;

use async_trait::async_trait;

use crate::config::{ClassifierBackend, ServerConfig};
use crate::models::Sentiment;

mod lexicon;
mod remote;

pub use lexicon::LexiconClassifier;
pub use remote::RemoteClassifier;

/// Model output for one input text
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Prediction {
    pub label: Sentiment,
    /// Probability of `label`, in [0, 1]
    pub score: f64,
}

#[derive(Debug, thiserror::Error)]
pub enum ClassifierError {
    #[error("model request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("model returned status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("model returned {got} predictions for {expected} inputs")]
    CountMismatch { expected: usize, got: usize },
    #[error("model returned no scores for an input")]
    NoScores,
    #[error("model returned unknown label '{0}'")]
    UnknownLabel(String),
}

#[async_trait]
pub trait SentimentClassifier: Send + Sync {
    /// Backend name for logs
    fn name(&self) -> &str;

    /// Classify every text. The output has one prediction per input, in order.
    async fn classify_batch(&self, texts: &[String]) -> Result<Vec<Prediction>, ClassifierError>;
}

/// Build the classifier selected by `SENTIMENT_BACKEND`.
pub fn from_config(config: &ServerConfig) -> Result<Arc<dyn SentimentClassifier>, ClassifierError> {
    let classifier: Arc<dyn SentimentClassifier> = match config.backend {
        ClassifierBackend::Lexicon => Arc::new(LexiconClassifier::new()),
        ClassifierBackend::Remote => Arc::new(RemoteClassifier::new(
            config.model_url.clone(),
            config.model_token.clone(),
        )?),
    };
    tracing::info!("Sentiment classifier: {}", classifier.name());
    Ok(classifier)
}

/// Map a model label to a sentiment. SST-2 heads use either names or indices.
pub(crate) fn parse_label(label: &str) -> Result<Sentiment, ClassifierError> {
    match label.trim().to_ascii_uppercase().as_str() {
        "POSITIVE" | "POS" | "LABEL_1" => Ok(Sentiment::Positive),
        "NEGATIVE" | "NEG" | "LABEL_0" => Ok(Sentiment::Negative),
        _ => Err(ClassifierError::UnknownLabel(label.to_string())),
    }
}
