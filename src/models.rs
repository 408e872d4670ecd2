use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Binary sentiment label assigned by the classifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Sentiment {
    Positive,
    Negative,
}

impl Sentiment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Sentiment::Positive => "POSITIVE",
            Sentiment::Negative => "NEGATIVE",
        }
    }
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One analyzed row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Review {
    pub review: String,
    pub sentiment: Sentiment,
    pub confidence: f64,
}

/// Aggregate statistics over all analyzed reviews.
///
/// An average is NaN when its class has no rows. On the wire that is `null`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Summary {
    pub positive_count: usize,
    pub negative_count: usize,
    #[serde(with = "nan_as_null")]
    pub positive_avg_confidence: f64,
    #[serde(with = "nan_as_null")]
    pub negative_avg_confidence: f64,
    pub total_reviews: usize,
}

impl Summary {
    pub fn count(&self, sentiment: Sentiment) -> usize {
        match sentiment {
            Sentiment::Positive => self.positive_count,
            Sentiment::Negative => self.negative_count,
        }
    }

    pub fn avg_confidence(&self, sentiment: Sentiment) -> f64 {
        match sentiment {
            Sentiment::Positive => self.positive_avg_confidence,
            Sentiment::Negative => self.negative_avg_confidence,
        }
    }
}

/// Payload returned by `POST /analyze`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisResults {
    pub summary: Summary,
    pub reviews: Vec<Review>,
}

/// Which sentiment the dashboard table shows
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SentimentFilter {
    #[default]
    All,
    Positive,
    Negative,
}

impl SentimentFilter {
    pub fn matches(&self, sentiment: Sentiment) -> bool {
        match self {
            SentimentFilter::All => true,
            SentimentFilter::Positive => sentiment == Sentiment::Positive,
            SentimentFilter::Negative => sentiment == Sentiment::Negative,
        }
    }
}

impl FromStr for SentimentFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(SentimentFilter::All),
            "positive" => Ok(SentimentFilter::Positive),
            "negative" => Ok(SentimentFilter::Negative),
            other => Err(format!(
                "unknown sentiment filter '{}' (expected all, positive or negative)",
                other
            )),
        }
    }
}

/// Search and sentiment filter applied to the results table
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterState {
    pub search_term: String,
    pub sentiment_filter: SentimentFilter,
}

impl FilterState {
    pub fn is_active(&self) -> bool {
        !self.search_term.is_empty() || self.sentiment_filter != SentimentFilter::All
    }
}

/// Error body returned by the endpoint for every non-2xx response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorDetail {
    pub detail: String,
}

mod nan_as_null {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
        if value.is_nan() {
            serializer.serialize_none()
        } else {
            serializer.serialize_some(value)
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
        Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or(f64::NAN))
    }
}
