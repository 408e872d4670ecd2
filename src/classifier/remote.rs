//! Hosted text-classification model (DistilBERT fine-tuned on SST-2).
//!
//! Speaks the Hugging Face inference API: `POST {"inputs": [...]}` and a list of
//! `{label, score}` candidates back for every input.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::{parse_label, ClassifierError, Prediction, SentimentClassifier};

pub struct RemoteClassifier {
    http: reqwest::Client,
    url: String,
    token: Option<String>,
}

/// Token limit of the DistilBERT encoder
pub const MAX_INPUT_TOKENS: usize = 512;

#[derive(Serialize)]
struct InferenceRequest<'a> {
    inputs: &'a [String],
    parameters: InferenceParameters,
    options: InferenceOptions,
}

/// Tokenizer arguments; long reviews are cut instead of failing the batch
#[derive(Serialize)]
struct InferenceParameters {
    truncation: bool,
    max_length: usize,
}

#[derive(Serialize)]
struct InferenceOptions {
    wait_for_model: bool,
}

#[derive(Debug, Deserialize)]
struct LabelScore {
    label: String,
    score: f64,
}

/// Batched calls return one candidate list per input; some deployments flatten
/// a single input's candidates into one list.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum InferenceResponse {
    Nested(Vec<Vec<LabelScore>>),
    Flat(Vec<LabelScore>),
}

impl RemoteClassifier {
    pub fn new(url: impl Into<String>, token: Option<String>) -> Result<Self, ClassifierError> {
        let http = reqwest::Client::builder().build()?;
        Ok(Self {
            http,
            url: url.into(),
            token,
        })
    }

    fn to_predictions(
        response: InferenceResponse,
        expected: usize,
    ) -> Result<Vec<Prediction>, ClassifierError> {
        let per_input = match response {
            InferenceResponse::Nested(lists) => lists,
            InferenceResponse::Flat(list) if expected == 1 => vec![list],
            // Top-1 output: one candidate per input
            InferenceResponse::Flat(list) => list.into_iter().map(|c| vec![c]).collect(),
        };

        if per_input.len() != expected {
            return Err(ClassifierError::CountMismatch {
                expected,
                got: per_input.len(),
            });
        }

        per_input
            .into_iter()
            .map(|candidates| {
                let best = candidates
                    .into_iter()
                    .max_by(|a, b| a.score.total_cmp(&b.score))
                    .ok_or(ClassifierError::NoScores)?;
                Ok(Prediction {
                    label: parse_label(&best.label)?,
                    score: best.score.clamp(0.0, 1.0),
                })
            })
            .collect()
    }
}

#[async_trait]
impl SentimentClassifier for RemoteClassifier {
    fn name(&self) -> &str {
        "remote"
    }

    async fn classify_batch(&self, texts: &[String]) -> Result<Vec<Prediction>, ClassifierError> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let mut request = self.http.post(&self.url).json(&InferenceRequest {
            inputs: texts,
            parameters: InferenceParameters {
                truncation: true,
                max_length: MAX_INPUT_TOKENS,
            },
            options: InferenceOptions {
                wait_for_model: true,
            },
        });
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ClassifierError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: InferenceResponse = response.json().await?;
        Self::to_predictions(parsed, texts.len())
    }
}
