//! Offline review sentiment scorer.
//!
//! Sums word weights with negation and intensifier handling, then squashes the
//! total through a logistic so the output reads like a two-class softmax.

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;

use super::{ClassifierError, Prediction, SentimentClassifier};
use crate::models::Sentiment;

/// How many tokens back a negation word still applies
const NEGATION_WINDOW: usize = 3;
/// Logistic steepness; a single strong word lands around 0.8
const LOGIT_SCALE: f64 = 1.5;

pub struct LexiconClassifier {
    words: HashMap<&'static str, f64>,
    negations: HashSet<&'static str>,
    intensifiers: HashMap<&'static str, f64>,
}

impl Default for LexiconClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl LexiconClassifier {
    pub fn new() -> Self {
        let positive = [
            ("good", 0.7),
            ("great", 1.0),
            ("excellent", 1.2),
            ("amazing", 1.2),
            ("awesome", 1.1),
            ("love", 1.1),
            ("loved", 1.1),
            ("loves", 1.0),
            ("perfect", 1.2),
            ("best", 1.0),
            ("fantastic", 1.2),
            ("wonderful", 1.1),
            ("happy", 0.8),
            ("recommend", 0.9),
            ("recommended", 0.9),
            ("nice", 0.6),
            ("solid", 0.6),
            ("sturdy", 0.6),
            ("reliable", 0.7),
            ("comfortable", 0.7),
            ("easy", 0.5),
            ("fast", 0.5),
            ("quality", 0.4),
            ("worth", 0.6),
            ("works", 0.5),
            ("beautiful", 0.9),
            ("pleased", 0.8),
            ("satisfied", 0.8),
            ("impressed", 0.9),
            ("like", 0.4),
            ("durable", 0.7),
            ("fine", 0.3),
        ];
        let negative = [
            ("bad", -0.8),
            ("terrible", -1.2),
            ("awful", -1.2),
            ("horrible", -1.2),
            ("worst", -1.3),
            ("poor", -0.9),
            ("hate", -1.1),
            ("hated", -1.1),
            ("broke", -1.0),
            ("broken", -1.0),
            ("defective", -1.1),
            ("useless", -1.1),
            ("waste", -1.1),
            ("disappointed", -1.0),
            ("disappointing", -1.0),
            ("cheap", -0.6),
            ("flimsy", -0.8),
            ("slow", -0.5),
            ("return", -0.5),
            ("returned", -0.7),
            ("refund", -0.7),
            ("junk", -1.1),
            ("garbage", -1.2),
            ("fails", -0.9),
            ("failed", -0.9),
            ("stopped", -0.6),
            ("overpriced", -0.8),
            ("uncomfortable", -0.7),
            ("annoying", -0.7),
            ("never", -0.3),
            ("problem", -0.6),
            ("problems", -0.6),
        ];

        let words = positive.into_iter().chain(negative).collect();

        let negations = [
            "not", "no", "never", "dont", "doesnt", "didnt", "isnt", "wasnt", "cant", "wont",
            "hardly", "without",
        ]
        .into_iter()
        .collect();

        let intensifiers = [
            ("very", 1.5),
            ("really", 1.4),
            ("extremely", 1.8),
            ("absolutely", 1.7),
            ("so", 1.3),
            ("super", 1.5),
            ("totally", 1.5),
            ("slightly", 0.6),
            ("somewhat", 0.7),
            ("pretty", 1.2),
        ]
        .into_iter()
        .collect();

        Self {
            words,
            negations,
            intensifiers,
        }
    }

    /// Raw signed score of a text. Positive means positive sentiment.
    pub fn score(&self, text: &str) -> f64 {
        let tokens = tokenize(text);
        let mut total = 0.0;

        for (idx, token) in tokens.iter().enumerate() {
            let Some(&weight) = self.words.get(token.as_str()) else {
                continue;
            };

            let window = &tokens[idx.saturating_sub(NEGATION_WINDOW)..idx];
            let mut value = weight;

            if let Some(prev) = window.last() {
                if let Some(&boost) = self.intensifiers.get(prev.as_str()) {
                    value *= boost;
                }
            }
            if window.iter().any(|t| self.negations.contains(t.as_str())) {
                value = -value * 0.8;
            }

            total += value;
        }

        total
    }

    pub fn predict(&self, text: &str) -> Prediction {
        let score = self.score(text);
        let p_positive = 1.0 / (1.0 + (-LOGIT_SCALE * score).exp());

        if p_positive >= 0.5 {
            Prediction {
                label: Sentiment::Positive,
                score: p_positive,
            }
        } else {
            Prediction {
                label: Sentiment::Negative,
                score: 1.0 - p_positive,
            }
        }
    }
}

#[async_trait]
impl SentimentClassifier for LexiconClassifier {
    fn name(&self) -> &str {
        "lexicon"
    }

    async fn classify_batch(&self, texts: &[String]) -> Result<Vec<Prediction>, ClassifierError> {
        Ok(texts.iter().map(|text| self.predict(text)).collect())
    }
}

/// Lowercase words with apostrophes removed, so "don't" matches "dont".
fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .replace(['\'', '\u{2019}'], "")
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}
