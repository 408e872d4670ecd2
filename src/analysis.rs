use std::sync::Arc;
use std::time::Instant;

use crate::classifier::{ClassifierError, SentimentClassifier};
use crate::models::{AnalysisResults, Review, Sentiment, Summary};

/// Runs the classifier over uploaded reviews and aggregates the results
pub struct Analyzer {
    classifier: Arc<dyn SentimentClassifier>,
    batch_size: usize,
}

impl Analyzer {
    pub fn new(classifier: Arc<dyn SentimentClassifier>, batch_size: usize) -> Self {
        Self {
            classifier,
            batch_size: batch_size.max(1),
        }
    }

    pub async fn analyze(&self, texts: Vec<String>) -> Result<AnalysisResults, ClassifierError> {
        let started = Instant::now();
        let mut reviews = Vec::with_capacity(texts.len());

        for batch in texts.chunks(self.batch_size) {
            let predictions = self.classifier.classify_batch(batch).await?;
            if predictions.len() != batch.len() {
                return Err(ClassifierError::CountMismatch {
                    expected: batch.len(),
                    got: predictions.len(),
                });
            }

            reviews.extend(batch.iter().zip(predictions).map(|(text, prediction)| Review {
                review: text.clone(),
                sentiment: prediction.label,
                confidence: prediction.score,
            }));

            // Let other requests make progress between batches
            tokio::task::yield_now().await;
        }

        let summary = summarize(&reviews);
        tracing::debug!(
            classifier = self.classifier.name(),
            rows = reviews.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "classified reviews"
        );

        Ok(AnalysisResults { summary, reviews })
    }
}

/// Counts and mean confidence per sentiment. A class with no rows averages to NaN.
pub fn summarize(reviews: &[Review]) -> Summary {
    let mut positive_count = 0usize;
    let mut negative_count = 0usize;
    let mut positive_total = 0.0;
    let mut negative_total = 0.0;

    for review in reviews {
        match review.sentiment {
            Sentiment::Positive => {
                positive_count += 1;
                positive_total += review.confidence;
            }
            Sentiment::Negative => {
                negative_count += 1;
                negative_total += review.confidence;
            }
        }
    }

    Summary {
        positive_count,
        negative_count,
        positive_avg_confidence: mean(positive_total, positive_count),
        negative_avg_confidence: mean(negative_total, negative_count),
        total_reviews: reviews.len(),
    }
}

fn mean(total: f64, count: usize) -> f64 {
    if count == 0 {
        f64::NAN
    } else {
        total / count as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::{LexiconClassifier, Prediction};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn review(text: &str, sentiment: Sentiment, confidence: f64) -> Review {
        Review {
            review: text.to_string(),
            sentiment,
            confidence,
        }
    }

    /// Scores every text at a fixed confidence and records batch sizes
    struct FixedClassifier {
        calls: AtomicUsize,
        max_batch: AtomicUsize,
    }

    #[async_trait]
    impl SentimentClassifier for FixedClassifier {
        fn name(&self) -> &str {
            "fixed"
        }

        async fn classify_batch(&self, texts: &[String]) -> Result<Vec<Prediction>, ClassifierError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.max_batch.fetch_max(texts.len(), Ordering::SeqCst);
            Ok(texts
                .iter()
                .map(|t| Prediction {
                    label: if t.starts_with('+') { Sentiment::Positive } else { Sentiment::Negative },
                    score: 0.9,
                })
                .collect())
        }
    }

    #[test]
    fn test_summarize_counts_and_means() {
        let reviews = vec![
            review("a", Sentiment::Positive, 0.9),
            review("b", Sentiment::Positive, 0.7),
            review("c", Sentiment::Negative, 0.6),
        ];
        let summary = summarize(&reviews);

        assert_eq!(summary.positive_count, 2);
        assert_eq!(summary.negative_count, 1);
        assert_eq!(summary.total_reviews, 3);
        assert!((summary.positive_avg_confidence - 0.8).abs() < 1e-12);
        assert!((summary.negative_avg_confidence - 0.6).abs() < 1e-12);
    }

    #[test]
    fn test_summarize_empty_class_is_nan() {
        let summary = summarize(&[review("Great product!", Sentiment::Positive, 0.98)]);
        assert_eq!(summary.positive_avg_confidence, 0.98);
        assert!(summary.negative_avg_confidence.is_nan());

        let empty = summarize(&[]);
        assert_eq!(empty.total_reviews, 0);
        assert!(empty.positive_avg_confidence.is_nan());
        assert!(empty.negative_avg_confidence.is_nan());
    }

    #[test]
    fn test_counts_always_add_up() {
        let sentiments = [Sentiment::Positive, Sentiment::Negative];
        for n in 0..40 {
            let reviews: Vec<Review> = (0..n)
                .map(|i| review("x", sentiments[(i * 7 + n) % 3 % 2], 0.5 + (i % 5) as f64 / 10.0))
                .collect();
            let summary = summarize(&reviews);
            assert_eq!(summary.positive_count + summary.negative_count, summary.total_reviews);
        }
    }

    #[tokio::test]
    async fn test_analyze_batches_and_keeps_order() {
        let classifier = Arc::new(FixedClassifier {
            calls: AtomicUsize::new(0),
            max_batch: AtomicUsize::new(0),
        });
        let analyzer = Analyzer::new(classifier.clone(), 4);

        let texts: Vec<String> = (0..10)
            .map(|i| if i % 3 == 0 { format!("+{}", i) } else { format!("-{}", i) })
            .collect();
        let results = analyzer.analyze(texts.clone()).await.unwrap();

        assert_eq!(classifier.calls.load(Ordering::SeqCst), 3);
        assert_eq!(classifier.max_batch.load(Ordering::SeqCst), 4);
        let returned: Vec<&str> = results.reviews.iter().map(|r| r.review.as_str()).collect();
        assert_eq!(returned, texts.iter().map(String::as_str).collect::<Vec<_>>());
        assert_eq!(results.summary.positive_count, 4);
        assert_eq!(results.summary.negative_count, 6);
    }

    #[tokio::test]
    async fn test_analyze_with_lexicon() {
        let analyzer = Analyzer::new(Arc::new(LexiconClassifier::new()), 16);
        let results = analyzer
            .analyze(vec!["Great product!".to_string(), "Awful, it broke.".to_string()])
            .await
            .unwrap();

        assert_eq!(results.reviews[0].sentiment, Sentiment::Positive);
        assert_eq!(results.reviews[1].sentiment, Sentiment::Negative);
        assert_eq!(results.summary.total_reviews, 2);
    }
}
