//! Chart data derived from the summary, plus plain-text rendering.

use crate::models::{Sentiment, Summary};

const SENTIMENTS: [Sentiment; 2] = [Sentiment::Positive, Sentiment::Negative];
const BAR_WIDTH: usize = 40;

/// One slice of the sentiment distribution pie
#[derive(Debug, Clone, PartialEq)]
pub struct Slice {
    pub sentiment: Sentiment,
    pub count: usize,
    /// Share of all reviews, 0..=100
    pub percent: f64,
}

/// One bar of the average-confidence chart
#[derive(Debug, Clone, PartialEq)]
pub struct ConfidenceBar {
    pub sentiment: Sentiment,
    /// Mean confidence as a percentage, 0..=100
    pub percent: f64,
}

/// Non-empty classes and their share of the total
pub fn distribution(summary: &Summary) -> Vec<Slice> {
    SENTIMENTS
        .into_iter()
        .map(|sentiment| (sentiment, summary.count(sentiment)))
        .filter(|&(_, count)| count > 0)
        .map(|(sentiment, count)| Slice {
            sentiment,
            count,
            percent: count as f64 / summary.total_reviews.max(1) as f64 * 100.0,
        })
        .collect()
}

/// Average confidence per class. NaN or non-positive averages get no bar.
pub fn confidence_bars(summary: &Summary) -> Vec<ConfidenceBar> {
    SENTIMENTS
        .into_iter()
        .map(|sentiment| (sentiment, summary.avg_confidence(sentiment)))
        .filter(|&(_, avg)| !avg.is_nan() && avg > 0.0)
        .map(|(sentiment, avg)| ConfidenceBar {
            sentiment,
            percent: avg * 100.0,
        })
        .collect()
}

pub fn render_distribution(slices: &[Slice]) -> String {
    let mut out = String::from("Sentiment Distribution\n");
    if slices.is_empty() {
        out.push_str("  (no data)\n");
    }
    for slice in slices {
        out.push_str(&format!(
            "  {:<8} {} {:.0}% ({})\n",
            label(slice.sentiment),
            bar(slice.percent),
            slice.percent,
            slice.count
        ));
    }
    out
}

pub fn render_confidence(bars: &[ConfidenceBar]) -> String {
    let mut out = String::from("Average Confidence\n");
    if bars.is_empty() {
        out.push_str("  (no data)\n");
    }
    for entry in bars {
        out.push_str(&format!(
            "  {:<8} {} {:.0}%\n",
            label(entry.sentiment),
            bar(entry.percent),
            entry.percent
        ));
    }
    out
}

fn label(sentiment: Sentiment) -> &'static str {
    match sentiment {
        Sentiment::Positive => "Positive",
        Sentiment::Negative => "Negative",
    }
}

fn bar(percent: f64) -> String {
    let filled = ((percent.clamp(0.0, 100.0) / 100.0) * BAR_WIDTH as f64).round() as usize;
    format!("{}{}", "#".repeat(filled), ".".repeat(BAR_WIDTH - filled))
}
