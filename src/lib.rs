//! Product review sentiment analysis.
//!
//! The crate holds both halves of the system: the analysis endpoint
//! (`server`, `ingest`, `analysis`, `classifier`) and the dashboard client
//! pipeline (`client`). `models` is the JSON contract shared by both.

pub mod analysis;
pub mod classifier;
pub mod client;
pub mod config;
pub mod error;
pub mod ingest;
pub mod logging;
pub mod models;
pub mod server;

pub use analysis::{summarize, Analyzer};
pub use models::{AnalysisResults, FilterState, Review, Sentiment, SentimentFilter, Summary};
