//! Terminal dashboard: upload a review CSV, then show the summary, charts and
//! the filtered table, optionally exporting the visible rows.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;
use review_sentiment::{
    client::{AnalyzerClient, Dashboard, UploadFile},
    config::ClientConfig,
    logging, SentimentFilter,
};

#[derive(Parser, Debug)]
#[command(name = "dashboard")]
#[command(about = "Upload product reviews and explore their sentiment", long_about = None)]
struct Cli {
    /// CSV file with a `review` column
    file: PathBuf,

    /// Only show reviews containing this text (case-insensitive)
    #[arg(short, long, default_value = "")]
    search: String,

    /// Sentiment to show: all, positive or negative
    #[arg(short, long, default_value = "all")]
    filter: SentimentFilter,

    /// Write the visible rows to sentiment_analysis_results.csv in DIR
    /// (current directory when DIR is left out)
    #[arg(short, long, value_name = "DIR", num_args = 0..=1, default_missing_value = ".")]
    export: Option<PathBuf>,

    /// Analysis endpoint base URL (overrides ANALYZER_API_URL)
    #[arg(long)]
    api_url: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    logging::init();

    let cli = Cli::parse();
    let api_url = cli
        .api_url
        .unwrap_or_else(|| ClientConfig::from_env().api_url);
    let client = AnalyzerClient::new(api_url);

    let file = UploadFile::from_path(&cli.file)
        .with_context(|| format!("reading {}", cli.file.display()))?;

    let mut dashboard = Dashboard::new();
    dashboard.set_search_term(cli.search);
    dashboard.set_sentiment_filter(cli.filter);

    if let Err(err) = dashboard.upload(&client, vec![file]).await {
        bail!("{}", err);
    }

    print!("{}", dashboard.render());

    if let Some(dir) = cli.export {
        if let Some(path) = dashboard.export_to(&dir)? {
            println!("\nExported {} rows to {}", dashboard.visible_reviews().len(), path.display());
        }
    }

    Ok(())
}
