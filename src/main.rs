use review_sentiment::{
    classifier,
    config::ServerConfig,
    logging,
    server::{self, AppState},
    Analyzer,
};

/// Review sentiment analysis API
/// Stateless: every upload is analyzed and answered in one request
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    logging::init();

    let config = ServerConfig::from_env()?;
    tracing::info!(
        "Loaded configuration: backend={:?} batch_size={} max_upload_bytes={}",
        config.backend,
        config.batch_size,
        config.max_upload_bytes
    );

    let classifier = classifier::from_config(&config)?;
    let analyzer = Analyzer::new(classifier, config.batch_size);
    let app = server::router(AppState::new(analyzer), config.max_upload_bytes);

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server running on http://{}", addr);

    axum::serve(listener, app).await?;
    Ok(())
}
