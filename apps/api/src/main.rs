use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use cv_search_api::config::Config;
use cv_search_api::extract::PdfTextExtractor;
use cv_search_api::index::{CandidateIndexer, ElasticIndexer};
use cv_search_api::parsing::{ParserConfig, ResumeParser};
use cv_search_api::routes::build_router;
use cv_search_api::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("cv_search_api={}", &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting CV search API v{}", env!("CARGO_PKG_VERSION"));

    let parser = Arc::new(ResumeParser::new(
        ParserConfig::default().with_language(&config.resume_language),
    ));
    info!(
        "Parser initialized ({} section anchors, language {})",
        parser.config().anchors.len(),
        parser.config().language
    );

    // Initialize Elasticsearch indexer (optional)
    let indexer: Option<Arc<dyn CandidateIndexer>> = match &config.elasticsearch_url {
        Some(url) => {
            let elastic = ElasticIndexer::new(url, &config.elasticsearch_index)?;
            if let Err(e) = elastic.ensure_index().await {
                warn!("Could not prepare index '{}': {e}", config.elasticsearch_index);
            }
            info!("Indexing into {url}/{}", config.elasticsearch_index);
            let indexer: Arc<dyn CandidateIndexer> = Arc::new(elastic);
            Some(indexer)
        }
        None => {
            warn!("ELASTICSEARCH_URL not set; uploads will be parsed but not indexed");
            None
        }
    };

    // Build app state
    let state = AppState {
        config: config.clone(),
        parser,
        extractor: Arc::new(PdfTextExtractor),
        indexer,
    };

    // Build router
    let app = build_router(state).layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(CorsLayer::permissive()),
    );

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
