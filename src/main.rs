use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;

use tokio::net::TcpListener;

use newsimpact_backend::app;
use newsimpact_backend::config::{AppConfig, SentimentProviderKind};
use newsimpact_backend::external::huggingface::HuggingFaceModel;
use newsimpact_backend::external::lexicon::LexiconModel;
use newsimpact_backend::external::sentiment_model::SentimentModel;
use newsimpact_backend::external::yahoofinance::YahooFinanceProvider;
use newsimpact_backend::logging::{init_logging, LoggingConfig};
use newsimpact_backend::services::auth_service::AuthService;
use newsimpact_backend::services::corpus_service;
use newsimpact_backend::services::failure_cache::FailureCache;
use newsimpact_backend::services::history_service::HistoryStore;
use newsimpact_backend::services::sentiment_service::AnalysisContext;
use newsimpact_backend::state::AppState;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    // Logging first so config warnings are visible
    init_logging(LoggingConfig::from_env())?;

    let config = AppConfig::from_env()?;

    let (primary, fallback) = build_models(&config);

    let corpus = match corpus_service::load_corpus(Path::new(&config.news_csv_path), fallback.as_ref()).await {
        Ok(records) => records,
        Err(e) => {
            tracing::error!("Could not load headline corpus, continuing without it: {:#}", e);
            Vec::new()
        }
    };

    let analysis = AnalysisContext {
        primary,
        fallback,
        corpus: Arc::new(corpus),
        strategy: config.scoring_strategy,
        similar_limit: config.similar_headlines_limit,
    };

    let state = AppState {
        analysis: Arc::new(analysis),
        price_provider: Arc::new(YahooFinanceProvider::new()),
        failure_cache: FailureCache::new(),
        auth: AuthService::new(&config.auth)?,
        history: HistoryStore::new(config.history_limit),
    };
    let app = app::create_app(state, config.cors_allow_origin.as_deref());

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!(
        "News impact backend running at http://{}/ (strategy {:?})",
        addr,
        config.scoring_strategy
    );
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

/// Primary (three-class) and fallback (two-class) classifiers.
fn build_models(config: &AppConfig) -> (Arc<dyn SentimentModel>, Arc<dyn SentimentModel>) {
    match config.sentiment_provider {
        SentimentProviderKind::HuggingFace => {
            let hf = &config.huggingface;
            tracing::info!(
                "Using Hugging Face models: {} (fallback {})",
                hf.primary_model,
                hf.fallback_model
            );
            let primary: Arc<dyn SentimentModel> = Arc::new(HuggingFaceModel::new(
                &hf.base_url,
                &hf.primary_model,
                hf.api_token.clone(),
            ));
            let fallback: Arc<dyn SentimentModel> = Arc::new(HuggingFaceModel::new(
                &hf.base_url,
                &hf.fallback_model,
                hf.api_token.clone(),
            ));
            (primary, fallback)
        }
        SentimentProviderKind::Lexicon => {
            tracing::info!("Using offline lexicon sentiment models");
            let primary: Arc<dyn SentimentModel> = Arc::new(LexiconModel::ternary());
            let fallback: Arc<dyn SentimentModel> = Arc::new(LexiconModel::binary());
            (primary, fallback)
        }
    }
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
    tracing::info!("Shutdown signal received");
}
