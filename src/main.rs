use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpListener;

use amdetect::application::services::{AnalysisService, HeuristicScorer};
use amdetect::infrastructure::audio::SymphoniaDecoder;
use amdetect::infrastructure::http::ReqwestAudioFetcher;
use amdetect::infrastructure::model::InferenceContext;
use amdetect::infrastructure::observability::{init_tracing, TracingConfig};
use amdetect::presentation::{create_router, AppState, Environment, Settings};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::from_env();

    // JSON logs by default in production, LOG_FORMAT always wins
    let json_format = std::env::var("LOG_FORMAT")
        .map(|v| v.to_lowercase() == "json")
        .unwrap_or(settings.environment == Environment::Prod);

    init_tracing(
        TracingConfig {
            environment: settings.environment.to_string(),
            json_format,
        },
        settings.server.port,
    );

    let inference = Arc::new(InferenceContext::initialize(
        &settings.model.primary_model,
        &settings.model.fallback_model,
    ));
    tracing::info!(
        capability = inference.capability().as_str(),
        device = inference.device(),
        "Inference context resolved"
    );

    let analysis_service = Arc::new(AnalysisService::new(
        Arc::new(SymphoniaDecoder::new()),
        inference.model(),
        HeuristicScorer::default(),
    ));

    let state = AppState {
        fetcher: Arc::new(ReqwestAudioFetcher::new()),
        analysis_service,
        inference,
    };

    let router = create_router(state);

    let addr = SocketAddr::new(settings.server.host.parse()?, settings.server.port);
    tracing::info!("Listening on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, router).await?;

    Ok(())
}
