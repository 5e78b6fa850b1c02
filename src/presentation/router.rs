use axum::extract::DefaultBodyLimit;
use axum::middleware;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

use crate::application::ports::AudioFetcher;
use crate::infrastructure::observability::request_id_middleware;
use crate::presentation::handlers::{
    analyze_handler, analyze_stream_handler, health_handler, root_handler,
};
use crate::presentation::state::AppState;

const MAX_UPLOAD_BYTES: usize = 32 * 1024 * 1024;

pub fn create_router<F>(state: AppState<F>) -> Router
where
    F: AudioFetcher + 'static,
{
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
        .on_response(DefaultOnResponse::new().level(Level::INFO));

    Router::new()
        .route("/", get(root_handler::<F>))
        .route("/health", get(health_handler::<F>))
        .route("/analyze", post(analyze_handler::<F>))
        .route("/analyze-stream", post(analyze_stream_handler::<F>))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .layer(middleware::from_fn(request_id_middleware))
        .layer(trace_layer)
        .layer(cors)
        .with_state(state)
}
