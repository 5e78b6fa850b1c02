use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Serialize;

use crate::application::ports::AudioFetcher;
use crate::presentation::state::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub model_loaded: bool,
    pub processor_loaded: bool,
    pub device: String,
}

pub async fn health_handler<F>(State(state): State<AppState<F>>) -> impl IntoResponse
where
    F: AudioFetcher + 'static,
{
    (
        StatusCode::OK,
        Json(HealthResponse {
            status: "healthy".to_string(),
            model_loaded: state.inference.model_loaded(),
            processor_loaded: state.inference.processor_loaded(),
            device: state.inference.device().to_string(),
        }),
    )
}
