use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Serialize;

use crate::application::ports::AudioFetcher;
use crate::presentation::state::AppState;

use super::analyze::ErrorResponse;

#[derive(Serialize)]
pub struct StreamAnalyzeResponse {
    pub prediction: String,
    pub confidence: f32,
}

#[tracing::instrument(skip(state, multipart))]
pub async fn analyze_stream_handler<F>(
    State(state): State<AppState<F>>,
    mut multipart: Multipart,
) -> impl IntoResponse
where
    F: AudioFetcher + 'static,
{
    let field = match multipart.next_field().await {
        Ok(Some(f)) => f,
        Ok(None) => {
            tracing::warn!("Stream analysis request with no file");
            return (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse {
                    error: "No file uploaded".to_string(),
                }),
            )
                .into_response();
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to read multipart");
            return (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse {
                    error: format!("Failed to read multipart: {}", e),
                }),
            )
                .into_response();
        }
    };

    let audio_data = match field.bytes().await {
        Ok(d) => d,
        Err(e) => {
            tracing::error!(error = %e, "Failed to read uploaded audio");
            return (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse {
                    error: format!("Failed to read file: {}", e),
                }),
            )
                .into_response();
        }
    };

    tracing::debug!(bytes = audio_data.len(), "Audio chunk received");

    match state.analysis_service.analyze(&audio_data) {
        Ok(verdict) => (
            StatusCode::OK,
            Json(StreamAnalyzeResponse {
                prediction: verdict.label.as_str().to_string(),
                confidence: verdict.confidence,
            }),
        )
            .into_response(),
        Err(e) => {
            tracing::error!(error = %e, "Stream analysis failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: e.to_string(),
                }),
            )
                .into_response()
        }
    }
}
