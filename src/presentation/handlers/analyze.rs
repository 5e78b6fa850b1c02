use std::time::Instant;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::application::ports::AudioFetcher;
use crate::presentation::state::AppState;

/// Transcription is out of scope for this service; callers expect the field
/// to be present with this exact placeholder.
const TRANSCRIPT_PLACEHOLDER: &str = "[Transcript not available]";

#[derive(Deserialize)]
pub struct AnalyzeRequest {
    #[serde(rename = "audioUrl")]
    pub audio_url: String,
}

#[derive(Serialize)]
pub struct AnalyzeResponse {
    pub prediction: String,
    pub confidence: f32,
    pub transcript: String,
    #[serde(rename = "processingTime")]
    pub processing_time: f64,
}

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[tracing::instrument(skip(state, request))]
pub async fn analyze_handler<F>(
    State(state): State<AppState<F>>,
    Json(request): Json<AnalyzeRequest>,
) -> impl IntoResponse
where
    F: AudioFetcher + 'static,
{
    let start = Instant::now();

    let audio_data = match state.fetcher.fetch(&request.audio_url).await {
        Ok(data) => data,
        Err(e) => {
            tracing::warn!(url = %request.audio_url, error = %e, "Audio fetch failed");
            return (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse {
                    error: format!("Failed to fetch audio: {}", e),
                }),
            )
                .into_response();
        }
    };

    match state.analysis_service.analyze(&audio_data) {
        Ok(verdict) => {
            let processing_time = start.elapsed().as_secs_f64();
            tracing::info!(
                prediction = %verdict.label,
                confidence = verdict.confidence,
                processing_time_secs = processing_time,
                "Audio analysis completed"
            );
            (
                StatusCode::OK,
                Json(AnalyzeResponse {
                    prediction: verdict.label.as_str().to_string(),
                    confidence: verdict.confidence,
                    transcript: TRANSCRIPT_PLACEHOLDER.to_string(),
                    processing_time,
                }),
            )
                .into_response()
        }
        Err(e) => {
            tracing::error!(error = %e, "Audio analysis failed");
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
