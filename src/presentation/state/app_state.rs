use std::sync::Arc;

use crate::application::ports::AudioFetcher;
use crate::application::services::AnalysisService;
use crate::infrastructure::model::InferenceContext;

pub struct AppState<F>
where
    F: AudioFetcher,
{
    pub fetcher: Arc<F>,
    pub analysis_service: Arc<AnalysisService>,
    pub inference: Arc<InferenceContext>,
}

impl<F> Clone for AppState<F>
where
    F: AudioFetcher,
{
    fn clone(&self) -> Self {
        Self {
            fetcher: Arc::clone(&self.fetcher),
            analysis_service: Arc::clone(&self.analysis_service),
            inference: Arc::clone(&self.inference),
        }
    }
}
