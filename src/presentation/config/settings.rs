use super::Environment;

/// Process configuration assembled from environment variables with
/// production defaults.
#[derive(Debug, Clone)]
pub struct Settings {
    pub environment: Environment,
    pub server: ServerSettings,
    pub model: ModelSettings,
}

#[derive(Debug, Clone)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone)]
pub struct ModelSettings {
    /// Checkpoint fine-tuned for voicemail/human telephony audio.
    pub primary_model: String,
    /// Generic base checkpoint tried when the primary is unavailable.
    pub fallback_model: String,
}

impl Settings {
    pub fn from_env() -> Self {
        let environment = std::env::var("APP_ENV")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or_default();

        Self {
            environment,
            server: ServerSettings::default(),
            model: ModelSettings::default(),
        }
    }
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: std::env::var("SERVER_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: std::env::var("SERVER_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8001),
        }
    }
}

impl Default for ModelSettings {
    fn default() -> Self {
        Self {
            primary_model: std::env::var("AMD_PRIMARY_MODEL")
                .unwrap_or_else(|_| "jakeBland/wav2vec-vm-finetune".to_string()),
            fallback_model: std::env::var("AMD_FALLBACK_MODEL")
                .unwrap_or_else(|_| "facebook/wav2vec2-base-960h".to_string()),
        }
    }
}
