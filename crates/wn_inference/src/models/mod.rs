use std::sync::Arc;
use wn_core::config::Settings;
use wn_core::{Error, Result};

pub mod dummy;
pub mod gemini;

pub use dummy::DummyModel;
pub use gemini::GeminiModel;
pub use wn_core::LanguageModel;

#[derive(Debug, Clone, Default)]
pub struct ModelConfig {
    pub api_key: Option<String>,
    pub model_name: Option<String>,
    pub base_url: Option<String>,
}

impl From<&Settings> for ModelConfig {
    fn from(settings: &Settings) -> Self {
        Self {
            api_key: Some(settings.gemini_api_key.clone()),
            model_name: Some(settings.gemini_model.clone()),
            base_url: None,
        }
    }
}

pub fn create_model(kind: &str, config: ModelConfig) -> Result<Arc<dyn LanguageModel>> {
    match kind.to_lowercase().as_str() {
        "gemini" => Ok(Arc::new(GeminiModel::new(config)?)),
        "dummy" => Ok(Arc::new(DummyModel::new())),
        other => Err(Error::Config(format!(
            "Unknown model '{}'. Available models: gemini, dummy",
            other
        ))),
    }
}
