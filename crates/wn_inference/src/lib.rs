pub mod models;
pub mod pipeline;
pub mod service;

pub use models::{create_model, DummyModel, GeminiModel};
pub use pipeline::{plan_gdelt_search, run_pipeline, PipelineOutcome, NO_ARTICLES_MESSAGE};
pub use service::NewsService;
