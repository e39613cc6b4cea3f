pub mod config;
pub mod error;
pub mod models;
pub mod prompts;
pub mod retrieval;
pub mod types;

pub use config::{ProjectConfig, Settings};
pub use error::{Error, Result};
pub use models::LanguageModel;
pub use retrieval::NewsRetriever;
pub use types::{Article, SearchPlan, SearchRequest, SortOrder, DEFAULT_MAX_RECORDS};
