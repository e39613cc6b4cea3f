use std::fmt;
use std::sync::Arc;
use tracing::debug;

use wn_core::types::{passages, render_passages};
use wn_core::{Article, LanguageModel, NewsRetriever, Result, SearchRequest};

use crate::pipeline::{run_pipeline, PipelineOutcome};

/// Retrieval and analysis over one shared retriever and one shared model.
///
/// Built once at startup and handed to every surface (HTTP, tool server, CLI).
#[derive(Clone)]
pub struct NewsService {
    retriever: Arc<dyn NewsRetriever>,
    model: Arc<dyn LanguageModel>,
}

impl fmt::Debug for NewsService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NewsService")
            .field("retriever", &"<dyn NewsRetriever>")
            .field("model", &self.model.name())
            .finish()
    }
}

impl NewsService {
    pub fn new(retriever: Arc<dyn NewsRetriever>, model: Arc<dyn LanguageModel>) -> Self {
        Self { retriever, model }
    }

    pub fn model(&self) -> &Arc<dyn LanguageModel> {
        &self.model
    }

    pub async fn search(&self, request: &SearchRequest) -> Result<Vec<Article>> {
        self.retriever.search_articles(request).await
    }

    pub async fn summarize_articles(&self, articles: &[Article], max_words: u32) -> Result<String> {
        debug!("Summarizing {} articles in up to {} words", articles.len(), max_words);
        self.model.summarize(&render_passages(articles), max_words).await
    }

    /// Always calls the model, even with no articles (empty context).
    pub async fn answer_question(&self, question: &str, articles: &[Article]) -> Result<String> {
        debug!("Answering {:?} over {} articles", question, articles.len());
        self.model
            .answer_based_on_context(question, &passages(articles))
            .await
    }

    pub async fn run(&self, user_question: &str) -> Result<PipelineOutcome> {
        run_pipeline(
            user_question,
            self.model.as_ref(),
            self.retriever.as_ref(),
            self.model.as_ref(),
        )
        .await
    }
}
