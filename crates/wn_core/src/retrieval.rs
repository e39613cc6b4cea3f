use async_trait::async_trait;
use crate::types::{Article, SearchRequest};
use crate::Result;

#[async_trait]
pub trait NewsRetriever: Send + Sync {
    /// Search the news index, preserving the order the index returns
    async fn search_articles(&self, request: &SearchRequest) -> Result<Vec<Article>>;
}
