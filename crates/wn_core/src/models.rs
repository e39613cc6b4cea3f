use async_trait::async_trait;
use std::fmt;

use crate::prompts::{render, PromptTemplates};
use crate::Result;

pub const DEFAULT_SUMMARY_WORDS: u32 = 160;

#[async_trait]
pub trait LanguageModel: Send + Sync + fmt::Debug {
    fn name(&self) -> &str;

    /// Raw completion: prompt in, model text out (empty when the model says nothing)
    async fn generate(&self, prompt: &str) -> Result<String>;

    /// Summarize free text with an advisory word cap
    async fn summarize(&self, text: &str, max_words: u32) -> Result<String> {
        let max_words = max_words.to_string();
        let prompt = render(
            PromptTemplates::get().summarize,
            &[("max_words", max_words.as_str()), ("text", text)],
        );
        self.generate(&prompt).await
    }

    /// Answer a question using only the given passages as context
    async fn answer_based_on_context(&self, question: &str, passages: &[String]) -> Result<String> {
        let context = passages.join("\n\n");
        let prompt = render(
            PromptTemplates::get().qa,
            &[("context", context.as_str()), ("question", question)],
        );
        self.generate(&prompt).await
    }
}
