use std::fmt;
use wn_core::{LanguageModel, Result};

const ECHO_WORDS: usize = 20;

/// Offline model that echoes the first words of the last non-empty prompt line.
#[derive(Default)]
pub struct DummyModel;

impl fmt::Debug for DummyModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DummyModel").finish()
    }
}

impl DummyModel {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait::async_trait]
impl LanguageModel for DummyModel {
    fn name(&self) -> &str {
        "Dummy"
    }

    async fn generate(&self, prompt: &str) -> Result<String> {
        let line = prompt
            .lines()
            .rev()
            .find(|l| !l.trim().is_empty())
            .unwrap_or_default();
        let words: Vec<&str> = line.split_whitespace().take(ECHO_WORDS).collect();
        Ok(words.join(" "))
    }
}
