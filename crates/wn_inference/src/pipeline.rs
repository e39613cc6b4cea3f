//! Plan → retrieve → answer.
//!
//! The planner model turns the user's question into a [`SearchPlan`], the
//! retriever runs it against the news index, and the summarizer model writes
//! the final answer from the retrieved passages.

use serde_json::{Map, Value};
use tracing::{debug, info, warn};

use wn_core::prompts::PromptTemplates;
use wn_core::types::render_passages;
use wn_core::{LanguageModel, NewsRetriever, Result, SearchPlan, SearchRequest, DEFAULT_MAX_RECORDS};

pub const NO_ARTICLES_MESSAGE: &str = "No relevant articles found.";
pub const PIPELINE_SUMMARY_WORDS: u32 = 200;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineOutcome {
    pub answer: String,
    pub num_articles: usize,
    pub plan: SearchPlan,
}

/// Result of reading the planner's output. A failure never escapes: it is
/// collapsed into default plan fields right away.
#[derive(Debug)]
enum PlanParse {
    Parsed(Map<String, Value>),
    Failed,
}

impl PlanParse {
    fn from_response(raw: &str) -> Self {
        match serde_json::from_str::<Value>(raw) {
            Ok(Value::Object(fields)) => PlanParse::Parsed(fields),
            _ => PlanParse::Failed,
        }
    }

    fn into_plan(self, user_question: &str) -> SearchPlan {
        let fields = match self {
            PlanParse::Parsed(fields) => fields,
            PlanParse::Failed => Map::new(),
        };

        let query = match fields.get("query") {
            Some(Value::String(q)) if !q.trim().is_empty() => q.clone(),
            _ => user_question.trim().to_string(),
        };

        let languages = match fields.get("languages") {
            Some(Value::Array(items)) => Some(
                items
                    .iter()
                    .filter_map(|v| v.as_str())
                    .map(str::to_string)
                    .collect::<Vec<_>>(),
            )
            .filter(|l| !l.is_empty()),
            _ => None,
        };

        let max_records = fields
            .get("max_records")
            .and_then(Value::as_u64)
            .filter(|n| *n > 0)
            .map(|n| u32::try_from(n).unwrap_or(u32::MAX))
            .unwrap_or(DEFAULT_MAX_RECORDS);

        SearchPlan {
            query,
            start_date: loose_text(fields.get("start_date")),
            end_date: loose_text(fields.get("end_date")),
            languages,
            max_records,
        }
    }
}

fn loose_text(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn planning_prompt(user_question: &str) -> String {
    format!(
        "{}\n\nUSER QUESTION:\n{}\n",
        PromptTemplates::get().plan_gdelt,
        user_question
    )
}

/// Reads a plan out of raw planner text. Malformed output degrades to defaults.
pub fn parse_plan(raw: &str, user_question: &str) -> SearchPlan {
    let raw = if raw.trim().is_empty() { "{}" } else { raw };
    let parsed = PlanParse::from_response(raw);
    if matches!(parsed, PlanParse::Failed) {
        warn!("Planner output was not a JSON object, falling back to defaults");
    }
    parsed.into_plan(user_question)
}

pub async fn plan_gdelt_search(planner: &dyn LanguageModel, user_question: &str) -> Result<SearchPlan> {
    let raw = planner.generate(&planning_prompt(user_question)).await?;
    debug!("Planner output: {}", raw);
    Ok(parse_plan(&raw, user_question))
}

pub async fn run_pipeline(
    user_question: &str,
    planner: &dyn LanguageModel,
    retriever: &dyn NewsRetriever,
    summarizer: &dyn LanguageModel,
) -> Result<PipelineOutcome> {
    let plan = plan_gdelt_search(planner, user_question).await?;
    info!(
        "🧭 Planned search: {:?} (from {:?} to {:?}, languages {:?}, max {})",
        plan.query, plan.start_date, plan.end_date, plan.languages, plan.max_records
    );

    let articles = retriever.search_articles(&SearchRequest::from(&plan)).await?;
    info!("📰 Retrieved {} articles", articles.len());

    if articles.is_empty() {
        return Ok(PipelineOutcome {
            answer: NO_ARTICLES_MESSAGE.to_string(),
            num_articles: 0,
            plan,
        });
    }

    let combined = render_passages(&articles);
    let answer = summarizer.summarize(&combined, PIPELINE_SUMMARY_WORDS).await?;
    Ok(PipelineOutcome {
        answer,
        num_articles: articles.len(),
        plan,
    })
}
