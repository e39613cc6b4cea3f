use serde::Deserialize;
use serde_json::{json, Value};

use wn_core::{Article, SearchRequest, DEFAULT_MAX_RECORDS};
use wn_inference::NewsService;

pub const GDELT_SEARCH: &str = "gdelt_search";
pub const SUMMARIZE_ARTICLES: &str = "summarize_articles";
pub const ANSWER_QUESTION: &str = "answer_question";

const DEFAULT_TOOL_SUMMARY_WORDS: u32 = 200;

#[derive(Debug, Deserialize)]
pub struct GdeltSearchArgs {
    pub query: String,
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub end_date: Option<String>,
    #[serde(default)]
    pub max_records: Option<u32>,
    #[serde(default)]
    pub languages: Option<Vec<String>>,
}

impl From<GdeltSearchArgs> for SearchRequest {
    fn from(args: GdeltSearchArgs) -> Self {
        SearchRequest::new(args.query)
            .with_dates(args.start_date, args.end_date)
            .with_max_records(args.max_records.filter(|n| *n > 0).unwrap_or(DEFAULT_MAX_RECORDS))
            .with_languages(args.languages)
    }
}

#[derive(Debug, Deserialize)]
pub struct SummarizeArgs {
    pub articles: Vec<Value>,
    #[serde(default)]
    pub max_words: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct AnswerArgs {
    pub question: String,
    pub articles: Vec<Value>,
}

/// A finished tool call: text for the client plus optional structured data.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolOutput {
    pub text: String,
    pub structured: Option<Value>,
}

#[derive(Debug)]
pub enum ToolError {
    UnknownTool(String),
    InvalidArguments(String),
    Failed(wn_core::Error),
}

fn article_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "title": {"type": "string"},
            "url": {"type": "string"},
            "socialimage": {"type": ["string", "null"]},
            "language": {"type": ["string", "null"]},
            "sourcecountry": {"type": ["string", "null"]},
            "domain": {"type": ["string", "null"]},
            "seendate": {"type": ["string", "null"]},
            "isduplicate": {"type": ["integer", "null"]},
            "sourceurl": {"type": ["string", "null"]},
            "snippet": {"type": ["string", "null"]}
        }
    })
}

pub fn definitions() -> Vec<Value> {
    vec![
        json!({
            "name": GDELT_SEARCH,
            "description": "Search news articles using the GDELT Doc API.",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "query": {"type": "string", "description": "Keywords or boolean query."},
                    "start_date": {"type": ["string", "null"], "description": "Optional start date YYYY-MM-DD."},
                    "end_date": {"type": ["string", "null"], "description": "Optional end date YYYY-MM-DD."},
                    "max_records": {"type": "integer", "default": DEFAULT_MAX_RECORDS, "description": "Maximum number of articles to return."},
                    "languages": {"type": ["array", "null"], "items": {"type": "string"}, "description": "Optional list of language codes."}
                },
                "required": ["query"]
            }
        }),
        json!({
            "name": SUMMARIZE_ARTICLES,
            "description": "Summarize a collection of articles into a concise digest.",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "articles": {"type": "array", "items": article_schema()},
                    "max_words": {"type": "integer", "default": DEFAULT_TOOL_SUMMARY_WORDS, "description": "Soft cap for summary length."}
                },
                "required": ["articles"]
            }
        }),
        json!({
            "name": ANSWER_QUESTION,
            "description": "Answer a question using only the provided articles as context.",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "question": {"type": "string"},
                    "articles": {"type": "array", "items": article_schema()}
                },
                "required": ["question", "articles"]
            }
        }),
    ]
}

fn parse_args<T: serde::de::DeserializeOwned>(arguments: Value) -> Result<T, ToolError> {
    let arguments = if arguments.is_null() { json!({}) } else { arguments };
    serde_json::from_value(arguments).map_err(|e| ToolError::InvalidArguments(e.to_string()))
}

pub async fn call(service: &NewsService, name: &str, arguments: Value) -> Result<ToolOutput, ToolError> {
    match name {
        GDELT_SEARCH => {
            let args: GdeltSearchArgs = parse_args(arguments)?;
            let articles = service
                .search(&SearchRequest::from(args))
                .await
                .map_err(ToolError::Failed)?;
            let rows: Vec<Value> = articles.iter().map(|a| Value::Object(a.to_row())).collect();
            Ok(ToolOutput {
                text: Value::Array(rows.clone()).to_string(),
                structured: Some(json!({ "result": rows })),
            })
        }
        SUMMARIZE_ARTICLES => {
            let args: SummarizeArgs = parse_args(arguments)?;
            let articles = Article::from_values(&args.articles);
            let max_words = args.max_words.unwrap_or(DEFAULT_TOOL_SUMMARY_WORDS);
            let text = service
                .summarize_articles(&articles, max_words)
                .await
                .map_err(ToolError::Failed)?;
            Ok(ToolOutput { text, structured: None })
        }
        ANSWER_QUESTION => {
            let args: AnswerArgs = parse_args(arguments)?;
            let articles = Article::from_values(&args.articles);
            let text = service
                .answer_question(&args.question, &articles)
                .await
                .map_err(ToolError::Failed)?;
            Ok(ToolOutput { text, structured: None })
        }
        other => Err(ToolError::UnknownTool(other.to_string())),
    }
}
