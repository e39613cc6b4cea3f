use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

pub const DEFAULT_MAX_RECORDS: u32 = 20;

/// One news item as returned by the news index.
///
/// `title` and `url` are always present (possibly empty). Everything else is
/// kept as the opaque string the index sent; dates and URLs are not parsed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Article {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub socialimage: Option<String>,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub sourcecountry: Option<String>,
    #[serde(default)]
    pub domain: Option<String>,
    #[serde(default)]
    pub seendate: Option<String>,
    #[serde(default)]
    pub isduplicate: Option<i64>,
    #[serde(default)]
    pub sourceurl: Option<String>,
    #[serde(default)]
    pub snippet: Option<String>,
}

impl Article {
    /// Builds an article from an untyped row, coercing each field on its own.
    pub fn from_row(row: &Map<String, Value>) -> Self {
        Self {
            title: required_text(row.get("title")),
            url: required_text(row.get("url")),
            socialimage: optional_text(row.get("socialimage")),
            language: optional_text(row.get("language")),
            sourcecountry: optional_text(row.get("sourcecountry")),
            domain: optional_text(row.get("domain")),
            seendate: optional_text(row.get("seendate")),
            isduplicate: optional_flag(row.get("isduplicate")),
            sourceurl: optional_text(row.get("sourceurl")),
            snippet: optional_text(row.get("snippet")),
        }
    }

    /// Parses a list of untyped values, skipping anything that is not an object.
    pub fn from_values(values: &[Value]) -> Vec<Self> {
        values
            .iter()
            .filter_map(Value::as_object)
            .map(Self::from_row)
            .collect()
    }

    pub fn to_row(&self) -> Map<String, Value> {
        let mut row = Map::new();
        row.insert("title".into(), Value::String(self.title.clone()));
        row.insert("url".into(), Value::String(self.url.clone()));
        row.insert("socialimage".into(), opt_value(&self.socialimage));
        row.insert("language".into(), opt_value(&self.language));
        row.insert("sourcecountry".into(), opt_value(&self.sourcecountry));
        row.insert("domain".into(), opt_value(&self.domain));
        row.insert("seendate".into(), opt_value(&self.seendate));
        row.insert(
            "isduplicate".into(),
            self.isduplicate.map(Value::from).unwrap_or(Value::Null),
        );
        row.insert("sourceurl".into(), opt_value(&self.sourceurl));
        row.insert("snippet".into(), opt_value(&self.snippet));
        row
    }

    /// Renders the three-line block the language model sees as grounding.
    pub fn passage(&self) -> String {
        format!(
            "Title: {}\nURL: {}\nSnippet: {}",
            self.title,
            self.url,
            self.snippet.as_deref().unwrap_or_default()
        )
    }
}

pub fn passages(articles: &[Article]) -> Vec<String> {
    articles.iter().map(Article::passage).collect()
}

/// Joins passages with a blank line, keeping retrieval order.
pub fn render_passages(articles: &[Article]) -> String {
    passages(articles).join("\n\n")
}

fn required_text(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

fn optional_text(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Bool(false) => None,
        Value::Number(n) if n.as_f64() == Some(0.0) => None,
        Value::Array(a) if a.is_empty() => None,
        Value::Object(o) if o.is_empty() => None,
        other => Some(other.to_string()),
    }
}

fn optional_flag(value: Option<&Value>) -> Option<i64> {
    match value? {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Value::Bool(b) => Some(i64::from(*b)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn opt_value(value: &Option<String>) -> Value {
    value.clone().map(Value::String).unwrap_or(Value::Null)
}

/// Structured search parameters derived from a free-text question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchPlan {
    pub query: String,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub languages: Option<Vec<String>>,
    pub max_records: u32,
}

/// Ordering requested from the news index.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SortOrder {
    #[default]
    DateDesc,
    DateAsc,
    ToneDesc,
    ToneAsc,
    Relevance,
    /// Passed to the index verbatim.
    Other(String),
}

impl SortOrder {
    pub fn as_str(&self) -> &str {
        match self {
            SortOrder::DateDesc => "DateDesc",
            SortOrder::DateAsc => "DateAsc",
            SortOrder::ToneDesc => "ToneDesc",
            SortOrder::ToneAsc => "ToneAsc",
            SortOrder::Relevance => "HybridRel",
            SortOrder::Other(s) => s,
        }
    }
}

impl FromStr for SortOrder {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(match s.trim().to_lowercase().as_str() {
            "date" | "datedesc" => SortOrder::DateDesc,
            "date_asc" | "dateasc" => SortOrder::DateAsc,
            "tone" | "tonedesc" => SortOrder::ToneDesc,
            "tone_asc" | "toneasc" => SortOrder::ToneAsc,
            "relevance" | "hybridrel" => SortOrder::Relevance,
            _ => SortOrder::Other(s.to_string()),
        })
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Arguments for a single news-index search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    pub query: String,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub max_records: u32,
    pub sort_by: SortOrder,
    pub languages: Option<Vec<String>>,
}

impl SearchRequest {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            start_date: None,
            end_date: None,
            max_records: DEFAULT_MAX_RECORDS,
            sort_by: SortOrder::default(),
            languages: None,
        }
    }

    pub fn with_dates(mut self, start_date: Option<String>, end_date: Option<String>) -> Self {
        self.start_date = start_date;
        self.end_date = end_date;
        self
    }

    pub fn with_max_records(mut self, max_records: u32) -> Self {
        self.max_records = max_records;
        self
    }

    pub fn with_sort(mut self, sort_by: SortOrder) -> Self {
        self.sort_by = sort_by;
        self
    }

    /// An empty list means no language filter.
    pub fn with_languages(mut self, languages: Option<Vec<String>>) -> Self {
        self.languages = languages.filter(|l| !l.is_empty());
        self
    }
}

impl From<&SearchPlan> for SearchRequest {
    fn from(plan: &SearchPlan) -> Self {
        SearchRequest::new(plan.query.clone())
            .with_dates(plan.start_date.clone(), plan.end_date.clone())
            .with_max_records(plan.max_records)
            .with_languages(plan.languages.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn row(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_from_row_defaults_title_and_url() {
        let article = Article::from_row(&Map::new());
        assert_eq!(article.title, "");
        assert_eq!(article.url, "");
        assert_eq!(article.snippet, None);
        assert_eq!(article.isduplicate, None);
    }

    #[test]
    fn test_from_row_coerces_fields() {
        let article = Article::from_row(&row(json!({
            "title": "Quake",
            "url": "https://example.com/a",
            "language": "English",
            "seendate": "20240101T120000Z",
            "isduplicate": "1",
            "domain": null,
            "sourcecountry": 0,
        })));
        assert_eq!(article.title, "Quake");
        assert_eq!(article.language.as_deref(), Some("English"));
        assert_eq!(article.seendate.as_deref(), Some("20240101T120000Z"));
        assert_eq!(article.isduplicate, Some(1));
        assert_eq!(article.domain, None);
        assert_eq!(article.sourcecountry, None);
    }

    #[test]
    fn test_rows_round_trip() {
        let original = row(json!({
            "title": "A",
            "url": "u1",
            "socialimage": "https://img.example.com/1.jpg",
            "language": "French",
            "sourcecountry": "France",
            "domain": "lemonde.fr",
            "seendate": "20240301T081500Z",
            "isduplicate": 0,
            "sourceurl": "https://lemonde.fr",
            "snippet": "s1",
        }));
        let article = Article::from_row(&original);
        assert_eq!(article.to_row(), original);

        let sparse = Article {
            title: "B".into(),
            url: "u2".into(),
            ..Default::default()
        };
        assert_eq!(Article::from_row(&sparse.to_row()), sparse);
    }

    #[test]
    fn test_from_values_skips_non_objects() {
        let articles = Article::from_values(&[json!({"title": "A"}), json!(3), json!("x")]);
        assert_eq!(articles.len(), 1);
        assert_eq!(articles[0].title, "A");
    }

    #[test]
    fn test_render_passages_keeps_order_and_blanks() {
        let articles = vec![
            Article {
                title: "A".into(),
                url: "u1".into(),
                snippet: Some("s1".into()),
                ..Default::default()
            },
            Article {
                title: "B".into(),
                url: "u2".into(),
                snippet: Some(String::new()),
                ..Default::default()
            },
        ];
        assert_eq!(
            render_passages(&articles),
            "Title: A\nURL: u1\nSnippet: s1\n\nTitle: B\nURL: u2\nSnippet: "
        );

        let missing = Article {
            title: "C".into(),
            ..Default::default()
        };
        assert_eq!(missing.passage(), "Title: C\nURL: \nSnippet: ");
    }

    #[test]
    fn test_sort_order_parsing() {
        assert_eq!("date".parse::<SortOrder>().unwrap(), SortOrder::DateDesc);
        assert_eq!("relevance".parse::<SortOrder>().unwrap().as_str(), "HybridRel");
        assert_eq!(
            "ToneAbsDesc".parse::<SortOrder>().unwrap(),
            SortOrder::Other("ToneAbsDesc".to_string())
        );
    }

    #[test]
    fn test_request_from_plan_drops_empty_languages() {
        let plan = SearchPlan {
            query: "ukraine grain".into(),
            start_date: Some("2024-01-01".into()),
            end_date: None,
            languages: Some(vec![]),
            max_records: 5,
        };
        let request = SearchRequest::from(&plan);
        assert_eq!(request.query, "ukraine grain");
        assert_eq!(request.max_records, 5);
        assert_eq!(request.languages, None);
        assert_eq!(request.sort_by, SortOrder::DateDesc);
    }
}
