use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

use wn_core::{Article, Error, NewsRetriever, Result, SearchRequest};

use crate::query::build_params;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
/// Upper bound on single-character repairs of a malformed JSON body.
const MAX_JSON_REPAIRS: usize = 100;

/// Client for the GDELT Doc 2.0 article-list API.
#[derive(Clone)]
pub struct GdeltClient {
    client: Arc<Client>,
    endpoint: String,
}

impl fmt::Debug for GdeltClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GdeltClient")
            .field("client", &"<reqwest::Client>")
            .field("endpoint", &self.endpoint)
            .finish()
    }
}

impl GdeltClient {
    pub fn new(endpoint: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(concat!("world-news/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            client: Arc::new(client),
            endpoint: endpoint.into(),
        })
    }
}

#[async_trait]
impl NewsRetriever for GdeltClient {
    async fn search_articles(&self, request: &SearchRequest) -> Result<Vec<Article>> {
        let params = build_params(request);
        debug!("GDELT search {} {:?}", self.endpoint, params);

        let response = self
            .client
            .get(self.endpoint.as_str())
            .query(&params)
            .send()
            .await?
            .error_for_status()?;
        let is_html = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|v| v.contains("text/html"));
        let body = response.text().await?;

        if is_html {
            return Err(rejected(body.trim()));
        }

        let articles = parse_articles(&body)?;
        debug!("GDELT returned {} articles", articles.len());
        Ok(articles)
    }
}

fn rejected(body: &str) -> Error {
    Error::Retrieval(format!("GDELT rejected the query: {}", body))
}

/// Parses an artlist response body. GDELT answers an empty body (or `{}`) when
/// nothing matched, and plain text when it rejects the query.
///
/// Titles occasionally carry invalid JSON escapes such as `\'`; the offending
/// character is blanked and parsing retried.
pub fn parse_articles(body: &str) -> Result<Vec<Article>> {
    let body = body.trim();
    if body.is_empty() {
        return Ok(Vec::new());
    }
    if !body.starts_with('{') {
        return Err(rejected(body));
    }

    let value = parse_lenient(body)?;
    match value.get("articles") {
        Some(Value::Array(rows)) => Ok(Article::from_values(rows)),
        Some(Value::Null) | None => Ok(Vec::new()),
        Some(other) => Err(Error::Retrieval(format!(
            "unexpected `articles` payload: {}",
            other
        ))),
    }
}

fn parse_lenient(body: &str) -> Result<Value> {
    let mut repaired: Option<String> = None;
    for _ in 0..=MAX_JSON_REPAIRS {
        let e = match serde_json::from_str::<Value>(repaired.as_deref().unwrap_or(body)) {
            Ok(value) => return Ok(value),
            Err(e) => e,
        };
        let text = repaired.get_or_insert_with(|| body.to_string());
        if e.is_eof() || !blank_offending_char(text, e.line(), e.column()) {
            return Err(Error::Retrieval(format!("malformed GDELT response: {}", e)));
        }
        warn!("Repaired malformed GDELT response at line {} column {}", e.line(), e.column());
    }
    Err(Error::Retrieval(format!(
        "malformed GDELT response: gave up after {} repairs",
        MAX_JSON_REPAIRS
    )))
}

/// Replaces the character serde_json stopped at with a space. For an invalid
/// escape the backslash is the one blanked. Returns `false` when no progress
/// is possible.
fn blank_offending_char(text: &mut String, line: usize, column: usize) -> bool {
    if line == 0 {
        return false;
    }
    let line_start: usize = text.split_inclusive('\n').take(line - 1).map(str::len).sum();
    let mut offset = (line_start + column).min(text.len());
    while !text.is_char_boundary(offset) {
        offset -= 1;
    }

    let mut tail = text[..offset].char_indices().rev();
    let Some((last_idx, last)) = tail.next() else {
        return false;
    };
    let (idx, ch) = match tail.next() {
        Some((prev_idx, '\\')) if last != '\\' => (prev_idx, '\\'),
        _ => (last_idx, last),
    };
    if ch == ' ' {
        return false;
    }
    text.replace_range(idx..idx + ch.len_utf8(), " ");
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_parse_empty_bodies() {
        assert!(parse_articles("").unwrap().is_empty());
        assert!(parse_articles("{}").unwrap().is_empty());
        assert!(parse_articles("{\"articles\": null}").unwrap().is_empty());
    }

    #[test]
    fn test_parse_text_error() {
        let err = parse_articles("Your search contained a keyword that was too short.").unwrap_err();
        assert!(matches!(err, Error::Retrieval(msg) if msg.contains("too short")));
    }

    #[test]
    fn test_parse_repairs_invalid_escapes() {
        let body = r#"{"articles": [{"url": "https://e.com/1", "title": "Rock \' roll"}, {"url": "https://e.com/2", "title": "It\'s \'fine\'"}]}"#;
        let articles = parse_articles(body).unwrap();
        assert_eq!(articles.len(), 2);
        assert_eq!(articles[0].url, "https://e.com/1");
        assert!(articles[0].title.starts_with("Rock"));
        assert!(articles[0].title.ends_with("' roll"));
        assert!(articles[1].title.contains("fine"));
    }

    #[test]
    fn test_parse_unrepairable_json_is_not_blamed_on_query() {
        let err = parse_articles(r#"{"articles": [{"url": "#).unwrap_err();
        assert!(matches!(err, Error::Retrieval(msg) if msg.starts_with("malformed GDELT response")));
    }

    #[tokio::test]
    async fn test_search_articles_preserves_order() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v2/doc/doc"))
            .and(query_param("query", "earthquake sourcelang:eng"))
            .and(query_param("mode", "artlist"))
            .and(query_param("format", "json"))
            .and(query_param("maxrecords", "2"))
            .and(query_param("sort", "DateDesc"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "articles": [
                    {
                        "url": "https://example.com/2",
                        "title": "Second shock",
                        "seendate": "20240102T000000Z",
                        "domain": "example.com",
                        "language": "English",
                        "sourcecountry": "Japan"
                    },
                    {
                        "url": "https://example.com/1",
                        "title": "First shock",
                        "seendate": "20240101T000000Z",
                        "socialimage": ""
                    }
                ]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = GdeltClient::new(format!("{}/api/v2/doc/doc", server.uri())).unwrap();
        let request = SearchRequest::new("earthquake")
            .with_max_records(2)
            .with_languages(Some(vec!["eng".to_string()]));
        let articles = client.search_articles(&request).await.unwrap();

        assert_eq!(articles.len(), 2);
        assert_eq!(articles[0].title, "Second shock");
        assert_eq!(articles[0].sourcecountry.as_deref(), Some("Japan"));
        assert_eq!(articles[1].url, "https://example.com/1");
        assert_eq!(articles[1].snippet, None);
    }

    #[tokio::test]
    async fn test_search_articles_html_body_is_a_rejection() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_raw("Invalid query: the phrase is too short", "text/html; charset=utf-8"),
            )
            .mount(&server)
            .await;

        let client = GdeltClient::new(server.uri()).unwrap();
        let err = client.search_articles(&SearchRequest::new("a")).await.unwrap_err();
        assert!(matches!(err, Error::Retrieval(msg) if msg.contains("rejected the query")));
    }

    #[tokio::test]
    async fn test_search_articles_propagates_http_errors() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let client = GdeltClient::new(server.uri()).unwrap();
        let result = client.search_articles(&SearchRequest::new("anything")).await;
        assert!(matches!(result, Err(Error::Http(_))));
    }
}
