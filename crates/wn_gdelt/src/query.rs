//! Translation of a [`SearchRequest`] into GDELT Doc API query parameters.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use wn_core::SearchRequest;

/// Hard ceiling the Doc API applies to `maxrecords`.
pub const MAX_RECORDS_LIMIT: u32 = 250;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Bound {
    Start,
    End,
}

pub fn build_params(request: &SearchRequest) -> Vec<(&'static str, String)> {
    let mut params = vec![
        ("query", build_query(&request.query, request.languages.as_deref())),
        ("mode", "artlist".to_string()),
        ("format", "json".to_string()),
        ("maxrecords", request.max_records.clamp(1, MAX_RECORDS_LIMIT).to_string()),
        ("sort", request.sort_by.as_str().to_string()),
    ];
    if let Some(start) = request.start_date.as_deref() {
        params.push(("startdatetime", to_gdelt_datetime(start, Bound::Start)));
    }
    if let Some(end) = request.end_date.as_deref() {
        params.push(("enddatetime", to_gdelt_datetime(end, Bound::End)));
    }
    params
}

/// Appends `sourcelang:` terms; several languages are OR-ed together.
pub fn build_query(keywords: &str, languages: Option<&[String]>) -> String {
    let terms: Vec<String> = languages
        .unwrap_or_default()
        .iter()
        .map(|l| l.trim())
        .filter(|l| !l.is_empty())
        .map(|l| format!("sourcelang:{}", l))
        .collect();

    let keywords = keywords.trim();
    match terms.len() {
        0 => keywords.to_string(),
        1 => format!("{} {}", keywords, terms[0]),
        _ => format!("{} ({})", keywords, terms.join(" OR ")),
    }
}

fn to_gdelt_datetime(value: &str, bound: Bound) -> String {
    let value = value.trim();
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        let time = match bound {
            Bound::Start => "000000",
            Bound::End => "235959",
        };
        return format!("{}{}", date.format("%Y%m%d"), time);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return dt.with_timezone(&Utc).format("%Y%m%d%H%M%S").to_string();
    }
    for fmt in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(value, fmt) {
            return dt.format("%Y%m%d%H%M%S").to_string();
        }
    }
    value.chars().filter(char::is_ascii_alphanumeric).collect()
}
