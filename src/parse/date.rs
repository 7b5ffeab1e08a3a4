//! Calendar-date inference for a chosen puzzle candidate.
//!
//! Explicit dates in content are authoritative; inference only fills in when
//! the page carries no usable date signal, and it never advances the date for
//! stale content (that would corrupt the archive with a wrong date for an
//! already-seen puzzle).
//!
//! Priority order, first success wins:
//! 1. Long-form date ("September 20, 2025") in the section's own text
//! 2. Long-form date anywhere in the full document
//! 3. Structured metadata (JSON-LD or `article:*_time` meta tags)
//! 4. Fresh content with a known previous date: previous date + 1 day
//! 5. Fresh content, no previous date: today (UTC)
//! 6. Stale content: previous date unchanged

use chrono::{DateTime, Days, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{Html, Selector};
use serde_json::Value;
use tracing::debug;

static LONG_DATE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"\b(January|February|March|April|May|June|July|August|September|October|November|December)\s+(\d{1,2}),\s*(\d{4})\b",
    )
    .unwrap()
});

fn month_number(name: &str) -> Option<u32> {
    let n = match name.to_lowercase().as_str() {
        "january" => 1,
        "february" => 2,
        "march" => 3,
        "april" => 4,
        "may" => 5,
        "june" => 6,
        "july" => 7,
        "august" => 8,
        "september" => 9,
        "october" => 10,
        "november" => 11,
        "december" => 12,
        _ => return None,
    };
    Some(n)
}

/// Find the first long-form calendar date ("September 20, 2025") in a text.
pub fn date_in_text(text: &str) -> Option<NaiveDate> {
    let cap = LONG_DATE_RE.captures(text)?;
    let month = month_number(&cap[1])?;
    let day: u32 = cap[2].parse().ok()?;
    let year: i32 = cap[3].parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}

/// Pull a publish/modify date out of the document's structured metadata.
///
/// Checks JSON-LD (`datePublished`, then `dateModified`, descending into
/// `@graph` arrays) and falls back to Open Graph `article:*_time` meta tags.
pub fn metadata_date(html: &str) -> Option<NaiveDate> {
    let document = Html::parse_document(html);

    let ld_selector = Selector::parse(r#"script[type="application/ld+json"]"#).unwrap();
    for script in document.select(&ld_selector) {
        let raw = script.text().collect::<String>();
        let Ok(value) = serde_json::from_str::<Value>(&raw) else {
            continue;
        };
        if let Some(date) = json_ld_date(&value) {
            debug!(%date, "Date from JSON-LD");
            return Some(date);
        }
    }

    let meta_selector = Selector::parse(
        r#"meta[property="article:published_time"], meta[property="article:modified_time"]"#,
    )
    .unwrap();
    for meta in document.select(&meta_selector) {
        if let Some(date) = meta.value().attr("content").and_then(parse_timestamp) {
            debug!(%date, "Date from meta tag");
            return Some(date);
        }
    }

    None
}

fn json_ld_date(value: &Value) -> Option<NaiveDate> {
    match value {
        Value::Object(map) => {
            for key in ["datePublished", "dateModified"] {
                if let Some(date) = map.get(key).and_then(Value::as_str).and_then(parse_timestamp)
                {
                    return Some(date);
                }
            }
            map.get("@graph").and_then(json_ld_date)
        }
        Value::Array(items) => items.iter().find_map(json_ld_date),
        _ => None,
    }
}

/// Parse an ISO timestamp or bare date down to its calendar date.
fn parse_timestamp(s: &str) -> Option<NaiveDate> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.date_naive());
    }
    let prefix = s.get(..10).unwrap_or(s);
    NaiveDate::parse_from_str(prefix, "%Y-%m-%d").ok()
}

/// Date signals available when stamping a chosen candidate.
#[derive(Debug, Default)]
pub struct DateSignals {
    /// Long-form date in the candidate's own section text.
    pub section: Option<NaiveDate>,
    /// Long-form date anywhere in the source document.
    pub document: Option<NaiveDate>,
    /// Structured-metadata timestamp date.
    pub metadata: Option<NaiveDate>,
}

impl DateSignals {
    /// Gather all three signals from a candidate's section text and the full
    /// document it came from.
    pub fn gather(section_text: &str, document_html: &str) -> Self {
        Self {
            section: date_in_text(section_text),
            document: date_in_text(&crate::utils::strip_tags(document_html)),
            metadata: metadata_date(document_html),
        }
    }
}

/// Resolve the date to archive a candidate under.
///
/// `is_new` is the freshness verdict (word set differs from every known
/// snapshot); `today` is injected so tests are not wall-clock dependent.
pub fn infer_date(
    signals: &DateSignals,
    is_new: bool,
    prev_date: Option<NaiveDate>,
    today: NaiveDate,
) -> NaiveDate {
    if let Some(date) = signals.section.or(signals.document).or(signals.metadata) {
        return date;
    }
    if is_new {
        match prev_date {
            Some(prev) => prev.checked_add_days(Days::new(1)).unwrap_or(prev),
            None => today,
        }
    } else {
        prev_date.unwrap_or(today)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_date_in_text() {
        assert_eq!(
            date_in_text("Answers for September 16, 2025 are below"),
            Some(d(2025, 9, 16))
        );
        assert_eq!(date_in_text("updated May 3, 2024."), Some(d(2024, 5, 3)));
        assert_eq!(date_in_text("no date here"), None);
        assert_eq!(date_in_text("2025-09-16 is not long-form"), None);
    }

    #[test]
    fn test_date_in_text_rejects_impossible_day() {
        assert_eq!(date_in_text("February 30, 2025"), None);
    }

    #[test]
    fn test_metadata_date_from_json_ld() {
        let html = r#"<html><head>
            <script type="application/ld+json">
            {"@context":"https://schema.org","@graph":[
              {"@type":"WebPage","dateModified":"2025-09-21T08:00:00+00:00",
               "datePublished":"2025-09-20T06:30:00+00:00"}]}
            </script></head><body></body></html>"#;
        assert_eq!(metadata_date(html), Some(d(2025, 9, 20)));
    }

    #[test]
    fn test_metadata_date_from_meta_tag() {
        let html = r#"<html><head>
            <meta property="article:modified_time" content="2025-09-21T10:15:00Z">
            </head><body></body></html>"#;
        assert_eq!(metadata_date(html), Some(d(2025, 9, 21)));
    }

    #[test]
    fn test_metadata_date_absent() {
        assert_eq!(metadata_date("<html><body>plain</body></html>"), None);
    }

    #[test]
    fn test_section_date_beats_everything() {
        let signals = DateSignals {
            section: Some(d(2025, 9, 20)),
            document: Some(d(2025, 9, 18)),
            metadata: Some(d(2025, 9, 17)),
        };
        assert_eq!(
            infer_date(&signals, true, Some(d(2025, 9, 1)), d(2025, 9, 25)),
            d(2025, 9, 20)
        );
    }

    #[test]
    fn test_document_date_beats_metadata() {
        let signals = DateSignals {
            section: None,
            document: Some(d(2025, 9, 18)),
            metadata: Some(d(2025, 9, 17)),
        };
        assert_eq!(infer_date(&signals, true, None, d(2025, 9, 25)), d(2025, 9, 18));
    }

    #[test]
    fn test_fresh_without_signal_advances_previous_date() {
        let signals = DateSignals::default();
        assert_eq!(
            infer_date(&signals, true, Some(d(2025, 9, 19)), d(2025, 9, 25)),
            d(2025, 9, 20)
        );
    }

    #[test]
    fn test_fresh_without_signal_or_previous_uses_today() {
        let signals = DateSignals::default();
        assert_eq!(infer_date(&signals, true, None, d(2025, 9, 25)), d(2025, 9, 25));
    }

    #[test]
    fn test_stale_never_advances() {
        let signals = DateSignals::default();
        assert_eq!(
            infer_date(&signals, false, Some(d(2025, 9, 19)), d(2025, 9, 25)),
            d(2025, 9, 19)
        );
    }
}
