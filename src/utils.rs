//! Text utilities for HTML cleanup and answer-word normalization.
//!
//! This module provides the small helper functions used throughout the
//! application:
//! - HTML entity decoding and tag stripping for raw page markup
//! - Word cleaning (normalize to uppercase puzzle tokens)
//! - Title cleaning (strip trailing colons and typographic quotes)
//! - File system validation for the archive directory

use once_cell::sync::Lazy;
use regex::Regex;
use std::error::Error;
use std::fs as stdfs;
use tokio::fs;
use tracing::{info, instrument};

static TAG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]+>").unwrap());
static WS_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());
static WORD_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Za-z][A-Za-z'’-]*$").unwrap());

/// Decode the handful of HTML entities that show up in puzzle pages.
///
/// Answer pages are WordPress output, so typographic quotes and non-breaking
/// spaces arrive entity-encoded. Only the entities actually observed in the
/// wild are handled; anything exotic passes through unchanged.
pub fn decode_entities(text: &str) -> String {
    text.replace("&nbsp;", " ")
        .replace("&amp;", "&")
        .replace("&ldquo;", "\"")
        .replace("&rdquo;", "\"")
        .replace("&quot;", "\"")
        .replace("&rsquo;", "'")
        .replace("&apos;", "'")
}

/// Strip HTML tags from a fragment, decode entities, and collapse whitespace.
///
/// # Arguments
///
/// * `html` - Raw markup fragment
///
/// # Returns
///
/// The visible text content, single-spaced and trimmed.
pub fn strip_tags(html: &str) -> String {
    let text = TAG_RE.replace_all(html, " ");
    let text = decode_entities(&text);
    WS_RE.replace_all(&text, " ").trim().to_string()
}

/// Remove typographic and straight quote characters.
fn strip_quotes(s: &str) -> String {
    s.replace(['“', '”', '"', '’'], "")
}

/// Clean a candidate answer word into its canonical uppercase form.
///
/// Strips quote characters, removes any character that is not a letter,
/// apostrophe, or hyphen, uppercases, and trims. The result is idempotent:
/// cleaning a cleaned word returns it unchanged.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(clean_word(" “cat”, "), "CAT");
/// assert_eq!(clean_word("o'clock"), "O'CLOCK");
/// ```
pub fn clean_word(raw: &str) -> String {
    strip_quotes(raw)
        .chars()
        .filter(|c| c.is_ascii_alphabetic() || *c == '\'' || *c == '-')
        .collect::<String>()
        .to_uppercase()
        .trim()
        .to_string()
}

/// Clean a category title: strip a trailing colon, strip quote characters,
/// collapse internal whitespace, and trim.
pub fn clean_title(raw: &str) -> String {
    let s = strip_quotes(raw);
    let s = WS_RE.replace_all(&s, " ");
    let s = s.trim();
    s.strip_suffix(':').unwrap_or(s).trim().to_string()
}

/// Check whether a cleaned token looks like a valid puzzle word.
///
/// Valid words start with a letter and contain only letters, apostrophes,
/// and hyphens. Empty strings are rejected.
pub fn is_word(s: &str) -> bool {
    WORD_RE.is_match(s)
}

/// Ensure a directory exists and is writable.
///
/// Creates the directory if it doesn't exist, then performs a write test by
/// creating and immediately deleting a probe file.
///
/// # Errors
///
/// Returns an error if the directory cannot be created or is not writable
/// (permission denied, read-only filesystem, etc.).
#[instrument(level = "info", skip_all, fields(path = %path))]
pub async fn ensure_writable_dir(path: &str) -> Result<(), Box<dyn Error>> {
    if let Err(e) = fs::create_dir_all(path).await {
        return Err(Box::new(e));
    }
    // Try a small sync write using std fs (simpler error surface)
    let probe_path = format!("{}/..__probe_write__", path.trim_end_matches('/'));
    match stdfs::File::create(&probe_path) {
        Ok(_) => {
            let _ = stdfs::remove_file(&probe_path);
            info!("Archive directory is writable");
            Ok(())
        }
        Err(e) => Err(Box::new(e)),
    }
}
