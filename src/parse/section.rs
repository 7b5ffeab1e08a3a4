//! Answer-section location and category extraction.
//!
//! Answer pages put each day's groups under an `<h2>` reading roughly
//! "NYT Connections Puzzle Answers". A page may carry more than one such
//! section (today's plus a recent-history list), so everything here works in
//! terms of *candidates*: each located section independently yields at most
//! one set of four categories, and the freshness chooser picks among them.

use crate::models::{categories_well_formed, Category};
use crate::parse::date;
use crate::utils::{clean_title, clean_word, is_word, strip_tags};
use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, trace};

/// How many lines ahead of a title line the text strategy looks for words.
const TEXT_WINDOW: usize = 3;

static H2_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?is)<h2[^>]*>(.*?)</h2>").unwrap());
static ANSWER_HEADING_RE: Lazy<Regex> = Lazy::new(|| {
    // Allow "Answer" or "Answers" and arbitrary copy on either side;
    // matched against the heading's stripped text, so inline tags inside
    // the phrase don't break it.
    Regex::new(r"(?i)NYT\s+Connections\s+Puzzle\s+Answers?").unwrap()
});

/// A heading-delimited slice of the page, not yet parsed.
#[derive(Debug)]
pub struct RawSection {
    /// Stripped, lowercased heading text.
    pub label: String,
    /// Markup between this heading and the next (or end of document).
    pub block_html: String,
}

/// A parsed section: four well-formed categories plus the context needed by
/// the freshness chooser and date inference.
#[derive(Debug, Clone)]
pub struct Candidate {
    pub categories: Vec<Category>,
    /// Visible text of the whole section.
    pub section_text: String,
    /// Explicit long-form date found in the section's own text, if any.
    pub date: Option<NaiveDate>,
    /// Heading text, for log lines.
    pub label: String,
}

/// Slice a document into answer sections.
///
/// Each matching `<h2>` starts a section extending to the next matching
/// `<h2>` or the end of the document. Non-matching headings do not end a
/// section; history lists under a single heading stay together.
pub fn find_sections(html: &str) -> Vec<RawSection> {
    // Headings are matched one <h2> at a time and filtered by stripped
    // text; the answer phrase is never matched across tag boundaries.
    let marks: Vec<(usize, usize, String)> = H2_RE
        .captures_iter(html)
        .filter_map(|cap| {
            let whole = cap.get(0).unwrap();
            let label = strip_tags(&cap[1]);
            ANSWER_HEADING_RE
                .is_match(&label)
                .then(|| (whole.start(), whole.end(), label.to_lowercase()))
        })
        .collect();

    let mut sections = Vec::with_capacity(marks.len());
    for (i, (_, body_start, label)) in marks.iter().enumerate() {
        let end = match marks.get(i + 1) {
            Some((next_start, _, _)) => *next_start,
            None => html.len(),
        };
        sections.push(RawSection {
            label: label.clone(),
            block_html: html[*body_start..end].to_string(),
        });
    }
    sections
}

/// Parse one HTML section into categories, or `None` when neither strategy
/// yields four well-formed groups.
pub fn parse_section(block_html: &str) -> Option<Vec<Category>> {
    let fragment = Html::parse_fragment(block_html);
    let cats = extract_strict(&fragment)
        .or_else(|| extract_loose(block_html))
        .filter(|c| categories_well_formed(c));
    if cats.is_none() {
        trace!("Section yielded no well-formed categories");
    }
    cats
}

/// Strict extraction: the first four `.answer-text` blocks.
///
/// Each block's first paragraph is the title and its second a comma list of
/// four words; when the comma list falls short, subsequent paragraphs are
/// scanned for four single-word lines.
fn extract_strict(fragment: &Html) -> Option<Vec<Category>> {
    let block_selector = Selector::parse("span.answer-text, div.answer-text").unwrap();
    let blocks: Vec<ElementRef> = fragment.select(&block_selector).take(4).collect();
    if blocks.len() != 4 {
        return None;
    }
    let cats: Vec<Category> = blocks
        .iter()
        .filter_map(|b| parse_answer_block(*b))
        .collect();
    (cats.len() == 4).then_some(cats)
}

fn parse_answer_block(block: ElementRef) -> Option<Category> {
    let p_selector = Selector::parse("p").unwrap();
    let paragraphs: Vec<String> = block
        .select(&p_selector)
        .map(|p| p.text().collect::<Vec<_>>().join(" ").trim().to_string())
        .filter(|t| !t.is_empty())
        .collect();
    let first = paragraphs.first()?;
    let title = clean_title(first);

    // Prefer the second paragraph as a comma list.
    let mut words = paragraphs
        .get(1)
        .map(|p| comma_words(p))
        .unwrap_or_default();
    // Fallback: four single-word lines.
    if words.len() != 4 {
        let singles: Vec<String> = paragraphs
            .iter()
            .skip(1)
            .map(|p| clean_word(p))
            .filter(|w| is_word(w))
            .take(4)
            .collect();
        if singles.len() == 4 {
            words = singles;
        }
    }

    (!title.is_empty() && words.len() == 4).then_some(Category { title, words })
}

static LOOSE_PAIR_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?is)<p[^>]*>\s*<strong[^>]*>(.*?)</strong>\s*</p>\s*<p[^>]*>(.*?)</p>").unwrap()
});

/// Loose extraction: `<p><strong>Title:</strong></p><p>A, B, C, D</p>` pairs
/// anywhere in the section, first four accepted.
fn extract_loose(block_html: &str) -> Option<Vec<Category>> {
    let mut cats = Vec::new();
    for cap in LOOSE_PAIR_RE.captures_iter(block_html) {
        if cats.len() == 4 {
            break;
        }
        let title = clean_title(&strip_tags(&cap[1]));
        let words = comma_words(&strip_tags(&cap[2]));
        if !title.is_empty() && words.len() >= 4 {
            cats.push(Category {
                title,
                words: words.into_iter().take(4).collect(),
            });
        }
    }
    (cats.len() == 4).then_some(cats)
}

/// Split a comma list into cleaned, valid words.
fn comma_words(line: &str) -> Vec<String> {
    line.split(',')
        .map(clean_word)
        .filter(|w| is_word(w))
        .collect()
}

/// Parse a full HTML document into candidates, one per answer section.
pub fn candidates_from_html(html: &str) -> Vec<Candidate> {
    let sections = find_sections(html);
    debug!(count = sections.len(), "Located answer sections");
    sections
        .into_iter()
        .filter_map(|s| {
            let categories = parse_section(&s.block_html)?;
            let section_text = strip_tags(&s.block_html);
            let date = date::date_in_text(&section_text);
            Some(Candidate {
                categories,
                section_text,
                date,
                label: s.label,
            })
        })
        .collect()
}

/// Parse a pre-stripped text document into at most one candidate.
///
/// For sources behind a text-rendering proxy there is no markup to slice,
/// so the whole document is scanned line-by-line: a line ending in a colon
/// is a candidate title, and the following few lines are checked for a
/// comma-separated list of at least four valid words.
pub fn candidates_from_text(text: &str) -> Vec<Candidate> {
    let lines: Vec<&str> = text.lines().map(str::trim).collect();
    let mut cats = Vec::new();
    let mut i = 0;
    while i < lines.len() && cats.len() < 4 {
        let line = lines[i];
        if line.ends_with(':') && line.len() > 1 {
            let title = clean_title(line);
            let mut matched = None;
            for j in (i + 1)..lines.len().min(i + 1 + TEXT_WINDOW) {
                let words = comma_words(lines[j]);
                if words.len() >= 4 {
                    matched = Some((j, words));
                    break;
                }
            }
            if let Some((j, words)) = matched {
                if !title.is_empty() {
                    cats.push(Category {
                        title,
                        words: words.into_iter().take(4).collect(),
                    });
                    i = j + 1;
                    continue;
                }
            }
        }
        i += 1;
    }

    if !categories_well_formed(&cats) {
        return Vec::new();
    }
    let section_text = text.to_string();
    let date = date::date_in_text(&section_text);
    vec![Candidate {
        categories: cats,
        section_text,
        date,
        label: "text".to_string(),
    }]
}
