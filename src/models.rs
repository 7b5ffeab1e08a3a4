//! Data models for puzzles and archive snapshots.
//!
//! This module defines the core data structures used throughout the
//! application:
//! - [`Category`]: one answer group (title plus four words)
//! - [`Puzzle`]: a dated set of four categories, as archived to JSON
//! - [`WordSet`]: the unordered 16-word set used for staleness comparison
//! - [`PrevSnapshot`]: what a run knows about the most recently archived puzzle

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// The unordered set of all words in a puzzle.
///
/// Only used for equality comparison between a freshly parsed candidate and
/// previously archived puzzles; insertion order is irrelevant.
pub type WordSet = BTreeSet<String>;

/// One of the four answer groups in a puzzle.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Category {
    /// Human-readable group label, punctuation-stripped.
    pub title: String,
    /// Exactly four uppercase word tokens.
    pub words: Vec<String>,
}

/// A complete daily puzzle as persisted to `<date>.json` and `latest.json`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Puzzle {
    /// ISO-8601 calendar date, `YYYY-MM-DD`, UTC.
    pub date: String,
    /// Exactly four categories.
    pub categories: Vec<Category>,
}

/// Build the word set for a slice of categories.
pub fn word_set(categories: &[Category]) -> WordSet {
    categories
        .iter()
        .flat_map(|c| c.words.iter().cloned())
        .collect()
}

impl Puzzle {
    /// The unordered set of all words in this puzzle.
    pub fn word_set(&self) -> WordSet {
        word_set(&self.categories)
    }

    /// Check the structural invariants: four categories, four non-empty
    /// words each, and sixteen distinct words overall.
    ///
    /// A puzzle that repeats a word across (or within) categories is
    /// malformed source content and must be rejected by the parser.
    pub fn is_well_formed(&self) -> bool {
        categories_well_formed(&self.categories)
    }
}

/// Invariant check shared by [`Puzzle::is_well_formed`] and the section
/// parser, which validates categories before a date is attached.
pub fn categories_well_formed(categories: &[Category]) -> bool {
    categories.len() == 4
        && categories
            .iter()
            .all(|c| c.words.len() == 4 && c.words.iter().all(|w| !w.is_empty()))
        && word_set(categories).len() == 16
}

/// What a run knows about the most recently archived puzzle.
///
/// Loaded once per run from `latest.json`; a missing or unreadable file
/// yields the empty snapshot. Never mutated, only superseded by the next
/// successful run's write.
#[derive(Debug, Default)]
pub struct PrevSnapshot {
    /// Date of the last archived puzzle, if any.
    pub date: Option<NaiveDate>,
    /// Word set of the last archived puzzle, if any.
    pub words: Option<WordSet>,
}

impl PrevSnapshot {
    /// The known word sets to test candidates against.
    pub fn known_sets(&self) -> Vec<WordSet> {
        self.words.iter().cloned().collect()
    }
}
