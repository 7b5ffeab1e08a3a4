//! Parsers for turning fetched page bodies into puzzle candidates.
//!
//! Parsing is split into two concerns:
//!
//! - [`section`]: locate answer sections in a page and extract the four
//!   (title, four-words) category groups from each
//! - [`date`]: pin an ISO calendar date onto a chosen candidate
//!
//! # Extraction strategies
//!
//! | Strategy | Input | Method |
//! |----------|-------|--------|
//! | strict | HTML | `.answer-text` blocks, title + comma-list paragraphs |
//! | loose | HTML | repeated `<strong>` label / paragraph pairs |
//! | text | pre-stripped text | colon-terminated line + nearby comma list |
//!
//! The strict and loose strategies both run on every HTML section (loose only
//! when strict comes up short); the text strategy is selected per source via
//! its capability flag.

pub mod date;
pub mod section;
