//! Choosing which parsed section, if any, is genuinely new content.
//!
//! A page may show more than one dated answer section (today's plus a recent
//! history list), so candidates are first checked against every known word
//! set; re-saving an already-archived puzzle under a new date is the failure
//! mode this module exists to prevent.

use crate::models::{word_set, WordSet};
use crate::parse::section::Candidate;
use tracing::debug;

/// Select at most one fresh candidate.
///
/// 1. Discard any candidate whose word set exactly matches a known
///    snapshot's set (order-insensitive, exact membership).
/// 2. Among the survivors, prefer the one carrying the most recent explicit
///    in-section date; when none carry a date, keep document order.
/// 3. No survivors means the whole fetch was stale.
pub fn choose_fresh(candidates: Vec<Candidate>, known: &[WordSet]) -> Option<Candidate> {
    let survivors: Vec<Candidate> = candidates
        .into_iter()
        .filter(|c| {
            let words = word_set(&c.categories);
            let duplicate = known.iter().any(|k| *k == words);
            if duplicate {
                debug!(label = %c.label, "Discarding candidate matching a known snapshot");
            }
            !duplicate
        })
        .collect();

    let newest_date = survivors.iter().filter_map(|c| c.date).max();
    match newest_date {
        Some(date) => survivors.into_iter().find(|c| c.date == Some(date)),
        None => survivors.into_iter().next(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Category;
    use chrono::NaiveDate;

    fn cats(words: [[&str; 4]; 4]) -> Vec<Category> {
        words
            .iter()
            .enumerate()
            .map(|(i, group)| Category {
                title: format!("Group {i}"),
                words: group.iter().map(|w| w.to_string()).collect(),
            })
            .collect()
    }

    fn todays() -> Vec<Category> {
        cats([
            ["CAT", "DOG", "BIRD", "FISH"],
            ["RED", "BLUE", "GREEN", "GOLD"],
            ["MARS", "VENUS", "SATURN", "PLUTO"],
            ["SAW", "DRILL", "HAMMER", "LEVEL"],
        ])
    }

    fn yesterdays() -> Vec<Category> {
        cats([
            ["APPLE", "PEAR", "PLUM", "FIG"],
            ["OAK", "ELM", "ASH", "PINE"],
            ["NILE", "AMAZON", "VOLGA", "RHINE"],
            ["JAZZ", "FOLK", "SOUL", "PUNK"],
        ])
    }

    fn candidate(categories: Vec<Category>, date: Option<NaiveDate>, label: &str) -> Candidate {
        Candidate {
            categories,
            section_text: String::new(),
            date,
            label: label.to_string(),
        }
    }

    #[test]
    fn test_duplicate_discarded_in_any_permutation() {
        let mut shuffled = todays();
        shuffled.rotate_left(2);
        for c in &mut shuffled {
            c.words.reverse();
        }
        let known = vec![word_set(&todays())];
        let chosen = choose_fresh(vec![candidate(shuffled, None, "today")], &known);
        assert!(chosen.is_none());
    }

    #[test]
    fn test_dated_candidate_preferred_over_undated() {
        let date = NaiveDate::from_ymd_opt(2025, 9, 20);
        let chosen = choose_fresh(
            vec![
                candidate(yesterdays(), None, "undated"),
                candidate(todays(), date, "dated"),
            ],
            &[],
        )
        .unwrap();
        assert_eq!(chosen.label, "dated");
    }

    #[test]
    fn test_most_recent_date_wins() {
        let older = NaiveDate::from_ymd_opt(2025, 9, 19);
        let newer = NaiveDate::from_ymd_opt(2025, 9, 20);
        let chosen = choose_fresh(
            vec![
                candidate(yesterdays(), older, "older"),
                candidate(todays(), newer, "newer"),
            ],
            &[],
        )
        .unwrap();
        assert_eq!(chosen.label, "newer");
    }

    #[test]
    fn test_document_order_when_no_dates() {
        let chosen = choose_fresh(
            vec![
                candidate(todays(), None, "first"),
                candidate(yesterdays(), None, "second"),
            ],
            &[],
        )
        .unwrap();
        assert_eq!(chosen.label, "first");
    }

    #[test]
    fn test_duplicate_discarded_before_date_preference() {
        // The dated section duplicates the archive; the undated one is new.
        let date = NaiveDate::from_ymd_opt(2025, 9, 20);
        let known = vec![word_set(&yesterdays())];
        let chosen = choose_fresh(
            vec![
                candidate(yesterdays(), date, "history"),
                candidate(todays(), None, "today"),
            ],
            &known,
        )
        .unwrap();
        assert_eq!(chosen.label, "today");
    }

    #[test]
    fn test_all_duplicates_is_stale() {
        let known = vec![word_set(&todays()), word_set(&yesterdays())];
        let chosen = choose_fresh(
            vec![
                candidate(todays(), None, "a"),
                candidate(yesterdays(), None, "b"),
            ],
            &known,
        );
        assert!(chosen.is_none());
    }

    #[test]
    fn test_no_candidates_is_stale() {
        assert!(choose_fresh(Vec::new(), &[]).is_none());
    }
}
