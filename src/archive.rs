//! JSON archive reads and writes.
//!
//! The archive directory holds one file per puzzle date plus two index
//! files:
//!
//! ```text
//! puzzles/
//! ├── 2025-09-19.json
//! ├── 2025-09-20.json
//! ├── latest.json        # copy of the newest puzzle
//! └── manifest.json      # ["2025-09-20", "2025-09-19", ...] descending
//! ```
//!
//! `latest.json` is read once at the start of a run to support staleness
//! comparison and date inference; all three files are written only after a
//! fresh puzzle is chosen. Last write wins; concurrent runs are out of scope.

use crate::models::{PrevSnapshot, Puzzle};
use chrono::NaiveDate;
use std::error::Error;
use std::path::Path;
use tokio::fs;
use tracing::{debug, info, instrument, warn};

/// Load the previous snapshot from `latest.json`.
///
/// A missing file is the normal first-run case and yields the empty
/// snapshot; a malformed file is logged and treated the same way rather
/// than aborting the run.
#[instrument(level = "info", skip_all, fields(archive_dir = %archive_dir))]
pub async fn load_prev(archive_dir: &str) -> PrevSnapshot {
    let path = Path::new(archive_dir).join("latest.json");
    let raw = match fs::read_to_string(&path).await {
        Ok(raw) => raw,
        Err(e) => {
            debug!(path = %path.display(), error = %e, "No previous snapshot");
            return PrevSnapshot::default();
        }
    };
    match serde_json::from_str::<Puzzle>(&raw) {
        Ok(puzzle) => {
            let date = NaiveDate::parse_from_str(&puzzle.date, "%Y-%m-%d").ok();
            let words = puzzle.word_set();
            info!(date = %puzzle.date, words = words.len(), "Loaded previous snapshot");
            PrevSnapshot {
                date,
                words: Some(words),
            }
        }
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Malformed latest.json; ignoring");
            PrevSnapshot::default()
        }
    }
}

/// Write a fresh puzzle: `<date>.json`, `latest.json`, and the manifest.
///
/// Creates the archive directory if needed. The manifest is updated by
/// prepending the new date (if not already present), deduplicating, and
/// re-sorting descending.
#[instrument(level = "info", skip_all, fields(archive_dir = %archive_dir, date = %puzzle.date))]
pub async fn write_puzzle(archive_dir: &str, puzzle: &Puzzle) -> Result<(), Box<dyn Error>> {
    fs::create_dir_all(archive_dir).await?;
    let json = serde_json::to_string_pretty(puzzle)?;

    let dated_path = Path::new(archive_dir).join(format!("{}.json", puzzle.date));
    fs::write(&dated_path, &json).await?;
    fs::write(Path::new(archive_dir).join("latest.json"), &json).await?;
    info!(path = %dated_path.display(), "Wrote puzzle archive files");

    update_manifest(archive_dir, &puzzle.date).await?;
    Ok(())
}

async fn update_manifest(archive_dir: &str, date: &str) -> Result<(), Box<dyn Error>> {
    let path = Path::new(archive_dir).join("manifest.json");
    let mut manifest: Vec<String> = match fs::read_to_string(&path).await {
        Ok(raw) => serde_json::from_str(&raw).unwrap_or_else(|e| {
            warn!(path = %path.display(), error = %e, "Malformed manifest; rebuilding");
            Vec::new()
        }),
        Err(_) => Vec::new(),
    };

    manifest.retain(|d| d != date);
    manifest.insert(0, date.to_string());
    manifest.sort_by(|a, b| b.cmp(a));

    fs::write(&path, serde_json::to_string_pretty(&manifest)?).await?;
    info!(entries = manifest.len(), "Updated manifest");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Category;

    fn sample_puzzle(date: &str) -> Puzzle {
        Puzzle {
            date: date.to_string(),
            categories: vec![
                Category {
                    title: "Animals".into(),
                    words: vec!["CAT".into(), "DOG".into(), "BIRD".into(), "FISH".into()],
                },
                Category {
                    title: "Colors".into(),
                    words: vec!["RED".into(), "BLUE".into(), "GREEN".into(), "GOLD".into()],
                },
                Category {
                    title: "Planets".into(),
                    words: vec!["MARS".into(), "VENUS".into(), "SATURN".into(), "PLUTO".into()],
                },
                Category {
                    title: "Tools".into(),
                    words: vec!["SAW".into(), "DRILL".into(), "HAMMER".into(), "LEVEL".into()],
                },
            ],
        }
    }

    fn temp_archive(name: &str) -> String {
        let dir = std::env::temp_dir().join(format!(
            "connections_archive_test_{}_{}",
            name,
            std::process::id()
        ));
        let _ = std::fs::remove_dir_all(&dir);
        dir.to_string_lossy().into_owned()
    }

    #[tokio::test]
    async fn test_load_prev_missing_dir_is_empty() {
        let prev = load_prev("/nonexistent/archive/dir").await;
        assert!(prev.date.is_none());
        assert!(prev.words.is_none());
    }

    #[tokio::test]
    async fn test_write_then_load_round_trip() {
        let dir = temp_archive("round_trip");
        let puzzle = sample_puzzle("2025-09-20");
        write_puzzle(&dir, &puzzle).await.unwrap();

        let prev = load_prev(&dir).await;
        assert_eq!(prev.date, NaiveDate::from_ymd_opt(2025, 9, 20));
        assert_eq!(prev.words.as_ref().unwrap().len(), 16);
        assert!(prev.words.unwrap().contains("PLUTO"));

        let dated = std::fs::read_to_string(Path::new(&dir).join("2025-09-20.json")).unwrap();
        let latest = std::fs::read_to_string(Path::new(&dir).join("latest.json")).unwrap();
        assert_eq!(dated, latest);

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[tokio::test]
    async fn test_manifest_stays_descending_and_unique() {
        let dir = temp_archive("manifest");
        write_puzzle(&dir, &sample_puzzle("2025-09-19")).await.unwrap();
        write_puzzle(&dir, &sample_puzzle("2025-09-20")).await.unwrap();
        // Re-writing an existing date must not duplicate its entry.
        write_puzzle(&dir, &sample_puzzle("2025-09-19")).await.unwrap();

        let raw = std::fs::read_to_string(Path::new(&dir).join("manifest.json")).unwrap();
        let manifest: Vec<String> = serde_json::from_str(&raw).unwrap();
        assert_eq!(manifest, vec!["2025-09-20", "2025-09-19"]);

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[tokio::test]
    async fn test_malformed_latest_is_ignored() {
        let dir = temp_archive("malformed");
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(Path::new(&dir).join("latest.json"), "{ not json").unwrap();

        let prev = load_prev(&dir).await;
        assert!(prev.date.is_none());
        assert!(prev.words.is_none());

        let _ = std::fs::remove_dir_all(&dir);
    }
}
