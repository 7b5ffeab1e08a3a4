//! Fetch orchestration: sources, passes, and the freshness decision.
//!
//! The orchestrator iterates the configured sources in priority order, up to
//! `max_passes` times with a fixed delay between passes. A fetch or parse
//! failure on one source is logged and skipped; only total exhaustion across
//! every pass is terminal, and even that is the non-error "stale" outcome.
//!
//! # Architecture
//!
//! The HTTP layer sits behind the [`FetchPage`] trait so tests can inject
//! scripted page bodies and a zero-delay retry policy:
//! - [`FetchPage`]: async trait for fetching one source's body
//! - [`HttpFetcher`]: the real implementation over `reqwest`
//! - [`Orchestrator`]: the pass loop, generic over the fetcher

use crate::config::{Config, Source, SourceStrategy};
use crate::freshness::choose_fresh;
use crate::models::{word_set, PrevSnapshot, Puzzle};
use crate::parse::date::{infer_date, DateSignals};
use crate::parse::section::{candidates_from_html, candidates_from_text, Candidate};
use chrono::Utc;
use std::error::Error;
use tokio::time::sleep;
use tracing::{debug, info, instrument, warn};

/// Async seam over the HTTP layer.
pub trait FetchPage {
    /// Fetch one source's response body.
    async fn fetch(&self, source: &Source) -> Result<String, Box<dyn Error>>;
}

/// Real fetcher over a shared [`reqwest::Client`].
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new() -> Result<Self, Box<dyn Error>> {
        let client = reqwest::Client::builder().build()?;
        Ok(Self { client })
    }

    /// Append a `ts=<unix millis>` cache-buster so intermediaries cannot
    /// serve yesterday's page.
    fn bust_cache(url: &str) -> Result<url::Url, Box<dyn Error>> {
        let mut parsed = url::Url::parse(url)?;
        parsed
            .query_pairs_mut()
            .append_pair("ts", &Utc::now().timestamp_millis().to_string());
        Ok(parsed)
    }
}

impl FetchPage for HttpFetcher {
    #[instrument(level = "info", skip_all, fields(source = %source.name))]
    async fn fetch(&self, source: &Source) -> Result<String, Box<dyn Error>> {
        let url = Self::bust_cache(&source.url)?;
        let response = self
            .client
            .get(url)
            .header("Cache-Control", "no-cache, no-store, max-age=0")
            .header("Pragma", "no-cache")
            .header("Accept", "text/html,application/xhtml+xml")
            .header("Accept-Language", "en-GB,en;q=0.9")
            .header(
                "User-Agent",
                "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 \
                 (KHTML, like Gecko) Chrome/124 Safari/537.36",
            )
            .send()
            .await?
            .error_for_status()?;
        let body = response.text().await?;
        debug!(bytes = body.len(), "Fetched source body");
        Ok(body)
    }
}

/// One run's result.
#[derive(Debug, PartialEq, Eq)]
pub enum Outcome {
    /// A genuinely new puzzle, attributed to the source that produced it.
    Fresh { puzzle: Puzzle, source: String },
    /// Every source, every pass, produced only duplicates or no parse.
    /// Expected steady state while the upstream page is not yet updated;
    /// the caller must not write the archive.
    Stale { reason: String },
}

/// What one source contributed to a pass.
enum SourceResult {
    Fresh(Puzzle),
    FetchFailed,
    NoSections,
    Duplicates,
}

/// The pass loop over configured sources.
pub struct Orchestrator<F> {
    config: Config,
    fetcher: F,
}

impl<F: FetchPage> Orchestrator<F> {
    pub fn new(config: Config, fetcher: F) -> Self {
        Self { config, fetcher }
    }

    /// Run until a fresh puzzle is found or every pass is exhausted.
    #[instrument(level = "info", skip_all)]
    pub async fn run(&self, prev: &PrevSnapshot) -> Outcome {
        let known = prev.known_sets();
        let mut saw_duplicates = false;
        let mut saw_parse_miss = false;
        for pass in 0..self.config.retry.max_passes {
            for source in &self.config.sources {
                match self.try_source(source, pass, &known, prev).await {
                    SourceResult::Fresh(puzzle) => {
                        info!(
                            source = %source.name,
                            pass,
                            date = %puzzle.date,
                            titles = %puzzle
                                .categories
                                .iter()
                                .map(|c| c.title.as_str())
                                .collect::<Vec<_>>()
                                .join(" | "),
                            "Fresh puzzle found"
                        );
                        return Outcome::Fresh {
                            puzzle,
                            source: source.name.clone(),
                        };
                    }
                    SourceResult::Duplicates => saw_duplicates = true,
                    SourceResult::NoSections => saw_parse_miss = true,
                    SourceResult::FetchFailed => {}
                }
            }
            if pass + 1 < self.config.retry.max_passes {
                info!(
                    delay_secs = self.config.retry.pass_delay.as_secs(),
                    "All sources looked stale; waiting before next pass"
                );
                sleep(self.config.retry.pass_delay).await;
            }
        }
        // Duplicates mean the upstream page hasn't rolled over yet; parse
        // misses and dead fetches point at site changes or outages.
        let reason = if saw_duplicates {
            "no differing section found on any source"
        } else if saw_parse_miss {
            "no parsable answer sections on any source"
        } else {
            "every fetch attempt failed"
        };
        Outcome::Stale {
            reason: reason.to_string(),
        }
    }

    /// Fetch and evaluate one source. Any failure is downgraded to "no
    /// candidate from this source".
    async fn try_source(
        &self,
        source: &Source,
        pass: u32,
        known: &[crate::models::WordSet],
        prev: &PrevSnapshot,
    ) -> SourceResult {
        let body = match self.fetcher.fetch(source).await {
            Ok(body) => body,
            Err(e) => {
                warn!(source = %source.name, pass, error = %e, "Fetch failed; skipping source");
                return SourceResult::FetchFailed;
            }
        };

        let candidates: Vec<Candidate> = match source.strategy {
            SourceStrategy::Html => candidates_from_html(&body),
            SourceStrategy::Text => candidates_from_text(&body),
        };
        if candidates.is_empty() {
            info!(source = %source.name, pass, "Skip: no parsable answer sections");
            return SourceResult::NoSections;
        }

        let chosen = match choose_fresh(candidates, known) {
            Some(c) => c,
            None => {
                info!(source = %source.name, pass, "Stale: all sections match known snapshots");
                return SourceResult::Duplicates;
            }
        };

        // Non-duplicate by construction, so the content counts as new when
        // inferring a date.
        let signals = DateSignals::gather(&chosen.section_text, &body);
        let date = infer_date(&signals, true, prev.date, Utc::now().date_naive());
        debug!(
            source = %source.name,
            label = %chosen.label,
            words = word_set(&chosen.categories).len(),
            "Chose fresh section"
        );
        SourceResult::Fresh(Puzzle {
            date: date.format("%Y-%m-%d").to_string(),
            categories: chosen.categories,
        })
    }
}
