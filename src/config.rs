//! Run configuration for the fetch orchestrator.
//!
//! All knobs live in an explicit [`Config`] passed into the orchestrator at
//! construction, so tests can inject fake sources and zero-delay retry
//! policies instead of patching module-level constants.

use std::time::Duration;

/// How a source's response body should be parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceStrategy {
    /// Raw HTML: heading-sliced sections with strict and loose extraction.
    Html,
    /// Pre-stripped text (e.g. from a text-rendering proxy): line scanning.
    Text,
}

/// One upstream answer page, tried in the order configured.
#[derive(Debug, Clone)]
pub struct Source {
    /// Short name used in log lines ("MAIN", "AMP", ...).
    pub name: String,
    /// Page URL; a cache-buster query parameter is appended per request.
    pub url: String,
    /// Parsing strategy for this source's response body.
    pub strategy: SourceStrategy,
}

impl Source {
    pub fn new(name: &str, url: &str, strategy: SourceStrategy) -> Self {
        Self {
            name: name.to_string(),
            url: url.to_string(),
            strategy,
        }
    }
}

/// Bounded retry policy for the orchestrator's pass loop.
///
/// A pass is one full iteration over all configured sources. When a pass
/// produces nothing fresh, the orchestrator sleeps for `pass_delay` before
/// the next one, giving upstream caches a chance to settle.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Total number of passes over the source list.
    pub max_passes: u32,
    /// Sleep between passes.
    pub pass_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_passes: 2,
            pass_delay: Duration::from_secs(8),
        }
    }
}

impl RetryPolicy {
    /// Policy for tests: a single pass, no sleeping.
    pub fn immediate(max_passes: u32) -> Self {
        Self {
            max_passes,
            pass_delay: Duration::ZERO,
        }
    }
}

/// Everything the orchestrator needs for one run.
#[derive(Debug, Clone)]
pub struct Config {
    /// Sources in fixed priority order.
    pub sources: Vec<Source>,
    /// Pass/delay policy.
    pub retry: RetryPolicy,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            sources: vec![
                Source::new(
                    "MAIN",
                    "https://capitalizemytitle.com/todays-nyt-connections-answers/",
                    SourceStrategy::Html,
                ),
                Source::new(
                    "AMP",
                    "https://capitalizemytitle.com/todays-nyt-connections-answers/amp/",
                    SourceStrategy::Html,
                ),
            ],
            retry: RetryPolicy::default(),
        }
    }
}
