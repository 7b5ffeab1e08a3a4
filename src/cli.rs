//! Command-line interface definitions.
//!
//! This module defines the CLI arguments and options using the `clap` crate.

use clap::Parser;

/// Command-line arguments for the Connections archive scraper.
///
/// # Examples
///
/// ```sh
/// # Fetch and archive today's puzzle
/// connections_archive -a ./puzzles
///
/// # Print the parsed puzzle without writing anything
/// connections_archive -a ./puzzles --dry-run
///
/// # Single fast pass, for cron jobs that run every few minutes anyway
/// connections_archive -a ./puzzles --max-passes 1
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Directory holding the puzzle archive (dated JSON, latest.json, manifest.json)
    #[arg(short, long, default_value = "puzzles")]
    pub archive_dir: String,

    /// Print the parsed result without writing the archive
    #[arg(long)]
    pub dry_run: bool,

    /// Number of passes over the source list before giving up
    #[arg(long, default_value_t = 2)]
    pub max_passes: u32,

    /// Seconds to wait between passes
    #[arg(long, default_value_t = 8)]
    pub pass_delay_secs: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::parse_from(["connections_archive"]);
        assert_eq!(cli.archive_dir, "puzzles");
        assert!(!cli.dry_run);
        assert_eq!(cli.max_passes, 2);
        assert_eq!(cli.pass_delay_secs, 8);
    }

    #[test]
    fn test_cli_flags() {
        let cli = Cli::parse_from([
            "connections_archive",
            "-a",
            "/tmp/puzzles",
            "--dry-run",
            "--max-passes",
            "1",
            "--pass-delay-secs",
            "0",
        ]);
        assert_eq!(cli.archive_dir, "/tmp/puzzles");
        assert!(cli.dry_run);
        assert_eq!(cli.max_passes, 1);
        assert_eq!(cli.pass_delay_secs, 0);
    }
}
