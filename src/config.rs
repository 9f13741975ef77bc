/*!
 * Configuration handling for pagedump
 */

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use clap_complete::Shell;
use log::LevelFilter;

use crate::error::Result;
use crate::provider::SnapshotSource;

/// Command-line arguments for pagedump
#[derive(Parser, Debug, Clone)]
#[clap(
    name = "pagedump",
    version = env!("CARGO_PKG_VERSION"),
    about = "Turn accessibility snapshots of web pages into text documents for LLM context",
    long_about = "Reads accessibility tree snapshots (JSON) of rendered pages, extracts their visible text and wraps it in a page banner with title and URL, ready to paste into a prompt."
)]
pub struct Args {
    /// Snapshot JSON files to export, `-` for stdin
    #[clap(default_value = "-")]
    pub inputs: Vec<String>,

    /// Page title (overrides the title stored in the snapshot)
    #[clap(long)]
    pub title: Option<String>,

    /// Page URL (overrides the URL stored in the snapshot)
    #[clap(long)]
    pub url: Option<String>,

    /// Seconds to wait for each snapshot to be delivered
    #[clap(long, default_value = "5")]
    pub timeout_secs: u64,

    /// Write documents to this file instead of stdout
    #[clap(short, long)]
    pub output: Option<String>,

    /// Copy output to clipboard
    #[clap(long, help = "Copy output to system clipboard")]
    pub clip: bool,

    /// Print an export report to stderr
    #[clap(long)]
    pub report: bool,

    /// Number of threads to use when exporting several snapshots
    #[clap(long, default_value = "4")]
    pub threads: usize,

    /// Generate shell completions
    #[clap(long = "generate", value_enum)]
    pub generate: Option<Shell>,

    /// More log output (repeat for debug)
    #[clap(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Only log errors
    #[clap(short, long, conflicts_with = "verbose")]
    pub quiet: bool,
}

/// Application configuration
#[derive(Clone, Debug)]
pub struct Config {
    /// Snapshot sources, in output order
    pub sources: Vec<SnapshotSource>,

    /// Title override
    pub title: Option<String>,

    /// URL override
    pub url: Option<String>,

    /// Snapshot delivery timeout
    pub timeout: Duration,

    /// Output file (stdout when absent)
    pub output_file: Option<PathBuf>,

    /// Copy output to clipboard
    pub clip: bool,

    /// Print an export report
    pub report: bool,

    /// Number of threads to use for processing
    pub num_threads: usize,

    /// Log level for the binary
    pub log_level: LevelFilter,
}

impl Config {
    /// Create configuration from command-line arguments
    pub fn from_args(args: Args) -> Self {
        let log_level = if args.quiet {
            LevelFilter::Error
        } else {
            match args.verbose {
                0 => LevelFilter::Warn,
                1 => LevelFilter::Info,
                _ => LevelFilter::Debug,
            }
        };

        Self {
            sources: args.inputs.iter().map(|s| SnapshotSource::from_arg(s)).collect(),
            title: args.title,
            url: args.url,
            timeout: Duration::from_secs(args.timeout_secs),
            output_file: args.output.map(PathBuf::from),
            clip: args.clip,
            report: args.report,
            num_threads: args.threads,
            log_level,
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        crate::ensure!(!self.sources.is_empty(), Config, "No snapshot inputs given");
        crate::ensure!(!self.timeout.is_zero(), Config, "Timeout must be at least one second");
        crate::ensure!(self.num_threads > 0, Config, "Thread count must be positive");

        let stdin_inputs = self
            .sources
            .iter()
            .filter(|s| **s == SnapshotSource::Stdin)
            .count();
        crate::ensure!(stdin_inputs <= 1, Config, "Standard input can only be read once");

        for source in &self.sources {
            if let SnapshotSource::File(path) = source {
                crate::ensure!(
                    path.is_file(),
                    Config,
                    "Snapshot file not found: {}",
                    path.display()
                );
            }
        }

        // Check if output file directory exists
        if let Some(parent) = self.output_file.as_ref().and_then(|p| p.parent()) {
            crate::ensure!(
                parent.as_os_str().is_empty() || parent.is_dir(),
                Config,
                "Output directory not found: {}",
                parent.display()
            );
        }

        Ok(())
    }

    /// Human-readable destination of the documents
    pub fn destination(&self) -> String {
        let target = match &self.output_file {
            Some(path) => path.display().to_string(),
            None => "<stdout>".to_string(),
        };
        if self.clip {
            format!("{} + clipboard", target)
        } else {
            target
        }
    }
}
