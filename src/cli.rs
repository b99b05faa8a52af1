//! CLI argument definitions using clap derive macros.

use std::path::PathBuf;

use clap::Parser;

use harvester_core::download::{MAX_TIMEOUT_SECS, MIN_TIMEOUT_SECS};

/// Download every file an HTML index page links to.
///
/// Harvester fetches one page, keeps the links whose names end with the
/// configured extension(s), and saves each file into an existing directory.
#[derive(Parser, Debug)]
#[command(name = "harvester")]
#[command(author, version, about)]
pub struct Args {
    /// Index page whose links are harvested [default: the built-in page]
    #[arg(short = 'u', long, value_name = "URL")]
    pub page_url: Option<String>,

    /// Existing directory downloads are written to [default: data]
    #[arg(short = 'o', long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// File name suffix to match; repeat to accept several [default: .pdf]
    #[arg(short = 'e', long = "ext", value_name = "SUFFIX")]
    pub extensions: Vec<String>,

    /// Config file to read instead of the default location
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// List the files that would be downloaded without fetching them
    #[arg(long)]
    pub dry_run: bool,

    /// Connect timeout in seconds (no timeout unless set)
    #[arg(long, value_name = "SECS", value_parser = clap::value_parser!(u64).range(MIN_TIMEOUT_SECS..=MAX_TIMEOUT_SECS))]
    pub connect_timeout: Option<u64>,

    /// Whole-request timeout in seconds (no timeout unless set)
    #[arg(long, value_name = "SECS", value_parser = clap::value_parser!(u64).range(MIN_TIMEOUT_SECS..=MAX_TIMEOUT_SECS))]
    pub read_timeout: Option<u64>,

    /// Increase log verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress progress lines and non-error logs
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable colored log output
    #[arg(long)]
    pub no_color: bool,
}
