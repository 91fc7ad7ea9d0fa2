//! CLI argument definitions using clap derive macros.

use std::path::PathBuf;

use clap::Parser;

use notice_dl_core::{DEFAULT_INTER_DOWNLOAD_DELAY_MS, api::DEFAULT_ENDPOINT};

/// Download court service-of-process documents from an SMS notice.
///
/// Paste the notice text (or pipe it via stdin); notice-dl extracts the
/// service link, looks up the document list, and downloads every file.
#[derive(Parser, Debug)]
#[command(name = "notice-dl")]
#[command(author, version, about)]
pub struct Args {
    /// Notice text containing the service link (reads stdin when omitted)
    #[arg(value_name = "TEXT")]
    pub text: Vec<String>,

    /// Output directory for downloaded files
    #[arg(short, long, default_value = ".")]
    pub output: PathBuf,

    /// Pause between consecutive downloads in milliseconds (0 to disable, max 60000)
    #[arg(short = 'd', long, default_value_t = DEFAULT_INTER_DOWNLOAD_DELAY_MS, value_parser = clap::value_parser!(u64).range(0..=60000))]
    pub delay_ms: u64,

    /// List the documents without downloading them
    #[arg(long)]
    pub list: bool,

    /// Document-list API endpoint
    #[arg(long, default_value = DEFAULT_ENDPOINT, hide_default_value = true)]
    pub endpoint: String,

    /// Increase output verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(short, long)]
    pub quiet: bool,
}
