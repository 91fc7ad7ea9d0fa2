//! CLI entry point for the notice-dl tool.

use std::io::{self, IsTerminal, Read};
use std::time::Duration;

use anyhow::{Context, Result, bail};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use notice_dl_core::{DownloadEngine, HttpClient, ListClient, extract_notice_params};
use tracing::{debug, info};

mod cli;

use cli::Args;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments first (before tracing, so --help works without logs)
    let args = Args::parse();

    // Determine log level based on verbose/quiet flags
    // Priority: RUST_LOG env var > quiet flag > verbose flag > default (info)
    let default_level = if args.quiet {
        "error"
    } else {
        match args.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    };

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));

    tracing_subscriber::fmt().with_env_filter(filter).init();

    debug!(?args, "CLI arguments parsed");

    // Read input: from positional args or stdin
    let input_text = if args.text.is_empty() {
        if io::stdin().is_terminal() {
            info!("No input provided. Paste the notice text as an argument or pipe it via stdin.");
            info!("Example: notice-dl '【人民法院】 ... https://host/page?qdbh=..&sdbh=..&sdsin=..'");
            return Ok(());
        }
        let mut buffer = String::new();
        io::stdin()
            .read_to_string(&mut buffer)
            .context("failed to read notice text from stdin")?;
        buffer
    } else {
        args.text.join(" ")
    };

    let params = extract_notice_params(&input_text)?;
    debug!(qdbh = %params.qdbh, sdbh = %params.sdbh, "notice parameters extracted");

    let list_client = ListClient::with_endpoint(&args.endpoint);
    let files = list_client.fetch_file_list(&params).await?;

    if files.is_empty() {
        info!("The notice has no downloadable documents");
        return Ok(());
    }

    info!(documents = files.len(), "document list fetched");
    for (index, file) in files.iter().enumerate() {
        println!(
            "  {}. {} [{}]",
            index + 1,
            file.full_filename(),
            file_kind_label(&file.extension)
        );
    }

    if args.list {
        return Ok(());
    }

    std::fs::create_dir_all(&args.output).with_context(|| {
        format!("failed to create output directory {}", args.output.display())
    })?;

    let engine = DownloadEngine::new(HttpClient::new(), Duration::from_millis(args.delay_ms));

    let bar = if args.quiet || !io::stderr().is_terminal() {
        ProgressBar::hidden()
    } else {
        let bar = ProgressBar::new(files.len() as u64);
        bar.set_style(
            ProgressStyle::with_template("{bar:30} {pos}/{len} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar()),
        );
        bar
    };

    let progress = engine
        .download_all(&files, &args.output, |p, filename| {
            bar.set_position(p.current_index as u64);
            bar.set_message(filename.to_string());
        })
        .await;
    bar.finish_and_clear();

    if progress.failed > 0 {
        info!(
            succeeded = progress.succeeded,
            failed = progress.failed,
            total = progress.total,
            "download finished with failures"
        );
        bail!(
            "{} of {} downloads failed, see the log for details",
            progress.failed,
            progress.total
        );
    }

    info!(
        succeeded = progress.succeeded,
        total = progress.total,
        output = %args.output.display(),
        "all documents downloaded"
    );
    Ok(())
}

/// Human-readable label for a file extension, shown in the document listing.
fn file_kind_label(extension: &str) -> &'static str {
    match extension.to_ascii_lowercase().as_str() {
        "pdf" | "doc" | "docx" | "wps" => "document",
        "xls" | "xlsx" => "spreadsheet",
        "ppt" | "pptx" => "presentation",
        "zip" | "rar" | "7z" => "archive",
        "jpg" | "jpeg" | "png" | "gif" | "bmp" => "image",
        "txt" => "text",
        _ => "file",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_kind_label_known_kinds() {
        assert_eq!(file_kind_label("pdf"), "document");
        assert_eq!(file_kind_label("DOCX"), "document");
        assert_eq!(file_kind_label("xlsx"), "spreadsheet");
        assert_eq!(file_kind_label("zip"), "archive");
        assert_eq!(file_kind_label("png"), "image");
    }

    #[test]
    fn test_file_kind_label_unknown_is_generic() {
        assert_eq!(file_kind_label("file"), "file");
        assert_eq!(file_kind_label("xyz"), "file");
    }
}
