//! Download engine: per-file fetch/fallback strategy and paced batch runs.

use std::path::Path;
use std::time::Duration;

use tracing::{debug, info, instrument, warn};

use super::client::{HttpClient, SaveSource};
use super::filename::resolve_unique_path;
use crate::api::FileDescriptor;

/// Terminal state of one file download.
///
/// `Succeeded` means the save was dispatched, not that the remote content was
/// verified: the direct-save fallback cannot observe failures past dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DownloadOutcome {
    /// The file was saved, or its save was dispatched.
    Succeeded,
    /// Neither path could dispatch a save.
    Failed,
}

/// Running tally of a batch download.
///
/// Invariant: `succeeded + failed <= current_index <= total`, with equality
/// of the first two once the item at `current_index` has finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchProgress {
    /// Number of files in the batch.
    pub total: usize,
    /// Files that finished with [`DownloadOutcome::Succeeded`].
    pub succeeded: usize,
    /// Files that finished with [`DownloadOutcome::Failed`].
    pub failed: usize,
    /// 1-based index of the item currently (or last) processed; 0 before the
    /// batch starts.
    pub current_index: usize,
}

impl BatchProgress {
    /// Creates a tally for a batch of `total` files.
    #[must_use]
    pub fn new(total: usize) -> Self {
        Self {
            total,
            succeeded: 0,
            failed: 0,
            current_index: 0,
        }
    }

    fn record(&mut self, outcome: DownloadOutcome) {
        match outcome {
            DownloadOutcome::Succeeded => self.succeeded += 1,
            DownloadOutcome::Failed => self.failed += 1,
        }
        debug_assert!(
            self.succeeded + self.failed <= self.current_index
                && self.current_index <= self.total
        );
    }
}

/// Downloads files with a fetch-first, direct-save-fallback strategy, and
/// paces batch runs with a fixed delay between consecutive items.
#[derive(Debug, Clone)]
pub struct DownloadEngine {
    client: HttpClient,
    inter_delay: Duration,
}

impl DownloadEngine {
    /// Creates an engine over `client` with the given pause between batch
    /// items.
    #[must_use]
    pub fn new(client: HttpClient, inter_delay: Duration) -> Self {
        Self {
            client,
            inter_delay,
        }
    }

    /// Downloads one file into `output_dir` under `filename` (made unique if
    /// a file with that name already exists).
    ///
    /// Strategy: fetch and buffer the body first; on any fetch failure
    /// (including an HTML response where a document was expected), fall back
    /// to a best-effort direct save of the original URL. The outcome is
    /// `Failed` only when the chosen save could not be dispatched at all.
    #[instrument(skip(self), fields(url = %url, filename = %filename))]
    pub async fn download_file(
        &self,
        url: &str,
        filename: &str,
        output_dir: &Path,
    ) -> DownloadOutcome {
        let dest = resolve_unique_path(output_dir, filename);

        let dispatch = match self.client.fetch_document(url).await {
            Ok(doc) => {
                debug!(bytes = doc.bytes.len(), "fetch path succeeded, saving body");
                self.client
                    .dispatch_save(SaveSource::Bytes(&doc.bytes), &dest)
                    .await
                // doc (and its buffered body) is released here.
            }
            Err(e) => {
                warn!(error = %e, "fetch path failed, using direct save");
                self.client.dispatch_save(SaveSource::Remote(url), &dest).await
            }
        };

        match dispatch {
            Ok(()) => {
                info!(dest = %dest.display(), "download dispatched");
                DownloadOutcome::Succeeded
            }
            Err(e) => {
                warn!(error = %e, "download could not be dispatched");
                DownloadOutcome::Failed
            }
        }
    }

    /// Downloads every file in `files` into `output_dir`, strictly in order,
    /// sleeping the configured delay between consecutive items (never after
    /// the last one).
    ///
    /// A failed item never aborts the batch; it is tallied and the run moves
    /// on. `on_progress` is invoked after each item with the updated tally
    /// and the item's filename. An empty `files` returns an all-zero tally
    /// without invoking `on_progress` or sleeping.
    #[instrument(skip(self, files, on_progress), fields(total = files.len(), output_dir = %output_dir.display()))]
    pub async fn download_all<F>(
        &self,
        files: &[FileDescriptor],
        output_dir: &Path,
        mut on_progress: F,
    ) -> BatchProgress
    where
        F: FnMut(&BatchProgress, &str),
    {
        let mut progress = BatchProgress::new(files.len());
        if files.is_empty() {
            debug!("empty file list, nothing to download");
            return progress;
        }

        info!("starting batch download");
        let last_index = files.len() - 1;

        for (index, file) in files.iter().enumerate() {
            progress.current_index = index + 1;
            let filename = file.full_filename();
            debug!(index, filename = %filename, "processing batch item");

            let outcome = self
                .download_file(&file.source_url, &filename, output_dir)
                .await;
            progress.record(outcome);
            on_progress(&progress, &filename);

            if index < last_index {
                tokio::time::sleep(self.inter_delay).await;
            }
        }

        info!(
            succeeded = progress.succeeded,
            failed = progress.failed,
            total = progress.total,
            "batch download complete"
        );
        progress
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn descriptor(name: &str, url: &str) -> FileDescriptor {
        FileDescriptor {
            display_name: name.to_string(),
            extension: "pdf".to_string(),
            source_url: url.to_string(),
        }
    }

    fn invalid_files(count: usize) -> Vec<FileDescriptor> {
        (0..count)
            .map(|i| descriptor(&format!("doc{i}"), "not a url"))
            .collect()
    }

    // ==================== BatchProgress ====================

    #[test]
    fn test_batch_progress_new_is_zeroed() {
        let progress = BatchProgress::new(5);
        assert_eq!(progress.total, 5);
        assert_eq!(progress.succeeded, 0);
        assert_eq!(progress.failed, 0);
        assert_eq!(progress.current_index, 0);
    }

    #[test]
    fn test_batch_progress_record_tallies() {
        let mut progress = BatchProgress::new(3);
        progress.current_index = 1;
        progress.record(DownloadOutcome::Succeeded);
        progress.current_index = 2;
        progress.record(DownloadOutcome::Failed);
        assert_eq!(progress.succeeded, 1);
        assert_eq!(progress.failed, 1);
    }

    // ==================== download_file ====================

    #[tokio::test]
    async fn test_download_file_invalid_url_fails() {
        let temp_dir = TempDir::new().unwrap();
        let engine = DownloadEngine::new(HttpClient::new(), Duration::ZERO);

        let outcome = engine
            .download_file("not a url", "doc.pdf", temp_dir.path())
            .await;
        assert_eq!(outcome, DownloadOutcome::Failed);
    }

    // ==================== download_all ====================

    #[tokio::test]
    async fn test_download_all_empty_is_noop() {
        let temp_dir = TempDir::new().unwrap();
        let engine = DownloadEngine::new(HttpClient::new(), Duration::from_secs(60));

        let mut calls = 0;
        let progress = engine
            .download_all(&[], temp_dir.path(), |_, _| calls += 1)
            .await;

        assert_eq!(progress, BatchProgress::new(0));
        assert_eq!(calls, 0, "no progress callbacks for an empty batch");
    }

    #[tokio::test]
    async fn test_download_all_reports_in_order_and_never_aborts() {
        let temp_dir = TempDir::new().unwrap();
        let engine = DownloadEngine::new(HttpClient::new(), Duration::ZERO);
        let files = invalid_files(3);

        let mut seen = Vec::new();
        let progress = engine
            .download_all(&files, temp_dir.path(), |p, name| {
                assert!(p.succeeded + p.failed <= p.current_index);
                assert!(p.current_index <= p.total);
                seen.push((p.current_index, name.to_string()));
            })
            .await;

        assert_eq!(progress.total, 3);
        assert_eq!(progress.failed, 3);
        assert_eq!(progress.succeeded, 0);
        assert_eq!(
            seen,
            vec![
                (1, "doc0.pdf".to_string()),
                (2, "doc1.pdf".to_string()),
                (3, "doc2.pdf".to_string()),
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_download_all_sleeps_between_items_not_after_last() {
        // Invalid URLs fail without any network IO, so with a paused clock
        // the total elapsed time is exactly the inter-item pauses.
        let temp_dir = TempDir::new().unwrap();
        let engine = DownloadEngine::new(HttpClient::new(), Duration::from_secs(5));
        let files = invalid_files(3);

        let start = tokio::time::Instant::now();
        engine.download_all(&files, temp_dir.path(), |_, _| {}).await;

        assert_eq!(
            start.elapsed(),
            Duration::from_secs(10),
            "two pauses for three items, none after the last"
        );
    }
}
