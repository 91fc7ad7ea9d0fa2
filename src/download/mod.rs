//! File download module.
//!
//! Two-layer design: [`HttpClient`] implements the per-file transfer paths
//! (buffering fetch and best-effort direct save), and [`DownloadEngine`]
//! implements the fetch-then-fallback strategy plus paced batch runs over a
//! list of [`crate::api::FileDescriptor`]s.

mod client;
pub(crate) mod constants;
mod engine;
mod error;
pub(crate) mod filename;

pub use client::HttpClient;
pub use constants::DEFAULT_INTER_DOWNLOAD_DELAY_MS;
pub use engine::{BatchProgress, DownloadEngine, DownloadOutcome};
pub use error::DownloadError;
