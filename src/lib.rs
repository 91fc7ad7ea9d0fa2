//! Notice-dl Core Library
//!
//! This library provides the core functionality for the notice-dl tool,
//! which extracts court-notice parameters from an SMS text, queries the
//! service-of-process API for the associated document list, and downloads
//! the resulting files one at a time or in bulk.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//! - [`parser`] - SMS text parsing and notice-parameter extraction
//! - [`api`] - Document-list client for the service-of-process API
//! - [`download`] - Download engine with fetch/direct-save fallback and
//!   sequential batch processing

// Clippy lints - strict for library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod api;
pub mod download;
pub mod parser;

mod user_agent;

// Re-export commonly used types
pub use api::{ApiError, FileDescriptor, ListClient};
pub use download::{
    BatchProgress, DEFAULT_INTER_DOWNLOAD_DELAY_MS, DownloadEngine, DownloadError, DownloadOutcome,
    HttpClient,
};
pub use parser::{NoticeParams, ParseError, extract_notice_params};
