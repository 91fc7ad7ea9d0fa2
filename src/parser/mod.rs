//! SMS parsing module for extracting court-notice parameters.
//!
//! Court notification SMS messages contain a link to the service-of-process
//! portal. This module finds that link in free-form text and decodes the
//! three parameters (`qdbh`, `sdbh`, `sdsin`) the document-list API needs.
//!
//! # Example
//!
//! ```
//! use notice_dl_core::parser::extract_notice_params;
//!
//! let sms = "【法院】您收到一份文书 https://zxfw.court.gov.cn/h5/index.html#/pagesAjkj/app/wssd/index?qdbh=Q&sdbh=S&sdsin=X 请查收";
//! let params = extract_notice_params(sms).unwrap();
//! assert_eq!(params.sdbh, "S");
//! ```

mod error;
mod sms;

pub use error::ParseError;
pub use sms::{NoticeParams, extract_notice_params};
