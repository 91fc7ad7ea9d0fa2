//! Shared User-Agent string for API and download HTTP clients.
//!
//! Single source for the UA format so list-fetch and download traffic stay
//! consistent and easy to update.

/// Default User-Agent for all outgoing requests (identifies the tool).
#[must_use]
pub(crate) fn default_user_agent() -> String {
    let version = env!("CARGO_PKG_VERSION");
    format!("notice-dl/{version} (court-notice-fetcher)")
}
