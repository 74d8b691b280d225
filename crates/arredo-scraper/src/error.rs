use thiserror::Error;

use crate::page::RevealSection;

#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("rate limited by {domain} (retry after {retry_after_secs}s)")]
    RateLimited {
        domain: String,
        retry_after_secs: u64,
    },

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },
}

/// Failure to surface a lazily-loaded page section.
///
/// Callers treat any variant as an optional-field miss for that section:
/// the affected field is recorded on the record's error list and extraction
/// of the remaining fields continues.
#[derive(Debug, Error)]
pub enum RevealError {
    #[error("timed out waiting for {section} content to load")]
    Timeout { section: RevealSection },

    #[error("failed to fetch {section} fragment: {source}")]
    Fetch {
        section: RevealSection,
        #[source]
        source: reqwest::Error,
    },

    #[error("unexpected HTTP status {status} for {section} fragment")]
    Status { section: RevealSection, status: u16 },
}
