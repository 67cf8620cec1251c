//! Typed errors for the fetch, parse and report stages.
//!
//! Library modules return these; the pipeline wraps them with `anyhow`
//! context naming the stage that failed.

use thiserror::Error;

/// Why a single fetch attempt did not count as a success.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AttemptFailure {
    /// Connection refused, DNS failure, timeout or an unreadable body.
    #[error("transport failure: {0}")]
    Transport(String),

    /// A response arrived but the success predicate rejected it.
    #[error("rejected: {0}")]
    Rejected(String),
}

/// Terminal outcome of a retried fetch.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error("failed to fetch {target} after {attempts} attempts ({last})")]
    Exhausted {
        target: String,
        attempts: u32,
        last: AttemptFailure,
    },
}

impl FetchError {
    pub fn attempts(&self) -> u32 {
        match self {
            FetchError::Exhausted { attempts, .. } => *attempts,
        }
    }
}

/// Price text that holds no parseable number.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unparseable price text: {input:?}")]
pub struct PriceFormatError {
    pub input: String,
}

#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("invalid selector {selector:?}")]
    InvalidSelector { selector: String },

    #[error(transparent)]
    Fetch(#[from] FetchError),
}

#[derive(Debug, Error)]
pub enum ReportError {
    /// No product survived normalization, so there is nothing to average.
    #[error("no valid products to report")]
    EmptyDataset,

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("chart rendering failed: {0}")]
    Chart(String),
}
