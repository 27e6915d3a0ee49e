//! Retrieval of byte ranges of the transcript.
//!
//! Every implementation has to honour the same contract: either return exactly
//! the requested bytes, or fail. A server that ignores the `Range` header or
//! returns a short body must never be mistaken for a successful read.

// Built-in uses
use std::path::PathBuf;
// External uses
use async_trait::async_trait;
use bytes::Bytes;
use reqwest::{StatusCode, Url};
// Workspace uses
use ignition_config::CrsConfig;
// Local uses
use crate::{error::CrsError, layout::ByteRange};

pub use self::{file::FileRangeFetcher, http::HttpRangeFetcher, mock::MockTranscript};

pub mod file;
pub mod http;
pub mod mock;

/// Capability to read an inclusive byte range of one fixed transcript.
///
/// Dropping the returned future cancels the read.
#[async_trait]
pub trait RangeFetcher: Send + Sync {
    /// Returns exactly `range.len()` bytes starting at `range.start`.
    async fn fetch_range(&self, range: ByteRange) -> Result<Bytes, CrsError>;

    /// Human-readable location of the transcript.
    fn location(&self) -> String;
}

#[async_trait]
impl<F: RangeFetcher + ?Sized> RangeFetcher for Box<F> {
    async fn fetch_range(&self, range: ByteRange) -> Result<Bytes, CrsError> {
        (**self).fetch_range(range).await
    }

    fn location(&self) -> String {
        (**self).location()
    }
}

/// Only `206 Partial Content` proves that the range was honoured.
pub fn check_status(status: StatusCode) -> Result<(), CrsError> {
    if status == StatusCode::PARTIAL_CONTENT {
        Ok(())
    } else {
        Err(CrsError::UnexpectedStatus {
            status: status.as_u16(),
        })
    }
}

pub fn check_length(range: ByteRange, body: &Bytes) -> Result<(), CrsError> {
    range.validate()?;
    let actual = body.len() as u64;
    if actual == range.len() {
        Ok(())
    } else {
        Err(CrsError::LengthMismatch {
            expected: range.len(),
            actual,
        })
    }
}

/// Creates the fetcher described by the configuration: a local transcript copy
/// if `local_transcript_path` is set, the remote transcript otherwise.
pub fn fetcher_from_config(config: &CrsConfig) -> Result<Box<dyn RangeFetcher>, CrsError> {
    match &config.fetcher.local_transcript_path {
        Some(path) => Ok(Box::new(FileRangeFetcher::new(PathBuf::from(path)))),
        None => {
            let url = config
                .transcript
                .url
                .parse::<Url>()
                .map_err(|err| {
                    CrsError::InvalidConfig(format!("invalid transcript url: {}", err))
                })?;
            let fetcher = HttpRangeFetcher::new(url, config.fetcher.request_timeout())?;
            Ok(Box::new(fetcher))
        }
    }
}
