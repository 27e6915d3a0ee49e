//! Partial retrieval of the Aztec Ignition reference string.
//!
//! A KZG commitment scheme over BN254 needs the first `n` G1 points of the
//! ceremony transcript and its first G2 point. The transcript is a single
//! immutable file of several hundred megabytes, so only the two byte ranges
//! holding those points are requested.
//!
//! ```no_run
//! # async fn example() -> Result<(), ignition_crs::CrsError> {
//! use ignition_config::CrsConfig;
//! use ignition_crs::{fetcher_from_config, Crs, TranscriptLayout};
//!
//! let config = CrsConfig::from_env();
//! let fetcher = fetcher_from_config(&config)?;
//! let crs = Crs::with_layout(1 << 16, TranscriptLayout::from(&config.transcript))?;
//! let reference_string = crs.retrieve(&fetcher).await?;
//! assert_eq!(reference_string.g1_data().len(), (1 << 16) * 64);
//! # Ok(())
//! # }
//! ```

pub use crate::{
    crs::{Crs, CrsStatus},
    error::CrsError,
    fetcher::{
        fetcher_from_config, FileRangeFetcher, HttpRangeFetcher, MockTranscript, RangeFetcher,
    },
    layout::{compute_ranges, ByteRange, TranscriptLayout, TranscriptRanges},
    reference_string::{download_reference_string, ReferenceString},
};

pub mod crs;
pub mod error;
pub mod fetcher;
pub mod layout;
pub mod reference_string;

#[cfg(test)]
mod tests;
