use serde::Deserialize;

pub use crate::configs::{FetcherConfig, TranscriptConfig};

pub mod configs;

/// Complete configuration of the CRS retrieval: where the transcript lives,
/// how it is laid out and how its ranges are fetched.
#[derive(Debug, Deserialize, Clone, PartialEq, Default)]
pub struct CrsConfig {
    pub transcript: TranscriptConfig,
    pub fetcher: FetcherConfig,
}

impl CrsConfig {
    pub fn from_env() -> Self {
        Self {
            transcript: TranscriptConfig::from_env(),
            fetcher: FetcherConfig::from_env(),
        }
    }
}
