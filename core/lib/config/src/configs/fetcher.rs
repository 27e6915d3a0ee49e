// Built-in uses
use std::time::Duration;
// External uses
use serde::Deserialize;
// Local uses
use crate::envy_load;

/// Settings of the component that performs the range reads.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct FetcherConfig {
    /// Timeout of a single range request, in seconds.
    #[serde(default = "default_request_timeout")]
    pub request_timeout: u64,
    /// Path to a local copy of the transcript. When set, ranges are read from
    /// this file instead of being requested over the network.
    #[serde(default)]
    pub local_transcript_path: Option<String>,
}

impl FetcherConfig {
    pub fn from_env() -> Self {
        envy_load!("fetcher", "CRS_FETCHER_")
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout)
    }
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            request_timeout: default_request_timeout(),
            local_transcript_path: None,
        }
    }
}

// The G1 range for a full-size circuit is over 300MB.
fn default_request_timeout() -> u64 {
    600
}
