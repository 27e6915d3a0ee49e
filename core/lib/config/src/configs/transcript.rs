// External uses
use serde::Deserialize;
// Local uses
use crate::envy_load;

/// Location of the sealed Ignition transcript holding the first 5 040 000 G1 points.
pub const IGNITION_TRANSCRIPT_URL: &str =
    "http://aztec-ignition.s3.amazonaws.com/MAIN%20IGNITION/sealed/transcript00.dat";
/// Size of the transcript header preceding the G1 points.
pub const IGNITION_HEADER_SIZE: u64 = 28;
/// Size of an uncompressed BN254 G1 point.
pub const IGNITION_G1_POINT_SIZE: u64 = 64;
/// Number of G1 points stored in the transcript.
pub const IGNITION_G1_POINTS: u64 = 5_040_000;
/// Size of an uncompressed BN254 G2 point.
pub const IGNITION_G2_POINT_SIZE: u64 = 128;

/// Location and structure of the ceremony transcript.
///
/// Every field falls back to the Ignition ceremony value, so an empty environment
/// describes the canonical transcript. Overrides exist to point the retrieval
/// at a local mock with a smaller layout.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct TranscriptConfig {
    /// URL of the transcript file.
    #[serde(default = "default_url")]
    pub url: String,
    /// Number of bytes before the first G1 point.
    #[serde(default = "default_header_size")]
    pub header_size: u64,
    /// Size of a single G1 point in bytes.
    #[serde(default = "default_g1_point_size")]
    pub g1_point_size: u64,
    /// Total amount of G1 points in the transcript.
    #[serde(default = "default_g1_points")]
    pub g1_points: u64,
    /// Size of a single G2 point in bytes.
    #[serde(default = "default_g2_point_size")]
    pub g2_point_size: u64,
}

impl TranscriptConfig {
    pub fn from_env() -> Self {
        envy_load!("transcript", "CRS_TRANSCRIPT_")
    }

    /// Offset of the G2 region, i.e. the first byte after the last G1 point.
    pub fn g2_offset(&self) -> u64 {
        self.header_size + self.g1_points * self.g1_point_size
    }
}

impl Default for TranscriptConfig {
    fn default() -> Self {
        Self {
            url: default_url(),
            header_size: IGNITION_HEADER_SIZE,
            g1_point_size: IGNITION_G1_POINT_SIZE,
            g1_points: IGNITION_G1_POINTS,
            g2_point_size: IGNITION_G2_POINT_SIZE,
        }
    }
}

fn default_url() -> String {
    IGNITION_TRANSCRIPT_URL.to_owned()
}

fn default_header_size() -> u64 {
    IGNITION_HEADER_SIZE
}

fn default_g1_point_size() -> u64 {
    IGNITION_G1_POINT_SIZE
}

fn default_g1_points() -> u64 {
    IGNITION_G1_POINTS
}

fn default_g2_point_size() -> u64 {
    IGNITION_G2_POINT_SIZE
}
