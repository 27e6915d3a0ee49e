//! Mapping from the amount of requested points to byte ranges of the transcript.
//!
//! The transcript is a header followed by `g1_points` G1 points and then the
//! G2 region. Only a prefix of the G1 points and the very first G2 point are
//! ever needed, so retrieval boils down to two inclusive byte ranges.

// Built-in uses
use std::fmt;
// Workspace uses
use ignition_config::configs::transcript::{
    TranscriptConfig, IGNITION_G1_POINTS, IGNITION_G1_POINT_SIZE, IGNITION_G2_POINT_SIZE,
    IGNITION_HEADER_SIZE,
};
// Local uses
use crate::error::CrsError;

/// Structure of a ceremony transcript.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TranscriptLayout {
    pub header_size: u64,
    pub g1_point_size: u64,
    pub g1_points: u64,
    pub g2_point_size: u64,
}

impl TranscriptLayout {
    /// Layout of the first transcript of the Aztec Ignition ceremony.
    pub const IGNITION: Self = Self {
        header_size: IGNITION_HEADER_SIZE,
        g1_point_size: IGNITION_G1_POINT_SIZE,
        g1_points: IGNITION_G1_POINTS,
        g2_point_size: IGNITION_G2_POINT_SIZE,
    };

    /// Checks that the layout describes a non-empty file addressable with `u64` offsets.
    pub fn validate(&self) -> Result<(), CrsError> {
        if self.g1_point_size == 0 || self.g2_point_size == 0 {
            return Err(CrsError::InvalidLayout("point size must be positive".into()));
        }
        if self.g1_points == 0 {
            return Err(CrsError::InvalidLayout(
                "transcript must contain at least one G1 point".into(),
            ));
        }

        self.g1_points
            .checked_mul(self.g1_point_size)
            .and_then(|g1_region| g1_region.checked_add(self.header_size))
            .and_then(|g2_offset| g2_offset.checked_add(self.g2_point_size))
            .map(|_| ())
            .ok_or_else(|| CrsError::InvalidLayout("transcript size overflows u64".into()))
    }

    /// Offset of the first G2 point.
    pub fn g2_offset(&self) -> u64 {
        self.header_size + self.g1_points * self.g1_point_size
    }

    /// Checks the requested amount of points against the transcript capacity.
    pub fn check_num_points(&self, num_points: i64) -> Result<u64, CrsError> {
        let invalid = || CrsError::InvalidRequestSize {
            requested: num_points,
            max: self.g1_points,
        };

        if num_points < 1 {
            return Err(invalid());
        }
        let num_points = num_points as u64;
        if num_points > self.g1_points {
            return Err(invalid());
        }
        Ok(num_points)
    }
}

impl Default for TranscriptLayout {
    fn default() -> Self {
        Self::IGNITION
    }
}

impl From<&TranscriptConfig> for TranscriptLayout {
    fn from(config: &TranscriptConfig) -> Self {
        Self {
            header_size: config.header_size,
            g1_point_size: config.g1_point_size,
            g1_points: config.g1_points,
            g2_point_size: config.g2_point_size,
        }
    }
}

/// Inclusive range of bytes, as used by the HTTP `Range` header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ByteRange {
    pub start: u64,
    pub end: u64,
}

impl ByteRange {
    /// Range of `len` bytes starting at `start`. `len` must be positive.
    pub fn with_len(start: u64, len: u64) -> Self {
        debug_assert!(len > 0, "empty byte range");
        Self {
            start,
            end: start + len - 1,
        }
    }

    /// Amount of bytes in the range, zero for an inverted one.
    pub fn len(&self) -> u64 {
        if self.end < self.start {
            0
        } else {
            self.end - self.start + 1
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Ranges are inclusive, so only `start > end` cannot be requested.
    pub fn validate(&self) -> Result<(), CrsError> {
        if self.end < self.start {
            return Err(CrsError::InvalidRange {
                start: self.start,
                end: self.end,
            });
        }
        Ok(())
    }

    /// Value of the `Range` header requesting exactly this range.
    pub fn header_value(&self) -> String {
        format!("bytes={}", self)
    }
}

impl fmt::Display for ByteRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}

/// The two ranges that make up a reference string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TranscriptRanges {
    /// First `num_points` G1 points.
    pub g1: ByteRange,
    /// The first G2 point.
    pub g2: ByteRange,
}

/// Computes the byte ranges holding the first `num_points` G1 points and the G2 point.
///
/// Fails with [`CrsError::InvalidRequestSize`] unless `1 <= num_points <= layout.g1_points`.
pub fn compute_ranges(
    layout: &TranscriptLayout,
    num_points: i64,
) -> Result<TranscriptRanges, CrsError> {
    layout.validate()?;
    let num_points = layout.check_num_points(num_points)?;

    Ok(TranscriptRanges {
        g1: ByteRange::with_len(layout.header_size, num_points * layout.g1_point_size),
        g2: ByteRange::with_len(layout.g2_offset(), layout.g2_point_size),
    })
}
