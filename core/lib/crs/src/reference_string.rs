// External uses
use bytes::Bytes;
// Local uses
use crate::{
    error::CrsError,
    fetcher::{check_length, RangeFetcher},
    layout::{compute_ranges, ByteRange, TranscriptLayout, TranscriptRanges},
};

/// Slice of the ceremony transcript needed to commit to polynomials of up to
/// `num_points` coefficients: the first `num_points` G1 points and the first G2 point.
///
/// Points are kept in their serialized transcript form; decoding them is up to
/// the proving system. Cloning is cheap, the buffers are shared.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceString {
    num_points: u64,
    g1_point_size: usize,
    g1_data: Bytes,
    g2_point: Bytes,
}

impl ReferenceString {
    pub fn num_points(&self) -> u64 {
        self.num_points
    }

    /// Concatenated G1 points, `num_points * g1_point_size` bytes.
    pub fn g1_data(&self) -> &Bytes {
        &self.g1_data
    }

    pub fn g2_point(&self) -> &Bytes {
        &self.g2_point
    }

    /// Serialized G1 point with the given index.
    pub fn g1_point(&self, index: usize) -> Option<&[u8]> {
        let start = index.checked_mul(self.g1_point_size)?;
        let end = start.checked_add(self.g1_point_size)?;
        self.g1_data.get(start..end)
    }

    pub fn g1_points(&self) -> impl Iterator<Item = &[u8]> {
        self.g1_data.chunks_exact(self.g1_point_size)
    }
}

/// Downloads the first `num_points` G1 points and the G2 point of the transcript.
///
/// The size is validated before any request is made. Both ranges are requested
/// concurrently; if either fails, the other one is cancelled and nothing is returned.
pub async fn download_reference_string<F: RangeFetcher + ?Sized>(
    fetcher: &F,
    layout: &TranscriptLayout,
    num_points: i64,
) -> Result<ReferenceString, CrsError> {
    let ranges = compute_ranges(layout, num_points)?;
    download_ranges(fetcher, layout, ranges).await
}

pub(crate) async fn download_ranges<F: RangeFetcher + ?Sized>(
    fetcher: &F,
    layout: &TranscriptLayout,
    ranges: TranscriptRanges,
) -> Result<ReferenceString, CrsError> {
    let num_points = ranges.g1.len() / layout.g1_point_size;

    vlog::info!(
        "Downloading reference string with {} points from {}",
        num_points,
        fetcher.location()
    );
    vlog::debug!("G1 points range: {}, G2 point range: {}", ranges.g1, ranges.g2);

    let (g1_data, g2_point) = futures::try_join!(
        fetch_exact(fetcher, ranges.g1),
        fetch_exact(fetcher, ranges.g2)
    )?;

    vlog::info!(
        "Reference string downloaded: {} bytes of G1 points, {} bytes of G2 point",
        g1_data.len(),
        g2_point.len()
    );

    Ok(ReferenceString {
        num_points,
        g1_point_size: layout.g1_point_size as usize,
        g1_data,
        g2_point,
    })
}

// Fetchers are expected to check the length themselves, but a wrongly sized
// buffer must not get through even if one does not.
async fn fetch_exact<F: RangeFetcher + ?Sized>(
    fetcher: &F,
    range: ByteRange,
) -> Result<Bytes, CrsError> {
    let body = fetcher.fetch_range(range).await?;
    check_length(range, &body)?;
    Ok(body)
}
