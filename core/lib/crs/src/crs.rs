// Built-in uses
use std::sync::{Mutex, MutexGuard, PoisonError};
// External uses
use bytes::Bytes;
// Local uses
use crate::{
    error::CrsError,
    fetcher::RangeFetcher,
    layout::{compute_ranges, TranscriptLayout},
    reference_string::{download_ranges, ReferenceString},
};

/// Lifecycle stage of a [`Crs`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CrsStatus {
    Uninitialized,
    Retrieving,
    Ready,
    Failed,
}

#[derive(Debug)]
enum CrsState {
    Uninitialized,
    Retrieving,
    Ready(ReferenceString),
    Failed(CrsError),
}

/// Client-side view of the first `num_points` G1 points and the G2 point of the
/// transcript.
///
/// An instance is retrieved exactly once: `Uninitialized -> Retrieving -> Ready | Failed`.
/// Data is only observable in `Ready`, and both buffers are set at the same time.
/// Once ready, the instance can be shared between readers.
#[derive(Debug)]
pub struct Crs {
    num_points: u64,
    layout: TranscriptLayout,
    state: Mutex<CrsState>,
}

impl Crs {
    /// Creates a view on the Ignition transcript. Fails if `num_points` is not in `1..=5_040_000`.
    pub fn new(num_points: i64) -> Result<Self, CrsError> {
        Self::with_layout(num_points, TranscriptLayout::IGNITION)
    }

    pub fn with_layout(num_points: i64, layout: TranscriptLayout) -> Result<Self, CrsError> {
        layout.validate()?;
        let num_points = layout.check_num_points(num_points)?;

        Ok(Self {
            num_points,
            layout,
            state: Mutex::new(CrsState::Uninitialized),
        })
    }

    pub fn num_points(&self) -> u64 {
        self.num_points
    }

    pub fn layout(&self) -> &TranscriptLayout {
        &self.layout
    }

    pub fn status(&self) -> CrsStatus {
        match &*self.state() {
            CrsState::Uninitialized => CrsStatus::Uninitialized,
            CrsState::Retrieving => CrsStatus::Retrieving,
            CrsState::Ready(_) => CrsStatus::Ready,
            CrsState::Failed(_) => CrsStatus::Failed,
        }
    }

    /// Error the retrieval ended with, if it failed.
    pub fn failure(&self) -> Option<CrsError> {
        match &*self.state() {
            CrsState::Failed(err) => Some(err.clone()),
            _ => None,
        }
    }

    /// Fetches both ranges of the transcript and stores them.
    ///
    /// Only the first call performs a retrieval: later calls fail with
    /// [`CrsError::RetrievalInProgress`] or [`CrsError::AlreadyRetrieved`].
    /// Dropping the returned future cancels both requests and fails the
    /// instance with [`CrsError::Cancelled`].
    pub async fn retrieve<F: RangeFetcher + ?Sized>(
        &self,
        fetcher: &F,
    ) -> Result<ReferenceString, CrsError> {
        self.begin_retrieval()?;
        let mut guard = RetrievalGuard {
            crs: self,
            finished: false,
        };

        // Size and layout were validated on construction.
        let result = match compute_ranges(&self.layout, self.num_points as i64) {
            Ok(ranges) => download_ranges(fetcher, &self.layout, ranges).await,
            Err(err) => Err(err),
        };
        guard.finished = true;

        let mut state = self.state();
        match &result {
            Ok(crs) => *state = CrsState::Ready(crs.clone()),
            Err(err) => {
                vlog::warn!("Failed to retrieve reference string: {}", err);
                *state = CrsState::Failed(err.clone());
            }
        }
        result
    }

    /// Concatenated G1 points.
    pub fn g1_data(&self) -> Result<Bytes, CrsError> {
        self.reference_string().map(|crs| crs.g1_data().clone())
    }

    pub fn g2_point(&self) -> Result<Bytes, CrsError> {
        self.reference_string().map(|crs| crs.g2_point().clone())
    }

    pub fn reference_string(&self) -> Result<ReferenceString, CrsError> {
        match &*self.state() {
            CrsState::Ready(crs) => Ok(crs.clone()),
            _ => Err(CrsError::NotLoaded),
        }
    }

    fn begin_retrieval(&self) -> Result<(), CrsError> {
        let mut state = self.state();
        if let CrsState::Uninitialized = *state {
            *state = CrsState::Retrieving;
            return Ok(());
        }

        match *state {
            CrsState::Retrieving => Err(CrsError::RetrievalInProgress),
            _ => Err(CrsError::AlreadyRetrieved),
        }
    }

    // State transitions never panic halfway, so a poisoned lock still holds a consistent state.
    fn state(&self) -> MutexGuard<'_, CrsState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Moves the instance to `Failed` if the retrieval future is dropped before completion.
struct RetrievalGuard<'a> {
    crs: &'a Crs,
    finished: bool,
}

impl Drop for RetrievalGuard<'_> {
    fn drop(&mut self) {
        if !self.finished {
            vlog::warn!("Reference string retrieval was cancelled");
            *self.crs.state() = CrsState::Failed(CrsError::Cancelled);
        }
    }
}
