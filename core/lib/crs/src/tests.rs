//! Tests of the `Crs` lifecycle against the mock transcript.

// Built-in uses
use std::{sync::Arc, time::Duration};
// Local uses
use crate::{
    fetcher::mock::{MockTranscript, ServerBehaviour},
    ByteRange, Crs, CrsError, CrsStatus, RangeFetcher, TranscriptLayout,
};

const G2_RANGE: ByteRange = ByteRange {
    start: 322_560_028,
    end: 322_560_155,
};

/// Ignition-like layout that is small enough to be served in full.
fn small_layout() -> TranscriptLayout {
    TranscriptLayout {
        g1_points: 32,
        ..TranscriptLayout::IGNITION
    }
}

fn g1_range(num_points: u64) -> ByteRange {
    ByteRange::with_len(28, num_points * 64)
}

fn assert_not_loaded(crs: &Crs) {
    assert_eq!(crs.g1_data(), Err(CrsError::NotLoaded));
    assert_eq!(crs.g2_point(), Err(CrsError::NotLoaded));
    assert_eq!(crs.reference_string(), Err(CrsError::NotLoaded));
}

#[test]
fn construction_validates_size() {
    for &num_points in &[0i64, -1, 5_040_001] {
        assert_eq!(
            Crs::new(num_points).unwrap_err(),
            CrsError::InvalidRequestSize {
                requested: num_points,
                max: 5_040_000
            }
        );
    }

    let crs = Crs::new(5_040_000).unwrap();
    assert_eq!(crs.num_points(), 5_040_000);
    assert_eq!(crs.status(), CrsStatus::Uninitialized);
    assert_eq!(crs.failure(), None);
    assert_not_loaded(&crs);
}

#[test]
fn construction_validates_layout() {
    let layout = TranscriptLayout {
        g2_point_size: 0,
        ..TranscriptLayout::IGNITION
    };
    assert!(matches!(
        Crs::with_layout(1, layout),
        Err(CrsError::InvalidLayout(_))
    ));
}

#[tokio::test]
async fn retrieve_populates_buffers() {
    let mock = MockTranscript::for_layout(&TranscriptLayout::IGNITION);
    let crs = Crs::new(17).unwrap();

    let reference_string = crs.retrieve(&mock).await.unwrap();

    assert_eq!(crs.status(), CrsStatus::Ready);
    assert_eq!(crs.reference_string(), Ok(reference_string));

    let g1_data = crs.g1_data().unwrap();
    assert_eq!(g1_data.len(), 17 * 64);
    assert_eq!(g1_data, mock.bytes_at(g1_range(17)));

    let g2_point = crs.g2_point().unwrap();
    assert_eq!(g2_point.len(), 128);
    assert_eq!(g2_point, mock.bytes_at(G2_RANGE));
}

#[tokio::test]
async fn full_body_response() {
    let mock = MockTranscript::for_layout(&small_layout())
        .with_behaviour(ServerBehaviour::IgnoreRange);
    let crs = Crs::with_layout(8, small_layout()).unwrap();

    assert_eq!(
        crs.retrieve(&mock).await,
        Err(CrsError::UnexpectedStatus { status: 200 })
    );
    assert_eq!(crs.status(), CrsStatus::Failed);
    assert_eq!(
        crs.failure(),
        Some(CrsError::UnexpectedStatus { status: 200 })
    );
    assert_not_loaded(&crs);
}

#[tokio::test]
async fn short_body() {
    let mock = MockTranscript::for_layout(&TranscriptLayout::IGNITION)
        .with_behaviour(ServerBehaviour::TruncateBody(1));
    let crs = Crs::new(2).unwrap();

    let result = crs.retrieve(&mock).await;
    assert!(matches!(result, Err(CrsError::LengthMismatch { .. })));
    assert_eq!(crs.status(), CrsStatus::Failed);
    assert_not_loaded(&crs);
}

#[tokio::test]
async fn transport_failure() {
    let mock = MockTranscript::for_layout(&TranscriptLayout::IGNITION)
        .with_behaviour(ServerBehaviour::Unreachable);
    let crs = Crs::new(1).unwrap();

    assert!(matches!(
        crs.retrieve(&mock).await,
        Err(CrsError::Transport(_))
    ));
    assert!(matches!(crs.failure(), Some(CrsError::Transport(_))));
    assert_not_loaded(&crs);
}

#[tokio::test]
async fn one_range_failing() {
    // The G1 range is served, the G2 one is not.
    let layout = TranscriptLayout::IGNITION;
    let mock = MockTranscript::for_layout(&layout)
        .with_behaviour(ServerBehaviour::UnreachableFrom(layout.g2_offset()));
    let crs = Crs::new(6).unwrap();

    assert!(matches!(
        crs.retrieve(&mock).await,
        Err(CrsError::Transport(_))
    ));
    assert_eq!(crs.status(), CrsStatus::Failed);
    assert!(matches!(crs.failure(), Some(CrsError::Transport(_))));
    assert_not_loaded(&crs);

    // The G1 range alone would have been served.
    assert_eq!(
        mock.fetch_range(g1_range(6)).await,
        Ok(mock.bytes_at(g1_range(6)))
    );
}

#[tokio::test]
async fn retrieve_happens_once() {
    let mock = MockTranscript::for_layout(&TranscriptLayout::IGNITION);
    let failing = mock.clone().with_behaviour(ServerBehaviour::Unreachable);

    let ready = Crs::new(1).unwrap();
    ready.retrieve(&mock).await.unwrap();
    let failed = Crs::new(1).unwrap();
    failed.retrieve(&failing).await.unwrap_err();
    let requests = mock.requests().await.len();

    assert_eq!(
        ready.retrieve(&mock).await,
        Err(CrsError::AlreadyRetrieved)
    );
    // The instance keeps its data after a rejected call.
    assert_eq!(ready.status(), CrsStatus::Ready);
    assert_eq!(ready.g1_data().unwrap().len(), 64);

    assert_eq!(
        failed.retrieve(&mock).await,
        Err(CrsError::AlreadyRetrieved)
    );
    assert_eq!(failed.status(), CrsStatus::Failed);
    assert!(matches!(failed.failure(), Some(CrsError::Transport(_))));

    // Rejected calls do not reach the transcript.
    assert_eq!(mock.requests().await.len(), requests);
}

#[tokio::test]
async fn concurrent_retrieve_is_rejected() {
    let mock = MockTranscript::for_layout(&TranscriptLayout::IGNITION)
        .with_latency(Duration::from_millis(50));
    let crs = Crs::new(4).unwrap();

    let (first, second) = tokio::join!(crs.retrieve(&mock), crs.retrieve(&mock));

    // Whichever call started first wins, the other one is rejected.
    let (winner, loser) = if first.is_ok() {
        (first, second)
    } else {
        (second, first)
    };
    assert_eq!(winner.unwrap().g1_data().len(), 4 * 64);
    assert_eq!(loser, Err(CrsError::RetrievalInProgress));
    assert_eq!(crs.status(), CrsStatus::Ready);
    assert_eq!(mock.requests().await.len(), 2);
}

#[tokio::test]
async fn cancellation_reaches_both_requests() {
    let mock = MockTranscript::for_layout(&TranscriptLayout::IGNITION)
        .with_latency(Duration::from_secs(60));
    let crs = Crs::new(4).unwrap();

    let timed_out = tokio::time::timeout(Duration::from_millis(50), crs.retrieve(&mock)).await;

    assert!(timed_out.is_err());
    assert_eq!(mock.requests().await.len(), 2);
    assert_eq!(mock.in_flight(), 0);
    assert_eq!(crs.status(), CrsStatus::Failed);
    assert_eq!(crs.failure(), Some(CrsError::Cancelled));
    assert_not_loaded(&crs);
}

#[tokio::test]
async fn instances_are_independent() {
    let mock = MockTranscript::for_layout(&TranscriptLayout::IGNITION)
        .with_latency(Duration::from_millis(10));
    let small = Crs::new(3).unwrap();
    let large = Crs::new(1000).unwrap();

    let (small_result, large_result) = tokio::join!(small.retrieve(&mock), large.retrieve(&mock));
    small_result.unwrap();
    large_result.unwrap();

    assert_eq!(small.g1_data().unwrap(), mock.bytes_at(g1_range(3)));
    assert_eq!(large.g1_data().unwrap(), mock.bytes_at(g1_range(1000)));
    assert_eq!(small.g2_point().unwrap(), mock.bytes_at(G2_RANGE));
    assert_eq!(large.g2_point().unwrap(), mock.bytes_at(G2_RANGE));
    assert_eq!(mock.requests().await.len(), 4);
}

#[tokio::test]
async fn ready_instance_is_shareable() {
    let mock = MockTranscript::for_layout(&TranscriptLayout::IGNITION);
    let crs = Arc::new(Crs::new(5).unwrap());
    crs.retrieve(&mock).await.unwrap();

    let readers: Vec<_> = (0..4)
        .map(|_| {
            let crs = crs.clone();
            tokio::spawn(async move { crs.g1_data() })
        })
        .collect();

    for reader in readers {
        let g1_data = reader.await.unwrap().unwrap();
        assert_eq!(g1_data, mock.bytes_at(g1_range(5)));
    }
}

#[tokio::test]
async fn retrieval_runs_on_spawned_task() {
    let mock = MockTranscript::for_layout(&TranscriptLayout::IGNITION);
    let crs = Arc::new(Crs::new(2).unwrap());

    let task = {
        let crs = crs.clone();
        let mock = mock.clone();
        tokio::spawn(async move { crs.retrieve(&mock).await })
    };

    task.await.unwrap().unwrap();
    assert_eq!(crs.g1_data().unwrap(), mock.bytes_at(g1_range(2)));
}
