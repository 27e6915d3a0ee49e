// Built-in uses
use std::{
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    },
    time::Duration,
};
// External uses
use async_trait::async_trait;
use bytes::Bytes;
use reqwest::StatusCode;
use tokio::sync::{Barrier, RwLock};
// Local uses
use super::{check_length, check_status, RangeFetcher};
use crate::{error::CrsError, layout::ByteRange, layout::TranscriptLayout};

/// How the mocked server answers range requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServerBehaviour {
    /// Answers with `206 Partial Content` and the requested bytes.
    Honest,
    /// Ignores the `Range` header and answers `200 OK` with the whole file.
    IgnoreRange,
    /// Answers with `206 Partial Content`, but drops the given amount of trailing bytes.
    TruncateBody(u64),
    /// Every request fails on the transport level.
    Unreachable,
    /// Requests starting at or past the given offset fail on the transport level,
    /// the others are answered honestly.
    UnreachableFrom(u64),
}

#[derive(Debug)]
enum Content {
    Data(Bytes),
    /// `len` bytes of [`pattern_byte`], generated on demand.
    Pattern { len: u64 },
}

/// Byte stored at `offset` of a patterned transcript.
///
/// Neighbouring bytes differ, as do bytes 256 positions apart, so a range read
/// at a wrong offset never matches the expected one.
pub fn pattern_byte(offset: u64) -> u8 {
    (offset ^ (offset >> 8) ^ (offset >> 16) ^ (offset >> 24) ^ (offset >> 32)) as u8
}

/// Mock transcript server is capable of recording all the incoming range requests
/// for the further analysis.
#[derive(Debug, Clone)]
pub struct MockTranscript {
    content: Arc<Content>,
    behaviour: ServerBehaviour,
    latency: Option<Duration>,
    rendezvous: Option<Arc<Barrier>>,
    requests: Arc<RwLock<Vec<ByteRange>>>,
    in_flight: Arc<AtomicUsize>,
}

impl MockTranscript {
    /// Transcript consisting of the provided bytes.
    pub fn new(data: impl Into<Bytes>) -> Self {
        Self::with_content(Content::Data(data.into()))
    }

    /// Transcript of `len` patterned bytes. Nothing is allocated up front, so it
    /// can emulate the full-size ceremony file.
    pub fn patterned(len: u64) -> Self {
        Self::with_content(Content::Pattern { len })
    }

    /// Patterned transcript long enough to hold everything `layout` describes.
    pub fn for_layout(layout: &TranscriptLayout) -> Self {
        Self::patterned(layout.g2_offset() + layout.g2_point_size)
    }

    fn with_content(content: Content) -> Self {
        Self {
            content: Arc::new(content),
            behaviour: ServerBehaviour::Honest,
            latency: None,
            rendezvous: None,
            requests: Default::default(),
            in_flight: Default::default(),
        }
    }

    pub fn with_behaviour(mut self, behaviour: ServerBehaviour) -> Self {
        self.behaviour = behaviour;
        self
    }

    /// Delays every answer by `latency`.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Holds every request until `requests` of them are in flight at the same time.
    pub fn with_rendezvous(mut self, requests: usize) -> Self {
        self.rendezvous = Some(Arc::new(Barrier::new(requests)));
        self
    }

    pub fn len(&self) -> u64 {
        match self.content.as_ref() {
            Content::Data(data) => data.len() as u64,
            Content::Pattern { len } => *len,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Bytes stored in the transcript at `range`, cut at the end of the file.
    pub fn bytes_at(&self, range: ByteRange) -> Bytes {
        if range.start >= self.len() {
            return Bytes::new();
        }
        let end = range.end.min(self.len() - 1);

        match self.content.as_ref() {
            Content::Data(data) => data.slice(range.start as usize..=end as usize),
            Content::Pattern { .. } => (range.start..=end).map(pattern_byte).collect(),
        }
    }

    /// Returns all the ranges requested so far, in the order of arrival.
    pub async fn requests(&self) -> Vec<ByteRange> {
        self.requests.read().await.clone()
    }

    /// Amount of requests that were started but neither answered nor cancelled.
    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::SeqCst)
    }

    fn respond(&self, range: ByteRange) -> Result<(StatusCode, Bytes), CrsError> {
        if range.start >= self.len() {
            return Ok((StatusCode::RANGE_NOT_SATISFIABLE, Bytes::new()));
        }

        match self.behaviour {
            ServerBehaviour::Honest => Ok((StatusCode::PARTIAL_CONTENT, self.bytes_at(range))),
            ServerBehaviour::IgnoreRange => {
                let whole = ByteRange {
                    start: 0,
                    end: self.len() - 1,
                };
                Ok((StatusCode::OK, self.bytes_at(whole)))
            }
            ServerBehaviour::TruncateBody(missing) => {
                let mut body = self.bytes_at(range);
                body.truncate(body.len().saturating_sub(missing as usize));
                Ok((StatusCode::PARTIAL_CONTENT, body))
            }
            ServerBehaviour::Unreachable => Err(CrsError::transport("connection refused")),
            ServerBehaviour::UnreachableFrom(offset) if range.start >= offset => {
                Err(CrsError::transport("connection reset"))
            }
            ServerBehaviour::UnreachableFrom(_) => {
                Ok((StatusCode::PARTIAL_CONTENT, self.bytes_at(range)))
            }
        }
    }
}

/// Keeps [`MockTranscript::in_flight`] accurate when a request future is dropped.
struct InFlight(Arc<AtomicUsize>);

impl InFlight {
    fn start(counter: &Arc<AtomicUsize>) -> Self {
        counter.fetch_add(1, Ordering::SeqCst);
        Self(counter.clone())
    }
}

impl Drop for InFlight {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl RangeFetcher for MockTranscript {
    async fn fetch_range(&self, range: ByteRange) -> Result<Bytes, CrsError> {
        range.validate()?;
        let _in_flight = InFlight::start(&self.in_flight);
        self.requests.write().await.push(range);

        if let Some(rendezvous) = &self.rendezvous {
            rendezvous.wait().await;
        }
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }

        let (status, body) = self.respond(range)?;
        check_status(status)?;
        check_length(range, &body)?;
        Ok(body)
    }

    fn location(&self) -> String {
        format!("mock://transcript ({} bytes)", self.len())
    }
}
