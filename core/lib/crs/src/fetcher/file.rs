// Built-in uses
use std::{
    io::SeekFrom,
    path::{Path, PathBuf},
};
// External uses
use async_trait::async_trait;
use bytes::Bytes;
use tokio::{
    fs::File,
    io::{AsyncReadExt, AsyncSeekExt},
};
// Local uses
use super::{check_length, RangeFetcher};
use crate::{error::CrsError, layout::ByteRange};

/// Reads transcript ranges from a local copy of the transcript.
#[derive(Debug, Clone)]
pub struct FileRangeFetcher {
    path: PathBuf,
}

impl FileRangeFetcher {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl RangeFetcher for FileRangeFetcher {
    async fn fetch_range(&self, range: ByteRange) -> Result<Bytes, CrsError> {
        range.validate()?;
        let io_error = |err: std::io::Error| {
            CrsError::transport(format!(
                "failed to read transcript file {}: {}",
                self.path.display(),
                err
            ))
        };

        let mut file = File::open(&self.path).await.map_err(io_error)?;
        file.seek(SeekFrom::Start(range.start))
            .await
            .map_err(io_error)?;

        // A file shorter than the range yields fewer bytes, caught by the length check.
        let mut buf = Vec::with_capacity(range.len() as usize);
        file.take(range.len())
            .read_to_end(&mut buf)
            .await
            .map_err(io_error)?;

        let body = Bytes::from(buf);
        check_length(range, &body)?;
        Ok(body)
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn transcript_file(name: &str, len: u8) -> PathBuf {
        let path = std::env::temp_dir().join(format!(
            "ignition_crs_{}_{}.dat",
            name,
            std::process::id()
        ));
        let data: Vec<u8> = (0..len).collect();
        std::fs::write(&path, data).expect("failed to write test transcript");
        path
    }

    #[tokio::test]
    async fn reads_exact_range() {
        let path = transcript_file("exact", 100);
        let fetcher = FileRangeFetcher::new(&path);

        let body = fetcher.fetch_range(ByteRange { start: 10, end: 13 }).await;
        assert_eq!(body, Ok(Bytes::from_static(&[10, 11, 12, 13])));

        let last = fetcher.fetch_range(ByteRange { start: 99, end: 99 }).await;
        assert_eq!(last, Ok(Bytes::from_static(&[99])));

        std::fs::remove_file(path).ok();
    }

    #[tokio::test]
    async fn short_file() {
        let path = transcript_file("short", 16);
        let fetcher = FileRangeFetcher::new(&path);

        let body = fetcher.fetch_range(ByteRange { start: 12, end: 19 }).await;
        assert_eq!(
            body,
            Err(CrsError::LengthMismatch {
                expected: 8,
                actual: 4
            })
        );

        let past_end = fetcher.fetch_range(ByteRange { start: 32, end: 33 }).await;
        assert_eq!(
            past_end,
            Err(CrsError::LengthMismatch {
                expected: 2,
                actual: 0
            })
        );

        std::fs::remove_file(path).ok();
    }

    #[tokio::test]
    async fn missing_file() {
        let fetcher = FileRangeFetcher::new("/nonexistent/ignition/transcript00.dat");
        let body = fetcher.fetch_range(ByteRange { start: 0, end: 0 }).await;
        assert!(matches!(body, Err(CrsError::Transport(_))));
    }
}
