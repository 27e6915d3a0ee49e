// Built-in uses
use std::time::Duration;
// External uses
use async_trait::async_trait;
use bytes::Bytes;
use reqwest::{header::RANGE, Url};
// Local uses
use super::{check_length, check_status, RangeFetcher};
use crate::{error::CrsError, layout::ByteRange};

/// Reads transcript ranges with HTTP `Range` requests.
#[derive(Debug, Clone)]
pub struct HttpRangeFetcher {
    url: Url,
    // Client keeps connection pool inside, so it is reused for both ranges.
    client: reqwest::Client,
}

impl HttpRangeFetcher {
    pub fn new(url: Url, request_timeout: Duration) -> Result<Self, CrsError> {
        let client = reqwest::ClientBuilder::new()
            .timeout(request_timeout)
            .build()
            .map_err(|err| CrsError::transport(format!("failed to create http client: {}", err)))?;

        Ok(Self::with_client(url, client))
    }

    pub fn with_client(url: Url, client: reqwest::Client) -> Self {
        Self { url, client }
    }
}

#[async_trait]
impl RangeFetcher for HttpRangeFetcher {
    async fn fetch_range(&self, range: ByteRange) -> Result<Bytes, CrsError> {
        range.validate()?;
        vlog::trace!("requesting bytes {} of {}", range, self.url);

        let response = self
            .client
            .get(self.url.clone())
            .header(RANGE, range.header_value())
            .send()
            .await
            .map_err(|err| CrsError::transport(format!("range request failed: {}", err)))?;

        // Checked before the body is read: a server ignoring `Range` would
        // otherwise stream the whole multi-gigabyte transcript.
        check_status(response.status())?;

        let body = response
            .bytes()
            .await
            .map_err(|err| CrsError::transport(format!("failed to read range body: {}", err)))?;
        check_length(range, &body)?;

        Ok(body)
    }

    fn location(&self) -> String {
        self.url.to_string()
    }
}
