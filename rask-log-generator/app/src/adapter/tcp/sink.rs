//! Connection-per-record TCP sink.
//!
//! Every record opens its own connection to the collector, writes one
//! newline-terminated JSON document and closes it again. Failures never reach
//! the caller: they are logged and the record is dropped.

use crate::config::CollectorEndpoint;
use crate::domain::LogRecord;
use crate::port::LineSink;
use std::future::Future;
use std::pin::Pin;
use std::time::Duration;
use thiserror::Error;
use tokio::io::AsyncWriteExt;
use tokio::net::TcpStream;
use tokio::time::timeout;
use tracing::{debug, warn};

const PREVIEW_CHARS: usize = 200;

#[derive(Error, Debug)]
pub enum SinkError {
    #[error("Serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("Connection to {address} failed: {source}")]
    Connect {
        address: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Write to {address} failed: {source}")]
    Write {
        address: String,
        #[source]
        source: std::io::Error,
    },
    #[error("{stage} to {address} timed out after {timeout:?}")]
    Timeout {
        stage: &'static str,
        address: String,
        timeout: Duration,
    },
}

#[derive(Debug, Clone)]
pub struct TcpLineSink {
    endpoint: CollectorEndpoint,
    timeout: Duration,
}

impl TcpLineSink {
    pub fn new(endpoint: CollectorEndpoint, timeout: Duration) -> Self {
        Self { endpoint, timeout }
    }

    pub fn endpoint(&self) -> &CollectorEndpoint {
        &self.endpoint
    }

    /// Deliver one already-encoded line over a fresh connection.
    pub async fn deliver(&self, line: &[u8]) -> Result<(), SinkError> {
        let address = self.endpoint.address();

        let mut stream = timeout(self.timeout, TcpStream::connect(&address))
            .await
            .map_err(|_| SinkError::Timeout {
                stage: "Connection",
                address: address.clone(),
                timeout: self.timeout,
            })?
            .map_err(|source| SinkError::Connect {
                address: address.clone(),
                source,
            })?;

        let write = async {
            stream.write_all(line).await?;
            stream.shutdown().await?;
            Ok::<_, std::io::Error>(())
        };
        timeout(self.timeout, write)
            .await
            .map_err(|_| SinkError::Timeout {
                stage: "Write",
                address: address.clone(),
                timeout: self.timeout,
            })?
            .map_err(|source| SinkError::Write { address, source })
    }

    async fn try_send(&self, record: &LogRecord) -> Result<Vec<u8>, SinkError> {
        let line = record.to_json_line()?;
        self.deliver(&line).await?;
        Ok(line)
    }
}

impl LineSink for TcpLineSink {
    fn send<'a>(&'a self, record: &'a LogRecord) -> Pin<Box<dyn Future<Output = ()> + Send + 'a>> {
        Box::pin(async move {
            match self.try_send(record).await {
                Ok(line) => debug!("Log sent to collector: {}...", preview(&line)),
                Err(e) => warn!("Error sending log to collector: {e}"),
            }
        })
    }
}

/// At most the first `PREVIEW_CHARS` characters of a line, without its terminator.
fn preview(line: &[u8]) -> String {
    String::from_utf8_lossy(line.strip_suffix(b"\n").unwrap_or(line))
        .chars()
        .take(PREVIEW_CHARS)
        .collect()
}
