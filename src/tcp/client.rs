//! Client side of a CJTP exchange

use std::{io, net::SocketAddr, time::Duration};

use thiserror::Error;
use tokio::{
    io::{AsyncReadExt, AsyncWriteExt},
    net::TcpStream,
    time::timeout,
};

use crate::protocol::{Request, Response};

pub const DEFAULT_CLIENT_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("network error: {0}")]
    Io(#[from] io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("no response within {0:?}")]
    Timeout(Duration),
}

#[derive(Debug, Clone)]
pub struct CjtpClient {
    addr: SocketAddr,
    timeout: Duration,
}

impl CjtpClient {
    pub fn new(addr: SocketAddr) -> Self {
        Self {
            addr,
            timeout: DEFAULT_CLIENT_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub async fn send(&self, request: &Request) -> Result<Response, ClientError> {
        let payload = serde_json::to_vec(request)?;
        self.send_raw(&payload).await
    }

    /// Writes `payload` as-is; used for payloads the `Request` type cannot express.
    pub async fn send_raw(&self, payload: &[u8]) -> Result<Response, ClientError> {
        timeout(self.timeout, self.exchange(payload))
            .await
            .map_err(|_| ClientError::Timeout(self.timeout))?
    }

    async fn exchange(&self, payload: &[u8]) -> Result<Response, ClientError> {
        let mut stream = TcpStream::connect(self.addr).await?;
        stream.write_all(payload).await?;
        stream.shutdown().await?;

        let mut received = Vec::new();
        stream.read_to_end(&mut received).await?;
        Ok(serde_json::from_slice(&received)?)
    }
}
