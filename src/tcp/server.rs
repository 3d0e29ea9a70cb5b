//! Accept loop and per-connection read/process/write cycle

use std::{
    future::Future,
    io,
    net::SocketAddr,
    time::{Duration, Instant},
};

use tokio::{
    io::{AsyncReadExt, AsyncWriteExt},
    net::{TcpListener, TcpStream},
    task::JoinSet,
    time::{sleep, timeout},
};
use tracing::{error, info, warn};

use crate::dispatch;
use crate::errors::{AppError, TransportError};
use crate::logging::log_exchange;
use crate::protocol::{Response, MAX_REQUEST_BYTES};
use crate::AppState;

/// Pause after a failed accept so persistent errors (e.g. EMFILE) do not spin.
pub const ACCEPT_ERROR_BACKOFF: Duration = Duration::from_millis(100);

pub struct Server {
    listener: TcpListener,
    state: AppState,
}

impl Server {
    pub async fn bind(addr: SocketAddr, state: AppState) -> io::Result<Self> {
        let listener = TcpListener::bind(addr).await?;
        Ok(Self { listener, state })
    }

    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Serves connections until `shutdown` resolves. The listener is closed
    /// first; connections already accepted finish their cycle before this returns.
    pub async fn run_until<F>(self, shutdown: F)
    where
        F: Future<Output = ()>,
    {
        let Self { listener, state } = self;
        let mut connections = JoinSet::new();
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                _ = &mut shutdown => break,
                accepted = listener.accept() => match accepted {
                    Ok((stream, peer)) => {
                        connections.spawn(handle_connection(state.clone(), stream, peer));
                    }
                    Err(err) => back_off_after_accept_error(&err).await,
                },
                Some(joined) = connections.join_next(), if !connections.is_empty() => {
                    if let Err(err) = joined {
                        error!(error = %err, "connection task failed");
                    }
                }
            }
        }

        drop(listener);
        info!(in_flight = connections.len(), "listener closed");

        while let Some(joined) = connections.join_next().await {
            if let Err(err) = joined {
                error!(error = %err, "connection task failed");
            }
        }
    }
}

async fn back_off_after_accept_error(err: &io::Error) {
    error!(error = %err, "failed to accept connection");
    sleep(ACCEPT_ERROR_BACKOFF).await;
}

pub async fn handle_connection(state: AppState, mut stream: TcpStream, peer: SocketAddr) {
    let started_at = Instant::now();

    let (response, request_bytes) = match read_request(&mut stream, state.read_timeout).await {
        Ok(payload) => (dispatch::handle_payload(&state, &payload).await, payload.len()),
        Err(TransportError::Timeout(limit)) => {
            warn!(peer = %peer, timeout_ms = limit.as_millis(), "request read timed out");
            (AppError::bad_request("timeout").into_response(), 0)
        }
        Err(err) => {
            error!(peer = %peer, error = %err, "failed to read request");
            return;
        }
    };

    if let Err(err) = write_response(&mut stream, &response).await {
        error!(peer = %peer, error = %err, "failed to write response");
        return;
    }
    log_exchange(peer, request_bytes, &response, started_at);

    linger(&mut stream, state.read_timeout).await;
}

/// Single bounded read; anything past `MAX_REQUEST_BYTES` is left unread.
async fn read_request(stream: &mut TcpStream, limit: Duration) -> Result<Vec<u8>, TransportError> {
    let mut buffer = [0u8; MAX_REQUEST_BYTES];
    let read = timeout(limit, stream.read(&mut buffer))
        .await
        .map_err(|_| TransportError::Timeout(limit))??;
    Ok(buffer[..read].to_vec())
}

async fn write_response(stream: &mut TcpStream, response: &Response) -> Result<(), TransportError> {
    let encoded = response.encode()?;
    stream.write_all(&encoded).await?;
    stream.flush().await?;
    Ok(())
}

// Closing with unread input pending resets the connection and can discard the
// response on the peer's side, so half-close and discard input until the peer
// closes or `limit` passes.
async fn linger(stream: &mut TcpStream, limit: Duration) {
    if stream.shutdown().await.is_err() {
        return;
    }

    let mut sink = [0u8; MAX_REQUEST_BYTES];
    let _ = timeout(limit, async {
        while let Ok(read) = stream.read(&mut sink).await {
            if read == 0 {
                break;
            }
        }
    })
    .await;
}
