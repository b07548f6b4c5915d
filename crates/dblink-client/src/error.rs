use std::time::Duration;

use dblink_frame::FrameError;
use dblink_transport::TransportError;

/// Errors surfaced by client operations.
///
/// Every failure of an exchange comes back as a tagged variant rather than
/// tearing down the process; callers decide whether to retry, reconnect, or
/// give up.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// Connection establishment failed.
    #[error("connect failed: {0}")]
    Connect(#[source] TransportError),

    /// The peer reset or closed the connection while a request was in
    /// flight.
    #[error("connection lost: {0}")]
    ConnectionLost(#[source] TransportError),

    /// A blocking operation exceeded the configured timeout.
    #[error("timed out after {0:?}")]
    TimedOut(Duration),

    /// The peer finished the TCP conversation before a complete response
    /// was assembled.
    #[error("peer disconnected mid-response: {0}")]
    Disconnected(#[source] TransportError),

    /// The response stream carried a malformed frame.
    #[error("frame error: {0}")]
    Frame(#[from] FrameError),

    /// The assembled response was not valid JSON.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ClientError>;
