use std::time::Duration;

/// Errors that can occur in transport operations.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// Connection establishment exceeded the configured deadline.
    #[error("connect to {addr} timed out after {timeout:?}")]
    ConnectTimeout { addr: String, timeout: Duration },

    /// Failed to connect to the specified address.
    #[error("failed to connect to {addr}: {source}")]
    Connect {
        addr: String,
        source: std::io::Error,
    },

    /// A blocking read or write exceeded the configured timeout.
    #[error("operation timed out after {timeout:?}")]
    TimedOut { timeout: Duration },

    /// The peer closed the connection before the requested byte count was
    /// transferred.
    #[error("connection closed by peer after {got} of {want} bytes")]
    Closed { got: usize, want: usize },

    /// I/O was attempted on a connection that has been closed locally.
    #[error("connection is closed")]
    NotConnected,

    /// An I/O error occurred on the socket.
    #[error("transport I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, TransportError>;
