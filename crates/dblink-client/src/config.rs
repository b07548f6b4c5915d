use std::time::Duration;

use dblink_frame::DEFAULT_MAX_CHUNK;

/// Default timeout applied to connect and every subsequent read and write.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(300);

/// Configuration for a [`DbClient`](crate::DbClient).
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Timeout bounding connection establishment and each blocking read or
    /// write. One value applies to all three.
    pub timeout: Duration,
    /// Upper bound on a single declared response chunk length.
    pub max_chunk_size: usize,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            max_chunk_size: DEFAULT_MAX_CHUNK,
        }
    }
}
