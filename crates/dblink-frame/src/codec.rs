use bytes::{BufMut, BytesMut};
use tracing::warn;

use crate::error::{FrameError, Result};

/// Size of the length prefix on every response chunk.
pub const LEN_PREFIX_SIZE: usize = 4;

/// Maximum number of query bytes placed on the wire.
///
/// Longer queries are silently truncated; the server never sees the excess.
pub const MAX_QUERY_BYTES: usize = 65535;

/// The 4-character sequence marking the end of a logical response.
pub const TERMINATOR: &str = "\r\n\r\n";

/// Default upper bound on a single declared chunk length: 16 MiB.
///
/// The server's send spool is a few kilobytes, so a prefix anywhere near
/// this bound means the stream is corrupt, not that the reply is large.
pub const DEFAULT_MAX_CHUNK: usize = 16 * 1024 * 1024;

/// Append the wire form of a query to `dst` and return the byte count
/// actually enqueued.
///
/// Requests carry no length prefix or delimiter. The query is cut at the
/// 65535-byte mark even if that lands inside a multi-byte code point; the
/// protocol has always shipped the bare byte prefix and the server
/// tolerates it.
pub fn encode_query(query: &str, dst: &mut BytesMut) -> usize {
    let bytes = query.as_bytes();
    let len = bytes.len().min(MAX_QUERY_BYTES);
    if len < bytes.len() {
        warn!(
            sent = len,
            dropped = bytes.len() - len,
            "query truncated to wire limit"
        );
    }
    dst.extend_from_slice(&bytes[..len]);
    len
}

/// Decode a chunk length prefix.
///
/// The prefix is unsigned 32-bit little-endian. Values above `max` are
/// rejected as corruption before any allocation happens.
pub fn decode_len(prefix: [u8; LEN_PREFIX_SIZE], max: usize) -> Result<usize> {
    let len = u32::from_le_bytes(prefix) as usize;
    if len > max {
        return Err(FrameError::ChunkTooLarge { size: len, max });
    }
    Ok(len)
}

/// Decode one chunk payload into text, stripping trailing NUL padding.
///
/// Embedded NULs are left in place; only the padding tail is removed.
pub fn decode_chunk(payload: &[u8]) -> Result<&str> {
    let text = std::str::from_utf8(payload)?;
    Ok(text.trim_end_matches('\0'))
}

/// Encode a response chunk (length prefix + payload) into `dst`.
///
/// This is the sending side of the response framing. The client itself
/// never emits chunks, but mock servers in tests do.
pub fn encode_chunk(payload: &[u8], dst: &mut BytesMut) -> Result<()> {
    if payload.len() > u32::MAX as usize {
        return Err(FrameError::PayloadTooLarge {
            size: payload.len(),
            max: u32::MAX as usize,
        });
    }
    dst.reserve(LEN_PREFIX_SIZE + payload.len());
    dst.put_u32_le(payload.len() as u32);
    dst.put_slice(payload);
    Ok(())
}
