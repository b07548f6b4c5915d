//! Wire codec and response assembly for the dblink text protocol.
//!
//! Requests are the raw UTF-8 bytes of the query, capped at 65535 bytes,
//! with no delimiter; the server's own receive loop bounds them. Responses
//! arrive as a sequence of chunks, each framed as:
//! - A 4-byte little-endian unsigned payload length
//! - That many bytes of UTF-8 text, possibly NUL-padded
//!
//! The logical response is complete when the decoded, accumulated text ends
//! with the terminator `"\r\n\r\n"`.
//!
//! This crate is pure — no I/O happens here. `dblink-client` drives a
//! transport with these routines.

pub mod assembler;
pub mod codec;
pub mod error;
pub mod hex;

pub use assembler::ResponseAssembler;
pub use codec::{
    decode_chunk, decode_len, encode_chunk, encode_query, DEFAULT_MAX_CHUNK, LEN_PREFIX_SIZE,
    MAX_QUERY_BYTES, TERMINATOR,
};
pub use error::{FrameError, Result};
pub use hex::hex_bytes;
