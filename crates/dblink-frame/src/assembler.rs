use tracing::trace;

use crate::codec::TERMINATOR;

/// Accumulates decoded chunk text until the response terminator appears.
///
/// The terminator check runs against the full accumulated tail, not against
/// each chunk in isolation, so `"\r\n\r\n"` split across two chunk frames
/// still ends the response.
#[derive(Debug, Default)]
pub struct ResponseAssembler {
    buf: String,
}

impl ResponseAssembler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one decoded chunk. Returns `true` once the accumulated text
    /// ends with the terminator.
    pub fn push(&mut self, chunk: &str) -> bool {
        self.buf.push_str(chunk);
        trace!(
            chunk_len = chunk.len(),
            total = self.buf.len(),
            "chunk accumulated"
        );
        self.buf.ends_with(TERMINATOR)
    }

    /// The text accumulated so far, terminator included if present.
    ///
    /// Used for diagnostics when a response has to be abandoned
    /// mid-assembly.
    pub fn partial(&self) -> &str {
        &self.buf
    }

    /// Finish assembly, stripping the terminator if present.
    pub fn finish(mut self) -> String {
        if self.buf.ends_with(TERMINATOR) {
            self.buf.truncate(self.buf.len() - TERMINATOR.len());
        }
        self.buf
    }
}
