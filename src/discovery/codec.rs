//! NDJSON codec for MCP server streams.
//!
//! Wraps [`tokio_util::codec::LinesCodec`] with a configurable maximum line
//! length to prevent memory exhaustion caused by unterminated or
//! maliciously large messages from a misbehaving server process.
//!
//! Bytes not yet terminated by a newline stay buffered inside the codec and
//! are prefixed to the next chunk, so a message split across reads
//! reassembles byte-exactly regardless of chunk boundaries.

use bytes::BytesMut;
use tokio_util::codec::{Decoder, LinesCodec, LinesCodecError};

use crate::{AppError, Result};

/// Maximum line length accepted by the discovery codec: 1 MiB.
///
/// Lines exceeding this limit on the inbound stream cause
/// [`NdjsonCodec::decode`] to return [`AppError::Protocol`] with
/// `"line too long"` rather than allocating unbounded memory.
pub const MAX_LINE_BYTES: usize = 1_048_576;

/// NDJSON codec for the server's output stream.
///
/// Delegates line-framing to [`LinesCodec`] with a fixed
/// [`MAX_LINE_BYTES`] limit. Each newline-terminated (`\n`) UTF-8 string
/// is one complete protocol message. A chunk containing only the delimiter
/// decodes to one empty line, which downstream classification discards.
#[derive(Debug)]
pub struct NdjsonCodec(LinesCodec);

impl NdjsonCodec {
    /// Create a new `NdjsonCodec` with the default [`MAX_LINE_BYTES`] limit.
    #[must_use]
    pub fn new() -> Self {
        Self(LinesCodec::new_with_max_length(MAX_LINE_BYTES))
    }
}

impl Default for NdjsonCodec {
    fn default() -> Self {
        Self::new()
    }
}

impl Decoder for NdjsonCodec {
    type Item = String;
    type Error = AppError;

    /// Decode the next newline-terminated line from `src`.
    ///
    /// Returns `Ok(None)` when `src` contains no complete line yet; the
    /// partial tail stays buffered for the next call.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Protocol("line too long: …")` when the line
    /// exceeds [`MAX_LINE_BYTES`], or `AppError::Io` on stream failure.
    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>> {
        self.0.decode(src).map_err(map_codec_error)
    }

    /// Decode the final, possibly unterminated line when the stream
    /// reaches EOF.
    ///
    /// # Errors
    ///
    /// Same mapping as [`NdjsonCodec::decode`].
    fn decode_eof(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>> {
        self.0.decode_eof(src).map_err(map_codec_error)
    }
}

// ── Private helper ────────────────────────────────────────────────────────────

/// Map a [`LinesCodecError`] to an [`AppError`].
fn map_codec_error(e: LinesCodecError) -> AppError {
    match e {
        LinesCodecError::MaxLineLengthExceeded => {
            AppError::Protocol(format!("line too long: exceeded {MAX_LINE_BYTES} bytes"))
        }
        LinesCodecError::Io(io_err) => AppError::Io(io_err.to_string()),
    }
}
