//! # Line Framing
//!
//! Incremental newline splitter over arbitrary byte chunks. Frames are
//! bounded at [`MAX_FRAME_BYTES`]; a final partial frame without a trailing
//! delimiter is tolerated by design, not an error.

use thiserror::Error;

/// Maximum bytes in one line frame, delimiter excluded.
pub const MAX_FRAME_BYTES: usize = 2048;

/// A frame exceeded the size bound before a delimiter arrived.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("line frame exceeds {max} bytes")]
pub struct FrameTooLong {
    /// The configured bound.
    pub max: usize,
}

/// Incremental line splitter.
///
/// Feed byte chunks with [`push`](Self::push); each call returns the lines
/// completed by that chunk, in input order. Call [`finish`](Self::finish) at
/// end-of-stream to flush the tolerated unterminated tail.
pub struct LineFramer {
    buffer: Vec<u8>,
    max_frame: usize,
}

impl Default for LineFramer {
    fn default() -> Self {
        Self::new()
    }
}

impl LineFramer {
    /// Framer with the standard [`MAX_FRAME_BYTES`] bound.
    #[must_use]
    pub fn new() -> Self {
        Self::with_max_frame(MAX_FRAME_BYTES)
    }

    /// Framer with a custom frame bound (tests).
    #[must_use]
    pub fn with_max_frame(max_frame: usize) -> Self {
        Self {
            buffer: Vec::new(),
            max_frame,
        }
    }

    /// Consume one chunk, returning the lines it completed.
    pub fn push(&mut self, chunk: &[u8]) -> Result<Vec<String>, FrameTooLong> {
        self.buffer.extend_from_slice(chunk);

        let mut lines = Vec::new();
        while let Some(pos) = self.buffer.iter().position(|&b| b == b'\n') {
            let rest = self.buffer.split_off(pos + 1);
            let mut frame = std::mem::replace(&mut self.buffer, rest);
            frame.pop(); // delimiter

            if frame.len() > self.max_frame {
                return Err(FrameTooLong { max: self.max_frame });
            }
            lines.push(String::from_utf8_lossy(&frame).into_owned());
        }

        // Reject an over-long partial frame as soon as it is over-long, not
        // only when its delimiter finally shows up.
        if self.buffer.len() > self.max_frame {
            return Err(FrameTooLong { max: self.max_frame });
        }

        Ok(lines)
    }

    /// Flush the final partial frame, if any.
    pub fn finish(self) -> Result<Option<String>, FrameTooLong> {
        if self.buffer.is_empty() {
            return Ok(None);
        }
        if self.buffer.len() > self.max_frame {
            return Err(FrameTooLong { max: self.max_frame });
        }
        Ok(Some(String::from_utf8_lossy(&self.buffer).into_owned()))
    }
}
