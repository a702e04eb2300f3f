//! Decoding pipeline for the SSE-shaped agent event stream.
//!
//! Raw response bytes pass through three stages:
//!
//! 1. [`Utf8Decoder`] — incremental UTF-8 decoding; a multi-byte
//!    character may span chunk boundaries.
//! 2. [`FrameSplitter`] — splits decoded text into frames on the
//!    `"\n\n"` delimiter, buffering the incomplete tail.
//! 3. [`decode_frame`] — parses a `"data: "` frame payload into an
//!    [`Event`], dropping anything undecodable.
//!
//! [`SseDecoder`] composes the three for the common bytes-in,
//! events-out case.

use log::{debug, warn};
use opchat_core::event::Event;

/// Frame boundary on the wire.
pub const FRAME_DELIMITER: &str = "\n\n";

/// Prefix marking a frame as an event payload carrier.
pub const DATA_PREFIX: &str = "data: ";

/// Incremental UTF-8 decoder.
///
/// Keeps the trailing bytes of an incomplete character between calls,
/// so chunk boundaries inside a multi-byte character do not corrupt the
/// output. Invalid byte sequences are replaced with U+FFFD and decoding
/// continues.
#[derive(Debug, Default)]
pub struct Utf8Decoder {
    pending: Vec<u8>,
}

impl Utf8Decoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decodes the next chunk, including any bytes held over from the
    /// previous call.
    pub fn decode(&mut self, chunk: &[u8]) -> String {
        self.pending.extend_from_slice(chunk);
        let mut out = String::with_capacity(self.pending.len());
        let mut rest: &[u8] = &self.pending;

        loop {
            match std::str::from_utf8(rest) {
                Ok(valid) => {
                    out.push_str(valid);
                    rest = &[];
                    break;
                }
                Err(err) => {
                    let (valid, after) = rest.split_at(err.valid_up_to());
                    if let Ok(s) = std::str::from_utf8(valid) {
                        out.push_str(s);
                    }
                    match err.error_len() {
                        // Invalid sequence: substitute and move on.
                        Some(len) => {
                            out.push(char::REPLACEMENT_CHARACTER);
                            rest = &after[len..];
                        }
                        // Incomplete trailing character: hold it for
                        // the next chunk.
                        None => {
                            rest = after;
                            break;
                        }
                    }
                }
            }
        }

        self.pending = rest.to_vec();
        out
    }
}

/// Splits an unbounded sequence of text chunks into complete frames.
///
/// A frame ends at the literal `"\n\n"` delimiter; whatever follows the
/// last delimiter stays buffered until a later chunk completes it.
/// Frames are emitted in completion order, and an emitted frame may be
/// the empty string (filtered downstream, not here).
#[derive(Debug, Default)]
pub struct FrameSplitter {
    buffer: String,
}

impl FrameSplitter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feeds one chunk and returns every frame it completed.
    pub fn push(&mut self, chunk: &str) -> Vec<String> {
        self.buffer.push_str(chunk);

        let mut frames = Vec::new();
        while let Some(pos) = self.buffer.find(FRAME_DELIMITER) {
            frames.push(self.buffer[..pos].to_string());
            self.buffer.drain(..pos + FRAME_DELIMITER.len());
        }
        frames
    }

    /// Ends the stream. A non-empty remainder is an incomplete frame
    /// per protocol and is discarded, never flushed as if complete.
    pub fn close(self) {
        if !self.buffer.is_empty() {
            debug!(
                "discarding {} bytes of incomplete trailing frame",
                self.buffer.len()
            );
        }
    }
}

/// Turns one frame into zero or one decoded event.
///
/// Frames without the `"data: "` prefix (blank keep-alives, comments,
/// `id:`/`retry:` fields) are not event carriers and yield nothing.
/// A payload that fails to decode is logged and skipped; a bad frame
/// never ends the stream.
pub fn decode_frame(frame: &str) -> Option<Event> {
    let payload = frame.strip_prefix(DATA_PREFIX)?;
    match Event::decode(payload) {
        Ok(event) => Some(event),
        Err(err) => {
            warn!("skipping undecodable frame: {err}; payload: {payload}");
            None
        }
    }
}

/// Bytes-in, events-out composition of the decode stages.
#[derive(Debug, Default)]
pub struct SseDecoder {
    utf8: Utf8Decoder,
    splitter: FrameSplitter,
}

impl SseDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feeds one raw chunk and returns every event it completed.
    pub fn push_bytes(&mut self, chunk: &[u8]) -> Vec<Event> {
        let text = self.utf8.decode(chunk);
        self.splitter
            .push(&text)
            .iter()
            .filter_map(|frame| decode_frame(frame))
            .collect()
    }

    pub fn close(self) {
        self.splitter.close();
    }
}
