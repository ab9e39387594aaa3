//! Decoding of the chat endpoint's streamed body.
//!
//! The body is newline-delimited text. Lines starting with `data: ` are
//! records; what follows the marker is a fragment of the reply. Any other
//! line (blank, `event:`, comments, stray text) is ignored:
//!
//! ```text
//! data: Hello
//! data:  World
//!
//! ```
//!
//! decodes to the fragments `"Hello"` and `" World"`.
//!
//! The two delivery modes clean records differently. Per-record decoding
//! accepts `\r\n` line endings and strips only the leading marker.
//! Buffered decoding splits on `\n` alone, keeps any `\r`, and removes
//! every `data: ` in a qualifying line, so its output matches the chat
//! service's reference client byte for byte.

use bytes::Bytes;
use futures::{Stream, StreamExt};
use streamchat_core::{StreamError, StreamEvent, StreamOutcome};

use crate::config::DeliveryMode;

/// Marker that makes a line a qualifying record.
pub const DATA_PREFIX: &str = "data: ";

/// Return the payload of `line` if it is a qualifying record.
///
/// Used for per-record delivery. A trailing `\r` is treated as part of the
/// line terminator. Only the leading marker is stripped; the payload is
/// returned verbatim otherwise.
pub fn parse_record(line: &str) -> Option<&str> {
    let line = line.strip_suffix('\r').unwrap_or(line);
    line.strip_prefix(DATA_PREFIX)
}

/// Concatenate the cleaned text of every qualifying line in a whole body.
///
/// Used for buffered delivery. Lines are split on `\n` only and a `\r`
/// stays part of the text. Every occurrence of the marker in a qualifying
/// line is removed, not only the leading one. Returns the empty string when
/// no line qualifies.
pub fn decode_body(body: &str) -> String {
    body.split('\n')
        .filter(|line| line.starts_with(DATA_PREFIX))
        .map(|line| line.replace(DATA_PREFIX, ""))
        .collect()
}

/// Incremental record decoder fed with arbitrary byte chunks.
///
/// Partial lines are kept as raw bytes until their newline arrives, so a
/// multi-byte character split across chunks decodes correctly.
#[derive(Debug, Default)]
pub struct RecordDecoder {
    buf: Vec<u8>,
}

impl RecordDecoder {
    /// Create an empty decoder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one chunk, appending the payload of every line it completed to
    /// `records`.
    ///
    /// Decoding stops at the first line that is not valid UTF-8. Records
    /// from the lines before it are already in `records` when the error is
    /// returned, so the result does not depend on how the body was chunked.
    pub fn push(&mut self, chunk: &[u8], records: &mut Vec<String>) -> Result<(), StreamError> {
        self.buf.extend_from_slice(chunk);

        let mut start = 0;
        let mut result = Ok(());
        while let Some(pos) = self.buf[start..].iter().position(|&b| b == b'\n') {
            let end = start + pos;
            match decode_line(&self.buf[start..end]) {
                Ok(line) => {
                    if let Some(payload) = parse_record(line) {
                        records.push(payload.to_owned());
                    }
                }
                Err(e) => {
                    result = Err(e);
                    break;
                }
            }
            start = end + 1;
        }
        self.buf.drain(..start);

        result
    }

    /// Flush a final line that had no terminating newline.
    pub fn finish(self) -> Result<Option<String>, StreamError> {
        if self.buf.is_empty() {
            return Ok(None);
        }
        Ok(parse_record(decode_line(&self.buf)?).map(str::to_owned))
    }
}

fn decode_line(bytes: &[u8]) -> Result<&str, StreamError> {
    std::str::from_utf8(bytes).map_err(|e| StreamError::Decode(format!("invalid UTF-8 in body: {e}")))
}

/// Turn a body byte stream into [`StreamEvent`]s.
///
/// In [`DeliveryMode::PerRecord`] a fragment is yielded for every record as
/// soon as its line is complete. In [`DeliveryMode::Buffered`] the whole body
/// is read first and exactly one fragment (possibly empty) is yielded. Either
/// way the stream ends with one `Done`; on failure no fragment follows it.
pub fn decode_stream(
    byte_stream: impl Stream<Item = Result<Bytes, StreamError>> + Send + 'static,
    mode: DeliveryMode,
) -> impl Stream<Item = StreamEvent> + Send + 'static {
    async_stream::stream! {
        let mut bytes_stream = std::pin::pin!(byte_stream);

        match mode {
            DeliveryMode::PerRecord => {
                let mut decoder = RecordDecoder::new();

                while let Some(chunk_result) = bytes_stream.next().await {
                    let mut records = Vec::new();
                    let pushed = chunk_result.and_then(|chunk| decoder.push(&chunk, &mut records));
                    for record in records {
                        tracing::trace!(len = record.len(), "decoded record");
                        yield StreamEvent::Fragment(record);
                    }
                    if let Err(e) = pushed {
                        yield StreamEvent::Done(StreamOutcome::Failed(e));
                        return;
                    }
                }

                match decoder.finish() {
                    Ok(Some(record)) => {
                        yield StreamEvent::Fragment(record);
                    }
                    Ok(None) => {}
                    Err(e) => {
                        yield StreamEvent::Done(StreamOutcome::Failed(e));
                        return;
                    }
                }
            }
            DeliveryMode::Buffered => {
                let mut body = Vec::new();

                while let Some(chunk_result) = bytes_stream.next().await {
                    match chunk_result {
                        Ok(chunk) => body.extend_from_slice(&chunk),
                        Err(e) => {
                            yield StreamEvent::Done(StreamOutcome::Failed(e));
                            return;
                        }
                    }
                }

                let text = match String::from_utf8(body) {
                    Ok(text) => text,
                    Err(e) => {
                        yield StreamEvent::Done(StreamOutcome::Failed(StreamError::Decode(
                            format!("invalid UTF-8 in body: {e}"),
                        )));
                        return;
                    }
                };
                let fragment = decode_body(&text);
                tracing::trace!(len = fragment.len(), "decoded buffered body");
                yield StreamEvent::Fragment(fragment);
            }
        }

        yield StreamEvent::Done(StreamOutcome::Completed);
    }
}
