//! Server-Sent Events (SSE) decoding.
//!
//! The answer service streams its output as SSE. `SseParser` is a
//! line-oriented incremental parser; `sse_data_stream` drives it over any
//! buffered reader and yields each event's `data` payload as one transport
//! fragment. The `[DONE]` sentinel ends the stream.

use futures_util::{StreamExt, TryStreamExt};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, Lines};
use tokio_util::io::StreamReader;

use crate::transport::{FragmentStream, TransportError};

/// Data payload some services send as an explicit end-of-stream marker.
pub const DONE_SENTINEL: &str = "[DONE]";

/// A single SSE event parsed from the stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SseEvent {
    /// The event type, when the server names one.
    pub event: Option<String>,
    /// The event data; multi-line data is joined with `\n`.
    pub data: String,
}

#[derive(Debug, Default)]
pub struct SseParser {
    current_event: Option<String>,
    current_data: String,
    has_data: bool,
}

impl SseParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one line (without its terminator). Returns an event when the
    /// line completes one.
    pub fn feed_line(&mut self, line: &str) -> Option<SseEvent> {
        if line.is_empty() {
            // Empty line = end of event
            return self.take_event();
        }

        if line.starts_with(':') {
            return None;
        }

        let (field, value) = match line.split_once(':') {
            Some((field, value)) => (field, value.strip_prefix(' ').unwrap_or(value)),
            None => (line, ""),
        };

        match field {
            "event" => self.current_event = Some(value.to_string()),
            "data" => {
                if self.has_data {
                    self.current_data.push('\n');
                }
                self.current_data.push_str(value);
                self.has_data = true;
            }
            // id, retry and unknown fields carry nothing we use
            _ => {}
        }
        None
    }

    /// Flush a trailing event that was not followed by a blank line.
    pub fn finish(&mut self) -> Option<SseEvent> {
        self.take_event()
    }

    fn take_event(&mut self) -> Option<SseEvent> {
        let event = self.current_event.take();
        if !self.has_data {
            return None;
        }
        self.has_data = false;
        Some(SseEvent {
            event,
            data: std::mem::take(&mut self.current_data),
        })
    }
}

struct SseState<R> {
    lines: Lines<R>,
    parser: SseParser,
    finished: bool,
}

/// Decode an SSE body from any buffered reader into data fragments.
pub fn sse_data_stream<R>(reader: R) -> FragmentStream
where
    R: AsyncBufRead + Unpin + Send + 'static,
{
    let state = SseState {
        lines: reader.lines(),
        parser: SseParser::new(),
        finished: false,
    };

    futures_util::stream::unfold(state, |mut state| async move {
        if state.finished {
            return None;
        }
        loop {
            match state.lines.next_line().await {
                Ok(Some(line)) => {
                    if let Some(event) = state.parser.feed_line(&line) {
                        if event.data == DONE_SENTINEL {
                            return None;
                        }
                        return Some((Ok(event.data), state));
                    }
                }
                Ok(None) => {
                    state.finished = true;
                    let tail = state.parser.finish();
                    return tail
                        .filter(|event| event.data != DONE_SENTINEL)
                        .map(move |event| (Ok(event.data), state));
                }
                Err(e) => {
                    state.finished = true;
                    return Some((Err(TransportError::Network(e.to_string())), state));
                }
            }
        }
    })
    .boxed()
}

/// Decode the SSE body of a reqwest response into data fragments.
pub fn sse_fragments(response: reqwest::Response) -> FragmentStream {
    let byte_stream = response.bytes_stream().map_err(std::io::Error::other);
    let reader = tokio::io::BufReader::new(StreamReader::new(byte_stream));
    sse_data_stream(reader)
}
