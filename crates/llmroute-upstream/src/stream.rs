//! Pull-based line decoding for streamed backend bodies.
//!
//! Both backends stream one event per line: Ollama sends NDJSON, OpenAI
//! sends SSE `data:` lines. The byte stream is split on `\n` here and each
//! complete line is handed to a provider decoder. A new chunk is only read
//! from the backend when the buffer holds no complete line, so consumption
//! drives the network.
//!
//! ```text
//! AWAITING_LINE --decode--> Fragment --> emit, AWAITING_LINE
//!                       \-> Skip     --> AWAITING_LINE
//!                       \-> Finish   --> (emit last) TERMINATE
//! end of body ------------------------> TERMINATE
//! ```

use std::fmt;

use bytes::{Bytes, BytesMut};
use futures_util::{Stream, StreamExt, stream::BoxStream};
use llmroute_core::{FragmentStream, RouteError};
use tracing::warn;

/// Result of decoding one non-empty line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineEvent {
    /// Emit this fragment and keep reading.
    Fragment(String),
    /// Nothing to emit (malformed JSON, foreign line, no content).
    Skip,
    /// The backend signalled completion, optionally with a last fragment.
    Finish(Option<String>),
}

/// Decoder for a single trimmed, non-empty line.
pub type LineDecoder = fn(&str) -> LineEvent;

/// State threaded through the `unfold` stream.
struct LineState {
    stream: BoxStream<'static, Result<Bytes, String>>,
    buf: BytesMut,
    decode: LineDecoder,
    done: bool,
}

impl LineState {
    /// Decode one raw line, returning an item to yield if there is one.
    fn apply(&mut self, raw: &[u8]) -> Option<String> {
        let text = String::from_utf8_lossy(raw);
        let line = text.trim();
        if line.is_empty() {
            return None;
        }

        match (self.decode)(line) {
            LineEvent::Fragment(fragment) => Some(fragment),
            LineEvent::Skip => None,
            LineEvent::Finish(last) => {
                self.done = true;
                last
            }
        }
    }
}

/// Turn a backend byte stream into a stream of text fragments.
///
/// A transport error while reading is yielded once as
/// [`RouteError::Transport`] and ends the stream. Bytes left over without a
/// trailing newline when the body ends are decoded as a final line.
pub fn fragment_stream<S, E>(byte_stream: S, decode: LineDecoder) -> FragmentStream
where
    S: Stream<Item = Result<Bytes, E>> + Send + 'static,
    E: fmt::Display + Send + 'static,
{
    let state = LineState {
        stream: byte_stream.map(|chunk| chunk.map_err(|e| e.to_string())).boxed(),
        buf: BytesMut::new(),
        decode,
        done: false,
    };

    futures_util::stream::unfold(state, |mut st| async move {
        loop {
            if st.done {
                return None;
            }

            if let Some(line_end) = find_newline(&st.buf) {
                let line = st.buf.split_to(line_end);
                if let Some(fragment) = st.apply(&line) {
                    return Some((Ok(fragment), st));
                }
                continue;
            }

            match st.stream.next().await {
                Some(Ok(chunk)) => {
                    st.buf.extend_from_slice(&chunk);
                }
                Some(Err(e)) => {
                    warn!("Upstream stream error: {e}");
                    st.done = true;
                    return Some((Err(RouteError::transport(e)), st));
                }
                None => {
                    let rest = st.buf.split();
                    let last = st.apply(&rest);
                    st.done = true;
                    return last.map(|fragment| (Ok(fragment), st));
                }
            }
        }
    })
    .boxed()
}

/// Find the next newline in the buffer, returning the position after it.
fn find_newline(buf: &BytesMut) -> Option<usize> {
    buf.iter().position(|&b| b == b'\n').map(|pos| pos + 1)
}
