//! Server-Sent Events (SSE) streaming for the chat completions API.
//!
//! [`SseDecoder`] turns raw body bytes into [`StreamEvent`]s, and
//! [`GroqClient::chat_stream`] wraps a live HTTP response in a lazy
//! [`FragmentStream`] so callers can display output as it arrives. Dropping
//! the stream stops reading from the connection.

use std::collections::VecDeque;
use std::pin::Pin;
use std::time::Instant;

use futures::Stream;
use futures::stream;
use serde::Deserialize;
use tracing::{debug, trace, warn};

use crate::{ChatRequest, GatewayError, GroqClient, UsageInfo};

/// A single event from an SSE stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamEvent {
    /// An incremental text content delta.
    TextDelta(String),
    /// An incremental reasoning delta (only with `reasoning_format: parsed`).
    ReasoningDelta(String),
    /// Token usage information (sent in the final chunk).
    Usage(UsageInfo),
    /// The stream is complete.
    Done,
}

/// Lazy, finite sequence of stream events. Errors end the sequence.
pub type FragmentStream = Pin<Box<dyn Stream<Item = Result<StreamEvent, GatewayError>> + Send>>;

/// Raw SSE data chunk.
#[derive(Deserialize, Debug)]
struct StreamChunk {
    choices: Option<Vec<StreamChoice>>,
    usage: Option<UsageInfo>,
    /// Groq reports usage here instead of the top-level field.
    x_groq: Option<GroqExtension>,
    error: Option<serde_json::Value>,
}

#[derive(Deserialize, Debug)]
struct GroqExtension {
    usage: Option<UsageInfo>,
}

#[derive(Deserialize, Debug)]
struct StreamChoice {
    delta: Option<StreamDelta>,
    finish_reason: Option<String>,
}

#[derive(Deserialize, Debug)]
struct StreamDelta {
    content: Option<String>,
    reasoning: Option<String>,
}

/// Incremental SSE decoder.
///
/// Bytes are buffered until a full line is available, so multi-byte
/// characters split across network chunks decode correctly. After
/// `data: [DONE]` or an in-stream API error, further input is ignored.
#[derive(Debug, Default)]
pub struct SseDecoder {
    buffer: Vec<u8>,
    done: bool,
}

impl SseDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the stream has terminated (`[DONE]`, error, or `finish`).
    pub fn is_done(&self) -> bool {
        self.done
    }

    /// Feed raw bytes and return the events from every complete line.
    pub fn push(&mut self, bytes: &[u8]) -> Vec<Result<StreamEvent, GatewayError>> {
        let mut events = Vec::new();
        if self.done {
            return events;
        }
        self.buffer.extend_from_slice(bytes);

        while let Some(newline_pos) = self.buffer.iter().position(|b| *b == b'\n') {
            let line: Vec<u8> = self.buffer.drain(..=newline_pos).collect();
            self.process_line(&line, &mut events);
            if self.done {
                self.buffer.clear();
                break;
            }
        }
        events
    }

    /// Flush the final (unterminated) line at end of body.
    ///
    /// A body that ends without `[DONE]` is treated as complete.
    pub fn finish(&mut self) -> Vec<Result<StreamEvent, GatewayError>> {
        let mut events = Vec::new();
        if !self.done {
            let remaining = std::mem::take(&mut self.buffer);
            self.process_line(&remaining, &mut events);
        }
        if !self.done {
            self.done = true;
            events.push(Ok(StreamEvent::Done));
        }
        events
    }

    fn process_line(&mut self, raw: &[u8], events: &mut Vec<Result<StreamEvent, GatewayError>>) {
        let line = String::from_utf8_lossy(raw);
        let line = line.trim();
        if line.is_empty() || line.starts_with(':') {
            return;
        }
        let Some(data) = line.strip_prefix("data:") else {
            trace!("Ignoring SSE field: {line}");
            return;
        };
        let data = data.trim_start();
        if data == "[DONE]" {
            events.push(Ok(StreamEvent::Done));
            self.done = true;
            return;
        }
        if parse_sse_data(data, events) {
            self.done = true;
        }
    }
}

/// Parse a single SSE `data:` payload into stream events.
///
/// Returns `true` when the payload carried an API error, which ends the stream.
fn parse_sse_data(data: &str, events: &mut Vec<Result<StreamEvent, GatewayError>>) -> bool {
    let chunk = match serde_json::from_str::<StreamChunk>(data) {
        Ok(chunk) => chunk,
        Err(e) => {
            warn!("Failed to parse SSE chunk: {e} (data: {data})");
            return false;
        }
    };

    if let Some(error) = chunk.error {
        let message = error
            .get("message")
            .and_then(|m| m.as_str())
            .or_else(|| error.as_str())
            .unwrap_or("error during streaming")
            .to_string();
        events.push(Err(GatewayError::Api(message)));
        return true;
    }

    for choice in chunk.choices.unwrap_or_default() {
        if let Some(delta) = choice.delta {
            if let Some(content) = delta.content
                && !content.is_empty()
            {
                events.push(Ok(StreamEvent::TextDelta(content)));
            }
            if let Some(reasoning) = delta.reasoning
                && !reasoning.is_empty()
            {
                events.push(Ok(StreamEvent::ReasoningDelta(reasoning)));
            }
        }
        if choice.finish_reason.is_some() {
            trace!("Stream finish_reason: {:?}", choice.finish_reason);
        }
    }

    if let Some(usage) = chunk.usage.or_else(|| chunk.x_groq.and_then(|x| x.usage)) {
        events.push(Ok(StreamEvent::Usage(usage)));
    }
    false
}

impl GroqClient {
    /// Send a chat completion request with SSE streaming.
    ///
    /// Fails early on transport errors and non-success HTTP statuses. On
    /// success the returned stream reads the body incrementally; read
    /// failures and in-stream API errors surface as its last item.
    pub async fn chat_stream(&self, body: &ChatRequest) -> Result<FragmentStream, GatewayError> {
        let mut stream_body =
            serde_json::to_value(body).map_err(|e| GatewayError::Serialize(e.to_string()))?;
        stream_body["stream"] = serde_json::Value::Bool(true);

        debug!(
            "LLM request: model={}, messages={}, max_tokens={}, temp={:?}, reasoning={:?}",
            body.model,
            body.messages.len(),
            body.max_tokens,
            body.temperature,
            body.reasoning_format,
        );

        let start = Instant::now();
        let resp = self
            .client
            .post(self.completions_url())
            .bearer_auth(&self.api_key)
            .json(&stream_body)
            .send()
            .await
            .map_err(|e| GatewayError::Network(e.to_string()))?;

        let status = resp.status();
        debug!(
            "LLM response: HTTP {} after {:.1}s",
            status,
            start.elapsed().as_secs_f64()
        );

        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            return Err(GatewayError::from_status(status.as_u16(), text));
        }

        Ok(sse_stream(resp))
    }
}

struct SseState {
    resp: reqwest::Response,
    decoder: SseDecoder,
    pending: VecDeque<Result<StreamEvent, GatewayError>>,
    exhausted: bool,
}

fn sse_stream(resp: reqwest::Response) -> FragmentStream {
    let state = SseState {
        resp,
        decoder: SseDecoder::new(),
        pending: VecDeque::new(),
        exhausted: false,
    };

    Box::pin(stream::unfold(state, |mut st| async move {
        loop {
            if let Some(item) = st.pending.pop_front() {
                return Some((item, st));
            }
            if st.exhausted {
                return None;
            }
            match st.resp.chunk().await {
                Ok(Some(bytes)) => st.pending.extend(st.decoder.push(&bytes)),
                Ok(None) => {
                    st.pending.extend(st.decoder.finish());
                    st.exhausted = true;
                }
                Err(e) => {
                    st.pending.push_back(Err(GatewayError::Network(format!(
                        "failed to read streaming chunk: {e}"
                    ))));
                    st.exhausted = true;
                }
            }
            if st.decoder.is_done() {
                st.exhausted = true;
            }
        }
    }))
}
