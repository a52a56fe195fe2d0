//! API interaction layer: SSE streaming and usage tracking.
//!
//! - [`streaming`]: SSE decoder for incremental text, reasoning, and usage
//!   deltas, and [`GroqClient::chat_stream`](crate::GroqClient::chat_stream)
//!   which exposes them as a lazy stream of [`StreamEvent`]s.
//! - [`usage`]: per-turn trace IDs and cumulative token accounting.

pub mod streaming;
pub mod usage;

pub use streaming::{FragmentStream, SseDecoder, StreamEvent};
pub use usage::{UsageTracker, generate_trace_id};
