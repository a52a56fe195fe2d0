//! Correlation IDs and token accounting for a chat session.
//!
//! Every turn gets a `trace_id` so its log lines can be grouped. Token usage
//! reported by the API is summed per session until the next new chat.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::SystemTime;

use crate::UsageInfo;

/// Generate a unique trace ID for a turn.
pub fn generate_trace_id() -> String {
    let ts = SystemTime::now()
        .duration_since(SystemTime::UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    // Counter disambiguates calls within the same clock tick.
    static COUNTER: AtomicU64 = AtomicU64::new(0);
    let count = COUNTER.fetch_add(1, Ordering::Relaxed);
    format!("tr-{ts:x}-{count:04x}")
}

/// Cumulative token usage for a session.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct UsageTracker {
    pub total_prompt_tokens: u64,
    pub total_completion_tokens: u64,
    /// Turns that reported usage.
    pub turns: u32,
}

impl UsageTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record usage for one turn. Missing counts are treated as zero.
    pub fn record(&mut self, usage: &UsageInfo) {
        self.total_prompt_tokens += u64::from(usage.prompt_tokens.unwrap_or(0));
        self.total_completion_tokens += u64::from(usage.completion_tokens.unwrap_or(0));
        self.turns += 1;
    }

    /// Total tokens consumed.
    pub fn total_tokens(&self) -> u64 {
        self.total_prompt_tokens + self.total_completion_tokens
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Format as a short summary string.
    pub fn summary(&self) -> String {
        format!(
            "tokens: {} prompt + {} completion = {} total over {} turn(s)",
            self.total_prompt_tokens,
            self.total_completion_tokens,
            self.total_tokens(),
            self.turns,
        )
    }
}
