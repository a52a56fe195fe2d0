//! Convenience re-exports for common `adam` types.
//!
//! ```ignore
//! use adam::prelude::*;
//! ```
//!
//! Pulls in the client, the session and its settings, the gateway trait, the
//! observers, and the catalog types. SSE decoding and template internals are
//! left out; import those from their modules when needed.

// ── Core types ──────────────────────────────────────────────────────
pub use crate::{
    ChatRequest, ConfigError, GatewayError, GroqClient, Message, MessageRole, ReasoningFormat,
    SessionError, UsageInfo,
};

// ── Session ─────────────────────────────────────────────────────────
pub use crate::config::AppConfig;
pub use crate::session::{Session, SessionSettings, TurnOutcome};
pub use crate::transcript::Transcript;

// ── Classification and prompts ──────────────────────────────────────
pub use crate::catalog::{Doctrine, ModelConfig};
pub use crate::classify::{Classification, classify};
pub use crate::prompt::{TemplateTable, compose};

// ── Streaming and observers ─────────────────────────────────────────
pub use crate::api::streaming::{FragmentStream, StreamEvent};
pub use crate::events::{
    CompositeObserver, FnObserver, LoggingObserver, NoopObserver, TurnControl, TurnEvent,
    TurnObserver,
};
pub use crate::gateway::{CompletionGateway, GatewayFuture};
pub use crate::render::TerminalRenderer;
