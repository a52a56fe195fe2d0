//! Scripture-study chat client for streaming chat-completion APIs.
//!
//! `adam` turns what a user types (a Bible reference such as `John 3:16`, a
//! name such as `Melchizedek`, or a free keyword) into a structured study
//! prompt, sends the whole conversation to an OpenAI-compatible completion
//! endpoint ([Groq](https://groq.com/) by default), and streams the reply back
//! while keeping an in-memory transcript.
//!
//! # Getting started
//!
//! ```ignore
//! use adam::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), String> {
//!     let api_key = std::env::var("GROQ_API_KEY").map_err(|e| e.to_string())?;
//!     let client = GroqClient::new(api_key).map_err(|e| e.to_string())?;
//!
//!     let mut session = Session::new(SessionSettings::default());
//!     let renderer = TerminalRenderer::stdout(false);
//!
//!     let outcome = session
//!         .submit("Psalm 23:1", &client, &renderer)
//!         .await
//!         .map_err(|e| e.to_string())?;
//!     println!("\n{} message(s) in transcript", session.transcript().len());
//!     Ok(())
//! }
//! ```
//!
//! # Where to find things
//!
//! - **Input classification:** [`classify::classify`] decides between a
//!   scripture reference, a proper name, and a keyword.
//! - **Prompt composition:** [`prompt::compose`] assembles the instruction
//!   text from a [`TemplateTable`](prompt::TemplateTable), which is plain data
//!   and can be loaded from JSON.
//! - **Models and settings:** [`catalog`] holds the static model catalog, the
//!   token-budget bounds, and the doctrine set.
//! - **Conversation state:** [`session::Session`] owns the
//!   [`Transcript`](transcript::Transcript) and runs a turn end to end.
//! - **Streaming:** [`gateway::CompletionGateway`] is the seam to the remote
//!   API; [`GroqClient`] implements it over SSE (see [`api::streaming`]).
//! - **Observing a turn:** implement [`events::TurnObserver`], or use
//!   [`render::TerminalRenderer`] to print fragments as they arrive.

pub mod api;
pub mod catalog;
pub mod classify;
pub mod config;
pub mod error;
pub mod events;
pub mod gateway;
pub mod prelude;
pub mod prompt;
pub mod render;
pub mod repl;
pub mod session;
pub mod transcript;

use serde::{Deserialize, Serialize};
use std::time::Duration;

pub use error::{ConfigError, GatewayError, SessionError};

// ── Constants ──────────────────────────────────────────────────────

/// Default OpenAI-compatible API root (Groq).
pub const DEFAULT_BASE_URL: &str = "https://api.groq.com/openai/v1";

/// Environment variable holding the API credential.
pub const API_KEY_ENV: &str = "GROQ_API_KEY";

/// Sampling temperature used unless the caller overrides it.
pub const DEFAULT_TEMPERATURE: f32 = 0.6;

/// Whole-request timeout. Long sermon outlines on large models can take a while.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(300);

// ── Request types ──────────────────────────────────────────────────

/// How the provider should return a reasoning model's chain of thought.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ReasoningFormat {
    /// Reasoning is used internally but omitted from the response.
    Hidden,
    /// Reasoning is inlined in the content between `<think>` tags.
    Raw,
    /// Reasoning is returned in a separate `reasoning` field.
    Parsed,
}

/// Chat completion request body. Optional fields are omitted from
/// serialization when unset.
#[derive(Serialize, Debug, Clone, Default)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<Message>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(skip_serializing_if = "is_zero_u32")]
    pub max_tokens: u32,
    pub stream: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reasoning_format: Option<ReasoningFormat>,
}

fn is_zero_u32(v: &u32) -> bool {
    *v == 0
}

// ── Message types ──────────────────────────────────────────────────

/// Role of a message in the conversation.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    User,
    Assistant,
}

impl std::fmt::Display for MessageRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MessageRole::User => write!(f, "user"),
            MessageRole::Assistant => write!(f, "assistant"),
        }
    }
}

/// A message in the conversation.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Message {
    pub role: MessageRole,
    pub content: String,
}

impl Message {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::Assistant,
            content: content.into(),
        }
    }
}

// ── Response types ─────────────────────────────────────────────────

/// Token usage statistics.
#[derive(Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct UsageInfo {
    pub prompt_tokens: Option<u32>,
    pub completion_tokens: Option<u32>,
    pub total_tokens: Option<u32>,
}

// ── Client ─────────────────────────────────────────────────────────

/// Async HTTP client for an OpenAI-compatible chat completions API.
///
/// Streaming requests are issued through
/// [`chat_stream`](GroqClient::chat_stream) (see [`api::streaming`]); the
/// client also implements [`CompletionGateway`](gateway::CompletionGateway).
pub struct GroqClient {
    pub(crate) client: reqwest::Client,
    pub(crate) api_key: String,
    pub(crate) base_url: String,
}

impl GroqClient {
    /// Create a client against the default Groq endpoint.
    pub fn new(api_key: impl Into<String>) -> Result<Self, GatewayError> {
        Self::with_base_url(api_key, DEFAULT_BASE_URL)
    }

    /// Create a client against any OpenAI-compatible API root, e.g.
    /// `https://api.groq.com/openai/v1`.
    pub fn with_base_url(
        api_key: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Result<Self, GatewayError> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("adam/", env!("CARGO_PKG_VERSION")))
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| GatewayError::Client(e.to_string()))?;
        Ok(Self {
            client,
            api_key: api_key.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// Full URL of the chat completions endpoint.
    pub fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }
}

impl std::fmt::Debug for GroqClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GroqClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}
