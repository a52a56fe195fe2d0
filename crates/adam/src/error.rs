//! Error types for configuration, the completion gateway, and sessions.
//!
//! Errors are local to the operation that raised them: a failed gateway call
//! ends the current turn but never the session.

/// Invalid or missing settings, detected before any request is sent.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("API key is missing: set GROQ_API_KEY or pass --api-key")]
    MissingApiKey,
    #[error("unknown model: {0}")]
    UnknownModel(String),
    #[error(
        "max tokens {requested} not allowed for {model}: choose a multiple of {step} between {min} and {max}"
    )]
    TokenBudget {
        model: String,
        requested: u32,
        min: u32,
        max: u32,
        step: u32,
    },
    #[error("unknown doctrine: {0}")]
    UnknownDoctrine(String),
    #[error("failed to read template file '{path}': {message}")]
    TemplateRead { path: String, message: String },
    #[error("failed to parse template file '{path}': {message}")]
    TemplateParse { path: String, message: String },
    #[error("invalid base URL '{0}': expected http:// or https://")]
    BaseUrl(String),
    #[error("failed to set up HTTP client: {0}")]
    HttpClient(String),
}

/// Failures talking to the remote completion API.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GatewayError {
    #[error("failed to build HTTP client: {0}")]
    Client(String),
    #[error("failed to serialize request: {0}")]
    Serialize(String),
    #[error("request failed: {0}")]
    Network(String),
    #[error("API key rejected: {0}")]
    Unauthorized(String),
    #[error("rate limited: {0}")]
    RateLimited(String),
    #[error("API HTTP {status}: {body}")]
    Http { status: u16, body: String },
    #[error("API error: {0}")]
    Api(String),
}

impl GatewayError {
    /// Map a non-success HTTP status and its body to an error.
    pub fn from_status(status: u16, body: impl Into<String>) -> Self {
        let body = body.into();
        let message = api_error_message(&body).unwrap_or(body);
        match status {
            401 | 403 => GatewayError::Unauthorized(message),
            429 => GatewayError::RateLimited(message),
            _ => GatewayError::Http {
                status,
                body: message,
            },
        }
    }

    /// Whether retrying the same turn later could plausibly succeed.
    ///
    /// Nothing retries automatically; the REPL uses this to phrase its hint.
    pub fn is_transient(&self) -> bool {
        match self {
            GatewayError::RateLimited(_) | GatewayError::Network(_) => true,
            GatewayError::Http { status, .. } => matches!(status, 500 | 502 | 503 | 504),
            _ => false,
        }
    }
}

/// Extract `error.message` from an OpenAI-style JSON error body.
fn api_error_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    value
        .get("error")?
        .get("message")?
        .as_str()
        .map(str::to_string)
}

/// Failures of a session operation itself (not of the remote call).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    #[error("message cannot be empty")]
    EmptyInput,
}
