//! A chat session: settings, transcript, and the turn loop.
//!
//! [`Session`] is the explicit context for one conversation. It owns the
//! [`Transcript`] and the current [`SessionSettings`], and runs a turn end to
//! end in [`submit`](Session::submit):
//!
//! 1. Classify the input and compose the study prompt.
//! 2. Append the prompt to the transcript as a user message.
//! 3. Send the whole transcript to the [`CompletionGateway`].
//! 4. Forward each streamed fragment to the [`TurnObserver`] while
//!    accumulating the answer.
//! 5. On a clean finish, append the answer as an assistant message.
//!
//! A failed or cancelled turn appends nothing after the user message, so the
//! transcript never holds a truncated answer.

use futures::StreamExt;
use tracing::{debug, info, trace};

use crate::api::streaming::StreamEvent;
use crate::api::usage::{UsageTracker, generate_trace_id};
use crate::catalog::{self, DEFAULT_BIBLE_VERSION, Doctrine, ModelConfig};
use crate::classify::{Classification, classify};
use crate::events::{TurnControl, TurnEvent, TurnObserver};
use crate::gateway::CompletionGateway;
use crate::prompt::{TemplateTable, compose_with};
use crate::transcript::Transcript;
use crate::{
    ChatRequest, ConfigError, DEFAULT_TEMPERATURE, GatewayError, Message, ReasoningFormat,
    SessionError, UsageInfo,
};

/// Everything that shapes a request besides the transcript.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionSettings {
    pub model: &'static ModelConfig,
    /// Completion budget; always valid for `model`.
    pub max_tokens: u32,
    pub doctrine: Doctrine,
    /// Translation named in every prompt, e.g. "New King James Version".
    pub bible_version: String,
    /// `None` leaves sampling temperature to the provider.
    pub temperature: Option<f32>,
    pub reasoning_format: Option<ReasoningFormat>,
    pub templates: TemplateTable,
}

impl Default for SessionSettings {
    fn default() -> Self {
        let model = catalog::default_model();
        Self {
            model,
            max_tokens: model.default_max_tokens(),
            doctrine: Doctrine::default(),
            bible_version: DEFAULT_BIBLE_VERSION.to_string(),
            temperature: Some(DEFAULT_TEMPERATURE),
            reasoning_format: Some(ReasoningFormat::Hidden),
            templates: TemplateTable::default(),
        }
    }
}

/// How a submitted turn ended.
#[derive(Debug, Clone, PartialEq)]
pub enum TurnOutcome {
    /// The stream finished and the answer was appended to the transcript.
    Completed {
        trace_id: String,
        classification: Classification,
        text: String,
        usage: Option<UsageInfo>,
    },
    /// The gateway call or the stream failed. Nothing was appended.
    Failed {
        trace_id: String,
        classification: Classification,
        partial: String,
        error: GatewayError,
    },
    /// An observer stopped the stream. Nothing was appended.
    Cancelled {
        trace_id: String,
        classification: Classification,
        partial: String,
    },
}

impl TurnOutcome {
    pub fn trace_id(&self) -> &str {
        match self {
            TurnOutcome::Completed { trace_id, .. }
            | TurnOutcome::Failed { trace_id, .. }
            | TurnOutcome::Cancelled { trace_id, .. } => trace_id,
        }
    }

    pub fn classification(&self) -> Classification {
        match self {
            TurnOutcome::Completed { classification, .. }
            | TurnOutcome::Failed { classification, .. }
            | TurnOutcome::Cancelled { classification, .. } => *classification,
        }
    }

    /// The answer text, complete or partial.
    pub fn text(&self) -> &str {
        match self {
            TurnOutcome::Completed { text, .. } => text,
            TurnOutcome::Failed { partial, .. } | TurnOutcome::Cancelled { partial, .. } => {
                partial
            }
        }
    }

    pub fn is_completed(&self) -> bool {
        matches!(self, TurnOutcome::Completed { .. })
    }
}

/// One conversation with the completion service.
#[derive(Debug, Clone)]
pub struct Session {
    settings: SessionSettings,
    transcript: Transcript,
    usage: UsageTracker,
}

impl Session {
    pub fn new(settings: SessionSettings) -> Self {
        Self {
            settings,
            transcript: Transcript::new(),
            usage: UsageTracker::new(),
        }
    }

    pub fn settings(&self) -> &SessionSettings {
        &self.settings
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    /// Token usage since the last new chat.
    pub fn usage(&self) -> &UsageTracker {
        &self.usage
    }

    /// Start over: clear the transcript and usage totals.
    pub fn new_chat(&mut self) {
        info!("New chat (discarding {} message(s))", self.transcript.len());
        self.transcript.clear();
        self.usage.reset();
    }

    /// Switch to another catalog model.
    ///
    /// A different model starts a new chat and resets the token budget to the
    /// model's default. Returns whether the model changed.
    pub fn select_model(&mut self, identifier: &str) -> Result<bool, ConfigError> {
        let model = catalog::find_model(identifier)?;
        if model.identifier == self.settings.model.identifier {
            return Ok(false);
        }
        info!(
            "Model switched: {} -> {}",
            self.settings.model.identifier, model.identifier
        );
        self.settings.model = model;
        self.settings.max_tokens = model.default_max_tokens();
        self.new_chat();
        Ok(true)
    }

    /// Set the completion budget. Rejected values leave the budget unchanged.
    pub fn set_max_tokens(&mut self, max_tokens: u32) -> Result<(), ConfigError> {
        self.settings.max_tokens = self.settings.model.validate_max_tokens(max_tokens)?;
        debug!("Max tokens set to {max_tokens}");
        Ok(())
    }

    /// Applies from the next turn on.
    pub fn set_doctrine(&mut self, doctrine: Doctrine) {
        info!("Doctrine set to {doctrine}");
        self.settings.doctrine = doctrine;
    }

    /// Applies from the next turn on. Blank labels fall back to the default.
    pub fn set_bible_version(&mut self, bible_version: impl Into<String>) {
        let bible_version = bible_version.into();
        let bible_version = match bible_version.trim() {
            "" => DEFAULT_BIBLE_VERSION.to_string(),
            trimmed => trimmed.to_string(),
        };
        info!("Bible version set to {bible_version}");
        self.settings.bible_version = bible_version;
    }

    pub fn set_templates(&mut self, templates: TemplateTable) {
        self.settings.templates = templates;
    }

    /// Request for the current transcript and settings.
    pub fn build_request(&self) -> ChatRequest {
        ChatRequest {
            model: self.settings.model.identifier.to_string(),
            messages: self.transcript.all().to_vec(),
            temperature: self.settings.temperature,
            max_tokens: self.settings.max_tokens,
            stream: true,
            reasoning_format: self.settings.reasoning_format,
        }
    }

    /// Run one turn for `input`.
    ///
    /// Returns `Err` only for input rejected before anything happens. Gateway
    /// failures are part of a normal [`TurnOutcome`].
    pub async fn submit(
        &mut self,
        input: &str,
        gateway: &dyn CompletionGateway,
        observer: &dyn TurnObserver,
    ) -> Result<TurnOutcome, SessionError> {
        let input = input.trim();
        if input.is_empty() {
            return Err(SessionError::EmptyInput);
        }

        let classification = classify(input);
        let prompt = compose_with(
            &self.settings.templates,
            input,
            classification,
            self.settings.doctrine,
            &self.settings.bible_version,
        );
        self.transcript.append(Message::user(prompt));
        observer.on_event(&TurnEvent::Submitted {
            input,
            classification,
        });

        let trace_id = generate_trace_id();
        let request = self.build_request();
        debug!(
            "[{trace_id}] {} request: {} message(s), max_tokens={}",
            classification,
            request.messages.len(),
            request.max_tokens
        );
        observer.on_event(&TurnEvent::RequestSent {
            trace_id: &trace_id,
            model: &request.model,
            message_count: request.messages.len(),
        });

        let mut stream = match gateway.stream_completion(&request).await {
            Ok(stream) => stream,
            Err(error) => {
                observer.on_event(&TurnEvent::Failed {
                    error: &error,
                    partial: "",
                });
                return Ok(TurnOutcome::Failed {
                    trace_id,
                    classification,
                    partial: String::new(),
                    error,
                });
            }
        };

        let mut text = String::new();
        let mut usage = None;
        while let Some(item) = stream.next().await {
            let control = match item {
                Ok(StreamEvent::TextDelta(delta)) => {
                    trace!("[{trace_id}] text delta: {} bytes", delta.len());
                    text.push_str(&delta);
                    observer.on_event(&TurnEvent::TextDelta(&delta))
                }
                Ok(StreamEvent::ReasoningDelta(delta)) => {
                    trace!("[{trace_id}] reasoning delta: {} bytes", delta.len());
                    observer.on_event(&TurnEvent::ReasoningDelta(&delta))
                }
                Ok(StreamEvent::Usage(info)) => {
                    self.usage.record(&info);
                    let control = observer.on_event(&TurnEvent::Usage(&info));
                    usage = Some(info);
                    control
                }
                Ok(StreamEvent::Done) => break,
                Err(error) => {
                    observer.on_event(&TurnEvent::Failed {
                        error: &error,
                        partial: &text,
                    });
                    return Ok(TurnOutcome::Failed {
                        trace_id,
                        classification,
                        partial: text,
                        error,
                    });
                }
            };
            if control == Some(TurnControl::Stop) {
                drop(stream);
                observer.on_event(&TurnEvent::Cancelled { partial: &text });
                return Ok(TurnOutcome::Cancelled {
                    trace_id,
                    classification,
                    partial: text,
                });
            }
        }

        self.transcript.append(Message::assistant(text.clone()));
        observer.on_event(&TurnEvent::Completed { text: &text });
        Ok(TurnOutcome::Completed {
            trace_id,
            classification,
            text,
            usage,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MessageRole;

    #[test]
    fn default_settings() {
        let settings = SessionSettings::default();
        assert_eq!(settings.model.identifier, "deepseek-r1-distill-llama-70b");
        assert_eq!(settings.max_tokens, 16384);
        assert_eq!(settings.doctrine, Doctrine::SundayKeepers);
        assert_eq!(settings.bible_version, "New King James Version");
        assert_eq!(settings.temperature, Some(0.6));
        assert_eq!(settings.reasoning_format, Some(ReasoningFormat::Hidden));
    }

    #[test]
    fn build_request_replays_transcript() {
        let mut session = Session::new(SessionSettings::default());
        session.transcript.append(Message::user("q1"));
        session.transcript.append(Message::assistant("a1"));
        let req = session.build_request();
        assert_eq!(req.messages.len(), 2);
        assert_eq!(req.messages[1].role, MessageRole::Assistant);
        assert!(req.stream);
        assert_eq!(req.max_tokens, 16384);
    }

    #[test]
    fn select_model_clears_only_on_change() {
        let mut session = Session::new(SessionSettings::default());
        session.set_max_tokens(32768).unwrap();
        session.transcript.append(Message::user("q"));

        assert_eq!(
            session.select_model("deepseek-r1-distill-llama-70b"),
            Ok(false)
        );
        assert_eq!(session.transcript().len(), 1);
        assert_eq!(session.settings().max_tokens, 32768);

        assert_eq!(
            session.select_model("deepseek-r1-distill-qwen-32b"),
            Ok(true)
        );
        assert!(session.transcript().is_empty());
        assert_eq!(session.settings().max_tokens, 16384);
    }

    #[test]
    fn unknown_model_leaves_state() {
        let mut session = Session::new(SessionSettings::default());
        session.transcript.append(Message::user("q"));
        assert!(session.select_model("gpt-4").is_err());
        assert_eq!(session.transcript().len(), 1);
        assert_eq!(
            session.settings().model.identifier,
            "deepseek-r1-distill-llama-70b"
        );
    }

    #[test]
    fn token_budget_validated_against_model() {
        let mut session = Session::new(SessionSettings::default());
        session
            .select_model("deepseek-r1-distill-qwen-32b")
            .unwrap();
        assert!(session.set_max_tokens(32768).is_err());
        assert_eq!(session.settings().max_tokens, 16384);
        session.set_max_tokens(8192).unwrap();
        assert_eq!(session.settings().max_tokens, 8192);
    }

    #[test]
    fn blank_bible_version_falls_back() {
        let mut session = Session::new(SessionSettings::default());
        session.set_bible_version("  English Standard Version ");
        assert_eq!(session.settings().bible_version, "English Standard Version");
        session.set_bible_version("   ");
        assert_eq!(session.settings().bible_version, DEFAULT_BIBLE_VERSION);
    }
}
