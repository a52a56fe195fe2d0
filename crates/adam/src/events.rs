//! Turn events and observers.
//!
//! A [`Session`](crate::session::Session) reports the lifecycle of each turn
//! through [`TurnEvent`] variants, from submission through every streamed
//! fragment to completion, failure, or cancellation. Callers implement
//! [`TurnObserver`] to render output, log, or decide to stop a stream early.
//!
//! # Choosing an observer
//!
//! | Observer | Use case |
//! |----------|----------|
//! | [`NoopObserver`] | Tests or silent runs |
//! | [`LoggingObserver`] | Structured logging via `tracing` |
//! | [`FnObserver`] | Quick closures |
//! | [`CompositeObserver`] | Several observers in order |
//! | [`TerminalRenderer`](crate::render::TerminalRenderer) | Print fragments to a terminal |

use tracing::{debug, info, warn};

use crate::classify::Classification;
use crate::{GatewayError, UsageInfo};

// ── Events ─────────────────────────────────────────────────────────

/// Events emitted while a session runs a turn.
#[derive(Debug)]
pub enum TurnEvent<'a> {
    /// Input accepted and classified; the composed prompt is in the transcript.
    Submitted {
        input: &'a str,
        classification: Classification,
    },
    /// The request is about to be sent.
    RequestSent {
        trace_id: &'a str,
        model: &'a str,
        message_count: usize,
    },
    /// A fragment of answer text.
    TextDelta(&'a str),
    /// A fragment of the model's reasoning (only when requested).
    ReasoningDelta(&'a str),
    /// Token usage reported for this turn.
    Usage(&'a UsageInfo),
    /// The stream finished; `text` is the full answer.
    Completed { text: &'a str },
    /// The call or the stream failed; `partial` is whatever arrived first.
    Failed {
        error: &'a GatewayError,
        partial: &'a str,
    },
    /// An observer stopped the stream.
    Cancelled { partial: &'a str },
}

/// Observer feedback for an in-flight turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnControl {
    /// Stop consuming the stream and end the turn as cancelled.
    Stop,
}

/// Observer of turn events.
///
/// The return value only matters while fragments are streaming: returning
/// `Some(TurnControl::Stop)` from a `TextDelta`, `ReasoningDelta`, or `Usage`
/// event ends the turn early. The default implementation ignores everything.
///
/// # Example
///
/// ```ignore
/// struct StopAfter(usize, AtomicUsize);
///
/// impl TurnObserver for StopAfter {
///     fn on_event(&self, event: &TurnEvent<'_>) -> Option<TurnControl> {
///         if let TurnEvent::TextDelta(_) = event
///             && self.1.fetch_add(1, Ordering::Relaxed) + 1 >= self.0
///         {
///             return Some(TurnControl::Stop);
///         }
///         None
///     }
/// }
/// ```
pub trait TurnObserver: Send + Sync {
    fn on_event(&self, event: &TurnEvent<'_>) -> Option<TurnControl> {
        let _ = event;
        None
    }
}

/// Observer that does nothing.
pub struct NoopObserver;
impl TurnObserver for NoopObserver {}

/// An observer backed by a closure.
///
/// ```ignore
/// let observer = FnObserver::new(|event| {
///     if let TurnEvent::TextDelta(text) = event {
///         print!("{text}");
///     }
///     None
/// });
/// ```
pub struct FnObserver<F>(F)
where
    F: Fn(&TurnEvent<'_>) -> Option<TurnControl> + Send + Sync;

impl<F> FnObserver<F>
where
    F: Fn(&TurnEvent<'_>) -> Option<TurnControl> + Send + Sync,
{
    pub fn new(f: F) -> Self {
        Self(f)
    }
}

impl<F> TurnObserver for FnObserver<F>
where
    F: Fn(&TurnEvent<'_>) -> Option<TurnControl> + Send + Sync,
{
    fn on_event(&self, event: &TurnEvent<'_>) -> Option<TurnControl> {
        (self.0)(event)
    }
}

/// Delegates to several observers in registration order.
///
/// Every observer sees every event; the first non-`None` control wins.
///
/// ```ignore
/// let observer = CompositeObserver::new()
///     .with(LoggingObserver)
///     .with(TerminalRenderer::stdout(false));
/// ```
pub struct CompositeObserver {
    observers: Vec<Box<dyn TurnObserver>>,
}

impl CompositeObserver {
    pub fn new() -> Self {
        Self {
            observers: Vec::new(),
        }
    }

    pub fn with(mut self, observer: impl TurnObserver + 'static) -> Self {
        self.observers.push(Box::new(observer));
        self
    }

    /// Add `observer` only when `condition` holds.
    pub fn with_if(self, condition: bool, observer: impl TurnObserver + 'static) -> Self {
        if condition { self.with(observer) } else { self }
    }
}

impl Default for CompositeObserver {
    fn default() -> Self {
        Self::new()
    }
}

impl TurnObserver for CompositeObserver {
    fn on_event(&self, event: &TurnEvent<'_>) -> Option<TurnControl> {
        let mut control = None;
        for observer in &self.observers {
            let response = observer.on_event(event);
            if control.is_none() {
                control = response;
            }
        }
        control
    }
}

/// Logs turn events through `tracing`.
pub struct LoggingObserver;

impl TurnObserver for LoggingObserver {
    fn on_event(&self, event: &TurnEvent<'_>) -> Option<TurnControl> {
        match event {
            TurnEvent::Submitted {
                input,
                classification,
            } => {
                info!("Input classified as {classification}: {input}");
            }
            TurnEvent::RequestSent {
                trace_id,
                model,
                message_count,
            } => {
                debug!("[{trace_id}] Sending {message_count} message(s) to {model}");
            }
            TurnEvent::TextDelta(_) | TurnEvent::ReasoningDelta(_) => {}
            TurnEvent::Usage(usage) => {
                debug!(
                    "Tokens: prompt={}, completion={}",
                    usage.prompt_tokens.unwrap_or(0),
                    usage.completion_tokens.unwrap_or(0)
                );
            }
            TurnEvent::Completed { text } => {
                info!("Turn completed ({} chars)", text.len());
            }
            TurnEvent::Failed { error, partial } => {
                warn!("Turn failed after {} chars: {error}", partial.len());
            }
            TurnEvent::Cancelled { partial } => {
                info!("Turn cancelled after {} chars", partial.len());
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn noop_ignores_everything() {
        assert_eq!(NoopObserver.on_event(&TurnEvent::TextDelta("x")), None);
    }

    #[test]
    fn fn_observer_forwards() {
        let observer = FnObserver::new(|event| match event {
            TurnEvent::TextDelta("stop") => Some(TurnControl::Stop),
            _ => None,
        });
        assert_eq!(
            observer.on_event(&TurnEvent::TextDelta("stop")),
            Some(TurnControl::Stop)
        );
        assert_eq!(observer.on_event(&TurnEvent::TextDelta("go")), None);
    }

    #[test]
    fn composite_dispatches_to_all() {
        let seen = Arc::new(AtomicUsize::new(0));
        let s1 = seen.clone();
        let s2 = seen.clone();
        let composite = CompositeObserver::new()
            .with(FnObserver::new(move |_| {
                s1.fetch_add(1, Ordering::Relaxed);
                Some(TurnControl::Stop)
            }))
            .with(FnObserver::new(move |_| {
                s2.fetch_add(1, Ordering::Relaxed);
                None
            }))
            .with_if(false, FnObserver::new(|_| Some(TurnControl::Stop)));
        assert_eq!(
            composite.on_event(&TurnEvent::TextDelta("a")),
            Some(TurnControl::Stop)
        );
        assert_eq!(seen.load(Ordering::Relaxed), 2);
    }

    #[test]
    fn with_if_skips_observer_when_false() {
        let stopper = || FnObserver::new(|_| Some(TurnControl::Stop));
        let skipped = CompositeObserver::new().with_if(false, stopper());
        assert_eq!(skipped.on_event(&TurnEvent::TextDelta("a")), None);
        let added = CompositeObserver::new().with_if(true, stopper());
        assert_eq!(
            added.on_event(&TurnEvent::TextDelta("a")),
            Some(TurnControl::Stop)
        );
    }

    #[test]
    fn logging_observer_never_stops() {
        let err = GatewayError::Network("reset".into());
        assert_eq!(
            LoggingObserver.on_event(&TurnEvent::Failed {
                error: &err,
                partial: "half"
            }),
            None
        );
    }
}
