//! The seam between a session and the remote completion service.
//!
//! A [`CompletionGateway`] takes the full request (model, whole transcript,
//! sampling settings) and yields a [`FragmentStream`]. The gateway keeps no
//! state between calls, so every turn replays the transcript from its first
//! message.

use std::future::Future;
use std::pin::Pin;

use crate::api::streaming::FragmentStream;
use crate::{ChatRequest, GatewayError, GroqClient};

/// Boxed future returned by [`CompletionGateway::stream_completion`].
pub type GatewayFuture<'a> =
    Pin<Box<dyn Future<Output = Result<FragmentStream, GatewayError>> + Send + 'a>>;

/// A streaming chat-completion backend.
///
/// # Example
///
/// ```ignore
/// struct Canned(Vec<String>);
///
/// impl CompletionGateway for Canned {
///     fn stream_completion<'a>(&'a self, _request: &'a ChatRequest) -> GatewayFuture<'a> {
///         let events: Vec<_> = self.0.iter().cloned().map(|t| Ok(StreamEvent::TextDelta(t))).collect();
///         Box::pin(async move {
///             Ok(Box::pin(futures::stream::iter(events)) as FragmentStream)
///         })
///     }
/// }
/// ```
pub trait CompletionGateway: Send + Sync {
    /// Start a streaming completion.
    ///
    /// An `Err` means nothing was received; errors after the first fragment
    /// arrive through the stream.
    fn stream_completion<'a>(&'a self, request: &'a ChatRequest) -> GatewayFuture<'a>;
}

impl CompletionGateway for GroqClient {
    fn stream_completion<'a>(&'a self, request: &'a ChatRequest) -> GatewayFuture<'a> {
        Box::pin(self.chat_stream(request))
    }
}
