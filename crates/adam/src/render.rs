//! Terminal rendering of streamed answers.
//!
//! [`TerminalRenderer`] writes each text fragment as it arrives and flushes
//! immediately, so the answer grows on screen while the model is still
//! generating. Reasoning fragments are shown dimmed when enabled.

use std::io::{self, Write};
use std::sync::Mutex;

use tracing::warn;

use crate::events::{TurnControl, TurnEvent, TurnObserver};

const DIM: &str = "\x1b[2m";
const RESET: &str = "\x1b[0m";

/// Prints turn output to a writer (stdout by default).
pub struct TerminalRenderer<W: Write + Send = io::Stdout> {
    writer: Mutex<W>,
    show_reasoning: bool,
}

impl TerminalRenderer<io::Stdout> {
    pub fn stdout(show_reasoning: bool) -> Self {
        Self::new(io::stdout(), show_reasoning)
    }
}

impl<W: Write + Send> TerminalRenderer<W> {
    pub fn new(writer: W, show_reasoning: bool) -> Self {
        Self {
            writer: Mutex::new(writer),
            show_reasoning,
        }
    }

    /// Take the writer back, e.g. to inspect captured output.
    pub fn into_inner(self) -> W {
        self.writer
            .into_inner()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self, text: &str) {
        let mut writer = self
            .writer
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if let Err(e) = writer
            .write_all(text.as_bytes())
            .and_then(|()| writer.flush())
        {
            warn!("Failed to write to terminal: {e}");
        }
    }
}

impl<W: Write + Send> TurnObserver for TerminalRenderer<W> {
    fn on_event(&self, event: &TurnEvent<'_>) -> Option<TurnControl> {
        match event {
            TurnEvent::TextDelta(text) => self.write(text),
            TurnEvent::ReasoningDelta(text) if self.show_reasoning => {
                self.write(&format!("{DIM}{text}{RESET}"));
            }
            TurnEvent::Completed { .. } | TurnEvent::Cancelled { .. } => self.write("\n"),
            TurnEvent::Failed { partial, .. } if !partial.is_empty() => self.write("\n"),
            _ => {}
        }
        None
    }
}
