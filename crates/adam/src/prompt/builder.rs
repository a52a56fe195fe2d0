//! Line-oriented instruction builder.
//!
//! [`InstructionBuilder`] assembles a study prompt line by line. Lines are
//! joined with single newlines; empty lines (from `line_opt` with `None` or an
//! empty string) are skipped. Outline items get letter markers (`A.`, `B.`,
//! ...) in the order they are added.
//!
//! # Example
//!
//! ```
//! use adam::prompt::InstructionBuilder;
//!
//! let prompt = InstructionBuilder::new("Provide comprehensive: Ruth 1:16")
//!     .line("Provide Sermon Title:")
//!     .outline_item("Opening Hook", "Grab attention.")
//!     .outline_item("Closing", "Send them out.")
//!     .line_opt(None::<String>)
//!     .build();
//!
//! assert_eq!(
//!     prompt,
//!     "Provide comprehensive: Ruth 1:16\n\
//!      Provide Sermon Title:\n\
//!      A. Opening Hook: Grab attention.\n\
//!      B. Closing: Send them out."
//! );
//! ```
pub struct InstructionBuilder {
    lines: Vec<String>,
    outline_len: usize,
}

impl InstructionBuilder {
    /// Start with a leading line, included as-is.
    pub fn new(first: impl Into<String>) -> Self {
        Self {
            lines: vec![first.into()],
            outline_len: 0,
        }
    }

    /// Append a line. Skipped if empty.
    pub fn line(mut self, text: impl Into<String>) -> Self {
        let text = text.into();
        if !text.is_empty() {
            self.lines.push(text);
        }
        self
    }

    /// Append a line only if `text` is `Some`.
    pub fn line_opt(self, text: Option<impl Into<String>>) -> Self {
        match text {
            Some(t) => self.line(t),
            None => self,
        }
    }

    /// Append the next lettered outline item as `A. Name: guidance`.
    pub fn outline_item(mut self, name: &str, guidance: &str) -> Self {
        let marker = outline_marker(self.outline_len);
        self.outline_len += 1;
        let line = if guidance.is_empty() {
            format!("{marker} {name}")
        } else {
            format!("{marker} {name}: {guidance}")
        };
        self.lines.push(line);
        self
    }

    /// Join all lines with `\n`.
    pub fn build(self) -> String {
        self.lines.join("\n")
    }
}

/// Marker for the outline item at `index`: `A.` through `Z.`, then `27.`,
/// `28.`, and so on.
pub fn outline_marker(index: usize) -> String {
    match u8::try_from(index) {
        Ok(i) if i < 26 => format!("{}.", char::from(b'A' + i)),
        _ => format!("{}.", index + 1),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_lines_skipped() {
        let out = InstructionBuilder::new("first")
            .line("")
            .line_opt(Some(""))
            .line_opt(None::<&str>)
            .line("last")
            .build();
        assert_eq!(out, "first\nlast");
    }

    #[test]
    fn outline_markers_are_lettered_in_order() {
        assert_eq!(outline_marker(0), "A.");
        assert_eq!(outline_marker(5), "F.");
        assert_eq!(outline_marker(25), "Z.");
        assert_eq!(outline_marker(26), "27.");
        assert_eq!(outline_marker(300), "301.");
    }

    #[test]
    fn outline_item_without_guidance() {
        let out = InstructionBuilder::new("x")
            .outline_item("Hook", "")
            .outline_item("Turn", "Offer hope.")
            .build();
        assert_eq!(out, "x\nA. Hook\nB. Turn: Offer hope.");
    }
}
