//! Study-prompt composition.
//!
//! [`compose`] turns classified user input into the instruction text sent as
//! the user message. The wording lives in a [`TemplateTable`] (see
//! [`template`]); the layout is fixed:
//!
//! 1. `Provide comprehensive: <input>`
//! 2. `Using <Bible version>, <style guidelines>`
//! 3. the template's request line, outline, and closing line
//! 4. `Provide cross-references in the Bible if any`
//!
//! Composition is pure: the same arguments always give the same text.

pub mod builder;
pub mod template;

pub use builder::{InstructionBuilder, outline_marker};
pub use template::{
    DEFAULT_TEMPLATES, OutlineSection, PromptTemplate, TemplateTable, render_placeholders,
};

use crate::catalog::Doctrine;
use crate::classify::Classification;

/// Leading directive; the input follows it verbatim.
pub const COMPREHENSIVE_DIRECTIVE: &str = "Provide comprehensive:";

/// Trailing directive on every prompt.
pub const CROSS_REFERENCE_DIRECTIVE: &str = "Provide cross-references in the Bible if any";

/// Compose a prompt with the built-in templates.
pub fn compose(
    text: &str,
    classification: Classification,
    doctrine: Doctrine,
    bible_version: &str,
) -> String {
    compose_with(&DEFAULT_TEMPLATES, text, classification, doctrine, bible_version)
}

/// Compose a prompt from `table`.
///
/// `{input}` and `{doctrine}` in the table's strings are replaced with `text`
/// and the doctrine label. `text` itself is never scanned for placeholders.
pub fn compose_with(
    table: &TemplateTable,
    text: &str,
    classification: Classification,
    doctrine: Doctrine,
    bible_version: &str,
) -> String {
    let vars = [("input", text), ("doctrine", doctrine.label())];
    let render = |s: &str| render_placeholders(s, &vars);
    let template = table.template_for(classification);

    let mut builder = InstructionBuilder::new(format!("{COMPREHENSIVE_DIRECTIVE} {text}"))
        .line(format!(
            "Using {bible_version}, {}",
            render(table.guidelines.as_str())
        ))
        .line(render(template.request.as_str()));
    for section in &template.sections {
        builder = builder.outline_item(
            &render(section.name.as_str()),
            &render(section.guidance.as_str()),
        );
    }
    builder
        .line_opt(template.closing.as_deref().map(render))
        .line(CROSS_REFERENCE_DIRECTIVE)
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reference_prompt_layout() {
        let prompt = compose(
            "Psalm 23:1",
            Classification::ScriptureReference,
            Doctrine::SeventhDayAdventist,
            "New King James Version",
        );
        let lines: Vec<&str> = prompt.lines().collect();
        assert_eq!(lines[0], "Provide comprehensive: Psalm 23:1");
        assert!(lines[1].starts_with("Using New King James Version, "));
        assert!(lines[1].contains("Seventh-day Adventist doctrine"));
        assert_eq!(lines[2], "Provide Sermon Title:");
        assert!(lines[3].starts_with("A. Opening Hook: "));
        assert!(lines[8].starts_with("F. Closing: "));
        assert_eq!(
            lines[9],
            "These must be based on the Bible verse Psalm 23:1."
        );
        assert_eq!(lines[10], CROSS_REFERENCE_DIRECTIVE);
        assert_eq!(lines.len(), 11);
    }

    #[test]
    fn name_prompt_requests_genealogy() {
        let prompt = compose(
            "Melchizedek",
            Classification::ProperName,
            Doctrine::SundayKeepers,
            "King James Version",
        );
        assert!(prompt.starts_with("Provide comprehensive: Melchizedek\n"));
        assert!(prompt.contains("Using King James Version, "));
        assert!(prompt.contains("Roman Catholic and other Sunday Keepers doctrine"));
        assert!(prompt.contains("genealogy"));
        assert!(prompt.contains("for the name Melchizedek."));
        assert!(!prompt.contains("A. "));
        assert!(prompt.ends_with(CROSS_REFERENCE_DIRECTIVE));
    }

    #[test]
    fn keyword_prompt_quotes_input() {
        let prompt = compose(
            "ark of the covenant",
            Classification::Keyword,
            Doctrine::SundayKeepers,
            "New King James Version",
        );
        assert!(prompt.contains("for the keyword 'ark of the covenant'"));
        assert!(prompt.contains("controversies"));
        let lines: Vec<&str> = prompt.lines().collect();
        assert!(lines[1].starts_with("Using New King James Version, "));
    }

    #[test]
    fn bible_version_is_inserted_verbatim() {
        let cases = [
            ("John 3:16", Classification::ScriptureReference),
            ("Boaz", Classification::ProperName),
            ("grace and truth", Classification::Keyword),
        ];
        for (input, classification) in cases {
            let prompt = compose(
                input,
                classification,
                Doctrine::SeventhDayAdventist,
                "Study {doctrine} Edition {input}",
            );
            let lines: Vec<&str> = prompt.lines().collect();
            assert!(lines[1].starts_with("Using Study {doctrine} Edition {input}, "));
            assert_eq!(prompt.matches("{doctrine}").count(), 1);
            assert_eq!(prompt.matches("{input}").count(), 1);
        }
    }

    #[test]
    fn composition_is_deterministic() {
        let a = compose(
            "John 3:16",
            Classification::ScriptureReference,
            Doctrine::SundayKeepers,
            "NKJV",
        );
        let b = compose(
            "John 3:16",
            Classification::ScriptureReference,
            Doctrine::SundayKeepers,
            "NKJV",
        );
        assert_eq!(a, b);
    }

    #[test]
    fn input_is_not_expanded() {
        let prompt = compose(
            "{doctrine}",
            Classification::ProperName,
            Doctrine::SeventhDayAdventist,
            "NKJV",
        );
        assert!(prompt.starts_with("Provide comprehensive: {doctrine}\n"));
        assert!(prompt.contains("for the name {doctrine}."));
    }

    #[test]
    fn custom_table_drives_layout() {
        let mut table = TemplateTable::default();
        table.guidelines = "keep it short.".into();
        table.scripture_reference = PromptTemplate {
            request: "Outline a devotional on {input}:".into(),
            sections: vec![OutlineSection::new("Hook", "One line.")],
            closing: None,
        };
        let prompt = compose_with(
            &table,
            "Ruth 1:16",
            Classification::ScriptureReference,
            Doctrine::SundayKeepers,
            "ESV",
        );
        assert_eq!(
            prompt,
            "Provide comprehensive: Ruth 1:16\n\
             Using ESV, keep it short.\n\
             Outline a devotional on Ruth 1:16:\n\
             A. Hook: One line.\n\
             Provide cross-references in the Bible if any"
        );
    }
}
