//! Prompt templates as data.
//!
//! A [`TemplateTable`] maps each [`Classification`] to a [`PromptTemplate`]:
//! a request line, an ordered outline of named sections with one-line
//! guidance, and an optional closing line. Tables deserialize from JSON, and
//! a partial file falls back to the built-in defaults for whatever it omits.
//!
//! Template strings may use two placeholders: `{input}` (what the user typed)
//! and `{doctrine}` (the selected doctrine label).

use std::path::Path;
use std::sync::LazyLock;

use serde::{Deserialize, Serialize};

use crate::ConfigError;
use crate::classify::Classification;

/// One named part of an outline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutlineSection {
    pub name: String,
    pub guidance: String,
}

impl OutlineSection {
    pub fn new(name: impl Into<String>, guidance: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            guidance: guidance.into(),
        }
    }
}

/// Template for one classification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptTemplate {
    /// What to produce, e.g. "Provide Sermon Title:".
    pub request: String,
    /// Ordered outline; rendered as `A. Name: guidance` lines.
    #[serde(default)]
    pub sections: Vec<OutlineSection>,
    /// Line after the outline.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub closing: Option<String>,
}

/// Templates for every classification plus the shared style guidance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TemplateTable {
    /// Style constraints appended after the translation, with `{doctrine}`.
    pub guidelines: String,
    pub scripture_reference: PromptTemplate,
    pub proper_name: PromptTemplate,
    pub keyword: PromptTemplate,
}

/// Built-in table, shared by [`compose`](super::compose).
pub static DEFAULT_TEMPLATES: LazyLock<TemplateTable> = LazyLock::new(TemplateTable::default);

impl TemplateTable {
    /// The template used for `classification`.
    pub fn template_for(&self, classification: Classification) -> &PromptTemplate {
        match classification {
            Classification::ScriptureReference => &self.scripture_reference,
            Classification::ProperName => &self.proper_name,
            Classification::Keyword => &self.keyword,
        }
    }

    /// Parse a table from JSON.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Load a table from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::TemplateRead {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        Self::from_json(&content).map_err(|e| ConfigError::TemplateParse {
            path: path.display().to_string(),
            message: e.to_string(),
        })
    }
}

impl Default for TemplateTable {
    fn default() -> Self {
        Self {
            guidelines: "Use clear, specific words based on {doctrine} doctrine. \
                Use bulleted list for formatting and readability. \
                Avoid unnecessary instructions or bland statements. \
                Provide response in proper order and do not add anything else. \
                Provide high quality and real-life illustration if required."
                .into(),
            scripture_reference: PromptTemplate {
                request: "Provide Sermon Title:".into(),
                sections: vec![
                    OutlineSection::new(
                        "Opening Hook",
                        "Grab attention and connect with the audience. Start with a relatable \
                         biblical story, a striking question, or a vivid image. Refrain from \
                         using corny stories or cliches.",
                    ),
                    OutlineSection::new(
                        "Core Principle",
                        "Introduce a short Bible verse, quote, or principle tied to your theme. \
                         Briefly provide three in-depth explanations of the context or meaning \
                         in simple terms. Support these with biblical verses.",
                    ),
                    OutlineSection::new(
                        "Problem",
                        "Highlight a relatable struggle or tension. Describe a common human \
                         challenge tied to your theme (e.g., doubt, fear, exhaustion). Use \
                         biblical accounts.",
                    ),
                    OutlineSection::new(
                        "Turn",
                        "Offer hope and a solution through the core principle. Connect the \
                         struggle to the scripture or principle and share how it transforms \
                         the problem with practical or spiritual insight. Use biblical accounts.",
                    ),
                    OutlineSection::new(
                        "Application",
                        "Make it actionable for the audience. Give 1-2 clear, practical steps \
                         for life application. Use biblical accounts.",
                    ),
                    OutlineSection::new(
                        "Closing",
                        "Inspire and send them out with purpose. End with a powerful statement, \
                         prayer, or call to action.",
                    ),
                ],
                closing: Some("These must be based on the Bible verse {input}.".into()),
            },
            proper_name: PromptTemplate {
                request: "Provide biblical genealogy, historical biography, spouse name or \
                    concubines if any for the name {input}."
                    .into(),
                sections: Vec::new(),
                closing: None,
            },
            keyword: PromptTemplate {
                request: "Provide a biblical description for the keyword '{input}'. \
                    Provide significant events and controversies. \
                    Provide historical events that support it."
                    .into(),
                sections: Vec::new(),
                closing: None,
            },
        }
    }
}

/// Substitute `{name}` placeholders in one pass.
///
/// Substituted values are not rescanned, and unknown placeholders are kept
/// verbatim.
pub fn render_placeholders(template: &str, vars: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        let (before, from_open) = rest.split_at(open);
        out.push_str(before);
        let Some(after_open) = from_open.strip_prefix('{') else {
            break;
        };
        let Some(close) = after_open.find('}') else {
            out.push_str(from_open);
            rest = "";
            break;
        };
        let (name, tail) = after_open.split_at(close);
        if name.contains('{') {
            // Not a placeholder; keep the brace and rescan from the next one.
            out.push('{');
            rest = after_open;
            continue;
        }
        match vars.iter().find(|(key, _)| *key == name) {
            Some((_, value)) => out.push_str(value),
            None => {
                out.push('{');
                out.push_str(name);
                out.push('}');
            }
        }
        rest = tail.strip_prefix('}').unwrap_or(tail);
    }
    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_outline_order() {
        let table = TemplateTable::default();
        let names: Vec<&str> = table
            .scripture_reference
            .sections
            .iter()
            .map(|s| s.name.as_str())
            .collect();
        assert_eq!(
            names,
            vec![
                "Opening Hook",
                "Core Principle",
                "Problem",
                "Turn",
                "Application",
                "Closing"
            ]
        );
        assert!(table.proper_name.sections.is_empty());
    }

    #[test]
    fn template_for_each_classification() {
        let table = TemplateTable::default();
        assert!(
            table
                .template_for(Classification::ProperName)
                .request
                .contains("genealogy")
        );
        assert!(
            table
                .template_for(Classification::Keyword)
                .request
                .contains("biblical description")
        );
        assert!(
            table
                .template_for(Classification::ScriptureReference)
                .request
                .contains("Sermon")
        );
    }

    #[test]
    fn partial_json_falls_back_to_defaults() {
        let table = TemplateTable::from_json(
            r#"{
                "scripture_reference": {
                    "request": "Outline a short devotional:",
                    "sections": [
                        {"name": "Hook", "guidance": "One sentence."},
                        {"name": "Prayer", "guidance": "Two sentences."}
                    ]
                }
            }"#,
        )
        .unwrap();
        assert_eq!(table.scripture_reference.sections.len(), 2);
        assert!(table.scripture_reference.closing.is_none());
        assert_eq!(table.proper_name, TemplateTable::default().proper_name);
        assert_eq!(table.guidelines, TemplateTable::default().guidelines);
    }

    #[test]
    fn load_reports_missing_file() {
        let err = TemplateTable::load("/nonexistent/templates.json").unwrap_err();
        assert!(matches!(err, ConfigError::TemplateRead { .. }));
    }

    #[test]
    fn placeholders_substituted() {
        let out = render_placeholders(
            "Use {doctrine} views on {input}.",
            &[("input", "Moses"), ("doctrine", "Seventh-day Adventist")],
        );
        assert_eq!(out, "Use Seventh-day Adventist views on Moses.");
    }

    #[test]
    fn substituted_values_not_rescanned() {
        let out = render_placeholders(
            "{input} / {doctrine}",
            &[("input", "{doctrine}"), ("doctrine", "SDA")],
        );
        assert_eq!(out, "{doctrine} / SDA");
    }

    #[test]
    fn unknown_and_unbalanced_braces_kept() {
        assert_eq!(render_placeholders("{other} x", &[]), "{other} x");
        assert_eq!(render_placeholders("open { only", &[]), "open { only");
        assert_eq!(
            render_placeholders("{a {input}}", &[("input", "Ruth")]),
            "{a Ruth}"
        );
    }
}
