//! Application configuration with defaults.
//!
//! [`AppConfig`] gathers what the binary reads from flags and the
//! environment, and converts it into library types via
//! [`build_session_settings`](AppConfig::build_session_settings) and
//! [`build_client`](AppConfig::build_client). Everything is validated here,
//! before any request is sent.

use std::path::PathBuf;

use crate::catalog::{self, DEFAULT_BIBLE_VERSION, Doctrine};
use crate::prompt::TemplateTable;
use crate::session::SessionSettings;
use crate::{ConfigError, DEFAULT_BASE_URL, DEFAULT_TEMPERATURE, GroqClient, ReasoningFormat};

/// Configuration for a chat session.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// API credential. Blank counts as missing.
    pub api_key: Option<String>,
    /// OpenAI-compatible API root. Default: Groq.
    pub base_url: String,
    /// Catalog model identifier. Default: the first catalog entry.
    pub model: String,
    /// Completion budget. `None` uses the model's default.
    pub max_tokens: Option<u32>,
    pub doctrine: Doctrine,
    /// Default: `"New King James Version"`.
    pub bible_version: String,
    /// Sampling temperature. `0` or less omits it from requests. Default: `0.6`.
    pub temperature: f32,
    /// Ask for the model's reasoning as a separate field and show it.
    pub show_reasoning: bool,
    /// JSON template table replacing the built-in wording.
    pub templates_path: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            model: catalog::default_model().identifier.to_string(),
            max_tokens: None,
            doctrine: Doctrine::default(),
            bible_version: DEFAULT_BIBLE_VERSION.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            show_reasoning: false,
            templates_path: None,
        }
    }
}

impl AppConfig {
    /// The credential, trimmed.
    pub fn api_key(&self) -> Result<&str, ConfigError> {
        match self.api_key.as_deref().map(str::trim) {
            Some(key) if !key.is_empty() => Ok(key),
            _ => Err(ConfigError::MissingApiKey),
        }
    }

    /// Build validated [`SessionSettings`], loading the template file if set.
    pub fn build_session_settings(&self) -> Result<SessionSettings, ConfigError> {
        let model = catalog::find_model(&self.model)?;
        let max_tokens = match self.max_tokens {
            Some(n) => model.validate_max_tokens(n)?,
            None => model.default_max_tokens(),
        };
        let templates = match &self.templates_path {
            Some(path) => TemplateTable::load(path)?,
            None => TemplateTable::default(),
        };
        let bible_version = match self.bible_version.trim() {
            "" => DEFAULT_BIBLE_VERSION.to_string(),
            trimmed => trimmed.to_string(),
        };
        Ok(SessionSettings {
            model,
            max_tokens,
            doctrine: self.doctrine,
            bible_version,
            temperature: (self.temperature > 0.0).then_some(self.temperature),
            reasoning_format: Some(if self.show_reasoning {
                ReasoningFormat::Parsed
            } else {
                ReasoningFormat::Hidden
            }),
            templates,
        })
    }

    /// Build the HTTP client. Fails on a missing key or a malformed base URL.
    pub fn build_client(&self) -> Result<GroqClient, ConfigError> {
        let api_key = self.api_key()?;
        let base_url = self.base_url.trim();
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(ConfigError::BaseUrl(base_url.to_string()));
        }
        GroqClient::with_base_url(api_key, base_url)
            .map_err(|e| ConfigError::HttpClient(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_key() -> AppConfig {
        AppConfig {
            api_key: Some("gsk_test".into()),
            ..Default::default()
        }
    }

    #[test]
    fn defaults() {
        let config = AppConfig::default();
        assert_eq!(config.base_url, "https://api.groq.com/openai/v1");
        assert_eq!(config.model, "deepseek-r1-distill-llama-70b");
        assert!((config.temperature - 0.6).abs() < f32::EPSILON);
        assert!(!config.show_reasoning);
    }

    #[test]
    fn missing_or_blank_key_rejected() {
        let mut config = AppConfig::default();
        assert_eq!(config.api_key(), Err(ConfigError::MissingApiKey));
        config.api_key = Some("   ".into());
        assert_eq!(config.api_key(), Err(ConfigError::MissingApiKey));
        assert!(matches!(config.build_client(), Err(ConfigError::MissingApiKey)));
        config.api_key = Some(" gsk_abc \n".into());
        assert_eq!(config.api_key(), Ok("gsk_abc"));
    }

    #[test]
    fn settings_from_defaults() {
        let settings = with_key().build_session_settings().unwrap();
        assert_eq!(settings, SessionSettings::default());
    }

    #[test]
    fn zero_temperature_omitted_and_reasoning_parsed() {
        let config = AppConfig {
            temperature: 0.0,
            show_reasoning: true,
            ..with_key()
        };
        let settings = config.build_session_settings().unwrap();
        assert_eq!(settings.temperature, None);
        assert_eq!(settings.reasoning_format, Some(ReasoningFormat::Parsed));
    }

    #[test]
    fn invalid_model_and_budget_rejected() {
        let config = AppConfig {
            model: "mixtral".into(),
            ..with_key()
        };
        assert_eq!(
            config.build_session_settings(),
            Err(ConfigError::UnknownModel("mixtral".into()))
        );

        let config = AppConfig {
            model: "deepseek-r1-distill-qwen-32b".into(),
            max_tokens: Some(32768),
            ..with_key()
        };
        assert!(matches!(
            config.build_session_settings(),
            Err(ConfigError::TokenBudget { max: 16384, .. })
        ));
    }

    #[test]
    fn templates_loaded_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("templates.json");
        std::fs::write(
            &path,
            r#"{"proper_name": {"request": "Tell me about {input}."}}"#,
        )
        .unwrap();
        let config = AppConfig {
            templates_path: Some(path),
            ..with_key()
        };
        let settings = config.build_session_settings().unwrap();
        assert_eq!(
            settings.templates.proper_name.request,
            "Tell me about {input}."
        );
    }

    #[test]
    fn malformed_template_file_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        std::fs::write(&path, "{ not json").unwrap();
        let config = AppConfig {
            templates_path: Some(path),
            ..with_key()
        };
        assert!(matches!(
            config.build_session_settings(),
            Err(ConfigError::TemplateParse { .. })
        ));
    }

    #[test]
    fn base_url_must_be_http() {
        let config = AppConfig {
            base_url: "ftp://example.com".into(),
            ..with_key()
        };
        assert_eq!(
            config.build_client().unwrap_err(),
            ConfigError::BaseUrl("ftp://example.com".into())
        );
        assert!(with_key().build_client().is_ok());
    }
}
