//! Static model catalog, token-budget bounds, and the doctrine set.

use std::fmt;
use std::str::FromStr;

use crate::ConfigError;

/// A selectable model and the largest completion budget it accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModelConfig {
    pub identifier: &'static str,
    pub max_token_ceiling: u32,
}

/// Models offered for selection, in display order. The first is the default.
pub const MODELS: &[ModelConfig] = &[
    ModelConfig {
        identifier: "deepseek-r1-distill-llama-70b",
        max_token_ceiling: 32768,
    },
    ModelConfig {
        identifier: "deepseek-r1-distill-qwen-32b",
        max_token_ceiling: 16384,
    },
    ModelConfig {
        identifier: "deepseek-r1-distill-llama-70b-specdec",
        max_token_ceiling: 16384,
    },
];

/// Smallest selectable completion budget.
pub const MIN_MAX_TOKENS: u32 = 8192;
/// Budget granularity; every budget is a multiple of this.
pub const MAX_TOKENS_STEP: u32 = 8192;
/// Budget chosen on model selection when the model allows it.
pub const PREFERRED_MAX_TOKENS: u32 = 16384;

/// Default Bible translation named in every prompt.
pub const DEFAULT_BIBLE_VERSION: &str = "New King James Version";

/// The default model (first catalog entry).
pub fn default_model() -> &'static ModelConfig {
    &MODELS[0]
}

/// Look up a model by identifier.
pub fn find_model(identifier: &str) -> Result<&'static ModelConfig, ConfigError> {
    let wanted = identifier.trim();
    MODELS
        .iter()
        .find(|m| m.identifier == wanted)
        .ok_or_else(|| ConfigError::UnknownModel(wanted.to_string()))
}

impl ModelConfig {
    /// Budget used right after selecting this model.
    pub fn default_max_tokens(&self) -> u32 {
        PREFERRED_MAX_TOKENS.min(self.max_token_ceiling)
    }

    /// All budgets this model accepts, ascending.
    pub fn max_token_choices(&self) -> Vec<u32> {
        (MIN_MAX_TOKENS..=self.max_token_ceiling)
            .step_by(MAX_TOKENS_STEP as usize)
            .collect()
    }

    /// Accept `requested` if it is on the step grid within this model's bounds.
    pub fn validate_max_tokens(&self, requested: u32) -> Result<u32, ConfigError> {
        let in_range = (MIN_MAX_TOKENS..=self.max_token_ceiling).contains(&requested);
        if in_range && (requested - MIN_MAX_TOKENS) % MAX_TOKENS_STEP == 0 {
            Ok(requested)
        } else {
            Err(ConfigError::TokenBudget {
                model: self.identifier.to_string(),
                requested,
                min: MIN_MAX_TOKENS,
                max: self.max_token_ceiling,
                step: MAX_TOKENS_STEP,
            })
        }
    }
}

impl fmt::Display for ModelConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} (up to {} tokens)",
            self.identifier, self.max_token_ceiling
        )
    }
}

// ── Doctrine ───────────────────────────────────────────────────────

/// Denominational lens injected into every prompt's style guidance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Doctrine {
    #[default]
    SundayKeepers,
    SeventhDayAdventist,
}

impl Doctrine {
    pub const ALL: [Doctrine; 2] = [Doctrine::SundayKeepers, Doctrine::SeventhDayAdventist];

    /// The label substituted into prompts.
    pub fn label(self) -> &'static str {
        match self {
            Doctrine::SundayKeepers => "Roman Catholic and other Sunday Keepers",
            Doctrine::SeventhDayAdventist => "Seventh-day Adventist",
        }
    }

    /// The label as shown in selectors and the session banner.
    pub fn selector_label(self) -> String {
        self.label().to_uppercase()
    }

    fn aliases(self) -> &'static [&'static str] {
        match self {
            Doctrine::SundayKeepers => &["sunday", "catholic", "sunday-keepers"],
            Doctrine::SeventhDayAdventist => &["sda", "adventist", "seventh-day"],
        }
    }
}

impl fmt::Display for Doctrine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Doctrine {
    type Err = ConfigError;

    /// Accepts the full label or a short alias, case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Doctrine::ALL
            .into_iter()
            .find(|d| d.label().to_lowercase() == wanted || d.aliases().contains(&wanted.as_str()))
            .ok_or_else(|| ConfigError::UnknownDoctrine(s.trim().to_string()))
    }
}
