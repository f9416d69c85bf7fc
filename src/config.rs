use crate::error::TranslateError;
use serde::{Deserialize, Serialize};
use warrant_refs::ResolverConfig;

/// Default bound on the nesting of logical expressions.
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Settings for a [`RuleTranslator`](crate::RuleTranslator).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TranslatorConfig {
    pub resolver: ResolverConfig,
    pub max_depth: usize,
}

impl Default for TranslatorConfig {
    fn default() -> Self {
        Self {
            resolver: ResolverConfig::default(),
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl TranslatorConfig {
    /// Loads a configuration from JSON. Missing fields keep their defaults.
    pub fn from_json(json: &str) -> Result<Self, TranslateError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn with_auth_identifier(mut self, name: impl Into<String>) -> Self {
        self.resolver.auth_identifier = name.into();
        self
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}
