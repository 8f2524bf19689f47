//! Rewriter configuration.

use serde::{Deserialize, Serialize};

use crate::rule::{RewriteRule, RuleAction};

/// Default read size used when streaming input into the rewriter.
pub const DEFAULT_CHUNK_SIZE: usize = 8 * 1024;

/// Configuration for a rewriter and the rules it applies.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RewriterConfig {
    /// Encoding label (WHATWG), e.g. "utf-8" or "windows-1252".
    #[serde(default = "default_encoding")]
    pub encoding: String,

    /// Reject input the engine can't parse unambiguously.
    #[serde(default = "default_true")]
    pub strict: bool,

    /// Upper bound on engine buffering, in bytes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_memory_bytes: Option<usize>,

    /// Size of the fragments input is fed in.
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,

    /// Rules applied in order.
    #[serde(default)]
    pub rules: Vec<RewriteRule>,
}

fn default_encoding() -> String {
    "utf-8".to_string()
}

fn default_true() -> bool {
    true
}

fn default_chunk_size() -> usize {
    DEFAULT_CHUNK_SIZE
}

impl Default for RewriterConfig {
    fn default() -> Self {
        Self {
            encoding: default_encoding(),
            strict: true,
            max_memory_bytes: None,
            chunk_size: DEFAULT_CHUNK_SIZE,
            rules: Vec::new(),
        }
    }
}

impl RewriterConfig {
    /// Create a new config with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the encoding label.
    pub fn with_encoding(mut self, encoding: impl Into<String>) -> Self {
        self.encoding = encoding.into();
        self
    }

    /// Set strict mode.
    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Set the engine memory limit.
    pub fn with_max_memory_bytes(mut self, bytes: usize) -> Self {
        self.max_memory_bytes = Some(bytes);
        self
    }

    /// Set the input chunk size.
    pub fn with_chunk_size(mut self, bytes: usize) -> Self {
        self.chunk_size = bytes;
        self
    }

    /// Add a rule.
    pub fn with_rule(mut self, rule: RewriteRule) -> Self {
        self.rules.push(rule);
        self
    }

    /// Validate the configuration.
    ///
    /// Selector syntax is checked by the engine when the rule is registered.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.encoding.trim().is_empty() {
            return Err(ConfigError::InvalidValue("encoding cannot be empty".into()));
        }
        if self.chunk_size == 0 {
            return Err(ConfigError::InvalidValue("chunk_size cannot be 0".into()));
        }
        if self.max_memory_bytes == Some(0) {
            return Err(ConfigError::InvalidValue(
                "max_memory_bytes cannot be 0".into(),
            ));
        }

        for (i, rule) in self.rules.iter().enumerate() {
            if rule.selector.trim().is_empty() {
                return Err(ConfigError::InvalidRule(i, "selector cannot be empty".into()));
            }
            if rule.attribute().is_some_and(|name| name.trim().is_empty()) {
                return Err(ConfigError::InvalidRule(i, "attribute cannot be empty".into()));
            }
            match &rule.action {
                RuleAction::ReplaceAttribute { from, .. } if from.is_empty() => {
                    return Err(ConfigError::InvalidRule(i, "from cannot be empty".into()));
                }
                RuleAction::RenameTag { tag } if tag.trim().is_empty() => {
                    return Err(ConfigError::InvalidRule(i, "tag cannot be empty".into()));
                }
                _ => {}
            }
        }

        Ok(())
    }
}

/// Configuration validation errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value: {0}")]
    InvalidValue(String),

    #[error("rules[{0}]: {1}")]
    InvalidRule(usize, String),
}
