//! Error types for rewriter operations.

use lol_html::errors::{RewritingError, SelectorError};

use crate::config::ConfigError;

/// Error type for rewriter operations.
#[derive(Debug, thiserror::Error)]
pub enum RewriteError {
    #[error("Unsupported encoding: {0}")]
    UnsupportedEncoding(String),

    #[error("Invalid selector '{selector}': {source}")]
    InvalidSelector {
        selector: String,
        #[source]
        source: SelectorError,
    },

    #[error("Handlers can't be added after write.")]
    HandlersAfterWrite,

    #[error("Rewriter has already ended")]
    Ended,

    #[error("Rewriter failed earlier: {0}")]
    Failed(String),

    #[error("Rewriting error: {0}")]
    Rewriting(#[from] RewritingError),

    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),
}
