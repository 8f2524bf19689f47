//! Core types for the streaming HTML rewriter.
//!
//! This crate provides the engine-independent pieces:
//! - `RewriterConfig` - Encoding, limits and rules
//! - `RewriteRule` - Declarative selector-scoped rewrites
//! - `StreamPhase` / `StreamStats` - Rewriter lifecycle tracking
//! - `RewriteError` - Errors surfaced by the binding

mod config;
mod error;
mod lifecycle;
mod rule;

pub use config::*;
pub use error::*;
pub use lifecycle::*;
pub use rule::*;
