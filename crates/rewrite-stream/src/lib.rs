//! Streaming HTML rewriter binding.
//!
//! Wraps the `lol_html` engine behind a register-then-stream API:
//! - `HtmlRewriter` - Encoding + output sink, handlers, chunked writes
//! - `ElementHandlers` / `DocumentHandlers` - Handler objects
//! - `ChunkCollector` - Ordered output accumulator
//! - `ChunkPlan` - Input fragmentation
//! - `check_chunk_invariance` - Chunk-boundary independence check

mod chunking;
pub mod conformance;
mod handlers;
mod invariance;
mod rewriter;
mod rules;
mod sink;

pub use chunking::*;
pub use handlers::*;
pub use invariance::*;
pub use rewriter::*;
pub use rules::*;
pub use sink::*;

/// Element content types handed to handlers.
pub use lol_html::html_content;
pub use lol_html::HandlerResult;

pub use rewrite_core::{
    ConfigError, InsertPosition, RewriteError, RewriteRule, RewriterConfig, RuleAction,
    StreamPhase, StreamStats,
};
