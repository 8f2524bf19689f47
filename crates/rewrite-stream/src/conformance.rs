//! Scheme-upgrade conformance scenario.
//!
//! An `a[href]` handler rewrites `http:` to `https:` while the input
//! arrives in fragments that split the start tag mid-attribute.

use rewrite_core::RewriteError;

use crate::handlers::ElementHandlers;
use crate::rewriter::HtmlRewriter;
use crate::sink::ChunkCollector;

/// Input fragments, written in order.
pub const FRAGMENTS: [&str; 3] = ["<div><a href=", "http://example.com>", "</a></div>"];

/// Exact expected output.
pub const EXPECTED: &str = r#"<div><a href="https://example.com"></a></div>"#;

/// Outcome of running the scenario.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConformanceOutcome {
    /// Concatenated output chunks.
    pub output: Vec<u8>,
    /// Number of chunks the sink received.
    pub chunks: usize,
}

impl ConformanceOutcome {
    /// Whether the output matches `EXPECTED` byte for byte.
    pub fn passed(&self) -> bool {
        self.output == EXPECTED.as_bytes()
    }
}

/// Handler replacing the first `http:` in `href` with `https:`.
pub fn scheme_upgrade_handler() -> ElementHandlers {
    ElementHandlers::new().element(|el| {
        if let Some(href) = el.get_attribute("href") {
            el.set_attribute("href", &href.replacen("http:", "https:", 1))?;
        }
        Ok(())
    })
}

/// Run the scenario over the given fragments.
pub fn run_with_fragments<'a, I>(fragments: I) -> Result<ConformanceOutcome, RewriteError>
where
    I: IntoIterator<Item = &'a [u8]>,
{
    let collector = ChunkCollector::new();
    let mut rewriter = HtmlRewriter::new("utf8", collector.clone())?;
    rewriter.on("a[href]", scheme_upgrade_handler())?;

    for fragment in fragments {
        rewriter.write(fragment)?;
    }
    rewriter.end()?;

    Ok(ConformanceOutcome {
        output: collector.concat(),
        chunks: collector.chunk_count(),
    })
}

/// Run the scenario with the canonical fragments.
pub fn run() -> Result<ConformanceOutcome, RewriteError> {
    run_with_fragments(FRAGMENTS.iter().map(|f| f.as_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_fragments_pass() {
        let outcome = run().unwrap();
        assert!(outcome.passed(), "got {:?}", String::from_utf8_lossy(&outcome.output));
        assert!(outcome.chunks >= 1);
    }

    #[test]
    fn test_wrong_output_does_not_pass() {
        let outcome = ConformanceOutcome {
            output: b"<div></div>".to_vec(),
            chunks: 1,
        };
        assert!(!outcome.passed());
    }
}
