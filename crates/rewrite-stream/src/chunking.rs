//! Input fragmentation for chunked writes.

use rewrite_core::{RewriteError, RewriterConfig};

use crate::rewriter::HtmlRewriter;
use crate::sink::ChunkCollector;

/// How input is split before being fed to a rewriter.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ChunkPlan {
    /// Feed everything in one write.
    #[default]
    Whole,
    /// Fixed-size fragments; the last one may be shorter.
    FixedSize(usize),
    /// Split at the given byte offsets.
    Boundaries(Vec<usize>),
}

impl ChunkPlan {
    /// Split `input` into fragments whose concatenation is `input`.
    ///
    /// Out-of-range and duplicate boundaries are ignored; no empty
    /// fragment is produced for non-empty input.
    pub fn split<'a>(&self, input: &'a [u8]) -> Vec<&'a [u8]> {
        match self {
            Self::Whole => vec![input],
            Self::FixedSize(0) => vec![input],
            Self::FixedSize(size) => input.chunks(*size).collect(),
            Self::Boundaries(offsets) => {
                let mut offsets: Vec<usize> = offsets
                    .iter()
                    .copied()
                    .filter(|&at| at > 0 && at < input.len())
                    .collect();
                offsets.sort_unstable();
                offsets.dedup();

                let mut fragments = Vec::with_capacity(offsets.len() + 1);
                let mut start = 0;
                for at in offsets {
                    fragments.push(&input[start..at]);
                    start = at;
                }
                fragments.push(&input[start..]);
                fragments
            }
        }
    }

    /// Short label for reports.
    pub fn describe(&self) -> String {
        match self {
            Self::Whole => "whole input".to_string(),
            Self::FixedSize(size) => format!("{}-byte chunks", size),
            Self::Boundaries(offsets) => {
                let offsets: Vec<String> = offsets.iter().map(|o| o.to_string()).collect();
                format!("split at {}", offsets.join(", "))
            }
        }
    }
}

/// Rewrite `input` with the config's rules, feeding it per `plan`.
pub fn rewrite_chunked(
    config: &RewriterConfig,
    input: &[u8],
    plan: &ChunkPlan,
) -> Result<Vec<u8>, RewriteError> {
    let collector = ChunkCollector::new();
    let mut rewriter = HtmlRewriter::from_config(config, collector.clone())?;

    for fragment in plan.split(input) {
        rewriter.write(fragment)?;
    }
    rewriter.end()?;

    Ok(collector.concat())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rewrite_core::RewriteRule;

    #[test]
    fn test_whole_plan() {
        assert_eq!(ChunkPlan::Whole.split(b"abc"), vec![&b"abc"[..]]);
        assert_eq!(ChunkPlan::default(), ChunkPlan::Whole);
    }

    #[test]
    fn test_fixed_size_plan() {
        let parts = ChunkPlan::FixedSize(2).split(b"abcde");
        assert_eq!(parts, vec![&b"ab"[..], &b"cd"[..], &b"e"[..]]);
        assert_eq!(ChunkPlan::FixedSize(0).split(b"abc").len(), 1);
    }

    #[test]
    fn test_boundaries_plan_normalizes_offsets() {
        let plan = ChunkPlan::Boundaries(vec![4, 0, 2, 2, 99]);
        let parts = plan.split(b"abcdef");
        assert_eq!(parts, vec![&b"ab"[..], &b"cd"[..], &b"ef"[..]]);
        assert_eq!(parts.concat(), b"abcdef");
    }

    #[test]
    fn test_describe() {
        assert_eq!(ChunkPlan::FixedSize(8).describe(), "8-byte chunks");
        assert_eq!(ChunkPlan::Boundaries(vec![1, 5]).describe(), "split at 1, 5");
    }

    #[test]
    fn test_rewrite_chunked_matches_whole() {
        let config = RewriterConfig::new().with_rule(RewriteRule::upgrade_scheme("a[href]", "href"));
        let input = b"<ul><li><a href=http://one>1</a><li><a href='http://two'>2</a></ul>";

        let whole = rewrite_chunked(&config, input, &ChunkPlan::Whole).unwrap();
        let bytewise = rewrite_chunked(&config, input, &ChunkPlan::FixedSize(1)).unwrap();

        assert_eq!(whole, bytewise);
        assert_eq!(
            String::from_utf8(whole).unwrap(),
            r#"<ul><li><a href="https://one">1</a><li><a href="https://two">2</a></ul>"#
        );
    }
}
