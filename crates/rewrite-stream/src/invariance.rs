//! Chunk-boundary invariance checking.
//!
//! The output of a rewrite must not depend on where the input was split.
//! The checker rewrites the input whole, then once per two-way split
//! and once byte-at-a-time, and reports every plan whose output differs.

use rewrite_core::{RewriteError, RewriterConfig};
use tracing::debug;

use crate::chunking::{rewrite_chunked, ChunkPlan};

/// A plan whose output differed from the whole-input output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitMismatch {
    /// How the input was split.
    pub plan: ChunkPlan,
    /// Output produced with that split.
    pub output: Vec<u8>,
}

/// Result of an invariance check.
#[derive(Debug, Clone)]
pub struct InvarianceReport {
    /// Output of the whole-input rewrite.
    pub expected: Vec<u8>,
    /// Number of split plans checked.
    pub plans_checked: usize,
    /// Plans whose output differed.
    pub mismatches: Vec<SplitMismatch>,
}

impl InvarianceReport {
    /// Whether every plan matched.
    pub fn is_invariant(&self) -> bool {
        self.mismatches.is_empty()
    }
}

/// Plans exercised for an input of `len` bytes.
pub fn invariance_plans(len: usize) -> Vec<ChunkPlan> {
    let mut plans: Vec<ChunkPlan> = (1..len).map(|at| ChunkPlan::Boundaries(vec![at])).collect();
    if len > 1 {
        plans.push(ChunkPlan::FixedSize(1));
    }
    plans
}

/// Check that rewriting `input` is independent of chunk boundaries.
pub fn check_chunk_invariance(
    config: &RewriterConfig,
    input: &[u8],
) -> Result<InvarianceReport, RewriteError> {
    check_chunk_invariance_with(config, input, |_, _| {})
}

/// Like `check_chunk_invariance`, calling `progress(done, total)` after each plan.
pub fn check_chunk_invariance_with<F>(
    config: &RewriterConfig,
    input: &[u8],
    mut progress: F,
) -> Result<InvarianceReport, RewriteError>
where
    F: FnMut(usize, usize),
{
    let expected = rewrite_chunked(config, input, &ChunkPlan::Whole)?;
    let plans = invariance_plans(input.len());
    let total = plans.len();
    let mut mismatches = Vec::new();

    for (i, plan) in plans.into_iter().enumerate() {
        let output = rewrite_chunked(config, input, &plan)?;
        if output != expected {
            debug!(plan = %plan.describe(), "output depends on chunk boundaries");
            mismatches.push(SplitMismatch { plan, output });
        }
        progress(i + 1, total);
    }

    debug!(
        plans = total,
        mismatches = mismatches.len(),
        "chunk invariance check finished"
    );

    Ok(InvarianceReport {
        expected,
        plans_checked: total,
        mismatches,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rewrite_core::{RewriteRule, RuleAction};

    #[test]
    fn test_plans_for_length() {
        assert!(invariance_plans(0).is_empty());
        assert!(invariance_plans(1).is_empty());

        let plans = invariance_plans(3);
        assert_eq!(
            plans,
            vec![
                ChunkPlan::Boundaries(vec![1]),
                ChunkPlan::Boundaries(vec![2]),
                ChunkPlan::FixedSize(1),
            ]
        );
    }

    #[test]
    fn test_rules_are_invariant() {
        let config = RewriterConfig::new()
            .with_rule(RewriteRule::upgrade_scheme("a[href]", "href"))
            .with_rule(RewriteRule::new("em", RuleAction::Unwrap))
            .with_rule(RewriteRule::new(
                "p",
                RuleAction::SetAttribute {
                    attribute: "class".into(),
                    value: "x".into(),
                },
            ));
        let input = b"<!-- c --><p>see <em>this</em> <a href=http://x.test/>link</a></p>";

        let mut calls = 0;
        let report = check_chunk_invariance_with(&config, input, |done, total| {
            calls += 1;
            assert!(done <= total);
        })
        .unwrap();

        assert!(report.is_invariant(), "mismatches: {:?}", report.mismatches);
        assert_eq!(report.plans_checked, input.len());
        assert_eq!(calls, input.len());
        assert_eq!(
            String::from_utf8(report.expected).unwrap(),
            r#"<!-- c --><p class="x">see this <a href="https://x.test/">link</a></p>"#
        );
    }

    #[test]
    fn test_empty_input() {
        let report = check_chunk_invariance(&RewriterConfig::new(), b"").unwrap();
        assert!(report.is_invariant());
        assert_eq!(report.plans_checked, 0);
        assert!(report.expected.is_empty());
    }

    #[test]
    fn test_invalid_config_is_error() {
        let config = RewriterConfig::new().with_rule(RewriteRule::new("a[", RuleAction::Remove));
        let result = check_chunk_invariance(&config, b"<a>");
        assert!(matches!(result, Err(RewriteError::InvalidSelector { .. })));
    }
}
