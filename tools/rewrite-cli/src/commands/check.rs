//! Chunk-boundary invariance checks.

use std::fs;

use anyhow::{anyhow, bail, Context as _, Result};
use rewrite_core::RewriteRule;
use rewrite_stream::conformance::{self, ConformanceOutcome};
use rewrite_stream::{check_chunk_invariance_with, invariance_plans};

use super::CheckArgs;
use crate::context::Context;

/// Mismatching splits listed before truncating.
const MAX_LISTED_MISMATCHES: usize = 10;

/// Run the check command.
pub fn run(args: CheckArgs, ctx: &Context) -> Result<()> {
    if args.builtin {
        return run_builtin(ctx);
    }

    let path = args
        .input
        .as_deref()
        .ok_or_else(|| anyhow!("An input file is required unless --builtin is given"))?;
    let path = ctx.resolve_path(path);
    let input = fs::read(&path).with_context(|| format!("Failed to read input: {}", path.display()))?;

    if input.len() > args.max_bytes {
        bail!(
            "Input is {} bytes; checking every split is limited to {} (use --max-bytes)",
            input.len(),
            args.max_bytes
        );
    }

    let mut config = ctx.config.clone();
    if args.https {
        config.rules.push(RewriteRule::upgrade_scheme("a[href]", "href"));
    }
    if config.rules.is_empty() {
        ctx.output.warn("No rules configured; only passthrough is checked");
    }

    ctx.output.header(&format!("Checking {}", path.display()));
    for rule in &config.rules {
        ctx.output.list_item(&rule.describe());
    }

    let pb = ctx
        .output
        .progress(invariance_plans(input.len()).len() as u64, "splits");
    let report = check_chunk_invariance_with(&config, &input, |done, _| pb.set_position(done as u64))?;
    pb.finish_and_clear();

    if ctx.output.is_json() {
        ctx.output.json(&serde_json::json!({
            "input": path.display().to_string(),
            "plans_checked": report.plans_checked,
            "mismatches": report
                .mismatches
                .iter()
                .map(|m| m.plan.describe())
                .collect::<Vec<_>>(),
        }));
    }

    if !report.is_invariant() {
        for mismatch in report.mismatches.iter().take(MAX_LISTED_MISMATCHES) {
            ctx.output.list_item(&mismatch.plan.describe());
        }
        if report.mismatches.len() > MAX_LISTED_MISMATCHES {
            ctx.output.list_item(&format!(
                "... and {} more",
                report.mismatches.len() - MAX_LISTED_MISMATCHES
            ));
        }
        bail!(
            "Output differs for {} of {} split(s)",
            report.mismatches.len(),
            report.plans_checked
        );
    }

    ctx.output.success(&format!(
        "Output identical across {} split(s)",
        report.plans_checked
    ));

    Ok(())
}

fn run_builtin(ctx: &Context) -> Result<()> {
    ctx.output.header("Built-in scheme-upgrade scenario");
    for fragment in conformance::FRAGMENTS {
        ctx.output.list_item(&format!("{:?}", fragment));
    }

    report_builtin(ctx, &conformance::run()?)
}

fn report_builtin(ctx: &Context, outcome: &ConformanceOutcome) -> Result<()> {
    let output = String::from_utf8_lossy(&outcome.output);

    if ctx.output.is_json() {
        ctx.output.json(&serde_json::json!({
            "passed": outcome.passed(),
            "output": output,
            "expected": conformance::EXPECTED,
            "chunks": outcome.chunks,
        }));
    }

    if !outcome.passed() {
        ctx.output.mismatch(conformance::EXPECTED, &output);
        bail!("fail");
    }

    ctx.output.success(&format!("Output matches: {}", conformance::EXPECTED));

    Ok(())
}
