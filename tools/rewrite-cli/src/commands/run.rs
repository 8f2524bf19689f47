//! Stream a document through the configured rules.

use std::fs::File;
use std::io::{self, BufWriter, Read, Write};

use anyhow::{Context as _, Result};
use rewrite_core::{RewriteRule, RewriterConfig, StreamStats};
use rewrite_stream::{HtmlRewriter, WriterSink};
use tracing::info;

use super::RunArgs;
use crate::context::Context;

/// Run the run command.
pub fn run(args: RunArgs, ctx: &Context) -> Result<()> {
    let config = effective_config(&ctx.config, &args);
    config.validate().context("Invalid configuration")?;

    let reader: Box<dyn Read> = match &args.input {
        Some(path) => {
            let path = ctx.resolve_path(path);
            Box::new(
                File::open(&path)
                    .with_context(|| format!("Failed to open input: {}", path.display()))?,
            )
        }
        None => Box::new(io::stdin().lock()),
    };

    let writer: Box<dyn Write> = match &args.output {
        Some(path) => {
            let path = ctx.resolve_path(path);
            Box::new(BufWriter::new(File::create(&path).with_context(|| {
                format!("Failed to create output: {}", path.display())
            })?))
        }
        None => Box::new(io::stdout().lock()),
    };

    info!(
        rules = config.rules.len(),
        chunk_size = config.chunk_size,
        "streaming input"
    );

    let stats = stream(&config, reader, writer)?;

    if args.stats {
        ctx.output.stats(&stats);
    }

    Ok(())
}

/// Rewrite `reader` into `writer`, reading `chunk_size` bytes at a time.
fn stream<R, W>(config: &RewriterConfig, mut reader: R, writer: W) -> Result<StreamStats>
where
    R: Read,
    W: Write,
{
    let sink = WriterSink::new(writer);
    let sink_errors = sink.error_handle();
    let mut rewriter = HtmlRewriter::from_config(config, sink)?;

    let mut buf = vec![0u8; config.chunk_size];
    loop {
        let n = match reader.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e).context("Failed to read input"),
        };

        rewriter.write(&buf[..n])?;

        if let Some(e) = sink_errors.take_error() {
            return Err(e).context("Failed to write output");
        }
    }

    let stats = rewriter.end()?;

    // The final flush happens inside `end`.
    if let Some(e) = sink_errors.take_error() {
        return Err(e).context("Failed to write output");
    }

    Ok(stats)
}

/// Config with command-line overrides applied.
fn effective_config(base: &RewriterConfig, args: &RunArgs) -> RewriterConfig {
    let mut config = base.clone();

    if let Some(size) = args.chunk_size {
        config.chunk_size = size;
    }
    if args.https {
        config.rules.push(RewriteRule::upgrade_scheme("a[href]", "href"));
    }

    config
}
