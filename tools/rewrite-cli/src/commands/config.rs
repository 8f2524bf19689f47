//! Configuration management commands.

use std::fs;

use anyhow::{bail, Result};
use dialoguer::Confirm;
use rewrite_stream::{ChunkCollector, HtmlRewriter};

use super::{ConfigArgs, ConfigCommand};
use crate::config::{generate_default_config, CONFIG_NAMES};
use crate::context::Context;

/// Run the config command.
pub fn run(args: ConfigArgs, ctx: &Context) -> Result<()> {
    match args.command {
        ConfigCommand::Show => show_config(ctx),
        ConfigCommand::Init { force } => init_config(force, ctx),
        ConfigCommand::Validate => validate_config(ctx),
    }
}

fn show_config(ctx: &Context) -> Result<()> {
    if ctx.output.is_json() {
        ctx.output.json(&ctx.config);
        return Ok(());
    }

    ctx.output.header("Current Configuration");

    match &ctx.config_path {
        Some(path) => ctx.output.kv("file", &path.display().to_string()),
        None => ctx.output.kv("file", "(defaults)"),
    }
    ctx.output.kv("encoding", &ctx.config.encoding);
    ctx.output.kv("strict", &ctx.config.strict.to_string());
    ctx.output.kv("chunk_size", &ctx.config.chunk_size.to_string());
    if let Some(limit) = ctx.config.max_memory_bytes {
        ctx.output.kv("max_memory_bytes", &limit.to_string());
    }

    if !ctx.config.rules.is_empty() {
        ctx.output.info("");
        ctx.output.info("Rules:");
        for rule in &ctx.config.rules {
            ctx.output.list_item(&rule.describe());
        }
    }

    Ok(())
}

fn init_config(force: bool, ctx: &Context) -> Result<()> {
    let config_path = ctx.cwd.join(CONFIG_NAMES[0]);

    if config_path.exists() && !force {
        if ctx.output.is_json() {
            bail!(
                "Config file already exists: {}. Use --force to overwrite.",
                config_path.display()
            );
        }

        let confirmed = Confirm::new()
            .with_prompt(format!("Overwrite {}?", config_path.display()))
            .default(false)
            .interact()?;

        if !confirmed {
            ctx.output.warn("Init cancelled");
            return Ok(());
        }
    }

    fs::write(&config_path, generate_default_config())?;

    ctx.output.success(&format!("Created: {}", config_path.display()));

    Ok(())
}

fn validate_config(ctx: &Context) -> Result<()> {
    ctx.output.header("Validating configuration");

    let mut errors: Vec<String> = Vec::new();
    let mut warnings: Vec<String> = Vec::new();

    if let Err(e) = ctx.config.validate() {
        errors.push(e.to_string());
    }

    if ctx.config.rules.is_empty() {
        warnings.push("no rules configured; input passes through unchanged".to_string());
    }

    // Encoding and selectors are only checked by building a rewriter.
    if errors.is_empty() {
        if let Err(e) = HtmlRewriter::from_config(&ctx.config, ChunkCollector::new()) {
            errors.push(e.to_string());
        }
    }

    // Print results
    if errors.is_empty() && warnings.is_empty() {
        ctx.output.success("Configuration is valid");
        return Ok(());
    }

    for error in &errors {
        ctx.output.error(&format!("Error: {}", error));
    }

    for warning in &warnings {
        ctx.output.warn(&format!("Warning: {}", warning));
    }

    if !errors.is_empty() {
        bail!("Configuration has {} error(s)", errors.len());
    }

    ctx.output.success("Configuration is valid (with warnings)");

    Ok(())
}
