use anyhow::{bail, Result};
use clap::Args;
use colored::Colorize;
use std::path::PathBuf;

use crate::adapters::default_adapters;
use crate::core::cancel::CancellationToken;
use crate::core::config::Config;
use crate::core::engine::FixEngine;
use crate::core::violation::Violation;
use crate::fixers::default_registry;
use crate::model::TextSpan;
use crate::utils::fs::read_snapshot;

#[derive(Args, Debug)]
pub struct PreviewArgs {
    /// Snapshot file to preview against
    pub snapshot: PathBuf,

    /// Rule ID of the violation, e.g. CA2224
    #[arg(long)]
    pub rule: String,

    /// Byte offset where the violation starts
    #[arg(long)]
    pub start: usize,

    /// Byte offset where the violation ends
    #[arg(long)]
    pub end: usize,

    /// Diagnostic property as key=value (repeatable)
    #[arg(long = "property", value_parser = parse_property)]
    pub properties: Vec<(String, String)>,
}

fn parse_property(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => {
            Ok((key.trim().to_string(), value.to_string()))
        }
        _ => Err(format!("expected key=value, got '{}'", raw)),
    }
}

pub async fn execute(args: &PreviewArgs) -> Result<()> {
    if args.start > args.end {
        bail!("--start {} is after --end {}", args.start, args.end);
    }
    let root = args.snapshot.parent().map(PathBuf::from).unwrap_or_default();
    let config = Config::load(&root);

    let document = read_snapshot(&args.snapshot)?;
    let mut violation = Violation::new(
        args.rule.clone(),
        document.id().clone(),
        TextSpan::new(args.start, args.end),
    );
    for (key, value) in &args.properties {
        violation = violation.with_property(key.clone(), value.clone());
    }

    let mut engine = FixEngine::new(default_adapters(config.formatting()), default_registry());
    engine.open(document);

    match engine.preview_fix(&violation, &CancellationToken::new()).await? {
        Some(fixed) => print!("{}", fixed.text()),
        None => println!(
            "{} no fix offered for {} at {}",
            "SKIP".yellow(),
            violation.rule,
            violation.span
        ),
    }
    Ok(())
}
