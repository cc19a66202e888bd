use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::adapters::default_adapters;
use crate::cli::output::OutputFormatter;
use crate::cli::progress::FixProgress;
use crate::core::cancel::CancellationToken;
use crate::core::config::Config;
use crate::core::engine::FixEngine;
use crate::core::violation::Violation;
use crate::fixers::default_registry;
use crate::model::DocumentId;
use crate::utils::fs::{find_snapshots, read_snapshot, read_violations, write_snapshot};

#[derive(Args, Debug)]
pub struct FixArgs {
    /// Snapshot file or directory of *.snapshot.json files (defaults to current directory)
    #[arg(default_value = ".")]
    pub path: PathBuf,

    /// JSON array of violations reported by the analyzer
    #[arg(long)]
    pub violations: PathBuf,

    /// Report what would be fixed without writing snapshots
    #[arg(long)]
    pub dry_run: bool,

    /// Only fix violations of these rules (comma-separated, e.g. CA2224,CA1804)
    #[arg(long, value_delimiter = ',')]
    pub only: Option<Vec<String>>,

    /// Output format: table, json
    #[arg(long, default_value = "table")]
    pub format: String,
}

/// Drops violations excluded by `--only` or the config's ignore list.
fn select(violations: Vec<Violation>, only: Option<&[String]>, config: &Config) -> Vec<Violation> {
    violations
        .into_iter()
        .filter(|v| only.map_or(true, |ids| ids.iter().any(|id| id.eq_ignore_ascii_case(&v.rule))))
        .filter(|v| !config.is_ignored(&v.rule))
        .collect()
}

pub async fn execute(args: &FixArgs) -> Result<()> {
    let root = if args.path.is_file() {
        args.path.parent().map(PathBuf::from).unwrap_or_default()
    } else {
        args.path.clone()
    };
    let config = Config::load(&root);

    let mut engine = FixEngine::new(default_adapters(config.formatting()), default_registry());
    let mut paths: BTreeMap<DocumentId, PathBuf> = BTreeMap::new();
    for path in find_snapshots(&args.path) {
        let document = read_snapshot(&path)?;
        log::debug!("loaded {} from {}", document.id(), path.display());
        paths.insert(document.id().clone(), path);
        engine.open(document);
    }
    if paths.is_empty() {
        println!("{}", "No snapshots found.".yellow());
        return Ok(());
    }

    let violations = select(
        read_violations(&args.violations)?,
        args.only.as_deref(),
        &config,
    );
    let mut registered = 0;
    for violation in violations {
        let rule = violation.rule.clone();
        match engine.register(violation).await {
            Ok(Some(_)) => registered += 1,
            Ok(None) => {}
            Err(e) => log::warn!("{}: {}", rule, e),
        }
    }
    if registered == 0 {
        println!("{}", "No fixable violations found.".green());
        return Ok(());
    }

    let token = CancellationToken::new();
    let on_interrupt = token.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            log::warn!("interrupted, finishing with the fixes applied so far");
            on_interrupt.cancel();
        }
    });

    let progress = FixProgress::new(registered);
    let reporter = progress.clone();
    let results = engine
        .apply_all_with_progress(&token, move |action| reporter.realized(action))
        .await?;
    progress.finish();

    if !args.dry_run {
        for result in &results {
            if result.realized().count() == 0 {
                continue;
            }
            let path = paths
                .get(result.document.id())
                .with_context(|| format!("No snapshot path for {}", result.document.id()))?;
            write_snapshot(path, &result.document)?;
        }
    }

    OutputFormatter::new(&args.format).display(&results, args.dry_run);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::TextSpan;
    use crate::testing::{csharp_document, span_of, CSHARP_EQUALS_FIXED};
    use std::fs;
    use tempfile::TempDir;

    fn violation(rule: &str) -> Violation {
        Violation::new(rule, DocumentId::from("docA"), TextSpan::new(0, 1))
    }

    #[test]
    fn test_only_flag_filters_violations() {
        let violations = vec![violation("CA2224"), violation("CA1804"), violation("CA1062")];
        let only = vec!["ca2224".to_string(), "CA1062".to_string()];
        let selected = select(violations, Some(&only), &Config::default());
        let rules: Vec<_> = selected.iter().map(|v| v.rule.as_str()).collect();
        assert_eq!(rules, vec!["CA2224", "CA1062"]);
    }

    #[test]
    fn test_config_ignore_filters_violations() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(".remedy.yml"), "ignore:\n  rules:\n    - CA1804\n").unwrap();
        let config = Config::load(tmp.path());
        let selected = select(vec![violation("CA2224"), violation("CA1804")], None, &config);
        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].rule, "CA2224");
    }

    #[tokio::test]
    async fn test_fix_writes_updated_snapshot() {
        let tmp = TempDir::new().unwrap();
        let document = csharp_document();
        let snapshot = tmp.path().join("p.snapshot.json");
        write_snapshot(&snapshot, &document).unwrap();

        let violations = vec![Violation::new(
            "CA2224",
            DocumentId::from("docA"),
            span_of(&document, "P"),
        )];
        let violations_path = tmp.path().join("violations.json");
        fs::write(&violations_path, serde_json::to_string(&violations).unwrap()).unwrap();

        let args = FixArgs {
            path: tmp.path().to_path_buf(),
            violations: violations_path.clone(),
            dry_run: false,
            only: None,
            format: "json".to_string(),
        };
        execute(&args).await.unwrap();
        assert_eq!(read_snapshot(&snapshot).unwrap().text(), CSHARP_EQUALS_FIXED);
    }

    #[tokio::test]
    async fn test_dry_run_leaves_snapshot() {
        let tmp = TempDir::new().unwrap();
        let document = csharp_document();
        let snapshot = tmp.path().join("p.snapshot.json");
        write_snapshot(&snapshot, &document).unwrap();

        let violations = vec![Violation::new(
            "CA2224",
            DocumentId::from("docA"),
            span_of(&document, "P"),
        )];
        let violations_path = tmp.path().join("violations.json");
        fs::write(&violations_path, serde_json::to_string(&violations).unwrap()).unwrap();

        let args = FixArgs {
            path: snapshot.clone(),
            violations: violations_path,
            dry_run: true,
            only: None,
            format: "json".to_string(),
        };
        execute(&args).await.unwrap();
        assert_eq!(read_snapshot(&snapshot).unwrap().text(), document.text());
    }
}
