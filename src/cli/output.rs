use colored::*;

use crate::core::action::{FixAction, FixState};
use crate::core::aggregator::AggregateResult;

pub struct OutputFormatter {
    format: String,
}

impl OutputFormatter {
    pub fn new(format: &str) -> Self {
        Self {
            format: format.to_string(),
        }
    }

    pub fn display(&self, results: &[AggregateResult], dry_run: bool) {
        match self.format.as_str() {
            "json" => println!("{}", render_json(results, dry_run)),
            _ => self.display_table(results, dry_run),
        }
    }

    fn display_table(&self, results: &[AggregateResult], dry_run: bool) {
        println!();
        println!("{}", "remedy".bold());
        println!("{}", "─".repeat(64));

        for result in results {
            println!();
            println!(
                "  {} ({}, version {})",
                result.document.id().to_string().cyan(),
                result.document.language(),
                result.document.version()
            );
            println!();
            for action in &result.actions {
                let label = match action.state() {
                    FixState::Realized if dry_run => "DRY-RUN".cyan(),
                    FixState::Realized => "FIXED".green(),
                    FixState::Skipped(_) => "SKIP".yellow(),
                    FixState::Failed(_) => "ERROR".red(),
                    FixState::Registered => "PENDING".dimmed(),
                };
                println!("    {:<8} {}", label, describe(action));
            }
        }

        let realized: usize = results.iter().map(|r| r.realized().count()).sum();
        let skipped: usize = results.iter().map(|r| r.skipped().count()).sum();
        let failed: usize = results.iter().map(|r| r.failed().count()).sum();

        println!();
        println!("{}", "─".repeat(64));
        println!();
        let verb = if dry_run { "would be fixed" } else { "fixed" };
        println!(
            "  {} {}, {} skipped, {} failed",
            realized.to_string().bold(),
            verb,
            skipped,
            failed
        );
        println!();
    }
}

fn describe(action: &FixAction) -> String {
    let violation = action.violation();
    let detail = match action.state() {
        FixState::Skipped(reason) => format!(" ({})", reason),
        FixState::Failed(error) => format!(" ({})", error),
        _ => String::new(),
    };
    format!(
        "[{}] {} at {}{}",
        violation.rule, action.title(), violation.span, detail
    )
}

fn state_name(state: &FixState) -> &'static str {
    match state {
        FixState::Registered => "registered",
        FixState::Realized => "realized",
        FixState::Skipped(_) => "skipped",
        FixState::Failed(_) => "failed",
    }
}

pub fn render_json(results: &[AggregateResult], dry_run: bool) -> String {
    let documents: Vec<_> = results
        .iter()
        .map(|result| {
            let actions: Vec<_> = result
                .actions
                .iter()
                .map(|action| {
                    let reason = match action.state() {
                        FixState::Skipped(reason) => Some(reason.to_string()),
                        FixState::Failed(error) => Some(error.clone()),
                        _ => None,
                    };
                    serde_json::json!({
                        "id": action.id().0,
                        "rule": action.violation().rule,
                        "title": action.title(),
                        "span": action.violation().span,
                        "edit": action.descriptor().kind_name(),
                        "state": state_name(action.state()),
                        "reason": reason,
                    })
                })
                .collect();
            serde_json::json!({
                "document": result.document.id(),
                "language": result.document.language(),
                "version": result.document.version(),
                "actions": actions,
            })
        })
        .collect();
    let output = serde_json::json!({
        "dry_run": dry_run,
        "documents": documents,
    });
    serde_json::to_string_pretty(&output).unwrap_or_default()
}
