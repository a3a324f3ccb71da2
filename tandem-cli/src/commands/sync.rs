//! `tandem sync`: run the full reconciliation pipeline.

use anyhow::{bail, Context, Result};
use clap::Args;
use colored::Colorize;

use tandem_sync::{Converger, Decider, ReconcileReport, Terminal};

use super::{block_on, SourceArgs};
use crate::prompt::{DialoguerDecider, SkipAllDecider};

/// Arguments for `tandem sync`.
#[derive(Args, Debug)]
pub struct SyncArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Report only: answer every question with "skip" and change nothing,
    /// not even remotes or metadata.
    #[arg(long)]
    pub yes_skip: bool,
}

impl SyncArgs {
    pub fn run(self) -> Result<()> {
        let settings = self.source.settings()?;
        let (local, remote) = self.source.inventories(&settings);
        let decider: Box<dyn Decider> = if self.yes_skip {
            Box::new(SkipAllDecider)
        } else {
            Box::new(DialoguerDecider)
        };

        let converger =
            Converger::new(&local, &remote, decider.as_ref(), &settings).dry_run(self.yes_skip);
        let report = block_on(converger.run())?.context("failed to load inventories")?;

        print_report(&report, self.yes_skip);
        if !report.is_success() {
            bail!("{} repositories failed to converge", report.failures.len());
        }
        Ok(())
    }
}

fn print_report(report: &ReconcileReport, dry_run: bool) {
    for excluded in &report.excluded {
        let reasons: Vec<String> = excluded.tags.iter().map(ToString::to_string).collect();
        println!("{} '{}' held back: {}", "!".yellow().bold(), excluded.name, reasons.join("; "));
    }
    for failure in &report.failures {
        println!("{} '{}' failed: {}", "✗".red().bold(), failure.name, failure.error);
    }
    for pair in &report.pairs {
        println!("{} '{}' in sync", "✓".green().bold(), pair.name);
    }
    if dry_run {
        println!("{} dry run: nothing was changed", "!".yellow().bold());
    }
    println!(
        "{} converged | {} removed | {} skipped | {} held back | {} failed",
        report.count(Terminal::Complete),
        report.count(Terminal::PartiallyRemoved),
        report.count(Terminal::Skipped),
        report.excluded.len(),
        report.failures.len(),
    );
}
