//! `tandem status`: pair visibility and planned actions, without mutation.

use anyhow::{Context, Result};
use chrono::Utc;
use clap::Args;
use colored::Colorize;
use serde::Serialize;
use tabled::{settings::Style, Table, Tabled};

use tandem_core::{PairKind, RepoPair, Settings};
use tandem_sync::{classify_status, load_inventories, merge_inventories, plan_pair, PlannedAction, StatusTag};

use super::{block_on, SourceArgs};

/// Arguments for `tandem status`.
#[derive(Args, Debug)]
pub struct StatusArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Emit machine-readable JSON.
    #[arg(long)]
    pub json: bool,
}

impl StatusArgs {
    pub fn run(self) -> Result<()> {
        let settings = self.source.settings()?;
        let (local, remote) = self.source.inventories(&settings);

        let (locals, remotes) = block_on(load_inventories(&local, &remote))?
            .context("failed to load inventories")?;
        let pairs = merge_inventories(locals, remotes);
        let rows: Vec<PairStatus> = pairs.values().map(|pair| pair_status(pair, &settings)).collect();

        if self.json {
            print_json(&settings, rows)?;
            return Ok(());
        }
        print_table(&settings, rows);
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize)]
struct PairStatus {
    name: String,
    kind: PairKind,
    local_path: Option<String>,
    local_branch: Option<String>,
    github_name: Option<String>,
    github_url: Option<String>,
    tags: Vec<StatusTag>,
    /// `None` when the pair is held back by its tags.
    action: Option<PlannedAction>,
}

#[derive(Serialize)]
struct StatusReportJson {
    generated_at: String,
    owner: String,
    src_dir: String,
    summary: StatusSummaryJson,
    pairs: Vec<PairStatus>,
}

#[derive(Serialize)]
struct StatusSummaryJson {
    pairs: usize,
    complete: usize,
    local_only: usize,
    github_only: usize,
    excluded: usize,
}

#[derive(Tabled)]
struct StatusTableRow {
    #[tabled(rename = "")]
    indicator: String,
    #[tabled(rename = "repo")]
    name: String,
    #[tabled(rename = "local")]
    local: String,
    #[tabled(rename = "github")]
    github: String,
    #[tabled(rename = "status")]
    status: String,
    #[tabled(rename = "next")]
    next: String,
}

fn pair_status(pair: &RepoPair, settings: &Settings) -> PairStatus {
    let tags = classify_status(pair, &settings.default_branch);
    let action = tags.is_empty().then(|| plan_pair(pair, settings));
    PairStatus {
        name: pair.name.to_string(),
        kind: pair.kind(),
        local_path: pair.local.as_ref().map(|l| l.path.display().to_string()),
        local_branch: pair.local.as_ref().map(|l| l.branch.clone()),
        github_name: pair.remote.as_ref().map(|r| r.name.to_string()),
        github_url: pair.remote.as_ref().map(|r| r.url.clone()),
        tags,
        action,
    }
}

fn summary(rows: &[PairStatus]) -> StatusSummaryJson {
    let count = |kind: PairKind| rows.iter().filter(|r| r.kind == kind).count();
    StatusSummaryJson {
        pairs: rows.len(),
        complete: count(PairKind::Complete),
        local_only: count(PairKind::LocalOnly),
        github_only: count(PairKind::RemoteOnly),
        excluded: rows.iter().filter(|r| !r.tags.is_empty()).count(),
    }
}

fn print_json(settings: &Settings, rows: Vec<PairStatus>) -> Result<()> {
    let payload = StatusReportJson {
        generated_at: Utc::now().to_rfc3339(),
        owner: settings.owner.to_string(),
        src_dir: settings.src_dir.display().to_string(),
        summary: summary(&rows),
        pairs: rows,
    };
    println!(
        "{}",
        serde_json::to_string_pretty(&payload).context("failed to serialize status JSON")?
    );
    Ok(())
}

fn print_table(settings: &Settings, rows: Vec<PairStatus>) {
    let totals = summary(&rows);
    println!(
        "Tandem v{} | {} | {} pairs | {} complete | {} local only | {} github only | {} held back",
        env!("CARGO_PKG_VERSION"),
        settings.owner,
        totals.pairs,
        totals.complete,
        totals.local_only,
        totals.github_only,
        totals.excluded,
    );
    if rows.is_empty() {
        println!("No repositories found.");
        return;
    }

    let separator = "■".repeat(67).bright_black().to_string();
    println!("{separator}");
    println!(
        "Indicators: {} COMPLETE  {} LOCAL ONLY  {} GITHUB ONLY  {} HELD BACK",
        "■".green().bold(),
        "■".yellow().bold(),
        "■".magenta().bold(),
        "■".red().bold(),
    );
    println!("{separator}");

    let held_back = totals.excluded;
    let table_rows: Vec<StatusTableRow> = rows
        .into_iter()
        .map(|row| StatusTableRow {
            indicator: indicator(&row),
            local: match (&row.local_path, &row.local_branch) {
                (Some(_), Some(branch)) => branch.clone(),
                _ => "-".to_string(),
            },
            github: row.github_name.clone().unwrap_or_else(|| "-".to_string()),
            status: if row.tags.is_empty() {
                "ok".to_string()
            } else {
                row.tags.iter().map(|t| t.key()).collect::<Vec<_>>().join(", ")
            },
            next: row
                .action
                .as_ref()
                .map(ToString::to_string)
                .unwrap_or_else(|| "fix manually".to_string()),
            name: row.name,
        })
        .collect();
    let mut table = Table::new(table_rows);
    table.with(Style::rounded());
    println!("{table}");

    if held_back > 0 {
        println!("Held-back repositories are skipped by 'tandem sync' until they are clean and on the default branch.");
    }
}

fn indicator(row: &PairStatus) -> String {
    if !row.tags.is_empty() {
        return "■".red().bold().to_string();
    }
    match row.kind {
        PairKind::Complete => "■".green().bold().to_string(),
        PairKind::LocalOnly => "■".yellow().bold().to_string(),
        PairKind::RemoteOnly => "■".magenta().bold().to_string(),
        PairKind::Empty => "■".bright_black().bold().to_string(),
    }
}
