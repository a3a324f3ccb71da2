//! Terminal deciders for the convergence orchestrator.

use async_trait::async_trait;
use dialoguer::{theme::ColorfulTheme, Select};

use tandem_sync::{Answer, Choice, Decider, SyncError};

const SEPARATOR: &str = "──────────";
const SKIP_LABEL: &str = "skip";

/// One rendered menu: labels in display order, the value behind each line
/// (`None` for the separator and skip lines), and the default index.
#[derive(Debug, PartialEq, Eq)]
struct Menu {
    labels: Vec<String>,
    values: Vec<Option<&'static str>>,
    default: usize,
}

impl Menu {
    fn new(choices: &[Choice]) -> Self {
        let mut labels = Vec::with_capacity(choices.len() + 2);
        let mut values = Vec::with_capacity(choices.len() + 2);
        for choice in choices {
            match choice {
                Choice::Item { label, value } => {
                    labels.push(label.clone());
                    values.push(Some(*value));
                }
                Choice::Separator => {
                    labels.push(SEPARATOR.to_string());
                    values.push(None);
                }
            }
        }
        labels.push(SEPARATOR.to_string());
        values.push(None);
        labels.push(SKIP_LABEL.to_string());
        values.push(None);
        let default = labels.len() - 1;
        Self {
            labels,
            values,
            default,
        }
    }

    /// A separator pick or an aborted prompt counts as skip.
    fn answer(&self, selected: Option<usize>) -> Answer {
        match selected.and_then(|i| self.values.get(i).copied().flatten()) {
            Some(value) => Answer::Chosen(value.to_string()),
            None => Answer::Skip,
        }
    }
}

/// Interactive arrow-key menu; skip is the default.
pub struct DialoguerDecider;

#[async_trait]
impl Decider for DialoguerDecider {
    async fn ask(&self, context: &str, prompt: &str, choices: &[Choice]) -> Result<Answer, SyncError> {
        let menu = Menu::new(choices);
        let title = format!("[{context}] {prompt}");
        tokio::task::spawn_blocking(move || -> Result<Answer, SyncError> {
            let selected = Select::with_theme(&ColorfulTheme::default())
                .with_prompt(title)
                .items(&menu.labels[..])
                .default(menu.default)
                .interact_opt()
                .map_err(|e| SyncError::Prompt(e.to_string()))?;
            Ok(menu.answer(selected))
        })
        .await
        .map_err(|e| SyncError::Prompt(e.to_string()))?
    }
}

/// Non-interactive: every question is skipped.
pub struct SkipAllDecider;

#[async_trait]
impl Decider for SkipAllDecider {
    async fn ask(&self, context: &str, prompt: &str, _choices: &[Choice]) -> Result<Answer, SyncError> {
        tracing::info!(stage = "converge", context, "{prompt}; skipped (--yes-skip)");
        Ok(Answer::Skip)
    }
}
