//! Convergence orchestrator.
//!
//! Drives one pair at a time through
//!
//! ```text
//! Loaded → NameResolved → RemotesConverged → Terminal(Complete | PartiallyRemoved | Skipped)
//! ```
//!
//! asking the [`Decider`] wherever the two sides disagree. Rules:
//!
//! 1. Every mutation replaces the affected slot with the record the
//!    collaborator returned; nothing is patched locally.
//! 2. A GitHub-side create or rename always happens before the working copy's
//!    remotes are rewritten, because the canonical `origin` URL embeds the name
//!    that must already exist on GitHub.
//! 3. A failed collaborator call aborts the pair. Earlier mutations stay done;
//!    re-running reconciliation picks up from the new state.
//! 4. The working copy is pushed whenever its branch does not track the same
//!    branch on `origin`, whichever run created the GitHub side.
//! 5. In a dry run nothing is mutated: questions are still asked, and a pair
//!    that would change ends `Skipped` with its GitHub side dropped.

use std::fmt;

use serde::Serialize;

use tandem_core::github_url::canonical_url;
use tandem_core::{AliasSet, LocalInventory, RemoteInventory, RepoPair, Settings};

use crate::decision::{decide, Decider, Decision, LocalOrphanDecision, NameDecision, RemoteOrphanDecision};
use crate::error::SyncError;
use crate::meta::meta_update;
use crate::remotes::derive_remote_set;

/// Where a pair ended up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Terminal {
    /// Both sides exist and agree on name, remotes and metadata.
    Complete,
    /// One side was deleted on the operator's request.
    PartiallyRemoved,
    /// The operator skipped the pair, or a dry run withheld a change; one
    /// side was dropped from this run.
    Skipped,
}

impl fmt::Display for Terminal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Terminal::Complete => write!(f, "complete"),
            Terminal::PartiallyRemoved => write!(f, "partially removed"),
            Terminal::Skipped => write!(f, "skipped"),
        }
    }
}

/// Result of converging one pair.
#[derive(Debug, Clone)]
pub struct Convergence {
    pub pair: RepoPair,
    pub terminal: Terminal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stage {
    Loaded,
    NameResolved,
    RemotesConverged,
    Terminal(Terminal),
}

/// Applies convergence decisions through the collaborators.
pub struct Converger<'a> {
    pub(crate) local: &'a dyn LocalInventory,
    pub(crate) remote: &'a dyn RemoteInventory,
    pub(crate) decider: &'a dyn Decider,
    pub(crate) settings: &'a Settings,
    pub(crate) dry_run: bool,
}

impl<'a> Converger<'a> {
    pub fn new(
        local: &'a dyn LocalInventory,
        remote: &'a dyn RemoteInventory,
        decider: &'a dyn Decider,
        settings: &'a Settings,
    ) -> Self {
        Self {
            local,
            remote,
            decider,
            settings,
            dry_run: false,
        }
    }

    /// Ask every question but apply nothing.
    pub fn dry_run(mut self, on: bool) -> Self {
        self.dry_run = on;
        self
    }

    /// Ask the decider; in a dry run any non-skip answer is logged and skipped.
    async fn ask<D: Decision>(
        &self,
        context: &str,
        prompt: &str,
        label: impl Fn(D) -> String,
    ) -> Result<D, SyncError> {
        let choice = decide(self.decider, context, prompt, label).await?;
        if self.dry_run && choice != D::SKIP {
            tracing::info!(stage = "converge", context, choice = choice.value(), "{prompt}; not applied (dry run)");
            return Ok(D::SKIP);
        }
        Ok(choice)
    }

    /// Drive `pair` to a terminal state.
    pub async fn converge_pair(&self, mut pair: RepoPair) -> Result<Convergence, SyncError> {
        let mut stage = Stage::Loaded;
        loop {
            stage = match stage {
                Stage::Loaded => self.resolve_name(&mut pair).await?,
                Stage::NameResolved => self.converge_remotes(&mut pair).await?,
                Stage::RemotesConverged => self.converge_meta(&mut pair).await?,
                Stage::Terminal(terminal) => {
                    tracing::info!(stage = "converge", repo = %pair.name, outcome = %terminal, "pair converged");
                    return Ok(Convergence { pair, terminal });
                }
            };
        }
    }

    async fn resolve_name(&self, pair: &mut RepoPair) -> Result<Stage, SyncError> {
        match (pair.local.take(), pair.remote.take()) {
            (Some(local), None) => {
                let choice = self.ask(
                    "orphan",
                    &format!("{} repo does not exist on github", local.name),
                    |d: LocalOrphanDecision| match d {
                        LocalOrphanDecision::Upload => "create github repo and push".to_string(),
                        LocalOrphanDecision::Remove => "delete local repo".to_string(),
                        LocalOrphanDecision::Skip => "skip".to_string(),
                    },
                )
                .await?;
                match choice {
                    LocalOrphanDecision::Upload => {
                        tracing::info!(stage = "converge", repo = %local.name, "creating github repo");
                        let created = self.remote.create(&local).await?;
                        pair.local = Some(local);
                        pair.remote = Some(created);
                        Ok(Stage::NameResolved)
                    }
                    LocalOrphanDecision::Remove => {
                        tracing::info!(stage = "converge", repo = %local.name, path = %local.path.display(), "deleting local repo");
                        self.local.remove(&local).await?;
                        Ok(Stage::Terminal(Terminal::PartiallyRemoved))
                    }
                    LocalOrphanDecision::Skip => {
                        tracing::info!(stage = "converge", repo = %local.name, "skipped local repo");
                        Ok(Stage::Terminal(Terminal::Skipped))
                    }
                }
            }
            (None, Some(remote)) => {
                let choice = self.ask(
                    "orphan",
                    &format!("{} repo does not exist locally", remote.name),
                    |d: RemoteOrphanDecision| match d {
                        RemoteOrphanDecision::Clone => "clone github repo".to_string(),
                        RemoteOrphanDecision::Remove => "delete github repo".to_string(),
                        RemoteOrphanDecision::Skip => "skip".to_string(),
                    },
                )
                .await?;
                match choice {
                    RemoteOrphanDecision::Clone => {
                        let url = canonical_url(&self.settings.owner, remote.name.as_str());
                        tracing::info!(stage = "converge", repo = %remote.name, url = %url, "cloning github repo");
                        let cloned = self.local.create(&remote, &url).await?;
                        pair.local = Some(cloned);
                        pair.remote = Some(remote);
                        Ok(Stage::NameResolved)
                    }
                    RemoteOrphanDecision::Remove => {
                        tracing::info!(stage = "converge", repo = %remote.name, "deleting github repo");
                        self.remote.remove(&remote).await?;
                        Ok(Stage::Terminal(Terminal::PartiallyRemoved))
                    }
                    RemoteOrphanDecision::Skip => {
                        tracing::info!(stage = "converge", repo = %remote.name, "skipped github repo");
                        Ok(Stage::Terminal(Terminal::Skipped))
                    }
                }
            }
            (Some(local), Some(remote)) if local.name == remote.name => {
                pair.local = Some(local);
                pair.remote = Some(remote);
                Ok(Stage::NameResolved)
            }
            (Some(local), Some(remote)) => {
                let choice = self.ask(
                    "rename",
                    &format!(
                        "local name '{}' differs from github name '{}'",
                        local.name, remote.name
                    ),
                    |d: NameDecision| match d {
                        NameDecision::UseLocal => format!("use local name ({})", local.name),
                        NameDecision::UseGithub => format!("use github name ({})", remote.name),
                        NameDecision::Skip => "skip".to_string(),
                    },
                )
                .await?;
                match choice {
                    NameDecision::UseLocal => {
                        tracing::info!(stage = "converge", repo = %local.name, from = %remote.name, "renaming github repo");
                        let renamed = self.remote.update_name(&remote, local.name.as_str()).await?;
                        pair.name = local.name.clone();
                        pair.local = Some(local);
                        pair.remote = Some(renamed);
                    }
                    NameDecision::UseGithub => {
                        tracing::info!(stage = "converge", repo = %remote.name, from = %local.name, "renaming local repo");
                        let renamed = self.local.update_name(&local, remote.name.as_str()).await?;
                        pair.name = remote.name.clone();
                        pair.local = Some(renamed);
                        pair.remote = Some(remote);
                    }
                    NameDecision::Skip => {
                        tracing::info!(stage = "converge", repo = %pair.name, "skipped name conflict");
                        // The github side is dropped so the pair leaves the run.
                        pair.local = Some(local);
                        return Ok(Stage::Terminal(Terminal::Skipped));
                    }
                }
                Ok(Stage::NameResolved)
            }
            (None, None) => Ok(Stage::Terminal(Terminal::Skipped)),
        }
    }

    async fn converge_remotes(&self, pair: &mut RepoPair) -> Result<Stage, SyncError> {
        let (Some(local), Some(remote)) = (pair.local.as_ref(), pair.remote.as_ref()) else {
            return Ok(Stage::Terminal(Terminal::Skipped));
        };

        let known = AliasSet::build(
            remote.name.as_str(),
            local.aliases.iter().chain(remote.aliases.iter()).map(str::to_owned),
        );
        let derived = derive_remote_set(
            &local.remotes,
            &self.settings.owner,
            remote.name.as_str(),
            &known,
            &self.settings.remote_rules,
        );

        let mut local = if derived == local.remotes {
            tracing::debug!(stage = "remotes", repo = %pair.name, "remotes already converged");
            local.clone()
        } else if self.dry_run {
            return Ok(withhold(pair, "rewrite local remotes"));
        } else {
            tracing::info!(stage = "remotes", repo = %pair.name, remotes = derived.len(), "rewriting local remotes");
            self.local.update_remotes(local, &derived).await?
        };

        if !local.status.tracks("origin", &local.branch) {
            if self.dry_run {
                return Ok(withhold(pair, "push to origin"));
            }
            tracing::info!(stage = "remotes", repo = %pair.name, branch = %local.branch, "pushing to origin");
            local = self.local.update_push(&local).await?;
        }
        pair.local = Some(local);
        Ok(Stage::RemotesConverged)
    }

    async fn converge_meta(&self, pair: &mut RepoPair) -> Result<Stage, SyncError> {
        if !self.settings.sync_metadata {
            return Ok(Stage::Terminal(Terminal::Complete));
        }
        let (Some(local), Some(remote)) = (pair.local.as_ref(), pair.remote.as_ref()) else {
            return Ok(Stage::Terminal(Terminal::Complete));
        };
        if let Some(meta) = meta_update(&local.meta, &remote.meta) {
            if self.dry_run {
                return Ok(withhold(pair, "update github description/topics"));
            }
            tracing::info!(stage = "meta", repo = %pair.name, "updating github description/topics");
            let updated = self.remote.update_meta(remote, &meta).await?;
            pair.remote = Some(updated);
        }
        Ok(Stage::Terminal(Terminal::Complete))
    }
}

/// Record a change a dry run will not make and take the pair out of the run.
fn withhold(pair: &mut RepoPair, change: &str) -> Stage {
    tracing::info!(stage = "converge", repo = %pair.name, "would {change}; not applied (dry run)");
    pair.remote = None;
    Stage::Terminal(Terminal::Skipped)
}
