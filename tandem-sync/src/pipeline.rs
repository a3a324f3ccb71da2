//! Shared reconciliation entrypoint used by the CLI.
//!
//! ```text
//! load (concurrent) → merge → check_status → converge (sequential) → filter
//! ```

use serde::Serialize;

use tandem_core::{LocalInventory, LocalRepo, RemoteInventory, RemoteRepo, RepoName, RepoPair};

use crate::converge::{Converger, Terminal};
use crate::error::SyncError;
use crate::filter::{exclude_ineligible, filter_complete, Excluded};
use crate::merge::merge_inventories;

/// A pair whose convergence was abandoned by a collaborator or prompt failure.
#[derive(Debug)]
pub struct PairFailure {
    pub name: RepoName,
    pub error: SyncError,
}

/// Per-pair terminal state, in convergence order.
#[derive(Debug, Clone, Serialize)]
pub struct Outcome {
    pub name: RepoName,
    pub terminal: Terminal,
}

/// Everything one reconciliation run produced.
#[derive(Debug, Default)]
pub struct ReconcileReport {
    /// Fully converged pairs with both sides present.
    pub pairs: Vec<RepoPair>,
    /// Pairs held back by the status classifier.
    pub excluded: Vec<Excluded>,
    pub outcomes: Vec<Outcome>,
    pub failures: Vec<PairFailure>,
}

impl ReconcileReport {
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn count(&self, terminal: Terminal) -> usize {
        self.outcomes.iter().filter(|o| o.terminal == terminal).count()
    }
}

/// Load both inventories concurrently.
pub async fn load_inventories(
    local: &dyn LocalInventory,
    remote: &dyn RemoteInventory,
) -> Result<(Vec<LocalRepo>, Vec<RemoteRepo>), SyncError> {
    let on_local: &(dyn Fn(&LocalRepo) + Send + Sync) = &|repo: &LocalRepo| {
        tracing::debug!(stage = "load", repo = %repo.name, path = %repo.path.display(), "local repo loaded");
    };
    let on_remote: &(dyn Fn(&RemoteRepo) + Send + Sync) = &|repo: &RemoteRepo| {
        tracing::debug!(stage = "load", repo = %repo.name, url = %repo.url, "github repo loaded");
    };

    let (locals, remotes) = tokio::try_join!(
        local.load_all(Some(on_local)),
        remote.load_all(Some(on_remote)),
    )?;
    tracing::info!(
        stage = "load",
        local = locals.len(),
        github = remotes.len(),
        "inventories loaded"
    );
    Ok((locals, remotes))
}

impl<'a> Converger<'a> {
    /// Merge, gate, converge and filter already-loaded inventories.
    ///
    /// Pairs converge one at a time. A failed pair is recorded and the run
    /// moves on to the next one.
    pub async fn reconcile(
        &self,
        locals: Vec<LocalRepo>,
        remotes: Vec<RemoteRepo>,
    ) -> ReconcileReport {
        let merged = merge_inventories(locals, remotes);
        let (eligible, excluded) =
            exclude_ineligible(merged.into_values(), &self.settings.default_branch);

        let mut report = ReconcileReport {
            excluded,
            ..ReconcileReport::default()
        };
        let mut converged = Vec::with_capacity(eligible.len());
        for pair in eligible {
            let name = pair.name.clone();
            match self.converge_pair(pair).await {
                Ok(convergence) => {
                    report.outcomes.push(Outcome {
                        name,
                        terminal: convergence.terminal,
                    });
                    converged.push(convergence.pair);
                }
                Err(error) => {
                    tracing::error!(stage = "converge", repo = %name, error = %error, "pair abandoned");
                    report.failures.push(PairFailure { name, error });
                }
            }
        }

        report.pairs = filter_complete(converged);
        tracing::info!(
            stage = "filter",
            complete = report.pairs.len(),
            excluded = report.excluded.len(),
            failed = report.failures.len(),
            "reconciliation finished"
        );
        report
    }

    /// Load both inventories and reconcile them.
    pub async fn run(&self) -> Result<ReconcileReport, SyncError> {
        let (locals, remotes) = load_inventories(self.local, self.remote).await?;
        Ok(self.reconcile(locals, remotes).await)
    }
}
