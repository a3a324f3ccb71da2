//! Status classification of pairs.
//!
//! Tag order:
//! 1. `NotLocalMaster` (working copy is not on the default branch)
//! 2. `NotSynced` (ahead, behind, modified or untracked count above zero)
//! 3. `NotGithubMaster` (hosted default branch is not the default branch)
//!
//! Only the sides present in the pair are evaluated. Any tag makes the pair
//! ineligible for mutation; the operator fixes it outside tandem and re-runs.

use std::fmt;

use serde::Serialize;

use tandem_core::RepoPair;

/// Reason a pair may not be mutated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusTag {
    NotLocalMaster,
    NotSynced,
    NotGithubMaster,
}

impl StatusTag {
    /// Short machine-friendly key.
    pub fn key(&self) -> &'static str {
        match self {
            StatusTag::NotLocalMaster => "not_local_master",
            StatusTag::NotSynced => "not_synced",
            StatusTag::NotGithubMaster => "not_github_master",
        }
    }
}

impl fmt::Display for StatusTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatusTag::NotLocalMaster => write!(f, "local repo is not on the default branch"),
            StatusTag::NotSynced => write!(f, "local repo is out of sync with its upstream"),
            StatusTag::NotGithubMaster => {
                write!(f, "github repo default branch is not the default branch")
            }
        }
    }
}

/// Classify one pair against the expected default branch.
pub fn classify_status(pair: &RepoPair, default_branch: &str) -> Vec<StatusTag> {
    let mut tags = Vec::new();
    if let Some(local) = &pair.local {
        if local.branch != default_branch {
            tags.push(StatusTag::NotLocalMaster);
        }
        if !local.status.is_synced() {
            tags.push(StatusTag::NotSynced);
        }
    }
    if let Some(remote) = &pair.remote {
        if remote.branch != default_branch {
            tags.push(StatusTag::NotGithubMaster);
        }
    }
    tags
}
