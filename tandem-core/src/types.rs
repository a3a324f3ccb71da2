//! Domain types for tandem.
//!
//! A repository is observed from two sources: a local git working copy
//! ([`LocalRepo`]) and a hosted repository on GitHub ([`RemoteRepo`]). The
//! joined view of one logical repository is a [`RepoPair`], whose two typed
//! slots say which source each record came from.
//!
//! All path fields use `PathBuf`; never `&str` or `String` for filesystem paths.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Newtypes
// ---------------------------------------------------------------------------

/// A repository name as one source reports it.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RepoName(pub String);

impl RepoName {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RepoName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<String> for RepoName {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for RepoName {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

/// Opaque stable identifier assigned by the hosting service.
///
/// Local working copies have no stable id and use the empty id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RepoId(pub String);

impl RepoId {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for RepoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<String> for RepoId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for RepoId {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

/// A GitHub login owning the managed repositories.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Owner(pub String);

impl fmt::Display for Owner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<String> for Owner {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for Owner {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

// ---------------------------------------------------------------------------
// Value types
// ---------------------------------------------------------------------------

/// Identifiers usable to recognise the same repository across sources.
///
/// Only used for matching, never for display.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AliasSet(BTreeSet<String>);

impl AliasSet {
    /// Build an alias set from a record's name plus any extra identifiers.
    ///
    /// Empty strings are dropped; `name` is always a member when non-empty.
    pub fn build<I, S>(name: &str, extra: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut set = BTreeSet::new();
        if !name.is_empty() {
            set.insert(name.to_owned());
        }
        for alias in extra {
            let alias = alias.into();
            if !alias.is_empty() {
                set.insert(alias);
            }
        }
        Self(set)
    }

    pub fn contains(&self, alias: &str) -> bool {
        self.0.contains(alias)
    }

    /// `true` when the two sets share at least one alias.
    pub fn intersects(&self, other: &AliasSet) -> bool {
        // Iterate the smaller set.
        let (small, large) = if self.0.len() <= other.0.len() {
            (&self.0, &other.0)
        } else {
            (&other.0, &self.0)
        };
        small.iter().any(|a| large.contains(a))
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Description and topics, from the hosting service or a package manifest.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepoMeta {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub topics: Vec<String>,
}

/// GitHub topics are lowercase, unique and unordered.
pub fn normalize_topics(topics: &[String]) -> Vec<String> {
    let mut out: Vec<String> = topics
        .iter()
        .map(|t| t.trim().to_lowercase().replace(' ', "-"))
        .filter(|t| !t.is_empty())
        .collect();
    out.sort();
    out.dedup();
    out
}

/// Divergence of a working copy from its upstream.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkingStatus {
    pub ahead: u32,
    pub behind: u32,
    pub modified: u32,
    pub untracked: u32,
    /// Upstream of the current branch as `<remote>/<branch>`, if one is set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub upstream: Option<String>,
}

impl WorkingStatus {
    /// `true` when the current branch tracks `branch` on `remote`.
    pub fn tracks(&self, remote: &str, branch: &str) -> bool {
        self.upstream
            .as_deref()
            .and_then(|u| u.split_once('/'))
            .is_some_and(|(r, b)| r == remote && b == branch)
    }

    pub fn dirty_files(&self) -> u32 {
        self.modified + self.untracked
    }

    /// In sync means `ahead + behind + dirty files == 0` exactly.
    pub fn is_synced(&self) -> bool {
        self.ahead + self.behind + self.dirty_files() == 0
    }
}

/// Git remotes configured on a working copy: remote name -> fetch URL.
pub type RemoteSet = BTreeMap<String, String>;

// ---------------------------------------------------------------------------
// Records
// ---------------------------------------------------------------------------

/// A git working copy found on the local filesystem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalRepo {
    pub name: RepoName,
    /// Absolute path to the working-copy root.
    pub path: PathBuf,
    pub branch: String,
    #[serde(default)]
    pub meta: RepoMeta,
    /// Name declared by the package manifest, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manifest_name: Option<String>,
    #[serde(default)]
    pub remotes: RemoteSet,
    #[serde(default)]
    pub status: WorkingStatus,
    pub aliases: AliasSet,
}

/// A repository hosted on GitHub and owned by the configured owner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteRepo {
    pub id: RepoId,
    pub name: RepoName,
    /// Canonical web URL of the repository.
    pub url: String,
    pub branch: String,
    #[serde(default)]
    pub meta: RepoMeta,
    pub aliases: AliasSet,
}

// ---------------------------------------------------------------------------
// Pairs
// ---------------------------------------------------------------------------

/// Shape of a [`RepoPair`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PairKind {
    Complete,
    LocalOnly,
    RemoteOnly,
    /// Both sides were removed or dropped during convergence.
    Empty,
}

impl fmt::Display for PairKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PairKind::Complete => write!(f, "complete"),
            PairKind::LocalOnly => write!(f, "local only"),
            PairKind::RemoteOnly => write!(f, "github only"),
            PairKind::Empty => write!(f, "empty"),
        }
    }
}

/// The joined local/remote view of one logical repository, keyed by its
/// canonical name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepoPair {
    pub name: RepoName,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub local: Option<LocalRepo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remote: Option<RemoteRepo>,
}

impl RepoPair {
    pub fn new(name: RepoName) -> Self {
        Self {
            name,
            local: None,
            remote: None,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.local.is_some() && self.remote.is_some()
    }

    pub fn kind(&self) -> PairKind {
        match (&self.local, &self.remote) {
            (Some(_), Some(_)) => PairKind::Complete,
            (Some(_), None) => PairKind::LocalOnly,
            (None, Some(_)) => PairKind::RemoteOnly,
            (None, None) => PairKind::Empty,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
