//! Inventory merger: joins local and remote records into pairs keyed by
//! canonical name.
//!
//! A local record's canonical name is always its own name. A remote record
//! takes the name of the first local record (in input order) it is identified
//! with, or keeps its own name when none matches. Pure: no shared state, no
//! I/O beyond logging.

use std::collections::BTreeMap;

use tandem_core::identity;
use tandem_core::{LocalRepo, RemoteRepo, RepoName, RepoPair};

/// Canonical name -> pair, iterated in name order.
pub type PairMap = BTreeMap<RepoName, RepoPair>;

/// Canonical name of a remote record against the local inventory.
pub fn canonical_name(remote: &RemoteRepo, locals: &[LocalRepo]) -> RepoName {
    let matches = identity::matching_locals(remote, locals);
    if matches.len() > 1 {
        let candidates: Vec<&str> = matches.iter().map(|&i| locals[i].name.as_str()).collect();
        tracing::warn!(
            stage = "merge",
            repo = %remote.name,
            candidates = %candidates.join(", "),
            "ambiguous identity; using first match"
        );
    }
    matches
        .first()
        .map(|&i| locals[i].name.clone())
        .unwrap_or_else(|| remote.name.clone())
}

/// Join both inventories into pairs.
///
/// When two records of the same origin resolve to one canonical name, the first
/// is kept and the later one is left out of the run with a warning.
pub fn merge_inventories(locals: Vec<LocalRepo>, remotes: Vec<RemoteRepo>) -> PairMap {
    let remote_keys: Vec<RepoName> = remotes
        .iter()
        .map(|remote| canonical_name(remote, &locals))
        .collect();

    let mut pairs = PairMap::new();
    for local in locals {
        let pair = pairs
            .entry(local.name.clone())
            .or_insert_with(|| RepoPair::new(local.name.clone()));
        if pair.local.is_some() {
            tracing::warn!(stage = "merge", repo = %local.name, path = %local.path.display(), "duplicate local name; ignoring");
            continue;
        }
        pair.local = Some(local);
    }
    for (key, remote) in remote_keys.into_iter().zip(remotes) {
        let pair = pairs
            .entry(key.clone())
            .or_insert_with(|| RepoPair::new(key));
        if pair.remote.is_some() {
            tracing::warn!(stage = "merge", repo = %remote.name, canonical = %pair.name, "second github repo for one canonical name; ignoring");
            continue;
        }
        pair.remote = Some(remote);
    }

    tracing::info!(
        stage = "merge",
        pairs = pairs.len(),
        complete = pairs.values().filter(|p| p.is_complete()).count(),
        "inventories merged"
    );
    pairs
}
