//! Identity index: alias sets and the "same repository" relation.
//!
//! Stateless. Two records from different sources are the same repository iff
//! their alias sets intersect.

use crate::github_url;
use crate::types::{AliasSet, LocalRepo, RemoteRepo, RemoteSet, RepoId};

/// Aliases of a working copy: directory name, manifest-declared name, and the
/// repository name of every GitHub-pointing remote.
pub fn local_aliases(dir_name: &str, manifest_name: Option<&str>, remotes: &RemoteSet) -> AliasSet {
    let from_remotes = remotes
        .values()
        .filter_map(|url| github_url::parse(url))
        .map(|slug| slug.name);
    AliasSet::build(
        dir_name,
        manifest_name
            .map(str::to_owned)
            .into_iter()
            .chain(from_remotes),
    )
}

/// Aliases of a hosted repository: its name and stable id.
pub fn remote_aliases(name: &str, id: &RepoId) -> AliasSet {
    AliasSet::build(name, [id.0.clone()])
}

pub fn is_same_repo(a: &AliasSet, b: &AliasSet) -> bool {
    a.intersects(b)
}

/// Indices of every local record identified with `remote`, in input order.
///
/// More than one index means the identity is ambiguous; callers take the first.
pub fn matching_locals(remote: &RemoteRepo, locals: &[LocalRepo]) -> Vec<usize> {
    locals
        .iter()
        .enumerate()
        .filter(|(_, local)| is_same_repo(&remote.aliases, &local.aliases))
        .map(|(idx, _)| idx)
        .collect()
}
