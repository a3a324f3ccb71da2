//! Metadata reconciliation: the local manifest is authoritative for
//! description and topics, but only for the fields it declares.

use tandem_core::{normalize_topics, RepoMeta};

/// Metadata the hosted repository should carry, or `None` when it already does.
pub fn meta_update(local: &RepoMeta, remote: &RepoMeta) -> Option<RepoMeta> {
    let description = match local.description.as_deref().map(str::trim) {
        Some(d) if !d.is_empty() => Some(d.to_string()),
        _ => remote.description.clone(),
    };
    let topics = if local.topics.is_empty() {
        remote.topics.clone()
    } else {
        normalize_topics(&local.topics)
    };
    let desired = RepoMeta {
        description,
        topics,
    };

    let unchanged = desired.description == remote.description
        && normalize_topics(&desired.topics) == normalize_topics(&remote.topics);
    if unchanged {
        None
    } else {
        Some(desired)
    }
}
