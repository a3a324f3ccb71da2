//! Pair filters applied between stages.

use tandem_core::{RepoName, RepoPair};

use crate::status::{classify_status, StatusTag};

/// A pair held back by the status classifier, with every reason.
#[derive(Debug, Clone)]
pub struct Excluded {
    pub name: RepoName,
    pub tags: Vec<StatusTag>,
}

/// Keep only pairs with both sides present.
pub fn filter_complete(pairs: Vec<RepoPair>) -> Vec<RepoPair> {
    pairs
        .into_iter()
        .filter(|pair| {
            let keep = pair.is_complete();
            if !keep {
                tracing::debug!(stage = "filter", repo = %pair.name, kind = %pair.kind(), "dropping incomplete pair");
            }
            keep
        })
        .collect()
}

/// Split pairs into those eligible for convergence and those the classifier
/// tagged. One log line is written per tag.
pub fn exclude_ineligible(
    pairs: impl IntoIterator<Item = RepoPair>,
    default_branch: &str,
) -> (Vec<RepoPair>, Vec<Excluded>) {
    let mut eligible = Vec::new();
    let mut excluded = Vec::new();
    for pair in pairs {
        let tags = classify_status(&pair, default_branch);
        if tags.is_empty() {
            eligible.push(pair);
            continue;
        }
        for tag in &tags {
            tracing::warn!(stage = "check_status", repo = %pair.name, "{tag}; resolve manually and re-run");
        }
        excluded.push(Excluded {
            name: pair.name,
            tags,
        });
    }
    (eligible, excluded)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use tandem_core::{
        AliasSet, LocalRepo, RemoteRepo, RemoteSet, RepoId, RepoMeta, WorkingStatus,
    };

    fn local(name: &str, ahead: u32) -> LocalRepo {
        LocalRepo {
            name: RepoName::from(name),
            path: PathBuf::from(format!("/src/{name}")),
            branch: "master".into(),
            meta: RepoMeta::default(),
            manifest_name: None,
            remotes: RemoteSet::new(),
            status: WorkingStatus {
                ahead,
                ..WorkingStatus::default()
            },
            aliases: AliasSet::build(name, Vec::<String>::new()),
        }
    }

    fn remote(name: &str) -> RemoteRepo {
        RemoteRepo {
            id: RepoId::from("R"),
            name: RepoName::from(name),
            url: String::new(),
            branch: "master".into(),
            meta: RepoMeta::default(),
            aliases: AliasSet::build(name, Vec::<String>::new()),
        }
    }

    #[test]
    fn filter_complete_drops_orphans() {
        let pairs = vec![
            RepoPair {
                name: RepoName::from("a"),
                local: Some(local("a", 0)),
                remote: Some(remote("a")),
            },
            RepoPair {
                name: RepoName::from("b"),
                local: Some(local("b", 0)),
                remote: None,
            },
            RepoPair {
                name: RepoName::from("c"),
                local: None,
                remote: Some(remote("c")),
            },
        ];
        let kept = filter_complete(pairs);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].name, RepoName::from("a"));
    }

    #[test]
    fn exclude_ineligible_keeps_orphans_that_pass() {
        let pairs = vec![
            RepoPair {
                name: RepoName::from("dirty"),
                local: Some(local("dirty", 2)),
                remote: Some(remote("dirty")),
            },
            RepoPair {
                name: RepoName::from("clean"),
                local: Some(local("clean", 0)),
                remote: None,
            },
        ];
        let (eligible, excluded) = exclude_ineligible(pairs, "master");
        assert_eq!(eligible.len(), 1);
        assert_eq!(eligible[0].name, RepoName::from("clean"));
        assert_eq!(excluded.len(), 1);
        assert_eq!(excluded[0].tags, vec![StatusTag::NotSynced]);
    }
}
