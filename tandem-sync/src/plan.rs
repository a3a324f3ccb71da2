//! Read-only preview of what convergence would do to a pair.

use std::fmt;

use serde::Serialize;

use tandem_core::{AliasSet, RepoPair, Settings};

use crate::meta::meta_update;
use crate::remotes::derive_remote_set;

/// The first thing the orchestrator would ask or do for a pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum PlannedAction {
    AskUploadOrRemove,
    AskCloneOrRemove,
    AskName { local: String, remote: String },
    UpdateRemotes,
    /// The branch does not track `origin` yet.
    Push,
    UpdateMeta,
    Nothing,
}

impl fmt::Display for PlannedAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlannedAction::AskUploadOrRemove => write!(f, "ask: upload or remove local"),
            PlannedAction::AskCloneOrRemove => write!(f, "ask: clone or remove github"),
            PlannedAction::AskName { local, remote } => {
                write!(f, "ask: name '{local}' or '{remote}'")
            }
            PlannedAction::UpdateRemotes => write!(f, "rewrite local remotes"),
            PlannedAction::Push => write!(f, "push to origin"),
            PlannedAction::UpdateMeta => write!(f, "update github metadata"),
            PlannedAction::Nothing => write!(f, "nothing"),
        }
    }
}

pub fn plan_pair(pair: &RepoPair, settings: &Settings) -> PlannedAction {
    let (local, remote) = match (&pair.local, &pair.remote) {
        (Some(local), Some(remote)) => (local, remote),
        (Some(_), None) => return PlannedAction::AskUploadOrRemove,
        (None, Some(_)) => return PlannedAction::AskCloneOrRemove,
        (None, None) => return PlannedAction::Nothing,
    };

    if local.name != remote.name {
        return PlannedAction::AskName {
            local: local.name.to_string(),
            remote: remote.name.to_string(),
        };
    }

    let known = AliasSet::build(
        remote.name.as_str(),
        local.aliases.iter().chain(remote.aliases.iter()).map(str::to_owned),
    );
    let derived = derive_remote_set(
        &local.remotes,
        &settings.owner,
        remote.name.as_str(),
        &known,
        &settings.remote_rules,
    );
    if derived != local.remotes {
        return PlannedAction::UpdateRemotes;
    }
    if !local.status.tracks("origin", &local.branch) {
        return PlannedAction::Push;
    }

    if settings.sync_metadata && meta_update(&local.meta, &remote.meta).is_some() {
        return PlannedAction::UpdateMeta;
    }
    PlannedAction::Nothing
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use tandem_core::{
        LocalRepo, Owner, RemoteRepo, RemoteSet, RepoId, RepoMeta, RepoName, WorkingStatus,
    };

    fn settings() -> Settings {
        Settings::new(Owner::from("alice"), PathBuf::from("/src"))
    }

    fn local(name: &str, origin: &str, description: Option<&str>) -> LocalRepo {
        let mut remotes = RemoteSet::new();
        remotes.insert("origin".into(), origin.into());
        LocalRepo {
            name: RepoName::from(name),
            path: PathBuf::from(format!("/src/{name}")),
            branch: "master".into(),
            meta: RepoMeta {
                description: description.map(str::to_owned),
                topics: vec![],
            },
            manifest_name: None,
            remotes,
            status: WorkingStatus {
                upstream: Some("origin/master".into()),
                ..WorkingStatus::default()
            },
            aliases: AliasSet::build(name, Vec::<String>::new()),
        }
    }

    fn remote(name: &str) -> RemoteRepo {
        RemoteRepo {
            id: RepoId::from("R_1"),
            name: RepoName::from(name),
            url: format!("https://github.com/alice/{name}"),
            branch: "master".into(),
            meta: RepoMeta::default(),
            aliases: AliasSet::build(name, ["R_1"]),
        }
    }

    fn pair(local: Option<LocalRepo>, remote: Option<RemoteRepo>) -> RepoPair {
        RepoPair {
            name: RepoName::from("foo"),
            local,
            remote,
        }
    }

    #[test]
    fn orphans_ask() {
        let s = settings();
        assert_eq!(
            plan_pair(&pair(Some(local("foo", "x", None)), None), &s),
            PlannedAction::AskUploadOrRemove
        );
        assert_eq!(plan_pair(&pair(None, Some(remote("foo"))), &s), PlannedAction::AskCloneOrRemove);
    }

    #[test]
    fn name_mismatch_asks_first() {
        let p = pair(Some(local("foo", "x", None)), Some(remote("foo-project")));
        assert!(matches!(plan_pair(&p, &settings()), PlannedAction::AskName { .. }));
    }

    #[test]
    fn stale_origin_needs_remote_update() {
        let p = pair(
            Some(local("foo", "https://old/other/foo.git", None)),
            Some(remote("foo")),
        );
        assert_eq!(plan_pair(&p, &settings()), PlannedAction::UpdateRemotes);
    }

    #[test]
    fn converged_pair_with_new_description_updates_meta() {
        let p = pair(
            Some(local("foo", "git@github.com:alice/foo.git", Some("A foo"))),
            Some(remote("foo")),
        );
        assert_eq!(plan_pair(&p, &settings()), PlannedAction::UpdateMeta);

        let mut s = settings();
        s.sync_metadata = false;
        assert_eq!(plan_pair(&p, &s), PlannedAction::Nothing);
    }

    #[test]
    fn untracked_branch_needs_push() {
        let mut repo = local("foo", "git@github.com:alice/foo.git", None);
        repo.status.upstream = None;
        let p = pair(Some(repo), Some(remote("foo")));
        assert_eq!(plan_pair(&p, &settings()), PlannedAction::Push);
    }
}
