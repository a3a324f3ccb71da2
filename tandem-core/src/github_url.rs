//! Recognising and building GitHub repository URLs.

use crate::types::Owner;

/// The `<owner>/<name>` part of a GitHub repository URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GithubSlug {
    pub owner: String,
    pub name: String,
}

/// Canonical fetch/push URL for a repository: `git@github.com:<owner>/<name>.git`.
pub fn canonical_url(owner: &Owner, name: &str) -> String {
    format!("git@github.com:{}/{}.git", owner.0, name)
}

/// Parse a GitHub repository URL in scp, ssh, https or git form.
///
/// Returns `None` for anything not pointing at a `github.com` repository root.
pub fn parse(url: &str) -> Option<GithubSlug> {
    let url = url.trim();
    let path = match url.strip_prefix("git@github.com:") {
        Some(rest) => rest,
        None => {
            let (_, after_scheme) = url.split_once("://")?;
            let (authority, path) = after_scheme.split_once('/')?;
            let host = authority.rsplit('@').next()?;
            let host = host.split(':').next()?;
            if !host.eq_ignore_ascii_case("github.com") && !host.eq_ignore_ascii_case("www.github.com") {
                return None;
            }
            path
        }
    };

    let path = path.trim_end_matches('/');
    let (owner, name) = path.split_once('/')?;
    if name.contains('/') {
        return None;
    }
    let name = name.strip_suffix(".git").unwrap_or(name);
    if owner.is_empty() || name.is_empty() {
        return None;
    }
    Some(GithubSlug {
        owner: owner.to_owned(),
        name: name.to_owned(),
    })
}
