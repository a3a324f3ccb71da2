//! `git` subprocess runner and output parsers.

use std::path::Path;

use tokio::process::Command;

use tandem_core::error::io_err;
use tandem_core::{InventoryError, RemoteSet, WorkingStatus};

/// Run `git <args>` in `dir` and return stdout.
///
/// Never prompts for credentials; a non-zero exit is an [`InventoryError::Git`].
pub async fn git(dir: &Path, args: &[&str]) -> Result<String, InventoryError> {
    let command = format!("git {}", args.join(" "));
    tracing::debug!(dir = %dir.display(), command = %command, "running git");

    let output = Command::new("git")
        .args(args)
        .current_dir(dir)
        .env("GIT_TERMINAL_PROMPT", "0")
        .kill_on_drop(true)
        .output()
        .await
        .map_err(|e| io_err(dir, e))?;

    if !output.status.success() {
        return Err(InventoryError::Git {
            command,
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }
    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

/// Branch and divergence counts from `git status --porcelain=v2 --branch`.
///
/// A detached head reports the branch as `(detached)`.
pub fn parse_status(porcelain: &str) -> (String, WorkingStatus) {
    let mut branch = String::new();
    let mut status = WorkingStatus::default();
    for line in porcelain.lines() {
        if let Some(head) = line.strip_prefix("# branch.head ") {
            branch = head.trim().to_string();
        } else if let Some(upstream) = line.strip_prefix("# branch.upstream ") {
            status.upstream = Some(upstream.trim().to_string());
        } else if let Some(ab) = line.strip_prefix("# branch.ab ") {
            for part in ab.split_whitespace() {
                if let Some(n) = part.strip_prefix('+') {
                    status.ahead = n.parse().unwrap_or(0);
                } else if let Some(n) = part.strip_prefix('-') {
                    status.behind = n.parse().unwrap_or(0);
                }
            }
        } else if line.starts_with("1 ") || line.starts_with("2 ") || line.starts_with("u ") {
            status.modified += 1;
        } else if line.starts_with("? ") {
            status.untracked += 1;
        }
    }
    (branch, status)
}

/// Fetch URLs from `git remote -v`.
pub fn parse_remotes(output: &str) -> RemoteSet {
    output
        .lines()
        .filter_map(|line| {
            let mut parts = line.split_whitespace();
            let name = parts.next()?;
            let url = parts.next()?;
            match parts.next() {
                Some("(fetch)") => Some((name.to_string(), url.to_string())),
                _ => None,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn clean_tracking_branch() {
        let out = "# branch.oid 1f2e3d\n# branch.head master\n# branch.upstream origin/master\n# branch.ab +0 -0\n";
        let (branch, status) = parse_status(out);
        assert_eq!(branch, "master");
        assert!(status.is_synced());
        assert!(status.tracks("origin", "master"));
    }

    #[test]
    fn counts_divergence_and_dirty_files() {
        let out = "\
# branch.oid 1f2e3d
# branch.head main
# branch.upstream origin/main
# branch.ab +2 -1
1 .M N... 100644 100644 100644 aaa bbb src/lib.rs
2 R. N... 100644 100644 100644 aaa bbb R100 new.rs\told.rs
u UU N... 100644 100644 100644 100644 aaa bbb ccc conflict.rs
? notes.txt
? scratch/
! target/
";
        let (branch, status) = parse_status(out);
        assert_eq!(branch, "main");
        assert_eq!(
            status,
            WorkingStatus {
                ahead: 2,
                behind: 1,
                modified: 3,
                untracked: 2,
                upstream: Some("origin/main".to_string()),
            }
        );
    }

    #[test]
    fn detached_head_without_upstream() {
        let (branch, status) = parse_status("# branch.oid 1f2e3d\n# branch.head (detached)\n");
        assert_eq!(branch, "(detached)");
        assert_eq!(status, WorkingStatus::default());
    }

    #[rstest]
    #[case("", 0)]
    #[case("origin\tgit@github.com:alice/foo.git (fetch)\norigin\tgit@github.com:alice/foo.git (push)\n", 1)]
    #[case("origin\thttps://a/foo.git (fetch)\norigin\thttps://a/foo.git (push)\nmirror\t/srv/foo.git (fetch)\nmirror\t/srv/foo.git (push)\n", 2)]
    fn remote_listing(#[case] output: &str, #[case] expected: usize) {
        assert_eq!(parse_remotes(output).len(), expected);
    }

    #[test]
    fn push_url_is_ignored() {
        let remotes = parse_remotes(
            "origin\thttps://fetch/foo.git (fetch)\norigin\thttps://push/foo.git (push)\n",
        );
        assert_eq!(remotes["origin"], "https://fetch/foo.git");
    }
}
