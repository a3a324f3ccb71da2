//! # tandem-local
//!
//! [`LocalInventory`] over git working copies below a source directory.
//!
//! Discovery walks the source directory and stops descending at the first
//! directory holding a `.git` entry; `node_modules` is never entered. Every
//! record is read fresh from git, so each mutation returns a reloaded record.

pub mod git;
pub mod manifest;

use std::io;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use walkdir::WalkDir;

use tandem_core::error::io_err;
use tandem_core::identity::local_aliases;
use tandem_core::{
    InventoryError, LocalInventory, LocalRepo, OnEach, RemoteRepo, RemoteSet, RepoName,
};

use crate::git::{git, parse_remotes, parse_status};
use crate::manifest::{read_manifest, Manifest};

// ---------------------------------------------------------------------------
// Discovery and loading
// ---------------------------------------------------------------------------

/// Working-copy roots below `root`, in path order.
pub fn discover(root: &Path) -> Result<Vec<PathBuf>, InventoryError> {
    let mut found = Vec::new();
    let mut walker = WalkDir::new(root)
        .min_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| e.file_name() != "node_modules" && e.file_name() != ".git");
    while let Some(entry) = walker.next() {
        let entry = entry.map_err(|e| {
            let path = e.path().unwrap_or(root).to_path_buf();
            io_err(path, io::Error::from(e))
        })?;
        if !entry.file_type().is_dir() {
            continue;
        }
        if entry.path().join(".git").exists() {
            found.push(entry.into_path());
            walker.skip_current_dir();
        }
    }
    Ok(found)
}

/// Read one working copy.
pub async fn load_repo(path: &Path) -> Result<LocalRepo, InventoryError> {
    let dir_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .ok_or_else(|| InventoryError::NotFound(format!("no directory name in {}", path.display())))?;

    let (branch, status) = parse_status(&git(path, &["status", "--porcelain=v2", "--branch"]).await?);
    let remotes = parse_remotes(&git(path, &["remote", "-v"]).await?);
    let manifest = match read_manifest(path) {
        Ok(manifest) => manifest.unwrap_or_default(),
        Err(InventoryError::Manifest { path: file, message }) => {
            tracing::warn!(stage = "load", path = %file.display(), "ignoring unreadable manifest: {message}");
            Manifest::default()
        }
        Err(e) => return Err(e),
    };
    let aliases = local_aliases(&dir_name, manifest.name.as_deref(), &remotes);

    Ok(LocalRepo {
        name: RepoName::from(dir_name),
        path: path.to_path_buf(),
        branch,
        meta: manifest.meta,
        manifest_name: manifest.name,
        remotes,
        status,
        aliases,
    })
}

// ---------------------------------------------------------------------------
// GitInventory
// ---------------------------------------------------------------------------

/// Git working copies under `src_dir`.
#[derive(Debug, Clone)]
pub struct GitInventory {
    src_dir: PathBuf,
}

impl GitInventory {
    pub fn new(src_dir: impl Into<PathBuf>) -> Self {
        Self {
            src_dir: src_dir.into(),
        }
    }

    pub fn src_dir(&self) -> &Path {
        &self.src_dir
    }
}

fn ensure_absent(path: &Path) -> Result<(), InventoryError> {
    if path.exists() {
        return Err(io_err(
            path,
            io::Error::new(io::ErrorKind::AlreadyExists, "target directory already exists"),
        ));
    }
    Ok(())
}

#[async_trait]
impl LocalInventory for GitInventory {
    async fn load_all(&self, on_each: OnEach<'_, LocalRepo>) -> Result<Vec<LocalRepo>, InventoryError> {
        if !self.src_dir.is_dir() {
            return Err(InventoryError::NotFound(format!(
                "source directory {}",
                self.src_dir.display()
            )));
        }
        let root = self.src_dir.clone();
        let paths = tokio::task::spawn_blocking(move || discover(&root))
            .await
            .map_err(|e| InventoryError::Join(e.to_string()))??;
        tracing::debug!(stage = "load", count = paths.len(), "working copies discovered");

        let mut repos = Vec::with_capacity(paths.len());
        for path in paths {
            let repo = load_repo(&path).await?;
            if let Some(cb) = on_each {
                cb(&repo);
            }
            repos.push(repo);
        }
        Ok(repos)
    }

    async fn create(&self, remote: &RemoteRepo, clone_url: &str) -> Result<LocalRepo, InventoryError> {
        let target = self.src_dir.join(remote.name.as_str());
        ensure_absent(&target)?;
        tokio::fs::create_dir_all(&self.src_dir)
            .await
            .map_err(|e| io_err(&self.src_dir, e))?;

        let target_arg = target.to_string_lossy();
        git(&self.src_dir, &["clone", clone_url, target_arg.as_ref()]).await?;
        load_repo(&target).await
    }

    async fn update_name(&self, repo: &LocalRepo, new_name: &str) -> Result<LocalRepo, InventoryError> {
        let target = repo.path.with_file_name(new_name);
        ensure_absent(&target)?;
        tokio::fs::rename(&repo.path, &target)
            .await
            .map_err(|e| io_err(&repo.path, e))?;
        load_repo(&target).await
    }

    async fn update_remotes(&self, repo: &LocalRepo, remotes: &RemoteSet) -> Result<LocalRepo, InventoryError> {
        // A remote whose URL changes is removed and re-added: its tracking refs
        // and any branch upstream pointing at it belong to the old server.
        let stale = repo
            .remotes
            .iter()
            .filter(|(name, url)| remotes.get(*name) != Some(*url))
            .map(|(name, _)| name);
        for name in stale {
            git(&repo.path, &["remote", "remove", name.as_str()]).await?;
        }
        for (name, url) in remotes {
            if repo.remotes.get(name) != Some(url) {
                git(&repo.path, &["remote", "add", name.as_str(), url.as_str()]).await?;
            }
        }
        load_repo(&repo.path).await
    }

    async fn update_push(&self, repo: &LocalRepo) -> Result<LocalRepo, InventoryError> {
        git(&repo.path, &["push", "--set-upstream", "origin", repo.branch.as_str()]).await?;
        load_repo(&repo.path).await
    }

    async fn remove(&self, repo: &LocalRepo) -> Result<(), InventoryError> {
        tokio::fs::remove_dir_all(&repo.path)
            .await
            .map_err(|e| io_err(&repo.path, e))
    }
}
