//! # tandem-github
//!
//! [`RemoteInventory`] over the GitHub REST API for one owner.
//!
//! Every mutation answers with the repository as GitHub reports it after the
//! change; when a change takes more than one request the repository is fetched
//! again at the end.

pub mod client;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;

use tandem_core::identity::remote_aliases;
use tandem_core::{
    normalize_topics, InventoryError, LocalRepo, OnEach, Owner, RemoteInventory, RemoteRepo,
    RepoId, RepoMeta, RepoName,
};

use crate::client::{Client, Method};

const PER_PAGE: usize = 100;

// ---------------------------------------------------------------------------
// API records
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct ApiOwner {
    pub login: String,
}

/// The subset of GitHub's repository object tandem reads.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiRepo {
    pub id: u64,
    #[serde(default)]
    pub node_id: Option<String>,
    pub name: String,
    pub html_url: String,
    #[serde(default)]
    pub default_branch: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub topics: Vec<String>,
    pub owner: ApiOwner,
}

impl From<ApiRepo> for RemoteRepo {
    fn from(api: ApiRepo) -> Self {
        let id = RepoId::from(
            api.node_id
                .filter(|n| !n.is_empty())
                .unwrap_or_else(|| api.id.to_string()),
        );
        let aliases = remote_aliases(&api.name, &id);
        RemoteRepo {
            id,
            name: RepoName::from(api.name),
            url: api.html_url,
            branch: api.default_branch.unwrap_or_default(),
            meta: RepoMeta {
                description: api.description.filter(|d| !d.is_empty()),
                topics: api.topics,
            },
            aliases,
        }
    }
}

// ---------------------------------------------------------------------------
// GithubInventory
// ---------------------------------------------------------------------------

pub struct GithubInventory {
    client: Client,
    owner: Owner,
    private: bool,
}

impl GithubInventory {
    pub fn new(api_base: &str, token: Option<String>, owner: Owner, private: bool) -> Self {
        Self {
            client: Client::new(api_base, token),
            owner,
            private,
        }
    }

    fn repo_path(&self, name: &str) -> String {
        format!("/repos/{}/{}", self.owner, name)
    }

    async fn fetch(&self, name: &str) -> Result<RemoteRepo, InventoryError> {
        let api: ApiRepo = self
            .client
            .send_json(Method::Get, self.repo_path(name), None)
            .await?;
        Ok(api.into())
    }

    async fn put_topics(&self, name: &str, topics: &[String]) -> Result<(), InventoryError> {
        let path = format!("{}/topics", self.repo_path(name));
        let body = json!({ "names": normalize_topics(topics) });
        self.client.send(Method::Put, path, Some(body)).await?;
        Ok(())
    }
}

#[async_trait]
impl RemoteInventory for GithubInventory {
    async fn load_all(&self, on_each: OnEach<'_, RemoteRepo>) -> Result<Vec<RemoteRepo>, InventoryError> {
        let mut repos = Vec::new();
        let mut page = 1;
        loop {
            let path = format!("/user/repos?affiliation=owner&per_page={PER_PAGE}&page={page}");
            let batch: Vec<ApiRepo> = self.client.send_json(Method::Get, path, None).await?;
            let len = batch.len();
            for api in batch {
                if !api.owner.login.eq_ignore_ascii_case(&self.owner.0) {
                    tracing::debug!(stage = "load", repo = %api.name, owner = %api.owner.login, "not owned by configured owner");
                    continue;
                }
                let repo = RemoteRepo::from(api);
                if let Some(cb) = on_each {
                    cb(&repo);
                }
                repos.push(repo);
            }
            if len < PER_PAGE {
                break;
            }
            page += 1;
        }
        Ok(repos)
    }

    async fn create(&self, local: &LocalRepo) -> Result<RemoteRepo, InventoryError> {
        let body = json!({
            "name": local.name.as_str(),
            "description": local.meta.description.as_deref().unwrap_or(""),
            "private": self.private,
            "auto_init": false,
        });
        let created: ApiRepo = self
            .client
            .send_json(Method::Post, "/user/repos".to_string(), Some(body))
            .await?;
        if local.meta.topics.is_empty() {
            return Ok(created.into());
        }
        self.put_topics(&created.name, &local.meta.topics).await?;
        self.fetch(&created.name).await
    }

    async fn update_name(&self, repo: &RemoteRepo, new_name: &str) -> Result<RemoteRepo, InventoryError> {
        let renamed: ApiRepo = self
            .client
            .send_json(
                Method::Patch,
                self.repo_path(repo.name.as_str()),
                Some(json!({ "name": new_name })),
            )
            .await?;
        Ok(renamed.into())
    }

    async fn update_meta(&self, repo: &RemoteRepo, meta: &RepoMeta) -> Result<RemoteRepo, InventoryError> {
        if meta.description != repo.meta.description {
            let description = meta.description.as_deref().unwrap_or("");
            self.client
                .send(
                    Method::Patch,
                    self.repo_path(repo.name.as_str()),
                    Some(json!({ "description": description })),
                )
                .await?;
        }
        if normalize_topics(&meta.topics) != normalize_topics(&repo.meta.topics) {
            self.put_topics(repo.name.as_str(), &meta.topics).await?;
        }
        self.fetch(repo.name.as_str()).await
    }

    async fn remove(&self, repo: &RemoteRepo) -> Result<(), InventoryError> {
        self.client
            .send(Method::Delete, self.repo_path(repo.name.as_str()), None)
            .await?;
        Ok(())
    }
}
