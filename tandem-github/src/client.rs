//! Blocking GitHub REST v3 client, driven from async code through
//! `spawn_blocking`.

use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

use tandem_core::InventoryError;

const USER_AGENT: &str = "tandem";
const ACCEPT: &str = "application/vnd.github+json";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Patch,
    Put,
    Delete,
}

impl Method {
    fn as_str(self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Patch => "PATCH",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
        }
    }
}

/// Cheap to clone; clones share the connection pool.
#[derive(Clone)]
pub struct Client {
    agent: ureq::Agent,
    api_base: String,
    token: Option<String>,
}

impl Client {
    pub fn new(api_base: &str, token: Option<String>) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout(Duration::from_secs(30))
            .user_agent(USER_AGENT)
            .build();
        Self {
            agent,
            api_base: api_base.trim_end_matches('/').to_string(),
            token,
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.api_base, path)
    }

    /// Send one request and return the raw response body.
    pub fn send_blocking(&self, method: Method, path: &str, body: Option<&Value>) -> Result<String, InventoryError> {
        let url = self.url(path);
        tracing::debug!(method = method.as_str(), url = %url, "github request");

        let mut request = self.agent.request(method.as_str(), &url).set("Accept", ACCEPT);
        if let Some(token) = &self.token {
            request = request.set("Authorization", &format!("Bearer {token}"));
        }
        let result = match body {
            Some(body) => request.send_json(body),
            None => request.call(),
        };

        match result {
            Ok(response) => response
                .into_string()
                .map_err(|e| InventoryError::Transport(e.to_string())),
            Err(ureq::Error::Status(status, response)) => {
                let body = response.into_string().unwrap_or_default();
                Err(InventoryError::Api {
                    status,
                    message: api_message(&body),
                })
            }
            Err(ureq::Error::Transport(transport)) => {
                Err(InventoryError::Transport(transport.to_string()))
            }
        }
    }

    /// [`Client::send_blocking`] on the blocking pool.
    pub async fn send(&self, method: Method, path: String, body: Option<Value>) -> Result<String, InventoryError> {
        let client = self.clone();
        tokio::task::spawn_blocking(move || client.send_blocking(method, &path, body.as_ref()))
            .await
            .map_err(|e| InventoryError::Join(e.to_string()))?
    }

    pub async fn send_json<T>(&self, method: Method, path: String, body: Option<Value>) -> Result<T, InventoryError>
    where
        T: DeserializeOwned,
    {
        let text = self.send(method, path, body).await?;
        Ok(serde_json::from_str(&text)?)
    }
}

#[derive(Deserialize)]
struct ApiErrorBody {
    message: String,
}

/// The `message` field of a GitHub error body, or the body itself.
pub fn api_message(body: &str) -> String {
    match serde_json::from_str::<ApiErrorBody>(body) {
        Ok(err) => err.message,
        Err(_) if body.trim().is_empty() => "no response body".to_string(),
        Err(_) => body.trim().to_string(),
    }
}
