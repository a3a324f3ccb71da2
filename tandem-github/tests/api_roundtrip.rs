//! GithubInventory against a scripted local HTTP server.

use std::io::{BufRead, BufReader, Read, Write};
use std::net::TcpListener;
use std::path::PathBuf;
use std::thread::{self, JoinHandle};

use tandem_core::{
    AliasSet, InventoryError, LocalRepo, Owner, RemoteInventory, RemoteSet, RepoMeta, RepoName,
    WorkingStatus,
};
use tandem_github::GithubInventory;

/// Serve `responses` in order, one connection each. Returns the base URL and a
/// handle yielding the `METHOD path` line of every request received.
fn serve(responses: Vec<(u16, String)>) -> (String, JoinHandle<Vec<String>>) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let base = format!("http://{}", listener.local_addr().unwrap());
    let handle = thread::spawn(move || {
        let mut seen = Vec::new();
        for (status, body) in responses {
            let (mut stream, _) = listener.accept().unwrap();
            let mut reader = BufReader::new(stream.try_clone().unwrap());

            let mut request_line = String::new();
            reader.read_line(&mut request_line).unwrap();
            let mut content_length = 0usize;
            loop {
                let mut header = String::new();
                reader.read_line(&mut header).unwrap();
                if header == "\r\n" || header.is_empty() {
                    break;
                }
                let lower = header.to_ascii_lowercase();
                if let Some(value) = lower.strip_prefix("content-length:") {
                    content_length = value.trim().parse().unwrap();
                }
            }
            let mut request_body = vec![0u8; content_length];
            reader.read_exact(&mut request_body).unwrap();

            let mut parts = request_line.split_whitespace();
            let method = parts.next().unwrap_or_default().to_string();
            let path = parts.next().unwrap_or_default().to_string();
            seen.push(format!("{method} {path}"));

            write!(
                stream,
                "HTTP/1.1 {status} Scripted\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            )
            .unwrap();
            stream.flush().unwrap();
        }
        seen
    });
    (base, handle)
}

fn repo_json(owner: &str, name: &str, topics: &[&str]) -> String {
    serde_json::json!({
        "id": 1,
        "node_id": format!("R_{name}"),
        "name": name,
        "html_url": format!("https://github.com/{owner}/{name}"),
        "default_branch": "master",
        "description": null,
        "topics": topics,
        "owner": { "login": owner },
    })
    .to_string()
}

fn inventory(base: &str) -> GithubInventory {
    GithubInventory::new(base, None, Owner::from("alice"), true)
}

#[tokio::test]
async fn load_all_keeps_only_the_owners_repos() {
    let page = format!("[{},{}]", repo_json("alice", "foo", &[]), repo_json("bob", "shared", &[]));
    let (base, server) = serve(vec![(200, page)]);

    let repos = inventory(&base).load_all(None).await.unwrap();

    assert_eq!(repos.len(), 1);
    assert_eq!(repos[0].name, RepoName::from("foo"));
    assert_eq!(
        server.join().unwrap(),
        ["GET /user/repos?affiliation=owner&per_page=100&page=1"]
    );
}

#[tokio::test]
async fn create_with_topics_reloads_the_repo() {
    let (base, server) = serve(vec![
        (201, repo_json("alice", "bar", &[])),
        (200, r#"{"names":["cli"]}"#.to_string()),
        (200, repo_json("alice", "bar", &["cli"])),
    ]);
    let local = LocalRepo {
        name: RepoName::from("bar"),
        path: PathBuf::from("/src/bar"),
        branch: "master".into(),
        meta: RepoMeta {
            description: Some("A bar".into()),
            topics: vec!["CLI".into()],
        },
        manifest_name: None,
        remotes: RemoteSet::new(),
        status: WorkingStatus::default(),
        aliases: AliasSet::build("bar", Vec::<String>::new()),
    };

    let created = inventory(&base).create(&local).await.unwrap();

    assert_eq!(created.meta.topics, vec!["cli".to_string()]);
    assert_eq!(
        server.join().unwrap(),
        [
            "POST /user/repos",
            "PUT /repos/alice/bar/topics",
            "GET /repos/alice/bar",
        ]
    );
}

#[tokio::test]
async fn error_status_maps_to_api_error() {
    let (base, server) = serve(vec![(404, r#"{"message":"Not Found"}"#.to_string())]);
    let remote = tandem_core::RemoteRepo {
        id: "R_gone".into(),
        name: RepoName::from("gone"),
        url: String::new(),
        branch: "master".into(),
        meta: RepoMeta::default(),
        aliases: AliasSet::build("gone", ["R_gone"]),
    };

    let err = inventory(&base).remove(&remote).await.unwrap_err();

    assert!(matches!(err, InventoryError::Api { status: 404, ref message } if message == "Not Found"));
    assert_eq!(server.join().unwrap(), ["DELETE /repos/alice/gone"]);
}
