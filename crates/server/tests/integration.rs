// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Integration tests for the issues-server binary.

#![allow(clippy::panic)]
#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

use std::net::TcpListener;
use std::process::{Child, Command, Stdio};
use std::time::Duration;

use serde_json::{json, Value};

/// Helper to spawn a server process and clean it up on drop.
struct ServerProcess {
    child: Child,
    port: u16,
    _temp_dir: tempfile::TempDir,
}

impl ServerProcess {
    fn spawn(extra_args: &[&str]) -> Self {
        let temp_dir = tempfile::tempdir().expect("create temp dir");
        let port = free_port();

        let child = Command::new(env!("CARGO_BIN_EXE_issues-server"))
            .arg("--bind")
            .arg(format!("127.0.0.1:{}", port))
            .args(extra_args)
            .current_dir(temp_dir.path())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .expect("spawn server process");

        ServerProcess {
            child,
            port,
            _temp_dir: temp_dir,
        }
    }

    fn url(&self, project: &str) -> String {
        format!("http://127.0.0.1:{}/api/issues/{}", self.port, project)
    }

    /// Polls until the server answers or the deadline passes.
    async fn wait_ready(&self, client: &reqwest::Client) {
        for _ in 0..50 {
            if client.get(self.url("ping")).send().await.is_ok() {
                return;
            }
            tokio::time::sleep(Duration::from_millis(100)).await;
        }
        panic!("server did not start on port {}", self.port);
    }
}

impl Drop for ServerProcess {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

/// Asks the OS for a port nothing is listening on.
fn free_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind probe socket");
    listener.local_addr().expect("probe address").port()
}

#[tokio::test]
async fn issue_lifecycle_against_memory_store() {
    let server = ServerProcess::spawn(&["--memory"]);
    let client = reqwest::Client::new();
    server.wait_ready(&client).await;

    let created: Value = client
        .post(server.url("lifecycle"))
        .json(&json!({
            "issue_title": "Broken build",
            "issue_text": "CI fails on main",
            "created_by": "Ops",
        }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let id = created["_id"].as_str().unwrap().to_string();
    assert_eq!(created["open"], true);

    let reply: Value = client
        .put(server.url("lifecycle"))
        .json(&json!({"_id": id, "open": false, "status_text": "Fixed"}))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(reply, json!({"result": "successfully updated", "_id": id}));

    let closed: Value = client
        .get(server.url("lifecycle"))
        .query(&[("open", "false")])
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(closed[0]["_id"], id.as_str());
    assert_eq!(closed[0]["status_text"], "Fixed");

    let reply: Value = client
        .delete(server.url("lifecycle"))
        .json(&json!({"_id": id}))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(reply, json!({"result": "successfully deleted", "_id": id}));

    let remaining: Value = client
        .get(server.url("lifecycle"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(remaining, json!([]));
}

#[tokio::test]
async fn sqlite_store_writes_database_file() {
    let server = ServerProcess::spawn(&["--db", "data/issues.db"]);
    let client = reqwest::Client::new();
    server.wait_ready(&client).await;

    let resp = client
        .post(server.url("persisted"))
        .json(&json!({
            "issue_title": "Saved",
            "issue_text": "on disk",
            "created_by": "Tester",
        }))
        .send()
        .await
        .unwrap();
    assert!(resp.status().is_success());

    assert!(server._temp_dir.path().join("data/issues.db").exists());
}

#[test]
fn missing_config_file_fails_to_start() {
    let output = Command::new(env!("CARGO_BIN_EXE_issues-server"))
        .arg("--config")
        .arg("/nonexistent/issues-server.toml")
        .output()
        .expect("run server");
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("issues-server.toml"), "stderr: {stderr}");
}
