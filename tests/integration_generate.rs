// build-manifest: CI Checkout Manifest Generator
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! End-to-end tests for the generate command against a mocked GitLab.
//!
//! Unmatched requests get wiremock's default 404, which the client reports as
//! a transport error, so only the records that exist need mocks.

use build_manifest::cli::generate::{CiArgs, GenerateArgs, ResolveArgs};
use build_manifest::cmd::generate::run_generate_command;
use build_manifest::cmd::resolve::run_resolve_command;
use build_manifest::config::Config;
use build_manifest::manifest::Manifest;
use build_manifest::resolve::RemoteTag;
use serde_json::json;
use std::path::PathBuf;
use tempfile::TempDir;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn temp_dir() -> TempDir {
    tempfile::tempdir().expect("failed to create temp dir")
}

fn config(server: &MockServer, ci: &str) -> Config {
    Config::parse(&format!(
        r#"
[gitlab]
api_url = "{}/api/v4"

[suite]
modules = ["gstreamer", "gst-plugins-base", "gst-plugins-good", "gst-libav"]

{ci}
"#,
        server.uri()
    ))
    .unwrap()
}

const FULL_CI: &str = r#"
[ci]
user_login = "alice"
token = "secret"
project_url = "https://gitlab.example.com/alice/gst-plugins-good"
project_name = "gst-plugins-good"
project_namespace = "alice"
branch = "feature-x"
commit_sha = "c0ffee"
"#;

async fn mount_json(server: &MockServer, endpoint: &str, search: &str, body: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path(endpoint))
        .and(query_param("search", search))
        .and(header("JOB-TOKEN", "secret"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

fn args(output: PathBuf) -> GenerateArgs {
    GenerateArgs {
        output: Some(output),
        ci: CiArgs::default(),
    }
}

#[tokio::test]
async fn test_generate_writes_manifest() {
    let server = MockServer::start().await;

    // alice forked gstreamer and has the branch
    mount_json(
        &server,
        "/api/v4/users/alice/projects",
        "gstreamer",
        json!([{
            "id": 1,
            "name": "gstreamer",
            "namespace": { "path": "alice", "full_path": "alice" }
        }]),
    )
    .await;
    mount_json(
        &server,
        "/api/v4/projects/1/repository/branches",
        "feature-x",
        json!([{ "name": "feature-x", "commit": { "id": "aaa111" } }]),
    )
    .await;

    // upstream gst-plugins-base only has master
    mount_json(
        &server,
        "/api/v4/groups/gstreamer/projects",
        "gst-plugins-base",
        json!([{
            "id": 10,
            "name": "gst-plugins-base",
            "namespace": { "path": "gstreamer", "full_path": "gstreamer" }
        }]),
    )
    .await;
    mount_json(
        &server,
        "/api/v4/projects/10/repository/branches",
        "master",
        json!([{ "name": "master", "commit": { "id": "bbb222" } }]),
    )
    .await;

    let dir = temp_dir();
    let output = dir.path().join("manifest.xml");
    let config = config(&server, FULL_CI);

    run_generate_command(&args(output.clone()), &config)
        .await
        .unwrap();

    let written = std::fs::read_to_string(&output).unwrap();
    let manifest = Manifest::parse(&written).unwrap();

    assert_eq!(manifest.remotes.user, "https://gitlab.example.com/alice/");
    let entries: Vec<_> = manifest
        .projects
        .iter()
        .map(|p| (p.name.as_str(), p.remote, p.revision.as_str()))
        .collect();
    assert_eq!(
        entries,
        [
            ("gstreamer", RemoteTag::User, "aaa111"),
            ("gst-plugins-base", RemoteTag::Upstream, "bbb222"),
            ("gst-plugins-good", RemoteTag::User, "c0ffee"),
            ("gst-libav", RemoteTag::Origin, "master"),
        ]
    );
    assert!(written.ends_with("</manifest>\n"));

    // The project under test is never searched for
    let requests = server.received_requests().await.unwrap();
    assert!(!requests.is_empty());
    assert!(
        requests
            .iter()
            .all(|r| !r.url.as_str().contains("search=gst-plugins-good"))
    );
}

#[tokio::test]
async fn test_missing_ci_value_fails_before_any_query() {
    let server = MockServer::start().await;

    let dir = temp_dir();
    let output = dir.path().join("manifest.xml");
    let ci = FULL_CI.replace("token = \"secret\"\n", "");
    let config = config(&server, &ci);

    let err = run_generate_command(&args(output.clone()), &config)
        .await
        .unwrap_err();

    assert!(format!("{err:#}").contains("'token'"), "{err:#}");
    assert!(server.received_requests().await.unwrap().is_empty());
    assert!(!output.exists());
}

#[tokio::test]
async fn test_api_outage_still_produces_origin_manifest() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let dir = temp_dir();
    let output = dir.path().join("manifest.xml");
    let config = config(&server, FULL_CI);

    run_generate_command(&args(output.clone()), &config)
        .await
        .unwrap();

    let manifest = Manifest::parse(&std::fs::read_to_string(&output).unwrap()).unwrap();
    let remotes: Vec<_> = manifest.projects.iter().map(|p| p.remote).collect();
    assert_eq!(
        remotes,
        [
            RemoteTag::Origin,
            RemoteTag::Origin,
            RemoteTag::User,
            RemoteTag::Origin
        ]
    );
}

#[tokio::test]
async fn test_ambiguous_lookup_leaves_no_manifest() {
    let server = MockServer::start().await;

    let twin = |id: u64| {
        json!({
            "id": id,
            "name": "gstreamer",
            "namespace": { "path": "gstreamer", "full_path": "gstreamer" }
        })
    };
    mount_json(
        &server,
        "/api/v4/groups/gstreamer/projects",
        "gstreamer",
        json!([twin(10), twin(11)]),
    )
    .await;

    let dir = temp_dir();
    let output = dir.path().join("manifest.xml");
    let config = config(&server, FULL_CI);

    let err = run_generate_command(&args(output.clone()), &config)
        .await
        .unwrap_err();

    assert!(format!("{err:#}").contains("ambiguous"), "{err:#}");
    assert!(!output.exists());
}

#[tokio::test]
async fn test_resolve_runs_without_project_identity() {
    let server = MockServer::start().await;

    mount_json(
        &server,
        "/api/v4/groups/gstreamer/projects",
        "gst-libav",
        json!([{
            "id": 12,
            "name": "gst-libav",
            "namespace": { "path": "gstreamer", "full_path": "gstreamer" }
        }]),
    )
    .await;
    mount_json(
        &server,
        "/api/v4/projects/12/repository/branches",
        "master",
        json!([{ "name": "master", "commit": { "id": "abc123" } }]),
    )
    .await;

    // No project_name, project_namespace or commit_sha
    let config = config(
        &server,
        r#"
[ci]
user_login = "alice"
token = "secret"
project_url = "https://gitlab.example.com/alice/gst-plugins-good"
branch = "master"
"#,
    );
    let args = ResolveArgs {
        module: "gst-libav".to_string(),
        ci: CiArgs::default(),
    };

    run_resolve_command(&args, &config).await.unwrap();

    let requests = server.received_requests().await.unwrap();
    assert!(
        requests
            .iter()
            .any(|r| r.url.path() == "/api/v4/projects/12/repository/branches")
    );
}
