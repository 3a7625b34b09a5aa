// build-manifest: CI Checkout Manifest Generator
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Integration tests for configuration loading.
//!
//! Tests the Config module with realistic TOML files and layering.

use build_manifest::config::types::TokenKind;
use build_manifest::config::{CiContext, Config};
use std::path::PathBuf;
use tempfile::TempDir;

fn temp_dir() -> TempDir {
    tempfile::tempdir().expect("failed to create temp dir")
}

fn write(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, content).expect("failed to write config");
    path
}

// =============================================================================
// Files
// =============================================================================

#[test]
fn config_from_file() {
    let dir = temp_dir();
    let path = write(
        &dir,
        "build-manifest.toml",
        r#"
[global]
output = "out/manifest.xml"

[gitlab]
token_kind = "private"
timeout_secs = 30

[suite]
modules = ["gst-build", "gstreamer"]
upstream_group = "media"
"#,
    );

    let config = Config::from_file(&path).unwrap();

    assert_eq!(config.global.output, PathBuf::from("out/manifest.xml"));
    assert_eq!(config.gitlab.token_kind, TokenKind::Private);
    assert_eq!(config.gitlab.timeout_secs, Some(30));
    assert_eq!(config.suite.modules, ["gst-build", "gstreamer"]);
    assert_eq!(config.suite.upstream_group, "media");
    // untouched keys keep their defaults
    assert_eq!(config.suite.default_branch, "master");
}

#[test]
fn config_missing_required_file() {
    let dir = temp_dir();
    assert!(Config::from_file(dir.path().join("nope.toml")).is_err());
}

#[test]
fn config_optional_file_absent() {
    let dir = temp_dir();
    let loader = Config::builder().add_toml_file_optional(dir.path().join("nope.toml"));

    assert!(loader.loaded_files().is_empty());
    let config = loader.build().unwrap();
    assert_eq!(config.suite.upstream_group, "gstreamer");
}

#[test]
fn config_invalid_toml() {
    let dir = temp_dir();
    let path = write(&dir, "bad.toml", "[suite\nmodules = ");
    assert!(Config::from_file(&path).is_err());
}

// =============================================================================
// Layering
// =============================================================================

#[test]
fn config_later_files_win() {
    let dir = temp_dir();
    let base = write(
        &dir,
        "base.toml",
        r#"
[suite]
upstream_group = "base"
default_branch = "main"
"#,
    );
    let extra = write(
        &dir,
        "extra.toml",
        r#"
[suite]
upstream_group = "extra"
"#,
    );

    let loader = Config::builder().add_toml_file(&base).add_toml_file(&extra);
    assert_eq!(loader.format_loaded_files().len(), 2);

    let config = loader.build().unwrap();
    assert_eq!(config.suite.upstream_group, "extra");
    assert_eq!(config.suite.default_branch, "main");
}

#[test]
fn config_set_overrides_beat_files() {
    let dir = temp_dir();
    let path = write(
        &dir,
        "ci.toml",
        r#"
[ci]
branch = "from-file"
"#,
    );

    let config = Config::builder()
        .add_toml_file(&path)
        .apply_overrides(&["ci/branch=from-set".to_string()])
        .unwrap()
        .set_if_some("ci.commit_sha", Some("abc"))
        .unwrap()
        .build()
        .unwrap();

    assert_eq!(config.ci.branch.as_deref(), Some("from-set"));
    assert_eq!(config.ci.commit_sha.as_deref(), Some("abc"));
}

#[test]
fn config_bad_override_syntax() {
    let result = Config::builder().apply_overrides(&["suite.modules".to_string()]);
    assert!(result.is_err());
}

// =============================================================================
// Validation
// =============================================================================

#[test]
fn config_duplicate_module_rejected() {
    let err = Config::parse(
        r#"
[suite]
modules = ["gstreamer", "gst-libav", "gstreamer"]
"#,
    )
    .unwrap_err();

    insta::assert_snapshot!(
        format!("{err:#}"),
        @"invalid value for 'modules' in section '[suite]': module 'gstreamer' is listed more than once"
    );
}

#[test]
fn config_ci_context_from_file() {
    let config = Config::parse(
        r#"
[ci]
user_login = "alice"
token = "t0k3n"
project_url = "https://gitlab.example.com/alice/gst-libav"
project_name = "gst-libav"
project_namespace = "alice"
branch = "fix-build"
commit_sha = "deadbeef"
"#,
    )
    .unwrap();

    let ci = CiContext::from_config(&config).unwrap();
    assert_eq!(ci.project_name, "gst-libav");
    assert!(!format!("{ci:?}").contains("t0k3n"));
    assert!(config.format_options().iter().all(|l| !l.contains("t0k3n")));
}
