// build-manifest: CI Checkout Manifest Generator
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use super::types::{DEFAULT_MODULES, TokenKind};
use super::{CiContext, Config, ConfigLoader, LookupContext};
use crate::cli::global::GlobalOptions;
use crate::error::ConfigError;
use crate::logging::LogLevel;
use std::path::PathBuf;

fn full_ci_toml() -> &'static str {
    r#"
[ci]
user_login = "alice"
token = "s3cret"
project_url = "https://gitlab.example.com/alice/gst-plugins-good"
project_name = "gst-plugins-good"
project_namespace = "alice"
branch = "feature-x"
commit_sha = "0123456789abcdef"
"#
}

#[test]
fn test_default_config() {
    let config = Config::default();
    assert_eq!(config.global.output_log_level, LogLevel::INFO);
    assert_eq!(config.global.output, PathBuf::from("manifest.xml"));
    assert_eq!(config.gitlab.token_kind, TokenKind::Job);
    assert_eq!(config.gitlab.per_page, 100);
    assert_eq!(config.suite.modules.len(), DEFAULT_MODULES.len());
    assert_eq!(config.suite.modules[0], "gst-build");
    assert_eq!(config.suite.upstream_group, "gstreamer");
    assert_eq!(config.suite.default_branch, "master");
    assert!(config.validate().is_ok());
}

#[test]
fn test_parse_suite_section() {
    let config = Config::parse(
        r#"
[suite]
modules = ["core", "plugins"]
upstream_group = "media"
default_branch = "main"
"#,
    )
    .unwrap();

    assert_eq!(config.suite.modules, vec!["core", "plugins"]);
    assert_eq!(config.suite.upstream_group, "media");
    assert_eq!(config.suite.default_branch, "main");
    // Untouched keys keep defaults
    assert_eq!(
        config.suite.origin_fetch,
        "git://anongit.freedesktop.org/gstreamer/"
    );
}

#[test]
fn test_parse_gitlab_section() {
    let config = Config::parse(
        r#"
[gitlab]
api_url = "https://gitlab.example.com/api/v4/"
token_kind = "private"
per_page = 20
timeout_secs = 30
"#,
    )
    .unwrap();

    assert_eq!(
        config.gitlab.api_url.as_deref(),
        Some("https://gitlab.example.com/api/v4/")
    );
    assert_eq!(config.gitlab.token_kind, TokenKind::Private);
    assert_eq!(config.gitlab.per_page, 20);
    assert_eq!(config.gitlab.timeout_secs, Some(30));
}

#[test]
fn test_unknown_key_rejected() {
    assert!(Config::parse("[suite]\nmodulez = []\n").is_err());
    assert!(Config::parse("[nope]\nx = 1\n").is_err());
}

#[test]
fn test_validate_rejects_bad_module_lists() {
    let empty = Config::parse("[suite]\nmodules = []\n").unwrap_err();
    assert!(empty.to_string().contains("module list is empty"), "{empty}");

    let dup = Config::parse("[suite]\nmodules = [\"a\", \"b\", \"a\"]\n").unwrap_err();
    assert!(dup.to_string().contains("'a' is listed more than once"), "{dup}");
}

#[test]
fn test_validate_rejects_bad_pagination() {
    assert!(Config::parse("[gitlab]\nper_page = 0\n").is_err());
    assert!(Config::parse("[gitlab]\nper_page = 101\n").is_err());
    assert!(Config::parse("[gitlab]\nmax_pages = 0\n").is_err());
}

#[test]
fn test_token_kind_parse_and_header() {
    assert_eq!("JOB".parse::<TokenKind>().unwrap(), TokenKind::Job);
    assert_eq!("private".parse::<TokenKind>().unwrap(), TokenKind::Private);
    assert!("bearer".parse::<TokenKind>().is_err());
    assert_eq!(TokenKind::Job.header_name(), "JOB-TOKEN");
    assert_eq!(TokenKind::Private.header_name(), "PRIVATE-TOKEN");
}

#[test]
fn test_loader_overrides_take_precedence() {
    let config = ConfigLoader::new()
        .add_toml_str("[suite]\nupstream_group = \"from-file\"\n")
        .apply_overrides(&[
            "suite/upstream_group=from-set".to_string(),
            "gitlab/per_page=25".to_string(),
            "suite/default_branch=main".to_string(),
        ])
        .unwrap()
        .build()
        .unwrap();

    assert_eq!(config.suite.upstream_group, "from-set");
    assert_eq!(config.gitlab.per_page, 25);
    assert_eq!(config.suite.default_branch, "main");
}

#[test]
fn test_global_section_drives_logging() {
    let config = Config::parse(
        r#"
[global]
output_log_level = 4
file_log_level = 5
log_file = "logs/manifest.log"
"#,
    )
    .unwrap();

    let log = config.global.to_log_config();
    assert_eq!(log.console_level(), LogLevel::DEBUG);
    assert_eq!(log.file_level(), LogLevel::TRACE);
    assert_eq!(log.log_file(), Some("logs/manifest.log"));
}

#[test]
fn test_default_global_logging() {
    let log = Config::default().global.to_log_config();
    assert_eq!(log.console_level(), LogLevel::INFO);
    assert_eq!(log.file_level(), LogLevel::DEBUG);
    assert!(log.log_file().is_none());
}

#[test]
fn test_cli_log_flags_beat_global_section() {
    let flags = GlobalOptions {
        log_level: Some(2),
        log_file: Some(PathBuf::from("cli.log")),
        ..GlobalOptions::default()
    };

    let config = ConfigLoader::new()
        .add_toml_str("[global]\noutput_log_level = 5\nlog_file = \"file.log\"\n")
        .apply_overrides(&flags.to_config_overrides())
        .unwrap()
        .build()
        .unwrap();

    let log = config.global.to_log_config();
    assert_eq!(log.console_level(), LogLevel::WARN);
    // --log-level also sets the file level when --file-log-level is absent
    assert_eq!(log.file_level(), LogLevel::WARN);
    assert_eq!(log.log_file(), Some("cli.log"));
}

#[test]
fn test_loader_set_if_some() {
    let config = ConfigLoader::new()
        .set_if_some("ci.branch", Some("feature-x"))
        .unwrap()
        .set_if_some("ci.commit_sha", None)
        .unwrap()
        .build()
        .unwrap();

    assert_eq!(config.ci.branch.as_deref(), Some("feature-x"));
    assert!(config.ci.commit_sha.is_none());
}

#[test]
fn test_loader_tracks_loaded_files() {
    let loader = ConfigLoader::new()
        .add_toml_str("")
        .add_toml_file_optional("definitely-not-here.toml");
    assert_eq!(loader.loaded_files().len(), 1);
    assert_eq!(loader.format_loaded_files(), vec!["1. [string] <string>"]);
}

#[test]
fn test_ci_context_complete() {
    let config = Config::parse(full_ci_toml()).unwrap();
    let ci = CiContext::from_config(&config).unwrap();

    assert_eq!(ci.user_login, "alice");
    assert_eq!(ci.project_name, "gst-plugins-good");
    assert_eq!(ci.branch, "feature-x");
    assert_eq!(ci.commit_sha, "0123456789abcdef");
}

#[test]
fn test_ci_context_missing_token_is_fatal() {
    let config = ConfigLoader::new()
        .add_toml_str(full_ci_toml())
        .set("ci.token", "   ")
        .unwrap()
        .build()
        .unwrap();

    match CiContext::from_config(&config) {
        Err(ConfigError::MissingKey { section, key }) => {
            assert_eq!(section, "ci");
            assert_eq!(key, "token");
        }
        other => panic!("expected MissingKey, got {other:?}"),
    }
}

#[test]
fn test_ci_context_debug_hides_token() {
    let config = Config::parse(full_ci_toml()).unwrap();
    let ci = CiContext::from_config(&config).unwrap();
    let debug = format!("{ci:?}");
    assert!(!debug.contains("s3cret"));
    assert!(debug.contains("[hidden]"));
}

#[test]
fn test_lookup_context_needs_only_gitlab_values() {
    let config = Config::parse(
        r#"
[ci]
user_login = "alice"
token = "s3cret"
project_url = "https://gitlab.example.com/alice/gst-plugins-good"
branch = "feature-x"
"#,
    )
    .unwrap();

    let lookup = LookupContext::from_config(&config).unwrap();
    assert_eq!(lookup.user_login, "alice");
    assert_eq!(lookup.branch, "feature-x");
    assert!(!format!("{lookup:?}").contains("s3cret"));

    // The full context still insists on the rest of the section
    match CiContext::from_config(&config) {
        Err(ConfigError::MissingKey { key, .. }) => assert_eq!(key, "project_name"),
        other => panic!("expected MissingKey, got {other:?}"),
    }
}

#[test]
fn test_lookup_context_missing_branch() {
    let config = ConfigLoader::new()
        .add_toml_str(full_ci_toml())
        .set("ci.branch", "")
        .unwrap()
        .build()
        .unwrap();

    let err = LookupContext::from_config(&config).unwrap_err();
    insta::assert_snapshot!(err.to_string(), @"missing required config key 'branch' in section '[ci]'");
}

#[test]
fn test_format_options_hides_token() {
    let config = Config::parse(full_ci_toml()).unwrap();
    let lines = config.format_options();

    assert!(lines.iter().all(|l| !l.contains("s3cret")));
    assert!(
        lines
            .iter()
            .any(|l| l.starts_with("ci.token") && l.ends_with("= [hidden]"))
    );
    // Sorted by key
    let keys: Vec<_> = lines
        .iter()
        .map(|l| l.split_whitespace().next().unwrap_or_default().to_string())
        .collect();
    let mut sorted = keys.clone();
    sorted.sort();
    assert_eq!(keys, sorted);
}
