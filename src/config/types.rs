// build-manifest: CI Checkout Manifest Generator
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Configuration types for build-manifest.
//!
//! # Config Structure
//!
//! ```text
//! Config: GlobalConfig, GitLabConfig, SuiteConfig, CiConfig
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::ConfigError;
use crate::logging::{LogConfig, LogLevel};

/// Modules of the suite, in manifest order.
pub const DEFAULT_MODULES: &[&str] = &[
    "gst-build",
    "gstreamer",
    "gst-plugins-base",
    "gst-plugins-good",
    "gst-plugins-bad",
    "gst-plugins-ugly",
    "gst-libav",
    "gst-devtools",
    "gst-docs",
    "gst-editing-services",
    "gst-omx",
    "gst-python",
    "gst-rtsp-server",
];

/// Global configuration options.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GlobalConfig {
    /// Log level for console output (0-6).
    pub output_log_level: LogLevel,
    /// Log level for file output (0-6).
    pub file_log_level: LogLevel,
    /// Path to log file.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_file: Option<PathBuf>,
    /// Where the manifest is written.
    pub output: PathBuf,
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            output_log_level: LogLevel::INFO,
            file_log_level: LogLevel::DEBUG,
            log_file: None,
            output: PathBuf::from("manifest.xml"),
        }
    }
}

impl GlobalConfig {
    /// Logging setup described by this section.
    #[must_use]
    pub fn to_log_config(&self) -> LogConfig {
        LogConfig::builder()
            .with_console_level(self.output_log_level)
            .with_file_level(self.file_log_level)
            .maybe_with_log_file(self.log_file.as_ref().map(|p| p.display().to_string()))
            .build()
    }
}

/// How the API token is presented to GitLab.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    /// CI job token, sent as `JOB-TOKEN`.
    #[default]
    Job,
    /// Personal or project access token, sent as `PRIVATE-TOKEN`.
    Private,
}

impl TokenKind {
    /// HTTP header carrying the token.
    #[must_use]
    pub const fn header_name(self) -> &'static str {
        match self {
            Self::Job => "JOB-TOKEN",
            Self::Private => "PRIVATE-TOKEN",
        }
    }
}

impl std::fmt::Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Job => write!(f, "job"),
            Self::Private => write!(f, "private"),
        }
    }
}

impl std::str::FromStr for TokenKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "job" => Ok(Self::Job),
            "private" => Ok(Self::Private),
            _ => Err(ConfigError::invalid(
                "gitlab",
                "token_kind",
                format!("expected 'job' or 'private', got '{s}'"),
            )),
        }
    }
}

/// GitLab API access settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GitLabConfig {
    /// API base URL. Derived from `ci.project_url` when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_url: Option<String>,
    pub token_kind: TokenKind,
    /// Records requested per page (GitLab caps this at 100).
    pub per_page: u32,
    /// Upper bound on pages followed for a single search.
    pub max_pages: u32,
    /// Per-request timeout. No timeout when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

impl Default for GitLabConfig {
    fn default() -> Self {
        Self {
            api_url: None,
            token_kind: TokenKind::Job,
            per_page: 100,
            max_pages: 10,
            timeout_secs: None,
        }
    }
}

/// The suite of modules and where they live.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SuiteConfig {
    /// Required modules, in manifest order.
    pub modules: Vec<String>,
    /// Canonical upstream group searched after the user's fork.
    pub upstream_group: String,
    /// Fetch base of the `upstream` remote.
    pub upstream_fetch: String,
    /// Fetch base of the `origin` remote.
    pub origin_fetch: String,
    /// Branch used for the upstream fallback and the `origin` marker.
    pub default_branch: String,
}

impl Default for SuiteConfig {
    fn default() -> Self {
        Self {
            modules: DEFAULT_MODULES.iter().map(ToString::to_string).collect(),
            upstream_group: "gstreamer".to_string(),
            upstream_fetch: "https://gitlab.freedesktop.org/gstreamer/".to_string(),
            origin_fetch: "git://anongit.freedesktop.org/gstreamer/".to_string(),
            default_branch: "master".to_string(),
        }
    }
}

/// Values describing the pipeline run, normally fed from GitLab CI variables.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CiConfig {
    /// Login of the user whose fork is searched (`GITLAB_USER_LOGIN`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_login: Option<String>,
    /// API token (`CI_JOB_TOKEN`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    /// URL of the project under test (`CI_PROJECT_URL`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_url: Option<String>,
    /// `CI_PROJECT_NAME`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_name: Option<String>,
    /// `CI_PROJECT_NAMESPACE`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_namespace: Option<String>,
    /// `CI_COMMIT_REF_NAME`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub branch: Option<String>,
    /// `CI_COMMIT_SHA`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub commit_sha: Option<String>,
}
