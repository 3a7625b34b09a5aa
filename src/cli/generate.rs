// build-manifest: CI Checkout Manifest Generator
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! CLI arguments for the `generate` and `resolve` commands.
//!
//! ```text
//! build-manifest generate [--output FILE]
//! build-manifest resolve gst-plugins-bad --branch feature-x
//!
//! Pipeline values (flag / CI variable):
//!   --user-login         GITLAB_USER_LOGIN
//!   --token              CI_JOB_TOKEN
//!   --project-url        CI_PROJECT_URL
//!   --project-name       CI_PROJECT_NAME
//!   --project-namespace  CI_PROJECT_NAMESPACE
//!   --branch             CI_COMMIT_REF_NAME
//!   --commit-sha         CI_COMMIT_SHA
//! ```

use clap::Args;
use std::path::PathBuf;

/// Pipeline identity, normally taken from the GitLab CI environment.
#[derive(Debug, Clone, Default, Args)]
pub struct CiArgs {
    /// Login of the user who triggered the pipeline.
    #[arg(long = "user-login", value_name = "LOGIN", env = "GITLAB_USER_LOGIN")]
    pub user_login: Option<String>,

    /// API token.
    #[arg(
        long = "token",
        value_name = "TOKEN",
        env = "CI_JOB_TOKEN",
        hide_env_values = true
    )]
    pub token: Option<String>,

    /// Web URL of the project under test.
    #[arg(long = "project-url", value_name = "URL", env = "CI_PROJECT_URL")]
    pub project_url: Option<String>,

    /// Name of the project under test.
    #[arg(long = "project-name", value_name = "NAME", env = "CI_PROJECT_NAME")]
    pub project_name: Option<String>,

    /// Namespace of the project under test.
    #[arg(
        long = "project-namespace",
        value_name = "NAMESPACE",
        env = "CI_PROJECT_NAMESPACE"
    )]
    pub project_namespace: Option<String>,

    /// Branch being built.
    #[arg(long = "branch", value_name = "BRANCH", env = "CI_COMMIT_REF_NAME")]
    pub branch: Option<String>,

    /// Commit under test.
    #[arg(long = "commit-sha", value_name = "SHA", env = "CI_COMMIT_SHA")]
    pub commit_sha: Option<String>,
}

impl CiArgs {
    /// `(config key, value)` pairs for every value that was supplied.
    #[must_use]
    pub fn to_config_overrides(&self) -> Vec<(&'static str, &str)> {
        [
            ("ci.user_login", &self.user_login),
            ("ci.token", &self.token),
            ("ci.project_url", &self.project_url),
            ("ci.project_name", &self.project_name),
            ("ci.project_namespace", &self.project_namespace),
            ("ci.branch", &self.branch),
            ("ci.commit_sha", &self.commit_sha),
        ]
        .into_iter()
        .filter_map(|(key, value)| value.as_deref().map(|v| (key, v)))
        .collect()
    }
}

/// Arguments for the `generate` command.
#[derive(Debug, Clone, Args)]
pub struct GenerateArgs {
    /// Manifest path, overrides global.output.
    #[arg(short = 'o', long = "output", value_name = "FILE")]
    pub output: Option<PathBuf>,

    #[command(flatten)]
    pub ci: CiArgs,
}

/// Arguments for the `resolve` command.
#[derive(Debug, Clone, Args)]
pub struct ResolveArgs {
    /// Module to resolve.
    #[arg(value_name = "MODULE")]
    pub module: String,

    #[command(flatten)]
    pub ci: CiArgs,
}
