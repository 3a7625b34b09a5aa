// build-manifest: CI Checkout Manifest Generator
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Validated views of the `[ci]` section.
//!
//! `generate` needs every pipeline value ([`CiContext`]); a single-module
//! lookup only needs the values that reach GitLab ([`LookupContext`]).

use super::Config;
use super::types::CiConfig;
use crate::error::ConfigError;

fn require(value: Option<&String>, key: &str) -> Result<String, ConfigError> {
    value
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
        .map(ToString::to_string)
        .ok_or_else(|| ConfigError::missing("ci", key))
}

/// Everything a manifest run needs to know about the pipeline, all present.
#[derive(Clone, PartialEq, Eq)]
pub struct CiContext {
    pub user_login: String,
    pub token: String,
    pub project_url: String,
    pub project_name: String,
    pub project_namespace: String,
    pub branch: String,
    pub commit_sha: String,
}

impl CiContext {
    /// Extract the CI values, failing on the first missing one.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingKey` naming the first absent or empty key.
    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        let ci = &config.ci;
        let LookupContext {
            user_login,
            token,
            project_url,
            branch,
        } = LookupContext::from_ci(ci)?;

        Ok(Self {
            token,
            project_url,
            user_login,
            project_name: require(ci.project_name.as_ref(), "project_name")?,
            project_namespace: require(ci.project_namespace.as_ref(), "project_namespace")?,
            branch,
            commit_sha: require(ci.commit_sha.as_ref(), "commit_sha")?,
        })
    }
}

/// The pipeline values a single-module lookup sends to GitLab.
#[derive(Clone, PartialEq, Eq)]
pub struct LookupContext {
    pub user_login: String,
    pub token: String,
    /// Used to derive the API base when `gitlab.api_url` is unset.
    pub project_url: String,
    pub branch: String,
}

impl LookupContext {
    /// Extract the lookup values, ignoring the rest of `[ci]`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingKey` naming the first absent or empty key.
    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        Self::from_ci(&config.ci)
    }

    fn from_ci(ci: &CiConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            token: require(ci.token.as_ref(), "token")?,
            project_url: require(ci.project_url.as_ref(), "project_url")?,
            user_login: require(ci.user_login.as_ref(), "user_login")?,
            branch: require(ci.branch.as_ref(), "branch")?,
        })
    }
}

impl std::fmt::Debug for LookupContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LookupContext")
            .field("user_login", &self.user_login)
            .field("token", &"[hidden]")
            .field("project_url", &self.project_url)
            .field("branch", &self.branch)
            .finish()
    }
}

impl std::fmt::Debug for CiContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CiContext")
            .field("user_login", &self.user_login)
            .field("token", &"[hidden]")
            .field("project_url", &self.project_url)
            .field("project_name", &self.project_name)
            .field("project_namespace", &self.project_namespace)
            .field("branch", &self.branch)
            .field("commit_sha", &self.commit_sha)
            .finish()
    }
}
