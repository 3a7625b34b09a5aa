// build-manifest: CI Checkout Manifest Generator
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Configuration management for build-manifest.
//!
//! # Configuration Hierarchy
//!
//! ```text
//! Priority (low → high)
//! 1. defaults
//! 2. build-manifest.toml (cwd, optional)
//! 3. --ini files
//! 4. BUILD_MANIFEST_* env vars
//! 5. --set section/key=value
//! 6. CI variables (CI_JOB_TOKEN, CI_PROJECT_URL, ...)
//! ```
//!
//! # Environment Variable Mapping
//!
//! ```text
//! BUILD_MANIFEST_GITLAB__PER_PAGE=50       → gitlab.per_page = 50
//! BUILD_MANIFEST_SUITE__UPSTREAM_GROUP=gst → suite.upstream_group = "gst"
//! ```
//!
//! The `[ci]` section is validated separately by [`CiContext::from_config`],
//! since only `generate` and `resolve` need it.

pub mod ci;
pub mod loader;
pub mod types;

#[cfg(test)]
mod tests;

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::path::Path;

use crate::error::{ConfigError, Result};

pub use ci::{CiContext, LookupContext};
use loader::ConfigLoader;
use types::{CiConfig, GitLabConfig, GlobalConfig, SuiteConfig};

/// Complete application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Global options.
    pub global: GlobalConfig,
    /// GitLab API access.
    pub gitlab: GitLabConfig,
    /// Module list and remotes.
    pub suite: SuiteConfig,
    /// Pipeline run values.
    pub ci: CiConfig,
}

impl Config {
    /// Create a new configuration builder.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use build_manifest::config::Config;
    ///
    /// let config = Config::builder()
    ///     .add_toml_file_optional("build-manifest.toml")
    ///     .with_env_prefix("BUILD_MANIFEST")
    ///     .build()?;
    /// # Ok::<(), anyhow::Error>(())
    /// ```
    #[must_use]
    pub fn builder() -> ConfigLoader {
        ConfigLoader::new()
    }

    /// Load configuration from a single TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, contains invalid TOML, or
    /// does not match the `Config` structure.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::builder().add_toml_file(path).build()
    }

    /// Load configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the content is not valid TOML or does not match the
    /// `Config` structure.
    pub fn parse(content: &str) -> Result<Self> {
        Self::builder().add_toml_str(content).build()
    }

    /// Check values that deserialize fine but can't produce a sensible run.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` for an empty or duplicated module
    /// list, an empty default branch or upstream group, or out-of-range
    /// pagination settings.
    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        if self.suite.modules.is_empty() {
            return Err(ConfigError::invalid(
                "suite",
                "modules",
                "module list is empty",
            ));
        }

        let mut seen = HashSet::new();
        for module in &self.suite.modules {
            if module.trim().is_empty() {
                return Err(ConfigError::invalid(
                    "suite",
                    "modules",
                    "module names must not be empty",
                ));
            }
            if !seen.insert(module.as_str()) {
                return Err(ConfigError::invalid(
                    "suite",
                    "modules",
                    format!("module '{module}' is listed more than once"),
                ));
            }
        }

        if self.suite.default_branch.trim().is_empty() {
            return Err(ConfigError::invalid(
                "suite",
                "default_branch",
                "must not be empty",
            ));
        }
        if self.suite.upstream_group.trim().is_empty() {
            return Err(ConfigError::invalid(
                "suite",
                "upstream_group",
                "must not be empty",
            ));
        }
        if !(1..=100).contains(&self.gitlab.per_page) {
            return Err(ConfigError::invalid(
                "gitlab",
                "per_page",
                format!("must be 1-100, got {}", self.gitlab.per_page),
            ));
        }
        if self.gitlab.max_pages == 0 {
            return Err(ConfigError::invalid(
                "gitlab",
                "max_pages",
                "must be at least 1",
            ));
        }
        Ok(())
    }

    /// Format configuration options for display.
    ///
    /// The API token is replaced with `[hidden]`. Output is ordered by key.
    #[must_use]
    pub fn format_options(&self) -> Vec<String> {
        let mut options = BTreeMap::new();
        self.format_global_options(&mut options);
        self.format_gitlab_options(&mut options);
        self.format_suite_options(&mut options);
        self.format_ci_options(&mut options);

        let max_key_len = options.keys().map(String::len).max().unwrap_or(0);

        options
            .into_iter()
            .map(|(key, value)| format!("{key:<max_key_len$} = {value}"))
            .collect()
    }

    fn format_global_options(&self, options: &mut BTreeMap<String, String>) {
        options.insert(
            "global.output_log_level".into(),
            self.global.output_log_level.as_u8().to_string(),
        );
        options.insert(
            "global.file_log_level".into(),
            self.global.file_log_level.as_u8().to_string(),
        );
        options.insert(
            "global.log_file".into(),
            self.global
                .log_file
                .as_ref()
                .map_or_else(String::new, |p| p.display().to_string()),
        );
        options.insert(
            "global.output".into(),
            self.global.output.display().to_string(),
        );
    }

    fn format_gitlab_options(&self, options: &mut BTreeMap<String, String>) {
        options.insert(
            "gitlab.api_url".into(),
            self.gitlab.api_url.clone().unwrap_or_default(),
        );
        options.insert(
            "gitlab.token_kind".into(),
            self.gitlab.token_kind.to_string(),
        );
        options.insert("gitlab.per_page".into(), self.gitlab.per_page.to_string());
        options.insert("gitlab.max_pages".into(), self.gitlab.max_pages.to_string());
        options.insert(
            "gitlab.timeout_secs".into(),
            self.gitlab
                .timeout_secs
                .map_or_else(String::new, |t| t.to_string()),
        );
    }

    fn format_suite_options(&self, options: &mut BTreeMap<String, String>) {
        options.insert("suite.modules".into(), self.suite.modules.join(", "));
        options.insert(
            "suite.upstream_group".into(),
            self.suite.upstream_group.clone(),
        );
        options.insert(
            "suite.upstream_fetch".into(),
            self.suite.upstream_fetch.clone(),
        );
        options.insert("suite.origin_fetch".into(), self.suite.origin_fetch.clone());
        options.insert(
            "suite.default_branch".into(),
            self.suite.default_branch.clone(),
        );
    }

    fn format_ci_options(&self, options: &mut BTreeMap<String, String>) {
        let ci = &self.ci;
        let show = |v: &Option<String>| v.clone().unwrap_or_default();

        options.insert("ci.user_login".into(), show(&ci.user_login));
        if ci.token.as_deref().is_some_and(|t| !t.is_empty()) {
            options.insert("ci.token".into(), "[hidden]".into());
        }
        options.insert("ci.project_url".into(), show(&ci.project_url));
        options.insert("ci.project_name".into(), show(&ci.project_name));
        options.insert("ci.project_namespace".into(), show(&ci.project_namespace));
        options.insert("ci.branch".into(), show(&ci.branch));
        options.insert("ci.commit_sha".into(), show(&ci.commit_sha));
    }
}
