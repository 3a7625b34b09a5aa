// build-manifest: CI Checkout Manifest Generator
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Generate command: resolve every module and write the manifest.
//!
//! ```text
//! [ci] --> CiContext --> GitLabClient --> ManifestBuilder --> write_atomic
//!           (validated before any query)     "Checking <module>: <via>"
//! ```


use std::path::PathBuf;

use anyhow::Context;
use tracing::info;

use crate::cli::generate::GenerateArgs;
use crate::config::types::SuiteConfig;
use crate::config::{CiContext, Config};
use crate::error::Result;
use crate::gitlab::{GitLabClient, ProjectHost};
use crate::manifest::{CurrentProject, Manifest, ManifestBuilder, ManifestRemotes, user_fetch_base};
use crate::resolve::{Resolver, ResolverSettings};

/// Main handler for the generate command.
///
/// # Errors
///
/// Returns an error if a `[ci]` value is missing, the API URL can't be
/// derived, a lookup is ambiguous, or the manifest can't be written.
pub async fn run_generate_command(args: &GenerateArgs, config: &Config) -> Result<()> {
    let ci = CiContext::from_config(config)?;
    let client = GitLabClient::from_settings(&config.gitlab, &ci.project_url, &ci.token)?;

    let manifest = generate_manifest(&client, config, &ci).await?;

    let output = output_path(args, config);
    manifest
        .write_atomic(&output)
        .with_context(|| format!("failed to write manifest to {}", output.display()))?;

    info!(path = %output.display(), projects = manifest.projects.len(), "manifest written");
    Ok(())
}

/// Resolve the configured modules against `host`, printing one line per module.
///
/// # Errors
///
/// Returns an error if the user remote's fetch base can't be derived from the
/// project URL, or a lookup is ambiguous.
pub async fn generate_manifest<H: ProjectHost>(
    host: &H,
    config: &Config,
    ci: &CiContext,
) -> Result<Manifest> {
    let remotes = manifest_remotes(&config.suite, ci)?;
    let current = current_project(ci);
    let settings = ResolverSettings::from_suite(&config.suite, &ci.user_login);

    let manifest = ManifestBuilder::new(
        Resolver::new(host, &settings),
        &config.suite.modules,
        &current,
        remotes,
    )
    .build_with_progress(|module, resolved| {
        println!("Checking {module}: {}", resolved.via());
    })
    .await
    .context("failed to resolve module revisions")?;

    Ok(manifest)
}

/// Fetch bases for the three remotes.
///
/// # Errors
///
/// Returns an error if `ci.project_url` is not a valid URL.
pub fn manifest_remotes(suite: &SuiteConfig, ci: &CiContext) -> Result<ManifestRemotes> {
    let user = user_fetch_base(&ci.project_url)
        .with_context(|| format!("cannot derive user remote from {}", ci.project_url))?;

    Ok(ManifestRemotes {
        user,
        upstream: suite.upstream_fetch.clone(),
        origin: suite.origin_fetch.clone(),
    })
}

#[must_use]
pub fn current_project(ci: &CiContext) -> CurrentProject {
    CurrentProject {
        name: ci.project_name.clone(),
        revision: ci.commit_sha.clone(),
        branch: ci.branch.clone(),
        namespace: ci.project_namespace.clone(),
    }
}

fn output_path(args: &GenerateArgs, config: &Config) -> PathBuf {
    args.output
        .clone()
        .unwrap_or_else(|| config.global.output.clone())
}
