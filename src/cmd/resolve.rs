// build-manifest: CI Checkout Manifest Generator
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Resolve command: run the fallback chain for one module.

use anyhow::Context;

use crate::cli::generate::ResolveArgs;
use crate::config::{Config, LookupContext};
use crate::error::Result;
use crate::gitlab::GitLabClient;
use crate::resolve::{Resolver, ResolverSettings};

/// Main handler for the resolve command.
///
/// Prints `<remote> <revision> (<via>)`. The project under test is resolved
/// like any other module here, so only the `[ci]` values sent to GitLab are
/// required.
///
/// # Errors
///
/// Returns an error if `ci.user_login`, `ci.token`, `ci.project_url` or
/// `ci.branch` is missing, or the lookup is ambiguous.
pub async fn run_resolve_command(args: &ResolveArgs, config: &Config) -> Result<()> {
    let ci = LookupContext::from_config(config)?;
    let client = GitLabClient::from_settings(&config.gitlab, &ci.project_url, &ci.token)?;
    let settings = ResolverSettings::from_suite(&config.suite, &ci.user_login);

    let resolved = Resolver::new(&client, &settings)
        .resolve(&args.module, &ci.branch)
        .await
        .with_context(|| format!("failed to resolve {}", args.module))?;

    println!(
        "{} {} ({})",
        resolved.remote(),
        resolved.revision(),
        resolved.via()
    );
    Ok(())
}
