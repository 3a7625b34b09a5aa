// build-manifest: CI Checkout Manifest Generator
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! CLI module for build-manifest using clap derive.
//!
//! # Command Structure
//!
//! ```text
//! build-manifest [global options] <command>
//! generate [--output FILE] [CI overrides...]
//! resolve <MODULE> [--branch B]
//! modules
//! options
//! inis
//! version
//! ```

pub mod generate;
pub mod global;


use crate::cli::generate::{CiArgs, GenerateArgs, ResolveArgs};
use crate::cli::global::GlobalOptions;
use clap::{Parser, Subcommand};

/// CI Checkout Manifest Generator
///
/// Picks a revision of every suite module for a pipeline run and writes the
/// checkout manifest.
#[derive(Debug, Parser)]
#[command(
    name = "build-manifest",
    author,
    version,
    about = "CI checkout manifest generator",
    long_about = "build-manifest Copyright (C) 2026 Romeo Ahmed\n\
                  This program comes with ABSOLUTELY NO WARRANTY\n\
                  This is free software, and you are welcome to redistribute it\n\
                  under certain conditions; see LICENSE for details.\n\n\
                  Writes a checkout manifest for a multi-repository CI build.\n\n\
                  For every module of the suite, the revision comes from the\n\
                  user's fork when it has the branch being built, otherwise from\n\
                  the upstream group (same branch, then master), otherwise from\n\
                  the public mirror's master. The project under test is always\n\
                  pinned to the commit being tested.",
    after_help = "CONFIGURATION:\n\n\
                  Settings are read from `build-manifest.toml` in the current\n\
                  directory if present, then from every --ini file in order, then\n\
                  from BUILD_MANIFEST_<SECTION>__<KEY> environment variables, then\n\
                  from --set overrides. Pipeline values come last, from the\n\
                  standard GitLab CI variables or the matching flags."
)]
pub struct Cli {
    /// Global options shared by all commands
    #[command(flatten)]
    pub global: GlobalOptions,

    /// Command to execute
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Shows the version.
    #[command(visible_alias = "-v")]
    Version,

    /// Lists all options and their values.
    Options,

    /// Lists the configuration files that were loaded.
    Inis,

    /// Lists the configured modules, in manifest order.
    Modules,

    /// Resolves every module and writes the manifest.
    Generate(GenerateArgs),

    /// Resolves a single module and prints the result.
    Resolve(ResolveArgs),
}

impl Command {
    /// Pipeline values supplied on the command line or by the CI environment.
    #[must_use]
    pub const fn ci_args(&self) -> Option<&CiArgs> {
        match self {
            Self::Generate(args) => Some(&args.ci),
            Self::Resolve(args) => Some(&args.ci),
            Self::Version | Self::Options | Self::Inis | Self::Modules => None,
        }
    }
}

/// Parses command-line arguments.
#[must_use]
pub fn parse() -> Cli {
    Cli::parse()
}

/// Parses command-line arguments from an iterator.
pub fn parse_from<I, T>(iter: I) -> Cli
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    Cli::parse_from(iter)
}

/// Tries to parse command-line arguments, returning an error on failure.
///
/// # Errors
///
/// Returns a `clap::Error` if the arguments are invalid or if help/version information
/// was requested.
pub fn try_parse() -> Result<Cli, clap::Error> {
    Cli::try_parse()
}
