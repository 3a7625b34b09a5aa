// build-manifest: CI Checkout Manifest Generator
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Entry point.
//!
//! ```text
//! cli::parse() --> Config --> Logging --> Command Dispatch
//!   Generate | Resolve | Modules | Options | Inis | Version
//! ```

use std::process::ExitCode;

use build_manifest::cli::global::GlobalOptions;
use build_manifest::cli::{self, Command};
use build_manifest::cmd::config::{run_inis_command, run_modules_command, run_options_command};
use build_manifest::cmd::generate::run_generate_command;
use build_manifest::cmd::resolve::run_resolve_command;
use build_manifest::config::Config;
use build_manifest::config::loader::ConfigLoader;
use build_manifest::error::Result;
use build_manifest::logging::init_logging;
use build_manifest::logging::{LogConfig, LogLevel};

use mimalloc::MiMalloc;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

const DEFAULT_CONFIG_FILE: &str = "build-manifest.toml";
const ENV_PREFIX: &str = "BUILD_MANIFEST";

#[tokio::main]
async fn main() -> ExitCode {
    let cli = cli::parse();

    // Logging follows the loaded [global] section; CLI flags already sit on
    // top of it as overrides. Without a config only the flags apply.
    let config = load_config(&cli);
    let log_config = config
        .as_ref()
        .map_or_else(|_| build_log_config(&cli.global), |c| c.global.to_log_config());
    let _log_guard = match init_logging(&log_config) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {e}");
            return ExitCode::FAILURE;
        }
    };

    dispatch_command(&cli, config).await
}

fn build_log_config(global: &GlobalOptions) -> LogConfig {
    let console_level = global
        .log_level
        .and_then(LogLevel::from_u8)
        .unwrap_or(LogLevel::INFO);

    let file_level = global
        .file_log_level
        .and_then(LogLevel::from_u8)
        .unwrap_or(console_level);

    LogConfig::builder()
        .with_console_level(console_level)
        .with_file_level(file_level)
        .maybe_with_log_file(global.log_file.as_ref().map(|p| p.display().to_string()))
        .build()
}

async fn dispatch_command(cli: &cli::Cli, config: Result<Config>) -> ExitCode {
    let result = match &cli.command {
        Some(Command::Version) => {
            handle_version_command();
            Ok(())
        }
        Some(Command::Options) => require_config(config).map(|config| run_options_command(&config)),
        Some(Command::Inis) => {
            let loader = build_config_loader(&cli.global);
            run_inis_command(&loader.format_loaded_files());
            Ok(())
        }
        Some(Command::Modules) => require_config(config).map(|config| run_modules_command(&config)),
        Some(Command::Generate(args)) => match require_config(config) {
            Ok(config) => run_generate_command(args, &config).await,
            Err(e) => Err(e),
        },
        Some(Command::Resolve(args)) => match require_config(config) {
            Ok(config) => run_resolve_command(args, &config).await,
            Err(e) => Err(e),
        },
        None => {
            eprintln!("No command specified. Use --help for usage information.");
            Err(anyhow::anyhow!("No command specified"))
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn handle_version_command() {
    println!("{}", env!("CARGO_PKG_VERSION"));
}

fn build_config_loader(global: &GlobalOptions) -> ConfigLoader {
    let mut loader = ConfigLoader::new().add_toml_file_optional(DEFAULT_CONFIG_FILE);
    for ini_path in &global.inis {
        loader = loader.add_toml_file(ini_path);
    }
    loader.with_env_prefix(ENV_PREFIX)
}

fn load_config(cli: &cli::Cli) -> Result<Config> {
    let mut loader =
        build_config_loader(&cli.global).apply_overrides(&cli.global.to_config_overrides())?;

    if let Some(ci) = cli.command.as_ref().and_then(Command::ci_args) {
        for (key, value) in ci.to_config_overrides() {
            loader = loader.set(key, value)?;
        }
    }

    loader.build()
}

fn require_config(config: Result<Config>) -> Result<Config> {
    config.map_err(|e| {
        eprintln!("Failed to load config: {e}");
        e
    })
}
