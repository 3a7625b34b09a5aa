// build-manifest: CI Checkout Manifest Generator
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Logging infrastructure using the `tracing` ecosystem.
//!
//! ```text
//! init_logging(&LogConfig)
//!        |
//!        v
//!    registry
//!    |       |
//!    v       v
//! Console   File (optional)
//! stderr    non_blocking
//! EnvFilter EnvFilter
//!        |
//!        v
//!    LogGuard (flush on drop)
//!
//! LogLevel:  0=OFF  1=ERROR  2=WARN  3=INFO
//!            4=DEBUG  5=TRACE  6=DUMP(+http libs)
//! ```
//!
//! Console logs go to stderr so the per-module `Checking ...` lines on stdout
//! stay readable in CI job output.

use anyhow::Context;
use bon::Builder;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::error::{ConfigError, Result};

/// Log level (0-6) for configuration.
///
/// - 0: Silent
/// - 1: Error
/// - 2: Warn
/// - 3: Info (default)
/// - 4: Debug - every remote query
/// - 5: Trace
/// - 6: Dump - trace, including reqwest/hyper internals
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogLevel(u8);

impl Default for LogLevel {
    fn default() -> Self {
        Self::INFO
    }
}

impl LogLevel {
    pub const SILENT: Self = Self(0);
    pub const ERROR: Self = Self(1);
    pub const WARN: Self = Self(2);
    pub const INFO: Self = Self(3);
    pub const DEBUG: Self = Self(4);
    pub const TRACE: Self = Self(5);
    pub const DUMP: Self = Self(6);

    /// Create a new `LogLevel` from a u8 value (0-6).
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError::InvalidValue` if the level is greater than 6.
    pub fn new(level: u8) -> std::result::Result<Self, ConfigError> {
        Self::from_u8(level).ok_or_else(|| {
            ConfigError::invalid(
                "global",
                "log_level",
                format!("log level must be 0-6, got {level}"),
            )
        })
    }

    /// Get the raw u8 value.
    #[must_use]
    pub const fn as_u8(&self) -> u8 {
        self.0
    }

    /// Convert from u8 value, returning None if out of range.
    #[must_use]
    pub const fn from_u8(level: u8) -> Option<Self> {
        if level <= 6 { Some(Self(level)) } else { None }
    }

    /// Convert to `EnvFilter` directive string.
    ///
    /// Below DUMP, the HTTP stack is capped at `warn` so connection pool chatter
    /// doesn't drown out resolution output.
    #[must_use]
    pub const fn to_filter_string(self) -> &'static str {
        match self.0 {
            0 => "off",
            1 => "error",
            2 => "warn",
            3 => "info,reqwest=warn,hyper=warn,hyper_util=warn",
            4 => "debug,reqwest=warn,hyper=warn,hyper_util=warn",
            5 => "trace,reqwest=warn,hyper=warn,hyper_util=warn",
            _ => "trace",
        }
    }
}

impl TryFrom<u8> for LogLevel {
    type Error = ConfigError;

    fn try_from(value: u8) -> std::result::Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<LogLevel> for u8 {
    fn from(level: LogLevel) -> Self {
        level.0
    }
}

impl Serialize for LogLevel {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u8(self.0)
    }
}

impl<'de> Deserialize<'de> for LogLevel {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = u8::deserialize(deserializer)?;
        Self::new(value).map_err(serde::de::Error::custom)
    }
}

/// Configuration for the logging system.
#[derive(Debug, Clone, Builder)]
pub struct LogConfig {
    #[builder(setters(name = with_console_level), default = LogLevel::INFO)]
    console_level: LogLevel,
    #[builder(setters(name = with_file_level), default = LogLevel::DEBUG)]
    file_level: LogLevel,
    #[builder(setters(name = with_log_file))]
    log_file: Option<String>,
    #[builder(setters(name = with_show_target), default = false)]
    show_target: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl LogConfig {
    #[must_use]
    pub const fn console_level(&self) -> LogLevel {
        self.console_level
    }

    #[must_use]
    pub const fn file_level(&self) -> LogLevel {
        self.file_level
    }

    #[must_use]
    pub fn log_file(&self) -> Option<&str> {
        self.log_file.as_deref()
    }

    #[must_use]
    pub const fn show_target(&self) -> bool {
        self.show_target
    }
}

/// RAII guard that keeps the logging system alive.
/// When dropped, flushes all pending log writes.
pub struct LogGuard {
    _file_guard: Option<WorkerGuard>,
}

/// Initialize the logging system with the given configuration.
///
/// Returns a guard that must be kept alive for the duration of the program.
///
/// # Errors
///
/// Returns an error if the log directory or file cannot be created.
///
/// # Example
///
/// ```no_run
/// use build_manifest::logging::{init_logging, LogConfig, LogLevel};
///
/// let config = LogConfig::builder()
///     .with_console_level(LogLevel::INFO)
///     .with_log_file("build-manifest.log".to_string())
///     .build();
///
/// let _guard = init_logging(&config).expect("Failed to initialize logging");
/// tracing::info!("Logging initialized");
/// ```
pub fn init_logging(config: &LogConfig) -> Result<LogGuard> {
    let console_filter = EnvFilter::new(config.console_level().to_filter_string());

    let console_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(config.show_target())
        .with_level(true)
        .with_ansi(true)
        .with_filter(console_filter);

    let (file_layer, file_guard) = if let Some(log_path) = config.log_file() {
        let log_path = Path::new(log_path);

        if let Some(parent) = log_path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create log directory {}", parent.display()))?;
        }

        let file = std::fs::File::create(log_path)
            .with_context(|| format!("failed to create log file {}", log_path.display()))?;
        let (non_blocking, guard) = tracing_appender::non_blocking(file);

        let file_filter = EnvFilter::new(config.file_level().to_filter_string());

        let layer = fmt::layer()
            .with_writer(non_blocking)
            .with_target(true)
            .with_level(true)
            .with_ansi(false)
            .with_filter(file_filter);

        (Some(layer), Some(guard))
    } else {
        (None, None)
    };

    tracing_subscriber::registry()
        .with(console_layer)
        .with(file_layer)
        .init();

    Ok(LogGuard {
        _file_guard: file_guard,
    })
}
