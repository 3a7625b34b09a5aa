// build-manifest: CI Checkout Manifest Generator
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Configuration loading from multiple sources.
//!
//! # Loader Pipeline
//!
//! ```text
//! ConfigLoader::new()
//!   .add_toml_file(req)
//!   .add_toml_file_optional(opt)
//!   .add_toml_str()
//!   .with_env_prefix()
//!   .set() / .apply_overrides()
//!        |
//!        v
//!    build() --> Config (validated)
//! ```

use std::path::PathBuf;

use super::Config;
use crate::error::{ConfigError, Result};

/// Builder for loading configuration from multiple sources.
pub struct ConfigLoader {
    builder: config::ConfigBuilder<config::builder::DefaultState>,
    env_prefix: Option<String>,
    files: Vec<(String, PathBuf)>,
}

impl ConfigLoader {
    #[must_use]
    pub fn new() -> Self {
        Self {
            builder: config::Config::builder(),
            env_prefix: None,
            files: Vec::new(),
        }
    }

    /// Adds a TOML configuration file to the loader.
    ///
    /// The file will be read when `build()` is called. If the file doesn't exist
    /// or contains invalid TOML, `build()` will return an error.
    #[must_use]
    pub fn add_toml_file<P: AsRef<std::path::Path>>(mut self, path: P) -> Self {
        use config::{File, FileFormat};
        let p = path.as_ref();
        self.builder = self
            .builder
            .add_source(File::from(p).format(FileFormat::Toml).required(true));
        self.files.push(("file".to_string(), p.to_path_buf()));
        self
    }

    #[must_use]
    pub fn add_toml_file_optional<P: AsRef<std::path::Path>>(mut self, path: P) -> Self {
        use config::{File, FileFormat};
        let p = path.as_ref();
        self.builder = self
            .builder
            .add_source(File::from(p).format(FileFormat::Toml).required(false));
        if p.exists() {
            self.files.push(("optional".to_string(), p.to_path_buf()));
        }
        self
    }

    #[must_use]
    pub fn add_toml_str(mut self, content: &str) -> Self {
        use config::{File, FileFormat};
        self.builder = self
            .builder
            .add_source(File::from_str(content, FileFormat::Toml));
        self.files
            .push(("string".to_string(), PathBuf::from("<string>")));
        self
    }

    /// Reads `<PREFIX>_<SECTION>__<KEY>` environment variables.
    ///
    /// Keys contain underscores themselves, so sections are split on a double
    /// underscore.
    #[must_use]
    pub fn with_env_prefix(mut self, prefix: &str) -> Self {
        self.env_prefix = Some(prefix.to_string());
        self
    }

    /// Sets a configuration override.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is invalid or if the value cannot be converted
    /// to a configuration value.
    pub fn set<T: Into<config::Value>>(mut self, key: &str, value: T) -> Result<Self> {
        self.builder = self
            .builder
            .set_override(key, value)
            .map_err(|e| anyhow::anyhow!("Config error: {e}"))?;
        Ok(self)
    }

    /// Sets an override only when a value is present.
    ///
    /// # Errors
    ///
    /// Same as [`ConfigLoader::set`].
    pub fn set_if_some(self, key: &str, value: Option<&str>) -> Result<Self> {
        match value {
            Some(v) => self.set(key, v),
            None => Ok(self),
        }
    }

    /// Applies `section/key=value` overrides, in order.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ParseError` for an override without `=` or
    /// without a `section/` part.
    pub fn apply_overrides(self, overrides: &[String]) -> Result<Self> {
        let mut loader = self;
        for entry in overrides {
            let (key, value) = parse_override(entry)?;
            loader = loader.set(&key, value)?;
        }
        Ok(loader)
    }

    /// Builds the configuration from all added sources.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Required configuration files are missing.
    /// - Configuration files have invalid TOML syntax.
    /// - The merged configuration cannot be deserialized into the `Config` struct.
    /// - The merged configuration fails [`Config::validate`].
    pub fn build(self) -> Result<Config> {
        let builder = match &self.env_prefix {
            Some(prefix) => self.builder.add_source(
                config::Environment::with_prefix(prefix)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            ),
            None => self.builder,
        };
        let cfg = builder.build()?;
        let config: Config = cfg.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    #[must_use]
    pub fn loaded_files(&self) -> Vec<(String, PathBuf)> {
        self.files.clone()
    }

    #[must_use]
    pub fn format_loaded_files(&self) -> Vec<String> {
        self.files
            .iter()
            .enumerate()
            .map(|(i, (source, path))| format!("{}. [{}] {}", i + 1, source, path.display()))
            .collect()
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

/// Split `section/key=value` into a dotted key and its value.
fn parse_override(entry: &str) -> std::result::Result<(String, String), ConfigError> {
    let bad = |message: &str| ConfigError::ParseError {
        path: "--set".to_string(),
        message: format!("{message}: '{entry}'"),
    };

    let (path, value) = entry
        .split_once('=')
        .ok_or_else(|| bad("expected section/key=value"))?;
    let (section, key) = path
        .split_once('/')
        .ok_or_else(|| bad("expected a section before '/'"))?;

    let (section, key) = (section.trim(), key.trim());
    if section.is_empty() || key.is_empty() {
        return Err(bad("empty section or key"));
    }

    Ok((format!("{section}.{key}"), value.to_string()))
}
