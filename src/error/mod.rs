// build-manifest: CI Checkout Manifest Generator
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Error handling module.
//!
//! ```text
//!            ManifestError (16 bytes)
//!                     |
//!      +--------+------+------+--------+
//!      v        v      v      v        v
//!   Config  Network  Lookup  Format    Fs
//!    Box      Box     Box     Box      Box
//!
//! Sub-errors (unboxed internally):
//!   Config  ParseError, MissingKey, InvalidValue
//!   Network Reqwest, HttpError, InvalidUrl, Decode
//!   Lookup  Ambiguous (more than one record for a unique name)
//!   Format  Xml, MissingAttribute, UnknownRemote, MissingRemote
//!   Fs      IoError, Persist
//! ```
//!
//! Transport failures never reach the top level on their own: the resolver
//! absorbs them into its fallback chain. Only configuration errors and
//! ambiguous lookups abort a run.

use thiserror::Error;

/// Convenience alias for `anyhow::Result`.
pub type Result<T> = anyhow::Result<T>;

/// Result type using [`ManifestError`].
pub type ManifestResult<T> = std::result::Result<T, ManifestError>;

/// Top-level application error type.
///
/// All sub-errors are boxed to keep this enum pointer-sized plus tag on the stack.
#[derive(Debug, Error)]
pub enum ManifestError {
    /// Configuration error.
    #[error("config error: {0}")]
    Config(#[from] Box<ConfigError>),

    /// Network operation failed.
    #[error("network error: {0}")]
    Network(#[from] Box<NetworkError>),

    /// A search expected to identify at most one record returned several.
    #[error("lookup error: {0}")]
    Lookup(#[from] Box<LookupError>),

    /// A manifest document could not be read back.
    #[error("manifest format error: {0}")]
    Format(#[from] Box<FormatError>),

    /// Filesystem error.
    #[error("filesystem error: {0}")]
    Fs(#[from] Box<FsError>),
}

/// Macro to generate `From` implementations that box the source error.
macro_rules! impl_from_boxed {
    ($($error:ty => $variant:ident),+ $(,)?) => {
        $(
            impl From<$error> for ManifestError {
                fn from(err: $error) -> Self {
                    ManifestError::$variant(Box::new(err))
                }
            }
        )+
    };
}

impl_from_boxed! {
    ConfigError => Config,
    NetworkError => Network,
    LookupError => Lookup,
    FormatError => Format,
    FsError => Fs,
}

// --- Config Errors ---

/// Configuration-related errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to parse configuration.
    #[error("failed to parse config '{path}': {message}")]
    ParseError { path: String, message: String },

    /// Missing required configuration key.
    #[error("missing required config key '{key}' in section '[{section}]'")]
    MissingKey { section: String, key: String },

    /// Invalid configuration value.
    #[error("invalid value for '{key}' in section '[{section}]': {message}")]
    InvalidValue {
        section: String,
        key: String,
        message: String,
    },
}

impl ConfigError {
    pub(crate) fn missing(section: &str, key: &str) -> Self {
        Self::MissingKey {
            section: section.to_string(),
            key: key.to_string(),
        }
    }

    pub(crate) fn invalid(section: &str, key: &str, message: impl Into<String>) -> Self {
        Self::InvalidValue {
            section: section.to_string(),
            key: key.to_string(),
            message: message.into(),
        }
    }
}

// --- Network Errors ---

/// Remote query errors.
///
/// These are carried inside [`crate::gitlab::SearchOutcome::TransportError`]
/// so callers can tell a failed request from an empty result, even though
/// the resolver treats both the same way.
#[derive(Debug, Error)]
pub enum NetworkError {
    /// HTTP error response.
    #[error("http error {status}: {url}")]
    HttpError { status: u16, url: String },

    /// Error from reqwest library.
    #[error("reqwest error: {0}")]
    Reqwest(#[from] reqwest::Error),

    /// Invalid URL.
    #[error("invalid url: {0}")]
    InvalidUrl(String),

    /// Response body was not the expected JSON shape.
    #[error("failed to decode response from {url}: {message}")]
    Decode { url: String, message: String },
}

// --- Lookup Errors ---

/// Single-record narrowing errors.
#[derive(Debug, Error)]
pub enum LookupError {
    /// More than one record matched a name assumed to be unique.
    #[error("ambiguous lookup for {scope}: expected at most one match, found {count}")]
    Ambiguous { scope: String, count: usize },
}

// --- Manifest Format Errors ---

/// Errors reading a rendered manifest back.
#[derive(Debug, Error)]
pub enum FormatError {
    /// The document is not well-formed XML.
    #[error("malformed xml: {0}")]
    Xml(String),

    /// An element lacks a required attribute.
    #[error("<{element}> is missing attribute '{attribute}'")]
    MissingAttribute { element: String, attribute: String },

    /// A project refers to a remote other than user/upstream/origin.
    #[error("unknown remote '{0}'")]
    UnknownRemote(String),

    /// One of the three remotes is not declared.
    #[error("remote '{0}' is not declared")]
    MissingRemote(String),
}

// --- Filesystem Errors ---

/// Filesystem operation errors.
#[derive(Debug, Error)]
pub enum FsError {
    /// General I/O error.
    #[error("I/O error on '{path}': {source}")]
    IoError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Failed to move a finished temporary file into place.
    #[error("failed to persist '{path}': {source}")]
    Persist {
        path: String,
        #[source]
        source: std::io::Error,
    },
}
