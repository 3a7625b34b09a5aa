// build-manifest: CI Checkout Manifest Generator
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Checkout manifest model, rendering and parsing.
//!
//! ```text
//! <?xml version="1.0" encoding="UTF-8"?>
//! <manifest>
//!   <remote fetch="<user base>" name="user"/>
//!   <remote fetch="<upstream>" name="upstream"/>
//!   <remote fetch="<origin>" name="origin"/>
//!   <project name="<module>" remote="<tag>" revision="<sha|default>" />
//!   ...                      one per module, module-list order
//! </manifest>
//! ```
//!
//! # Key Types
//!
//! | Type              | Purpose                                   |
//! |-------------------|-------------------------------------------|
//! | `Manifest`        | Remotes plus ordered project entries      |
//! | `ManifestBuilder` | Resolves every module into a `Manifest`   |
//! | `CurrentProject`  | The repository under test                 |

pub mod builder;


use std::io::Write;
use std::path::Path;

use quick_xml::Reader;
use quick_xml::escape::escape;
use quick_xml::events::{BytesStart, Event};
use reqwest::Url;

use crate::error::{FormatError, FsError, ManifestResult, NetworkError};
use crate::resolve::{RemoteTag, ResolvedRevision};

pub use builder::{CurrentProject, ManifestBuilder};

/// Fetch bases of the three remotes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestRemotes {
    pub user: String,
    pub upstream: String,
    pub origin: String,
}

impl ManifestRemotes {
    #[must_use]
    pub fn fetch(&self, tag: RemoteTag) -> &str {
        match tag {
            RemoteTag::User => &self.user,
            RemoteTag::Upstream => &self.upstream,
            RemoteTag::Origin => &self.origin,
        }
    }
}

/// One `<project>` line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestEntry {
    pub name: String,
    pub remote: RemoteTag,
    pub revision: String,
}

impl ManifestEntry {
    #[must_use]
    pub fn new(name: impl Into<String>, resolved: &ResolvedRevision) -> Self {
        Self {
            name: name.into(),
            remote: resolved.remote(),
            revision: resolved.revision().as_str().to_string(),
        }
    }
}

/// The complete checkout manifest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Manifest {
    pub remotes: ManifestRemotes,
    pub projects: Vec<ManifestEntry>,
}

impl Manifest {
    /// Render the manifest document, ending with a newline.
    #[must_use]
    pub fn render(&self) -> String {
        let mut out = String::from("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<manifest>\n");

        for tag in RemoteTag::ALL {
            out.push_str(&format!(
                "  <remote fetch=\"{}\" name=\"{}\"/>\n",
                escape(self.remotes.fetch(tag)),
                tag
            ));
        }

        for entry in &self.projects {
            out.push_str(&format!(
                "  <project name=\"{}\" remote=\"{}\" revision=\"{}\" />\n",
                escape(entry.name.as_str()),
                entry.remote,
                escape(entry.revision.as_str())
            ));
        }

        out.push_str("</manifest>\n");
        out
    }

    /// Parse a document produced by [`Manifest::render`].
    ///
    /// # Errors
    ///
    /// Returns a `FormatError` if the XML is malformed, an element lacks a
    /// required attribute, a project names an unknown remote, or one of the
    /// three remotes is missing.
    pub fn parse(xml: &str) -> ManifestResult<Self> {
        let mut reader = Reader::from_str(xml);
        reader.config_mut().trim_text(true);

        let mut user = None;
        let mut upstream = None;
        let mut origin = None;
        let mut projects = Vec::new();

        loop {
            match reader.read_event() {
                Ok(Event::Empty(ref e) | Event::Start(ref e)) => match e.name().as_ref() {
                    b"remote" => {
                        let name = require_attr(e, "remote", "name")?;
                        let fetch = require_attr(e, "remote", "fetch")?;
                        match parse_tag(&name)? {
                            RemoteTag::User => user = Some(fetch),
                            RemoteTag::Upstream => upstream = Some(fetch),
                            RemoteTag::Origin => origin = Some(fetch),
                        }
                    }
                    b"project" => projects.push(ManifestEntry {
                        name: require_attr(e, "project", "name")?,
                        remote: parse_tag(&require_attr(e, "project", "remote")?)?,
                        revision: require_attr(e, "project", "revision")?,
                    }),
                    _ => {}
                },
                Ok(Event::Eof) => break,
                Err(e) => return Err(FormatError::Xml(e.to_string()).into()),
                _ => {}
            }
        }

        let missing = |tag: RemoteTag| FormatError::MissingRemote(tag.to_string());
        Ok(Self {
            remotes: ManifestRemotes {
                user: user.ok_or_else(|| missing(RemoteTag::User))?,
                upstream: upstream.ok_or_else(|| missing(RemoteTag::Upstream))?,
                origin: origin.ok_or_else(|| missing(RemoteTag::Origin))?,
            },
            projects,
        })
    }

    /// Write the rendered manifest to `path`.
    ///
    /// The document goes to a temporary file in the same directory first and
    /// is renamed into place, so `path` is either untouched or complete.
    ///
    /// # Errors
    ///
    /// Returns `FsError` if the temporary file can't be created or written,
    /// or the rename fails.
    pub fn write_atomic(&self, path: &Path) -> ManifestResult<()> {
        let rendered = self.render();
        let dir = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));

        let io_error = |source| FsError::IoError {
            path: dir.display().to_string(),
            source,
        };

        let mut file = tempfile::NamedTempFile::new_in(dir).map_err(io_error)?;
        file.write_all(rendered.as_bytes()).map_err(io_error)?;
        file.flush().map_err(io_error)?;

        file.persist(path).map_err(|e| FsError::Persist {
            path: path.display().to_string(),
            source: e.error,
        })?;
        Ok(())
    }
}

fn parse_tag(value: &str) -> Result<RemoteTag, FormatError> {
    value
        .parse()
        .map_err(|_| FormatError::UnknownRemote(value.to_string()))
}

fn require_attr(e: &BytesStart, element: &str, name: &str) -> Result<String, FormatError> {
    for attr in e.attributes() {
        let attr = attr.map_err(|err| FormatError::Xml(err.to_string()))?;
        if attr.key.as_ref() == name.as_bytes() {
            let value = attr
                .unescape_value()
                .map_err(|err| FormatError::Xml(err.to_string()))?;
            return Ok(value.into_owned());
        }
    }
    Err(FormatError::MissingAttribute {
        element: element.to_string(),
        attribute: name.to_string(),
    })
}

/// Fetch base for the `user` remote: the project URL minus its last path
/// segment, always ending in exactly one `/`.
///
/// `https://gitlab.example.com/alice/gst-plugins-good` becomes
/// `https://gitlab.example.com/alice/`.
///
/// # Errors
///
/// Returns `NetworkError::InvalidUrl` if `project_url` doesn't parse.
pub fn user_fetch_base(project_url: &str) -> Result<String, NetworkError> {
    let mut url = Url::parse(project_url)
        .map_err(|e| NetworkError::InvalidUrl(format!("{project_url}: {e}")))?;

    let mut segments: Vec<String> = url
        .path_segments()
        .map(|s| s.filter(|s| !s.is_empty()).map(String::from).collect())
        .unwrap_or_default();
    segments.pop();

    let path = if segments.is_empty() {
        "/".to_string()
    } else {
        format!("/{}/", segments.join("/"))
    };
    url.set_path(&path);
    url.set_query(None);
    url.set_fragment(None);
    let _ = url.set_username("");
    let _ = url.set_password(None);

    Ok(url.to_string())
}
