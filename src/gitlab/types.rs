// build-manifest: CI Checkout Manifest Generator
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! GitLab API records. Only the fields the resolver reads are kept.

use serde::{Deserialize, Serialize};

/// A project as returned by the project search endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteProject {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub path_with_namespace: String,
    /// Absent on some records; such a project belongs to no namespace.
    #[serde(default)]
    pub namespace: Option<Namespace>,
    #[serde(default)]
    pub default_branch: Option<String>,
}

/// Owning user or group of a project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Namespace {
    pub path: String,
    #[serde(default)]
    pub full_path: Option<String>,
}

impl RemoteProject {
    /// Whether the project lives directly under `namespace` (user login or group path).
    #[must_use]
    pub fn in_namespace(&self, namespace: &str) -> bool {
        self.namespace.as_ref().is_some_and(|owner| {
            owner
                .full_path
                .as_deref()
                .unwrap_or(&owner.path)
                .eq_ignore_ascii_case(namespace)
        })
    }
}

/// A branch as returned by the branch search endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Branch {
    pub name: String,
    pub commit: Commit,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Commit {
    pub id: String,
}

impl Branch {
    /// Commit the branch points at.
    #[must_use]
    pub fn commit_id(&self) -> &str {
        &self.commit.id
    }
}
