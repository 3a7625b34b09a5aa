// build-manifest: CI Checkout Manifest Generator
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Search scopes and the endpoints they map to.
//!
//! ```text
//! UserProjects  { user, name }        GET users/:user/projects?search=name
//! GroupProjects { group, name }       GET groups/:group/projects?search=name
//! Branches      { project_id, name }  GET projects/:id/repository/branches?search=name
//! ```

use std::fmt;

/// One kind of search against the project host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchScope {
    /// Projects owned by a user account.
    UserProjects { user: String, name: String },
    /// Projects directly inside a group.
    GroupProjects { group: String, name: String },
    /// Branches of a project.
    Branches { project_id: u64, name: String },
}

impl SearchScope {
    #[must_use]
    pub fn user_projects(user: impl Into<String>, name: impl Into<String>) -> Self {
        Self::UserProjects {
            user: user.into(),
            name: name.into(),
        }
    }

    #[must_use]
    pub fn group_projects(group: impl Into<String>, name: impl Into<String>) -> Self {
        Self::GroupProjects {
            group: group.into(),
            name: name.into(),
        }
    }

    #[must_use]
    pub fn branches(project_id: u64, name: impl Into<String>) -> Self {
        Self::Branches {
            project_id,
            name: name.into(),
        }
    }

    /// Unencoded path segments relative to the API base.
    ///
    /// Segments are percent-encoded individually when joined onto the URL,
    /// so a group path containing `/` stays a single segment.
    #[must_use]
    pub fn path_segments(&self) -> Vec<String> {
        match self {
            Self::UserProjects { user, .. } => {
                vec!["users".into(), user.clone(), "projects".into()]
            }
            Self::GroupProjects { group, .. } => {
                vec!["groups".into(), group.clone(), "projects".into()]
            }
            Self::Branches { project_id, .. } => vec![
                "projects".into(),
                project_id.to_string(),
                "repository".into(),
                "branches".into(),
            ],
        }
    }

    /// The `search` query term.
    #[must_use]
    pub fn search_term(&self) -> &str {
        match self {
            Self::UserProjects { name, .. }
            | Self::GroupProjects { name, .. }
            | Self::Branches { name, .. } => name,
        }
    }
}

impl fmt::Display for SearchScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UserProjects { user, name } => {
                write!(f, "projects of user '{user}' matching '{name}'")
            }
            Self::GroupProjects { group, name } => {
                write!(f, "projects of group '{group}' matching '{name}'")
            }
            Self::Branches { project_id, name } => {
                write!(f, "branches of project {project_id} matching '{name}'")
            }
        }
    }
}
