// build-manifest: CI Checkout Manifest Generator
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Per-module revision resolution.
//!
//! ```text
//! resolve(module, branch)
//!   1. user fork    users/<login>/projects ? module
//!        branch == <branch>         --> (user, sha)
//!   2. upstream     groups/<group>/projects ? module
//!        branch == <branch>         --> (upstream, sha)
//!        branch == <default>        --> (upstream, sha)
//!   3. otherwise                    --> (origin, <default>)
//! ```
//!
//! A user fork without the requested branch falls through to upstream; the
//! fork's own default branch is never used unless it is the branch being
//! built.


use std::fmt;

use tracing::{debug, info};

use crate::config::types::SuiteConfig;
use crate::error::LookupError;
use crate::gitlab::{Branch, ProjectHost, RemoteProject, SearchScope, narrow_single};

/// Which manifest remote a project is fetched from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RemoteTag {
    /// The requesting user's fork.
    User,
    /// The canonical upstream group.
    Upstream,
    /// The public mirror, always at the default branch.
    Origin,
}

impl RemoteTag {
    /// All tags, in the order remotes appear in the manifest.
    pub const ALL: [Self; 3] = [Self::User, Self::Upstream, Self::Origin];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Upstream => "upstream",
            Self::Origin => "origin",
        }
    }
}

impl fmt::Display for RemoteTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for RemoteTag {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(Self::User),
            "upstream" => Ok(Self::Upstream),
            "origin" => Ok(Self::Origin),
            _ => Err(format!("unknown remote '{s}'")),
        }
    }
}

/// What gets checked out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Revision {
    /// A concrete commit id taken from a real branch.
    Commit(String),
    /// The literal default branch name, left for the checkout tool to resolve.
    DefaultBranch(String),
}

impl Revision {
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Commit(id) | Self::DefaultBranch(id) => id,
        }
    }
}

impl fmt::Display for Revision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of resolving one module.
///
/// Only constructible through [`ResolvedRevision::user`],
/// [`ResolvedRevision::upstream`] and [`ResolvedRevision::origin`]: `user` and
/// `upstream` always carry a commit, `origin` always the default branch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedRevision {
    remote: RemoteTag,
    revision: Revision,
    via: String,
}

impl ResolvedRevision {
    /// A commit from the user's fork. `via` is the `namespace/branch` it came from.
    #[must_use]
    pub fn user(commit: impl Into<String>, via: impl Into<String>) -> Self {
        Self {
            remote: RemoteTag::User,
            revision: Revision::Commit(commit.into()),
            via: via.into(),
        }
    }

    /// A commit from the upstream group.
    #[must_use]
    pub fn upstream(commit: impl Into<String>, via: impl Into<String>) -> Self {
        Self {
            remote: RemoteTag::Upstream,
            revision: Revision::Commit(commit.into()),
            via: via.into(),
        }
    }

    /// The public mirror's default branch.
    #[must_use]
    pub fn origin(default_branch: &str) -> Self {
        Self {
            remote: RemoteTag::Origin,
            revision: Revision::DefaultBranch(default_branch.to_string()),
            via: format!("origin/{default_branch}"),
        }
    }

    #[must_use]
    pub const fn remote(&self) -> RemoteTag {
        self.remote
    }

    #[must_use]
    pub const fn revision(&self) -> &Revision {
        &self.revision
    }

    /// Human-readable `namespace/branch` the revision was taken from.
    #[must_use]
    pub fn via(&self) -> &str {
        &self.via
    }
}

/// Inputs to the fallback chain that don't change between modules.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolverSettings {
    pub user_login: String,
    pub upstream_group: String,
    pub default_branch: String,
}

impl ResolverSettings {
    #[must_use]
    pub fn from_suite(suite: &SuiteConfig, user_login: &str) -> Self {
        Self {
            user_login: user_login.to_string(),
            upstream_group: suite.upstream_group.clone(),
            default_branch: suite.default_branch.clone(),
        }
    }
}

/// Applies the user -> upstream -> origin fallback chain for one module.
pub struct Resolver<'a, H> {
    host: &'a H,
    settings: &'a ResolverSettings,
}

impl<'a, H: ProjectHost> Resolver<'a, H> {
    #[must_use]
    pub const fn new(host: &'a H, settings: &'a ResolverSettings) -> Self {
        Self { host, settings }
    }

    /// Resolve `module` for `branch`.
    ///
    /// Failed queries count as "not found". No branch anywhere is not an
    /// error either: it yields `(origin, <default branch>)`.
    ///
    /// # Errors
    ///
    /// Returns `LookupError::Ambiguous` if a search that should identify one
    /// project or branch by exact name returns several.
    pub async fn resolve(
        &self,
        module: &str,
        branch: &str,
    ) -> Result<ResolvedRevision, LookupError> {
        let settings = self.settings;

        let user = &settings.user_login;
        let scope = SearchScope::user_projects(user, module);
        if let Some(fork) = self.find_project(&scope, module, user).await? {
            if let Some(found) = self.find_branch(&fork, branch).await? {
                let resolved =
                    ResolvedRevision::user(found.commit_id(), format!("{user}/{branch}"));
                log_resolved(module, &resolved);
                return Ok(resolved);
            }
            debug!(module, user = %user, branch, "fork lacks branch, trying upstream");
        }

        let group = &settings.upstream_group;
        let scope = SearchScope::group_projects(group, module);
        if let Some(project) = self.find_project(&scope, module, group).await? {
            let mut candidates = vec![branch];
            if branch != settings.default_branch {
                candidates.push(settings.default_branch.as_str());
            }

            for candidate in candidates {
                if let Some(found) = self.find_branch(&project, candidate).await? {
                    let via = format!("{group}/{candidate}");
                    let resolved = ResolvedRevision::upstream(found.commit_id(), via);
                    log_resolved(module, &resolved);
                    return Ok(resolved);
                }
            }
            debug!(module, group = %group, "upstream has neither branch");
        }

        let resolved = ResolvedRevision::origin(&settings.default_branch);
        log_resolved(module, &resolved);
        Ok(resolved)
    }

    /// Exact-name project match inside `namespace`.
    async fn find_project(
        &self,
        scope: &SearchScope,
        module: &str,
        namespace: &str,
    ) -> Result<Option<RemoteProject>, LookupError> {
        let matches = self
            .host
            .search_projects(scope)
            .await
            .into_records(scope)
            .into_iter()
            .filter(|p| p.name == module && p.in_namespace(namespace))
            .collect();
        narrow_single(matches, scope)
    }

    /// Exact-name branch match inside `project`.
    async fn find_branch(
        &self,
        project: &RemoteProject,
        branch: &str,
    ) -> Result<Option<Branch>, LookupError> {
        let scope = SearchScope::branches(project.id, branch);
        let matches = self
            .host
            .search_branches(&scope)
            .await
            .into_records(&scope)
            .into_iter()
            .filter(|b| b.name == branch)
            .collect();
        narrow_single(matches, &scope)
    }
}

fn log_resolved(module: &str, resolved: &ResolvedRevision) {
    info!(
        module,
        remote = %resolved.remote(),
        via = resolved.via(),
        revision = %resolved.revision(),
        "resolved"
    );
}
