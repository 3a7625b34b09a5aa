// build-manifest: CI Checkout Manifest Generator
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! In-memory [`ProjectHost`] for resolver and builder tests.
//!
//! Searches match by substring like GitLab's `search` parameter, so exact-name
//! filtering in callers is exercised. Every issued scope is recorded.

use std::collections::HashMap;
use std::sync::Mutex;

use super::{Branch, Commit, Namespace, ProjectHost, RemoteProject, SearchOutcome, SearchScope};
use crate::error::NetworkError;

#[derive(Default)]
pub(crate) struct FakeHost {
    projects: Vec<RemoteProject>,
    branches: HashMap<u64, Vec<Branch>>,
    fail_all: bool,
    queries: Mutex<Vec<SearchScope>>,
}

impl FakeHost {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with_project(mut self, id: u64, namespace: &str, name: &str) -> Self {
        self.projects.push(RemoteProject {
            id,
            name: name.to_string(),
            path_with_namespace: format!("{namespace}/{name}"),
            namespace: Some(Namespace {
                path: namespace.to_string(),
                full_path: Some(namespace.to_string()),
            }),
            default_branch: Some("master".to_string()),
        });
        self
    }

    pub(crate) fn with_branch(mut self, project_id: u64, name: &str, commit: &str) -> Self {
        self.branches.entry(project_id).or_default().push(Branch {
            name: name.to_string(),
            commit: Commit {
                id: commit.to_string(),
            },
        });
        self
    }

    /// Every search fails as if the API returned 500.
    pub(crate) fn failing(mut self) -> Self {
        self.fail_all = true;
        self
    }

    pub(crate) fn queries(&self) -> Vec<SearchScope> {
        self.queries
            .lock()
            .map(|q| q.clone())
            .unwrap_or_default()
    }

    fn record(&self, scope: &SearchScope) {
        if let Ok(mut queries) = self.queries.lock() {
            queries.push(scope.clone());
        }
    }

    fn failure(scope: &SearchScope) -> NetworkError {
        NetworkError::HttpError {
            status: 500,
            url: scope.to_string(),
        }
    }
}

impl ProjectHost for FakeHost {
    async fn search_projects(&self, scope: &SearchScope) -> SearchOutcome<RemoteProject> {
        self.record(scope);
        if self.fail_all {
            return SearchOutcome::TransportError(Self::failure(scope));
        }

        let namespace = match scope {
            SearchScope::UserProjects { user, .. } => user,
            SearchScope::GroupProjects { group, .. } => group,
            SearchScope::Branches { .. } => return SearchOutcome::Found(Vec::new()),
        };
        let term = scope.search_term();

        SearchOutcome::Found(
            self.projects
                .iter()
                .filter(|p| p.namespace.as_ref().is_some_and(|ns| ns.path == *namespace) && p.name.contains(term))
                .cloned()
                .collect(),
        )
    }

    async fn search_branches(&self, scope: &SearchScope) -> SearchOutcome<Branch> {
        self.record(scope);
        if self.fail_all {
            return SearchOutcome::TransportError(Self::failure(scope));
        }

        let SearchScope::Branches { project_id, name } = scope else {
            return SearchOutcome::Found(Vec::new());
        };

        SearchOutcome::Found(
            self.branches
                .get(project_id)
                .map(|branches| {
                    branches
                        .iter()
                        .filter(|b| b.name.contains(name.as_str()))
                        .cloned()
                        .collect()
                })
                .unwrap_or_default(),
        )
    }
}
