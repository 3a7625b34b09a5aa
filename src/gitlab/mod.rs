// build-manifest: CI Checkout Manifest Generator
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Remote query client for the project host.
//!
//! ```text
//! ProjectHost (trait)
//!   search_projects(scope) --> SearchOutcome<RemoteProject>
//!   search_branches(scope) --> SearchOutcome<Branch>
//!        |
//!        +-- GitLabClient   reqwest, paginated (X-Next-Page)
//!        +-- test fakes     in-memory, records issued scopes
//!
//! SearchOutcome
//!   Found(records)          0..n records
//!   Truncated { records }   page cap hit, more records exist upstream
//!   TransportError(err)     request failed / non-2xx / bad JSON
//!        |
//!        v  into_records()  (truncation and transport errors logged)
//!   narrow_single() --> Ok(None) | Ok(Some(one)) | Err(Ambiguous)
//! ```
//!
//! # Key Types
//!
//! | Type            | Purpose                                  |
//! |-----------------|------------------------------------------|
//! | `SearchScope`   | Which endpoint and search term to use    |
//! | `SearchOutcome` | Records, or why there are none           |
//! | `GitLabClient`  | Authenticated HTTP implementation        |

pub mod client;
pub mod scope;
pub mod types;

#[cfg(test)]
pub(crate) mod fake;

use std::future::Future;

use tracing::warn;

use crate::error::{LookupError, NetworkError};

pub use client::GitLabClient;
pub use scope::SearchScope;
pub use types::{Branch, Commit, Namespace, RemoteProject};

/// Source of project and branch records.
///
/// The resolver only talks to this trait, so tests substitute an in-memory
/// host instead of a live GitLab.
pub trait ProjectHost {
    /// Run a `UserProjects` or `GroupProjects` search.
    fn search_projects(
        &self,
        scope: &SearchScope,
    ) -> impl Future<Output = SearchOutcome<RemoteProject>> + Send;

    /// Run a `Branches` search.
    fn search_branches(
        &self,
        scope: &SearchScope,
    ) -> impl Future<Output = SearchOutcome<Branch>> + Send;
}

/// Result of one search.
///
/// A failed request is kept distinct from an empty result so it can be
/// logged, even though the resolver falls back the same way for both.
#[derive(Debug)]
pub enum SearchOutcome<T> {
    /// The request succeeded; zero or more records.
    Found(Vec<T>),
    /// The first `pages` pages succeeded but the host reported more.
    ///
    /// A match or an ambiguity may sit on a page that was never fetched.
    Truncated { records: Vec<T>, pages: u32 },
    /// The request failed before producing records.
    TransportError(NetworkError),
}

impl<T> SearchOutcome<T> {
    /// Records fetched, nothing on transport failure.
    ///
    /// Truncation and transport failures are logged at `warn` with the scope.
    pub fn into_records(self, scope: &SearchScope) -> Vec<T> {
        match self {
            Self::Found(records) => records,
            Self::Truncated { records, pages } => {
                warn!(
                    %scope,
                    pages,
                    fetched = records.len(),
                    "search stopped at the page limit, results may be incomplete \
                     (raise gitlab.max_pages)"
                );
                records
            }
            Self::TransportError(error) => {
                warn!(%scope, %error, "query failed, treating as no match");
                Vec::new()
            }
        }
    }

    #[must_use]
    pub const fn is_transport_error(&self) -> bool {
        matches!(self, Self::TransportError(_))
    }

    #[must_use]
    pub const fn is_truncated(&self) -> bool {
        matches!(self, Self::Truncated { .. })
    }
}

/// Narrow a list expected to hold at most one record.
///
/// # Errors
///
/// Returns `LookupError::Ambiguous` when more than one record remains.
pub fn narrow_single<T>(mut records: Vec<T>, scope: &SearchScope) -> Result<Option<T>, LookupError> {
    match records.len() {
        0 => Ok(None),
        1 => Ok(records.pop()),
        count => Err(LookupError::Ambiguous {
            scope: scope.to_string(),
            count,
        }),
    }
}
