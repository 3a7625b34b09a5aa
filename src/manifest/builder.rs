// build-manifest: CI Checkout Manifest Generator
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Assembles a [`Manifest`] from the module list.

use tracing::debug;

use super::{Manifest, ManifestEntry, ManifestRemotes};
use crate::error::LookupError;
use crate::gitlab::ProjectHost;
use crate::resolve::{ResolvedRevision, Resolver};

/// The repository under test.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentProject {
    pub name: String,
    /// Commit id under test.
    pub revision: String,
    pub branch: String,
    pub namespace: String,
}

impl CurrentProject {
    /// The current module never goes through the resolver.
    fn resolved(&self) -> ResolvedRevision {
        ResolvedRevision::user(
            self.revision.clone(),
            format!("{}/{}", self.namespace, self.branch),
        )
    }
}

/// Resolves every module in order and collects the manifest entries.
pub struct ManifestBuilder<'a, H> {
    resolver: Resolver<'a, H>,
    modules: &'a [String],
    current: &'a CurrentProject,
    remotes: ManifestRemotes,
}

impl<'a, H: ProjectHost> ManifestBuilder<'a, H> {
    #[must_use]
    pub const fn new(
        resolver: Resolver<'a, H>,
        modules: &'a [String],
        current: &'a CurrentProject,
        remotes: ManifestRemotes,
    ) -> Self {
        Self {
            resolver,
            modules,
            current,
            remotes,
        }
    }

    /// Build the manifest, calling `progress` once per module as it is decided.
    ///
    /// Modules are resolved one after another; entries keep module-list order.
    ///
    /// # Errors
    ///
    /// Returns the first `LookupError` the resolver reports.
    pub async fn build_with_progress<F>(self, mut progress: F) -> Result<Manifest, LookupError>
    where
        F: FnMut(&str, &ResolvedRevision),
    {
        let branch = self.current.branch.as_str();
        let mut projects = Vec::with_capacity(self.modules.len());

        for module in self.modules {
            let resolved = if *module == self.current.name {
                debug!(module = %module, "current project, using commit under test");
                self.current.resolved()
            } else {
                self.resolver.resolve(module, branch).await?
            };

            progress(module, &resolved);
            projects.push(ManifestEntry::new(module.as_str(), &resolved));
        }

        Ok(Manifest {
            remotes: self.remotes,
            projects,
        })
    }

    /// Build the manifest without progress reporting.
    ///
    /// # Errors
    ///
    /// Returns the first `LookupError` the resolver reports.
    pub async fn build(self) -> Result<Manifest, LookupError> {
        self.build_with_progress(|_, _| {}).await
    }
}
