// Copyright (c) 2025 Nikolay Denev <ndenev@gmail.com>
// SPDX-License-Identifier: BSD-3-Clause

//! Action dispatch
//!
//! Both modes fetch a fresh inventory, select targets, then make one remote
//! call per target in selection order. The first failure ends the invocation.
//! Nothing is retried and nothing already applied is rolled back.

use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::{debug, info, warn};

use super::{
    ActionError, ActionIdentifier, ActionRecord, ManagedResource, Multiplicity, RemoteCall,
    ResourceKey, SelectorCriteria, select,
};
use crate::argocd::ApplicationService;
use crate::progress::ProgressHandle;

/// Resources an action was applied to, in the order they were processed
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub applied: Vec<ManagedResource>,
}

pub struct ActionDispatcher<S: ?Sized> {
    service: Arc<S>,
    progress: Option<ProgressHandle>,
}

impl<S: ApplicationService + ?Sized> ActionDispatcher<S> {
    pub fn new(service: Arc<S>) -> Self {
        Self {
            service,
            progress: None,
        }
    }

    /// Report each remote call to `progress`
    pub fn with_progress(mut self, progress: ProgressHandle) -> Self {
        self.progress = Some(progress);
        self
    }

    /// List the actions of every resource matching `criteria`
    ///
    /// Selection always runs with [`Multiplicity::Any`]. Results are keyed by
    /// (group, kind, name); a later resource with the same key replaces an
    /// earlier one. A failure for any resource discards the whole result.
    pub async fn list_actions(
        &self,
        app: &str,
        criteria: &SelectorCriteria,
    ) -> Result<BTreeMap<ResourceKey, Vec<ActionRecord>>, ActionError> {
        let criteria = criteria.clone().with_multiplicity(Multiplicity::Any);
        let targets = self.select_targets(app, &criteria).await?;

        let mut available = BTreeMap::new();
        for resource in &targets {
            let label = resource.to_string();
            if let Some(progress) = &self.progress {
                progress.listing(&label);
            }
            let actions = self
                .service
                .list_resource_actions(app, resource)
                .await
                .map_err(|source| ActionError::RemoteCallFailure {
                    call: RemoteCall::ListActions,
                    resource: Some(resource.clone()),
                    source,
                })?;
            debug!(
                app = %app,
                group = %resource.group,
                kind = %resource.kind,
                namespace = %resource.namespace,
                name = %resource.name,
                count = actions.len(),
                "Listed resource actions"
            );
            available.insert(resource.key(), actions);
        }

        Ok(available)
    }

    /// Run `action` against every resource it selects
    ///
    /// Group and kind come from the identifier; namespace, name and
    /// multiplicity from `criteria`. Under [`Multiplicity::Single`] nothing is
    /// invoked unless exactly one resource matches.
    ///
    /// Resources are processed one at a time. On failure, resources before the
    /// failing one keep the action applied and later ones are never attempted.
    pub async fn run_action(
        &self,
        app: &str,
        action: &ActionIdentifier,
        criteria: &SelectorCriteria,
    ) -> Result<RunSummary, ActionError> {
        let criteria = SelectorCriteria {
            group: Some(action.group.clone()),
            kind: Some(action.kind.clone()),
            namespace: criteria.namespace.clone(),
            name: criteria.name.clone(),
            multiplicity: criteria.multiplicity,
        };
        let targets = self.select_targets(app, &criteria).await?;

        let mut summary = RunSummary::default();
        for resource in targets {
            let label = resource.to_string();
            if let Some(progress) = &self.progress {
                progress.running(&action.action, &label);
            }
            if let Err(source) = self
                .service
                .run_resource_action(app, &resource, &action.action)
                .await
            {
                if !summary.applied.is_empty() {
                    warn!(
                        app = %app,
                        action = %action,
                        applied = summary.applied.len(),
                        "Action failed after being applied to earlier resources"
                    );
                }
                return Err(ActionError::RemoteCallFailure {
                    call: RemoteCall::RunAction,
                    resource: Some(resource),
                    source,
                });
            }
            info!(
                app = %app,
                action = %action,
                namespace = %resource.namespace,
                name = %resource.name,
                "Action applied"
            );
            if let Some(progress) = &self.progress {
                progress.applied(&label);
            }
            summary.applied.push(resource);
        }

        Ok(summary)
    }

    async fn select_targets(
        &self,
        app: &str,
        criteria: &SelectorCriteria,
    ) -> Result<Vec<ManagedResource>, ActionError> {
        if let Some(progress) = &self.progress {
            progress.fetching_resources(app);
        }
        let inventory = self.service.managed_resources(app).await.map_err(|source| {
            ActionError::RemoteCallFailure {
                call: RemoteCall::ManagedResources,
                resource: None,
                source,
            }
        })?;

        let targets = select(&inventory, criteria)?;
        debug!(
            app = %app,
            criteria = %criteria,
            inventory = inventory.len(),
            selected = targets.len(),
            "Selected target resources"
        );
        if let Some(progress) = &self.progress {
            progress.selected(targets.len());
        }
        Ok(targets)
    }
}
