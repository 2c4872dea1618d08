// Copyright (c) 2025 Nikolay Denev <ndenev@gmail.com>
// SPDX-License-Identifier: BSD-3-Clause

use std::fmt;

use thiserror::Error;

use super::ManagedResource;
use crate::argocd::ApiError;

/// Which collaborator call failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoteCall {
    ManagedResources,
    ListActions,
    RunAction,
}

impl fmt::Display for RemoteCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            RemoteCall::ManagedResources => "fetching managed resources",
            RemoteCall::ListActions => "listing actions",
            RemoteCall::RunAction => "running action",
        })
    }
}

/// Errors raised while selecting resources and dispatching actions
///
/// Every variant is terminal for the current invocation.
#[derive(Debug, Error)]
pub enum ActionError {
    #[error("action name '{raw}' is malformed, expected <group>/<kind>/<action>")]
    MalformedActionIdentifier { raw: String },

    #[error("no matching resource found for {criteria}")]
    NoMatchingResource { criteria: String },

    #[error(
        "{count} resources match the selector: {}. Use a more specific selector or --all to target every match",
        .matches.join(", ")
    )]
    AmbiguousResourceSelection { count: usize, matches: Vec<String> },

    #[error("{call} failed{}", on_resource(.resource))]
    RemoteCallFailure {
        call: RemoteCall,
        resource: Option<ManagedResource>,
        #[source]
        source: ApiError,
    },
}

impl ActionError {
    /// The resource a remote failure was raised for, if any
    pub fn failed_resource(&self) -> Option<&ManagedResource> {
        match self {
            ActionError::RemoteCallFailure { resource, .. } => resource.as_ref(),
            _ => None,
        }
    }
}

fn on_resource(resource: &Option<ManagedResource>) -> String {
    resource
        .as_ref()
        .map(|r| format!(" for {}", r))
        .unwrap_or_default()
}
