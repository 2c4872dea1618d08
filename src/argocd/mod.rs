// Copyright (c) 2025 Nikolay Denev <ndenev@gmail.com>
// SPDX-License-Identifier: BSD-3-Clause

//! Argo CD application service
//!
//! The dispatcher talks to the managing service only through
//! [`ApplicationService`]. [`ArgoCdClient`] is the REST implementation.

mod client;
mod live;

pub use client::{ArgoCdClient, ClientOptions};

use async_trait::async_trait;
use thiserror::Error;

use crate::actions::{ActionRecord, ManagedResource};

/// Transport-level failures from the Argo CD API
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Http(#[from] reqwest::Error),

    #[error("server returned {status}: {message}")]
    Status { status: u16, message: String },

    #[error("failed to decode response")]
    Decode(#[from] serde_json::Error),

    #[error("failed to decode live state of {kind} {name}: {reason}")]
    LiveState {
        kind: String,
        name: String,
        reason: String,
    },

    #[error("invalid server URL '{url}'")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
}

/// The three calls the action dispatcher needs from the managing service
#[async_trait]
pub trait ApplicationService: Send + Sync {
    /// Live resources managed by `app`, in server order
    async fn managed_resources(&self, app: &str) -> Result<Vec<ManagedResource>, ApiError>;

    /// Actions `resource` currently supports
    async fn list_resource_actions(
        &self,
        app: &str,
        resource: &ManagedResource,
    ) -> Result<Vec<ActionRecord>, ApiError>;

    /// Run `action` against `resource`
    async fn run_resource_action(
        &self,
        app: &str,
        resource: &ManagedResource,
        action: &str,
    ) -> Result<(), ApiError>;
}
