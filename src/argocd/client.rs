// Copyright (c) 2025 Nikolay Denev <ndenev@gmail.com>
// SPDX-License-Identifier: BSD-3-Clause

//! REST client for the Argo CD API server

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;
use url::Url;

use super::live::ManagedResourcesResponse;
use super::{ApiError, ApplicationService};
use crate::actions::{ActionRecord, ManagedResource};

/// Timeout for connecting to the API server
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Timeout for a whole request/response exchange
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

const USER_AGENT: &str = concat!("argocd-actions/", env!("CARGO_PKG_VERSION"));

/// Connection settings for [`ArgoCdClient`]
#[derive(Debug, Default)]
pub struct ClientOptions {
    /// `host[:port]`, or a full URL including the scheme
    pub server: String,
    pub auth_token: Option<SecretString>,
    /// Skip TLS certificate verification
    pub insecure: bool,
    /// Use plain HTTP when `server` carries no scheme
    pub plaintext: bool,
    /// Path prefix when the API server is served under a sub-path
    pub root_path: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ResourceActionsResponse {
    #[serde(default)]
    actions: Vec<ResourceAction>,
}

/// Older servers report `available`, newer ones `disabled`
#[derive(Debug, Deserialize)]
struct ResourceAction {
    name: String,
    #[serde(default)]
    available: Option<bool>,
    #[serde(default)]
    disabled: Option<bool>,
}

impl From<ResourceAction> for ActionRecord {
    fn from(action: ResourceAction) -> Self {
        let available = action
            .available
            .unwrap_or_else(|| !action.disabled.unwrap_or(false));
        ActionRecord::new(action.name, available)
    }
}

pub struct ArgoCdClient {
    http: Client,
    base: Url,
    auth_token: Option<SecretString>,
}

impl ArgoCdClient {
    pub fn new(options: ClientOptions) -> Result<Self, ApiError> {
        let base = base_url(&options)?;
        let http = Client::builder()
            .user_agent(USER_AGENT)
            .connect_timeout(CONNECT_TIMEOUT)
            .timeout(REQUEST_TIMEOUT)
            .danger_accept_invalid_certs(options.insecure)
            .build()?;

        debug!(base = %base, insecure = options.insecure, "Created Argo CD client");

        Ok(Self {
            http,
            base,
            auth_token: options.auth_token,
        })
    }

    /// `{base}/api/v1/applications/{app}/{tail...}`
    fn endpoint(&self, app: &str, tail: &[&str]) -> Url {
        let mut url = self.base.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments
                .pop_if_empty()
                .extend(["api", "v1", "applications", app])
                .extend(tail);
        }
        url
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.auth_token {
            Some(token) => request.bearer_auth(token.expose_secret()),
            None => request,
        }
    }

    fn resource_query(resource: &ManagedResource) -> [(&'static str, &str); 4] {
        [
            ("namespace", resource.namespace.as_str()),
            ("resourceName", resource.name.as_str()),
            ("group", resource.group.as_str()),
            ("kind", resource.kind.as_str()),
        ]
    }
}

#[async_trait]
impl ApplicationService for ArgoCdClient {
    async fn managed_resources(&self, app: &str) -> Result<Vec<ManagedResource>, ApiError> {
        let url = self.endpoint(app, &["managed-resources"]);
        debug!(url = %url, "GET managed resources");

        let response = self.authorized(self.http.get(url)).send().await?;
        let body: ManagedResourcesResponse = decode(check_status(response).await?).await?;
        body.into_live_resources()
    }

    async fn list_resource_actions(
        &self,
        app: &str,
        resource: &ManagedResource,
    ) -> Result<Vec<ActionRecord>, ApiError> {
        let url = self.endpoint(app, &["resource", "actions"]);
        debug!(url = %url, resource = %resource, "GET resource actions");

        let request = self
            .http
            .get(url)
            .query(&Self::resource_query(resource));
        let response = self.authorized(request).send().await?;
        let body: ResourceActionsResponse = decode(check_status(response).await?).await?;
        Ok(body.actions.into_iter().map(ActionRecord::from).collect())
    }

    async fn run_resource_action(
        &self,
        app: &str,
        resource: &ManagedResource,
        action: &str,
    ) -> Result<(), ApiError> {
        let url = self.endpoint(app, &["resource", "actions"]);
        debug!(url = %url, resource = %resource, action = %action, "POST resource action");

        let request = self
            .http
            .post(url)
            .query(&Self::resource_query(resource))
            .json(action);
        let response = self.authorized(request).send().await?;
        check_status(response).await?;
        Ok(())
    }
}

fn base_url(options: &ClientOptions) -> Result<Url, ApiError> {
    let server = options.server.trim().trim_end_matches('/');
    let raw = if server.contains("://") {
        server.to_string()
    } else if options.plaintext {
        format!("http://{}", server)
    } else {
        format!("https://{}", server)
    };

    let invalid = |source| ApiError::InvalidUrl {
        url: raw.clone(),
        source,
    };
    let mut url = Url::parse(&raw).map_err(invalid)?;
    if url.cannot_be_a_base() || url.host_str().is_none() {
        return Err(invalid(url::ParseError::EmptyHost));
    }

    if let Some(root) = options.root_path.as_deref()
        && let Ok(mut segments) = url.path_segments_mut()
    {
        segments
            .pop_if_empty()
            .extend(root.split('/').filter(|s| !s.is_empty()));
    }
    Ok(url)
}

async fn check_status(response: Response) -> Result<Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(ApiError::Status {
        status: status.as_u16(),
        message: error_message(&body),
    })
}

/// Argo CD reports errors as `{"error": ..., "message": ...}`
fn error_message(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| {
            v.get("message")
                .or_else(|| v.get("error"))
                .and_then(Value::as_str)
                .map(String::from)
        })
        .unwrap_or_else(|| body.trim().to_string())
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    let bytes = response.bytes().await?;
    Ok(serde_json::from_slice(&bytes)?)
}
