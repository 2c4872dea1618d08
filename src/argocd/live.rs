// Copyright (c) 2025 Nikolay Denev <ndenev@gmail.com>
// SPDX-License-Identifier: BSD-3-Clause

//! Decoding of managed-resource live state
//!
//! The managed-resources endpoint returns one `ResourceDiff` per resource the
//! application tracks. The live object is embedded as a JSON string and is
//! `"null"` when the resource does not currently exist in the cluster.

use kube::core::{DynamicObject, GroupVersion, ResourceExt};
use serde::Deserialize;

use super::ApiError;
use crate::actions::ManagedResource;

#[derive(Debug, Deserialize)]
pub(super) struct ManagedResourcesResponse {
    #[serde(default)]
    pub items: Vec<ResourceDiff>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct ResourceDiff {
    #[serde(default)]
    pub kind: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub live_state: Option<String>,
}

impl ResourceDiff {
    /// The live object as a managed resource, or `None` if it is not live
    ///
    /// Group and kind come from the live object's `apiVersion` and `kind`,
    /// namespace and name from its metadata.
    pub fn live_resource(&self) -> Result<Option<ManagedResource>, ApiError> {
        let raw = match self.live_state.as_deref().map(str::trim) {
            None | Some("") | Some("null") => return Ok(None),
            Some(raw) => raw,
        };

        let obj: DynamicObject =
            serde_json::from_str(raw).map_err(|e| self.live_state_error(e.to_string()))?;
        let types = obj
            .types
            .as_ref()
            .ok_or_else(|| self.live_state_error("missing apiVersion/kind".to_string()))?;
        let gvk = types
            .api_version
            .parse::<GroupVersion>()
            .map_err(|e| self.live_state_error(e.to_string()))?
            .with_kind(&types.kind);

        Ok(Some(ManagedResource::new(
            gvk.group,
            gvk.kind,
            obj.namespace().unwrap_or_default(),
            obj.name_any(),
        )))
    }

    fn live_state_error(&self, reason: String) -> ApiError {
        ApiError::LiveState {
            kind: self.kind.clone(),
            name: self.name.clone(),
            reason,
        }
    }
}

impl ManagedResourcesResponse {
    /// Live resources in server order, skipping those without live state
    pub fn into_live_resources(self) -> Result<Vec<ManagedResource>, ApiError> {
        let mut resources = Vec::with_capacity(self.items.len());
        for item in &self.items {
            if let Some(resource) = item.live_resource()? {
                resources.push(resource);
            }
        }
        Ok(resources)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn diff(live: serde_json::Value) -> ResourceDiff {
        ResourceDiff {
            kind: "Deployment".to_string(),
            name: "web".to_string(),
            live_state: Some(live.to_string()),
        }
    }

    #[test]
    fn test_namespaced_resource() {
        let item = diff(json!({
            "apiVersion": "apps/v1",
            "kind": "Deployment",
            "metadata": {"name": "web", "namespace": "default"},
            "spec": {"replicas": 2}
        }));
        assert_eq!(
            item.live_resource().unwrap(),
            Some(ManagedResource::new("apps", "Deployment", "default", "web"))
        );
    }

    #[test]
    fn test_core_group_cluster_scoped() {
        let item = diff(json!({
            "apiVersion": "v1",
            "kind": "Namespace",
            "metadata": {"name": "prod"}
        }));
        assert_eq!(
            item.live_resource().unwrap(),
            Some(ManagedResource::new("", "Namespace", "", "prod"))
        );
    }

    #[test]
    fn test_missing_live_state_is_skipped() {
        for live in [None, Some("null".to_string()), Some(String::new())] {
            let item = ResourceDiff {
                kind: "Deployment".to_string(),
                name: "gone".to_string(),
                live_state: live,
            };
            assert_eq!(item.live_resource().unwrap(), None);
        }
    }

    #[test]
    fn test_garbage_live_state() {
        let item = ResourceDiff {
            kind: "Deployment".to_string(),
            name: "web".to_string(),
            live_state: Some("{not json".to_string()),
        };
        match item.live_resource() {
            Err(ApiError::LiveState { kind, name, .. }) => {
                assert_eq!(kind, "Deployment");
                assert_eq!(name, "web");
            }
            other => panic!("expected LiveState error, got {:?}", other),
        }
    }

    #[test]
    fn test_response_keeps_order_and_drops_absent() {
        let body = json!({
            "items": [
                {"group": "apps", "kind": "Deployment", "namespace": "default", "name": "b",
                 "liveState": json!({"apiVersion": "apps/v1", "kind": "Deployment",
                                     "metadata": {"name": "b", "namespace": "default"}}).to_string()},
                {"group": "", "kind": "ConfigMap", "namespace": "default", "name": "pruned",
                 "liveState": "null"},
                {"group": "argoproj.io", "kind": "Rollout", "namespace": "default", "name": "a",
                 "liveState": json!({"apiVersion": "argoproj.io/v1alpha1", "kind": "Rollout",
                                     "metadata": {"name": "a", "namespace": "default"}}).to_string()}
            ]
        });
        let response: ManagedResourcesResponse = serde_json::from_value(body).unwrap();
        let resources = response.into_live_resources().unwrap();
        assert_eq!(
            resources,
            vec![
                ManagedResource::new("apps", "Deployment", "default", "b"),
                ManagedResource::new("argoproj.io", "Rollout", "default", "a"),
            ]
        );
    }

    #[test]
    fn test_empty_response() {
        let response: ManagedResourcesResponse = serde_json::from_str("{}").unwrap();
        assert!(response.into_live_resources().unwrap().is_empty());
    }
}
