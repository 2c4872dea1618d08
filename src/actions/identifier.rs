// Copyright (c) 2025 Nikolay Denev <ndenev@gmail.com>
// SPDX-License-Identifier: BSD-3-Clause

//! Action identifier parsing
//!
//! Actions are addressed as `<group>/<kind>/<action>`, e.g.
//! `apps/Deployment/restart`. One legacy spelling survives: a bare `resume`
//! together with `--kind Rollout`.

use std::fmt;

use super::ActionError;

const LEGACY_ACTION: &str = "resume";
const LEGACY_KIND: &str = "Rollout";
const LEGACY_GROUP: &str = "argoproj.io";

/// Normalized (group, kind, action) triple
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionIdentifier {
    pub group: String,
    pub kind: String,
    pub action: String,
}

/// The parts of the command line the legacy spelling depends on
///
/// `kind` is the `--kind` side-channel selector; the remaining fields are only
/// used to rebuild the replacement command in the deprecation notice.
#[derive(Debug, Clone, Default)]
pub struct LegacyContext<'a> {
    pub app: &'a str,
    pub kind: Option<&'a str>,
    pub resource_name: Option<&'a str>,
    pub namespace: Option<&'a str>,
    pub all: bool,
}

/// Warning emitted when the legacy spelling was used
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeprecationNotice {
    /// The invocation the operator should switch to
    pub replacement: String,
}

impl fmt::Display for DeprecationNotice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Warning: this syntax for running the \"{}\" action has been deprecated. \
             Please run the action as\n\n\t{}\n",
            LEGACY_ACTION, self.replacement
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedAction {
    pub identifier: ActionIdentifier,
    pub deprecation: Option<DeprecationNotice>,
}

impl ActionIdentifier {
    /// Parse a raw action argument
    ///
    /// Accepts exactly three non-empty `/`-separated segments. Nothing else is
    /// guessed at, except the single grandfathered `resume` + `Rollout` pair.
    pub fn parse(raw: &str, legacy: &LegacyContext<'_>) -> Result<ParsedAction, ActionError> {
        if raw == LEGACY_ACTION && legacy.kind == Some(LEGACY_KIND) {
            let identifier = ActionIdentifier {
                group: LEGACY_GROUP.to_string(),
                kind: LEGACY_KIND.to_string(),
                action: LEGACY_ACTION.to_string(),
            };
            let deprecation = DeprecationNotice {
                replacement: replacement_command(&identifier, legacy),
            };
            return Ok(ParsedAction {
                identifier,
                deprecation: Some(deprecation),
            });
        }

        let segments: Vec<&str> = raw.split('/').collect();
        match segments.as_slice() {
            [group, kind, action]
                if !group.is_empty() && !kind.is_empty() && !action.is_empty() =>
            {
                Ok(ParsedAction {
                    identifier: ActionIdentifier {
                        group: group.to_string(),
                        kind: kind.to_string(),
                        action: action.to_string(),
                    },
                    deprecation: None,
                })
            }
            _ => Err(ActionError::MalformedActionIdentifier {
                raw: raw.to_string(),
            }),
        }
    }
}

impl fmt::Display for ActionIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.group, self.kind, self.action)
    }
}

fn replacement_command(identifier: &ActionIdentifier, legacy: &LegacyContext<'_>) -> String {
    let mut cmd = format!("argocd app actions run {} {}", legacy.app, identifier);
    if let Some(name) = legacy.resource_name.filter(|n| !n.is_empty()) {
        cmd.push_str(" --resource-name ");
        cmd.push_str(name);
    }
    if let Some(ns) = legacy.namespace.filter(|n| !n.is_empty()) {
        cmd.push_str(" --namespace ");
        cmd.push_str(ns);
    }
    if legacy.all {
        cmd.push_str(" --all");
    }
    cmd
}
