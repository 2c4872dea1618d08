// Copyright (c) 2025 Nikolay Denev <ndenev@gmail.com>
// SPDX-License-Identifier: BSD-3-Clause

//! Resource action selection and dispatch
//!
//! Turns an application's managed resources plus loose selector criteria into
//! a deterministic target set, then lists or runs actions against each target.

mod dispatcher;
mod error;
mod identifier;
mod selector;

pub use dispatcher::ActionDispatcher;
pub use error::{ActionError, RemoteCall};
pub use identifier::{ActionIdentifier, LegacyContext};
pub use selector::{Multiplicity, SelectorCriteria, select};

use serde::{Deserialize, Serialize};
use std::fmt;

/// A live cluster object managed by an application
///
/// Identity is the (group, kind, namespace, name) tuple. `group` is empty for
/// the core API group, `namespace` is empty for cluster-scoped kinds.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ManagedResource {
    pub group: String,
    pub kind: String,
    pub namespace: String,
    pub name: String,
}

impl ManagedResource {
    pub fn new(
        group: impl Into<String>,
        kind: impl Into<String>,
        namespace: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            group: group.into(),
            kind: kind.into(),
            namespace: namespace.into(),
            name: name.into(),
        }
    }

    /// Key used to group list results (namespace is folded out)
    pub fn key(&self) -> ResourceKey {
        ResourceKey {
            group: self.group.clone(),
            kind: self.kind.clone(),
            name: self.name.clone(),
        }
    }
}

impl fmt::Display for ManagedResource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.group.is_empty() {
            write!(f, "{}", self.kind)?;
        } else {
            write!(f, "{}/{}", self.group, self.kind)?;
        }
        if self.namespace.is_empty() {
            write!(f, " {}", self.name)
        } else {
            write!(f, " {}/{}", self.namespace, self.name)
        }
    }
}

/// (group, kind, name) triple keying list-mode results
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ResourceKey {
    pub group: String,
    pub kind: String,
    pub name: String,
}

impl fmt::Display for ResourceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}\t{}\t{}", self.group, self.kind, self.name)
    }
}

/// An action a resource currently supports, as reported by the server
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionRecord {
    pub name: String,
    pub available: bool,
}

impl ActionRecord {
    pub fn new(name: impl Into<String>, available: bool) -> Self {
        Self {
            name: name.into(),
            available,
        }
    }
}
