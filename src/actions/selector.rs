// Copyright (c) 2025 Nikolay Denev <ndenev@gmail.com>
// SPDX-License-Identifier: BSD-3-Clause

//! Resource selection
//!
//! Narrows an application's managed resources to the target set. Matching is
//! an exact, case-sensitive conjunction over the constrained fields.

use std::fmt;

use super::{ActionError, ManagedResource};

/// How many resources a selection may resolve to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Multiplicity {
    /// Exactly one resource must match
    #[default]
    Single,
    /// Zero or more resources may match
    Any,
}

impl Multiplicity {
    pub fn from_all_flag(all: bool) -> Self {
        if all { Multiplicity::Any } else { Multiplicity::Single }
    }
}

/// Optional per-field constraints plus a multiplicity mode
///
/// `None` leaves a field unconstrained. `Some("")` constrains to the empty
/// value, which is how the core API group and cluster-scoped namespaces are
/// addressed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectorCriteria {
    pub group: Option<String>,
    pub kind: Option<String>,
    pub namespace: Option<String>,
    pub name: Option<String>,
    pub multiplicity: Multiplicity,
}

impl SelectorCriteria {
    pub fn with_multiplicity(mut self, multiplicity: Multiplicity) -> Self {
        self.multiplicity = multiplicity;
        self
    }

    /// Check a single resource against every constrained field
    pub fn matches(&self, resource: &ManagedResource) -> bool {
        field_matches(&self.group, &resource.group)
            && field_matches(&self.kind, &resource.kind)
            && field_matches(&self.namespace, &resource.namespace)
            && field_matches(&self.name, &resource.name)
    }
}

fn field_matches(criterion: &Option<String>, value: &str) -> bool {
    criterion.as_deref().is_none_or(|c| c == value)
}

impl fmt::Display for SelectorCriteria {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let fields = [
            ("group", &self.group),
            ("kind", &self.kind),
            ("namespace", &self.namespace),
            ("name", &self.name),
        ];
        let constrained: Vec<String> = fields
            .iter()
            .filter_map(|(label, value)| {
                value.as_ref().map(|v| format!("{}={:?}", label, v))
            })
            .collect();
        if constrained.is_empty() {
            f.write_str("any resource")
        } else {
            f.write_str(&constrained.join(", "))
        }
    }
}

/// Filter `inventory` down to the resources matching `criteria`
///
/// The result preserves inventory order. Under [`Multiplicity::Single`] anything
/// other than exactly one match is an error.
pub fn select(
    inventory: &[ManagedResource],
    criteria: &SelectorCriteria,
) -> Result<Vec<ManagedResource>, ActionError> {
    let matched: Vec<ManagedResource> = inventory
        .iter()
        .filter(|r| criteria.matches(r))
        .cloned()
        .collect();

    if criteria.multiplicity == Multiplicity::Single {
        match matched.len() {
            0 => {
                return Err(ActionError::NoMatchingResource {
                    criteria: criteria.to_string(),
                });
            }
            1 => {}
            count => {
                return Err(ActionError::AmbiguousResourceSelection {
                    count,
                    matches: matched.iter().map(describe).collect(),
                });
            }
        }
    }

    Ok(matched)
}

fn describe(resource: &ManagedResource) -> String {
    if resource.namespace.is_empty() {
        format!("{}/{}", resource.kind, resource.name)
    } else {
        format!("{}/{} (namespace {})", resource.kind, resource.name, resource.namespace)
    }
}
