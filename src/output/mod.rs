// Copyright (c) 2025 Nikolay Denev <ndenev@gmail.com>
// SPDX-License-Identifier: BSD-3-Clause

mod json;
mod table;
mod yaml;

pub use json::JsonFormatter;
pub use table::TableFormatter;
pub use yaml::YamlFormatter;

use std::collections::BTreeMap;

use crate::actions::{ActionRecord, ResourceKey};
use crate::cli::OutputFormat;

pub const COLUMNS: [&str; 5] = ["GROUP", "KIND", "NAME", "ACTION", "AVAILABLE"];

/// Available actions per resource, ready for rendering
#[derive(Debug, Clone, Default)]
pub struct ActionTable {
    pub actions: BTreeMap<ResourceKey, Vec<ActionRecord>>,
}

impl ActionTable {
    pub fn new(actions: BTreeMap<ResourceKey, Vec<ActionRecord>>) -> Self {
        Self { actions }
    }

    pub fn format(&self, format: &OutputFormat, no_headers: bool) -> String {
        match format {
            OutputFormat::Table => TableFormatter::format(self, no_headers),
            OutputFormat::Json => JsonFormatter::format(self),
            OutputFormat::Yaml => YamlFormatter::format(self),
        }
    }

    /// One row per action, resources in key order
    pub fn rows(&self) -> Vec<[String; 5]> {
        self.actions
            .iter()
            .flat_map(|(key, actions)| {
                actions.iter().map(move |action| {
                    [
                        key.group.clone(),
                        key.kind.clone(),
                        key.name.clone(),
                        action.name.clone(),
                        action.available.to_string(),
                    ]
                })
            })
            .collect()
    }

    /// Map keyed by `group\tkind\tname`, the shape used for JSON and YAML
    pub fn to_keyed_map(&self) -> BTreeMap<String, &[ActionRecord]> {
        self.actions
            .iter()
            .map(|(key, actions)| (key.to_string(), actions.as_slice()))
            .collect()
    }

    pub fn row_count(&self) -> usize {
        self.actions.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.row_count() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actions::ManagedResource;

    pub(super) fn sample() -> ActionTable {
        let mut actions = BTreeMap::new();
        actions.insert(
            ManagedResource::new("apps", "Deployment", "default", "y").key(),
            vec![ActionRecord::new("restart", false)],
        );
        actions.insert(
            ManagedResource::new("apps", "Deployment", "default", "x").key(),
            vec![
                ActionRecord::new("restart", true),
                ActionRecord::new("pause", true),
            ],
        );
        ActionTable::new(actions)
    }

    #[test]
    fn test_rows_sorted_by_key() {
        let rows = sample().rows();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0], ["apps", "Deployment", "x", "restart", "true"]);
        assert_eq!(rows[1], ["apps", "Deployment", "x", "pause", "true"]);
        assert_eq!(rows[2], ["apps", "Deployment", "y", "restart", "false"]);
    }

    #[test]
    fn test_keyed_map() {
        let table = sample();
        let map = table.to_keyed_map();
        let keys: Vec<_> = map.keys().cloned().collect();
        assert_eq!(keys, vec!["apps\tDeployment\tx", "apps\tDeployment\ty"]);
    }

    #[test]
    fn test_counts() {
        assert_eq!(sample().row_count(), 3);
        assert!(!sample().is_empty());
        assert!(ActionTable::default().is_empty());
    }

    #[test]
    fn test_format_dispatch() {
        let table = sample();
        assert!(table.format(&OutputFormat::Json, false).starts_with('{'));
        assert!(table.format(&OutputFormat::Table, false).contains("AVAILABLE"));
        assert!(table.format(&OutputFormat::Yaml, false).contains("restart"));
    }
}
