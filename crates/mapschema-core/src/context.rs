//! Per-node state threaded through the mapping walk
//!
//! Copyright (c) 2025 Mapschema Contributors
//! Licensed under the Apache-2.0 license

use crate::paths::{ArrayPaths, Overrides, PathRules};

/// Root marker for display paths
pub const ROOT_PATH: &str = "$";

/// Everything the generator needs to know about the node it is visiting
#[derive(Debug, Clone, Default)]
pub struct WalkContext {
    /// Display path of the node, e.g. `$.selectors.name`
    pub path: String,
    /// Whether the node is listed as array-shaped
    pub is_array: bool,
    /// Overrides terminating at this node
    pub overrides: Overrides,
    /// Rules still pending for descendants, relative to this node
    pub rules: PathRules,
    /// Array paths still pending for descendants, relative to this node
    pub array_paths: ArrayPaths,
}

impl WalkContext {
    /// Context for the root of a mapping
    pub fn root(rules: PathRules, array_paths: ArrayPaths) -> Self {
        Self {
            path: ROOT_PATH.to_string(),
            is_array: false,
            overrides: Overrides::new(),
            rules,
            array_paths,
        }
    }

    /// Context for the child `name`. The parent is left untouched; the
    /// child's array flag and overrides are resolved from the parent's view.
    pub fn child(&self, name: &str) -> Self {
        Self {
            path: format!("{}.{}", self.path, name),
            is_array: self.array_paths.contains(name),
            overrides: self.rules.local_overrides(name),
            rules: self.rules.narrow(name),
            array_paths: self.array_paths.narrow(name),
        }
    }

    /// Nesting depth below the root
    pub fn depth(&self) -> usize {
        self.path.matches('.').count()
    }
}
