//! Path rules: per-field overrides addressed by dot-separated paths
//!
//! A rule such as `{"path": "selectors.*", "value": true}` listed under the
//! `optional` kind marks every direct child of `selectors` optional. As the
//! generator descends into a child, the rule set is narrowed to the rules that
//! can still reach that child's subtree and the consumed segment is dropped.
//! Nothing here mutates in place; every operation returns a fresh value.
//!
//! Copyright (c) 2025 Mapschema Contributors
//! Licensed under the Apache-2.0 license

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Segment that matches any immediate child name
pub const WILDCARD: &str = "*";

/// Separator between path segments
pub const PATH_SEPARATOR: char = '.';

/// Reserved kind: marks a node optional
pub const OPTIONAL_KIND: &str = "optional";

/// Reserved kind: marks an object node strict
pub const STRICT_KIND: &str = "strict";

/// Split a path into its leading segment and the remainder, if any
fn split_head(path: &str) -> (&str, Option<&str>) {
    match path.split_once(PATH_SEPARATOR) {
        Some((head, rest)) => (head, Some(rest)),
        None => (path, None),
    }
}

/// Drop the leading segment; `None` when nothing remains
fn drop_head(path: &str) -> Option<&str> {
    split_head(path).1.filter(|rest| !rest.is_empty())
}

/// A single override value bound to a path
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathRule {
    /// Dot-separated path, relative to the current node
    pub path: String,
    /// Value merged onto the node the path resolves to
    pub value: Value,
    /// Set once a wildcard segment has been consumed while narrowing
    #[serde(skip)]
    wildcarded: bool,
}

impl PathRule {
    /// Create a new path rule
    pub fn new(path: impl Into<String>, value: Value) -> Self {
        Self {
            path: path.into(),
            value,
            wildcarded: false,
        }
    }

    /// Whether the first segment addresses `name`, directly or via wildcard
    pub fn leads_to(&self, name: &str) -> bool {
        let (head, _) = split_head(&self.path);
        head == name || head == WILDCARD
    }

    /// Whether any consumed segment of the original path was a wildcard
    pub fn is_wildcarded(&self) -> bool {
        self.wildcarded
    }

    /// Whether the rule terminates at `name`
    fn targets(&self, name: &str) -> bool {
        self.path == name
    }

    /// Whether the rule reached `name` through exact segments only
    fn targets_exactly(&self, name: &str) -> bool {
        self.targets(name) && !self.wildcarded
    }

    /// Whether the rule is a bare wildcard, terminating at any child
    fn targets_any(&self) -> bool {
        self.path == WILDCARD
    }

    fn shortened(&self) -> Option<Self> {
        let (head, _) = split_head(&self.path);
        drop_head(&self.path).map(|rest| Self {
            path: rest.to_string(),
            value: self.value.clone(),
            wildcarded: self.wildcarded || head == WILDCARD,
        })
    }
}

/// Path rules grouped by kind (`optional`, `strict`, or any custom key)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PathRules {
    rules: BTreeMap<String, Vec<PathRule>>,
}

impl PathRules {
    /// Create an empty rule set
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a rule of the given kind
    pub fn with_rule(mut self, kind: impl Into<String>, path: impl Into<String>, value: Value) -> Self {
        self.push(kind, PathRule::new(path, value));
        self
    }

    /// Append a rule of the given kind
    pub fn push(&mut self, kind: impl Into<String>, rule: PathRule) {
        self.rules.entry(kind.into()).or_default().push(rule);
    }

    /// Rules listed under `kind`
    pub fn kind(&self, kind: &str) -> &[PathRule] {
        self.rules.get(kind).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Iterate over kinds and their rules
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[PathRule])> {
        self.rules.iter().map(|(kind, rules)| (kind.as_str(), rules.as_slice()))
    }

    /// Total number of rules across every kind
    pub fn len(&self) -> usize {
        self.rules.values().map(Vec::len).sum()
    }

    /// Whether there are no rules at all
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn filter_map_rules<F>(&self, mut f: F) -> Self
    where
        F: FnMut(&PathRule) -> Option<PathRule>,
    {
        let rules = self
            .rules
            .iter()
            .filter_map(|(kind, rules)| {
                let kept: Vec<PathRule> = rules.iter().filter_map(&mut f).collect();
                (!kept.is_empty()).then(|| (kind.clone(), kept))
            })
            .collect();
        Self { rules }
    }

    /// Keep only the rules whose first segment is `name` or the wildcard.
    /// Paths are left untouched.
    pub fn pick(&self, name: &str) -> Self {
        self.filter_map_rules(|rule| rule.leads_to(name).then(|| rule.clone()))
    }

    /// Drop the leading segment of every rule. Rules with nothing left are
    /// removed rather than kept with an empty path.
    pub fn shorten(&self) -> Self {
        self.filter_map_rules(PathRule::shortened)
    }

    /// Rules relevant below the child `name`, relative to that child
    pub fn narrow(&self, name: &str) -> Self {
        self.filter_map_rules(|rule| rule.leads_to(name).then(|| rule.shortened()).flatten())
    }

    /// Flattened overrides for the child `name`: every rule whose path is
    /// exactly `name` or exactly the wildcard. A rule that reached `name`
    /// without any wildcard segment beats the others of the same kind;
    /// otherwise the last listed rule wins.
    pub fn local_overrides(&self, name: &str) -> Overrides {
        let mut values = BTreeMap::new();

        for (kind, rules) in &self.rules {
            let exact = rules.iter().rev().find(|rule| rule.targets_exactly(name));
            let fallback = rules
                .iter()
                .rev()
                .find(|rule| rule.targets(name) || rule.targets_any());

            if let Some(rule) = exact.or(fallback) {
                values.insert(kind.clone(), rule.value.clone());
            }
        }

        Overrides { values }
    }
}

/// Overrides that apply at one node, keyed by rule kind
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Overrides {
    values: BTreeMap<String, Value>,
}

impl Overrides {
    /// Create an empty override set
    pub fn new() -> Self {
        Self::default()
    }

    /// Value for `kind`, if any rule set it
    pub fn get(&self, kind: &str) -> Option<&Value> {
        self.values.get(kind)
    }

    /// Truthiness of a flag-like override; `None` when no rule set it
    pub fn flag(&self, kind: &str) -> Option<bool> {
        self.get(kind).map(is_truthy)
    }

    /// The `optional` override
    pub fn optional(&self) -> Option<bool> {
        self.flag(OPTIONAL_KIND)
    }

    /// The `strict` override
    pub fn strict(&self) -> Option<bool> {
        self.flag(STRICT_KIND)
    }

    /// Overrides other than the reserved `optional` and `strict` kinds
    pub fn custom(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values
            .iter()
            .filter(|(kind, _)| kind.as_str() != OPTIONAL_KIND && kind.as_str() != STRICT_KIND)
            .map(|(kind, value)| (kind.as_str(), value))
    }

    /// Whether no override applies
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Number of override kinds present
    pub fn len(&self) -> usize {
        self.values.len()
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(true),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Paths of fields that must be treated as arrays even though the mapping
/// encodes them as plain objects or scalars
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ArrayPaths(Vec<String>);

impl ArrayPaths {
    /// Create an empty set
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a path
    pub fn push(&mut self, path: impl Into<String>) {
        self.0.push(path.into());
    }

    /// Whether `name` itself is listed; exact match only
    pub fn contains(&self, name: &str) -> bool {
        self.0.iter().any(|path| path == name)
    }

    /// Drop the leading segment of every path, removing paths that run out
    pub fn shorten(&self) -> Self {
        Self(self.0.iter().filter_map(|path| drop_head(path)).map(str::to_string).collect())
    }

    /// Paths below the child `name`, relative to that child
    pub fn narrow(&self, name: &str) -> Self {
        Self(
            self.0
                .iter()
                .filter(|path| split_head(path).0 == name)
                .filter_map(|path| drop_head(path))
                .map(str::to_string)
                .collect(),
        )
    }

    /// The listed paths
    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    /// Whether no path is listed
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of listed paths
    pub fn len(&self) -> usize {
        self.0.len()
    }
}

impl<S: Into<String>> FromIterator<S> for ArrayPaths {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}
