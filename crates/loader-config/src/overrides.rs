//! Override sources
//!
//! An override source is a nested mapping from names to either raw scalars or
//! further mappings. Sources are produced outside this crate (from URL
//! parameters, the embedding host, build-time constants) and folded together
//! with later sources winning per leaf.

use serde_json::Value as JsonValue;
use std::collections::BTreeMap;

use crate::error::{Error, Result};
use crate::option::RawScalar;
use crate::path::QualifiedName;

/// One entry of an override tree
#[derive(Debug, Clone, PartialEq)]
pub enum OverrideValue {
    Scalar(RawScalar),
    Nested(OverrideTree),
}

impl From<RawScalar> for OverrideValue {
    fn from(scalar: RawScalar) -> Self {
        Self::Scalar(scalar)
    }
}

impl From<&str> for OverrideValue {
    fn from(text: &str) -> Self {
        Self::Scalar(RawScalar::from(text))
    }
}

impl From<OverrideTree> for OverrideValue {
    fn from(tree: OverrideTree) -> Self {
        Self::Nested(tree)
    }
}

/// A nested mapping of raw override values
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OverrideTree {
    entries: BTreeMap<String, OverrideValue>,
}

impl OverrideTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an entry, returning the one it replaced
    pub fn insert(
        &mut self,
        name: impl Into<String>,
        value: impl Into<OverrideValue>,
    ) -> Option<OverrideValue> {
        self.entries.insert(name.into(), value.into())
    }

    /// Builder-style [`insert`](Self::insert)
    pub fn with(mut self, name: impl Into<String>, value: impl Into<OverrideValue>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn get(&self, name: &str) -> Option<&OverrideValue> {
        self.entries.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &OverrideValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Set a scalar at a dotted path, creating intermediate mappings.
    ///
    /// A scalar standing where a mapping is needed is replaced. The root path
    /// names no entry and is ignored.
    pub fn set_path(&mut self, path: &QualifiedName, scalar: RawScalar) {
        let Some((leaf, parents)) = path.segments().split_last() else {
            return;
        };
        let mut node = self;
        for segment in parents {
            let entry = node
                .entries
                .entry(segment.clone())
                .or_insert_with(|| OverrideValue::Nested(OverrideTree::new()));
            node = nested_mut(entry);
        }
        node.entries
            .insert(leaf.clone(), OverrideValue::Scalar(scalar));
    }

    /// Build a tree from `(dotted.key, value)` pairs. Later pairs win.
    ///
    /// Keys without any segment, such as `""`, are kept as a literal name.
    ///
    /// ```
    /// use loader_config::{OverrideTree, OverrideValue, RawScalar};
    ///
    /// let tree = OverrideTree::from_dotted_pairs([
    ///     ("startup.entry", "custom"),
    ///     ("loader.enabled", "false"),
    /// ]);
    /// let Some(OverrideValue::Nested(startup)) = tree.get("startup") else {
    ///     panic!("expected a nested startup entry");
    /// };
    /// assert_eq!(
    ///     startup.get("entry"),
    ///     Some(&OverrideValue::Scalar(RawScalar::from("custom")))
    /// );
    /// ```
    pub fn from_dotted_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<RawScalar>,
    {
        let mut tree = Self::new();
        for (key, value) in pairs {
            tree.set_path(&key_path(key.as_ref()), value.into());
        }
        tree
    }

    /// Parse a JSON document into an override tree
    pub fn from_json_str(content: &str) -> Result<Self> {
        let value: JsonValue = serde_json::from_str(content)?;
        Self::try_from(value)
    }

    /// Structural merge where `later` wins for every leaf it sets.
    ///
    /// Two mappings under the same name are merged recursively; any other
    /// collision is resolved by taking `later`'s entry whole.
    pub fn merge(&self, later: &OverrideTree) -> OverrideTree {
        let mut merged = self.clone();
        for (name, value) in &later.entries {
            let combined = match (merged.entries.remove(name), value) {
                (Some(OverrideValue::Nested(base)), OverrideValue::Nested(over)) => {
                    OverrideValue::Nested(base.merge(over))
                }
                (_, value) => value.clone(),
            };
            merged.entries.insert(name.clone(), combined);
        }
        merged
    }

    /// Fold ordered sources into one tree, earliest first
    pub fn fold(sources: &[OverrideTree]) -> OverrideTree {
        sources
            .iter()
            .fold(OverrideTree::new(), |acc, source| acc.merge(source))
    }

    /// Qualified path of every leaf under `prefix`.
    ///
    /// Empty mappings count as leaves so they still show up in reports.
    pub fn leaf_paths(&self, prefix: &QualifiedName) -> Vec<QualifiedName> {
        let mut paths = Vec::new();
        for (name, value) in &self.entries {
            let path = prefix.child(name);
            match value {
                OverrideValue::Nested(tree) if !tree.is_empty() => {
                    paths.extend(tree.leaf_paths(&path));
                }
                _ => paths.push(path),
            }
        }
        paths
    }
}

fn nested_mut(entry: &mut OverrideValue) -> &mut OverrideTree {
    match entry {
        OverrideValue::Nested(tree) => tree,
        scalar => {
            *scalar = OverrideValue::Nested(OverrideTree::new());
            nested_mut(scalar)
        }
    }
}

/// Path of a user-supplied key. A key with no segments (`""`, `"."`) is kept
/// literally so it still surfaces as unrecognized.
fn key_path(key: &str) -> QualifiedName {
    let path = QualifiedName::parse(key);
    if path.is_root() {
        QualifiedName::root().child(key)
    } else {
        path
    }
}

/// Single-entry tree placing `entry` under `segments`
fn nest(segments: &[String], entry: OverrideValue) -> OverrideTree {
    match segments.split_first() {
        Some((first, [])) => OverrideTree::new().with(first.clone(), entry),
        Some((first, rest)) => OverrideTree::new().with(first.clone(), nest(rest, entry)),
        None => OverrideTree::new(),
    }
}

impl TryFrom<JsonValue> for OverrideTree {
    type Error = Error;

    /// Objects become mappings, strings/booleans/numbers become scalars and
    /// `null` entries are skipped. Arrays are rejected. Dotted keys such as
    /// `"loader.enabled"` are split into nested mappings.
    fn try_from(value: JsonValue) -> Result<Self> {
        match value {
            JsonValue::Object(map) => from_json_object(map, &QualifiedName::root()),
            other => Err(Error::invalid_source(format!(
                "expected an object at the top level, found {}",
                json_kind(&other)
            ))),
        }
    }
}

fn from_json_object(
    map: serde_json::Map<String, JsonValue>,
    prefix: &QualifiedName,
) -> Result<OverrideTree> {
    let mut tree = OverrideTree::new();
    for (name, value) in map {
        let key = key_path(&name);
        let path = key
            .segments()
            .iter()
            .fold(prefix.clone(), |path, segment| path.child(segment));
        let entry = match value {
            JsonValue::Null => continue,
            JsonValue::Bool(b) => OverrideValue::Scalar(RawScalar::Boolean(b)),
            JsonValue::Number(n) => match n.as_f64() {
                Some(n) => OverrideValue::Scalar(RawScalar::Number(n)),
                None => {
                    return Err(Error::invalid_source(format!(
                        "'{}' is not representable as a number",
                        path
                    )));
                }
            },
            JsonValue::String(s) => OverrideValue::Scalar(RawScalar::Text(s)),
            JsonValue::Array(_) => {
                return Err(Error::invalid_source(format!(
                    "'{}' is an array, only scalars and objects are supported",
                    path
                )));
            }
            JsonValue::Object(inner) => OverrideValue::Nested(from_json_object(inner, &path)?),
        };
        tree = tree.merge(&nest(key.segments(), entry));
    }
    Ok(tree)
}

fn json_kind(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "a boolean",
        JsonValue::Number(_) => "a number",
        JsonValue::String(_) => "a string",
        JsonValue::Array(_) => "an array",
        JsonValue::Object(_) => "an object",
    }
}
