//! Option groups
//!
//! A [`Group`] is a namespace of options and nested groups. Groups are built
//! once with [`GroupBuilder`], combined with [`Group::merge`], and receive
//! override values through [`Group::resolve_override`].

use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

use crate::diagnostics::{Diagnostic, DiagnosticSink, NodeKind};
use crate::error::{Error, Result};
use crate::option::ConfigOption;
use crate::overrides::{OverrideTree, OverrideValue};
use crate::path::QualifiedName;

/// A schema node: either an option leaf or a nested group
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Node {
    Leaf(ConfigOption),
    Branch(Group),
}

impl Node {
    pub fn kind(&self) -> NodeKind {
        match self {
            Self::Leaf(_) => NodeKind::Option,
            Self::Branch(_) => NodeKind::Group,
        }
    }

    pub fn as_option(&self) -> Option<&ConfigOption> {
        match self {
            Self::Leaf(option) => Some(option),
            Self::Branch(_) => None,
        }
    }

    pub fn as_group(&self) -> Option<&Group> {
        match self {
            Self::Branch(group) => Some(group),
            Self::Leaf(_) => None,
        }
    }
}

/// A namespace composing options and nested groups
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Group {
    children: BTreeMap<String, Node>,
}

impl Group {
    /// An empty group
    pub fn new() -> Self {
        Self::default()
    }

    pub fn builder() -> GroupBuilder {
        GroupBuilder::default()
    }

    /// Build a group from explicit option and group lists.
    ///
    /// A name used more than once across both lists is an authoring error.
    pub fn from_parts<K, O, G>(options: O, groups: G) -> Result<Self>
    where
        K: Into<String>,
        O: IntoIterator<Item = (K, ConfigOption)>,
        G: IntoIterator<Item = (K, Group)>,
    {
        let mut builder = Self::builder();
        for (name, option) in options {
            builder = builder.option(name, option);
        }
        for (name, group) in groups {
            builder = builder.group(name, group);
        }
        builder.build()
    }

    pub fn get(&self, name: &str) -> Option<&Node> {
        self.children.get(name)
    }

    /// Direct children in name order
    pub fn children(&self) -> impl Iterator<Item = (&str, &Node)> {
        self.children.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Direct child group by name
    pub fn group(&self, name: &str) -> Option<&Group> {
        self.children.get(name).and_then(Node::as_group)
    }

    /// Walk nested groups along `path`
    pub fn lookup(&self, path: &QualifiedName) -> Option<&Node> {
        let (last, parents) = path.segments().split_last()?;
        let mut group = self;
        for segment in parents {
            group = group.group(segment)?;
        }
        group.get(last)
    }

    /// Option at a dotted path, e.g. `"loader.enabled"`
    pub fn option(&self, path: &str) -> Option<&ConfigOption> {
        self.option_at(&QualifiedName::parse(path))
    }

    pub fn option_at(&self, path: &QualifiedName) -> Option<&ConfigOption> {
        self.lookup(path).and_then(Node::as_option)
    }

    /// Mutable option at a dotted path. Loading through it marks the option
    /// as user-set, exactly like an override would.
    pub fn option_mut(&mut self, path: &str) -> Option<&mut ConfigOption> {
        self.option_at_mut(&QualifiedName::parse(path))
    }

    pub(crate) fn option_at_mut(&mut self, path: &QualifiedName) -> Option<&mut ConfigOption> {
        let (last, parents) = path.segments().split_last()?;
        let mut group = self;
        for segment in parents {
            group = match group.children.get_mut(segment)? {
                Node::Branch(child) => child,
                Node::Leaf(_) => return None,
            };
        }
        match group.children.get_mut(last)? {
            Node::Leaf(option) => Some(option),
            Node::Branch(_) => None,
        }
    }

    /// Every option in the tree, depth-first in name order
    pub fn options(&self) -> Vec<&ConfigOption> {
        let mut options = Vec::new();
        self.collect_options(&mut options);
        options
    }

    fn collect_options<'a>(&'a self, out: &mut Vec<&'a ConfigOption>) {
        for node in self.children.values() {
            match node {
                Node::Leaf(option) => out.push(option),
                Node::Branch(group) => group.collect_options(out),
            }
        }
    }

    /// Assign every option its qualified name below `prefix`
    pub(crate) fn stamp_paths(&mut self, prefix: &QualifiedName) {
        for (name, node) in &mut self.children {
            let path = prefix.child(name);
            match node {
                Node::Leaf(option) => {
                    option.set_name(name);
                    option.stamp(path);
                }
                Node::Branch(group) => group.stamp_paths(&path),
            }
        }
    }

    /// Reset every option in the tree to its default
    pub(crate) fn reset_all(&mut self) {
        for node in self.children.values_mut() {
            match node {
                Node::Leaf(option) => option.reset(),
                Node::Branch(group) => group.reset_all(),
            }
        }
    }

    /// Merge two groups into a new one, leaving both inputs untouched.
    ///
    /// - Names on one side only are carried over.
    /// - Two groups under one name are merged recursively.
    /// - Two options under one name: `other`'s option wins and a
    ///   [`Diagnostic::ShadowedOption`] is reported.
    /// - An option and a group under one name: `self`'s node wins and a
    ///   [`Diagnostic::InvalidShape`] is reported.
    pub fn merge(&self, other: &Group, sink: &mut dyn DiagnosticSink) -> Group {
        self.merge_at(other, &QualifiedName::root(), sink)
    }

    fn merge_at(
        &self,
        other: &Group,
        prefix: &QualifiedName,
        sink: &mut dyn DiagnosticSink,
    ) -> Group {
        let mut children = self.children.clone();
        for (name, theirs) in &other.children {
            let path = prefix.child(name);
            let merged = match (self.children.get(name), theirs) {
                (None, theirs) => theirs.clone(),
                (Some(Node::Branch(ours)), Node::Branch(theirs)) => {
                    Node::Branch(ours.merge_at(theirs, &path, sink))
                }
                (Some(Node::Leaf(_)), Node::Leaf(theirs)) => {
                    sink.report(Diagnostic::ShadowedOption { option: path });
                    Node::Leaf(theirs.clone())
                }
                (Some(ours), _) => {
                    sink.report(Diagnostic::InvalidShape {
                        path,
                        kept: ours.kind(),
                    });
                    ours.clone()
                }
            };
            children.insert(name.clone(), merged);
        }
        Group { children }
    }

    /// Apply every entry of `overrides` to this group
    pub fn apply_overrides(
        &mut self,
        prefix: &QualifiedName,
        overrides: &OverrideTree,
        ctx: &mut ResolveContext<'_>,
    ) {
        for (name, value) in overrides.iter() {
            self.resolve_override(prefix, name, value, ctx);
        }
    }

    /// Route one override entry to the matching child.
    ///
    /// Mappings go to child groups, scalars to child options. Anything without
    /// a matching child is recorded as unrecognized, one path per leaf.
    pub fn resolve_override(
        &mut self,
        prefix: &QualifiedName,
        name: &str,
        value: &OverrideValue,
        ctx: &mut ResolveContext<'_>,
    ) {
        let path = prefix.child(name);
        match (self.children.get_mut(name), value) {
            (Some(Node::Branch(group)), OverrideValue::Nested(tree)) => {
                group.apply_overrides(&path, tree, ctx);
            }
            (Some(Node::Leaf(option)), OverrideValue::Scalar(raw)) => {
                if let Err(mut err) = option.load(raw) {
                    err.option = path;
                    ctx.report(err.into());
                }
            }
            (_, OverrideValue::Nested(tree)) if !tree.is_empty() => {
                for leaf in tree.leaf_paths(&path) {
                    ctx.unrecognized(leaf);
                }
            }
            _ => ctx.unrecognized(path),
        }
    }
}

/// Builder for a single group literal
#[derive(Debug, Default)]
pub struct GroupBuilder {
    children: Vec<(String, Node)>,
}

impl GroupBuilder {
    pub fn option(mut self, name: impl Into<String>, option: ConfigOption) -> Self {
        self.children.push((name.into(), Node::Leaf(option)));
        self
    }

    pub fn group(mut self, name: impl Into<String>, group: Group) -> Self {
        self.children.push((name.into(), Node::Branch(group)));
        self
    }

    /// Finish the group, failing on the first unaddressable or repeated name
    pub fn build(self) -> Result<Group> {
        let mut children = BTreeMap::new();
        for (name, node) in self.children {
            if name.is_empty() || name.contains('.') {
                return Err(Error::InvalidChildName { name });
            }
            if children.contains_key(&name) {
                return Err(Error::DuplicateChild { name });
            }
            children.insert(name, node);
        }
        let mut group = Group { children };
        group.stamp_paths(&QualifiedName::root());
        Ok(group)
    }
}

/// State carried through one override walk
pub struct ResolveContext<'a> {
    sink: &'a mut dyn DiagnosticSink,
    unrecognized: BTreeSet<QualifiedName>,
}

impl<'a> ResolveContext<'a> {
    pub fn new(sink: &'a mut dyn DiagnosticSink) -> Self {
        Self {
            sink,
            unrecognized: BTreeSet::new(),
        }
    }

    pub fn report(&mut self, diagnostic: Diagnostic) {
        self.sink.report(diagnostic);
    }

    fn unrecognized(&mut self, path: QualifiedName) {
        self.sink.report(Diagnostic::UnrecognizedParameter { path: path.clone() });
        self.unrecognized.insert(path);
    }

    /// Paths recorded so far
    pub fn unrecognized_paths(&self) -> &BTreeSet<QualifiedName> {
        &self.unrecognized
    }

    pub fn into_unrecognized(self) -> BTreeSet<QualifiedName> {
        self.unrecognized
    }
}
