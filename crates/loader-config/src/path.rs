//! Dotted option paths
//!
//! Every option knows its full path from the schema root. Paths are built
//! top-down while walking the tree, so nothing ever needs a pointer back to
//! its parent group.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// A dotted path from the schema root, e.g. `loader.enabled`
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct QualifiedName {
    segments: Vec<String>,
}

impl QualifiedName {
    /// The empty path naming the schema root
    pub fn root() -> Self {
        Self::default()
    }

    /// Parse a dotted path. Empty segments are dropped.
    ///
    /// ```
    /// use loader_config::QualifiedName;
    ///
    /// let path = QualifiedName::parse("loader.enabled");
    /// assert_eq!(path.segments(), ["loader", "enabled"]);
    /// assert_eq!(path.to_string(), "loader.enabled");
    /// ```
    pub fn parse(dotted: &str) -> Self {
        Self {
            segments: dotted
                .split('.')
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect(),
        }
    }

    /// Path of a direct child of this one
    pub fn child(&self, name: &str) -> Self {
        let mut segments = self.segments.clone();
        segments.push(name.to_string());
        Self { segments }
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Last segment, or `None` for the root
    pub fn leaf(&self) -> Option<&str> {
        self.segments.last().map(String::as_str)
    }

    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }
}

impl fmt::Display for QualifiedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_root() {
            return write!(f, "<root>");
        }
        write!(f, "{}", self.segments.join("."))
    }
}

impl From<&str> for QualifiedName {
    fn from(dotted: &str) -> Self {
        Self::parse(dotted)
    }
}

impl Serialize for QualifiedName {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.segments.join("."))
    }
}

impl<'de> Deserialize<'de> for QualifiedName {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let dotted = String::deserialize(deserializer)?;
        Ok(Self::parse(&dotted))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn child_extends_segments() {
        let path = QualifiedName::root().child("startup").child("entry");
        assert_eq!(path.to_string(), "startup.entry");
        assert_eq!(path.leaf(), Some("entry"));
    }

    #[test]
    fn parse_skips_empty_segments() {
        let path = QualifiedName::parse(".loader..enabled.");
        assert_eq!(path, QualifiedName::parse("loader.enabled"));
    }

    #[test]
    fn root_displays_placeholder() {
        assert!(QualifiedName::root().is_root());
        assert_eq!(QualifiedName::root().to_string(), "<root>");
    }

    #[test]
    fn serializes_as_dotted_string() {
        let path = QualifiedName::parse("a.b");
        assert_eq!(serde_json::to_string(&path).unwrap(), "\"a.b\"");
        let back: QualifiedName = serde_json::from_str("\"a.b\"").unwrap();
        assert_eq!(back, path);
    }
}
