// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;

/// Separator between the segments of a nested data path.
pub const PATH_SEPARATOR: char = '.';

/// A named, possibly dotted field identifying a unit of pipeline data.
///
/// `frames.scores` denotes the `scores` sub-field of `frames`. For contract
/// resolution a path is compared by its full string only: producing `frames`
/// does not imply producing `frames.scores`, and the reverse is not inferred
/// either.
///
/// # Example
/// ```
/// use framestack::data::DataPath;
///
/// let path = DataPath::new("frames.scores");
/// assert!(path.is_nested());
/// assert_eq!(path.parent(), Some(DataPath::new("frames")));
/// assert_eq!(path.segments().collect::<Vec<_>>(), vec!["frames", "scores"]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DataPath(String);

impl DataPath {
    pub fn new(path: impl Into<String>) -> Self {
        Self(path.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Iterate over the dot-separated segments.
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split(PATH_SEPARATOR)
    }

    pub fn is_nested(&self) -> bool {
        self.0.contains(PATH_SEPARATOR)
    }

    /// The enclosing path, if this path is nested.
    pub fn parent(&self) -> Option<DataPath> {
        self.0
            .rsplit_once(PATH_SEPARATOR)
            .map(|(parent, _)| DataPath::new(parent))
    }

    /// Append a child segment.
    pub fn join(&self, segment: &str) -> DataPath {
        DataPath(format!("{}{}{}", self.0, PATH_SEPARATOR, segment))
    }
}

impl fmt::Display for DataPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for DataPath {
    fn from(path: &str) -> Self {
        Self::new(path)
    }
}

impl From<String> for DataPath {
    fn from(path: String) -> Self {
        Self(path)
    }
}

impl Borrow<str> for DataPath {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for DataPath {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Build a `Vec<DataPath>` from string literals.
pub fn paths<I, S>(items: I) -> Vec<DataPath>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    items.into_iter().map(|s| DataPath::new(s)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_top_level_path_has_no_parent() {
        let path = DataPath::new("video");
        assert!(!path.is_nested());
        assert_eq!(path.parent(), None);
    }

    #[test]
    fn test_parent_of_deeply_nested_path() {
        let path = DataPath::new("metadata.source.codec");
        assert_eq!(path.parent(), Some(DataPath::new("metadata.source")));
        assert_eq!(path.segments().count(), 3);
    }

    #[test]
    fn test_join_builds_dotted_path() {
        let path = DataPath::new("frames").join("scores");
        assert_eq!(path.as_str(), "frames.scores");
    }

    #[test]
    fn test_set_membership_is_by_full_string() {
        let set: HashSet<DataPath> = paths(["frames"]).into_iter().collect();
        assert!(set.contains("frames"));
        assert!(!set.contains("frames.scores"));
    }

    #[test]
    fn test_serde_is_transparent() {
        let path: DataPath = serde_json::from_str("\"frames.scores\"").unwrap();
        assert_eq!(path, DataPath::new("frames.scores"));
        assert_eq!(serde_json::to_string(&path).unwrap(), "\"frames.scores\"");
    }
}
