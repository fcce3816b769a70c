//! Field-path normalization.
//!
//! Callers describe what they want as flat dot-separated paths
//! (`"data.frameStart"`, `"tasks"`). The normalizer turns those into a nested
//! tree where each segment is a key and a leaf marks "select this field as-is".

use indexmap::IndexMap;

/// One entry in a [`FieldTree`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldEntry {
    /// Terminal field: select it without sub-selections.
    Leaf,
    /// Field with explicit sub-selections.
    Nested(FieldTree),
}

/// Nested, insertion-ordered mapping of requested fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldTree {
    entries: IndexMap<String, FieldEntry>,
}

impl FieldTree {
    /// Create an empty tree.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if no fields were requested.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldEntry)> {
        self.entries.iter().map(|(name, entry)| (name.as_str(), entry))
    }

    /// Insert one dotted path into the tree.
    ///
    /// A leaf always wins over a longer path sharing its prefix: inserting
    /// below an existing leaf is ignored, and inserting a leaf over an
    /// existing subtree replaces the subtree.
    pub fn insert_path(&mut self, path: &str) {
        let mut segments = path.split('.').filter(|segment| !segment.is_empty());
        let Some(first) = segments.next() else {
            return;
        };
        self.insert_segments(first, segments);
    }

    fn insert_segments<'a>(
        &mut self,
        segment: &'a str,
        mut rest: impl Iterator<Item = &'a str>,
    ) {
        match rest.next() {
            None => {
                self.entries.insert(segment.to_string(), FieldEntry::Leaf);
            }
            Some(next) => {
                let entry = self
                    .entries
                    .entry(segment.to_string())
                    .or_insert_with(|| FieldEntry::Nested(FieldTree::new()));
                match entry {
                    // Already selected as a scalar leaf; deeper paths lose.
                    FieldEntry::Leaf => {}
                    FieldEntry::Nested(subtree) => subtree.insert_segments(next, rest),
                }
            }
        }
    }

    /// Flatten back to dotted paths, in tree order.
    #[must_use]
    pub fn flatten(&self) -> Vec<String> {
        let mut out = Vec::new();
        self.flatten_into("", &mut out);
        out
    }

    fn flatten_into(&self, prefix: &str, out: &mut Vec<String>) {
        for (name, entry) in &self.entries {
            let path = if prefix.is_empty() {
                name.clone()
            } else {
                format!("{prefix}.{name}")
            };
            match entry {
                FieldEntry::Leaf => out.push(path),
                FieldEntry::Nested(subtree) => subtree.flatten_into(&path, out),
            }
        }
    }
}

/// Normalize a flat list of dotted field paths into a [`FieldTree`].
pub fn fields_to_tree<I, S>(fields: I) -> FieldTree
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut tree = FieldTree::new();
    for field in fields {
        tree.insert_path(field.as_ref());
    }
    tree
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_nested_tree() {
        let tree = fields_to_tree(["name", "data.frameStart", "data.frameEnd"]);
        let paths = tree.flatten();
        assert_eq!(paths, vec!["name", "data.frameStart", "data.frameEnd"]);
    }

    #[test]
    fn leaf_wins_over_longer_path_when_leaf_first() {
        let tree = fields_to_tree(["data", "data.frameStart"]);
        assert_eq!(tree.flatten(), vec!["data"]);
    }

    #[test]
    fn leaf_wins_over_longer_path_when_leaf_last() {
        let tree = fields_to_tree(["data.frameStart", "data"]);
        assert_eq!(tree.flatten(), vec!["data"]);
    }

    #[test]
    fn normalization_is_idempotent() {
        let tree = fields_to_tree(["name", "data.group", "attrib.fps", "data"]);
        let again = fields_to_tree(tree.flatten());
        assert_eq!(again, tree);
    }

    #[test]
    fn empty_segments_are_skipped() {
        let tree = fields_to_tree([""]);
        assert!(tree.is_empty());
    }
}
