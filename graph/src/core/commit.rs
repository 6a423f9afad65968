use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// Parent list; almost every commit has one or two.
pub type Parents = SmallVec<[String; 2]>;

/// A commit record as handed over by the history query, in log order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Commit {
    /// Unique commit ID (SHA)
    pub sha: String,
    /// Parent commit IDs, first parent is the primary lineage
    #[serde(default)]
    pub parents: Parents,
    /// Whether HEAD points at this commit
    #[serde(default)]
    pub is_current_head: bool,
    /// Seed merged state (reachable from the highlighted mainline)
    #[serde(default)]
    pub is_merged: bool,
}

impl Commit {
    pub fn new<I, S>(sha: impl Into<String>, parents: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            sha: sha.into(),
            parents: parents.into_iter().map(Into::into).collect(),
            is_current_head: false,
            is_merged: false,
        }
    }

    /// Mark this commit as HEAD. HEAD is always part of the mainline.
    pub fn head(mut self) -> Self {
        self.is_current_head = true;
        self.is_merged = true;
        self
    }

    pub fn merged(mut self, is_merged: bool) -> Self {
        self.is_merged = is_merged;
        self
    }

    /// Check if this is a root commit (no parents)
    pub fn is_root(&self) -> bool {
        self.parents.is_empty()
    }

    /// Check if this is a merge commit (multiple parents)
    pub fn is_merge(&self) -> bool {
        self.parents.len() > 1
    }

    pub fn first_parent(&self) -> Option<&str> {
        self.parents.first().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_flags() {
        let c = Commit::new("c2", ["c1"]).head();
        assert!(c.is_current_head);
        assert!(c.is_merged);
        assert_eq!(c.first_parent(), Some("c1"));
        assert!(!c.is_root());
        assert!(!c.is_merge());
    }

    #[test]
    fn deserialize_with_defaults() {
        let c: Commit = serde_json::from_str(r#"{"sha":"m","parents":["a","b"]}"#).unwrap();
        assert!(c.is_merge());
        assert!(!c.is_current_head);
        assert!(!c.is_merged);

        let root: Commit = serde_json::from_str(r#"{"sha":"r"}"#).unwrap();
        assert!(root.is_root());
    }
}
