use async_trait::async_trait;
use std::collections::{BTreeMap, BTreeSet};

use crate::adapter::{Capability, VaultAdapter};

/// A capability-scoped snapshot of a directory subtree granted by the host.
///
/// This is the sandboxed counterpart of [`crate::NativeAdapter`]: the host
/// (a browser shell holding a directory-handle grant, or a test) materializes
/// the subtree it is willing to expose as `path → contents` pairs, plus the
/// repo/tracking marker facts the engine cannot probe for itself from inside
/// the sandbox.
#[derive(Debug, Clone, Default)]
pub struct DirectoryHandle {
    files: BTreeMap<String, String>,
    repo: bool,
    tracking: bool,
}

impl DirectoryHandle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a file at a `/`-separated path relative to the grant root.
    pub fn with_file(mut self, path: impl Into<String>, contents: impl Into<String>) -> Self {
        self.files.insert(path.into(), contents.into());
        self
    }

    pub fn with_repo_marker(mut self, present: bool) -> Self {
        self.repo = present;
        self
    }

    pub fn with_tracking_marker(mut self, present: bool) -> Self {
        self.tracking = present;
        self
    }
}

/// Adapter over a [`DirectoryHandle`]. The grant may be partial: operations
/// the host withheld report their benign default and show up in the
/// capability check.
#[derive(Debug, Clone)]
pub struct HandleAdapter {
    handle: DirectoryHandle,
    granted: BTreeSet<Capability>,
}

impl HandleAdapter {
    /// A fully granted handle.
    pub fn new(handle: DirectoryHandle) -> Self {
        HandleAdapter {
            handle,
            granted: Capability::ALL.into_iter().collect(),
        }
    }

    /// A handle restricted to the given operations.
    pub fn restricted(handle: DirectoryHandle, granted: &[Capability]) -> Self {
        HandleAdapter {
            handle,
            granted: granted.iter().copied().collect(),
        }
    }

    fn has(&self, cap: Capability) -> bool {
        self.granted.contains(&cap)
    }
}

#[async_trait]
impl VaultAdapter for HandleAdapter {
    async fn read_file(&self, path: &str) -> Option<String> {
        if !self.has(Capability::ReadFile) {
            return None;
        }
        self.handle.files.get(path).cloned()
    }

    async fn list_dir(&self, path: &str) -> Vec<String> {
        if !self.has(Capability::ListDir) {
            return Vec::new();
        }
        let prefix = if path.is_empty() {
            String::new()
        } else {
            format!("{path}/")
        };
        let mut names = BTreeSet::new();
        for key in self.handle.files.keys() {
            let Some(rest) = key.strip_prefix(&prefix) else {
                continue;
            };
            if rest.is_empty() {
                continue;
            }
            // The first path segment below the prefix, file or directory.
            let segment = rest.split('/').next().unwrap_or(rest);
            names.insert(segment.to_string());
        }
        names.into_iter().collect()
    }

    async fn exists(&self, path: &str) -> bool {
        if !self.has(Capability::Exists) {
            return false;
        }
        if path.is_empty() {
            // The grant root itself.
            return true;
        }
        if self.handle.files.contains_key(path) {
            return true;
        }
        let dir_prefix = format!("{path}/");
        self.handle.files.keys().any(|k| k.starts_with(&dir_prefix))
    }

    async fn is_repo(&self) -> bool {
        self.has(Capability::IsRepo) && self.handle.repo
    }

    async fn has_tracking_marker(&self) -> bool {
        self.has(Capability::HasTrackingMarker) && self.handle.tracking
    }

    async fn document_count(&self) -> u64 {
        if !self.has(Capability::DocumentCount) {
            return 0;
        }
        self.handle
            .files
            .keys()
            .filter(|k| {
                let hidden = k.split('/').any(|seg| seg.starts_with('.'));
                !hidden && k.to_ascii_lowercase().ends_with(".md")
            })
            .count() as u64
    }

    fn capabilities(&self) -> Vec<Capability> {
        self.granted.iter().copied().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::missing_capabilities;

    fn sample() -> DirectoryHandle {
        DirectoryHandle::new()
            .with_file("a.md", "alpha")
            .with_file("skills/b.md", "beta")
            .with_file("skills/deep/c.md", "gamma")
            .with_file("skills/notes.txt", "text")
            .with_file(".obsidian/config", "{}")
    }

    #[tokio::test]
    async fn lists_immediate_children_only() {
        let adapter = HandleAdapter::new(sample());
        assert_eq!(
            adapter.list_dir("").await,
            vec![".obsidian", "a.md", "skills"]
        );
        assert_eq!(
            adapter.list_dir("skills").await,
            vec!["b.md", "deep", "notes.txt"]
        );
        assert_eq!(adapter.list_dir("skills/deep").await, vec!["c.md"]);
        assert!(adapter.list_dir("missing").await.is_empty());
    }

    #[tokio::test]
    async fn reads_and_existence() {
        let adapter = HandleAdapter::new(sample());
        assert_eq!(adapter.read_file("skills/b.md").await.as_deref(), Some("beta"));
        assert_eq!(adapter.read_file("skills").await, None);
        assert!(adapter.exists("skills").await);
        assert!(adapter.exists("skills/deep/c.md").await);
        assert!(!adapter.exists("skills/deep/missing.md").await);
    }

    #[tokio::test]
    async fn counts_skip_hidden_segments() {
        let handle = sample().with_file(".trash/old.md", "x");
        let adapter = HandleAdapter::new(handle);
        assert_eq!(adapter.document_count().await, 3);
    }

    #[tokio::test]
    async fn markers_come_from_the_grant() {
        let adapter = HandleAdapter::new(sample().with_repo_marker(true));
        assert!(adapter.is_repo().await);
        assert!(!adapter.has_tracking_marker().await);
    }

    #[tokio::test]
    async fn restricted_grant_reports_missing_ops() {
        let adapter = HandleAdapter::restricted(
            sample(),
            &[Capability::ReadFile, Capability::ListDir, Capability::Exists],
        );
        let missing = missing_capabilities(&adapter);
        assert_eq!(
            missing,
            vec![
                Capability::IsRepo,
                Capability::HasTrackingMarker,
                Capability::DocumentCount
            ]
        );
        // Withheld operations still answer, with the benign default.
        assert!(!adapter.is_repo().await);
        assert_eq!(adapter.document_count().await, 0);

        assert!(crate::adapter::require_capabilities(&adapter).is_err());
        assert!(crate::adapter::require_capabilities(&HandleAdapter::new(sample())).is_ok());
    }
}
