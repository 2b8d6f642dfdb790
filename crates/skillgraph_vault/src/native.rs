use async_trait::async_trait;
use std::path::{Component, Path, PathBuf};
use tracing::debug;

use crate::adapter::VaultAdapter;
use crate::error::VaultError;

const TRACKING_REF: &str = "refs/heads/autogit/tracking";

/// Adapter over a local directory. Every I/O failure collapses to the
/// benign default; failures are logged at debug level only.
#[derive(Debug, Clone)]
pub struct NativeAdapter {
    root: PathBuf,
}

impl NativeAdapter {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        NativeAdapter { root: root.into() }
    }

    /// Checked constructor: fails when the root does not name a directory,
    /// so hosts surface a bad grant before scanning starts.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, VaultError> {
        let root = root.into();
        if !root.is_dir() {
            return Err(VaultError::NotADirectory { path: root });
        }
        Ok(NativeAdapter { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve a relative path inside the root. Absolute paths and paths
    /// with parent components fall outside the capability scope and resolve
    /// to `None`.
    fn resolve(&self, rel: &str) -> Option<PathBuf> {
        if rel.is_empty() {
            return Some(self.root.clone());
        }
        let candidate = Path::new(rel);
        for component in candidate.components() {
            match component {
                Component::Normal(_) => {}
                _ => return None,
            }
        }
        Some(self.root.join(candidate))
    }
}

#[async_trait]
impl VaultAdapter for NativeAdapter {
    async fn read_file(&self, path: &str) -> Option<String> {
        let full = self.resolve(path)?;
        match tokio::fs::read_to_string(&full).await {
            Ok(text) => Some(text),
            Err(err) => {
                debug!(path, %err, "read_file failed, treating as absent");
                None
            }
        }
    }

    async fn list_dir(&self, path: &str) -> Vec<String> {
        let Some(full) = self.resolve(path) else {
            return Vec::new();
        };
        let mut reader = match tokio::fs::read_dir(&full).await {
            Ok(r) => r,
            Err(err) => {
                debug!(path, %err, "list_dir failed, treating as empty");
                return Vec::new();
            }
        };
        let mut names = Vec::new();
        while let Ok(Some(entry)) = reader.next_entry().await {
            if let Some(name) = entry.file_name().to_str() {
                names.push(name.to_string());
            }
        }
        names
    }

    async fn exists(&self, path: &str) -> bool {
        match self.resolve(path) {
            Some(full) => tokio::fs::try_exists(&full).await.unwrap_or(false),
            None => false,
        }
    }

    async fn is_repo(&self) -> bool {
        tokio::fs::metadata(self.root.join(".git"))
            .await
            .map(|m| m.is_dir())
            .unwrap_or(false)
    }

    async fn has_tracking_marker(&self) -> bool {
        let loose = self.root.join(".git").join(TRACKING_REF);
        if tokio::fs::try_exists(&loose).await.unwrap_or(false) {
            return true;
        }
        // The ref may live in packed-refs instead of a loose file.
        match tokio::fs::read_to_string(self.root.join(".git").join("packed-refs")).await {
            Ok(packed) => packed.lines().any(|l| l.ends_with(TRACKING_REF)),
            Err(_) => false,
        }
    }

    async fn document_count(&self) -> u64 {
        let mut count = 0u64;
        let mut stack = vec![self.root.clone()];
        while let Some(dir) = stack.pop() {
            let mut reader = match tokio::fs::read_dir(&dir).await {
                Ok(r) => r,
                Err(_) => continue,
            };
            while let Ok(Some(entry)) = reader.next_entry().await {
                let name = entry.file_name();
                let Some(name) = name.to_str() else { continue };
                if name.starts_with('.') {
                    continue;
                }
                let Ok(file_type) = entry.file_type().await else {
                    continue;
                };
                if file_type.is_dir() {
                    stack.push(entry.path());
                } else if name.to_ascii_lowercase().ends_with(".md") {
                    count += 1;
                }
            }
        }
        count
    }
}
