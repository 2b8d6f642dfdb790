use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// The six adapter operations, used by the capability check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    ReadFile,
    ListDir,
    Exists,
    IsRepo,
    HasTrackingMarker,
    DocumentCount,
}

impl Capability {
    pub const ALL: [Capability; 6] = [
        Capability::ReadFile,
        Capability::ListDir,
        Capability::Exists,
        Capability::IsRepo,
        Capability::HasTrackingMarker,
        Capability::DocumentCount,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Capability::ReadFile => "read_file",
            Capability::ListDir => "list_dir",
            Capability::Exists => "exists",
            Capability::IsRepo => "is_repo",
            Capability::HasTrackingMarker => "has_tracking_marker",
            Capability::DocumentCount => "document_count",
        }
    }
}

/// Abstract filesystem operations over a rooted tree.
///
/// Contract: every operation fails to a benign default instead of
/// propagating an error: `None`, an empty list, `false`, or `0`. Paths are
/// relative to the adapter's root with `/` separators; the empty path is the
/// root itself. `list_dir` never recurses, and hidden entries (leading `.`)
/// are filtered by consumers, not here.
#[async_trait]
pub trait VaultAdapter: Send + Sync {
    /// Text contents of a file, or `None` when absent or unreadable.
    async fn read_file(&self, path: &str) -> Option<String>;

    /// Immediate entry names of a directory; empty when the path is not a
    /// listable directory.
    async fn list_dir(&self, path: &str) -> Vec<String>;

    /// Whether the path names an existing entry.
    async fn exists(&self, path: &str) -> bool;

    /// Whether the root carries a version-control marker.
    async fn is_repo(&self) -> bool;

    /// Whether the root carries the change-tracking marker. Its semantics
    /// belong to the host; the health reporter only needs presence.
    async fn has_tracking_marker(&self) -> bool;

    /// Number of documents under the root.
    async fn document_count(&self) -> u64;

    /// The operations this adapter actually provides. A partially granted
    /// sandbox handle overrides this; full adapters keep the default.
    fn capabilities(&self) -> Vec<Capability> {
        Capability::ALL.to_vec()
    }
}

#[async_trait]
impl VaultAdapter for Box<dyn VaultAdapter> {
    async fn read_file(&self, path: &str) -> Option<String> {
        (**self).read_file(path).await
    }
    async fn list_dir(&self, path: &str) -> Vec<String> {
        (**self).list_dir(path).await
    }
    async fn exists(&self, path: &str) -> bool {
        (**self).exists(path).await
    }
    async fn is_repo(&self) -> bool {
        (**self).is_repo().await
    }
    async fn has_tracking_marker(&self) -> bool {
        (**self).has_tracking_marker().await
    }
    async fn document_count(&self) -> u64 {
        (**self).document_count().await
    }
    fn capabilities(&self) -> Vec<Capability> {
        (**self).capabilities()
    }
}

/// Report which of the six operations a candidate adapter is missing, so the
/// host can fail cleanly before the pipeline runs.
pub fn missing_capabilities(adapter: &dyn VaultAdapter) -> Vec<Capability> {
    let granted = adapter.capabilities();
    Capability::ALL
        .iter()
        .copied()
        .filter(|c| !granted.contains(c))
        .collect()
}

/// Error variant of the capability check for hosts that want a hard stop.
pub fn require_capabilities(adapter: &dyn VaultAdapter) -> Result<(), crate::error::VaultError> {
    let missing = missing_capabilities(adapter);
    if missing.is_empty() {
        Ok(())
    } else {
        Err(crate::error::VaultError::MissingCapabilities { missing })
    }
}

/// Adapter that returns every benign default. Used by tests and as the
/// engine's null object.
#[derive(Debug, Clone, Copy, Default)]
pub struct StubAdapter;

#[async_trait]
impl VaultAdapter for StubAdapter {
    async fn read_file(&self, _path: &str) -> Option<String> {
        None
    }
    async fn list_dir(&self, _path: &str) -> Vec<String> {
        Vec::new()
    }
    async fn exists(&self, _path: &str) -> bool {
        false
    }
    async fn is_repo(&self) -> bool {
        false
    }
    async fn has_tracking_marker(&self) -> bool {
        false
    }
    async fn document_count(&self) -> u64 {
        0
    }
}
