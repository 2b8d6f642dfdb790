use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::adapter::VaultAdapter;
use crate::cancel::CancelFlag;

/// Document file extension, matched case-insensitively.
pub const DOC_EXTENSION: &str = ".md";

/// One discovered document: path relative to the scan root plus its text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScannedDoc {
    pub rel_path: String,
    pub text: String,
}

/// Recursively enumerate the root and read every document.
///
/// Hidden entries (leading `.`) are skipped. Directories are detected by
/// calling `list_dir` and observing a non-empty result. The adapter has no
/// `is_dir`; the cost is one extra call per non-document entry and the
/// adapter surface stays minimal. Entries are visited in sorted order so the
/// output sequence is deterministic for a given adapter snapshot.
///
/// Cancellation is checked before each adapter call; a cancelled scan
/// returns the documents gathered so far.
pub async fn scan(adapter: &dyn VaultAdapter, cancel: &CancelFlag) -> Vec<ScannedDoc> {
    let mut docs = Vec::new();
    if cancel.is_cancelled() {
        return docs;
    }

    // Depth-first over (dir_path, sorted entries); subdirectories are pushed
    // in reverse so they pop in lexicographic order.
    let root_entries = sorted(adapter.list_dir("").await);
    let mut stack = vec![(String::new(), root_entries)];

    while let Some((dir, entries)) = stack.pop() {
        let mut subdirs = Vec::new();
        for name in entries {
            if name.starts_with('.') {
                continue;
            }
            let full = join(&dir, &name);
            if name.to_ascii_lowercase().ends_with(DOC_EXTENSION) {
                if cancel.is_cancelled() {
                    return docs;
                }
                match adapter.read_file(&full).await {
                    Some(text) => docs.push(ScannedDoc {
                        rel_path: full,
                        text,
                    }),
                    None => debug!(path = %full, "unreadable document skipped"),
                }
            } else {
                if cancel.is_cancelled() {
                    return docs;
                }
                let children = adapter.list_dir(&full).await;
                if !children.is_empty() {
                    subdirs.push((full, sorted(children)));
                }
            }
        }
        for sub in subdirs.into_iter().rev() {
            stack.push(sub);
        }
    }

    docs
}

fn join(dir: &str, name: &str) -> String {
    if dir.is_empty() {
        name.to_string()
    } else {
        format!("{dir}/{name}")
    }
}

fn sorted(mut names: Vec<String>) -> Vec<String> {
    names.sort();
    names
}
