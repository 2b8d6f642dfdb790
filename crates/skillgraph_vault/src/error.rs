use std::path::PathBuf;
use thiserror::Error;

use crate::adapter::Capability;

/// Host-facing setup errors. These can only occur before a pipeline runs;
/// once an adapter is handed to the engine, every failure collapses to the
/// benign defaults of the adapter contract.
#[derive(Debug, Error)]
pub enum VaultError {
    /// The native adapter root does not name a directory.
    #[error("not a directory: {}", path.display())]
    NotADirectory { path: PathBuf },

    /// A candidate adapter does not provide all six operations.
    #[error("adapter is missing required operations: {}", format_capabilities(missing))]
    MissingCapabilities { missing: Vec<Capability> },
}

fn format_capabilities(caps: &[Capability]) -> String {
    caps.iter()
        .map(|c| c.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}
