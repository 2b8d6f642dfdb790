//! Filesystem abstraction and document discovery for skill vaults.
//!
//! The [`VaultAdapter`] trait is the engine's only I/O boundary. Two real
//! variants exist, a native adapter rooted at a local directory and a
//! sandboxed adapter over a host-granted directory handle, plus a stub for
//! tests. Everything above the adapter treats I/O failure as a benign
//! default, never as an error.

pub mod adapter;
pub mod cancel;
pub mod error;
pub mod handle;
pub mod native;
pub mod scanner;

pub use adapter::{
    missing_capabilities, require_capabilities, Capability, StubAdapter, VaultAdapter,
};
pub use cancel::CancelFlag;
pub use error::VaultError;
pub use handle::{DirectoryHandle, HandleAdapter};
pub use native::NativeAdapter;
pub use scanner::{scan, ScannedDoc, DOC_EXTENSION};
