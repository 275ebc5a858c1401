//! Persistent key-value storage for session state.
//!
//! This module provides the `StorageBackend` trait plus two implementations:
//! - `FileStore`: JSON-file-backed store for real deployments
//! - `MemoryStore`: in-memory store for tests
//!
//! Every mutation is written through before it returns, so a process restart
//! immediately after any operation observes the same logical state.

pub mod file;
pub mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use anyhow::Result;

/// A string key-value store with write-through persistence semantics.
///
/// Implementations must be safe to share across tasks; reads always reflect
/// the most recent completed write.
pub trait StorageBackend: Send + Sync {
    /// Read a value. Returns `None` for absent keys.
    fn get(&self, key: &str) -> Option<String>;

    /// Write a value, durably, before returning.
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Remove a key. Removing an absent key is not an error.
    fn remove(&self, key: &str) -> Result<()>;
}
