//! Backing key-value store for persisted state.
//!
//! The history log lives in a single string slot, so the contract is the
//! smallest one that supports it: `get`, `set` and `delete` on string keys.
//! [`MemoryKv`] keeps everything in process; [`FjallKv`] (feature `kv`)
//! persists to disk.

mod error;
mod memory;
#[cfg(feature = "kv")]
mod store;

use async_trait::async_trait;

pub use error::KvError;
pub use memory::MemoryKv;
#[cfg(feature = "kv")]
pub use store::FjallKv;

/// Asynchronous string key-value store.
///
/// Implementations must be safe to share between tasks; callers hold them
/// behind an `Arc`.
#[async_trait]
pub trait KvBackend: Send + Sync {
    /// Read the value stored under `key`, if any.
    async fn get(&self, key: &str) -> Result<Option<String>, KvError>;

    /// Overwrite the value stored under `key`.
    async fn set(&self, key: &str, value: &str) -> Result<(), KvError>;

    /// Remove `key`. Removing a missing key is not an error.
    async fn delete(&self, key: &str) -> Result<(), KvError>;
}
