//! Durable backend using fjall.

use std::path::Path;

use async_trait::async_trait;
use fjall::{Keyspace, KeyspaceCreateOptions, PersistMode};

use crate::logging::{debug, error, info, trace};

use super::{KvBackend, KvError};

/// Keyspace holding the store format marker.
const META_KEYSPACE: &str = "_meta";
const META_CONFIG_KEY: &str = "config";

/// Keyspace holding the string slots.
const SLOTS_KEYSPACE: &str = "slots";

/// Current store version (1).
/// Increment this when changing the on-disk layout.
/// The store will reject opening databases with a different version.
const STORE_VERSION: u32 = 1;

/// A [`KvBackend`] persisted with fjall, an LSM-tree storage engine.
///
/// Every write is synced to disk before the call returns. fjall operations
/// are short and synchronous; they run inline on the calling task.
///
/// # Example
///
/// ```ignore
/// use qrpad::kv::{FjallKv, KvBackend};
///
/// let kv = FjallKv::open_or_init(".qrpad")?;
/// kv.set("greeting", "hello").await?;
/// assert_eq!(kv.get("greeting").await?.as_deref(), Some("hello"));
/// ```
pub struct FjallKv {
    db: fjall::Database,
    slots: Keyspace,
}

impl FjallKv {
    /// Open an existing store at the given path.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, KvError> {
        let path = path.as_ref();
        debug!(path = %path.display(), "opening store");

        if !path.exists() {
            error!(path = %path.display(), "store path does not exist");
            return Err(KvError::NotInitialized(path.display().to_string()));
        }

        let db = fjall::Database::builder(path).open()?;
        let meta = db.keyspace(META_KEYSPACE, KeyspaceCreateOptions::default)?;

        // Verify store version
        let Some(config) = meta.get(META_CONFIG_KEY)? else {
            error!(path = %path.display(), "store not initialized - no config found");
            return Err(KvError::NotInitialized(path.display().to_string()));
        };
        let version = u32::from_le_bytes(
            config
                .as_ref()
                .try_into()
                .map_err(|_| KvError::InvalidFormat("Invalid config format".to_string()))?,
        );
        if version != STORE_VERSION {
            error!(
                stored_version = version,
                expected_version = STORE_VERSION,
                "store version mismatch"
            );
            return Err(KvError::InvalidFormat(format!(
                "Store version mismatch: expected {}, got {}",
                STORE_VERSION, version
            )));
        }
        trace!(version = version, "store version verified");

        let slots = db.keyspace(SLOTS_KEYSPACE, KeyspaceCreateOptions::default)?;
        info!(path = %path.display(), "store opened");
        Ok(Self { db, slots })
    }

    /// Initialize a new store at the given path.
    pub fn init(path: impl AsRef<Path>) -> Result<Self, KvError> {
        let path = path.as_ref();
        debug!(path = %path.display(), "initializing store");

        let db = fjall::Database::builder(path).open()?;
        let meta = db.keyspace(META_KEYSPACE, KeyspaceCreateOptions::default)?;
        let slots = db.keyspace(SLOTS_KEYSPACE, KeyspaceCreateOptions::default)?;

        meta.insert(META_CONFIG_KEY, STORE_VERSION.to_le_bytes())?;
        db.persist(PersistMode::SyncAll)?;

        info!(path = %path.display(), version = STORE_VERSION, "store initialized");
        Ok(Self { db, slots })
    }

    /// Open the store if the path exists, otherwise initialize it.
    pub fn open_or_init(path: impl AsRef<Path>) -> Result<Self, KvError> {
        let path = path.as_ref();
        if path.exists() {
            Self::open(path)
        } else {
            Self::init(path)
        }
    }
}

#[async_trait]
impl KvBackend for FjallKv {
    async fn get(&self, key: &str) -> Result<Option<String>, KvError> {
        trace!(key = key, "reading slot");
        let Some(bytes) = self.slots.get(key)? else {
            return Ok(None);
        };
        let value = String::from_utf8(bytes.to_vec())
            .map_err(|e| KvError::InvalidFormat(format!("slot '{}' is not UTF-8: {}", key, e)))?;
        Ok(Some(value))
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), KvError> {
        debug!(key = key, value_len = value.len(), "writing slot");
        self.slots.insert(key, value.as_bytes())?;
        self.db.persist(PersistMode::SyncAll)?;
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), KvError> {
        debug!(key = key, "deleting slot");
        self.slots.remove(key)?;
        self.db.persist(PersistMode::SyncAll)?;
        Ok(())
    }
}
