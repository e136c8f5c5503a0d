//! History store over a single key-value slot.

use std::sync::Arc;

use tokio::sync::Mutex;

use crate::codec;
use crate::kv::KvBackend;
use crate::logging::{debug, info, trace, warn};
use crate::record::{LogicalRecord, RecordKind};

use super::clock::{Clock, SystemClock};
use super::entry::HistoryEntry;
use super::error::HistoryError;

/// Maximum number of entries kept; older ones are evicted on append.
pub const HISTORY_CAPACITY: usize = 50;

/// Slot holding the serialized log.
pub const HISTORY_KEY: &str = "qr_history";

/// What [`HistoryStore::append`] did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppendOutcome {
    /// A new entry was prepended and the log persisted.
    Inserted(HistoryEntry),
    /// The payload decodes to an empty record.
    SkippedEmpty,
    /// The payload equals the most recent entry's payload.
    SkippedDuplicate,
    /// Reading or writing the backing store failed; nothing was persisted.
    PersistFailed,
}

/// Most-recent-first history log, persisted through an injected backend.
///
/// Appends run as one read-modify-write under an in-process lock, so
/// overlapping appends from the same process never lose entries.
///
/// # Example
///
/// ```ignore
/// use std::sync::Arc;
/// use qrpad::history::HistoryStore;
/// use qrpad::kv::MemoryKv;
/// use qrpad::RecordKind;
///
/// let history = HistoryStore::new(Arc::new(MemoryKv::new()));
/// history.append(RecordKind::Url, "https://example.com").await;
/// let entries = history.load().await;
/// ```
pub struct HistoryStore {
    backend: Arc<dyn KvBackend>,
    clock: Arc<dyn Clock>,
    write_lock: Mutex<()>,
}

impl HistoryStore {
    /// Create a store using wall-clock time.
    pub fn new(backend: Arc<dyn KvBackend>) -> Self {
        Self::with_clock(backend, Arc::new(SystemClock))
    }

    pub fn with_clock(backend: Arc<dyn KvBackend>, clock: Arc<dyn Clock>) -> Self {
        Self {
            backend,
            clock,
            write_lock: Mutex::new(()),
        }
    }

    /// Record a committed payload.
    ///
    /// Never fails: persistence errors are logged and reported as
    /// [`AppendOutcome::PersistFailed`]. A corrupt log is replaced by one
    /// holding just the new entry; an unreadable backend is left alone. Only the most recent entry is
    /// checked for duplicates; the same payload can reappear once something
    /// else was appended in between.
    pub async fn append(&self, kind: RecordKind, payload: &str) -> AppendOutcome {
        if codec::is_empty(&codec::decode(payload, kind)) {
            trace!(kind = %kind, "skipping empty payload");
            return AppendOutcome::SkippedEmpty;
        }

        let _guard = self.write_lock.lock().await;

        let mut entries = match self.try_load().await {
            Ok(entries) => entries,
            // an undecodable log holds nothing recoverable; start over
            Err(HistoryError::Corrupt(e)) => {
                warn!(error = %e, "history blob is corrupt, replacing it");
                Vec::new()
            }
            Err(e) => {
                warn!(error = %e, "could not read history, skipping append");
                return AppendOutcome::PersistFailed;
            }
        };

        if entries.first().is_some_and(|head| head.payload == payload) {
            debug!(kind = %kind, "payload matches most recent entry");
            return AppendOutcome::SkippedDuplicate;
        }

        let now = self.clock.now();
        let mut id = now.timestamp_millis();
        if let Some(head) = entries.first()
            && id <= head.id
        {
            id = head.id + 1;
        }

        let entry = HistoryEntry::new(id, kind, payload, now);
        entries.insert(0, entry.clone());
        entries.truncate(HISTORY_CAPACITY);

        if let Err(e) = self.persist(&entries).await {
            warn!(error = %e, "could not persist history");
            return AppendOutcome::PersistFailed;
        }

        debug!(id = id, kind = %kind, len = entries.len(), "history entry appended");
        AppendOutcome::Inserted(entry)
    }

    /// Read the log, most recent first.
    ///
    /// A missing, unreadable or corrupt log yields an empty list.
    pub async fn load(&self) -> Vec<HistoryEntry> {
        match self.try_load().await {
            Ok(entries) => entries,
            Err(e) => {
                warn!(error = %e, "history unavailable, treating as empty");
                Vec::new()
            }
        }
    }

    /// Read the log, surfacing storage and decoding failures.
    pub async fn try_load(&self) -> Result<Vec<HistoryEntry>, HistoryError> {
        let Some(blob) = self.backend.get(HISTORY_KEY).await? else {
            return Ok(Vec::new());
        };
        let entries: Vec<HistoryEntry> = serde_json::from_str(&blob)?;
        trace!(len = entries.len(), "history loaded");
        Ok(entries)
    }

    /// Remove the whole log.
    pub async fn clear(&self) {
        let _guard = self.write_lock.lock().await;
        match self.backend.delete(HISTORY_KEY).await {
            Ok(()) => {
                info!("history cleared");
            }
            Err(e) => {
                warn!(error = %e, "could not clear history");
            }
        }
    }

    /// Find an entry by id.
    pub async fn find(&self, id: i64) -> Option<HistoryEntry> {
        self.load().await.into_iter().find(|entry| entry.id == id)
    }

    /// Decode an entry back into the record it was generated from.
    pub fn select_for_recall(&self, entry: &HistoryEntry) -> LogicalRecord {
        codec::decode(&entry.payload, entry.kind)
    }

    async fn persist(&self, entries: &[HistoryEntry]) -> Result<(), HistoryError> {
        let blob = serde_json::to_string(entries)?;
        self.backend.set(HISTORY_KEY, &blob).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kv::MemoryKv;
    use chrono::{DateTime, TimeZone, Utc};

    struct FixedClock(DateTime<Utc>);

    impl Clock for FixedClock {
        fn now(&self) -> DateTime<Utc> {
            self.0
        }
    }

    fn fixed_store() -> (Arc<MemoryKv>, HistoryStore) {
        let kv = Arc::new(MemoryKv::new());
        let clock = Arc::new(FixedClock(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()));
        let store = HistoryStore::with_clock(kv.clone(), clock);
        (kv, store)
    }

    #[tokio::test]
    async fn test_same_millisecond_ids_stay_unique() {
        let (_, store) = fixed_store();
        store.append(RecordKind::Text, "one").await;
        store.append(RecordKind::Text, "two").await;
        store.append(RecordKind::Text, "three").await;

        let ids: Vec<i64> = store.load().await.iter().map(|e| e.id).collect();
        let base = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap().timestamp_millis();
        assert_eq!(ids, vec![base + 2, base + 1, base]);
    }

    #[tokio::test]
    async fn test_empty_wifi_payload_is_skipped() {
        let (kv, store) = fixed_store();
        let outcome = store.append(RecordKind::Wifi, "WIFI:T:WPA;S:;P:secret;;").await;
        assert_eq!(outcome, AppendOutcome::SkippedEmpty);
        assert!(kv.is_empty().await);
    }

    #[tokio::test]
    async fn test_corrupt_blob_is_replaced_on_append() {
        let (kv, store) = fixed_store();
        kv.set(HISTORY_KEY, "{not json").await.unwrap();

        assert!(store.load().await.is_empty());
        assert!(matches!(
            store.try_load().await,
            Err(HistoryError::Corrupt(_))
        ));

        let outcome = store.append(RecordKind::Url, "https://example.com").await;
        assert!(matches!(outcome, AppendOutcome::Inserted(_)));
        store.append(RecordKind::Url, "https://example.org").await;
        store.append(RecordKind::Url, "https://example.net").await;

        let payloads: Vec<String> = store.load().await.into_iter().map(|e| e.payload).collect();
        assert_eq!(
            payloads,
            vec![
                "https://example.net",
                "https://example.org",
                "https://example.com"
            ]
        );
    }

    #[tokio::test]
    async fn test_select_for_recall_decodes_entry() {
        let (_, store) = fixed_store();
        let AppendOutcome::Inserted(entry) = store
            .append(RecordKind::Wifi, "WIFI:T:WPA;S:HomeNet;P:secret123;;")
            .await
        else {
            panic!("expected insert");
        };
        assert_eq!(
            store.select_for_recall(&entry),
            LogicalRecord::wifi("HomeNet", "secret123")
        );
        assert_eq!(store.find(entry.id).await, Some(entry));
    }
}
