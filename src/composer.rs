//! Active-edit session: the record being edited, its debounced payload, and
//! the commit actions (copy, share) that feed the history.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use thiserror::Error;
use tokio::sync::watch;

use crate::codec;
use crate::debounce::Debouncer;
use crate::history::{AppendOutcome, HistoryEntry, HistoryStore};
use crate::logging::{debug, warn};
use crate::platform::{Clipboard, PlatformError, ShareSurface};
use crate::record::{Field, LogicalRecord, RecordKind};
use crate::render::{RenderError, RenderRequest, RenderStyle, SymbolRenderer};

/// Errors from a commit action.
///
/// None of these are fatal; the session stays usable after any of them.
#[derive(Error, Debug)]
pub enum CommitError {
    /// The record is empty; the action should not have been offered.
    #[error("Nothing to commit: the record is empty")]
    ValidationEmpty,

    #[error(transparent)]
    Render(#[from] RenderError),

    #[error(transparent)]
    Platform(#[from] PlatformError),
}

/// Editing session for one record.
///
/// Edits recompute the payload after the debounce window and publish it on
/// the channel returned by [`Composer::new`]; kind switches and recalls
/// publish immediately. Must be used from within a tokio runtime.
pub struct Composer {
    record: LogicalRecord,
    debouncer: Debouncer,
    payload_tx: watch::Sender<String>,
    /// Bumped on every publish or schedule; a debounced job only publishes
    /// if no newer one happened since it was scheduled.
    generation: Arc<AtomicU64>,
}

impl Composer {
    pub fn new(kind: RecordKind, window: Duration) -> (Self, watch::Receiver<String>) {
        let record = LogicalRecord::empty(kind);
        let (payload_tx, payload_rx) = watch::channel(codec::encode(&record));
        let composer = Self {
            record,
            debouncer: Debouncer::new(window),
            payload_tx,
            generation: Arc::new(AtomicU64::new(0)),
        };
        (composer, payload_rx)
    }

    pub fn record(&self) -> &LogicalRecord {
        &self.record
    }

    pub fn kind(&self) -> RecordKind {
        self.record.kind()
    }

    /// Switch to another kind, clearing every field.
    pub fn set_kind(&mut self, kind: RecordKind) {
        self.record = LogicalRecord::empty(kind);
        self.flush();
    }

    /// Update one field of the active record.
    ///
    /// Returns `false` if the field does not belong to the active kind.
    pub fn set_field(&mut self, field: Field, value: impl Into<String>) -> bool {
        if !self.record.set_field(field, value) {
            return false;
        }
        self.schedule_recompute();
        true
    }

    /// Apply an arbitrary edit that keeps the record's kind.
    pub fn edit<F>(&mut self, f: F)
    where
        F: FnOnce(&mut LogicalRecord),
    {
        let kind = self.record.kind();
        f(&mut self.record);
        if self.record.kind() != kind {
            // a kind change must go through set_kind so stale fields are dropped
            warn!(from = %kind, to = %self.record.kind(), "edit changed record kind");
            self.record = LogicalRecord::empty(self.record.kind());
        }
        self.schedule_recompute();
    }

    /// Load a history entry into the editor.
    pub fn recall(&mut self, history: &HistoryStore, entry: &HistoryEntry) {
        self.record = history.select_for_recall(entry);
        debug!(id = entry.id, kind = %entry.kind, "recalled history entry");
        self.flush();
    }

    /// Recompute and publish now, discarding any pending recompute.
    pub fn flush(&mut self) {
        self.debouncer.cancel();
        self.generation.fetch_add(1, Ordering::SeqCst);
        self.payload_tx.send_replace(codec::encode(&self.record));
    }

    /// Payload of the record as it is right now.
    pub fn payload(&self) -> String {
        codec::encode(&self.record)
    }

    /// Whether commit actions and rendering should be offered.
    pub fn can_commit(&self) -> bool {
        !codec::is_empty(&self.record)
    }

    /// Copy the payload to the clipboard, then record it in history.
    pub async fn copy(
        &self,
        clipboard: &dyn Clipboard,
        history: &HistoryStore,
    ) -> Result<AppendOutcome, CommitError> {
        if !self.can_commit() {
            return Err(CommitError::ValidationEmpty);
        }
        let payload = self.payload();
        clipboard.copy(&payload)?;
        Ok(history.append(self.kind(), &payload).await)
    }

    /// Render the symbol, hand it to the share sheet, then record it in
    /// history. A failed share is reported and not retried; history is left
    /// untouched in that case.
    pub async fn share(
        &self,
        renderer: &dyn SymbolRenderer,
        style: &RenderStyle,
        sharer: &dyn ShareSurface,
        history: &HistoryStore,
    ) -> Result<AppendOutcome, CommitError> {
        if !self.can_commit() {
            return Err(CommitError::ValidationEmpty);
        }
        let payload = self.payload();
        let request = RenderRequest::new(payload.clone(), style.clone())?;
        let symbol = renderer.render(&request)?;

        if let Err(e) = sharer.share(&symbol.to_base64(), &symbol.mime).await {
            warn!(error = %e, "share failed");
            return Err(e.into());
        }
        Ok(history.append(self.kind(), &payload).await)
    }

    fn schedule_recompute(&mut self) {
        let record = self.record.clone();
        let tx = self.payload_tx.clone();
        let generation = self.generation.clone();
        let scheduled = generation.fetch_add(1, Ordering::SeqCst) + 1;
        self.debouncer.schedule(async move {
            let payload = codec::encode(&record);
            // checked under the channel lock so a concurrent flush always wins
            tx.send_if_modified(|current| {
                if generation.load(Ordering::SeqCst) != scheduled {
                    return false;
                }
                *current = payload;
                true
            });
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::debounce::DEFAULT_DEBOUNCE;

    #[tokio::test(start_paused = true)]
    async fn test_edits_publish_after_quiet_period() {
        let (mut composer, rx) = Composer::new(RecordKind::Url, DEFAULT_DEBOUNCE);
        assert_eq!(*rx.borrow(), "");

        composer.set_field(Field::Text, "https://ex");
        tokio::time::sleep(Duration::from_millis(100)).await;
        composer.set_field(Field::Text, "https://example.com");
        tokio::time::sleep(Duration::from_millis(250)).await;
        assert_eq!(*rx.borrow(), "");

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(*rx.borrow(), "https://example.com");
    }

    #[tokio::test(start_paused = true)]
    async fn test_set_kind_clears_fields_and_publishes() {
        let (mut composer, rx) = Composer::new(RecordKind::Wifi, DEFAULT_DEBOUNCE);
        composer.set_field(Field::Ssid, "HomeNet");
        composer.set_kind(RecordKind::Contact);

        assert_eq!(composer.record(), &LogicalRecord::empty(RecordKind::Contact));
        assert!(!composer.can_commit());
        assert_eq!(
            *rx.borrow(),
            "BEGIN:VCARD\nVERSION:3.0\nFN:\nTEL:\nEMAIL:\nEND:VCARD"
        );

        // the pending wifi recompute must not overwrite the contact payload
        tokio::time::sleep(Duration::from_secs(1)).await;
        assert!(rx.borrow().starts_with("BEGIN:VCARD"));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_stale_recompute_never_overrides_kind_switch() {
        let (mut composer, rx) = Composer::new(RecordKind::Text, Duration::from_millis(1));
        let empty_contact = codec::encode(&LogicalRecord::empty(RecordKind::Contact));

        for i in 0..200 {
            composer.set_kind(RecordKind::Text);
            composer.set_field(Field::Text, format!("draft-{}", i));
            // let the job reach its publish on another worker
            std::thread::sleep(Duration::from_millis(1));
            composer.set_kind(RecordKind::Contact);

            tokio::time::sleep(Duration::from_millis(3)).await;
            assert_eq!(*rx.borrow(), empty_contact);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_recompute_uses_record_at_schedule_time() {
        let (mut composer, rx) = Composer::new(RecordKind::Wifi, DEFAULT_DEBOUNCE);
        composer.set_field(Field::Ssid, "HomeNet");
        composer.set_field(Field::Password, "secret123");
        assert_eq!(*rx.borrow(), "WIFI:T:WPA;S:;P:;;");
        assert_eq!(composer.payload(), "WIFI:T:WPA;S:HomeNet;P:secret123;;");

        tokio::time::sleep(DEFAULT_DEBOUNCE + Duration::from_millis(1)).await;
        assert_eq!(*rx.borrow(), "WIFI:T:WPA;S:HomeNet;P:secret123;;");
    }

    #[tokio::test]
    async fn test_field_of_other_kind_is_rejected() {
        let (mut composer, _rx) = Composer::new(RecordKind::Text, DEFAULT_DEBOUNCE);
        assert!(!composer.set_field(Field::Email, "a@b.c"));
        assert!(composer.set_field(Field::Text, "note"));
        assert_eq!(composer.payload(), "note");
    }
}
