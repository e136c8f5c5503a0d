//! Error types for the history module.

use thiserror::Error;

use crate::kv::KvError;

/// Recoverable history failures.
///
/// These are surfaced by [`HistoryStore::try_load`](super::HistoryStore::try_load)
/// only; the public append/load/clear paths log them and carry on.
#[derive(Error, Debug)]
pub enum HistoryError {
    #[error("History storage failed: {0}")]
    Storage(#[from] KvError),

    #[error("Stored history is corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),
}
