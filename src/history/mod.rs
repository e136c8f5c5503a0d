//! Capacity-bounded log of committed payloads, most recent first.
//!
//! The whole log is one JSON array stored under [`HISTORY_KEY`] in a
//! [`KvBackend`](crate::kv::KvBackend). Entries are created only when the
//! user copies or shares a payload and are never edited afterwards; they
//! leave the log by eviction past [`HISTORY_CAPACITY`] or by [`HistoryStore::clear`].

mod clock;
mod entry;
mod error;
mod store;

pub use clock::{Clock, SystemClock};
pub use entry::HistoryEntry;
pub use error::HistoryError;
pub use store::{AppendOutcome, HISTORY_CAPACITY, HISTORY_KEY, HistoryStore};
