//! QR payload codec and generation history.
//!
//! qrpad turns typed records (URL, free text, Wi-Fi credentials, contact
//! cards) into the flat text encoded in a QR symbol, turns that text back
//! into an editable record, and keeps a capacity-bounded, most-recent-first
//! log of committed payloads in a key-value slot.
//!
//! # Quick Start
//!
//! ```ignore
//! use qrpad::prelude::*;
//!
//! let record = LogicalRecord::wifi("HomeNet", "secret123");
//! let payload = encode(&record);
//! assert_eq!(payload, "WIFI:T:WPA;S:HomeNet;P:secret123;;");
//!
//! let history = HistoryStore::new(Arc::new(FjallKv::open_or_init(".qrpad")?));
//! history.append(record.kind(), &payload).await;
//! let latest = history.load().await;
//! ```
//!
//! # Modules
//!
//! - [`record`] - Typed records and their kinds
//! - [`codec`] - Record to payload and back
//! - [`history`] - Persisted history log
//! - [`kv`] - Key-value backends (in-memory, fjall with the `kv` feature)
//! - [`debounce`] - Cancellable quiescence timer
//! - [`composer`] - Editing session with debounced payload and commit actions
//! - [`render`], [`scan`], [`platform`] - Contracts with external surfaces
//! - [`config`] - TOML configuration
//!
//! # Feature Flags
//!
//! - `kv` - Durable fjall-backed store (enabled by default)
//! - `logging` - Library-level tracing (consumers provide their own subscriber)
//! - `clipboard` - System clipboard adapter
//! - `cli` - The `qrpad` command-line binary
//! - `full` - Enable all features

pub mod codec;
pub mod composer;
pub mod config;
pub mod debounce;
mod error;
pub mod history;
pub mod kv;
mod logging;
pub mod platform;
pub mod prelude;
pub mod record;
pub mod render;
pub mod scan;

pub use error::{Error, Result};

pub use codec::{decode, encode, is_empty};
pub use composer::{CommitError, Composer};
pub use config::Config;
pub use history::{AppendOutcome, HistoryEntry, HistoryStore};
pub use kv::{KvBackend, KvError, MemoryKv};
#[cfg(feature = "kv")]
pub use kv::FjallKv;
pub use record::{Field, LogicalRecord, RecordKind};
