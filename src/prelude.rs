//! Convenient re-exports for common usage patterns.
//!
//! ```ignore
//! use qrpad::prelude::*;
//!
//! let payload = encode(&LogicalRecord::wifi("HomeNet", "secret123"));
//! let history = HistoryStore::new(Arc::new(MemoryKv::new()));
//! history.append(RecordKind::Wifi, &payload).await;
//! ```

pub use crate::error::{Error, Result};

pub use crate::codec::{decode, encode, is_empty};
pub use crate::record::{Field, LogicalRecord, RecordKind};

pub use crate::composer::{CommitError, Composer};
pub use crate::debounce::{DEFAULT_DEBOUNCE, Debouncer};
pub use crate::history::{AppendOutcome, HistoryEntry, HistoryStore};

#[cfg(feature = "kv")]
pub use crate::kv::FjallKv;
pub use crate::kv::{KvBackend, MemoryKv};

pub use crate::platform::{Clipboard, ShareSurface};
pub use crate::render::{ErrorCorrection, RenderRequest, RenderStyle, SymbolRenderer};
pub use crate::scan::{ScanAction, ScanResult, ScannedText};

pub use std::sync::Arc;
