//! Unified error type for the qrpad library.
//!
//! Each module keeps its own error enum; [`Error`] wraps them so
//! application code can use a single type with `?`.

use thiserror::Error;

use crate::composer::CommitError;
use crate::config::ConfigError;
use crate::history::HistoryError;
use crate::kv::KvError;
use crate::platform::PlatformError;
use crate::record::ParseKindError;
use crate::render::RenderError;
use crate::scan::ScanError;

/// Unified error type for all qrpad operations.
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Kv(#[from] KvError),

    #[error(transparent)]
    History(#[from] HistoryError),

    #[error(transparent)]
    Commit(#[from] CommitError),

    #[error(transparent)]
    Render(#[from] RenderError),

    #[error(transparent)]
    Scan(#[from] ScanError),

    #[error(transparent)]
    Platform(#[from] PlatformError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Kind(#[from] ParseKindError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// A [`Result`] type alias using the unified [`Error`] type.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Returns `true` if this is a KV store error.
    pub fn is_kv(&self) -> bool {
        matches!(self, Self::Kv(_))
    }

    /// Returns `true` if a commit was refused because the record is empty.
    pub fn is_validation_empty(&self) -> bool {
        matches!(
            self,
            Self::Commit(CommitError::ValidationEmpty) | Self::Render(RenderError::EmptyPayload)
        )
    }

    /// Returns `true` if camera access was denied.
    pub fn is_permission_denied(&self) -> bool {
        matches!(self, Self::Scan(ScanError::PermissionDenied { .. }))
    }
}
