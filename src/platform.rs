//! Clipboard and share-sheet surfaces.

use async_trait::async_trait;
use thiserror::Error;

/// Errors reported by platform surfaces.
#[derive(Error, Debug)]
pub enum PlatformError {
    #[error("Clipboard unavailable: {0}")]
    Clipboard(String),

    #[error("Share failed: {0}")]
    Share(String),
}

/// Write-only clipboard.
pub trait Clipboard: Send + Sync {
    fn copy(&self, text: &str) -> Result<(), PlatformError>;
}

/// Platform share sheet receiving a base64 image.
#[async_trait]
pub trait ShareSurface: Send + Sync {
    async fn share(&self, data_base64: &str, mime: &str) -> Result<(), PlatformError>;
}

/// The desktop system clipboard.
#[cfg(feature = "clipboard")]
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClipboard;

#[cfg(feature = "clipboard")]
impl Clipboard for SystemClipboard {
    fn copy(&self, text: &str) -> Result<(), PlatformError> {
        let mut clipboard =
            arboard::Clipboard::new().map_err(|e| PlatformError::Clipboard(e.to_string()))?;
        clipboard
            .set_text(text.to_string())
            .map_err(|e| PlatformError::Clipboard(e.to_string()))
    }
}
