//! Contract with the external QR scanner.
//!
//! Scanned text is opaque: it is offered to the user as a link to open, text
//! to copy, or something to dismiss. It is never fed back through
//! [`codec::decode`](crate::codec::decode).

use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

use crate::logging::{debug, warn};

/// The only barcode format accepted from the scanner.
pub const QR_FORMAT: &str = "qr";

#[allow(clippy::expect_used)]
static LINK_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z][A-Za-z0-9+.\-]*://\S+$").expect("valid link pattern")
});

/// Raw scanner output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanResult {
    pub data: String,
    pub format: String,
}

/// What the user can do with scanned text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanAction {
    OpenLink,
    Copy,
    Dismiss,
}

/// Accepted scanner output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScannedText {
    text: String,
}

impl ScannedText {
    /// Accept a scan result, rejecting anything that is not a QR symbol.
    pub fn from_scan(result: ScanResult) -> Result<Self, ScanError> {
        if result.format != QR_FORMAT {
            debug!(format = %result.format, "ignoring non-QR scan");
            return Err(ScanError::UnsupportedFormat(result.format));
        }
        Ok(Self { text: result.data })
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Whether the text looks like something a browser or app can open.
    pub fn is_link(&self) -> bool {
        LINK_PATTERN.is_match(self.text.trim())
    }

    /// Actions to offer, in display order.
    pub fn actions(&self) -> Vec<ScanAction> {
        let mut actions = Vec::with_capacity(3);
        if self.is_link() {
            actions.push(ScanAction::OpenLink);
        }
        actions.push(ScanAction::Copy);
        actions.push(ScanAction::Dismiss);
        actions
    }
}

/// Camera permission as reported by the platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermissionStatus {
    Granted,
    Denied { can_ask_again: bool },
    Undetermined,
}

/// Platform camera permission API.
#[async_trait]
pub trait CameraPermission: Send + Sync {
    async fn status(&self) -> PermissionStatus;
    async fn request(&self) -> PermissionStatus;
}

/// Make sure the camera can be used, asking once if the user was never asked.
///
/// A denial is returned as [`ScanError::PermissionDenied`] so the caller can
/// show a prompt with a retry path.
pub async fn ensure_camera_access(permission: &dyn CameraPermission) -> Result<(), ScanError> {
    let status = match permission.status().await {
        PermissionStatus::Undetermined => permission.request().await,
        status => status,
    };
    match status {
        PermissionStatus::Granted => Ok(()),
        PermissionStatus::Denied { can_ask_again } => {
            warn!(can_ask_again = can_ask_again, "camera permission denied");
            Err(ScanError::PermissionDenied { can_ask_again })
        }
        PermissionStatus::Undetermined => Err(ScanError::PermissionDenied {
            can_ask_again: true,
        }),
    }
}

/// Errors from the scanning surface.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ScanError {
    #[error("Unsupported barcode format '{0}' (only qr is accepted)")]
    UnsupportedFormat(String),

    #[error("Camera permission denied")]
    PermissionDenied { can_ask_again: bool },
}
