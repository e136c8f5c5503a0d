//! Contract with the external QR symbol renderer.
//!
//! Symbol encoding and rasterization happen outside this crate; what lives
//! here is the request the core hands over, including the error-correction
//! choice.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// QR error-correction level requested from the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorCorrection {
    /// ~15% recovery, used for plain symbols.
    M,
    /// ~30% recovery, used when a logo covers part of the symbol.
    H,
}

/// Visual options for a rendered symbol.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderStyle {
    /// Edge length in pixels.
    pub size: u32,
    pub foreground: String,
    pub background: String,
    /// Image embedded in the center of the symbol.
    pub logo: Option<String>,
}

impl Default for RenderStyle {
    fn default() -> Self {
        Self {
            size: 200,
            foreground: "black".to_string(),
            background: "white".to_string(),
            logo: None,
        }
    }
}

/// Everything the renderer needs for one symbol.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderRequest {
    pub payload: String,
    pub style: RenderStyle,
    pub error_correction: ErrorCorrection,
}

impl RenderRequest {
    /// Build a request, refusing blank payloads.
    pub fn new(payload: impl Into<String>, style: RenderStyle) -> Result<Self, RenderError> {
        let payload = payload.into();
        if payload.trim().is_empty() {
            return Err(RenderError::EmptyPayload);
        }
        let error_correction = if style.logo.is_some() {
            ErrorCorrection::H
        } else {
            ErrorCorrection::M
        };
        Ok(Self {
            payload,
            style,
            error_correction,
        })
    }
}

/// Rendered image bytes as produced by a [`SymbolRenderer`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedSymbol {
    pub bytes: Vec<u8>,
    pub mime: String,
}

impl RenderedSymbol {
    pub fn png(bytes: Vec<u8>) -> Self {
        Self {
            bytes,
            mime: "image/png".to_string(),
        }
    }

    /// Base64 form handed to the share surface.
    pub fn to_base64(&self) -> String {
        STANDARD.encode(&self.bytes)
    }
}

/// Errors from building or rendering a symbol.
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Nothing to render: payload is empty")]
    EmptyPayload,

    #[error("Renderer failed: {0}")]
    Backend(String),
}

/// External QR renderer.
pub trait SymbolRenderer: Send + Sync {
    fn render(&self, request: &RenderRequest) -> Result<RenderedSymbol, RenderError>;
}
