//! Copy and share actions feeding the history log.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use qrpad::history::{AppendOutcome, HistoryStore};
use qrpad::kv::MemoryKv;
use qrpad::platform::{Clipboard, PlatformError, ShareSurface};
use qrpad::render::{
    ErrorCorrection, RenderError, RenderRequest, RenderStyle, RenderedSymbol, SymbolRenderer,
};
use qrpad::{CommitError, Composer, Field, LogicalRecord, RecordKind};

#[derive(Default)]
struct RecordingClipboard {
    copied: Mutex<Vec<String>>,
}

impl Clipboard for RecordingClipboard {
    fn copy(&self, text: &str) -> Result<(), PlatformError> {
        self.copied.lock().unwrap().push(text.to_string());
        Ok(())
    }
}

struct BrokenClipboard;

impl Clipboard for BrokenClipboard {
    fn copy(&self, _text: &str) -> Result<(), PlatformError> {
        Err(PlatformError::Clipboard("no display".to_string()))
    }
}

/// Renderer that echoes the request back as the image bytes.
#[derive(Default)]
struct EchoRenderer {
    requests: Mutex<Vec<RenderRequest>>,
}

impl SymbolRenderer for EchoRenderer {
    fn render(&self, request: &RenderRequest) -> Result<RenderedSymbol, RenderError> {
        self.requests.lock().unwrap().push(request.clone());
        Ok(RenderedSymbol::png(request.payload.as_bytes().to_vec()))
    }
}

struct ScriptedShare {
    succeed: bool,
    shared: Mutex<Vec<(String, String)>>,
}

impl ScriptedShare {
    fn new(succeed: bool) -> Self {
        Self {
            succeed,
            shared: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl ShareSurface for ScriptedShare {
    async fn share(&self, data_base64: &str, mime: &str) -> Result<(), PlatformError> {
        if !self.succeed {
            return Err(PlatformError::Share("user cancelled".to_string()));
        }
        self.shared
            .lock()
            .unwrap()
            .push((data_base64.to_string(), mime.to_string()));
        Ok(())
    }
}

fn history() -> HistoryStore {
    HistoryStore::new(Arc::new(MemoryKv::new()))
}

fn wifi_composer() -> Composer {
    let (mut composer, _rx) = Composer::new(RecordKind::Wifi, Duration::from_millis(300));
    composer.set_field(Field::Ssid, "HomeNet");
    composer.set_field(Field::Password, "secret123");
    composer.flush();
    composer
}

#[tokio::test]
async fn test_copy_writes_clipboard_and_history() {
    let composer = wifi_composer();
    let clipboard = RecordingClipboard::default();
    let history = history();

    let outcome = composer.copy(&clipboard, &history).await.unwrap();
    assert!(matches!(outcome, AppendOutcome::Inserted(_)));
    assert_eq!(
        *clipboard.copied.lock().unwrap(),
        vec!["WIFI:T:WPA;S:HomeNet;P:secret123;;".to_string()]
    );

    // copying again is fine but does not grow the log
    let again = composer.copy(&clipboard, &history).await.unwrap();
    assert_eq!(again, AppendOutcome::SkippedDuplicate);
    assert_eq!(history.load().await.len(), 1);
}

#[tokio::test]
async fn test_copy_failure_skips_history() {
    let composer = wifi_composer();
    let history = history();

    let err = composer.copy(&BrokenClipboard, &history).await.unwrap_err();
    assert!(matches!(err, CommitError::Platform(PlatformError::Clipboard(_))));
    assert!(history.load().await.is_empty());
}

#[tokio::test]
async fn test_empty_record_cannot_be_committed() {
    let (composer, _rx) = Composer::new(RecordKind::Contact, Duration::from_millis(300));
    let history = history();

    assert!(!composer.can_commit());
    let err = composer
        .copy(&RecordingClipboard::default(), &history)
        .await
        .unwrap_err();
    assert!(matches!(err, CommitError::ValidationEmpty));

    let err = composer
        .share(
            &EchoRenderer::default(),
            &RenderStyle::default(),
            &ScriptedShare::new(true),
            &history,
        )
        .await
        .unwrap_err();
    assert!(matches!(err, CommitError::ValidationEmpty));
}

#[tokio::test]
async fn test_share_hands_png_to_surface_then_records() {
    let composer = wifi_composer();
    let renderer = EchoRenderer::default();
    let sharer = ScriptedShare::new(true);
    let history = history();
    let style = RenderStyle {
        logo: Some("brand.png".to_string()),
        ..RenderStyle::default()
    };

    let outcome = composer
        .share(&renderer, &style, &sharer, &history)
        .await
        .unwrap();
    assert!(matches!(outcome, AppendOutcome::Inserted(_)));

    let requests = renderer.requests.lock().unwrap();
    assert_eq!(requests.len(), 1);
    assert_eq!(
        requests.first().map(|r| r.error_correction),
        Some(ErrorCorrection::H)
    );

    let expected = RenderedSymbol::png(b"WIFI:T:WPA;S:HomeNet;P:secret123;;".to_vec());
    assert_eq!(
        *sharer.shared.lock().unwrap(),
        vec![(expected.to_base64(), "image/png".to_string())]
    );
}

#[tokio::test]
async fn test_failed_share_leaves_history_untouched() {
    let composer = wifi_composer();
    let history = history();

    let err = composer
        .share(
            &EchoRenderer::default(),
            &RenderStyle::default(),
            &ScriptedShare::new(false),
            &history,
        )
        .await
        .unwrap_err();
    assert!(matches!(err, CommitError::Platform(PlatformError::Share(_))));
    assert!(history.load().await.is_empty());
}

#[tokio::test]
async fn test_recall_loads_entry_into_editor() {
    let history = history();
    history
        .append(
            RecordKind::Contact,
            "BEGIN:VCARD\nVERSION:3.0\nFN:Ada\nTEL:123\nEMAIL:ada@example.com\nEND:VCARD",
        )
        .await;
    let entry = history.load().await.into_iter().next().unwrap();

    let (mut composer, rx) = Composer::new(RecordKind::Url, Duration::from_millis(300));
    composer.recall(&history, &entry);

    assert_eq!(
        composer.record(),
        &LogicalRecord::contact("Ada", "123", "ada@example.com")
    );
    assert_eq!(*rx.borrow(), entry.payload);
}
