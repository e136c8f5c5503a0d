//! Payload codec: typed records to flat QR text and back.
//!
//! The formats are fixed:
//!
//! - URL and free text are the raw text.
//! - Wi-Fi is `WIFI:T:WPA;S:<ssid>;P:<password>;;`.
//! - Contact is a vCard 3.0 with `FN`, `TEL` and `EMAIL` lines joined by `\n`.
//!
//! [`decode`] is only meant for payloads previously produced by [`encode`]
//! for the same kind, i.e. recalling a history entry into the editor. It is
//! not a general parser for scanned QR content.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::logging::debug;
use crate::record::{LogicalRecord, RecordKind};

// Patterns are compile-time constants; a failure here is a bug in this file.
#[allow(clippy::expect_used)]
static WIFI_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)S:(.*?);P:(.*?);;").expect("valid wifi pattern"));
#[allow(clippy::expect_used)]
static VCARD_NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^FN:(.*)$").expect("valid FN pattern"));
#[allow(clippy::expect_used)]
static VCARD_PHONE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^TEL:(.*)$").expect("valid TEL pattern"));
#[allow(clippy::expect_used)]
static VCARD_EMAIL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^EMAIL:(.*)$").expect("valid EMAIL pattern"));

/// Flatten a record into its canonical payload.
///
/// Field values are inserted verbatim. Delimiters are not escaped, so an
/// SSID or password containing `;` (or a contact field containing a newline)
/// yields a payload that [`decode`] will split in the wrong place. Existing
/// payloads in stored history rely on this unescaped format.
pub fn encode(record: &LogicalRecord) -> String {
    match record {
        LogicalRecord::Url { text } | LogicalRecord::PlainText { text } => text.clone(),
        LogicalRecord::WifiCredential { ssid, password } => {
            format!("WIFI:T:WPA;S:{};P:{};;", ssid, password)
        }
        LogicalRecord::ContactCard { name, phone, email } => format!(
            "BEGIN:VCARD\nVERSION:3.0\nFN:{}\nTEL:{}\nEMAIL:{}\nEND:VCARD",
            name, phone, email
        ),
    }
}

/// Rebuild a record of `kind` from a payload produced by [`encode`].
///
/// Best effort: a field whose pattern does not match decodes to an empty
/// string.
pub fn decode(payload: &str, kind: RecordKind) -> LogicalRecord {
    match kind {
        RecordKind::Url => LogicalRecord::url(payload),
        RecordKind::Text => LogicalRecord::text(payload),
        RecordKind::Wifi => {
            let Some(captures) = WIFI_PATTERN.captures(payload) else {
                debug!(payload_len = payload.len(), "wifi payload did not match");
                return LogicalRecord::empty(RecordKind::Wifi);
            };
            let group = |i: usize| {
                captures
                    .get(i)
                    .map(|m| m.as_str().to_string())
                    .unwrap_or_default()
            };
            LogicalRecord::wifi(group(1), group(2))
        }
        RecordKind::Contact => LogicalRecord::contact(
            vcard_line(&VCARD_NAME, payload),
            vcard_line(&VCARD_PHONE, payload),
            vcard_line(&VCARD_EMAIL, payload),
        ),
    }
}

/// First line matching `pattern`, trimmed; empty when absent.
fn vcard_line(pattern: &Regex, payload: &str) -> String {
    pattern
        .captures(payload)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().trim().to_string())
        .unwrap_or_default()
}

/// Whether the record holds nothing worth encoding.
///
/// Gates commit actions (share, copy, history) and symbol rendering.
pub fn is_empty(record: &LogicalRecord) -> bool {
    match record {
        LogicalRecord::Url { text } | LogicalRecord::PlainText { text } => text.trim().is_empty(),
        // password alone does not make a network
        LogicalRecord::WifiCredential { ssid, .. } => ssid.trim().is_empty(),
        LogicalRecord::ContactCard { name, phone, email } => {
            name.trim().is_empty() && phone.trim().is_empty() && email.trim().is_empty()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_wifi() {
        let record = LogicalRecord::wifi("HomeNet", "secret123");
        assert_eq!(encode(&record), "WIFI:T:WPA;S:HomeNet;P:secret123;;");
    }

    #[test]
    fn test_decode_wifi() {
        let record = decode("WIFI:T:WPA;S:HomeNet;P:secret123;;", RecordKind::Wifi);
        assert_eq!(record, LogicalRecord::wifi("HomeNet", "secret123"));
    }

    #[test]
    fn test_encode_contact() {
        let record = LogicalRecord::contact("Jane Doe", "555-1234", "jane@x.com");
        assert_eq!(
            encode(&record),
            "BEGIN:VCARD\nVERSION:3.0\nFN:Jane Doe\nTEL:555-1234\nEMAIL:jane@x.com\nEND:VCARD"
        );
    }

    #[test]
    fn test_decode_contact_trims_fields() {
        let payload = "BEGIN:VCARD\nVERSION:3.0\nFN:  Jane Doe \nTEL:555-1234\r\nEMAIL:jane@x.com\nEND:VCARD";
        assert_eq!(
            decode(payload, RecordKind::Contact),
            LogicalRecord::contact("Jane Doe", "555-1234", "jane@x.com")
        );
    }

    #[test]
    fn test_decode_contact_missing_lines() {
        let payload = "BEGIN:VCARD\nVERSION:3.0\nFN:Solo\nEND:VCARD";
        assert_eq!(
            decode(payload, RecordKind::Contact),
            LogicalRecord::contact("Solo", "", "")
        );
    }

    #[test]
    fn test_decode_wifi_mismatch_is_empty() {
        assert_eq!(
            decode("not a wifi payload", RecordKind::Wifi),
            LogicalRecord::wifi("", "")
        );
    }

    #[test]
    fn test_empty_fields_still_encode() {
        assert_eq!(
            encode(&LogicalRecord::empty(RecordKind::Wifi)),
            "WIFI:T:WPA;S:;P:;;"
        );
        assert_eq!(encode(&LogicalRecord::empty(RecordKind::Url)), "");
    }

    #[test]
    fn test_semicolon_in_ssid_corrupts_decode() {
        // known limitation: delimiters are not escaped
        let record = LogicalRecord::wifi("Cafe;P:x", "pw");
        let decoded = decode(&encode(&record), RecordKind::Wifi);
        assert_ne!(decoded, record);
    }

    #[test]
    fn test_is_empty_rules() {
        for kind in RecordKind::ALL {
            assert!(is_empty(&LogicalRecord::empty(kind)));
        }
        assert!(is_empty(&LogicalRecord::url("   ")));
        assert!(!is_empty(&LogicalRecord::url("https://example.com")));
        assert!(is_empty(&LogicalRecord::wifi(" ", "password-only")));
        assert!(!is_empty(&LogicalRecord::wifi("HomeNet", "")));
        assert!(!is_empty(&LogicalRecord::contact("", "", "a@b.c")));
        assert!(is_empty(&LogicalRecord::contact(" ", "\t", "")));
    }
}
