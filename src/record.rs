//! Typed records the user edits before they are flattened into a payload.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Discriminant of a [`LogicalRecord`].
///
/// Serialized as the lowercase tag stored in history entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordKind {
    Url,
    Text,
    Wifi,
    Contact,
}

impl RecordKind {
    /// All kinds, in the order an editor presents them.
    pub const ALL: [RecordKind; 4] = [
        RecordKind::Url,
        RecordKind::Text,
        RecordKind::Wifi,
        RecordKind::Contact,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RecordKind::Url => "url",
            RecordKind::Text => "text",
            RecordKind::Wifi => "wifi",
            RecordKind::Contact => "contact",
        }
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown kind tag.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown record kind '{0}' (expected url, text, wifi or contact)")]
pub struct ParseKindError(pub String);

impl FromStr for RecordKind {
    type Err = ParseKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "url" => Ok(RecordKind::Url),
            "text" => Ok(RecordKind::Text),
            "wifi" => Ok(RecordKind::Wifi),
            "contact" => Ok(RecordKind::Contact),
            other => Err(ParseKindError(other.to_string())),
        }
    }
}

/// A single editable field of a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    /// Text of a `Url` or `PlainText` record.
    Text,
    Ssid,
    Password,
    Name,
    Phone,
    Email,
}

/// The typed, structured form of what the user wants to encode.
///
/// Exactly one variant is active; switching kinds goes through
/// [`LogicalRecord::empty`], which drops every field of the previous kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogicalRecord {
    Url {
        text: String,
    },
    PlainText {
        text: String,
    },
    WifiCredential {
        ssid: String,
        password: String,
    },
    ContactCard {
        name: String,
        phone: String,
        email: String,
    },
}

impl LogicalRecord {
    /// A freshly constructed record of the given kind, every field empty.
    pub fn empty(kind: RecordKind) -> Self {
        match kind {
            RecordKind::Url => LogicalRecord::Url {
                text: String::new(),
            },
            RecordKind::Text => LogicalRecord::PlainText {
                text: String::new(),
            },
            RecordKind::Wifi => LogicalRecord::WifiCredential {
                ssid: String::new(),
                password: String::new(),
            },
            RecordKind::Contact => LogicalRecord::ContactCard {
                name: String::new(),
                phone: String::new(),
                email: String::new(),
            },
        }
    }

    pub fn url(text: impl Into<String>) -> Self {
        LogicalRecord::Url { text: text.into() }
    }

    pub fn text(text: impl Into<String>) -> Self {
        LogicalRecord::PlainText { text: text.into() }
    }

    pub fn wifi(ssid: impl Into<String>, password: impl Into<String>) -> Self {
        LogicalRecord::WifiCredential {
            ssid: ssid.into(),
            password: password.into(),
        }
    }

    pub fn contact(
        name: impl Into<String>,
        phone: impl Into<String>,
        email: impl Into<String>,
    ) -> Self {
        LogicalRecord::ContactCard {
            name: name.into(),
            phone: phone.into(),
            email: email.into(),
        }
    }

    pub fn kind(&self) -> RecordKind {
        match self {
            LogicalRecord::Url { .. } => RecordKind::Url,
            LogicalRecord::PlainText { .. } => RecordKind::Text,
            LogicalRecord::WifiCredential { .. } => RecordKind::Wifi,
            LogicalRecord::ContactCard { .. } => RecordKind::Contact,
        }
    }

    /// Assign `field` if it belongs to the active variant.
    ///
    /// Returns `false` and leaves the record untouched when the field does
    /// not exist on this kind (e.g. `Ssid` on a contact card).
    pub fn set_field(&mut self, field: Field, value: impl Into<String>) -> bool {
        let slot = match (self, field) {
            (LogicalRecord::Url { text }, Field::Text)
            | (LogicalRecord::PlainText { text }, Field::Text) => text,
            (LogicalRecord::WifiCredential { ssid, .. }, Field::Ssid) => ssid,
            (LogicalRecord::WifiCredential { password, .. }, Field::Password) => password,
            (LogicalRecord::ContactCard { name, .. }, Field::Name) => name,
            (LogicalRecord::ContactCard { phone, .. }, Field::Phone) => phone,
            (LogicalRecord::ContactCard { email, .. }, Field::Email) => email,
            _ => return false,
        };
        *slot = value.into();
        true
    }
}
