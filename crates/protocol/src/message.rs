//! Nachrichten und REST-DTOs
//!
//! Das Backend liefert den Absender einer Nachricht mal als rohe ID, mal als
//! eingebettetes Objekt. Die Normalisierung passiert hier an der Grenze:
//! `Nachricht` wird ueber `WireNachricht` (de)serialisiert und traegt danach
//! immer einen vollstaendigen `Absender`. Server-IDs mit `temp-`-Praefix
//! werden dabei abgewiesen.

use chrono::{DateTime, Utc};
use plauder_core::types::{ConversationId, MessageId, UserId, TEMP_PRAEFIX};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Status
// ---------------------------------------------------------------------------

/// Zustellstatus einer Nachricht
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NachrichtenStatus {
    /// Optimistisch angezeigt, Backend-Antwort steht aus
    Sending,
    /// Vom Backend bestaetigt
    Sent,
    Delivered,
    Read,
    /// Senden fehlgeschlagen, nur manuelles Retry moeglich
    Failed,
}

impl NachrichtenStatus {
    /// Rang fuer Empfangsquittungen (`Sent < Delivered < Read`)
    ///
    /// `Sending` und `Failed` haben keinen Rang: Quittungen betreffen nur
    /// bestaetigte Nachrichten.
    pub fn quittungs_rang(self) -> Option<u8> {
        match self {
            Self::Sent => Some(0),
            Self::Delivered => Some(1),
            Self::Read => Some(2),
            Self::Sending | Self::Failed => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Absender
// ---------------------------------------------------------------------------

/// Normalisierter Absender einer Nachricht
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Absender {
    pub id: UserId,
    pub anzeigename: String,
}

/// Absender wie ihn das Backend liefert
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
enum WireAbsender {
    Objekt {
        #[serde(rename = "_id")]
        id: UserId,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        username: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        name: Option<String>,
    },
    Id(UserId),
}

impl From<WireAbsender> for Absender {
    fn from(wire: WireAbsender) -> Self {
        match wire {
            WireAbsender::Id(id) => Self {
                anzeigename: id.0.clone(),
                id,
            },
            WireAbsender::Objekt { id, username, name } => {
                // Anzeigename: name, sonst username, sonst die ID
                let anzeigename = name
                    .filter(|n| !n.trim().is_empty())
                    .or(username.filter(|u| !u.trim().is_empty()))
                    .unwrap_or_else(|| id.0.clone());
                Self { id, anzeigename }
            }
        }
    }
}

impl From<Absender> for WireAbsender {
    fn from(absender: Absender) -> Self {
        WireAbsender::Objekt {
            id: absender.id,
            username: None,
            name: Some(absender.anzeigename),
        }
    }
}

// ---------------------------------------------------------------------------
// Nachricht
// ---------------------------------------------------------------------------

/// Eine Chat-Nachricht mit normalisiertem Absender
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "WireNachricht", into = "WireNachricht")]
pub struct Nachricht {
    pub id: MessageId,
    pub conversation_id: ConversationId,
    pub absender: Absender,
    pub inhalt: String,
    /// Vom Server vergeben, `None` solange die Nachricht unbestaetigt ist
    pub erstellt_am: Option<DateTime<Utc>>,
    pub status: NachrichtenStatus,
    pub editiert: bool,
}

impl Nachricht {
    /// Erstellt eine temporaere Nachricht fuer den optimistischen Versand
    pub fn temporaer(
        id: MessageId,
        conversation_id: ConversationId,
        absender: Absender,
        inhalt: impl Into<String>,
    ) -> Self {
        Self {
            id,
            conversation_id,
            absender,
            inhalt: inhalt.into(),
            erstellt_am: None,
            status: NachrichtenStatus::Sending,
            editiert: false,
        }
    }
}

/// Nachricht im JSON-Format des Backends
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireNachricht {
    #[serde(rename = "_id")]
    id: MessageId,
    chat: ConversationId,
    sender: WireAbsender,
    #[serde(default)]
    content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    status: Option<NachrichtenStatus>,
    #[serde(default)]
    edited: bool,
}

impl TryFrom<WireNachricht> for Nachricht {
    type Error = String;

    fn try_from(wire: WireNachricht) -> Result<Self, Self::Error> {
        // Der temp-Namensraum gehoert dem Client
        if wire.id.ist_temporaer() {
            return Err(format!(
                "Server-ID mit reserviertem Praefix {TEMP_PRAEFIX}: {}",
                wire.id
            ));
        }
        Ok(Self {
            id: wire.id,
            conversation_id: wire.chat,
            absender: wire.sender.into(),
            inhalt: wire.content,
            erstellt_am: wire.created_at,
            // Backend-Nachrichten ohne Status gelten als gesendet
            status: wire.status.unwrap_or(NachrichtenStatus::Sent),
            editiert: wire.edited,
        })
    }
}

impl From<Nachricht> for WireNachricht {
    fn from(n: Nachricht) -> Self {
        Self {
            id: n.id,
            chat: n.conversation_id,
            sender: n.absender.into(),
            content: n.inhalt,
            created_at: n.erstellt_am,
            status: Some(n.status),
            edited: n.editiert,
        }
    }
}

// ---------------------------------------------------------------------------
// REST-Anfragen
// ---------------------------------------------------------------------------

/// Nachrichtentyp beim Senden
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NachrichtenTyp {
    #[default]
    Text,
}

/// Seite der Nachrichten-History (Offset-Pagination, neueste zuletzt)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryAnfrage {
    pub conversation_id: ConversationId,
    pub limit: usize,
    /// Anzahl der neuesten Nachrichten die uebersprungen werden
    pub skip: usize,
}

/// Body fuer `POST /message/sendmessage/{chat}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendeAnfrage {
    pub content: String,
    pub message_type: NachrichtenTyp,
    pub attachments: Vec<serde_json::Value>,
}

impl SendeAnfrage {
    /// Reine Text-Nachricht ohne Anhaenge
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            message_type: NachrichtenTyp::Text,
            attachments: Vec::new(),
        }
    }
}

/// Body fuer `PUT /message/editmessage/{id}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditAnfrage {
    pub content: String,
}
