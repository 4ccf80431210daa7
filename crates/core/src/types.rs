//! Gemeinsame Identifikationstypen fuer Plauder
//!
//! Alle IDs verwenden das Newtype-Pattern um Verwechslungen zwischen
//! verschiedenen ID-Arten zur Compilezeit auszuschliessen. Das Backend
//! vergibt opake String-IDs, daher kapseln die Newtypes `String`.

use serde::{Deserialize, Serialize};

/// Praefix fuer client-seitig vergebene, temporaere Nachrichten-IDs
pub const TEMP_PRAEFIX: &str = "temp-";

/// Eindeutige Benutzer-ID (vom Backend vergeben)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub String);

impl UserId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "user:{}", self.0)
    }
}

/// Eindeutige Konversations-ID
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConversationId(pub String);

impl ConversationId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ConversationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "chat:{}", self.0)
    }
}

/// Nachrichten-ID
///
/// Entweder eine dauerhafte Server-ID oder eine temporaere Client-ID der
/// Form `temp-<millisekunden>`. Server-IDs mit `temp-`-Praefix weist die
/// Dekodierung von `Nachricht` ab, damit koennen beide Namensraeume nicht
/// kollidieren.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageId(pub String);

impl MessageId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Erstellt eine temporaere ID aus einem Zeitstempel in Millisekunden
    pub fn temporaer(zeitstempel_ms: u64) -> Self {
        Self(format!("{TEMP_PRAEFIX}{zeitstempel_ms}"))
    }

    /// Gibt true zurueck wenn die ID client-seitig vergeben wurde
    pub fn ist_temporaer(&self) -> bool {
        self.0.starts_with(TEMP_PRAEFIX)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for MessageId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn temporaere_id_hat_praefix() {
        let id = MessageId::temporaer(1_700_000_000_123);
        assert_eq!(id.as_str(), "temp-1700000000123");
        assert!(id.ist_temporaer());
    }

    #[test]
    fn server_id_ist_nicht_temporaer() {
        let id = MessageId::new("65f1c0ffee");
        assert!(!id.ist_temporaer());
    }

    #[test]
    fn user_id_display() {
        let id = UserId::new("abc");
        assert_eq!(id.to_string(), "user:abc");
    }

    #[test]
    fn ids_sind_transparent_serialisiert() {
        let id = MessageId::new("m1");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"m1\"");
        let zurueck: MessageId = serde_json::from_str(&json).unwrap();
        assert_eq!(zurueck, id);
    }
}
