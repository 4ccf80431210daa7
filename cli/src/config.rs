//! Client-Konfiguration
//!
//! Wird beim Start aus einer TOML-Datei geladen. Bis auf die Sitzung
//! (Benutzer und Konversation) haben alle Felder Standardwerte.

use std::time::Duration;

use plauder_chat::EngineKonfiguration;
use plauder_protocol::wire::DEFAULT_MAX_FRAME_SIZE;
use serde::{Deserialize, Serialize};

/// Vollstaendige Client-Konfiguration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Backend-Endpunkte
    pub backend: BackendEinstellungen,
    /// Eigener Benutzer und geoeffnete Konversation
    pub sitzung: SitzungsEinstellungen,
    /// Pagination und Tipp-Anzeige
    pub chat: ChatEinstellungen,
    /// Logging-Einstellungen
    pub logging: LoggingEinstellungen,
}

/// Backend-Endpunkte
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendEinstellungen {
    /// Basis-URL der REST-API
    pub http_url: String,
    /// host:port des Push-Kanals
    pub transport_adresse: String,
    /// Bearer-Token (optional)
    pub token: Option<String>,
}

impl Default for BackendEinstellungen {
    fn default() -> Self {
        Self {
            http_url: "http://localhost:5000/api".into(),
            transport_adresse: "127.0.0.1:5001".into(),
            token: None,
        }
    }
}

/// Eigener Benutzer und Konversation
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SitzungsEinstellungen {
    pub user_id: String,
    /// Anzeigename (leer = user_id)
    pub anzeigename: String,
    pub conversation_id: String,
}

/// Pagination und Tipp-Anzeige
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatEinstellungen {
    /// Nachrichten pro History-Seite
    pub seiten_limit: usize,
    /// Ablauf der Tipp-Anzeige anderer Teilnehmer in ms
    pub tipp_ablauf_ms: u64,
    /// Inaktivitaet bis `stopTyping` in ms
    pub tipp_entprellung_ms: u64,
    /// Maximale Frame-Groesse des Push-Kanals in Bytes
    pub max_frame_groesse: usize,
}

impl Default for ChatEinstellungen {
    fn default() -> Self {
        Self {
            seiten_limit: 20,
            tipp_ablauf_ms: 3000,
            tipp_entprellung_ms: 1500,
            max_frame_groesse: DEFAULT_MAX_FRAME_SIZE,
        }
    }
}

/// Logging-Einstellungen
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingEinstellungen {
    /// Filter-Direktive: "trace", "debug", "info", "warn", "error" oder pro Crate
    pub level: String,
    /// Format: "json" oder "text"
    pub format: String,
}

impl Default for LoggingEinstellungen {
    fn default() -> Self {
        Self {
            level: "warn".into(),
            format: "text".into(),
        }
    }
}

impl ClientConfig {
    /// Laedt die Konfiguration aus einer TOML-Datei.
    /// Gibt die Standardkonfiguration zurueck wenn die Datei nicht existiert.
    pub fn laden(pfad: &str) -> anyhow::Result<Self> {
        match std::fs::read_to_string(pfad) {
            Ok(inhalt) => {
                let config: Self = toml::from_str(&inhalt)
                    .map_err(|e| anyhow::anyhow!("Konfigurationsfehler in '{pfad}': {e}"))?;
                Ok(config)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::warn!(
                    pfad = pfad,
                    "Konfigurationsdatei nicht gefunden, verwende Standardwerte"
                );
                Ok(Self::default())
            }
            Err(e) => Err(anyhow::anyhow!(
                "Konfigurationsdatei '{pfad}' nicht lesbar: {e}"
            )),
        }
    }

    /// Prueft die Felder ohne sinnvollen Standardwert
    pub fn validieren(&self) -> anyhow::Result<()> {
        if self.sitzung.user_id.trim().is_empty() {
            anyhow::bail!("[sitzung] user_id fehlt");
        }
        if self.sitzung.conversation_id.trim().is_empty() {
            anyhow::bail!("[sitzung] conversation_id fehlt");
        }
        if self.chat.seiten_limit == 0 {
            anyhow::bail!("[chat] seiten_limit muss groesser 0 sein");
        }
        Ok(())
    }

    /// Anzeigename, faellt auf die user_id zurueck
    pub fn anzeigename(&self) -> &str {
        if self.sitzung.anzeigename.trim().is_empty() {
            &self.sitzung.user_id
        } else {
            &self.sitzung.anzeigename
        }
    }

    pub fn engine_konfiguration(&self) -> EngineKonfiguration {
        EngineKonfiguration {
            seiten_limit: self.chat.seiten_limit,
            tipp_ablauf: Duration::from_millis(self.chat.tipp_ablauf_ms),
            tipp_entprellung: Duration::from_millis(self.chat.tipp_entprellung_ms),
        }
    }
}
