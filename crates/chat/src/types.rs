//! Oeffentliche Typen fuer die Chat-Engine

use std::time::Duration;

use plauder_core::types::MessageId;

pub use plauder_protocol::message::{Absender, Nachricht, NachrichtenStatus};

/// Einstellungen einer Konversationsansicht
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineKonfiguration {
    /// Seitengroesse fuer History-Abrufe
    pub seiten_limit: usize,
    /// Nach dieser Zeit ohne erneutes `typing` gilt ein Teilnehmer nicht mehr als tippend
    pub tipp_ablauf: Duration,
    /// Inaktivitaet im Eingabefeld bis `stopTyping` gesendet wird
    pub tipp_entprellung: Duration,
}

impl Default for EngineKonfiguration {
    fn default() -> Self {
        Self {
            seiten_limit: 20,
            tipp_ablauf: Duration::from_millis(3000),
            tipp_entprellung: Duration::from_millis(1500),
        }
    }
}

/// Ergebnis von `send` bzw. `retry`
///
/// Sendefehler werden nie als `Err` gemeldet: die temporaere Nachricht
/// wird als `failed` markiert und bleibt in der Liste.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SendeErgebnis {
    /// Leerer Inhalt oder unbekannte/nicht fehlgeschlagene temp-ID, keine Aenderung
    Verworfen,
    /// Backend hat die Nachricht bestaetigt
    Bestaetigt {
        temp_id: MessageId,
        server_id: MessageId,
    },
    /// Backend-Aufruf fehlgeschlagen, Eintrag steht auf `failed`
    Fehlgeschlagen { temp_id: MessageId },
}

/// Momentaufnahme des Pagination-Zustands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ladezustand {
    /// Anzahl bereits geladener Server-Nachrichten (skip fuer die naechste Seite)
    pub cursor: usize,
    pub has_more: bool,
    pub laedt_aeltere: bool,
}

/// Handle eines registrierten Listeners
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(pub(crate) u64);
