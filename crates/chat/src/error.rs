//! Fehlertypen fuer das Chat-Crate

use thiserror::Error;

/// Chat-Fehlertypen
#[derive(Debug, Error)]
pub enum ChatError {
    #[error("History konnte nicht geladen werden: {0}")]
    Fetch(String),

    #[error("Nachricht konnte nicht gesendet werden: {0}")]
    Send(String),

    #[error("Nachricht konnte nicht editiert werden: {0}")]
    Edit(String),

    #[error("Nachricht konnte nicht geloescht werden: {0}")]
    Delete(String),

    #[error("Backend-Fehler ({status}): {nachricht}")]
    Backend { status: u16, nachricht: String },

    #[error("Netzwerk-Fehler: {0}")]
    Netzwerk(String),

    #[error("Transport-Fehler: {0}")]
    Transport(String),

    #[error("Ungueltige Eingabe: {0}")]
    UngueltigeEingabe(String),

    #[error("IO-Fehler: {0}")]
    Io(#[from] std::io::Error),
}

impl From<reqwest::Error> for ChatError {
    fn from(e: reqwest::Error) -> Self {
        match e.status() {
            Some(status) => ChatError::Backend {
                status: status.as_u16(),
                nachricht: e.to_string(),
            },
            None => ChatError::Netzwerk(e.to_string()),
        }
    }
}

pub type ChatResult<T> = Result<T, ChatError>;
