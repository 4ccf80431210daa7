//! Structured Logging Setup via tracing-subscriber
//!
//! Konfigurierbar per Umgebungsvariable (hat Vorrang vor der Konfigdatei):
//! - `PLAUDER_LOG_LEVEL`: Filter-Direktive (z.B. `info`, `plauder_chat=debug`)
//! - `PLAUDER_LOG_FORMAT`: Format (text/json)

use std::str::FromStr;

use thiserror::Error;
use tracing_subscriber::{fmt, EnvFilter};

pub const ENV_LOG_LEVEL: &str = "PLAUDER_LOG_LEVEL";
pub const ENV_LOG_FORMAT: &str = "PLAUDER_LOG_FORMAT";

#[derive(Debug, Error)]
pub enum LoggingFehler {
    #[error("Unbekanntes Log-Format: {0} (erlaubt: text, json)")]
    UnbekanntesFormat(String),

    #[error("Ungueltige Filter-Direktive '{direktive}': {grund}")]
    UngueltigerFilter { direktive: String, grund: String },

    #[error("Logging bereits initialisiert")]
    BereitsInitialisiert,
}

/// Ausgabeformat der Log-Zeilen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl FromStr for LogFormat {
    type Err = LoggingFehler;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            anderes => Err(LoggingFehler::UnbekanntesFormat(anderes.to_owned())),
        }
    }
}

/// Waehlt den Wert aus der Umgebung, sonst den aus der Konfiguration
fn umgebung_oder(env_wert: Option<String>, konfig: &str) -> String {
    env_wert
        .filter(|w| !w.trim().is_empty())
        .unwrap_or_else(|| konfig.to_owned())
}

fn filter_bauen(direktive: &str) -> Result<EnvFilter, LoggingFehler> {
    EnvFilter::try_new(direktive).map_err(|e| LoggingFehler::UngueltigerFilter {
        direktive: direktive.to_owned(),
        grund: e.to_string(),
    })
}

/// Initialisiert das Logging-System.
///
/// `PLAUDER_LOG_LEVEL` und `PLAUDER_LOG_FORMAT` ueberschreiben `level`
/// und `format`. Darf nur einmal pro Prozess aufgerufen werden.
pub fn logging_initialisieren(level: &str, format: &str) -> Result<(), LoggingFehler> {
    let level = umgebung_oder(std::env::var(ENV_LOG_LEVEL).ok(), level);
    let format: LogFormat = umgebung_oder(std::env::var(ENV_LOG_FORMAT).ok(), format).parse()?;
    let filter = filter_bauen(&level)?;

    let ergebnis = match format {
        LogFormat::Json => fmt()
            .json()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_current_span(true)
            .try_init(),
        LogFormat::Text => fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(true)
            .try_init(),
    };
    ergebnis.map_err(|_| LoggingFehler::BereitsInitialisiert)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_format_gueltige_werte() {
        assert_eq!("text".parse::<LogFormat>().unwrap(), LogFormat::Text);
        assert_eq!("json".parse::<LogFormat>().unwrap(), LogFormat::Json);
    }

    #[test]
    fn log_format_ungueltige_werte() {
        assert!("xml".parse::<LogFormat>().is_err());
        assert!("JSON".parse::<LogFormat>().is_err()); // Gross-/Kleinschreibung
        assert!("".parse::<LogFormat>().is_err());
    }

    #[test]
    fn umgebung_hat_vorrang() {
        assert_eq!(umgebung_oder(Some("debug".into()), "info"), "debug");
        assert_eq!(umgebung_oder(None, "info"), "info");
        assert_eq!(umgebung_oder(Some("  ".into()), "warn"), "warn");
    }

    #[test]
    fn filter_direktiven() {
        assert!(filter_bauen("info").is_ok());
        assert!(filter_bauen("plauder_chat=debug,warn").is_ok());
        assert!(matches!(
            filter_bauen("plauder_chat=laut"),
            Err(LoggingFehler::UngueltigerFilter { .. })
        ));
    }
}
