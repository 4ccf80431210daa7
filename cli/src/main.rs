//! Plauder Client – Einstiegspunkt
//!
//! Laedt die Konfiguration, initialisiert das Logging und startet den Client.

use anyhow::Result;
use plauder_cli::{config::ClientConfig, Client};

#[tokio::main]
async fn main() -> Result<()> {
    // Konfigurationsdatei-Pfad aus Umgebungsvariable oder Standard
    let config_pfad = std::env::var("PLAUDER_CONFIG").unwrap_or_else(|_| "plauder.toml".into());

    let config = ClientConfig::laden(&config_pfad)?;

    plauder_observability::logging_initialisieren(&config.logging.level, &config.logging.format)?;

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        config = %config_pfad,
        "Plauder Client wird initialisiert"
    );

    Client::neu(config).starten().await
}
