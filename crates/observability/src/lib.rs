//! # plauder-observability
//!
//! Structured Logging fuer die Plauder-Binaries via tracing-subscriber.
//! Text- oder JSON-Ausgabe auf stderr, damit stdout der Chat-Anzeige
//! gehoert.

pub mod logging;

pub use logging::{logging_initialisieren, LogFormat, LoggingFehler};
