//! plauder-core – Gemeinsame Identifikationstypen
//!
//! Dieses Crate stellt die IDs bereit, die von allen anderen
//! Plauder-Crates gemeinsam genutzt werden.

pub mod types;

// Re-Exporte fuer bequemen Zugriff
pub use types::{ConversationId, MessageId, UserId, TEMP_PRAEFIX};
