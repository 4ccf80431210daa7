//! plauder-chat – Nachrichtenabgleich fuer eine Konversationsansicht
//!
//! Dieses Crate implementiert:
//! - ChatEngine: optimistisches Senden, Pagination, Push-Abgleich, Quittungen
//! - MessagingApi-Trait + HttpApi-Implementierung (REST-Backend)
//! - TransportKanal-Trait + TcpTransport (gerahmte JSON-Events)
//!
//! # Beispiel
//!
//! ```no_run
//! use std::sync::Arc;
//! use plauder_chat::{Absender, ChatEngine, EngineKonfiguration, HttpApi, TcpTransport};
//! use plauder_core::{ConversationId, UserId};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let api = Arc::new(HttpApi::neu("http://localhost:5000/api")?);
//!     let (transport, events) = TcpTransport::verbinden("127.0.0.1:5001", 1024 * 1024).await?;
//!
//!     let ich = Absender { id: UserId::new("u1"), anzeigename: "Alice".into() };
//!     let engine = ChatEngine::neu(
//!         ConversationId::new("c1"),
//!         ich,
//!         EngineKonfiguration::default(),
//!         api,
//!         Arc::new(transport),
//!     );
//!
//!     engine.open()?;
//!     engine.load_initial(20).await?;
//!     let pumpe = Arc::clone(&engine);
//!     tokio::spawn(async move { pumpe.events_verarbeiten(events).await });
//!
//!     engine.send("Hallo").await;
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod engine;
pub mod error;
pub mod store;
pub mod transport;
pub mod types;
pub mod typing;

#[cfg(test)]
mod tests;

// Bequeme Re-Exporte
pub use api::{HttpApi, MessagingApi};
pub use engine::ChatEngine;
pub use error::{ChatError, ChatResult};
pub use store::NachrichtenListe;
pub use transport::{TcpTransport, TransportKanal};
pub use types::{
    Absender, EngineKonfiguration, Ladezustand, ListenerId, Nachricht, NachrichtenStatus,
    SendeErgebnis,
};
pub use typing::TippStatus;
