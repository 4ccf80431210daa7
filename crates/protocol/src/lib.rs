//! plauder-protocol – Wire-Formate
//!
//! Dieses Crate definiert alle Typen die zwischen Client und Backend
//! ausgetauscht werden:
//! - `message`: Nachrichten und REST-DTOs, inkl. Normalisierung des Absenders
//! - `event`: benannte Transport-Events (eingehend und ausgehend)
//! - `wire`: Frame-Codec (u32 BE Laenge + JSON) fuer den Transport-Kanal

pub mod event;
pub mod message;
pub mod wire;

pub use event::{AusgehendesEvent, EingehendesEvent, Quittung};
pub use message::{
    Absender, EditAnfrage, HistoryAnfrage, Nachricht, NachrichtenStatus, NachrichtenTyp,
    SendeAnfrage,
};
pub use wire::FrameCodec;
