//! Wire-Format fuer den Transport-Kanal
//!
//! Frame-basiertes Protokoll: Length(u32 big-endian) + JSON-Payload.
//!
//! ## Frame-Format
//!
//! ```text
//! +--------+--------+--------+--------+----...----+
//! | Laenge (u32 BE) | 4 Bytes        | Payload    |
//! +--------+--------+--------+--------+----...----+
//! ```
//!
//! Die Laenge gibt die Anzahl der Payload-Bytes an (ohne die 4 Laengen-Bytes).
//! Maximale Frame-Groesse ist konfigurierbar (Standard: 1 MB).

use bytes::{Buf, BufMut, BytesMut};
use serde::{de::DeserializeOwned, Serialize};
use std::io;
use std::marker::PhantomData;
use tokio_util::codec::{Decoder, Encoder};

/// Standard-maximale Frame-Groesse (1 MB)
pub const DEFAULT_MAX_FRAME_SIZE: usize = 1024 * 1024;

/// Groesse des Laengen-Felds in Bytes
pub const LENGTH_FIELD_SIZE: usize = 4;

/// tokio-util Codec fuer den Event-Kanal
///
/// Dekodiert Frames zu `D` und kodiert jeden serialisierbaren Typ. Der
/// Client nutzt `FrameCodec<EingehendesEvent>` und sendet `AusgehendesEvent`.
///
/// ```rust,no_run
/// use tokio_util::codec::Framed;
/// use plauder_protocol::{EingehendesEvent, FrameCodec};
///
/// // let stream = TcpStream::connect(...).await?;
/// // let framed = Framed::new(stream, FrameCodec::<EingehendesEvent>::new());
/// ```
#[derive(Debug)]
pub struct FrameCodec<D> {
    /// Maximale erlaubte Frame-Groesse in Bytes
    max_frame_size: usize,
    _dekodiert: PhantomData<fn() -> D>,
}

impl<D> FrameCodec<D> {
    pub fn new() -> Self {
        Self::with_max_size(DEFAULT_MAX_FRAME_SIZE)
    }

    pub fn with_max_size(max_frame_size: usize) -> Self {
        Self {
            max_frame_size,
            _dekodiert: PhantomData,
        }
    }

    pub fn max_frame_size(&self) -> usize {
        self.max_frame_size
    }

    fn zu_gross(&self, length: usize) -> io::Error {
        io::Error::new(
            io::ErrorKind::InvalidData,
            format!(
                "Frame zu gross: {} Bytes (Maximum: {} Bytes)",
                length, self.max_frame_size
            ),
        )
    }
}

impl<D> Default for FrameCodec<D> {
    fn default() -> Self {
        Self::new()
    }
}

impl<D> Clone for FrameCodec<D> {
    fn clone(&self) -> Self {
        Self::with_max_size(self.max_frame_size)
    }
}

impl<D: DeserializeOwned> Decoder for FrameCodec<D> {
    type Item = D;
    type Error = io::Error;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        // Warte auf mindestens 4 Bytes fuer das Laengen-Feld
        if src.len() < LENGTH_FIELD_SIZE {
            return Ok(None);
        }

        let length = u32::from_be_bytes([src[0], src[1], src[2], src[3]]) as usize;
        if length > self.max_frame_size {
            return Err(self.zu_gross(length));
        }

        let total_size = LENGTH_FIELD_SIZE + length;
        if src.len() < total_size {
            src.reserve(total_size - src.len());
            return Ok(None);
        }

        src.advance(LENGTH_FIELD_SIZE);
        let payload = src.split_to(length);

        let item = serde_json::from_slice(&payload).map_err(|e| {
            io::Error::new(
                io::ErrorKind::InvalidData,
                format!("JSON-Deserialisierung fehlgeschlagen: {e}"),
            )
        })?;

        Ok(Some(item))
    }
}

impl<D, E: Serialize> Encoder<E> for FrameCodec<D> {
    type Error = io::Error;

    fn encode(&mut self, item: E, dst: &mut BytesMut) -> Result<(), Self::Error> {
        let json = serde_json::to_vec(&item).map_err(|e| {
            io::Error::new(
                io::ErrorKind::InvalidData,
                format!("JSON-Serialisierung fehlgeschlagen: {e}"),
            )
        })?;

        if json.len() > self.max_frame_size {
            return Err(self.zu_gross(json.len()));
        }

        dst.reserve(LENGTH_FIELD_SIZE + json.len());
        dst.put_u32(json.len() as u32);
        dst.put_slice(&json);

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{AusgehendesEvent, EingehendesEvent};
    use plauder_core::types::{ConversationId, UserId};

    #[test]
    fn ausgehendes_event_kodieren_und_serverseitig_lesen() {
        let mut client = FrameCodec::<EingehendesEvent>::new();
        let mut server = FrameCodec::<AusgehendesEvent>::new();

        let mut buf = BytesMut::new();
        client
            .encode(AusgehendesEvent::JoinChat(ConversationId::new("c1")), &mut buf)
            .unwrap();

        let payload_len = u32::from_be_bytes([buf[0], buf[1], buf[2], buf[3]]) as usize;
        assert_eq!(buf.len(), LENGTH_FIELD_SIZE + payload_len);

        let decoded = server.decode(&mut buf).unwrap().expect("Event erwartet");
        assert_eq!(decoded, AusgehendesEvent::JoinChat(ConversationId::new("c1")));
    }

    #[test]
    fn unvollstaendiger_frame_wartet() {
        let mut codec = FrameCodec::<EingehendesEvent>::new();
        let mut buf = BytesMut::new();
        codec
            .encode(EingehendesEvent::Typing(UserId::new("u1")), &mut buf)
            .unwrap();

        let half = buf.len() / 2;
        let mut partial = buf.split_to(half);
        assert!(codec.decode(&mut partial).unwrap().is_none());
    }

    #[test]
    fn zu_wenig_bytes_fuer_laengenfeld() {
        let mut codec = FrameCodec::<EingehendesEvent>::new();
        let mut buf = BytesMut::from(&[0x00, 0x00][..]);
        assert!(codec.decode(&mut buf).unwrap().is_none());
    }

    #[test]
    fn zu_grosser_frame_abgelehnt() {
        let mut codec = FrameCodec::<EingehendesEvent>::with_max_size(100);
        let mut buf = BytesMut::new();
        buf.put_u32(200);
        buf.put_slice(&[b'x'; 200]);
        assert!(codec.decode(&mut buf).is_err());
    }

    #[test]
    fn zu_grosse_nachricht_beim_encode_abgelehnt() {
        let mut codec = FrameCodec::<EingehendesEvent>::with_max_size(10);
        let mut buf = BytesMut::new();
        let result = codec.encode(AusgehendesEvent::Typing(ConversationId::new("c1")), &mut buf);
        assert!(result.is_err());
    }

    #[test]
    fn ungueltiges_json_abgelehnt() {
        let mut codec = FrameCodec::<EingehendesEvent>::new();
        let mut buf = BytesMut::new();
        buf.put_u32(4);
        buf.put_slice(b"nope");
        let err = codec.decode(&mut buf).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
    }

    #[test]
    fn mehrere_events_im_buffer() {
        let mut codec = FrameCodec::<EingehendesEvent>::new();
        let mut buf = BytesMut::new();
        for i in 0..3 {
            codec
                .encode(EingehendesEvent::Typing(UserId::new(format!("u{i}"))), &mut buf)
                .unwrap();
        }
        for i in 0..3 {
            let event = codec.decode(&mut buf).unwrap().expect("Event erwartet");
            assert_eq!(event, EingehendesEvent::Typing(UserId::new(format!("u{i}"))));
        }
        assert!(buf.is_empty());
    }
}
