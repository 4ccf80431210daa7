//! Push-Kanal zum Backend
//!
//! `TransportKanal` ist die ausgehende Seite (nicht-blockierendes `emit`).
//! Eingehende Events liefert die konkrete Implementierung ueber eine
//! `mpsc`-Queue, die der Aufrufer an `ChatEngine::events_verarbeiten` gibt.
//!
//! `TcpTransport` nutzt den `FrameCodec` aus plauder-protocol
//! (u32 BE length + JSON payload).

use futures_util::stream::SplitSink;
use futures_util::{SinkExt, StreamExt};
use plauder_protocol::event::{AusgehendesEvent, EingehendesEvent};
use plauder_protocol::wire::FrameCodec;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::codec::Framed;

use crate::error::{ChatError, ChatResult};

/// Groesse der Send-Queue
const SEND_QUEUE_GROESSE: usize = 64;

/// Groesse der Empfangs-Queue
const EMPFANGS_QUEUE_GROESSE: usize = 256;

/// Ausgehende Seite des Push-Kanals
pub trait TransportKanal: Send + Sync {
    /// Sendet ein Event ohne zu blockieren
    fn emit(&self, event: AusgehendesEvent) -> ChatResult<()>;
}

/// Frame-basierte Verbindung zum Push-Endpunkt des Backends
///
/// Beim Drop wird der Lese-Task abgebrochen; der Schreib-Task leert noch
/// die Send-Queue und schliesst dann die Verbindung.
pub struct TcpTransport {
    tx: mpsc::Sender<AusgehendesEvent>,
    leser: JoinHandle<()>,
}

impl TcpTransport {
    /// Baut eine TCP-Verbindung auf und startet Lese- und Schreib-Task
    pub async fn verbinden(
        adresse: &str,
        max_frame_size: usize,
    ) -> ChatResult<(Self, mpsc::Receiver<EingehendesEvent>)> {
        tracing::info!(adresse, "Verbinde mit Push-Kanal");
        let stream = TcpStream::connect(adresse).await?;
        tracing::info!(adresse, "Push-Kanal verbunden");
        Ok(Self::ueber_stream(stream, max_frame_size))
    }

    /// Startet den Transport ueber einem bestehenden Byte-Stream
    pub fn ueber_stream<S>(stream: S, max_frame_size: usize) -> (Self, mpsc::Receiver<EingehendesEvent>)
    where
        S: AsyncRead + AsyncWrite + Send + Unpin + 'static,
    {
        let framed = Framed::new(stream, FrameCodec::<EingehendesEvent>::with_max_size(max_frame_size));
        let (mut sink, mut quelle): (
            SplitSink<Framed<S, FrameCodec<EingehendesEvent>>, AusgehendesEvent>,
            _,
        ) = framed.split();

        let (tx, mut ausgang) = mpsc::channel::<AusgehendesEvent>(SEND_QUEUE_GROESSE);
        let (eingang_tx, eingang) = mpsc::channel::<EingehendesEvent>(EMPFANGS_QUEUE_GROESSE);

        tokio::spawn(async move {
            while let Some(event) = ausgang.recv().await {
                let name = event.name();
                if let Err(e) = sink.send(event).await {
                    tracing::warn!(event = name, fehler = %e, "Event konnte nicht gesendet werden");
                    break;
                }
            }
            let _ = sink.close().await;
        });

        let leser = tokio::spawn(async move {
            while let Some(frame) = quelle.next().await {
                match frame {
                    Ok(event) => {
                        tracing::trace!(event = event.name(), "Event empfangen");
                        if eingang_tx.send(event).await.is_err() {
                            // Empfaenger verworfen – niemand hoert mehr zu
                            break;
                        }
                    }
                    Err(e) => {
                        tracing::warn!(fehler = %e, "Push-Kanal: ungueltiger Frame");
                        break;
                    }
                }
            }
            tracing::debug!("Push-Kanal geschlossen");
        });

        (
            Self { tx, leser },
            eingang,
        )
    }

    /// Gibt true zurueck solange der Schreib-Task laeuft
    pub fn ist_verbunden(&self) -> bool {
        !self.tx.is_closed()
    }
}

impl TransportKanal for TcpTransport {
    fn emit(&self, event: AusgehendesEvent) -> ChatResult<()> {
        match self.tx.try_send(event) {
            Ok(()) => Ok(()),
            Err(mpsc::error::TrySendError::Full(event)) => {
                tracing::warn!(event = event.name(), "Send-Queue voll – Event verworfen");
                Err(ChatError::Transport("Send-Queue voll".into()))
            }
            Err(mpsc::error::TrySendError::Closed(_)) => {
                Err(ChatError::Transport("Verbindung getrennt".into()))
            }
        }
    }
}

impl Drop for TcpTransport {
    fn drop(&mut self) {
        self.leser.abort();
    }
}
