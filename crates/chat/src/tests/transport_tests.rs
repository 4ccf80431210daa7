//! Tests fuer den TcpTransport ueber einen In-Memory-Duplex-Stream

use futures_util::{SinkExt, StreamExt};
use plauder_core::types::{ConversationId, UserId};
use plauder_protocol::event::{AusgehendesEvent, EingehendesEvent};
use plauder_protocol::wire::FrameCodec;
use tokio_util::codec::Framed;

use super::fakes::{bob, nachricht};
use crate::error::ChatError;
use crate::transport::{TcpTransport, TransportKanal};

const MAX: usize = 64 * 1024;

#[tokio::test]
async fn test_emit_erreicht_gegenstelle() {
    let (client, server) = tokio::io::duplex(8192);
    let (transport, _events) = TcpTransport::ueber_stream(client, MAX);
    let mut server = Framed::new(server, FrameCodec::<AusgehendesEvent>::with_max_size(MAX));

    transport
        .emit(AusgehendesEvent::JoinChat(ConversationId::new("c1")))
        .unwrap();
    transport
        .emit(AusgehendesEvent::message_delivered(ConversationId::new("c1")))
        .unwrap();

    let erstes = server.next().await.unwrap().unwrap();
    let zweites = server.next().await.unwrap().unwrap();
    assert_eq!(erstes, AusgehendesEvent::JoinChat(ConversationId::new("c1")));
    assert_eq!(
        zweites,
        AusgehendesEvent::message_delivered(ConversationId::new("c1"))
    );
}

#[tokio::test]
async fn test_eingehende_events_landen_in_queue() {
    let (client, server) = tokio::io::duplex(8192);
    let (_transport, mut events) = TcpTransport::ueber_stream(client, MAX);
    let mut server = Framed::new(server, FrameCodec::<AusgehendesEvent>::with_max_size(MAX));

    server
        .send(EingehendesEvent::NewMessage(nachricht("m1", bob(), "hi")))
        .await
        .unwrap();
    server
        .send(EingehendesEvent::ActiveUsers(vec![UserId::new("u1")]))
        .await
        .unwrap();

    match events.recv().await.unwrap() {
        EingehendesEvent::NewMessage(n) => {
            assert_eq!(n.id.as_str(), "m1");
            assert_eq!(n.absender, bob());
        }
        anderes => panic!("Unerwartetes Event: {anderes:?}"),
    }
    assert_eq!(
        events.recv().await.unwrap(),
        EingehendesEvent::ActiveUsers(vec![UserId::new("u1")])
    );
}

#[tokio::test]
async fn test_gegenstelle_schliesst_beendet_queue() {
    let (client, server) = tokio::io::duplex(8192);
    let (_transport, mut events) = TcpTransport::ueber_stream(client, MAX);

    drop(server);

    assert!(events.recv().await.is_none());
}

#[tokio::test]
async fn test_emit_nach_verbindungsabbruch_schlaegt_fehl() {
    let (client, server) = tokio::io::duplex(64);
    let (transport, _events) = TcpTransport::ueber_stream(client, MAX);
    drop(server);

    // Der Schreib-Task bemerkt den Abbruch beim ersten Senden
    let _ = transport.emit(AusgehendesEvent::JoinChat(ConversationId::new("c1")));
    for _ in 0..100 {
        if !transport.ist_verbunden() {
            break;
        }
        tokio::task::yield_now().await;
    }

    assert!(!transport.ist_verbunden());
    let ergebnis = transport.emit(AusgehendesEvent::LeaveChat(ConversationId::new("c1")));
    assert!(matches!(ergebnis, Err(ChatError::Transport(_))));
}

#[tokio::test]
async fn test_verbinden_ueber_tcp() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let adresse = listener.local_addr().unwrap().to_string();

    let server = tokio::spawn(async move {
        let (stream, _) = listener.accept().await.unwrap();
        let mut framed = Framed::new(stream, FrameCodec::<AusgehendesEvent>::with_max_size(MAX));
        let event = framed.next().await.unwrap().unwrap();
        framed
            .send(EingehendesEvent::Typing(UserId::new("u-bob")))
            .await
            .unwrap();
        event
    });

    let (transport, mut events) = TcpTransport::verbinden(&adresse, MAX).await.unwrap();
    transport
        .emit(AusgehendesEvent::Typing(ConversationId::new("c1")))
        .unwrap();

    assert_eq!(
        events.recv().await.unwrap(),
        EingehendesEvent::Typing(UserId::new("u-bob"))
    );
    assert_eq!(
        server.await.unwrap(),
        AusgehendesEvent::Typing(ConversationId::new("c1"))
    );
}
