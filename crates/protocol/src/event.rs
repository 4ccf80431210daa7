//! Transport-Events
//!
//! Der Push-Kanal arbeitet mit benannten Events. Jedes Event wird als
//! `{"event": "<name>", "data": <payload>}` serialisiert; die Namen
//! entsprechen denen des Backends (`newMessage`, `joinChat`, ...).

use plauder_core::types::{ConversationId, MessageId, UserId};
use serde::{Deserialize, Serialize};

use crate::message::Nachricht;

/// Empfangs- bzw. Lesequittung eines Teilnehmers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quittung {
    pub user_id: UserId,
    pub message_ids: Vec<MessageId>,
}

/// Events die der Client vom Transport-Kanal empfaengt
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "camelCase")]
pub enum EingehendesEvent {
    /// Neue Nachricht in einer Konversation
    NewMessage(Nachricht),
    /// Nachricht wurde editiert
    EditMessage(Nachricht),
    /// Nachricht wurde geloescht
    DeleteMessage(MessageId),
    /// Teilnehmer tippt
    Typing(UserId),
    /// Teilnehmer tippt nicht mehr
    StopTyping(UserId),
    /// Aktuell verbundene Benutzer
    ActiveUsers(Vec<UserId>),
    MessagesDelivered(Quittung),
    MessagesRead(Quittung),
}

impl EingehendesEvent {
    /// Event-Name wie auf dem Draht
    pub fn name(&self) -> &'static str {
        match self {
            Self::NewMessage(_) => "newMessage",
            Self::EditMessage(_) => "editMessage",
            Self::DeleteMessage(_) => "deleteMessage",
            Self::Typing(_) => "typing",
            Self::StopTyping(_) => "stopTyping",
            Self::ActiveUsers(_) => "activeUsers",
            Self::MessagesDelivered(_) => "messagesDelivered",
            Self::MessagesRead(_) => "messagesRead",
        }
    }
}

/// Payload mit Konversations-ID
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KonversationsBezug {
    pub conversation_id: ConversationId,
}

/// Payload fuer `messageRead`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeseBestaetigung {
    pub conversation_id: ConversationId,
    pub message_ids: Vec<MessageId>,
}

/// Events die der Client ueber den Transport-Kanal sendet
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "camelCase")]
pub enum AusgehendesEvent {
    /// Raum der Konversation betreten
    JoinChat(ConversationId),
    /// Raum der Konversation verlassen
    LeaveChat(ConversationId),
    Typing(ConversationId),
    StopTyping(ConversationId),
    /// Fordert die aktuelle Menge verbundener Benutzer an (Antwort: `activeUsers`)
    GetActiveUsers,
    MessageDelivered(KonversationsBezug),
    MessageRead(LeseBestaetigung),
}

impl AusgehendesEvent {
    pub fn message_delivered(conversation_id: ConversationId) -> Self {
        Self::MessageDelivered(KonversationsBezug { conversation_id })
    }

    pub fn message_read(conversation_id: ConversationId, message_ids: Vec<MessageId>) -> Self {
        Self::MessageRead(LeseBestaetigung {
            conversation_id,
            message_ids,
        })
    }

    /// Event-Name wie auf dem Draht
    pub fn name(&self) -> &'static str {
        match self {
            Self::JoinChat(_) => "joinChat",
            Self::LeaveChat(_) => "leaveChat",
            Self::Typing(_) => "typing",
            Self::StopTyping(_) => "stopTyping",
            Self::GetActiveUsers => "getActiveUsers",
            Self::MessageDelivered(_) => "messageDelivered",
            Self::MessageRead(_) => "messageRead",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_message_vom_draht() {
        let json = r#"{"event":"newMessage","data":{"_id":"m1","chat":"c1","sender":{"_id":"u1","username":"anna"},"content":"hi"}}"#;
        let event: EingehendesEvent = serde_json::from_str(json).unwrap();
        match event {
            EingehendesEvent::NewMessage(n) => {
                assert_eq!(n.id, MessageId::new("m1"));
                assert_eq!(n.absender.anzeigename, "anna");
            }
            other => panic!("Erwartet newMessage, erhalten: {other:?}"),
        }
    }

    #[test]
    fn quittung_vom_draht() {
        let json = r#"{"event":"messagesRead","data":{"userId":"u2","messageIds":["m1","m2"]}}"#;
        let event: EingehendesEvent = serde_json::from_str(json).unwrap();
        assert_eq!(event.name(), "messagesRead");
        assert_eq!(
            event,
            EingehendesEvent::MessagesRead(Quittung {
                user_id: UserId::new("u2"),
                message_ids: vec![MessageId::new("m1"), MessageId::new("m2")],
            })
        );
    }

    #[test]
    fn active_users_vom_draht() {
        let json = r#"{"event":"activeUsers","data":["u1","u2"]}"#;
        let event: EingehendesEvent = serde_json::from_str(json).unwrap();
        assert_eq!(
            event,
            EingehendesEvent::ActiveUsers(vec![UserId::new("u1"), UserId::new("u2")])
        );
    }

    #[test]
    fn ausgehende_events_auf_dem_draht() {
        let join = serde_json::to_value(AusgehendesEvent::JoinChat(ConversationId::new("c1"))).unwrap();
        assert_eq!(join, serde_json::json!({"event": "joinChat", "data": "c1"}));

        let read = serde_json::to_value(AusgehendesEvent::message_read(
            ConversationId::new("c1"),
            vec![MessageId::new("m9")],
        ))
        .unwrap();
        assert_eq!(
            read,
            serde_json::json!({
                "event": "messageRead",
                "data": {"conversationId": "c1", "messageIds": ["m9"]}
            })
        );
    }

    #[test]
    fn praesenz_anfrage_ohne_payload() {
        let json = serde_json::to_value(AusgehendesEvent::GetActiveUsers).unwrap();
        assert_eq!(json, serde_json::json!({"event": "getActiveUsers"}));
        assert_eq!(AusgehendesEvent::GetActiveUsers.name(), "getActiveUsers");

        let zurueck: AusgehendesEvent = serde_json::from_value(json).unwrap();
        assert_eq!(zurueck, AusgehendesEvent::GetActiveUsers);
    }

    #[test]
    fn namen_stimmen_mit_serde_ueberein() {
        let event = AusgehendesEvent::message_delivered(ConversationId::new("c1"));
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["event"], event.name());
    }
}
