//! REST-Schnittstelle zum Messaging-Backend
//!
//! Das `MessagingApi`-Trait abstrahiert das Backend, damit Tests eine
//! In-Memory-Implementierung einsetzen koennen. `HttpApi` spricht die
//! echten Endpunkte via reqwest an.

use async_trait::async_trait;
use plauder_core::types::{ConversationId, MessageId};
use plauder_protocol::message::{EditAnfrage, HistoryAnfrage, Nachricht, SendeAnfrage};

use crate::error::{ChatError, ChatResult};

/// Request/Response-Endpunkte des Messaging-Backends
#[async_trait]
pub trait MessagingApi: Send + Sync {
    /// Seite der History laden, geordnet aelteste zuerst, hoechstens `limit` Eintraege
    async fn fetch_history(&self, anfrage: HistoryAnfrage) -> ChatResult<Vec<Nachricht>>;

    /// Nachricht senden; liefert die Nachricht mit Server-ID und Zeitstempel
    async fn send(
        &self,
        conversation_id: &ConversationId,
        anfrage: SendeAnfrage,
    ) -> ChatResult<Nachricht>;

    /// Nachricht editieren; liefert die aktualisierte Nachricht (`edited = true`)
    async fn edit(&self, message_id: &MessageId, inhalt: &str) -> ChatResult<Nachricht>;

    /// Nachricht loeschen
    async fn delete(&self, message_id: &MessageId) -> ChatResult<()>;
}

/// HTTP-Implementierung von `MessagingApi`
#[derive(Debug, Clone)]
pub struct HttpApi {
    client: reqwest::Client,
    basis_url: String,
    token: Option<String>,
}

impl HttpApi {
    /// Erstellt einen HTTP-Client fuer die angegebene Basis-URL
    pub fn neu(basis_url: impl Into<String>) -> ChatResult<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("plauder/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            client,
            basis_url: basis_url.into(),
            token: None,
        })
    }

    /// Bearer-Token fuer alle Anfragen setzen
    pub fn mit_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Vollstaendige URL aus Basis und relativem Pfad
    pub fn url(&self, pfad: &str) -> String {
        format!(
            "{}/{}",
            self.basis_url.trim_end_matches('/'),
            pfad.trim_start_matches('/')
        )
    }

    fn anfrage(&self, methode: reqwest::Method, pfad: &str) -> reqwest::RequestBuilder {
        let builder = self.client.request(methode, self.url(pfad));
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    /// Wandelt Nicht-2xx-Antworten in `ChatError::Backend` um
    async fn pruefen(antwort: reqwest::Response) -> ChatResult<reqwest::Response> {
        let status = antwort.status();
        if status.is_success() {
            return Ok(antwort);
        }
        let text = antwort.text().await.unwrap_or_default();
        Err(ChatError::Backend {
            status: status.as_u16(),
            nachricht: fehlertext(&text),
        })
    }
}

/// Extrahiert `message` aus einer JSON-Fehlerantwort, sonst den Rohtext
fn fehlertext(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v.get("message").and_then(|m| m.as_str()).map(str::to_owned))
        .unwrap_or_else(|| body.trim().to_owned())
}

#[async_trait]
impl MessagingApi for HttpApi {
    async fn fetch_history(&self, anfrage: HistoryAnfrage) -> ChatResult<Vec<Nachricht>> {
        let pfad = format!(
            "message/getmessage/{}?limit={}&skip={}",
            anfrage.conversation_id.as_str(),
            anfrage.limit,
            anfrage.skip
        );
        let antwort = self.anfrage(reqwest::Method::GET, &pfad).send().await?;
        let nachrichten = Self::pruefen(antwort).await?.json().await?;
        Ok(nachrichten)
    }

    async fn send(
        &self,
        conversation_id: &ConversationId,
        anfrage: SendeAnfrage,
    ) -> ChatResult<Nachricht> {
        let pfad = format!("message/sendmessage/{}", conversation_id.as_str());
        let antwort = self
            .anfrage(reqwest::Method::POST, &pfad)
            .json(&anfrage)
            .send()
            .await?;
        Ok(Self::pruefen(antwort).await?.json().await?)
    }

    async fn edit(&self, message_id: &MessageId, inhalt: &str) -> ChatResult<Nachricht> {
        let pfad = format!("message/editmessage/{}", message_id.as_str());
        let antwort = self
            .anfrage(reqwest::Method::PUT, &pfad)
            .json(&EditAnfrage {
                content: inhalt.to_owned(),
            })
            .send()
            .await?;
        Ok(Self::pruefen(antwort).await?.json().await?)
    }

    async fn delete(&self, message_id: &MessageId) -> ChatResult<()> {
        let pfad = format!("message/deletemessage/{}", message_id.as_str());
        let antwort = self.anfrage(reqwest::Method::DELETE, &pfad).send().await?;
        Self::pruefen(antwort).await?;
        Ok(())
    }
}
