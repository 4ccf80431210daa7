//! plauder-cli – Bibliotheks-Root
//!
//! Terminal-Client fuer eine einzelne Konversation: verbindet REST-API und
//! Push-Kanal, verdrahtet sie mit der `ChatEngine` und liest Befehle von
//! stdin.

pub mod anzeige;
pub mod befehl;
pub mod config;

use std::sync::Arc;

use anyhow::Result;
use parking_lot::Mutex;
use plauder_chat::{
    Absender, ChatEngine, HttpApi, MessagingApi, SendeErgebnis, TcpTransport, TransportKanal,
};
use plauder_core::types::{ConversationId, UserId};
use tokio::io::{AsyncBufReadExt, BufReader};

use anzeige::Anzeige;
use befehl::{Befehl, HILFE};
use config::ClientConfig;

/// Haelt die laufende Sitzung zusammen
pub struct Client {
    pub config: ClientConfig,
}

impl Client {
    /// Erstellt einen neuen Client aus der gegebenen Konfiguration
    pub fn neu(config: ClientConfig) -> Self {
        Self { config }
    }

    /// Verbindet sich und laeuft bis `/quit`, EOF auf stdin oder Ctrl-C
    ///
    /// Reihenfolge:
    /// 1. REST-Client und Push-Kanal aufbauen
    /// 2. Konversation oeffnen und erste Seite laden
    /// 3. Push-Events im Hintergrund verarbeiten
    /// 4. Eingabezeilen ausfuehren
    /// 5. Konversation schliessen
    pub async fn starten(self) -> Result<()> {
        self.config.validieren()?;

        let mut api = HttpApi::neu(&self.config.backend.http_url)?;
        if let Some(token) = &self.config.backend.token {
            api = api.mit_token(token);
        }
        let (transport, events) = TcpTransport::verbinden(
            &self.config.backend.transport_adresse,
            self.config.chat.max_frame_groesse,
        )
        .await?;

        let ich = Absender {
            id: UserId::new(&self.config.sitzung.user_id),
            anzeigename: self.config.anzeigename().to_owned(),
        };
        let engine = ChatEngine::neu(
            ConversationId::new(&self.config.sitzung.conversation_id),
            ich,
            self.config.engine_konfiguration(),
            Arc::new(api),
            Arc::new(transport),
        );

        let anzeige = Mutex::new(Anzeige::neu());
        engine.on_list_changed(move |liste| {
            for zeile in anzeige.lock().aktualisieren(liste) {
                println!("{zeile}");
            }
        });

        engine.open()?;
        tracing::info!(
            conversation_id = %engine.conversation_id(),
            http = %self.config.backend.http_url,
            "Konversation geoeffnet"
        );

        if let Err(e) = engine.neu_laden().await {
            eprintln!("{e} (erneut laden mit /reload)");
        }

        let pumpe = {
            let engine = Arc::clone(&engine);
            tokio::spawn(async move { engine.events_verarbeiten(events).await })
        };

        let mut zeilen = BufReader::new(tokio::io::stdin()).lines();
        loop {
            tokio::select! {
                zeile = zeilen.next_line() => {
                    let Some(zeile) = zeile? else { break };
                    if !befehl_ausfuehren(&engine, Befehl::parsen(&zeile)).await {
                        break;
                    }
                }
                _ = tokio::signal::ctrl_c() => {
                    tracing::info!("Ctrl-C empfangen");
                    break;
                }
            }
        }

        if let Err(e) = engine.close() {
            tracing::warn!(fehler = %e, "Konversation konnte nicht sauber geschlossen werden");
        }
        pumpe.abort();
        Ok(())
    }
}

/// Fuehrt einen Befehl aus; false beendet die Eingabeschleife
pub async fn befehl_ausfuehren<A, T>(
    engine: &Arc<ChatEngine<A, T>>,
    befehl: Befehl,
) -> bool
where
    A: MessagingApi + 'static,
    T: TransportKanal + 'static,
{
    match befehl {
        Befehl::Senden(text) => {
            if !text.trim().is_empty() {
                engine.set_draft(text.as_str());
            }
            engine.spawn_send(&text);
        }
        Befehl::Neuladen => {
            if let Err(e) = engine.neu_laden().await {
                eprintln!("{e}");
            }
        }
        Befehl::Aeltere => match engine.aeltere_laden().await {
            Ok(0) if !engine.ladezustand().has_more => println!("Keine aelteren Nachrichten"),
            Ok(anzahl) => println!("{anzahl} aeltere Nachrichten geladen"),
            Err(e) => eprintln!("{e}"),
        },
        Befehl::Retry(temp_id) => match engine.retry(&temp_id).await {
            SendeErgebnis::Verworfen => eprintln!("Keine fehlgeschlagene Nachricht {temp_id}"),
            SendeErgebnis::Fehlgeschlagen { .. } => eprintln!("Erneuter Versuch fehlgeschlagen"),
            SendeErgebnis::Bestaetigt { .. } => {}
        },
        Befehl::Editieren { id, inhalt } => {
            if let Err(e) = engine.edit(&id, &inhalt).await {
                eprintln!("{e}");
            }
        }
        Befehl::Loeschen(id) => {
            if let Err(e) = engine.delete(&id).await {
                eprintln!("{e}");
            }
        }
        Befehl::Gelesen => match engine.acknowledge_read() {
            Ok(ids) => println!("{} Nachrichten als gelesen gemeldet", ids.len()),
            Err(e) => eprintln!("{e}"),
        },
        Befehl::Anwesende => {
            let liste = |ids: Vec<UserId>| {
                ids.iter().map(|id| id.as_str()).collect::<Vec<_>>().join(", ")
            };
            println!("Online: {}", liste(engine.online()));
            println!("Tippt: {}", liste(engine.tippende()));
        }
        Befehl::Hilfe => println!("{HILFE}"),
        Befehl::Ungueltig(meldung) => eprintln!("{meldung}"),
        Befehl::Beenden => return false,
    }
    true
}
