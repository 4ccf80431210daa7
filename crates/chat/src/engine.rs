//! ChatEngine – Nachrichtenabgleich fuer eine Konversationsansicht
//!
//! Die Engine haelt eine geordnete, deduplizierte Nachrichtenliste und
//! fuehrt drei Schreibquellen zusammen:
//! - History-Abrufe (`load_initial`, `load_older`)
//! - optimistische lokale Sendungen (`send`, `retry`)
//! - Push-Events des Transport-Kanals (`handle_transport_event`)
//!
//! Jede Aenderung wird ueber die ID angewendet und ist idempotent; die
//! Reihenfolge, in der Push-Events und Backend-Antworten eintreffen, spielt
//! keine Rolle. Der Zustands-Lock wird nie ueber ein `.await` gehalten.

use std::cell::Cell;
use std::collections::HashSet;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::{Mutex, ReentrantMutex};
use plauder_core::types::{ConversationId, MessageId, UserId};
use plauder_protocol::event::{AusgehendesEvent, EingehendesEvent};
use plauder_protocol::message::{HistoryAnfrage, SendeAnfrage};
use tokio::sync::mpsc;

use crate::api::MessagingApi;
use crate::error::{ChatError, ChatResult};
use crate::store::NachrichtenListe;
use crate::transport::TransportKanal;
use crate::types::{
    Absender, EngineKonfiguration, Ladezustand, ListenerId, Nachricht, NachrichtenStatus,
    SendeErgebnis,
};
use crate::typing::TippStatus;

type Listener = Arc<dyn Fn(&[Nachricht]) + Send + Sync>;

/// Veraenderlicher Zustand einer Ansicht
struct Zustand {
    liste: NachrichtenListe,
    /// Anzahl bereits abgerufener Server-Nachrichten (skip)
    cursor: usize,
    has_more: bool,
    laedt_aeltere: bool,
    /// Wird bei jedem erfolgreichen `load_initial` erhoeht
    generation: u64,
    tippen: TippStatus,
    online: HashSet<UserId>,
    entwurf: String,
    tippe_selbst: bool,
    tipp_generation: u64,
    letzter_temp_ms: u64,
    /// Wird bei jeder Listenaenderung erhoeht
    version: u64,
}

/// Abgleich-Engine fuer genau eine Konversation
pub struct ChatEngine<A: MessagingApi, T: TransportKanal> {
    conversation_id: ConversationId,
    ich: Absender,
    konfiguration: EngineKonfiguration,
    api: Arc<A>,
    transport: Arc<T>,
    zustand: Mutex<Zustand>,
    listener: Mutex<Vec<(ListenerId, Listener)>>,
    naechste_listener_id: AtomicU64,
    /// Version der zuletzt ausgelieferten Momentaufnahme
    ///
    /// Serialisiert die Auslieferung an die Listener. Reentrant, damit ein
    /// Listener selbst wieder Operationen der Engine aufrufen darf.
    ausgeliefert: ReentrantMutex<Cell<u64>>,
}

impl<A: MessagingApi, T: TransportKanal> ChatEngine<A, T> {
    /// Erstellt eine neue Engine fuer die Konversation
    pub fn neu(
        conversation_id: ConversationId,
        ich: Absender,
        konfiguration: EngineKonfiguration,
        api: Arc<A>,
        transport: Arc<T>,
    ) -> Arc<Self> {
        let tippen = TippStatus::neu(konfiguration.tipp_ablauf);
        Arc::new(Self {
            conversation_id,
            ich,
            konfiguration,
            api,
            transport,
            zustand: Mutex::new(Zustand {
                liste: NachrichtenListe::neu(),
                cursor: 0,
                has_more: true,
                laedt_aeltere: false,
                generation: 0,
                tippen,
                online: HashSet::new(),
                entwurf: String::new(),
                tippe_selbst: false,
                tipp_generation: 0,
                letzter_temp_ms: 0,
                version: 0,
            }),
            listener: Mutex::new(Vec::new()),
            naechste_listener_id: AtomicU64::new(1),
            ausgeliefert: ReentrantMutex::new(Cell::new(0)),
        })
    }

    pub fn conversation_id(&self) -> &ConversationId {
        &self.conversation_id
    }

    pub fn konfiguration(&self) -> &EngineKonfiguration {
        &self.konfiguration
    }

    // -----------------------------------------------------------------------
    // Beobachter
    // -----------------------------------------------------------------------

    /// Registriert einen Listener der nach jeder Listenaenderung eine
    /// Momentaufnahme erhaelt
    pub fn on_list_changed(
        &self,
        listener: impl Fn(&[Nachricht]) + Send + Sync + 'static,
    ) -> ListenerId {
        let id = ListenerId(self.naechste_listener_id.fetch_add(1, Ordering::Relaxed));
        self.listener.lock().push((id, Arc::new(listener)));
        id
    }

    /// Entfernt einen Listener; true wenn er registriert war
    pub fn remove_listener(&self, id: ListenerId) -> bool {
        let mut listener = self.listener.lock();
        let vorher = listener.len();
        listener.retain(|(lid, _)| *lid != id);
        vorher != listener.len()
    }

    /// Liefert eine Momentaufnahme aus, sofern keine neuere schon
    /// ausgeliefert wurde
    fn benachrichtigen(&self, version: u64, snapshot: &[Nachricht]) {
        let ausgeliefert = self.ausgeliefert.lock();
        let listener: Vec<Listener> = self.listener.lock().iter().map(|(_, l)| l.clone()).collect();
        for l in listener {
            // Ein Listener kann reentrant eine neuere Version ausgeliefert haben
            if ausgeliefert.get() > version {
                tracing::trace!(version, "Veraltete Momentaufnahme verworfen");
                return;
            }
            ausgeliefert.set(version);
            l(snapshot);
        }
    }

    /// Fuehrt `f` unter dem Zustands-Lock aus und benachrichtigt danach die
    /// Listener, falls `f` eine Listenaenderung meldet
    fn mutieren<R>(&self, f: impl FnOnce(&mut Zustand) -> (R, bool)) -> R {
        let (ergebnis, snapshot) = {
            let mut z = self.zustand.lock();
            let (ergebnis, geaendert) = f(&mut z);
            let snapshot = geaendert.then(|| {
                z.version += 1;
                (z.version, z.liste.als_slice().to_vec())
            });
            (ergebnis, snapshot)
        };
        if let Some((version, snapshot)) = snapshot {
            self.benachrichtigen(version, &snapshot);
        }
        ergebnis
    }

    fn emit(&self, event: AusgehendesEvent) -> ChatResult<()> {
        let name = event.name();
        self.transport.emit(event).inspect_err(|e| {
            tracing::warn!(
                conversation_id = %self.conversation_id,
                event = name,
                fehler = %e,
                "Transport-Event konnte nicht gesendet werden"
            );
        })
    }

    // -----------------------------------------------------------------------
    // Abfragen
    // -----------------------------------------------------------------------

    /// Momentaufnahme der Nachrichtenliste (aelteste zuerst)
    pub fn nachrichten(&self) -> Vec<Nachricht> {
        self.zustand.lock().liste.als_slice().to_vec()
    }

    pub fn ladezustand(&self) -> Ladezustand {
        let z = self.zustand.lock();
        Ladezustand {
            cursor: z.cursor,
            has_more: z.has_more,
            laedt_aeltere: z.laedt_aeltere,
        }
    }

    /// Teilnehmer die gerade tippen (abgelaufene Eintraege werden entfernt)
    pub fn tippende(&self) -> Vec<UserId> {
        let mut z = self.zustand.lock();
        z.tippen.aufraeumen();
        z.tippen.aktive()
    }

    pub fn ist_online(&self, user_id: &UserId) -> bool {
        self.zustand.lock().online.contains(user_id)
    }

    pub fn online(&self) -> Vec<UserId> {
        let mut ids: Vec<UserId> = self.zustand.lock().online.iter().cloned().collect();
        ids.sort();
        ids
    }

    /// Aktueller Inhalt des Eingabefelds
    pub fn entwurf(&self) -> String {
        self.zustand.lock().entwurf.clone()
    }

    // -----------------------------------------------------------------------
    // Ansicht oeffnen / schliessen
    // -----------------------------------------------------------------------

    /// Tritt dem Raum der Konversation bei, meldet Zustellung und fordert
    /// die aktuelle Online-Menge an
    pub fn open(&self) -> ChatResult<()> {
        self.emit(AusgehendesEvent::JoinChat(self.conversation_id.clone()))?;
        self.emit(AusgehendesEvent::message_delivered(self.conversation_id.clone()))?;
        self.emit(AusgehendesEvent::GetActiveUsers)?;
        tracing::debug!(conversation_id = %self.conversation_id, "Konversation geoeffnet");
        Ok(())
    }

    /// Verlaesst den Raum; beendet eine laufende eigene Tipp-Anzeige
    pub fn close(&self) -> ChatResult<()> {
        let tippte = {
            let mut z = self.zustand.lock();
            z.tippen.leeren();
            z.tipp_generation += 1;
            std::mem::replace(&mut z.tippe_selbst, false)
        };
        if tippte {
            self.emit(AusgehendesEvent::StopTyping(self.conversation_id.clone()))?;
        }
        self.emit(AusgehendesEvent::LeaveChat(self.conversation_id.clone()))?;
        tracing::debug!(conversation_id = %self.conversation_id, "Konversation geschlossen");
        Ok(())
    }

    // -----------------------------------------------------------------------
    // History
    // -----------------------------------------------------------------------

    /// Laedt die neuesten `limit` Nachrichten und ersetzt die Liste
    ///
    /// Setzt den Cursor auf die Anzahl gelieferter Nachrichten und
    /// `has_more = (geliefert == limit)`. Temporaere Eintraege (`sending`
    /// oder `failed`) bleiben erhalten und folgen auf die geladene Seite.
    /// Bei Fehlern bleibt der Zustand unveraendert; es gibt keinen
    /// automatischen Neuversuch.
    pub async fn load_initial(&self, limit: usize) -> ChatResult<usize> {
        if limit == 0 {
            return Err(ChatError::UngueltigeEingabe("limit muss groesser 0 sein".into()));
        }

        let seite = self
            .api
            .fetch_history(HistoryAnfrage {
                conversation_id: self.conversation_id.clone(),
                limit,
                skip: 0,
            })
            .await
            .map_err(|e| {
                tracing::warn!(conversation_id = %self.conversation_id, fehler = %e, "Initialer Abruf fehlgeschlagen");
                ChatError::Fetch(e.to_string())
            })?;

        let anzahl = seite.len();
        self.mutieren(|z| {
            // Unbestaetigte Sendungen ueberleben das Neuladen am Ende der Liste
            let offen = z.liste.unbestaetigte();
            z.liste.ersetzen_alle(seite);
            for n in offen {
                z.liste.anhaengen_falls_neu(n);
            }
            z.cursor = anzahl;
            z.has_more = anzahl == limit;
            // Laufende aeltere Abrufe gehoeren zur vorherigen Generation
            z.generation += 1;
            z.laedt_aeltere = false;
            ((), true)
        });

        tracing::debug!(
            conversation_id = %self.conversation_id,
            anzahl,
            "History geladen"
        );
        Ok(anzahl)
    }

    /// Laedt die naechste aeltere Seite und stellt sie voran
    ///
    /// Gibt die Anzahl vorangestellter Nachrichten zurueck, damit der
    /// Aufrufer die Scroll-Position ausgleichen kann. No-op (`Ok(0)`) wenn
    /// keine weiteren Nachrichten existieren oder bereits ein Abruf laeuft.
    pub async fn load_older(&self, limit: usize) -> ChatResult<usize> {
        if limit == 0 {
            return Err(ChatError::UngueltigeEingabe("limit muss groesser 0 sein".into()));
        }

        let (skip, generation) = {
            let mut z = self.zustand.lock();
            if !z.has_more || z.laedt_aeltere {
                return Ok(0);
            }
            z.laedt_aeltere = true;
            (z.cursor, z.generation)
        };

        let ergebnis = self
            .api
            .fetch_history(HistoryAnfrage {
                conversation_id: self.conversation_id.clone(),
                limit,
                skip,
            })
            .await;

        self.mutieren(|z| {
            if z.generation != generation {
                tracing::debug!(
                    conversation_id = %self.conversation_id,
                    "Veraltete Seite verworfen"
                );
                return (Ok(0), false);
            }
            z.laedt_aeltere = false;

            let seite = match ergebnis {
                Ok(seite) => seite,
                Err(e) => {
                    tracing::warn!(
                        conversation_id = %self.conversation_id,
                        skip,
                        fehler = %e,
                        "Aeltere Nachrichten konnten nicht geladen werden"
                    );
                    return (Err(ChatError::Fetch(e.to_string())), false);
                }
            };

            let geliefert = seite.len();
            let eingefuegt = z.liste.voranstellen(seite);
            z.cursor += geliefert;
            if geliefert < limit {
                z.has_more = false;
            }
            tracing::debug!(
                conversation_id = %self.conversation_id,
                geliefert,
                eingefuegt,
                "Aeltere Seite geladen"
            );
            (Ok(eingefuegt), eingefuegt > 0)
        })
    }

    /// `load_initial` mit der konfigurierten Seitengroesse
    pub async fn neu_laden(&self) -> ChatResult<usize> {
        self.load_initial(self.konfiguration.seiten_limit).await
    }

    /// `load_older` mit der konfigurierten Seitengroesse
    pub async fn aeltere_laden(&self) -> ChatResult<usize> {
        self.load_older(self.konfiguration.seiten_limit).await
    }

    // -----------------------------------------------------------------------
    // Senden
    // -----------------------------------------------------------------------

    /// Legt die temporaere Nachricht an (optimistisch, synchron)
    fn senden_vorbereiten(&self, inhalt: &str) -> Option<(MessageId, String)> {
        let inhalt = inhalt.trim();
        if inhalt.is_empty() {
            return None;
        }
        let inhalt = inhalt.to_owned();

        let temp_id = self.mutieren(|z| {
            // Streng monoton, damit zwei Sendungen in derselben Millisekunde
            // verschiedene IDs bekommen
            let ms = jetzt_ms().max(z.letzter_temp_ms + 1);
            z.letzter_temp_ms = ms;
            let mut temp_id = MessageId::temporaer(ms);
            while z.liste.enthaelt(&temp_id) {
                z.letzter_temp_ms += 1;
                temp_id = MessageId::temporaer(z.letzter_temp_ms);
            }

            z.liste.anhaengen_falls_neu(Nachricht::temporaer(
                temp_id.clone(),
                self.conversation_id.clone(),
                self.ich.clone(),
                inhalt.clone(),
            ));
            z.entwurf.clear();
            (temp_id, true)
        });

        tracing::debug!(conversation_id = %self.conversation_id, temp_id = %temp_id, "Nachricht optimistisch angezeigt");
        Some((temp_id, inhalt))
    }

    /// Schickt den Inhalt ans Backend und gleicht das Ergebnis ab
    ///
    /// `an_ort_und_stelle`: die bestaetigte Nachricht ersetzt den temporaeren
    /// Eintrag an seiner Position (Retry), sonst wird sie am Ende angehaengt.
    async fn senden_abschliessen(
        &self,
        temp_id: MessageId,
        inhalt: String,
        an_ort_und_stelle: bool,
    ) -> SendeErgebnis {
        match self
            .api
            .send(&self.conversation_id, SendeAnfrage::text(inhalt))
            .await
        {
            Ok(bestaetigt) => {
                let server_id = bestaetigt.id.clone();
                self.mutieren(|z| {
                    // Kann bereits per Push eingetroffen sein
                    if z.liste.enthaelt(&server_id) {
                        z.liste.entfernen(&temp_id);
                    } else if !an_ort_und_stelle || !z.liste.ersetzen(&temp_id, bestaetigt.clone()) {
                        z.liste.entfernen(&temp_id);
                        z.liste.anhaengen_falls_neu(bestaetigt);
                    }
                    ((), true)
                });
                tracing::debug!(
                    conversation_id = %self.conversation_id,
                    temp_id = %temp_id,
                    message_id = %server_id,
                    "Nachricht bestaetigt"
                );
                SendeErgebnis::Bestaetigt { temp_id, server_id }
            }
            Err(e) => {
                let fehler = ChatError::Send(e.to_string());
                tracing::warn!(
                    conversation_id = %self.conversation_id,
                    temp_id = %temp_id,
                    fehler = %fehler,
                    "Nachricht als fehlgeschlagen markiert"
                );
                self.mutieren(|z| {
                    let geaendert = z
                        .liste
                        .aktualisieren(&temp_id, |n| n.status = NachrichtenStatus::Failed);
                    ((), geaendert)
                });
                SendeErgebnis::Fehlgeschlagen { temp_id }
            }
        }
    }

    /// Sendet eine Nachricht optimistisch und wartet auf das Backend
    ///
    /// Leerer oder nur aus Leerzeichen bestehender Inhalt wird ohne jede
    /// Aenderung verworfen.
    pub async fn send(&self, inhalt: &str) -> SendeErgebnis {
        match self.senden_vorbereiten(inhalt) {
            Some((temp_id, inhalt)) => self.senden_abschliessen(temp_id, inhalt, false).await,
            None => SendeErgebnis::Verworfen,
        }
    }

    /// Setzt einen fehlgeschlagenen Eintrag zurueck auf `sending` (an Ort und Stelle)
    fn retry_vorbereiten(&self, temp_id: &MessageId) -> Option<String> {
        self.mutieren(|z| {
            let inhalt = match z.liste.finden(temp_id) {
                Some(n) if n.status == NachrichtenStatus::Failed => n.inhalt.clone(),
                _ => return (None, false),
            };
            z.liste
                .aktualisieren(temp_id, |n| n.status = NachrichtenStatus::Sending);
            (Some(inhalt), true)
        })
    }

    /// Sendet einen fehlgeschlagenen Eintrag erneut
    ///
    /// Der Eintrag behaelt seine Position, auch nach der Bestaetigung.
    /// Unbekannte IDs oder Eintraege
    /// die nicht `failed` sind, werden ignoriert.
    pub async fn retry(&self, temp_id: &MessageId) -> SendeErgebnis {
        match self.retry_vorbereiten(temp_id) {
            Some(inhalt) => {
                tracing::debug!(conversation_id = %self.conversation_id, temp_id = %temp_id, "Erneuter Sendeversuch");
                self.senden_abschliessen(temp_id.clone(), inhalt, true).await
            }
            None => SendeErgebnis::Verworfen,
        }
    }

    // -----------------------------------------------------------------------
    // Editieren / Loeschen
    // -----------------------------------------------------------------------

    /// Editiert eine Nachricht; lokal erst nach Bestaetigung
    pub async fn edit(&self, message_id: &MessageId, inhalt: &str) -> ChatResult<()> {
        let inhalt = inhalt.trim();
        if inhalt.is_empty() {
            return Err(ChatError::UngueltigeEingabe(
                "Nachrichteninhalt darf nicht leer sein".into(),
            ));
        }
        if message_id.ist_temporaer() {
            return Err(ChatError::UngueltigeEingabe(format!(
                "Unbestaetigte Nachricht kann nicht editiert werden: {message_id}"
            )));
        }

        let aktualisiert = self.api.edit(message_id, inhalt).await.map_err(|e| {
            tracing::warn!(message_id = %message_id, fehler = %e, "Editieren fehlgeschlagen");
            ChatError::Edit(e.to_string())
        })?;

        self.edit_anwenden(message_id, aktualisiert.inhalt);
        Ok(())
    }

    /// Loescht eine Nachricht; lokal erst nach Bestaetigung
    pub async fn delete(&self, message_id: &MessageId) -> ChatResult<()> {
        if message_id.ist_temporaer() {
            return Err(ChatError::UngueltigeEingabe(format!(
                "Unbestaetigte Nachricht kann nicht geloescht werden: {message_id}"
            )));
        }

        self.api.delete(message_id).await.map_err(|e| {
            tracing::warn!(message_id = %message_id, fehler = %e, "Loeschen fehlgeschlagen");
            ChatError::Delete(e.to_string())
        })?;

        self.delete_anwenden(message_id);
        Ok(())
    }

    fn edit_anwenden(&self, message_id: &MessageId, inhalt: String) -> bool {
        self.mutieren(|z| {
            let geaendert = z.liste.aktualisieren(message_id, |n| {
                n.inhalt = inhalt;
                n.editiert = true;
            });
            (geaendert, geaendert)
        })
    }

    fn delete_anwenden(&self, message_id: &MessageId) -> bool {
        self.mutieren(|z| {
            let geaendert = z.liste.entfernen(message_id).is_some();
            (geaendert, geaendert)
        })
    }

    // -----------------------------------------------------------------------
    // Push-Events
    // -----------------------------------------------------------------------

    /// Uebernimmt eine per Push gelieferte Nachricht
    ///
    /// Haengt sie am Ende an, sofern die ID nicht schon existiert (z.B.
    /// weil die Sende-Antwort zuerst eintraf). Nachrichten anderer
    /// Konversationen werden ignoriert.
    pub fn receive_push(&self, nachricht: Nachricht) -> bool {
        if nachricht.conversation_id != self.conversation_id {
            tracing::trace!(
                conversation_id = %self.conversation_id,
                fremd = %nachricht.conversation_id,
                "Push fuer andere Konversation ignoriert"
            );
            return false;
        }

        let von_anderem = nachricht.absender.id != self.ich.id;
        let eingefuegt = self.mutieren(|z| {
            let eingefuegt = z.liste.anhaengen_falls_neu(nachricht);
            (eingefuegt, eingefuegt)
        });

        if eingefuegt && von_anderem {
            let _ = self.emit(AusgehendesEvent::message_delivered(
                self.conversation_id.clone(),
            ));
        }
        eingefuegt
    }

    /// Markiert die genannten Nachrichten als zugestellt
    pub fn mark_delivered(&self, ids: &[MessageId]) -> usize {
        self.status_anheben(ids, NachrichtenStatus::Delivered)
    }

    /// Markiert die genannten Nachrichten als gelesen
    pub fn mark_read(&self, ids: &[MessageId]) -> usize {
        self.status_anheben(ids, NachrichtenStatus::Read)
    }

    fn status_anheben(&self, ids: &[MessageId], status: NachrichtenStatus) -> usize {
        self.mutieren(|z| {
            let anzahl = z.liste.status_anheben(ids, status);
            (anzahl, anzahl > 0)
        })
    }

    /// Einziger Eingang fuer Push-Events
    pub fn handle_transport_event(&self, event: EingehendesEvent) {
        tracing::trace!(conversation_id = %self.conversation_id, event = event.name(), "Transport-Event");
        match event {
            EingehendesEvent::NewMessage(nachricht) => {
                self.receive_push(nachricht);
            }
            EingehendesEvent::EditMessage(nachricht) => {
                if nachricht.conversation_id == self.conversation_id {
                    // Ausserhalb des geladenen Fensters: ignoriert
                    self.edit_anwenden(&nachricht.id, nachricht.inhalt);
                }
            }
            EingehendesEvent::DeleteMessage(message_id) => {
                self.delete_anwenden(&message_id);
            }
            EingehendesEvent::Typing(user_id) => {
                if user_id != self.ich.id {
                    self.zustand.lock().tippen.tippt(user_id);
                }
            }
            EingehendesEvent::StopTyping(user_id) => {
                self.zustand.lock().tippen.gestoppt(&user_id);
            }
            EingehendesEvent::ActiveUsers(ids) => {
                self.zustand.lock().online = ids.into_iter().collect();
            }
            EingehendesEvent::MessagesDelivered(quittung) => {
                self.mark_delivered(&quittung.message_ids);
            }
            EingehendesEvent::MessagesRead(quittung) => {
                self.mark_read(&quittung.message_ids);
            }
        }
    }

    /// Verarbeitet Events bis der Kanal geschlossen wird
    pub async fn events_verarbeiten(&self, mut rx: mpsc::Receiver<EingehendesEvent>) {
        while let Some(event) = rx.recv().await {
            self.handle_transport_event(event);
        }
        tracing::debug!(conversation_id = %self.conversation_id, "Event-Kanal beendet");
    }

    /// Meldet alle geladenen, noch nicht gelesenen Nachrichten anderer
    /// Teilnehmer als gelesen und gibt deren IDs zurueck
    pub fn acknowledge_read(&self) -> ChatResult<Vec<MessageId>> {
        let ids: Vec<MessageId> = {
            let z = self.zustand.lock();
            z.liste
                .als_slice()
                .iter()
                .filter(|n| n.absender.id != self.ich.id && !n.id.ist_temporaer())
                .filter(|n| n.status != NachrichtenStatus::Read)
                .map(|n| n.id.clone())
                .collect()
        };
        if !ids.is_empty() {
            self.emit(AusgehendesEvent::message_read(
                self.conversation_id.clone(),
                ids.clone(),
            ))?;
            self.mark_read(&ids);
        }
        Ok(ids)
    }
}

impl<A, T> ChatEngine<A, T>
where
    A: MessagingApi + 'static,
    T: TransportKanal + 'static,
{
    /// Wie `send`, aber der Backend-Aufruf laeuft in einem eigenen Task
    ///
    /// Die temporaere Nachricht steht bei Rueckkehr bereits in der Liste.
    /// Gibt deren ID zurueck, `None` bei leerem Inhalt.
    pub fn spawn_send(self: &Arc<Self>, inhalt: &str) -> Option<MessageId> {
        let (temp_id, inhalt) = self.senden_vorbereiten(inhalt)?;
        let engine = Arc::clone(self);
        let id = temp_id.clone();
        tokio::spawn(async move {
            engine.senden_abschliessen(id, inhalt, false).await;
        });
        Some(temp_id)
    }

    /// Wie `retry`, aber der Backend-Aufruf laeuft in einem eigenen Task
    pub fn spawn_retry(self: &Arc<Self>, temp_id: &MessageId) -> bool {
        let Some(inhalt) = self.retry_vorbereiten(temp_id) else {
            return false;
        };
        let engine = Arc::clone(self);
        let id = temp_id.clone();
        tokio::spawn(async move {
            engine.senden_abschliessen(id, inhalt, true).await;
        });
        true
    }

    /// Setzt den Inhalt des Eingabefelds und steuert die eigene Tipp-Anzeige
    ///
    /// Der erste Tastendruck sendet `typing`; nach `tipp_entprellung` ohne
    /// weitere Eingabe folgt `stopTyping`.
    pub fn set_draft(self: &Arc<Self>, text: impl Into<String>) {
        let (beginnt, generation) = {
            let mut z = self.zustand.lock();
            z.entwurf = text.into();
            z.tipp_generation += 1;
            let beginnt = !std::mem::replace(&mut z.tippe_selbst, true);
            (beginnt, z.tipp_generation)
        };

        if beginnt {
            let _ = self.emit(AusgehendesEvent::Typing(self.conversation_id.clone()));
        }

        let engine = Arc::clone(self);
        let entprellung = self.konfiguration.tipp_entprellung;
        tokio::spawn(async move {
            tokio::time::sleep(entprellung).await;
            let beenden = {
                let mut z = engine.zustand.lock();
                if z.tipp_generation == generation && z.tippe_selbst {
                    z.tippe_selbst = false;
                    true
                } else {
                    false
                }
            };
            if beenden {
                let _ = engine.emit(AusgehendesEvent::StopTyping(engine.conversation_id.clone()));
            }
        });
    }
}

/// Aktuelle Unix-Zeit in Millisekunden
fn jetzt_ms() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}
