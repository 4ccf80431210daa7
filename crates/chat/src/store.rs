//! Geordnete, deduplizierte Nachrichtenliste einer Konversation
//!
//! Reihenfolge: aelteste zuerst. Alle Operationen arbeiten ueber die ID;
//! keine zwei Eintraege teilen sich eine ID.

use plauder_core::types::MessageId;

use crate::types::{Nachricht, NachrichtenStatus};

#[derive(Debug, Clone, Default)]
pub struct NachrichtenListe {
    eintraege: Vec<Nachricht>,
}

impl NachrichtenListe {
    pub fn neu() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.eintraege.len()
    }

    pub fn is_empty(&self) -> bool {
        self.eintraege.is_empty()
    }

    pub fn als_slice(&self) -> &[Nachricht] {
        &self.eintraege
    }

    pub fn enthaelt(&self, id: &MessageId) -> bool {
        self.position(id).is_some()
    }

    pub fn position(&self, id: &MessageId) -> Option<usize> {
        self.eintraege.iter().position(|n| &n.id == id)
    }

    pub fn finden(&self, id: &MessageId) -> Option<&Nachricht> {
        self.eintraege.iter().find(|n| &n.id == id)
    }

    /// Ersetzt den gesamten Inhalt (initialer Abruf)
    ///
    /// Doppelte IDs in der Antwort werden verworfen, die erste gewinnt.
    pub fn ersetzen_alle(&mut self, nachrichten: Vec<Nachricht>) {
        self.eintraege.clear();
        for n in nachrichten {
            self.anhaengen_falls_neu(n);
        }
    }

    /// Temporaere Eintraege die noch auf das Backend warten oder
    /// fehlgeschlagen sind, in Listenreihenfolge
    pub fn unbestaetigte(&self) -> Vec<Nachricht> {
        self.eintraege
            .iter()
            .filter(|n| n.id.ist_temporaer())
            .filter(|n| matches!(n.status, NachrichtenStatus::Sending | NachrichtenStatus::Failed))
            .cloned()
            .collect()
    }

    /// Stellt eine aeltere Seite voran und gibt die Anzahl tatsaechlich
    /// eingefuegter Nachrichten zurueck
    ///
    /// Bereits vorhandene IDs werden uebersprungen; die relative Reihenfolge
    /// der bisherigen Eintraege bleibt unveraendert.
    pub fn voranstellen(&mut self, seite: Vec<Nachricht>) -> usize {
        let mut neu: Vec<Nachricht> = Vec::with_capacity(seite.len());
        for n in seite {
            if !self.enthaelt(&n.id) && !neu.iter().any(|x| x.id == n.id) {
                neu.push(n);
            }
        }
        let anzahl = neu.len();
        neu.append(&mut self.eintraege);
        self.eintraege = neu;
        anzahl
    }

    /// Haengt eine Nachricht am Ende an, sofern die ID noch nicht existiert
    pub fn anhaengen_falls_neu(&mut self, nachricht: Nachricht) -> bool {
        if self.enthaelt(&nachricht.id) {
            return false;
        }
        self.eintraege.push(nachricht);
        true
    }

    pub fn entfernen(&mut self, id: &MessageId) -> Option<Nachricht> {
        let pos = self.position(id)?;
        Some(self.eintraege.remove(pos))
    }

    /// Ersetzt den Eintrag an derselben Position
    pub fn ersetzen(&mut self, id: &MessageId, nachricht: Nachricht) -> bool {
        match self.position(id) {
            Some(pos) => {
                self.eintraege[pos] = nachricht;
                true
            }
            None => false,
        }
    }

    /// Wendet `f` auf den Eintrag mit der ID an
    pub fn aktualisieren(&mut self, id: &MessageId, f: impl FnOnce(&mut Nachricht)) -> bool {
        match self.eintraege.iter_mut().find(|n| &n.id == id) {
            Some(n) => {
                f(n);
                true
            }
            None => false,
        }
    }

    /// Hebt den Status der genannten Nachrichten an (Quittungen)
    ///
    /// Nie abwaerts (`read` bleibt `read`), nie fuer `sending`/`failed`.
    /// Unbekannte IDs werden ignoriert. Gibt die Anzahl geaenderter Eintraege zurueck.
    pub fn status_anheben(&mut self, ids: &[MessageId], ziel: NachrichtenStatus) -> usize {
        let Some(ziel_rang) = ziel.quittungs_rang() else {
            return 0;
        };
        let mut geaendert = 0;
        for n in self.eintraege.iter_mut().filter(|n| ids.contains(&n.id)) {
            if matches!(n.status.quittungs_rang(), Some(rang) if rang < ziel_rang) {
                n.status = ziel;
                geaendert += 1;
            }
        }
        geaendert
    }
}
