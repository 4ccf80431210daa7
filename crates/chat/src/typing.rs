//! Tipp-Anzeige der anderen Teilnehmer
//!
//! Jeder Eintrag laeuft nach `ablauf` ab, wenn kein erneutes `typing`
//! eintrifft. Verwendet `tokio::time::Instant`, damit Tests die Zeit
//! anhalten und vorspulen koennen.

use std::collections::HashMap;
use std::time::Duration;

use plauder_core::types::UserId;
use tokio::time::Instant;

#[derive(Debug)]
pub struct TippStatus {
    ablauf: Duration,
    tippende: HashMap<UserId, Instant>,
}

impl TippStatus {
    pub fn neu(ablauf: Duration) -> Self {
        Self {
            ablauf,
            tippende: HashMap::new(),
        }
    }

    /// Markiert einen Teilnehmer als tippend bzw. verlaengert die Frist
    pub fn tippt(&mut self, user_id: UserId) {
        self.tippende.insert(user_id, Instant::now() + self.ablauf);
    }

    /// Gibt true zurueck wenn der Teilnehmer vorher als tippend galt
    pub fn gestoppt(&mut self, user_id: &UserId) -> bool {
        self.tippende.remove(user_id).is_some()
    }

    /// Entfernt abgelaufene Eintraege; true wenn sich etwas geaendert hat
    pub fn aufraeumen(&mut self) -> bool {
        let jetzt = Instant::now();
        let vorher = self.tippende.len();
        self.tippende.retain(|_, frist| *frist > jetzt);
        vorher != self.tippende.len()
    }

    /// Aktuell tippende Teilnehmer, sortiert
    pub fn aktive(&self) -> Vec<UserId> {
        let jetzt = Instant::now();
        let mut ids: Vec<UserId> = self
            .tippende
            .iter()
            .filter(|(_, frist)| **frist > jetzt)
            .map(|(id, _)| id.clone())
            .collect();
        ids.sort();
        ids
    }

    pub fn tippt_gerade(&self, user_id: &UserId) -> bool {
        self.tippende
            .get(user_id)
            .is_some_and(|frist| *frist > Instant::now())
    }

    pub fn leeren(&mut self) {
        self.tippende.clear();
    }
}
