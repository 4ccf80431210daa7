//! Terminal-Ausgabe der Nachrichtenliste
//!
//! `Anzeige` merkt sich was bereits ausgegeben wurde und liefert bei jeder
//! Listenaenderung nur die neuen bzw. geaenderten Zeilen.

use std::collections::HashMap;

use plauder_chat::{Nachricht, NachrichtenStatus};
use plauder_core::types::MessageId;

#[derive(Debug, Clone, PartialEq, Eq)]
struct Gesehen {
    status: NachrichtenStatus,
    inhalt: String,
    editiert: bool,
}

impl From<&Nachricht> for Gesehen {
    fn from(n: &Nachricht) -> Self {
        Self {
            status: n.status,
            inhalt: n.inhalt.clone(),
            editiert: n.editiert,
        }
    }
}

#[derive(Debug, Default)]
pub struct Anzeige {
    gesehen: HashMap<MessageId, Gesehen>,
}

impl Anzeige {
    pub fn neu() -> Self {
        Self::default()
    }

    /// Gleicht die Momentaufnahme ab und liefert die auszugebenden Zeilen
    pub fn aktualisieren(&mut self, liste: &[Nachricht]) -> Vec<String> {
        let mut zeilen = Vec::new();

        for n in liste {
            let neu = Gesehen::from(n);
            match self.gesehen.get(&n.id) {
                None => zeilen.push(zeile_formatieren(n)),
                Some(alt) if *alt != neu => zeilen.push(format!("~ {}", zeile_formatieren(n))),
                Some(_) => {}
            }
            self.gesehen.insert(n.id.clone(), neu);
        }

        let vorhanden: std::collections::HashSet<&MessageId> = liste.iter().map(|n| &n.id).collect();
        let mut entfernt: Vec<MessageId> = self
            .gesehen
            .keys()
            .filter(|id| !vorhanden.contains(id))
            .cloned()
            .collect();
        entfernt.sort_by(|a, b| a.as_str().cmp(b.as_str()));
        for id in entfernt {
            self.gesehen.remove(&id);
            // Bestaetigte Sendungen ersetzen ihren temporaeren Eintrag
            if !id.ist_temporaer() {
                zeilen.push(format!("- [{id}] geloescht"));
            }
        }
        zeilen
    }
}

fn status_kuerzel(status: NachrichtenStatus) -> &'static str {
    match status {
        NachrichtenStatus::Sending => "...",
        NachrichtenStatus::Sent => "+",
        NachrichtenStatus::Delivered => "++",
        NachrichtenStatus::Read => "gelesen",
        NachrichtenStatus::Failed => "FEHLER",
    }
}

/// Eine Nachricht als Terminalzeile
pub fn zeile_formatieren(n: &Nachricht) -> String {
    let zeit = n
        .erstellt_am
        .map(|t| t.format("%H:%M").to_string())
        .unwrap_or_else(|| "--:--".into());
    let mut zeile = format!(
        "[{zeit}] {}: {} ({}) [{}]",
        n.absender.anzeigename,
        n.inhalt,
        status_kuerzel(n.status),
        n.id
    );
    if n.editiert {
        zeile.push_str(" (bearbeitet)");
    }
    if n.status == NachrichtenStatus::Failed {
        zeile.push_str(&format!(" -> /retry {}", n.id));
    }
    zeile
}
