//! Eingabezeilen des Terminal-Clients
//!
//! Alles was nicht mit `/` beginnt wird als Nachricht gesendet.

use plauder_core::types::MessageId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Befehl {
    Senden(String),
    /// `/older`
    Aeltere,
    /// `/reload`
    Neuladen,
    /// `/retry <temp-id>`
    Retry(MessageId),
    /// `/edit <id> <text>`
    Editieren { id: MessageId, inhalt: String },
    /// `/delete <id>`
    Loeschen(MessageId),
    /// `/read`
    Gelesen,
    /// `/who`
    Anwesende,
    /// `/help`
    Hilfe,
    /// `/quit`
    Beenden,
    /// Unbekannter Befehl oder fehlende Argumente
    Ungueltig(String),
}

pub const HILFE: &str = "\
Befehle:
  <text>              Nachricht senden
  /older              aeltere Nachrichten laden
  /reload             neueste Seite neu laden
  /retry <temp-id>    fehlgeschlagene Nachricht erneut senden
  /edit <id> <text>   eigene Nachricht editieren
  /delete <id>        eigene Nachricht loeschen
  /read               sichtbare Nachrichten als gelesen melden
  /who                Online-Teilnehmer und Tippende anzeigen
  /quit               beenden";

impl Befehl {
    pub fn parsen(zeile: &str) -> Self {
        let Some(rest) = zeile.trim_start().strip_prefix('/') else {
            return Self::Senden(zeile.to_owned());
        };
        let (name, argumente) = match rest.split_once(char::is_whitespace) {
            Some((name, argumente)) => (name, argumente.trim()),
            None => (rest.trim_end(), ""),
        };

        match name {
            "older" => Self::Aeltere,
            "reload" => Self::Neuladen,
            "read" => Self::Gelesen,
            "who" => Self::Anwesende,
            "help" => Self::Hilfe,
            "quit" | "exit" => Self::Beenden,
            "retry" if !argumente.is_empty() => Self::Retry(MessageId::new(argumente)),
            "delete" if !argumente.is_empty() => Self::Loeschen(MessageId::new(argumente)),
            "edit" => match argumente.split_once(char::is_whitespace) {
                Some((id, inhalt)) if !inhalt.trim().is_empty() => Self::Editieren {
                    id: MessageId::new(id),
                    inhalt: inhalt.trim().to_owned(),
                },
                _ => Self::Ungueltig("Aufruf: /edit <id> <text>".into()),
            },
            "retry" => Self::Ungueltig("Aufruf: /retry <temp-id>".into()),
            "delete" => Self::Ungueltig("Aufruf: /delete <id>".into()),
            anderer => Self::Ungueltig(format!("Unbekannter Befehl: /{anderer}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_wird_gesendet() {
        assert_eq!(Befehl::parsen("Hallo Welt"), Befehl::Senden("Hallo Welt".into()));
        assert_eq!(Befehl::parsen(""), Befehl::Senden("".into()));
    }

    #[test]
    fn befehle_ohne_argumente() {
        assert_eq!(Befehl::parsen("/older"), Befehl::Aeltere);
        assert_eq!(Befehl::parsen("/reload"), Befehl::Neuladen);
        assert_eq!(Befehl::parsen("  /read  "), Befehl::Gelesen);
        assert_eq!(Befehl::parsen("/quit"), Befehl::Beenden);
    }

    #[test]
    fn befehle_mit_argumenten() {
        assert_eq!(
            Befehl::parsen("/retry temp-17"),
            Befehl::Retry(MessageId::new("temp-17"))
        );
        assert_eq!(
            Befehl::parsen("/edit m1   neuer Text "),
            Befehl::Editieren {
                id: MessageId::new("m1"),
                inhalt: "neuer Text".into()
            }
        );
        assert_eq!(Befehl::parsen("/delete m2"), Befehl::Loeschen(MessageId::new("m2")));
    }

    #[test]
    fn fehlende_argumente() {
        assert!(matches!(Befehl::parsen("/retry"), Befehl::Ungueltig(_)));
        assert!(matches!(Befehl::parsen("/edit m1"), Befehl::Ungueltig(_)));
        assert!(matches!(Befehl::parsen("/foo"), Befehl::Ungueltig(_)));
    }
}
