//! Unit-Tests fuer die NachrichtenListe

use plauder_core::types::{ConversationId, MessageId};

use super::fakes::{bob, ich, ids, nachricht, verlauf, CHAT};
use crate::store::NachrichtenListe;
use crate::types::{Nachricht, NachrichtenStatus};

fn liste_mit(nachrichten: Vec<Nachricht>) -> NachrichtenListe {
    let mut liste = NachrichtenListe::neu();
    liste.ersetzen_alle(nachrichten);
    liste
}

#[test]
fn test_ersetzen_alle_verwirft_doppelte_ids() {
    let mut seite = verlauf(3);
    seite.push(nachricht("m1", bob(), "doppelt"));

    let liste = liste_mit(seite);

    assert_eq!(ids(liste.als_slice()), vec!["m0", "m1", "m2"]);
    assert_eq!(liste.finden(&MessageId::new("m1")).unwrap().inhalt, "Nachricht 1");
}

#[test]
fn test_voranstellen_ueberspringt_vorhandene() {
    let mut liste = liste_mit(verlauf(5).split_off(3));

    let eingefuegt = liste.voranstellen(verlauf(4));

    assert_eq!(eingefuegt, 3);
    assert_eq!(ids(liste.als_slice()), vec!["m0", "m1", "m2", "m3", "m4"]);
}

#[test]
fn test_voranstellen_leere_seite() {
    let mut liste = liste_mit(verlauf(2));
    assert_eq!(liste.voranstellen(Vec::new()), 0);
    assert_eq!(liste.len(), 2);
}

#[test]
fn test_anhaengen_nur_wenn_neu() {
    let mut liste = NachrichtenListe::neu();
    assert!(liste.is_empty());

    assert!(liste.anhaengen_falls_neu(nachricht("m1", bob(), "a")));
    assert!(!liste.anhaengen_falls_neu(nachricht("m1", bob(), "b")));

    assert_eq!(liste.len(), 1);
    assert_eq!(liste.als_slice()[0].inhalt, "a");
}

#[test]
fn test_ersetzen_behaelt_position() {
    let mut liste = liste_mit(verlauf(3));

    assert!(liste.ersetzen(&MessageId::new("m1"), nachricht("srv-1", ich(), "neu")));
    assert!(!liste.ersetzen(&MessageId::new("fehlt"), nachricht("x", ich(), "x")));

    assert_eq!(ids(liste.als_slice()), vec!["m0", "srv-1", "m2"]);
    assert_eq!(liste.position(&MessageId::new("srv-1")), Some(1));
}

#[test]
fn test_entfernen_und_aktualisieren() {
    let mut liste = liste_mit(verlauf(3));

    let entfernt = liste.entfernen(&MessageId::new("m0")).unwrap();
    assert_eq!(entfernt.id.as_str(), "m0");
    assert!(liste.entfernen(&MessageId::new("m0")).is_none());

    assert!(liste.aktualisieren(&MessageId::new("m2"), |n| n.editiert = true));
    assert!(!liste.aktualisieren(&MessageId::new("m0"), |n| n.editiert = true));
    assert!(liste.finden(&MessageId::new("m2")).unwrap().editiert);
}

#[test]
fn test_status_anheben_monoton() {
    let mut liste = liste_mit(verlauf(2));
    let alle = [MessageId::new("m0"), MessageId::new("m1")];

    assert_eq!(liste.status_anheben(&alle[..1], NachrichtenStatus::Read), 1);
    assert_eq!(liste.status_anheben(&alle, NachrichtenStatus::Delivered), 1);
    assert_eq!(liste.status_anheben(&alle, NachrichtenStatus::Delivered), 0);

    assert_eq!(liste.als_slice()[0].status, NachrichtenStatus::Read);
    assert_eq!(liste.als_slice()[1].status, NachrichtenStatus::Delivered);
}

#[test]
fn test_status_anheben_ignoriert_temporaere_und_ungueltige_ziele() {
    let temp = Nachricht::temporaer(
        MessageId::temporaer(1),
        ConversationId::new(CHAT),
        ich(),
        "hi",
    );
    let id = temp.id.clone();
    let mut liste = liste_mit(vec![temp]);

    assert_eq!(liste.status_anheben(&[id.clone()], NachrichtenStatus::Read), 0);
    assert_eq!(liste.status_anheben(&[id.clone()], NachrichtenStatus::Failed), 0);
    assert_eq!(liste.finden(&id).unwrap().status, NachrichtenStatus::Sending);
}
