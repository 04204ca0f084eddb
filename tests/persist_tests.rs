//! File persistence tests against a temporary data directory

use pretty_assertions::assert_eq;
use tempfile::tempdir;

use lynlocke::contacts::{ContactBook, ContactDraft};
use lynlocke::error::PersistError;
use lynlocke::persist::{self, SaveFile};
use lynlocke::roster::{RosterEntry, Side};
use lynlocke::session::Session;

fn session() -> Session {
    let mut session = Session::default();
    session
        .add_entry(Side::A, RosterEntry::new("Pikachu", "Electric", "", "0025"))
        .unwrap();
    session
        .add_entry(Side::B, RosterEntry::new("Oddish", "Grass", "Poison", "0043"))
        .unwrap();
    session.add_matchup(Some("0025"), Some("0043")).unwrap();
    session
}

#[tokio::test]
async fn teams_round_trip_through_disk() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("nested").join("teams.json");
    let saved = session();

    persist::save_teams(&path, &SaveFile::from_session(&saved))
        .await
        .unwrap();
    let loaded = persist::load_teams(&path).await.unwrap();

    assert_eq!(loaded.team_a, saved.team_a);
    assert_eq!(loaded.team_b, saved.team_b);
    assert_eq!(loaded.matchups, saved.matchups);
    assert!(loaded.skipped.is_empty());
}

#[tokio::test]
async fn missing_teams_file_is_not_found() {
    let dir = tempdir().unwrap();
    let err = persist::load_teams(&dir.path().join("teams.json"))
        .await
        .unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn corrupt_teams_file_is_reported() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("teams.json");
    std::fs::write(&path, "{ not json").unwrap();

    let err = persist::load_teams(&path).await.unwrap_err();
    assert!(matches!(err, PersistError::Corrupt(_)));
}

#[tokio::test]
async fn bad_rows_are_skipped_on_load() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("teams.json");
    let json = r#"{
        "teams": [
            {"TeamNumber": "1", "Name": "Pikachu", "Type1": "Electric", "Type2": "", "DexNum": "0025", "Extra": ""},
            {"TeamNumber": "1", "Name": "", "Type1": "Fire", "Type2": "", "DexNum": "0004", "Extra": ""}
        ],
        "matchups": []
    }"#;
    std::fs::write(&path, json).unwrap();

    let loaded = persist::load_teams(&path).await.unwrap();
    assert_eq!(loaded.team_a.len(), 1);
    assert_eq!(loaded.skipped.len(), 1);
    assert!(loaded.skipped[0].starts_with("team row 2"));
}

#[tokio::test]
async fn contacts_default_to_an_empty_book() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("contacts.json");

    let book = persist::load_contacts(&path).await.unwrap();
    assert!(book.is_empty());

    let mut book = ContactBook::default();
    book.add(&ContactDraft {
        name: "Brock".into(),
        email: "brock@pewter.gym".into(),
        phone: "555-0102".into(),
        notes: String::new(),
    })
    .unwrap();
    persist::save_contacts(&path, &book).await.unwrap();

    let reloaded = persist::load_contacts(&path).await.unwrap();
    assert_eq!(reloaded, book);
    assert_eq!(reloaded.next_id, 2);
}

#[tokio::test]
async fn roster_text_imports_by_section() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("roster.txt");
    let text = "\
# weekend run
[Team A]
Name | Primary Type | Secondary Type | Dex
Pikachu | Electric | - | 25
[Team B]
name=Oddish; type1=Grass; type2=Poison; dex=43
Nameless
[Matchups]
0025 | - | Electric | Pikachu | Oddish | Grass | Poison | 0043
";
    std::fs::write(&path, text).unwrap();

    let report = persist::import_roster(&path).await.unwrap();
    assert_eq!(report.team_a.len(), 1);
    assert_eq!(report.team_b.len(), 1);
    assert_eq!(report.team_b[0].type2, "Poison");
    assert_eq!(report.matchups.len(), 1);
    assert_eq!(report.matchups[0].p2_name, "Oddish");
    assert_eq!(report.failures.len(), 1);
    assert!(report.failures[0].starts_with("line 7:"));
}
