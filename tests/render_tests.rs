//! Render tests using RenderHarness against the full app layout

use tui_dispatch::testing::*;

use lynlocke::contacts::{ContactBook, ContactDraft};
use lynlocke::mode::RuleMode;
use lynlocke::roster::{RosterEntry, Side};
use lynlocke::session::Session;
use lynlocke::state::{AppState, ConfirmKind, FormState, Overlay, Screen};
use lynlocke::ui::render_app;

fn render(state: &AppState) -> String {
    let mut render = RenderHarness::new(160, 30);
    render.render_to_string_plain(|frame| render_app(frame, frame.area(), state))
}

fn matched_state() -> AppState {
    let mut session = Session::default();
    session
        .add_entry(Side::A, RosterEntry::new("Pikachu", "Electric", "", "0025"))
        .unwrap();
    session
        .add_entry(Side::A, RosterEntry::new("Magnemite", "Electric", "Steel", "0081"))
        .unwrap();
    session
        .add_entry(Side::B, RosterEntry::new("Vulpix", "Fire", "", "0037"))
        .unwrap();
    session.add_matchup(Some("0025"), Some("0037")).unwrap();
    AppState::new(session, "teams.json".into(), "contacts.json".into(), None)
}

#[test]
fn header_shows_rule_mode() {
    let mut state = AppState::default();
    let output = render(&state);
    assert!(output.contains("LYNLOCKE"));
    assert!(output.contains("Rule mode: SIMPLIFIED"));

    state.session.set_mode(RuleMode::Advanced);
    assert!(render(&state).contains("Rule mode: ADVANCED"));
}

#[test]
fn team_panes_show_counts_and_header() {
    let output = render(&matched_state());

    assert!(output.contains("Player 1 (2/6)"), "{output}");
    assert!(output.contains("Player 2 (1/6)"));
    assert!(output.contains("Matchups (1/6)"));
    assert!(output.contains("Name"));
}

#[test]
fn rows_follow_the_resequenced_order() {
    let output = render(&matched_state());

    // Pikachu is a direct match, so it leads Magnemite despite the name order.
    let pikachu = output.find("Pikachu").expect("Pikachu rendered");
    let magnemite = output.find("Magnemite").expect("Magnemite rendered");
    assert!(pikachu < magnemite);
    assert!(output.contains("Steel"));
}

#[test]
fn matchup_row_uses_dash_for_missing_types() {
    let output = render(&matched_state());
    let row = output
        .lines()
        .find(|line| line.contains("Vulpix") && line.contains("Pikachu"))
        .expect("matchup row rendered");
    assert!(row.contains('-'));
    assert!(row.contains("0025"));
}

#[test]
fn contacts_screen_empty_and_filled() {
    let mut state = AppState {
        screen: Screen::Contacts,
        ..Default::default()
    };
    assert!(render(&state).contains("No contacts yet. Press a to add one."));

    let mut book = ContactBook::default();
    book.add(&ContactDraft {
        name: "Misty".into(),
        email: "misty@cerulean.gym".into(),
        phone: "555-0101".into(),
        notes: "Water".into(),
    })
    .unwrap();
    state.contacts = book;
    let output = render(&state);
    assert!(output.contains("Contacts (1)"));
    assert!(output.contains("misty@cerulean.gym"));
}

#[test]
fn player_form_modal_renders_fields() {
    let mut state = matched_state();
    state.overlay = Overlay::Form(FormState::player(Side::B));

    let output = render(&state);
    assert!(output.contains("Add Pokemon - Player 2"));
    assert!(output.contains("Primary Type:"));
    assert!(output.contains("switch team"));
}

#[test]
fn confirm_modal_shows_prompt() {
    let mut state = matched_state();
    state.overlay = Overlay::Confirm(ConfirmKind::DeleteEntries);

    let output = render(&state);
    assert!(output.contains("Delete the selected Pokemon?"));
    assert!(output.contains("[Enter] yes"));
}

#[test]
fn status_line_shows_notifications() {
    let mut state = matched_state();
    state.notify(lynlocke::state::StatusKind::Success, "Teams saved successfully!");
    assert!(render(&state).contains("Teams saved successfully!"));
}
