use tui_dispatch::DispatchResult;

use crate::action::Action;
use crate::contacts::ContactDraft;
use crate::effect::Effect;
use crate::error::{Capacity, RosterError};
use crate::mode::RuleMode;
use crate::persist::SaveFile;
use crate::roster::Side;
use crate::state::{AppState, ConfirmKind, FormKind, FormState, Overlay, Pane, StatusKind};

pub fn reducer(state: &mut AppState, action: Action) -> DispatchResult<Effect> {
    match action {
        Action::Init => {
            state.refresh_view();
            let mut effects = vec![Effect::LoadContacts {
                path: state.contacts_path.clone(),
            }];
            match &state.import_path {
                Some(path) => effects.push(Effect::ImportRoster { path: path.clone() }),
                None => effects.push(Effect::LoadTeams {
                    path: state.teams_path.clone(),
                }),
            }
            DispatchResult::changed_with_many(effects)
        }
        Action::UiTerminalResize(..) | Action::UiRender => DispatchResult::changed(),
        Action::Tick => {
            state.tick = state.tick.wrapping_add(1);
            let Some(status) = state.status.as_mut() else {
                return DispatchResult::unchanged();
            };
            status.ttl = status.ttl.saturating_sub(1);
            if status.ttl == 0 {
                state.status = None;
                DispatchResult::changed()
            } else {
                DispatchResult::unchanged()
            }
        }
        Action::ScreenShow(screen) => {
            state.screen = screen;
            state.overlay = Overlay::None;
            DispatchResult::changed()
        }

        Action::FocusNext => {
            state.focus = state.focus.next();
            DispatchResult::changed()
        }
        Action::FocusPrev => {
            state.focus = state.focus.prev();
            DispatchResult::changed()
        }
        Action::CursorUp => move_cursor(state, -1),
        Action::CursorDown => move_cursor(state, 1),
        Action::RowSelect => select_row(state),
        Action::SelectionClear => {
            clear_selections(state);
            DispatchResult::changed()
        }

        Action::PlayerFormOpen(side) => {
            if state.session.is_team_full(side) {
                let err = RosterError::CapacityExceeded(Capacity::Team(side));
                state.notify(StatusKind::Error, err.to_string());
            } else {
                state.overlay = Overlay::Form(FormState::player(side));
            }
            DispatchResult::changed()
        }
        Action::FormFocusNext => edit_form(state, FormState::focus_next),
        Action::FormFocusPrev => edit_form(state, FormState::focus_prev),
        Action::FormInput(c) => edit_form(state, |form| {
            form.push_char(c);
        }),
        Action::FormBackspace => edit_form(state, |form| {
            form.backspace();
        }),
        Action::FormToggleSide => edit_form(state, |form| {
            if let FormKind::Player { side } = form.kind {
                form.kind = FormKind::Player {
                    side: side.opposite(),
                };
            }
        }),
        Action::FormSubmit => submit_form(state),
        Action::FormClose => {
            state.overlay = Overlay::None;
            DispatchResult::changed()
        }

        Action::MatchupAdd => {
            let a = state.selected_a.clone();
            let b = state.selected_b.clone();
            match state.session.add_matchup(a.as_deref(), b.as_deref()) {
                Ok(record) => {
                    let text = format!("Matchup added: {} vs {}", record.p1_name, record.p2_name);
                    tracing::info!(%text, "matchup added");
                    state.selected_a = None;
                    state.selected_b = None;
                    state.refresh_view();
                    state.notify(StatusKind::Success, text);
                }
                Err(err) => state.notify(StatusKind::Error, err.to_string()),
            }
            DispatchResult::changed()
        }
        Action::MatchupRemoveSelected => {
            if state.selected_matchups.is_empty() {
                state.notify(StatusKind::Info, "Select matchups to remove");
                return DispatchResult::changed();
            }
            let selected = std::mem::take(&mut state.selected_matchups);
            let removed = state.session.remove_matchups(&selected);
            state.refresh_view();
            state.notify(StatusKind::Success, format!("Removed {removed} matchup(s)"));
            DispatchResult::changed()
        }
        Action::DeleteRequest => {
            if state.selected_a.is_none() && state.selected_b.is_none() {
                state.notify(StatusKind::Error, "Select a Pokemon to delete");
            } else {
                state.overlay = Overlay::Confirm(ConfirmKind::DeleteEntries);
            }
            DispatchResult::changed()
        }
        Action::ConfirmAccept => confirm_accept(state),
        Action::ConfirmCancel => {
            state.overlay = Overlay::None;
            DispatchResult::changed()
        }

        Action::ModeToggle => {
            let next = state.session.mode.toggle();
            set_mode(state, next)
        }
        Action::ModeSet(mode) => set_mode(state, mode),

        Action::SaveTeams => DispatchResult::changed_with(Effect::SaveTeams {
            path: state.teams_path.clone(),
            save: Box::new(SaveFile::from_session(&state.session)),
        }),
        Action::SaveComplete => {
            state.notify(StatusKind::Success, "Teams saved successfully!");
            DispatchResult::changed()
        }
        Action::SaveError(error) => {
            tracing::warn!(%error, "save failed");
            state.notify(StatusKind::Error, format!("Failed to save teams: {error}"));
            DispatchResult::changed()
        }
        Action::LoadTeams => DispatchResult::changed_with(Effect::LoadTeams {
            path: state.teams_path.clone(),
        }),
        Action::LoadComplete(loaded) => {
            let loaded = *loaded;
            let skipped = loaded.skipped.len();
            let summary = state
                .session
                .load(loaded.team_a, loaded.team_b, loaded.matchups);
            clear_selections(state);
            state.refresh_view();

            let mut text = format!(
                "Loaded {} Pokemon and {} matchup(s)",
                summary.entries, summary.matchups
            );
            if skipped + summary.dropped > 0 {
                text.push_str(&format!(" ({} row(s) skipped)", skipped + summary.dropped));
            }
            state.notify(StatusKind::Success, text);
            DispatchResult::changed()
        }
        Action::LoadMissing => {
            state.notify(StatusKind::Info, "No saved teams found");
            DispatchResult::changed()
        }
        Action::LoadError(error) => {
            tracing::warn!(%error, "load failed");
            state.notify(StatusKind::Error, format!("Failed to load teams: {error}"));
            DispatchResult::changed()
        }
        Action::ImportComplete(report) => {
            let report = *report;
            let failures = report.failures.len();
            let summary = state
                .session
                .load(report.team_a, report.team_b, report.matchups);
            clear_selections(state);
            state.refresh_view();

            let skipped = failures + summary.dropped;
            let (kind, text) = if skipped > 0 {
                (
                    StatusKind::Info,
                    format!(
                        "Imported {} Pokemon; {} line(s) skipped",
                        summary.entries, skipped
                    ),
                )
            } else {
                (
                    StatusKind::Success,
                    format!(
                        "Imported {} Pokemon and {} matchup(s)",
                        summary.entries, summary.matchups
                    ),
                )
            };
            state.notify(kind, text);
            DispatchResult::changed()
        }
        Action::ImportError(error) => {
            state.notify(StatusKind::Error, format!("Import failed: {error}"));
            DispatchResult::changed()
        }

        Action::ContactsDidLoad(book) => {
            tracing::debug!(contacts = book.len(), "contacts loaded");
            state.contacts = book;
            state.refresh_view();
            DispatchResult::changed()
        }
        Action::ContactsDidError(error) => {
            state.notify(StatusKind::Error, error);
            DispatchResult::changed()
        }
        Action::ContactsSaved => DispatchResult::unchanged(),
        Action::ContactFormOpen { editing } => {
            if editing {
                let form = state.contact_at_cursor().map(|contact| {
                    FormState::contact(Some(contact.id), &ContactDraft::from_contact(contact))
                });
                match form {
                    Some(form) => state.overlay = Overlay::Form(form),
                    None => state.notify(StatusKind::Error, "Select a contact to edit"),
                }
            } else {
                state.overlay = Overlay::Form(FormState::contact(None, &ContactDraft::default()));
            }
            DispatchResult::changed()
        }
        Action::ContactDelete => {
            match state.contact_at_cursor().map(|contact| contact.id) {
                Some(id) => state.overlay = Overlay::Confirm(ConfirmKind::DeleteContact(id)),
                None => state.notify(StatusKind::Error, "Select a contact to delete"),
            }
            DispatchResult::changed()
        }
        Action::ContactsClearAll => {
            if state.contacts.is_empty() {
                state.notify(StatusKind::Info, "No contacts to clear");
            } else {
                state.overlay = Overlay::Confirm(ConfirmKind::ClearContacts);
            }
            DispatchResult::changed()
        }
        Action::ContactSearchOpen => {
            state.overlay = Overlay::Search;
            DispatchResult::changed()
        }
        Action::ContactSearchInput(c) => {
            state.contact_query.push(c);
            state.contact_cursor = 0;
            DispatchResult::changed()
        }
        Action::ContactSearchBackspace => {
            state.contact_query.pop();
            state.contact_cursor = 0;
            DispatchResult::changed()
        }
        Action::ContactSearchClose => {
            state.overlay = Overlay::None;
            DispatchResult::changed()
        }
        Action::ContactsShowAll => {
            state.contact_query.clear();
            state.contact_cursor = 0;
            DispatchResult::changed()
        }
        Action::ContactCursorUp => {
            state.contact_cursor = state.contact_cursor.saturating_sub(1);
            DispatchResult::changed()
        }
        Action::ContactCursorDown => {
            let len = state.visible_contacts().len();
            if state.contact_cursor + 1 < len {
                state.contact_cursor += 1;
            }
            DispatchResult::changed()
        }

        Action::Quit => DispatchResult::unchanged(),
    }
}

fn move_cursor(state: &mut AppState, delta: isize) -> DispatchResult<Effect> {
    let pane = state.focus;
    let len = state.pane_len(pane);
    if len == 0 {
        return DispatchResult::unchanged();
    }
    let cursor = state.cursor_mut(pane);
    let next = cursor.saturating_add_signed(delta).min(len - 1);
    if next == *cursor {
        return DispatchResult::unchanged();
    }
    *cursor = next;
    DispatchResult::changed()
}

fn select_row(state: &mut AppState) -> DispatchResult<Effect> {
    match state.focus.side() {
        Some(side) => {
            let Some(dex) = state.entry_at_cursor(side).map(|t| t.entry.dex_num.clone()) else {
                return DispatchResult::unchanged();
            };
            let selected = state.selected_mut(side);
            if selected.as_deref() == Some(dex.as_str()) {
                *selected = None;
            } else {
                *selected = Some(dex);
            }
        }
        None => {
            let index = state.cursor(Pane::Matchups);
            if index >= state.session.matchups.len() {
                return DispatchResult::unchanged();
            }
            if !state.selected_matchups.remove(&index) {
                state.selected_matchups.insert(index);
            }
        }
    }
    DispatchResult::changed()
}

fn clear_selections(state: &mut AppState) {
    state.selected_a = None;
    state.selected_b = None;
    state.selected_matchups.clear();
}

fn edit_form(state: &mut AppState, edit: impl FnOnce(&mut FormState)) -> DispatchResult<Effect> {
    match &mut state.overlay {
        Overlay::Form(form) => {
            edit(form);
            DispatchResult::changed()
        }
        _ => DispatchResult::unchanged(),
    }
}

fn submit_form(state: &mut AppState) -> DispatchResult<Effect> {
    let Overlay::Form(form) = &state.overlay else {
        return DispatchResult::unchanged();
    };

    match form.kind {
        FormKind::Player { side } => {
            let input = form.to_new_entry();
            match state.session.add_new(side, &input) {
                Ok(entry) => {
                    tracing::info!(name = %entry.name, dex = %entry.dex_num, team = side.label(), "entry added");
                    state.overlay = Overlay::None;
                    state.refresh_view();
                    state.notify(
                        StatusKind::Success,
                        format!("Added {} to {}", entry.name, side.label()),
                    );
                }
                Err(err) => state.notify(StatusKind::Error, err.to_string()),
            }
            DispatchResult::changed()
        }
        FormKind::Contact { editing } => {
            let draft = form.to_contact_draft();
            let result = match editing {
                Some(id) => state.contacts.update(id, &draft).map(|c| c.name.clone()),
                None => state.contacts.add(&draft).map(|c| c.name.clone()),
            };
            match result {
                Ok(name) => {
                    state.overlay = Overlay::None;
                    state.refresh_view();
                    let verb = if editing.is_some() { "Updated" } else { "Added" };
                    state.notify(StatusKind::Success, format!("{verb} contact {name}"));
                    DispatchResult::changed_with(save_contacts(state))
                }
                Err(err) => {
                    state.notify(StatusKind::Error, err.to_string());
                    DispatchResult::changed()
                }
            }
        }
    }
}

fn confirm_accept(state: &mut AppState) -> DispatchResult<Effect> {
    let Overlay::Confirm(kind) = state.overlay else {
        return DispatchResult::unchanged();
    };
    state.overlay = Overlay::None;

    match kind {
        ConfirmKind::DeleteEntries => {
            let selection: Vec<(Side, String)> = [Side::A, Side::B]
                .into_iter()
                .filter_map(|side| state.selected(side).map(|dex| (side, dex.to_string())))
                .collect();
            let removed = state.session.remove_entries(&selection);
            state.selected_a = None;
            state.selected_b = None;
            state.refresh_view();
            state.notify(StatusKind::Success, format!("Deleted {removed} Pokemon"));
            DispatchResult::changed()
        }
        ConfirmKind::DeleteContact(id) => match state.contacts.delete(id) {
            Ok(contact) => {
                state.refresh_view();
                state.notify(StatusKind::Success, format!("Deleted contact {}", contact.name));
                DispatchResult::changed_with(save_contacts(state))
            }
            Err(err) => {
                state.notify(StatusKind::Error, err.to_string());
                DispatchResult::changed()
            }
        },
        ConfirmKind::ClearContacts => {
            let removed = state.contacts.clear();
            state.refresh_view();
            state.notify(StatusKind::Success, format!("Cleared {removed} contact(s)"));
            DispatchResult::changed_with(save_contacts(state))
        }
    }
}

fn set_mode(state: &mut AppState, mode: RuleMode) -> DispatchResult<Effect> {
    if !state.session.set_mode(mode) {
        return DispatchResult::unchanged();
    }
    state.refresh_view();
    state.notify(StatusKind::Info, format!("Rule mode: {}", mode.label()));
    DispatchResult::changed()
}

fn save_contacts(state: &AppState) -> Effect {
    Effect::SaveContacts {
        path: state.contacts_path.clone(),
        book: Box::new(state.contacts.clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roster::RosterEntry;
    use crate::session::Session;

    fn state_with_rosters() -> AppState {
        let mut session = Session::default();
        session.add_entry(Side::A, RosterEntry::new("Pikachu", "Electric", "", "0025")).unwrap();
        session.add_entry(Side::A, RosterEntry::new("Charmander", "Fire", "", "0004")).unwrap();
        session.add_entry(Side::B, RosterEntry::new("Vulpix", "Fire", "", "0037")).unwrap();
        AppState::new(session, "teams.json".into(), "contacts.json".into(), None)
    }

    #[test]
    fn tick_expires_status() {
        let mut state = AppState::default();
        state.notify(StatusKind::Info, "hello");
        for _ in 0..crate::state::STATUS_TTL_TICKS - 1 {
            assert!(!reducer(&mut state, Action::Tick).changed);
        }
        assert!(reducer(&mut state, Action::Tick).changed);
        assert!(state.status.is_none());
    }

    #[test]
    fn selecting_rows_toggles_by_dex() {
        let mut state = state_with_rosters();
        reducer(&mut state, Action::RowSelect);
        let first = state.view.team_a[0].entry.dex_num.clone();
        assert_eq!(state.selected_a.as_deref(), Some(first.as_str()));
        reducer(&mut state, Action::RowSelect);
        assert!(state.selected_a.is_none());
    }

    #[test]
    fn cursor_stays_in_bounds() {
        let mut state = state_with_rosters();
        assert!(!reducer(&mut state, Action::CursorUp).changed);
        reducer(&mut state, Action::CursorDown);
        reducer(&mut state, Action::CursorDown);
        assert_eq!(state.cursor_a, 1);
    }

    #[test]
    fn mode_set_to_current_mode_is_unchanged() {
        let mut state = state_with_rosters();
        assert!(!reducer(&mut state, Action::ModeSet(RuleMode::Simplified)).changed);
        assert!(reducer(&mut state, Action::ModeToggle).changed);
        assert_eq!(state.session.mode, RuleMode::Advanced);
    }

    #[test]
    fn confirm_without_overlay_does_nothing() {
        let mut state = state_with_rosters();
        assert!(!reducer(&mut state, Action::ConfirmAccept).changed);
        assert_eq!(state.session.team_a.len(), 2);
    }
}
