//! Application state - single source of truth

use std::collections::BTreeSet;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tui_dispatch_debug::debug::{ron_string, DebugSection, DebugState};

use crate::contacts::{Contact, ContactBook, ContactDraft};
use crate::highlight::{HighlightView, TaggedEntry};
use crate::roster::{NewEntry, Side, MATCHUP_CAPACITY, TEAM_CAPACITY};
use crate::session::Session;

/// Notifications expire after this many 200ms ticks.
pub const STATUS_TTL_TICKS: u32 = 15;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum Screen {
    #[default]
    Teams,
    Contacts,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum Pane {
    #[default]
    TeamA,
    Matchups,
    TeamB,
}

impl Pane {
    pub fn next(self) -> Self {
        match self {
            Pane::TeamA => Pane::Matchups,
            Pane::Matchups => Pane::TeamB,
            Pane::TeamB => Pane::TeamA,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            Pane::TeamA => Pane::TeamB,
            Pane::Matchups => Pane::TeamA,
            Pane::TeamB => Pane::Matchups,
        }
    }

    pub fn side(self) -> Option<Side> {
        match self {
            Pane::TeamA => Some(Side::A),
            Pane::TeamB => Some(Side::B),
            Pane::Matchups => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum StatusKind {
    Success,
    Info,
    Error,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Status {
    pub text: String,
    pub kind: StatusKind,
    pub ttl: u32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum ConfirmKind {
    DeleteEntries,
    DeleteContact(u32),
    ClearContacts,
}

impl ConfirmKind {
    pub fn prompt(&self) -> &'static str {
        match self {
            ConfirmKind::DeleteEntries => "Delete the selected Pokemon?",
            ConfirmKind::DeleteContact(_) => "Delete this contact?",
            ConfirmKind::ClearContacts => "Delete ALL contacts? This cannot be undone.",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum FormKind {
    Player { side: Side },
    Contact { editing: Option<u32> },
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct FormField {
    pub label: String,
    pub value: String,
    pub max_len: usize,
}

impl FormField {
    fn new(label: &str, value: &str, max_len: usize) -> Self {
        Self {
            label: label.to_string(),
            value: value.to_string(),
            max_len,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct FormState {
    pub kind: FormKind,
    pub fields: Vec<FormField>,
    pub active: usize,
}

impl FormState {
    pub fn player(side: Side) -> Self {
        Self {
            kind: FormKind::Player { side },
            fields: vec![
                FormField::new("Name", "", 20),
                FormField::new("Primary Type", "", 12),
                FormField::new("Secondary Type", "", 12),
                FormField::new("Dex Number", "", 4),
                FormField::new("Extra", "", 20),
            ],
            active: 0,
        }
    }

    pub fn contact(editing: Option<u32>, draft: &ContactDraft) -> Self {
        Self {
            kind: FormKind::Contact { editing },
            fields: vec![
                FormField::new("Name", &draft.name, 40),
                FormField::new("Email", &draft.email, 60),
                FormField::new("Phone", &draft.phone, 20),
                FormField::new("Notes", &draft.notes, 80),
            ],
            active: 0,
        }
    }

    pub fn title(&self) -> String {
        match self.kind {
            FormKind::Player { side } => format!("Add Pokemon - {}", side.label()),
            FormKind::Contact { editing: None } => "Add Contact".to_string(),
            FormKind::Contact { editing: Some(_) } => "Edit Contact".to_string(),
        }
    }

    fn value(&self, index: usize) -> String {
        self.fields
            .get(index)
            .map(|field| field.value.clone())
            .unwrap_or_default()
    }

    pub fn to_new_entry(&self) -> NewEntry {
        NewEntry {
            name: self.value(0),
            type1: self.value(1),
            type2: self.value(2),
            dex_num: self.value(3),
            extra: self.value(4),
        }
    }

    pub fn to_contact_draft(&self) -> ContactDraft {
        ContactDraft {
            name: self.value(0),
            email: self.value(1),
            phone: self.value(2),
            notes: self.value(3),
        }
    }

    pub fn focus_next(&mut self) {
        self.active = (self.active + 1) % self.fields.len().max(1);
    }

    pub fn focus_prev(&mut self) {
        let len = self.fields.len().max(1);
        self.active = (self.active + len - 1) % len;
    }

    /// Append a character, ignoring input past the field limit.
    pub fn push_char(&mut self, c: char) -> bool {
        let Some(field) = self.fields.get_mut(self.active) else {
            return false;
        };
        if field.value.chars().count() >= field.max_len {
            return false;
        }
        field.value.push(c);
        true
    }

    pub fn backspace(&mut self) -> bool {
        self.fields
            .get_mut(self.active)
            .and_then(|field| field.value.pop())
            .is_some()
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum Overlay {
    #[default]
    None,
    Form(FormState),
    Confirm(ConfirmKind),
    Search,
}

/// Application state - everything the UI needs to render
#[derive(Clone, Debug, Default, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct AppState {
    pub session: Session,
    /// Derived from `session`; rebuilt by `refresh_view`, never persisted.
    #[serde(skip)]
    pub view: HighlightView,

    pub screen: Screen,
    pub focus: Pane,
    pub cursor_a: usize,
    pub cursor_b: usize,
    pub cursor_matchups: usize,
    /// Selections are dex numbers so they survive resequencing.
    pub selected_a: Option<String>,
    pub selected_b: Option<String>,
    pub selected_matchups: BTreeSet<usize>,
    pub overlay: Overlay,
    pub status: Option<Status>,

    pub contacts: ContactBook,
    pub contact_query: String,
    pub contact_cursor: usize,

    pub teams_path: String,
    pub contacts_path: String,
    pub import_path: Option<String>,

    pub tick: u64,
}

impl AppState {
    pub fn new(
        session: Session,
        teams_path: String,
        contacts_path: String,
        import_path: Option<String>,
    ) -> Self {
        let mut state = Self {
            session,
            teams_path,
            contacts_path,
            import_path,
            ..Default::default()
        };
        state.refresh_view();
        state
    }

    /// Recompute highlights from the session and clamp cursors and selections.
    pub fn refresh_view(&mut self) {
        self.view = self.session.highlight();

        for side in [Side::A, Side::B] {
            let still_there = self
                .selected(side)
                .is_some_and(|dex| self.session.find(side, dex).is_some());
            if !still_there {
                *self.selected_mut(side) = None;
            }
        }
        let matchup_count = self.session.matchups.len();
        self.selected_matchups.retain(|&index| index < matchup_count);

        for pane in [Pane::TeamA, Pane::Matchups, Pane::TeamB] {
            let len = self.pane_len(pane);
            let cursor = self.cursor_mut(pane);
            *cursor = (*cursor).min(len.saturating_sub(1));
        }
        self.contact_cursor = self
            .contact_cursor
            .min(self.visible_contacts().len().saturating_sub(1));
    }

    pub fn pane_len(&self, pane: Pane) -> usize {
        match pane {
            Pane::TeamA => self.view.team_a.len(),
            Pane::TeamB => self.view.team_b.len(),
            Pane::Matchups => self.session.matchups.len(),
        }
    }

    pub fn cursor(&self, pane: Pane) -> usize {
        match pane {
            Pane::TeamA => self.cursor_a,
            Pane::TeamB => self.cursor_b,
            Pane::Matchups => self.cursor_matchups,
        }
    }

    pub fn cursor_mut(&mut self, pane: Pane) -> &mut usize {
        match pane {
            Pane::TeamA => &mut self.cursor_a,
            Pane::TeamB => &mut self.cursor_b,
            Pane::Matchups => &mut self.cursor_matchups,
        }
    }

    pub fn selected(&self, side: Side) -> Option<&str> {
        match side {
            Side::A => self.selected_a.as_deref(),
            Side::B => self.selected_b.as_deref(),
        }
    }

    pub fn selected_mut(&mut self, side: Side) -> &mut Option<String> {
        match side {
            Side::A => &mut self.selected_a,
            Side::B => &mut self.selected_b,
        }
    }

    /// The tagged entry under the cursor of a team pane.
    pub fn entry_at_cursor(&self, side: Side) -> Option<&TaggedEntry> {
        let pane = match side {
            Side::A => Pane::TeamA,
            Side::B => Pane::TeamB,
        };
        self.view.team(side).get(self.cursor(pane))
    }

    pub fn visible_contacts(&self) -> Vec<&Contact> {
        self.contacts.search(&self.contact_query)
    }

    pub fn contact_at_cursor(&self) -> Option<&Contact> {
        self.visible_contacts().get(self.contact_cursor).copied()
    }

    pub fn notify(&mut self, kind: StatusKind, text: impl Into<String>) {
        self.status = Some(Status {
            text: text.into(),
            kind,
            ttl: STATUS_TTL_TICKS,
        });
    }

    pub fn is_form_open(&self) -> bool {
        matches!(self.overlay, Overlay::Form(_))
    }
}

impl DebugState for AppState {
    fn debug_sections(&self) -> Vec<DebugSection> {
        let mut sections = vec![
            DebugSection::new("Session")
                .entry("mode", ron_string(&self.session.mode))
                .entry(
                    "team_a",
                    format!("{}/{}", self.session.team_a.len(), TEAM_CAPACITY),
                )
                .entry(
                    "team_b",
                    format!("{}/{}", self.session.team_b.len(), TEAM_CAPACITY),
                )
                .entry(
                    "matchups",
                    format!("{}/{}", self.session.matchups.len(), MATCHUP_CAPACITY),
                ),
            DebugSection::new("Selection")
                .entry("screen", ron_string(&self.screen))
                .entry("focus", ron_string(&self.focus))
                .entry("selected_a", ron_string(&self.selected_a))
                .entry("selected_b", ron_string(&self.selected_b))
                .entry("selected_matchups", ron_string(&self.selected_matchups)),
        ];

        let tiers = |team: &[TaggedEntry]| {
            team.iter()
                .map(|t| format!("{}:{}{}", t.entry.name, t.tier.label(), if t.cross_flag { "*" } else { "" }))
                .collect::<Vec<_>>()
                .join(", ")
        };
        sections.push(
            DebugSection::new("Highlights")
                .entry("team_a", tiers(&self.view.team_a))
                .entry("team_b", tiers(&self.view.team_b)),
        );

        if !self.contacts.is_empty() {
            sections.push(
                DebugSection::new("Contacts")
                    .entry("count", ron_string(&self.contacts.len()))
                    .entry("query", ron_string(&self.contact_query)),
            );
        }

        if let Some(status) = &self.status {
            sections.push(
                DebugSection::new("Status")
                    .entry("kind", ron_string(&status.kind))
                    .entry("text", ron_string(&status.text)),
            );
        }

        sections
    }
}
