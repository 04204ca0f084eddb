use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::contacts::ContactBook;
use crate::extract::ImportReport;
use crate::mode::RuleMode;
use crate::persist::LoadedTeams;
use crate::roster::Side;
use crate::state::Screen;

#[derive(tui_dispatch::Action, Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
#[action(infer_categories)]
pub enum Action {
    Init,
    UiTerminalResize(u16, u16),
    UiRender,
    Tick,

    ScreenShow(Screen),

    // ===== Teams screen =====
    FocusNext,
    FocusPrev,
    CursorUp,
    CursorDown,
    /// Toggle selection of the row under the cursor
    RowSelect,
    SelectionClear,

    // ===== Forms =====
    PlayerFormOpen(Side),
    FormFocusNext,
    FormFocusPrev,
    FormInput(char),
    FormBackspace,
    FormToggleSide,
    FormSubmit,
    FormClose,

    // ===== Roster and matchups =====
    MatchupAdd,
    MatchupRemoveSelected,
    DeleteRequest,
    ConfirmAccept,
    ConfirmCancel,

    ModeToggle,
    ModeSet(RuleMode),

    // ===== Persistence =====
    SaveTeams,
    SaveComplete,
    SaveError(String),
    LoadTeams,
    LoadComplete(Box<LoadedTeams>),
    /// No save file exists yet
    LoadMissing,
    LoadError(String),
    ImportComplete(Box<ImportReport>),
    ImportError(String),

    // ===== Contacts =====
    ContactsDidLoad(ContactBook),
    ContactsDidError(String),
    ContactsSaved,
    ContactFormOpen { editing: bool },
    ContactDelete,
    ContactsClearAll,
    ContactSearchOpen,
    ContactSearchInput(char),
    ContactSearchBackspace,
    ContactSearchClose,
    ContactsShowAll,
    ContactCursorUp,
    ContactCursorDown,

    Quit,
}
