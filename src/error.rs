use crate::roster::{Side, MATCHUP_CAPACITY, TEAM_CAPACITY};

/// Which capped collection rejected a mutation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Capacity {
    Team(Side),
    Matchups,
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum RosterError {
    #[error("{}", capacity_message(*.0))]
    CapacityExceeded(Capacity),
    #[error("Player name is required!")]
    NameRequired,
    #[error("Player name must be 20 characters or less!")]
    NameTooLong,
    #[error("Primary type is required!")]
    TypeRequired,
    #[error("Player number is required!")]
    DexRequired,
    #[error("Player number must be between 1 and 9999!")]
    DexOutOfRange,
    #[error("Player number already exists!")]
    DuplicateDex(String),
    #[error("Extra field must be 20 characters or less!")]
    ExtraTooLong,
    #[error("Please select one Pokemon from each team")]
    SelectionIncomplete,
    #[error("No Pokemon with dex number {0} on {1}")]
    UnknownEntry(String, &'static str),
}

fn capacity_message(capacity: Capacity) -> String {
    match capacity {
        Capacity::Team(_) => {
            format!("Team is full! Maximum {TEAM_CAPACITY} Pokemon allowed.")
        }
        Capacity::Matchups => {
            format!("Maximum number of matchups reached ({MATCHUP_CAPACITY})")
        }
    }
}

/// A row that matched none of the recognised representations.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("unrecognized row: {reason}")]
pub struct ExtractionFailure {
    pub reason: String,
}

impl ExtractionFailure {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ContactError {
    #[error("Contact name is required")]
    NameRequired,
    #[error("Invalid email address: {0}")]
    InvalidEmail(String),
    #[error("Invalid phone number: {0}")]
    InvalidPhone(String),
    #[error("Contact not found")]
    NotFound(u32),
}

#[derive(thiserror::Error, Debug)]
pub enum PersistError {
    #[error("No saved data found at {0}")]
    NotFound(String),
    #[error("Failed to access {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Save file corrupted: {0}")]
    Corrupt(#[from] serde_json::Error),
}

impl PersistError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, PersistError::NotFound(_))
    }
}
