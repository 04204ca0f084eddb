use std::io::ErrorKind;
use std::path::Path;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::contacts::ContactBook;
use crate::error::PersistError;
use crate::extract::{self, extract_entry, extract_matchup, ImportReport, RosterRowSource};
use crate::roster::{MatchupRecord, RosterEntry, Side};
use crate::session::Session;

/// One team row as stored on disk.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "PascalCase")]
pub struct TeamRow {
    pub team_number: String,
    pub name: String,
    pub type1: String,
    #[serde(default)]
    pub type2: String,
    pub dex_num: String,
    #[serde(default)]
    pub extra: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "PascalCase")]
pub struct MatchupRow {
    pub p1_dex: String,
    pub p1_type1: String,
    pub p1_type2: String,
    pub p1_name: String,
    pub p2_name: String,
    pub p2_type1: String,
    pub p2_type2: String,
    pub p2_dex: String,
}

impl MatchupRow {
    fn cells(&self) -> [&str; 8] {
        [
            &self.p1_dex,
            &self.p1_type2,
            &self.p1_type1,
            &self.p1_name,
            &self.p2_name,
            &self.p2_type1,
            &self.p2_type2,
            &self.p2_dex,
        ]
    }
}

impl From<&MatchupRecord> for MatchupRow {
    fn from(record: &MatchupRecord) -> Self {
        Self {
            p1_dex: record.p1_dex.clone(),
            p1_type1: record.p1_type1.clone(),
            p1_type2: record.p1_type2.clone(),
            p1_name: record.p1_name.clone(),
            p2_name: record.p2_name.clone(),
            p2_type1: record.p2_type1.clone(),
            p2_type2: record.p2_type2.clone(),
            p2_dex: record.p2_dex.clone(),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct SaveFile {
    #[serde(default)]
    pub teams: Vec<TeamRow>,
    #[serde(default)]
    pub matchups: Vec<MatchupRow>,
}

/// Rosters read back from a save file, with the rows that were skipped.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct LoadedTeams {
    pub team_a: Vec<RosterEntry>,
    pub team_b: Vec<RosterEntry>,
    pub matchups: Vec<MatchupRecord>,
    pub skipped: Vec<String>,
}

impl SaveFile {
    pub fn from_session(session: &Session) -> Self {
        let team_rows = |side: Side| {
            session.team(side).iter().map(move |entry| TeamRow {
                team_number: side.number().to_string(),
                name: entry.name.clone(),
                type1: entry.type1.clone(),
                type2: entry.type2.clone(),
                dex_num: entry.dex_num.clone(),
                extra: entry.extra.clone(),
            })
        };
        Self {
            teams: team_rows(Side::A).chain(team_rows(Side::B)).collect(),
            matchups: session.matchups.iter().map(MatchupRow::from).collect(),
        }
    }

    pub fn into_rosters(self) -> LoadedTeams {
        let mut loaded = LoadedTeams::default();

        for (index, row) in self.teams.into_iter().enumerate() {
            let Some(side) = Side::from_number(&row.team_number) else {
                loaded.skipped.push(format!(
                    "team row {}: unknown team number {:?}",
                    index + 1,
                    row.team_number
                ));
                continue;
            };
            let source = RosterRowSource::StructuredAttributes {
                name: row.name,
                type1: row.type1,
                type2: (!row.type2.is_empty()).then_some(row.type2),
                dex_num: row.dex_num,
            };
            match extract_entry(&source) {
                Ok(Some(mut entry)) => {
                    entry.extra = row.extra;
                    match side {
                        Side::A => loaded.team_a.push(entry),
                        Side::B => loaded.team_b.push(entry),
                    }
                }
                Ok(None) => {}
                Err(err) => loaded.skipped.push(format!("team row {}: {err}", index + 1)),
            }
        }

        for (index, row) in self.matchups.iter().enumerate() {
            match extract_matchup(&row.cells()) {
                Ok(record) => loaded.matchups.push(record),
                Err(err) => loaded
                    .skipped
                    .push(format!("matchup row {}: {err}", index + 1)),
            }
        }

        loaded
    }
}

async fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), PersistError> {
    let io_error = |source| PersistError::Io {
        path: path.display().to_string(),
        source,
    };
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await.map_err(io_error)?;
    }
    let json = serde_json::to_string_pretty(value)?;
    tokio::fs::write(path, json).await.map_err(io_error)
}

async fn read_text(path: &Path) -> Result<String, PersistError> {
    match tokio::fs::read_to_string(path).await {
        Ok(text) => Ok(text),
        Err(e) if e.kind() == ErrorKind::NotFound => {
            Err(PersistError::NotFound(path.display().to_string()))
        }
        Err(source) => Err(PersistError::Io {
            path: path.display().to_string(),
            source,
        }),
    }
}

pub async fn save_teams(path: &Path, save: &SaveFile) -> Result<(), PersistError> {
    write_json(path, save).await?;
    tracing::info!(
        path = %path.display(),
        teams = save.teams.len(),
        matchups = save.matchups.len(),
        "saved teams"
    );
    Ok(())
}

pub async fn load_teams(path: &Path) -> Result<LoadedTeams, PersistError> {
    let json = read_text(path).await?;
    let save: SaveFile = serde_json::from_str(&json)?;
    let loaded = save.into_rosters();
    tracing::info!(
        path = %path.display(),
        team_a = loaded.team_a.len(),
        team_b = loaded.team_b.len(),
        matchups = loaded.matchups.len(),
        skipped = loaded.skipped.len(),
        "loaded teams"
    );
    for reason in &loaded.skipped {
        tracing::warn!(%reason, "skipped save row");
    }
    Ok(loaded)
}

pub async fn save_contacts(path: &Path, book: &ContactBook) -> Result<(), PersistError> {
    write_json(path, book).await?;
    tracing::debug!(path = %path.display(), contacts = book.len(), "saved contacts");
    Ok(())
}

/// A missing contacts file is an empty book.
pub async fn load_contacts(path: &Path) -> Result<ContactBook, PersistError> {
    match read_text(path).await {
        Ok(json) => Ok(serde_json::from_str(&json)?),
        Err(err) if err.is_not_found() => Ok(ContactBook::default()),
        Err(err) => Err(err),
    }
}

pub async fn import_roster(path: &Path) -> Result<ImportReport, PersistError> {
    let text = read_text(path).await?;
    let report = extract::parse_roster_text(&text);
    for reason in &report.failures {
        tracing::warn!(path = %path.display(), %reason, "skipped import line");
    }
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn save_rows_use_pascal_case_columns() {
        let mut session = Session::default();
        session
            .add_entry(Side::B, RosterEntry::new("Oddish", "Grass", "Poison", "0043"))
            .unwrap();
        let json = serde_json::to_value(SaveFile::from_session(&session)).unwrap();
        let row = &json["teams"][0];
        assert_eq!(row["TeamNumber"], "2");
        assert_eq!(row["DexNum"], "0043");
        assert_eq!(row["Type2"], "Poison");
    }

    #[test]
    fn bad_rows_are_skipped_not_fatal() {
        let save = SaveFile {
            teams: vec![
                TeamRow {
                    team_number: "1".into(),
                    name: "Pikachu".into(),
                    type1: "Electric".into(),
                    dex_num: "0025".into(),
                    ..Default::default()
                },
                TeamRow {
                    team_number: "3".into(),
                    name: "Ghost".into(),
                    ..Default::default()
                },
                TeamRow {
                    team_number: "2".into(),
                    name: " ".into(),
                    ..Default::default()
                },
            ],
            matchups: vec![MatchupRow::default()],
        };

        let loaded = save.into_rosters();

        assert_eq!(loaded.team_a.len(), 1);
        assert!(loaded.team_b.is_empty());
        assert!(loaded.matchups.is_empty());
        assert_eq!(loaded.skipped.len(), 3);
    }
}
