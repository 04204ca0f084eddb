//! Entry extraction - turns stored or imported rows into canonical roster data
//!
//! Every row is classified into a [`RosterRowSource`] once, when it is read,
//! and extraction then dispatches on that variant.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::ExtractionFailure;
use crate::roster::{MatchupRecord, RosterEntry, Side};

pub const HEADER_TEXT: &str = "Name | Primary Type | Secondary Type | Dex";

/// The representations a roster row can arrive in.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum RosterRowSource {
    /// The table header; never an entry.
    Header,
    /// Named fields, as stored in save files.
    StructuredAttributes {
        name: String,
        type1: String,
        type2: Option<String>,
        dex_num: String,
    },
    /// `label=value` pairs.
    LabeledSubfields(Vec<(String, String)>),
    /// `name | type1 | type2 | dex`
    DelimitedText(String),
}

impl RosterRowSource {
    /// Resolve a text line into its representation.
    pub fn from_line(line: &str) -> Self {
        let trimmed = line.trim();
        if is_header(trimmed) {
            return RosterRowSource::Header;
        }
        if let Some(fields) = labeled_fields(trimmed) {
            return RosterRowSource::LabeledSubfields(fields);
        }
        RosterRowSource::DelimitedText(trimmed.to_string())
    }
}

pub fn is_header(text: &str) -> bool {
    let normalized: Vec<String> = text
        .split('|')
        .map(|part| part.trim().to_lowercase())
        .collect();
    let header: Vec<String> = HEADER_TEXT
        .split('|')
        .map(|part| part.trim().to_lowercase())
        .collect();
    normalized == header
}

fn labeled_fields(text: &str) -> Option<Vec<(String, String)>> {
    if text.contains('|') {
        return None;
    }
    let fields: Vec<(String, String)> = text
        .split([';', ','])
        .filter_map(|piece| {
            piece
                .split_once(['=', ':'])
                .map(|(label, value)| (label.trim().to_string(), value.trim().to_string()))
        })
        .collect();
    if fields.is_empty() {
        None
    } else {
        Some(fields)
    }
}

/// Extract one roster entry. `Ok(None)` means the row is a header.
pub fn extract_entry(source: &RosterRowSource) -> Result<Option<RosterEntry>, ExtractionFailure> {
    match source {
        RosterRowSource::Header => Ok(None),
        RosterRowSource::StructuredAttributes {
            name,
            type1,
            type2,
            dex_num,
        } => build_entry(name, type1, type2.as_deref().unwrap_or(""), dex_num).map(Some),
        RosterRowSource::LabeledSubfields(fields) => from_labels(fields).map(Some),
        RosterRowSource::DelimitedText(text) => {
            if is_header(text) {
                return Ok(None);
            }
            from_delimited(text).map(Some)
        }
    }
}

fn clean(value: &str) -> String {
    let trimmed = value.trim();
    if trimmed == "-" {
        String::new()
    } else {
        trimmed.to_string()
    }
}

fn build_entry(
    name: &str,
    type1: &str,
    type2: &str,
    dex_num: &str,
) -> Result<RosterEntry, ExtractionFailure> {
    let name = clean(name);
    if name.is_empty() {
        return Err(ExtractionFailure::new("missing name"));
    }
    let dex_num = clean(dex_num);
    if dex_num.is_empty() {
        return Err(ExtractionFailure::new(format!("{name} has no dex number")));
    }
    Ok(RosterEntry {
        name,
        type1: clean(type1),
        type2: clean(type2),
        dex_num,
        extra: String::new(),
    })
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Label {
    Name,
    Type1,
    Type2,
    Dex,
}

fn label_of(raw: &str) -> Option<Label> {
    let key: String = raw
        .chars()
        .filter(|c| !matches!(c, ' ' | '_' | '-'))
        .collect::<String>()
        .to_lowercase();
    match key.as_str() {
        "name" | "pokemon" => Some(Label::Name),
        "type1" | "primarytype" | "primary" => Some(Label::Type1),
        "type2" | "secondarytype" | "secondary" => Some(Label::Type2),
        "dex" | "dexnum" | "dexnumber" | "number" | "no" => Some(Label::Dex),
        _ => None,
    }
}

fn from_labels(fields: &[(String, String)]) -> Result<RosterEntry, ExtractionFailure> {
    let mut name = None;
    let mut type1 = "";
    let mut type2 = "";
    let mut dex = "";
    let mut recognised = false;

    for (label, value) in fields {
        let Some(label) = label_of(label) else {
            continue;
        };
        recognised = true;
        match label {
            Label::Name => name = Some(value.as_str()),
            Label::Type1 => type1 = value.as_str(),
            Label::Type2 => type2 = value.as_str(),
            Label::Dex => dex = value.as_str(),
        }
    }

    if !recognised {
        return Err(ExtractionFailure::new("no recognised labels"));
    }
    build_entry(name.unwrap_or(""), type1, type2, dex)
}

fn from_delimited(text: &str) -> Result<RosterEntry, ExtractionFailure> {
    let parts: Vec<&str> = text.split('|').collect();
    if parts.len() < 2 {
        return Err(ExtractionFailure::new(format!(
            "expected `name | type1 | type2 | dex`, got `{text}`"
        )));
    }
    let field = |index: usize| parts.get(index).copied().unwrap_or("");
    build_entry(field(0), field(1), field(2), field(3))
}

/// Read the eight matchup table cells back into a record.
pub fn extract_matchup<S: AsRef<str>>(cells: &[S]) -> Result<MatchupRecord, ExtractionFailure> {
    let [p1_dex, p1_type2, p1_type1, p1_name, p2_name, p2_type1, p2_type2, p2_dex] = cells else {
        return Err(ExtractionFailure::new(format!(
            "matchup rows need 8 cells, got {}",
            cells.len()
        )));
    };
    let record = MatchupRecord {
        p1_name: clean(p1_name.as_ref()),
        p1_type1: clean(p1_type1.as_ref()),
        p1_type2: clean(p1_type2.as_ref()),
        p1_dex: clean(p1_dex.as_ref()),
        p2_name: clean(p2_name.as_ref()),
        p2_type1: clean(p2_type1.as_ref()),
        p2_type2: clean(p2_type2.as_ref()),
        p2_dex: clean(p2_dex.as_ref()),
    };
    if record.p1_name.is_empty() || record.p2_name.is_empty() {
        return Err(ExtractionFailure::new("matchup is missing a name"));
    }
    Ok(record)
}

/// Result of importing a plain-text roster file.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ImportReport {
    pub team_a: Vec<RosterEntry>,
    pub team_b: Vec<RosterEntry>,
    pub matchups: Vec<MatchupRecord>,
    pub failures: Vec<String>,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Section {
    Team(Side),
    Matchups,
}

fn section_of(line: &str) -> Option<Option<Section>> {
    let inner = line.strip_prefix('[')?.strip_suffix(']')?;
    let key: String = inner
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_lowercase();
    Some(match key.as_str() {
        "teama" | "player1" | "team1" => Some(Section::Team(Side::A)),
        "teamb" | "player2" | "team2" => Some(Section::Team(Side::B)),
        "matchups" | "matchup" => Some(Section::Matchups),
        _ => None,
    })
}

/// Parse an import file. Bad lines are reported and skipped.
pub fn parse_roster_text(text: &str) -> ImportReport {
    let mut report = ImportReport::default();
    let mut section = None;

    for (index, raw) in text.lines().enumerate() {
        let line_no = index + 1;
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        if let Some(next) = section_of(line) {
            if next.is_none() {
                report
                    .failures
                    .push(format!("line {line_no}: unknown section {line}"));
            }
            section = next;
            continue;
        }

        match section {
            None => report
                .failures
                .push(format!("line {line_no}: row outside of a section")),
            Some(Section::Team(side)) => {
                match extract_entry(&RosterRowSource::from_line(line)) {
                    Ok(Some(entry)) => match side {
                        Side::A => report.team_a.push(entry),
                        Side::B => report.team_b.push(entry),
                    },
                    Ok(None) => {}
                    Err(err) => report.failures.push(format!("line {line_no}: {err}")),
                }
            }
            Some(Section::Matchups) => {
                let cells: Vec<&str> = line.split('|').collect();
                match extract_matchup(&cells) {
                    Ok(record) => report.matchups.push(record),
                    Err(err) => report.failures.push(format!("line {line_no}: {err}")),
                }
            }
        }
    }

    report
}
