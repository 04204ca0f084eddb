use std::ops::RangeInclusive;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::RosterError;

pub const TEAM_CAPACITY: usize = 6;
pub const MATCHUP_CAPACITY: usize = 6;
pub const MAX_NAME_LEN: usize = 20;
pub const MAX_EXTRA_LEN: usize = 20;
pub const DEX_RANGE: RangeInclusive<u32> = 1..=9999;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema)]
pub enum Side {
    A,
    B,
}

impl Side {
    pub fn opposite(self) -> Self {
        match self {
            Side::A => Side::B,
            Side::B => Side::A,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Side::A => "Player 1",
            Side::B => "Player 2",
        }
    }

    /// Team number as written in save files.
    pub fn number(self) -> &'static str {
        match self {
            Side::A => "1",
            Side::B => "2",
        }
    }

    pub fn from_number(number: &str) -> Option<Self> {
        match number.trim() {
            "1" => Some(Side::A),
            "2" => Some(Side::B),
            _ => None,
        }
    }
}

/// One roster row: a Pokemon owned by exactly one team.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct RosterEntry {
    pub name: String,
    pub type1: String,
    #[serde(default)]
    pub type2: String,
    pub dex_num: String,
    #[serde(default)]
    pub extra: String,
}

impl RosterEntry {
    pub fn new(name: &str, type1: &str, type2: &str, dex_num: &str) -> Self {
        Self {
            name: name.to_string(),
            type1: type1.to_string(),
            type2: type2.to_string(),
            dex_num: dex_num.to_string(),
            extra: String::new(),
        }
    }

    pub fn dex_value(&self) -> Option<u32> {
        self.dex_num.trim().parse().ok()
    }

    /// Dex numbers compare numerically when both parse, textually otherwise.
    pub fn same_dex(&self, dex_num: &str) -> bool {
        match (self.dex_value(), dex_num.trim().parse::<u32>().ok()) {
            (Some(a), Some(b)) => a == b,
            _ => self.dex_num.trim() == dex_num.trim(),
        }
    }

    pub fn display_line(&self) -> String {
        format!(
            "{} | {} | {} | {}",
            self.name, self.type1, self.type2, self.dex_num
        )
    }
}

pub fn format_dex(dex: u32) -> String {
    format!("{:04}", dex)
}

/// A declared pairing of a Team A entry against a Team B entry.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct MatchupRecord {
    pub p1_name: String,
    pub p1_type1: String,
    pub p1_type2: String,
    pub p1_dex: String,
    pub p2_name: String,
    pub p2_type1: String,
    pub p2_type2: String,
    pub p2_dex: String,
}

/// Borrowed view of one side of a matchup.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MatchupSide<'a> {
    pub name: &'a str,
    pub type1: &'a str,
    pub type2: &'a str,
    pub dex: &'a str,
}

impl MatchupRecord {
    pub fn pair(a: &RosterEntry, b: &RosterEntry) -> Self {
        Self {
            p1_name: a.name.clone(),
            p1_type1: a.type1.clone(),
            p1_type2: a.type2.clone(),
            p1_dex: a.dex_num.clone(),
            p2_name: b.name.clone(),
            p2_type1: b.type1.clone(),
            p2_type2: b.type2.clone(),
            p2_dex: b.dex_num.clone(),
        }
    }

    pub fn side(&self, side: Side) -> MatchupSide<'_> {
        match side {
            Side::A => MatchupSide {
                name: &self.p1_name,
                type1: &self.p1_type1,
                type2: &self.p1_type2,
                dex: &self.p1_dex,
            },
            Side::B => MatchupSide {
                name: &self.p2_name,
                type1: &self.p2_type1,
                type2: &self.p2_type2,
                dex: &self.p2_dex,
            },
        }
    }

    /// Cells in table order; empty values render as `-`.
    pub fn display_cells(&self) -> [String; 8] {
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
        .map(|cell| {
            if cell.is_empty() {
                "-".to_string()
            } else {
                cell.clone()
            }
        })
    }
}

/// Raw add-player form input.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct NewEntry {
    pub name: String,
    pub type1: String,
    pub type2: String,
    pub dex_num: String,
    pub extra: String,
}

impl NewEntry {
    /// Field checks that do not depend on the current rosters.
    pub fn validate(&self) -> Result<RosterEntry, RosterError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(RosterError::NameRequired);
        }
        if name.chars().count() > MAX_NAME_LEN {
            return Err(RosterError::NameTooLong);
        }

        let type1 = self.type1.trim();
        if type1.is_empty() {
            return Err(RosterError::TypeRequired);
        }

        let dex_raw = self.dex_num.trim();
        if dex_raw.is_empty() {
            return Err(RosterError::DexRequired);
        }
        let dex: u32 = dex_raw.parse().map_err(|_| RosterError::DexRequired)?;
        if !DEX_RANGE.contains(&dex) {
            return Err(RosterError::DexOutOfRange);
        }

        let extra = self.extra.trim();
        if extra.chars().count() > MAX_EXTRA_LEN {
            return Err(RosterError::ExtraTooLong);
        }

        Ok(RosterEntry {
            name: name.to_string(),
            type1: type1.to_string(),
            type2: self.type2.trim().to_string(),
            dex_num: format_dex(dex),
            extra: extra.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(name: &str, type1: &str, dex: &str) -> NewEntry {
        NewEntry {
            name: name.into(),
            type1: type1.into(),
            dex_num: dex.into(),
            ..Default::default()
        }
    }

    #[test]
    fn validate_pads_dex_and_trims() {
        let entry = form("  Pikachu ", "Electric", "25").validate().unwrap();
        assert_eq!(entry.name, "Pikachu");
        assert_eq!(entry.dex_num, "0025");
        assert_eq!(entry.type2, "");
    }

    #[test]
    fn validate_rejects_bad_fields() {
        assert_eq!(form("", "Fire", "4").validate(), Err(RosterError::NameRequired));
        assert_eq!(
            form("A".repeat(21).as_str(), "Fire", "4").validate(),
            Err(RosterError::NameTooLong)
        );
        assert_eq!(form("Charmander", "", "4").validate(), Err(RosterError::TypeRequired));
        assert_eq!(form("Charmander", "Fire", "abc").validate(), Err(RosterError::DexRequired));
        assert_eq!(form("Charmander", "Fire", "0").validate(), Err(RosterError::DexOutOfRange));
        assert_eq!(
            form("Charmander", "Fire", "10000").validate(),
            Err(RosterError::DexOutOfRange)
        );

        let mut long_extra = form("Charmander", "Fire", "4");
        long_extra.extra = "x".repeat(21);
        assert_eq!(long_extra.validate(), Err(RosterError::ExtraTooLong));
    }

    #[test]
    fn same_dex_compares_numerically() {
        let entry = RosterEntry::new("Pikachu", "Electric", "", "0025");
        assert!(entry.same_dex("25"));
        assert!(!entry.same_dex("26"));
    }

    #[test]
    fn display_cells_use_table_order() {
        let a = RosterEntry::new("Pikachu", "Electric", "", "0025");
        let b = RosterEntry::new("Oddish", "Grass", "Poison", "0043");
        let cells = MatchupRecord::pair(&a, &b).display_cells();
        assert_eq!(
            cells,
            ["0025", "-", "Electric", "Pikachu", "Oddish", "Grass", "Poison", "0043"]
                .map(String::from)
        );
    }
}
