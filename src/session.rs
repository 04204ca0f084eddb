//! The roster session: both teams, the matchup list and the active rule mode.
//!
//! Mutations only change data. Callers ask for [`Session::highlight`] after
//! each accepted mutation to get a fresh view.

use std::collections::BTreeSet;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::{Capacity, RosterError};
use crate::highlight::{recompute_and_resequence, HighlightView};
use crate::mode::RuleMode;
use crate::roster::{MatchupRecord, NewEntry, RosterEntry, Side, MATCHUP_CAPACITY, TEAM_CAPACITY};

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Session {
    pub team_a: Vec<RosterEntry>,
    pub team_b: Vec<RosterEntry>,
    pub matchups: Vec<MatchupRecord>,
    pub mode: RuleMode,
}

/// Rows discarded by a bulk load: past a cap, or reusing a dex number.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LoadSummary {
    pub entries: usize,
    pub matchups: usize,
    pub dropped: usize,
}

impl Session {
    pub fn new(mode: RuleMode) -> Self {
        Self {
            mode,
            ..Default::default()
        }
    }

    pub fn team(&self, side: Side) -> &[RosterEntry] {
        match side {
            Side::A => &self.team_a,
            Side::B => &self.team_b,
        }
    }

    fn team_mut(&mut self, side: Side) -> &mut Vec<RosterEntry> {
        match side {
            Side::A => &mut self.team_a,
            Side::B => &mut self.team_b,
        }
    }

    pub fn is_team_full(&self, side: Side) -> bool {
        self.team(side).len() >= TEAM_CAPACITY
    }

    pub fn find(&self, side: Side, dex_num: &str) -> Option<&RosterEntry> {
        self.team(side).iter().find(|entry| entry.dex_num == dex_num)
    }

    /// True when any entry on either team already carries this dex number.
    pub fn dex_taken(&self, dex_num: &str) -> bool {
        self.team_a
            .iter()
            .chain(self.team_b.iter())
            .any(|entry| entry.same_dex(dex_num))
    }

    pub fn add_entry(&mut self, side: Side, entry: RosterEntry) -> Result<(), RosterError> {
        if self.is_team_full(side) {
            return Err(RosterError::CapacityExceeded(Capacity::Team(side)));
        }
        if self.dex_taken(&entry.dex_num) {
            return Err(RosterError::DuplicateDex(entry.dex_num));
        }
        self.team_mut(side).push(entry);
        Ok(())
    }

    /// Validate raw form input, then add it. Returns the stored entry.
    pub fn add_new(&mut self, side: Side, form: &NewEntry) -> Result<RosterEntry, RosterError> {
        // A full team is reported ahead of any form validation error.
        if self.is_team_full(side) {
            return Err(RosterError::CapacityExceeded(Capacity::Team(side)));
        }
        let entry = form.validate()?;
        self.add_entry(side, entry.clone())?;
        Ok(entry)
    }

    /// Delete the given entries. Matchups that mention them are kept.
    pub fn remove_entries(&mut self, selection: &[(Side, String)]) -> usize {
        let mut removed = 0;
        for (side, dex_num) in selection {
            let team = self.team_mut(*side);
            let before = team.len();
            team.retain(|entry| &entry.dex_num != dex_num);
            removed += before - team.len();
        }
        removed
    }

    pub fn add_matchup(
        &mut self,
        a_dex: Option<&str>,
        b_dex: Option<&str>,
    ) -> Result<&MatchupRecord, RosterError> {
        let (Some(a_dex), Some(b_dex)) = (a_dex, b_dex) else {
            return Err(RosterError::SelectionIncomplete);
        };
        if self.matchups.len() >= MATCHUP_CAPACITY {
            return Err(RosterError::CapacityExceeded(Capacity::Matchups));
        }
        let a = self
            .find(Side::A, a_dex)
            .ok_or_else(|| RosterError::UnknownEntry(a_dex.to_string(), Side::A.label()))?;
        let b = self
            .find(Side::B, b_dex)
            .ok_or_else(|| RosterError::UnknownEntry(b_dex.to_string(), Side::B.label()))?;
        let record = MatchupRecord::pair(a, b);
        self.matchups.push(record);
        Ok(&self.matchups[self.matchups.len() - 1])
    }

    pub fn remove_matchups(&mut self, indices: &BTreeSet<usize>) -> usize {
        let before = self.matchups.len();
        let mut position = 0;
        self.matchups.retain(|_| {
            let keep = !indices.contains(&position);
            position += 1;
            keep
        });
        before - self.matchups.len()
    }

    /// Replace everything except the mode. Entries go through `add_entry`, so
    /// rows past a cap or with a dex number already loaded are dropped.
    pub fn load(
        &mut self,
        team_a: Vec<RosterEntry>,
        team_b: Vec<RosterEntry>,
        mut matchups: Vec<MatchupRecord>,
    ) -> LoadSummary {
        self.team_a.clear();
        self.team_b.clear();

        let mut dropped = 0;
        let rows = team_a
            .into_iter()
            .map(|entry| (Side::A, entry))
            .chain(team_b.into_iter().map(|entry| (Side::B, entry)));
        for (side, entry) in rows {
            if let Err(err) = self.add_entry(side, entry) {
                tracing::debug!(%err, team = side.label(), "dropped row on load");
                dropped += 1;
            }
        }
        dropped += truncate_to(&mut matchups, MATCHUP_CAPACITY);
        self.matchups = matchups;

        LoadSummary {
            entries: self.team_a.len() + self.team_b.len(),
            matchups: self.matchups.len(),
            dropped,
        }
    }

    /// Returns whether the mode changed.
    pub fn set_mode(&mut self, mode: RuleMode) -> bool {
        let changed = self.mode != mode;
        self.mode = mode;
        changed
    }

    pub fn highlight(&self) -> HighlightView {
        recompute_and_resequence(&self.team_a, &self.team_b, &self.matchups, self.mode)
    }
}

fn truncate_to<T>(rows: &mut Vec<T>, limit: usize) -> usize {
    let excess = rows.len().saturating_sub(limit);
    rows.truncate(limit);
    excess
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::highlight::Tier;

    fn entry(name: &str, type1: &str, dex: &str) -> RosterEntry {
        RosterEntry::new(name, type1, "", dex)
    }

    #[test]
    fn seventh_entry_is_rejected() {
        let mut session = Session::default();
        for n in 1..=6 {
            session
                .add_entry(Side::A, entry(&format!("Mon{n}"), "Normal", &format!("{n:04}")))
                .unwrap();
        }

        let err = session
            .add_entry(Side::A, entry("Extra", "Normal", "0099"))
            .unwrap_err();

        assert_eq!(err, RosterError::CapacityExceeded(Capacity::Team(Side::A)));
        assert_eq!(session.team_a.len(), TEAM_CAPACITY);
        assert!(session.add_entry(Side::B, entry("Extra", "Normal", "0099")).is_ok());
    }

    #[test]
    fn dex_numbers_are_unique_across_teams() {
        let mut session = Session::default();
        session.add_entry(Side::A, entry("Pikachu", "Electric", "0025")).unwrap();
        let err = session
            .add_entry(Side::B, entry("Raichu", "Electric", "25"))
            .unwrap_err();
        assert_eq!(err, RosterError::DuplicateDex("25".into()));
    }

    #[test]
    fn add_new_validates_and_pads() {
        let mut session = Session::default();
        let form = NewEntry {
            name: "Eevee".into(),
            type1: "Normal".into(),
            dex_num: "133".into(),
            ..Default::default()
        };
        let stored = session.add_new(Side::B, &form).unwrap();
        assert_eq!(stored.dex_num, "0133");
        assert_eq!(session.add_new(Side::A, &form), Err(RosterError::DuplicateDex("0133".into())));
    }

    #[test]
    fn full_team_is_reported_before_form_errors() {
        let mut session = Session::default();
        for n in 1..=6 {
            session.add_entry(Side::A, entry(&format!("Mon{n}"), "Normal", &format!("{n:04}"))).unwrap();
        }
        let blank = NewEntry::default();
        assert_eq!(
            session.add_new(Side::A, &blank),
            Err(RosterError::CapacityExceeded(Capacity::Team(Side::A)))
        );
        assert_eq!(session.add_new(Side::B, &blank), Err(RosterError::NameRequired));
    }

    #[test]
    fn matchups_need_both_sides_and_respect_the_cap() {
        let mut session = Session::default();
        session.add_entry(Side::A, entry("Pikachu", "Electric", "0025")).unwrap();
        session.add_entry(Side::B, entry("Vulpix", "Fire", "0037")).unwrap();

        assert_eq!(
            session.add_matchup(Some("0025"), None).unwrap_err(),
            RosterError::SelectionIncomplete
        );
        for _ in 0..MATCHUP_CAPACITY {
            session.add_matchup(Some("0025"), Some("0037")).unwrap();
        }
        assert_eq!(
            session.add_matchup(Some("0025"), Some("0037")).unwrap_err(),
            RosterError::CapacityExceeded(Capacity::Matchups)
        );
        assert_eq!(session.matchups.len(), MATCHUP_CAPACITY);
    }

    #[test]
    fn removals_report_counts() {
        let mut session = Session::default();
        session.add_entry(Side::A, entry("Pikachu", "Electric", "0025")).unwrap();
        session.add_entry(Side::B, entry("Vulpix", "Fire", "0037")).unwrap();
        session.add_entry(Side::B, entry("Abra", "Psychic", "0063")).unwrap();
        session.add_matchup(Some("0025"), Some("0037")).unwrap();
        session.add_matchup(Some("0025"), Some("0063")).unwrap();

        let removed = session.remove_matchups(&BTreeSet::from([0, 5]));
        assert_eq!(removed, 1);
        assert_eq!(session.matchups[0].p2_name, "Abra");

        let removed = session.remove_entries(&[(Side::A, "0025".into()), (Side::B, "0037".into())]);
        assert_eq!(removed, 2);
        assert_eq!(session.team_b.len(), 1);
        assert_eq!(session.matchups.len(), 1);
    }

    #[test]
    fn load_truncates_past_caps() {
        let mut session = Session::new(RuleMode::Advanced);
        let team: Vec<RosterEntry> = (1..=8)
            .map(|n| entry(&format!("Mon{n}"), "Normal", &format!("{n:04}")))
            .collect();

        let summary = session.load(team, Vec::new(), vec![MatchupRecord::default(); 7]);

        assert_eq!(session.team_a.len(), TEAM_CAPACITY);
        assert_eq!(session.matchups.len(), MATCHUP_CAPACITY);
        assert_eq!(summary.dropped, 3);
        assert_eq!(session.mode, RuleMode::Advanced);
    }

    #[test]
    fn load_drops_repeated_dex_numbers_across_teams() {
        let mut session = Session::default();
        session.add_entry(Side::A, entry("Stale", "Normal", "0001")).unwrap();

        let summary = session.load(
            vec![entry("Pikachu", "Electric", "0025"), entry("Raichu", "Electric", "0026")],
            vec![entry("Eevee", "Normal", "0025"), entry("Vulpix", "Fire", "26")],
            Vec::new(),
        );

        assert_eq!(summary.entries, 2);
        assert_eq!(summary.dropped, 2);
        assert!(session.find(Side::A, "0001").is_none());
        assert!(session.team_b.is_empty());

        let removed = session.remove_entries(&[(Side::A, "0025".into())]);
        assert_eq!(removed, 1);
        assert_eq!(session.team_a[0].name, "Raichu");
    }

    #[test]
    fn mode_switch_changes_the_view() {
        let mut session = Session::default();
        session.add_entry(Side::A, RosterEntry::new("Gastly", "Ghost", "Poison", "0092")).unwrap();
        session.add_entry(Side::B, RosterEntry::new("Oddish", "Grass", "Poison", "0043")).unwrap();
        session.add_entry(Side::B, entry("Ekans", "Poison", "0023")).unwrap();
        session.add_matchup(Some("0092"), Some("0043")).unwrap();

        assert_eq!(session.highlight().tier_of(Side::B, "0023"), Some(Tier::Neutral));
        assert!(session.set_mode(RuleMode::Advanced));
        assert!(!session.set_mode(RuleMode::Advanced));
        assert_eq!(session.highlight().tier_of(Side::B, "0023"), Some(Tier::TypeConflict));
    }
}
