use std::collections::BTreeSet;

use super::index::MatchupIndex;
use super::{TaggedEntry, Tier};
use crate::mode::RuleMode;
use crate::roster::{RosterEntry, Side};

/// One team's entries split by tier, each list in roster order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TierLists {
    pub direct_match: Vec<TaggedEntry>,
    pub type_conflict: Vec<TaggedEntry>,
    pub neutral: Vec<TaggedEntry>,
}

impl TierLists {
    pub fn len(&self) -> usize {
        self.direct_match.len() + self.type_conflict.len() + self.neutral.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Names of direct-match and type-conflict entries.
    pub fn classified_names(&self) -> BTreeSet<String> {
        self.direct_match
            .iter()
            .chain(self.type_conflict.iter())
            .map(|tagged| tagged.entry.name.clone())
            .collect()
    }

    fn push(&mut self, tagged: TaggedEntry) {
        match tagged.tier {
            Tier::DirectMatch => self.direct_match.push(tagged),
            Tier::TypeConflict => self.type_conflict.push(tagged),
            Tier::Neutral => self.neutral.push(tagged),
        }
    }
}

pub fn classify_entry(
    entry: &RosterEntry,
    names: &BTreeSet<String>,
    opponent_types: &BTreeSet<String>,
    mode: RuleMode,
) -> Tier {
    if names.contains(&entry.name) {
        return Tier::DirectMatch;
    }

    let hit = |value: &str| !value.is_empty() && opponent_types.contains(value);
    let conflict = match mode {
        RuleMode::Simplified => hit(&entry.type1),
        RuleMode::Advanced => hit(&entry.type1) || hit(&entry.type2),
    };

    if conflict {
        Tier::TypeConflict
    } else {
        Tier::Neutral
    }
}

/// Partition one team against the matchup index. Names come from the team's
/// own side of the matchups, types from the opposing side.
pub fn classify(team: &[RosterEntry], side: Side, index: &MatchupIndex, mode: RuleMode) -> TierLists {
    let names = index.names(side);
    let opponent_types = index.types(side.opposite());
    let mut lists = TierLists::default();
    for entry in team {
        let tier = classify_entry(entry, names, opponent_types, mode);
        lists.push(TaggedEntry::new(entry.clone(), tier));
    }
    lists
}
